//! Commit-chain extraction, reduction and graphviz serialization.
//!
//! ```text
//! decorated log ──> CommitLog ──> DecorationMap ─────────────┐
//! refs + merges ──> ChainCollector ──> chains ──> Reducer ──> DotGraphBuilder ──> .dot
//! ```

pub mod core;
pub mod decor;
pub mod error;
pub mod git_backend;
pub mod parse;
pub mod pipeline;
pub mod reduce;
pub mod render;

pub use self::core::{Chain, ChainOrigin, CommitId, Graph, GraphStats};
pub use decor::{DecorationKind, DecorationMap};
pub use error::{GraphError, Result};
pub use git_backend::ChainCollector;
pub use parse::{CommitLog, MergeCommit, RefEntry, Section};
pub use pipeline::{build_graph, collect, generate, Collected, RenderStatus, RunReport};
pub use reduce::{reduce, Reducer};
pub use render::DotGraphBuilder;
