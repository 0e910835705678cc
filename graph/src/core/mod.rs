pub mod chain;
pub mod graph;

pub use chain::{Chain, ChainOrigin, CommitId};
pub use graph::{Graph, GraphStats};
