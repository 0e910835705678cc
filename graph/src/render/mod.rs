pub mod dot;

pub use dot::{node_id, quote, DotGraphBuilder};
