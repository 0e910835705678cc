pub mod refs;

pub use refs::{DecorationKind, DecorationMap};
