pub mod reducer;

pub use reducer::{reduce, Reducer};
