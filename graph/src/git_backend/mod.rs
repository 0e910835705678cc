pub mod collector;

pub use collector::ChainCollector;
