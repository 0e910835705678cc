pub mod config;
pub mod error;
pub mod exec;
pub mod history;
pub mod render;
pub mod repository;
pub mod runlog;
pub mod status;

pub use config::{Cutoff, OutputPaths, Settings};
pub use error::{CoreError, Result};
pub use exec::{CommandOutput, CommandRunner, ScriptedRunner, SystemRunner};
pub use history::{GitHistory, HistorySource};
pub use render::{RenderOutcome, Renderer};
pub use repository::Repository;
pub use runlog::RunLog;
pub use status::{ConsoleStatus, StatusSink};
