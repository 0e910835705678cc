use gitvtree_core::CoreError;
use thiserror::Error;

use crate::parse::Section;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    /// A query line does not have the shape the parser relies on
    #[error("malformed {section} record at line {line}: {reason}: '{content}'")]
    MalformedRecord {
        section: Section,
        line: usize,
        content: String,
        reason: String,
    },

    #[error("failed to write {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}
