pub mod log;

pub use log::{
    parse_decorations, parse_hash_list, parse_merge_log, parse_ref_list, CommitLog, LogRecord,
    MergeCommit, RefEntry, Section,
};
