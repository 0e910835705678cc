use std::fmt;

use tracing::{debug, info};

use crate::core::CommitId;
use crate::decor::DecorationMap;
use crate::error::{GraphError, Result};

/// Which history query a block of text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Commits,
    Refs,
    Merges,
}

impl Section {
    /// Label used in the run log and in error messages
    pub fn label(&self) -> &'static str {
        match self {
            Section::Commits => "commit(s)",
            Section::Refs => "ref branch(es)",
            Section::Merges => "merged branch(es)",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of the decorated log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub hash: CommitId,
    pub parents: Vec<CommitId>,
    pub decoration: Option<String>,
}

impl LogRecord {
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// A commit with more than one parent; `parents[0]` is the first parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCommit {
    pub hash: CommitId,
    pub parents: Vec<CommitId>,
}

impl MergeCommit {
    /// Parents that were merged in
    pub fn merged_parents(&self) -> &[CommitId] {
        self.parents.get(1..).unwrap_or_default()
    }
}

/// One line of the ref enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefEntry {
    pub hash: CommitId,
    pub name: String,
}

impl RefEntry {
    pub fn is_tag(&self) -> bool {
        self.name.to_ascii_lowercase().starts_with("refs/tags")
    }
}

/// Parsed decorated log: `<hash>|<parents>|<decoration>` per line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitLog {
    pub records: Vec<LogRecord>,
}

impl CommitLog {
    pub fn parse(text: &str) -> Result<Self> {
        let mut records = Vec::new();
        for (line_no, line) in lines(text) {
            let fields = split_fields(Section::Commits, line_no, line, 3)?;
            let decoration = fields[2].trim();
            records.push(LogRecord {
                hash: fields[0].to_string(),
                parents: split_parents(fields[1]),
                decoration: (!decoration.is_empty()).then(|| decoration.to_string()),
            });
        }

        if records.is_empty() {
            info!("decorated log is empty");
        }
        Ok(Self { records })
    }

    /// Decoration per decorated commit; the last line for a commit wins
    pub fn decorations(&self) -> DecorationMap {
        let mut map = DecorationMap::new();
        for record in &self.records {
            if let Some(label) = &record.decoration {
                if let Some(previous) = map.insert(record.hash.clone(), label) {
                    debug!(commit = %record.hash, %previous, "decoration replaced");
                }
            }
        }
        map
    }

    pub fn merges(&self) -> Vec<MergeCommit> {
        self.records
            .iter()
            .filter(|record| record.is_merge())
            .map(|record| MergeCommit {
                hash: record.hash.clone(),
                parents: record.parents.clone(),
            })
            .collect()
    }
}

/// Shorthand for `CommitLog::parse(text)?.decorations()`
pub fn parse_decorations(text: &str) -> Result<DecorationMap> {
    Ok(CommitLog::parse(text)?.decorations())
}

/// Parse the merge log (`<hash>|<parents>`), keeping commits with two or
/// more parents
pub fn parse_merge_log(text: &str) -> Result<Vec<MergeCommit>> {
    let mut merges = Vec::new();
    for (line_no, line) in lines(text) {
        let fields = split_fields(Section::Merges, line_no, line, 2)?;
        let parents = split_parents(fields[1]);
        if parents.len() > 1 {
            merges.push(MergeCommit {
                hash: fields[0].to_string(),
                parents,
            });
        }
    }
    Ok(merges)
}

/// Parse the ref enumeration (`<hash>|<refname>`)
pub fn parse_ref_list(text: &str) -> Result<Vec<RefEntry>> {
    lines(text)
        .map(|(line_no, line)| -> Result<RefEntry> {
            let fields = split_fields(Section::Refs, line_no, line, 2)?;
            Ok(RefEntry {
                hash: fields[0].to_string(),
                name: fields[1].trim().to_string(),
            })
        })
        .collect()
}

/// One hash per line, order preserved
pub fn parse_hash_list(text: &str) -> Vec<CommitId> {
    lines(text)
        .map(|(_, line)| line.trim().to_string())
        .collect()
}

/// Non-blank lines with their 1-based line numbers, `\r` stripped
fn lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split('\n')
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
}

/// Split on `|` into exactly `expected` fields; the last field keeps any
/// further delimiters
fn split_fields(section: Section, line_no: usize, line: &str, expected: usize) -> Result<Vec<&str>> {
    let mut fields: Vec<&str> = line.splitn(expected, '|').collect();
    let malformed = |reason: String| GraphError::MalformedRecord {
        section,
        line: line_no,
        content: line.to_string(),
        reason,
    };

    if fields.len() < expected {
        return Err(malformed(format!(
            "expected {expected} '|'-separated fields, found {}",
            fields.len()
        )));
    }
    if fields[0].trim().is_empty() {
        return Err(malformed("missing commit hash".to_string()));
    }

    fields[0] = fields[0].trim();
    Ok(fields)
}

fn split_parents(field: &str) -> Vec<CommitId> {
    field.split_whitespace().map(str::to_string).collect()
}
