use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::{CoreError, Result};

const CUTOFF_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// History before this instant is excluded from every query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff(NaiveDateTime);

impl Cutoff {
    /// Accepts `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD` (midnight)
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if let Ok(at) = NaiveDateTime::parse_from_str(text, CUTOFF_FORMAT) {
            return Ok(Cutoff(at));
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Cutoff)
            .ok_or_else(|| CoreError::InvalidCutoff(text.to_string()))
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CUTOFF_FORMAT))
    }
}

/// User settings: executables, cutoff and output location
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// git executable
    pub git: String,
    /// graphviz `dot` executable
    pub dot: String,
    /// Cutoff timestamp, see [`Cutoff::parse`]
    pub since: String,
    pub output_dir: PathBuf,
    /// Passed to the renderer as `-Gsize=<page_size>` for the PDF output
    pub page_size: String,
    /// Invoke the renderer after writing the graph description
    pub render: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
            dot: "dot".to_string(),
            since: "2016-04-20 00:00:00".to_string(),
            output_dir: PathBuf::from("."),
            page_size: "10,10".to_string(),
            render: true,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file; missing keys keep their defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        Self::from_toml(&content).map_err(|source| CoreError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn cutoff(&self) -> Result<Cutoff> {
        Cutoff::parse(&self.since)
    }

    pub fn output_paths(&self, repository_name: &str) -> OutputPaths {
        OutputPaths::new(&self.output_dir, repository_name)
    }
}

/// Files produced by one run, all named after the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub dot: PathBuf,
    pub pdf: PathBuf,
    pub ps: PathBuf,
    pub log: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: &Path, repository_name: &str) -> Self {
        Self {
            dot: dir.join(format!("{repository_name}.dot")),
            pdf: dir.join(format!("{repository_name}.pdf")),
            ps: dir.join(format!("{repository_name}.ps")),
            log: dir.join(format!("{repository_name}.log")),
        }
    }
}
