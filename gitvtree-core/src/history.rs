use std::path::{Path, PathBuf};

use crate::config::Cutoff;
use crate::exec::CommandRunner;

/// Raw, line-oriented history dumps. Every method returns the complete
/// output of one query, or empty text when the query produced nothing.
pub trait HistorySource {
    /// `<hash>|<parents>|<decoration>` per commit, all refs, since the cutoff
    fn decorated_log(&self) -> String;

    /// `<hash>|<refname>` per ref
    fn refs(&self) -> String;

    /// `<hash>|<parents>` per merge commit since the cutoff
    fn merges(&self) -> String;

    /// First-parent history of `rev`, one hash per line, oldest first
    fn first_parent_chain(&self, rev: &str) -> String;
}

/// History queries answered by the git command line
pub struct GitHistory<R> {
    runner: R,
    git: String,
    git_dir: PathBuf,
    cutoff: Cutoff,
}

impl<R: CommandRunner> GitHistory<R> {
    pub fn new(runner: R, git: impl Into<String>, git_dir: impl AsRef<Path>, cutoff: Cutoff) -> Self {
        Self {
            runner,
            git: git.into(),
            git_dir: git_dir.as_ref().to_path_buf(),
            cutoff,
        }
    }

    fn query(&self, args: &[&str]) -> String {
        let mut full = vec![
            "--git-dir".to_string(),
            self.git_dir.to_string_lossy().into_owned(),
        ];
        full.extend(args.iter().map(|a| a.to_string()));
        self.runner.execute(&self.git, &full)
    }
}

impl<R: CommandRunner> HistorySource for GitHistory<R> {
    fn decorated_log(&self) -> String {
        let since = self.cutoff.to_string();
        self.query(&["log", "--all", "--since", &since, "--pretty=format:%h|%p|%d"])
    }

    fn refs(&self) -> String {
        self.query(&["for-each-ref", "--format=%(objectname:short)|%(refname)"])
    }

    fn merges(&self) -> String {
        let since = self.cutoff.to_string();
        self.query(&["log", "--all", "--merges", "--since", &since, "--pretty=format:%h|%p"])
    }

    fn first_parent_chain(&self, rev: &str) -> String {
        let since = self.cutoff.to_string();
        self.query(&[
            "log",
            "--reverse",
            "--first-parent",
            "--since",
            &since,
            "--pretty=format:%h",
            rev,
        ])
    }
}
