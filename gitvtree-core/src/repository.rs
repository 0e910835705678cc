use std::path::{Path, PathBuf};

use git2::Repository as Git2Repository;
use tracing::debug;

use crate::error::{CoreError, Result};

/// A repository located on disk, identified by its git directory and name
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
    git_dir: PathBuf,
    name: String,
}

impl Repository {
    /// Open an existing repository (working tree or bare)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let git_repo = Git2Repository::open(&path).map_err(|source| CoreError::Repository {
            path: path.clone(),
            source,
        })?;

        let git_dir = git_repo.path().to_path_buf();
        let name = match git_repo.workdir() {
            Some(workdir) => dir_name(workdir),
            None => dir_name(&git_dir).trim_end_matches(".git").to_string(),
        };
        let name = if name.is_empty() {
            "repository".to_string()
        } else {
            name
        };

        debug!(path = %path.display(), git_dir = %git_dir.display(), %name, "opened repository");

        Ok(Repository {
            path,
            git_dir,
            name,
        })
    }

    /// Path the repository was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `.git` directory (or the bare repository itself)
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Name used to title the graph and the output files
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
