use crate::domain::CommitIdentity;
use git2::{Oid, Repository};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Represents errors that can occur while resolving the current commit.
#[derive(Debug, Error)]
pub enum CommitResolutionError {
    #[error("Error getting git commit hash: {0}")]
    Hash(#[source] git2::Error),
    #[error("Error getting subject of commit {hash}: {reason}")]
    Subject { hash: String, reason: String },
}

/// Source of the commit identity that downstream builds are pinned to.
#[cfg_attr(test, mockall::automock)]
pub trait CommitSource {
    fn resolve_commit_identity(&self) -> Result<CommitIdentity, CommitResolutionError>;
}

/// Reads HEAD of a local working copy through libgit2.
#[derive(Debug, Clone)]
pub struct GitCommitSource {
    path: PathBuf,
}

impl GitCommitSource {
    /// `path` may point anywhere inside the working copy; the repository is
    /// discovered by walking up from it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn head_hash(&self, repo: &Repository) -> Result<String, git2::Error> {
        let head = repo.head()?;
        let commit = head.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    fn subject_of(&self, repo: &Repository, hash: &str) -> Result<String, CommitResolutionError> {
        let subject_error = |reason: String| CommitResolutionError::Subject {
            hash: hash.to_string(),
            reason,
        };

        let oid = Oid::from_str(hash).map_err(|e| subject_error(e.message().to_string()))?;
        let commit = repo
            .find_commit(oid)
            .map_err(|e| subject_error(e.message().to_string()))?;

        commit
            .summary()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| subject_error("commit message is not valid UTF-8".to_string()))
    }
}

impl CommitSource for GitCommitSource {
    fn resolve_commit_identity(&self) -> Result<CommitIdentity, CommitResolutionError> {
        info!("Fetching Git commit hash...");

        let repo = Repository::discover(&self.path).map_err(CommitResolutionError::Hash)?;
        let hash = self.head_hash(&repo).map_err(CommitResolutionError::Hash)?;
        let subject = self.subject_of(&repo, &hash)?;

        info!("Resolved commit {} \"{}\"", hash, subject);
        CommitIdentity::new(hash.clone(), subject)
            .map_err(|reason| CommitResolutionError::Subject { hash, reason })
    }
}
