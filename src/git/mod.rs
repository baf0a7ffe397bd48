//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the Git operations a
//! release needs, allowing the workflow to run against a real repository or
//! an in-memory mock in tests.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! The workflow depends on the [Repository] trait only.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Git operations used by the release workflow
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to [crate::error::ReleaseError].
pub trait Repository {
    /// List tag names matching a glob pattern (e.g., `"v*"`)
    ///
    /// Order is unspecified; callers sort.
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>>;

    /// Whether tracked files in the working tree differ from the index
    ///
    /// Untracked files and submodules are ignored.
    fn has_unstaged_changes(&self) -> Result<bool>;

    /// Whether the index differs from HEAD
    fn has_staged_changes(&self) -> Result<bool>;

    /// Stage every modified or deleted tracked file and commit on HEAD
    ///
    /// # Returns
    /// * `Ok(String)` - Hash of the new commit
    fn commit_all(&self, message: &str) -> Result<String>;

    /// Create an annotated tag on HEAD
    ///
    /// # Returns
    /// * `Err` - If the tag already exists or HEAD cannot be resolved
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Delete a local tag
    fn delete_tag(&self, name: &str) -> Result<()>;

    /// Move HEAD, index and working tree to the first parent of HEAD
    fn reset_hard_to_parent(&self) -> Result<()>;

    /// Push `branch` and the named tags to `remote`
    ///
    /// # Arguments
    /// * `remote` - Name of the remote (e.g., "origin-github")
    /// * `branch` - Local branch pushed to the same name on the remote
    /// * `tags` - Tag names pushed alongside the branch
    fn push(&self, remote: &str, branch: &str, tags: &[&str]) -> Result<()>;
}
