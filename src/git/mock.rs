use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use std::cell::RefCell;

/// Record of one push made through the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRecord {
    pub remote: String,
    pub branch: String,
    pub tags: Vec<String>,
}

#[derive(Default)]
struct MockState {
    tags: Vec<String>,
    commits: Vec<String>,
    pushes: Vec<PushRecord>,
    resets: usize,
}

/// Mock repository for testing without actual git operations
#[derive(Default)]
pub struct MockRepository {
    state: RefCell<MockState>,
    unstaged: bool,
    staged: bool,
    failing_remotes: Vec<String>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock repository that already carries `tags`
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let repo = Self::new();
        repo.state.borrow_mut().tags = tags.into_iter().map(Into::into).collect();
        repo
    }

    /// Pretend tracked files were modified but not staged
    pub fn set_unstaged_changes(&mut self, dirty: bool) {
        self.unstaged = dirty;
    }

    /// Pretend the index differs from HEAD
    pub fn set_staged_changes(&mut self, dirty: bool) {
        self.staged = dirty;
    }

    /// Make pushes to `remote` fail
    pub fn fail_pushes_to(&mut self, remote: impl Into<String>) {
        self.failing_remotes.push(remote.into());
    }

    /// Current tag names in creation order
    pub fn tags(&self) -> Vec<String> {
        self.state.borrow().tags.clone()
    }

    /// Commit messages still reachable from HEAD, oldest first
    pub fn commits(&self) -> Vec<String> {
        self.state.borrow().commits.clone()
    }

    pub fn pushes(&self) -> Vec<PushRecord> {
        self.state.borrow().pushes.clone()
    }

    /// Number of hard resets performed
    pub fn resets(&self) -> usize {
        self.state.borrow().resets
    }
}

/// Minimal glob support: a trailing `*` matches any suffix
fn glob_matches(pattern: &str, name: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => name.starts_with(prefix),
        None => name == pattern,
    }
}

impl Repository for MockRepository {
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>> {
        Ok(self
            .state
            .borrow()
            .tags
            .iter()
            .filter(|tag| glob_matches(pattern, tag))
            .cloned()
            .collect())
    }

    fn has_unstaged_changes(&self) -> Result<bool> {
        Ok(self.unstaged)
    }

    fn has_staged_changes(&self) -> Result<bool> {
        Ok(self.staged)
    }

    fn commit_all(&self, message: &str) -> Result<String> {
        let mut state = self.state.borrow_mut();
        state.commits.push(message.to_string());
        Ok(format!("{:040x}", state.commits.len()))
    }

    fn create_annotated_tag(&self, name: &str, _message: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.tags.iter().any(|tag| tag == name) {
            return Err(ReleaseError::Git(git2::Error::from_str(&format!(
                "tag '{}' already exists",
                name
            ))));
        }
        state.tags.push(name.to_string());
        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let before = state.tags.len();
        state.tags.retain(|tag| tag != name);
        if state.tags.len() == before {
            return Err(ReleaseError::Git(git2::Error::from_str(&format!(
                "tag '{}' not found",
                name
            ))));
        }
        Ok(())
    }

    fn reset_hard_to_parent(&self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.commits.pop();
        state.resets += 1;
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str, tags: &[&str]) -> Result<()> {
        if self.failing_remotes.iter().any(|r| r == remote) {
            return Err(ReleaseError::remote(format!("Push to '{}' failed", remote)));
        }
        self.state.borrow_mut().pushes.push(PushRecord {
            remote: remote.to_string(),
            branch: branch.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_list_tags_with_glob() {
        let repo = MockRepository::with_tags(["v1.0", "1.0", "v2.0"]);

        let tags = repo.list_tags("v*").unwrap();
        assert_eq!(tags, vec!["v1.0", "v2.0"]);
        assert_eq!(repo.list_tags("*").unwrap().len(), 3);
    }

    #[test]
    fn test_mock_repository_tag_lifecycle() {
        let repo = MockRepository::new();
        repo.create_annotated_tag("v1.0", "version 1.0").unwrap();
        assert!(repo.create_annotated_tag("v1.0", "version 1.0").is_err());

        repo.delete_tag("v1.0").unwrap();
        assert!(repo.delete_tag("v1.0").is_err());
        assert!(repo.tags().is_empty());
    }

    #[test]
    fn test_mock_repository_commit_and_reset() {
        let repo = MockRepository::new();
        repo.commit_all("Release 1.0").unwrap();
        assert_eq!(repo.commits(), vec!["Release 1.0"]);

        repo.reset_hard_to_parent().unwrap();
        assert!(repo.commits().is_empty());
        assert_eq!(repo.resets(), 1);
    }

    #[test]
    fn test_mock_repository_push_records() {
        let mut repo = MockRepository::new();
        repo.fail_pushes_to("broken");

        repo.push("origin", "master", &["v1.0", "1.0"]).unwrap();
        assert!(repo.push("broken", "master", &[]).is_err());

        assert_eq!(
            repo.pushes(),
            vec![PushRecord {
                remote: "origin".to_string(),
                branch: "master".to_string(),
                tags: vec!["v1.0".to_string(), "1.0".to_string()],
            }]
        );
    }

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert!(repo.list_tags("v*").unwrap().is_empty());
        assert!(!repo.has_unstaged_changes().unwrap());
    }
}
