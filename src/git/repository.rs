use crate::error::{ReleaseError, Result};
use git2::{
    Cred, CredentialType, ObjectType, PushOptions, RemoteCallbacks, Repository as Git2Repo,
    ResetType, Status, StatusOptions,
};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Root of the working tree; release scripts run from here
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| ReleaseError::precondition("repository has no working tree"))
    }

    fn statuses_matching(&self, mask: Status) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(false)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses.iter().any(|entry| entry.status().intersects(mask)))
    }
}

/// Credentials for pushing over SSH: key files first, then the agent.
fn remote_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        Cred::default()
    });

    callbacks.push_update_reference(|refname, status| match status {
        Some(message) => Err(git2::Error::from_str(&format!(
            "remote rejected {}: {}",
            refname, message
        ))),
        None => Ok(()),
    });

    callbacks
}

impl super::Repository for Git2Repository {
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(Some(pattern))?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn has_unstaged_changes(&self) -> Result<bool> {
        self.statuses_matching(
            Status::WT_MODIFIED | Status::WT_DELETED | Status::WT_TYPECHANGE | Status::WT_RENAMED,
        )
    }

    fn has_staged_changes(&self) -> Result<bool> {
        self.statuses_matching(
            Status::INDEX_NEW
                | Status::INDEX_MODIFIED
                | Status::INDEX_DELETED
                | Status::INDEX_RENAMED
                | Status::INDEX_TYPECHANGE,
        )
    }

    fn commit_all(&self, message: &str) -> Result<String> {
        let mut index = self.repo.index()?;
        index.update_all(["*"], None)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let parent = self.repo.head()?.peel_to_commit()?;
        let signature = self.repo.signature()?;

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        Ok(oid.to_string())
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        let target = self.repo.head()?.peel(ObjectType::Commit)?;
        let tagger = self.repo.signature()?;

        self.repo.tag(name, &target, &tagger, message, false)?;

        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.repo.tag_delete(name)?;
        Ok(())
    }

    fn reset_hard_to_parent(&self) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        let parent = head.parent(0)?;

        self.repo.reset(parent.as_object(), ResetType::Hard, None)?;

        Ok(())
    }

    fn push(&self, remote: &str, branch: &str, tags: &[&str]) -> Result<()> {
        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let mut refspecs = vec![format!("refs/heads/{}:refs/heads/{}", branch, branch)];
        refspecs.extend(
            tags.iter()
                .map(|tag| format!("refs/tags/{}:refs/tags/{}", tag, tag)),
        );
        let refspec_strs: Vec<&str> = refspecs.iter().map(|s| s.as_str()).collect();

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(remote_callbacks());

        remote_handle
            .push(&refspec_strs, Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    ReleaseError::remote(format!("Network error pushing to '{}': {}", remote, e))
                } else {
                    ReleaseError::remote(format!("Push to '{}' failed: {}", remote, e))
                }
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use std::fs;
    use tempfile::TempDir;

    fn setup_repo() -> (TempDir, Git2Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Release Tester").unwrap();
            config.set_str("user.email", "release@example.com").unwrap();
        }

        fs::write(dir.path().join("README.md"), "tint2 0.14.6\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("README.md")).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = repo.signature().unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap();
        drop(tree);

        (dir, Git2Repository::from_git2(repo))
    }

    #[test]
    fn test_clean_repository() {
        let (_dir, repo) = setup_repo();
        assert!(!repo.has_unstaged_changes().unwrap());
        assert!(!repo.has_staged_changes().unwrap());
    }

    #[test]
    fn test_untracked_files_do_not_dirty_the_tree() {
        let (dir, repo) = setup_repo();
        fs::write(dir.path().join("scratch.txt"), "notes").unwrap();
        assert!(!repo.has_unstaged_changes().unwrap());
    }

    #[test]
    fn test_modified_file_is_unstaged_change() {
        let (dir, repo) = setup_repo();
        fs::write(dir.path().join("README.md"), "tint2 0.14.7\n").unwrap();
        assert!(repo.has_unstaged_changes().unwrap());
        assert!(!repo.has_staged_changes().unwrap());
    }

    #[test]
    fn test_commit_tag_and_rollback() {
        let (dir, repo) = setup_repo();
        fs::write(dir.path().join("README.md"), "tint2 0.14.7\n").unwrap();

        let hash = repo.commit_all("Release 0.14.7").unwrap();
        assert_eq!(hash.len(), 40);
        assert!(!repo.has_unstaged_changes().unwrap());

        repo.create_annotated_tag("v0.14.7", "version 0.14.7").unwrap();
        repo.create_annotated_tag("0.14.7", "version 0.14.7").unwrap();
        let mut tags = repo.list_tags("v*").unwrap();
        tags.sort();
        assert_eq!(tags, vec!["v0.14.7"]);

        repo.reset_hard_to_parent().unwrap();
        repo.delete_tag("v0.14.7").unwrap();
        repo.delete_tag("0.14.7").unwrap();

        assert!(repo.list_tags("*").unwrap().is_empty());
        assert_eq!(
            fs::read_to_string(dir.path().join("README.md")).unwrap(),
            "tint2 0.14.6\n"
        );
    }

    #[test]
    fn test_duplicate_tag_is_rejected() {
        let (_dir, repo) = setup_repo();
        repo.create_annotated_tag("v1.0", "version 1.0").unwrap();
        assert!(repo.create_annotated_tag("v1.0", "version 1.0").is_err());
    }

    #[test]
    fn test_push_to_unknown_remote() {
        let (_dir, repo) = setup_repo();
        let err = repo.push("origin-github", "master", &["v1.0"]).unwrap_err();
        assert!(err.to_string().contains("Cannot find remote"));
    }

    #[test]
    fn test_workdir() {
        let (dir, repo) = setup_repo();
        let workdir = repo.workdir().unwrap().canonicalize().unwrap();
        assert_eq!(workdir, dir.path().canonicalize().unwrap());
    }
}
