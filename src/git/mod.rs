//! Git integration layer for Huskier
//!
//! Locates the repository with git2 and manages the hook scripts that call
//! back into `huskier run`.

use anyhow::{Context, Result};
use git2::Repository;
use std::path::{Path, PathBuf};

/// Marker line identifying scripts written by Huskier
pub const HOOK_MARKER: &str = "# installed by huskier";

/// Script body for a hook that runs the configured command list
pub fn hook_script(hook_name: &str) -> String {
    let invocation = if hook_name == crate::config::PRE_COMMIT {
        "huskier run --staged".to_string()
    } else {
        format!("huskier run {hook_name}")
    };

    format!("#!/bin/sh\n{HOOK_MARKER}\nexec {invocation} \"$@\"\n")
}

/// Git operations handler
pub struct GitOperations {
    repo: Repository,
}

impl GitOperations {
    /// Open a Git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open Git repository")?;

        Ok(Self { repo })
    }

    /// Discover a Git repository from the current directory upwards
    pub fn discover() -> Result<Self> {
        Self::discover_from(".")
    }

    pub fn discover_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path).context("No Git repository found")?;

        Ok(Self { repo })
    }

    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    pub fn hook_path(&self, hook_name: &str) -> PathBuf {
        self.repo.path().join("hooks").join(hook_name)
    }

    /// Write an executable hook script
    pub fn install_hook(&self, hook_name: &str, hook_content: &str) -> Result<()> {
        let hook_path = self.hook_path(hook_name);
        let hooks_dir = self.repo.path().join("hooks");

        std::fs::create_dir_all(&hooks_dir).context("Failed to create hooks directory")?;
        std::fs::write(&hook_path, hook_content).context("Failed to write hook file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&hook_path)
                .context("Failed to get hook file metadata")?
                .permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&hook_path, perms)
                .context("Failed to set hook file permissions")?;
        }

        tracing::debug!("installed hook {}", hook_path.display());
        Ok(())
    }

    pub fn remove_hook(&self, hook_name: &str) -> Result<()> {
        let hook_path = self.hook_path(hook_name);

        if hook_path.exists() {
            std::fs::remove_file(&hook_path).context("Failed to remove hook file")?;
        }

        Ok(())
    }

    pub fn hook_exists(&self, hook_name: &str) -> bool {
        self.hook_path(hook_name).exists()
    }

    /// Whether an existing hook script was written by Huskier
    pub fn is_managed_hook(&self, hook_name: &str) -> bool {
        std::fs::read_to_string(self.hook_path(hook_name))
            .map(|content| content.contains(HOOK_MARKER))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_pre_commit_script_runs_staged() {
        let script = hook_script("pre-commit");

        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains(HOOK_MARKER));
        assert!(script.contains("huskier run --staged"));
        assert!(hook_script("pre-push").contains("huskier run pre-push"));
    }

    #[test]
    fn test_install_and_remove_hook() {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();
        let git = GitOperations::open(dir.path()).unwrap();

        git.install_hook("pre-commit", &hook_script("pre-commit")).unwrap();
        assert!(git.hook_exists("pre-commit"));
        assert!(git.is_managed_hook("pre-commit"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(git.hook_path("pre-commit"))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o111, 0o111);
        }

        git.remove_hook("pre-commit").unwrap();
        assert!(!git.hook_exists("pre-commit"));
    }

    #[test]
    fn test_foreign_hook_is_not_managed() {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();
        let git = GitOperations::open(dir.path()).unwrap();

        git.install_hook("pre-commit", "#!/bin/sh\necho custom\n").unwrap();
        assert!(!git.is_managed_hook("pre-commit"));
    }
}
