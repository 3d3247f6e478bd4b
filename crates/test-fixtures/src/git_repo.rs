//! Throwaway git repositories with commits at chosen times.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use chrono::{DateTime, Utc};
use tempfile::TempDir;

/// A `git init`ed temp directory. Dropped with the value.
pub struct GitRepo {
    dir: TempDir,
}

impl GitRepo {
    /// `None` when no usable `git` binary is on the path.
    pub fn init() -> Option<Self> {
        let dir = tempfile::tempdir().ok()?;
        let repo = Self { dir };
        repo.git(&["init", "--quiet"], None).then_some(repo)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `relative` and commit it, authored and committed at `at`.
    pub fn commit_file(&self, relative: &str, contents: &str, at: DateTime<Utc>) -> PathBuf {
        let file = self.path().join(relative);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&file, contents).expect("write tracked file");
        assert!(self.git(&["add", "--", relative], None), "git add {relative}");
        assert!(
            self.git(&["commit", "--quiet", "-m", relative], Some(at)),
            "git commit {relative}"
        );
        file
    }

    fn git(&self, args: &[&str], at: Option<DateTime<Utc>>) -> bool {
        let mut cmd = Command::new("git");
        cmd.current_dir(self.path())
            .args(["-c", "user.name=Aurora Tests", "-c", "user.email=tests@aurora.invalid"])
            .args(["-c", "commit.gpgsign=false"])
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(at) = at {
            let stamp = format!("{} +0000", at.timestamp());
            cmd.env("GIT_AUTHOR_DATE", &stamp).env("GIT_COMMITTER_DATE", &stamp);
        }
        cmd.status().map(|s| s.success()).unwrap_or(false)
    }
}
