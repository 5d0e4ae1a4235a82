//! Shared fixtures for integration tests: throwaway repositories with an
//! initial commit on `main`, plus bare remotes.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use gitgum::engine::Context;
use gitgum::git::Git;

/// A real git repository in a temporary directory.
pub struct TestRepo {
    dir: TempDir,
    /// Bare remotes and extra worktrees, kept alive with the repo
    extra: Vec<TempDir>,
}

impl TestRepo {
    /// Create a repository with one commit on `main`.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init", "-b", "main"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);
        run_git(dir.path(), &["config", "commit.gpgsign", "false"]);
        run_git(dir.path(), &["config", "core.editor", "true"]);

        std::fs::write(dir.path().join("README.md"), "# Test Repo\n").unwrap();
        run_git(dir.path(), &["add", "README.md"]);
        run_git(dir.path(), &["commit", "-m", "Initial commit"]);

        Self {
            dir,
            extra: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn git(&self) -> Git {
        Git::new(self.path())
    }

    /// A quiet context rooted at the repository.
    pub fn context(&self) -> Context {
        Context {
            cwd: Some(self.path().to_path_buf()),
            quiet: true,
            ..Context::default()
        }
    }

    /// Run git in the repository and return trimmed stdout.
    pub fn run(&self, args: &[&str]) -> String {
        run_git(self.path(), args)
    }

    /// Write `content` to `filename` without staging it.
    pub fn write(&self, filename: &str, content: &str) {
        let path = self.path().join(filename);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn read(&self, filename: &str) -> String {
        std::fs::read_to_string(self.path().join(filename)).unwrap()
    }

    pub fn exists(&self, filename: &str) -> bool {
        self.path().join(filename).exists()
    }

    /// Create a file and commit it; returns the new commit id.
    pub fn commit(&self, filename: &str, content: &str, message: &str) -> String {
        self.write(filename, content);
        self.run(&["add", filename]);
        self.run(&["commit", "-m", message]);
        self.rev("HEAD")
    }

    pub fn create_branch(&self, name: &str) {
        self.run(&["branch", name]);
    }

    pub fn checkout(&self, name: &str) {
        self.run(&["checkout", "--quiet", name]);
    }

    pub fn head_branch(&self) -> String {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    pub fn rev(&self, reference: &str) -> String {
        self.run(&["rev-parse", reference])
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", &format!("refs/heads/{}", name)])
            .current_dir(self.path())
            .status()
            .expect("git failed to start")
            .success()
    }

    /// Upstream short name of `branch`, empty when none.
    pub fn upstream(&self, branch: &str) -> String {
        self.run(&[
            "for-each-ref",
            "--format=%(upstream:short)",
            &format!("refs/heads/{}", branch),
        ])
    }

    /// Add a bare remote called `name`, push `main` to it and fetch.
    pub fn add_remote(&mut self, name: &str) -> PathBuf {
        let bare = TempDir::new().expect("failed to create temp dir");
        run_git(bare.path(), &["init", "--bare", "-b", "main"]);
        let path = bare.path().to_path_buf();
        self.extra.push(bare);

        self.run(&["remote", "add", name, path.to_str().unwrap()]);
        self.run(&["push", "--quiet", name, "main"]);
        self.run(&["fetch", "--quiet", name]);
        path
    }

    /// Add a worktree with a new branch `branch` outside the repository.
    pub fn add_worktree(&mut self, branch: &str) -> PathBuf {
        let holder = TempDir::new().expect("failed to create temp dir");
        let path = holder.path().join("wt");
        self.run(&["worktree", "add", "--quiet", "-b", branch, path.to_str().unwrap()]);
        self.extra.push(holder);
        path
    }
}

/// Run a git command in `dir`, panicking on failure; returns trimmed stdout.
pub fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed to start");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
