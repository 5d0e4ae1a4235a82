//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`BranchRef`] - A switchable branch with its classification
//! - [`SelectionItem`] - The `tag: payload` line shown in the branch picker
//! - [`Upstream`] - A `<remote>/<branch>` upstream short name
//! - [`CommitId`] - Opaque commit identifier, compared only for equality
//! - [`Remote`] - A remote name and URL
//! - [`FileStatus`] - Status of a single path from porcelain output
//!
//! # Examples
//!
//! ```
//! use gitgum::core::types::{SelectionItem, SelectionTag};
//!
//! let item: SelectionItem = "remote: origin/topic".parse().unwrap();
//! assert_eq!(item.tag(), SelectionTag::Remote);
//! assert_eq!(item.to_string(), "remote: origin/topic");
//!
//! let branch = item.branch_ref().unwrap();
//! assert_eq!(branch.name(), "topic");
//! assert_eq!(branch.remote(), Some("origin"));
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors from type parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("unknown branch type: {0}")]
    UnknownTag(String),

    #[error("invalid remote branch format: {0}")]
    InvalidRemoteBranch(String),

    #[error("unexpected upstream format: {0}")]
    InvalidUpstream(String),

    #[error("invalid PR selection format: {0}")]
    InvalidPrSelection(String),
}

/// Classification of a switchable branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchKind {
    /// Local branch without an upstream.
    LocalOnly,
    /// Local branch that tracks some remote.
    LocalTrackingRemote,
    /// Branch that only exists as `<remote>/<name>`.
    RemoteOnly,
}

/// A branch reference.
///
/// Remote-only names never carry the `<remote>/` prefix; the owning remote
/// is stored separately.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchRef {
    name: String,
    kind: BranchKind,
    remote: Option<String>,
}

impl BranchRef {
    /// A local branch, tracking or not.
    pub fn local(name: impl Into<String>, tracking: bool) -> Self {
        Self {
            name: name.into(),
            kind: if tracking {
                BranchKind::LocalTrackingRemote
            } else {
                BranchKind::LocalOnly
            },
            remote: None,
        }
    }

    /// A remote-only branch. `name` must not include the remote prefix.
    pub fn remote_only(remote: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: BranchKind::RemoteOnly,
            remote: Some(remote.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> BranchKind {
        self.kind
    }

    pub fn remote(&self) -> Option<&str> {
        self.remote.as_deref()
    }

    /// `<remote>/<name>` for remote-only branches.
    pub fn remote_ref(&self) -> Option<String> {
        self.remote
            .as_ref()
            .map(|remote| format!("{}/{}", remote, self.name))
    }

    /// The picker line for this branch.
    pub fn selection_item(&self) -> SelectionItem {
        match self.kind {
            BranchKind::LocalOnly => SelectionItem::new(SelectionTag::Local, self.name.clone()),
            BranchKind::LocalTrackingRemote => {
                SelectionItem::new(SelectionTag::LocalRemote, self.name.clone())
            }
            BranchKind::RemoteOnly => SelectionItem::new(
                SelectionTag::Remote,
                self.remote_ref().unwrap_or_else(|| self.name.clone()),
            ),
        }
    }
}

/// The type tag in front of a picker line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionTag {
    Local,
    LocalRemote,
    Remote,
}

impl SelectionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionTag::Local => "local",
            SelectionTag::LocalRemote => "local/remote",
            SelectionTag::Remote => "remote",
        }
    }
}

impl fmt::Display for SelectionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionTag {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(SelectionTag::Local),
            "local/remote" => Ok(SelectionTag::LocalRemote),
            "remote" => Ok(SelectionTag::Remote),
            other => Err(TypeError::UnknownTag(other.to_string())),
        }
    }
}

/// A picker line: `(tag, payload)` rendered as `<tag>: <payload>`.
///
/// For [`SelectionTag::Remote`] the payload is `<remote>/<branch>`; for the
/// local tags it is the plain branch name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionItem {
    tag: SelectionTag,
    payload: String,
}

impl SelectionItem {
    pub fn new(tag: SelectionTag, payload: impl Into<String>) -> Self {
        Self {
            tag,
            payload: payload.into(),
        }
    }

    pub fn tag(&self) -> SelectionTag {
        self.tag
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Resolve the payload into a [`BranchRef`].
    ///
    /// Remote payloads are split on the first `/`.
    pub fn branch_ref(&self) -> Result<BranchRef, TypeError> {
        match self.tag {
            SelectionTag::Local => Ok(BranchRef::local(&self.payload, false)),
            SelectionTag::LocalRemote => Ok(BranchRef::local(&self.payload, true)),
            SelectionTag::Remote => match self.payload.split_once('/') {
                Some((remote, branch)) if !remote.is_empty() && !branch.is_empty() => {
                    Ok(BranchRef::remote_only(remote, branch))
                }
                _ => Err(TypeError::InvalidRemoteBranch(self.payload.clone())),
            },
        }
    }
}

impl fmt::Display for SelectionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tag, self.payload)
    }
}

impl FromStr for SelectionItem {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, payload) = s
            .split_once(": ")
            .ok_or_else(|| TypeError::InvalidSelection(s.to_string()))?;
        if payload.is_empty() {
            return Err(TypeError::InvalidSelection(s.to_string()));
        }
        Ok(Self::new(tag.parse()?, payload))
    }
}

/// An upstream short name, `<remote>/<branch>`.
///
/// Parsing splits on the first `/`, so a remote whose own name contains `/`
/// is misattributed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Upstream {
    pub remote: String,
    pub branch: String,
}

impl Upstream {
    pub fn parse(short: &str) -> Result<Self, TypeError> {
        match short.split_once('/') {
            Some((remote, branch)) if !remote.is_empty() && !branch.is_empty() => Ok(Self {
                remote: remote.to_string(),
                branch: branch.to_string(),
            }),
            _ => Err(TypeError::InvalidUpstream(short.to_string())),
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.remote, self.branch)
    }
}

/// A commit identifier as printed by git.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A configured remote.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

impl fmt::Display for Remote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.url)
    }
}

/// Status of a single path, derived from a `git status --porcelain` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileStatus {
    Untracked,
    Modified,
    Staged,
    Deleted,
    Unknown,
}

impl FileStatus {
    /// Classify a porcelain line by its two-character prefix.
    ///
    /// # Example
    ///
    /// ```
    /// use gitgum::core::types::FileStatus;
    ///
    /// assert_eq!(FileStatus::from_porcelain("?? new.txt"), FileStatus::Untracked);
    /// assert_eq!(FileStatus::from_porcelain("M  staged.txt"), FileStatus::Staged);
    /// assert_eq!(FileStatus::from_porcelain("D  gone.txt"), FileStatus::Deleted);
    /// assert_eq!(FileStatus::from_porcelain(" M edited.txt"), FileStatus::Modified);
    /// assert_eq!(FileStatus::from_porcelain(""), FileStatus::Unknown);
    /// ```
    pub fn from_porcelain(line: &str) -> Self {
        let mut chars = line.chars();
        let (Some(index), Some(worktree)) = (chars.next(), chars.next()) else {
            return FileStatus::Unknown;
        };

        if index == '?' && worktree == '?' {
            return FileStatus::Untracked;
        }
        if index != ' ' && index != '?' {
            if index == 'D' {
                return FileStatus::Deleted;
            }
            return FileStatus::Staged;
        }
        if worktree != ' ' && worktree != '?' {
            return FileStatus::Modified;
        }
        FileStatus::Unknown
    }

    /// Whether the path is known to the index.
    pub fn is_tracked(&self) -> bool {
        matches!(
            self,
            FileStatus::Modified | FileStatus::Staged | FileStatus::Deleted
        )
    }
}

/// Whether a path names an ignore file (`.gitignore` at any depth).
pub fn is_ignore_file(path: &str) -> bool {
    path == ".gitignore" || path.ends_with("/.gitignore")
}

#[cfg(test)]
mod tests {
    use super::*;

    mod selection_item {
        use super::*;

        #[test]
        fn parses_local() {
            let item: SelectionItem = "local: feature".parse().unwrap();
            assert_eq!(item.tag(), SelectionTag::Local);
            assert_eq!(item.payload(), "feature");
        }

        #[test]
        fn parses_local_remote_tag_with_slash() {
            let item: SelectionItem = "local/remote: feature/x".parse().unwrap();
            assert_eq!(item.tag(), SelectionTag::LocalRemote);
            assert_eq!(item.payload(), "feature/x");
        }

        #[test]
        fn remote_payload_splits_on_first_slash() {
            let item: SelectionItem = "remote: origin/feature/deep".parse().unwrap();
            let branch = item.branch_ref().unwrap();
            assert_eq!(branch.remote(), Some("origin"));
            assert_eq!(branch.name(), "feature/deep");
            assert_eq!(branch.kind(), BranchKind::RemoteOnly);
        }

        #[test]
        fn rejects_missing_separator() {
            assert!(matches!(
                "local feature".parse::<SelectionItem>(),
                Err(TypeError::InvalidSelection(_))
            ));
        }

        #[test]
        fn rejects_unknown_tag() {
            assert_eq!(
                "tag: feature".parse::<SelectionItem>(),
                Err(TypeError::UnknownTag("tag".into()))
            );
        }

        #[test]
        fn remote_without_branch_is_invalid() {
            let item = SelectionItem::new(SelectionTag::Remote, "origin");
            assert!(matches!(
                item.branch_ref(),
                Err(TypeError::InvalidRemoteBranch(_))
            ));
        }
    }

    mod branch_ref {
        use super::*;

        #[test]
        fn selection_item_for_each_kind() {
            assert_eq!(
                BranchRef::local("a", false).selection_item().to_string(),
                "local: a"
            );
            assert_eq!(
                BranchRef::local("a", true).selection_item().to_string(),
                "local/remote: a"
            );
            assert_eq!(
                BranchRef::remote_only("up", "a").selection_item().to_string(),
                "remote: up/a"
            );
        }
    }

    mod upstream {
        use super::*;

        #[test]
        fn splits_first_slash() {
            let upstream = Upstream::parse("origin/feature/x").unwrap();
            assert_eq!(upstream.remote, "origin");
            assert_eq!(upstream.branch, "feature/x");
            assert_eq!(upstream.to_string(), "origin/feature/x");
        }

        #[test]
        fn rejects_bare_name() {
            assert!(Upstream::parse("origin").is_err());
            assert!(Upstream::parse("/x").is_err());
        }
    }

    mod file_status {
        use super::*;

        #[test]
        fn porcelain_prefixes() {
            assert_eq!(FileStatus::from_porcelain("?? a"), FileStatus::Untracked);
            assert_eq!(FileStatus::from_porcelain("A  a"), FileStatus::Staged);
            assert_eq!(FileStatus::from_porcelain("MM a"), FileStatus::Staged);
            assert_eq!(FileStatus::from_porcelain("R  a -> b"), FileStatus::Staged);
            assert_eq!(FileStatus::from_porcelain("D  a"), FileStatus::Deleted);
            assert_eq!(FileStatus::from_porcelain(" D a"), FileStatus::Modified);
            assert_eq!(FileStatus::from_porcelain(" M a"), FileStatus::Modified);
            assert_eq!(FileStatus::from_porcelain("  a"), FileStatus::Unknown);
            assert_eq!(FileStatus::from_porcelain("M"), FileStatus::Unknown);
        }

        #[test]
        fn tracked_classification() {
            assert!(!FileStatus::Untracked.is_tracked());
            assert!(!FileStatus::Unknown.is_tracked());
            assert!(FileStatus::Deleted.is_tracked());
        }
    }

    #[test]
    fn ignore_file_detection() {
        assert!(is_ignore_file(".gitignore"));
        assert!(is_ignore_file("sub/dir/.gitignore"));
        assert!(!is_ignore_file("x.gitignore"));
        assert!(!is_ignore_file(".gitignore.bak"));
    }
}
