//! core::pr_ref
//!
//! Pull-request refs exposed by hosting platforms as
//! `refs/pull/<number>/{head,merge}`.
//!
//! # Example
//!
//! ```
//! use gitgum::core::pr_ref::{collect_pr_refs, PrRef, PrRefKind};
//!
//! let listing = "\
//! aaaa\trefs/heads/main
//! bbbb\trefs/pull/7/merge
//! cccc\trefs/pull/7/head
//! dddd\trefs/pull/12/merge";
//!
//! let refs = collect_pr_refs(listing);
//! assert_eq!(refs, vec![
//!     PrRef { number: 12, kind: PrRefKind::Merge },
//!     PrRef { number: 7, kind: PrRefKind::Head },
//! ]);
//! assert_eq!(refs[1].label(), "PR #7 (head)");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use super::types::TypeError;

/// Which flavour of pull-request ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrRefKind {
    Head,
    Merge,
}

impl PrRefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrRefKind::Head => "head",
            PrRefKind::Merge => "merge",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "head" => Some(PrRefKind::Head),
            "merge" => Some(PrRefKind::Merge),
            _ => None,
        }
    }
}

impl fmt::Display for PrRefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single pull-request ref on a remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrRef {
    pub number: u64,
    pub kind: PrRefKind,
}

impl PrRef {
    /// The full refname, e.g. `refs/pull/7/head`.
    pub fn refname(&self) -> String {
        format!("refs/pull/{}/{}", self.number, self.kind)
    }

    /// The local branch this PR is checked out as.
    pub fn local_branch(&self) -> String {
        format!("pr-{}", self.number)
    }

    /// The picker line, `PR #<n> (<kind>)`.
    pub fn label(&self) -> String {
        format!("PR #{} ({})", self.number, self.kind)
    }

    /// Parse a picker line produced by [`PrRef::label`].
    pub fn parse_label(label: &str) -> Result<Self, TypeError> {
        let invalid = || TypeError::InvalidPrSelection(label.to_string());

        let rest = label.strip_prefix("PR #").ok_or_else(invalid)?;
        let (number, kind) = rest.split_once(" (").ok_or_else(invalid)?;
        let kind = kind.strip_suffix(')').ok_or_else(invalid)?;

        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number = number.parse().map_err(|_| invalid())?;
        let kind = PrRefKind::parse(kind).ok_or_else(invalid)?;
        Ok(Self { number, kind })
    }

    /// Parse one `ls-remote` line: `<hex-oid><ws>refs/pull/<n>/<kind>`.
    fn from_ls_remote_line(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let oid = fields.next()?;
        let refname = fields.next()?;
        if fields.next().is_some() || !oid.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let (number, kind) = refname.strip_prefix("refs/pull/")?.split_once('/')?;
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            number: number.parse().ok()?,
            kind: PrRefKind::parse(kind)?,
        })
    }
}

/// Collect pull-request refs from `git ls-remote` output.
///
/// One entry per PR number; `head` is preferred over `merge`. Sorted by
/// descending PR number.
pub fn collect_pr_refs(ls_remote: &str) -> Vec<PrRef> {
    let mut by_number: BTreeMap<u64, PrRef> = BTreeMap::new();

    for pr in ls_remote.lines().filter_map(PrRef::from_ls_remote_line) {
        by_number
            .entry(pr.number)
            .and_modify(|existing| {
                if pr.kind == PrRefKind::Head {
                    *existing = pr;
                }
            })
            .or_insert(pr);
    }

    by_number.into_values().rev().collect()
}
