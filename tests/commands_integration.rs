//! Integration tests for delete, clean, checkout-pr, push, empty and
//! replay-list, run in-process against real repositories.

mod support;

use gitgum::cli::commands::{
    checkout_pr, clean, delete, empty, push, replay_commits, CleanOptions, EMPTY_COMMIT_MESSAGE,
};
use gitgum::engine::CommandError;
use gitgum::ui::scripted::{Reply, ScriptedPrompter};

use support::{run_git, TestRepo};

fn choose(s: &str) -> Reply {
    Reply::Choose(s.to_string())
}

fn is_aborted(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<CommandError>(),
        Some(CommandError::Aborted(_))
    )
}

// =============================================================================
// delete
// =============================================================================

#[test]
fn delete_merged_branch() {
    let repo = TestRepo::new();
    repo.create_branch("feature");

    let prompter = ScriptedPrompter::new([choose("feature")]);
    delete(&repo.context(), &prompter).unwrap();

    assert!(!repo.branch_exists("feature"));
    assert_eq!(prompter.transcript().len(), 1);
}

#[test]
fn delete_unmerged_branch_needs_force_confirmation() {
    let repo = TestRepo::new();
    repo.run(&["checkout", "--quiet", "-b", "feature"]);
    repo.commit("f.txt", "f\n", "Feature work");
    repo.checkout("main");

    let prompter = ScriptedPrompter::new([choose("feature"), Reply::Yes]);
    delete(&repo.context(), &prompter).unwrap();

    assert!(!repo.branch_exists("feature"));
    let force = &prompter.transcript()[1];
    assert!(force.prompt.ends_with("force delete the local branch?"));
    assert_eq!(force.options, vec!["no", "yes"]);
}

#[test]
fn declining_force_delete_aborts() {
    let repo = TestRepo::new();
    repo.run(&["checkout", "--quiet", "-b", "feature"]);
    repo.commit("f.txt", "f\n", "Feature work");
    repo.checkout("main");

    let prompter = ScriptedPrompter::new([choose("feature"), Reply::No]);
    let err = delete(&repo.context(), &prompter).unwrap_err();

    assert!(is_aborted(&err));
    assert!(repo.branch_exists("feature"));
}

#[test]
fn delete_current_branch_switches_first() {
    let repo = TestRepo::new();
    repo.run(&["checkout", "--quiet", "-b", "feature"]);

    let prompter = ScriptedPrompter::new([choose("feature"), Reply::Yes, choose("main")]);
    delete(&repo.context(), &prompter).unwrap();

    assert_eq!(repo.head_branch(), "main");
    assert!(!repo.branch_exists("feature"));
    // the branch being deleted is not a switch target
    assert_eq!(prompter.transcript()[2].options, vec!["main"]);
}

#[test]
fn delete_current_branch_declined() {
    let repo = TestRepo::new();
    repo.run(&["checkout", "--quiet", "-b", "feature"]);

    let prompter = ScriptedPrompter::new([choose("feature"), Reply::No]);
    assert!(is_aborted(&delete(&repo.context(), &prompter).unwrap_err()));
    assert_eq!(repo.head_branch(), "feature");
}

#[test]
fn delete_from_detached_head() {
    let repo = TestRepo::new();
    repo.create_branch("feature");
    repo.run(&["checkout", "--quiet", "--detach", "HEAD"]);

    let prompter = ScriptedPrompter::new([choose("feature")]);
    delete(&repo.context(), &prompter).unwrap();

    assert!(!repo.branch_exists("feature"));
    // no switch-away question without a current branch
    assert_eq!(prompter.transcript().len(), 1);
}

#[test]
fn delete_protected_branch_warns() {
    let repo = TestRepo::new();
    repo.run(&["checkout", "--quiet", "-b", "feature"]);

    let prompter = ScriptedPrompter::new([choose("main"), Reply::No]);
    assert!(is_aborted(&delete(&repo.context(), &prompter).unwrap_err()));
    assert!(repo.branch_exists("main"));
    assert!(prompter.transcript()[1].prompt.contains("'main' branch"));
}

#[test]
fn delete_with_remote_branch() {
    let mut repo = TestRepo::new();
    let remote = repo.add_remote("origin");
    repo.create_branch("feature");
    repo.run(&["push", "--quiet", "-u", "origin", "feature"]);

    let prompter = ScriptedPrompter::new([choose("feature"), Reply::Yes]);
    delete(&repo.context(), &prompter).unwrap();

    assert!(!repo.branch_exists("feature"));
    let heads = run_git(&remote, &["for-each-ref", "--format=%(refname)", "refs/heads"]);
    assert_eq!(heads, "refs/heads/main");
    assert!(prompter.transcript()[1]
        .prompt
        .contains("tracking remote branch 'origin/feature'"));
}

#[test]
fn delete_keeps_remote_branch_by_default() {
    let mut repo = TestRepo::new();
    let remote = repo.add_remote("origin");
    repo.create_branch("feature");
    repo.run(&["push", "--quiet", "-u", "origin", "feature"]);

    let prompter = ScriptedPrompter::new([choose("feature"), Reply::No]);
    delete(&repo.context(), &prompter).unwrap();

    assert!(!repo.branch_exists("feature"));
    let heads = run_git(&remote, &["for-each-ref", "--format=%(refname)", "refs/heads"]);
    assert!(heads.contains("refs/heads/feature"));
}

// =============================================================================
// clean
// =============================================================================

fn default_clean() -> CleanOptions {
    CleanOptions::resolve(None, None, None, false)
}

#[test]
fn clean_applies_gitignore_before_listing() {
    let repo = TestRepo::new();
    repo.commit(".gitignore", "*.log\n", "Ignore logs");
    repo.write(".gitignore", "");
    repo.write("a.log", "log\n");
    repo.write("b.txt", "text\n");

    let opts = CleanOptions::resolve(Some(true), Some(true), None, false);
    clean(&repo.context(), &ScriptedPrompter::new([]), opts, true).unwrap();

    assert_eq!(repo.read(".gitignore"), "*.log\n");
    assert!(!repo.exists("b.txt"));
    assert!(repo.exists("a.log"));
}

#[test]
fn clean_declined_restores_gitignore_exactly() {
    let repo = TestRepo::new();
    repo.commit(".gitignore", "*.log\n", "Ignore logs");
    // staged and unstaged edits on top of each other
    repo.write(".gitignore", "*.log\n*.tmp\n");
    repo.run(&["add", ".gitignore"]);
    repo.write(".gitignore", "");
    repo.write("a.log", "log\n");

    let prompter = ScriptedPrompter::new([Reply::No]);
    clean(&repo.context(), &prompter, default_clean(), false).unwrap();

    assert_eq!(repo.read(".gitignore"), "");
    assert_eq!(repo.run(&["show", ":.gitignore"]), "*.log\n*.tmp");
    assert!(repo.exists("a.log"));

    let confirm = &prompter.transcript()[0];
    assert!(confirm.prompt.starts_with("Proceed with cleanup?"));
    assert_eq!(confirm.options, vec!["no", "yes"]);
}

#[cfg(unix)]
#[test]
fn clean_failure_while_previewing_restores_gitignore() {
    let repo = TestRepo::new();
    repo.commit(".gitignore", "*.log\n", "Ignore logs");
    repo.commit("b/keep.txt", "keep\n", "Add b");
    repo.write(".gitignore", "# my edit\n");
    // an ignore file that cannot be read fails the preview
    std::os::unix::fs::symlink("missing-target", repo.path().join("b/.gitignore")).unwrap();

    let prompter = ScriptedPrompter::new([Reply::Yes]);
    let err = clean(&repo.context(), &prompter, default_clean(), false).unwrap_err();

    assert!(err.to_string().contains("b/.gitignore"));
    assert!(prompter.transcript().is_empty());
    assert_eq!(repo.read(".gitignore"), "# my edit\n");
    assert_eq!(repo.run(&["show", ":.gitignore"]), "*.log");
}

#[test]
fn clean_removes_untracked_gitignore_and_what_it_hid() {
    let repo = TestRepo::new();
    repo.write(".gitignore", "*.tmp\n");
    repo.write("x.tmp", "tmp\n");

    clean(&repo.context(), &ScriptedPrompter::new([]), default_clean(), true).unwrap();

    assert!(!repo.exists(".gitignore"));
    assert!(!repo.exists("x.tmp"));
}

#[test]
fn clean_confirmed() {
    let repo = TestRepo::new();
    repo.write("README.md", "changed\n");
    repo.write("new.txt", "new\n");

    let prompter = ScriptedPrompter::new([Reply::Yes]);
    clean(&repo.context(), &prompter, default_clean(), false).unwrap();

    assert_eq!(repo.read("README.md"), "# Test Repo\n");
    assert!(!repo.exists("new.txt"));
}

#[test]
fn clean_declined_touches_nothing() {
    let repo = TestRepo::new();
    repo.write("README.md", "changed\n");
    repo.write("new.txt", "new\n");

    let prompter = ScriptedPrompter::new([Reply::No]);
    clean(&repo.context(), &prompter, default_clean(), false).unwrap();

    assert_eq!(repo.read("README.md"), "changed\n");
    assert!(repo.exists("new.txt"));
}

#[test]
fn clean_untracked_only() {
    let repo = TestRepo::new();
    repo.write("README.md", "changed\n");
    repo.write("new.txt", "new\n");

    let opts = CleanOptions::resolve(Some(false), None, None, false);
    clean(&repo.context(), &ScriptedPrompter::new([]), opts, true).unwrap();

    assert_eq!(repo.read("README.md"), "changed\n");
    assert!(!repo.exists("new.txt"));
}

#[test]
fn clean_ignored_files() {
    let repo = TestRepo::new();
    repo.commit(".gitignore", "*.log\n", "Ignore logs");
    repo.write("a.log", "log\n");

    let opts = CleanOptions::resolve(None, None, Some(true), false);
    clean(&repo.context(), &ScriptedPrompter::new([]), opts, true).unwrap();

    assert!(!repo.exists("a.log"));
}

#[test]
fn clean_nothing_to_do() {
    let repo = TestRepo::new();
    let prompter = ScriptedPrompter::new([]);

    clean(&repo.context(), &prompter, default_clean(), false).unwrap();
    let off = CleanOptions::resolve(Some(false), Some(false), None, false);
    clean(&repo.context(), &prompter, off, false).unwrap();

    assert!(prompter.transcript().is_empty());
}

// =============================================================================
// checkout-pr
// =============================================================================

/// Repo with `origin` advertising PR 7 (head and merge) and PR 3 (merge).
fn repo_with_pull_refs() -> (TestRepo, String) {
    let mut repo = TestRepo::new();
    repo.add_remote("origin");

    repo.run(&["checkout", "--quiet", "-b", "contrib"]);
    let pr_head = repo.commit("pr.txt", "pr\n", "PR work");
    repo.run(&["push", "--quiet", "origin", "HEAD:refs/pull/7/head"]);
    repo.run(&["push", "--quiet", "origin", "HEAD:refs/pull/7/merge"]);
    repo.run(&["push", "--quiet", "origin", "main:refs/pull/3/merge"]);
    repo.checkout("main");
    repo.run(&["branch", "-D", "contrib"]);
    (repo, pr_head)
}

#[test]
fn checkout_pr_creates_branch() {
    let (repo, pr_head) = repo_with_pull_refs();

    let prompter = ScriptedPrompter::new([choose("origin"), choose("PR #7 (head)")]);
    checkout_pr(&repo.context(), &prompter).unwrap();

    assert_eq!(repo.head_branch(), "pr-7");
    assert_eq!(repo.rev("pr-7"), pr_head);
    assert_eq!(
        prompter.transcript()[1].options,
        vec!["PR #7 (head)", "PR #3 (merge)"]
    );
}

#[test]
fn checkout_pr_resets_existing_branch() {
    let (repo, pr_head) = repo_with_pull_refs();
    repo.create_branch("pr-7");

    let prompter = ScriptedPrompter::new([choose("origin"), choose("PR #7 (head)"), Reply::Yes]);
    checkout_pr(&repo.context(), &prompter).unwrap();

    assert_eq!(repo.head_branch(), "pr-7");
    assert_eq!(repo.rev("pr-7"), pr_head);
}

#[test]
fn checkout_pr_keeps_existing_branch() {
    let (repo, _pr_head) = repo_with_pull_refs();
    repo.create_branch("pr-7");
    let before = repo.rev("pr-7");

    let prompter = ScriptedPrompter::new([choose("origin"), choose("PR #7 (head)"), Reply::No]);
    checkout_pr(&repo.context(), &prompter).unwrap();

    assert_eq!(repo.head_branch(), "pr-7");
    assert_eq!(repo.rev("pr-7"), before);
}

#[test]
fn checkout_pr_refuses_dirty_tree() {
    let (repo, _pr_head) = repo_with_pull_refs();
    repo.write("README.md", "changed\n");

    let prompter = ScriptedPrompter::new([choose("origin"), choose("PR #3 (merge)")]);
    let err = checkout_pr(&repo.context(), &prompter).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CommandError>(),
        Some(CommandError::DirtyTree)
    ));
    assert!(!repo.branch_exists("pr-3"));
}

#[test]
fn checkout_pr_without_remotes() {
    let repo = TestRepo::new();
    let err = checkout_pr(&repo.context(), &ScriptedPrompter::new([])).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CommandError>(),
        Some(CommandError::NoRemotes)
    ));
}

// =============================================================================
// push
// =============================================================================

#[test]
fn push_creates_remote_branch() {
    let mut repo = TestRepo::new();
    let remote = repo.add_remote("origin");
    repo.run(&["checkout", "--quiet", "-b", "feature"]);
    let head = repo.commit("f.txt", "f\n", "Feature work");

    let prompter = ScriptedPrompter::new([choose("origin"), Reply::Yes]);
    push(&repo.context(), &prompter).unwrap();

    assert_eq!(repo.upstream("feature"), "origin/feature");
    assert_eq!(run_git(&remote, &["rev-parse", "refs/heads/feature"]), head);
    assert_eq!(prompter.transcript()[0].prompt, "Push 'feature' to");
}

#[test]
fn push_declined_for_new_branch() {
    let mut repo = TestRepo::new();
    let remote = repo.add_remote("origin");
    repo.run(&["checkout", "--quiet", "-b", "feature"]);

    let prompter = ScriptedPrompter::new([choose("origin"), Reply::No]);
    push(&repo.context(), &prompter).unwrap();

    assert_eq!(repo.upstream("feature"), "");
    let heads = run_git(&remote, &["for-each-ref", "--format=%(refname)", "refs/heads"]);
    assert!(!heads.contains("feature"));
}

#[test]
fn push_up_to_date_only_sets_upstream() {
    let mut repo = TestRepo::new();
    repo.add_remote("origin");
    repo.run(&["checkout", "--quiet", "-b", "feature"]);
    repo.run(&["push", "--quiet", "origin", "feature"]);

    let prompter = ScriptedPrompter::new([choose("origin")]);
    push(&repo.context(), &prompter).unwrap();

    assert_eq!(repo.upstream("feature"), "origin/feature");
    assert_eq!(prompter.remaining(), 0);
    assert_eq!(prompter.transcript().len(), 1);
}

#[test]
fn push_to_upstream() {
    let mut repo = TestRepo::new();
    let remote = repo.add_remote("origin");
    repo.run(&["checkout", "--quiet", "-b", "feature"]);
    repo.run(&["push", "--quiet", "-u", "origin", "feature"]);
    let head = repo.commit("f.txt", "f\n", "More work");

    let prompter = ScriptedPrompter::new([Reply::Yes]);
    push(&repo.context(), &prompter).unwrap();

    assert_eq!(run_git(&remote, &["rev-parse", "refs/heads/feature"]), head);
}

#[test]
fn push_without_remotes() {
    let repo = TestRepo::new();
    let err = push(&repo.context(), &ScriptedPrompter::new([])).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CommandError>(),
        Some(CommandError::NoRemotes)
    ));
}

// =============================================================================
// empty
// =============================================================================

#[test]
fn empty_commit_on_synced_branch() {
    let mut repo = TestRepo::new();
    repo.add_remote("origin");
    repo.run(&["branch", "--set-upstream-to=origin/main", "main"]);
    let before = repo.rev("HEAD");

    let prompter = ScriptedPrompter::new([Reply::No]);
    empty(&repo.context(), &prompter).unwrap();

    assert_eq!(repo.rev("HEAD~1"), before);
    assert_eq!(repo.run(&["log", "-1", "--format=%s"]), EMPTY_COMMIT_MESSAGE);
    assert_eq!(repo.rev("HEAD^{tree}"), repo.rev(&format!("{}^{{tree}}", before)));
}

#[test]
fn empty_commit_pushed() {
    let mut repo = TestRepo::new();
    let remote = repo.add_remote("origin");
    repo.run(&["branch", "--set-upstream-to=origin/main", "main"]);

    let prompter = ScriptedPrompter::new([Reply::Yes]);
    empty(&repo.context(), &prompter).unwrap();

    assert_eq!(run_git(&remote, &["rev-parse", "refs/heads/main"]), repo.rev("HEAD"));
}

#[test]
fn empty_refuses_when_ahead() {
    let mut repo = TestRepo::new();
    repo.add_remote("origin");
    repo.run(&["branch", "--set-upstream-to=origin/main", "main"]);
    let head = repo.commit("x.txt", "x\n", "Unpushed");

    let err = empty(&repo.context(), &ScriptedPrompter::new([])).unwrap_err();
    assert!(err.to_string().contains("ahead of remote"));
    assert_eq!(repo.rev("HEAD"), head);
}

#[test]
fn empty_requires_upstream() {
    let repo = TestRepo::new();
    let err = empty(&repo.context(), &ScriptedPrompter::new([])).unwrap_err();
    assert!(err.to_string().contains("no upstream"));
}

// =============================================================================
// replay-list
// =============================================================================

#[test]
fn replay_commits_oldest_first() {
    let repo = TestRepo::new();
    repo.run(&["checkout", "--quiet", "-b", "feature"]);
    let first = repo.commit("1.txt", "1\n", "one");
    let second = repo.commit("2.txt", "2\n", "two");
    repo.checkout("main");
    repo.commit("main.txt", "m\n", "trunk moves on");

    let commits = replay_commits(&repo.git(), "feature", "main").unwrap();
    let ids: Vec<&str> = commits.iter().map(|c| c.as_str()).collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
}

#[test]
fn replay_commits_unknown_branch() {
    let repo = TestRepo::new();
    assert!(replay_commits(&repo.git(), "nope", "main").is_err());
}
