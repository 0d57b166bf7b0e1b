//! Commit history, truncation, and diffs.

use crate::harness::TestWorkspace;
use ctxgit_core::CtxGitError;

#[test]
fn test_log_truncation_is_a_prefix() {
    let ws = TestWorkspace::new().unwrap();
    let service = ws.service();
    let repo = ws.create_repo("demo").unwrap();

    for i in 0..6 {
        ws.save_purpose(&repo.id, &format!("revision {}", i)).unwrap();
        service.commit(&repo.id, &format!("commit {}", i)).unwrap();
    }

    let all = service.list_commits(&repo.id, Some(100)).unwrap();
    assert_eq!(all.len(), 7); // initial + 6

    let three = service.list_commits(&repo.id, Some(3)).unwrap();
    assert_eq!(three.len(), 3);
    assert_eq!(three.as_slice(), &all[..3]);

    // Newest first.
    assert_eq!(all[0].message, "commit 5");
    assert_eq!(all.last().unwrap().message, "Initial commit: create context repo");
}

#[test]
fn test_commit_hashes_stable_and_short() {
    let ws = TestWorkspace::new().unwrap();
    let service = ws.service();
    let repo = ws.create_repo("demo").unwrap();

    ws.save_purpose(&repo.id, "hash me").unwrap();
    let created = service.commit(&repo.id, "hash test").unwrap();
    assert_eq!(created.hash.len(), 12);

    let listed = &service.list_commits(&repo.id, None).unwrap()[0];
    assert_eq!(listed.hash, created.hash);
    assert_eq!(listed.date, created.date);
}

#[test]
fn test_empty_commit_is_surfaced_not_fabricated() {
    let ws = TestWorkspace::new().unwrap();
    let service = ws.service();
    let repo = ws.create_repo("demo").unwrap();

    let err = service.commit(&repo.id, "no changes").unwrap_err();
    assert!(matches!(err, CtxGitError::NothingToCommit));
    assert_eq!(service.list_commits(&repo.id, None).unwrap().len(), 1);
}

#[test]
fn test_diff_between_resolvable_refs() {
    let ws = TestWorkspace::new().unwrap();
    let service = ws.service();
    let repo = ws.create_repo("demo").unwrap();

    ws.save_purpose(&repo.id, "before").unwrap();
    service.commit(&repo.id, "before").unwrap();
    ws.save_purpose(&repo.id, "after").unwrap();
    service.commit(&repo.id, "after").unwrap();

    let diff = service.get_diff(&repo.id, None, None).unwrap();
    assert!(!diff.diff_text.is_empty());
    assert!(diff.diff_text.contains("-purpose = \"before\""));
    assert!(diff.diff_text.contains("+purpose = \"after\""));
    assert!(diff.diff_text.contains("context.toml"));
}

#[test]
fn test_diff_before_second_commit_is_empty() {
    let ws = TestWorkspace::new().unwrap();
    let service = ws.service();
    let repo = ws.create_repo("demo").unwrap();

    // Requesting history before the first commit soft-fails to empty.
    let diff = service.get_diff(&repo.id, None, None).unwrap();
    assert_eq!(diff.diff_text, "");
    assert_eq!(diff.from_ref, "HEAD~1");
    assert_eq!(diff.to_ref, "HEAD");

    let diff = service
        .get_diff(&repo.id, Some("ghost"), Some("HEAD"))
        .unwrap();
    assert_eq!(diff.diff_text, "");
}

#[test]
fn test_diff_branches_shows_divergence() {
    let ws = TestWorkspace::new().unwrap();
    let service = ws.service();
    let repo = ws.create_repo("demo").unwrap();

    service.create_branch(&repo.id, "topic").unwrap();
    service.checkout(&repo.id, "topic").unwrap();
    ws.save_purpose(&repo.id, "topic work").unwrap();
    service.commit(&repo.id, "topic work").unwrap();

    let diff = service.diff_branches(&repo.id, "topic", "master").unwrap();
    assert!(diff.diff_text.contains("+purpose = \"topic work\""));

    // Identical refs produce no text.
    let none = service.diff_branches(&repo.id, "topic", "topic").unwrap();
    assert_eq!(none.diff_text, "");
}
