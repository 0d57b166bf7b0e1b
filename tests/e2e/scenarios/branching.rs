//! Branch creation, checkout, and per-branch document state.

use crate::harness::TestWorkspace;
use ctxgit_core::CtxGitError;

#[test]
fn test_branch_create_conflict_leaves_list_unchanged() {
    let ws = TestWorkspace::new().unwrap();
    let service = ws.service();
    let repo = ws.create_repo("demo").unwrap();

    let branches = service.create_branch(&repo.id, "draft").unwrap();
    assert_eq!(branches, vec!["draft".to_string(), "master".to_string()]);

    let err = service.create_branch(&repo.id, "draft").unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(
        service.list_branches(&repo.id).unwrap(),
        vec!["draft".to_string(), "master".to_string()]
    );
}

#[test]
fn test_checkout_unknown_branch_not_found() {
    let ws = TestWorkspace::new().unwrap();
    let service = ws.service();
    let repo = ws.create_repo("demo").unwrap();

    let err = service.checkout(&repo.id, "missing").unwrap_err();
    assert!(matches!(err, CtxGitError::BranchNotFound(_)));
    assert_eq!(
        service.get_repository(&repo.id).unwrap().current_branch,
        "master"
    );
}

#[test]
fn test_document_diverges_per_branch() {
    let ws = TestWorkspace::new().unwrap();
    let service = ws.service();
    let repo = ws.create_repo("demo").unwrap();

    ws.save_purpose(&repo.id, "shared base").unwrap();
    service.commit(&repo.id, "base purpose").unwrap();

    service.create_branch(&repo.id, "experiment").unwrap();
    service.checkout(&repo.id, "experiment").unwrap();
    ws.save_purpose(&repo.id, "experimental purpose").unwrap();
    service.commit(&repo.id, "experiment purpose").unwrap();

    service.checkout(&repo.id, "master").unwrap();
    assert_eq!(
        service.get_context(&repo.id).unwrap().purpose,
        "shared base"
    );

    service.checkout(&repo.id, "experiment").unwrap();
    assert_eq!(
        service.get_context(&repo.id).unwrap().purpose,
        "experimental purpose"
    );
}

#[test]
fn test_branch_starts_from_current_position() {
    let ws = TestWorkspace::new().unwrap();
    let service = ws.service();
    let repo = ws.create_repo("demo").unwrap();

    ws.save_purpose(&repo.id, "v1").unwrap();
    service.commit(&repo.id, "v1").unwrap();

    // The new branch shares history up to here.
    service.create_branch(&repo.id, "fork").unwrap();
    service.checkout(&repo.id, "fork").unwrap();

    let commits = service.list_commits(&repo.id, None).unwrap();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].message, "v1");
}

#[test]
fn test_export_checks_out_requested_branch() {
    let ws = TestWorkspace::new().unwrap();
    let service = ws.service();
    let repo = ws.create_repo("demo").unwrap();

    ws.save_purpose(&repo.id, "master purpose").unwrap();
    service.commit(&repo.id, "master purpose").unwrap();

    service.create_branch(&repo.id, "alt").unwrap();
    service.checkout(&repo.id, "alt").unwrap();
    ws.save_purpose(&repo.id, "alt purpose").unwrap();
    service.commit(&repo.id, "alt purpose").unwrap();

    let export = service
        .export_context(&repo.id, "gemini", Some("master"))
        .unwrap();
    assert!(export.content.contains("master purpose"));

    // The checkout is an observable side effect of the export.
    assert_eq!(
        service.get_repository(&repo.id).unwrap().current_branch,
        "master"
    );
}
