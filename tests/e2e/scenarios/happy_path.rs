//! The straight-line flow: create, edit, commit, export.

use crate::harness::{workspace::full_document, TestWorkspace};
use ctxgit_core::{ContextData, CONTEXT_FILE, META_FILE};

#[test]
fn test_demo_repo_end_to_end() {
    let ws = TestWorkspace::new().unwrap();
    let service = ws.service();

    let repo = ws.create_repo("demo").unwrap();
    assert_eq!(repo.branches, vec!["master".to_string()]);
    assert_eq!(repo.current_branch, "master");

    ws.save_purpose(&repo.id, "test").unwrap();
    let ctx = service.get_context(&repo.id).unwrap();
    assert_eq!(ctx.purpose, "test");
    assert!(ctx.assumptions.is_empty());

    service.commit(&repo.id, "update context").unwrap();
    let commits = service.list_commits(&repo.id, None).unwrap();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].message, "update context");

    let export = service
        .export_context(&repo.id, "chatgpt", Some("master"))
        .unwrap();
    assert!(export.content.contains("test"));
}

#[test]
fn test_document_roundtrip_all_fields() {
    let ws = TestWorkspace::new().unwrap();
    let service = ws.service();
    let repo = ws.create_repo("knowledge").unwrap();

    let doc = full_document();
    service.save_context(&repo.id, &doc).unwrap();

    assert_eq!(service.get_context(&repo.id).unwrap(), doc);
}

#[test]
fn test_fresh_repo_has_default_document() {
    let ws = TestWorkspace::new().unwrap();
    let repo = ws.create_repo("fresh").unwrap();

    assert_eq!(
        ws.service().get_context(&repo.id).unwrap(),
        ContextData::default()
    );
}

#[test]
fn test_tracked_files_exist_on_disk() {
    let ws = TestWorkspace::new().unwrap();
    let repo = ws.create_repo("ondisk").unwrap();

    let dir = ws.repo_dir(&repo.id);
    crate::harness::workspace::assert_exists(&dir.join(META_FILE));
    crate::harness::workspace::assert_exists(&dir.join(CONTEXT_FILE));
    crate::harness::workspace::assert_exists(&dir.join(".ctxgit"));
}

#[test]
fn test_state_survives_service_reopen() {
    let ws = TestWorkspace::new().unwrap();
    let repo = ws.create_repo("durable").unwrap();
    ws.save_purpose(&repo.id, "persisted").unwrap();
    ws.service().commit(&repo.id, "save purpose").unwrap();

    // A new service over the same root sees everything: nothing is
    // cached in memory between calls.
    let reopened = ws.reopen().unwrap();
    assert_eq!(reopened.get_context(&repo.id).unwrap().purpose, "persisted");
    assert_eq!(reopened.list_commits(&repo.id, None).unwrap().len(), 2);
}

#[test]
fn test_every_target_renders_the_document() {
    let ws = TestWorkspace::new().unwrap();
    let service = ws.service();
    let repo = ws.create_repo("render").unwrap();
    ws.save_purpose(&repo.id, "render me").unwrap();

    let targets = service.list_export_targets();
    assert_eq!(targets, vec!["chatgpt", "claude", "gemini"]);

    for target in targets {
        let export = service.export_context(&repo.id, &target, None).unwrap();
        assert_eq!(export.target, target);
        assert!(export.content.contains("render me"), "{} lost the purpose", target);
    }
}
