//! Store-level lifecycle: ids, listing hygiene, deletion.

use crate::harness::TestWorkspace;
use std::collections::HashSet;
use std::fs;

#[test]
fn test_ids_unique_and_roundtrip() {
    let ws = TestWorkspace::new().unwrap();
    let service = ws.service();

    let mut ids = HashSet::new();
    for i in 0..8 {
        let repo = ws.create_repo(&format!("project-{}", i)).unwrap();
        assert!(ids.insert(repo.id.clone()), "duplicate id {}", repo.id);

        let fetched = service.get_repository(&repo.id).unwrap();
        assert_eq!(fetched.id, repo.id);
        assert_eq!(fetched.name, format!("project-{}", i));
    }

    assert_eq!(service.list_repositories().unwrap().len(), 8);
}

#[test]
fn test_new_repo_has_one_branch_one_commit() {
    let ws = TestWorkspace::new().unwrap();
    let repo = ws.create_repo("minimal").unwrap();

    assert_eq!(repo.branches.len(), 1);
    assert_eq!(
        ws.service().list_commits(&repo.id, None).unwrap().len(),
        1
    );
}

#[test]
fn test_list_skips_foreign_entries() {
    let ws = TestWorkspace::new().unwrap();
    let repo = ws.create_repo("real").unwrap();

    // Non-repository clutter in the store root.
    fs::create_dir(ws.data_dir().join(".tmp-scratch")).unwrap();
    fs::create_dir(ws.data_dir().join("empty-dir")).unwrap();
    fs::write(ws.data_dir().join("notes.txt"), "junk").unwrap();

    let repos = ws.service().list_repositories().unwrap();
    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].id, repo.id);
}

#[test]
fn test_delete_then_get_fails_not_found() {
    let ws = TestWorkspace::new().unwrap();
    let service = ws.service();
    let repo = ws.create_repo("doomed").unwrap();

    service.delete_repository(&repo.id).unwrap();

    assert!(service.get_repository(&repo.id).unwrap_err().is_not_found());
    assert!(!ws.repo_dir(&repo.id).exists());
}

#[test]
fn test_delete_handles_readonly_history_files() {
    let ws = TestWorkspace::new().unwrap();
    let repo = ws.create_repo("readonly").unwrap();

    // Mark every object file read-only, as a bare object store would.
    let objects = ws.repo_dir(&repo.id).join(".ctxgit").join("objects");
    for shard in fs::read_dir(&objects).unwrap() {
        for object in fs::read_dir(shard.unwrap().path()).unwrap() {
            let path = object.unwrap().path();
            let mut perms = fs::metadata(&path).unwrap().permissions();
            perms.set_readonly(true);
            fs::set_permissions(&path, perms).unwrap();
        }
    }

    ws.service().delete_repository(&repo.id).unwrap();
    assert!(!ws.repo_dir(&repo.id).exists());
}

#[test]
fn test_deleting_one_repo_leaves_others() {
    let ws = TestWorkspace::new().unwrap();
    let service = ws.service();

    let keep = ws.create_repo("keep").unwrap();
    let discard = ws.create_repo("discard").unwrap();

    ws.save_purpose(&keep.id, "survivor").unwrap();
    service.delete_repository(&discard.id).unwrap();

    assert_eq!(service.list_repositories().unwrap().len(), 1);
    assert_eq!(service.get_context(&keep.id).unwrap().purpose, "survivor");
}
