//! Working-area snapshot and materialization.
//!
//! A repository has a single working area (its root directory, minus the
//! history directory). Committing snapshots everything present; checkout
//! rewrites the working area to a target snapshot.

use crate::error::Result;
use crate::types::{Tree, TreeEntry, TreeEntryKind};
use crate::vcs::HISTORY_DIR;
use crate::{ObjectId, ObjectStore};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Snapshots every file under `root` (excluding the history directory)
/// into the store, returning the root tree id.
pub fn snapshot(root: &Path, store: &ObjectStore) -> Result<ObjectId> {
    snapshot_dir(root, store, true)
}

fn snapshot_dir(dir: &Path, store: &ObjectStore, is_root: bool) -> Result<ObjectId> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if is_root && name == HISTORY_DIR {
            continue;
        }

        if path.is_dir() {
            let subtree = snapshot_dir(&path, store, false)?;
            entries.push(TreeEntry {
                name: name.to_string(),
                kind: TreeEntryKind::Tree,
                id: subtree,
            });
        } else if path.is_file() {
            let data = fs::read(&path)?;
            let blob = store.put_blob(&data)?;
            entries.push(TreeEntry {
                name: name.to_string(),
                kind: TreeEntryKind::Blob,
                id: blob,
            });
        }
    }

    store.put_tree(&Tree::new(entries))
}

/// Rewrites the working area under `root` to match the given snapshot.
///
/// Everything except the history directory is removed first, so files
/// absent from the target tree (including uncommitted edits) do not
/// survive the switch.
pub fn materialize(root: &Path, store: &ObjectStore, tree_id: ObjectId) -> Result<()> {
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if name == HISTORY_DIR {
            continue;
        }

        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }

    write_tree(root, store, tree_id)
}

fn write_tree(dir: &Path, store: &ObjectStore, tree_id: ObjectId) -> Result<()> {
    let tree = store.get_tree(tree_id)?;

    for entry in &tree.entries {
        let path = dir.join(&entry.name);
        match entry.kind {
            TreeEntryKind::Blob => {
                let data = store.get_blob(entry.id)?;
                fs::write(&path, data)?;
            }
            TreeEntryKind::Tree => {
                fs::create_dir_all(&path)?;
                write_tree(&path, store, entry.id)?;
            }
        }
    }

    Ok(())
}

/// Flattens a tree into a `path -> blob id` map with `/`-joined paths.
pub fn flatten(store: &ObjectStore, tree_id: ObjectId) -> Result<BTreeMap<String, ObjectId>> {
    let mut files = BTreeMap::new();
    flatten_into(store, tree_id, String::new(), &mut files)?;
    Ok(files)
}

fn flatten_into(
    store: &ObjectStore,
    tree_id: ObjectId,
    prefix: String,
    files: &mut BTreeMap<String, ObjectId>,
) -> Result<()> {
    let tree = store.get_tree(tree_id)?;

    for entry in &tree.entries {
        let path = if prefix.is_empty() {
            entry.name.clone()
        } else {
            format!("{}/{}", prefix, entry.name)
        };

        match entry.kind {
            TreeEntryKind::Blob => {
                files.insert(path, entry.id);
            }
            TreeEntryKind::Tree => {
                flatten_into(store, entry.id, path, files)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ObjectStore) {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(HISTORY_DIR)).unwrap();
        let store = ObjectStore::new(tmp.path().join(HISTORY_DIR).join("objects"));
        (tmp, store)
    }

    #[test]
    fn test_snapshot_skips_history_dir() {
        let (tmp, store) = setup();

        fs::write(tmp.path().join("a.txt"), "alpha").unwrap();
        fs::write(tmp.path().join(HISTORY_DIR).join("HEAD"), "ref: master").unwrap();

        let tree_id = snapshot(tmp.path(), &store).unwrap();
        let files = flatten(&store, tree_id).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files.contains_key("a.txt"));
    }

    #[test]
    fn test_snapshot_nested_dirs() {
        let (tmp, store) = setup();

        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::write(tmp.path().join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(tmp.path().join("README.md"), "# demo").unwrap();

        let tree_id = snapshot(tmp.path(), &store).unwrap();
        let files = flatten(&store, tree_id).unwrap();

        let paths: Vec<_> = files.keys().cloned().collect();
        assert_eq!(paths, vec!["README.md".to_string(), "src/main.rs".to_string()]);
    }

    #[test]
    fn test_snapshot_deterministic() {
        let (tmp, store) = setup();

        fs::write(tmp.path().join("a.txt"), "same").unwrap();

        let id1 = snapshot(tmp.path(), &store).unwrap();
        let id2 = snapshot(tmp.path(), &store).unwrap();
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_materialize_roundtrip() {
        let (tmp, store) = setup();

        fs::create_dir_all(tmp.path().join("docs")).unwrap();
        fs::write(tmp.path().join("docs/notes.md"), "notes").unwrap();
        fs::write(tmp.path().join("top.txt"), "top").unwrap();

        let tree_id = snapshot(tmp.path(), &store).unwrap();

        // Mutate the working area, then restore the snapshot.
        fs::write(tmp.path().join("stray.txt"), "uncommitted").unwrap();
        fs::remove_file(tmp.path().join("top.txt")).unwrap();

        materialize(tmp.path(), &store, tree_id).unwrap();

        assert_eq!(
            fs::read_to_string(tmp.path().join("docs/notes.md")).unwrap(),
            "notes"
        );
        assert_eq!(fs::read_to_string(tmp.path().join("top.txt")).unwrap(), "top");
        assert!(!tmp.path().join("stray.txt").exists());
        // History directory untouched.
        assert!(tmp.path().join(HISTORY_DIR).exists());
    }

    #[test]
    fn test_changed_content_changes_tree_id() {
        let (tmp, store) = setup();

        fs::write(tmp.path().join("f.txt"), "one").unwrap();
        let id1 = snapshot(tmp.path(), &store).unwrap();

        fs::write(tmp.path().join("f.txt"), "two").unwrap();
        let id2 = snapshot(tmp.path(), &store).unwrap();

        assert_ne!(id1, id2);
    }
}
