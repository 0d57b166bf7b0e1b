//! Textual line diffs between two snapshots.

use crate::error::Result;
use crate::worktree;
use crate::{ObjectId, ObjectStore};
use similar::TextDiff;
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Number of unchanged context lines around each hunk.
const CONTEXT_RADIUS: usize = 3;

/// Produces a unified line diff between two tree snapshots.
///
/// Files are compared by blob id first, so unchanged files cost nothing.
/// Returns an empty string when the snapshots are identical.
pub fn diff_trees(store: &ObjectStore, from: ObjectId, to: ObjectId) -> Result<String> {
    if from == to {
        return Ok(String::new());
    }

    let old_files = worktree::flatten(store, from)?;
    let new_files = worktree::flatten(store, to)?;

    let paths: BTreeSet<&String> = old_files.keys().chain(new_files.keys()).collect();

    let mut output = String::new();
    for path in paths {
        let old_id = old_files.get(path);
        let new_id = new_files.get(path);

        if old_id == new_id {
            continue;
        }

        let old_text = read_text(store, old_id)?;
        let new_text = read_text(store, new_id)?;

        output.push_str(&format_file_diff(path, &old_text, &new_text, old_id, new_id));
    }

    Ok(output)
}

fn read_text(store: &ObjectStore, id: Option<&ObjectId>) -> Result<String> {
    match id {
        Some(id) => {
            let bytes = store.get_blob(*id)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        None => Ok(String::new()),
    }
}

fn format_file_diff(
    path: &str,
    old_text: &str,
    new_text: &str,
    old_id: Option<&ObjectId>,
    new_id: Option<&ObjectId>,
) -> String {
    let old_label = if old_id.is_some() {
        format!("a/{}", path)
    } else {
        "/dev/null".to_string()
    };
    let new_label = if new_id.is_some() {
        format!("b/{}", path)
    } else {
        "/dev/null".to_string()
    };

    let mut out = format!("diff --ctxgit a/{} b/{}\n", path, path);

    let diff = TextDiff::from_lines(old_text, new_text);
    let _ = write!(
        out,
        "{}",
        diff.unified_diff()
            .context_radius(CONTEXT_RADIUS)
            .header(&old_label, &new_label)
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Tree, TreeEntry, TreeEntryKind};
    use tempfile::TempDir;

    fn store() -> (TempDir, ObjectStore) {
        let tmp = TempDir::new().unwrap();
        let store = ObjectStore::new(tmp.path().join("objects"));
        (tmp, store)
    }

    fn tree_with(store: &ObjectStore, files: &[(&str, &str)]) -> ObjectId {
        let entries = files
            .iter()
            .map(|(name, content)| TreeEntry {
                name: name.to_string(),
                kind: TreeEntryKind::Blob,
                id: store.put_blob(content.as_bytes()).unwrap(),
            })
            .collect();
        store.put_tree(&Tree::new(entries)).unwrap()
    }

    #[test]
    fn test_identical_trees_empty_diff() {
        let (_tmp, store) = store();

        let t = tree_with(&store, &[("a.txt", "same\n")]);
        assert_eq!(diff_trees(&store, t, t).unwrap(), "");
    }

    #[test]
    fn test_modified_file() {
        let (_tmp, store) = store();

        let t1 = tree_with(&store, &[("a.txt", "line one\nline two\n")]);
        let t2 = tree_with(&store, &[("a.txt", "line one\nline 2\n")]);

        let diff = diff_trees(&store, t1, t2).unwrap();
        assert!(diff.contains("diff --ctxgit a/a.txt b/a.txt"));
        assert!(diff.contains("--- a/a.txt"));
        assert!(diff.contains("+++ b/a.txt"));
        assert!(diff.contains("-line two"));
        assert!(diff.contains("+line 2"));
    }

    #[test]
    fn test_added_file_uses_dev_null() {
        let (_tmp, store) = store();

        let t1 = tree_with(&store, &[]);
        let t2 = tree_with(&store, &[("new.txt", "fresh\n")]);

        let diff = diff_trees(&store, t1, t2).unwrap();
        assert!(diff.contains("--- /dev/null"));
        assert!(diff.contains("+++ b/new.txt"));
        assert!(diff.contains("+fresh"));
    }

    #[test]
    fn test_deleted_file_uses_dev_null() {
        let (_tmp, store) = store();

        let t1 = tree_with(&store, &[("old.txt", "gone\n")]);
        let t2 = tree_with(&store, &[]);

        let diff = diff_trees(&store, t1, t2).unwrap();
        assert!(diff.contains("--- a/old.txt"));
        assert!(diff.contains("+++ /dev/null"));
        assert!(diff.contains("-gone"));
    }

    #[test]
    fn test_unchanged_files_not_mentioned() {
        let (_tmp, store) = store();

        let t1 = tree_with(&store, &[("same.txt", "stable\n"), ("f.txt", "one\n")]);
        let t2 = tree_with(&store, &[("same.txt", "stable\n"), ("f.txt", "two\n")]);

        let diff = diff_trees(&store, t1, t2).unwrap();
        assert!(!diff.contains("same.txt"));
        assert!(diff.contains("f.txt"));
    }
}
