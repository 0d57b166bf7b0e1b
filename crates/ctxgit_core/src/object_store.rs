//! Content-addressed object storage with integrity verification.

use crate::error::{CtxGitError, Result};
use crate::object_id::{canonical_bytes, ObjectId, ObjectKind, MAGIC};
use crate::types::{Commit, Tree};
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Maximum size for a single blob object (100 MB).
/// This prevents OOM from pathologically large tracked files.
const MAX_BLOB_SIZE: usize = 100 * 1024 * 1024;

/// Zstd compression level for object storage.
const COMPRESSION_LEVEL: i32 = 3;

/// Content-addressed object storage for blobs, trees, and commits.
///
/// Objects are stored as zstd-compressed files with integrity verification.
/// The file path is derived from the object's BLAKE3 hash, enabling
/// deduplication and corruption detection.
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    /// Creates a new ObjectStore at the given root directory.
    ///
    /// The directory is created lazily on first write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Returns the root directory of this object store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stores raw file contents and returns their content-addressed ID.
    ///
    /// If an object with the same content already exists, this is a no-op
    /// and returns the existing ID (deduplication).
    pub fn put_blob(&self, data: &[u8]) -> Result<ObjectId> {
        if data.len() > MAX_BLOB_SIZE {
            return Err(CtxGitError::BlobTooLarge {
                size: data.len(),
                limit: MAX_BLOB_SIZE,
            });
        }

        let id = ObjectId::hash(ObjectKind::Blob, data);
        if self.exists(id) {
            return Ok(id);
        }

        self.write_object(id, &canonical_bytes(ObjectKind::Blob, data))?;
        Ok(id)
    }

    /// Retrieves raw file contents by their content ID.
    ///
    /// # Errors
    ///
    /// Returns `ObjectNotFound` if the object doesn't exist,
    /// `HashMismatch` if integrity verification fails, or
    /// `CorruptedObject` when the envelope kind is not a blob.
    pub fn get_blob(&self, id: ObjectId) -> Result<Vec<u8>> {
        let (kind, payload) = self.read_object(id)?;
        self.expect_kind(id, kind, ObjectKind::Blob)?;
        Ok(payload)
    }

    /// Stores a tree snapshot.
    pub fn put_tree(&self, tree: &Tree) -> Result<ObjectId> {
        self.put_typed(ObjectKind::Tree, tree)
    }

    /// Retrieves a tree snapshot by ID.
    pub fn get_tree(&self, id: ObjectId) -> Result<Tree> {
        let (kind, payload) = self.read_object(id)?;
        self.expect_kind(id, kind, ObjectKind::Tree)?;
        self.decode(&payload)
    }

    /// Stores a commit.
    pub fn put_commit(&self, commit: &Commit) -> Result<ObjectId> {
        self.put_typed(ObjectKind::Commit, commit)
    }

    /// Retrieves a commit by ID.
    pub fn get_commit(&self, id: ObjectId) -> Result<Commit> {
        let (kind, payload) = self.read_object(id)?;
        self.expect_kind(id, kind, ObjectKind::Commit)?;
        self.decode(&payload)
    }

    /// Checks whether the object with this ID is a commit.
    ///
    /// Used by revision resolution to reject ids that point at blobs or
    /// trees without paying a full decode.
    pub fn is_commit(&self, id: ObjectId) -> bool {
        matches!(self.read_object(id), Ok((ObjectKind::Commit, _)))
    }

    /// Checks if an object exists in the store.
    pub fn exists(&self, id: ObjectId) -> bool {
        self.object_path(id).exists()
    }

    /// Finds the unique object whose hex id starts with `prefix`.
    ///
    /// Returns `Ok(None)` when no object matches or the prefix is
    /// ambiguous; prefixes shorter than a shard (2 chars) never match.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Option<ObjectId>> {
        if prefix.len() < 2 || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(None);
        }

        let shard_dir = self.root.join(&prefix[..2]);
        if !shard_dir.is_dir() {
            return Ok(None);
        }

        let mut found = None;
        for entry in fs::read_dir(&shard_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            // Skip temp files from interrupted writes.
            if !name.starts_with(prefix) || name.len() != ObjectId::HEX_LEN {
                continue;
            }
            if found.is_some() {
                return Ok(None); // ambiguous
            }
            found = Some(ObjectId::from_hex(name)?);
        }

        Ok(found)
    }

    /// Serializes and stores a typed object using deterministic encoding.
    fn put_typed<T: Serialize>(&self, kind: ObjectKind, value: &T) -> Result<ObjectId> {
        let serialized =
            postcard::to_allocvec(value).map_err(|e| CtxGitError::Serialization(e.to_string()))?;

        let id = ObjectId::hash(kind, &serialized);
        if self.exists(id) {
            return Ok(id);
        }

        self.write_object(id, &canonical_bytes(kind, &serialized))?;
        Ok(id)
    }

    fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T> {
        postcard::from_bytes(payload).map_err(|e| CtxGitError::Deserialization(e.to_string()))
    }

    fn expect_kind(&self, id: ObjectId, got: ObjectKind, want: ObjectKind) -> Result<()> {
        if got != want {
            return Err(CtxGitError::CorruptedObject {
                path: self.object_path(id),
                reason: format!("expected {:?}, got {:?}", want, got),
            });
        }
        Ok(())
    }

    /// Computes the filesystem path for an object.
    fn object_path(&self, id: ObjectId) -> PathBuf {
        self.root.join(id.shard()).join(id.as_hex())
    }

    /// Writes compressed canonical bytes to disk atomically.
    fn write_object(&self, id: ObjectId, canonical: &[u8]) -> Result<()> {
        let path = self.object_path(id);
        let dir = path.parent().unwrap();

        fs::create_dir_all(dir)?;

        let compressed = zstd::encode_all(canonical, COMPRESSION_LEVEL)
            .map_err(|e| CtxGitError::Compression(e.to_string()))?;

        // Atomic write: temp file + fsync + rename
        let tmp_path = path.with_extension("tmp");

        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(&compressed)?;
            file.sync_all()?;
        }

        fs::rename(&tmp_path, &path)?;

        // fsync parent directory (Unix-specific for crash safety)
        #[cfg(unix)]
        {
            if let Ok(dir_file) = File::open(dir) {
                let _ = dir_file.sync_all();
            }
        }

        Ok(())
    }

    /// Reads and verifies an object from disk.
    fn read_object(&self, id: ObjectId) -> Result<(ObjectKind, Vec<u8>)> {
        let path = self.object_path(id);

        if !path.exists() {
            return Err(CtxGitError::ObjectNotFound(id.as_hex()));
        }

        let compressed = fs::read(&path)?;

        let canonical = zstd::decode_all(compressed.as_slice())
            .map_err(|e| CtxGitError::Compression(e.to_string()))?;

        if canonical.len() < 14 {
            return Err(CtxGitError::CorruptedObject {
                path,
                reason: "object too small".to_string(),
            });
        }

        if &canonical[..5] != MAGIC {
            return Err(CtxGitError::CorruptedObject {
                path,
                reason: "invalid magic bytes".to_string(),
            });
        }

        let kind = ObjectKind::from_byte(canonical[5]).ok_or_else(|| {
            CtxGitError::CorruptedObject {
                path: self.object_path(id),
                reason: format!("unknown kind: {}", canonical[5]),
            }
        })?;

        let len = u64::from_le_bytes(canonical[6..14].try_into().unwrap()) as usize;
        let payload = &canonical[14..];

        if payload.len() != len {
            return Err(CtxGitError::CorruptedObject {
                path,
                reason: format!(
                    "length mismatch: header says {}, got {}",
                    len,
                    payload.len()
                ),
            });
        }

        let expected = ObjectId::hash(kind, payload);
        if expected != id {
            return Err(CtxGitError::HashMismatch {
                expected: id.as_hex(),
                actual: expected.as_hex(),
            });
        }

        Ok((kind, payload.to_vec()))
    }
}
