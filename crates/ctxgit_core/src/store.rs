//! Filesystem-backed collection of independent repositories.
//!
//! Maps opaque repository ids to directories under a data root. Each
//! repository directory holds its own `.ctxgit/` history, a tracked
//! metadata file with the display name, and the tracked context document.

use crate::context;
use crate::error::{CtxGitError, Result};
use crate::types::RepoInfo;
use crate::vcs::{VcsRepo, HISTORY_DIR};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tracked metadata file holding the display name and creation time.
pub const META_FILE: &str = ".ctxgit.toml";

/// Fixed message of the single commit performed at creation.
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit: create context repo";

/// Length of generated repository ids (hex chars of a v4 UUID).
const ID_LEN: usize = 8;

/// Attempts at id generation before giving up on collisions.
const ID_ATTEMPTS: usize = 8;

/// Attempts at recursive deletion with permission clearing in between.
const DELETE_ATTEMPTS: usize = 3;

/// Tracked repository metadata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RepoMeta {
    /// Display name.
    pub name: String,
    /// Creation timestamp, RFC 3339.
    pub created: String,
}

/// Store of repositories under one data directory.
pub struct RepoStore {
    data_dir: PathBuf,
    author: String,
}

impl RepoStore {
    /// Opens (and creates if needed) a store rooted at `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;

        Ok(Self {
            data_dir,
            author: "ctxgit".to_string(),
        })
    }

    /// Sets the author recorded on commits made through this store.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Returns the store root.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Maps an id to its repository directory.
    ///
    /// # Errors
    ///
    /// Returns `RepoNotFound` when no directory exists at the expected
    /// location or it lacks version-control history.
    pub fn resolve(&self, id: &str) -> Result<PathBuf> {
        // Ids never contain separators or dots; anything else can't name
        // a repository and must not escape the data root.
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CtxGitError::RepoNotFound(id.to_string()));
        }

        let path = self.data_dir.join(id);
        if !path.is_dir() || !path.join(HISTORY_DIR).is_dir() {
            return Err(CtxGitError::RepoNotFound(id.to_string()));
        }

        Ok(path)
    }

    /// Opens the version-control engine for a repository.
    pub fn open(&self, id: &str) -> Result<VcsRepo> {
        let path = self.resolve(id)?;
        Ok(VcsRepo::open(path)?.with_author(self.author.as_str()))
    }

    /// Creates a repository: allocates an id, initializes history, writes
    /// the metadata file and the default context document, and performs
    /// the single initial commit.
    pub fn create(&self, name: &str) -> Result<RepoInfo> {
        let (id, path) = self.allocate_id()?;
        fs::create_dir(&path)?;

        let repo = VcsRepo::init(&path)?.with_author(self.author.as_str());

        let meta = RepoMeta {
            name: name.to_string(),
            created: Utc::now().to_rfc3339(),
        };
        let meta_text = toml::to_string_pretty(&meta)
            .map_err(|e| CtxGitError::Metadata(e.to_string()))?;
        repo.write_file(META_FILE, &meta_text)?;

        context::init(&repo)?;

        repo.commit_all(INITIAL_COMMIT_MESSAGE)?;

        self.info_for(&id, &repo)
    }

    /// Builds caller-facing info for a repository.
    pub fn get_info(&self, id: &str) -> Result<RepoInfo> {
        let repo = self.open(id)?;
        self.info_for(id, &repo)
    }

    /// Enumerates valid repositories, sorted by id.
    ///
    /// Entries that are not directories, start with a dot, or lack valid
    /// history are skipped silently: partial or corrupt state is
    /// filtered out rather than surfaced as an error.
    pub fn list(&self) -> Result<Vec<RepoInfo>> {
        let mut repos = Vec::new();

        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            let path = entry.path();
            let Some(id) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if !path.is_dir() || id.starts_with('.') {
                continue;
            }
            if !path.join(HISTORY_DIR).is_dir() {
                continue;
            }

            match self.get_info(id) {
                Ok(info) => repos.push(info),
                Err(e) => {
                    debug!(id = id, error = %e, "skipping unreadable repository");
                }
            }
        }

        repos.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(repos)
    }

    /// Recursively and irreversibly removes a repository.
    ///
    /// Object files are written once and may carry read-only permissions;
    /// removal clears permissions on the offending paths and retries
    /// rather than aborting with partial state.
    pub fn delete(&self, id: &str) -> Result<()> {
        let path = self.resolve(id)?;
        remove_dir_all_robust(&path)
    }

    fn allocate_id(&self) -> Result<(String, PathBuf)> {
        for _ in 0..ID_ATTEMPTS {
            let id = uuid::Uuid::new_v4().simple().to_string()[..ID_LEN].to_string();
            let path = self.data_dir.join(&id);
            if !path.exists() {
                return Ok((id, path));
            }
        }

        Err(CtxGitError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "could not allocate a unique repository id",
        )))
    }

    fn info_for(&self, id: &str, repo: &VcsRepo) -> Result<RepoInfo> {
        Ok(RepoInfo {
            id: id.to_string(),
            name: self.read_name(id, repo),
            current_branch: repo.current_branch()?,
            branches: repo.branches()?,
        })
    }

    /// Reads the display name from the metadata file, falling back to the
    /// id when the file is missing or unparseable.
    fn read_name(&self, id: &str, repo: &VcsRepo) -> String {
        match repo.read_file(META_FILE) {
            Ok(Some(raw)) => match toml::from_str::<RepoMeta>(&raw) {
                Ok(meta) => meta.name,
                Err(e) => {
                    debug!(id = id, error = %e, "unparseable metadata file");
                    id.to_string()
                }
            },
            _ => id.to_string(),
        }
    }
}

/// `remove_dir_all` that clears read-only permissions and retries.
fn remove_dir_all_robust(path: &Path) -> Result<()> {
    let mut last_err = None;

    for _ in 0..DELETE_ATTEMPTS {
        match fs::remove_dir_all(path) {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                clear_readonly_recursive(path)?;
                last_err = Some(e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(last_err
        .map(CtxGitError::Io)
        .unwrap_or_else(|| CtxGitError::RepoNotFound(path.display().to_string())))
}

fn clear_readonly_recursive(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    let mut perms = metadata.permissions();

    if perms.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
        fs::set_permissions(path, perms)?;
    }

    if metadata.is_dir() {
        for entry in fs::read_dir(path)? {
            clear_readonly_recursive(&entry?.path())?;
        }
    }

    Ok(())
}
