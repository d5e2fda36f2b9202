//! Session token store — the only state the client persists.
//!
//! One JSON file (`session.json` in the work directory) holding the bearer
//! token and the profile returned at login. A missing file means logged out;
//! a malformed file is an error rather than a silent logout.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::models::UserProfile;

/// On-disk shape of `session.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    #[serde(default)]
    pub user: UserProfile,
    pub saved_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(access_token: String, user: UserProfile) -> Self {
        Self { access_token, user, saved_at: Utc::now() }
    }
}

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<StoredSession>, AppError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::Auth(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )));
            }
        };
        let session = serde_json::from_str(&data)
            .map_err(|e| AppError::Auth(format!("malformed {}: {e}", self.path.display())))?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &StoredSession) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(session)
            .map_err(|e| AppError::Auth(format!("serialise session: {e}")))?;
        let write_err =
            |e: std::io::Error| AppError::Auth(format!("cannot write {}: {e}", self.path.display()));
        let mut file = owner_only()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(write_err)?;
        file.write_all(data.as_bytes()).map_err(write_err)?;
        restrict_permissions(&self.path)?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Remove the stored token. Returns `false` when there was nothing to remove.
    pub fn clear(&self) -> Result<bool, AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Auth(format!(
                "cannot remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

/// Open options that create the file readable by the owner only.
#[cfg(unix)]
fn owner_only() -> OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;
    let mut opts = OpenOptions::new();
    opts.mode(0o600);
    opts
}

#[cfg(not(unix))]
fn owner_only() -> OpenOptions {
    OpenOptions::new()
}

/// `mode` only applies on creation; a file left by an older run keeps its bits.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), AppError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), AppError> {
    Ok(())
}
