//! On-disk session storage.
//!
//! The session is a small JSON file holding the last issued token and the
//! user it belongs to. A missing file means "not logged in".

use std::{
    fs,
    path::{Path, PathBuf},
};

use api_types::{auth::AuthResponse, user::User};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

const DEFAULT_STORE_PATH: &str = "config/session.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

impl Session {
    pub fn from_response(response: &AuthResponse) -> Self {
        Self {
            token: response.token.clone(),
            expires_at: Utc::now() + Duration::seconds(response.expires_in),
            user: response.user.clone(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[derive(Debug)]
pub struct TokenStore {
    path: PathBuf,
    session: Option<Session>,
}

impl TokenStore {
    /// Open the store at `path`, loading any session saved there.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let session = match fs::read_to_string(&path) {
            Ok(content) => Some(serde_json::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, session })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session, unless it has expired.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref().filter(|session| !session.is_expired())
    }

    pub fn save(&mut self, session: Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(&session)?;
        write_private(&self.path, payload.as_bytes())?;
        self.session = Some(session);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.session = None;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Write `contents` readable by the owner only. The token is a bearer
/// credential.
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::{
        fs::{OpenOptions, Permissions},
        io::Write,
        os::unix::fs::{OpenOptionsExt, PermissionsExt},
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation.
    file.set_permissions(Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    fs::write(path, contents)
}

pub fn default_store_path() -> &'static str {
    DEFAULT_STORE_PATH
}
