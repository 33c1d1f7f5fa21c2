//! Bearer token kept between CLI invocations.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::LoginGrant;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session file {path} could not be written: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("session could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    Admin,
    Student,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub role: SessionRole,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: Option<String>,
    pub saved_at: DateTime<Utc>,
}

/// File-backed token storage, readable by the owner only on Unix.
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

    /// The saved session, if any. Unreadable files count as signed out.
    pub fn load(&self) -> Option<StoredSession> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "session file unreadable");
                return None;
            }
        };

        match serde_json::from_str::<StoredSession>(&raw) {
            Ok(session) if !session.access_token.trim().is_empty() => Some(session),
            Ok(_) => None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "session file is corrupt");
                None
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        self.load().map(|session| session.access_token)
    }

    pub fn save(&self, role: SessionRole, grant: &LoginGrant) -> Result<StoredSession, SessionError> {
        let session = StoredSession {
            role,
            access_token: grant.access_token.clone(),
            token_type: grant.token_type.clone(),
            expires_in: grant.expires_in.clone(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&session)?;
        self.write_private(json.as_bytes())
            .map_err(|source| SessionError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), "session saved");
        Ok(session)
    }

    /// Forget the token. Returns whether a session was present.
    pub fn clear(&self) -> bool {
        match fs::remove_file(&self.path) {
            Ok(()) => true,
            Err(err) if err.kind() == io::ErrorKind::NotFound => false,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "session file could not be removed");
                false
            }
        }
    }

    fn write_private(&self, contents: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        file.write_all(contents)?;
        file.sync_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(token: &str) -> LoginGrant {
        LoginGrant {
            access_token: token.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: Some("1h".to_string()),
        }
    }

    #[test]
    fn save_then_load_round_trips_token() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TokenStore::new(dir.path().join("nested").join("session.json"));

        assert!(store.load().is_none());
        store
            .save(SessionRole::Admin, &grant("tok-123"))
            .expect("session saved");

        let session = store.load().expect("session present");
        assert_eq!(session.role, SessionRole::Admin);
        assert_eq!(store.token().as_deref(), Some("tok-123"));
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let store = TokenStore::new(dir.path().join("session.json"));
        store
            .save(SessionRole::Student, &grant("tok"))
            .expect("session saved");

        let mode = fs::metadata(store.path()).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn corrupt_file_counts_as_signed_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").expect("write");

        let store = TokenStore::new(&path);
        assert!(store.load().is_none());
    }

    #[test]
    fn clear_reports_whether_a_session_existed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TokenStore::new(dir.path().join("session.json"));
        assert!(!store.clear());

        store
            .save(SessionRole::Admin, &grant("tok"))
            .expect("session saved");
        assert!(store.clear());
        assert!(store.token().is_none());
    }
}
