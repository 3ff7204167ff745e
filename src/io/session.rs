use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::io::file_store::atomic_write;
use crate::remote::{AuthError, AuthService, UserId, validate_user_name};

const SESSION_FILE: &str = ".session.json";

/// Persisted sign-in session (written to .session.json)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserId,
    pub signed_in_at: DateTime<Utc>,
}

/// Read .session.json from the data directory. A session whose user name
/// would not pass sign-in is treated as no session.
pub fn read_session(data_dir: &Path) -> Option<Session> {
    let path = data_dir.join(SESSION_FILE);
    let content = fs::read_to_string(&path).ok()?;
    let session: Session = match serde_json::from_str(&content) {
        Ok(session) => session,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring malformed session file");
            return None;
        }
    };
    match validate_user_name(session.user.as_str()) {
        Ok(name) if name == session.user.as_str() => Some(session),
        _ => {
            warn!(
                path = %path.display(),
                user = %session.user,
                "ignoring session with invalid user name"
            );
            None
        }
    }
}

/// Write .session.json to the data directory
pub fn write_session(data_dir: &Path, session: &Session) -> Result<(), io::Error> {
    let path = data_dir.join(SESSION_FILE);
    let content = serde_json::to_string_pretty(session)?;
    atomic_write(&path, content.as_bytes())
}

/// Auth service backed by a session file in the data directory, so a
/// sign-in from the CLI carries over to the TUI and back.
#[derive(Debug, Clone)]
pub struct SessionAuth {
    data_dir: PathBuf,
    current: Option<UserId>,
}

impl SessionAuth {
    /// Restore whatever session is on disk
    pub fn open(data_dir: &Path) -> Self {
        SessionAuth {
            data_dir: data_dir.to_path_buf(),
            current: read_session(data_dir).map(|s| s.user),
        }
    }
}

impl AuthService for SessionAuth {
    fn sign_in(&mut self, name: &str) -> Result<UserId, AuthError> {
        let user = UserId::new(validate_user_name(name)?);
        fs::create_dir_all(&self.data_dir)?;
        write_session(
            &self.data_dir,
            &Session {
                user: user.clone(),
                signed_in_at: Utc::now(),
            },
        )
        .map_err(|e| AuthError::Session(e.to_string()))?;
        self.current = Some(user.clone());
        Ok(user)
    }

    fn sign_out(&mut self) -> Result<(), AuthError> {
        match fs::remove_file(self.data_dir.join(SESSION_FILE)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.current = None;
        Ok(())
    }

    fn current_user(&self) -> Option<UserId> {
        self.current.clone()
    }
}
