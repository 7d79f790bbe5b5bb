use crate::common::{Session, UserProfile};
use crate::error::AuthError;
use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

const ACCESS_TOKEN_KEY: &str = "access_token";
const REFRESH_TOKEN_KEY: &str = "refresh_token";
const PROFILE_KEY: &str = "user";

const APP_DIR: &str = "rentctl";
const SESSION_FILE: &str = "session.json";

/// Durable home of the session triple.
///
/// `load` never fails: anything unreadable is reported as "no session". The
/// access token is only ever rewritten through `update_access_token`; the full
/// triple only through `save` and `clear`.
pub trait CredentialStore: Send + Sync {
    /// Overwrite all three entries
    fn save(
        &self,
        access_token: SecretString,
        refresh_token: SecretString,
        profile: Option<UserProfile>,
    ) -> Result<(), AuthError>;

    fn load(&self) -> Option<Session>;

    /// Remove all entries. Calling it on an empty store is not an error.
    fn clear(&self) -> Result<(), AuthError>;

    /// Replace the access token, leaving the refresh token and profile as they are
    fn update_access_token(&self, access_token: SecretString) -> Result<(), AuthError>;

    /// Replace the cached profile, leaving both tokens as they are
    fn update_profile(&self, profile: UserProfile) -> Result<(), AuthError>;
}

/// Credential store backed by a JSON file of string entries
pub struct FileCredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Store in the user's cache directory
    pub fn new() -> Result<Self, AuthError> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| AuthError::Configuration("Could not find cache directory".to_string()))?
            .join(APP_DIR);

        Self::at(cache_dir.join(SESSION_FILE))
    }

    pub fn at(path: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    AuthError::TokenStorage(format!("Failed to create session directory: {}", e))
                })?;
            }
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Option<BTreeMap<String, String>>, AuthError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)?;

        let entries: BTreeMap<String, String> = serde_json::from_str(&json)?;
        Ok(Some(entries))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(entries)?;

        // Write next to the target and rename so readers never see half a file
        let tmp_path = self.path.with_extension("json.tmp");
        let written = write_owner_only(&tmp_path, json.as_bytes())
            .map_err(AuthError::from)
            .and_then(|()| {
                fs::rename(&tmp_path, &self.path).map_err(|e| {
                    AuthError::TokenStorage(format!("Failed to replace session file: {}", e))
                })
            });

        if written.is_err() && tmp_path.exists() {
            if let Err(e) = fs::remove_file(&tmp_path) {
                tracing::warn!(path = %tmp_path.display(), "Could not remove temporary session file: {}", e);
            }
        }
        written
    }

    /// Read-modify-write of an existing session; does nothing without one
    fn modify<F>(&self, update: F) -> Result<(), AuthError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> Result<(), AuthError>,
    {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(mut entries) = self.read_entries()? else {
            tracing::debug!("No stored session to update");
            return Ok(());
        };
        if !entries.contains_key(REFRESH_TOKEN_KEY) {
            tracing::debug!("Stored session has no refresh token, skipping update");
            return Ok(());
        }

        update(&mut entries)?;
        self.write_entries(&entries)
    }
}

/// Create `path` readable by the owner only (0600 on unix) and fill it.
/// A leftover file at `path` is replaced, never reused.
fn write_owner_only(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

impl CredentialStore for FileCredentialStore {
    fn save(
        &self,
        access_token: SecretString,
        refresh_token: SecretString,
        profile: Option<UserProfile>,
    ) -> Result<(), AuthError> {
        let mut entries = BTreeMap::new();
        entries.insert(
            ACCESS_TOKEN_KEY.to_string(),
            access_token.expose_secret().to_string(),
        );
        entries.insert(
            REFRESH_TOKEN_KEY.to_string(),
            refresh_token.expose_secret().to_string(),
        );
        if let Some(profile) = profile {
            entries.insert(PROFILE_KEY.to_string(), serde_json::to_string(&profile)?);
        }

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.write_entries(&entries)?;
        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn load(&self) -> Option<Session> {
        let entries = match self.read_entries() {
            Ok(Some(entries)) => entries,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Ignoring unreadable session: {}", e);
                return None;
            }
        };

        let (Some(access), Some(refresh)) = (
            entries.get(ACCESS_TOKEN_KEY),
            entries.get(REFRESH_TOKEN_KEY),
        ) else {
            tracing::warn!(path = %self.path.display(), "Ignoring session without both tokens");
            return None;
        };

        let profile = entries
            .get(PROFILE_KEY)
            .and_then(|raw| match serde_json::from_str::<UserProfile>(raw) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!("Ignoring unreadable cached profile: {}", e);
                    None
                }
            });

        Some(Session::new(access.clone(), refresh.clone(), profile))
    }

    fn clear(&self) -> Result<(), AuthError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            tracing::debug!(path = %self.path.display(), "Session cleared");
        }
        Ok(())
    }

    fn update_access_token(&self, access_token: SecretString) -> Result<(), AuthError> {
        self.modify(|entries| {
            entries.insert(
                ACCESS_TOKEN_KEY.to_string(),
                access_token.expose_secret().to_string(),
            );
            Ok(())
        })
    }

    fn update_profile(&self, profile: UserProfile) -> Result<(), AuthError> {
        self.modify(|entries| {
            entries.insert(PROFILE_KEY.to_string(), serde_json::to_string(&profile)?);
            Ok(())
        })
    }
}

/// Credential store that lives as long as the process
#[derive(Default)]
pub struct MemoryCredentialStore {
    session: RwLock<Option<Session>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(
        &self,
        access_token: SecretString,
        refresh_token: SecretString,
        profile: Option<UserProfile>,
    ) -> Result<(), AuthError> {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        *session = Some(Session {
            access_token,
            refresh_token,
            profile,
        });
        Ok(())
    }

    fn load(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear(&self) -> Result<(), AuthError> {
        self.session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }

    fn update_access_token(&self, access_token: SecretString) -> Result<(), AuthError> {
        if let Some(session) = self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            session.access_token = access_token;
        }
        Ok(())
    }

    fn update_profile(&self, profile: UserProfile) -> Result<(), AuthError> {
        if let Some(session) = self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            session.profile = Some(profile);
        }
        Ok(())
    }
}
