use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

use crate::errors::CoreError;
use crate::models::credential::Credential;

use super::cipher::{random_bytes, KdfParams, SessionKey, SALT_LEN};
use super::envelope::{SessionEnvelope, CURRENT_VERSION};

/// Where the feed credential lives between invocations.
///
/// Injected into [`crate::PortfolioFeed`]; the analytic engine never sees it.
pub trait SessionStore: Send + Sync {
    /// The saved credential, or `None` when logged out.
    fn load(&self) -> Result<Option<Credential>, CoreError>;

    fn save(&self, credential: &Credential) -> Result<(), CoreError>;

    /// Forget the credential. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), CoreError>;
}

/// Plaintext payload sealed inside a session file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

impl StoredSession {
    /// Encrypt into envelope bytes.
    ///
    /// Flow: StoredSession → bincode → AES-256-GCM(Argon2id(passphrase)) → PLSS bytes
    pub fn seal(&self, passphrase: &str, kdf_params: KdfParams) -> Result<Vec<u8>, CoreError> {
        let plaintext = bincode::serialize(self)
            .map_err(|e| CoreError::Serialization(format!("failed to serialize session: {e}")))?;

        let salt = random_bytes::<SALT_LEN>()?;
        let key = SessionKey::derive(passphrase, &salt, &kdf_params)?;
        let (nonce, ciphertext) = key.seal(&plaintext)?;

        Ok(SessionEnvelope {
            version: CURRENT_VERSION,
            kdf_params,
            salt,
            nonce,
            ciphertext,
        }
        .to_bytes())
    }

    /// Inverse of [`StoredSession::seal`].
    pub fn open(data: &[u8], passphrase: &str) -> Result<Self, CoreError> {
        let envelope = SessionEnvelope::from_bytes(data)?;
        let key = SessionKey::derive(passphrase, &envelope.salt, &envelope.kdf_params)?;
        let plaintext = key.open(&envelope.nonce, &envelope.ciphertext)?;
        bincode::deserialize(&plaintext)
            .map_err(|e| CoreError::Deserialization(format!("failed to read session payload: {e}")))
    }
}

/// Session kept in an encrypted file on disk.
pub struct EncryptedFileSessionStore {
    path: PathBuf,
    passphrase: String,
    kdf_params: KdfParams,
}

impl std::fmt::Debug for EncryptedFileSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedFileSessionStore")
            .field("path", &self.path)
            .field("kdf_params", &self.kdf_params)
            .finish()
    }
}

impl EncryptedFileSessionStore {
    pub fn new(path: impl Into<PathBuf>, passphrase: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            passphrase: passphrase.into(),
            kdf_params: KdfParams::default(),
        }
    }

    /// Override the Argon2 cost used for new saves.
    pub fn with_kdf_params(mut self, kdf_params: KdfParams) -> Self {
        self.kdf_params = kdf_params;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SessionStore for EncryptedFileSessionStore {
    fn load(&self) -> Result<Option<Credential>, CoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no session file");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let stored = StoredSession::open(&bytes, &self.passphrase)?;
        debug!(saved_at = %stored.saved_at, "session loaded");
        Credential::from_token(stored.token).map(Some)
    }

    fn save(&self, credential: &Credential) -> Result<(), CoreError> {
        let stored = StoredSession {
            token: credential.token().to_string(),
            saved_at: Utc::now(),
        };
        let bytes = stored.seal(&self.passphrase, self.kdf_params)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, bytes)?;
        restrict_permissions(&self.path)?;

        info!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), CoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), CoreError> {
    Ok(())
}

/// Session held in memory only; lost when the process exits.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    credential: Mutex<Option<Credential>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts logged in.
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: Mutex::new(Some(credential)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Credential>, CoreError> {
        let guard = self.credential.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    fn save(&self, credential: &Credential) -> Result<(), CoreError> {
        let mut guard = self.credential.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        let mut guard = self.credential.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        Ok(())
    }
}
