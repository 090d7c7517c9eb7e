use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{debug, instrument, warn};

use crate::crypto::cipher::{decrypt, encrypt};
use crate::crypto::kdf::{KeyDeriver, StaticPassphrase};
use crate::error::TokenVaultError;
use crate::format::atomic_write;
use crate::location::StorageLocation;

/// A handle to the single encrypted token slot.
///
/// The token is stored as one AES-128-GCM blob at the path described by a
/// [`StorageLocation`]. The key comes from a [`KeyDeriver`] and is derived
/// again on every call; nothing is cached between operations.
///
/// # Example
///
/// ```no_run
/// use tokenvault::CredentialStore;
///
/// let store: CredentialStore = CredentialStore::default();
/// store.save_token("abc123").unwrap();
/// assert_eq!(store.get_token().unwrap().as_deref(), Some("abc123"));
/// store.delete_token().unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct CredentialStore<K = StaticPassphrase> {
    location: StorageLocation,
    deriver: K,
}

impl<K: KeyDeriver> CredentialStore<K> {
    /// No I/O is performed here; the directory is created on first use.
    pub fn new(location: StorageLocation, deriver: K) -> Self {
        Self { location, deriver }
    }

    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    /// Resolved token file path. Creates the app directory if needed.
    pub fn path(&self) -> Result<PathBuf, TokenVaultError> {
        self.location.resolve()
    }

    /// Whether a token file is present. Does not decrypt it.
    pub fn has_token(&self) -> Result<bool, TokenVaultError> {
        Ok(self.location.resolve()?.is_file())
    }

    /// Encrypt `token` and replace whatever was stored before.
    #[instrument(skip_all, fields(path))]
    pub fn save_token(&self, token: &str) -> Result<(), TokenVaultError> {
        let path = self.location.resolve()?;
        tracing::Span::current().record("path", tracing::field::display(path.display()));

        let key = self.deriver.derive_key()?;
        let blob = encrypt(token.as_bytes(), &key)?;
        atomic_write(&path, &blob)?;

        Ok(())
    }

    /// Read and decrypt the stored token. `None` means nothing has been saved.
    #[instrument(skip_all, fields(path))]
    pub fn get_token(&self) -> Result<Option<String>, TokenVaultError> {
        let path = self.location.resolve()?;
        tracing::Span::current().record("path", tracing::field::display(path.display()));

        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no token stored");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let key = self.deriver.derive_key()?;
        let plaintext = decrypt(&raw, &key).inspect_err(|err| {
            warn!(error = %err, bytes = raw.len(), "stored token could not be decrypted");
        })?;

        let token = String::from_utf8(plaintext.to_vec())?;
        Ok(Some(token))
    }

    /// Remove the stored token. Succeeds if there was none.
    #[instrument(skip_all, fields(path))]
    pub fn delete_token(&self) -> Result<(), TokenVaultError> {
        let path = self.location.resolve()?;
        tracing::Span::current().record("path", tracing::field::display(path.display()));

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("token removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
