use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenVaultError {
    /// The platform could not tell us where per-user configuration lives.
    #[error("no user configuration directory available on this platform")]
    ConfigDirUnavailable,

    #[error("cannot create storage directory {}: {source}", .path.display())]
    StorageDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Encryption error: {0}")]
    EncryptionError(String),

    /// The blob is too short to even hold a nonce.
    #[error("malformed token blob: {len} bytes (minimum is {min})")]
    MalformedBlob { len: usize, min: usize },

    /// AES-GCM tag did not verify: wrong key, tampered or truncated file.
    /// Intentionally vague to avoid leaking information.
    #[error("Decryption failed: wrong key or corrupted token file")]
    DecryptionFailed,

    #[error("Key derivation error: {0}")]
    KdfError(String),

    #[error("stored token is not valid UTF-8: {0}")]
    InvalidToken(#[from] FromUtf8Error),
}
