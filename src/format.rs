use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::crypto::cipher::{NONCE_SIZE, TAG_SIZE};
use crate::error::TokenVaultError;

/// Layout:
///   [12] nonce
///   [N]  ciphertext (N = plaintext length)
///   [16] GCM tag
///
/// No magic, no version byte: the token file has always been the bare blob.
pub const MIN_BLOB_SIZE: usize = NONCE_SIZE;

/// Size on disk of a blob holding `plaintext_len` bytes.
pub const fn blob_len(plaintext_len: usize) -> usize {
    NONCE_SIZE + plaintext_len + TAG_SIZE
}

/// Serialize nonce + sealed ciphertext into bytes.
pub fn encode(nonce: &[u8; NONCE_SIZE], sealed: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(NONCE_SIZE + sealed.len());
    buf.extend_from_slice(nonce);
    buf.extend_from_slice(sealed);
    buf
}

/// Split a blob into `(nonce, ciphertext || tag)`.
///
/// Only the nonce length is checked here; a missing or short tag is left for
/// AES-GCM to reject.
pub fn decode(data: &[u8]) -> Result<([u8; NONCE_SIZE], &[u8]), TokenVaultError> {
    if data.len() < MIN_BLOB_SIZE {
        return Err(TokenVaultError::MalformedBlob {
            len: data.len(),
            min: MIN_BLOB_SIZE,
        });
    }

    let (nonce_slice, sealed) = data.split_at(NONCE_SIZE);
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(nonce_slice);

    Ok((nonce, sealed))
}

/// Write token bytes to disk atomically, owner read/write only.
///
/// The parent directory must already exist.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<(), TokenVaultError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(parent)?;
    restrict_to_owner(tmp.as_file())?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;

    tmp.persist(path)
        .map_err(|e| TokenVaultError::IoError(e.error))?;

    debug!(path = %path.display(), bytes = data.len(), "token file written");
    Ok(())
}

#[cfg(unix)]
fn restrict_to_owner(file: &fs::File) -> Result<(), TokenVaultError> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_to_owner(_file: &fs::File) -> Result<(), TokenVaultError> {
    Ok(())
}
