use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes128Gcm, Key, Nonce,
};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::crypto::kdf::EncryptionKey;
use crate::error::TokenVaultError;
use crate::format;

/// Nonce size in bytes. 12 bytes is the standard for AES-GCM (96-bit nonce).
pub const NONCE_SIZE: usize = 12;

/// GCM authentication tag appended to the ciphertext.
pub const TAG_SIZE: usize = 16;

/// Encrypt `plaintext` with AES-128-GCM under a fresh random nonce.
///
/// Returns the full blob: `nonce || ciphertext || tag`.
pub fn encrypt(plaintext: &[u8], key: &EncryptionKey) -> Result<Vec<u8>, TokenVaultError> {
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(|e| TokenVaultError::EncryptionError(e.to_string()))?;

    let cipher = Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(key.as_slice()));
    let nonce = Nonce::from_slice(&nonce_bytes);

    let sealed = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| TokenVaultError::EncryptionError(e.to_string()))?;

    Ok(format::encode(&nonce_bytes, &sealed))
}

/// Decrypt a blob produced by [`encrypt`].
pub fn decrypt(
    blob: &[u8],
    key: &EncryptionKey,
) -> Result<Zeroizing<Vec<u8>>, TokenVaultError> {
    let (nonce_bytes, sealed) = format::decode(blob)?;

    let cipher = Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(key.as_slice()));
    let nonce = Nonce::from_slice(&nonce_bytes);

    let plaintext = cipher
        .decrypt(nonce, sealed)
        .map_err(|_| TokenVaultError::DecryptionFailed)?;

    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::{FixedKey, KeyDeriver, StaticPassphrase, KEY_SIZE};
    use crate::format::blob_len;

    fn key() -> EncryptionKey {
        StaticPassphrase::default().derive_key().unwrap()
    }

    #[test]
    fn roundtrip_various_tokens() {
        let key = key();
        let long = "x".repeat(4096);
        for token in ["abc123", "", "tökén-日本語-🔑", long.as_str()] {
            let blob = encrypt(token.as_bytes(), &key).unwrap();
            assert_eq!(blob.len(), blob_len(token.len()));

            let plain = decrypt(&blob, &key).unwrap();
            assert_eq!(plain.as_slice(), token.as_bytes());
        }
    }

    #[test]
    fn same_plaintext_gives_different_blobs() {
        let key = key();
        let first = encrypt(b"same", &key).unwrap();
        let second = encrypt(b"same", &key).unwrap();

        assert_ne!(first, second);
        assert_ne!(&first[..NONCE_SIZE], &second[..NONCE_SIZE]);
        assert_eq!(decrypt(&first, &key).unwrap().as_slice(), b"same");
        assert_eq!(decrypt(&second, &key).unwrap().as_slice(), b"same");
    }

    #[test]
    fn any_flipped_byte_fails_authentication() {
        let key = key();
        let blob = encrypt(b"abc123", &key).unwrap();

        for i in 0..blob.len() {
            let mut tampered = blob.clone();
            tampered[i] ^= 0x01;
            let err = decrypt(&tampered, &key).unwrap_err();
            assert!(
                matches!(err, TokenVaultError::DecryptionFailed),
                "byte {i}: expected DecryptionFailed, got: {err}"
            );
        }
    }

    #[test]
    fn truncated_tag_fails_authentication() {
        let key = key();
        let blob = encrypt(b"abc123", &key).unwrap();

        for len in NONCE_SIZE..blob.len() {
            let err = decrypt(&blob[..len], &key).unwrap_err();
            assert!(matches!(err, TokenVaultError::DecryptionFailed));
        }
    }

    #[test]
    fn shorter_than_nonce_is_malformed() {
        let key = key();
        let blob = encrypt(b"abc123", &key).unwrap();

        let err = decrypt(&blob[..NONCE_SIZE - 1], &key).unwrap_err();
        assert!(matches!(
            err,
            TokenVaultError::MalformedBlob { len: 11, min: NONCE_SIZE }
        ));

        let err = decrypt(&[], &key).unwrap_err();
        assert!(matches!(err, TokenVaultError::MalformedBlob { len: 0, .. }));
    }

    // Written by the desktop app: nonce 00..0b, token "abc123".
    const DESKTOP_BLOB: [u8; 34] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b,
        0x51, 0xb8, 0xe2, 0xc7, 0xe2, 0x5c, 0x73, 0x4a, 0xcb, 0xe5, 0x7f, 0xfa,
        0x1a, 0x7f, 0xfd, 0x03, 0x70, 0x1f, 0xc3, 0xda, 0xeb, 0xdb,
    ];

    #[test]
    fn decrypts_blob_written_by_desktop_app() {
        let plain = decrypt(&DESKTOP_BLOB, &key()).unwrap();
        assert_eq!(plain.as_slice(), b"abc123");
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let blob = encrypt(b"abc123", &key()).unwrap();
        let other = FixedKey::new([0x42; KEY_SIZE]).derive_key().unwrap();

        let err = decrypt(&blob, &other).unwrap_err();
        assert!(matches!(err, TokenVaultError::DecryptionFailed));
    }
}
