//! Encrypted at-rest storage for a single access token.
//!
//! The token is sealed with AES-128-GCM and written as `nonce || ciphertext || tag`
//! to `<config dir>/<app>/token.enc`. How the key is obtained is up to the
//! [`KeyDeriver`] handed to the [`CredentialStore`].

mod crypto;
mod format;

pub mod error;
pub mod location;
pub mod store;

pub use crypto::cipher::{NONCE_SIZE, TAG_SIZE};
pub use crypto::kdf::{
    Argon2Passphrase, EncryptionKey, FixedKey, KeyDeriver, StaticPassphrase, KEY_SIZE,
};
pub use error::TokenVaultError;
pub use format::blob_len;
pub use location::StorageLocation;
pub use store::CredentialStore;
