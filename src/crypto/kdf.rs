use argon2::{Algorithm, Argon2, Params, Version};
use md5::{Digest, Md5};
use zeroize::Zeroizing;

use crate::error::TokenVaultError;

/// Output key size in bytes. 16 bytes = 128-bit key for AES-128-GCM.
pub const KEY_SIZE: usize = 16;

/// Passphrase the desktop app has always hashed into its token key.
pub const DEFAULT_PASSPHRASE: &str = "hips-checkin-secret-key-2025";

/// Argon2id defaults. Same costs as a full-strength vault, shorter output.
pub const ARGON2_M_COST: u32 = 65536; // 64 MB RAM
pub const ARGON2_T_COST: u32 = 3;
pub const ARGON2_P_COST: u32 = 1;

/// Key bytes, wiped from memory on drop.
pub type EncryptionKey = Zeroizing<[u8; KEY_SIZE]>;

/// Produces the symmetric key used for every store operation.
///
/// Called once per operation; implementations should not cache key bytes
/// beyond what they were constructed with.
pub trait KeyDeriver {
    fn derive_key(&self) -> Result<EncryptionKey, TokenVaultError>;
}

/// Single MD5 digest of a fixed passphrase.
///
/// No salt, no iterations. This only keeps the token away from casual disk
/// inspection: anyone holding the binary can recompute the key.
#[derive(Clone)]
pub struct StaticPassphrase {
    passphrase: Zeroizing<String>,
}

impl StaticPassphrase {
    pub fn new(passphrase: &str) -> Self {
        Self {
            passphrase: Zeroizing::new(passphrase.to_owned()),
        }
    }
}

impl Default for StaticPassphrase {
    fn default() -> Self {
        Self::new(DEFAULT_PASSPHRASE)
    }
}

impl std::fmt::Debug for StaticPassphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticPassphrase(..)")
    }
}

impl KeyDeriver for StaticPassphrase {
    fn derive_key(&self) -> Result<EncryptionKey, TokenVaultError> {
        let digest = Md5::digest(self.passphrase.as_bytes());
        let mut key = Zeroizing::new([0u8; KEY_SIZE]);
        key.copy_from_slice(&digest);
        Ok(key)
    }
}

/// Argon2id over a passphrase and a caller-held salt.
///
/// The salt is not written into the token file, so the caller must supply the
/// same salt on every run.
#[derive(Clone)]
pub struct Argon2Passphrase {
    passphrase: Zeroizing<String>,
    salt: Vec<u8>,
    m_cost: u32,
    t_cost: u32,
    p_cost: u32,
}

impl Argon2Passphrase {
    pub fn new(passphrase: &str, salt: impl Into<Vec<u8>>) -> Self {
        Self {
            passphrase: Zeroizing::new(passphrase.to_owned()),
            salt: salt.into(),
            m_cost: ARGON2_M_COST,
            t_cost: ARGON2_T_COST,
            p_cost: ARGON2_P_COST,
        }
    }

    /// Override the Argon2id parameters.
    ///
    /// Useful for tests where full 64 MB RAM usage would be too slow.
    pub fn with_params(mut self, m_cost: u32, t_cost: u32, p_cost: u32) -> Self {
        self.m_cost = m_cost;
        self.t_cost = t_cost;
        self.p_cost = p_cost;
        self
    }
}

impl std::fmt::Debug for Argon2Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Passphrase")
            .field("m_cost", &self.m_cost)
            .field("t_cost", &self.t_cost)
            .field("p_cost", &self.p_cost)
            .finish_non_exhaustive()
    }
}

impl KeyDeriver for Argon2Passphrase {
    fn derive_key(&self) -> Result<EncryptionKey, TokenVaultError> {
        let params = Params::new(self.m_cost, self.t_cost, self.p_cost, Some(KEY_SIZE))
            .map_err(|e| TokenVaultError::KdfError(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let mut key = Zeroizing::new([0u8; KEY_SIZE]);

        argon2
            .hash_password_into(self.passphrase.as_bytes(), &self.salt, key.as_mut())
            .map_err(|e| TokenVaultError::KdfError(e.to_string()))?;

        Ok(key)
    }
}

/// Key bytes sourced elsewhere, e.g. from a platform secret manager.
#[derive(Clone)]
pub struct FixedKey(EncryptionKey);

impl FixedKey {
    pub fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Self(Zeroizing::new(bytes))
    }
}

impl std::fmt::Debug for FixedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FixedKey(..)")
    }
}

impl KeyDeriver for FixedKey {
    fn derive_key(&self) -> Result<EncryptionKey, TokenVaultError> {
        Ok(self.0.clone())
    }
}
