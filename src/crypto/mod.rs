pub mod cipher;
pub mod kdf;
