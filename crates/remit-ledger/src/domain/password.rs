//! # Password Type
//!
//! 32-byte claim password that zeroizes memory on drop.
//!
//! Passwords follow fixed-width `bytes32` semantics: a passphrase of at
//! most 32 bytes is copied to the front of the slot and the remainder is
//! zero-filled. Only hashes of passwords are ever stored by the ledger.

use super::errors::RemittanceError;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Width of a password slot in bytes.
pub const PASSWORD_LEN: usize = 32;

/// A claim password that zeroizes on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Password {
    inner: [u8; PASSWORD_LEN],
}

impl Password {
    /// Create a password from raw slot bytes.
    pub fn new(bytes: [u8; PASSWORD_LEN]) -> Self {
        Self { inner: bytes }
    }

    /// Create from a passphrase, right-padding with zeros.
    pub fn from_passphrase(phrase: &str) -> Result<Self, RemittanceError> {
        let raw = phrase.as_bytes();
        if raw.len() > PASSWORD_LEN {
            return Err(RemittanceError::PasswordTooLong { len: raw.len() });
        }
        let mut inner = [0u8; PASSWORD_LEN];
        inner[..raw.len()].copy_from_slice(raw);
        Ok(Self { inner })
    }

    /// Create from an exact 32-byte slice.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; PASSWORD_LEN]>::try_from(slice).ok().map(Self::new)
    }

    /// Get the slot bytes.
    ///
    /// Avoid keeping references to the returned slice.
    pub fn as_bytes(&self) -> &[u8; PASSWORD_LEN] {
        &self.inner
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

// Hex on the wire so raw bytes never land in logs verbatim
impl Serialize for Password {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(self.inner))
    }
}

impl<'de> Deserialize<'de> for Password {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        Self::from_slice(&bytes).ok_or_else(|| serde::de::Error::custom("invalid password length"))
    }
}
