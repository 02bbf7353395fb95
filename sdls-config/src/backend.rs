//! Backend selections and their engine wire values

use serde::{Deserialize, Serialize};
use std::fmt;

/// Security Association storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaStorageBackend {
    Uninitialized = 0,
    Custom = 1,
    InMemory = 2,
    MariaDb = 3,
}

impl SaStorageBackend {
    /// Resolve a configured backend name; `None` for unrecognized names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "uninitialized" => Some(SaStorageBackend::Uninitialized),
            "custom" => Some(SaStorageBackend::Custom),
            "inmemory" => Some(SaStorageBackend::InMemory),
            "mariadb" => Some(SaStorageBackend::MariaDb),
            _ => None,
        }
    }

    /// The engine's wire-level integer for this backend.
    pub fn engine_value(&self) -> u8 {
        *self as u8
    }
}

/// Cryptographic backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CryptoBackend {
    Uninitialized = 0,
    Libgcrypt = 1,
    KmcCryptoService = 2,
    WolfSsl = 3,
}

impl CryptoBackend {
    /// Resolve a configured backend name; `None` for unrecognized names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "uninitialized" => Some(CryptoBackend::Uninitialized),
            "libgcrypt" => Some(CryptoBackend::Libgcrypt),
            "kmccryptoservice" => Some(CryptoBackend::KmcCryptoService),
            "wolfssl" => Some(CryptoBackend::WolfSsl),
            _ => None,
        }
    }

    /// The engine's wire-level integer for this backend.
    pub fn engine_value(&self) -> u8 {
        *self as u8
    }
}

/// Access-manager login method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CamLoginMethod {
    None = 0,
    Kerberos = 1,
    KeytabFile = 2,
}

impl CamLoginMethod {
    /// Resolve a configured method name; `None` for unrecognized names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(CamLoginMethod::None),
            "kerberos" => Some(CamLoginMethod::Kerberos),
            "keytab_file" => Some(CamLoginMethod::KeytabFile),
            _ => None,
        }
    }

    /// The engine's wire-level integer for this method.
    pub fn engine_value(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for SaStorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SaStorageBackend::Uninitialized => "uninitialized",
            SaStorageBackend::Custom => "custom",
            SaStorageBackend::InMemory => "inmemory",
            SaStorageBackend::MariaDb => "mariadb",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for CryptoBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CryptoBackend::Uninitialized => "uninitialized",
            CryptoBackend::Libgcrypt => "libgcrypt",
            CryptoBackend::KmcCryptoService => "kmccryptoservice",
            CryptoBackend::WolfSsl => "wolfssl",
        };
        write!(f, "{}", name)
    }
}
