//! CCSDS Space Data Link Security (SDLS) client library
//!
//! Configures and drives SDLS processing for TC, AOS and TM transfer
//! frames: applying security before transmission and removing/validating
//! it on receipt. The cryptographic engine itself is an external
//! collaborator behind the [`session::SecurityEngine`] trait; this
//! library owns the validated configuration model, the frame data model
//! with its bit-exact serialization, and the session lifecycle.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `sdls-core`: Error taxonomy and bit-level packing
//! - `sdls-frame`: TC/TM/AOS frame model and canonical hex codec
//! - `sdls-config`: Configuration model and key=value builder
//! - `sdls-session`: Engine contract and security session
//!
//! # Usage
//!
//! ```no_run
//! use sdls::config::SdlsConfig;
//!
//! let config = SdlsConfig::from_entries([
//!     "cryptolib.crypto.type=libgcrypt",
//!     "cryptolib.tc.44.1.0.has_ecf=true",
//!     "cryptolib.tc.44.1.0.max_frame_length=1024",
//! ])?;
//! # Ok::<(), sdls::SdlsError>(())
//! ```

// Re-export core types
pub use sdls_core::{BitWriter, SdlsError, SdlsResult};

// Re-export the frame model
pub mod frame {
    pub use sdls_frame::*;
}

// Re-export the configuration model
pub mod config {
    pub use sdls_config::*;
}

// Re-export the session API
pub mod session {
    pub use sdls_session::*;
}
