//! Core types and utilities for CCSDS SDLS frame security
//!
//! This crate provides the error taxonomy and the bit-level packing
//! primitives used throughout the SDLS implementation.

pub mod bitpack;
pub mod error;

pub use bitpack::BitWriter;
pub use error::{SdlsError, SdlsResult};
