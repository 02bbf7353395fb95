//! Raw frame structures returned by the security engine
//!
//! The engine reports each variable-length field as an allocated block plus
//! a `*_field_len` count of the bytes actually valid inside it, mirroring
//! its internal frame structures. Decoding into the frame model slices each
//! block to exactly its declared length.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::header::{AosPrimaryHeader, TcPrimaryHeader, TmPrimaryHeader};

/// Security header as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityHeaderRaw {
    /// Segment Header (meaningful for TC only)
    pub segment_header: u8,
    /// Security Parameter Index
    pub spi: u16,
    /// Initialization Vector block, valid up to `iv_field_len`
    pub iv: Bytes,
    /// Number of valid IV bytes
    pub iv_field_len: u16,
    /// Sequence Number block, valid up to `sn_field_len`
    pub sn: Bytes,
    /// Number of valid Sequence Number bytes
    pub sn_field_len: u16,
    /// Pad block, valid up to `pad_field_len`
    pub pad: Bytes,
    /// Number of valid Pad bytes
    pub pad_field_len: u16,
}

/// Security trailer as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityTrailerRaw {
    /// MAC block, valid up to `mac_field_len`
    pub mac: Bytes,
    /// Number of valid MAC bytes
    pub mac_field_len: u16,
    /// OCF block, valid up to `ocf_field_len` (always zero for TC)
    pub ocf: Bytes,
    /// Number of valid OCF bytes
    pub ocf_field_len: u16,
    /// Frame Error Control Field
    pub fecf: u16,
}

/// Engine result of processing a TC transfer frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcFrameRaw {
    pub header: TcPrimaryHeader,
    pub security_header: SecurityHeaderRaw,
    /// PDU block, valid up to `pdu_len`
    pub pdu: Bytes,
    /// Number of valid PDU bytes
    pub pdu_len: u16,
    pub security_trailer: SecurityTrailerRaw,
}

/// Engine result of processing an AOS transfer frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AosFrameRaw {
    pub header: AosPrimaryHeader,
    pub security_header: SecurityHeaderRaw,
    /// PDU block, valid up to `pdu_len`
    pub pdu: Bytes,
    /// Number of valid PDU bytes
    pub pdu_len: u16,
    pub security_trailer: SecurityTrailerRaw,
}

/// Engine result of processing a TM transfer frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmFrameRaw {
    pub header: TmPrimaryHeader,
    pub security_header: SecurityHeaderRaw,
    /// PDU block, valid up to `pdu_len`
    pub pdu: Bytes,
    /// Number of valid PDU bytes
    pub pdu_len: u16,
    pub security_trailer: SecurityTrailerRaw,
}
