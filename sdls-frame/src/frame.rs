//! Transfer frame values and decoding from engine results
//!
//! A frame is built by decoding the security engine's process result:
//! fixed header fields are copied by name and every variable-length field
//! is sliced to exactly its declared length. Frames are immutable values;
//! they live for the duration of one processing call.

use bytes::Bytes;
use sdls_core::{BitWriter, SdlsError, SdlsResult};
use serde::{Deserialize, Serialize};

use crate::header::{AosPrimaryHeader, TcPrimaryHeader, TmPrimaryHeader};
use crate::raw::{AosFrameRaw, SecurityHeaderRaw, SecurityTrailerRaw, TcFrameRaw, TmFrameRaw};
use crate::security::{SecurityHeader, SecurityTrailer};

/// Slice `block` to exactly `len` bytes.
///
/// The declared length bounds the read: bytes beyond it are ignored and a
/// declared length larger than the block is rejected rather than padded.
fn take_field(block: &Bytes, len: u16, what: &str) -> SdlsResult<Bytes> {
    let len = len as usize;
    if len > block.len() {
        return Err(SdlsError::BadDataFormat(format!(
            "{} declares {} bytes but only {} are present",
            what,
            len,
            block.len()
        )));
    }
    Ok(block.slice(..len))
}

impl SecurityHeader {
    fn decode(raw: &SecurityHeaderRaw) -> SdlsResult<Self> {
        Ok(Self {
            segment_header: raw.segment_header,
            spi: raw.spi,
            iv: take_field(&raw.iv, raw.iv_field_len, "security header IV")?,
            sn: take_field(&raw.sn, raw.sn_field_len, "security header SN")?,
            pad: take_field(&raw.pad, raw.pad_field_len, "security header pad")?,
        })
    }
}

impl SecurityTrailer {
    fn decode(raw: &SecurityTrailerRaw) -> SdlsResult<Self> {
        Ok(Self {
            mac: take_field(&raw.mac, raw.mac_field_len, "security trailer MAC")?,
            ocf: take_field(&raw.ocf, raw.ocf_field_len, "security trailer OCF")?,
            fecf: raw.fecf,
        })
    }
}

/// TC transfer frame with its security fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcFrame {
    pub header: TcPrimaryHeader,
    pub security_header: SecurityHeader,
    /// Opaque frame data field
    pub pdu: Bytes,
    pub security_trailer: SecurityTrailer,
}

impl TcFrame {
    /// Decode an engine process result into an immutable frame value.
    pub fn decode(raw: &TcFrameRaw) -> SdlsResult<Self> {
        Ok(Self {
            header: raw.header,
            security_header: SecurityHeader::decode(&raw.security_header)?,
            pdu: take_field(&raw.pdu, raw.pdu_len, "frame PDU")?,
            security_trailer: SecurityTrailer::decode(&raw.security_trailer)?,
        })
    }

    /// Canonical bit-packed lowercase hex rendering of the whole frame:
    /// primary header, security header, PDU, security trailer.
    /// Diagnostics format, not a transmission format.
    pub fn to_canonical_hex(&self) -> String {
        let mut writer = BitWriter::new();
        self.header.pack(&mut writer);
        self.security_header.pack(&mut writer);
        writer.append_bytes(&self.pdu);
        self.security_trailer.pack(&mut writer);
        writer.to_hex()
    }
}

/// AOS transfer frame with its security fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AosFrame {
    pub header: AosPrimaryHeader,
    pub security_header: SecurityHeader,
    /// Opaque frame data field
    pub pdu: Bytes,
    pub security_trailer: SecurityTrailer,
}

impl AosFrame {
    /// Decode an engine process result into an immutable frame value.
    pub fn decode(raw: &AosFrameRaw) -> SdlsResult<Self> {
        Ok(Self {
            header: raw.header,
            security_header: SecurityHeader::decode(&raw.security_header)?,
            pdu: take_field(&raw.pdu, raw.pdu_len, "frame PDU")?,
            security_trailer: SecurityTrailer::decode(&raw.security_trailer)?,
        })
    }

    /// Canonical bit-packed lowercase hex rendering of the whole frame.
    /// The primary header FHEC is excluded, as in the 48-bit header form.
    pub fn to_canonical_hex(&self) -> String {
        let mut writer = BitWriter::new();
        self.header.pack(&mut writer);
        self.security_header.pack(&mut writer);
        writer.append_bytes(&self.pdu);
        self.security_trailer.pack(&mut writer);
        writer.to_hex()
    }
}

/// TM transfer frame with its security fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmFrame {
    pub header: TmPrimaryHeader,
    pub security_header: SecurityHeader,
    /// Opaque frame data field
    pub pdu: Bytes,
    pub security_trailer: SecurityTrailer,
}

impl TmFrame {
    /// Decode an engine process result into an immutable frame value.
    pub fn decode(raw: &TmFrameRaw) -> SdlsResult<Self> {
        Ok(Self {
            header: raw.header,
            security_header: SecurityHeader::decode(&raw.security_header)?,
            pdu: take_field(&raw.pdu, raw.pdu_len, "frame PDU")?,
            security_trailer: SecurityTrailer::decode(&raw.security_trailer)?,
        })
    }

    /// Canonical bit-packed lowercase hex rendering of the whole frame.
    pub fn to_canonical_hex(&self) -> String {
        let mut writer = BitWriter::new();
        self.header.pack(&mut writer);
        self.security_header.pack(&mut writer);
        writer.append_bytes(&self.pdu);
        self.security_trailer.pack(&mut writer);
        writer.to_hex()
    }
}

/// Any of the three transfer frame shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frame {
    Tc(TcFrame),
    Aos(AosFrame),
    Tm(TmFrame),
}

impl Frame {
    /// Canonical hex rendering, independent of frame type.
    pub fn to_canonical_hex(&self) -> String {
        match self {
            Frame::Tc(frame) => frame.to_canonical_hex(),
            Frame::Aos(frame) => frame.to_canonical_hex(),
            Frame::Tm(frame) => frame.to_canonical_hex(),
        }
    }

    /// Security Parameter Index of the frame.
    pub fn spi(&self) -> u16 {
        match self {
            Frame::Tc(frame) => frame.security_header.spi,
            Frame::Aos(frame) => frame.security_header.spi,
            Frame::Tm(frame) => frame.security_header.spi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_security_header_raw() -> SecurityHeaderRaw {
        SecurityHeaderRaw {
            segment_header: 0,
            spi: 1,
            iv: Bytes::new(),
            iv_field_len: 0,
            sn: Bytes::new(),
            sn_field_len: 0,
            pad: Bytes::new(),
            pad_field_len: 0,
        }
    }

    fn empty_security_trailer_raw() -> SecurityTrailerRaw {
        SecurityTrailerRaw {
            mac: Bytes::new(),
            mac_field_len: 0,
            ocf: Bytes::new(),
            ocf_field_len: 0,
            fecf: 0xABCD,
        }
    }

    fn zero_tm_header() -> TmPrimaryHeader {
        TmPrimaryHeader {
            tfvn: 0,
            scid: 0,
            vcid: 0,
            ocf_flag: 0,
            mc_frame_count: 0,
            vc_frame_count: 0,
            secondary_header_flag: 0,
            sync_flag: 0,
            packet_order_flag: 0,
            segment_length_id: 0,
            first_header_pointer: 0,
        }
    }

    #[test]
    fn test_tm_frame_all_variable_fields_empty_is_80_bits() {
        let raw = TmFrameRaw {
            header: zero_tm_header(),
            security_header: empty_security_header_raw(),
            pdu: Bytes::new(),
            pdu_len: 0,
            security_trailer: empty_security_trailer_raw(),
        };
        let frame = TmFrame::decode(&raw).unwrap();
        let hex = frame.to_canonical_hex();
        // Primary header (48) + SPI (16) + FECF (16) = 80 bits.
        assert_eq!(hex.len() * 4, 80);
        assert_eq!(hex, "0000000000000001abcd");
    }

    #[test]
    fn test_decode_then_hex_round_trip_is_byte_aligned() {
        // IV 8, SN 0, Pad 4, MAC 16, OCF 0: the canonical form is exactly
        // 48 + 16 + 64 + 32 + 128 + 16 = 304 bits.
        let raw = TmFrameRaw {
            header: zero_tm_header(),
            security_header: SecurityHeaderRaw {
                segment_header: 0,
                spi: 0x000A,
                iv: Bytes::from(vec![0x10; 8]),
                iv_field_len: 8,
                sn: Bytes::new(),
                sn_field_len: 0,
                pad: Bytes::from(vec![0x20; 4]),
                pad_field_len: 4,
            },
            pdu: Bytes::new(),
            pdu_len: 0,
            security_trailer: SecurityTrailerRaw {
                mac: Bytes::from(vec![0x30; 16]),
                mac_field_len: 16,
                ocf: Bytes::new(),
                ocf_field_len: 0,
                fecf: 0x0102,
            },
        };
        let frame = TmFrame::decode(&raw).unwrap();
        let hex = frame.to_canonical_hex();
        assert_eq!(hex.len() * 4, 304);
        // Deterministic output for identical input.
        assert_eq!(hex, TmFrame::decode(&raw).unwrap().to_canonical_hex());
    }

    #[test]
    fn test_decode_slices_blocks_to_declared_length() {
        // The engine hands back fixed-size blocks; only the declared count
        // of bytes is valid.
        let mut raw = TcFrameRaw {
            header: TcPrimaryHeader {
                tfvn: 0,
                bypass: 0,
                control_command: 0,
                spare: 0,
                scid: 44,
                vcid: 1,
                frame_length: 24,
                frame_sequence_number: 0,
            },
            security_header: SecurityHeaderRaw {
                iv: Bytes::from(vec![0x55; 16]),
                iv_field_len: 12,
                ..empty_security_header_raw()
            },
            pdu: Bytes::from(vec![0xEE; 8]),
            pdu_len: 4,
            security_trailer: empty_security_trailer_raw(),
        };
        let frame = TcFrame::decode(&raw).unwrap();
        assert_eq!(frame.security_header.iv_len(), 12);
        assert_eq!(frame.pdu.len(), 4);

        raw.pdu_len = 9;
        let err = TcFrame::decode(&raw).unwrap_err();
        assert!(matches!(err, SdlsError::BadDataFormat(_)));
    }

    #[test]
    fn test_frame_enum_dispatch() {
        let raw = TmFrameRaw {
            header: zero_tm_header(),
            security_header: empty_security_header_raw(),
            pdu: Bytes::new(),
            pdu_len: 0,
            security_trailer: empty_security_trailer_raw(),
        };
        let frame = Frame::Tm(TmFrame::decode(&raw).unwrap());
        assert_eq!(frame.spi(), 1);
        assert_eq!(frame.to_canonical_hex().len(), 20);
    }
}
