//! SDLS security header and trailer
//!
//! Both shapes are shared by all three frame types. The variable-length
//! fields keep exactly the bytes the engine reported for them; an empty
//! field is entirely absent from the packed encoding, it is never
//! zero-filled.

use bytes::Bytes;
use sdls_core::BitWriter;
use serde::{Deserialize, Serialize};

/// SDLS Security Header
///
/// Packed layout: SPI 16 bits, then IV, SN and Pad bytes in that order,
/// each present only when non-empty. The segment header is carried for TC
/// frames but excluded from the packed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityHeader {
    /// Segment Header, carried but never packed (zero for TM/AOS)
    pub segment_header: u8,
    /// Security Parameter Index (16 bits)
    pub spi: u16,
    /// Initialization Vector
    pub iv: Bytes,
    /// Sequence Number
    pub sn: Bytes,
    /// Pad
    pub pad: Bytes,
}

impl SecurityHeader {
    /// Number of IV bytes present.
    pub fn iv_len(&self) -> usize {
        self.iv.len()
    }

    /// Number of Sequence Number bytes present.
    pub fn sn_len(&self) -> usize {
        self.sn.len()
    }

    /// Number of Pad bytes present.
    pub fn pad_len(&self) -> usize {
        self.pad.len()
    }

    /// Append the packed header to `writer`.
    pub fn pack(&self, writer: &mut BitWriter) {
        writer.append_bits(self.spi as u64, 16);
        if !self.iv.is_empty() {
            writer.append_bytes(&self.iv);
        }
        if !self.sn.is_empty() {
            writer.append_bytes(&self.sn);
        }
        if !self.pad.is_empty() {
            writer.append_bytes(&self.pad);
        }
    }

    /// Canonical lowercase hex rendering of the packed header.
    pub fn to_canonical_hex(&self) -> String {
        let mut writer =
            BitWriter::with_capacity(16 + 8 * (self.iv.len() + self.sn.len() + self.pad.len()));
        self.pack(&mut writer);
        writer.to_hex()
    }
}

/// SDLS Security Trailer
///
/// Packed layout: MAC and OCF bytes, each present only when non-empty,
/// followed by the mandatory 16-bit FECF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityTrailer {
    /// Message Authentication Code
    pub mac: Bytes,
    /// Operational Control Field (TM/AOS only, empty for TC)
    pub ocf: Bytes,
    /// Frame Error Control Field (16 bits)
    pub fecf: u16,
}

impl SecurityTrailer {
    /// Number of MAC bytes present.
    pub fn mac_len(&self) -> usize {
        self.mac.len()
    }

    /// Number of OCF bytes present.
    pub fn ocf_len(&self) -> usize {
        self.ocf.len()
    }

    /// Append the packed trailer to `writer`.
    pub fn pack(&self, writer: &mut BitWriter) {
        if !self.mac.is_empty() {
            writer.append_bytes(&self.mac);
        }
        if !self.ocf.is_empty() {
            writer.append_bytes(&self.ocf);
        }
        writer.append_bits(self.fecf as u64, 16);
    }

    /// Canonical lowercase hex rendering of the packed trailer.
    pub fn to_canonical_hex(&self) -> String {
        let mut writer = BitWriter::with_capacity(16 + 8 * (self.mac.len() + self.ocf.len()));
        self.pack(&mut writer);
        writer.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_pack_to_spi_only() {
        let header = SecurityHeader {
            segment_header: 0,
            spi: 0x0001,
            iv: Bytes::new(),
            sn: Bytes::new(),
            pad: Bytes::new(),
        };
        assert_eq!(header.to_canonical_hex(), "0001");
    }

    #[test]
    fn test_segment_header_is_not_packed() {
        let base = SecurityHeader {
            segment_header: 0,
            spi: 0x00FF,
            iv: Bytes::from_static(&[0xAA; 4]),
            sn: Bytes::new(),
            pad: Bytes::new(),
        };
        let with_sh = SecurityHeader {
            segment_header: 0xC0,
            ..base.clone()
        };
        assert_eq!(base.to_canonical_hex(), with_sh.to_canonical_hex());
        assert_eq!(base.to_canonical_hex(), "00ffaaaaaaaa");
    }

    #[test]
    fn test_trailer_fecf_is_mandatory() {
        let trailer = SecurityTrailer {
            mac: Bytes::new(),
            ocf: Bytes::new(),
            fecf: 0xBEEF,
        };
        assert_eq!(trailer.to_canonical_hex(), "beef");
    }

    #[test]
    fn test_trailer_mac_then_ocf_then_fecf() {
        let trailer = SecurityTrailer {
            mac: Bytes::from_static(&[0x11, 0x22]),
            ocf: Bytes::from_static(&[0x33, 0x44, 0x55, 0x66]),
            fecf: 0x0102,
        };
        assert_eq!(trailer.to_canonical_hex(), "1122334455660102");
    }
}
