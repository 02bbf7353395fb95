//! Transfer frame primary headers
//!
//! One header shape per CCSDS frame type. Each primary header packs into
//! exactly 48 bits; the AOS Frame Header Error Control field is carried in
//! the model but excluded from the packed form.

use sdls_core::BitWriter;
use serde::{Deserialize, Serialize};

/// TC Transfer Frame Primary Header (CCSDS 232.0-B)
///
/// Packed layout: tfvn 2, bypass 1, control_command 1, spare 2, scid 10,
/// vcid 6, frame_length 16, frame_sequence_number 8 = 48 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcPrimaryHeader {
    /// Transfer Frame Version Number (2 bits)
    pub tfvn: u8,
    /// Bypass Flag (1 bit)
    pub bypass: u8,
    /// Control Command Flag (1 bit)
    pub control_command: u8,
    /// Reserved Spare (2 bits)
    pub spare: u8,
    /// Spacecraft ID (10 bits)
    pub scid: u16,
    /// Virtual Channel ID (6 bits)
    pub vcid: u8,
    /// Frame Length (16 bits)
    pub frame_length: u16,
    /// Frame Sequence Number (8 bits)
    pub frame_sequence_number: u8,
}

impl TcPrimaryHeader {
    /// Append the 48-bit packed header to `writer`.
    pub fn pack(&self, writer: &mut BitWriter) {
        writer.append_bits(self.tfvn as u64, 2);
        writer.append_bits(self.bypass as u64, 1);
        writer.append_bits(self.control_command as u64, 1);
        writer.append_bits(self.spare as u64, 2);
        writer.append_bits(self.scid as u64, 10);
        writer.append_bits(self.vcid as u64, 6);
        writer.append_bits(self.frame_length as u64, 16);
        writer.append_bits(self.frame_sequence_number as u64, 8);
    }

    /// Canonical lowercase hex rendering of the packed header.
    pub fn to_canonical_hex(&self) -> String {
        let mut writer = BitWriter::with_capacity(48);
        self.pack(&mut writer);
        writer.to_hex()
    }
}

/// AOS Transfer Frame Primary Header (CCSDS 732.0-B)
///
/// Packed layout: tfvn 2, scid 8, vcid 6, vc_frame_count 24, replay 1,
/// vc_frame_count_usage 1, spare 2, vc_frame_count_cycle 4 = 48 bits.
/// The FHEC is carried but never packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AosPrimaryHeader {
    /// Transfer Frame Version Number (2 bits)
    pub tfvn: u8,
    /// Spacecraft ID (8 bits)
    pub scid: u8,
    /// Virtual Channel ID (6 bits)
    pub vcid: u8,
    /// Virtual Channel Frame Count (24 bits)
    pub vc_frame_count: u32,
    /// Replay Flag (1 bit)
    pub replay: u8,
    /// VC Frame Count Usage Flag (1 bit)
    pub vc_frame_count_usage: u8,
    /// Reserved Spare (2 bits)
    pub spare: u8,
    /// VC Frame Count Cycle (4 bits)
    pub vc_frame_count_cycle: u8,
    /// Frame Header Error Control, excluded from the packed form
    pub fhec: u16,
}

impl AosPrimaryHeader {
    /// Append the 48-bit packed header to `writer`. The FHEC is skipped.
    pub fn pack(&self, writer: &mut BitWriter) {
        writer.append_bits(self.tfvn as u64, 2);
        writer.append_bits(self.scid as u64, 8);
        writer.append_bits(self.vcid as u64, 6);
        writer.append_bits(self.vc_frame_count as u64, 24);
        writer.append_bits(self.replay as u64, 1);
        writer.append_bits(self.vc_frame_count_usage as u64, 1);
        writer.append_bits(self.spare as u64, 2);
        writer.append_bits(self.vc_frame_count_cycle as u64, 4);
    }

    /// Canonical lowercase hex rendering of the packed header.
    pub fn to_canonical_hex(&self) -> String {
        let mut writer = BitWriter::with_capacity(48);
        self.pack(&mut writer);
        writer.to_hex()
    }
}

/// TM Transfer Frame Primary Header (CCSDS 132.0-B)
///
/// Packed layout: tfvn 2, scid 10, vcid 3, ocf_flag 1, mc_frame_count 8,
/// vc_frame_count 8, secondary_header_flag 1, sync_flag 1,
/// packet_order_flag 1, segment_length_id 2, first_header_pointer 11
/// = 48 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmPrimaryHeader {
    /// Transfer Frame Version Number (2 bits)
    pub tfvn: u8,
    /// Spacecraft ID (10 bits)
    pub scid: u16,
    /// Virtual Channel ID (3 bits)
    pub vcid: u8,
    /// Operational Control Field Flag (1 bit)
    pub ocf_flag: u8,
    /// Master Channel Frame Count (8 bits)
    pub mc_frame_count: u8,
    /// Virtual Channel Frame Count (8 bits)
    pub vc_frame_count: u8,
    /// Secondary Header Flag (1 bit)
    pub secondary_header_flag: u8,
    /// Synchronization Flag (1 bit)
    pub sync_flag: u8,
    /// Packet Order Flag (1 bit)
    pub packet_order_flag: u8,
    /// Segment Length ID (2 bits)
    pub segment_length_id: u8,
    /// First Header Pointer (11 bits)
    pub first_header_pointer: u16,
}

impl TmPrimaryHeader {
    /// Append the 48-bit packed header to `writer`.
    pub fn pack(&self, writer: &mut BitWriter) {
        writer.append_bits(self.tfvn as u64, 2);
        writer.append_bits(self.scid as u64, 10);
        writer.append_bits(self.vcid as u64, 3);
        writer.append_bits(self.ocf_flag as u64, 1);
        writer.append_bits(self.mc_frame_count as u64, 8);
        writer.append_bits(self.vc_frame_count as u64, 8);
        writer.append_bits(self.secondary_header_flag as u64, 1);
        writer.append_bits(self.sync_flag as u64, 1);
        writer.append_bits(self.packet_order_flag as u64, 1);
        writer.append_bits(self.segment_length_id as u64, 2);
        writer.append_bits(self.first_header_pointer as u64, 11);
    }

    /// Canonical lowercase hex rendering of the packed header.
    pub fn to_canonical_hex(&self) -> String {
        let mut writer = BitWriter::with_capacity(48);
        self.pack(&mut writer);
        writer.to_hex()
    }
}
