//! Managed parameters: per-virtual-channel security policy
//!
//! A managed parameter row is keyed by frame type, spacecraft ID, virtual
//! channel ID and transfer frame version number. Rows are built once from
//! configuration text and are immutable afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// CCSDS transfer frame type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameType {
    Tc,
    Tm,
    Aos,
}

impl FrameType {
    /// Resolve the frame type segment of a configuration key.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tc" => Some(FrameType::Tc),
            "tm" => Some(FrameType::Tm),
            "aos" => Some(FrameType::Aos),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FrameType::Tc => "tc",
            FrameType::Tm => "tm",
            FrameType::Aos => "aos",
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error Control Field presence, qualified by frame type.
///
/// The engine receives presence and frame type as a single integer: TC
/// uses the raw boolean, TM adds 2 and AOS adds 4. That bias lives in
/// [`EcfPresence::engine_value`] and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EcfPresence {
    TcAbsent,
    TcPresent,
    TmAbsent,
    TmPresent,
    AosAbsent,
    AosPresent,
}

impl EcfPresence {
    /// Qualify a plain presence boolean with its frame type.
    pub fn new(frame_type: FrameType, present: bool) -> Self {
        match (frame_type, present) {
            (FrameType::Tc, false) => EcfPresence::TcAbsent,
            (FrameType::Tc, true) => EcfPresence::TcPresent,
            (FrameType::Tm, false) => EcfPresence::TmAbsent,
            (FrameType::Tm, true) => EcfPresence::TmPresent,
            (FrameType::Aos, false) => EcfPresence::AosAbsent,
            (FrameType::Aos, true) => EcfPresence::AosPresent,
        }
    }

    /// The engine's wire-level integer: presence biased by frame type
    /// (TC raw 0/1, TM +2, AOS +4).
    pub fn engine_value(&self) -> u8 {
        match self {
            EcfPresence::TcAbsent => 0,
            EcfPresence::TcPresent => 1,
            EcfPresence::TmAbsent => 2,
            EcfPresence::TmPresent => 3,
            EcfPresence::AosAbsent => 4,
            EcfPresence::AosPresent => 5,
        }
    }

    pub fn frame_type(&self) -> FrameType {
        match self {
            EcfPresence::TcAbsent | EcfPresence::TcPresent => FrameType::Tc,
            EcfPresence::TmAbsent | EcfPresence::TmPresent => FrameType::Tm,
            EcfPresence::AosAbsent | EcfPresence::AosPresent => FrameType::Aos,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(
            self,
            EcfPresence::TcPresent | EcfPresence::TmPresent | EcfPresence::AosPresent
        )
    }
}

/// One managed parameter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedParameter {
    /// Spacecraft ID
    pub scid: u16,
    /// Virtual Channel ID
    pub vcid: u8,
    /// Transfer Frame Version Number
    pub tfvn: u8,
    /// ECF presence, frame-type qualified
    pub ecf: EcfPresence,
    /// Segmentation header presence
    pub has_segmentation_header: bool,
    /// Maximum frame length in bytes
    pub max_frame_length: u16,
}

impl ManagedParameter {
    pub fn frame_type(&self) -> FrameType {
        self.ecf.frame_type()
    }
}
