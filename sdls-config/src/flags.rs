//! Link-layer processing parameters pushed to the engine in one call

use serde::{Deserialize, Serialize};

use crate::backend::{CryptoBackend, SaStorageBackend};
use crate::managed::EcfPresence;

/// Backend selections and link-layer processing flags.
///
/// Mirrors the single engine configuration call that seeds its processing
/// behavior. The `create_ecf` and `check_fecf` flags carry their frame
/// type in the same biased encoding as managed parameter ECF presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkParameters {
    /// SA storage backend selection
    pub sa_backend: SaStorageBackend,
    /// Crypto backend selection
    pub crypto_backend: CryptoBackend,
    /// Create an ECF when applying security, frame-type qualified
    pub create_ecf: EcfPresence,
    /// Extract PDUs while processing TC frames
    pub process_pdus: bool,
    /// TC frames carry a PUS header
    pub has_pus_header: bool,
    /// Skip SA state validation while processing TC frames
    pub ignore_sa_state: bool,
    /// Skip anti-replay validation while processing TC frames
    pub ignore_antireplay: bool,
    /// Select SAs per (GVCID, MAP ID) instead of per GVCID
    pub unique_sa_per_mapid: bool,
    /// Validate the FECF when processing, frame-type qualified
    pub check_fecf: EcfPresence,
    /// Virtual channel ID mask applied by the engine
    pub vcid_bitmask: u8,
    /// Increment the non-transmitted counter portion on rollover
    pub increment_nontransmitted_counter: bool,
}
