//! Contract with the external security engine
//!
//! The engine owns every cryptographic concern: SA storage, key material,
//! anti-replay state, encryption and MAC computation. This crate only
//! configures it, submits raw frames and interprets its status codes.
//! Nonzero status codes are opaque here; [`SecurityEngine::error_code_to_string`]
//! renders them for error messages.

use sdls_config::{CamConfig, CryptoServiceConfig, LinkParameters, ManagedParameter, SaStorageConfig};
use sdls_frame::{AosFrameRaw, TcFrameRaw, TmFrameRaw};

#[cfg(test)]
use mockall::automock;

/// Engine status code reported for a successful operation.
pub const ENGINE_SUCCESS: i32 = 0;

/// The external SDLS engine.
///
/// One engine instance is configured and initialized per process. The
/// engine is assumed to mutate shared state (SA counters, anti-replay
/// windows) on every apply/process call, so all operations take
/// `&mut self` and callers serialize access through the owning session.
#[cfg_attr(test, automock)]
pub trait SecurityEngine {
    /// Push backend selections and link-layer processing flags.
    fn configure_link_parameters(&mut self, link: &LinkParameters);

    /// Push SA storage transport parameters.
    fn configure_sa_storage(&mut self, storage: &SaStorageConfig);

    /// Push crypto service transport parameters.
    fn configure_crypto_service(&mut self, service: &CryptoServiceConfig);

    /// Push access manager parameters. Only called when CAM is enabled.
    fn configure_access_manager(&mut self, cam: &CamConfig);

    /// Register one managed parameter row.
    fn add_managed_parameter(&mut self, parameter: &ManagedParameter);

    /// Initialize with the previously pushed configuration.
    ///
    /// Returns [`ENGINE_SUCCESS`] or a nonzero status code.
    fn init(&mut self) -> i32;

    /// Apply security to a TC frame (FECF excluded from the input).
    ///
    /// The output buffer is freshly allocated and may be longer than the
    /// input, security fields included.
    fn apply_tc(&mut self, frame: &[u8]) -> Result<Vec<u8>, i32>;

    /// Process (validate and unwrap) a secured TC frame.
    fn process_tc(&mut self, frame: &[u8]) -> Result<TcFrameRaw, i32>;

    /// Apply security to an AOS frame in place.
    ///
    /// The engine mutates and may resize the caller's buffer; the buffer
    /// length after the call is the frame length.
    fn apply_aos(&mut self, frame: &mut Vec<u8>) -> Result<(), i32>;

    /// Process (validate and unwrap) a secured AOS frame.
    fn process_aos(&mut self, frame: &[u8]) -> Result<AosFrameRaw, i32>;

    /// Apply security to a TM frame in place, as [`SecurityEngine::apply_aos`].
    fn apply_tm(&mut self, frame: &mut Vec<u8>) -> Result<(), i32>;

    /// Process (validate and unwrap) a secured TM frame.
    fn process_tm(&mut self, frame: &[u8]) -> Result<TmFrameRaw, i32>;

    /// Release engine resources. Called at most once per session.
    fn shutdown(&mut self);

    /// Render an engine status code as its symbolic name.
    fn error_code_to_string(&self, code: i32) -> String;
}
