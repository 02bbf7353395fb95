//! Security session facade over the external SDLS engine
//!
//! The engine performing the actual cryptographic apply/process work is an
//! external collaborator reached through the [`SecurityEngine`] trait. The
//! [`SecuritySession`] owns the validated configuration snapshot and the
//! engine handle: configure and initialize exactly once, submit frames
//! many times, shut down once.

pub mod engine;
pub mod session;

pub use engine::{ENGINE_SUCCESS, SecurityEngine};
pub use session::SecuritySession;
