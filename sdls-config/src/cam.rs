//! Access manager (CAM) parameters

use serde::{Deserialize, Serialize};

use crate::backend::CamLoginMethod;

/// Access-manager subsystem parameters.
///
/// Resolved unconditionally from configuration but forwarded to the
/// engine only when `enabled` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CamConfig {
    /// Forward CAM configuration to the engine
    pub enabled: bool,
    /// Cookie file path
    pub cookie_file: String,
    /// Keytab file path, for the keytab login method
    pub keytab_file: Option<String>,
    /// Login method
    pub login_method: CamLoginMethod,
    /// Access manager URI
    pub access_manager_uri: Option<String>,
    /// Login username
    pub username: Option<String>,
    /// CAM installation directory
    pub cam_home: String,
}
