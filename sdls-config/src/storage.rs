//! SA storage (MariaDB) connection parameters

use serde::{Deserialize, Serialize};

/// Connection parameters for the MariaDB-backed SA storage.
///
/// Optional fields are `None` when the deployment left them unset; the
/// engine treats absent and empty identically. Once a client certificate
/// or key is configured the builder has already verified that the full
/// mTLS material exists on disk and has escalated the TLS defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaStorageConfig {
    /// Database host
    pub fqdn: String,
    /// Database port
    pub port: u16,
    /// Database name
    pub database_name: String,
    /// Database username
    pub username: String,
    /// Database password
    pub password: Option<String>,
    /// TLS CA bundle file
    pub tls_cacert: Option<String>,
    /// TLS CA directory
    pub tls_capath: Option<String>,
    /// Verify the server certificate
    pub tls_verify_server: bool,
    /// mTLS client certificate file
    pub mtls_client_cert: Option<String>,
    /// mTLS client key file
    pub mtls_client_key: Option<String>,
    /// mTLS client key password
    pub mtls_client_key_password: Option<String>,
    /// Refuse non-TLS transport to the database
    pub require_secure_transport: bool,
}
