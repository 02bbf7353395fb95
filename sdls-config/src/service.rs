//! Remote crypto service connection parameters

use serde::{Deserialize, Serialize};

/// Connection parameters for the remote crypto service.
///
/// The service only supports mutually authenticated TLS; when the crypto
/// backend selects it, the builder has already verified that client
/// certificate, key and CA bundle exist on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoServiceConfig {
    /// Service protocol, `https` or `http`
    pub protocol: String,
    /// Service host
    pub fqdn: String,
    /// Service port
    pub port: u16,
    /// Application path on the service host
    pub app: String,
    /// CA bundle file
    pub cacert: Option<String>,
    /// CA directory
    pub capath: Option<String>,
    /// Verify the service hostname against its certificate
    pub verify_server: bool,
    /// mTLS client certificate file
    pub mtls_client_cert: Option<String>,
    /// mTLS client certificate format
    pub mtls_client_cert_format: String,
    /// mTLS client key file
    pub mtls_client_key: Option<String>,
    /// mTLS client key password
    pub mtls_client_key_password: Option<String>,
    /// Issuer certificate file
    pub issuer_cert: Option<String>,
}
