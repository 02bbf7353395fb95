//! Configuration snapshot builder
//!
//! Parses an ordered sequence of `key=value` strings into one immutable
//! [`SdlsConfig`]. All validation happens here, before the engine is ever
//! initialized: permissive boolean/integer/hex parsing, the managed
//! parameter key pattern, mTLS sibling requirements and credential file
//! existence. A misconfigured deployment never reaches frame processing.
//!
//! Key namespace:
//! - `cryptolib.sadb.*` — SA storage backend and MariaDB transport
//! - `cryptolib.crypto.*` — crypto backend and remote service transport
//! - `cryptolib.cam.*` — access manager subsystem
//! - `cryptolib.{tc,tm,aos}.*` — link-layer processing flags
//! - `cryptolib.<type>.<scid>.<vcid>.<tfvn>.{has_ecf,has_segmentation_header,max_frame_length}`
//!   — managed parameter rows

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use sdls_core::{SdlsError, SdlsResult};

use crate::backend::{CamLoginMethod, CryptoBackend, SaStorageBackend};
use crate::cam::CamConfig;
use crate::flags::LinkParameters;
use crate::managed::{EcfPresence, FrameType, ManagedParameter};
use crate::service::CryptoServiceConfig;
use crate::storage::SaStorageConfig;
use crate::value::{ConfigMap, invalid_value, parse_bool};

/// CA bundle used when mTLS is configured without an explicit bundle.
const AMMOS_CA_BUNDLE: &str = "/etc/pki/tls/certs/ammos-ca-bundle.crt";

const SADB_TLS_CACERT_KEY: &str = "cryptolib.sadb.mariadb.tls.cacert";
const SADB_TLS_VERIFY_SERVER_KEY: &str = "cryptolib.sadb.mariadb.tls.verifyserver";
const SADB_MTLS_CLIENT_CERT_KEY: &str = "cryptolib.sadb.mariadb.mtls.clientcert";
const SADB_MTLS_CLIENT_KEY_KEY: &str = "cryptolib.sadb.mariadb.mtls.clientkey";
const SADB_REQUIRE_SECURE_TRANSPORT_KEY: &str = "cryptolib.sadb.mariadb.require_secure_transport";

const CRYPTO_CACERT_KEY: &str = "cryptolib.crypto.kmccryptoservice.cacert";
const CRYPTO_MTLS_CLIENT_CERT_KEY: &str = "cryptolib.crypto.kmccryptoservice.mtls.clientcert";
const CRYPTO_MTLS_CLIENT_KEY_KEY: &str = "cryptolib.crypto.kmccryptoservice.mtls.clientkey";

static MANAGED_PARAMETER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^cryptolib\.(?P<f_type>tc|tm|aos)\.(?P<scid>\d+)\.(?P<vcid>\d+)\.(?P<tfvn>\d+)\.has_ecf$")
        .expect("managed parameter pattern is valid")
});

/// Immutable configuration snapshot.
///
/// Created once at initialization and handed to the security session; no
/// field changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdlsConfig {
    /// Backend selections and link-layer processing flags
    pub link: LinkParameters,
    /// SA storage transport parameters
    pub sa_storage: SaStorageConfig,
    /// Crypto service transport parameters
    pub crypto_service: CryptoServiceConfig,
    /// Access manager parameters
    pub cam: CamConfig,
    /// Managed parameter rows, in configuration order
    pub managed_parameters: Vec<ManagedParameter>,
}

impl SdlsConfig {
    /// Build a validated snapshot from `key=value` entries.
    ///
    /// Later duplicates of a key override earlier ones. Fails fast on the
    /// first violation; see the crate documentation for the error
    /// taxonomy.
    pub fn from_entries<I, S>(entries: I) -> SdlsResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let map = ConfigMap::parse(entries)?;

        let link = resolve_link_parameters(&map)?;
        let sa_storage = resolve_sa_storage(&map)?;
        let crypto_service = resolve_crypto_service(&map, link.crypto_backend)?;
        let cam = resolve_cam(&map)?;
        let managed_parameters = resolve_managed_parameters(&map)?;

        log::info!(
            "SDLS configuration built: sa backend {}, crypto backend {}, {} managed parameter(s)",
            link.sa_backend,
            link.crypto_backend,
            managed_parameters.len()
        );

        Ok(Self {
            link,
            sa_storage,
            crypto_service,
            cam,
            managed_parameters,
        })
    }
}

fn resolve_link_parameters(map: &ConfigMap) -> SdlsResult<LinkParameters> {
    let sa_name = map.get_string("cryptolib.sadb.type", "mariadb");
    let sa_backend = SaStorageBackend::from_name(&sa_name).unwrap_or_else(|| {
        log::warn!("unrecognized SA storage backend '{}', using mariadb", sa_name);
        SaStorageBackend::MariaDb
    });
    let crypto_name = map.get_string("cryptolib.crypto.type", "kmccryptoservice");
    let crypto_backend = CryptoBackend::from_name(&crypto_name).unwrap_or_else(|| {
        log::warn!(
            "unrecognized crypto backend '{}', using kmccryptoservice",
            crypto_name
        );
        CryptoBackend::KmcCryptoService
    });

    // The frame-type-qualified key that is present selects both the flag
    // value and the frame-type bias; TC is the fallback namespace.
    let create_ecf = if map.contains("cryptolib.apply_tm.create_ecf") {
        EcfPresence::new(
            FrameType::Tm,
            map.get_bool("cryptolib.apply_tm.create_ecf", false)?,
        )
    } else if map.contains("cryptolib.apply_aos.create_ecf") {
        EcfPresence::new(
            FrameType::Aos,
            map.get_bool("cryptolib.apply_aos.create_ecf", false)?,
        )
    } else {
        EcfPresence::new(
            FrameType::Tc,
            map.get_bool("cryptolib.apply_tc.create_ecf", false)?,
        )
    };

    let check_fecf = if map.contains("cryptolib.process_tm.check_fecf") {
        EcfPresence::new(
            FrameType::Tm,
            map.get_bool("cryptolib.process_tm.check_fecf", false)?,
        )
    } else if map.contains("cryptolib.process_aos.check_fecf") {
        EcfPresence::new(
            FrameType::Aos,
            map.get_bool("cryptolib.process_aos.check_fecf", false)?,
        )
    } else {
        EcfPresence::new(
            FrameType::Tc,
            map.get_bool("cryptolib.process_tc.check_fecf", false)?,
        )
    };

    // First present wins: TM, then AOS, then the TC default.
    let vcid_bitmask = if map.contains("cryptolib.tm.vcid_bitmask") {
        map.get_hex_u8("cryptolib.tm.vcid_bitmask", 0x3F)?
    } else if map.contains("cryptolib.aos.vcid_bitmask") {
        map.get_hex_u8("cryptolib.aos.vcid_bitmask", 0x3F)?
    } else {
        map.get_hex_u8("cryptolib.tc.vcid_bitmask", 0x3F)?
    };

    Ok(LinkParameters {
        sa_backend,
        crypto_backend,
        create_ecf,
        process_pdus: map.get_bool("cryptolib.process_tc.process_pdus", false)?,
        has_pus_header: map.get_bool("cryptolib.tc.has_pus_header", false)?,
        ignore_sa_state: map.get_bool("cryptolib.process_tc.ignore_sa_state", true)?,
        ignore_antireplay: map.get_bool("cryptolib.process_tc.ignore_antireplay", true)?,
        unique_sa_per_mapid: map.get_bool("cryptolib.tc.unique_sa_per_mapid", false)?,
        check_fecf,
        vcid_bitmask,
        increment_nontransmitted_counter: map.get_bool(
            "cryptolib.tc.on_rollover_increment_nontransmitted_counter",
            true,
        )?,
    })
}

fn resolve_sa_storage(map: &ConfigMap) -> SdlsResult<SaStorageConfig> {
    let mut tls_cacert = map.get_optional(SADB_TLS_CACERT_KEY);
    let mut tls_verify_server = map.get_bool(SADB_TLS_VERIFY_SERVER_KEY, false)?;
    let mut require_secure_transport = map.get_bool(SADB_REQUIRE_SECURE_TRANSPORT_KEY, false)?;

    let mtls_client_cert = map.get_optional(SADB_MTLS_CLIENT_CERT_KEY);
    let mtls_client_key = map.get_optional(SADB_MTLS_CLIENT_KEY_KEY);

    // A client cert or key implies mTLS: both halves become mandatory,
    // the CA bundle falls back to the platform default and all three must
    // exist on disk before the engine sees the configuration.
    if mtls_client_cert.is_some() || mtls_client_key.is_some() {
        let cacert = map.get_string(SADB_TLS_CACERT_KEY, AMMOS_CA_BUNDLE);
        let cert = mtls_client_cert.as_deref().ok_or_else(|| {
            missing_parameter("SA storage", SADB_MTLS_CLIENT_CERT_KEY)
        })?;
        let key = mtls_client_key.as_deref().ok_or_else(|| {
            missing_parameter("SA storage", SADB_MTLS_CLIENT_KEY_KEY)
        })?;
        file_exists_or_error(cert, SADB_MTLS_CLIENT_CERT_KEY)?;
        file_exists_or_error(key, SADB_MTLS_CLIENT_KEY_KEY)?;
        file_exists_or_error(&cacert, SADB_TLS_CACERT_KEY)?;
        tls_cacert = Some(cacert);
    }

    // TLS in use: verification defaults escalate from disabled to
    // enabled. Explicit configuration still wins.
    if mtls_client_cert.is_some() {
        tls_verify_server = map.get_bool(SADB_TLS_VERIFY_SERVER_KEY, true)?;
        require_secure_transport = map.get_bool(SADB_REQUIRE_SECURE_TRANSPORT_KEY, true)?;
    }

    Ok(SaStorageConfig {
        fqdn: map.get_string("cryptolib.sadb.mariadb.fqdn", "localhost"),
        port: map.get_u16("cryptolib.sadb.mariadb.port", 3306)?,
        database_name: map.get_string("cryptolib.sadb.mariadb.database_name", "sadb"),
        username: map.get_string("cryptolib.sadb.mariadb.username", "sadb_user"),
        password: map.get_optional("cryptolib.sadb.mariadb.password"),
        tls_cacert,
        tls_capath: map.get_optional("cryptolib.sadb.mariadb.tls.capath"),
        tls_verify_server,
        mtls_client_cert,
        mtls_client_key,
        mtls_client_key_password: map.get_optional("cryptolib.sadb.mariadb.mtls.clientkeypassword"),
        require_secure_transport,
    })
}

fn resolve_crypto_service(
    map: &ConfigMap,
    crypto_backend: CryptoBackend,
) -> SdlsResult<CryptoServiceConfig> {
    let protocol = map.get_string("cryptolib.crypto.kmccryptoservice.protocol", "https");
    if protocol != "https" && protocol != "http" {
        return Err(SdlsError::InvalidConnectionType(format!(
            "crypto service protocol must be 'https' or 'http', got '{}'",
            protocol
        )));
    }

    let mut cacert = map.get_optional(CRYPTO_CACERT_KEY);
    let mtls_client_cert = map.get_optional(CRYPTO_MTLS_CLIENT_CERT_KEY);
    let mtls_client_key = map.get_optional(CRYPTO_MTLS_CLIENT_KEY_KEY);

    // The crypto service accepts only mutually authenticated clients, so
    // selecting it makes the mTLS material mandatory.
    if crypto_backend == CryptoBackend::KmcCryptoService {
        let bundle = map.get_string(CRYPTO_CACERT_KEY, AMMOS_CA_BUNDLE);
        let cert = mtls_client_cert.as_deref().ok_or_else(|| {
            missing_parameter("crypto service", CRYPTO_MTLS_CLIENT_CERT_KEY)
        })?;
        let key = mtls_client_key.as_deref().ok_or_else(|| {
            missing_parameter("crypto service", CRYPTO_MTLS_CLIENT_KEY_KEY)
        })?;
        file_exists_or_error(cert, CRYPTO_MTLS_CLIENT_CERT_KEY)?;
        file_exists_or_error(key, CRYPTO_MTLS_CLIENT_KEY_KEY)?;
        file_exists_or_error(&bundle, CRYPTO_CACERT_KEY)?;
        cacert = Some(bundle);
    }

    Ok(CryptoServiceConfig {
        protocol,
        fqdn: map.get_string("cryptolib.crypto.kmccryptoservice.fqdn", "localhost"),
        port: map.get_u16("cryptolib.crypto.kmccryptoservice.port", 8443)?,
        app: map.get_string("cryptolib.crypto.kmccryptoservice.app", "crypto-service"),
        cacert,
        capath: map.get_optional("cryptolib.crypto.kmccryptoservice.cacertpath"),
        verify_server: map.get_bool("cryptolib.crypto.kmccryptoservice.verifyserver", true)?,
        mtls_client_cert,
        mtls_client_cert_format: map.get_string(
            "cryptolib.crypto.kmccryptoservice.mtls.clientcertformat",
            "PEM",
        ),
        mtls_client_key,
        mtls_client_key_password: map
            .get_optional("cryptolib.crypto.kmccryptoservice.mtls.clientkeypassword"),
        issuer_cert: map.get_optional("cryptolib.crypto.kmccryptoservice.issuercert"),
    })
}

fn resolve_cam(map: &ConfigMap) -> SdlsResult<CamConfig> {
    let method_name = map.get_string("cryptolib.cam.login_method", "none");
    let login_method = CamLoginMethod::from_name(&method_name).unwrap_or_else(|| {
        log::warn!("unrecognized CAM login method '{}', using none", method_name);
        CamLoginMethod::None
    });

    let default_cookie = format!("{}/.cam_cookie_file", home_dir());

    Ok(CamConfig {
        enabled: map.get_bool("cryptolib.cam.enabled", false)?,
        cookie_file: map.get_string("cryptolib.cam.cookie_file", &default_cookie),
        keytab_file: map.get_optional("cryptolib.cam.keytab_file"),
        login_method,
        access_manager_uri: map.get_optional("cryptolib.cam.access_manager_uri"),
        username: map.get_optional("cryptolib.cam.username"),
        cam_home: map.get_string("cryptolib.cam.cam_home", "/ammos/css"),
    })
}

fn resolve_managed_parameters(map: &ConfigMap) -> SdlsResult<Vec<ManagedParameter>> {
    let mut parameters = Vec::new();

    // Every key containing `has_ecf` declares one row; anything else
    // containing the marker is a malformed declaration, not an unrelated
    // key.
    for key in map.keys() {
        if !key.contains("has_ecf") {
            continue;
        }
        let Some(caps) = MANAGED_PARAMETER_PATTERN.captures(key) else {
            return Err(SdlsError::InvalidManagedParameterFormat {
                key: key.to_string(),
            });
        };

        let frame_name = &caps["f_type"];
        let scid_text = &caps["scid"];
        let vcid_text = &caps["vcid"];
        let tfvn_text = &caps["tfvn"];

        let frame_type = FrameType::from_name(frame_name)
            .ok_or_else(|| invalid_value(key, frame_name))?;
        let scid: u16 = scid_text
            .parse()
            .map_err(|_| invalid_value(key, scid_text))?;
        let vcid: u8 = vcid_text
            .parse()
            .map_err(|_| invalid_value(key, vcid_text))?;
        let tfvn: u8 = tfvn_text
            .parse()
            .map_err(|_| invalid_value(key, tfvn_text))?;

        // ECF presence is required per row and has no default.
        let has_ecf = parse_bool(key, map.get(key).unwrap_or_default())?;

        // Sibling keys share the row prefix and carry their own defaults.
        let prefix = format!("cryptolib.{}.{}.{}.{}", frame_name, scid_text, vcid_text, tfvn_text);
        let max_frame_length = map.get_u16(&format!("{}.max_frame_length", prefix), 1024)?;
        let has_segmentation_header =
            map.get_bool(&format!("{}.has_segmentation_header", prefix), false)?;

        let parameter = ManagedParameter {
            scid,
            vcid,
            tfvn,
            ecf: EcfPresence::new(frame_type, has_ecf),
            has_segmentation_header,
            max_frame_length,
        };
        log::debug!(
            "managed parameter: {} scid {} vcid {} tfvn {} ecf {} seg {} max {}",
            frame_type,
            scid,
            vcid,
            tfvn,
            parameter.ecf.engine_value(),
            has_segmentation_header,
            max_frame_length
        );
        parameters.push(parameter);
    }

    Ok(parameters)
}

fn missing_parameter(context: &str, key: &str) -> SdlsError {
    SdlsError::MissingConfigurationParameter {
        context: context.to_string(),
        key: key.to_string(),
    }
}

fn file_exists_or_error(path: &str, key: &str) -> SdlsResult<()> {
    if !Path::new(path).exists() {
        return Err(SdlsError::FileDoesNotExist {
            path: path.to_string(),
            key: key.to_string(),
        });
    }
    Ok(())
}

fn home_dir() -> String {
    std::env::var("HOME").unwrap_or_else(|_| ".".to_string())
}
