//! Process-wide SDLS security session
//!
//! Owns the immutable configuration snapshot and the engine handle.
//! Construction pushes the configuration into the engine and initializes
//! it exactly once; a nonzero initialization status is fatal. Apply and
//! process operations validate their input before the engine is invoked
//! and map engine failures into typed errors carrying the engine's status
//! code and its rendered name.

use sdls_config::SdlsConfig;
use sdls_core::{SdlsError, SdlsResult};
use sdls_frame::{AosFrame, TcFrame, TmFrame};

use crate::engine::{ENGINE_SUCCESS, SecurityEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Initialized,
    ShutDown,
}

/// Security session facade.
///
/// Valid operations follow `Initialized -> ShutDown`; apply/process are
/// only accepted while initialized. The `&mut self` receivers serialize
/// access to the engine, whose apply/process calls mutate shared SA and
/// anti-replay state.
#[derive(Debug)]
pub struct SecuritySession<E: SecurityEngine> {
    config: SdlsConfig,
    engine: E,
    state: SessionState,
}

impl<E: SecurityEngine> SecuritySession<E> {
    /// Configure and initialize the engine, consuming the snapshot.
    ///
    /// Configuration is pushed in a fixed order: link parameters, SA
    /// storage, crypto service, access manager (only when enabled), then
    /// every managed parameter row. A nonzero `init` status fails with
    /// [`SdlsError::SdlsInitialization`].
    pub fn initialize(config: SdlsConfig, mut engine: E) -> SdlsResult<Self> {
        engine.configure_link_parameters(&config.link);
        engine.configure_sa_storage(&config.sa_storage);
        engine.configure_crypto_service(&config.crypto_service);
        if config.cam.enabled {
            engine.configure_access_manager(&config.cam);
        }
        for parameter in &config.managed_parameters {
            engine.add_managed_parameter(parameter);
        }

        let status = engine.init();
        if status != ENGINE_SUCCESS {
            return Err(SdlsError::SdlsInitialization {
                status,
                detail: engine.error_code_to_string(status),
            });
        }
        log::info!(
            "SDLS session initialized with {} managed parameter(s)",
            config.managed_parameters.len()
        );

        Ok(Self {
            config,
            engine,
            state: SessionState::Initialized,
        })
    }

    /// The configuration snapshot this session was initialized with.
    pub fn config(&self) -> &SdlsConfig {
        &self.config
    }

    /// Apply security to a TC transfer frame.
    ///
    /// The input must exclude the FECF. Returns the engine-produced
    /// buffer, which may be longer than the input.
    pub fn apply_tc(&mut self, frame: &[u8]) -> SdlsResult<Vec<u8>> {
        self.ensure_active()?;
        validate_input(frame)?;
        self.engine
            .apply_tc(frame)
            .map_err(|status| self.apply_error(status))
    }

    /// Remove and validate security on a TC transfer frame.
    pub fn process_tc(&mut self, frame: &[u8]) -> SdlsResult<TcFrame> {
        self.ensure_active()?;
        validate_input(frame)?;
        let raw = self
            .engine
            .process_tc(frame)
            .map_err(|status| self.process_error(status))?;
        TcFrame::decode(&raw)
    }

    /// Apply security to an AOS transfer frame in place.
    ///
    /// The engine mutates and may resize the caller's buffer; the
    /// returned view is bounded by the new length, which may differ from
    /// the original.
    pub fn apply_aos<'a>(&mut self, frame: &'a mut Vec<u8>) -> SdlsResult<&'a [u8]> {
        self.ensure_active()?;
        validate_input(frame)?;
        if let Err(status) = self.engine.apply_aos(frame) {
            return Err(self.apply_error(status));
        }
        Ok(frame.as_slice())
    }

    /// Remove and validate security on an AOS transfer frame.
    pub fn process_aos(&mut self, frame: &[u8]) -> SdlsResult<AosFrame> {
        self.ensure_active()?;
        validate_input(frame)?;
        let raw = self
            .engine
            .process_aos(frame)
            .map_err(|status| self.process_error(status))?;
        AosFrame::decode(&raw)
    }

    /// Apply security to a TM transfer frame in place, as [`Self::apply_aos`].
    pub fn apply_tm<'a>(&mut self, frame: &'a mut Vec<u8>) -> SdlsResult<&'a [u8]> {
        self.ensure_active()?;
        validate_input(frame)?;
        if let Err(status) = self.engine.apply_tm(frame) {
            return Err(self.apply_error(status));
        }
        Ok(frame.as_slice())
    }

    /// Remove and validate security on a TM transfer frame.
    pub fn process_tm(&mut self, frame: &[u8]) -> SdlsResult<TmFrame> {
        self.ensure_active()?;
        validate_input(frame)?;
        let raw = self
            .engine
            .process_tm(frame)
            .map_err(|status| self.process_error(status))?;
        TmFrame::decode(&raw)
    }

    /// Release engine resources. Idempotent; repeated calls are no-ops.
    pub fn shutdown(&mut self) {
        if self.state == SessionState::ShutDown {
            return;
        }
        self.engine.shutdown();
        self.state = SessionState::ShutDown;
        log::info!("SDLS session shut down");
    }

    /// Whether the session has been shut down.
    pub fn is_shut_down(&self) -> bool {
        self.state == SessionState::ShutDown
    }

    fn ensure_active(&self) -> SdlsResult<()> {
        if self.state == SessionState::ShutDown {
            return Err(SdlsError::InvalidConfiguration(
                "security session has been shut down".to_string(),
            ));
        }
        Ok(())
    }

    fn apply_error(&self, status: i32) -> SdlsError {
        SdlsError::ApplySecurity {
            status,
            detail: self.engine.error_code_to_string(status),
        }
    }

    fn process_error(&self, status: i32) -> SdlsError {
        SdlsError::ProcessSecurity {
            status,
            detail: self.engine.error_code_to_string(status),
        }
    }
}

fn validate_input(frame: &[u8]) -> SdlsResult<()> {
    if frame.is_empty() {
        return Err(SdlsError::NoFrameData(
            "input transfer frame is empty".to_string(),
        ));
    }
    // The engine carries frame lengths in a 16-bit field.
    if frame.len() > u16::MAX as usize {
        return Err(SdlsError::BadDataFormat(format!(
            "input transfer frame is {} bytes, at most {} are supported",
            frame.len(),
            u16::MAX
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MockSecurityEngine;
    use bytes::Bytes;
    use mockall::Sequence;
    use sdls_frame::{SecurityHeaderRaw, SecurityTrailerRaw, TcFrameRaw, TcPrimaryHeader};

    fn test_config(extra: &[&str]) -> SdlsConfig {
        let mut entries = vec!["cryptolib.crypto.type=libgcrypt".to_string()];
        entries.extend(extra.iter().map(|s| s.to_string()));
        SdlsConfig::from_entries(entries).unwrap()
    }

    /// Expectations for the configuration push of a CAM-less config.
    fn expect_configuration(mock: &mut MockSecurityEngine, managed_rows: usize) {
        mock.expect_configure_link_parameters()
            .times(1)
            .return_const(());
        mock.expect_configure_sa_storage().times(1).return_const(());
        mock.expect_configure_crypto_service()
            .times(1)
            .return_const(());
        mock.expect_add_managed_parameter()
            .times(managed_rows)
            .return_const(());
    }

    fn tc_raw() -> TcFrameRaw {
        TcFrameRaw {
            header: TcPrimaryHeader {
                tfvn: 0,
                bypass: 1,
                control_command: 0,
                spare: 0,
                scid: 44,
                vcid: 1,
                frame_length: 32,
                frame_sequence_number: 7,
            },
            security_header: SecurityHeaderRaw {
                segment_header: 0xC0,
                spi: 3,
                iv: Bytes::from(vec![0xA0; 16]),
                iv_field_len: 12,
                sn: Bytes::new(),
                sn_field_len: 0,
                pad: Bytes::new(),
                pad_field_len: 0,
            },
            pdu: Bytes::from(vec![0x42; 8]),
            pdu_len: 8,
            security_trailer: SecurityTrailerRaw {
                mac: Bytes::from(vec![0x0F; 16]),
                mac_field_len: 16,
                ocf: Bytes::new(),
                ocf_field_len: 0,
                fecf: 0x1234,
            },
        }
    }

    #[test]
    fn test_initialize_pushes_configuration_in_order() {
        let config = test_config(&["cryptolib.tc.44.1.0.has_ecf=true"]);
        let mut mock = MockSecurityEngine::new();
        let mut seq = Sequence::new();
        mock.expect_configure_link_parameters()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        mock.expect_configure_sa_storage()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        mock.expect_configure_crypto_service()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        mock.expect_add_managed_parameter()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|p| p.scid == 44 && p.vcid == 1 && p.ecf.engine_value() == 1)
            .return_const(());
        mock.expect_init()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(ENGINE_SUCCESS);

        let session = SecuritySession::initialize(config, mock).unwrap();
        assert!(!session.is_shut_down());
    }

    #[test]
    fn test_initialize_failure_is_fatal_and_carries_status() {
        let config = test_config(&[]);
        let mut mock = MockSecurityEngine::new();
        expect_configuration(&mut mock, 0);
        mock.expect_init().times(1).return_const(40);
        mock.expect_error_code_to_string()
            .times(1)
            .returning(|code| format!("CRYPTO_LIB_ERR_{}", code));

        let err = SecuritySession::initialize(config, mock).unwrap_err();
        match err {
            SdlsError::SdlsInitialization { status, detail } => {
                assert_eq!(status, 40);
                assert_eq!(detail, "CRYPTO_LIB_ERR_40");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cam_is_forwarded_only_when_enabled() {
        let config = test_config(&["cryptolib.cam.enabled=true"]);
        let mut mock = MockSecurityEngine::new();
        expect_configuration(&mut mock, 0);
        mock.expect_configure_access_manager()
            .times(1)
            .withf(|cam| cam.enabled)
            .return_const(());
        mock.expect_init().times(1).return_const(ENGINE_SUCCESS);
        SecuritySession::initialize(config, mock).unwrap();

        // Disabled: the mock panics on an unexpected CAM call.
        let config = test_config(&[]);
        let mut mock = MockSecurityEngine::new();
        expect_configuration(&mut mock, 0);
        mock.expect_init().times(1).return_const(ENGINE_SUCCESS);
        SecuritySession::initialize(config, mock).unwrap();
    }

    fn initialized_session() -> SecuritySession<MockSecurityEngine> {
        let config = test_config(&[]);
        let mut mock = MockSecurityEngine::new();
        expect_configuration(&mut mock, 0);
        mock.expect_init().times(1).return_const(ENGINE_SUCCESS);
        SecuritySession::initialize(config, mock).unwrap()
    }

    #[test]
    fn test_apply_tc_rejects_empty_input_before_engine() {
        // No apply_tc expectation: an engine call would panic the mock.
        let mut session = initialized_session();
        let err = session.apply_tc(&[]).unwrap_err();
        assert!(matches!(err, SdlsError::NoFrameData(_)));
    }

    #[test]
    fn test_apply_tc_rejects_oversized_input_before_engine() {
        let mut session = initialized_session();
        let frame = vec![0u8; u16::MAX as usize + 1];
        let err = session.apply_tc(&frame).unwrap_err();
        assert!(matches!(err, SdlsError::BadDataFormat(_)));
    }

    #[test]
    fn test_apply_tc_returns_engine_buffer() {
        let mut session = initialized_session();
        session
            .engine
            .expect_apply_tc()
            .times(1)
            .returning(|frame| {
                let mut out = frame.to_vec();
                out.extend_from_slice(&[0xEE; 18]);
                Ok(out)
            });
        let secured = session.apply_tc(&[0x20, 0x03]).unwrap();
        assert_eq!(secured.len(), 20);
        assert_eq!(&secured[..2], &[0x20, 0x03]);
    }

    #[test]
    fn test_apply_tc_engine_failure_maps_to_apply_security() {
        let mut session = initialized_session();
        session
            .engine
            .expect_apply_tc()
            .times(1)
            .returning(|_| Err(34));
        session
            .engine
            .expect_error_code_to_string()
            .times(1)
            .returning(|_| "CRYPTO_LIB_ERR_INVALID_SA_SERVICE_TYPE".to_string());
        let err = session.apply_tc(&[0x20]).unwrap_err();
        assert_eq!(err.engine_status(), Some(34));
        assert!(matches!(err, SdlsError::ApplySecurity { .. }));
    }

    #[test]
    fn test_process_tc_decodes_engine_result() {
        let mut session = initialized_session();
        let raw = tc_raw();
        session
            .engine
            .expect_process_tc()
            .times(1)
            .returning(move |_| Ok(raw.clone()));
        let frame = session.process_tc(&[0x20, 0x03, 0x00]).unwrap();
        assert_eq!(frame.header.scid, 44);
        assert_eq!(frame.security_header.spi, 3);
        assert_eq!(frame.security_header.iv_len(), 12);
        assert_eq!(frame.pdu.len(), 8);
        assert_eq!(frame.security_trailer.mac_len(), 16);
        assert_eq!(frame.security_trailer.fecf, 0x1234);
    }

    #[test]
    fn test_process_tm_engine_failure_maps_to_process_security() {
        let mut session = initialized_session();
        session
            .engine
            .expect_process_tm()
            .times(1)
            .returning(|_| Err(2));
        session
            .engine
            .expect_error_code_to_string()
            .times(1)
            .returning(|_| "CRYPTO_LIB_ERR_INVALID_HEADER".to_string());
        let err = session.process_tm(&[0x00]).unwrap_err();
        assert!(matches!(err, SdlsError::ProcessSecurity { status: 2, .. }));
    }

    #[test]
    fn test_apply_aos_returns_view_of_resized_buffer() {
        let mut session = initialized_session();
        session
            .engine
            .expect_apply_aos()
            .times(1)
            .returning(|frame| {
                frame.truncate(3);
                Ok(())
            });
        let mut buffer = vec![0x40u8; 10];
        let view = session.apply_aos(&mut buffer).unwrap();
        assert_eq!(view.len(), 3);
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut session = initialized_session();
        session.engine.expect_shutdown().times(1).return_const(());
        session.shutdown();
        session.shutdown();
        assert!(session.is_shut_down());
    }

    #[test]
    fn test_operations_after_shutdown_fail_without_engine_call() {
        let mut session = initialized_session();
        session.engine.expect_shutdown().times(1).return_const(());
        session.shutdown();
        let err = session.apply_tc(&[0x20]).unwrap_err();
        assert!(matches!(err, SdlsError::InvalidConfiguration(_)));
        let err = session.process_aos(&[0x40]).unwrap_err();
        assert!(matches!(err, SdlsError::InvalidConfiguration(_)));
    }
}
