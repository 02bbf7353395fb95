use thiserror::Error;

/// Main error type for SDLS operations
#[derive(Error, Debug)]
pub enum SdlsError {
    #[error("No frame data: {0}")]
    NoFrameData(String),

    #[error("Bad data format: {0}")]
    BadDataFormat(String),

    #[error("Invalid connection type: {0}")]
    InvalidConnectionType(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid configuration value for '{key}': '{value}'")]
    InvalidConfigurationValue { key: String, value: String },

    #[error("Configuration parameter is necessary for {context} mTLS connection: {key}")]
    MissingConfigurationParameter { context: String, key: String },

    #[error("Necessary file doesn't exist '{path}' from configuration parameter: {key}")]
    FileDoesNotExist { path: String, key: String },

    #[error(
        "Invalid managed parameter format '{key}'. Format must be \
         'cryptolib.<frame type>.<scid>.<vcid>.<tfvn>.has_ecf=<bool>'"
    )]
    InvalidManagedParameterFormat { key: String },

    #[error("Unable to initialize the SDLS engine with the provided configuration. Error code: {status}, {detail}")]
    SdlsInitialization { status: i32, detail: String },

    #[error("SDLS apply security failed. Error code: {status}, {detail}")]
    ApplySecurity { status: i32, detail: String },

    #[error("SDLS process security failed. Error code: {status}, {detail}")]
    ProcessSecurity { status: i32, detail: String },
}

impl SdlsError {
    /// The engine status code carried by initialization, apply and process
    /// failures. `None` for errors raised before the engine was reached.
    pub fn engine_status(&self) -> Option<i32> {
        match self {
            SdlsError::SdlsInitialization { status, .. }
            | SdlsError::ApplySecurity { status, .. }
            | SdlsError::ProcessSecurity { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for SDLS operations
pub type SdlsResult<T> = Result<T, SdlsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_status() {
        let err = SdlsError::ApplySecurity {
            status: 0x1F,
            detail: "CRYPTO_LIB_ERR_NO_INIT".to_string(),
        };
        assert_eq!(err.engine_status(), Some(0x1F));

        let err = SdlsError::NoFrameData("empty".to_string());
        assert_eq!(err.engine_status(), None);
    }

    #[test]
    fn test_engine_detail_rendered_in_message() {
        let err = SdlsError::ProcessSecurity {
            status: 34,
            detail: "CRYPTO_LIB_ERR_INVALID_SA_SERVICE_TYPE".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("Error code: 34"));
        assert!(message.contains("CRYPTO_LIB_ERR_INVALID_SA_SERVICE_TYPE"));
    }
}
