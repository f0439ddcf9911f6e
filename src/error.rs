//! Error types for the hotspot gateway application

use thiserror::Error;

/// Startup-level application error type
///
/// Errors produced while the gateway boots: configuration, socket binding,
/// address parsing. Request-level failures live in `routeros::PoolError`,
/// `routeros::RouterError` and `hotspot::BackendError`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or IO error
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// Address parsing error
    #[error("Address parse error")]
    AddrParse(#[from] std::net::AddrParseError),
}

/// Convenient alias for Result with application error
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = AppError::Config("ROUTEROS_ADDRESS is not set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: ROUTEROS_ADDRESS is not set"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_addr_parse_error_conversion() {
        let parse_result = "not-an-address".parse::<std::net::SocketAddr>();
        assert!(parse_result.is_err());
        let app_err: AppError = parse_result.unwrap_err().into();
        assert!(matches!(app_err, AppError::AddrParse(_)));
    }
}
