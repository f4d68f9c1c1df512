use crate::upstream::UpstreamError;
use thiserror::Error;

/// Tilegate startup and runtime error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Upstream setup error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Audit log setup error: {0}")]
    Audit(#[from] crate::audit::AuditError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
