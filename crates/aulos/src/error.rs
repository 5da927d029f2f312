use aulos_abr::AbrError;
use aulos_bandwidth::BandwidthError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AulosError {
    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("bandwidth error: {0}")]
    Bandwidth(#[from] BandwidthError),
    #[error("abr error: {0}")]
    Abr(#[from] AbrError),
}

pub type AulosResult<T> = Result<T, AulosError>;
