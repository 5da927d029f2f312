use aulos_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbrError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("invalid option: {0}")]
    InvalidOption(String),
}

pub type AbrResult<T> = Result<T, AbrError>;
