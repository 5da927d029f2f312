use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("representation catalog must not be empty")]
    EmptyCatalog,
    #[error("representation index {index} out of range (catalog has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type CoreResult<T> = Result<T, CoreError>;
