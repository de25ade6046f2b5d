use thiserror::Error;

pub type SortxResult<T> = std::result::Result<T, SortxError>;

#[derive(Debug, Error)]
pub enum SortxError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Engine(#[from] rec_spill_sort::SortError),
}

impl SortxError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

#[macro_export]
macro_rules! sortx_error {
    ($($arg:tt)*) => {
        $crate::error::SortxError::message(format!($($arg)*))
    };
}
