use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Payload layout errors
    #[error("Invalid payload layout: buffer of {buffer_len} bytes, identifier starting at byte {id_start_byte}")]
    InvalidLayout {
        buffer_len: usize,
        id_start_byte: usize,
    },

    #[error("Short payload: expected {expected} bytes, got {actual}")]
    ShortPayload { expected: usize, actual: usize },

    // Identifier errors
    #[error("Invalid card identifier: {0}")]
    InvalidCardId(String),
}

pub type Result<T> = std::result::Result<T, Error>;
