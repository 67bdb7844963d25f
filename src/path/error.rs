use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("path contains control or whitespace byte {byte} in '{input}'")]
    ControlOrWhitespace { input: String, byte: u8 },
    #[error("path '{input}' has an invalid percent escape at byte {index}")]
    InvalidPercentEncoding { input: String, index: usize },
    #[error("path '{input}' is not valid UTF-8 after percent decoding")]
    InvalidUtf8AfterDecoding { input: String },
}

pub type PathResult<T> = Result<T, PathError>;
