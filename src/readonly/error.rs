use crate::enums::HttpMethod;
use thiserror::Error;

/// Only internal invariant violations surface here; misses are not errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadOnlyError {
    #[error("{method} chunk {chunk} decoded local index {local_index} but holds only {routes} routes")]
    DecodedIndexOutOfRange {
        method: HttpMethod,
        chunk: usize,
        local_index: usize,
        routes: usize,
    },
}

pub type ReadOnlyResult<T> = Result<T, ReadOnlyError>;
