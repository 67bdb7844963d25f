use crate::enums::HttpMethod;
use crate::pattern::PatternError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("route '{path}' does not fit in an empty chunk (compiled size limit {size_limit} bytes)")]
    RouteTooLong { path: String, size_limit: usize },
    #[error("duplicate route for method {method} and pattern '{path}'")]
    DuplicateRoute { method: HttpMethod, path: String },
    #[error("route '{path}' was registered without any method")]
    EmptyMethodSet { path: String },
    #[error("route '{path}' produced an invalid combined expression: {error}")]
    Regex { path: String, error: String },
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

pub type ChunkResult<T> = Result<T, ChunkError>;
