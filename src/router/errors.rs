use crate::chunk::ChunkError;
use crate::readonly::ReadOnlyError;
use crate::router::RouterOptionsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("router is sealed; cannot add route '{path}'")]
    AddWhileSealed { path: String },
    #[error("router is sealed; cannot add {count} routes in bulk")]
    BulkAddWhileSealed { count: usize },
    #[error("router is not sealed; cannot perform route lookup")]
    FindWhileMutable,
    #[error("router is not sealed; readonly snapshot is unavailable")]
    ReadOnlyUnavailable,
    #[error(transparent)]
    Chunk(#[from] ChunkError),
    #[error(transparent)]
    ReadOnly(#[from] ReadOnlyError),
    #[error(transparent)]
    Options(#[from] RouterOptionsError),
}

pub type RouterResult<T> = Result<T, RouterError>;
