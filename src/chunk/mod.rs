mod builder;
mod compiled;
mod encoding;
mod error;

pub use builder::ChunkBuilder;
pub use compiled::{Chunk, ChunkMatch, MethodChunks};
pub use encoding::{DEFAULT_CHUNK_CAPACITY, DEFAULT_TRAILER_DIGITS, DecodingTrailer, TrailerError};
pub use error::{ChunkError, ChunkResult};
