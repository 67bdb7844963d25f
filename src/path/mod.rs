mod error;
mod normalize;

pub use error::{PathError, PathResult};
pub use normalize::{NormalizationOptions, join, normalize, normalize_request_path};
