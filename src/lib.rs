pub mod chunk;
pub mod enums;
pub mod path;
pub mod pattern;
pub mod readonly;
pub mod registry;
pub mod router;
pub mod types;

pub use chunk::{ChunkError, DecodingTrailer, TrailerError};
pub use enums::{HttpMethod, MethodSet, UnknownMethod};
pub use path::{PathError, normalize};
pub use pattern::{PatternError, parse_pattern};
pub use readonly::{ReadOnlyError, RouterReadOnly};
pub use registry::RegistryMetrics;
pub use router::{
    Router, RouterError, RouterOptions, RouterOptionsBuilder, RouterOptionsError, RouterResult,
    Scope,
};
pub use types::{Dispatch, NotFound, Params, RouteMatch, RouteSlot};
