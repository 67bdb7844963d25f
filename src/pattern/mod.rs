mod error;
mod parser;
mod segment;

pub use error::{PatternError, PatternResult};
pub use parser::parse_pattern;
pub use segment::{DEFAULT_PARAM_PATTERN, Pattern, Placeholder, Segment};
