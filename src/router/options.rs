use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chunk::{DEFAULT_CHUNK_CAPACITY, DEFAULT_TRAILER_DIGITS, DecodingTrailer, TrailerError};
use crate::path::NormalizationOptions;

/// Largest capacity a chunk may be configured with.
pub const MAX_CHUNK_CAPACITY: usize = 255;

/// Matches the regex crate's own default compiled-size ceiling.
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouterOptions {
    /// Alternation branches per combined expression. Lower it when the target
    /// regex engine degrades on wide alternations; raise it to trade fewer
    /// match attempts for larger compiled programs.
    pub chunk_capacity: usize,
    /// Digits appended to each request path to recover the matching branch.
    pub decoding_trailer: String,
    pub regex_size_limit: usize,
    pub case_sensitive: bool,
    pub strict_trailing_slash: bool,
    pub allow_duplicate_slash: bool,
    pub decode_uri: bool,
    pub debug: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            chunk_capacity: DEFAULT_CHUNK_CAPACITY,
            decoding_trailer: DEFAULT_TRAILER_DIGITS.to_string(),
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
            case_sensitive: true,
            strict_trailing_slash: false,
            allow_duplicate_slash: false,
            decode_uri: false,
            debug: false,
        }
    }
}

impl RouterOptions {
    pub fn builder() -> RouterOptionsBuilder {
        RouterOptionsBuilder::default()
    }

    pub fn validate(&self) -> Result<(), RouterOptionsError> {
        self.trailer().map(|_| ())
    }

    pub(crate) fn trailer(&self) -> Result<DecodingTrailer, RouterOptionsError> {
        if !(1..=MAX_CHUNK_CAPACITY).contains(&self.chunk_capacity) {
            return Err(RouterOptionsError::ChunkCapacityOutOfRange {
                provided: self.chunk_capacity,
                max: MAX_CHUNK_CAPACITY,
            });
        }
        if self.regex_size_limit == 0 {
            return Err(RouterOptionsError::RegexSizeLimitZero);
        }
        Ok(DecodingTrailer::new(
            &self.decoding_trailer,
            self.chunk_capacity,
        )?)
    }

    pub fn normalization(&self) -> NormalizationOptions {
        NormalizationOptions {
            decode_percent: self.decode_uri,
            allow_duplicate_slash: self.allow_duplicate_slash,
            strict_trailing_slash: self.strict_trailing_slash,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct RouterOptionsBuilder {
    options: RouterOptions,
}

impl RouterOptionsBuilder {
    pub fn chunk_capacity(mut self, value: usize) -> Self {
        self.options.chunk_capacity = value;
        self
    }

    pub fn decoding_trailer<S: Into<String>>(mut self, value: S) -> Self {
        self.options.decoding_trailer = value.into();
        self
    }

    pub fn regex_size_limit(mut self, value: usize) -> Self {
        self.options.regex_size_limit = value;
        self
    }

    pub fn case_sensitive(mut self, value: bool) -> Self {
        self.options.case_sensitive = value;
        self
    }

    pub fn strict_trailing_slash(mut self, value: bool) -> Self {
        self.options.strict_trailing_slash = value;
        self
    }

    pub fn allow_duplicate_slash(mut self, value: bool) -> Self {
        self.options.allow_duplicate_slash = value;
        self
    }

    pub fn decode_uri(mut self, value: bool) -> Self {
        self.options.decode_uri = value;
        self
    }

    pub fn debug(mut self, value: bool) -> Self {
        self.options.debug = value;
        self
    }

    pub fn build(self) -> Result<RouterOptions, RouterOptionsError> {
        let options = self.options;
        options.validate()?;
        Ok(options)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouterOptionsError {
    #[error("chunk_capacity must be between 1 and {max} (got {provided})")]
    ChunkCapacityOutOfRange { provided: usize, max: usize },
    #[error("regex_size_limit must be greater than zero")]
    RegexSizeLimitZero,
    #[error(transparent)]
    Trailer(#[from] TrailerError),
}
