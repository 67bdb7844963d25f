//! Local-index encoding through a synthetic digit trailer.
//!
//! Every request path is matched with the trailer appended. The branch for
//! local index `i` ends with the literal trailer prefix of length `C - i`, and
//! the chunk expression closes with one shared group capturing the remaining
//! digits. That remainder is exactly `i` digits long, so the winning branch is
//! recovered from a length without a capture group per route.
//!
//! The first trailer digit never reappears later in the trailer. A placeholder
//! therefore cannot swallow part of the trailer, and a path that ends in digits
//! cannot pose as a shorter path: either would need that digit again.

use thiserror::Error;

/// Empirically safe number of alternation branches per combined expression.
pub const DEFAULT_CHUNK_CAPACITY: usize = 33;

pub const DEFAULT_TRAILER_DIGITS: &str = "0123456789";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrailerError {
    #[error("decoding trailer '{digits}' must contain only ASCII digits")]
    NotDigits { digits: String },
    #[error("decoding trailer '{digits}' must contain at least two digits")]
    TooShort { digits: String },
    #[error("decoding trailer '{digits}' repeats its leading digit")]
    LeadingDigitRepeated { digits: String },
    #[error("chunk capacity must be at least 1")]
    ZeroCapacity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodingTrailer {
    run: Box<str>,
}

impl DecodingTrailer {
    /// Builds a trailer of exactly `capacity` digits: the configured digits
    /// followed by the same digits minus the leading one, cycled.
    pub fn new(digits: &str, capacity: usize) -> Result<Self, TrailerError> {
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TrailerError::NotDigits {
                digits: digits.to_string(),
            });
        }
        if digits.len() < 2 {
            return Err(TrailerError::TooShort {
                digits: digits.to_string(),
            });
        }
        let lead = digits.as_bytes()[0];
        if digits.bytes().skip(1).any(|b| b == lead) {
            return Err(TrailerError::LeadingDigitRepeated {
                digits: digits.to_string(),
            });
        }
        if capacity == 0 {
            return Err(TrailerError::ZeroCapacity);
        }

        let mut run = String::with_capacity(capacity);
        run.push(lead as char);
        run.extend(digits[1..].chars().cycle().take(capacity - 1));

        Ok(Self {
            run: run.into_boxed_str(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.run
    }

    /// Number of local indices this trailer can tell apart.
    pub fn capacity(&self) -> usize {
        self.run.len()
    }

    /// Literal suffix appended to the branch holding `local_index`.
    pub fn decoration(&self, local_index: usize) -> &str {
        debug_assert!(local_index < self.capacity());
        &self.run[..self.capacity() - local_index]
    }

    /// Shared closing group of every chunk expression.
    pub fn tail_pattern(&self) -> String {
        format!("([0-9]{{0,{}}})$", self.capacity() - 1)
    }

    /// Inverse of [`DecodingTrailer::decoration`].
    #[inline]
    pub fn decode(&self, remainder: &str) -> usize {
        remainder.len()
    }

    /// Copies `path` into `buf` followed by the trailer.
    pub fn append_to(&self, path: &str, buf: &mut String) {
        buf.clear();
        buf.reserve(path.len() + self.run.len());
        buf.push_str(path);
        buf.push_str(&self.run);
    }
}

impl Default for DecodingTrailer {
    fn default() -> Self {
        let lead = DEFAULT_TRAILER_DIGITS.chars().take(1);
        let rest = DEFAULT_TRAILER_DIGITS[1..].chars().cycle();
        Self {
            run: lead
                .chain(rest)
                .take(DEFAULT_CHUNK_CAPACITY)
                .collect::<String>()
                .into_boxed_str(),
        }
    }
}
