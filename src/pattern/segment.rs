use regex::escape;
use std::fmt::Write;

/// Sub-pattern used by placeholders that carry no constraint.
pub const DEFAULT_PARAM_PATTERN: &str = "[^/]+";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: Option<String>,
    pub constraint: Option<String>,
}

impl Placeholder {
    pub fn regex(&self) -> &str {
        self.constraint.as_deref().unwrap_or(DEFAULT_PARAM_PATTERN)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    pub(crate) fn new(raw: String, segments: Vec<Segment>) -> Self {
        Self { raw, segments }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholders().count()
    }

    /// Names are kept for documentation only; extraction is positional.
    pub fn placeholder_names(&self) -> Vec<Option<&str>> {
        self.placeholders().map(|p| p.name.as_deref()).collect()
    }

    pub fn is_static(&self) -> bool {
        self.placeholder_count() == 0
    }

    /// Renders the pattern as an unanchored regex fragment with exactly one
    /// capturing group per placeholder, in left-to-right order.
    pub fn to_regex(&self) -> String {
        let mut out = String::with_capacity(self.raw.len() * 2);
        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => out.push_str(&escape(literal)),
                Segment::Placeholder(placeholder) => {
                    let _ = write!(out, "({})", placeholder.regex());
                }
            }
        }
        out
    }

    fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(placeholder) => Some(placeholder),
            Segment::Literal(_) => None,
        })
    }
}
