use regex::{Regex, RegexBuilder};
use smallvec::SmallVec;
use std::fmt;

use super::DecodingTrailer;
use crate::enums::HTTP_METHOD_COUNT;

/// Sealed chunk sequences, indexed by method.
pub type MethodChunks<H> = [Vec<Chunk<H>>; HTTP_METHOD_COUNT];

#[derive(Debug, Clone)]
pub(crate) struct Branch {
    pub(crate) fragment: Box<str>,
    pub(crate) first_group: usize,
    pub(crate) group_count: usize,
}

/// Result of matching one chunk expression against a trailer-suffixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkMatch<'s> {
    pub local_index: usize,
    pub params: SmallVec<[&'s str; 4]>,
}

/// A capacity-bounded group of routes for one method, sharing one
/// alternation expression.
pub struct Chunk<H> {
    capacity: usize,
    branches: Vec<Branch>,
    handlers: Vec<H>,
    regex: Option<Regex>,
    tail_group: usize,
    closed: bool,
}

impl<H> Chunk<H> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            branches: Vec::with_capacity(capacity),
            handlers: Vec::with_capacity(capacity),
            regex: None,
            tail_group: 1,
            closed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.branches.len() >= self.capacity
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn pattern(&self) -> Option<&str> {
        self.regex.as_ref().map(Regex::as_str)
    }

    pub fn handler(&self, local_index: usize) -> Option<&H> {
        self.handlers.get(local_index)
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
    }

    /// Compiles this chunk's expression as it would look with `fragment`
    /// appended as the next branch, without modifying the chunk.
    pub(crate) fn compile_with(
        &self,
        fragment: &str,
        trailer: &DecodingTrailer,
        case_sensitive: bool,
        size_limit: usize,
    ) -> Result<Regex, regex::Error> {
        let fragments = self
            .branches
            .iter()
            .map(|branch| &*branch.fragment)
            .chain(std::iter::once(fragment));

        let mut source = String::new();
        if !case_sensitive {
            source.push_str("(?i)");
        }
        source.push_str("^(?:");
        for (local_index, fragment) in fragments.enumerate() {
            if local_index > 0 {
                source.push('|');
            }
            source.push_str(fragment);
            source.push_str(trailer.decoration(local_index));
        }
        source.push(')');
        source.push_str(&trailer.tail_pattern());

        RegexBuilder::new(&source).size_limit(size_limit).build()
    }

    /// Appends a branch whose expression was produced by
    /// [`Chunk::compile_with`] for the same fragment.
    pub(crate) fn push_branch(
        &mut self,
        fragment: Box<str>,
        group_count: usize,
        regex: Regex,
        handler: H,
    ) -> usize {
        debug_assert!(!self.closed && !self.is_full());
        let local_index = self.branches.len();
        self.branches.push(Branch {
            fragment,
            first_group: self.tail_group,
            group_count,
        });
        self.handlers.push(handler);
        self.tail_group += group_count;
        debug_assert_eq!(regex.captures_len(), self.tail_group + 1);
        self.regex = Some(regex);
        local_index
    }

    /// Matches `subject` (a path with the trailer appended) and decodes the
    /// local index of the winning branch. `None` means no branch matched; an
    /// index outside the chunk is reported as `Err` with the decoded value.
    pub fn captures<'s>(
        &self,
        subject: &'s str,
        trailer: &DecodingTrailer,
    ) -> Option<Result<ChunkMatch<'s>, usize>> {
        let regex = self.regex.as_ref()?;
        let caps = regex.captures(subject)?;
        let remainder = caps.get(self.tail_group).map_or("", |m| m.as_str());
        let local_index = trailer.decode(remainder);

        let Some(branch) = self.branches.get(local_index) else {
            return Some(Err(local_index));
        };

        let params = (branch.first_group..branch.first_group + branch.group_count)
            .map(|group| caps.get(group).map_or("", |m| m.as_str()))
            .collect();

        Some(Ok(ChunkMatch {
            local_index,
            params,
        }))
    }
}

impl<H> fmt::Debug for Chunk<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("capacity", &self.capacity)
            .field("routes", &self.branches.len())
            .field("closed", &self.closed)
            .field("pattern", &self.pattern())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(chunk: &mut Chunk<&'static str>, fragment: &str, groups: usize, handler: &'static str) {
        let trailer = DecodingTrailer::new("0123456789", chunk.capacity()).unwrap();
        let regex = chunk.compile_with(fragment, &trailer, true, 1 << 20).unwrap();
        chunk.push_branch(fragment.into(), groups, regex, handler);
    }

    #[test]
    fn decodes_branch_and_positional_params() {
        let trailer = DecodingTrailer::new("0123456789", 4).unwrap();
        let mut chunk = Chunk::new(4);
        push(&mut chunk, "/users/([^/]+)", 1, "one");
        push(&mut chunk, "/users/([^/]+)/([^/]+)", 2, "two");
        push(&mut chunk, "/static", 0, "three");

        assert_eq!(
            chunk.pattern(),
            Some("^(?:/users/([^/]+)0123|/users/([^/]+)/([^/]+)012|/static01)([0-9]{0,3})$")
        );

        let mut subject = String::new();
        trailer.append_to("/users/42/edit", &mut subject);
        let found = chunk.captures(&subject, &trailer).unwrap().unwrap();
        assert_eq!(found.local_index, 1);
        assert_eq!(found.params.as_slice(), &["42", "edit"]);
        assert_eq!(chunk.handler(1), Some(&"two"));
        assert_eq!(chunk.handler(3), None);

        drop(found);
        trailer.append_to("/static", &mut subject);
        let found = chunk.captures(&subject, &trailer).unwrap().unwrap();
        assert_eq!(found.local_index, 2);
        assert!(found.params.is_empty());
    }

    #[test]
    fn trailing_digits_in_path_do_not_shift_the_boundary() {
        let trailer = DecodingTrailer::new("0123456789", 4).unwrap();
        let mut chunk = Chunk::new(4);
        push(&mut chunk, "/a", 0, "a");
        push(&mut chunk, "/n/([^/]+)", 1, "n");

        let mut subject = String::new();
        trailer.append_to("/a0", &mut subject);
        assert!(chunk.captures(&subject, &trailer).is_none());

        trailer.append_to("/n/0123", &mut subject);
        let found = chunk.captures(&subject, &trailer).unwrap().unwrap();
        assert_eq!(found.local_index, 1);
        assert_eq!(found.params.as_slice(), &["0123"]);
    }
}
