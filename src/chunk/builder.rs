use hashbrown::HashSet as FastHashSet;
use regex::Regex;

use super::{Chunk, ChunkError, ChunkResult, DecodingTrailer};
use crate::enums::HttpMethod;
use crate::pattern::Pattern;
use crate::types::RouteSlot;

/// Owns the append-only chunk sequence of one method and places routes into
/// it.
///
/// Only the last chunk is ever open. Once it reaches capacity, or can no
/// longer compile within the size limit, it is closed and left untouched.
pub struct ChunkBuilder<H> {
    method: HttpMethod,
    chunks: Vec<Chunk<H>>,
    trailer: DecodingTrailer,
    case_sensitive: bool,
    size_limit: usize,
    route_count: usize,
    closed_early: usize,
    // rendered fragments already placed in any chunk
    registered: FastHashSet<Box<str>>,
}

impl<H> ChunkBuilder<H> {
    pub fn new(
        method: HttpMethod,
        trailer: DecodingTrailer,
        case_sensitive: bool,
        size_limit: usize,
    ) -> Self {
        Self {
            method,
            chunks: Vec::new(),
            trailer,
            case_sensitive,
            size_limit,
            route_count: 0,
            closed_early: 0,
            registered: FastHashSet::new(),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn chunks(&self) -> &[Chunk<H>] {
        &self.chunks
    }

    pub fn trailer(&self) -> &DecodingTrailer {
        &self.trailer
    }

    pub fn capacity(&self) -> usize {
        self.trailer.capacity()
    }

    /// Number of alternation branches created so far.
    pub fn route_count(&self) -> usize {
        self.route_count
    }

    pub fn chunks_closed_early(&self) -> usize {
        self.closed_early
    }

    pub fn contains(&self, pattern: &Pattern) -> bool {
        self.registered.contains(pattern.to_regex().as_str())
    }

    #[tracing::instrument(level = "trace", skip_all, fields(method = %self.method, pattern = %pattern.raw()))]
    pub fn insert(&mut self, pattern: &Pattern, handler: H) -> ChunkResult<RouteSlot> {
        let fragment = pattern.to_regex();
        if self.registered.contains(fragment.as_str()) {
            return Err(ChunkError::DuplicateRoute {
                method: self.method,
                path: pattern.raw().to_string(),
            });
        }

        let slot = self.push_branch(&fragment, pattern, handler)?;
        self.registered.insert(fragment.into_boxed_str());
        Ok(slot)
    }

    /// Closes the open chunk and hands the finished sequence over.
    pub fn finish(&mut self) -> Vec<Chunk<H>> {
        if let Some(chunk) = self.chunks.last_mut() {
            chunk.close();
        }
        std::mem::take(&mut self.chunks)
    }

    fn push_branch(
        &mut self,
        fragment: &str,
        pattern: &Pattern,
        handler: H,
    ) -> ChunkResult<RouteSlot> {
        if self.open_chunk().is_none_or(Chunk::is_full) {
            self.open_new_chunk();
        }

        let regex = match self.compile_open(fragment) {
            Ok(regex) => regex,
            Err(regex::Error::CompiledTooBig(_)) if self.open_len() > 0 => {
                tracing::warn!(
                    method = %self.method,
                    chunk = self.chunks.len() - 1,
                    routes = self.open_len(),
                    pattern = %pattern.raw(),
                    "combined expression exceeds size limit; closing chunk early"
                );
                self.closed_early += 1;
                self.open_new_chunk();
                self.compile_open(fragment)
                    .map_err(|err| self.compile_error(err, pattern))?
            }
            Err(err) => return Err(self.compile_error(err, pattern)),
        };

        let chunk_index = self.chunks.len() - 1;
        let chunk = &mut self.chunks[chunk_index];
        let local_index =
            chunk.push_branch(fragment.into(), pattern.placeholder_count(), regex, handler);
        self.route_count += 1;

        if chunk.is_full() {
            chunk.close();
            tracing::debug!(
                method = %self.method,
                chunk = chunk_index,
                "chunk reached capacity and was closed"
            );
        }

        Ok(RouteSlot {
            method: self.method,
            chunk: chunk_index,
            local_index,
        })
    }

    fn open_chunk(&self) -> Option<&Chunk<H>> {
        self.chunks.last().filter(|chunk| !chunk.is_closed())
    }

    fn open_len(&self) -> usize {
        self.open_chunk().map_or(0, Chunk::len)
    }

    fn open_new_chunk(&mut self) {
        if let Some(chunk) = self.chunks.last_mut() {
            chunk.close();
        }
        self.chunks.push(Chunk::new(self.trailer.capacity()));
        tracing::debug!(method = %self.method, chunk = self.chunks.len() - 1, "opened chunk");
    }

    fn compile_open(&self, fragment: &str) -> Result<Regex, regex::Error> {
        match self.open_chunk() {
            Some(chunk) => {
                chunk.compile_with(fragment, &self.trailer, self.case_sensitive, self.size_limit)
            }
            None => Chunk::<H>::new(self.trailer.capacity()).compile_with(
                fragment,
                &self.trailer,
                self.case_sensitive,
                self.size_limit,
            ),
        }
    }

    fn compile_error(&self, err: regex::Error, pattern: &Pattern) -> ChunkError {
        match err {
            regex::Error::CompiledTooBig(_) => ChunkError::RouteTooLong {
                path: pattern.raw().to_string(),
                size_limit: self.size_limit,
            },
            other => ChunkError::Regex {
                path: pattern.raw().to_string(),
                error: other.to_string(),
            },
        }
    }
}

impl<H> std::fmt::Debug for ChunkBuilder<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkBuilder")
            .field("method", &self.method)
            .field("chunks", &self.chunks)
            .field("capacity", &self.capacity())
            .field("route_count", &self.route_count)
            .finish()
    }
}
