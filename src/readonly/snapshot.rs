use std::cell::RefCell;
use std::fmt;

use super::{ReadOnlyError, ReadOnlyResult};
use crate::chunk::{Chunk, DecodingTrailer, MethodChunks};
use crate::enums::HttpMethod;
use crate::path::{NormalizationOptions, normalize_request_path};
use crate::types::{Dispatch, NotFound, RouteMatch, RouteSlot};

thread_local! {
    static SUBJECT_BUF: RefCell<String> = RefCell::new(String::with_capacity(128));
}

fn with_subject_buffer<R>(f: impl FnOnce(&mut String) -> R) -> R {
    SUBJECT_BUF.with(|cell| {
        let mut buf = cell.borrow_mut();
        buf.clear();
        f(&mut buf)
    })
}

/// Immutable per-method chunk table produced by sealing a router. Safe to
/// share across threads whenever the handler type is.
pub struct RouterReadOnly<H> {
    chunks: MethodChunks<H>,
    trailer: DecodingTrailer,
    normalization: NormalizationOptions,
    debug: bool,
}

impl<H> RouterReadOnly<H> {
    pub(crate) fn new(
        chunks: MethodChunks<H>,
        trailer: DecodingTrailer,
        normalization: NormalizationOptions,
        debug: bool,
    ) -> Self {
        Self {
            chunks,
            trailer,
            normalization,
            debug,
        }
    }

    pub fn chunks(&self, method: HttpMethod) -> &[Chunk<H>] {
        &self.chunks[method.index()]
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    pub fn route_count(&self) -> usize {
        self.chunks.iter().flatten().map(Chunk::len).sum()
    }

    /// Dispatches by method name; unknown methods never match.
    pub fn make(&self, method: &str, uri: &str) -> ReadOnlyResult<Dispatch<&H>> {
        match method.parse::<HttpMethod>() {
            Ok(method) => self.find(method, uri),
            Err(_) => Ok(Dispatch::NotFound(NotFound)),
        }
    }

    #[tracing::instrument(level = "trace", skip_all, fields(method = %method, path = %path))]
    pub fn find(&self, method: HttpMethod, path: &str) -> ReadOnlyResult<Dispatch<&H>> {
        let normalized = match normalize_request_path(path, &self.normalization) {
            Ok(normalized) => normalized,
            Err(err) => {
                tracing::trace!(error = %err, "request path rejected");
                return Ok(Dispatch::NotFound(NotFound));
            }
        };

        let outcome = with_subject_buffer(|subject| {
            self.trailer.append_to(&normalized, subject);
            self.dispatch_subject(method, subject)
        })?;

        if self.debug {
            match &outcome {
                Dispatch::Found(found) => tracing::debug!(
                    method = %method,
                    path = %normalized,
                    chunk = found.slot.chunk,
                    local_index = found.slot.local_index,
                    "route matched"
                ),
                Dispatch::NotFound(_) => {
                    tracing::debug!(method = %method, path = %normalized, "no route matched")
                }
            }
        }

        Ok(outcome)
    }

    fn dispatch_subject(&self, method: HttpMethod, subject: &str) -> ReadOnlyResult<Dispatch<&H>> {
        for (chunk_index, chunk) in self.chunks(method).iter().enumerate() {
            let found = match chunk.captures(subject, &self.trailer) {
                None => continue,
                Some(Ok(found)) => found,
                Some(Err(local_index)) => {
                    return Err(index_out_of_range(method, chunk_index, chunk, local_index));
                }
            };
            let Some(handler) = chunk.handler(found.local_index) else {
                return Err(index_out_of_range(
                    method,
                    chunk_index,
                    chunk,
                    found.local_index,
                ));
            };

            return Ok(Dispatch::Found(RouteMatch {
                handler,
                params: found.params.iter().map(|p| p.to_string()).collect(),
                slot: RouteSlot {
                    method,
                    chunk: chunk_index,
                    local_index: found.local_index,
                },
            }));
        }

        Ok(Dispatch::NotFound(NotFound))
    }
}

fn index_out_of_range<H>(
    method: HttpMethod,
    chunk_index: usize,
    chunk: &Chunk<H>,
    local_index: usize,
) -> ReadOnlyError {
    tracing::error!(
        method = %method,
        chunk = chunk_index,
        local_index,
        routes = chunk.len(),
        "decoded local index outside chunk"
    );
    ReadOnlyError::DecodedIndexOutOfRange {
        method,
        chunk: chunk_index,
        local_index,
        routes: chunk.len(),
    }
}

impl<H> fmt::Debug for RouterReadOnly<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterReadOnly")
            .field("chunks", &self.chunks)
            .field("trailer", &self.trailer.as_str())
            .field("normalization", &self.normalization)
            .finish()
    }
}
