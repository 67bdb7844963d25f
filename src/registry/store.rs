use crate::chunk::{ChunkBuilder, ChunkError, ChunkResult, DecodingTrailer, MethodChunks};
use crate::enums::{HTTP_METHOD_COUNT, HttpMethod, MethodSet};
use crate::pattern::parse_pattern;
use crate::registry::RegistryMetrics;
use crate::types::RouteSlot;

/// One chunk builder per method; a route only ever competes with routes of
/// its own method.
#[derive(Debug)]
pub struct RouteRegistry<H> {
    builders: [ChunkBuilder<H>; HTTP_METHOD_COUNT],
    trailer: DecodingTrailer,
    metrics: RegistryMetrics,
}

impl<H> RouteRegistry<H> {
    pub fn new(trailer: DecodingTrailer, case_sensitive: bool, size_limit: usize) -> Self {
        let builders = HttpMethod::ALL.map(|method| {
            ChunkBuilder::new(method, trailer.clone(), case_sensitive, size_limit)
        });
        Self {
            builders,
            trailer,
            metrics: RegistryMetrics::default(),
        }
    }

    pub fn finalize(&mut self) -> MethodChunks<H> {
        std::array::from_fn(|index| self.builders[index].finish())
    }

    pub fn builder(&self, method: HttpMethod) -> &ChunkBuilder<H> {
        &self.builders[method.index()]
    }

    pub fn trailer(&self) -> &DecodingTrailer {
        &self.trailer
    }

    pub fn metrics(&self) -> &RegistryMetrics {
        &self.metrics
    }

    fn record_insert(&mut self) {
        let branches: usize = self.builders.iter().map(ChunkBuilder::route_count).sum();
        let chunks: usize = self.builders.iter().map(|b| b.chunks().len()).sum();
        let closed_early: usize = self
            .builders
            .iter()
            .map(ChunkBuilder::chunks_closed_early)
            .sum();
        self.metrics.record_insert(branches, chunks, closed_early);
    }
}

impl<H> RouteRegistry<H> {
    /// Parses `path` (already normalized) and places it into the chunk
    /// sequence of `method`.
    pub fn insert(
        &mut self,
        method: HttpMethod,
        path: &str,
        handler: H,
    ) -> ChunkResult<RouteSlot> {
        let pattern = parse_pattern(path)?;
        let slot = self.builders[method.index()].insert(&pattern, handler)?;
        self.record_insert();
        Ok(slot)
    }

    pub fn insert_bulk<I>(&mut self, entries: I) -> ChunkResult<Vec<RouteSlot>>
    where
        I: IntoIterator<Item = (HttpMethod, String, H)>,
    {
        entries
            .into_iter()
            .map(|(method, path, handler)| self.insert(method, &path, handler))
            .collect()
    }
}

impl<H: Clone> RouteRegistry<H> {
    /// Places one route into the chunk sequence of every method in
    /// `methods`. Nothing is registered unless every method accepts it.
    pub fn insert_many(
        &mut self,
        methods: MethodSet,
        path: &str,
        handler: H,
    ) -> ChunkResult<Vec<RouteSlot>> {
        let pattern = parse_pattern(path)?;
        if methods.is_empty() {
            return Err(ChunkError::EmptyMethodSet {
                path: pattern.raw().to_string(),
            });
        }
        if let Some(method) = methods
            .methods()
            .find(|method| self.builders[method.index()].contains(&pattern))
        {
            return Err(ChunkError::DuplicateRoute {
                method,
                path: pattern.raw().to_string(),
            });
        }

        let mut slots = Vec::with_capacity(methods.bits().count_ones() as usize);
        for method in methods.methods() {
            let slot = self.builders[method.index()].insert(&pattern, handler.clone())?;
            slots.push(slot);
        }
        self.record_insert();
        Ok(slots)
    }
}
