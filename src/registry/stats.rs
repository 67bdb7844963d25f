use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryMetrics {
    /// Successful registrations, counting each (methods, pattern) call once.
    pub total_routes_registered: usize,
    /// Alternation branches across all chunks.
    pub total_branches: usize,
    pub chunks_opened: usize,
    pub chunks_closed_early: usize,
}

impl RegistryMetrics {
    pub fn record_insert(&mut self, branches: usize, chunks: usize, closed_early: usize) {
        self.total_routes_registered += 1;
        self.total_branches = branches;
        self.chunks_opened = chunks;
        self.chunks_closed_early = closed_early;
    }
}
