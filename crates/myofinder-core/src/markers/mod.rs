//! Per-image marker collections and their aggregate statistics.

pub mod fiber;
pub mod nucleus;
pub mod record;
pub mod stats;

pub use fiber::{Fiber, FiberCollection};
pub use nucleus::{Classification, Nucleus, NucleusCollection};
pub use record::{FiberRecord, NucleusRecord};
pub use stats::MarkerStats;

/// Both marker collections of one surface.
#[derive(Clone, Debug, Default)]
pub struct MarkerStore {
    pub nuclei: NucleusCollection,
    pub fibers: FiberCollection,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate statistics of the live collections, computed on demand.
    pub fn stats(&self) -> MarkerStats {
        MarkerStats {
            inside_count: self.nuclei.inside_count(),
            outside_count: self.nuclei.outside_count(),
            fiber_count: self.fibers.len(),
            fiber_area_ratio: self.fibers.area_ratio(),
        }
    }

    /// Clear both collections.
    pub fn reset(&mut self) {
        self.nuclei.reset();
        self.fibers.reset();
    }

    pub fn nucleus_records(&self) -> Vec<NucleusRecord> {
        self.nuclei.iter().map(NucleusRecord::from).collect()
    }

    pub fn fiber_records(&self) -> Vec<FiberRecord> {
        self.fibers.iter().map(FiberRecord::from).collect()
    }
}
