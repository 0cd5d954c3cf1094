//! Distributed virtual memory: per-node page storage, and the
//! single-writer/multi-reader coherence protocol that keeps page contents
//! consistent across a cluster without a central memory server.

mod coherence;
mod page;
mod vmem;

pub use coherence::{CoherenceEvent, FaultOutcome};
pub use page::{MemorySpace, Page, VmemError};
pub use vmem::Vmem;

/// How often a node may re-issue a `require` for the same page, matching
/// the source protocol's `MEMORY_REQUIRE_INTERVAL` (5 seconds).
pub const MEMORY_REQUIRE_INTERVAL: core::time::Duration = core::time::Duration::from_secs(5);
