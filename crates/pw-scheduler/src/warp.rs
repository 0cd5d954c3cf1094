//! Thread migration (warp): serializing a thread's state and the pages it
//! touches, shipping them to another node, and waiting for that node to
//! confirm it has taken ownership. Grounded on spec §4.5's five-step
//! description, which has no direct counterpart in the teacher (seL4
//! capabilities are not migrated between machines); the state machine
//! shape instead follows `pw_vmem`'s `CoherenceEvent`/`FaultOutcome` style
//! of an explicit enum rather than an `async` suspension point.
#[cfg(test)]
mod warp_test;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use pw_types::{NodeId, Tid, Vaddr};
use pw_vm::Thread;

/// How long a node waits for the destination to acknowledge a warp before
/// giving up and resuming the thread locally.
pub const WARP_ACK_TIMEOUT: Duration = Duration::from_secs(30);

/// A thread's full state, shipped whole to the destination node so it can
/// resume execution without replaying any history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThreadDump {
    pub thread: Thread,
}

/// One page's bytes, carried alongside a [`ThreadDump`] so the destination
/// node does not need to `require` them back from wherever they used to
/// live the moment it resumes the thread.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub addr: Vaddr,
    pub bytes: Vec<u8>,
}

/// The set of pages bundled with a warp. Grounded on spec §4.5 step 2
/// ("collects the pages the thread currently owns"): only owned pages
/// travel with the thread, not its whole working set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PageManifest {
    pub pages: Vec<PageSnapshot>,
}

impl PageManifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, addr: Vaddr, bytes: Vec<u8>) {
        self.pages.push(PageSnapshot { addr, bytes });
    }
}

/// Where a single thread's warp sits in the five-step protocol:
/// 1. `Idle` - no warp in progress.
/// 2. `Serializing` - the source node is dumping the thread and its pages.
/// 3. `AwaitingAck` - the dump was sent; routing still resolves to the
///    source node (the thread stays [`pw_vm::ThreadStatus::Passive`]) until
///    the destination confirms.
/// 4. `Done` - the destination acknowledged; the source has dropped the
///    thread and future routing resolves to the destination.
///
/// A warp that exceeds [`WARP_ACK_TIMEOUT`] while `AwaitingAck` falls back
/// to `Idle` and resumes the thread locally, per spec §4.5's retry note.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WarpState {
    Idle,
    Serializing,
    AwaitingAck { dst_nid: NodeId },
    Done { dst_nid: NodeId },
}

/// Tracks in-flight warps for every (pid, tid) this node is the source or
/// destination of. Uses a monotonic clock reference point rather than
/// storing `Instant`s directly so the struct stays plain data; callers pass
/// the current tick in whenever they need to check a deadline.
#[derive(Debug, Default)]
pub struct WarpTracker {
    started: std::collections::BTreeMap<Tid, Instant>,
    states: std::collections::BTreeMap<Tid, WarpState>,
}

impl WarpTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self, tid: Tid) -> WarpState {
        self.states.get(&tid).cloned().unwrap_or(WarpState::Idle)
    }

    /// Begins serializing `tid` for a warp to `dst_nid`. Overwrites any
    /// prior state; a second warp request for an already-migrating thread
    /// simply restarts the clock (the source has no record of an earlier
    /// attempt worth preserving).
    pub fn begin(&mut self, tid: Tid) {
        self.states.insert(tid, WarpState::Serializing);
        self.started.insert(tid, Instant::now());
    }

    /// Moves `tid` to `AwaitingAck` after its dump has been sent.
    pub fn sent(&mut self, tid: Tid, dst_nid: NodeId) {
        self.states.insert(tid, WarpState::AwaitingAck { dst_nid });
    }

    /// Records the destination's acknowledgement, completing the warp.
    pub fn acknowledged(&mut self, tid: Tid, dst_nid: NodeId) {
        self.states.insert(tid, WarpState::Done { dst_nid });
        self.started.remove(&tid);
    }

    /// Drops all bookkeeping for `tid`, returning it to `Idle`.
    pub fn clear(&mut self, tid: Tid) {
        self.states.remove(&tid);
        self.started.remove(&tid);
    }

    /// True if `tid` has been `AwaitingAck` longer than [`WARP_ACK_TIMEOUT`].
    #[must_use]
    pub fn timed_out(&self, tid: Tid) -> bool {
        matches!(self.states.get(&tid), Some(WarpState::AwaitingAck { .. }))
            && self
                .started
                .get(&tid)
                .is_some_and(|t| t.elapsed() >= WARP_ACK_TIMEOUT)
    }
}
