use pw_types::{NodeId, Vaddr};

/// A coherence protocol message exchanged between nodes over a page.
/// Grounded on spec's require/give/unwant/free operations; modeled as an
/// explicit enum rather than an async future, since the interpreter this
/// drives is itself a synchronous state machine with no suspension points
/// besides its own enumerated return codes.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum CoherenceEvent {
    /// Ask the current owner for this page, optionally requesting the
    /// write token along with the bytes.
    Require { addr: Vaddr, requester: NodeId, writable: bool },
    /// Hand a page's bytes to `to`; `transfer_ownership` also hands over
    /// the write token, demoting the sender to a plain reader (or dropping
    /// it entirely if it no longer needs the page).
    Give {
        addr: Vaddr,
        to: NodeId,
        bytes: Vec<u8>,
        transfer_ownership: bool,
    },
    /// Tell the owner this node no longer needs its read copy.
    Unwant { addr: Vaddr, from: NodeId },
    /// Release a page entirely; only the owner may issue this.
    Free { addr: Vaddr },
}

/// What a node should do after a memory access faults because the target
/// byte range is not locally resident (or not locally writable).
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FaultOutcome {
    /// The page is already resident and usable; the access can proceed.
    Resident,
    /// Issue this `Require` and retry the faulting instruction once a
    /// `Give` for it arrives.
    NeedsRequire(CoherenceEvent),
    /// A `Require` was already sent less than `MEMORY_REQUIRE_INTERVAL`
    /// ago; the caller should park the thread and retry later rather than
    /// flood the owner with requests.
    RetryLater,
}
