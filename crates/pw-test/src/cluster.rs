//! A small multi-node cluster for integration tests: one [`Vmem`] per node,
//! wired together by resolving `require`/`give` by hand rather than over a
//! real transport. Grounded on the teacher's `TestVm` (a stateful, owned
//! VM built from the same pieces the production code uses) generalized
//! from one VM to a fleet of them.
#[cfg(test)]
mod cluster_test;

use std::collections::BTreeMap;

use pw_types::{NodeId, Tid, Vaddr};
use pw_vm::{BuiltinTable, Interpreter, Process, StepOutcome, TypeRegistry};
use pw_vmem::{CoherenceEvent, FaultOutcome, MemorySpace, Vmem};

/// How many require/give rounds [`TestCluster::resolve_fault`] will drive
/// before giving up; a real cluster retries indefinitely on a timer, but a
/// test harness with no clock should never spin forever on a
/// misconfigured scenario.
const MAX_FAULT_ROUNDS: u32 = 8;

pub struct TestNode {
    pub nid: NodeId,
    pub vmem: Vmem,
}

/// A fixed set of nodes sharing one distributed address space, with no
/// process/scheduler plumbing of its own — callers drive their own
/// `Process`/`Interpreter` state and use this only to resolve page faults
/// and run a thread to completion.
pub struct TestCluster {
    nodes: Vec<TestNode>,
    /// Last node known to own each address, from this harness's own
    /// bookkeeping (a real cluster looks this up via the scheduler).
    owners: BTreeMap<Vaddr, usize>,
}

impl TestCluster {
    #[must_use]
    pub fn new(nids: impl IntoIterator<Item = NodeId>) -> Self {
        let nodes = nids
            .into_iter()
            .map(|nid| TestNode { vmem: Vmem::new(nid.clone()), nid })
            .collect();
        Self { nodes, owners: BTreeMap::new() }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn nid(&self, node: usize) -> NodeId {
        self.nodes[node].nid.clone()
    }

    pub fn vmem(&mut self, node: usize) -> &mut Vmem {
        &mut self.nodes[node].vmem
    }

    /// Allocates a page on `node` and records it as the owner for routing
    /// purposes.
    pub fn allocate(&mut self, node: usize, len: u64) -> Vaddr {
        let addr = self.nodes[node].vmem.allocate(len);
        self.owners.insert(addr, node);
        addr
    }

    /// Drives `node`'s fault on `addr` to completion by fetching the page
    /// from its last known owner. Always requests the write token: a test
    /// cluster has no cheaper way to tell a read-fault from a write-fault
    /// after the fact, and over-eagerly granting ownership does not change
    /// the value a subsequent read observes.
    pub fn resolve_fault(&mut self, node: usize, addr: Vaddr) {
        for _ in 0..MAX_FAULT_ROUNDS {
            match self.nodes[node].vmem.fault(addr, true) {
                FaultOutcome::Resident => return,
                FaultOutcome::RetryLater => continue,
                FaultOutcome::NeedsRequire(CoherenceEvent::Require { addr, requester, writable }) => {
                    let owner = *self
                        .owners
                        .get(&addr)
                        .unwrap_or_else(|| panic!("no known owner for {addr:?}"));
                    let bytes = self.nodes[owner]
                        .vmem
                        .page(addr)
                        .unwrap_or_else(|| panic!("owner {owner} has no page at {addr:?}"))
                        .bytes
                        .to_vec();
                    self.nodes[owner]
                        .vmem
                        .handle_event(CoherenceEvent::Require { addr, requester: requester.clone(), writable });
                    self.nodes[node].vmem.handle_event(CoherenceEvent::Give {
                        addr,
                        to: requester,
                        bytes,
                        transfer_ownership: writable,
                    });
                    if writable {
                        self.owners.insert(addr, node);
                    }
                    return;
                }
                FaultOutcome::NeedsRequire(_) => unreachable!("fault only ever issues Require"),
            }
        }
        panic!("fault on {addr:?} did not resolve within {MAX_FAULT_ROUNDS} rounds");
    }

    /// Runs `tid` within `process` on `node` to completion, resolving any
    /// page faults it hits along the way. Panics on an interpreter fault,
    /// since every scenario this harness drives is expected to succeed.
    pub fn run_to_finish(
        &mut self,
        node: usize,
        process: &mut Process,
        tid: Tid,
        interpreter: &Interpreter,
        types: &TypeRegistry,
        builtins: &BuiltinTable,
    ) -> i64 {
        loop {
            let outcome = interpreter.run_quantum(process, tid, &mut self.nodes[node].vmem, types, builtins);
            match outcome {
                StepOutcome::Finished(code) => return code,
                StepOutcome::Normal | StepOutcome::ReEntry => {}
                StepOutcome::RetryLater(addr) => self.resolve_fault(node, addr),
                StepOutcome::Fault(err) => panic!("interpreter fault: {err}"),
            }
        }
    }
}
