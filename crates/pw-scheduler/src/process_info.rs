//! The cluster-wide routing view of a process, as distinct from
//! `pw_vm::Process`'s process-local execution state (spec §3's split
//! between `Process` and `ProcessInfo`).
#[cfg(test)]
mod process_info_test;

use std::collections::BTreeMap;

use pw_types::{NodeId, Pid, Tid};

#[derive(Clone, Debug)]
pub struct ProcessInfo {
    pub pid: Pid,
    pub name: String,
    pub root_tid: Tid,
    /// Which node currently owns each thread. The root thread's `Tid` is
    /// `Tid::new(proc_addr.as_u64())`, matching `pw_vm::Process::new`'s
    /// convention, so a process's root owner is always `threads[root_tid]`.
    pub threads: BTreeMap<Tid, NodeId>,
    pub gui_nid: Option<NodeId>,
}

impl ProcessInfo {
    #[must_use]
    pub fn new(pid: Pid, name: impl Into<String>, root_tid: Tid, root_nid: NodeId) -> Self {
        let mut threads = BTreeMap::new();
        threads.insert(root_tid, root_nid);
        Self { pid, name: name.into(), root_tid, threads, gui_nid: None }
    }

    #[must_use]
    pub fn root_nid(&self) -> Option<&NodeId> {
        self.threads.get(&self.root_tid)
    }
}
