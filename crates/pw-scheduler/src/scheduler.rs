//! The cluster's routing table: which node owns each thread, each
//! process's GUI owner, and the page-owner cache that backs `MEMORY`
//! routing. Grounded method-for-method on
//! `original_source/src/core/scheduler.hpp`'s `Scheduler` class.
#[cfg(test)]
mod scheduler_test;

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tracing::debug;

use pw_types::{Module, NodeId, Pid, Tid, Vaddr};

use crate::command::{CommandContent, CommandPacket, ProcessSummary};
use crate::process_info::ProcessInfo;

/// How often a node is expected to heartbeat; no fixed value is given in
/// the source protocol's headers, so this follows `pw_vmem::MEMORY_REQUIRE_INTERVAL`'s
/// five-second cadence for consistency across the two periodic mechanisms.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// Intervals a node may miss before its ownership claims are treated as
/// unknown (spec §4.6).
pub const HEARTBEAT_MISS_LIMIT: u32 = 3;

/// What `get_dst_nid` is being asked to resolve, since `VM` routes by
/// thread and `MEMORY` routes by address while `GUI`/`SCHEDULER` need
/// neither.
#[derive(Clone, Copy, Debug)]
pub enum RouteTarget {
    Thread(Tid),
    Addr(Vaddr),
    None,
}

/// Maintains `processes: pid -> ProcessInfo` and answers routing queries
/// for every module. One instance runs per node; nodes reconcile their
/// views only through the commands they exchange, never a shared store.
#[derive(Debug)]
pub struct Scheduler {
    processes: BTreeMap<Pid, ProcessInfo>,
    my_nid: NodeId,
    last_heartbeat: BTreeMap<NodeId, Instant>,
    memory_owners: BTreeMap<(Pid, Vaddr), NodeId>,
}

impl Scheduler {
    #[must_use]
    pub fn new(my_nid: NodeId) -> Self {
        Self {
            processes: BTreeMap::new(),
            my_nid,
            last_heartbeat: BTreeMap::new(),
            memory_owners: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn process(&self, pid: &Pid) -> Option<&ProcessInfo> {
        self.processes.get(pid)
    }

    pub fn register_process(&mut self, info: ProcessInfo) {
        self.processes.insert(info.pid.clone(), info);
    }

    pub fn set_thread_owner(&mut self, pid: &Pid, tid: Tid, nid: NodeId) {
        if let Some(info) = self.processes.get_mut(pid) {
            info.threads.insert(tid, nid);
        }
    }

    pub fn set_gui_owner(&mut self, pid: &Pid, nid: NodeId) {
        if let Some(info) = self.processes.get_mut(pid) {
            info.gui_nid = Some(nid);
        }
    }

    pub fn note_memory_owner(&mut self, pid: Pid, addr: Vaddr, nid: NodeId) {
        self.memory_owners.insert((pid, addr), nid);
    }

    /// Records that `nid` is alive as of now; called whenever a heartbeat
    /// (or any other command proving liveness) arrives from it.
    pub fn note_heartbeat(&mut self, nid: NodeId) {
        self.last_heartbeat.insert(nid, Instant::now());
    }

    fn node_is_live(&self, nid: &NodeId) -> bool {
        if nid == &self.my_nid {
            return true;
        }
        self.last_heartbeat
            .get(nid)
            .is_some_and(|seen| seen.elapsed() < HEARTBEAT_INTERVAL * HEARTBEAT_MISS_LIMIT)
    }

    /// Resolves which node a command for `pid`/`module` should be sent to.
    /// Returns `NodeId::broadcast()` for anything unknown, matching the
    /// source protocol's `SpecialNID::NONE` fallback-to-broadcast-with-retry
    /// behavior (there is no dedicated "unknown" sentinel distinct from
    /// broadcast in this address scheme).
    #[must_use]
    pub fn get_dst_nid(&self, pid: &Pid, module: Module, target: RouteTarget) -> NodeId {
        match module {
            Module::Vm => match target {
                RouteTarget::Thread(tid) => self
                    .processes
                    .get(pid)
                    .and_then(|info| info.threads.get(&tid))
                    .filter(|nid| self.node_is_live(nid))
                    .cloned()
                    .unwrap_or_else(NodeId::broadcast),
                _ => NodeId::broadcast(),
            },
            Module::Memory => match target {
                RouteTarget::Addr(addr) => self
                    .memory_owners
                    .get(&(pid.clone(), addr))
                    .filter(|nid| self.node_is_live(nid))
                    .cloned()
                    .unwrap_or_else(NodeId::broadcast),
                _ => NodeId::broadcast(),
            },
            Module::Gui => self
                .processes
                .get(pid)
                .and_then(|info| info.gui_nid.clone())
                .unwrap_or_else(NodeId::broadcast),
            Module::Scheduler => self.my_nid.clone(),
            Module::Controller => NodeId::broadcast(),
        }
    }

    /// Applies a received command to this scheduler's routing state,
    /// mirroring `scheduler.hpp`'s `recv_command_*` method list. Returns a
    /// reply to send back to `packet.src_nid`, if the command calls for one.
    pub fn recv_command(&mut self, packet: &CommandPacket) -> Option<CommandContent> {
        self.note_heartbeat(packet.src_nid.clone());
        match &packet.content {
            CommandContent::Activate { proc_addr } => {
                let root_tid = Tid::new(proc_addr.as_u64());
                self.register_process(ProcessInfo::new(
                    packet.pid.clone(),
                    packet.pid.as_str(),
                    root_tid,
                    packet.src_nid.clone(),
                ));
                None
            }
            CommandContent::CreateGui { name } => {
                if let Some(info) = self.processes.get_mut(&packet.pid) {
                    info.name = name.clone();
                }
                self.set_gui_owner(&packet.pid, packet.src_nid.clone());
                None
            }
            CommandContent::HeartbeatGui | CommandContent::HeartbeatVm => {
                debug!(nid = %packet.src_nid, "heartbeat");
                None
            }
            CommandContent::RequireProcessesInfo => {
                let processes = self
                    .processes
                    .values()
                    .map(|info| ProcessSummary {
                        pid: info.pid.clone(),
                        name: info.name.clone(),
                        root_nid: info.root_nid().cloned().unwrap_or_else(NodeId::broadcast),
                    })
                    .collect();
                Some(CommandContent::ProcessesInfo { processes })
            }
            CommandContent::WarpGui { dst_nid } => {
                self.set_gui_owner(&packet.pid, dst_nid.clone());
                None
            }
            CommandContent::WarpThreadAck { tid } => {
                self.set_thread_owner(&packet.pid, *tid, packet.src_nid.clone());
                None
            }
            CommandContent::Give { addr, .. } => {
                self.note_memory_owner(packet.pid.clone(), *addr, packet.src_nid.clone());
                None
            }
            _ => None,
        }
    }
}
