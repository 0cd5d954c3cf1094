//! The command packet exchanged between schedulers, grounded on
//! `original_source/src/core/scheduler.hpp`'s `send_command_*`/
//! `recv_command_*` method pairs and `lona-abi`'s tag-discriminated
//! request/response pattern, adapted here to a `serde`-tagged enum
//! carried as line-delimited JSON rather than fixed message registers.
#[cfg(test)]
mod command_test;

use serde::{Deserialize, Serialize};

use pw_types::{Module, NodeId, Pid, Tid, Vaddr};

use crate::warp::{PageManifest, ThreadDump};

/// A single routed message. `pid` and `module` together drive
/// [`crate::Scheduler::get_dst_nid`]; `src_nid`/`dst_nid` are filled in by
/// the sending [`crate::Router`] and are not trusted on receipt.
///
/// `content` is flattened onto the packet's own JSON object, so the wire
/// form is the flat `{command, pid, dst_nid, src_nid, module, ...}` map
/// spec §6 describes rather than a nested payload object.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommandPacket {
    pub pid: Pid,
    pub module: Module,
    pub src_nid: NodeId,
    pub dst_nid: NodeId,
    #[serde(flatten)]
    pub content: CommandContent,
}

impl CommandPacket {
    #[must_use]
    pub fn new(pid: Pid, module: Module, src_nid: NodeId, dst_nid: NodeId, content: CommandContent) -> Self {
        Self { pid, module, src_nid, dst_nid, content }
    }
}

/// The command payload, tagged on the wire by `command` to match the
/// source protocol's numbered command ids without carrying their literal
/// values (JSON has no use for a dense integer enum).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandContent {
    Activate { proc_addr: Vaddr },
    CreateGui { name: String },
    HeartbeatGui,
    HeartbeatVm,
    RequireProcessesInfo,
    ProcessesInfo { processes: Vec<ProcessSummary> },
    WarpGui { dst_nid: NodeId },
    WarpThreadRequest { tid: Tid, dst_nid: NodeId },
    WarpThreadDump { tid: Tid, dump: ThreadDump, pages: PageManifest },
    WarpThreadAck { tid: Tid },
    Require { addr: Vaddr, writable: bool },
    Give { addr: Vaddr, bytes: Vec<u8>, transfer_ownership: bool },
    Unwant { addr: Vaddr },
    Free { addr: Vaddr },
}

/// One process as reported by `RequireProcessesInfo`'s reply; a flattened
/// view of [`crate::ProcessInfo`] suitable for sending over the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProcessSummary {
    pub pid: Pid,
    pub name: String,
    pub root_nid: NodeId,
}
