//! Per-node command demultiplexer: owns the pipes to local modules and the
//! outbound transport handle. Grounded on spec §4.7 and the delegate split
//! in `original_source/src/core/scheduler.hpp` (`SchedulerDelegate`'s
//! `send_command`/local dispatch responsibilities), adapted to Rust as a
//! registry of boxed trait objects rather than virtual delegate methods.

use std::collections::BTreeMap;

use tracing::warn;

use pw_types::{Module, NodeId};

use crate::command::CommandPacket;

/// A local consumer of routed commands for one [`Module`] (the VM worker
/// pool, the GUI pipe, the memory subsystem, ...).
pub trait ModuleSink {
    fn deliver(&mut self, packet: CommandPacket);
}

/// The outbound network handle a [`Router`] hands packets to once it has
/// decided they belong to another node.
pub trait Transport {
    fn send(&mut self, packet: CommandPacket);
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RouterError {
    /// A packet claiming to originate from this node arrived over the
    /// network; accepting it would create a routing loop.
    LoopDetected,
}

pub struct Router {
    my_nid: NodeId,
    sinks: BTreeMap<Module, Box<dyn ModuleSink>>,
    transport: Box<dyn Transport>,
}

impl Router {
    #[must_use]
    pub fn new(my_nid: NodeId, transport: Box<dyn Transport>) -> Self {
        Self { my_nid, sinks: BTreeMap::new(), transport }
    }

    pub fn register_sink(&mut self, module: Module, sink: Box<dyn ModuleSink>) {
        self.sinks.insert(module, sink);
    }

    /// Routes one packet. `broadcast_hosts` is the set of nodes the caller's
    /// scheduler currently believes host `packet.pid`, consulted only when
    /// `packet.dst_nid` is the broadcast address.
    pub fn relay_command(
        &mut self,
        packet: CommandPacket,
        from_network: bool,
        broadcast_hosts: &[NodeId],
    ) -> Result<(), RouterError> {
        if from_network && packet.src_nid == self.my_nid {
            warn!(module = ?packet.module, "dropping looped packet");
            return Err(RouterError::LoopDetected);
        }

        let is_local = packet.dst_nid == self.my_nid;
        let is_broadcast = packet.dst_nid.is_broadcast();

        if is_local || is_broadcast {
            if let Some(sink) = self.sinks.get_mut(&packet.module) {
                sink.deliver(packet.clone());
            } else {
                warn!(module = ?packet.module, "no local sink registered");
            }
        }

        if !is_local && !from_network {
            if is_broadcast {
                for host in broadcast_hosts {
                    if host != &self.my_nid {
                        let mut out = packet.clone();
                        out.dst_nid = host.clone();
                        self.transport.send(out);
                    }
                }
            } else {
                self.transport.send(packet);
            }
        }
        Ok(())
    }
}
