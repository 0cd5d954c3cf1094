//! The one concrete [`pw_scheduler::Transport`] shipped: an in-process
//! channel. Real inter-node transports (WebRTC/XMPP/raw TCP) are out of
//! scope; only the trait boundary is modeled, which is enough for
//! `pw-test`'s multi-node scenarios to wire several node instances
//! together without a real network.
#[cfg(test)]
mod transport_test;

use tokio::sync::mpsc;
use tracing::warn;

use pw_scheduler::{CommandPacket, Transport};

pub struct ChannelTransport {
    outbox: mpsc::UnboundedSender<CommandPacket>,
}

impl ChannelTransport {
    #[must_use]
    pub fn new(outbox: mpsc::UnboundedSender<CommandPacket>) -> Self {
        Self { outbox }
    }
}

impl Transport for ChannelTransport {
    fn send(&mut self, packet: CommandPacket) {
        if self.outbox.send(packet).is_err() {
            warn!("transport channel closed, dropping packet");
        }
    }
}
