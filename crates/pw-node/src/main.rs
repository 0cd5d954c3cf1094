//! Node binary entry point: parses the CLI, loads config, and drives the
//! single-threaded event loop spec §5 requires for network I/O.
use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;
use tokio::time;
use tracing::info;

use pw_node::{Cli, NodeConfig};
use pw_scheduler::Scheduler;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = NodeConfig::load(&cli.config)?;
    let nid = cli.nid.map(pw_types::NodeId::new).unwrap_or_else(|| config.node_id());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(run(nid, config))
}

/// The node's event loop: one `Scheduler` per node, fed by whatever
/// arrives on its inbox. A real deployment also wires a `Router` plus
/// per-module sinks (VM workers, GUI, memory) in front of this scheduler;
/// `pw-test`'s `TestCluster` is where that fuller wiring is assembled and
/// exercised end to end, since a lone node has no peers to route to.
async fn run(nid: pw_types::NodeId, config: NodeConfig) -> Result<()> {
    info!(%nid, peers = config.peers.len(), "node starting");

    let (_inbox_tx, mut inbox_rx) = mpsc::unbounded_channel();
    let mut scheduler = Scheduler::new(nid.clone());

    let mut heartbeat = time::interval(pw_scheduler::HEARTBEAT_INTERVAL);
    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                scheduler.note_heartbeat(nid.clone());
            }
            packet = inbox_rx.recv() => {
                match packet {
                    Some(packet) => {
                        let _ = scheduler.recv_command(&packet);
                    }
                    None => break,
                }
            }
        }
    }
    Ok(())
}
