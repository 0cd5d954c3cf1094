//! The node process: configuration, CLI, and the channel transport that
//! lets several nodes run in one process for testing.

pub mod cli;
pub mod config;
pub mod transport;

pub use cli::{Cli, Command};
pub use config::{NodeConfig, PeerConfig};
pub use transport::ChannelTransport;
