//! Integration test harness: a small multi-node cluster for exercising
//! cross-node memory and thread scenarios without a real transport.

pub mod cluster;

pub use cluster::{TestCluster, TestNode};
