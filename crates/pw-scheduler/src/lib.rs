//! Command routing, process/thread ownership tracking, and thread
//! migration (warp) across a ProcessWarp cluster. One [`Scheduler`] and one
//! [`Router`] run per node; they cooperate through the commands nodes
//! exchange rather than any shared store.

pub mod command;
pub mod process_info;
pub mod router;
pub mod scheduler;
pub mod warp;

pub use command::{CommandContent, CommandPacket, ProcessSummary};
pub use process_info::ProcessInfo;
pub use router::{ModuleSink, Router, RouterError, Transport};
pub use scheduler::{HEARTBEAT_INTERVAL, HEARTBEAT_MISS_LIMIT, RouteTarget, Scheduler};
pub use warp::{PageManifest, PageSnapshot, ThreadDump, WarpState, WarpTracker, WARP_ACK_TIMEOUT};
