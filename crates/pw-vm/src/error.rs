use pw_types::{ErrorKind, Pid, Tid};

/// A fault raised while stepping a thread, tagged with the coarse
/// [`ErrorKind`] reported to the controller and with the thread it
/// occurred in (spec §7: a fault terminates its thread, and only ends the
/// process if that thread was the root thread).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InterpreterError {
    pub kind: ErrorKind,
    pub pid: Pid,
    pub tid: Tid,
    pub message: String,
}

impl InterpreterError {
    #[must_use]
    pub fn new(kind: ErrorKind, pid: Pid, tid: Tid, message: impl Into<String>) -> Self {
        Self {
            kind,
            pid,
            tid,
            message: message.into(),
        }
    }
}

impl core::fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} in {} ({}): {}",
            self.kind.as_str(),
            self.pid,
            self.tid,
            self.message
        )
    }
}

impl std::error::Error for InterpreterError {}
