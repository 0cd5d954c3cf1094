
use std::collections::BTreeMap;

use pw_types::{NodeId, Pid, Tid, Vaddr};

/// Maximum nested call depth before a thread faults with a stack overflow,
/// matching the teacher's `MAX_CALL_DEPTH` guard in spirit (the teacher
/// bounds a fixed-size call-frame array the same way).
pub const MAX_CALL_DEPTH: usize = 256;

/// A single activation record. Grounded on spec §3's `StackFrame`: the
/// register-like slots an instruction reads/writes plus the set of
/// `alloca`'d addresses that must be freed when the frame returns
/// (invariant: every `alloca` within a frame is freed on that frame's
/// `RETURN`, never leaked to the caller).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackFrame {
    pub pc: usize,
    pub fn_addr: Vaddr,
    pub phi0: Option<Vaddr>,
    pub phi1: Option<Vaddr>,
    pub type_slot: Option<Vaddr>,
    pub output_slot: Option<Vaddr>,
    pub value_slot: Option<Vaddr>,
    pub address_slot: Option<Vaddr>,
    pub alignment_slot: u32,
    pub stack: Option<Vaddr>,
    pub alloca_addrs: Vec<Vaddr>,
    /// Result of the last `TEST`/`TEST_EQ`/comparison opcode, consumed by
    /// the next conditional `JUMP`/`SELECT`/`PHI`.
    pub test_flag: bool,
    /// Which predecessor edge `PHI` should read from.
    pub incoming_edge: bool,
    /// Operand word carried by a preceding `EXTRA` instruction, folded into
    /// the next instruction's operand via `pw_types::extend_operand`.
    pub pending_extra: Option<u32>,
    /// Variadic arguments passed to this call, consumed in order by `VA_ARG`.
    pub va_args: Vec<i64>,
    pub va_cursor: usize,
}

impl StackFrame {
    #[must_use]
    pub fn new(fn_addr: Vaddr) -> Self {
        Self {
            pc: 0,
            fn_addr,
            phi0: None,
            phi1: None,
            type_slot: None,
            output_slot: None,
            value_slot: None,
            address_slot: None,
            alignment_slot: 1,
            stack: None,
            alloca_addrs: Vec::new(),
            test_flag: false,
            incoming_edge: false,
            pending_extra: None,
            va_args: Vec::new(),
            va_cursor: 0,
        }
    }

    pub fn record_alloca(&mut self, addr: Vaddr) {
        self.alloca_addrs.push(addr);
    }
}

/// How a thread was created and how its exit should be observed (spec §3
/// `join_state`): matching `original_source`'s `JOIN_WAIT_NONE/ROOT/DETACHED`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JoinState {
    /// Another thread may `join` and block on this thread's completion.
    Joinable,
    /// This is the process's root thread; its exit ends the process.
    Root,
    /// No other thread can observe this thread's completion.
    Detached,
}

/// A thread's run state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ThreadStatus {
    Running,
    /// Parked waiting for a required page to arrive.
    WaitingMemory,
    /// Marked for migration; routing queries still resolve to this node
    /// until the warp completes (spec §4.5).
    Passive,
    Finished,
    Faulted,
}

/// A single thread of execution within a [`Process`]. Grounded on spec §3;
/// `calls_at_exit` backs the `atexit` built-in's LIFO callback list.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Thread {
    pub tid: Tid,
    pub join_state: JoinState,
    pub status: ThreadStatus,
    pub stackinfos: Vec<StackFrame>,
    pub calls_at_exit: Vec<Vaddr>,
    /// Set once this thread has committed to terminating (root return or
    /// `exit`), holding the code to report once `calls_at_exit` has drained.
    pub pending_exit: Option<i64>,
}

/// Error returned when a call would push past [`MAX_CALL_DEPTH`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CallDepthError;

impl Thread {
    #[must_use]
    pub fn new(tid: Tid, join_state: JoinState, entry: Vaddr) -> Self {
        Self {
            tid,
            join_state,
            status: ThreadStatus::Running,
            stackinfos: vec![StackFrame::new(entry)],
            calls_at_exit: Vec::new(),
            pending_exit: None,
        }
    }

    #[must_use]
    pub fn current_frame(&self) -> Option<&StackFrame> {
        self.stackinfos.last()
    }

    pub fn current_frame_mut(&mut self) -> Option<&mut StackFrame> {
        self.stackinfos.last_mut()
    }

    /// Push a new call frame, failing if the thread is already at
    /// [`MAX_CALL_DEPTH`].
    pub fn push_frame(&mut self, fn_addr: Vaddr) -> Result<(), CallDepthError> {
        if self.stackinfos.len() >= MAX_CALL_DEPTH {
            return Err(CallDepthError);
        }
        self.stackinfos.push(StackFrame::new(fn_addr));
        Ok(())
    }

    /// Pop the current frame, returning the `alloca`'d addresses it owned
    /// so the caller can free each one (spec invariant: every `alloca`
    /// within a frame is freed exactly once, on that frame's `RETURN`).
    #[must_use]
    pub fn pop_frame(&mut self) -> Option<StackFrame> {
        self.stackinfos.pop()
    }

    /// A snapshot of the frame stack, for `setjmp`; `longjmp` truncates
    /// back to a previously captured snapshot length.
    #[must_use]
    pub fn snapshot_depth(&self) -> usize {
        self.stackinfos.len()
    }

    /// Truncate the frame stack back to `depth`, as `longjmp` does; returns
    /// the frames it discarded so their `alloca`s can be freed.
    pub fn unwind_to(&mut self, depth: usize) -> Vec<StackFrame> {
        if depth >= self.stackinfos.len() {
            return Vec::new();
        }
        self.stackinfos.split_off(depth)
    }
}

/// A running (or migrating) process: the thread set it owns and the set of
/// builtin-call continuation addresses it has registered. Grounded on spec
/// §3's `Process`/`ProcessInfo` split — this type is the process-local
/// state; `pw-scheduler::ProcessInfo` is the cluster-wide routing view.
#[derive(Debug)]
pub struct Process {
    pub pid: Pid,
    pub root_tid: Tid,
    pub proc_addr: Vaddr,
    pub threads: BTreeMap<Tid, Thread>,
    pub builtin_addrs: std::collections::BTreeSet<Vaddr>,
    pub master_nid: NodeId,
}

impl Process {
    #[must_use]
    pub fn new(pid: Pid, proc_addr: Vaddr, entry: Vaddr, master_nid: NodeId) -> Self {
        let root_tid = Tid::new(proc_addr.as_u64());
        let mut threads = BTreeMap::new();
        threads.insert(root_tid, Thread::new(root_tid, JoinState::Root, entry));
        Self {
            pid,
            root_tid,
            proc_addr,
            threads,
            builtin_addrs: std::collections::BTreeSet::new(),
            master_nid,
        }
    }

    #[must_use]
    pub fn thread(&self, tid: Tid) -> Option<&Thread> {
        self.threads.get(&tid)
    }

    pub fn thread_mut(&mut self, tid: Tid) -> Option<&mut Thread> {
        self.threads.get_mut(&tid)
    }

    pub fn spawn_thread(&mut self, tid: Tid, join_state: JoinState, entry: Vaddr) {
        self.threads.insert(tid, Thread::new(tid, join_state, entry));
    }

    /// A non-root thread fault only terminates that thread (spec §7); a
    /// root thread fault ends the process.
    #[must_use]
    pub fn is_fatal(&self, tid: Tid) -> bool {
        tid == self.root_tid
    }
}
