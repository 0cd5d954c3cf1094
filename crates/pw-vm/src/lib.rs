//! The ProcessWarp interpreter: the type/value registry, the process and
//! thread model, the fetch-decode-dispatch loop, and the built-in (libc)
//! function registry.

pub mod builtins;
pub mod error;
pub mod process;
pub mod value;

mod interpreter;

pub use builtins::{BuiltinPostProc, BuiltinTable};
pub use error::InterpreterError;
pub use interpreter::{Interpreter, StepOutcome};
pub use process::{CallDepthError, Process, StackFrame, Thread, ThreadStatus};
pub use value::{Function, Type, TypeRegistry};
