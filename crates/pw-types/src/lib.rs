//! Shared primitive types for ProcessWarp: addresses, the instruction
//! codec, identifiers, and the error taxonomy. Depended on by every other
//! crate in the workspace; carries no host dependencies.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(not(any(test, feature = "std")))]
extern crate alloc;
#[cfg(any(test, feature = "std"))]
extern crate std as alloc;

mod addr;
mod error;
mod ids;
mod instruction;
mod module;
mod types;

pub use addr::{AddrType, SizeClass, Vaddr};
pub use error::ErrorKind;
pub use ids::{NodeId, Pid, Tid};
pub use instruction::{Instruction, OperandRef, Opcode, decode, encode, extend_operand};
pub use module::Module;
pub use types::BasicTypeAddress;
