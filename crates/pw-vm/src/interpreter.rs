
use pw_types::{BasicTypeAddress, ErrorKind, Opcode, OperandRef, Pid, Tid, Vaddr, decode, extend_operand};
use pw_vmem::{FaultOutcome, MemorySpace, Vmem};

use crate::builtins::{BuiltinPostProc, BuiltinTable};
use crate::error::InterpreterError;
use crate::process::{JoinState, Process, StackFrame, ThreadStatus};
use crate::value::{Function, TypeRegistry};

/// Byte width of one stack-frame slot, matching the `i64` cells every
/// `SET_*`/arithmetic opcode reads and writes.
const STACK_CELL_SIZE: u64 = 8;
/// Size of the page lazily allocated for a frame's `stack` on first use.
const STACK_PAGE_SIZE: u64 = 4096;

/// What happened after stepping one thread for up to a quantum's worth of
/// instructions. Mirrors `BuiltinPostProc` in shape: these are the only
/// suspension points this interpreter has, per the "no language-native
/// async" design note — there is no `.await` anywhere in this crate.
#[derive(Debug)]
pub enum StepOutcome {
    /// The thread is still runnable; call `step` again next quantum.
    Normal,
    /// A builtin asked to be re-entered immediately (e.g. to drain a
    /// variadic result) before the quantum continues.
    ReEntry,
    /// The thread faulted on a memory access that is not yet resident, or
    /// is rate-limited; park it and retry after the page arrives.
    RetryLater(Vaddr),
    /// The thread's root frame returned; `code` is its exit value.
    Finished(i64),
    /// The thread hit an unrecoverable fault.
    Fault(InterpreterError),
}

/// Instructions executed per call to [`Interpreter::run_quantum`] before
/// yielding back to the scheduler, so no single thread can starve a node's
/// event loop.
const DEFAULT_QUANTUM: u32 = 10;

/// The fetch-decode-dispatch loop. Stateless by design (grounded on the
/// teacher's `pub struct Vm;`): all mutable state lives in the `Process`,
/// `Thread`, and `Vmem` passed in.
pub struct Interpreter {
    pub quantum: u32,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self {
            quantum: DEFAULT_QUANTUM,
        }
    }
}

impl Interpreter {
    #[must_use]
    pub fn new(quantum: u32) -> Self {
        Self { quantum }
    }

    /// Run up to `self.quantum` instructions of `tid` within `process`.
    pub fn run_quantum(
        &self,
        process: &mut Process,
        tid: Tid,
        vmem: &mut Vmem,
        types: &TypeRegistry,
        builtins: &BuiltinTable,
    ) -> StepOutcome {
        for _ in 0..self.quantum {
            match self.step(process, tid, vmem, types, builtins) {
                StepOutcome::Normal => {}
                other => return other,
            }
        }
        StepOutcome::Normal
    }

    fn step(
        &self,
        process: &mut Process,
        tid: Tid,
        vmem: &mut Vmem,
        types: &TypeRegistry,
        builtins: &BuiltinTable,
    ) -> StepOutcome {
        let pid = process.pid.clone();

        if let Some(thread) = process.thread_mut(tid) {
            if thread.pending_exit.is_some() && thread.stackinfos.len() <= 1 {
                if !thread.calls_at_exit.is_empty() {
                    let handlers: Vec<Vaddr> = thread.calls_at_exit.drain(..).collect();
                    for addr in handlers {
                        if thread.push_frame(addr).is_err() {
                            return fault(&pid, tid, ErrorKind::ServerSys, "call stack overflow running atexit handlers");
                        }
                    }
                    return StepOutcome::Normal;
                }
                let code = thread.pending_exit.unwrap_or(0);
                if let Some(frame) = thread.current_frame_mut() {
                    if let Some(stack) = frame.stack {
                        let _ = vmem.write(stack, code as i32);
                    }
                }
                thread.status = ThreadStatus::Finished;
                return StepOutcome::Finished(code);
            }
        }

        let fn_addr = match process.thread(tid) {
            Some(t) => match t.current_frame() {
                Some(f) => f.fn_addr,
                None => return StepOutcome::Finished(0),
            },
            None => return fault(&pid, tid, ErrorKind::ServerSys, "no such thread"),
        };

        let Some(Function::Normal { code, constants, .. }) = types.function_at(fn_addr) else {
            return fault(&pid, tid, ErrorKind::Inst, "frame points at non-normal function");
        };

        let pc = process.thread(tid).unwrap().current_frame().unwrap().pc;
        let Some(&word) = code.get(pc) else {
            return fault(&pid, tid, ErrorKind::SegmentFault, "pc out of bounds");
        };

        let inst = match decode(word) {
            Ok(inst) => inst,
            Err(raw) => return fault(&pid, tid, ErrorKind::Inst, format!("unknown opcode {raw}")),
        };
        let constants = constants.clone();

        if matches!(inst.opcode, Opcode::Call | Opcode::TailCall | Opcode::Return) {
            let frame = process.thread_mut(tid).unwrap().current_frame_mut().unwrap();
            ensure_stack_page(frame, vmem);
            frame.pc += 1;
            let operand = resolve_operand(frame, inst.operand_ref(), &constants);
            return if inst.opcode == Opcode::Return {
                self.dispatch_return(process, tid, vmem, types)
            } else {
                self.dispatch_call(process, tid, vmem, types, builtins, operand)
            };
        }

        let thread = process.thread_mut(tid).unwrap();
        let frame = thread.current_frame_mut().unwrap();
        ensure_stack_page(frame, vmem);
        frame.pc += 1;

        let operand = resolve_operand(frame, inst.operand_ref(), &constants);

        match inst.opcode {
            Opcode::Nop => StepOutcome::Normal,
            Opcode::Extra => {
                frame.pending_extra = Some(inst.operand);
                StepOutcome::Normal
            }
            Opcode::SetType => {
                frame.type_slot = Some(Vaddr::new(operand as u64));
                StepOutcome::Normal
            }
            Opcode::SetOutput => {
                frame.output_slot = Some(Vaddr::new(operand as u64));
                StepOutcome::Normal
            }
            Opcode::SetValue => {
                frame.value_slot = Some(Vaddr::new(operand as u64));
                StepOutcome::Normal
            }
            Opcode::SetOvPtr => {
                let Some(cell) = frame.value_slot else {
                    return fault(&pid, tid, ErrorKind::Inst, "SET_OV_PTR without value slot");
                };
                match vmem.read::<u64>(cell) {
                    Ok(ptr) => {
                        frame.output_slot = Some(Vaddr::new(ptr));
                        StepOutcome::Normal
                    }
                    Err(_) => retry_or_require(vmem, cell, false),
                }
            }
            Opcode::Set => write_cell(vmem, frame.output_slot, operand, &pid, tid),
            Opcode::SetPtr => {
                frame.address_slot = Some(Vaddr::new(operand as u64));
                StepOutcome::Normal
            }
            Opcode::SetAdr => {
                frame.address_slot = Some(Vaddr::new(operand as u64));
                StepOutcome::Normal
            }
            Opcode::SetAlign => {
                frame.alignment_slot = operand as u32;
                StepOutcome::Normal
            }
            Opcode::AddAdr => {
                let base = frame.address_slot.unwrap_or(Vaddr::null());
                frame.address_slot = Some(base.add(operand as u64));
                StepOutcome::Normal
            }
            Opcode::MulAdr => {
                let base = frame.address_slot.unwrap_or(Vaddr::null());
                frame.address_slot = Some(base.add(operand as u64 * u64::from(frame.alignment_slot)));
                StepOutcome::Normal
            }
            Opcode::GetAdr => write_cell(
                vmem,
                frame.output_slot,
                frame.address_slot.unwrap_or(Vaddr::null()).as_u64() as i64,
                &pid,
                tid,
            ),
            Opcode::Load => match frame.address_slot {
                Some(addr) => match vmem.read::<i64>(addr) {
                    Ok(v) => write_cell(vmem, frame.output_slot, v, &pid, tid),
                    Err(_) => retry_or_require(vmem, addr, false),
                },
                None => fault(&pid, tid, ErrorKind::SegmentFault, "LOAD without address"),
            },
            Opcode::Store => match (frame.address_slot, frame.output_slot) {
                (Some(addr), Some(out)) => match vmem.read::<i64>(out) {
                    Ok(v) => match vmem.write(addr, v) {
                        Ok(()) => StepOutcome::Normal,
                        Err(_) => retry_or_require(vmem, addr, true),
                    },
                    Err(_) => retry_or_require(vmem, out, false),
                },
                _ => fault(&pid, tid, ErrorKind::SegmentFault, "STORE missing address/output"),
            },
            Opcode::Cmpxchg => {
                let (Some(addr), Some(out), Some(val)) =
                    (frame.address_slot, frame.output_slot, frame.value_slot)
                else {
                    return fault(&pid, tid, ErrorKind::Inst, "CMPXCHG missing operands");
                };
                let expected = match vmem.read::<i64>(out) {
                    Ok(v) => v,
                    Err(_) => return retry_or_require(vmem, out, false),
                };
                let new_value = match vmem.read::<i64>(val) {
                    Ok(v) => v,
                    Err(_) => return retry_or_require(vmem, val, false),
                };
                let current = match vmem.read::<i64>(addr) {
                    Ok(v) => v,
                    Err(_) => return retry_or_require(vmem, addr, true),
                };
                if current == expected {
                    match vmem.write(addr, new_value) {
                        Ok(()) => write_cell(vmem, frame.output_slot, 1, &pid, tid),
                        Err(_) => retry_or_require(vmem, addr, true),
                    }
                } else {
                    write_cell(vmem, frame.output_slot, 0, &pid, tid)
                }
            }
            Opcode::Alloca => {
                let size = operand.max(0) as u64;
                let addr = vmem.allocate(size.max(1));
                frame.record_alloca(addr);
                frame.address_slot = Some(addr);
                StepOutcome::Normal
            }
            Opcode::Test => {
                frame.test_flag = operand != 0;
                StepOutcome::Normal
            }
            Opcode::TestEq => {
                let lhs = match read_cell(vmem, frame.output_slot, &pid, tid) {
                    Ok(v) => v,
                    Err(outcome) => return outcome,
                };
                frame.test_flag = lhs == operand;
                StepOutcome::Normal
            }
            Opcode::Jump => {
                if frame.test_flag {
                    frame.pc = operand.max(0) as usize;
                    frame.test_flag = false;
                }
                StepOutcome::Normal
            }
            Opcode::IndirectJump => match frame.address_slot {
                Some(addr) => match vmem.read::<i64>(addr) {
                    Ok(target) => {
                        frame.pc = target.max(0) as usize;
                        StepOutcome::Normal
                    }
                    Err(_) => retry_or_require(vmem, addr, false),
                },
                None => fault(&pid, tid, ErrorKind::SegmentFault, "INDIRECT_JUMP without address"),
            },
            Opcode::Phi => {
                let src = if frame.incoming_edge {
                    frame.phi1
                } else {
                    frame.phi0
                };
                match src {
                    Some(cell) => match vmem.read::<i64>(cell) {
                        Ok(v) => write_cell(vmem, frame.output_slot, v, &pid, tid),
                        Err(_) => retry_or_require(vmem, cell, false),
                    },
                    None => fault(&pid, tid, ErrorKind::Inst, "PHI with no incoming value"),
                }
            }
            Opcode::TypeCast => cast(vmem, frame, types, false, &pid, tid),
            Opcode::BitCast => cast(vmem, frame, types, true, &pid, tid),
            Opcode::Add => binary(vmem, frame, &pid, tid, |a, b| a.wrapping_add(b)),
            Opcode::Sub => binary(vmem, frame, &pid, tid, |a, b| a.wrapping_sub(b)),
            Opcode::Mul => binary(vmem, frame, &pid, tid, |a, b| a.wrapping_mul(b)),
            Opcode::Div => checked_binary(vmem, frame, &pid, tid, |a, b| {
                (b != 0).then(|| a.wrapping_div(b))
            }),
            Opcode::Rem => checked_binary(vmem, frame, &pid, tid, |a, b| {
                (b != 0).then(|| a.wrapping_rem(b))
            }),
            Opcode::Shl => binary(vmem, frame, &pid, tid, |a, b| a.wrapping_shl(b as u32)),
            Opcode::Shr => binary(vmem, frame, &pid, tid, |a, b| a.wrapping_shr(b as u32)),
            Opcode::And => binary(vmem, frame, &pid, tid, |a, b| a & b),
            Opcode::Nand => binary(vmem, frame, &pid, tid, |a, b| !(a & b)),
            Opcode::Or => binary(vmem, frame, &pid, tid, |a, b| a | b),
            Opcode::Xor => binary(vmem, frame, &pid, tid, |a, b| a ^ b),
            Opcode::Max => binary(vmem, frame, &pid, tid, i64::max),
            Opcode::Min => binary(vmem, frame, &pid, tid, i64::min),
            Opcode::Equal => compare(vmem, frame, &pid, tid, |a, b| a == b),
            Opcode::NotEqual => compare(vmem, frame, &pid, tid, |a, b| a != b),
            Opcode::Greater => compare(vmem, frame, &pid, tid, |a, b| a > b),
            Opcode::GreaterEqual => compare(vmem, frame, &pid, tid, |a, b| a >= b),
            Opcode::NotNans => compare(vmem, frame, &pid, tid, |a, b| {
                !f64::from_bits(a as u64).is_nan() && !f64::from_bits(b as u64).is_nan()
            }),
            Opcode::OrNans => compare(vmem, frame, &pid, tid, |a, b| {
                f64::from_bits(a as u64).is_nan() || f64::from_bits(b as u64).is_nan()
            }),
            Opcode::Select => {
                let src = if frame.test_flag {
                    frame.value_slot
                } else {
                    frame.address_slot
                };
                match src {
                    Some(c) => match vmem.read::<i64>(c) {
                        Ok(v) => write_cell(vmem, frame.output_slot, v, &pid, tid),
                        Err(_) => retry_or_require(vmem, c, false),
                    },
                    None => fault(&pid, tid, ErrorKind::Inst, "SELECT missing operand"),
                }
            }
            Opcode::Shuffle => {
                // SIMD lane shuffles have no scalar counterpart at this
                // layer; pass the current value through unchanged.
                let v = match read_cell(vmem, frame.value_slot, &pid, tid) {
                    Ok(v) => v,
                    Err(outcome) => return outcome,
                };
                write_cell(vmem, frame.output_slot, v, &pid, tid)
            }
            Opcode::VaArg => {
                let idx = frame.va_cursor;
                frame.va_cursor += 1;
                let v = frame.va_args.get(idx).copied().unwrap_or(0);
                write_cell(vmem, frame.output_slot, v, &pid, tid)
            }
            Opcode::Call | Opcode::TailCall | Opcode::Return => {
                unreachable!("handled before frame/thread were borrowed")
            }
        }
    }

    fn dispatch_call(
        &self,
        process: &mut Process,
        tid: Tid,
        vmem: &mut Vmem,
        types: &TypeRegistry,
        builtins: &BuiltinTable,
        target_raw: i64,
    ) -> StepOutcome {
        let pid = process.pid.clone();
        let target = Vaddr::new(target_raw as u64);
        match types.function_at(target) {
            Some(Function::Normal { .. }) => {
                let thread = process.thread_mut(tid).unwrap();
                match thread.push_frame(target) {
                    Ok(()) => StepOutcome::Normal,
                    Err(_) => fault(&pid, tid, ErrorKind::ServerSys, "call stack overflow"),
                }
            }
            Some(Function::Builtin { name }) => {
                let Some(builtin) = builtins.get(name) else {
                    return fault(&pid, tid, ErrorKind::ExtLibrary, format!("unregistered builtin {name}"));
                };
                let thread = process.thread_mut(tid).unwrap();
                match builtin(thread, vmem) {
                    Ok(BuiltinPostProc::Normal) => StepOutcome::Normal,
                    Ok(BuiltinPostProc::ReEntry) => StepOutcome::ReEntry,
                    Ok(BuiltinPostProc::RetryLater(addr)) => StepOutcome::RetryLater(addr),
                    Err(message) => fault(&pid, tid, ErrorKind::ExtLibrary, message),
                }
            }
            Some(Function::Native { name }) => {
                fault(&pid, tid, ErrorKind::ExtLibrary, format!("native function {name} has no in-process implementation"))
            }
            None => fault(&pid, tid, ErrorKind::SegmentFault, "call to unmapped address"),
        }
    }

    /// `RETURN`: per §4.2, copies the frame's return slot into the caller's
    /// `output` at the caller's `type`, frees the stack page and every
    /// alloca page, pops the frame. A root frame's own return does not pop:
    /// it stages `pending_exit` so the caller's next `step` can drain any
    /// `atexit` handlers before the thread actually finishes (see the
    /// centralized check at the top of `step`), keeping the bottom frame's
    /// `stack` page resident for the exit code written there.
    fn dispatch_return(
        &self,
        process: &mut Process,
        tid: Tid,
        vmem: &mut Vmem,
        types: &TypeRegistry,
    ) -> StepOutcome {
        let thread = process.thread_mut(tid).unwrap();
        let out_cell = thread.current_frame().and_then(|f| f.output_slot);
        let exit_value = match out_cell {
            Some(c) => match vmem.read::<i64>(c) {
                Ok(v) => v,
                Err(_) => return retry_or_require(vmem, c, false),
            },
            None => 0,
        };

        let thread = process.thread_mut(tid).unwrap();
        if thread.stackinfos.len() == 1 {
            if thread.join_state == JoinState::Root {
                thread.pending_exit.get_or_insert(exit_value);
                return StepOutcome::Normal;
            }
            let returning_frame = thread.pop_frame().expect("frame exists while stepping");
            for addr in &returning_frame.alloca_addrs {
                let _ = vmem.free(*addr);
            }
            if let Some(stack) = returning_frame.stack {
                let _ = vmem.free(stack);
            }
            thread.status = ThreadStatus::Finished;
            return StepOutcome::Finished(exit_value);
        }

        let returning_frame = thread.pop_frame().expect("frame exists while stepping");
        for addr in &returning_frame.alloca_addrs {
            let _ = vmem.free(*addr);
        }
        if let Some(stack) = returning_frame.stack {
            let _ = vmem.free(stack);
        }

        let caller = thread.current_frame_mut().unwrap();
        let narrowed = match caller.type_slot.and_then(|t| types.type_at(t)) {
            Some(crate::value::Type::Basic(addr)) => narrow(exit_value, *addr),
            _ => exit_value,
        };
        match caller.output_slot {
            Some(out) => match vmem.write(out, narrowed) {
                Ok(()) => StepOutcome::Normal,
                Err(_) => retry_or_require(vmem, out, true),
            },
            None => StepOutcome::Normal,
        }
    }
}

/// Gives a frame its own stack page the first time it is stepped. CALL
/// cannot allocate one itself without threading `Vmem` through
/// `Process`/`Thread` construction, so the allocation happens here, lazily,
/// before the frame's first instruction runs.
fn ensure_stack_page(frame: &mut StackFrame, vmem: &mut Vmem) {
    if frame.stack.is_none() {
        frame.stack = Some(vmem.allocate(STACK_PAGE_SIZE));
    }
}

/// Resolves an operand per §4.1: `EXTRA` widens the raw 24-bit index first,
/// then the widened index is used to look up the constant pool or compute a
/// stack-relative address.
fn resolve_operand(frame: &mut StackFrame, operand_ref: OperandRef, constants: &[i64]) -> i64 {
    let extra = frame.pending_extra.take();
    match operand_ref {
        OperandRef::None => 0,
        OperandRef::Constant(idx) => {
            let widened = widen_index(idx, extra);
            constants.get(widened as usize).copied().unwrap_or(0)
        }
        OperandRef::Stack(idx) => {
            let widened = widen_index(idx, extra);
            let base = frame.stack.expect("stack page allocated before first instruction");
            base.add(widened * STACK_CELL_SIZE).as_u64() as i64
        }
    }
}

fn widen_index(idx: u32, extra: Option<u32>) -> u64 {
    match extra {
        Some(e) => extend_operand(idx, e),
        None => idx as u64,
    }
}

/// Reads an operand cell, propagating a non-resident page as the
/// `StepOutcome` the caller should return immediately rather than folding
/// it into a default value the way a missing slot is allowed to.
fn read_cell(vmem: &mut Vmem, cell: Option<Vaddr>, pid: &Pid, tid: Tid) -> Result<i64, StepOutcome> {
    match cell {
        Some(c) => match vmem.read::<i64>(c) {
            Ok(v) => Ok(v),
            Err(_) => Err(retry_or_require(vmem, c, false)),
        },
        None => Err(fault(pid, tid, ErrorKind::Inst, "missing operand slot")),
    }
}

fn write_cell(vmem: &mut Vmem, cell: Option<Vaddr>, value: i64, pid: &Pid, tid: Tid) -> StepOutcome {
    match cell {
        Some(c) => match vmem.write(c, value) {
            Ok(()) => StepOutcome::Normal,
            Err(_) => retry_or_require(vmem, c, true),
        },
        None => fault(pid, tid, ErrorKind::Inst, "missing output slot"),
    }
}

fn binary(
    vmem: &mut Vmem,
    frame: &StackFrame,
    pid: &Pid,
    tid: Tid,
    f: impl Fn(i64, i64) -> i64,
) -> StepOutcome {
    let lhs = match read_cell(vmem, frame.output_slot, pid, tid) {
        Ok(v) => v,
        Err(outcome) => return outcome,
    };
    let rhs = match read_cell(vmem, frame.value_slot, pid, tid) {
        Ok(v) => v,
        Err(outcome) => return outcome,
    };
    write_cell(vmem, frame.output_slot, f(lhs, rhs), pid, tid)
}

fn checked_binary(
    vmem: &mut Vmem,
    frame: &StackFrame,
    pid: &Pid,
    tid: Tid,
    f: impl Fn(i64, i64) -> Option<i64>,
) -> StepOutcome {
    let lhs = match read_cell(vmem, frame.output_slot, pid, tid) {
        Ok(v) => v,
        Err(outcome) => return outcome,
    };
    let rhs = match read_cell(vmem, frame.value_slot, pid, tid) {
        Ok(v) => v,
        Err(outcome) => return outcome,
    };
    match f(lhs, rhs) {
        Some(v) => write_cell(vmem, frame.output_slot, v, pid, tid),
        None => fault(pid, tid, ErrorKind::ServerApp, "division by zero"),
    }
}

fn compare(
    vmem: &mut Vmem,
    frame: &mut StackFrame,
    pid: &Pid,
    tid: Tid,
    f: impl Fn(i64, i64) -> bool,
) -> StepOutcome {
    let lhs = match read_cell(vmem, frame.output_slot, pid, tid) {
        Ok(v) => v,
        Err(outcome) => return outcome,
    };
    let rhs = match read_cell(vmem, frame.value_slot, pid, tid) {
        Ok(v) => v,
        Err(outcome) => return outcome,
    };
    let result = f(lhs, rhs);
    frame.test_flag = result;
    write_cell(vmem, frame.output_slot, i64::from(result), pid, tid)
}

fn cast(
    vmem: &mut Vmem,
    frame: &mut StackFrame,
    types: &TypeRegistry,
    bitwise: bool,
    pid: &Pid,
    tid: Tid,
) -> StepOutcome {
    let Some(out) = frame.output_slot else {
        return fault(pid, tid, ErrorKind::Inst, "cast without output slot");
    };
    let value = match vmem.read::<i64>(out) {
        Ok(v) => v,
        Err(_) => return retry_or_require(vmem, out, false),
    };
    if bitwise {
        return write_cell(vmem, frame.output_slot, value, pid, tid);
    }
    let narrowed = match frame.type_slot.and_then(|t| types.type_at(t)) {
        Some(crate::value::Type::Basic(addr)) => narrow(value, *addr),
        _ => value,
    };
    write_cell(vmem, frame.output_slot, narrowed, pid, tid)
}

fn narrow(value: i64, basic: Vaddr) -> i64 {
    match basic {
        a if a == BasicTypeAddress::UI8 => (value as u8) as i64,
        a if a == BasicTypeAddress::UI16 => (value as u16) as i64,
        a if a == BasicTypeAddress::UI32 => (value as u32) as i64,
        a if a == BasicTypeAddress::SI8 => i64::from(value as i8),
        a if a == BasicTypeAddress::SI16 => i64::from(value as i16),
        a if a == BasicTypeAddress::SI32 => i64::from(value as i32),
        _ => value,
    }
}

fn retry_or_require(vmem: &mut Vmem, addr: Vaddr, writable: bool) -> StepOutcome {
    match vmem.fault(addr, writable) {
        FaultOutcome::Resident => StepOutcome::Normal,
        FaultOutcome::NeedsRequire(_) | FaultOutcome::RetryLater => StepOutcome::RetryLater(addr),
    }
}

fn fault(pid: &Pid, tid: Tid, kind: ErrorKind, message: impl Into<String>) -> StepOutcome {
    StepOutcome::Fault(InterpreterError::new(kind, pid.clone(), tid, message))
}
