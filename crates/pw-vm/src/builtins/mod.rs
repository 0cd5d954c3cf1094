//! The registry of built-in (libc-style) functions a program can call
//! without a loaded function body. Grounded on `BuiltinLibc` in
//! `builtin_libc.cpp`: each entry there takes the thread and a destination
//! address and returns whether the call unwinds extra frames (`exit`,
//! `longjmp`). Here a builtin reads its arguments from the calling frame's
//! `address_slot`/`value_slot`/`alignment_slot` cells (the same cells
//! ordinary instructions use) and writes its result to `output_slot`.

use std::collections::HashMap;

use pw_types::Vaddr;
use pw_vmem::{MemorySpace, Vmem};

use crate::process::Thread;

/// What a builtin asks the interpreter to do next, mirroring [`crate::StepOutcome`]'s
/// suspension points so a builtin is never forced to block in place.
#[derive(Debug)]
pub enum BuiltinPostProc {
    /// The call is complete; resume the caller on the next quantum.
    Normal,
    /// The frame stack was rewritten out from under this call (`exit`,
    /// `longjmp`); let the interpreter re-evaluate from the new current
    /// frame rather than advancing past this instruction as usual.
    ReEntry,
    /// The page at this address is not yet resident; park the thread and
    /// retry once it arrives.
    RetryLater(Vaddr),
}

type BuiltinFn = fn(&mut Thread, &mut Vmem) -> Result<BuiltinPostProc, String>;

/// The name -> implementation table, built once per node at startup and
/// shared read-only across every process it runs.
pub struct BuiltinTable {
    entries: HashMap<&'static str, BuiltinFn>,
}

impl Default for BuiltinTable {
    fn default() -> Self {
        let mut entries: HashMap<&'static str, BuiltinFn> = HashMap::new();
        entries.insert("malloc", malloc);
        entries.insert("calloc", calloc);
        entries.insert("realloc", realloc);
        entries.insert("free", free);
        entries.insert("memcpy", memcpy);
        entries.insert("memmove", memcpy);
        entries.insert("memset", memset);
        entries.insert("atexit", atexit);
        entries.insert("exit", exit);
        entries.insert("setjmp", setjmp);
        entries.insert("longjmp", longjmp);
        entries.insert("strtol", strtol);
        entries.insert("strtoll", strtol);
        Self { entries }
    }
}

impl BuiltinTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<BuiltinFn> {
        self.entries.get(name).copied()
    }
}

fn arg_address(thread: &Thread) -> Option<Vaddr> {
    thread.current_frame().and_then(|f| f.address_slot)
}

fn arg_value(vmem: &Vmem, thread: &Thread) -> i64 {
    thread
        .current_frame()
        .and_then(|f| f.value_slot)
        .and_then(|c| vmem.read::<i64>(c).ok())
        .unwrap_or(0)
}

fn arg_len(thread: &Thread) -> usize {
    thread.current_frame().map_or(0, |f| f.alignment_slot as usize)
}

fn set_output(vmem: &mut Vmem, thread: &Thread, value: i64) -> Result<(), String> {
    match thread.current_frame().and_then(|f| f.output_slot) {
        Some(cell) => vmem.write(cell, value).map_err(|e| format!("{e:?}")),
        None => Ok(()),
    }
}

fn malloc(thread: &mut Thread, vmem: &mut Vmem) -> Result<BuiltinPostProc, String> {
    let size = arg_value(vmem, thread).max(0) as u64;
    let addr = vmem.allocate(size.max(1));
    set_output(vmem, thread, addr.as_u64() as i64)?;
    Ok(BuiltinPostProc::Normal)
}

fn calloc(thread: &mut Thread, vmem: &mut Vmem) -> Result<BuiltinPostProc, String> {
    let count = arg_address(thread).map_or(0, |a| a.as_u64()) as i64;
    let size = arg_value(vmem, thread);
    let total = (count.max(0) as u64).saturating_mul(size.max(0) as u64);
    // freshly allocated pages start zeroed, so calloc needs no explicit clear.
    let addr = vmem.allocate(total.max(1));
    set_output(vmem, thread, addr.as_u64() as i64)?;
    Ok(BuiltinPostProc::Normal)
}

fn realloc(thread: &mut Thread, vmem: &mut Vmem) -> Result<BuiltinPostProc, String> {
    let old = arg_address(thread).ok_or("realloc without pointer")?;
    let new_size = arg_value(vmem, thread).max(0) as u64;
    let old_size = vmem.page(old).map_or(0, pw_vmem::Page::size) as u64;
    let new_addr = vmem.allocate(new_size.max(1));
    let copy_len = old_size.min(new_size) as usize;
    if copy_len > 0 {
        vmem.copy_within(old, new_addr, copy_len)
            .map_err(|e| format!("{e:?}"))?;
    }
    vmem.free(old).map_err(|e| format!("{e:?}"))?;
    set_output(vmem, thread, new_addr.as_u64() as i64)?;
    Ok(BuiltinPostProc::Normal)
}

fn free(thread: &mut Thread, vmem: &mut Vmem) -> Result<BuiltinPostProc, String> {
    let ptr = arg_address(thread).ok_or("free without pointer")?;
    vmem.free(ptr).map_err(|e| format!("{e:?}"))?;
    Ok(BuiltinPostProc::Normal)
}

fn memcpy(thread: &mut Thread, vmem: &mut Vmem) -> Result<BuiltinPostProc, String> {
    let dst = arg_address(thread).ok_or("memcpy without destination")?;
    let src = Vaddr::new(arg_value(vmem, thread) as u64);
    let len = arg_len(thread);
    vmem.copy_within(src, dst, len).map_err(|e| format!("{e:?}"))?;
    set_output(vmem, thread, dst.as_u64() as i64)?;
    Ok(BuiltinPostProc::Normal)
}

fn memset(thread: &mut Thread, vmem: &mut Vmem) -> Result<BuiltinPostProc, String> {
    let dst = arg_address(thread).ok_or("memset without destination")?;
    let byte = arg_value(vmem, thread) as u8;
    let len = arg_len(thread);
    vmem.slice_mut(dst, len)
        .map_err(|e| format!("{e:?}"))?
        .fill(byte);
    set_output(vmem, thread, dst.as_u64() as i64)?;
    Ok(BuiltinPostProc::Normal)
}

/// Registers a function address to call (in LIFO order) once the root
/// thread's last frame returns.
fn atexit(thread: &mut Thread, vmem: &mut Vmem) -> Result<BuiltinPostProc, String> {
    let func = Vaddr::new(arg_value(vmem, thread) as u64);
    thread.calls_at_exit.push(func);
    Ok(BuiltinPostProc::Normal)
}

/// Unwinds every frame but the root, freeing each discarded frame's
/// `alloca`s and `stack` page, and stages the exit code on the thread.
/// The interpreter's own quantum loop drains `calls_at_exit` and writes the
/// code into the bottom frame's `stack` page once they have all run, since
/// the frame stack was just rewritten out from under this call.
fn exit(thread: &mut Thread, vmem: &mut Vmem) -> Result<BuiltinPostProc, String> {
    let code = arg_value(vmem, thread);
    thread.pending_exit = Some(code);
    let discarded = thread.unwind_to(1);
    for frame in &discarded {
        for addr in &frame.alloca_addrs {
            let _ = vmem.free(*addr);
        }
        if let Some(stack) = frame.stack {
            let _ = vmem.free(stack);
        }
    }
    Ok(BuiltinPostProc::ReEntry)
}

/// `env` cell layout a `setjmp`/`longjmp` pair agree on: the frame depth to
/// unwind to, the address `longjmp`'s value is written to, the resumption
/// `pc`, and the full register-slot snapshot so a handler that runs between
/// the two calls cannot corrupt state the unwound frame still needs.
const JMP_STACK_COUNT: u64 = 0;
const JMP_RET_ADDR: u64 = 8;
const JMP_PC: u64 = 16;
const JMP_PHI0: u64 = 24;
const JMP_PHI1: u64 = 32;
const JMP_TYPE: u64 = 40;
const JMP_ALIGNMENT: u64 = 48;
const JMP_OUTPUT: u64 = 56;
const JMP_VALUE: u64 = 64;
const JMP_ADDRESS: u64 = 72;
/// Total bytes a `setjmp` env pointer must have room for.
pub const JMP_ENV_LEN: u64 = 80;

fn vaddr_to_raw(addr: Option<Vaddr>) -> u64 {
    addr.map_or(0, Vaddr::as_u64)
}

fn raw_to_vaddr(raw: u64) -> Option<Vaddr> {
    (raw != 0).then(|| Vaddr::new(raw))
}

/// Snapshots the current frame depth and every register slot into `env`,
/// so a later `longjmp` can restore them exactly as they were here, even if
/// intervening calls have since overwritten the frame's live slots.
fn setjmp(thread: &mut Thread, vmem: &mut Vmem) -> Result<BuiltinPostProc, String> {
    let env = arg_address(thread).ok_or("setjmp without env pointer")?;
    let frame = thread.current_frame().ok_or("setjmp without a frame")?;
    let stack_count = thread.snapshot_depth() as u64;
    let ret_addr = vaddr_to_raw(frame.output_slot);
    let pc = frame.pc as u64;
    let phi0 = vaddr_to_raw(frame.phi0);
    let phi1 = vaddr_to_raw(frame.phi1);
    let type_slot = vaddr_to_raw(frame.type_slot);
    let alignment = u64::from(frame.alignment_slot);
    let value_slot = vaddr_to_raw(frame.value_slot);
    let address_slot = vaddr_to_raw(frame.address_slot);

    vmem.write(env.add(JMP_STACK_COUNT), stack_count).map_err(|e| format!("{e:?}"))?;
    vmem.write(env.add(JMP_RET_ADDR), ret_addr).map_err(|e| format!("{e:?}"))?;
    vmem.write(env.add(JMP_PC), pc).map_err(|e| format!("{e:?}"))?;
    vmem.write(env.add(JMP_PHI0), phi0).map_err(|e| format!("{e:?}"))?;
    vmem.write(env.add(JMP_PHI1), phi1).map_err(|e| format!("{e:?}"))?;
    vmem.write(env.add(JMP_TYPE), type_slot).map_err(|e| format!("{e:?}"))?;
    vmem.write(env.add(JMP_ALIGNMENT), alignment).map_err(|e| format!("{e:?}"))?;
    vmem.write(env.add(JMP_OUTPUT), ret_addr).map_err(|e| format!("{e:?}"))?;
    vmem.write(env.add(JMP_VALUE), value_slot).map_err(|e| format!("{e:?}"))?;
    vmem.write(env.add(JMP_ADDRESS), address_slot).map_err(|e| format!("{e:?}"))?;
    set_output(vmem, thread, 0)?;
    Ok(BuiltinPostProc::Normal)
}

/// Restores the frame depth and every register slot snapshotted by a prior
/// `setjmp`, freeing every frame discarded along the way, then writes `v`
/// at the `env.ret_addr` cell captured at that `setjmp` call.
fn longjmp(thread: &mut Thread, vmem: &mut Vmem) -> Result<BuiltinPostProc, String> {
    let env = arg_address(thread).ok_or("longjmp without env pointer")?;
    let val = arg_value(vmem, thread);

    let stack_count = vmem.read::<u64>(env.add(JMP_STACK_COUNT)).map_err(|e| format!("{e:?}"))? as usize;
    let ret_addr = vmem.read::<u64>(env.add(JMP_RET_ADDR)).map_err(|e| format!("{e:?}"))?;
    let pc = vmem.read::<u64>(env.add(JMP_PC)).map_err(|e| format!("{e:?}"))? as usize;
    let phi0 = vmem.read::<u64>(env.add(JMP_PHI0)).map_err(|e| format!("{e:?}"))?;
    let phi1 = vmem.read::<u64>(env.add(JMP_PHI1)).map_err(|e| format!("{e:?}"))?;
    let type_slot = vmem.read::<u64>(env.add(JMP_TYPE)).map_err(|e| format!("{e:?}"))?;
    let alignment = vmem.read::<u64>(env.add(JMP_ALIGNMENT)).map_err(|e| format!("{e:?}"))? as u32;
    let output = vmem.read::<u64>(env.add(JMP_OUTPUT)).map_err(|e| format!("{e:?}"))?;
    let value_slot = vmem.read::<u64>(env.add(JMP_VALUE)).map_err(|e| format!("{e:?}"))?;
    let address_slot = vmem.read::<u64>(env.add(JMP_ADDRESS)).map_err(|e| format!("{e:?}"))?;

    if stack_count == 0 || stack_count > thread.snapshot_depth() {
        return Err("longjmp to a deeper stack than the current one".into());
    }
    let discarded = thread.unwind_to(stack_count);
    for frame in &discarded {
        for addr in &frame.alloca_addrs {
            let _ = vmem.free(*addr);
        }
        if let Some(stack) = frame.stack {
            let _ = vmem.free(stack);
        }
    }

    if let Some(frame) = thread.current_frame_mut() {
        frame.pc = pc;
        frame.phi0 = raw_to_vaddr(phi0);
        frame.phi1 = raw_to_vaddr(phi1);
        frame.type_slot = raw_to_vaddr(type_slot);
        frame.alignment_slot = alignment;
        frame.output_slot = raw_to_vaddr(output);
        frame.value_slot = raw_to_vaddr(value_slot);
        frame.address_slot = raw_to_vaddr(address_slot);
    }

    let ret_cell = raw_to_vaddr(ret_addr).ok_or("longjmp with no return cell")?;
    vmem.write(ret_cell, val).map_err(|e| format!("{e:?}"))?;
    Ok(BuiltinPostProc::ReEntry)
}

/// Parses a decimal integer out of the NUL-terminated byte string at
/// `address_slot`, one byte at a time (there is no bulk string read in
/// this address space: a string may straddle more than one resident page).
fn strtol(thread: &mut Thread, vmem: &mut Vmem) -> Result<BuiltinPostProc, String> {
    let start = arg_address(thread).ok_or("strtol without string pointer")?;
    let mut value: i64 = 0;
    let mut negative = false;
    let mut offset = 0u64;
    let mut seen_digit = false;
    loop {
        let byte = vmem
            .read::<u8>(start.add(offset))
            .map_err(|e| format!("{e:?}"))?;
        match byte {
            b'-' if offset == 0 => negative = true,
            b'+' if offset == 0 => {}
            b'0'..=b'9' => {
                value = value.wrapping_mul(10).wrapping_add(i64::from(byte - b'0'));
                seen_digit = true;
            }
            _ => break,
        }
        offset += 1;
        if !seen_digit && offset > 1 {
            break;
        }
    }
    set_output(vmem, thread, if negative { -value } else { value })?;
    Ok(BuiltinPostProc::Normal)
}
