/// The taxonomy of errors a thread or process can fail with. Distinct from
/// `RuntimeError`-style per-crate error enums (those carry the detail;
/// `ErrorKind` is the coarse category reported up to the controller and
/// logged).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    /// Out-of-bounds or unmapped memory access.
    SegmentFault,
    /// Malformed or unsupported instruction encoding.
    Inst,
    /// An operation was attempted on a value of the wrong type.
    TypeViolation,
    /// A memory coherence operation could not complete.
    Memory,
    /// A built-in (libc-style) function call failed.
    ExtLibrary,
    /// Node or cluster configuration is invalid.
    Configure,
    /// The running application raised an application-level error.
    ServerApp,
    /// An internal server invariant was violated.
    ServerSys,
}

impl ErrorKind {
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SegmentFault => "segment_fault",
            Self::Inst => "inst",
            Self::TypeViolation => "type_violation",
            Self::Memory => "memory",
            Self::ExtLibrary => "ext_library",
            Self::Configure => "configure",
            Self::ServerApp => "server_app",
            Self::ServerSys => "server_sys",
        }
    }
}
