use crate::Vaddr;

/// Well-known addresses of the primitive types, fixed at the bottom of the
/// `Program` address range so every node agrees on them without a load-time
/// handshake.
pub struct BasicTypeAddress;

impl BasicTypeAddress {
    pub const VOID: Vaddr = Vaddr::new(0xF000_0000_0000_0001);
    pub const POINTER: Vaddr = Vaddr::new(0xF000_0000_0000_0002);
    pub const FUNCTION: Vaddr = Vaddr::new(0xF000_0000_0000_0003);

    pub const UI8: Vaddr = Vaddr::new(0xF000_0000_0000_0011);
    pub const UI16: Vaddr = Vaddr::new(0xF000_0000_0000_0012);
    pub const UI32: Vaddr = Vaddr::new(0xF000_0000_0000_0013);
    pub const UI64: Vaddr = Vaddr::new(0xF000_0000_0000_0014);
    pub const UI128: Vaddr = Vaddr::new(0xF000_0000_0000_0015);
    pub const UI256: Vaddr = Vaddr::new(0xF000_0000_0000_0016);
    pub const UI512: Vaddr = Vaddr::new(0xF000_0000_0000_0017);

    pub const SI8: Vaddr = Vaddr::new(0xF000_0000_0000_0021);
    pub const SI16: Vaddr = Vaddr::new(0xF000_0000_0000_0022);
    pub const SI32: Vaddr = Vaddr::new(0xF000_0000_0000_0023);
    pub const SI64: Vaddr = Vaddr::new(0xF000_0000_0000_0024);
    pub const SI128: Vaddr = Vaddr::new(0xF000_0000_0000_0025);
    pub const SI256: Vaddr = Vaddr::new(0xF000_0000_0000_0026);
    pub const SI512: Vaddr = Vaddr::new(0xF000_0000_0000_0027);

    pub const F32: Vaddr = Vaddr::new(0xF000_0000_0000_0032);
    pub const F64: Vaddr = Vaddr::new(0xF000_0000_0000_0033);
    pub const F128: Vaddr = Vaddr::new(0xF000_0000_0000_0035);

    pub const MAX: Vaddr = Vaddr::new(0xF000_0000_0000_00FF);
    pub const MASK: u64 = 0x0FFF_FFFF_FFFF_FFFF;

    /// `name` as it would appear in a diagnostic, for the fixed primitive
    /// addresses only; user-defined types have no static name here.
    #[must_use]
    pub fn name(addr: Vaddr) -> Option<&'static str> {
        match addr {
            Self::VOID => Some("void"),
            Self::POINTER => Some("pointer"),
            Self::FUNCTION => Some("function"),
            Self::UI8 => Some("ui8"),
            Self::UI16 => Some("ui16"),
            Self::UI32 => Some("ui32"),
            Self::UI64 => Some("ui64"),
            Self::UI128 => Some("ui128"),
            Self::UI256 => Some("ui256"),
            Self::UI512 => Some("ui512"),
            Self::SI8 => Some("si8"),
            Self::SI16 => Some("si16"),
            Self::SI32 => Some("si32"),
            Self::SI64 => Some("si64"),
            Self::SI128 => Some("si128"),
            Self::SI256 => Some("si256"),
            Self::SI512 => Some("si512"),
            Self::F32 => Some("f32"),
            Self::F64 => Some("f64"),
            Self::F128 => Some("f128"),
            _ => None,
        }
    }
}
