/// The module a [`crate::Opcode`]-independent command packet is destined
/// for, matching the numeric module ids carried on the wire.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Module {
    Memory = 1,
    Vm = 2,
    Scheduler = 3,
    Gui = 4,
    Controller = 5,
}

impl Module {
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    #[must_use]
    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Memory),
            2 => Some(Self::Vm),
            3 => Some(Self::Scheduler),
            4 => Some(Self::Gui),
            5 => Some(Self::Controller),
            _ => None,
        }
    }
}

#[cfg(test)]
mod module_test {
    use super::Module;

    #[test]
    fn roundtrip() {
        for m in [
            Module::Memory,
            Module::Vm,
            Module::Scheduler,
            Module::Gui,
            Module::Controller,
        ] {
            assert_eq!(Module::from_u8(m.as_u8()), Some(m));
        }
    }

    #[test]
    fn unknown_is_none() {
        assert_eq!(Module::from_u8(0), None);
        assert_eq!(Module::from_u8(6), None);
    }
}
