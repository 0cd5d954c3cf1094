
use std::collections::HashMap;

use pw_types::Vaddr;

/// A loaded type, keyed in the `Program` address range. Basic types live at
/// the fixed `BasicTypeAddress` constants; structs/arrays/vectors are
/// assigned an address at load time.
#[derive(Clone, Debug)]
pub enum Type {
    /// A primitive type identified by its fixed `BasicTypeAddress`.
    Basic(Vaddr),
    /// A struct: an ordered list of `(field type, byte offset)`.
    Struct { fields: Vec<(Vaddr, u32)> },
    /// A fixed-length array of `count` elements of `elem`.
    Array { elem: Vaddr, count: u32 },
    /// A SIMD-style vector of `count` elements of `elem`.
    Vector { elem: Vaddr, count: u32 },
}

/// A loaded, callable unit of code.
#[derive(Clone, Debug)]
pub enum Function {
    /// Ordinary bytecode, compiled from the source program.
    Normal {
        code: Vec<u32>,
        constants: Vec<i64>,
        value_types: Vec<Vaddr>,
    },
    /// A registered built-in (libc-style) function, resolved by name at
    /// call time through [`crate::builtins::BuiltinTable`].
    Builtin { name: String },
    /// A function implemented outside the interpreter entirely (e.g. a
    /// platform callback); ProcessWarp only records the registration, it
    /// never executes one directly.
    Native { name: String },
}

/// The program-wide table of loaded types and functions, addressed by
/// their fixed `Program`-range `Vaddr`.
#[derive(Default)]
pub struct TypeRegistry {
    types: HashMap<Vaddr, Type>,
    functions: HashMap<Vaddr, Function>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_type(&mut self, addr: Vaddr, ty: Type) {
        self.types.insert(addr, ty);
    }

    #[must_use]
    pub fn type_at(&self, addr: Vaddr) -> Option<&Type> {
        self.types.get(&addr)
    }

    pub fn define_function(&mut self, addr: Vaddr, func: Function) {
        self.functions.insert(addr, func);
    }

    #[must_use]
    pub fn function_at(&self, addr: Vaddr) -> Option<&Function> {
        self.functions.get(&addr)
    }
}
