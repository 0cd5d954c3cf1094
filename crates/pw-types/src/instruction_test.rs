use super::*;

#[test]
fn encode_decode_roundtrip() {
    let word = encode(Opcode::Add, 1, 0x00AB_CDEF & FILL_OPERAND);
    let inst = decode(word).unwrap();
    assert_eq!(inst.opcode, Opcode::Add);
    assert_eq!(inst.option, 1);
    assert_eq!(inst.operand, 0x00AB_CDEF & FILL_OPERAND);
}

#[test]
fn unknown_opcode_is_err() {
    // Opcode field holds 6 bits (0..64); anything beyond COUNT is unknown.
    let word = (63u32) << (OPTION_BITS_FOR_TEST + OPERAND_BITS_FOR_TEST);
    assert_eq!(decode(word), Err(63));
}

#[test]
fn operand_ref_follows_head_operand_bit() {
    let none = Instruction {
        opcode: Opcode::Nop,
        option: 0,
        operand: FILL_OPERAND,
    };
    let constant = Instruction {
        opcode: Opcode::SetValue,
        option: 0,
        operand: HEAD_OPERAND | 7,
    };
    let stack = Instruction {
        opcode: Opcode::SetValue,
        option: 0,
        operand: 3,
    };
    assert_eq!(none.operand_ref(), OperandRef::None);
    assert_eq!(constant.operand_ref(), OperandRef::Constant(7));
    assert_eq!(stack.operand_ref(), OperandRef::Stack(3));
}

#[test]
fn extend_operand_folds_extra_word() {
    let wide = extend_operand(0x00FF_FFFF, 0x1);
    assert_eq!(wide, 0x01FF_FFFF);
}

#[test]
fn opcode_table_covers_full_range() {
    for raw in 0..Opcode::COUNT {
        assert!(Opcode::from_u8(raw).is_some());
    }
    assert!(Opcode::from_u8(Opcode::COUNT).is_none());
}

// Mirrors the private shift constants in the parent module so the
// out-of-range test above can build a word without exposing them publicly.
const OPTION_BITS_FOR_TEST: u32 = 2;
const OPERAND_BITS_FOR_TEST: u32 = 24;
