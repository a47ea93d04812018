//! Opcode enumeration and instruction-length decoding
//!
//! The discriminant order mirrors the canonical source ordering: this is
//! load-bearing, since executables encode opcodes as raw bytes against this
//! exact numbering.

use crate::consts::OP_NUM_TYPES;
use crate::error::VmError;
use crate::memory::Memory;
use crate::registers::reg_size;

/// One of the 59 NICE instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Rpush = 0,
    Rpop = 1,
    Mov = 2,
    Loadi = 3,
    Rst = 4,

    Add = 5,
    Sub = 6,
    Mul = 7,
    Div = 8,
    Idiv = 9,
    Rem = 10,
    Irem = 11,

    Fadd = 12,
    Fsub = 13,
    Fmul = 14,
    Fdiv = 15,
    Frem = 16,
    Fexp = 17,

    Flt = 18,
    Fgt = 19,

    Cmp = 20,
    Lt = 21,
    Gt = 22,
    Ult = 23,
    Ugt = 24,

    Shr = 25,
    Shl = 26,
    And = 27,
    Xor = 28,
    Or = 29,
    Not = 30,

    Inttofp = 31,
    Sinttofp = 32,
    Fptoint = 33,

    Load = 34,
    Loadr = 35,
    Loads = 36,
    Loadsr = 37,
    Store = 38,
    Push = 39,

    Read = 40,
    Readc = 41,
    Reads = 42,
    Readcs = 43,
    Write = 44,
    Writec = 45,
    Writes = 46,
    Writecs = 47,
    Copy = 48,
    Copyc = 49,

    Jz = 50,
    Jzr = 51,
    Jmp = 52,
    Jmpr = 53,
    Call = 54,
    Callr = 55,
    Ret = 56,

    Nop = 57,
    Syscall = 58,
}

impl Opcode {
    /// Decodes an opcode byte, returning `None` for anything at or beyond
    /// [`OP_NUM_TYPES`].
    pub const fn from_byte(byte: u8) -> Option<Self> {
        if byte >= OP_NUM_TYPES {
            return None;
        }
        // SAFETY: `Opcode` is `repr(u8)` with a contiguous discriminant
        // range 0..OP_NUM_TYPES, checked above.
        Some(unsafe { core::mem::transmute::<u8, Opcode>(byte) })
    }
}

/// Fixed length for every opcode except `Loadi` and `Push`, whose length
/// depends on bytes that follow the opcode itself.
const FIXED_LENGTH: [u32; OP_NUM_TYPES as usize] = [
    2, 2, 3, 0, 2, // rpush, rpop, mov, loadi*, rst
    3, 3, 3, 3, 3, 3, 3, // add..irem
    3, 3, 3, 3, 3, 3, // fadd..fexp
    3, 3, // flt, fgt
    3, 3, 3, 3, 3, // cmp, lt, gt, ult, ugt
    3, 3, 3, 3, 3, 2, // shr, shl, and, xor, or, not
    2, 2, 2, // inttofp, sinttofp, fptoint
    6, 3, 9, 6, 6, 0, // load, loadr, loads, loadsr, store, push*
    3, 6, 6, 9, 3, 6, 6, 9, 7, 13, // read..copyc
    5, 2, 5, 2, 5, 2, 1, // jz, jzr, jmp, jmpr, call, callr, ret
    1, 1, // nop, syscall
];

/// Computes the byte length of the instruction at `ip`, including the
/// opcode byte itself.
///
/// `Loadi` and `Push` read their own operands to determine length; every
/// other opcode is a table lookup. Unknown opcodes report length 1 so the
/// cycle can still advance past them before halting.
pub fn decode_length(memory: &Memory, ip: u32, opcode_byte: u8) -> Result<u32, VmError> {
    let Some(opcode) = Opcode::from_byte(opcode_byte) else {
        return Ok(1);
    };

    match opcode {
        Opcode::Loadi => {
            let reg = memory.read(ip + 1, 1)?[0];
            Ok(1 + 1 + reg_size(reg))
        }
        Opcode::Push => {
            let size = u32::from_le_bytes(memory.read(ip + 1, 4)?.try_into().unwrap());
            Ok(1 + 4 + size)
        }
        other => Ok(FIXED_LENGTH[other as usize]),
    }
}
