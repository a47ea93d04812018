//! Bitwise opcodes
//!
//! `shr`/`shl` preserve the direction swap carried over from the executable
//! format this interpreter targets: `Shr` performs a left shift and `Shl` a
//! right shift. See the design ledger for why this is intentional.

use std::io;

use crate::decode::Opcode;
use crate::error::VmError;
use crate::interpreter::Interpreter;

impl<W: io::Write> Interpreter<W> {
    pub(super) fn exec_bitwise(&mut self, op: Opcode, target: u8, source: u8) -> Result<(), VmError> {
        let t = self.read_reg(target);
        let s = self.read_reg(source);

        let result = match op {
            Opcode::Shr => t.wrapping_shl(s as u32),
            Opcode::Shl => t.wrapping_shr(s as u32),
            Opcode::And => t & s,
            Opcode::Xor => t ^ s,
            Opcode::Or => t | s,
            _ => return Err(VmError::InternalFailure),
        };

        self.write_reg(target, result);
        self.set_zero_flag(result == 0);
        Ok(())
    }

    pub(super) fn exec_not(&mut self, reg: u8) {
        let value = self.read_reg(reg);
        let result = !value;
        self.write_reg(reg, result);
        self.set_zero_flag(result == 0);
    }
}
