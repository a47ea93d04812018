//! Integer arithmetic opcodes

use std::io;

use crate::decode::Opcode;
use crate::error::VmError;
use crate::interpreter::Interpreter;

impl<W: io::Write> Interpreter<W> {
    /// Writes `result` into `target` and sets the Zero flag iff `result` is
    /// zero. Shared by every fixed-width arithmetic/bitwise opcode.
    fn alu_write(&mut self, target: u8, result: u64) {
        self.write_reg(target, result);
        self.set_zero_flag(result == 0);
    }

    pub(super) fn exec_alu(&mut self, op: Opcode, target: u8, source: u8) -> Result<(), VmError> {
        let t = self.read_reg(target);
        let s = self.read_reg(source);

        let result = match op {
            Opcode::Add => t.wrapping_add(s),
            Opcode::Sub => t.wrapping_sub(s),
            Opcode::Mul => t.wrapping_mul(s),
            Opcode::Div => t.checked_div(s).ok_or(VmError::DivisionByZero)?,
            Opcode::Idiv => (t as i64).checked_div(s as i64).ok_or(VmError::DivisionByZero)? as u64,
            Opcode::Rem => t.checked_rem(s).ok_or(VmError::DivisionByZero)?,
            Opcode::Irem => (t as i64).checked_rem(s as i64).ok_or(VmError::DivisionByZero)? as u64,
            _ => return Err(VmError::InternalFailure),
        };

        self.alu_write(target, result);
        Ok(())
    }

    pub(super) fn exec_rst(&mut self, reg: u8) {
        self.write_reg(reg, 0);
    }

    pub(super) fn exec_mov(&mut self, target: u8, source: u8) {
        let value = self.read_reg(source);
        self.write_reg(target, value);
    }
}
