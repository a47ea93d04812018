//! Floating-point arithmetic and int/float conversions
//!
//! Registers carry binary64 values as bit patterns; every op reinterprets
//! the bits rather than casting the integer value itself.

use std::io;

use crate::decode::Opcode;
use crate::error::VmError;
use crate::interpreter::Interpreter;

impl<W: io::Write> Interpreter<W> {
    pub(super) fn exec_fp(&mut self, op: Opcode, target: u8, source: u8) -> Result<(), VmError> {
        let t = f64::from_bits(self.read_reg(target));
        let s = f64::from_bits(self.read_reg(source));

        let result = match op {
            Opcode::Fadd => t + s,
            Opcode::Fsub => t - s,
            Opcode::Fmul => t * s,
            Opcode::Fdiv => t / s,
            Opcode::Frem => t % s,
            Opcode::Fexp => t.powf(s),
            _ => return Err(VmError::InternalFailure),
        };

        self.write_reg(target, result.to_bits());
        self.set_zero_flag(result == 0.0);
        Ok(())
    }

    pub(super) fn exec_inttofp(&mut self, reg: u8) {
        let value = self.read_reg(reg) as f64;
        self.write_reg(reg, value.to_bits());
    }

    pub(super) fn exec_sinttofp(&mut self, reg: u8) {
        let value = (self.read_reg(reg) as i64) as f64;
        self.write_reg(reg, value.to_bits());
    }

    pub(super) fn exec_fptoint(&mut self, reg: u8) {
        let value = f64::from_bits(self.read_reg(reg));
        self.write_reg(reg, (value as i64) as u64);
    }
}
