//! Comparison opcodes
//!
//! Every comparison sets the Zero flag iff its predicate holds; there is no
//! separate result register.

use std::io;

use crate::decode::Opcode;
use crate::error::VmError;
use crate::interpreter::Interpreter;

impl<W: io::Write> Interpreter<W> {
    pub(super) fn exec_compare(&mut self, op: Opcode, target: u8, source: u8) -> Result<(), VmError> {
        let t = self.read_reg(target);
        let s = self.read_reg(source);

        let holds = match op {
            Opcode::Cmp => t == s,
            Opcode::Lt => (t as i64) < (s as i64),
            Opcode::Gt => (t as i64) > (s as i64),
            Opcode::Ult => t < s,
            Opcode::Ugt => t > s,
            Opcode::Flt => f64::from_bits(t) < f64::from_bits(s),
            Opcode::Fgt => f64::from_bits(t) > f64::from_bits(s),
            _ => return Err(VmError::InternalFailure),
        };

        self.set_zero_flag(holds);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MODE_QWORD;

    fn vm() -> Interpreter<Vec<u8>> {
        Interpreter::with_output(Vec::new())
    }

    #[test]
    fn cmp_sets_zero_flag_on_equality() {
        let mut vm = vm();
        vm.write_reg(0 | MODE_QWORD, 42);
        vm.write_reg(1 | MODE_QWORD, 42);
        vm.exec_compare(Opcode::Cmp, 0 | MODE_QWORD, 1 | MODE_QWORD).unwrap();
        assert!(vm.zero_flag_set());
    }

    #[test]
    fn lt_is_signed() {
        let mut vm = vm();
        vm.write_reg(0 | MODE_QWORD, (-1i64) as u64);
        vm.write_reg(1 | MODE_QWORD, 1);
        vm.exec_compare(Opcode::Lt, 0 | MODE_QWORD, 1 | MODE_QWORD).unwrap();
        assert!(vm.zero_flag_set());
    }

    #[test]
    fn ult_treats_negative_bit_pattern_as_large() {
        let mut vm = vm();
        vm.write_reg(0 | MODE_QWORD, (-1i64) as u64);
        vm.write_reg(1 | MODE_QWORD, 1);
        vm.exec_compare(Opcode::Ult, 0 | MODE_QWORD, 1 | MODE_QWORD).unwrap();
        assert!(!vm.zero_flag_set());
    }

    #[test]
    fn flt_compares_as_binary64() {
        let mut vm = vm();
        vm.write_reg(0 | MODE_QWORD, 1.0f64.to_bits());
        vm.write_reg(1 | MODE_QWORD, 2.0f64.to_bits());
        vm.exec_compare(Opcode::Flt, 0 | MODE_QWORD, 1 | MODE_QWORD).unwrap();
        assert!(vm.zero_flag_set());
    }
}
