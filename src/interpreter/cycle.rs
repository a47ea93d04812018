//! Fetch/decode/execute cycle and the top-level `run` loop

use std::io;

use tracing::{debug, trace};

use crate::decode::{decode_length, Opcode};
use crate::error::VmError;
use crate::interpreter::Interpreter;
use crate::registers::reg_size;

/// Diagnostic record of one completed cycle: the address it started at and
/// the opcode decoded there, if any.
#[derive(Debug, Clone, Copy)]
pub struct CycleOutcome {
    /// The pre-cycle instruction pointer.
    pub ip: u32,
    /// The decoded opcode, or `None` if the byte at `ip` wasn't a valid one.
    pub opcode: Option<Opcode>,
}

impl<W: io::Write> Interpreter<W> {
    fn exec_loadi(&mut self, ip: u32) -> Result<(), VmError> {
        let reg = self.read_u8_at(ip + 1)?;
        self.move_mem_to_reg(reg, ip + 2)
    }

    fn dispatch(&mut self, op: Opcode, ip: u32, len: u32) -> Result<(), VmError> {
        use Opcode::*;

        match op {
            Rpush => {
                let reg = self.read_u8_at(ip + 1)?;
                let size = reg_size(reg);
                let value = self.read_reg(reg).to_le_bytes();
                self.push_bytes(&value[..size as usize])
            }
            Rpop => {
                let reg = self.read_u8_at(ip + 1)?;
                let size = reg_size(reg);
                let bytes = self.pop_bytes(size)?;
                let mut buf = [0u8; 8];
                buf[..size as usize].copy_from_slice(&bytes);
                self.write_reg(reg, u64::from_le_bytes(buf));
                Ok(())
            }
            Mov => {
                let target = self.read_u8_at(ip + 1)?;
                let source = self.read_u8_at(ip + 2)?;
                self.exec_mov(target, source);
                Ok(())
            }
            Loadi => self.exec_loadi(ip),
            Rst => {
                let reg = self.read_u8_at(ip + 1)?;
                self.exec_rst(reg);
                Ok(())
            }

            Add | Sub | Mul | Div | Idiv | Rem | Irem => {
                let target = self.read_u8_at(ip + 1)?;
                let source = self.read_u8_at(ip + 2)?;
                self.exec_alu(op, target, source)
            }

            Fadd | Fsub | Fmul | Fdiv | Frem | Fexp => {
                let target = self.read_u8_at(ip + 1)?;
                let source = self.read_u8_at(ip + 2)?;
                self.exec_fp(op, target, source)
            }

            Flt | Fgt | Cmp | Lt | Gt | Ult | Ugt => {
                let target = self.read_u8_at(ip + 1)?;
                let source = self.read_u8_at(ip + 2)?;
                self.exec_compare(op, target, source)
            }

            Shr | Shl | And | Xor | Or => {
                let target = self.read_u8_at(ip + 1)?;
                let source = self.read_u8_at(ip + 2)?;
                self.exec_bitwise(op, target, source)
            }
            Not => {
                let reg = self.read_u8_at(ip + 1)?;
                self.exec_not(reg);
                Ok(())
            }

            Inttofp => {
                self.exec_inttofp(self.read_u8_at(ip + 1)?);
                Ok(())
            }
            Sinttofp => {
                self.exec_sinttofp(self.read_u8_at(ip + 1)?);
                Ok(())
            }
            Fptoint => {
                self.exec_fptoint(self.read_u8_at(ip + 1)?);
                Ok(())
            }

            Load => self.exec_load(ip),
            Loadr => self.exec_loadr(ip),
            Loads => self.exec_loads(ip),
            Loadsr => self.exec_loadsr(ip),
            Store => self.exec_store(ip),
            Push => self.exec_push(ip),

            Read => {
                let target = self.read_u8_at(ip + 1)?;
                let source = self.read_u8_at(ip + 2)?;
                self.exec_read(target, source)
            }
            Readc => {
                let target = self.read_u8_at(ip + 1)?;
                let addr = self.read_u32_at(ip + 2)?;
                self.exec_readc(target, addr)
            }
            Reads => {
                let size = self.read_u32_at(ip + 1)?;
                let source = self.read_u8_at(ip + 5)?;
                self.exec_reads(size, source)
            }
            Readcs => {
                let size = self.read_u32_at(ip + 1)?;
                let addr = self.read_u32_at(ip + 5)?;
                self.exec_readcs(size, addr)
            }
            Write => {
                let target = self.read_u8_at(ip + 1)?;
                let source = self.read_u8_at(ip + 2)?;
                self.exec_write(target, source)
            }
            Writec => {
                let addr = self.read_u32_at(ip + 1)?;
                let source = self.read_u8_at(ip + 5)?;
                self.exec_writec(addr, source)
            }
            Writes => {
                let target = self.read_u8_at(ip + 1)?;
                let size = self.read_u32_at(ip + 2)?;
                self.exec_writes(target, size)
            }
            Writecs => {
                let addr = self.read_u32_at(ip + 1)?;
                let size = self.read_u32_at(ip + 5)?;
                self.exec_writecs(addr, size)
            }
            Copy => {
                let target = self.read_u8_at(ip + 1)?;
                let size = self.read_u32_at(ip + 2)?;
                let source = self.read_u8_at(ip + 6)?;
                self.exec_copy(target, size, source)
            }
            Copyc => {
                let addr_t = self.read_u32_at(ip + 1)?;
                let size = self.read_u32_at(ip + 5)?;
                let addr_s = self.read_u32_at(ip + 9)?;
                self.exec_copyc(addr_t, size, addr_s)
            }

            Jz => {
                let target = self.read_u32_at(ip + 1)?;
                self.exec_jz(target);
                Ok(())
            }
            Jzr => {
                let reg = self.read_u8_at(ip + 1)?;
                self.exec_jzr(reg);
                Ok(())
            }
            Jmp => {
                let target = self.read_u32_at(ip + 1)?;
                self.exec_jmp(target);
                Ok(())
            }
            Jmpr => {
                let reg = self.read_u8_at(ip + 1)?;
                self.exec_jmpr(reg);
                Ok(())
            }
            Call => {
                let target = self.read_u32_at(ip + 1)?;
                self.exec_call(target, ip + len)
            }
            Callr => {
                let reg = self.read_u8_at(ip + 1)?;
                self.exec_callr(reg, ip + len)
            }
            Ret => self.exec_ret(),

            Nop => Ok(()),
            Syscall => self.exec_syscall(),
        }
    }

    fn step(&mut self) -> Result<CycleOutcome, VmError> {
        let ip = self.ip();
        if ip >= self.memory.len() {
            return Err(VmError::IllegalMemoryAccess);
        }

        let opcode_byte = self.memory.read(ip, 1)?[0];
        let len = decode_length(&self.memory, ip, opcode_byte)?;

        if ip.checked_add(len).filter(|&e| e < self.memory.len()).is_none() {
            return Err(VmError::IllegalMemoryAccess);
        }

        let opcode = Opcode::from_byte(opcode_byte);
        trace!(ip, ?opcode, "executing instruction");

        match opcode {
            Some(op) => self.dispatch(op, ip, len)?,
            None => return Err(VmError::InvalidInstruction),
        }

        if self.ip() == ip {
            self.set_ip(ip + len);
        }

        Ok(CycleOutcome { ip, opcode })
    }
}

pub(super) fn cycle<W: io::Write>(vm: &mut Interpreter<W>) -> bool {
    if !vm.running {
        return false;
    }

    match vm.step() {
        Ok(_) => true,
        Err(e) => {
            debug!(error = ?e, "halting");
            vm.halt(e);
            false
        }
    }
}
