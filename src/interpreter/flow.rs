//! Control-flow opcodes: branches, jumps, and call/return frames
//!
//! `call`/`callr` push a two-word frame (saved FP, return address) and set
//! `FP` to its base; `ret` reads that frame back out, plus a caller-supplied
//! argument-cleanup count at `FP+8` that no opcode here writes (see the
//! design ledger).

use std::io;

use crate::consts::VM_MEMORYSIZE;
use crate::error::VmError;
use crate::interpreter::Interpreter;

impl<W: io::Write> Interpreter<W> {
    pub(super) fn exec_jz(&mut self, target: u32) {
        if self.zero_flag_set() {
            self.set_ip(target);
        }
    }

    pub(super) fn exec_jzr(&mut self, reg: u8) {
        if self.zero_flag_set() {
            let target = self.read_reg(reg) as u32;
            self.set_ip(target);
        }
    }

    pub(super) fn exec_jmp(&mut self, target: u32) {
        self.set_ip(target);
    }

    pub(super) fn exec_jmpr(&mut self, reg: u8) {
        let target = self.read_reg(reg) as u32;
        self.set_ip(target);
    }

    fn push_stack_frame(&mut self, return_address: u32) -> Result<(), VmError> {
        let fp = self.fp();
        let frame_base = self.sp().checked_sub(8).ok_or(VmError::IllegalMemoryAccess)?;
        self.push_bytes(&return_address.to_le_bytes())?;
        self.push_bytes(&fp.to_le_bytes())?;
        self.set_fp(frame_base);
        Ok(())
    }

    pub(super) fn exec_call(&mut self, target: u32, return_address: u32) -> Result<(), VmError> {
        self.push_stack_frame(return_address)?;
        self.set_ip(target);
        Ok(())
    }

    pub(super) fn exec_callr(&mut self, reg: u8, return_address: u32) -> Result<(), VmError> {
        let target = self.read_reg(reg) as u32;
        self.push_stack_frame(return_address)?;
        self.set_ip(target);
        Ok(())
    }

    pub(super) fn exec_ret(&mut self) -> Result<(), VmError> {
        let frame_base = self.fp();

        if frame_base.checked_add(12).filter(|&e| e <= VM_MEMORYSIZE).is_none() {
            return Err(VmError::IllegalMemoryAccess);
        }

        let fp = u32::from_le_bytes(self.memory.read(frame_base, 4)?.try_into().unwrap());
        let ra = u32::from_le_bytes(self.memory.read(frame_base + 4, 4)?.try_into().unwrap());
        let ac = u32::from_le_bytes(self.memory.read(frame_base + 8, 4)?.try_into().unwrap());

        let sp = frame_base
            .checked_add(12)
            .and_then(|v| v.checked_add(ac))
            .filter(|&e| e <= VM_MEMORYSIZE)
            .ok_or(VmError::IllegalMemoryAccess)?;

        self.set_sp(sp);
        self.set_fp(fp);
        self.set_ip(ra);
        Ok(())
    }
}
