//! Memory and stack transfer opcodes
//!
//! "Frame-relative" ops (`load*`, `store`) address `FP + offset`; "absolute"
//! ops (`read*`, `write*`, `copy*`) address a guest address directly.
//! Every transfer validates both endpoints before it writes, so a bounds
//! failure never applies part of the transfer.

use std::io;

use crate::error::VmError;
use crate::interpreter::Interpreter;
use crate::registers::reg_size;

impl<W: io::Write> Interpreter<W> {
    pub(super) fn read_u32_at(&self, addr: u32) -> Result<u32, VmError> {
        Ok(u32::from_le_bytes(self.memory.read(addr, 4)?.try_into().unwrap()))
    }

    pub(super) fn read_i32_at(&self, addr: u32) -> Result<i32, VmError> {
        Ok(self.read_u32_at(addr)? as i32)
    }

    pub(super) fn read_u8_at(&self, addr: u32) -> Result<u8, VmError> {
        Ok(self.memory.read(addr, 1)?[0])
    }

    pub(super) fn move_mem_to_reg(&mut self, reg: u8, addr: u32) -> Result<(), VmError> {
        let size = reg_size(reg);
        let bytes = self.memory.read(addr, size)?;
        let mut buf = [0u8; 8];
        buf[..size as usize].copy_from_slice(bytes);
        self.write_reg(reg, u64::from_le_bytes(buf));
        Ok(())
    }

    fn write_reg_to_mem(&mut self, addr: u32, reg: u8) -> Result<(), VmError> {
        let size = reg_size(reg) as usize;
        let value = self.read_reg(reg).to_le_bytes();
        self.memory.write(addr, &value[..size])
    }

    // -- frame-relative --

    pub(super) fn exec_load(&mut self, ip: u32) -> Result<(), VmError> {
        let reg = self.read_u8_at(ip + 1)?;
        let offset = self.read_i32_at(ip + 2)?;
        let addr = self.fp().wrapping_add(offset as u32);
        self.move_mem_to_reg(reg, addr)
    }

    pub(super) fn exec_loadr(&mut self, ip: u32) -> Result<(), VmError> {
        let reg = self.read_u8_at(ip + 1)?;
        let offset_reg = self.read_u8_at(ip + 2)?;
        let offset = self.read_reg(offset_reg) as u32 as i32;
        let addr = self.fp().wrapping_add(offset as u32);
        self.move_mem_to_reg(reg, addr)
    }

    pub(super) fn exec_loads(&mut self, ip: u32) -> Result<(), VmError> {
        let size = self.read_u32_at(ip + 1)?;
        let offset = self.read_i32_at(ip + 5)?;
        let addr = self.fp().wrapping_add(offset as u32);
        let bytes = self.memory.read(addr, size)?.to_vec();
        self.push_bytes(&bytes)
    }

    pub(super) fn exec_loadsr(&mut self, ip: u32) -> Result<(), VmError> {
        let size = self.read_u32_at(ip + 1)?;
        let offset_reg = self.read_u8_at(ip + 5)?;
        let offset = self.read_reg(offset_reg) as u32 as i32;
        let addr = self.fp().wrapping_add(offset as u32);
        let bytes = self.memory.read(addr, size)?.to_vec();
        self.push_bytes(&bytes)
    }

    pub(super) fn exec_store(&mut self, ip: u32) -> Result<(), VmError> {
        let offset = self.read_i32_at(ip + 1)?;
        let reg = self.read_u8_at(ip + 5)?;
        let addr = self.fp().wrapping_add(offset as u32);
        self.write_reg_to_mem(addr, reg)
    }

    pub(super) fn exec_push(&mut self, ip: u32) -> Result<(), VmError> {
        let size = self.read_u32_at(ip + 1)?;
        let bytes = self.memory.read(ip + 5, size)?.to_vec();
        self.push_bytes(&bytes)
    }

    // -- absolute --

    pub(super) fn exec_read(&mut self, target: u8, source_reg: u8) -> Result<(), VmError> {
        let addr = self.read_reg(source_reg) as u32;
        self.move_mem_to_reg(target, addr)
    }

    pub(super) fn exec_readc(&mut self, target: u8, addr: u32) -> Result<(), VmError> {
        self.move_mem_to_reg(target, addr)
    }

    pub(super) fn exec_reads(&mut self, size: u32, source_reg: u8) -> Result<(), VmError> {
        let addr = self.read_reg(source_reg) as u32;
        let bytes = self.memory.read(addr, size)?.to_vec();
        self.push_bytes(&bytes)
    }

    pub(super) fn exec_readcs(&mut self, size: u32, addr: u32) -> Result<(), VmError> {
        let bytes = self.memory.read(addr, size)?.to_vec();
        self.push_bytes(&bytes)
    }

    pub(super) fn exec_write(&mut self, target_reg: u8, source: u8) -> Result<(), VmError> {
        let addr = self.read_reg(target_reg) as u32;
        self.write_reg_to_mem(addr, source)
    }

    pub(super) fn exec_writec(&mut self, addr: u32, source: u8) -> Result<(), VmError> {
        self.write_reg_to_mem(addr, source)
    }

    pub(super) fn exec_writes(&mut self, target_reg: u8, size: u32) -> Result<(), VmError> {
        let addr = self.read_reg(target_reg) as u32;
        let bytes = self.pop_bytes(size)?;
        self.memory.write(addr, &bytes)
    }

    pub(super) fn exec_writecs(&mut self, addr: u32, size: u32) -> Result<(), VmError> {
        let bytes = self.pop_bytes(size)?;
        self.memory.write(addr, &bytes)
    }

    pub(super) fn exec_copy(&mut self, target_reg: u8, size: u32, source_reg: u8) -> Result<(), VmError> {
        let dst = self.read_reg(target_reg) as u32;
        let src = self.read_reg(source_reg) as u32;
        self.memory.copy_within(dst, src, size)
    }

    pub(super) fn exec_copyc(&mut self, addr_t: u32, size: u32, addr_s: u32) -> Result<(), VmError> {
        self.memory.copy_within(addr_t, addr_s, size)
    }
}
