//! Guest-visible system calls
//!
//! `syscall` pops a 16-bit id off the stack and dispatches here. Each call
//! pops its own arguments from the stack in the order listed per-variant.

use std::io;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::consts::{SYS_EXIT, SYS_PUTS, SYS_SLEEP, SYS_WRITE};
use crate::error::{ExitStatus, VmError};
use crate::interpreter::Interpreter;

impl<W: io::Write> Interpreter<W> {
    pub(super) fn exec_syscall(&mut self) -> Result<(), VmError> {
        let id = u16::from_le_bytes(self.pop_bytes(2)?.try_into().unwrap());
        debug!(id, "dispatching syscall");

        match id {
            SYS_EXIT => {
                let code = self.pop_bytes(1)?[0];
                self.write_reg(0 | crate::consts::MODE_BYTE, code as u64);
                self.running = false;
                self.status = ExitStatus::RegularExit;
                Ok(())
            }
            SYS_SLEEP => {
                let seconds = f64::from_le_bytes(self.pop_bytes(8)?.try_into().unwrap());
                thread::sleep(Duration::from_micros((seconds * 1_000_000.0) as u64));
                Ok(())
            }
            SYS_WRITE => {
                let size = u32::from_le_bytes(self.pop_bytes(4)?.try_into().unwrap());
                let address = u32::from_le_bytes(self.pop_bytes(4)?.try_into().unwrap());
                let bytes = self.memory.read(address, size)?.to_vec();
                self.write_out(&bytes)
            }
            SYS_PUTS => {
                let reg = self.pop_bytes(1)?[0];
                let value = self.read_reg(reg) as i64;
                self.write_out_fmt(value)
            }
            _ => Err(VmError::InvalidSyscall),
        }
    }
}
