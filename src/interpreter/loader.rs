//! Resetting the machine and projecting an executable's data segment into
//! memory ("flashing").

use std::io;

use tracing::debug;

use crate::consts::{REG_FP, REG_IP, REG_SP, STACK_START, VM_MEMORYSIZE};
use crate::error::{ExitStatus, VmError};
use crate::executable::Executable;
use crate::interpreter::Interpreter;

pub(super) fn flash<W: io::Write>(vm: &mut Interpreter<W>, exe: &Executable) -> Result<(), VmError> {
    vm.registers.reset();
    vm.memory.reset();
    vm.running = true;
    vm.status = ExitStatus::RegularExit;

    vm.write_reg(REG_SP, STACK_START as u64);
    vm.write_reg(REG_FP, VM_MEMORYSIZE as u64);
    vm.write_reg(REG_IP, exe.entry_addr() as u64);

    if exe.load_table().is_empty() {
        let data_size = exe.data().len() as u32;
        if data_size > VM_MEMORYSIZE {
            return Err(vm.halt(VmError::ExecutableTooBig));
        }
        vm.memory.write(0, exe.data())?;
        debug!(data_size, "flashed executable with no load table");
        return Ok(());
    }

    for entry in exe.load_table() {
        let data = exe.data();
        let end = entry
            .offset
            .checked_add(entry.size)
            .filter(|&e| e as usize <= data.len());
        let Some(end) = end else {
            return Err(vm.halt(VmError::InvalidExecutable));
        };
        if entry.load.checked_add(entry.size).filter(|&e| e <= VM_MEMORYSIZE).is_none() {
            return Err(vm.halt(VmError::InvalidExecutable));
        }
        let segment = &data[entry.offset as usize..end as usize];
        vm.memory.write(entry.load, segment)?;
    }

    debug!(entries = exe.load_table().len(), "flashed executable via load table");
    Ok(())
}
