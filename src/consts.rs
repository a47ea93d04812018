//! VM parameters

/* MEMORY AND REGISTER LAYOUT */

/// Size of the VM's linear address space, in bytes.
pub const VM_MEMORYSIZE: u32 = 8_000_000;

/// Number of 64-bit register slots in the register bank.
pub const VM_REGISTER_COUNT: usize = 64;

/// Mask isolating the access-width bits of a register byte.
pub const MODE_MASK: u8 = 0xC0;

/// Mask isolating the register index bits of a register byte.
pub const CODE_MASK: u8 = 0x3F;

/// Access-width tag: 8-byte (qword) access.
pub const MODE_QWORD: u8 = 0x00;

/// Access-width tag: 4-byte (dword) access.
pub const MODE_DWORD: u8 = 0x40;

/// Access-width tag: 2-byte (word) access.
pub const MODE_WORD: u8 = 0x80;

/// Access-width tag: 1-byte access.
pub const MODE_BYTE: u8 = 0xC0;

/// Bit 0 of the flags register: set when the last flag-affecting op produced
/// a zero (or predicate-true) result.
pub const FLAG_ZERO: u8 = 1;

/// Instruction pointer register byte (dword-width, index 60).
pub const REG_IP: u8 = 60 | MODE_DWORD;

/// Stack pointer register byte (dword-width, index 61).
pub const REG_SP: u8 = 61 | MODE_DWORD;

/// Frame pointer register byte (dword-width, index 62).
pub const REG_FP: u8 = 62 | MODE_DWORD;

/// Flags register byte (byte-width, index 63).
pub const REG_FLAGS: u8 = 63 | MODE_BYTE;

/* WELL-KNOWN ADDRESSES */

/// Address the stack pointer is reset to on flash. The stack grows downward
/// from here.
pub const STACK_START: u32 = 0x0040_0000;

/// Reserved start of an interrupt handler. Observed in the address space
/// layout; no opcode or syscall in this crate reads or writes it.
pub const INT_HANDLER: u32 = 0x0079_7bea;

/// Reserved framebuffer base address. Not implemented.
pub const VRAM: u32 = 0x0079_7c00;

/// Reserved framebuffer size, in bytes. Not implemented.
pub const VRAM_SIZE: u32 = 38_400;

/* SYSCALL IDS */

/// Terminates the machine with a guest-supplied exit code.
pub const SYS_EXIT: u16 = 0x00;

/// Blocks the host thread for a guest-supplied duration.
pub const SYS_SLEEP: u16 = 0x01;

/// Writes a guest memory range to the configured output sink.
pub const SYS_WRITE: u16 = 0x02;

/// Prints a register's signed value as decimal to the configured output sink.
pub const SYS_PUTS: u16 = 0x03;

/* EXECUTABLE CONTAINER */

/// Magic bytes every NICE executable must start with.
pub const EXE_MAGIC: [u8; 4] = *b"NICE";

/// Minimum number of bytes required before the load table and data segment.
pub const EXE_HEADER_MINSIZE: usize = 12;

/// Packed size, in bytes, of one load-table entry.
pub const LOAD_ENTRY_SIZE: usize = 12;

/// Total number of opcodes, including the two variable-length ones.
pub const OP_NUM_TYPES: u8 = 59;
