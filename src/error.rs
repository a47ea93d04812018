//! Loader and interpreter error types

use thiserror::Error;

/// Errors produced while parsing a NICE executable container.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutableError {
    /// The buffer is too small to contain a header, or the declared load
    /// table doesn't fit in the remaining bytes.
    #[error("executable too small")]
    TooSmall,
    /// The first four bytes are not `b"NICE"`.
    #[error("invalid magic number")]
    InvalidMagic,
    /// The host failed to allocate space for the parsed executable.
    #[error("allocation failure")]
    AllocationFailure,
}

/// Runtime errors that halt the interpreter. Latched into the machine's
/// exit status; never panics the host.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VmError {
    /// An instruction fetch, memory transfer, or stack operation addressed
    /// memory outside `0..VM_MEMORYSIZE`.
    #[error("illegal memory access")]
    IllegalMemoryAccess,
    /// The opcode byte at the instruction pointer does not name a known
    /// instruction.
    #[error("invalid instruction")]
    InvalidInstruction,
    /// A register byte named a reserved or out-of-range register.
    #[error("invalid register")]
    InvalidRegister,
    /// `syscall` was invoked with an id that doesn't match any known
    /// syscall.
    #[error("invalid syscall")]
    InvalidSyscall,
    /// Integer division or remainder with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,
    /// The executable's data segment doesn't fit in VM memory and no load
    /// table was supplied to place it more precisely.
    #[error("executable too big")]
    ExecutableTooBig,
    /// A load table entry is out of bounds with respect to the data
    /// segment or VM memory.
    #[error("invalid executable")]
    InvalidExecutable,
    /// The host failed to allocate the machine's memory or register bank.
    #[error("allocation failure")]
    Allocation,
    /// An invariant internal to the interpreter was violated.
    #[error("internal failure")]
    InternalFailure,
}

/// The machine's terminal status once `running` becomes false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitStatus {
    /// The guest invoked the `EXIT` syscall, or the machine has not halted
    /// yet. The guest's own exit code lives in register 0, not here.
    #[default]
    RegularExit,
    /// Execution halted because of `error`.
    Halted(VmError),
}

impl ExitStatus {
    /// Returns the halting [`VmError`], if any.
    pub const fn error(&self) -> Option<VmError> {
        match self {
            Self::RegularExit => None,
            Self::Halted(e) => Some(*e),
        }
    }
}

impl From<VmError> for ExitStatus {
    fn from(e: VmError) -> Self {
        Self::Halted(e)
    }
}
