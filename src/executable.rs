//! NICE executable container parsing

use crate::consts::{EXE_HEADER_MINSIZE, EXE_MAGIC, LOAD_ENTRY_SIZE};
use crate::error::ExecutableError;

/// One entry in an executable's load table: copy `size` bytes from the data
/// segment at `offset` into VM memory at `load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadEntry {
    /// Byte offset into the data segment to copy from.
    pub offset: u32,
    /// Number of bytes to copy.
    pub size: u32,
    /// Guest address to copy into.
    pub load: u32,
}

/// A parsed NICE executable: entry point, load table, and data segment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Executable {
    entry_addr: u32,
    load_table: Vec<LoadEntry>,
    data: Vec<u8>,
}

impl Executable {
    /// Parses a NICE executable from a byte buffer.
    ///
    /// Layout: 4-byte magic, `entry_addr:u32`, `load_table_size:u32`, then
    /// `load_table_size` packed [`LoadEntry`] triples, then the data
    /// segment occupying the remainder of `buf`.
    pub fn parse(buf: &[u8]) -> Result<Self, ExecutableError> {
        if buf.len() < EXE_HEADER_MINSIZE {
            return Err(ExecutableError::TooSmall);
        }

        if buf[0..4] != EXE_MAGIC {
            return Err(ExecutableError::InvalidMagic);
        }

        let entry_addr = read_u32(buf, 4);
        let load_table_size = read_u32(buf, 8) as usize;

        let table_bytes = load_table_size
            .checked_mul(LOAD_ENTRY_SIZE)
            .ok_or(ExecutableError::TooSmall)?;

        if buf.len() - EXE_HEADER_MINSIZE < table_bytes {
            return Err(ExecutableError::TooSmall);
        }

        let mut load_table = Vec::with_capacity(load_table_size);
        for i in 0..load_table_size {
            let base = EXE_HEADER_MINSIZE + i * LOAD_ENTRY_SIZE;
            load_table.push(LoadEntry {
                offset: read_u32(buf, base),
                size: read_u32(buf, base + 4),
                load: read_u32(buf, base + 8),
            });
        }

        let data_start = EXE_HEADER_MINSIZE + table_bytes;
        let data = buf[data_start..].to_vec();

        Ok(Self {
            entry_addr,
            load_table,
            data,
        })
    }

    /// The guest address the instruction pointer starts at.
    pub const fn entry_addr(&self) -> u32 {
        self.entry_addr
    }

    /// The executable's load table, in file order.
    pub fn load_table(&self) -> &[LoadEntry] {
        &self.load_table
    }

    /// The data segment bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}
