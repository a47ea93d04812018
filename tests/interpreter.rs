//! End-to-end fetch/decode/execute scenarios, assembled from raw opcode bytes

use nice_vm::consts::{MODE_BYTE, MODE_DWORD, MODE_QWORD, MODE_WORD, SYS_EXIT, SYS_WRITE};
use nice_vm::decode::Opcode;
use nice_vm::error::VmError;
use nice_vm::executable::{Executable, LoadEntry};
use nice_vm::interpreter::Interpreter;

/// Minimal byte-level assembler for building test programs without hand
/// counting instruction offsets.
#[derive(Default)]
struct Asm {
    buf: Vec<u8>,
}

impl Asm {
    fn here(&self) -> u32 {
        self.buf.len() as u32
    }

    fn loadi(&mut self, reg: u8, imm: &[u8]) -> &mut Self {
        self.buf.push(Opcode::Loadi as u8);
        self.buf.push(reg);
        self.buf.extend_from_slice(imm);
        self
    }

    fn rpush(&mut self, reg: u8) -> &mut Self {
        self.buf.push(Opcode::Rpush as u8);
        self.buf.push(reg);
        self
    }

    fn add(&mut self, target: u8, source: u8) -> &mut Self {
        self.buf.push(Opcode::Add as u8);
        self.buf.push(target);
        self.buf.push(source);
        self
    }

    fn syscall(&mut self) -> &mut Self {
        self.buf.push(Opcode::Syscall as u8);
        self
    }

    fn jmp(&mut self, target: u32) -> &mut Self {
        self.buf.push(Opcode::Jmp as u8);
        self.buf.extend_from_slice(&target.to_le_bytes());
        self
    }

    fn readc(&mut self, target: u8, addr: u32) -> &mut Self {
        self.buf.push(Opcode::Readc as u8);
        self.buf.push(target);
        self.buf.extend_from_slice(&addr.to_le_bytes());
        self
    }

    /// Pushes a literal byte-sized exit code, then a `SYS_EXIT` call.
    fn exit_with(&mut self, code: u8) -> &mut Self {
        self.loadi(0 | MODE_BYTE, &[code]);
        self.rpush(0 | MODE_BYTE);
        self.loadi(1 | MODE_WORD, &SYS_EXIT.to_le_bytes());
        self.rpush(1 | MODE_WORD);
        self.syscall()
    }

    /// Pushes address, then size, then `SYS_WRITE` (popped id-first).
    fn write_range(&mut self, addr: u32, size: u32) -> &mut Self {
        self.loadi(2 | MODE_DWORD, &addr.to_le_bytes());
        self.rpush(2 | MODE_DWORD);
        self.loadi(3 | MODE_DWORD, &size.to_le_bytes());
        self.rpush(3 | MODE_DWORD);
        self.loadi(4 | MODE_WORD, &SYS_WRITE.to_le_bytes());
        self.rpush(4 | MODE_WORD);
        self.syscall()
    }

    fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

fn container(entry: u32, table: &[LoadEntry], data: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"NICE");
    buf.extend_from_slice(&entry.to_le_bytes());
    buf.extend_from_slice(&(table.len() as u32).to_le_bytes());
    for e in table {
        buf.extend_from_slice(&e.offset.to_le_bytes());
        buf.extend_from_slice(&e.size.to_le_bytes());
        buf.extend_from_slice(&e.load.to_le_bytes());
    }
    buf.extend_from_slice(data);
    buf
}

fn run_program(program: Vec<u8>) -> Result<u8, VmError> {
    let buf = container(0, &[], &program);
    let exe = Executable::parse(&buf).unwrap();
    let mut vm: Interpreter<Vec<u8>> = Interpreter::with_output(Vec::new());
    vm.flash(&exe).unwrap();
    vm.run()
}

#[test]
fn exit_zero_halts_with_regular_exit() {
    let mut asm = Asm::default();
    asm.exit_with(0);

    let buf = container(0, &[], &asm.into_bytes());
    let exe = Executable::parse(&buf).unwrap();
    let mut vm: Interpreter<Vec<u8>> = Interpreter::with_output(Vec::new());
    vm.flash(&exe).unwrap();

    assert_eq!(vm.run(), Ok(0));
}

#[test]
fn add_and_exit_reports_the_sum_as_exit_code() {
    let mut asm = Asm::default();
    asm.loadi(5 | MODE_QWORD, &3u64.to_le_bytes());
    asm.loadi(6 | MODE_QWORD, &4u64.to_le_bytes());
    asm.add(5 | MODE_QWORD, 6 | MODE_QWORD);
    asm.rpush(5 | MODE_BYTE);
    asm.loadi(1 | MODE_WORD, &SYS_EXIT.to_le_bytes());
    asm.rpush(1 | MODE_WORD);
    asm.syscall();

    let buf = container(0, &[], &asm.into_bytes());
    let exe = Executable::parse(&buf).unwrap();
    let mut vm: Interpreter<Vec<u8>> = Interpreter::with_output(Vec::new());
    vm.flash(&exe).unwrap();

    assert_eq!(vm.run(), Ok(7));
}

#[test]
fn write_hello_emits_the_string_then_exits() {
    let hello = b"hello";

    let mut asm = Asm::default();
    // The string lives in a separate load-table segment; the placeholder
    // address is patched in below once the code's own length is known.
    asm.write_range(0xDEAD_BEEF, hello.len() as u32);
    asm.exit_with(0);
    let code = asm.into_bytes();

    let string_addr = 0x2000;
    let code = {
        // Patch the write_range address operand (first Loadi's immediate,
        // at byte offset 2) now that we know where the string will land.
        let mut code = code;
        code[2..6].copy_from_slice(&(string_addr as u32).to_le_bytes());
        code
    };

    let table = [
        LoadEntry { offset: 0, size: code.len() as u32, load: 0 },
        LoadEntry { offset: code.len() as u32, size: hello.len() as u32, load: string_addr },
    ];
    let mut data = code;
    data.extend_from_slice(hello);

    let buf = container(0, &table, &data);
    let exe = Executable::parse(&buf).unwrap();
    let mut vm: Interpreter<Vec<u8>> = Interpreter::with_output(Vec::new());
    vm.flash(&exe).unwrap();

    assert_eq!(vm.run(), Ok(0));
}

#[test]
fn invalid_opcode_halts_with_invalid_instruction() {
    assert_eq!(run_program(vec![0xFF]), Err(VmError::InvalidInstruction));
}

#[test]
fn out_of_bounds_read_halts_with_illegal_memory_access() {
    let mut asm = Asm::default();
    asm.readc(0 | MODE_QWORD, 0xFFFF_FFF0);

    assert_eq!(run_program(asm.into_bytes()), Err(VmError::IllegalMemoryAccess));
}

#[test]
fn unconditional_jump_skips_a_trap_instruction() {
    let mut asm = Asm::default();
    let jmp_site = asm.here();
    asm.jmp(0); // patched below
    let trap_site = asm.here();
    asm.buf.push(0xFF); // would halt with InvalidInstruction if ever executed
    let good_site = asm.here();
    asm.exit_with(42);

    let mut program = asm.into_bytes();
    program[jmp_site as usize + 1..jmp_site as usize + 5].copy_from_slice(&good_site.to_le_bytes());
    debug_assert_eq!(trap_site, jmp_site + 5);

    assert_eq!(run_program(program), Ok(42));
}

#[test]
fn run_for_stops_an_infinite_loop_at_the_cycle_cap() {
    let mut asm = Asm::default();
    asm.loadi(1 | MODE_QWORD, &1u64.to_le_bytes());
    let loop_start = asm.here();
    asm.add(0 | MODE_QWORD, 1 | MODE_QWORD);
    asm.jmp(loop_start);
    let program = asm.into_bytes();

    let buf = container(0, &[], &program);
    let exe = Executable::parse(&buf).unwrap();
    let mut vm: Interpreter<Vec<u8>> = Interpreter::with_output(Vec::new());
    vm.flash(&exe).unwrap();

    // Loadi (1 cycle), then three full add+jmp iterations (2 cycles each).
    assert_eq!(vm.run_for(Some(7)), Ok(0));
    assert_eq!(vm.registers().read(0 | MODE_QWORD), 3);
    assert!(vm.running());
}
