//! Command-line front-end for the NICE virtual machine.

use std::fs;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use nice_vm::executable::Executable;
use nice_vm::interpreter::Interpreter;

/// Loads and runs a NICE executable.
#[derive(Debug, Parser)]
#[command(name = "nice", about = "Run a NICE virtual machine executable")]
struct Args {
    /// Path to a NICE executable.
    path: std::path::PathBuf,

    /// Raise logging verbosity. Repeatable (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Cap the number of cycles executed. Unbounded if omitted.
    #[arg(long)]
    cycles: Option<u64>,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<u8> {
    let buf = fs::read(&args.path).with_context(|| format!("could not read {}", args.path.display()))?;

    let exe = Executable::parse(&buf).with_context(|| "could not parse executable")?;
    info!(entry = exe.entry_addr(), "parsed executable");

    let mut vm = Interpreter::new();
    vm.flash(&exe).with_context(|| "could not load executable")?;

    let exit_code = vm.run_for(args.cycles).with_context(|| "execution halted")?;
    info!(exit_code, "run finished");

    Ok(exit_code)
}
