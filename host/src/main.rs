use std::path::{Path, PathBuf};

use clap::Parser;

use vm8_core::constants::{INSTRUCTIONS_PER_TICK, MAX_ROM_SIZE, MAX_SAVED_STATES, PROGRAM_START};
use vm8_core::{Chip8, Config};

mod keymap;
mod run;

#[derive(Parser, Debug)]
#[command(version, about = "A Chip-8 virtual machine")]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Instructions executed per 60Hz tick
    #[arg(short, long, default_value_t = INSTRUCTIONS_PER_TICK)]
    instructions_per_tick: usize,

    /// Number of past states kept for rewinding
    #[arg(long, default_value_t = MAX_SAVED_STATES)]
    history: usize,

    /// Size multiplier for each pixel
    #[arg(short, long, default_value_t = 10)]
    scale: u32,

    /// Print the ROM's disassembly instead of running it
    #[arg(short, long)]
    disassemble: bool,
}

fn disassemble(rom: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(rom)?;
    let mut chip8 = Chip8::new();
    chip8.load_rom(&bytes)?;
    let end = PROGRAM_START as usize + bytes.len().min(MAX_ROM_SIZE);
    for line in chip8.disassemble(PROGRAM_START, end as u16).values() {
        println!("{}", line);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.disassemble {
        return disassemble(&args.rom);
    }

    let config = Config {
        instructions_per_tick: args.instructions_per_tick,
        history_depth: args.history,
    };
    run::run(&args.rom, config, args.scale)
}
