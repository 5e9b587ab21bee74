use std::collections::{BTreeMap, VecDeque};

use crate::config::Config;
use crate::constants::{KEY_COUNT, PROGRAM_START};
use crate::disassembler::{self, Line};
use crate::error::Result;
use crate::instruction::OpcodeTable;
use crate::memory::Memory;
use crate::opcode::decode;
use crate::state::{Counters, FrameBuffer, Keypad, State};

/// Receives a tone request on every tick that the sound timer is running.
///
/// Any `FnMut()` closure will do.
pub trait Speaker {
    fn beep(&mut self);
}

impl<F: FnMut()> Speaker for F {
    fn beep(&mut self) {
        self()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for stepping backwards
///  - `pressed_keys` with public interfaces for manipulating them
///  - the state a `reset` returns to, including the loaded program
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - running, stopping, stepping and rewinding the CPU
/// - ticking its timers together with a quota of instructions
/// - inspecting its frame buffer, counters, registers, stack and memory
/// - disassembling memory
pub struct Chip8 {
    state: State,
    boot_state: State,
    previous_states: VecDeque<State>,
    pressed_keys: Keypad,
    table: OpcodeTable,
    config: Config,
    run_state: RunState,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Chip8 {
            state: State::new(),
            boot_state: State::new(),
            previous_states: VecDeque::new(),
            pressed_keys: [0; KEY_COUNT],
            table: OpcodeTable::new(),
            config,
            run_state: RunState::Stopped,
        }
    }

    /// Load a rom's raw bytes at 0x200 and reset the machine around it.
    ///
    /// A rom that doesn't fit is rejected and the machine is left as it was.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        let mut boot_state = State::new();
        boot_state.memory.load_program(rom, PROGRAM_START)?;
        log::info!("loaded {} byte ROM", rom.len());
        self.boot_state = boot_state;
        self.reset();
        Ok(())
    }

    /// Stops the machine and returns it to the freshly loaded program
    pub fn reset(&mut self) {
        self.state = self.boot_state;
        self.previous_states.clear();
        self.pressed_keys = [0; KEY_COUNT];
        self.run_state = RunState::Stopped;
        log::info!("reset");
    }

    pub fn run(&mut self) {
        self.set_run_state(RunState::Running);
    }

    pub fn stop(&mut self) {
        self.set_run_state(RunState::Stopped);
    }

    fn set_run_state(&mut self, run_state: RunState) {
        if self.run_state != run_state {
            log::debug!("{:?} -> {:?}", self.run_state, run_state);
            self.run_state = run_state;
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        if let Some(slot) = self.pressed_keys.get_mut(key as usize) {
            *slot = 0x1;
        }
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        if let Some(slot) = self.pressed_keys.get_mut(key as usize) {
            *slot = 0x0;
        }
    }

    /// Advances the CPU by a single instruction, whether or not the machine is running
    /// - fetches the opcode at pc and moves pc past it
    /// - resolves and executes its instruction
    ///
    /// Unknown opcodes are skipped. Any other error leaves the state untouched.
    pub fn step(&mut self) -> Result<()> {
        let address = self.state.pc;
        let opcode = self.state.memory.read_word(address as usize)?;
        let fetched = State {
            opcode,
            pc: address.wrapping_add(0x2),
            ..self.state
        };
        let op = decode(opcode);

        let next = match self.table.dispatch(&op) {
            Ok(instruction) => {
                log::trace!(
                    "{:04X}: {:04X} {} v{:02X?} i{:04X}",
                    address,
                    opcode,
                    instruction.name,
                    self.state.v,
                    self.state.i
                );
                (instruction.operation)(&op, &fetched, &self.pressed_keys)?
            }
            Err(err) if !err.is_fatal() => {
                log::warn!("{} at {:04X}; skipping", err, address);
                fetched
            }
            Err(err) => return Err(err),
        };

        self.save_state();
        self.state = next;
        Ok(())
    }

    /// Called once per host frame
    /// - advances the timers
    /// - then, if running, executes `instructions_per_tick` instructions
    ///
    /// A fatal error stops the machine before it's returned.
    pub fn tick(&mut self, speaker: &mut dyn Speaker) -> Result<()> {
        self.advance_timers(speaker);

        if self.is_running() {
            for _ in 0..self.config.instructions_per_tick {
                if let Err(err) = self.step() {
                    log::error!("{} at {:04X}; stopping", err, self.state.pc);
                    self.stop();
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Decrements both timers; beeps for as long as the sound timer is running
    fn advance_timers(&mut self, speaker: &mut dyn Speaker) {
        if self.state.delay_timer > 0 {
            self.state.delay_timer -= 1;
        }

        if self.state.sound_timer > 0 {
            log::debug!("beep");
            speaker.beep();
            self.state.sound_timer -= 1;
        }
    }

    /// Reverses the CPU by a single instruction if possible
    /// - if there are previous_states, pops the last one and restores it
    pub fn step_back(&mut self) -> bool {
        match self.previous_states.pop_front() {
            Some(state) => {
                self.state = state;
                true
            }
            None => false,
        }
    }

    /// Puts the current state in previous_states
    /// - if there are already `history_depth` saved then the oldest is dropped
    fn save_state(&mut self) {
        if self.config.history_depth == 0 {
            return;
        }
        if self.previous_states.len() == self.config.history_depth {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(self.state);
    }

    /// Returns the FrameBuffer if it changed since the last call
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    pub fn memory(&self) -> &Memory {
        &self.state.memory
    }

    pub fn counters(&self) -> Counters {
        self.state.counters()
    }

    pub fn registers(&self) -> &[u8] {
        &self.state.v
    }

    pub fn stack(&self) -> &[u16] {
        self.state.call_stack()
    }

    pub fn keypad(&self) -> &Keypad {
        &self.pressed_keys
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lists the words in `start..end` by address; never changes the machine
    pub fn disassemble(&self, start: u16, end: u16) -> BTreeMap<u16, Line> {
        disassembler::disassemble(&self.state.memory, &self.table, start, end)
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
