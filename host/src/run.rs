use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use vm8_core::constants::TIMER_HZ;
use vm8_core::{Chip8, Config};
use vm8_display::Display;

use crate::keymap::keymap;

/// Rings the terminal bell for every tone request
fn bell() {
    let mut stdout = std::io::stdout();
    let _ = stdout.write_all(b"\x07").and_then(|_| stdout.flush());
}

/// Host loop
/// - `Return` toggles running/stopped
/// - `N` executes a single instruction
/// - holding `Backspace` rewinds one instruction per frame
/// - `F5` resets to the loaded ROM
/// - `Escape` quits
pub fn run(rom: &Path, config: Config, scale: u32) -> anyhow::Result<()> {
    let bytes = std::fs::read(rom).with_context(|| format!("unable to read {}", rom.display()))?;
    let mut chip8 = Chip8::with_config(config);
    chip8.load_rom(&bytes)?;
    chip8.run();

    // Get SDL2 context
    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display = Display::new(&sdl, scale).map_err(|e| anyhow!(e))?;
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    // One tick per 60Hz frame
    let tick_time = Duration::from_secs(1) / TIMER_HZ;
    let mut last_tick = Instant::now();

    // Whether the machine should be stepped backwards
    let mut rewind = false;
    let mut speaker = bell;

    'event: loop {
        let mut redraw = false;

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key),
                    repeat,
                    ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_press(kc),
                    (Keycode::Escape, _) => break 'event,
                    (Keycode::Backspace, _) => rewind = true,
                    (Keycode::Return, _) if !repeat => {
                        if chip8.is_running() {
                            chip8.stop();
                        } else {
                            chip8.run();
                        }
                    }
                    (Keycode::N, _) if !chip8.is_running() => {
                        if let Err(e) = chip8.step() {
                            log::error!("{}", e);
                        }
                        redraw = true;
                    }
                    (Keycode::F5, _) => {
                        chip8.reset();
                        redraw = true;
                    }
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_release(kc),
                    (Keycode::Backspace, _) => rewind = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Update state
        if rewind {
            chip8.stop();
            redraw |= chip8.step_back();
        } else if let Err(e) = chip8.tick(&mut speaker) {
            display.set_status(&format!("halted: {}", e)).map_err(|e| anyhow!(e))?;
        }

        // Render the frame if it changed
        if let Some(frame) = chip8.take_frame() {
            display.render(&frame).map_err(|e| anyhow!(e))?;
        } else if redraw {
            display.render(chip8.frame_buffer()).map_err(|e| anyhow!(e))?;
        }

        // Handle timing
        let elapsed = last_tick.elapsed();
        if tick_time > elapsed {
            std::thread::sleep(tick_time - elapsed);
        }
        last_tick = Instant::now();
    }

    Ok(())
}
