use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FLAG_REGISTER, GLYPH_HEIGHT};
use crate::error::Result;
use crate::opcode::Decoded;
use crate::state::{Keypad, State};

/// Every instruction maps the state it's handed to its successor.
///
/// The program counter has already been moved past the instruction when an operation runs, so
/// jumps overwrite it and skips add another 2.
pub type Operation = fn(op: &Decoded, state: &State, keypad: &Keypad) -> Result<State>;

fn skip_if(condition: bool, state: &State) -> State {
    let pc = if condition {
        state.pc.wrapping_add(0x2)
    } else {
        state.pc
    };
    State { pc, ..*state }
}

fn pressed(keypad: &Keypad, key: u8) -> bool {
    keypad.get(key as usize).map_or(false, |&k| k != 0)
}

/// clear
pub fn clr(_op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    Ok(State {
        frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        draw_flag: true,
        ..*state
    })
}

/// PC = STACK.pop()
pub fn rts(_op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let mut next = *state;
    next.pc = next.pop()?;
    Ok(next)
}

/// PC = nnn
pub fn jump(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    Ok(State {
        pc: op.nnn,
        ..*state
    })
}

/// STACK.push(PC); PC = nnn
pub fn call(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let mut next = *state;
    next.push(state.pc)?;
    next.pc = op.nnn;
    Ok(next)
}

/// if Vx == nn then pc += 2
pub fn ske(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    Ok(skip_if(state.v[op.x as usize] == op.nn, state))
}

/// if Vx != nn then pc += 2
pub fn skne(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    Ok(skip_if(state.v[op.x as usize] != op.nn, state))
}

/// if Vx == Vy then pc += 2
pub fn skre(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    Ok(skip_if(
        state.v[op.x as usize] == state.v[op.y as usize],
        state,
    ))
}

/// Vx = nn
pub fn load(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let mut v = state.v;
    v[op.x as usize] = op.nn;
    Ok(State { v, ..*state })
}

/// Vx += nn
/// Add nn to Vx; allow for overflow but drop it without touching VF
pub fn add(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let mut v = state.v;
    v[op.x as usize] = v[op.x as usize].wrapping_add(op.nn);
    Ok(State { v, ..*state })
}

/// Vx = Vy
pub fn mv(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let mut v = state.v;
    v[op.x as usize] = v[op.y as usize];
    Ok(State { v, ..*state })
}

/// Vx |= Vy
pub fn or(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let mut v = state.v;
    v[op.x as usize] |= v[op.y as usize];
    Ok(State { v, ..*state })
}

/// Vx &= Vy
pub fn and(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let mut v = state.v;
    v[op.x as usize] &= v[op.y as usize];
    Ok(State { v, ..*state })
}

/// Vx ^= Vy
pub fn xor(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let mut v = state.v;
    v[op.x as usize] ^= v[op.y as usize];
    Ok(State { v, ..*state })
}

/// Vx += Vy; VF = overflow
pub fn addr(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let (res, over) = state.v[op.x as usize].overflowing_add(state.v[op.y as usize]);
    let mut v = state.v;
    v[FLAG_REGISTER] = u8::from(over);
    v[op.x as usize] = res;
    Ok(State { v, ..*state })
}

/// Vx -= Vy; VF = !underflow
pub fn sub(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let (res, under) = state.v[op.x as usize].overflowing_sub(state.v[op.y as usize]);
    let mut v = state.v;
    v[FLAG_REGISTER] = u8::from(!under);
    v[op.x as usize] = res;
    Ok(State { v, ..*state })
}

/// Vx >>= 1; VF = lsb
pub fn shr(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let mut v = state.v;
    let vx = v[op.x as usize];
    v[FLAG_REGISTER] = vx & 0x1;
    v[op.x as usize] = vx >> 1;
    Ok(State { v, ..*state })
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let (res, under) = state.v[op.y as usize].overflowing_sub(state.v[op.x as usize]);
    let mut v = state.v;
    v[FLAG_REGISTER] = u8::from(!under);
    v[op.x as usize] = res;
    Ok(State { v, ..*state })
}

/// Vx <<= 1; VF = msb
pub fn shl(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let mut v = state.v;
    let vx = v[op.x as usize];
    v[FLAG_REGISTER] = u8::from(vx & 0x80 != 0);
    v[op.x as usize] = vx << 1;
    Ok(State { v, ..*state })
}

/// if Vx != Vy then pc += 2
pub fn skrne(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    Ok(skip_if(
        state.v[op.x as usize] != state.v[op.y as usize],
        state,
    ))
}

/// I = nnn
pub fn loadi(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    Ok(State {
        i: op.nnn,
        ..*state
    })
}

/// PC = V0 + nnn
pub fn jumpi(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    Ok(State {
        pc: u16::from(state.v[0x0]) + op.nnn,
        ..*state
    })
}

/// Vx = rand_byte & nn
pub fn rand(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let rand_byte: u8 = rand::random();
    let mut v = state.v;
    v[op.x as usize] = rand_byte & op.nn;
    Ok(State { v, ..*state })
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory I..I+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels were erased
pub fn draw(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let sprite = state.memory.slice(state.i as usize, op.n as usize)?;
    let origin_x = state.v[op.x as usize] as usize;
    let origin_y = state.v[op.y as usize] as usize;
    let mut frame_buffer = state.frame_buffer;
    let mut collision = 0x0;

    for (row, byte) in sprite.iter().enumerate() {
        let y = (origin_y + row) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            let x = (origin_x + bit) % DISPLAY_WIDTH;
            let pixel = (byte >> (7 - bit)) & 0x1;
            collision |= pixel & frame_buffer[y][x];
            frame_buffer[y][x] ^= pixel;
        }
    }

    let mut v = state.v;
    v[FLAG_REGISTER] = collision;
    Ok(State {
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    })
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: &Decoded, state: &State, keypad: &Keypad) -> Result<State> {
    Ok(skip_if(pressed(keypad, state.v[op.x as usize]), state))
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: &Decoded, state: &State, keypad: &Keypad) -> Result<State> {
    Ok(skip_if(!pressed(keypad, state.v[op.x as usize]), state))
}

/// Vx = DT
pub fn moved(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let mut v = state.v;
    v[op.x as usize] = state.delay_timer;
    Ok(State { v, ..*state })
}

/// await keypress for Vx
/// Without a pressed key the pc is wound back so this instruction runs again next cycle
pub fn keyd(op: &Decoded, state: &State, keypad: &Keypad) -> Result<State> {
    match keypad.iter().position(|&k| k != 0) {
        Some(key) => {
            let mut v = state.v;
            v[op.x as usize] = key as u8;
            Ok(State { v, ..*state })
        }
        None => Ok(State {
            pc: state.pc.wrapping_sub(0x2),
            ..*state
        }),
    }
}

/// DT = Vx
pub fn loads(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    Ok(State {
        delay_timer: state.v[op.x as usize],
        ..*state
    })
}

/// ST = Vx
pub fn ld(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    Ok(State {
        sound_timer: state.v[op.x as usize],
        ..*state
    })
}

/// I += Vx; VF = I overflowed 0xFFF
pub fn addi(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let sum = u32::from(state.i) + u32::from(state.v[op.x as usize]);
    let mut v = state.v;
    v[FLAG_REGISTER] = u8::from(sum > 0xFFF);
    Ok(State {
        i: (sum % 0x1000) as u16,
        v,
        ..*state
    })
}

/// I = Vx * 5
/// Set I to the memory address of the sprite for Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    Ok(State {
        i: u16::from(state.v[op.x as usize]) * GLYPH_HEIGHT,
        ..*state
    })
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let vx = state.v[op.x as usize];
    let bcd = [vx / 100, vx / 10 % 10, vx % 10];
    let mut memory = state.memory;
    memory.write_slice(state.i as usize, &bcd)?;
    Ok(State { memory, ..*state })
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let mut memory = state.memory;
    memory.write_slice(state.i as usize, &state.v[..=op.x as usize])?;
    Ok(State { memory, ..*state })
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(op: &Decoded, state: &State, _keypad: &Keypad) -> Result<State> {
    let mut v = state.v;
    let count = op.x as usize + 1;
    v[..count].copy_from_slice(state.memory.slice(state.i as usize, count)?);
    Ok(State { v, ..*state })
}
