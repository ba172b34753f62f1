//! The 3-bit register machine whose output the search inverts.
//!
//! Three unbounded registers, a program of 3-bit words, and eight
//! instructions. A program that is a single loop, shifts A right by a
//! constant each pass and emits one word per pass has the locality the
//! digit search needs; `Program::loop_shape` checks for exactly that.

use crate::error::Error;
use crate::types::{Digit, Radix};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Every program word and every emitted value is below this.
pub const WORD_RADIX: Radix = 8;

/// Bits per word; the only shift per pass that lines emitted words up with
/// search digits.
pub const WORD_BITS: u32 = 3;

/// The reserved combo operand.
const COMBO_RESERVED: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// A = A >> combo
    Adv,
    /// B = B ^ literal
    Bxl,
    /// B = combo % 8
    Bst,
    /// jump to literal when A != 0
    Jnz,
    /// B = B ^ C, operand ignored
    Bxc,
    /// emit combo % 8
    Out,
    /// B = A >> combo
    Bdv,
    /// C = A >> combo
    Cdv,
}

impl Opcode {
    pub fn from_word(word: u8) -> Option<Opcode> {
        Some(match word {
            0 => Opcode::Adv,
            1 => Opcode::Bxl,
            2 => Opcode::Bst,
            3 => Opcode::Jnz,
            4 => Opcode::Bxc,
            5 => Opcode::Out,
            6 => Opcode::Bdv,
            7 => Opcode::Cdv,
            _ => return None,
        })
    }

    fn takes_combo(self) -> bool {
        matches!(
            self,
            Opcode::Adv | Opcode::Bst | Opcode::Out | Opcode::Bdv | Opcode::Cdv
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Registers {
    pub a: u128,
    pub b: u128,
    pub c: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub registers: Registers,
    pub words: Vec<u8>,
}

/// What a single instruction did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Halted,
    Continued,
    Emitted(u8),
}

impl Program {
    pub fn from_file(path: &Path) -> Result<Program, Error> {
        let contents = fs::read_to_string(path)?;
        Program::parse(&contents)
    }

    /// Parse the `Register A: ..` / `Program: ..` text form.
    pub fn parse(text: &str) -> Result<Program, Error> {
        let mut a = None;
        let mut b = None;
        let mut c = None;
        let mut words = None;

        for (line_num, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parse_error = |reason: String| Error::Parse { line: line_num + 1, reason };

            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| parse_error(format!("expected `key: value`, got {:?}", line)))?;
            let value = value.trim();
            let register = || {
                value
                    .parse::<u128>()
                    .map_err(|_| parse_error(format!("invalid register value {:?}", value)))
            };
            match key.trim() {
                "Register A" => a = Some(register()?),
                "Register B" => b = Some(register()?),
                "Register C" => c = Some(register()?),
                "Program" => words = Some(parse_words(value).map_err(parse_error)?),
                other => return Err(parse_error(format!("unknown key {:?}", other))),
            }
        }

        let missing = |what: &str| Error::from(format!("puzzle input has no {} line", what));
        Ok(Program {
            registers: Registers {
                a: a.ok_or_else(|| missing("Register A"))?,
                b: b.ok_or_else(|| missing("Register B"))?,
                c: c.ok_or_else(|| missing("Register C"))?,
            },
            words: words.ok_or_else(|| missing("Program"))?,
        })
    }

    pub fn words_as_digits(&self) -> Vec<Digit> {
        self.words.iter().map(|&w| w as Digit).collect()
    }

    /// Run with register A replaced by `a`.
    pub fn run_with_a(&self, a: u128, max_steps: u64) -> Result<Vec<u8>, Error> {
        Machine::with_a(self, a).run(max_steps)
    }

    /// The first word emitted when started with A = `a`, `None` if the
    /// program halts without emitting.
    pub fn first_output(&self, a: u128, max_steps: u64) -> Result<Option<u8>, Error> {
        let mut machine = Machine::with_a(self, a);
        while machine.steps < max_steps {
            match machine.step()? {
                Step::Halted => return Ok(None),
                Step::Emitted(word) => return Ok(Some(word)),
                Step::Continued => {}
            }
        }
        Err(Error::StepLimit { limit: max_steps })
    }

    /// Check that the program is one loop that consumes exactly one word's
    /// worth of low bits of A per emitted word, and return that number of bits.
    ///
    /// Required shape: the last instruction is `jnz 0` and is the only jump,
    /// there is exactly one `out`, exactly one `adv` whose operand is the
    /// literal 3, B and C are written before they are read inside the loop
    /// body, and no combo operand is the reserved 7.
    pub fn loop_shape(&self) -> Result<u32, Error> {
        let unsupported = |reason: &str| Error::UnsupportedProgram { reason: reason.to_string() };

        if self.words.is_empty() || self.words.len() % 2 != 0 {
            return Err(unsupported("program must be a non-empty list of instruction pairs"));
        }

        let mut shift = None;
        let mut outputs = 0;
        let mut b_written = false;
        let mut c_written = false;
        let last = self.words.len() / 2 - 1;

        for (index, pair) in self.words.chunks(2).enumerate() {
            let (word, operand) = (pair[0], pair[1]);
            let opcode = Opcode::from_word(word)
                .ok_or_else(|| unsupported("program word outside [0, 8)"))?;
            if opcode.takes_combo() && operand == COMBO_RESERVED {
                return Err(unsupported("combo operand 7 is reserved"));
            }
            let reads_b = (opcode.takes_combo() && operand == 5)
                || matches!(opcode, Opcode::Bxl | Opcode::Bxc);
            let reads_c = (opcode.takes_combo() && operand == 6) || opcode == Opcode::Bxc;
            if (reads_b && !b_written) || (reads_c && !c_written) {
                return Err(unsupported("loop body reads B or C before writing it"));
            }

            match opcode {
                Opcode::Jnz if index != last => {
                    return Err(unsupported("only the final instruction may jump"));
                }
                Opcode::Jnz if operand != 0 => {
                    return Err(unsupported("final jump must return to the start"));
                }
                Opcode::Adv => {
                    if shift.is_some() {
                        return Err(unsupported("A is shifted more than once per pass"));
                    }
                    if operand as u32 != WORD_BITS {
                        return Err(unsupported("A must be shifted by the constant 3 each pass"));
                    }
                    shift = Some(operand as u32);
                }
                Opcode::Out => outputs += 1,
                Opcode::Bxl | Opcode::Bst | Opcode::Bxc | Opcode::Bdv => b_written = true,
                Opcode::Cdv => c_written = true,
                Opcode::Jnz => {}
            }
        }

        if Opcode::from_word(self.words[last * 2]) != Some(Opcode::Jnz) {
            return Err(unsupported("program must end with `jnz 0`"));
        }
        if outputs != 1 {
            return Err(unsupported("loop must emit exactly one word per pass"));
        }
        shift.ok_or_else(|| unsupported("loop never shifts A"))
    }
}

fn parse_words(value: &str) -> Result<Vec<u8>, String> {
    value
        .split(',')
        .map(|w| {
            let w = w.trim();
            match w.parse::<u8>() {
                Ok(word) if (word as Radix) < WORD_RADIX => Ok(word),
                _ => Err(format!("program word {:?} is not in [0, {})", w, WORD_RADIX)),
            }
        })
        .collect()
}

#[inline]
fn shr(value: u128, amount: u128) -> u128 {
    if amount >= 128 {
        0
    } else {
        value >> amount
    }
}

/// An executing program. Cheap to create; the program is borrowed.
#[derive(Debug, Clone)]
pub struct Machine<'p> {
    program: &'p Program,
    registers: Registers,
    ip: usize,
    steps: u64,
}

impl<'p> Machine<'p> {
    pub fn new(program: &'p Program) -> Self {
        Machine {
            program,
            registers: program.registers,
            ip: 0,
            steps: 0,
        }
    }

    pub fn with_a(program: &'p Program, a: u128) -> Self {
        let mut machine = Machine::new(program);
        machine.registers.a = a;
        machine
    }

    pub fn registers(&self) -> Registers {
        self.registers
    }

    fn combo(&self, operand: u8) -> Result<u128, Error> {
        Ok(match operand {
            0..=3 => operand as u128,
            4 => self.registers.a,
            5 => self.registers.b,
            6 => self.registers.c,
            _ => {
                return Err(Error::Machine {
                    ip: self.ip,
                    reason: format!("invalid combo operand {}", operand),
                })
            }
        })
    }

    /// Execute one instruction. Running off the end of the program halts.
    #[inline]
    pub fn step(&mut self) -> Result<Step, Error> {
        let words = &self.program.words;
        let (word, operand) = match (words.get(self.ip), words.get(self.ip + 1)) {
            (Some(&word), Some(&operand)) => (word, operand),
            _ => return Ok(Step::Halted),
        };
        let opcode = Opcode::from_word(word).ok_or_else(|| Error::Machine {
            ip: self.ip,
            reason: format!("invalid opcode {}", word),
        })?;
        let combo = if opcode.takes_combo() { self.combo(operand)? } else { 0 };
        self.steps += 1;

        let mut next_ip = self.ip + 2;
        let mut result = Step::Continued;
        let r = &mut self.registers;
        match opcode {
            Opcode::Adv => r.a = shr(r.a, combo),
            Opcode::Bxl => r.b ^= operand as u128,
            Opcode::Bst => r.b = combo % 8,
            Opcode::Jnz => {
                if r.a != 0 {
                    next_ip = operand as usize;
                }
            }
            Opcode::Bxc => r.b ^= r.c,
            Opcode::Out => result = Step::Emitted((combo % 8) as u8),
            Opcode::Bdv => r.b = shr(r.a, combo),
            Opcode::Cdv => r.c = shr(r.a, combo),
        }
        self.ip = next_ip;
        Ok(result)
    }

    /// Run until the program halts and return everything it emitted.
    pub fn run(&mut self, max_steps: u64) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        loop {
            if self.steps >= max_steps {
                return Err(Error::StepLimit { limit: max_steps });
            }
            match self.step()? {
                Step::Halted => return Ok(out),
                Step::Emitted(word) => out.push(word),
                Step::Continued => {}
            }
        }
    }

    /// Run while the output stays a prefix of `expected`; true iff the
    /// program halts having emitted exactly `expected`.
    pub fn run_expecting(&mut self, expected: &[Digit], max_steps: u64) -> Result<bool, Error> {
        let mut emitted = 0;
        loop {
            if self.steps >= max_steps {
                return Err(Error::StepLimit { limit: max_steps });
            }
            match self.step()? {
                Step::Halted => return Ok(emitted == expected.len()),
                Step::Emitted(word) => {
                    if expected.get(emitted) != Some(&(word as Digit)) {
                        return Ok(false);
                    }
                    emitted += 1;
                }
                Step::Continued => {}
            }
        }
    }
}
