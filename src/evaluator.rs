//! Single-step output predicates.
//!
//! The search never looks inside an evaluator: it only asks whether a given
//! accumulator would emit a given digit on the next step. Evaluators must be
//! pure, since the search may call them from several threads in any order.

use crate::error::Error;
use crate::machine::{Program, WORD_RADIX};
use crate::types::{drop_digits, Accumulator, Digit, Radix};
use serde::{Deserialize, Serialize};

pub trait TransitionEvaluator: Sync {
    /// True iff one step of the modelled transformation on `acc` emits `digit`.
    fn accepts(&self, acc: Accumulator, digit: Digit) -> bool;

    /// Branching factor this evaluator was built for, if it knows one.
    fn radix(&self) -> Option<Radix> {
        None
    }
}

impl<F> TransitionEvaluator for F
where
    F: Fn(Accumulator, Digit) -> bool + Sync,
{
    #[inline]
    fn accepts(&self, acc: Accumulator, digit: Digit) -> bool {
        self(acc, digit)
    }
}

/// The fixed xor/shift step: take the low 3 bits, xor with `first_mask`,
/// shift the accumulator right by that amount, fold it back in, xor with
/// `second_mask`, and keep the low 3 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XorShiftStep {
    pub first_mask: u32,
    pub second_mask: u32,
}

impl Default for XorShiftStep {
    fn default() -> Self {
        XorShiftStep {
            first_mask: 3,
            second_mask: 5,
        }
    }
}

impl XorShiftStep {
    #[inline]
    pub fn output(&self, acc: Accumulator) -> Digit {
        let low = (acc % 8) as u32 ^ self.first_mask;
        // a mask wider than 3 bits can push the shift past the accumulator width
        let shifted = acc.checked_shr(low).unwrap_or(0);
        let folded = low as Accumulator ^ shifted;
        ((folded ^ self.second_mask as Accumulator) % 8) as Digit
    }
}

impl TransitionEvaluator for XorShiftStep {
    #[inline]
    fn accepts(&self, acc: Accumulator, digit: Digit) -> bool {
        self.output(acc) == digit
    }

    fn radix(&self) -> Option<Radix> {
        Some(8)
    }
}

/// Runs one pass of a loop-shaped machine program and compares its output.
#[derive(Debug, Clone)]
pub struct MachineStep {
    program: Program,
    radix: Radix,
    /// A loop-shaped pass runs each instruction at most once.
    pass_steps: u64,
}

impl MachineStep {
    /// Fails unless `program` has the single-loop shape, since otherwise
    /// digit-by-digit pruning would silently lose solutions.
    pub fn from_program(program: &Program) -> Result<MachineStep, Error> {
        program.loop_shape()?;
        Ok(MachineStep {
            program: program.clone(),
            radix: WORD_RADIX,
            pass_steps: (program.words.len() / 2) as u64,
        })
    }

    pub fn output(&self, acc: Accumulator) -> Option<Digit> {
        // loop_shape rules out faults and a pass always fits in `pass_steps`
        match self.program.first_output(acc, self.pass_steps) {
            Ok(word) => word.map(|w| w as Digit),
            Err(_) => None,
        }
    }
}

impl TransitionEvaluator for MachineStep {
    fn accepts(&self, acc: Accumulator, digit: Digit) -> bool {
        digit < WORD_RADIX && self.output(acc) == Some(digit)
    }

    fn radix(&self) -> Option<Radix> {
        Some(self.radix)
    }
}

/// Replay `acc` against `target`: position `i` is checked on `acc` with its
/// `i` lowest digits removed, which is the value the accumulator has when the
/// `i`th digit is emitted.
pub fn reproduces<E>(evaluator: &E, acc: Accumulator, target: &[Digit], radix: Radix) -> bool
where
    E: TransitionEvaluator + ?Sized,
{
    target
        .iter()
        .enumerate()
        .all(|(i, &digit)| evaluator.accepts(drop_digits(acc, radix, i), digit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::Registers;

    fn quine_program() -> Program {
        Program {
            registers: Registers::default(),
            words: vec![2, 4, 1, 3, 7, 5, 0, 3, 4, 1, 1, 5, 5, 5, 3, 0],
        }
    }

    #[test]
    fn test_xor_shift_matches_machine_pass() {
        let formula = XorShiftStep::default();
        let machine = MachineStep::from_program(&quine_program()).unwrap();
        for acc in 0..4096u128 {
            assert_eq!(Some(formula.output(acc)), machine.output(acc), "acc {}", acc);
        }
    }

    #[test]
    fn test_xor_shift_known_outputs() {
        let step = XorShiftStep::default();
        // 0: low 0 ^ 3 = 3, shifted 0, 3 ^ 5 = 6
        assert_eq!(step.output(0), 6);
        assert!(step.accepts(0, 6));
        assert!(!step.accepts(0, 5));
        assert_eq!(step.radix(), Some(8));
    }

    #[test]
    fn test_wide_mask_does_not_overflow_shift() {
        let step = XorShiftStep { first_mask: 200, second_mask: 0 };
        assert!(step.output(u128::MAX) < 8);
    }

    #[test]
    fn test_closure_evaluator() {
        let parity = |a: Accumulator, d: Digit| (a % 2) as Digit == d;
        assert!(parity.accepts(5, 1));
        assert!(!parity.accepts(5, 0));
        assert_eq!(parity.radix(), None);
    }

    #[test]
    fn test_machine_step_rejects_unshaped_program() {
        let p = Program {
            registers: Registers::default(),
            words: vec![5, 4, 0, 4, 3, 0],
        };
        assert!(matches!(MachineStep::from_program(&p), Err(Error::UnsupportedProgram { .. })));
    }

    #[test]
    fn test_machine_step_rejects_narrow_shift() {
        let p = Program {
            registers: Registers::default(),
            words: vec![0, 1, 2, 4, 5, 5, 3, 0],
        };
        // seed 182 emits 3,5,6,3,5,2,1,0 but one bit per pass cannot be searched by word
        assert_eq!(p.run_with_a(182, 1_000).unwrap(), vec![3, 5, 6, 3, 5, 2, 1, 0]);
        assert!(matches!(MachineStep::from_program(&p), Err(Error::UnsupportedProgram { .. })));
    }

    #[test]
    fn test_long_loop_body_is_not_cut_short() {
        // bst A, 1100 no-op xors, adv 3, out B, jnz 0
        let mut words = vec![2, 4];
        for _ in 0..1100 {
            words.extend_from_slice(&[1, 0]);
        }
        words.extend_from_slice(&[0, 3, 5, 5, 3, 0]);
        let p = Program { registers: Registers::default(), words };
        let step = MachineStep::from_program(&p).unwrap();
        assert_eq!(step.output(0o25), Some(5));
        assert!(step.accepts(0o25, 5));
        assert!(reproduces(&step, 0o25, &[5, 2], 8));
    }

    #[test]
    fn test_reproduces_replays_lowest_digit_first() {
        let parity = |a: Accumulator, d: Digit| (a % 2) as Digit == d;
        // 0b101 emits 1, 0, 1
        assert!(reproduces(&parity, 0b101, &[1, 0, 1], 2));
        assert!(!reproduces(&parity, 0b110, &[1, 0, 1], 2));
        assert!(reproduces(&parity, 123, &[], 2));
    }
}
