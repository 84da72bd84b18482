//! Greedy packing of layout units into the slots of a tokenized path.

use tracing::trace;

use crate::error::LayoutError;
use crate::machine::{Instruction, NoOp, Program};

use super::tokens::{format_tokens, PathToken};

/// Lay out `units` along `tokens`, padding every slot with a no-op.
///
/// Each slot takes units while the next one fits, then gives back units
/// until it neither ends with a resize nor has exactly one codel left. Turn
/// tokens become U-turns.
pub fn map_program_to_path(
    units: &[Instruction],
    tokens: &[PathToken],
) -> Result<Program, LayoutError> {
    let mut placed: Vec<Instruction> = Vec::with_capacity(units.len() + tokens.len());
    let mut next = 0;

    for token in tokens {
        if let Some(turn) = token.turn() {
            placed.push(Instruction::UTurn(turn));
            continue;
        }
        let PathToken::Slot(capacity) = *token else {
            continue;
        };

        let single_forward = || {
            LayoutError::single_forward(format_tokens(tokens), token.to_string())
        };
        let slot_start = placed.len();
        let mut remaining = capacity;
        while let Some(unit) = units.get(next) {
            if unit.size() > remaining {
                break;
            }
            remaining -= unit.size();
            placed.push(unit.clone());
            next += 1;
        }

        loop {
            let trailing_resize =
                placed.len() > slot_start && placed.last().is_some_and(Instruction::is_resize);
            if !trailing_resize && remaining != 1 {
                break;
            }
            if placed.len() == slot_start {
                return Err(single_forward());
            }
            if let Some(unit) = placed.pop() {
                remaining += unit.size();
                next -= 1;
            }
        }

        if remaining > 0 {
            let filler = NoOp::new(remaining).map_err(|_| single_forward())?;
            placed.push(Instruction::NoOp(filler));
        }
        trace!(
            capacity,
            units = placed.len() - slot_start,
            remaining,
            "slot filled"
        );
    }

    if next < units.len() {
        let path = format_tokens(tokens);
        return Err(LayoutError::not_enough_space(units.len() - next, path.clone(), path));
    }
    Ok(Program::new(placed))
}

#[cfg(test)]
mod tests {
    use super::PathToken::{AntiClockwise as A, Clockwise as C, Slot};
    use super::*;
    use crate::machine::{Op, Resize, Turn};
    use pretty_assertions::assert_eq;

    fn path() -> Vec<PathToken> {
        vec![
            PathToken::Init,
            Slot(5),
            C,
            Slot(6),
            A,
            Slot(7),
            C,
            Slot(2),
        ]
    }

    fn push() -> Instruction {
        Op::Push.into()
    }

    fn resize(length: i64) -> Instruction {
        Instruction::Resize(Resize::new(length).unwrap())
    }

    fn no_op(length: i64) -> Instruction {
        Instruction::NoOp(NoOp::new(length).unwrap())
    }

    fn cw() -> Instruction {
        Instruction::UTurn(Turn::Clockwise)
    }

    fn acw() -> Instruction {
        Instruction::UTurn(Turn::AntiClockwise)
    }

    fn check(units: Vec<Instruction>, expected: Vec<Instruction>) {
        let mapped = map_program_to_path(&units, &path()).unwrap();
        assert_eq!(mapped.body(), &expected[..]);

        let size: i64 = path()
            .iter()
            .map(|token| match token {
                PathToken::Init => 1,
                PathToken::Clockwise => cw().size(),
                PathToken::AntiClockwise => acw().size(),
                PathToken::Slot(capacity) => *capacity,
            })
            .sum();
        assert_eq!(mapped.size(), size);

        let before = Program::new(units).run().unwrap();
        let after = mapped.run().unwrap();
        assert_eq!(before.context.stack, after.context.stack);
    }

    #[test]
    fn test_map_without_resize() {
        check(
            vec![],
            vec![no_op(5), cw(), no_op(6), acw(), no_op(7), cw(), no_op(2)],
        );
    }

    #[test]
    fn test_map_resize_2_fits_with_room() {
        check(
            vec![push(), resize(2), push()],
            vec![
                push(),
                resize(2),
                push(),
                no_op(2),
                cw(),
                no_op(6),
                acw(),
                no_op(7),
                cw(),
                no_op(2),
            ],
        );
    }

    #[test]
    fn test_map_resize_3_carries_resize_forward() {
        // One codel left: give back the push, then the now trailing resize.
        check(
            vec![push(), resize(3), push()],
            vec![
                push(),
                no_op(4),
                cw(),
                resize(3),
                push(),
                no_op(3),
                acw(),
                no_op(7),
                cw(),
                no_op(2),
            ],
        );
    }

    #[test]
    fn test_map_resize_4_fills_exactly() {
        check(
            vec![push(), resize(4), push()],
            vec![
                push(),
                resize(4),
                push(),
                cw(),
                no_op(6),
                acw(),
                no_op(7),
                cw(),
                no_op(2),
            ],
        );
    }

    #[test]
    fn test_map_resize_5_moves_twice() {
        check(
            vec![push(), resize(5), push()],
            vec![
                push(),
                no_op(4),
                cw(),
                no_op(6),
                acw(),
                resize(5),
                push(),
                no_op(2),
                cw(),
                no_op(2),
            ],
        );
    }

    #[test]
    fn test_map_resize_6_overflows_first_slot() {
        check(
            vec![push(), resize(6), push()],
            vec![
                push(),
                no_op(4),
                cw(),
                resize(6),
                push(),
                acw(),
                no_op(7),
                cw(),
                no_op(2),
            ],
        );
    }

    #[test]
    fn test_map_resize_7_never_trails_a_slot() {
        check(
            vec![push(), resize(7), push()],
            vec![
                push(),
                no_op(4),
                cw(),
                no_op(6),
                acw(),
                resize(7),
                push(),
                cw(),
                no_op(2),
            ],
        );
    }

    #[test]
    fn test_map_resize_8_runs_out_of_space() {
        let units = vec![push(), resize(8), push()];
        let err = map_program_to_path(&units, &path()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::not_enough_space(2, "I 5 C 6 A 7 C 2", "I 5 C 6 A 7 C 2")
        );
        let message = err.to_string();
        assert!(message.starts_with("Not enough space in path; 2 remaining"));
        assert!(message.contains("Original path: I 5 C 6 A 7 C 2"));
    }

    #[test]
    fn test_map_rejects_unit_slot() {
        let err = map_program_to_path(&[], &[PathToken::Init, Slot(1)]).unwrap_err();
        assert_eq!(err, LayoutError::single_forward("I 1", "1"));
    }
}
