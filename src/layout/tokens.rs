//! Classification of a curve path into turns and capacity-bearing slots.

use std::fmt;

use crate::error::LayoutError;
use crate::machine::{Instruction, Turn, ANTICLOCKWISE_SETUP, CLOCKWISE_SETUP};

/// One segment of a tokenized path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathToken {
    /// The first codel of the path.
    Init,
    Clockwise,
    AntiClockwise,
    /// A straight run of at least two codels hosting instructions.
    Slot(i64),
}

impl PathToken {
    /// The U-turn instruction of a turn token.
    pub fn turn(self) -> Option<Turn> {
        match self {
            PathToken::Clockwise => Some(Turn::Clockwise),
            PathToken::AntiClockwise => Some(Turn::AntiClockwise),
            PathToken::Init | PathToken::Slot(_) => None,
        }
    }
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathToken::Init => f.write_str("I"),
            PathToken::Clockwise => f.write_str("C"),
            PathToken::AntiClockwise => f.write_str("A"),
            PathToken::Slot(capacity) => write!(f, "{}", capacity),
        }
    }
}

/// Render tokens the way they appear in layout errors.
pub fn format_tokens(tokens: &[PathToken]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a path into tokens.
///
/// The first codel becomes `Init`. A clockwise turn needs its setup run
/// right before `+F+`, an anticlockwise one before `-F-`. Leftover turns or
/// single forwards fail with a layout error a larger curve may avoid.
pub fn tokenize(path: &str) -> Result<Vec<PathToken>, LayoutError> {
    debug_assert_eq!(
        Instruction::UTurn(Turn::Clockwise).size(),
        CLOCKWISE_SETUP + 3,
        "wrong clockwise U-turn size"
    );
    debug_assert_eq!(
        Instruction::UTurn(Turn::AntiClockwise).size(),
        ANTICLOCKWISE_SETUP + 3,
        "wrong anticlockwise U-turn size"
    );

    let rest = path.get(1..).unwrap_or("");
    let original = format!("I {}", rest);
    let clockwise = format!("{}+F+", "F".repeat(CLOCKWISE_SETUP as usize));
    let anticlockwise = format!("{}-F-", "F".repeat(ANTICLOCKWISE_SETUP as usize));
    let transformed = original
        .replace(&clockwise, " C ")
        .replace(&anticlockwise, " A ");

    if transformed.contains(|c| c == '+' || c == '-') {
        return Err(LayoutError::unresolved_turns(original, transformed.trim()));
    }

    let mut tokens = Vec::new();
    for word in transformed.split_whitespace() {
        let token = match word {
            "I" => PathToken::Init,
            "C" => PathToken::Clockwise,
            "A" => PathToken::AntiClockwise,
            forwards => {
                debug_assert!(forwards.bytes().all(|b| b == b'F'), "ill-formed path");
                if forwards.len() == 1 {
                    return Err(LayoutError::single_forward(original, transformed.trim()));
                }
                PathToken::Slot(forwards.len() as i64)
            }
        };
        tokens.push(token);
    }
    Ok(tokens)
}
