//! Codel colors and the lightness/hue deltas instructions are encoded with.

use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use crate::error::RenderError;

const HUE_NAMES: [&str; 6] = ["red", "yellow", "green", "cyan", "blue", "magenta"];
const HUE_CODES: [&str; 6] = [
    "#FF0000", "#FFFF00", "#00FF00", "#00FFFF", "#0000FF", "#FF00FF",
];

/// Change in (lightness, hue) between two consecutive codels.
///
/// Deltas are kept un-normalized so that a cumulative delta can be added to
/// any initial color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorChange {
    pub lightness: i32,
    pub hue: i32,
}

impl ColorChange {
    pub const fn new(lightness: i32, hue: i32) -> Self {
        Self { lightness, hue }
    }
}

impl Add for ColorChange {
    type Output = ColorChange;

    fn add(self, other: ColorChange) -> ColorChange {
        ColorChange::new(self.lightness + other.lightness, self.hue + other.hue)
    }
}

impl AddAssign for ColorChange {
    fn add_assign(&mut self, other: ColorChange) {
        *self = *self + other;
    }
}

/// One of the 18 codel colors: six hues in three lightness levels.
///
/// Lightness 0 is light, 1 normal, 2 dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    hue: u8,
    lightness: u8,
}

impl Color {
    /// Build a color, wrapping hue modulo 6 and lightness modulo 3.
    pub fn new(hue: i32, lightness: i32) -> Self {
        Self {
            hue: hue.rem_euclid(6) as u8,
            lightness: lightness.rem_euclid(3) as u8,
        }
    }

    pub fn hue(self) -> u8 {
        self.hue
    }

    pub fn lightness(self) -> u8 {
        self.lightness
    }

    /// The color reached from `self` after a cumulative change.
    pub fn shifted(self, change: ColorChange) -> Self {
        Self::new(
            self.hue as i32 + change.hue,
            self.lightness as i32 + change.lightness,
        )
    }

    /// RGB code of the color (`#RRGGBB`).
    pub fn code(self) -> String {
        let hue_code = HUE_CODES[self.hue as usize];
        match self.lightness {
            0 => hue_code.replace("00", "C0"),
            1 => hue_code.to_string(),
            _ => hue_code.replace("FF", "C0"),
        }
    }

    /// RGB channels of the color.
    pub fn rgb(self) -> [u8; 3] {
        let code = self.code();
        let channel = |i: usize| u8::from_str_radix(&code[i..i + 2], 16).unwrap_or(0);
        [channel(1), channel(3), channel(5)]
    }
}

impl FromStr for Color {
    type Err = RenderError;

    /// Parse a human-readable color name (`red`, `lightred`, `darkred`, ...).
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let (lightness, hue_name) = if let Some(rest) = name.strip_prefix("light") {
            (0, rest)
        } else if let Some(rest) = name.strip_prefix("dark") {
            (2, rest)
        } else {
            (1, name)
        };

        let hue = HUE_NAMES
            .iter()
            .position(|candidate| *candidate == hue_name)
            .ok_or_else(|| RenderError::InvalidColorName(name.to_string()))?;

        Ok(Color::new(hue as i32, lightness))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hue_name = HUE_NAMES[self.hue as usize];
        match self.lightness {
            0 => write!(f, "light{}", hue_name),
            1 => write!(f, "{}", hue_name),
            _ => write!(f, "dark{}", hue_name),
        }
    }
}
