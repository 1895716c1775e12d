//! Light and dark drawing palettes.

use crate::shapes::ShapeColor;
use serde::{Deserialize, Serialize};

/// Active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Colors used for scene objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub wall: ShapeColor,
    pub ruler: ShapeColor,
    pub grid: ShapeColor,
    /// Erase-preview color.
    pub highlight: ShapeColor,
    pub background: ShapeColor,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        wall: ShapeColor::rgb(0x1b, 0x1b, 0x1f),
        ruler: ShapeColor::rgb(0x7a, 0x7a, 0x7a),
        grid: ShapeColor::rgb(0xdd, 0xdd, 0xdd),
        highlight: ShapeColor::RED,
        background: ShapeColor::rgb(0xfa, 0xfa, 0xfa),
    };

    pub const DARK: Palette = Palette {
        wall: ShapeColor::rgb(0xe3, 0xe3, 0xe8),
        ruler: ShapeColor::rgb(0xb8, 0xb8, 0xb8),
        grid: ShapeColor::rgb(0x3a, 0x3a, 0x40),
        highlight: ShapeColor::RED,
        background: ShapeColor::rgb(0x1e, 0x1e, 0x22),
    };

    /// Palette for `mode`.
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::LIGHT,
            ThemeMode::Dark => Self::DARK,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::LIGHT
    }
}
