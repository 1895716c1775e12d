//! Measurement text labels.

use super::ShapeColor;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Average glyph advance relative to the font size, used for layout estimates.
const CHAR_WIDTH_FACTOR: f64 = 0.6;

/// A text label anchored at its bottom-center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    /// Bottom-center anchor in scene coordinates.
    pub position: Point,
    pub font_size: f64,
    pub fill_color: ShapeColor,
    pub visible: bool,
}

impl Label {
    /// A hidden, empty label.
    pub fn hidden(position: Point, font_size: f64, fill_color: ShapeColor) -> Self {
        Self {
            text: String::new(),
            position,
            font_size,
            fill_color,
            visible: false,
        }
    }

    /// Set the text and position and make the label visible.
    pub fn show(&mut self, text: impl Into<String>, position: Point) {
        self.text = text.into();
        self.position = position;
        self.visible = true;
    }

    /// Estimated bounds of the rendered text.
    pub fn bounds(&self) -> Rect {
        let width = self.text.chars().count() as f64 * self.font_size * CHAR_WIDTH_FACTOR;
        Rect::new(
            self.position.x - width / 2.0,
            self.position.y - self.font_size,
            self.position.x + width / 2.0,
            self.position.y,
        )
    }
}
