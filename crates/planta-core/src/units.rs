//! Conversions between device pixels and real-world lengths.
//!
//! A drawn length in device pixels becomes drawn centimeters through the
//! display density, and drawn centimeters become real centimeters through
//! the drawing [`Scale`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// CSS reference density.
pub const CSS_PX_PER_INCH: f64 = 96.0;
pub const CM_PER_INCH: f64 = 2.54;

/// Real lengths at or above this value (in cm) are labelled in meters.
pub const METER_LABEL_THRESHOLD_CM: f64 = 100.0;
/// Real areas at or above this value (in cm²) are labelled in square meters.
pub const SQUARE_METER_LABEL_THRESHOLD_CM2: f64 = 10_000.0;

/// Errors produced by unit conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error("Unsupported drawing scale: {0}")]
    UnsupportedScale(u32),
    #[error("Cannot parse measurement label: {0:?}")]
    InvalidLabel(String),
}

/// Result type for unit conversion.
pub type UnitResult<T> = Result<T, UnitError>;

/// Pixels per centimeter for a given device pixel ratio.
pub fn device_px_per_cm(device_pixel_ratio: f64) -> f64 {
    CSS_PX_PER_INCH / CM_PER_INCH * sanitize_ratio(device_pixel_ratio)
}

fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 }
}

/// Drawing scale: one drawn centimeter stands for `value` real centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Scale(u32);

impl Scale {
    /// The scales offered to the user.
    pub const SUPPORTED: [u32; 6] = [20, 25, 50, 75, 100, 125];

    /// Create a scale, rejecting values outside [`Scale::SUPPORTED`].
    pub fn new(value: u32) -> UnitResult<Self> {
        if Self::SUPPORTED.contains(&value) {
            Ok(Self(value))
        } else {
            Err(UnitError::UnsupportedScale(value))
        }
    }

    /// Real centimeters per drawn centimeter.
    pub fn value(self) -> u32 {
        self.0
    }

    /// Scale as a floating-point factor.
    pub fn factor(self) -> f64 {
        f64::from(self.0)
    }

    /// All supported scales in ascending order.
    pub fn all() -> impl Iterator<Item = Scale> {
        Self::SUPPORTED.into_iter().map(Scale)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self(100)
    }
}

impl TryFrom<u32> for Scale {
    type Error = UnitError;

    fn try_from(value: u32) -> UnitResult<Self> {
        Self::new(value)
    }
}

impl From<Scale> for u32 {
    fn from(scale: Scale) -> Self {
        scale.0
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1:{}", self.0)
    }
}

/// Locale used for decimal and grouping separators in labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumberLocale {
    /// `1.234,5`
    #[default]
    PtBr,
    /// `1,234.5`
    EnUs,
}

impl NumberLocale {
    /// Character between integer and fraction digits.
    pub fn decimal_separator(self) -> char {
        match self {
            NumberLocale::PtBr => ',',
            NumberLocale::EnUs => '.',
        }
    }

    /// Character between digit groups of three.
    pub fn group_separator(self) -> char {
        match self {
            NumberLocale::PtBr => '.',
            NumberLocale::EnUs => ',',
        }
    }

    /// Format a number with a fixed number of decimals and grouped thousands.
    pub fn format(self, value: f64, decimals: usize) -> String {
        let fixed = format!("{:.*}", decimals, value.abs());
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

        let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
        if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
            out.push('-');
        }
        let digits = int_part.len();
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (digits - i) % 3 == 0 {
                out.push(self.group_separator());
            }
            out.push(ch);
        }
        if !frac_part.is_empty() {
            out.push(self.decimal_separator());
            out.push_str(frac_part);
        }
        out
    }

    /// Parse a number written by [`NumberLocale::format`].
    pub fn parse(self, text: &str) -> Option<f64> {
        let normalized: String = text
            .trim()
            .chars()
            .filter(|&c| c != self.group_separator())
            .map(|c| if c == self.decimal_separator() { '.' } else { c })
            .collect();
        normalized.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// Unit suffix of a measurement label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelUnit {
    Centimeter,
    Meter,
    SquareCentimeter,
    SquareMeter,
}

impl LabelUnit {
    /// Unit text appended to labels.
    pub fn suffix(self) -> &'static str {
        match self {
            LabelUnit::Centimeter => "cm",
            LabelUnit::Meter => "m",
            LabelUnit::SquareCentimeter => "cm²",
            LabelUnit::SquareMeter => "m²",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "cm" => Some(LabelUnit::Centimeter),
            "m" => Some(LabelUnit::Meter),
            "cm²" => Some(LabelUnit::SquareCentimeter),
            "m²" => Some(LabelUnit::SquareMeter),
            _ => None,
        }
    }

    /// Multiplier from this unit to centimeters (or cm² for areas).
    fn to_base(self) -> f64 {
        match self {
            LabelUnit::Centimeter | LabelUnit::SquareCentimeter => 1.0,
            LabelUnit::Meter => 100.0,
            LabelUnit::SquareMeter => 10_000.0,
        }
    }

    fn is_area(self) -> bool {
        matches!(self, LabelUnit::SquareCentimeter | LabelUnit::SquareMeter)
    }
}

/// Real wall thickness presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallThickness {
    Thin,
    #[default]
    Medium,
    Thick,
}

impl WallThickness {
    /// Thickness in meters.
    pub fn meters(self) -> f64 {
        match self {
            WallThickness::Thin => 0.075,
            WallThickness::Medium => 0.125,
            WallThickness::Thick => 0.20,
        }
    }

    /// All presets, thinnest first.
    pub fn all() -> [WallThickness; 3] {
        [WallThickness::Thin, WallThickness::Medium, WallThickness::Thick]
    }
}

/// Converts between device pixels and real-world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitConverter {
    device_pixel_ratio: f64,
    locale: NumberLocale,
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
            locale: NumberLocale::default(),
        }
    }
}

impl UnitConverter {
    /// Create a converter. Non-positive or non-finite ratios fall back to 1.
    pub fn new(device_pixel_ratio: f64, locale: NumberLocale) -> Self {
        Self {
            device_pixel_ratio: sanitize_ratio(device_pixel_ratio),
            locale,
        }
    }

    /// Device pixel ratio in use.
    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Update the ratio. Non-positive or non-finite values fall back to 1.
    pub fn set_device_pixel_ratio(&mut self, ratio: f64) {
        self.device_pixel_ratio = sanitize_ratio(ratio);
    }

    /// Locale used for labels.
    pub fn locale(&self) -> NumberLocale {
        self.locale
    }

    /// Device pixels per drawn centimeter.
    pub fn px_per_cm(&self) -> f64 {
        device_px_per_cm(self.device_pixel_ratio)
    }

    /// Snap grid spacing: one drawn centimeter in device pixels.
    pub fn grid_size(&self) -> f64 {
        self.px_per_cm()
    }

    /// Real length in centimeters of a pixel distance.
    pub fn real_length_cm(&self, pixel_length: f64, scale: Scale) -> f64 {
        pixel_length / self.px_per_cm() * scale.factor()
    }

    /// Real area in square centimeters of a pixel area.
    pub fn real_area_cm2(&self, pixel_area: f64, scale: Scale) -> f64 {
        pixel_area / self.px_per_cm().powi(2) * scale.factor().powi(2)
    }

    /// Localized length label: one decimal in cm below 1 m, two decimals in m otherwise.
    pub fn length_label(&self, pixel_length: f64, scale: Scale) -> String {
        let cm = self.real_length_cm(pixel_length, scale);
        if cm < METER_LABEL_THRESHOLD_CM {
            self.label(cm, 1, LabelUnit::Centimeter)
        } else {
            self.label(cm / 100.0, 2, LabelUnit::Meter)
        }
    }

    /// Localized area label: one decimal in cm² below 1 m², two decimals in m² otherwise.
    pub fn area_label(&self, pixel_area: f64, scale: Scale) -> String {
        let cm2 = self.real_area_cm2(pixel_area, scale);
        if cm2 < SQUARE_METER_LABEL_THRESHOLD_CM2 {
            self.label(cm2, 1, LabelUnit::SquareCentimeter)
        } else {
            self.label(cm2 / 10_000.0, 2, LabelUnit::SquareMeter)
        }
    }

    fn label(&self, value: f64, decimals: usize, unit: LabelUnit) -> String {
        format!("{} {}", self.locale.format(value, decimals), unit.suffix())
    }

    fn parse_label(&self, label: &str) -> UnitResult<(f64, LabelUnit)> {
        let invalid = || UnitError::InvalidLabel(label.to_string());
        let (number, suffix) = label.trim().rsplit_once(' ').ok_or_else(invalid)?;
        let unit = LabelUnit::from_suffix(suffix).ok_or_else(invalid)?;
        let value = self.locale.parse(number).ok_or_else(invalid)?;
        Ok((value, unit))
    }

    /// Pixel length that a length label describes at the given scale.
    pub fn pixels_from_length_label(&self, label: &str, scale: Scale) -> UnitResult<f64> {
        let (value, unit) = self.parse_label(label)?;
        if unit.is_area() {
            return Err(UnitError::InvalidLabel(label.to_string()));
        }
        let cm = value * unit.to_base();
        Ok(cm / scale.factor() * self.px_per_cm())
    }

    /// Pixel area that an area label describes at the given scale.
    pub fn pixels_from_area_label(&self, label: &str, scale: Scale) -> UnitResult<f64> {
        let (value, unit) = self.parse_label(label)?;
        if !unit.is_area() {
            return Err(UnitError::InvalidLabel(label.to_string()));
        }
        let cm2 = value * unit.to_base();
        Ok(cm2 / scale.factor().powi(2) * self.px_per_cm().powi(2))
    }

    /// Meters per device pixel, ignoring the drawing scale.
    pub fn meters_per_pixel(&self) -> f64 {
        1.0 / self.px_per_cm() / 100.0
    }

    /// Convert device pixels to meters, ignoring the drawing scale.
    pub fn pixels_to_meters(&self, pixels: f64) -> f64 {
        pixels * self.meters_per_pixel()
    }

    /// Convert meters to device pixels, ignoring the drawing scale.
    pub fn meters_to_pixels(&self, meters: f64) -> f64 {
        meters / self.meters_per_pixel()
    }

    /// 2D stroke width of a wall preset at the given scale.
    pub fn wall_stroke_width(&self, thickness: WallThickness, scale: Scale) -> f64 {
        thickness.meters() * 100.0 / scale.factor() * self.px_per_cm()
    }
}
