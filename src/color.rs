//! Hex color handling and the running trace color.
//!
//! Trace colors are not picked from a palette: every series group after the
//! first gets the previous group's color passed through [`lighten_color`].
//! The sequence is therefore fully determined by the base color and the
//! position of the group in the query result.

use crate::error::{PlotError, PlotResult};

/// Seed color of the first trace.
pub const BASE_COLOR: &str = "#015c0d";

/// Lighten step applied between consecutive series groups, in percent.
pub const LIGHTEN_PERCENT: f64 = 11.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parse hex color (#RRGGBB or #RGB)
pub fn parse_hex_color(color: &str) -> PlotResult<Rgb> {
    let invalid = || PlotError::InvalidColor(color.to_string());
    let hex = color.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| invalid())?;
            let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| invalid())?;
            let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| invalid())?;
            Ok(Rgb::new(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).map_err(|_| invalid())? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).map_err(|_| invalid())? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).map_err(|_| invalid())? * 17;
            Ok(Rgb::new(r, g, b))
        }
        _ => Err(invalid()),
    }
}

/// Shift every channel by `round(2.55 * percent)`.
///
/// Negative percentages darken. Rounding is half-up, and each channel is
/// clamped into `[0, 255]` independently.
pub fn lighten(color: Rgb, percent: f64) -> Rgb {
    let amount = (2.55 * percent + 0.5).floor() as i32;
    Rgb::new(
        shift_channel(color.r, amount),
        shift_channel(color.g, amount),
        shift_channel(color.b, amount),
    )
}

fn shift_channel(channel: u8, amount: i32) -> u8 {
    let shifted = channel as i32 + amount;
    if shifted >= 255 {
        255
    } else if shifted < 1 {
        0
    } else {
        shifted as u8
    }
}

/// String form of [`lighten`]: `#rrggbb` in, `#rrggbb` out.
pub fn lighten_color(color: &str, percent: f64) -> PlotResult<String> {
    Ok(lighten(parse_hex_color(color)?, percent).to_hex())
}

/// Infinite sequence of trace colors: the seed, then each previous color
/// lightened by a fixed step.
#[derive(Debug, Clone)]
pub struct ColorRamp {
    current: Rgb,
    percent: f64,
}

impl ColorRamp {
    pub fn new(seed: Rgb, percent: f64) -> Self {
        Self {
            current: seed,
            percent,
        }
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::new(Rgb::new(0x01, 0x5c, 0x0d), LIGHTEN_PERCENT)
    }
}

impl Iterator for ColorRamp {
    type Item = Rgb;

    fn next(&mut self) -> Option<Rgb> {
        let color = self.current;
        self.current = lighten(self.current, self.percent);
        Some(color)
    }
}
