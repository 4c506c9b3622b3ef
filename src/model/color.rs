//! Deterministic per-worker colors

use std::collections::BTreeMap;
use std::fmt;

const SATURATION: f64 = 0.8;
const VALUE: f64 = 0.9;

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert from HSV. `hue` is in degrees and wraps; `saturation` and
    /// `value` are clamped to [0, 1].
    pub fn from_hsv(hue: f64, saturation: f64, value: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = saturation.clamp(0.0, 1.0);
        let v = value.clamp(0.0, 1.0);

        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let to_byte = |channel: f64| ((channel + m) * 255.0).round() as u8;
        Self::rgb(to_byte(r), to_byte(g), to_byte(b))
    }

    /// `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Color for `worker_id` out of `total` workers: hues evenly spaced around
/// the wheel starting at red.
pub fn worker_color(worker_id: usize, total: usize) -> Color {
    let total = total.max(1);
    let hue = 360.0 * (worker_id % total) as f64 / total as f64;
    Color::from_hsv(hue, SATURATION, VALUE)
}

/// Immutable worker → color mapping for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorAssignment {
    colors: BTreeMap<usize, Color>,
}

impl ColorAssignment {
    /// Assign colors to workers `0..total`.
    pub fn new(total: usize) -> Self {
        Self {
            colors: (0..total).map(|id| (id, worker_color(id, total))).collect(),
        }
    }

    pub fn get(&self, worker_id: usize) -> Option<Color> {
        self.colors.get(&worker_id).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Color)> + '_ {
        self.colors.iter().map(|(&id, &c)| (id, c))
    }
}
