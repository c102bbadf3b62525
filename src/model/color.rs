use std::fmt;

use serde::{Serialize, Serializer};

/// Plain color data as the host styles it. Renders to CSS notation via `Display`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Color {
    Rgba { r: u8, g: u8, b: u8, a: f32 },
    /// Hue in degrees, saturation and lightness in percent.
    Hsl { h: f64, s: f64, l: f64 },
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::Rgba { r, g, b, a }
    }

    pub const fn hsl(h: f64, s: f64, l: f64) -> Self {
        Self::Hsl { h, s, l }
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        match *self {
            Self::Rgba { r, g, b, a } => [r, g, b, unit_to_u8(a as f64)],
            Self::Hsl { h, s, l } => {
                let (r, g, b) = hsl_to_rgb(h, s / 100.0, l / 100.0);
                [unit_to_u8(r), unit_to_u8(g), unit_to_u8(b), 255]
            }
        }
    }
}

fn unit_to_u8(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let sector = h.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;
    (r + m, g + m, b + m)
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgba { r, g, b, a } => write!(f, "rgba({r}, {g}, {b}, {a})"),
            Self::Hsl { h, s, l } => write!(f, "hsl({h}, {s}%, {l}%)"),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub mod palette {
    use super::Color;
    use crate::model::MemoryRelation;

    pub const DOCUMENT_FILL: Color = Color::rgba(255, 255, 255, 0.06);
    pub const DOCUMENT_BORDER: Color = Color::rgba(255, 255, 255, 0.25);
    pub const MEMORY_FILL: Color = Color::rgba(147, 197, 253, 0.08);
    pub const MEMORY_BORDER: Color = Color::rgba(147, 197, 253, 0.35);
    pub const FORGOTTEN_FILL: Color = Color::rgba(220, 38, 38, 0.15);
    pub const HIGHLIGHT_GLOW: Color = Color::rgba(147, 197, 253, 0.5);
    pub const DOC_MEMORY_EDGE: Color = Color::rgba(148, 163, 184, 0.3);
    pub const BACKGROUND: Color = Color::rgba(15, 20, 25, 1.0);

    pub fn relation(relation: MemoryRelation) -> Color {
        match relation {
            MemoryRelation::Updates => Color::rgba(147, 77, 253, 0.5),
            MemoryRelation::Extends => Color::rgba(16, 185, 129, 0.5),
            MemoryRelation::Derives => Color::rgba(147, 197, 253, 0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_css_notation() {
        assert_eq!(Color::rgba(1, 2, 3, 0.5).to_string(), "rgba(1, 2, 3, 0.5)");
        assert_eq!(Color::hsl(200.0, 60.0, 40.0).to_string(), "hsl(200, 60%, 40%)");
    }

    #[test]
    fn hsl_primaries_convert() {
        assert_eq!(Color::hsl(0.0, 100.0, 50.0).to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(Color::hsl(120.0, 100.0, 50.0).to_rgba8(), [0, 255, 0, 255]);
        assert_eq!(Color::hsl(240.0, 100.0, 50.0).to_rgba8(), [0, 0, 255, 255]);
        assert_eq!(Color::hsl(42.0, 0.0, 100.0).to_rgba8(), [255, 255, 255, 255]);
    }

    #[test]
    fn rgba_alpha_scales_to_byte() {
        assert_eq!(Color::rgba(10, 20, 30, 1.0).to_rgba8(), [10, 20, 30, 255]);
        assert_eq!(Color::rgba(10, 20, 30, 0.0).to_rgba8(), [10, 20, 30, 0]);
    }
}
