//! The neon palette and a plain RGB triple.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// An opaque 8-bit RGB colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    /// Near-black page background everything is blended over.
    pub const BACKGROUND: Rgb = Rgb::new(10, 10, 10);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }

    /// Linear interpolation towards `other`; `t` is clamped to `0.0..=1.0`.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb(c.r, c.g, c.b)
    }
}

/// The five particle colours of the page theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NeonColor {
    #[default]
    ElectricBlue,
    Violet,
    HotPink,
    Aqua,
    Lime,
}

impl NeonColor {
    pub const ALL: [NeonColor; 5] = [
        NeonColor::ElectricBlue,
        NeonColor::Violet,
        NeonColor::HotPink,
        NeonColor::Aqua,
        NeonColor::Lime,
    ];

    pub const fn rgb(self) -> Rgb {
        match self {
            NeonColor::ElectricBlue => Rgb::new(0x00, 0xd4, 0xff),
            NeonColor::Violet => Rgb::new(0xb8, 0x47, 0xff),
            NeonColor::HotPink => Rgb::new(0xff, 0x00, 0x6e),
            NeonColor::Aqua => Rgb::new(0x00, 0xff, 0xff),
            NeonColor::Lime => Rgb::new(0x39, 0xff, 0x14),
        }
    }

    /// Convert to a Ratatui colour.
    pub fn color(self) -> Color {
        self.rgb().into()
    }

    /// Cycle to the next palette entry.
    pub fn next(self) -> Self {
        match self {
            NeonColor::ElectricBlue => NeonColor::Violet,
            NeonColor::Violet => NeonColor::HotPink,
            NeonColor::HotPink => NeonColor::Aqua,
            NeonColor::Aqua => NeonColor::Lime,
            NeonColor::Lime => NeonColor::ElectricBlue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb::new(0, 100, 200);
        let b = Rgb::new(200, 100, 0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(100, 100, 100));
        assert_eq!(a.lerp(b, 7.0), b);
    }

    #[test]
    fn test_palette_cycle_visits_every_color() {
        let mut color = NeonColor::default();
        for expected in NeonColor::ALL {
            assert_eq!(color, expected);
            color = color.next();
        }
        assert_eq!(color, NeonColor::ElectricBlue);
    }

    #[test]
    fn test_color_conversion() {
        assert_eq!(NeonColor::HotPink.color(), Color::Rgb(255, 0, 110));
    }
}
