//! Color values and HSV arithmetic used by the theme engine.
//!
//! Provides:
//! - RGBA color representation with hex parsing and formatting
//! - HSV conversion with hue wrap-around and channel clamping
//! - Deltas between HSV colors, used by relative color rules
//! - Integration with owo-colors and ratatui

use ratatui::style::Color as RatatuiColor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of a hue bucket, in degrees, used when snapping hues
pub const HUE_WIDTH: f64 = 18.0;

/// Represents an RGBA color with optional alpha channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Color {
    /// Create a new RGB color with full opacity
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new RGBA color with specified alpha
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from a hexadecimal string
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::rgb(r, g, b))
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Self::rgba(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Convert to hexadecimal string representation
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Get color with modified alpha
    pub fn with_alpha(&self, alpha: u8) -> Self {
        Self { a: alpha, ..*self }
    }

    /// Convert to HSV with hue in degrees and the other channels in `[0, 1]`
    pub fn to_hsv(&self) -> Hsv {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };

        let s = if max == 0.0 { 0.0 } else { delta / max };

        Hsv {
            h: wrap_hue(h),
            s,
            v: max,
            a: self.a as f64 / 255.0,
        }
    }

    /// Convert to owo-colors RGB type
    pub fn to_owo_rgb(&self) -> owo_colors::Rgb {
        owo_colors::Rgb(self.r, self.g, self.b)
    }

    /// Convert to ratatui Color
    pub fn to_ratatui(&self) -> RatatuiColor {
        RatatuiColor::Rgb(self.r, self.g, self.b)
    }
}

impl From<Color> for owo_colors::Rgb {
    fn from(color: Color) -> Self {
        color.to_owo_rgb()
    }
}

impl From<Color> for RatatuiColor {
    fn from(color: Color) -> Self {
        color.to_ratatui()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "rgba({}, {}, {}, {})",
                self.r,
                self.g,
                self.b,
                self.a as f32 / 255.0
            )
        }
    }
}

/// A color in HSV space.
///
/// Hue is in degrees `[0, 360)`; saturation, value and alpha are in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
    pub a: f64,
}

impl Hsv {
    pub fn new(h: f64, s: f64, v: f64, a: f64) -> Self {
        Self {
            h: wrap_hue(h),
            s: s.clamp(0.0, 1.0),
            v: v.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Convert back to an RGBA color, rounding each channel
    pub fn to_color(&self) -> Color {
        let h = wrap_hue(self.h);
        let s = self.s.clamp(0.0, 1.0);
        let v = self.v.clamp(0.0, 1.0);

        let c = v * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match (h / 60.0) as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Color::rgba(
            channel(r + m),
            channel(g + m),
            channel(b + m),
            channel(self.a),
        )
    }

    /// Apply a delta: hue wraps around the circle, the rest clamp to `[0, 1]`
    pub fn apply(&self, delta: &HsvDelta) -> Self {
        Self {
            h: wrap_hue(self.h + delta.hue),
            s: (self.s + delta.saturation).clamp(0.0, 1.0),
            v: (self.v + delta.value).clamp(0.0, 1.0),
            a: (self.a + delta.alpha).clamp(0.0, 1.0),
        }
    }

    /// The delta that takes `base` to `self`, using the shortest way around the hue circle
    pub fn delta_from(&self, base: &Hsv) -> HsvDelta {
        let mut hue = (self.h - base.h).rem_euclid(360.0);
        if hue > 180.0 {
            hue -= 360.0;
        }
        HsvDelta {
            hue,
            saturation: self.s - base.s,
            value: self.v - base.v,
            alpha: self.a - base.a,
        }
    }

    /// Euclidean distance in the HSV cone.
    ///
    /// Low-saturation and dark colors sit close to the cone's axis, so their hue
    /// contributes little to the distance.
    pub fn distance(&self, other: &Hsv) -> f64 {
        let (x1, y1) = cone_xy(self);
        let (x2, y2) = cone_xy(other);
        let dx = x1 - x2;
        let dy = y1 - y2;
        let dv = self.v - other.v;
        let da = self.a - other.a;
        (dx * dx + dy * dy + dv * dv + da * da).sqrt()
    }
}

impl From<Color> for Hsv {
    fn from(color: Color) -> Self {
        color.to_hsv()
    }
}

impl From<Hsv> for Color {
    fn from(hsv: Hsv) -> Self {
        hsv.to_color()
    }
}

/// Hue/saturation/value/alpha offsets applied by a relative color rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HsvDelta {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
    #[serde(default)]
    pub alpha: f64,
}

impl HsvDelta {
    pub const fn new(hue: f64, saturation: f64, value: f64) -> Self {
        Self {
            hue,
            saturation,
            value,
            alpha: 0.0,
        }
    }

    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    pub fn is_finite(&self) -> bool {
        self.hue.is_finite()
            && self.saturation.is_finite()
            && self.value.is_finite()
            && self.alpha.is_finite()
    }
}

impl fmt::Display for HsvDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.hue, self.saturation, self.value, self.alpha
        )
    }
}

/// Snap a hue to the nearest multiple of [`HUE_WIDTH`]
pub fn quantize_hue(hue: f64) -> f64 {
    wrap_hue(HUE_WIDTH * (hue / HUE_WIDTH).round())
}

fn wrap_hue(hue: f64) -> f64 {
    let h = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

fn channel(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn cone_xy(hsv: &Hsv) -> (f64, f64) {
    let radius = hsv.s * hsv.v;
    let angle = hsv.h.to_radians();
    (radius * angle.cos(), radius * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_color_conversions() {
        let color = Color::rgb(255, 128, 0);

        assert_eq!(color.to_owo_rgb(), owo_colors::Rgb(255, 128, 0));
        assert_eq!(RatatuiColor::from(color), RatatuiColor::Rgb(255, 128, 0));
    }

    #[test]
    fn test_hex_conversion() {
        let color = Color::rgb(255, 128, 0);
        assert_eq!(color.to_hex(), "#ff8000");
        assert_eq!(Color::from_hex("#ff8000"), Some(color));

        let translucent = Color::rgba(20, 20, 20, 128);
        assert_eq!(translucent.to_hex(), "#14141480");
        assert_eq!(Color::from_hex("14141480"), Some(translucent));

        assert_eq!(Color::from_hex("#fff"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
        assert_eq!(Color::from_hex("#ff80é0"), None);
    }

    #[test]
    fn test_primary_hues() {
        let red = Color::rgb(255, 0, 0).to_hsv();
        assert_eq!((red.h, red.s, red.v), (0.0, 1.0, 1.0));

        let blue = Color::rgb(0, 0, 255).to_hsv();
        assert_eq!((blue.h, blue.s, blue.v), (240.0, 1.0, 1.0));

        let gray = Color::rgb(20, 20, 20).to_hsv();
        assert_eq!((gray.h, gray.s), (0.0, 0.0));
        assert!(approx_eq(gray.v, 20.0 / 255.0, 1e-9));
    }

    #[test]
    fn test_hsv_round_trip() {
        for color in [
            Color::rgb(255, 0, 0),
            Color::rgb(255, 128, 0),
            Color::rgb(20, 20, 20),
            Color::rgba(41, 187, 255, 38),
            Color::rgb(184, 110, 255),
        ] {
            assert_eq!(color.to_hsv().to_color(), color);
        }
    }

    #[test]
    fn test_apply_wraps_hue() {
        let hsv = Hsv::new(350.0, 0.5, 0.5, 1.0);
        let shifted = hsv.apply(&HsvDelta::new(30.0, 0.0, 0.0));
        assert!(approx_eq(shifted.h, 20.0, 1e-9));

        let back = hsv.apply(&HsvDelta::new(-360.0, 0.0, 0.0));
        assert!(approx_eq(back.h, 350.0, 1e-9));
    }

    #[test]
    fn test_apply_clamps_channels() {
        let hsv = Hsv::new(120.0, 0.8, 0.9, 1.0);
        let shifted = hsv.apply(&HsvDelta::new(0.0, 0.5, 0.3).with_alpha(-2.0));
        assert_eq!((shifted.s, shifted.v, shifted.a), (1.0, 1.0, 0.0));
    }

    #[test]
    fn test_delta_takes_short_way() {
        let base = Hsv::new(350.0, 0.5, 0.5, 1.0);
        let target = Hsv::new(10.0, 0.7, 0.2, 1.0);
        let delta = target.delta_from(&base);

        assert!(approx_eq(delta.hue, 20.0, 1e-9));
        let applied = base.apply(&delta);
        assert!(approx_eq(applied.h, 10.0, 1e-9));
        assert!(approx_eq(applied.s, 0.7, 1e-9));
        assert!(approx_eq(applied.v, 0.2, 1e-9));
    }

    #[test]
    fn test_distance_ignores_hue_of_grays() {
        let dark_red = Hsv::new(0.0, 0.0, 0.1, 1.0);
        let dark_blue = Hsv::new(240.0, 0.0, 0.1, 1.0);
        assert_eq!(dark_red.distance(&dark_blue), 0.0);

        let red = Color::rgb(255, 0, 0).to_hsv();
        let cyan = Color::rgb(0, 255, 255).to_hsv();
        assert!(approx_eq(red.distance(&cyan), 2.0, 1e-9));
    }

    #[test]
    fn test_quantize_hue() {
        assert_eq!(quantize_hue(10.0), 18.0);
        assert_eq!(quantize_hue(8.0), 0.0);
        assert_eq!(quantize_hue(355.0), 0.0);
        assert_eq!(quantize_hue(100.0), 108.0);
    }

    #[test]
    fn test_alpha_handling() {
        let color = Color::rgba(255, 0, 0, 128);
        let modified = color.with_alpha(64);
        assert_eq!(modified, Color::rgba(255, 0, 0, 64));
        assert_eq!(modified.to_hsv().a, 64.0 / 255.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::rgb(1, 2, 3).to_string(), "rgb(1, 2, 3)");
        assert_eq!(HsvDelta::new(0.0, 0.0, 0.3).to_string(), "(0, 0, 0.3, 0)");
    }
}
