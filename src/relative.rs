//! Colors defined relative to another named color.

use std::fmt;

use crate::colors::{Hsv, HsvDelta};

/// Marker value for [`RelativeHsv::quantized_hue`] meaning the base hue is kept
pub const NOT_QUANTIZED: f64 = -1.0;

/// A named color's HSV shifted by a fixed modifier.
///
/// `base_color` may name a base color, another relative color or an alias.
/// When `quantized_hue` is non-negative it replaces the base hue before the
/// modifier is applied, so every rule sharing it lands in the same hue family.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeHsv {
    pub base_color: String,
    pub modifier: HsvDelta,
    pub quantized_hue: f64,
}

impl RelativeHsv {
    pub fn new(base_color: impl Into<String>, modifier: HsvDelta) -> Self {
        Self {
            base_color: base_color.into(),
            modifier,
            quantized_hue: NOT_QUANTIZED,
        }
    }

    pub fn with_quantized_hue(self, hue: f64) -> Self {
        Self {
            quantized_hue: hue,
            ..self
        }
    }

    pub fn is_quantized(&self) -> bool {
        self.quantized_hue >= 0.0
    }

    /// Applies this rule to the already-resolved base color
    pub fn apply_to(&self, base: Hsv) -> Hsv {
        let mut hsv = base;
        if self.is_quantized() {
            hsv.h = self.quantized_hue;
        }
        hsv.apply(&self.modifier)
    }
}

impl fmt::Display for RelativeHsv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_color)?;
        if self.is_quantized() {
            write!(f, " @ {}", self.quantized_hue)?;
        }
        write!(f, " + {}", self.modifier)
    }
}
