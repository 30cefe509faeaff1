//! Color tables and name resolution.
//!
//! A [`Palette`] holds three tables:
//!
//! - **base colors**: concrete values, the leaves of every lookup
//! - **relative colors**: another named color shifted in HSV space
//! - **aliases**: semantic role names pointing at a base or relative color
//!
//! Lookups walk alias → relative rule → base color. Every step counts towards
//! [`MAX_RESOLUTION_DEPTH`] and revisiting a name on the current path is
//! reported as a cycle instead of recursing forever.
//!
//! Palettes are read-only outside the crate. Mutation goes through
//! [`UiConfiguration`](crate::UiConfiguration), which tracks modified flags and
//! sends change notifications.

use std::collections::BTreeMap;

use crate::{
    colors::{quantize_hue, Color, Hsv},
    error::{ColorResult, UiConfigError},
    relative::RelativeHsv,
};

/// Longest chain of names a single lookup may follow
pub const MAX_RESOLUTION_DEPTH: usize = 8;

/// HSV-cone distance under which an existing relative color counts as a match
pub const RELATIVE_MATCH_TOLERANCE: f64 = 0.01;

/// Rule name reported when a rule passed to [`Palette::resolve`] fails
pub const UNREGISTERED_RULE: &str = "<unregistered>";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    pub(crate) base: BTreeMap<String, Color>,
    pub(crate) relative: BTreeMap<String, RelativeHsv>,
    pub(crate) aliases: BTreeMap<String, String>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_colors(&self) -> &BTreeMap<String, Color> {
        &self.base
    }

    pub fn relative_colors(&self) -> &BTreeMap<String, RelativeHsv> {
        &self.relative
    }

    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.relative.is_empty() && self.aliases.is_empty()
    }

    /// Resolve a role name to a concrete color.
    ///
    /// The alias table is consulted first; names that are not aliases are
    /// looked up directly as base or relative colors.
    pub fn color(&self, name: &str) -> ColorResult<Color> {
        match self.aliases.get(name) {
            Some(target) => {
                let mut path = vec![name.to_string()];
                self.lookup(target, &mut path)
            }
            None => self.lookup(name, &mut Vec::new()),
        }
    }

    pub fn color_hsv(&self, name: &str) -> ColorResult<Hsv> {
        self.color(name).map(|c| c.to_hsv())
    }

    /// Look up a name in the base table only
    pub fn base_color_by_name(&self, name: &str) -> ColorResult<Color> {
        self.base
            .get(name)
            .copied()
            .ok_or_else(|| UiConfigError::unknown_color(name))
    }

    /// Evaluate a relative color rule that need not be registered
    pub fn resolve(&self, rule: &RelativeHsv) -> ColorResult<Color> {
        self.resolve_rule(UNREGISTERED_RULE, rule, &mut Vec::new())
    }

    /// Snap a color's hue to the nearest hue bucket
    pub fn quantized(&self, color: Color) -> Color {
        let mut hsv = color.to_hsv();
        hsv.h = quantize_hue(hsv.h);
        hsv.to_color()
    }

    /// First alias, in name order, that currently resolves to `color`
    pub fn color_as_alias(&self, color: Color) -> Option<&str> {
        self.aliases
            .keys()
            .find(|name| self.color(name).is_ok_and(|c| c == color))
            .map(String::as_str)
    }

    /// Describe a concrete color in terms of the palette.
    ///
    /// Returns the closest registered relative color if one resolves within
    /// [`RELATIVE_MATCH_TOLERANCE`]. Otherwise builds an unregistered rule on
    /// the nearest base color whose modifier is the exact HSV difference. The
    /// result is approximate: resolving it may differ from `color` by rounding.
    ///
    /// Returns `None` only when there are no base colors.
    pub fn color_as_relative_hsv(&self, color: Color) -> Option<RelativeHsv> {
        let target = color.to_hsv();

        let matching_rule = self
            .relative
            .iter()
            .filter_map(|(name, rule)| {
                let resolved = self.resolve_rule(name, rule, &mut Vec::new()).ok()?;
                let distance = resolved.to_hsv().distance(&target);
                (distance <= RELATIVE_MATCH_TOLERANCE).then_some((distance, rule))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0));

        if let Some((_, rule)) = matching_rule {
            return Some(rule.clone());
        }

        let (name, base) = self
            .base
            .iter()
            .map(|(name, base)| (name, base.to_hsv()))
            .min_by(|a, b| a.1.distance(&target).total_cmp(&b.1.distance(&target)))?;

        Some(RelativeHsv::new(name.clone(), target.delta_from(&base)))
    }

    /// Every alias and relative color that currently fails to resolve
    pub fn problems(&self) -> Vec<UiConfigError> {
        let aliases = self.aliases.keys().filter_map(|name| self.color(name).err());
        let relatives = self
            .relative
            .iter()
            .filter_map(|(name, rule)| self.resolve_rule(name, rule, &mut vec![name.clone()]).err());
        aliases.chain(relatives).collect()
    }

    fn lookup(&self, name: &str, path: &mut Vec<String>) -> ColorResult<Color> {
        let revisited = path.iter().any(|seen| seen == name);
        path.push(name.to_string());
        if revisited || path.len() > MAX_RESOLUTION_DEPTH {
            return Err(UiConfigError::cyclic(path.clone()));
        }

        if let Some(color) = self.base.get(name) {
            return Ok(*color);
        }
        if let Some(rule) = self.relative.get(name) {
            return self.resolve_rule(name, rule, path);
        }
        if let Some(target) = self.aliases.get(name) {
            return self.lookup(target, path);
        }

        Err(UiConfigError::unknown_color(name))
    }

    fn resolve_rule(
        &self,
        name: &str,
        rule: &RelativeHsv,
        path: &mut Vec<String>,
    ) -> ColorResult<Color> {
        let base = match self.lookup(&rule.base_color, path) {
            Ok(color) => color,
            Err(UiConfigError::UnknownColorName { .. }) => {
                return Err(UiConfigError::resolution(name, rule.base_color.clone()));
            }
            Err(e) => return Err(e),
        };

        Ok(rule.apply_to(base.to_hsv()).to_color())
    }
}
