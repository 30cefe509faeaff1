//! Typed configuration variables keyed by name.
//!
//! Each variable has a name, a value type and a default. [`Var`] is the typed
//! handle used from code; documents address variables by name and carry their
//! values as strings, which are parsed according to the variable's type.

use std::{collections::BTreeMap, fmt};

use crate::error::UiConfigError;

/// A stored variable value
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ConfigValue {
    /// Parse `raw` as a value of the same kind as `self`
    pub fn parse_like(&self, raw: &str) -> Option<ConfigValue> {
        let raw = raw.trim();
        match self {
            ConfigValue::Bool(_) => match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(ConfigValue::Bool(true)),
                "false" | "no" | "0" => Some(ConfigValue::Bool(false)),
                _ => None,
            },
            ConfigValue::Int(_) => raw.parse().ok().map(ConfigValue::Int),
            ConfigValue::Float(_) => raw
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(ConfigValue::Float),
            ConfigValue::Text(_) => Some(ConfigValue::Text(raw.to_string())),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Int(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Int(i) => write!(f, "{}", i),
            ConfigValue::Float(x) => write!(f, "{}", x),
            ConfigValue::Text(s) => f.write_str(s),
        }
    }
}

/// Rust types that can be stored in a [`ConfigValue`]
pub trait VariableValue: Sized {
    fn into_value(self) -> ConfigValue;
    fn from_value(value: &ConfigValue) -> Option<Self>;
}

impl VariableValue for bool {
    fn into_value(self) -> ConfigValue {
        ConfigValue::Bool(self)
    }

    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl VariableValue for i64 {
    fn into_value(self) -> ConfigValue {
        ConfigValue::Int(self)
    }

    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl VariableValue for f64 {
    fn into_value(self) -> ConfigValue {
        ConfigValue::Float(self)
    }

    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl VariableValue for String {
    fn into_value(self) -> ConfigValue {
        ConfigValue::Text(self)
    }

    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Typed handle to a named variable
pub struct Var<T> {
    name: &'static str,
    default: fn() -> T,
}

impl<T> Var<T> {
    pub const fn new(name: &'static str, default: fn() -> T) -> Self {
        Self { name, default }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub fn default_value(&self) -> T {
        (self.default)()
    }
}

impl<T> Clone for Var<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Var<T> {}

impl<T> fmt::Debug for Var<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Var").field(&self.name).finish()
    }
}

/// Name-keyed store of variable values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    values: BTreeMap<String, ConfigValue>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding every built-in UI variable at its default
    pub fn with_defaults() -> Self {
        let mut vars = Self::new();
        vars.define(&PRIMARY_CLOCK_DELTA_EDIT_CURSOR);
        vars.define(&SECONDARY_CLOCK_DELTA_EDIT_CURSOR);
        vars.define(&COLOR_FILE);
        vars.define(&FONT_SCALE);
        vars
    }

    /// Register a variable at its default; an existing value is kept
    pub fn define<T: VariableValue>(&mut self, var: &Var<T>) {
        self.values
            .entry(var.name.to_string())
            .or_insert_with(|| var.default_value().into_value());
    }

    pub fn get<T: VariableValue>(&self, var: &Var<T>) -> T {
        self.values
            .get(var.name)
            .and_then(T::from_value)
            .unwrap_or_else(|| var.default_value())
    }

    /// Store a value, returning whether it changed
    pub fn set<T: VariableValue>(&mut self, var: &Var<T>, value: T) -> bool {
        let value = value.into_value();
        match self.values.get(var.name) {
            Some(current) if *current == value => false,
            _ => {
                self.values.insert(var.name.to_string(), value);
                true
            }
        }
    }

    pub fn value(&self, name: &str) -> Option<&ConfigValue> {
        self.values.get(name)
    }

    /// Parse and store a value for a defined variable, returning whether it changed
    pub fn set_from_str(&mut self, name: &str, raw: &str) -> Result<bool, UiConfigError> {
        let value = self.parse(name, raw)?;
        Ok(self.replace(name, value))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn parse(&self, name: &str, raw: &str) -> Result<ConfigValue, UiConfigError> {
        let current = self
            .values
            .get(name)
            .ok_or_else(|| UiConfigError::variable(name, "no such variable"))?;
        current.parse_like(raw).ok_or_else(|| {
            UiConfigError::variable(
                name,
                format!("'{}' is not a valid {} value", raw, current.kind()),
            )
        })
    }

    pub(crate) fn replace(&mut self, name: &str, value: ConfigValue) -> bool {
        match self.values.get_mut(name) {
            Some(current) if *current != value => {
                *current = value;
                true
            }
            _ => false,
        }
    }
}

/// Show the primary clock as a delta to the edit cursor
pub const PRIMARY_CLOCK_DELTA_EDIT_CURSOR: Var<bool> =
    Var::new("primary-clock-delta-edit-cursor", bool::default);

/// Show the secondary clock as a delta to the edit cursor
pub const SECONDARY_CLOCK_DELTA_EDIT_CURSOR: Var<bool> =
    Var::new("secondary-clock-delta-edit-cursor", bool::default);

/// Name of the color theme loaded at startup
pub const COLOR_FILE: Var<String> = Var::new("color-file", default_color_file);

pub const FONT_SCALE: Var<f64> = Var::new("font-scale", default_font_scale);

fn default_color_file() -> String {
    "dark".to_string()
}

fn default_font_scale() -> f64 {
    1.0
}
