#![forbid(unsafe_code)]

//! # uiconfig
//!
//! Interface preferences and color themes for a desktop application.
//!
//! ## Overview
//!
//! A theme is three named tables:
//!
//! - **Base colors**: absolute RGBA values
//! - **Relative colors**: an HSV offset from another named color, optionally
//!   snapping the hue to a fixed step first
//! - **Aliases**: a semantic name that points at any other named color
//!
//! Looking a name up walks aliases and relative rules until it reaches a base
//! color. A name that leads back to itself is reported as a cycle rather than
//! looping, and the walk is bounded in depth.
//!
//! ## Core Components
//!
//! - [`UiConfiguration`]: Owns variables and the palette, persists both and
//!   notifies subscribers of every change
//! - [`Palette`]: Immutable-by-snapshot color tables and the resolver
//! - [`RelativeHsv`]: A color defined as an offset from another
//! - [`Color`] / [`Hsv`]: RGBA colors and their HSV form
//! - [`ConfigDocument`]: The XML form of a configuration or theme
//! - [`ConfigEvents`]: A subscription to [`ConfigEvent`]s
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use uiconfig::{Color, ConfigStore, HsvDelta, RelativeHsv, UiConfiguration};
//!
//! fn main() -> uiconfig::UiConfigResult<()> {
//!     let store = ConfigStore::from_env()?;
//!     let mut config = UiConfiguration::new(store);
//!     let events = config.subscribe();
//!
//!     config.set_base("bg", Color::rgb(20, 20, 20));
//!     config.set_relative("bg-lighter", RelativeHsv::new("bg", HsvDelta::new(0.0, 0.0, 0.3)));
//!     config.set_alias("panel", "bg-lighter");
//!
//!     let panel = config.color("panel")?;
//!     println!("panel is {}", panel);
//!
//!     for event in events.drain() {
//!         println!("changed: {}", event.name());
//!     }
//!
//!     config.save_state()
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `colors`: RGBA and HSV color types
//! - `config`: The configuration object
//! - `document`: XML documents and their sections
//! - `error`: Error types and handling
//! - `event`: Change notification
//! - `palette`: Color tables and resolution
//! - `relative`: Relative color rules
//! - `store`: Configuration file locations and IO
//! - `variables`: Typed configuration variables
//!
//! ## Error Handling
//!
//! Lookups return [`ColorResult`], carrying a [`UiConfigError`] directly.
//! Loading and saving return [`UiConfigResult`] with diagnostics via `miette`.

/// Re-exports of core components
pub use colors::{Color, Hsv, HsvDelta};
pub use config::{ModifiedFlags, UiConfiguration};
pub use document::{ColorTables, ConfigDocument};
pub use error::{ColorResult, UiConfigError, UiConfigResult};
pub use event::{ConfigEvent, ConfigEvents};
pub use palette::Palette;
pub use relative::RelativeHsv;
pub use store::ConfigStore;
pub use variables::{ConfigValue, Var, Variables};

/// RGBA and HSV colors
pub mod colors;
/// The configuration object
pub mod config;
/// XML configuration documents
pub mod document;
/// Error types and handling
pub mod error;
/// Change notification
pub mod event;
/// Color tables and resolution
pub mod palette;
/// Relative color rules
pub mod relative;
/// Configuration file locations and IO
pub mod store;
/// Typed configuration variables
pub mod variables;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_theme_edit_integration() {
        let user = TempDir::new().unwrap();
        let mut config = UiConfiguration::new(ConfigStore::new(user.path(), Vec::new()));
        let events = config.subscribe();

        config.set_base("bg", Color::rgb(20, 20, 20));
        config.set_relative(
            "bg-lighter",
            RelativeHsv::new("bg", HsvDelta::new(0.0, 0.0, 0.3)),
        );
        config.set_alias("panel", "bg-lighter");
        config.set_alias("loop-a", "loop-b");
        config.set_alias("loop-b", "loop-a");

        assert_eq!(config.color("panel").unwrap(), config.color("bg-lighter").unwrap());
        assert!(matches!(
            config.color("loop-a"),
            Err(UiConfigError::CyclicReference { .. })
        ));
        assert_eq!(events.drain().len(), 5);

        let snapshot = config.snapshot();
        config.save_state().unwrap();

        let mut reopened = UiConfiguration::new(config.store().clone());
        reopened.load_state().unwrap();
        assert_eq!(*reopened.palette(), *snapshot);
    }
}
