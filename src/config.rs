//! The UI configuration object
//!
//! [`UiConfiguration`] owns the typed variables and the color palette, and is
//! the only place either can be changed. It is constructed explicitly and
//! passed by reference to whatever needs it.

use std::sync::Arc;

use crate::{
    colors::{Color, Hsv},
    document::{ColorTables, ConfigDocument, OptionSection},
    error::{ColorResult, UiConfigError, UiConfigResult},
    event::{ConfigEvent, ConfigEvents, Notifier},
    palette::Palette,
    relative::RelativeHsv,
    store::ConfigStore,
    variables::{Var, VariableValue, Variables, COLOR_FILE},
};

/// Which color tables changed since they were last saved or loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifiedFlags {
    pub base: bool,
    pub aliases: bool,
    pub derived: bool,
}

impl ModifiedFlags {
    pub fn any(&self) -> bool {
        self.base || self.aliases || self.derived
    }
}

/// Interface preferences plus the color theme
#[derive(Debug)]
pub struct UiConfiguration {
    /// Typed configuration variables
    variables: Variables,
    /// Current color tables, replaced wholesale on theme loads
    palette: Arc<Palette>,
    /// Where documents are read from and written to
    store: ConfigStore,
    /// Change notification fan-out
    notifier: Notifier,
    /// Variables changed since the last save
    dirty: bool,
    modified: ModifiedFlags,
}

impl UiConfiguration {
    /// Creates a configuration holding default variables and an empty palette
    pub fn new(store: ConfigStore) -> Self {
        Self {
            variables: Variables::with_defaults(),
            palette: Arc::new(Palette::new()),
            store,
            notifier: Notifier::new(),
            dirty: false,
            modified: ModifiedFlags::default(),
        }
    }

    /// Creates a configuration from the platform locations and loads it
    pub fn from_env() -> UiConfigResult<Self> {
        let mut config = Self::new(ConfigStore::from_env()?);
        config.load_state()?;
        Ok(config)
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Receive a [`ConfigEvent`] for every subsequent change
    pub fn subscribe(&mut self) -> ConfigEvents {
        self.notifier.subscribe()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The current palette as an owned handle.
    ///
    /// A snapshot never changes: later mutations copy the tables and theme loads
    /// install a new palette, so a reader holding one never sees a mix of themes.
    pub fn snapshot(&self) -> Arc<Palette> {
        Arc::clone(&self.palette)
    }

    pub fn color(&self, name: &str) -> ColorResult<Color> {
        self.palette.color(name)
    }

    pub fn color_hsv(&self, name: &str) -> ColorResult<Hsv> {
        self.palette.color_hsv(name)
    }

    pub fn base_color_by_name(&self, name: &str) -> ColorResult<Color> {
        self.palette.base_color_by_name(name)
    }

    pub fn resolve(&self, rule: &RelativeHsv) -> ColorResult<Color> {
        self.palette.resolve(rule)
    }

    pub fn quantized(&self, color: Color) -> Color {
        self.palette.quantized(color)
    }

    pub fn color_as_relative_hsv(&self, color: Color) -> Option<RelativeHsv> {
        self.palette.color_as_relative_hsv(color)
    }

    pub fn color_as_alias(&self, color: Color) -> Option<&str> {
        self.palette.color_as_alias(color)
    }

    pub fn set_base(&mut self, name: impl Into<String>, color: Color) {
        let name = name.into();
        Arc::make_mut(&mut self.palette)
            .base
            .insert(name.clone(), color);
        self.modified.base = true;
        self.notifier.emit(ConfigEvent::Color(name));
    }

    pub fn set_relative(&mut self, name: impl Into<String>, rule: RelativeHsv) {
        let name = name.into();
        Arc::make_mut(&mut self.palette)
            .relative
            .insert(name.clone(), rule);
        self.modified.derived = true;
        self.notifier.emit(ConfigEvent::Color(name));
    }

    pub fn set_alias(&mut self, name: impl Into<String>, target: impl Into<String>) {
        let name = name.into();
        Arc::make_mut(&mut self.palette)
            .aliases
            .insert(name.clone(), target.into());
        self.modified.aliases = true;
        self.notifier.emit(ConfigEvent::Color(name));
    }

    pub fn modified(&self) -> ModifiedFlags {
        self.modified
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn get<T: VariableValue>(&self, var: &Var<T>) -> T {
        self.variables.get(var)
    }

    /// Set a variable, returning whether its value changed
    pub fn set<T: VariableValue>(&mut self, var: &Var<T>, value: T) -> bool {
        let changed = self.variables.set(var, value);
        if changed {
            self.parameter_changed(var.name());
        }
        changed
    }

    /// Set a variable by name from its string form
    pub fn set_parameter(&mut self, name: &str, raw: &str) -> UiConfigResult<bool> {
        let changed = self.variables.set_from_str(name, raw)?;
        if changed {
            self.parameter_changed(name);
        }
        Ok(changed)
    }

    /// Calls `f` with the name of every variable
    pub fn map_parameters(&self, mut f: impl FnMut(&str)) {
        for name in self.variables.names() {
            f(name);
        }
    }

    /// Everything: variables and all three color tables
    pub fn get_state(&self) -> ConfigDocument {
        ConfigDocument {
            options: Some(self.get_variables()),
            ..ConfigDocument::from_palette(&self.palette)
        }
    }

    pub fn get_variables(&self) -> OptionSection {
        OptionSection::from_variables(&self.variables)
    }

    /// Merge a document into the current state.
    ///
    /// Sections missing from `doc` are left alone and entries not named in a
    /// section are kept. Nothing changes unless the whole document is valid.
    pub fn set_state(&mut self, doc: &ConfigDocument) -> UiConfigResult<()> {
        let tables = doc.color_tables()?;
        let mut variables = self.variables.clone();
        if let Some(options) = &doc.options {
            merge_options(&mut variables, options)?;
        }

        self.commit_variables(variables);
        if !tables.is_empty() {
            let mut palette = (*self.palette).clone();
            tables.merge_into(&mut palette);
            self.install_palette(palette);
        }
        Ok(())
    }

    /// Merge variable values only
    pub fn set_variables(&mut self, options: &OptionSection) -> UiConfigResult<()> {
        let mut variables = self.variables.clone();
        merge_options(&mut variables, options)?;
        self.commit_variables(variables);
        Ok(())
    }

    /// Merge the defaults file from the search path, returning whether one was found
    pub fn load_defaults(&mut self) -> UiConfigResult<bool> {
        let Some(path) = self.store.defaults_path() else {
            tracing::debug!("no defaults file on the search path");
            return Ok(false);
        };
        let doc = self.store.read_document(&path)?;
        self.set_state(&doc)?;
        Ok(true)
    }

    /// Load defaults, the user's configuration and the selected color theme.
    ///
    /// Colors are layered defaults, then the theme, then any color sections in
    /// the user's file. The result replaces the in-memory state, including
    /// unsaved edits. Every file is read and validated before anything is
    /// applied, and subscribers get a single [`ConfigEvent::Colors`].
    pub fn load_state(&mut self) -> UiConfigResult<()> {
        let defaults = self
            .store
            .defaults_path()
            .map(|path| self.store.read_document(&path))
            .transpose()?;
        let user_path = self.store.user_config_path();
        let user = if user_path.is_file() {
            Some(self.store.read_document(&user_path)?)
        } else {
            None
        };

        let mut variables = Variables::with_defaults();
        let mut palette = Palette::new();

        if let Some(doc) = &defaults {
            let tables = doc.color_tables()?;
            if let Some(options) = &doc.options {
                merge_options(&mut variables, options)?;
            }
            tables.merge_into(&mut palette);
        }

        let user_tables = match &user {
            Some(doc) => {
                if let Some(options) = &doc.options {
                    merge_options(&mut variables, options)?;
                }
                doc.color_tables()?
            }
            None => ColorTables::default(),
        };

        let theme = variables.get(&COLOR_FILE);
        if let Some(tables) = self.read_color_theme(&theme)? {
            palette = tables.into_palette();
        }
        user_tables.merge_into(&mut palette);

        self.commit_variables(variables);
        self.dirty = false;
        self.modified = ModifiedFlags::default();
        self.install_palette(palette);
        tracing::debug!(theme = %theme, "loaded configuration");
        Ok(())
    }

    /// Write changed variables and, if any color table changed, the color theme
    pub fn save_state(&mut self) -> UiConfigResult<()> {
        if self.dirty {
            let doc = ConfigDocument {
                options: Some(self.get_variables()),
                ..ConfigDocument::new()
            };
            self.store
                .write_document(&self.store.user_config_path(), &doc)?;
            self.dirty = false;
        }

        if self.modified.any() {
            let theme = self.get(&COLOR_FILE);
            self.store_color_theme(&theme)?;
            self.modified = ModifiedFlags::default();
        }
        Ok(())
    }

    /// Write the three color tables as the user's copy of theme `name`
    pub fn store_color_theme(&self, name: &str) -> UiConfigResult<()> {
        let path = self.store.user_color_theme_path(name);
        self.store
            .write_document(&path, &ConfigDocument::from_palette(&self.palette))?;
        tracing::debug!(theme = name, path = %path.display(), "stored color theme");
        Ok(())
    }

    /// Replace all color tables with the theme named by `color-file`
    pub fn load_color_theme(&mut self) -> UiConfigResult<()> {
        let name = self.get(&COLOR_FILE);
        let tables = self.read_color_theme(&name)?.ok_or_else(|| {
            UiConfigError::io(
                self.store.user_color_theme_path(&name),
                format!("Color theme '{}' not found", name),
            )
        })?;

        self.modified = ModifiedFlags::default();
        self.install_palette(tables.into_palette());
        tracing::debug!(theme = %name, "loaded color theme");
        Ok(())
    }

    fn read_color_theme(&self, name: &str) -> UiConfigResult<Option<ColorTables>> {
        let Some(path) = self.store.find_color_theme(name) else {
            tracing::debug!(theme = name, "color theme not found");
            return Ok(None);
        };
        let doc = self.store.read_document(&path)?;
        Ok(Some(doc.color_tables()?))
    }

    fn parameter_changed(&mut self, name: &str) {
        self.dirty = true;
        self.notifier.emit(ConfigEvent::Parameter(name.to_string()));
    }

    fn commit_variables(&mut self, variables: Variables) {
        let changed: Vec<String> = variables
            .iter()
            .filter(|(name, value)| self.variables.value(name) != Some(*value))
            .map(|(name, _)| name.to_string())
            .collect();

        self.variables = variables;
        for name in changed {
            self.notifier.emit(ConfigEvent::Parameter(name));
        }
    }

    fn install_palette(&mut self, palette: Palette) {
        for problem in palette.problems() {
            tracing::warn!(%problem, "color theme has an unresolvable entry");
        }
        self.palette = Arc::new(palette);
        self.notifier.emit(ConfigEvent::Colors);
    }
}

fn merge_options(variables: &mut Variables, options: &OptionSection) -> UiConfigResult<()> {
    for entry in &options.entries {
        if !variables.contains(&entry.name) {
            tracing::debug!(name = %entry.name, "ignoring unknown option");
            continue;
        }
        let value = variables.parse(&entry.name, &entry.value)?;
        variables.replace(&entry.name, value);
    }
    Ok(())
}
