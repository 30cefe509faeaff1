//! The persisted XML document.
//!
//! ```xml
//! <UIConfiguration version="1">
//!   <Options>
//!     <Option name="color-file" value="dark"/>
//!   </Options>
//!   <Colors>
//!     <Color name="bg" value="#141414"/>
//!   </Colors>
//!   <RelativeColors>
//!     <RelativeColor name="bg-lighter" base="bg" hue="0" saturation="0" value="0.3" alpha="0" quantized-hue="-1"/>
//!   </RelativeColors>
//!   <ColorAliases>
//!     <ColorAlias name="panel" alias="bg-lighter"/>
//!   </ColorAliases>
//! </UIConfiguration>
//! ```
//!
//! Every section is optional. A missing section means "leave that table
//! alone" when merging; unknown elements and attributes are skipped so newer
//! files still load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    colors::{Color, HsvDelta},
    error::{UiConfigError, UiConfigResult},
    palette::Palette,
    relative::{RelativeHsv, NOT_QUANTIZED},
    variables::Variables,
};

pub const DOCUMENT_VERSION: &str = "1";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "UIConfiguration")]
pub struct ConfigDocument {
    #[serde(rename = "@version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "Options", default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionSection>,
    #[serde(rename = "Colors", default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorSection>,
    #[serde(
        rename = "RelativeColors",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub relative_colors: Option<RelativeSection>,
    #[serde(rename = "ColorAliases", default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<AliasSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionSection {
    #[serde(rename = "Option", default)]
    pub entries: Vec<OptionEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionEntry {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@value")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorSection {
    #[serde(rename = "Color", default)]
    pub entries: Vec<ColorEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorEntry {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@value")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelativeSection {
    #[serde(rename = "RelativeColor", default)]
    pub entries: Vec<RelativeEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeEntry {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@base")]
    pub base: String,
    #[serde(rename = "@hue", default)]
    pub hue: f64,
    #[serde(rename = "@saturation", default)]
    pub saturation: f64,
    #[serde(rename = "@value", default)]
    pub value: f64,
    #[serde(rename = "@alpha", default)]
    pub alpha: f64,
    #[serde(rename = "@quantized-hue", default = "not_quantized")]
    pub quantized_hue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AliasSection {
    #[serde(rename = "ColorAlias", default)]
    pub entries: Vec<AliasEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasEntry {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@alias")]
    pub alias: String,
}

/// Color tables decoded from a document; `None` where the section was absent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorTables {
    pub base: Option<BTreeMap<String, Color>>,
    pub relative: Option<BTreeMap<String, RelativeHsv>>,
    pub aliases: Option<BTreeMap<String, String>>,
}

impl ColorTables {
    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.relative.is_none() && self.aliases.is_none()
    }

    /// A complete palette; absent sections become empty tables
    pub fn into_palette(self) -> Palette {
        Palette {
            base: self.base.unwrap_or_default(),
            relative: self.relative.unwrap_or_default(),
            aliases: self.aliases.unwrap_or_default(),
        }
    }

    /// Merge present sections into `palette`, entry by entry
    pub(crate) fn merge_into(self, palette: &mut Palette) {
        if let Some(base) = self.base {
            palette.base.extend(base);
        }
        if let Some(relative) = self.relative {
            palette.relative.extend(relative);
        }
        if let Some(aliases) = self.aliases {
            palette.aliases.extend(aliases);
        }
    }
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self {
            version: Some(DOCUMENT_VERSION.to_string()),
            ..Self::default()
        }
    }

    /// A document holding all three color tables and nothing else
    pub fn from_palette(palette: &Palette) -> Self {
        Self {
            colors: Some(ColorSection::from_table(palette.base_colors())),
            relative_colors: Some(RelativeSection::from_table(palette.relative_colors())),
            aliases: Some(AliasSection::from_table(palette.aliases())),
            ..Self::new()
        }
    }

    pub fn from_xml(src: &str) -> UiConfigResult<Self> {
        quick_xml::de::from_str(src).map_err(|e| {
            UiConfigError::document(src, (0, 0), format!("Failed to parse document: {}", e))
                .into()
        })
    }

    pub fn to_xml(&self) -> UiConfigResult<String> {
        let mut buffer = String::new();
        let mut serializer = quick_xml::se::Serializer::new(&mut buffer);
        serializer.indent(' ', 2);
        self.serialize(serializer).map_err(|e| {
            UiConfigError::document(
                "",
                (0, 0),
                format!("Failed to serialize document: {}", e),
            )
        })?;
        Ok(buffer)
    }

    /// Decode and validate every color section that is present
    pub fn color_tables(&self) -> Result<ColorTables, UiConfigError> {
        Ok(ColorTables {
            base: self.colors.as_ref().map(ColorSection::to_table).transpose()?,
            relative: self
                .relative_colors
                .as_ref()
                .map(RelativeSection::to_table)
                .transpose()?,
            aliases: self.aliases.as_ref().map(AliasSection::to_table),
        })
    }
}

impl OptionSection {
    pub fn from_variables(vars: &Variables) -> Self {
        Self {
            entries: vars
                .iter()
                .map(|(name, value)| OptionEntry {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }
}

impl ColorSection {
    pub fn from_table(table: &BTreeMap<String, Color>) -> Self {
        Self {
            entries: table
                .iter()
                .map(|(name, color)| ColorEntry {
                    name: name.clone(),
                    value: color.to_hex(),
                })
                .collect(),
        }
    }

    pub fn to_table(&self) -> Result<BTreeMap<String, Color>, UiConfigError> {
        self.entries
            .iter()
            .map(|entry| {
                Color::from_hex(&entry.value)
                    .map(|color| (entry.name.clone(), color))
                    .ok_or_else(|| {
                        UiConfigError::document(
                            entry.value.clone(),
                            (0, entry.value.len()),
                            format!("invalid color value for '{}'", entry.name),
                        )
                    })
            })
            .collect()
    }
}

impl RelativeSection {
    pub fn from_table(table: &BTreeMap<String, RelativeHsv>) -> Self {
        Self {
            entries: table
                .iter()
                .map(|(name, rule)| RelativeEntry {
                    name: name.clone(),
                    base: rule.base_color.clone(),
                    hue: rule.modifier.hue,
                    saturation: rule.modifier.saturation,
                    value: rule.modifier.value,
                    alpha: rule.modifier.alpha,
                    quantized_hue: rule.quantized_hue,
                })
                .collect(),
        }
    }

    pub fn to_table(&self) -> Result<BTreeMap<String, RelativeHsv>, UiConfigError> {
        self.entries
            .iter()
            .map(|entry| {
                let modifier = HsvDelta::new(entry.hue, entry.saturation, entry.value)
                    .with_alpha(entry.alpha);
                if !modifier.is_finite() || !entry.quantized_hue.is_finite() {
                    return Err(UiConfigError::document(
                        entry.name.clone(),
                        (0, entry.name.len()),
                        "relative color has a non-finite modifier",
                    ));
                }
                let rule = RelativeHsv::new(entry.base.clone(), modifier);
                let rule = if entry.quantized_hue >= 0.0 {
                    rule.with_quantized_hue(entry.quantized_hue)
                } else {
                    rule
                };
                Ok((entry.name.clone(), rule))
            })
            .collect()
    }
}

impl AliasSection {
    pub fn from_table(table: &BTreeMap<String, String>) -> Self {
        Self {
            entries: table
                .iter()
                .map(|(name, alias)| AliasEntry {
                    name: name.clone(),
                    alias: alias.clone(),
                })
                .collect(),
        }
    }

    pub fn to_table(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|entry| (entry.name.clone(), entry.alias.clone()))
            .collect()
    }
}

fn not_quantized() -> f64 {
    NOT_QUANTIZED
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<UIConfiguration version="1">
  <Options>
    <Option name="color-file" value="light"/>
  </Options>
  <Canvas>
    <Font name="small" value="Sans 8"/>
  </Canvas>
  <Colors>
    <Color name="bg" value="#141414"/>
    <Color name="selection" value="#2266aa80" note="ignored"/>
  </Colors>
  <RelativeColors>
    <RelativeColor name="bg-lighter" base="bg" hue="0" saturation="0" value="0.3"/>
    <RelativeColor name="blueish" base="selection" hue="0" saturation="0" value="0" quantized-hue="216"/>
  </RelativeColors>
  <ColorAliases>
    <ColorAlias name="panel" alias="bg-lighter"/>
  </ColorAliases>
</UIConfiguration>
"##;

    #[test]
    fn test_parse_sample() {
        let doc = ConfigDocument::from_xml(SAMPLE).unwrap();
        assert_eq!(doc.version.as_deref(), Some("1"));
        assert_eq!(
            doc.options.as_ref().unwrap().entries,
            vec![OptionEntry {
                name: "color-file".into(),
                value: "light".into(),
            }]
        );

        let tables = doc.color_tables().unwrap();
        let base = tables.base.unwrap();
        assert_eq!(base["bg"], Color::rgb(20, 20, 20));
        assert_eq!(base["selection"], Color::rgba(0x22, 0x66, 0xaa, 0x80));

        let relative = tables.relative.unwrap();
        assert_eq!(
            relative["bg-lighter"],
            RelativeHsv::new("bg", HsvDelta::new(0.0, 0.0, 0.3))
        );
        assert_eq!(relative["blueish"].quantized_hue, 216.0);
        assert!(!relative["bg-lighter"].is_quantized());

        assert_eq!(tables.aliases.unwrap()["panel"], "bg-lighter");
    }

    #[test]
    fn test_missing_sections_stay_none() {
        let doc = ConfigDocument::from_xml(
            r#"<UIConfiguration><ColorAliases><ColorAlias name="a" alias="b"/></ColorAliases></UIConfiguration>"#,
        )
        .unwrap();

        assert!(doc.options.is_none());
        let tables = doc.color_tables().unwrap();
        assert!(tables.base.is_none());
        assert!(tables.relative.is_none());
        assert_eq!(tables.aliases.unwrap().len(), 1);
    }

    #[test]
    fn test_bad_color_fails_decoding() {
        let doc = ConfigDocument::from_xml(
            r#"<UIConfiguration><Colors><Color name="bg" value="not-a-color"/></Colors></UIConfiguration>"#,
        )
        .unwrap();

        match doc.color_tables() {
            Err(UiConfigError::Document { src, msg, .. }) => {
                assert_eq!(src, "not-a-color");
                assert!(msg.contains("bg"));
            }
            other => panic!("expected document error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_elements_between_entries() {
        let doc = ConfigDocument::from_xml(
            r##"<UIConfiguration>
                 <Options>
                   <Option name="font-scale" value="2"/>
                   <Group name="later"/>
                   <Option name="color-file" value="light"/>
                 </Options>
                 <Colors>
                   <Color name="a" value="#010101"/>
                   <Gradient name="g"/>
                   <Color name="b" value="#020202"/>
                 </Colors>
                 <RelativeColors>
                   <RelativeColor name="r1" base="a" hue="0" saturation="0" value="0.1"/>
                   <Blend name="x"/>
                   <RelativeColor name="r2" base="b" hue="0" saturation="0" value="0.2"/>
                 </RelativeColors>
                 <ColorAliases>
                   <ColorAlias name="p" alias="a"/>
                   <Comment text="new in a later version"/>
                   <ColorAlias name="q" alias="r2"/>
                 </ColorAliases>
               </UIConfiguration>"##,
        )
        .unwrap();

        assert_eq!(doc.options.as_ref().unwrap().entries.len(), 2);
        let tables = doc.color_tables().unwrap();
        let base = tables.base.unwrap();
        assert_eq!(base["a"], Color::rgb(1, 1, 1));
        assert_eq!(base["b"], Color::rgb(2, 2, 2));
        assert_eq!(tables.relative.unwrap().len(), 2);
        assert_eq!(tables.aliases.unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_xml() {
        assert!(ConfigDocument::from_xml("<UIConfiguration><Colors>").is_err());
    }

    #[test]
    fn test_palette_round_trip() {
        let doc = ConfigDocument::from_xml(SAMPLE).unwrap();
        let palette = doc.color_tables().unwrap().into_palette();

        let xml = ConfigDocument::from_palette(&palette).to_xml().unwrap();
        let reparsed = ConfigDocument::from_xml(&xml).unwrap();

        assert!(reparsed.options.is_none());
        assert_eq!(reparsed.color_tables().unwrap().into_palette(), palette);
    }

    #[test]
    fn test_merge_only_touches_present_sections() {
        let mut palette = ConfigDocument::from_xml(SAMPLE)
            .unwrap()
            .color_tables()
            .unwrap()
            .into_palette();
        let before = palette.clone();

        let tables = ColorTables {
            aliases: Some(BTreeMap::from([("panel".to_string(), "bg".to_string())])),
            ..ColorTables::default()
        };
        tables.merge_into(&mut palette);

        assert_eq!(palette.base_colors(), before.base_colors());
        assert_eq!(palette.relative_colors(), before.relative_colors());
        assert_eq!(palette.aliases()["panel"], "bg");
    }
}
