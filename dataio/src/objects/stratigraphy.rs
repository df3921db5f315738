//! Name resolution against the stratigraphy table of the project configuration.

use crate::config::Stratigraphy;
use crate::metadata::data::Layer;

/// Object naming after the stratigraphy lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamedStratigraphy {
    /// Canonical name.
    pub name: String,
    /// Alternative names, including the name the object was exported with.
    pub alias: Vec<String>,
    /// Whether the name is a known stratigraphic unit.
    pub stratigraphic: bool,
    /// Alternative stratigraphic names.
    pub stratigraphic_alias: Vec<String>,
    /// Offset from the named horizon.
    pub offset: f64,
    /// Top reference.
    pub top: Option<Layer>,
    /// Base reference.
    pub base: Option<Layer>,
}

impl NamedStratigraphy {
    /// Looks `name` up in `stratigraphy`.
    ///
    /// Unknown names pass through unchanged with `stratigraphic` false.
    #[must_use]
    pub fn resolve(name: &str, stratigraphy: Option<&Stratigraphy>) -> Self {
        let Some(element) = stratigraphy.and_then(|s| s.get(name)) else {
            return Self {
                name: name.to_string(),
                ..Self::default()
            };
        };

        let mut alias = element.alias.clone();
        if !alias.iter().any(|a| a == name) {
            alias.push(name.to_string());
        }
        Self {
            name: element.name.clone(),
            alias,
            stratigraphic: element.stratigraphic,
            stratigraphic_alias: element.stratigraphic_alias.clone().unwrap_or_default(),
            offset: element.offset,
            top: element.top.clone(),
            base: element.base.clone(),
        }
    }
}

/// Object name: the configured name if given, else the object's own name.
#[must_use]
pub fn derive_name(configured: &str, object_name: &str) -> String {
    if configured.is_empty() {
        object_name.to_string()
    } else {
        configured.to_string()
    }
}
