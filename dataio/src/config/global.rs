//! Static project configuration.
//!
//! The configuration is a YAML file with `access`, `masterdata`, `model` and
//! an optional `stratigraphy` section. It is parsed leniently into raw
//! sections first so that legacy spellings can be upgraded with a
//! diagnostic before strict validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use crate::definitions::GLOBAL_CONFIG_ENVNAME;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::enums::Classification;
use crate::errors::{ConfigurationError, DataioError, Result};
use crate::metadata::data::Layer;
use crate::metadata::fields::{Asset, Masterdata, Model};
use crate::runcontext::Environment;

/// Legacy `access.ssdl` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsdlConfig {
    /// Legacy classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<Classification>,
    /// Include in reporting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep_include: Option<bool>,
}

/// `access` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Asset.
    pub asset: Asset,
    /// Legacy access block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssdl: Option<SsdlConfig>,
    /// Default classification; always set after validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
}

impl AccessConfig {
    fn validate(mut self, sink: &dyn DiagnosticSink) -> Result<Self> {
        let legacy = self.ssdl.and_then(|s| s.access_level);
        match (self.classification, legacy) {
            (Some(_), Some(_)) => sink.emit(Diagnostic::compatibility(
                "The config contains both 'access.ssdl.access_level' (deprecated) and \
                 'access.classification'. The value from access.classification will be used \
                 as the default classification. Remove 'access.ssdl.access_level' to silence \
                 this warning.",
            )),
            (None, Some(level)) => self.classification = Some(level),
            (None, None) => {
                return Err(ConfigurationError::new(
                    "The config doesn't contain any default security classification. \
                     Please provide access.classification.",
                )
                .with_section("access")
                .into())
            }
            (Some(_), None) => {}
        }
        Ok(self)
    }
}

/// One entry in the stratigraphy table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StratigraphyElement {
    /// Canonical name.
    pub name: String,
    /// Whether this is a known stratigraphic unit.
    #[serde(default)]
    pub stratigraphic: bool,
    /// Alternative names.
    #[serde(default)]
    pub alias: Vec<String>,
    /// Alternative stratigraphic names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stratigraphic_alias: Option<Vec<String>>,
    /// Offset.
    #[serde(default)]
    pub offset: f64,
    /// Top reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<Layer>,
    /// Base reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<Layer>,
}

/// Stratigraphy table keyed by the name used in the model.
pub type Stratigraphy = BTreeMap<String, StratigraphyElement>;

/// Validated static project configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfiguration {
    /// Access defaults.
    pub access: AccessConfig,
    /// Masterdata references.
    pub masterdata: Masterdata,
    /// Model.
    pub model: Model,
    /// Stratigraphy table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stratigraphy: Option<Stratigraphy>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AliasInput {
    One(String),
    Many(Vec<Option<String>>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LayerInput {
    Name(String),
    Layer(Layer),
}

#[derive(Deserialize)]
struct RawStratigraphyElement {
    name: String,
    #[serde(default)]
    stratigraphic: bool,
    #[serde(default)]
    alias: Option<AliasInput>,
    #[serde(default)]
    stratigraphic_alias: Option<AliasInput>,
    #[serde(default)]
    offset: f64,
    #[serde(default)]
    top: Option<LayerInput>,
    #[serde(default)]
    base: Option<LayerInput>,
}

fn normalize_alias(input: Option<AliasInput>, sink: &dyn DiagnosticSink) -> Option<Vec<String>> {
    match input? {
        AliasInput::One(s) => {
            sink.emit(Diagnostic::deprecation(
                "The global config contains string input for one of the 'alias' fields in the \
                 'stratigraphy' section. Please convert to a list instead.",
            ));
            Some(vec![s])
        }
        AliasInput::Many(items) => {
            if items.iter().any(|i| i.as_deref().map_or(true, str::is_empty)) {
                sink.emit(Diagnostic::deprecation(
                    "The global config contains an empty list element in one of the 'alias' \
                     fields in the 'stratigraphy' section. Please remove the empty element.",
                ));
            }
            Some(items.into_iter().flatten().filter(|s| !s.is_empty()).collect())
        }
    }
}

fn normalize_layer(input: Option<LayerInput>) -> Option<Layer> {
    match input? {
        LayerInput::Name(name) => Some(Layer {
            name,
            offset: 0.0,
            stratigraphic: false,
        }),
        LayerInput::Layer(layer) => Some(layer),
    }
}

impl RawStratigraphyElement {
    fn normalize(self, sink: &dyn DiagnosticSink) -> StratigraphyElement {
        StratigraphyElement {
            name: self.name,
            stratigraphic: self.stratigraphic,
            alias: normalize_alias(self.alias, sink).unwrap_or_default(),
            stratigraphic_alias: normalize_alias(self.stratigraphic_alias, sink),
            offset: self.offset,
            top: normalize_layer(self.top),
            base: normalize_layer(self.base),
        }
    }
}

fn section<T: for<'de> Deserialize<'de>>(raw: &Value, name: &str) -> Result<T> {
    let value = raw.get(name).filter(|v| !v.is_null()).ok_or_else(|| {
        ConfigurationError::new(format!("The global config is missing the '{name}' section"))
            .with_section(name)
    })?;
    serde_json::from_value(value.clone()).map_err(|e| {
        DataioError::Configuration(
            ConfigurationError::new(format!("Invalid '{name}' section in global config: {e}"))
                .with_section(name),
        )
    })
}

impl GlobalConfiguration {
    /// Validates a raw configuration tree.
    pub fn from_value(raw: &Value, sink: &dyn DiagnosticSink) -> Result<Self> {
        let access: AccessConfig = section(raw, "access")?;
        let access = access.validate(sink)?;
        let masterdata = section(raw, "masterdata")?;
        let model = section(raw, "model")?;

        let stratigraphy = match raw.get("stratigraphy").filter(|v| !v.is_null()) {
            None => None,
            Some(_) => {
                let raw_strat: BTreeMap<String, RawStratigraphyElement> = section(raw, "stratigraphy")?;
                Some(
                    raw_strat
                        .into_iter()
                        .map(|(k, v)| (k, v.normalize(sink)))
                        .collect(),
                )
            }
        };

        Ok(Self {
            access,
            masterdata,
            model,
            stratigraphy,
        })
    }

    /// Stratigraphy entry for `name`, if any.
    #[must_use]
    pub fn stratigraphy_element(&self, name: &str) -> Option<&StratigraphyElement> {
        self.stratigraphy.as_ref()?.get(name)
    }

    /// Default classification; set for every validated configuration.
    #[must_use]
    pub fn classification(&self) -> Classification {
        self.access.classification.unwrap_or(Classification::Internal)
    }
}

/// Reads a YAML configuration file into a raw tree.
pub fn load_config_from_path(path: &Path) -> Result<Value> {
    debug!(path = %path.display(), "Loading global config");
    if !path.is_file() {
        return Err(DataioError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Cannot find file for global config: {}", path.display()),
        )));
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_yaml::from_reader(reader)?)
}

/// Reads the configuration named by `FMU_GLOBAL_CONFIG`, if set.
pub fn config_from_env(env: &Environment) -> Result<Option<Value>> {
    match env.get(GLOBAL_CONFIG_ENVNAME) {
        Some(path) => load_config_from_path(&env.absolute(Path::new(path))).map(Some),
        None => Ok(None),
    }
}

/// Validates a raw configuration, downgrading failures to diagnostics.
///
/// Returns `None` when no metadata can be produced from it.
pub fn resolve_global_config(raw: &Value, sink: &dyn DiagnosticSink) -> Option<GlobalConfiguration> {
    match GlobalConfiguration::from_value(raw, sink) {
        Ok(config) => Some(config),
        Err(err) => {
            if raw.get("masterdata").is_none() {
                sink.emit(Diagnostic::warning(
                    "The global config file is lacking masterdata definitions, hence no metadata \
                     will be exported.",
                ));
            } else {
                sink.emit(Diagnostic::warning(format!(
                    "The global configuration has one or more errors that makes it impossible to \
                     create valid metadata. The data will still be exported but no metadata will \
                     be made. Detailed information: {err}"
                )));
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingDiagnosticSink, DiagnosticKind};
    use crate::testing::global_config_value;
    use serde_json::json;

    #[test]
    fn test_valid_config() {
        let sink = CollectingDiagnosticSink::new();
        let cfg = GlobalConfiguration::from_value(&global_config_value(), &sink).unwrap();
        assert_eq!(cfg.classification(), Classification::Internal);
        assert_eq!(cfg.model.name, "Drogon");
        assert!(cfg.stratigraphy_element("TopVolantis").is_some());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_missing_classification_is_configuration_error() {
        let sink = CollectingDiagnosticSink::new();
        let mut raw = global_config_value();
        raw["access"] = json!({"asset": {"name": "Drogon"}});
        let err = GlobalConfiguration::from_value(&raw, &sink).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_legacy_access_level_is_mirrored() {
        let sink = CollectingDiagnosticSink::new();
        let mut raw = global_config_value();
        raw["access"] = json!({"asset": {"name": "Drogon"}, "ssdl": {"access_level": "restricted", "rep_include": true}});
        let cfg = GlobalConfiguration::from_value(&raw, &sink).unwrap();
        assert_eq!(cfg.classification(), Classification::Restricted);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_both_classifications_warn() {
        let sink = CollectingDiagnosticSink::new();
        let mut raw = global_config_value();
        raw["access"] = json!({"asset": {"name": "Drogon"}, "classification": "internal", "ssdl": {"access_level": "restricted"}});
        let cfg = GlobalConfiguration::from_value(&raw, &sink).unwrap();
        assert_eq!(cfg.classification(), Classification::Internal);
        assert_eq!(sink.of_kind(DiagnosticKind::Compatibility).len(), 1);
    }

    #[test]
    fn test_legacy_stratigraphy_forms_are_upgraded() {
        let sink = CollectingDiagnosticSink::new();
        let mut raw = global_config_value();
        raw["stratigraphy"] = json!({
            "TopA": {"name": "A Top", "stratigraphic": true, "alias": "a_top"},
            "TopB": {"name": "B Top", "alias": ["b", null], "top": "TopA"},
        });
        let cfg = GlobalConfiguration::from_value(&raw, &sink).unwrap();
        assert_eq!(cfg.stratigraphy_element("TopA").unwrap().alias, vec!["a_top".to_string()]);
        let b = cfg.stratigraphy_element("TopB").unwrap();
        assert_eq!(b.alias, vec!["b".to_string()]);
        assert_eq!(b.top.as_ref().unwrap().name, "TopA");
        assert_eq!(sink.of_kind(DiagnosticKind::Deprecation).len(), 2);
    }

    #[test]
    fn test_missing_masterdata_downgrades_to_warning() {
        let sink = CollectingDiagnosticSink::new();
        let mut raw = global_config_value();
        raw.as_object_mut().unwrap().remove("masterdata");
        assert!(resolve_global_config(&raw, &sink).is_none());
        assert!(sink.contains("lacking masterdata"));
    }

    #[test]
    fn test_load_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("global_variables.yml");
        std::fs::write(&path, serde_yaml::to_string(&global_config_value()).unwrap()).unwrap();
        let raw = load_config_from_path(&path).unwrap();
        assert_eq!(raw["model"]["name"], "Drogon");

        let env = Environment::new(dir.path()).with_var(GLOBAL_CONFIG_ENVNAME, "global_variables.yml");
        assert!(config_from_env(&env).unwrap().is_some());
        assert!(load_config_from_path(&dir.path().join("missing.yml")).is_err());
    }
}
