//! Metadata documents, discriminated by their `class` field.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use super::data::DataBlock;
use super::fields::{Access, Display, File, Fmu, FmuCase, Masterdata, TracklogEvent};
use super::prune::prune_nulls;
use crate::definitions::{SCHEMA, SOURCE, VERSION};
use crate::enums::{FmuClass, TracklogEventType};
use crate::errors::{invalid, Result};

fn default_schema() -> String {
    SCHEMA.to_string()
}

fn default_version() -> String {
    VERSION.to_string()
}

fn default_source() -> String {
    SOURCE.to_string()
}

/// Case metadata, written once per case by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseMetadata {
    /// Schema URL.
    #[serde(rename = "$schema", default = "default_schema")]
    pub schema: String,
    /// Schema version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Source marker.
    #[serde(default = "default_source")]
    pub source: String,
    /// Always [`FmuClass::Case`].
    pub class: FmuClass,
    /// Case and model.
    pub fmu: FmuCase,
    /// Access.
    pub access: Access,
    /// Masterdata.
    pub masterdata: Masterdata,
    /// History of the document.
    #[serde(default)]
    pub tracklog: Vec<TracklogEvent>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<String>>,
}

impl CaseMetadata {
    /// Loads case metadata from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading case metadata");
        let text = std::fs::read_to_string(path)?;
        let meta: Self = serde_yaml::from_str(&text)?;
        if meta.class != FmuClass::Case {
            return Err(invalid(
                "class",
                format!("Expected class 'case' in {}, got '{}'", path.display(), meta.class),
            ));
        }
        Ok(meta)
    }
}

/// Ensemble or realization record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMetadata {
    /// Schema URL.
    #[serde(rename = "$schema", default = "default_schema")]
    pub schema: String,
    /// Schema version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Source marker.
    #[serde(default = "default_source")]
    pub source: String,
    /// Ensemble, iteration or realization.
    pub class: FmuClass,
    /// Run identity.
    pub fmu: Fmu,
    /// Access.
    pub access: Access,
    /// Masterdata.
    pub masterdata: Masterdata,
    /// History of the document.
    #[serde(default)]
    pub tracklog: Vec<TracklogEvent>,
}

/// Metadata for one exported data object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    /// Schema URL.
    #[serde(rename = "$schema", default = "default_schema")]
    pub schema: String,
    /// Schema version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Source marker.
    #[serde(default = "default_source")]
    pub source: String,
    /// Shape class.
    pub class: FmuClass,
    /// Run identity; absent outside orchestrated runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fmu: Option<Fmu>,
    /// Access.
    pub access: Access,
    /// Masterdata.
    pub masterdata: Masterdata,
    /// History of the document.
    #[serde(default)]
    pub tracklog: Vec<TracklogEvent>,
    /// Data description.
    pub data: DataBlock,
    /// File placement.
    pub file: File,
    /// Display hints.
    #[serde(default)]
    pub display: Display,
    /// Set for preprocessed data awaiting re-export inside a run.
    #[serde(rename = "_preprocessed", default, skip_serializing_if = "Option::is_none")]
    pub preprocessed: Option<bool>,
}

/// Any metadata document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataDocument {
    /// Case record.
    Case(CaseMetadata),
    /// Ensemble record, including the legacy iteration class.
    Ensemble(ContextMetadata),
    /// Realization record.
    Realization(ContextMetadata),
    /// Exported data object.
    Object(Box<ObjectMetadata>),
}

impl MetadataDocument {
    /// Record class.
    #[must_use]
    pub fn class(&self) -> FmuClass {
        match self {
            Self::Case(m) => m.class,
            Self::Ensemble(m) | Self::Realization(m) => m.class,
            Self::Object(m) => m.class,
        }
    }

    /// The object document, if this is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectMetadata> {
        match self {
            Self::Object(m) => Some(&**m),
            _ => None,
        }
    }

    /// Tracklog events.
    #[must_use]
    pub fn tracklog(&self) -> &[TracklogEvent] {
        match self {
            Self::Case(m) => &m.tracklog,
            Self::Ensemble(m) | Self::Realization(m) => &m.tracklog,
            Self::Object(m) => &m.tracklog,
        }
    }

    /// Appends a tracklog event stamped now.
    pub fn add_tracklog_event(&mut self, event: TracklogEventType, user: impl Into<String>) {
        let entry = TracklogEvent::now(event, user, None);
        match self {
            Self::Case(m) => m.tracklog.push(entry),
            Self::Ensemble(m) | Self::Realization(m) => m.tracklog.push(entry),
            Self::Object(m) => m.tracklog.push(entry),
        }
    }

    /// Builds a document from a JSON value, dispatching on `class`.
    pub fn from_value(value: Value) -> Result<Self> {
        let class: FmuClass = value
            .get("class")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("class", "The metadata has no 'class' field"))?
            .parse()?;
        Ok(match class {
            FmuClass::Case => Self::Case(serde_json::from_value(value)?),
            FmuClass::Ensemble | FmuClass::Iteration => Self::Ensemble(serde_json::from_value(value)?),
            FmuClass::Realization => Self::Realization(serde_json::from_value(value)?),
            _ => Self::Object(Box::new(serde_json::from_value(value)?)),
        })
    }

    /// JSON value with null fields removed.
    pub fn to_value(&self) -> Result<Value> {
        Ok(prune_nulls(serde_json::to_value(self)?))
    }

    /// YAML text with null fields removed.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.to_value()?)?)
    }

    /// Parses a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text)?;
        Self::from_value(value)
    }
}

impl<'de> Deserialize<'de> for MetadataDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}
