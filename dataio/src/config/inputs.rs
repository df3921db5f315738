//! Raw export arguments as given by the caller.
//!
//! [`ExportInput`] accepts every form the export API has ever accepted,
//! including legacy mappings and arguments that no longer have an effect.
//! Nothing here is validated; see [`super::ExportConfig::resolve`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

use super::content::ContentInput;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::errors::{invalid, Result};
use crate::metadata::fields::Workflow;

/// Legacy `access_ssdl` argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyAccess {
    /// Classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<String>,
    /// Include in reporting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep_include: Option<bool>,
}

impl LegacyAccess {
    /// True when the block carries the legacy `asset` level.
    pub fn is_asset(&self) -> bool {
        self.access_level.as_deref() == Some("asset")
    }
}

/// `vertical_domain` argument: a name or the legacy `{domain: reference}` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerticalDomainInput {
    /// Current form.
    Name(String),
    /// Legacy form.
    Legacy(Map<String, Value>),
}

impl Default for VerticalDomainInput {
    fn default() -> Self {
        Self::Name("depth".to_string())
    }
}

/// `workflow` argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkflowInput {
    /// Current form.
    Reference(String),
    /// Legacy `{reference: ...}` mapping.
    Legacy(Workflow),
}

/// `description` argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DescriptionInput {
    /// A single line.
    One(String),
    /// Several lines.
    Many(Vec<String>),
}

/// One `timedata` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimedataInput {
    /// `"YYYYMMDD"`.
    Date(String),
    /// `["YYYYMMDD", label]`.
    Labelled(Vec<Option<String>>),
}

impl From<&str> for TimedataInput {
    fn from(s: &str) -> Self {
        Self::Date(s.to_string())
    }
}

impl From<(&str, &str)> for TimedataInput {
    fn from((date, label): (&str, &str)) -> Self {
        Self::Labelled(vec![Some(date.to_string()), Some(label.to_string())])
    }
}

/// Raw export arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportInput {
    /// Static project configuration as a raw tree.
    pub config: Option<Value>,
    /// Content kind.
    pub content: Option<ContentInput>,
    /// Content payload.
    pub content_metadata: Option<Value>,
    /// Object name; derived from the object when empty.
    pub name: String,
    /// Tag name.
    pub tagname: String,
    /// Parent name, e.g. the grid a property belongs to.
    pub parent: String,
    /// Replaces the shape subfolder.
    pub forcefolder: String,
    /// Extra subfolder below the shape subfolder.
    pub subfolder: String,
    /// Proposed case root.
    pub casepath: Option<PathBuf>,
    /// Requested context.
    pub fmu_context: Option<String>,
    /// Preprocessed data flag.
    pub preprocessed: bool,
    /// Legacy access block.
    pub access_ssdl: Option<LegacyAccess>,
    /// Classification.
    pub classification: Option<String>,
    /// Include in reporting.
    pub rep_include: Option<bool>,
    /// Vertical domain.
    pub vertical_domain: VerticalDomainInput,
    /// Vertical reference.
    pub domain_reference: String,
    /// Workflow reference.
    pub workflow: Option<WorkflowInput>,
    /// Description.
    pub description: Option<DescriptionInput>,
    /// Time markers.
    pub timedata: Option<Vec<TimedataInput>>,
    /// Table index columns.
    pub table_index: Option<Vec<String>>,
    /// Format for row-oriented and columnar tables.
    pub table_fformat: String,
    /// Format for polygons.
    pub polygons_fformat: String,
    /// Format for points.
    pub points_fformat: String,
    /// Unit.
    pub unit: Option<String>,
    /// Whether undefined values mean zero.
    pub undef_is_zero: bool,
    /// Prediction flag.
    pub is_prediction: bool,
    /// Observation flag.
    pub is_observation: bool,
    /// Already exported geometry the object refers to.
    pub geometry: Option<PathBuf>,
    /// Display name.
    pub display_name: Option<String>,
    /// Render time markers oldest first in the file name.
    pub filename_timedata_reverse: bool,
    /// No effect.
    pub runpath: Option<PathBuf>,
    /// No effect.
    pub grid_model: Option<String>,
    /// No effect.
    pub realization: Option<i64>,
    /// No effect.
    pub verbosity: Option<String>,
    /// No effect.
    pub include_ertjobs: bool,
    /// No effect; use `domain_reference`.
    pub depth_reference: Option<String>,
    /// No effect.
    pub reuse_metadata_rule: Option<String>,
    /// No effect.
    pub meta_format: Option<String>,
}

impl Default for ExportInput {
    fn default() -> Self {
        Self {
            config: None,
            content: None,
            content_metadata: None,
            name: String::new(),
            tagname: String::new(),
            parent: String::new(),
            forcefolder: String::new(),
            subfolder: String::new(),
            casepath: None,
            fmu_context: None,
            preprocessed: false,
            access_ssdl: None,
            classification: None,
            rep_include: None,
            vertical_domain: VerticalDomainInput::default(),
            domain_reference: "msl".to_string(),
            workflow: None,
            description: None,
            timedata: None,
            table_index: None,
            table_fformat: "parquet".to_string(),
            polygons_fformat: "parquet".to_string(),
            points_fformat: "parquet".to_string(),
            unit: None,
            undef_is_zero: false,
            is_prediction: true,
            is_observation: false,
            geometry: None,
            display_name: None,
            filename_timedata_reverse: false,
            runpath: None,
            grid_model: None,
            realization: None,
            verbosity: None,
            include_ertjobs: false,
            depth_reference: None,
            reuse_metadata_rule: None,
            meta_format: None,
        }
    }
}

impl ExportInput {
    /// Creates input with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the raw static configuration.
    #[must_use]
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<ContentInput>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the content payload.
    #[must_use]
    pub fn with_content_metadata(mut self, payload: Value) -> Self {
        self.content_metadata = Some(payload);
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the tag name.
    #[must_use]
    pub fn with_tagname(mut self, tagname: impl Into<String>) -> Self {
        self.tagname = tagname.into();
        self
    }

    /// Sets the parent.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = parent.into();
        self
    }

    /// Sets the proposed case root.
    #[must_use]
    pub fn with_casepath(mut self, casepath: impl Into<PathBuf>) -> Self {
        self.casepath = Some(casepath.into());
        self
    }

    /// Requests a context.
    #[must_use]
    pub fn with_fmu_context(mut self, context: impl Into<String>) -> Self {
        self.fmu_context = Some(context.into());
        self
    }

    /// Sets the classification.
    #[must_use]
    pub fn with_classification(mut self, classification: impl Into<String>) -> Self {
        self.classification = Some(classification.into());
        self
    }

    /// Sets time markers.
    #[must_use]
    pub fn with_timedata<T: Into<TimedataInput>>(mut self, timedata: impl IntoIterator<Item = T>) -> Self {
        self.timedata = Some(timedata.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the table index.
    #[must_use]
    pub fn with_table_index<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.table_index = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Emits diagnostics for legacy and no-effect arguments.
    ///
    /// Fails when the legacy access block is combined with its replacements.
    pub fn check_deprecations(&self, sink: &dyn DiagnosticSink) -> Result<()> {
        if let Some(legacy) = &self.access_ssdl {
            // An `asset` level is reported once, by the classification resolver.
            if !legacy.is_asset() {
                sink.emit(Diagnostic::deprecation(
                    "The 'access_ssdl' argument is deprecated and will be removed in the future. \
                     Use the more explicit 'classification' and 'rep_include' arguments instead.",
                ));
            }
            if self.classification.is_some() || self.rep_include.is_some() {
                return Err(invalid(
                    "access_ssdl",
                    "Using the 'classification' and/or 'rep_include' arguments, in combination \
                     with the (legacy) 'access_ssdl' argument is not supported.",
                ));
            }
        }

        if matches!(self.content, Some(ContentInput::Legacy(_))) {
            sink.emit(Diagnostic::deprecation(
                "Using the 'content' argument to set both the content and the content metadata \
                 will be deprecated. Set the 'content' argument to a valid content string, and \
                 provide the extra information through the 'content_metadata' argument instead.",
            ));
        }

        for message in self.no_effect_messages() {
            sink.emit(Diagnostic::warning(message));
        }
        Ok(())
    }

    fn no_effect_messages(&self) -> Vec<&'static str> {
        let mut messages = Vec::new();
        if self.runpath.is_some() {
            messages.push("The 'runpath' key has currently no function. Use 'casepath' instead!");
        }
        if self.grid_model.is_some() {
            messages.push("The 'grid_model' key has currently no function.");
        }
        if self.realization.is_some() {
            messages.push(
                "The 'realization' key is deprecated and has no effect. Please remove it from \
                 the argument list.",
            );
        }
        if self.verbosity.is_some() {
            messages.push(
                "Using the 'verbosity' key is now deprecated and will have no effect. Set the \
                 logging level through the tracing subscriber instead.",
            );
        }
        if self.include_ertjobs {
            messages.push("The 'include_ertjobs' option is deprecated and should be removed.");
        }
        if self.depth_reference.is_some() {
            messages.push(
                "The 'depth_reference' key has no function. Use the 'domain_reference' key \
                 instead to set the reference for the given 'vertical_domain'.",
            );
        }
        if self.reuse_metadata_rule.is_some() {
            messages.push(
                "The 'reuse_metadata_rule' key is deprecated and has no effect. Please remove \
                 it from the argument list.",
            );
        }
        if self.meta_format.is_some() {
            messages.push(
                "The 'meta_format' option is deprecated and should be removed. Metadata will \
                 only be exported in yaml format.",
            );
        }
        messages
    }
}
