//! The fully resolved, immutable export configuration.

use serde_json::{Map, Value};
use tracing::{debug, info};

use super::content::{resolve_content, ContentPayload};
use super::global::{config_from_env, resolve_global_config, GlobalConfiguration};
use super::inputs::{ExportInput, TimedataInput};
use super::resolve::{
    resolve_classification, resolve_description, resolve_rep_include, resolve_vertical_domain,
    resolve_workflow,
};
use crate::diagnostics::{Diagnostic, DiagnosticSink, LoggingDiagnosticSink};
use crate::enums::{Classification, Content, DomainReference, FmuContext, VerticalDomain};
use crate::errors::{invalid, Result};
use crate::metadata::fields::{Display, Workflow};
use crate::runcontext::{resolve_fmu_context, Environment, RunContext, RunContextResolver};
use crate::utils::timestamps::parse_datestr;

/// Naming and placement settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingConfig {
    /// Object name; derived from the object when empty.
    pub name: String,
    /// Tag name.
    pub tagname: String,
    /// Replaces the shape subfolder when set.
    pub forcefolder: String,
    /// Extra subfolder.
    pub subfolder: String,
    /// Parent name.
    pub parent: String,
    /// Render time markers oldest first in the file name.
    pub filename_timedata_reverse: bool,
    /// Path to an already exported geometry.
    pub geometry: Option<std::path::PathBuf>,
}

/// File format choices for shapes with more than one format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Index columns.
    pub table_index: Option<Vec<String>>,
    /// Table format.
    pub table_fformat: String,
    /// Polygons format.
    pub polygons_fformat: String,
    /// Points format.
    pub points_fformat: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            table_index: None,
            table_fformat: "parquet".to_string(),
            polygons_fformat: "parquet".to_string(),
            points_fformat: "parquet".to_string(),
        }
    }
}

/// Boolean export flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportFlags {
    /// Preprocessed data.
    pub preprocessed: bool,
    /// Prediction.
    pub is_prediction: bool,
    /// Observation.
    pub is_observation: bool,
    /// Undefined values mean zero.
    pub undef_is_zero: bool,
}

impl Default for ExportFlags {
    fn default() -> Self {
        Self {
            preprocessed: false,
            is_prediction: true,
            is_observation: false,
            undef_is_zero: false,
        }
    }
}

/// A validated time marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedataEntry {
    /// Date as `YYYYMMDD`.
    pub date: String,
    /// Optional label.
    pub label: Option<String>,
}

fn parse_timedata(input: Option<&[TimedataInput]>) -> Result<Option<Vec<TimedataEntry>>> {
    let Some(items) = input.filter(|i| !i.is_empty()) else {
        return Ok(None);
    };
    if items.len() > 2 {
        return Err(invalid(
            "timedata",
            "The 'timedata' argument can maximum contain two dates",
        ));
    }
    items
        .iter()
        .map(|item| {
            let (date, label) = match item {
                TimedataInput::Date(d) => (Some(d.clone()), None),
                TimedataInput::Labelled(parts) => {
                    let mut parts = parts.iter().cloned();
                    (parts.next().flatten(), parts.next().flatten())
                }
            };
            let date = date.ok_or_else(|| invalid("timedata", "A 'timedata' entry is missing its date"))?;
            parse_datestr(&date)?;
            Ok(TimedataEntry { date, label })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// The resolved configuration for one export call.
///
/// Built once, either from raw [`ExportInput`] or through
/// [`ExportConfigBuilder`], and only read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    content: Option<Content>,
    content_metadata: Option<ContentPayload>,
    naming: NamingConfig,
    vertical_domain: VerticalDomain,
    domain_reference: DomainReference,
    display: Display,
    workflow: Option<Workflow>,
    description: Option<Vec<String>>,
    classification: Classification,
    rep_include: bool,
    table: TableConfig,
    timedata: Option<Vec<TimedataEntry>>,
    flags: ExportFlags,
    unit: String,
    config: Option<GlobalConfiguration>,
    runcontext: RunContext,
}

impl ExportConfig {
    /// Starts a builder.
    #[must_use]
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder::new()
    }

    /// Resolves raw input against a captured environment.
    ///
    /// Fails on invalid enum values, missing mandatory payloads or invalid
    /// legacy combinations. An unusable static configuration is reported
    /// through `sink` and leaves [`Self::config`] empty.
    pub fn resolve(input: &ExportInput, env: &Environment, sink: &dyn DiagnosticSink) -> Result<Self> {
        input.check_deprecations(sink)?;

        let (vertical_domain, domain_reference) =
            resolve_vertical_domain(&input.vertical_domain, &input.domain_reference, sink)?;

        let raw_config = match &input.config {
            Some(raw) => raw.clone(),
            None => config_from_env(env)?.unwrap_or_else(|| Value::Object(Map::new())),
        };
        let config = resolve_global_config(&raw_config, sink);

        let resolved = resolve_fmu_context(
            input.fmu_context.as_deref(),
            input.preprocessed,
            env.fmu_context(),
            sink,
        )?;
        let runcontext = RunContextResolver::new(env, sink)
            .with_casepath(input.casepath.clone())
            .with_fmu_context(resolved.fmu_context)
            .resolve()?;

        let content = resolve_content(input.content.as_ref(), input.content_metadata.as_ref(), sink)?;
        let vertical_domain = force_vertical_domain(content.content, vertical_domain, sink);

        let classification = resolve_classification(
            input.classification.as_deref(),
            input.access_ssdl.as_ref(),
            config.as_ref(),
            sink,
        )?;
        let rep_include =
            resolve_rep_include(input.rep_include, input.access_ssdl.as_ref(), config.as_ref(), sink);

        let timedata = parse_timedata(input.timedata.as_deref())?;

        debug!(content = ?content.content, %classification, "Export config resolved");

        Ok(Self {
            content: content.content,
            content_metadata: content.payload,
            naming: NamingConfig {
                name: input.name.clone(),
                tagname: input.tagname.clone(),
                forcefolder: input.forcefolder.clone(),
                subfolder: input.subfolder.clone(),
                parent: input.parent.clone(),
                filename_timedata_reverse: input.filename_timedata_reverse,
                geometry: input.geometry.clone(),
            },
            vertical_domain,
            domain_reference,
            display: Display {
                name: input.display_name.clone(),
            },
            workflow: resolve_workflow(input.workflow.as_ref(), sink),
            description: resolve_description(input.description.as_ref()),
            classification,
            rep_include,
            table: TableConfig {
                table_index: input.table_index.clone(),
                table_fformat: input.table_fformat.clone(),
                polygons_fformat: input.polygons_fformat.clone(),
                points_fformat: input.points_fformat.clone(),
            },
            timedata,
            flags: ExportFlags {
                preprocessed: resolved.preprocessed,
                is_prediction: input.is_prediction,
                is_observation: input.is_observation,
                undef_is_zero: input.undef_is_zero,
            },
            unit: input.unit.clone().unwrap_or_default(),
            config,
            runcontext,
        })
    }

    /// Content kind; `None` when unset.
    #[must_use]
    pub const fn content(&self) -> Option<Content> {
        self.content
    }

    /// Content payload.
    #[must_use]
    pub const fn content_metadata(&self) -> Option<&ContentPayload> {
        self.content_metadata.as_ref()
    }

    /// Naming settings.
    #[must_use]
    pub const fn naming(&self) -> &NamingConfig {
        &self.naming
    }

    /// Vertical domain.
    #[must_use]
    pub const fn vertical_domain(&self) -> VerticalDomain {
        self.vertical_domain
    }

    /// Vertical reference.
    #[must_use]
    pub const fn domain_reference(&self) -> DomainReference {
        self.domain_reference
    }

    /// Display settings.
    #[must_use]
    pub const fn display(&self) -> &Display {
        &self.display
    }

    /// Workflow reference.
    #[must_use]
    pub const fn workflow(&self) -> Option<&Workflow> {
        self.workflow.as_ref()
    }

    /// Description lines.
    #[must_use]
    pub fn description(&self) -> Option<&[String]> {
        self.description.as_deref()
    }

    /// Classification.
    #[must_use]
    pub const fn classification(&self) -> Classification {
        self.classification
    }

    /// Include in reporting.
    #[must_use]
    pub const fn rep_include(&self) -> bool {
        self.rep_include
    }

    /// Table and format settings.
    #[must_use]
    pub const fn table(&self) -> &TableConfig {
        &self.table
    }

    /// Time markers in input order.
    #[must_use]
    pub fn timedata(&self) -> Option<&[TimedataEntry]> {
        self.timedata.as_deref()
    }

    /// Time markers as (older, newer).
    #[must_use]
    pub fn time_markers(&self) -> (Option<&TimedataEntry>, Option<&TimedataEntry>) {
        match self.timedata.as_deref() {
            Some([only]) => (Some(only), None),
            Some([a, b]) if b.date < a.date => (Some(b), Some(a)),
            Some([a, b]) => (Some(a), Some(b)),
            _ => (None, None),
        }
    }

    /// Flags.
    #[must_use]
    pub const fn flags(&self) -> ExportFlags {
        self.flags
    }

    /// Unit.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Static project configuration, if valid.
    #[must_use]
    pub const fn config(&self) -> Option<&GlobalConfiguration> {
        self.config.as_ref()
    }

    /// Run context.
    #[must_use]
    pub const fn runcontext(&self) -> &RunContext {
        &self.runcontext
    }

    /// Effective context.
    #[must_use]
    pub const fn fmu_context(&self) -> Option<FmuContext> {
        self.runcontext.fmu_context()
    }

    /// Copy with an explicit ensemble name.
    #[must_use]
    pub fn with_ensemble_name(&self, name: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.runcontext = next.runcontext.with_ensemble_name(name);
        next
    }

    /// Copy with another polygons format.
    #[must_use]
    pub fn with_polygons_file_format(&self, format: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.table.polygons_fformat = format.into();
        next
    }
}

/// `depth` and `time` content pin the vertical domain.
fn force_vertical_domain(
    content: Option<Content>,
    requested: VerticalDomain,
    sink: &dyn DiagnosticSink,
) -> VerticalDomain {
    let forced = match content {
        Some(Content::Depth) => VerticalDomain::Depth,
        Some(Content::Time) => VerticalDomain::Time,
        _ => return requested,
    };
    if forced != requested {
        sink.emit(Diagnostic::warning(format!(
            "Content '{forced}' requires vertical_domain='{forced}', the given value \
             '{requested}' is replaced."
        )));
    }
    forced
}

/// Builds an [`ExportConfig`] from already validated values.
#[derive(Debug, Clone)]
pub struct ExportConfigBuilder {
    content: Option<Content>,
    content_metadata: Option<ContentPayload>,
    naming: NamingConfig,
    vertical_domain: VerticalDomain,
    domain_reference: DomainReference,
    display: Display,
    workflow: Option<Workflow>,
    description: Option<Vec<String>>,
    classification: Classification,
    rep_include: bool,
    table: TableConfig,
    timedata: Option<Vec<TimedataEntry>>,
    flags: ExportFlags,
    unit: String,
    config: Option<GlobalConfiguration>,
    runcontext: Option<RunContext>,
}

impl Default for ExportConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportConfigBuilder {
    /// Builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            content: None,
            content_metadata: None,
            naming: NamingConfig::default(),
            vertical_domain: VerticalDomain::Depth,
            domain_reference: DomainReference::Msl,
            display: Display::default(),
            workflow: None,
            description: None,
            classification: Classification::Internal,
            rep_include: false,
            table: TableConfig::default(),
            timedata: None,
            flags: ExportFlags::default(),
            unit: String::new(),
            config: None,
            runcontext: None,
        }
    }

    /// Sets content and payload.
    #[must_use]
    pub fn content(mut self, content: Content, payload: Option<ContentPayload>) -> Self {
        self.content = Some(content);
        self.content_metadata = payload;
        self
    }

    /// Sets naming.
    #[must_use]
    pub fn naming(mut self, naming: NamingConfig) -> Self {
        self.naming = naming;
        self
    }

    /// Sets vertical domain and reference.
    #[must_use]
    pub const fn domain(mut self, vertical_domain: VerticalDomain, domain_reference: DomainReference) -> Self {
        self.vertical_domain = vertical_domain;
        self.domain_reference = domain_reference;
        self
    }

    /// Sets display settings.
    #[must_use]
    pub fn display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    /// Sets the workflow.
    #[must_use]
    pub fn workflow(mut self, workflow: Option<Workflow>) -> Self {
        self.workflow = workflow;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: Option<Vec<String>>) -> Self {
        self.description = description;
        self
    }

    /// Sets classification and `rep_include`.
    #[must_use]
    pub const fn access(mut self, classification: Classification, rep_include: bool) -> Self {
        self.classification = classification;
        self.rep_include = rep_include;
        self
    }

    /// Sets table settings.
    #[must_use]
    pub fn table_config(mut self, table: TableConfig) -> Self {
        self.table = table;
        self
    }

    /// Sets time markers.
    #[must_use]
    pub fn timedata(mut self, timedata: Option<Vec<TimedataEntry>>) -> Self {
        self.timedata = timedata;
        self
    }

    /// Sets flags.
    #[must_use]
    pub const fn flags(mut self, flags: ExportFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the unit.
    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Sets the static configuration.
    #[must_use]
    pub fn global_config(mut self, config: Option<GlobalConfiguration>) -> Self {
        self.config = config;
        self
    }

    /// Sets the run context; detected from the process environment otherwise.
    #[must_use]
    pub fn run_context(mut self, runcontext: RunContext) -> Self {
        self.runcontext = Some(runcontext);
        self
    }

    /// Builds the configuration. Content must be set.
    pub fn build(self) -> Result<ExportConfig> {
        let content = self
            .content
            .ok_or_else(|| invalid("content", "content must be set before building"))?;

        let mut flags = self.flags;
        let runcontext = match self.runcontext {
            Some(rc) => rc,
            None => {
                info!("Detecting run context from the process environment");
                let env = Environment::capture()?;
                let sink = LoggingDiagnosticSink::default();
                let resolved = resolve_fmu_context(None, flags.preprocessed, env.fmu_context(), &sink)?;
                flags.preprocessed = resolved.preprocessed;
                RunContextResolver::new(&env, &sink)
                    .with_fmu_context(resolved.fmu_context)
                    .resolve()?
            }
        };

        Ok(ExportConfig {
            content: Some(content).filter(|c| *c != Content::Unset),
            content_metadata: self.content_metadata,
            naming: self.naming,
            vertical_domain: self.vertical_domain,
            domain_reference: self.domain_reference,
            display: self.display,
            workflow: self.workflow,
            description: self.description,
            classification: self.classification,
            rep_include: self.rep_include,
            table: self.table,
            timedata: self.timedata,
            flags,
            unit: self.unit,
            config: self.config,
            runcontext,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingDiagnosticSink, DiagnosticKind};
    use crate::testing::{global_config, global_config_value};
    use serde_json::json;

    fn outside_env() -> Environment {
        Environment::new("/work/project")
    }

    #[test]
    fn test_resolve_minimal_input() {
        let sink = CollectingDiagnosticSink::new();
        let input = ExportInput::new()
            .with_config(global_config_value())
            .with_content("depth")
            .with_name("TopVolantis");
        let cfg = ExportConfig::resolve(&input, &outside_env(), &sink).unwrap();
        assert_eq!(cfg.content(), Some(Content::Depth));
        assert_eq!(cfg.naming().name, "TopVolantis");
        assert_eq!(cfg.vertical_domain(), VerticalDomain::Depth);
        assert_eq!(cfg.domain_reference(), DomainReference::Msl);
        assert_eq!(cfg.classification(), Classification::Internal);
        assert!(cfg.config().is_some());
        assert!(cfg.fmu_context().is_none());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_missing_config_keeps_export_without_metadata() {
        let sink = CollectingDiagnosticSink::new();
        let input = ExportInput::new().with_content("depth");
        let cfg = ExportConfig::resolve(&input, &outside_env(), &sink).unwrap();
        assert!(cfg.config().is_none());
        assert!(sink.contains("lacking masterdata"));
    }

    #[test]
    fn test_depth_content_forces_depth_domain() {
        let sink = CollectingDiagnosticSink::new();
        let mut input = ExportInput::new()
            .with_config(global_config_value())
            .with_content("depth");
        input.vertical_domain = crate::config::VerticalDomainInput::Name("time".into());
        let cfg = ExportConfig::resolve(&input, &outside_env(), &sink).unwrap();
        assert_eq!(cfg.vertical_domain(), VerticalDomain::Depth);
        assert_eq!(sink.of_kind(DiagnosticKind::UserWarning).len(), 1);
    }

    #[test]
    fn test_timedata_validation() {
        let sink = CollectingDiagnosticSink::new();
        let base = ExportInput::new().with_config(global_config_value()).with_content("depth");

        let ok = base.clone().with_timedata([("20200101", "monitor"), ("20180101", "base")]);
        let cfg = ExportConfig::resolve(&ok, &outside_env(), &sink).unwrap();
        let t = cfg.timedata().unwrap();
        assert_eq!(t[0].date, "20200101");
        assert_eq!(t[1].label.as_deref(), Some("base"));
        let (older, newer) = cfg.time_markers();
        assert_eq!(older.unwrap().date, "20180101");
        assert_eq!(newer.unwrap().date, "20200101");

        let too_many = base.clone().with_timedata(["20200101", "20190101", "20180101"]);
        assert!(ExportConfig::resolve(&too_many, &outside_env(), &sink).unwrap_err().is_validation());

        let bad = base.with_timedata(["2020-01-01"]);
        assert!(ExportConfig::resolve(&bad, &outside_env(), &sink).is_err());
    }

    #[test]
    fn test_legacy_access_is_honoured() {
        let sink = CollectingDiagnosticSink::new();
        let mut input = ExportInput::new().with_config(global_config_value()).with_content("depth");
        input.access_ssdl = Some(crate::config::LegacyAccess {
            access_level: Some("restricted".into()),
            rep_include: Some(true),
        });
        let cfg = ExportConfig::resolve(&input, &outside_env(), &sink).unwrap();
        assert_eq!(cfg.classification(), Classification::Restricted);
        assert!(cfg.rep_include());
        assert_eq!(sink.of_kind(DiagnosticKind::Deprecation).len(), 1);
    }

    #[test]
    fn test_payload_content_requires_metadata() {
        let sink = CollectingDiagnosticSink::new();
        let input = ExportInput::new()
            .with_config(global_config_value())
            .with_content("fluid_contact");
        assert!(ExportConfig::resolve(&input, &outside_env(), &sink).unwrap_err().is_validation());

        let input = input.with_content_metadata(json!({"contact": "owc"}));
        let cfg = ExportConfig::resolve(&input, &outside_env(), &sink).unwrap();
        assert!(matches!(cfg.content_metadata(), Some(ContentPayload::FluidContact(_))));
    }

    #[test]
    fn test_builder_defaults() {
        let sink = CollectingDiagnosticSink::new();
        let env = outside_env();
        let rc = RunContextResolver::new(&env, &sink).resolve().unwrap();
        let cfg = ExportConfig::builder()
            .content(Content::Depth, None)
            .global_config(Some(global_config()))
            .run_context(rc)
            .build()
            .unwrap();
        assert_eq!(cfg.table().table_fformat, "parquet");
        assert!(cfg.flags().is_prediction);
        assert_eq!(cfg.classification(), Classification::Internal);
        assert!(!cfg.rep_include());
        assert_eq!(cfg.unit(), "");

        let polys = cfg.with_polygons_file_format("csv");
        assert_eq!(polys.table().polygons_fformat, "csv");
        assert_eq!(cfg.table().polygons_fformat, "parquet");
    }

    #[test]
    fn test_builder_requires_content() {
        let sink = CollectingDiagnosticSink::new();
        let env = outside_env();
        let rc = RunContextResolver::new(&env, &sink).resolve().unwrap();
        let err = ExportConfig::builder().run_context(rc).build().unwrap_err();
        assert!(err.is_validation());
    }
}
