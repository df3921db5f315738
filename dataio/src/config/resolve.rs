//! Per-field precedence resolution.
//!
//! Each field lists its candidate sources in precedence order. The first
//! candidate holding a value wins and only its diagnostic, if any, is
//! emitted.

use serde_json::Value;
use tracing::{debug, info};

use super::global::GlobalConfiguration;
use super::inputs::{DescriptionInput, LegacyAccess, VerticalDomainInput, WorkflowInput};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::enums::{Classification, DomainReference, VerticalDomain};
use crate::errors::{invalid, Result};
use crate::metadata::fields::Workflow;

/// One source for a field value.
#[derive(Debug, Clone)]
pub struct Candidate<T> {
    /// Where the value comes from, for logging.
    pub source: &'static str,
    /// The value, if this source provided one.
    pub value: Option<T>,
    /// Emitted when this candidate wins.
    pub diagnostic: Option<Diagnostic>,
}

impl<T> Candidate<T> {
    /// A candidate without diagnostic.
    #[must_use]
    pub const fn new(source: &'static str, value: Option<T>) -> Self {
        Self {
            source,
            value,
            diagnostic: None,
        }
    }

    /// A candidate that always has a value.
    #[must_use]
    pub const fn fallback(source: &'static str, value: T) -> Self {
        Self::new(source, Some(value))
    }

    /// Attaches a diagnostic emitted if this candidate wins.
    #[must_use]
    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostic = Some(diagnostic);
        self
    }
}

/// Returns the first present value and its source.
pub fn first_present<T>(
    candidates: impl IntoIterator<Item = Candidate<T>>,
    sink: &dyn DiagnosticSink,
) -> Option<(&'static str, T)> {
    let winner = candidates.into_iter().find(|c| c.value.is_some())?;
    debug!(source = winner.source, "Resolved field from candidate");
    if let Some(diagnostic) = winner.diagnostic {
        sink.emit(diagnostic);
    }
    winner.value.map(|v| (winner.source, v))
}

/// Resolves the classification.
///
/// Order: explicit input, legacy `access_ssdl.access_level`, static
/// configuration, `internal`. A resolved `asset` becomes `restricted`.
pub fn resolve_classification(
    input: Option<&str>,
    legacy: Option<&LegacyAccess>,
    config: Option<&GlobalConfiguration>,
    sink: &dyn DiagnosticSink,
) -> Result<Classification> {
    let parse = |s: Option<&str>| s.map(str::parse::<Classification>).transpose();
    let legacy_level = legacy
        .and_then(|l| l.access_level.as_deref())
        .filter(|s| !s.is_empty());

    let candidates = [
        Candidate::new("input", parse(input)?),
        Candidate::new("access_ssdl", parse(legacy_level)?),
        Candidate::new("config", config.map(GlobalConfiguration::classification)),
        Candidate::fallback("default", Classification::Internal),
    ];
    let (source, classification) =
        first_present(candidates, sink).unwrap_or(("default", Classification::Internal));
    info!(source, %classification, "Classification resolved");

    if classification == Classification::Asset {
        let message = if source == "access_ssdl" {
            "The 'access_ssdl' argument is deprecated and will be removed in the future, and \
             the value 'asset' for access.ssdl.access_level is deprecated. Use the \
             'classification' argument with 'restricted' instead."
        } else {
            "The value 'asset' for access.ssdl.access_level is deprecated. Please use \
             'restricted' in input arguments or global variables to silence this warning."
        };
        sink.emit(Diagnostic::deprecation(message));
        return Ok(Classification::Restricted);
    }
    Ok(classification)
}

/// Resolves `rep_include`.
///
/// Order: explicit input, a truthy legacy `access_ssdl.rep_include`, static
/// configuration `access.ssdl.rep_include`, `false`.
pub fn resolve_rep_include(
    input: Option<bool>,
    legacy: Option<&LegacyAccess>,
    config: Option<&GlobalConfiguration>,
    sink: &dyn DiagnosticSink,
) -> bool {
    let candidates = [
        Candidate::new("input", input),
        Candidate::new("access_ssdl", legacy.and_then(|l| l.rep_include).filter(|v| *v)),
        Candidate::new(
            "config",
            config.and_then(|c| c.access.ssdl).and_then(|s| s.rep_include),
        ),
        Candidate::fallback("default", false),
    ];
    first_present(candidates, sink).is_some_and(|(_, v)| v)
}

/// Resolves vertical domain and reference.
///
/// The legacy `{domain: reference}` mapping supplies both values.
pub fn resolve_vertical_domain(
    input: &VerticalDomainInput,
    domain_reference: &str,
    sink: &dyn DiagnosticSink,
) -> Result<(VerticalDomain, DomainReference)> {
    let legacy = match input {
        VerticalDomainInput::Legacy(map) => map.iter().next().map(|(domain, reference)| {
            let reference = match reference {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (domain.clone(), reference)
        }),
        VerticalDomainInput::Name(_) => None,
    };
    let current = match input {
        VerticalDomainInput::Name(name) => Some((name.clone(), domain_reference.to_string())),
        VerticalDomainInput::Legacy(_) => None,
    };

    let candidates = [
        Candidate::new("vertical_domain mapping", legacy).with_diagnostic(Diagnostic::deprecation(
            "Using the 'vertical_domain' argument to set both the vertical domain and the \
             reference will be deprecated. Set the 'vertical_domain' argument to a string with \
             value either 'time'/'depth', and provide the domain reference through the \
             'domain_reference' argument instead.",
        )),
        Candidate::new("input", current),
    ];
    let (_, (domain, reference)) = first_present(candidates, sink)
        .ok_or_else(|| invalid("vertical_domain", "The 'vertical_domain' mapping is empty"))?;
    Ok((domain.parse()?, reference.parse()?))
}

/// Resolves the workflow reference.
pub fn resolve_workflow(input: Option<&WorkflowInput>, sink: &dyn DiagnosticSink) -> Option<Workflow> {
    let legacy = match input {
        Some(WorkflowInput::Legacy(w)) => Some(w.clone()),
        _ => None,
    };
    let current = match input {
        Some(WorkflowInput::Reference(r)) => Some(Workflow {
            reference: r.clone(),
        }),
        _ => None,
    };
    let candidates = [
        Candidate::new("workflow mapping", legacy).with_diagnostic(Diagnostic::deprecation(
            "The 'workflow' argument should be given as a string. Support for dictionary will \
             be deprecated.",
        )),
        Candidate::new("input", current),
    ];
    first_present(candidates, sink).map(|(_, w)| w)
}

/// Normalises the description to a list; empty input gives `None`.
#[must_use]
pub fn resolve_description(input: Option<&DescriptionInput>) -> Option<Vec<String>> {
    match input? {
        DescriptionInput::One(line) if line.is_empty() => None,
        DescriptionInput::One(line) => Some(vec![line.clone()]),
        DescriptionInput::Many(lines) if lines.is_empty() => None,
        DescriptionInput::Many(lines) => Some(lines.clone()),
    }
}
