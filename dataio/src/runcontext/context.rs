//! Reconciles a requested context with the one the environment implies.

use tracing::{info, warn};

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::enums::FmuContext;
use crate::errors::{DataioError, ErrorInfo, Result, ValidationError};

/// A context name that used to be accepted and is now rejected.
const REMOVED_CASE_SYMLINK_REALIZATION: &str = "case_symlink_realization";

/// Outcome of context resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedContext {
    /// Effective context, `None` outside the orchestrator.
    pub fmu_context: Option<FmuContext>,
    /// Whether the object is preprocessed data.
    pub preprocessed: bool,
}

/// Resolves the effective context.
///
/// `requested` is the raw user value, `env_context` what the environment
/// markers imply.
pub fn resolve_fmu_context(
    requested: Option<&str>,
    preprocessed: bool,
    env_context: Option<FmuContext>,
    sink: &dyn DiagnosticSink,
) -> Result<ResolvedContext> {
    reject_removed_context(requested)?;
    let (requested, preprocessed) = upgrade_legacy_context(requested, preprocessed, sink);
    let fmu_context = effective_context(requested.as_deref(), env_context, sink)?;

    if preprocessed && fmu_context == Some(FmuContext::Realization) {
        return Err(DataioError::Validation(
            ValidationError::new(
                "Can't export preprocessed data in a fmu_context='realization'. \
                 Preprocessed data should be exported with fmu_context='case' or \
                 outside of FMU entirely, and then re-exported.",
            )
            .with_field("preprocessed"),
        ));
    }

    Ok(ResolvedContext {
        fmu_context,
        preprocessed,
    })
}

fn reject_removed_context(requested: Option<&str>) -> Result<()> {
    match requested {
        Some(value) if value.eq_ignore_ascii_case(REMOVED_CASE_SYMLINK_REALIZATION) => {
            Err(DataioError::Validation(
                ValidationError::new(
                    "fmu_context is set to 'case_symlink_realization', which is no longer a \
                     supported option. Recommended workflow is to export your data as \
                     preprocessed outside of FMU, and re-export the data with \
                     fmu_context='case' using a PRE_SIMULATION workflow.",
                )
                .with_field("fmu_context")
                .with_error_info(
                    ErrorInfo::new("DATAIO-CONTEXT-REMOVED", "Removed fmu_context value")
                        .with_fix_hint("Export as preprocessed, then re-export with fmu_context='case'"),
                ),
            ))
        }
        _ => Ok(()),
    }
}

fn upgrade_legacy_context(
    requested: Option<&str>,
    preprocessed: bool,
    sink: &dyn DiagnosticSink,
) -> (Option<String>, bool) {
    match requested {
        Some("preprocessed") => {
            sink.emit(Diagnostic::deprecation(
                "Using the 'fmu_context' argument with value 'preprocessed' is deprecated. \
                 Use the more explicit 'preprocessed' argument instead.",
            ));
            (None, true)
        }
        Some(value) if value.eq_ignore_ascii_case("iteration") => {
            (Some(FmuContext::Ensemble.to_string()), preprocessed)
        }
        Some(value) => (Some(value.to_lowercase()), preprocessed),
        None => (None, preprocessed),
    }
}

fn effective_context(
    requested: Option<&str>,
    env_context: Option<FmuContext>,
    sink: &dyn DiagnosticSink,
) -> Result<Option<FmuContext>> {
    let Some(requested) = requested else {
        info!(context = ?env_context, "fmu_context from environment");
        return Ok(env_context.map(|c| match c {
            FmuContext::Iteration => FmuContext::Ensemble,
            other => other,
        }));
    };

    let Some(env_context) = env_context else {
        warn!(
            requested = %requested,
            "Requested fmu_context but not running in FMU environment; context will be None"
        );
        sink.emit(Diagnostic::context_mismatch(format!(
            "Requested fmu_context={requested} but not running in FMU environment; \
             context will be None."
        )));
        return Ok(None);
    };

    let explicit: FmuContext = requested.parse()?;
    if explicit == FmuContext::Realization && env_context == FmuContext::Case {
        sink.emit(Diagnostic::context_mismatch(
            "fmu_context is set to 'realization', but unable to detect the runpath \
             from the environment. Did you mean fmu_context='case'?",
        ));
    }
    if explicit == FmuContext::Ensemble && env_context == FmuContext::Realization {
        sink.emit(Diagnostic::context_mismatch(
            "fmu_context is set to 'ensemble', but a realization environment was \
             detected. Did you mean fmu_context='realization'?",
        ));
    }

    info!(context = %explicit, "fmu_context set explicitly");
    Ok(Some(explicit))
}
