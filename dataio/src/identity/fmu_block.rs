//! Builds the `fmu` block from the run context and case metadata.

use std::path::Path;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{derive_entity_uuid, derive_iteration_uuid, derive_realization_uuid};
use crate::definitions::{CASE_METADATA_FILE, DEFAULT_ENSEMBLE_NAME, RESTART_PATH_ENVNAME};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::enums::{FmuContext, SimulationMode};
use crate::errors::{invalid, Result};
use crate::metadata::fields::{
    Context, Ensemble, Entity, Ert, Experiment, Fmu, Model, Realization, Workflow,
};
use crate::metadata::CaseMetadata;
use crate::runcontext::{casepath_has_metadata, RunContext};

/// Restart source ensemble UUID for a resolved restart path.
///
/// The restart case is located like a normal case root: two levels up with
/// the folder name as ensemble, else one level up with the default ensemble
/// name. Any failure is reported and yields `None`.
pub fn derive_restart_from(restart_path: &Path, sink: &dyn DiagnosticSink) -> Option<Uuid> {
    debug!(path = %restart_path.display(), "Detected a restart run");
    let two_up = restart_path.parent().and_then(Path::parent);
    let one_up = restart_path.parent();

    let (casepath, ensemble_name) = if let Some(case) = two_up.filter(|p| casepath_has_metadata(p)) {
        let name = restart_path.file_name()?.to_string_lossy().into_owned();
        (case, name)
    } else if let Some(case) = one_up.filter(|p| casepath_has_metadata(p)) {
        (case, DEFAULT_ENSEMBLE_NAME.to_string())
    } else {
        sink.emit(Diagnostic::warning(format!(
            "Environment variable {RESTART_PATH_ENVNAME} resolves to the path {} which is non \
             existing or points to a run without case metadata. Metadata 'restart_from' will \
             remain empty.",
            restart_path.display()
        )));
        return None;
    };

    let metafile = casepath.join(CASE_METADATA_FILE);
    match CaseMetadata::load(&metafile) {
        Ok(meta) => Some(derive_iteration_uuid(&meta.fmu.case.uuid, &ensemble_name)),
        Err(err) => {
            sink.emit(Diagnostic::warning(format!(
                "The case metadata for the restart ensemble is invalid {}. Metadata \
                 'restart_from' will remain empty. Detailed information: {err}",
                metafile.display()
            )));
            None
        }
    }
}

/// Assembles [`Fmu`] for one document.
pub struct FmuBlockBuilder<'a> {
    runcontext: &'a RunContext,
    sink: &'a dyn DiagnosticSink,
    model: Option<&'a Model>,
    workflow: Option<&'a Workflow>,
    share_path: Option<&'a Path>,
}

impl<'a> FmuBlockBuilder<'a> {
    /// Creates a builder for `runcontext`.
    #[must_use]
    pub const fn new(runcontext: &'a RunContext, sink: &'a dyn DiagnosticSink) -> Self {
        Self {
            runcontext,
            sink,
            model: None,
            workflow: None,
            share_path: None,
        }
    }

    /// Model block overriding the one in the case metadata.
    #[must_use]
    pub const fn with_model(mut self, model: Option<&'a Model>) -> Self {
        self.model = model;
        self
    }

    /// Workflow reference.
    #[must_use]
    pub const fn with_workflow(mut self, workflow: Option<&'a Workflow>) -> Self {
        self.workflow = workflow;
        self
    }

    /// Share path of the object, used for the entity UUID.
    #[must_use]
    pub const fn with_share_path(mut self, share_path: &'a Path) -> Self {
        self.share_path = Some(share_path);
        self
    }

    /// Builds the block.
    ///
    /// Returns `None` outside an orchestrated context or when no case
    /// metadata was found.
    pub fn build(self) -> Result<Option<Fmu>> {
        let rc = self.runcontext;
        let Some(stage) = rc.fmu_context() else {
            debug!("No fmu context, no fmu block");
            return Ok(None);
        };
        let Some(case_meta) = rc.case_metadata() else {
            warn!("Missing casepath, no fmu block");
            return Ok(None);
        };

        let case = case_meta.fmu.case.clone();
        let mut fmu = Fmu {
            case,
            context: Context { stage },
            model: self.model.cloned().unwrap_or_else(|| case_meta.fmu.model.clone()),
            workflow: self.workflow.cloned(),
            ensemble: None,
            realization: None,
            ert: self.ert()?,
            entity: None,
        };

        if stage != FmuContext::Realization {
            return Ok(Some(fmu));
        }

        let case_uuid = fmu.case.uuid;
        let ensemble_name = rc.ensemble_name().unwrap_or(DEFAULT_ENSEMBLE_NAME);
        let ensemble_uuid = derive_iteration_uuid(&case_uuid, ensemble_name);
        let realization_uuid = derive_realization_uuid(&case_uuid, &ensemble_uuid, rc.realization_id());

        fmu.ensemble = Some(Ensemble {
            id: rc.ensemble_id(),
            name: ensemble_name.to_string(),
            uuid: ensemble_uuid,
            restart_from: rc
                .restart_from_path()
                .and_then(|p| derive_restart_from(p, self.sink)),
        });
        fmu.realization = Some(Realization {
            id: rc.realization_id(),
            name: rc.realization_name().unwrap_or_default().to_string(),
            uuid: realization_uuid,
        });
        fmu.entity = self.share_path.map(|p| Entity {
            uuid: derive_entity_uuid(&case_uuid, &p.to_string_lossy()),
        });
        Ok(Some(fmu))
    }

    fn ert(&self) -> Result<Option<Ert>> {
        let Some(experiment) = self.runcontext.experiment_id() else {
            return Ok(None);
        };
        let id = Uuid::parse_str(experiment)
            .map_err(|e| invalid("experiment_id", format!("Invalid experiment id '{experiment}': {e}")))?;
        let simulation_mode = self
            .runcontext
            .simulation_mode()
            .map(str::parse::<SimulationMode>)
            .transpose()?;
        Ok(Some(Ert {
            experiment: Some(Experiment { id: Some(id) }),
            simulation_mode,
        }))
    }
}
