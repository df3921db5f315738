//! Run context detection.
//!
//! A [`RunContext`] is computed once per process from a captured
//! [`Environment`] and then threaded through every later stage. It classifies
//! the process (realization, case or no orchestrated context), locates the
//! case root and its metadata, and fixes the export root.
//!
//! Directory convention under the orchestrator:
//!
//! ```text
//! <case>/realization-<N>/<ensemble>/   <- run path
//! <case>/share/metadata/fmu_case.yml   <- case metadata
//! ```

mod context;
mod environment;

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::definitions::{CASE_METADATA_FILE, DEFAULT_ENSEMBLE_NAME, RESTART_PATH_ENVNAME};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::enums::FmuContext;
use crate::errors::Result;
use crate::metadata::CaseMetadata;

pub use context::{resolve_fmu_context, ResolvedContext};
pub use environment::{Environment, FmuEnv, RmsExecutionMode};

/// True if `casepath` holds a case metadata file.
#[must_use]
pub fn casepath_has_metadata(casepath: &Path) -> bool {
    let found = casepath.join(CASE_METADATA_FILE).is_file();
    debug!(casepath = %casepath.display(), found, "Checked casepath for metadata");
    found
}

fn realization_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^realization-\d+$").ok())
        .as_ref()
}

/// Closest ancestor of `runpath` (inclusive) named `realization-<N>`.
#[must_use]
pub fn find_realization_folder(runpath: &Path) -> Option<&Path> {
    let pattern = realization_pattern()?;
    runpath.ancestors().find(|p| {
        p.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| pattern.is_match(n))
    })
}

/// Where the current process sits in the case hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct RunContext {
    fmu_context: Option<FmuContext>,
    env_context: Option<FmuContext>,
    runpath: Option<PathBuf>,
    casepath: Option<PathBuf>,
    case_metadata: Option<CaseMetadata>,
    exportroot: PathBuf,
    ensemble_name: Option<String>,
    ensemble_id: Option<i64>,
    realization_name: Option<String>,
    realization_id: i64,
    rms_exec_mode: Option<RmsExecutionMode>,
    experiment_id: Option<String>,
    simulation_mode: Option<String>,
    restart_from_path: Option<PathBuf>,
    user: String,
}

impl RunContext {
    /// Effective context.
    #[must_use]
    pub const fn fmu_context(&self) -> Option<FmuContext> {
        self.fmu_context
    }

    /// Context implied by the environment alone.
    #[must_use]
    pub const fn env_context(&self) -> Option<FmuContext> {
        self.env_context
    }

    /// True when running under the orchestrator.
    #[must_use]
    pub const fn inside_fmu(&self) -> bool {
        self.env_context.is_some()
    }

    /// True when running inside the interactive host.
    #[must_use]
    pub const fn inside_rms(&self) -> bool {
        self.rms_exec_mode.is_some()
    }

    /// Run path, realization context only.
    #[must_use]
    pub fn runpath(&self) -> Option<&Path> {
        self.runpath.as_deref()
    }

    /// Case root with valid case metadata.
    #[must_use]
    pub fn casepath(&self) -> Option<&Path> {
        self.casepath.as_deref()
    }

    /// Loaded case metadata.
    #[must_use]
    pub const fn case_metadata(&self) -> Option<&CaseMetadata> {
        self.case_metadata.as_ref()
    }

    /// Root that share paths are relative to.
    #[must_use]
    pub fn exportroot(&self) -> &Path {
        &self.exportroot
    }

    /// Ensemble folder name, e.g. `iter-0` or `pred`.
    #[must_use]
    pub fn ensemble_name(&self) -> Option<&str> {
        self.ensemble_name.as_deref()
    }

    /// Ensemble number from the environment.
    #[must_use]
    pub const fn ensemble_id(&self) -> Option<i64> {
        self.ensemble_id
    }

    /// Realization folder name, e.g. `realization-3`.
    #[must_use]
    pub fn realization_name(&self) -> Option<&str> {
        self.realization_name.as_deref()
    }

    /// Realization number from the environment, 0 if absent.
    #[must_use]
    pub const fn realization_id(&self) -> i64 {
        self.realization_id
    }

    /// Experiment id marker.
    #[must_use]
    pub fn experiment_id(&self) -> Option<&str> {
        self.experiment_id.as_deref()
    }

    /// Simulation mode marker.
    #[must_use]
    pub fn simulation_mode(&self) -> Option<&str> {
        self.simulation_mode.as_deref()
    }

    /// Resolved restart source path, if the run is a restart.
    #[must_use]
    pub fn restart_from_path(&self) -> Option<&Path> {
        self.restart_from_path.as_deref()
    }

    /// The acting user.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Root the export manifest belongs to, `None` when exports are not tracked.
    #[must_use]
    pub fn manifest_root(&self) -> Option<&Path> {
        match self.fmu_context? {
            FmuContext::Realization => self.runpath(),
            FmuContext::Case | FmuContext::Ensemble | FmuContext::Iteration => self.casepath(),
        }
    }

    /// Copy with an explicit ensemble name.
    #[must_use]
    pub fn with_ensemble_name(mut self, name: impl Into<String>) -> Self {
        self.ensemble_name = Some(name.into());
        self
    }
}

/// Builds a [`RunContext`] from a captured environment.
pub struct RunContextResolver<'a> {
    env: &'a Environment,
    sink: &'a dyn DiagnosticSink,
    casepath_proposed: Option<PathBuf>,
    fmu_context: Option<FmuContext>,
    fmu_context_set: bool,
}

impl<'a> RunContextResolver<'a> {
    /// Creates a resolver; the context defaults to the environment's.
    #[must_use]
    pub fn new(env: &'a Environment, sink: &'a dyn DiagnosticSink) -> Self {
        Self {
            env,
            sink,
            casepath_proposed: None,
            fmu_context: None,
            fmu_context_set: false,
        }
    }

    /// Proposes a case root to try first.
    #[must_use]
    pub fn with_casepath(mut self, casepath: Option<PathBuf>) -> Self {
        self.casepath_proposed = casepath;
        self
    }

    /// Sets an already resolved context.
    #[must_use]
    pub const fn with_fmu_context(mut self, fmu_context: Option<FmuContext>) -> Self {
        self.fmu_context = fmu_context;
        self.fmu_context_set = true;
        self
    }

    /// Resolves the run context.
    ///
    /// Missing case metadata is not an error; unreadable case metadata is.
    pub fn resolve(self) -> Result<RunContext> {
        debug!("Initialize RunContext");
        let env_context = self.env.fmu_context();
        let fmu_context = if self.fmu_context_set {
            self.fmu_context
        } else {
            env_context
        };

        let runpath = self.env.runpath();
        let casepath = self.establish_casepath(runpath.as_deref(), env_context.is_some());
        let case_metadata = match &casepath {
            Some(path) => Some(CaseMetadata::load(&path.join(CASE_METADATA_FILE))?),
            None => None,
        };

        let (ensemble_name, realization_name) = match (&casepath, &runpath) {
            (Some(case), Some(run)) if fmu_context != Some(FmuContext::Case) => {
                split_runpath(case, run)
            }
            _ => (None, None),
        };

        let exportroot = self.establish_exportroot(fmu_context, runpath.as_deref(), casepath.as_deref());
        let restart_from_path = match (self.env.get(RESTART_PATH_ENVNAME), &runpath) {
            (Some(rel), Some(run)) => Some(self.env.absolute(&run.join(rel))),
            _ => None,
        };

        debug!(runpath = ?runpath, casepath = ?casepath, exportroot = %exportroot.display(), "Run context established");

        Ok(RunContext {
            fmu_context,
            env_context,
            runpath,
            casepath,
            case_metadata,
            exportroot,
            ensemble_name,
            ensemble_id: Some(self.env.fmu_number(FmuEnv::IterationNumber).unwrap_or(0)),
            realization_name,
            realization_id: self.env.fmu_number(FmuEnv::RealizationNumber).unwrap_or(0),
            rms_exec_mode: self.env.rms_exec_mode(),
            experiment_id: self.env.fmu(FmuEnv::ExperimentId).map(str::to_string),
            simulation_mode: self.env.fmu(FmuEnv::SimulationMode).map(str::to_string),
            restart_from_path,
            user: self.env.user(),
        })
    }

    fn establish_casepath(&self, runpath: Option<&Path>, inside_fmu: bool) -> Option<PathBuf> {
        if !inside_fmu {
            return None;
        }

        if let Some(proposed) = &self.casepath_proposed {
            let proposed = self.env.absolute(proposed);
            if casepath_has_metadata(&proposed) {
                return Some(proposed);
            }
            self.sink.emit(Diagnostic::new(
                DiagnosticKind::MissingCaseMetadata,
                format!(
                    "Could not detect metadata for the proposed casepath {}. Will try to detect from runpath.",
                    proposed.display()
                ),
            ));
        }

        if let Some(run) = runpath {
            if let Some(found) = case_root_candidates(run).into_iter().find(|c| casepath_has_metadata(c)) {
                return Some(found);
            }
        }

        self.sink.emit(Diagnostic::new(
            DiagnosticKind::MissingCaseMetadata,
            "Could not auto detect the case metadata, please provide the 'casepath' as input. \
             Metadata will be empty!",
        ));
        None
    }

    fn establish_exportroot(
        &self,
        fmu_context: Option<FmuContext>,
        runpath: Option<&Path>,
        casepath: Option<&Path>,
    ) -> PathBuf {
        if let (Some(run), Some(FmuContext::Realization)) = (runpath, fmu_context) {
            info!("Run from realization context");
            return run.to_path_buf();
        }
        if let Some(case) = casepath {
            info!("Run from case context");
            return case.to_path_buf();
        }
        let cwd = self.env.cwd();
        if self.env.rms_exec_mode() == Some(RmsExecutionMode::Interactive) {
            info!("Run from inside RMS interactive");
            let root = cwd.parent().and_then(Path::parent).unwrap_or(cwd);
            return self.env.absolute(root);
        }
        info!("Running outside FMU context, will use the working directory as export root");
        cwd.to_path_buf()
    }
}

/// Case root candidates for a run path, most specific first.
fn case_root_candidates(runpath: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(case) = find_realization_folder(runpath).and_then(Path::parent) {
        candidates.push(case.to_path_buf());
    }
    for fallback in [runpath.parent().and_then(Path::parent), runpath.parent()]
        .into_iter()
        .flatten()
    {
        if !candidates.iter().any(|c| c == fallback) {
            candidates.push(fallback.to_path_buf());
        }
    }
    candidates
}

/// Ensemble and realization folder names for a run path below `casepath`.
fn split_runpath(casepath: &Path, runpath: &Path) -> (Option<String>, Option<String>) {
    let name = |p: &Path| p.file_name().and_then(|n| n.to_str()).map(str::to_string);

    let realization = find_realization_folder(runpath).filter(|r| r.parent() == Some(casepath));
    if let Some(real_dir) = realization {
        let ensemble = runpath
            .strip_prefix(real_dir)
            .ok()
            .and_then(|rest| rest.components().next())
            .and_then(|c| c.as_os_str().to_str())
            .map_or_else(|| DEFAULT_ENSEMBLE_NAME.to_string(), str::to_string);
        return (Some(ensemble), name(real_dir));
    }

    if runpath.parent() == Some(casepath) {
        debug!("No ensemble folder found, using default name {DEFAULT_ENSEMBLE_NAME}");
        (Some(DEFAULT_ENSEMBLE_NAME.to_string()), name(runpath))
    } else {
        (name(runpath), runpath.parent().and_then(name))
    }
}
