//! Captured process environment.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::definitions::RMS_EXEC_MODE_ENVNAME;
use crate::enums::FmuContext;
use crate::errors::Result;

/// Environment markers set by the ensemble orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FmuEnv {
    /// Experiment (case level) id.
    ExperimentId,
    /// Ensemble id.
    EnsembleId,
    /// Simulation mode.
    SimulationMode,
    /// Realization number.
    RealizationNumber,
    /// Iteration number.
    IterationNumber,
    /// Run path of the realization.
    Runpath,
}

impl FmuEnv {
    /// The environment variable name.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::ExperimentId => "_ERT_EXPERIMENT_ID",
            Self::EnsembleId => "_ERT_ENSEMBLE_ID",
            Self::SimulationMode => "_ERT_SIMULATION_MODE",
            Self::RealizationNumber => "_ERT_REALIZATION_NUMBER",
            Self::IterationNumber => "_ERT_ITERATION_NUMBER",
            Self::Runpath => "_ERT_RUNPATH",
        }
    }
}

impl fmt::Display for FmuEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Execution mode of the interactive modelling host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RmsExecutionMode {
    /// Started with a GUI.
    Interactive,
    /// Started headless.
    Batch,
}

/// Immutable snapshot of environment variables and working directory.
///
/// Everything downstream reads from this value; nothing re-reads process
/// state after capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: HashMap<String, String>,
    cwd: PathBuf,
}

impl Environment {
    /// Captures the current process environment.
    pub fn capture() -> Result<Self> {
        Ok(Self {
            vars: std::env::vars().collect(),
            cwd: std::env::current_dir()?,
        })
    }

    /// Creates an empty environment rooted at `cwd`.
    #[must_use]
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            vars: HashMap::new(),
            cwd: cwd.into(),
        }
    }

    /// Sets a variable.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Sets an orchestrator marker.
    #[must_use]
    pub fn with_fmu(self, marker: FmuEnv, value: impl Into<String>) -> Self {
        self.with_var(marker.key(), value)
    }

    /// The captured working directory.
    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// A variable, treating empty values as unset.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// An orchestrator marker.
    #[must_use]
    pub fn fmu(&self, marker: FmuEnv) -> Option<&str> {
        self.get(marker.key())
    }

    /// Context implied by the markers: run path means realization, an
    /// experiment id alone means case.
    #[must_use]
    pub fn fmu_context(&self) -> Option<FmuContext> {
        if self.fmu(FmuEnv::Runpath).is_some() {
            Some(FmuContext::Realization)
        } else if self.fmu(FmuEnv::ExperimentId).is_some() {
            Some(FmuContext::Case)
        } else {
            None
        }
    }

    /// True when running under the orchestrator.
    #[must_use]
    pub fn inside_fmu(&self) -> bool {
        self.fmu_context().is_some()
    }

    /// Host execution mode, if the host announced one.
    #[must_use]
    pub fn rms_exec_mode(&self) -> Option<RmsExecutionMode> {
        match self.get(RMS_EXEC_MODE_ENVNAME)? {
            "interactive" => Some(RmsExecutionMode::Interactive),
            "batch" => Some(RmsExecutionMode::Batch),
            _ => None,
        }
    }

    /// Absolute run path, resolved against the working directory.
    #[must_use]
    pub fn runpath(&self) -> Option<PathBuf> {
        self.fmu(FmuEnv::Runpath).map(|p| self.absolute(Path::new(p)))
    }

    /// Integer marker value, if parseable.
    #[must_use]
    pub fn fmu_number(&self, marker: FmuEnv) -> Option<i64> {
        self.fmu(marker).and_then(|v| v.trim().parse().ok())
    }

    /// The acting user.
    #[must_use]
    pub fn user(&self) -> String {
        self.get("USER")
            .or_else(|| self.get("USERNAME"))
            .unwrap_or("unknown")
            .to_string()
    }

    /// Makes `path` absolute and canonical where possible.
    #[must_use]
    pub fn absolute(&self, path: &Path) -> PathBuf {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        };
        joined.canonicalize().unwrap_or(joined)
    }
}
