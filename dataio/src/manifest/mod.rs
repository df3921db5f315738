//! The export manifest.
//!
//! A JSON list of exported files kept at the context root: the run path in
//! realization context, the case root in case context. Exports outside an
//! orchestrated run are not tracked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::definitions::MANIFEST_FILENAME;
use crate::errors::{DataioError, Result};
use crate::runcontext::RunContext;

/// One exported file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Absolute path of the exported file.
    pub absolute_path: PathBuf,
    /// When it was exported.
    pub exported_at: DateTime<Utc>,
    /// Who exported it.
    pub exported_by: String,
}

/// Ordered log of exported files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportManifest {
    entries: Vec<ManifestEntry>,
}

impl ExportManifest {
    /// Entries in export order.
    #[must_use]
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends an entry stamped now.
    pub fn add_entry(&mut self, absolute_path: impl Into<PathBuf>, user: impl Into<String>) {
        self.entries.push(ManifestEntry {
            absolute_path: absolute_path.into(),
            exported_at: Utc::now(),
            exported_by: user.into(),
        });
    }

    /// Reads a manifest file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes the manifest file.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Manifest location for `runcontext`, `None` outside orchestrated runs.
#[must_use]
pub fn manifest_path(runcontext: &RunContext) -> Option<PathBuf> {
    runcontext.manifest_root().map(|root| root.join(MANIFEST_FILENAME))
}

/// Appends `absolute_path` to the manifest of `runcontext`.
///
/// Returns the manifest path, or `None` when nothing was tracked.
pub fn update_export_manifest(runcontext: &RunContext, absolute_path: &Path) -> Result<Option<PathBuf>> {
    let Some(path) = manifest_path(runcontext) else {
        debug!("No orchestrated context, export manifest not updated");
        return Ok(None);
    };

    let mut manifest = if path.exists() {
        debug!(path = %path.display(), "Export manifest found");
        ExportManifest::from_file(&path)?
    } else {
        debug!(path = %path.display(), "Export manifest not found, creating new one");
        ExportManifest::default()
    };
    manifest.add_entry(absolute_path, runcontext.user());
    manifest.to_file(&path)?;
    Ok(Some(path))
}

/// Loads the manifest of `runcontext`.
///
/// A missing file, or no orchestrated context, is an I/O `NotFound` error.
pub fn load_export_manifest(runcontext: &RunContext) -> Result<ExportManifest> {
    let path = manifest_path(runcontext).ok_or_else(|| {
        DataioError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            "No export manifest outside an orchestrated context",
        ))
    })?;
    if !path.exists() {
        return Err(DataioError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Export manifest file not found at {}", path.display()),
        )));
    }
    debug!(path = %path.display(), "Loading export manifest");
    ExportManifest::from_file(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingDiagnosticSink;
    use crate::runcontext::{Environment, FmuEnv, RunContextResolver};
    use crate::testing::CaseFixture;

    fn realization(fixture: &CaseFixture) -> RunContext {
        let runpath = fixture.runpath(1, "iter-0");
        let env = Environment::new(&runpath)
            .with_var("USER", "tester")
            .with_fmu(FmuEnv::RealizationNumber, "1")
            .with_fmu(FmuEnv::Runpath, runpath.to_string_lossy());
        let sink = CollectingDiagnosticSink::new();
        RunContextResolver::new(&env, &sink).resolve().unwrap()
    }

    #[test]
    fn test_append_preserves_order() {
        let fixture = CaseFixture::new();
        let rc = realization(&fixture);
        let first = rc.exportroot().join("share/results/maps/a.gri");
        let second = rc.exportroot().join("share/results/maps/b.gri");

        let path = update_export_manifest(&rc, &first).unwrap().unwrap();
        assert_eq!(path, rc.exportroot().join(MANIFEST_FILENAME));
        update_export_manifest(&rc, &second).unwrap();
        update_export_manifest(&rc, &first).unwrap();

        let manifest = load_export_manifest(&rc).unwrap();
        assert_eq!(manifest.len(), 3);
        assert_eq!(manifest.entries()[0].absolute_path, first);
        assert_eq!(manifest.entries()[1].absolute_path, second);
        assert_eq!(manifest.entries()[2].exported_by, "tester");
    }

    #[test]
    fn test_missing_manifest() {
        let fixture = CaseFixture::new();
        let rc = realization(&fixture);
        let err = load_export_manifest(&rc).unwrap_err();
        assert!(matches!(err, DataioError::Io(e) if e.kind() == io::ErrorKind::NotFound));
    }

    #[test]
    fn test_not_tracked_outside_context() {
        let env = Environment::new("/work/project");
        let sink = CollectingDiagnosticSink::new();
        let rc = RunContextResolver::new(&env, &sink).resolve().unwrap();
        assert!(manifest_path(&rc).is_none());
        assert!(update_export_manifest(&rc, Path::new("/work/project/x.gri")).unwrap().is_none());
    }

    #[test]
    fn test_serialized_as_list() {
        let mut manifest = ExportManifest::default();
        manifest.add_entry("/a/b.gri", "someone");
        let value = serde_json::to_value(&manifest).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["exported_by"], "someone");
    }
}
