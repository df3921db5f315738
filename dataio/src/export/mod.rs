//! The export pipeline.
//!
//! [`ExportData`] resolves its configuration once and then, per object,
//! assembles and validates the metadata before anything touches the disk.
//! Only then is the data file encoded, the sidecar written and the manifest
//! updated.

mod encoder;
mod integration_tests;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::{ExportConfig, ExportInput};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, LoggingDiagnosticSink};
use crate::errors::{invalid, DataioError, Result};
use crate::manifest::update_export_manifest;
use crate::metadata::{MetadataAssembler, MetadataDocument};
use crate::objects::{DataObject, ObjectDescriptor};
use crate::observability::StepTimer;
use crate::runcontext::Environment;
use crate::share_path::{get_share_path, metadata_path};
use crate::utils::md5sum;

pub use encoder::ObjectEncoder;
#[cfg(test)]
pub use encoder::MockObjectEncoder;

/// What one export wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
    /// Absolute path of the data file.
    pub data_path: PathBuf,
    /// Absolute path of the metadata sidecar, if written.
    pub metadata_path: Option<PathBuf>,
    /// The written metadata; `None` without a valid global configuration.
    pub metadata: Option<MetadataDocument>,
    /// Manifest updated by this export, if any.
    pub manifest_path: Option<PathBuf>,
}

/// Exports data objects with metadata.
pub struct ExportData {
    config: ExportConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl ExportData {
    /// Resolves `input` against the current process environment.
    ///
    /// Diagnostics go to the log.
    pub fn new(input: &ExportInput) -> Result<Self> {
        let env = Environment::capture()?;
        Self::from_input(input, &env, Arc::new(LoggingDiagnosticSink::default()))
    }

    /// Resolves `input` against a captured environment.
    pub fn from_input(input: &ExportInput, env: &Environment, sink: Arc<dyn DiagnosticSink>) -> Result<Self> {
        let config = ExportConfig::resolve(input, env, sink.as_ref())?;
        Ok(Self { config, sink })
    }

    /// Wraps an already resolved configuration.
    #[must_use]
    pub fn from_config(config: ExportConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { config, sink }
    }

    /// The resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Assembles and validates the metadata for `obj` without writing.
    pub fn generate_metadata(&self, obj: &DataObject) -> Result<MetadataDocument> {
        MetadataAssembler::new(&self.config, self.sink.as_ref()).assemble(obj)
    }

    /// Exports `obj` through `encoder`.
    ///
    /// The metadata is validated first. The data file and the sidecar are
    /// staged as temporary files next to their targets and moved into place
    /// together; the manifest follows. Without a valid global
    /// configuration only the data file is written.
    pub fn export(&self, obj: &DataObject, encoder: &dyn ObjectEncoder) -> Result<ExportOutcome> {
        let timer = StepTimer::start("export");
        let sink = self.sink.as_ref();
        let (mut metadata, relative, format) = if self.config.config().is_some() {
            let doc = self.generate_metadata(obj)?;
            let (relative, format) = match doc.as_object() {
                Some(meta) => (meta.file.relative_path.clone(), meta.data.format.clone()),
                None => return Err(invalid("class", "Expected a data object document")),
            };
            (Some(doc), relative, format)
        } else {
            sink.emit(Diagnostic::new(
                DiagnosticKind::UserWarning,
                "Metadata can not be produced without a valid global configuration. \
                 The data file is exported without metadata.",
            ));
            let descriptor = ObjectDescriptor::describe(obj, &self.config, sink)?;
            let relative = get_share_path(&self.config, &descriptor, sink)?;
            (None, relative, descriptor.fmt)
        };

        let data_path = self.config.runcontext().exportroot().join(&relative);
        let (data_file, checksum, size) = encode_data_file(obj, &format, &data_path, encoder)?;

        if let Some(MetadataDocument::Object(meta)) = metadata.as_mut() {
            meta.file.checksum_md5 = Some(checksum);
            meta.file.size_bytes = Some(size);
        }
        let sidecar = metadata
            .as_ref()
            .map(|doc| stage_sidecar(doc, &data_path))
            .transpose()?;

        persist(data_file, &data_path)?;
        debug!(path = %data_path.display(), size, "Data file written");
        let metadata_file = match sidecar {
            Some((tmp, path)) => {
                if let Err(e) = persist(tmp, &path) {
                    let _ = std::fs::remove_file(&data_path);
                    return Err(e);
                }
                debug!(path = %path.display(), "Metadata written");
                Some(path)
            }
            None => None,
        };

        let manifest_path = update_export_manifest(self.config.runcontext(), &data_path)?;
        info!(
            path = %data_path.display(),
            with_metadata = metadata_file.is_some(),
            elapsed_ms = timer.elapsed_ms(),
            "{} done",
            timer.name()
        );
        Ok(ExportOutcome {
            data_path,
            metadata_path: metadata_file,
            metadata,
            manifest_path,
        })
    }
}

/// Serializes the sidecar into a temporary sibling of its target.
fn stage_sidecar(doc: &MetadataDocument, data_path: &Path) -> Result<(NamedTempFile, PathBuf)> {
    let target = metadata_path(data_path);
    let mut tmp = NamedTempFile::new_in(parent_of(&target)?)?;
    tmp.write_all(doc.to_yaml()?.as_bytes())?;
    Ok((tmp, target))
}

/// Encodes into a temporary sibling of `target` and checksums it.
fn encode_data_file(
    obj: &DataObject,
    format: &str,
    target: &Path,
    encoder: &dyn ObjectEncoder,
) -> Result<(NamedTempFile, String, u64)> {
    let dir = parent_of(target)?;
    std::fs::create_dir_all(dir)?;

    let tmp = NamedTempFile::new_in(dir)?;
    encoder.encode(obj, format, tmp.path())?;
    let checksum = md5sum(tmp.path())?;
    let size = std::fs::metadata(tmp.path())?.len();
    Ok((tmp, checksum, size))
}

fn parent_of(target: &Path) -> Result<&Path> {
    target
        .parent()
        .ok_or_else(|| DataioError::Encoding(format!("No parent folder for {}", target.display())))
}

fn persist(tmp: NamedTempFile, target: &Path) -> Result<()> {
    tmp.persist(target).map_err(|e| DataioError::Io(e.error))?;
    Ok(())
}
