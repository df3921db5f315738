//! Placement of exported files below the export root.
//!
//! The share path is `share/<results|observations|preprocessed>/<folder>
//! [/<subfolder>]/<stem><ext>`, relative to the export root of the run
//! context. It also seeds the entity UUID.

mod filestem;
mod sidecar;

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::ExportConfig;
use crate::definitions::ShareFolder;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::errors::{invalid, Result};
use crate::metadata::fields::File;
use crate::objects::ObjectDescriptor;

pub use filestem::{build_filestem, FilestemParts};
pub use sidecar::{geometry_reference, metadata_path, read_metadata};

/// Share root for the export flags of `config`.
#[must_use]
pub fn share_folder(config: &ExportConfig) -> ShareFolder {
    let flags = config.flags();
    if flags.preprocessed {
        ShareFolder::Preprocessed
    } else if flags.is_observation {
        ShareFolder::Observations
    } else {
        ShareFolder::Results
    }
}

/// Relative path of the data file, including stem and extension.
///
/// A relative `forcefolder` replaces the standard folder with a warning; an
/// absolute one is rejected.
pub fn get_share_path(
    config: &ExportConfig,
    descriptor: &ObjectDescriptor,
    sink: &dyn DiagnosticSink,
) -> Result<PathBuf> {
    let naming = config.naming();
    let (time0, time1) = config.time_markers();
    let stem = build_filestem(
        &FilestemParts {
            name: &descriptor.name,
            tagname: &naming.tagname,
            parent: &naming.parent,
            time0: time0.map(|t| t.date.as_str()),
            time1: time1.map(|t| t.date.as_str()),
            reverse: naming.filename_timedata_reverse,
        },
        sink,
    )?;

    let efolder = if naming.forcefolder.is_empty() {
        descriptor.efolder.as_str()
    } else if Path::new(&naming.forcefolder).is_absolute() {
        return Err(invalid(
            "forcefolder",
            "Cannot use absolute path to 'forcefolder', i.e. starting with '/'",
        ));
    } else {
        sink.emit(Diagnostic::warning(format!(
            "The standard folder name is overrided from {} to {}",
            descriptor.efolder, naming.forcefolder
        )));
        naming.forcefolder.as_str()
    };

    let mut path = PathBuf::from(share_folder(config).as_str()).join(efolder);
    if !naming.subfolder.is_empty() {
        path.push(&naming.subfolder);
    }
    path.push(format!("{stem}{}", descriptor.extension));
    debug!(share_path = %path.display(), "Share path constructed");
    Ok(path)
}

/// `file` block for a share path; checksum and size are filled in later.
#[must_use]
pub fn file_block(config: &ExportConfig, share_path: &Path) -> File {
    File {
        absolute_path: Some(config.runcontext().exportroot().join(share_path)),
        relative_path: share_path.to_path_buf(),
        checksum_md5: None,
        size_bytes: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExportFlags, NamingConfig, TimedataEntry};
    use crate::definitions::ExportFolder;
    use crate::diagnostics::CollectingDiagnosticSink;
    use crate::enums::{Content, FmuClass, Layout};
    use crate::runcontext::{Environment, RunContextResolver};

    fn config(naming: NamingConfig, flags: ExportFlags, timedata: Option<Vec<TimedataEntry>>) -> ExportConfig {
        let env = Environment::new("/work/project");
        let sink = CollectingDiagnosticSink::new();
        let rc = RunContextResolver::new(&env, &sink).resolve().unwrap();
        ExportConfig::builder()
            .content(Content::Depth, None)
            .naming(naming)
            .flags(flags)
            .timedata(timedata)
            .run_context(rc)
            .build()
            .unwrap()
    }

    fn descriptor(name: &str) -> ObjectDescriptor {
        ObjectDescriptor {
            name: name.into(),
            classname: FmuClass::Surface,
            layout: Layout::Regular,
            fmt: "irap_binary".into(),
            extension: ".gri".into(),
            efolder: ExportFolder::Maps,
            bbox: None,
            spec: None,
            table_index: None,
        }
    }

    fn entry(date: &str) -> TimedataEntry {
        TimedataEntry {
            date: date.into(),
            label: None,
        }
    }

    #[test]
    fn test_results_path() {
        let sink = CollectingDiagnosticSink::new();
        let naming = NamingConfig {
            tagname: "mean".into(),
            ..NamingConfig::default()
        };
        let cfg = config(naming, ExportFlags::default(), None);
        let path = get_share_path(&cfg, &descriptor("Valysar"), &sink).unwrap();
        assert_eq!(path, PathBuf::from("share/results/maps/valysar--mean.gri"));

        let file = file_block(&cfg, &path);
        assert_eq!(
            file.absolute_path.unwrap(),
            PathBuf::from("/work/project/share/results/maps/valysar--mean.gri")
        );
    }

    #[test]
    fn test_observation_and_preprocessed_roots() {
        let sink = CollectingDiagnosticSink::new();
        let obs = ExportFlags {
            is_observation: true,
            ..ExportFlags::default()
        };
        let cfg = config(NamingConfig::default(), obs, None);
        let path = get_share_path(&cfg, &descriptor("x"), &sink).unwrap();
        assert!(path.starts_with("share/observations/maps"));

        let pre = ExportFlags {
            preprocessed: true,
            is_observation: true,
            ..ExportFlags::default()
        };
        let cfg = config(NamingConfig::default(), pre, None);
        let path = get_share_path(&cfg, &descriptor("x"), &sink).unwrap();
        assert!(path.starts_with("share/preprocessed/maps"));
    }

    #[test]
    fn test_timedata_ordering_in_stem() {
        let sink = CollectingDiagnosticSink::new();
        let cfg = config(
            NamingConfig::default(),
            ExportFlags::default(),
            Some(vec![entry("20180101"), entry("20200101")]),
        );
        let path = get_share_path(&cfg, &descriptor("diff"), &sink).unwrap();
        assert_eq!(path.file_name().unwrap(), "diff--20200101_20180101.gri");
    }

    #[test]
    fn test_forcefolder_and_subfolder() {
        let sink = CollectingDiagnosticSink::new();
        let naming = NamingConfig {
            forcefolder: "custom".into(),
            subfolder: "sub".into(),
            ..NamingConfig::default()
        };
        let cfg = config(naming, ExportFlags::default(), None);
        let path = get_share_path(&cfg, &descriptor("x"), &sink).unwrap();
        assert_eq!(path, PathBuf::from("share/results/custom/sub/x.gri"));
        assert!(sink.contains("overrided from maps to custom"));

        let naming = NamingConfig {
            forcefolder: "/abs".into(),
            ..NamingConfig::default()
        };
        let cfg = config(naming, ExportFlags::default(), None);
        assert!(get_share_path(&cfg, &descriptor("x"), &sink).unwrap_err().is_validation());
    }
}
