//! Metadata sidecar files next to exported data.

use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::enums::FmuClass;
use crate::errors::{invalid, DataioError, Result};
use crate::metadata::data::Geometry;

/// Sidecar path for `data_file`: `dir/.<file name>.yml`.
#[must_use]
pub fn metadata_path(data_file: &Path) -> PathBuf {
    let file_name = data_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    data_file.with_file_name(format!(".{file_name}.yml"))
}

/// Reads the sidecar metadata of an exported data file.
///
/// Hidden input files are rejected; a missing sidecar is an I/O error.
pub fn read_metadata(data_file: &Path) -> Result<Value> {
    let hidden = data_file
        .file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'));
    if hidden {
        return Err(DataioError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("The input is a hidden file, cannot continue: {}", data_file.display()),
        )));
    }

    let metafile = metadata_path(data_file);
    if !metafile.is_file() {
        return Err(DataioError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Cannot find requested metafile: {}", metafile.display()),
        )));
    }
    debug!(path = %metafile.display(), "Reading metadata sidecar");
    let text = std::fs::read_to_string(&metafile)?;
    Ok(serde_yaml::from_str(&text)?)
}

/// `data.geometry` from the sidecar of an already exported geometry.
///
/// Grid properties must reference a `cpgrid`, surfaces another `surface`.
pub fn geometry_reference(geometry_file: &Path, classname: FmuClass) -> Result<Geometry> {
    let meta = read_metadata(geometry_file)?;
    let class = meta.get("class").and_then(Value::as_str).unwrap_or_default();

    match classname {
        FmuClass::CpgridProperty if class != FmuClass::Cpgrid.as_str() => {
            return Err(invalid("geometry", "The geometry for a grid property must be a grid"));
        }
        FmuClass::Surface if class != FmuClass::Surface.as_str() => {
            return Err(invalid("geometry", "The geometry for a surface must be another surface"));
        }
        _ => {}
    }

    let name = meta
        .pointer("/data/name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let relative_path = meta
        .pointer("/file/relative_path")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("geometry", "The geometry metadata has no 'file.relative_path'"))?
        .to_string();
    Ok(Geometry { name, relative_path })
}
