//! Fixed names, versions and lookup tables.

use std::fmt;

use crate::enums::Content;

/// Schema URL written to `$schema`.
pub const SCHEMA: &str =
    "https://main-fmu-schemas-prod.radix.equinor.com/schemas/0.8.0/fmu_results.json";

/// Schema version written to `version`.
pub const VERSION: &str = "0.8.0";

/// Source marker written to `source`.
pub const SOURCE: &str = "fmu";

/// Case metadata location relative to the case root.
pub const CASE_METADATA_FILE: &str = "share/metadata/fmu_case.yml";

/// Name of the export manifest file at the context root.
pub const MANIFEST_FILENAME: &str = ".dataio_export_manifest.json";

/// Restart source, relative to the run path.
pub const RESTART_PATH_ENVNAME: &str = "RESTART_FROM_PATH";

/// Path to the static project configuration.
pub const GLOBAL_CONFIG_ENVNAME: &str = "FMU_GLOBAL_CONFIG";

/// Interactive host execution mode marker.
pub const RMS_EXEC_MODE_ENVNAME: &str = "RUNRMS_EXEC_MODE";

/// Ensemble name used when the run path has no ensemble folder.
pub const DEFAULT_ENSEMBLE_NAME: &str = "iter-0";

/// Undefined value marker for regular surfaces.
pub const UNDEF: f64 = 1.0e30;

/// Top-level share folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareFolder {
    /// Data exported before the orchestrated run.
    Preprocessed,
    /// Observed data.
    Observations,
    /// Simulated results.
    Results,
}

impl ShareFolder {
    /// Path relative to the export root.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Preprocessed => "share/preprocessed",
            Self::Observations => "share/observations",
            Self::Results => "share/results",
        }
    }
}

impl fmt::Display for ShareFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape-specific export subfolders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFolder {
    /// Surfaces.
    Maps,
    /// Grids and grid properties.
    Grids,
    /// Seismic cubes.
    Cubes,
    /// Tables.
    Tables,
    /// Polygons.
    Polygons,
    /// Points.
    Points,
    /// Dictionaries.
    Dictionaries,
}

impl ExportFolder {
    /// Folder name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Maps => "maps",
            Self::Grids => "grids",
            Self::Cubes => "cubes",
            Self::Tables => "tables",
            Self::Polygons => "polygons",
            Self::Points => "points",
            Self::Dictionaries => "dictionaries",
        }
    }
}

impl fmt::Display for ExportFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format name to file extension, per shape.
pub mod formats {
    /// Regular surfaces.
    pub const SURFACE: &[(&str, &str)] = &[("irap_binary", ".gri")];
    /// Grids and grid properties.
    pub const GRID: &[(&str, &str)] = &[("hdf", ".hdf"), ("roff", ".roff")];
    /// Seismic cubes.
    pub const CUBE: &[(&str, &str)] = &[("segy", ".segy")];
    /// Row-oriented tables.
    pub const TABLE: &[(&str, &str)] = &[("csv", ".csv"), ("parquet", ".parquet"), ("hdf", ".hdf")];
    /// Columnar tables.
    pub const ARROW_TABLE: &[(&str, &str)] = &[("parquet", ".parquet"), ("arrow", ".arrow")];
    /// Polygons.
    pub const POLYGONS: &[(&str, &str)] = &[
        ("hdf", ".hdf"),
        ("csv", ".csv"),
        ("csv|xtgeo", ".csv"),
        ("irap_ascii", ".pol"),
        ("parquet", ".parquet"),
    ];
    /// Points.
    pub const POINTS: &[(&str, &str)] = &[
        ("hdf", ".hdf"),
        ("csv", ".csv"),
        ("csv|xtgeo", ".csv"),
        ("irap_ascii", ".poi"),
        ("parquet", ".parquet"),
    ];
    /// Dictionaries.
    pub const DICTIONARY: &[(&str, &str)] = &[("json", ".json")];
    /// Triangulated surfaces.
    pub const TRIANGULATED_SURFACE: &[(&str, &str)] = &[("tsurf", ".ts")];

    /// Looks up the extension for `fmt`.
    #[must_use]
    pub fn extension(table: &[(&str, &'static str)], fmt: &str) -> Option<&'static str> {
        table.iter().find(|(name, _)| *name == fmt).map(|(_, ext)| *ext)
    }
}

/// Well-known index columns per content kind.
pub const STANDARD_TABLE_INDEX_COLUMNS: &[(Content, &[&str])] = &[
    (Content::Volumes, &["ZONE", "REGION", "FACIES", "LICENCE"]),
    (Content::Rft, &["measured_depth", "well", "time"]),
    (Content::Timeseries, &["DATE"]),
    (Content::Wellpicks, &["WELL", "HORIZON"]),
];

/// Index columns registered for `content`, if any.
#[must_use]
pub fn standard_index_columns(content: Content) -> Option<&'static [&'static str]> {
    STANDARD_TABLE_INDEX_COLUMNS
        .iter()
        .find(|(c, _)| *c == content)
        .map(|(_, cols)| *cols)
}
