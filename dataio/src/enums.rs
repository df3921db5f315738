//! Enumerated vocabularies used in metadata documents.
//!
//! Every enum serializes to its lowercase wire name and parses from it with
//! [`std::str::FromStr`]. Parsing failures are validation errors listing the
//! accepted values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{DataioError, ErrorInfo, ValidationError};

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The wire name.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DataioError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(invalid_value($field, s, Self::ALL.iter().map(Self::as_str))),
                }
            }
        }
    };
}

fn invalid_value<'a>(
    field: &str,
    value: &str,
    valid: impl Iterator<Item = &'a str>,
) -> DataioError {
    let valid: Vec<&str> = valid.collect();
    DataioError::Validation(
        ValidationError::new(format!(
            "'{value}' is not a valid value for '{field}'. Use one of: {}.",
            valid.join(", ")
        ))
        .with_field(field)
        .with_error_info(
            ErrorInfo::new("DATAIO-ENUM", format!("Invalid {field}"))
                .with_context_entry("value", value),
        ),
    )
}

string_enum! {
    /// Security classification of an exported object.
    Classification, "classification" {
        /// Legacy level, upgraded to `Restricted` on input.
        Asset => "asset",
        /// Visible inside the organisation.
        Internal => "internal",
        /// Visible to the asset team only.
        Restricted => "restricted",
    }
}

string_enum! {
    /// What the data represents.
    Content, "content" {
        /// Depth surfaces and grids.
        Depth => "depth",
        /// Facies thickness maps.
        FaciesThickness => "facies_thickness",
        /// Triangulated fault surfaces.
        FaultTriangulatedSurface => "fault_triangulated_surface",
        /// Fault lines.
        FaultLines => "fault_lines",
        /// Fault properties.
        FaultProperties => "fault_properties",
        /// Field outline.
        FieldOutline => "field_outline",
        /// Field region.
        FieldRegion => "field_region",
        /// Fluid contact surfaces.
        FluidContact => "fluid_contact",
        /// Permeability-thickness product.
        Khproduct => "khproduct",
        /// Lift curves.
        LiftCurves => "lift_curves",
        /// Named area.
        NamedArea => "named_area",
        /// Model parameters.
        Parameters => "parameters",
        /// Pinchout.
        Pinchout => "pinchout",
        /// Grid or surface property.
        Property => "property",
        /// PVT tables.
        Pvt => "pvt",
        /// Regions.
        Regions => "regions",
        /// Relative permeability.
        Relperm => "relperm",
        /// RFT data.
        Rft => "rft",
        /// Seismic attributes.
        Seismic => "seismic",
        /// Simulation time series.
        Simulationtimeseries => "simulationtimeseries",
        /// Subcrop.
        Subcrop => "subcrop",
        /// Thickness.
        Thickness => "thickness",
        /// Time surfaces.
        Time => "time",
        /// Time series (summary).
        Timeseries => "timeseries",
        /// Transmissibilities.
        Transmissibilities => "transmissibilities",
        /// Velocity.
        Velocity => "velocity",
        /// In-place volumes.
        Volumes => "volumes",
        /// Well picks.
        Wellpicks => "wellpicks",
        /// Content was not given.
        Unset => "unset",
    }
}

impl Content {
    /// Whether this content kind requires a structured payload.
    #[must_use]
    pub const fn requires_payload(&self) -> bool {
        matches!(
            self,
            Self::FieldOutline | Self::FieldRegion | Self::FluidContact | Self::Property | Self::Seismic
        )
    }
}

string_enum! {
    /// Record class of a metadata document (top-level discriminator).
    FmuClass, "class" {
        /// Case metadata.
        Case => "case",
        /// Legacy name of an ensemble record.
        Iteration => "iteration",
        /// Ensemble record.
        Ensemble => "ensemble",
        /// Realization record.
        Realization => "realization",
        /// Regular surface.
        Surface => "surface",
        /// Triangulated surface.
        TriangulatedSurface => "triangulated_surface",
        /// Table.
        Table => "table",
        /// Corner point grid.
        Cpgrid => "cpgrid",
        /// Corner point grid property.
        CpgridProperty => "cpgrid_property",
        /// Polygons.
        Polygons => "polygons",
        /// Seismic cube.
        Cube => "cube",
        /// Points.
        Points => "points",
        /// Dictionary.
        Dictionary => "dictionary",
    }
}

impl FmuClass {
    /// True for classes describing exported data objects.
    #[must_use]
    pub const fn is_object(&self) -> bool {
        !matches!(self, Self::Case | Self::Iteration | Self::Ensemble | Self::Realization)
    }
}

string_enum! {
    /// Storage layout of the data.
    Layout, "layout" {
        /// Regular grid.
        Regular => "regular",
        /// Unspecified.
        Unset => "unset",
        /// Corner point grid.
        Cornerpoint => "cornerpoint",
        /// Table.
        Table => "table",
        /// Dictionary.
        Dictionary => "dictionary",
        /// Triangulated surface.
        TriangulatedSurface => "triangulated_surface",
    }
}

string_enum! {
    /// Orchestration context a process runs in.
    FmuContext, "fmu_context" {
        /// Case level.
        Case => "case",
        /// Legacy alias for `Ensemble`.
        Iteration => "iteration",
        /// Ensemble level.
        Ensemble => "ensemble",
        /// Realization level.
        Realization => "realization",
    }
}

string_enum! {
    /// Vertical domain.
    VerticalDomain, "vertical_domain" {
        /// Depth.
        Depth => "depth",
        /// Time.
        Time => "time",
    }
}

string_enum! {
    /// Reference level for the vertical domain.
    DomainReference, "domain_reference" {
        /// Mean sea level.
        Msl => "msl",
        /// Seabed.
        Sb => "sb",
        /// Rotary Kelly bushing.
        Rkb => "rkb",
    }
}

string_enum! {
    /// Tracklog event kind.
    TracklogEventType, "event" {
        /// Document created.
        Created => "created",
        /// Document updated.
        Updated => "updated",
        /// Document merged.
        Merged => "merged",
    }
}

string_enum! {
    /// Fluid contact kind.
    FluidContactType, "contact" {
        /// Free gas level.
        Fgl => "fgl",
        /// Free water level.
        Fwl => "fwl",
        /// Gas-oil contact.
        Goc => "goc",
        /// Gas-water contact.
        Gwc => "gwc",
        /// Oil-water contact.
        Owc => "owc",
    }
}

string_enum! {
    /// Orchestrator simulation mode.
    SimulationMode, "simulation_mode" {
        /// Ensemble experiment.
        EnsembleExperiment => "ensemble_experiment",
        /// Ensemble information filter.
        EnsembleInformationFilter => "ensemble_information_filter",
        /// Ensemble smoother.
        EnsembleSmoother => "ensemble_smoother",
        /// Multiple data assimilation.
        EsMda => "es_mda",
        /// Evaluate ensemble.
        EvaluateEnsemble => "evaluate_ensemble",
        /// Manual update.
        ManualUpdate => "manual_update",
        /// Test run.
        TestRun => "test_run",
        /// Workflow.
        Workflow => "workflow",
    }
}

/// Axis orientation; serialized as `1` or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AxisOrientation {
    /// Normal.
    #[default]
    Normal,
    /// Flipped.
    Flipped,
}

impl AxisOrientation {
    /// Numeric value.
    #[must_use]
    pub const fn value(self) -> i8 {
        match self {
            Self::Normal => 1,
            Self::Flipped => -1,
        }
    }

    /// Builds from a numeric flag; anything negative is flipped.
    #[must_use]
    pub const fn from_flag(flag: i32) -> Self {
        if flag < 0 {
            Self::Flipped
        } else {
            Self::Normal
        }
    }
}

impl Serialize for AxisOrientation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.value())
    }
}

impl<'de> Deserialize<'de> for AxisOrientation {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match i8::deserialize(deserializer)? {
            1 => Ok(Self::Normal),
            -1 => Ok(Self::Flipped),
            other => Err(serde::de::Error::custom(format!(
                "axis orientation must be 1 or -1, got {other}"
            ))),
        }
    }
}
