//! The content-discriminated `data` block.

use serde::{Deserialize, Serialize};

use crate::config::ContentPayload;
use crate::enums::{AxisOrientation, Content, DomainReference, Layout, VerticalDomain};

/// A stratigraphic reference for `top`/`base`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer name.
    pub name: String,
    /// Offset from the named horizon.
    #[serde(default)]
    pub offset: f64,
    /// Whether the name is a known stratigraphic unit.
    #[serde(default)]
    pub stratigraphic: bool,
}

/// Reference to an already exported geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    /// Name of the geometry object.
    pub name: String,
    /// Its path relative to the export root.
    pub relative_path: String,
}

/// Axis aligned bounding box; the vertical extent is optional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum x.
    pub xmin: f64,
    /// Maximum x.
    pub xmax: f64,
    /// Minimum y.
    pub ymin: f64,
    /// Maximum y.
    pub ymax: f64,
    /// Minimum z.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zmin: Option<f64>,
    /// Maximum z.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zmax: Option<f64>,
}

impl BoundingBox {
    /// A box without vertical extent.
    #[must_use]
    pub const fn new_2d(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
            zmin: None,
            zmax: None,
        }
    }

    /// A box with vertical extent.
    #[must_use]
    pub const fn new_3d(xmin: f64, xmax: f64, ymin: f64, ymax: f64, zmin: f64, zmax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
            zmin: Some(zmin),
            zmax: Some(zmax),
        }
    }

    /// True when all bounds are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        [self.xmin, self.xmax, self.ymin, self.ymax]
            .into_iter()
            .chain(self.zmin)
            .chain(self.zmax)
            .all(f64::is_finite)
    }
}

/// `data.spec` for regular surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurfaceSpecification {
    /// Columns.
    pub ncol: u32,
    /// Rows.
    pub nrow: u32,
    /// Origin x.
    pub xori: f64,
    /// Origin y.
    pub yori: f64,
    /// Increment x.
    pub xinc: f64,
    /// Increment y.
    pub yinc: f64,
    /// Y axis orientation.
    pub yflip: AxisOrientation,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Undefined value.
    pub undef: f64,
}

/// `data.spec` for seismic cubes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CubeSpecification {
    /// Columns.
    pub ncol: u32,
    /// Rows.
    pub nrow: u32,
    /// Layers.
    pub nlay: u32,
    /// Origin x.
    pub xori: f64,
    /// Origin y.
    pub yori: f64,
    /// Origin z.
    pub zori: f64,
    /// Increment x.
    pub xinc: f64,
    /// Increment y.
    pub yinc: f64,
    /// Increment z.
    pub zinc: f64,
    /// Y axis orientation.
    pub yflip: AxisOrientation,
    /// Z axis orientation.
    pub zflip: AxisOrientation,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Undefined value.
    pub undef: f64,
}

/// `data.spec` for corner point grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CpGridSpecification {
    /// Columns.
    pub ncol: u32,
    /// Rows.
    pub nrow: u32,
    /// Layers.
    pub nlay: u32,
    /// Shift x.
    pub xshift: f64,
    /// Shift y.
    pub yshift: f64,
    /// Shift z.
    pub zshift: f64,
    /// Scale x.
    pub xscale: f64,
    /// Scale y.
    pub yscale: f64,
    /// Scale z.
    pub zscale: f64,
}

/// `data.spec` for grid properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CpGridPropertySpecification {
    /// Columns.
    pub ncol: u32,
    /// Rows.
    pub nrow: u32,
    /// Layers.
    pub nlay: u32,
}

/// `data.spec` for tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSpecification {
    /// Column names.
    pub columns: Vec<String>,
    /// Number of columns.
    pub num_columns: usize,
    /// Number of rows.
    pub num_rows: usize,
    /// Number of cells.
    pub size: usize,
}

/// `data.spec` for points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointsSpecification {
    /// Attribute columns beyond x, y and z.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<String>>,
    /// Number of cells.
    pub size: usize,
}

/// `data.spec` for polygons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolygonsSpecification {
    /// Number of distinct polygons.
    pub npolys: usize,
}

/// `data.spec` for triangulated surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriangulatedSurfaceSpecification {
    /// Number of vertices.
    pub num_vertices: usize,
    /// Number of triangles.
    pub num_triangles: usize,
}

/// Any shape specification.
///
/// Variants are ordered so untagged deserialization picks the right one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Specification {
    /// Seismic cube.
    Cube(CubeSpecification),
    /// Regular surface.
    Surface(SurfaceSpecification),
    /// Corner point grid.
    CpGrid(CpGridSpecification),
    /// Grid property.
    CpGridProperty(CpGridPropertySpecification),
    /// Table.
    Table(TableSpecification),
    /// Points.
    Points(PointsSpecification),
    /// Polygons.
    Polygons(PolygonsSpecification),
    /// Triangulated surface.
    TriangulatedSurface(TriangulatedSurfaceSpecification),
}

/// A timestamp with an optional label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampEntry {
    /// ISO 8601 datetime.
    pub value: String,
    /// Label, e.g. `base` or `monitor`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// `data.time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    /// The older timestamp.
    pub t0: TimestampEntry,
    /// The newer timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t1: Option<TimestampEntry>,
}

/// The `data` block.
///
/// `content` selects which payload key, if any, must be present; the
/// payload is flattened in under its content name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataBlock {
    /// Content kind.
    pub content: Content,
    /// Content specific payload.
    #[serde(flatten)]
    pub payload: Option<ContentPayload>,
    /// Object name, possibly from the stratigraphy table.
    pub name: String,
    /// Whether the name is a known stratigraphic unit.
    pub stratigraphic: bool,
    /// Alternative names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<Vec<String>>,
    /// Tag name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagname: Option<String>,
    /// Offset from the named horizon.
    #[serde(default)]
    pub offset: f64,
    /// Top reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<Layer>,
    /// Base reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<Layer>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<String>>,
    /// Geometry reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    /// Bounding box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    /// Storage format.
    pub format: String,
    /// Layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    /// Unit.
    #[serde(default)]
    pub unit: String,
    /// Vertical domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_domain: Option<VerticalDomain>,
    /// Vertical reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_reference: Option<DomainReference>,
    /// Shape specification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<Specification>,
    /// Index columns for tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_index: Option<Vec<String>>,
    /// Time markers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Time>,
    /// Whether undefined values mean zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undef_is_zero: Option<bool>,
    /// Prediction flag.
    pub is_prediction: bool,
    /// Observation flag.
    pub is_observation: bool,
}
