//! In-memory data objects handed to the exporter.
//!
//! These carry only the shape information metadata derivation needs. The
//! bytes on disk are produced by an [`crate::export::ObjectEncoder`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::AxisOrientation;

/// A rotated regular 2D grid of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularSurface {
    /// Object name.
    pub name: String,
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
    /// Rotation in degrees, counter clockwise.
    pub rotation: f64,
    /// Node values; `None` is undefined.
    pub values: Vec<Option<f64>>,
}

/// Cell extent of a corner point grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent3D {
    /// Minimum x.
    pub xmin: f64,
    /// Maximum x.
    pub xmax: f64,
    /// Minimum y.
    pub ymin: f64,
    /// Maximum y.
    pub ymax: f64,
    /// Minimum z.
    pub zmin: f64,
    /// Maximum z.
    pub zmax: f64,
}

/// A corner point grid geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornerPointGrid {
    /// Object name.
    pub name: String,
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
    /// Extent over all cell corners.
    pub extent: Extent3D,
}

/// A property on a corner point grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridProperty {
    /// Object name.
    pub name: String,
    /// Columns.
    pub ncol: u32,
    /// Rows.
    pub nrow: u32,
    /// Layers.
    pub nlay: u32,
}

/// A point set; the first three columns are x, y and z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Points {
    /// Object name.
    pub name: String,
    /// All column names, coordinates first.
    pub columns: Vec<String>,
    /// X coordinates.
    pub x: Vec<f64>,
    /// Y coordinates.
    pub y: Vec<f64>,
    /// Z coordinates.
    pub z: Vec<f64>,
}

/// A set of polygons or polylines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygons {
    /// Object name.
    pub name: String,
    /// X coordinates.
    pub x: Vec<f64>,
    /// Y coordinates.
    pub y: Vec<f64>,
    /// Z coordinates.
    pub z: Vec<f64>,
    /// Polygon id per vertex.
    pub poly_ids: Vec<Option<i64>>,
}

/// A regular seismic cube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cube {
    /// Object name.
    pub name: String,
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

/// How a table is stored in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableLayout {
    /// Row oriented, e.g. a data frame.
    RowOriented,
    /// Columnar, e.g. an arrow table.
    Columnar,
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Missing.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// Text.
    Text(String),
}

impl CellValue {
    /// True for missing values, NaN and empty text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float(f) => f.is_nan(),
            Self::Text(s) => s.is_empty(),
            Self::Bool(_) | Self::Int(_) => false,
        }
    }
}

/// A named table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Values, one per row.
    pub values: Vec<CellValue>,
}

impl Column {
    /// Creates a column.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// True when every value is empty.
    #[must_use]
    pub fn is_all_empty(&self) -> bool {
        self.values.iter().all(CellValue::is_empty)
    }
}

/// A tabular dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Object name, often empty.
    #[serde(default)]
    pub name: String,
    /// In-memory layout.
    pub layout: TableLayout,
    /// Columns in order.
    pub columns: Vec<Column>,
}

impl Table {
    /// Column names in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of rows, taken from the longest column.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).max().unwrap_or(0)
    }
}

/// A triangulated surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangulatedSurface {
    /// Object name.
    pub name: String,
    /// Vertex coordinates.
    pub vertices: Vec<[f64; 3]>,
    /// Vertex indices per triangle.
    pub triangles: Vec<[usize; 3]>,
}

/// Any exportable object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataObject {
    /// Regular surface.
    RegularSurface(RegularSurface),
    /// Corner point grid geometry.
    CornerPointGrid(CornerPointGrid),
    /// Grid property.
    GridProperty(GridProperty),
    /// Points.
    Points(Points),
    /// Polygons.
    Polygons(Polygons),
    /// Seismic cube.
    Cube(Cube),
    /// Table.
    Table(Table),
    /// Free-form dictionary.
    Dictionary(Value),
    /// Triangulated surface.
    TriangulatedSurface(TriangulatedSurface),
}

impl DataObject {
    /// The object's own name, empty if it has none.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::RegularSurface(o) => &o.name,
            Self::CornerPointGrid(o) => &o.name,
            Self::GridProperty(o) => &o.name,
            Self::Points(o) => &o.name,
            Self::Polygons(o) => &o.name,
            Self::Cube(o) => &o.name,
            Self::Table(o) => &o.name,
            Self::TriangulatedSurface(o) => &o.name,
            Self::Dictionary(_) => "",
        }
    }
}
