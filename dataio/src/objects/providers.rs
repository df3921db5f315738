//! Per-shape descriptors.
//!
//! Each shape variant implements [`ObjectProvider`]; [`provider_for`] picks
//! the implementation for a [`DataObject`] and [`ObjectDescriptor`] collects
//! what one export needs from it.

use std::collections::BTreeSet;

use crate::config::ExportConfig;
use crate::definitions::{formats, ExportFolder, UNDEF};
use crate::diagnostics::DiagnosticSink;
use crate::enums::{FmuClass, Layout};
use crate::errors::{ConfigurationError, Result};
use crate::metadata::data::{
    BoundingBox, CpGridPropertySpecification, CpGridSpecification, CubeSpecification,
    PointsSpecification, PolygonsSpecification, Specification, SurfaceSpecification,
    TableSpecification, TriangulatedSurfaceSpecification,
};

use super::model::{
    CornerPointGrid, Cube, DataObject, GridProperty, Points, Polygons, RegularSurface, Table,
    TableLayout, TriangulatedSurface,
};
use super::stratigraphy::derive_name;
use super::table_index::derive_table_index;

const GRID_FORMAT: &str = "roff";

/// Shape-specific metadata derivation.
pub trait ObjectProvider {
    /// Record class.
    fn classname(&self) -> FmuClass;

    /// Data layout.
    fn layout(&self) -> Layout;

    /// Standard export subfolder.
    fn efolder(&self) -> ExportFolder;

    /// Storage format.
    fn fmt(&self) -> &str;

    /// Accepted formats and their extensions.
    fn valid_formats(&self) -> &'static [(&'static str, &'static str)];

    /// File extension for [`Self::fmt`].
    fn extension(&self) -> Result<&'static str> {
        let fmt = self.fmt();
        formats::extension(self.valid_formats(), fmt).ok_or_else(|| {
            let valid: Vec<&str> = self.valid_formats().iter().map(|(name, _)| *name).collect();
            ConfigurationError::new(format!(
                "The file format {fmt} is not supported. Valid {} formats are: {}",
                self.classname(),
                valid.join(", ")
            ))
            .into()
        })
    }

    /// `data.bbox`.
    fn get_bounding_box(&self) -> Option<BoundingBox> {
        None
    }

    /// `data.spec`.
    fn get_shape_spec(&self) -> Option<Specification> {
        None
    }

    /// `data.table_index`, tabular shapes only.
    fn derive_table_index(&self, _sink: &dyn DiagnosticSink) -> Result<Option<Vec<String>>> {
        Ok(None)
    }
}

/// Everything one export needs to know about the object's shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDescriptor {
    /// Object name used for the file name.
    pub name: String,
    /// Record class.
    pub classname: FmuClass,
    /// Data layout.
    pub layout: Layout,
    /// Storage format.
    pub fmt: String,
    /// File extension including the dot.
    pub extension: String,
    /// Standard export subfolder.
    pub efolder: ExportFolder,
    /// Bounding box.
    pub bbox: Option<BoundingBox>,
    /// Shape specification.
    pub spec: Option<Specification>,
    /// Table index.
    pub table_index: Option<Vec<String>>,
}

impl ObjectDescriptor {
    /// Describes `obj` under `config`.
    pub fn describe(obj: &DataObject, config: &ExportConfig, sink: &dyn DiagnosticSink) -> Result<Self> {
        let provider = provider_for(obj, config);
        Ok(Self {
            name: derive_name(&config.naming().name, obj.name()),
            classname: provider.classname(),
            layout: provider.layout(),
            fmt: provider.fmt().to_string(),
            extension: provider.extension()?.to_string(),
            efolder: provider.efolder(),
            bbox: provider.get_bounding_box(),
            spec: provider.get_shape_spec(),
            table_index: provider.derive_table_index(sink)?,
        })
    }
}

/// Picks the provider for `obj`.
#[must_use]
pub fn provider_for<'a>(obj: &'a DataObject, config: &'a ExportConfig) -> Box<dyn ObjectProvider + 'a> {
    match obj {
        DataObject::RegularSurface(o) => Box::new(SurfaceProvider(o)),
        DataObject::CornerPointGrid(o) => Box::new(CpGridProvider(o)),
        DataObject::GridProperty(o) => Box::new(CpGridPropertyProvider(o)),
        DataObject::Points(o) => Box::new(PointsProvider { obj: o, config }),
        DataObject::Polygons(o) => Box::new(PolygonsProvider { obj: o, config }),
        DataObject::Cube(o) => Box::new(CubeProvider(o)),
        DataObject::Table(o) => Box::new(TableProvider { obj: o, config }),
        DataObject::Dictionary(_) => Box::new(DictionaryProvider),
        DataObject::TriangulatedSurface(o) => Box::new(TriangulatedSurfaceProvider(o)),
    }
}

/// Min and max over finite values, `None` when there are none.
fn min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Map coordinates of node `(i, j)` counted from zero on a rotated grid.
#[allow(clippy::too_many_arguments)]
fn node_xy(xori: f64, yori: f64, xinc: f64, yinc: f64, yflip: f64, rotation: f64, i: u32, j: u32) -> (f64, f64) {
    let (sin, cos) = rotation.to_radians().sin_cos();
    let dx = f64::from(i) * xinc;
    let dy = f64::from(j) * yinc * yflip;
    (xori + dx * cos - dy * sin, yori + dx * sin + dy * cos)
}

#[allow(clippy::too_many_arguments)]
fn corner_extent(
    xori: f64,
    yori: f64,
    xinc: f64,
    yinc: f64,
    yflip: f64,
    rotation: f64,
    ncol: u32,
    nrow: u32,
) -> (f64, f64, f64, f64) {
    let imax = ncol.saturating_sub(1);
    let jmax = nrow.saturating_sub(1);
    let corners = [(0, 0), (imax, 0), (0, jmax), (imax, jmax)]
        .map(|(i, j)| node_xy(xori, yori, xinc, yinc, yflip, rotation, i, j));
    let (xmin, xmax) = min_max(corners.iter().map(|c| c.0)).unwrap_or((xori, xori));
    let (ymin, ymax) = min_max(corners.iter().map(|c| c.1)).unwrap_or((yori, yori));
    (xmin, xmax, ymin, ymax)
}

struct SurfaceProvider<'a>(&'a RegularSurface);

impl ObjectProvider for SurfaceProvider<'_> {
    fn classname(&self) -> FmuClass {
        FmuClass::Surface
    }

    fn layout(&self) -> Layout {
        Layout::Regular
    }

    fn efolder(&self) -> ExportFolder {
        ExportFolder::Maps
    }

    fn fmt(&self) -> &str {
        "irap_binary"
    }

    fn valid_formats(&self) -> &'static [(&'static str, &'static str)] {
        formats::SURFACE
    }

    fn get_bounding_box(&self) -> Option<BoundingBox> {
        let s = self.0;
        let (xmin, xmax, ymin, ymax) = corner_extent(
            s.xori,
            s.yori,
            s.xinc,
            s.yinc,
            f64::from(s.yflip.value()),
            s.rotation,
            s.ncol,
            s.nrow,
        );
        let defined = s.values.iter().flatten().copied().filter(|v| v.abs() < UNDEF);
        Some(match min_max(defined) {
            Some((zmin, zmax)) => BoundingBox::new_3d(xmin, xmax, ymin, ymax, zmin, zmax),
            None => BoundingBox::new_2d(xmin, xmax, ymin, ymax),
        })
    }

    fn get_shape_spec(&self) -> Option<Specification> {
        let s = self.0;
        Some(Specification::Surface(SurfaceSpecification {
            ncol: s.ncol,
            nrow: s.nrow,
            xori: s.xori,
            yori: s.yori,
            xinc: s.xinc,
            yinc: s.yinc,
            yflip: s.yflip,
            rotation: s.rotation,
            undef: UNDEF,
        }))
    }
}

struct CpGridProvider<'a>(&'a CornerPointGrid);

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

impl ObjectProvider for CpGridProvider<'_> {
    fn classname(&self) -> FmuClass {
        FmuClass::Cpgrid
    }

    fn layout(&self) -> Layout {
        Layout::Cornerpoint
    }

    fn efolder(&self) -> ExportFolder {
        ExportFolder::Grids
    }

    fn fmt(&self) -> &str {
        GRID_FORMAT
    }

    fn valid_formats(&self) -> &'static [(&'static str, &'static str)] {
        formats::GRID
    }

    fn get_bounding_box(&self) -> Option<BoundingBox> {
        let e = self.0.extent;
        Some(BoundingBox::new_3d(
            round4(e.xmin),
            round4(e.xmax),
            round4(e.ymin),
            round4(e.ymax),
            round4(e.zmin),
            round4(e.zmax),
        ))
    }

    fn get_shape_spec(&self) -> Option<Specification> {
        let g = self.0;
        Some(Specification::CpGrid(CpGridSpecification {
            ncol: g.ncol,
            nrow: g.nrow,
            nlay: g.nlay,
            xshift: g.xshift,
            yshift: g.yshift,
            zshift: g.zshift,
            xscale: g.xscale,
            yscale: g.yscale,
            zscale: g.zscale,
        }))
    }
}

struct CpGridPropertyProvider<'a>(&'a GridProperty);

impl ObjectProvider for CpGridPropertyProvider<'_> {
    fn classname(&self) -> FmuClass {
        FmuClass::CpgridProperty
    }

    fn layout(&self) -> Layout {
        Layout::Cornerpoint
    }

    fn efolder(&self) -> ExportFolder {
        ExportFolder::Grids
    }

    fn fmt(&self) -> &str {
        GRID_FORMAT
    }

    fn valid_formats(&self) -> &'static [(&'static str, &'static str)] {
        formats::GRID
    }

    fn get_shape_spec(&self) -> Option<Specification> {
        let p = self.0;
        Some(Specification::CpGridProperty(CpGridPropertySpecification {
            ncol: p.ncol,
            nrow: p.nrow,
            nlay: p.nlay,
        }))
    }
}

fn box_3d(x: &[f64], y: &[f64], z: &[f64]) -> Option<BoundingBox> {
    let (xmin, xmax) = min_max(x.iter().copied())?;
    let (ymin, ymax) = min_max(y.iter().copied())?;
    Some(match min_max(z.iter().copied()) {
        Some((zmin, zmax)) => BoundingBox::new_3d(xmin, xmax, ymin, ymax, zmin, zmax),
        None => BoundingBox::new_2d(xmin, xmax, ymin, ymax),
    })
}

struct PointsProvider<'a> {
    obj: &'a Points,
    config: &'a ExportConfig,
}

impl ObjectProvider for PointsProvider<'_> {
    fn classname(&self) -> FmuClass {
        FmuClass::Points
    }

    fn layout(&self) -> Layout {
        Layout::Unset
    }

    fn efolder(&self) -> ExportFolder {
        ExportFolder::Points
    }

    fn fmt(&self) -> &str {
        &self.config.table().points_fformat
    }

    fn valid_formats(&self) -> &'static [(&'static str, &'static str)] {
        formats::POINTS
    }

    fn get_bounding_box(&self) -> Option<BoundingBox> {
        box_3d(&self.obj.x, &self.obj.y, &self.obj.z)
    }

    fn get_shape_spec(&self) -> Option<Specification> {
        let p = self.obj;
        let attributes = (p.columns.len() > 3).then(|| p.columns[3..].to_vec());
        Some(Specification::Points(PointsSpecification {
            attributes,
            size: p.x.len() * p.columns.len(),
        }))
    }
}

struct PolygonsProvider<'a> {
    obj: &'a Polygons,
    config: &'a ExportConfig,
}

impl ObjectProvider for PolygonsProvider<'_> {
    fn classname(&self) -> FmuClass {
        FmuClass::Polygons
    }

    fn layout(&self) -> Layout {
        Layout::Unset
    }

    fn efolder(&self) -> ExportFolder {
        ExportFolder::Polygons
    }

    fn fmt(&self) -> &str {
        &self.config.table().polygons_fformat
    }

    fn valid_formats(&self) -> &'static [(&'static str, &'static str)] {
        formats::POLYGONS
    }

    fn get_bounding_box(&self) -> Option<BoundingBox> {
        box_3d(&self.obj.x, &self.obj.y, &self.obj.z)
    }

    fn get_shape_spec(&self) -> Option<Specification> {
        let npolys = self.obj.poly_ids.iter().flatten().collect::<BTreeSet<_>>().len();
        Some(Specification::Polygons(PolygonsSpecification { npolys }))
    }
}

struct CubeProvider<'a>(&'a Cube);

impl ObjectProvider for CubeProvider<'_> {
    fn classname(&self) -> FmuClass {
        FmuClass::Cube
    }

    fn layout(&self) -> Layout {
        Layout::Regular
    }

    fn efolder(&self) -> ExportFolder {
        ExportFolder::Cubes
    }

    fn fmt(&self) -> &str {
        "segy"
    }

    fn valid_formats(&self) -> &'static [(&'static str, &'static str)] {
        formats::CUBE
    }

    fn get_bounding_box(&self) -> Option<BoundingBox> {
        let c = self.0;
        let (xmin, xmax, ymin, ymax) = corner_extent(
            c.xori,
            c.yori,
            c.xinc,
            c.yinc,
            f64::from(c.yflip.value()),
            c.rotation,
            c.ncol,
            c.nrow,
        );
        let zlast = c.zori + c.zinc * f64::from(c.nlay.saturating_sub(1));
        Some(BoundingBox::new_3d(
            xmin,
            xmax,
            ymin,
            ymax,
            c.zori.min(zlast),
            c.zori.max(zlast),
        ))
    }

    fn get_shape_spec(&self) -> Option<Specification> {
        let c = self.0;
        Some(Specification::Cube(CubeSpecification {
            ncol: c.ncol,
            nrow: c.nrow,
            nlay: c.nlay,
            xori: c.xori,
            yori: c.yori,
            zori: c.zori,
            xinc: c.xinc,
            yinc: c.yinc,
            zinc: c.zinc,
            yflip: c.yflip,
            zflip: c.zflip,
            rotation: c.rotation,
            undef: c.undef,
        }))
    }
}

struct TableProvider<'a> {
    obj: &'a Table,
    config: &'a ExportConfig,
}

impl ObjectProvider for TableProvider<'_> {
    fn classname(&self) -> FmuClass {
        FmuClass::Table
    }

    fn layout(&self) -> Layout {
        Layout::Table
    }

    fn efolder(&self) -> ExportFolder {
        ExportFolder::Tables
    }

    fn fmt(&self) -> &str {
        &self.config.table().table_fformat
    }

    fn valid_formats(&self) -> &'static [(&'static str, &'static str)] {
        match self.obj.layout {
            TableLayout::RowOriented => formats::TABLE,
            TableLayout::Columnar => formats::ARROW_TABLE,
        }
    }

    fn get_shape_spec(&self) -> Option<Specification> {
        let t = self.obj;
        let num_columns = t.columns.len();
        let num_rows = t.num_rows();
        Some(Specification::Table(TableSpecification {
            columns: t.column_names(),
            num_columns,
            num_rows,
            size: num_columns * num_rows,
        }))
    }

    fn derive_table_index(&self, sink: &dyn DiagnosticSink) -> Result<Option<Vec<String>>> {
        derive_table_index(
            self.config.table().table_index.as_deref(),
            self.config.content(),
            self.obj,
            sink,
        )
        .map(Some)
    }
}

struct DictionaryProvider;

impl ObjectProvider for DictionaryProvider {
    fn classname(&self) -> FmuClass {
        FmuClass::Dictionary
    }

    fn layout(&self) -> Layout {
        Layout::Dictionary
    }

    fn efolder(&self) -> ExportFolder {
        ExportFolder::Dictionaries
    }

    fn fmt(&self) -> &str {
        "json"
    }

    fn valid_formats(&self) -> &'static [(&'static str, &'static str)] {
        formats::DICTIONARY
    }
}

struct TriangulatedSurfaceProvider<'a>(&'a TriangulatedSurface);

impl ObjectProvider for TriangulatedSurfaceProvider<'_> {
    fn classname(&self) -> FmuClass {
        FmuClass::TriangulatedSurface
    }

    fn layout(&self) -> Layout {
        Layout::TriangulatedSurface
    }

    fn efolder(&self) -> ExportFolder {
        ExportFolder::Maps
    }

    fn fmt(&self) -> &str {
        "tsurf"
    }

    fn valid_formats(&self) -> &'static [(&'static str, &'static str)] {
        formats::TRIANGULATED_SURFACE
    }

    fn get_bounding_box(&self) -> Option<BoundingBox> {
        let v = &self.0.vertices;
        let axis = |k: usize| v.iter().map(|p| p[k]).collect::<Vec<_>>();
        box_3d(&axis(0), &axis(1), &axis(2))
    }

    fn get_shape_spec(&self) -> Option<Specification> {
        Some(Specification::TriangulatedSurface(TriangulatedSurfaceSpecification {
            num_vertices: self.0.vertices.len(),
            num_triangles: self.0.triangles.len(),
        }))
    }
}
