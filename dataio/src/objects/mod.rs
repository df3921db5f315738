//! Object metadata providers.
//!
//! A [`DataObject`] is described once per export into an
//! [`ObjectDescriptor`]: class, layout, format, extension, subfolder,
//! bounding box, shape spec and table index. Object naming goes through the
//! stratigraphy lookup in [`NamedStratigraphy`].

pub mod model;
mod providers;
mod stratigraphy;
mod table_index;

pub use model::{
    CellValue, Column, CornerPointGrid, Cube, DataObject, Extent3D, GridProperty, Points, Polygons,
    RegularSurface, Table, TableLayout, TriangulatedSurface,
};
pub use providers::{provider_for, ObjectDescriptor, ObjectProvider};
pub use stratigraphy::{derive_name, NamedStratigraphy};
pub use table_index::derive_table_index;
