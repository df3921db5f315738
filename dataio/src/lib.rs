//! # Dataio
//!
//! Metadata derivation and export for ensemble simulation results.
//!
//! Every exported data file gets a metadata document next to it that says
//! what the data is, where it came from and who may see it:
//!
//! - **Run context**: case, ensemble and realization detected from the
//!   environment
//! - **Identity**: deterministic UUIDs for ensembles, realizations and
//!   entities
//! - **Configuration**: caller arguments and the global project
//!   configuration resolved into one immutable export configuration
//! - **Validation**: documents are checked before anything is written
//! - **Manifest**: every export in a run is listed in an export manifest
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dataio::prelude::*;
//!
//! let input = ExportInput::new()
//!     .with_config(global_config)
//!     .with_content("depth")
//!     .with_name("TopVolantis");
//!
//! let exporter = ExportData::new(&input)?;
//! let outcome = exporter.export(&DataObject::RegularSurface(surface), &encoder)?;
//! println!("{}", outcome.data_path.display());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod definitions;
pub mod diagnostics;
pub mod enums;
pub mod errors;
pub mod export;
pub mod identity;
pub mod manifest;
pub mod metadata;
pub mod objects;
pub mod observability;
pub mod runcontext;
pub mod share_path;
pub mod utils;

#[cfg(test)]
mod testing;

pub use errors::{DataioError, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ExportConfig, ExportConfigBuilder, ExportInput, GlobalConfiguration};
    pub use crate::diagnostics::{
        CollectingDiagnosticSink, Diagnostic, DiagnosticKind, DiagnosticSink,
        LoggingDiagnosticSink, NoOpDiagnosticSink,
    };
    pub use crate::enums::{Classification, Content, FmuClass, FmuContext, Layout};
    pub use crate::errors::{ConfigurationError, DataioError, ErrorInfo, Result, ValidationError};
    pub use crate::export::{ExportData, ExportOutcome, ObjectEncoder};
    pub use crate::manifest::{load_export_manifest, ExportManifest};
    pub use crate::metadata::{MetadataDocument, ObjectMetadata};
    pub use crate::objects::{DataObject, ObjectDescriptor};
    pub use crate::observability::{init_logging, LogFormat};
    pub use crate::runcontext::{Environment, RunContext, RunContextResolver};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_exposes_pipeline_entry_points() {
        let tmp = tempfile::tempdir().unwrap();
        let env = Environment::new(tmp.path());
        let input = ExportInput::new().with_content("depth").with_name("TopVolantis");
        let sink = std::sync::Arc::new(CollectingDiagnosticSink::new());

        let exporter = ExportData::from_input(&input, &env, sink).unwrap();
        assert!(exporter.config().config().is_none());
        assert_eq!(input.name, "TopVolantis");
    }
}
