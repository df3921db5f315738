//! Configuration resolution.
//!
//! Raw caller arguments ([`ExportInput`]) and the static project
//! configuration ([`GlobalConfiguration`]) are reduced once per export call
//! into an immutable [`ExportConfig`]. Legacy forms are upgraded along the
//! way and reported through the diagnostics channel.

mod content;
mod export_config;
mod global;
mod inputs;
mod resolve;

pub use content::{
    resolve_content, resolve_content_enum, ContentInput, ContentPayload, FieldOutline, FieldRegion,
    FluidContact, Property, ResolvedContent, Seismic,
};
pub use export_config::{
    ExportConfig, ExportConfigBuilder, ExportFlags, NamingConfig, TableConfig, TimedataEntry,
};
pub use global::{
    config_from_env, load_config_from_path, resolve_global_config, AccessConfig,
    GlobalConfiguration, SsdlConfig, Stratigraphy, StratigraphyElement,
};
pub use inputs::{
    DescriptionInput, ExportInput, LegacyAccess, TimedataInput, VerticalDomainInput, WorkflowInput,
};
pub use resolve::{
    first_present, resolve_classification, resolve_description, resolve_rep_include,
    resolve_vertical_domain, resolve_workflow, Candidate,
};
