//! Shared fixtures for unit tests.
//!
//! - [`CaseFixture`] lays out a case folder with case metadata on disk
//! - [`global_config_value`] is a valid static configuration for the Drogon model
//! - [`object_metadata`] is a valid surface document outside any run

mod fixtures;

pub use fixtures::{
    global_config, global_config_value, object_metadata, surface, CaseFixture, CASE_UUID,
};
