//! Deterministic identifiers for ensembles, realizations and entities.
//!
//! Every identifier is `md5(concatenated inputs)` read as a UUID, so each
//! realization process derives the same values for the same position in the
//! case hierarchy without coordination.

mod fmu_block;

use uuid::Uuid;

use crate::utils::uuid_from_string;

pub use fmu_block::{derive_restart_from, FmuBlockBuilder};

/// Ensemble (iteration) UUID from the case UUID and the ensemble name.
#[must_use]
pub fn derive_iteration_uuid(case_uuid: &Uuid, iteration_name: &str) -> Uuid {
    uuid_from_string(&format!("{case_uuid}{iteration_name}"))
}

/// Alias of [`derive_iteration_uuid`].
#[must_use]
pub fn derive_ensemble_uuid(case_uuid: &Uuid, ensemble_name: &str) -> Uuid {
    derive_iteration_uuid(case_uuid, ensemble_name)
}

/// Realization UUID from the case UUID, the ensemble UUID and the realization number.
#[must_use]
pub fn derive_realization_uuid(case_uuid: &Uuid, iteration_uuid: &Uuid, realization_id: i64) -> Uuid {
    uuid_from_string(&format!("{case_uuid}{iteration_uuid}{realization_id}"))
}

/// Entity UUID linking the same object across realizations.
#[must_use]
pub fn derive_entity_uuid(case_uuid: &Uuid, share_path: &str) -> Uuid {
    uuid_from_string(&format!("{case_uuid}{share_path}"))
}
