//! Utility functions for hashing, timestamps and small path helpers.

mod hashing;
pub mod timestamps;

pub use hashing::{md5sum, md5sum_bytes, uuid_from_string};
pub use timestamps::{convert_datestr_to_isoformat, utc_now, Timestamp};

/// Normalises description input (string or list of strings) to a list.
///
/// Empty input yields `None`.
#[must_use]
pub fn generate_description(desc: &[String]) -> Option<Vec<String>> {
    let lines: Vec<String> = desc.iter().filter(|d| !d.is_empty()).cloned().collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines)
    }
}
