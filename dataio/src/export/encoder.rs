//! The seam to the code that writes data files.

use std::path::Path;

use crate::errors::Result;
use crate::objects::DataObject;

/// Writes the bytes of a data object in a given format.
///
/// Implementations live outside this crate; failures should be reported as
/// [`crate::DataioError::Encoding`].
#[cfg_attr(test, mockall::automock)]
pub trait ObjectEncoder {
    /// Writes `obj` as `format` to `out`.
    fn encode(&self, obj: &DataObject, format: &str, out: &Path) -> Result<()>;
}
