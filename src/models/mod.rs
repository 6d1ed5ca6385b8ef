pub mod biomarker;
pub mod enums;
pub mod results;

pub use biomarker::*;
pub use results::*;

use thiserror::Error;

/// A string did not name any variant of a string-backed enum.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field} value: {value}")]
pub struct ParseEnumError {
    pub field: String,
    pub value: String,
}
