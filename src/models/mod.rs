//! Request and response models for the table renderer
//!
//! This module holds the wire types shared by every renderer and the HTML
//! parser: the `RenderRequest` describing a table, the `ParseRequest`
//! describing an HTML table to convert back, and the sparse format overrides
//! that both directions speak.

pub mod alignment;
pub mod errors;
pub mod parse_request;
pub mod request;

pub use alignment::Alignment;
pub use errors::{ModelError, ModelResult};
pub use parse_request::{ParseAlignments, ParseRequest, SizeUnits};
pub use request::{CellFormat, ColumnFormat, RenderRequest, RowFormat};

use serde::{Deserialize, Deserializer};

/// Deserialize an explicit JSON `null` the same way as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_zero(value: &i32) -> bool {
    *value == 0
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}
