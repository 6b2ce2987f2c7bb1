//! A1-style cell-range helpers.
//!
//! Column labels use the bijective base-26 numeral system spreadsheets use for
//! column names: index 0 is `A`, 25 is `Z`, 26 is `AA`. Ranges are 1-indexed,
//! inclusive and row-major.

mod builders;
mod cell_range;
mod error;
mod label;

pub use builders::{column_range, header_range, row_range};
pub use cell_range::CellRange;
pub use error::{RangeError, Result};
pub use label::{column_index, column_label, normalize_label};
