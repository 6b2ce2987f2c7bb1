use crate::range::error::{RangeError, Result};
use crate::range::label::{label_for, normalize_label};

/// Range covering row 1 from column A across `value_count` columns.
///
/// ```
/// assert_eq!(sheetfill::range::header_range(29).unwrap(), "A1:AC1");
/// ```
pub fn header_range(value_count: usize) -> Result<String> {
    row_range(value_count, 1)
        .map_err(|_| RangeError::invalid("header range needs at least one value"))
}

/// Range covering `row` from column A across `value_count` columns.
pub fn row_range(value_count: usize, row: usize) -> Result<String> {
    if value_count == 0 {
        return Err(RangeError::invalid("row range needs at least one value"));
    }
    if row == 0 {
        return Err(RangeError::invalid("rows are 1-indexed, got row 0"));
    }

    let end_col = label_for(value_count as u64 - 1);
    Ok(format!("A{row}:{end_col}{row}"))
}

/// Range covering rows 2 through `value_count + 1` of one column. Row 1 is left
/// for the header.
///
/// A count of zero yields `{COL}2:{COL}2`, which callers treat as "no data rows".
pub fn column_range(value_count: usize, column: &str) -> Result<String> {
    let column = normalize_label(column)?;
    // An empty body still spans row 2 so the range never reaches the header
    let end_row = value_count
        .max(1)
        .checked_add(1)
        .ok_or_else(|| RangeError::invalid(format!("too many values: {value_count}")))?;

    Ok(format!("{column}2:{column}{end_row}"))
}
