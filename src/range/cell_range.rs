use std::fmt;
use std::str::FromStr;

use crate::range::error::{RangeError, Result};
use crate::range::label::{column_index, label_for};

/// A rectangular block of cells, corners inclusive.
///
/// Rows and columns are 1-based, matching the A1 text form (`A1` is `(1, 1)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    first_row: usize,
    first_col: usize,
    last_row: usize,
    last_col: usize,
}

impl CellRange {
    /// Builds a range from two corners given in any order.
    pub fn new(from: (usize, usize), to: (usize, usize)) -> Result<Self> {
        if from.0 == 0 || from.1 == 0 || to.0 == 0 || to.1 == 0 {
            return Err(RangeError::invalid(format!(
                "range corners are 1-indexed, got {from:?}:{to:?}"
            )));
        }

        Ok(Self {
            first_row: from.0.min(to.0),
            first_col: from.1.min(to.1),
            last_row: from.0.max(to.0),
            last_col: from.1.max(to.1),
        })
    }

    /// Parses `B2:D7` or a single reference such as `C3`.
    ///
    /// ```
    /// use sheetfill::range::CellRange;
    ///
    /// let range = CellRange::parse("b2:ac4").unwrap();
    /// assert_eq!((range.first_row(), range.first_col()), (2, 2));
    /// assert_eq!(range.end_column_label(), "AC");
    /// assert_eq!(range.to_string(), "B2:AC4");
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        match s.split_once(':') {
            Some((start, end)) => Self::new(parse_reference(start)?, parse_reference(end)?),
            None => {
                let cell = parse_reference(s)?;
                Self::new(cell, cell)
            }
        }
    }

    pub fn first_row(&self) -> usize {
        self.first_row
    }

    pub fn first_col(&self) -> usize {
        self.first_col
    }

    pub fn last_row(&self) -> usize {
        self.last_row
    }

    pub fn last_col(&self) -> usize {
        self.last_col
    }

    pub fn width(&self) -> usize {
        self.last_col - self.first_col + 1
    }

    pub fn height(&self) -> usize {
        self.last_row - self.first_row + 1
    }

    pub fn cell_count(&self) -> usize {
        self.width() * self.height()
    }

    pub fn start_column_label(&self) -> String {
        label_for(self.first_col as u64 - 1)
    }

    pub fn end_column_label(&self) -> String {
        label_for(self.last_col as u64 - 1)
    }

    /// Cell positions `(row, col)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.first_row..=self.last_row)
            .flat_map(move |row| (self.first_col..=self.last_col).map(move |col| (row, col)))
    }
}

impl FromStr for CellRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self> {
        CellRange::parse(s)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            self.start_column_label(),
            self.first_row,
            self.end_column_label(),
            self.last_row
        )
    }
}

// Parses a single A1 reference into 1-based (row, col).
fn parse_reference(reference: &str) -> Result<(usize, usize)> {
    let split = reference
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(reference.len());
    let (letters, digits) = reference.split_at(split);

    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RangeError::invalid(format!(
            "not an A1 cell reference: {reference:?}"
        )));
    }

    let col = usize::try_from(column_index(letters)?)
        .ok()
        .and_then(|c| c.checked_add(1))
        .ok_or_else(|| RangeError::invalid(format!("column out of range: {letters}")))?;
    let row = digits
        .parse::<usize>()
        .map_err(|_| RangeError::invalid(format!("row out of range: {digits}")))?;

    if row == 0 {
        return Err(RangeError::invalid(format!(
            "rows are 1-indexed, got {reference:?}"
        )));
    }

    Ok((row, col))
}
