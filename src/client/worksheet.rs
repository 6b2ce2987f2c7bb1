use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashSet;

use crate::excel::{Cell, Sheet};
use crate::json_export::{Record, process_cell_value};
use crate::range::{CellRange, column_label, header_range, row_range};

/// A cell as returned by a range read. Row and column are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedCell {
    pub row: usize,
    pub col: usize,
    pub value: String,
}

/// Handle to a populated data row, as listed by [`Worksheet::list_all_rows`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowRef(usize);

impl RowRef {
    pub fn row(self) -> usize {
        self.0
    }
}

pub struct Worksheet<'a> {
    sheet: &'a mut Sheet,
}

impl<'a> Worksheet<'a> {
    pub(crate) fn new(sheet: &'a mut Sheet) -> Self {
        Self { sheet }
    }

    pub fn name(&self) -> &str {
        &self.sheet.name
    }

    pub fn read_range(&self, range: &CellRange) -> Result<Vec<PositionedCell>> {
        self.check_range(range)?;

        Ok(range
            .cells()
            .map(|(row, col)| PositionedCell {
                row,
                col,
                value: self.sheet.value(row, col).to_string(),
            })
            .collect())
    }

    /// Writes `values` into `range` in row-major order. Stops at whichever
    /// runs out first; returns how many cells were written.
    pub fn write_range(&mut self, range: &CellRange, values: &[Value]) -> Result<usize> {
        self.check_range(range)?;

        let mut written = 0;
        for ((row, col), value) in range.cells().zip(values) {
            self.sheet.set_cell(row, col, Cell::from_json(value))?;
            written += 1;
        }

        log::debug!("Wrote {} cell(s) to {}!{}", written, self.sheet.name, range);
        Ok(written)
    }

    /// Label of the last column a header row of this length occupies.
    pub fn find_last_col<S: AsRef<str>>(&self, headers: &[S]) -> Result<String> {
        let count = i64::try_from(headers.len())?;
        Ok(column_label(count - 1)?)
    }

    /// Number of rows up to the last populated cell of 1-based column `col`.
    pub fn find_last_row(&self, col: usize) -> usize {
        self.sheet.col_values(col).len()
    }

    /// Writes `values` into `range`, or when none is given, into the row
    /// below the last populated row of column A. Returns the range used.
    pub fn list_fill(&mut self, values: &[Value], range: Option<&CellRange>) -> Result<CellRange> {
        let range = match range {
            Some(range) => *range,
            None => {
                let next_row = self.find_last_row(1) + 1;
                CellRange::parse(&row_range(values.len(), next_row)?)?
            }
        };

        self.write_range(&range, values)?;
        Ok(range)
    }

    /// Appends the map's values as a new row, in key order.
    pub fn dict_fill(&mut self, data: &Record) -> Result<CellRange> {
        let values: Vec<Value> = data.values().cloned().collect();
        self.list_fill(&values, None)
    }

    /// Writes `headers` across row 1 and returns them.
    pub fn fill_headers<S: AsRef<str>>(&mut self, headers: &[S]) -> Result<Vec<String>> {
        let range = CellRange::parse(&header_range(headers.len())?)?;
        let values: Vec<Value> = headers.iter().map(|h| json!(h.as_ref())).collect();

        self.list_fill(&values, Some(&range))?;
        Ok(headers.iter().map(|h| h.as_ref().to_string()).collect())
    }

    /// Writes one record per row starting at `start_row`, matching record keys
    /// to column headers.
    ///
    /// Headers come from row 1 unless `headers` is given, in which case they
    /// are written there first. Only columns whose header is in `keys` are
    /// written (all of them when `keys` is `None`); other columns keep their
    /// contents. Every record must hold a value for every written header.
    pub fn build_sheet_by_keys(
        &mut self,
        data: &[Record],
        start_row: usize,
        keys: Option<&[String]>,
        headers: Option<&[String]>,
    ) -> Result<()> {
        let headers = match headers {
            Some(headers) if !headers.is_empty() => self.fill_headers(headers)?,
            _ => self.sheet.row_values(1),
        };
        if headers.is_empty() {
            anyhow::bail!("Worksheet '{}' has no headers in row 1", self.sheet.name);
        }

        let keys: HashSet<&str> = match keys {
            Some(keys) if !keys.is_empty() => keys.iter().map(String::as_str).collect(),
            _ => headers.iter().map(String::as_str).collect(),
        };

        // Validate everything before the first write
        for (offset, record) in data.iter().enumerate() {
            let row = start_row + offset;
            let range = CellRange::parse(&row_range(headers.len(), row)?)?;
            self.check_range(&range)?;

            for header in headers.iter().filter(|h| keys.contains(h.as_str())) {
                if !record.contains_key(header) {
                    anyhow::bail!("Record for row {} has no value for '{}'", row, header);
                }
            }
        }

        for (offset, record) in data.iter().enumerate() {
            let row = start_row + offset;

            for (col_idx, header) in headers.iter().enumerate() {
                if !keys.contains(header.as_str()) {
                    continue;
                }
                if let Some(value) = record.get(header) {
                    self.sheet.set_cell(row, col_idx + 1, Cell::from_json(value))?;
                }
            }
        }

        log::debug!(
            "Filled {} record(s) into '{}' from row {}",
            data.len(),
            self.sheet.name,
            start_row
        );
        Ok(())
    }

    pub fn get_all_values(&self) -> Vec<Vec<String>> {
        self.sheet.all_values()
    }

    /// Rows below the header as records keyed by the row 1 headers. Empty
    /// cells read as `""`, or `0` with `empty2zero`.
    pub fn get_all_records(&self, empty2zero: bool) -> Vec<Record> {
        let headers = self.sheet.row_values(1);
        let empty = if empty2zero { json!(0) } else { json!("") };

        (2..=self.sheet.max_rows)
            .map(|row| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(col_idx, header)| {
                        let value = self
                            .sheet
                            .get(row, col_idx + 1)
                            .map(process_cell_value)
                            .filter(|v| !v.is_null())
                            .unwrap_or_else(|| empty.clone());
                        (header.clone(), value)
                    })
                    .collect()
            })
            .collect()
    }

    pub fn row_values(&self, row: usize) -> Vec<String> {
        self.sheet.row_values(row)
    }

    pub fn col_values(&self, col: usize) -> Vec<String> {
        self.sheet.col_values(col)
    }

    /// Every populated row below the header.
    pub fn list_all_rows(&self) -> Vec<RowRef> {
        (2..=self.sheet.max_rows)
            .filter(|&row| !self.sheet.row_is_empty(row))
            .map(RowRef)
            .collect()
    }

    pub fn delete_row(&mut self, row: RowRef) -> Result<()> {
        if row.0 < 2 {
            anyhow::bail!("Row {} is not a data row", row.0);
        }

        self.sheet
            .delete_row(row.0)
            .with_context(|| format!("Unable to delete row {}", row.0))
    }

    /// Deletes every listed row. Rows go bottom-up so each reference still
    /// points at the row it was listed for.
    pub fn delete_many_rows(&mut self, rows: &[RowRef]) -> Result<()> {
        let mut rows = rows.to_vec();
        rows.sort_unstable_by(|a, b| b.cmp(a));
        rows.dedup();

        for row in rows {
            self.delete_row(row)?;
        }
        Ok(())
    }

    fn check_range(&self, range: &CellRange) -> Result<()> {
        self.sheet.check_bounds(range.last_row(), range.last_col())
    }
}
