use anyhow::Result;

use crate::excel::Cell;

/// One worksheet held as a 1-based grid: `data[row][col]`, with row 0 and
/// column 0 left as padding. Every row has the same length.
#[derive(Clone, Debug)]
pub struct Sheet {
    pub name: String,
    pub data: Vec<Vec<Cell>>,
    pub max_rows: usize,
    pub max_cols: usize,
    // Grid limits; writes beyond them fail the way a remote sheet would
    pub row_count: usize,
    pub col_count: usize,
    pub(crate) is_modified: bool,
}

impl Sheet {
    pub fn new(name: &str, row_count: usize, col_count: usize) -> Self {
        Self {
            name: name.to_string(),
            data: vec![vec![Cell::empty(); 1]; 1],
            max_rows: 0,
            max_cols: 0,
            row_count,
            col_count,
            is_modified: false,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.data.get(row).and_then(|r| r.get(col))
    }

    pub fn value(&self, row: usize, col: usize) -> &str {
        self.get(row, col).map(|c| c.value.as_str()).unwrap_or("")
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    pub fn ensure_cell_exists(&mut self, row: usize, col: usize) {
        // Expand rows if needed
        if row >= self.data.len() {
            let default_row_len = self.data[0].len().max(col + 1);
            let rows_to_add = row + 1 - self.data.len();

            self.data
                .extend(vec![vec![Cell::empty(); default_row_len]; rows_to_add]);
        }

        // Expand columns if needed
        let width = self.data.iter().map(Vec::len).max().unwrap_or(0);
        if col >= width || self.data.iter().any(|r| r.len() != width) {
            let new_width = width.max(col + 1);
            for row_data in &mut self.data {
                row_data.resize_with(new_width, Cell::empty);
            }
        }
    }

    pub fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row == 0 || col == 0 {
            anyhow::bail!("Cell coordinates are 1-indexed, got ({}, {})", row, col);
        }
        if row > self.row_count || col > self.col_count {
            anyhow::bail!(
                "Cell ({}, {}) exceeds grid limits of sheet '{}' ({} rows x {} columns)",
                row,
                col,
                self.name,
                self.row_count,
                self.col_count
            );
        }
        Ok(())
    }

    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) -> Result<()> {
        self.check_bounds(row, col)?;
        self.ensure_cell_exists(row, col);

        // Only set modified flag if value actually changes
        if self.data[row][col] == cell {
            return Ok(());
        }

        let clearing = cell.is_empty();
        self.data[row][col] = cell;
        self.is_modified = true;

        if clearing {
            self.recalculate_max_rows();
            self.recalculate_max_cols();
        } else {
            self.max_rows = self.max_rows.max(row);
            self.max_cols = self.max_cols.max(col);
        }

        Ok(())
    }

    /// Values of `row` up to its last non-empty cell.
    pub fn row_values(&self, row: usize) -> Vec<String> {
        let mut values: Vec<String> = (1..=self.max_cols)
            .map(|col| self.value(row, col).to_string())
            .collect();
        trim_trailing_empty(&mut values);
        values
    }

    /// Values of `col` up to its last non-empty cell.
    pub fn col_values(&self, col: usize) -> Vec<String> {
        let mut values: Vec<String> = (1..=self.max_rows)
            .map(|row| self.value(row, col).to_string())
            .collect();
        trim_trailing_empty(&mut values);
        values
    }

    /// Every row of the used area, each padded to the used width.
    pub fn all_values(&self) -> Vec<Vec<String>> {
        (1..=self.max_rows)
            .map(|row| {
                (1..=self.max_cols)
                    .map(|col| self.value(row, col).to_string())
                    .collect()
            })
            .collect()
    }

    pub fn row_is_empty(&self, row: usize) -> bool {
        self.data
            .get(row)
            .is_none_or(|cells| cells.iter().all(Cell::is_empty))
    }

    /// Removes `row` and shifts the rows below it up by one.
    pub fn delete_row(&mut self, row: usize) -> Result<()> {
        // If row is less than 1, return early with success
        if row < 1 {
            return Ok(());
        }

        // If row is outside the max range, return early with success
        if row > self.max_rows {
            return Ok(());
        }

        if row < self.data.len() {
            self.data.remove(row);
            self.recalculate_max_rows();
            self.recalculate_max_cols();
            self.is_modified = true;
        }

        Ok(())
    }

    pub fn recalculate_max_cols(&mut self) {
        // Find maximum non-empty column across all rows
        self.max_cols = self
            .data
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .rev()
                    .find(|(_, cell)| !cell.is_empty())
                    .map(|(idx, _)| idx)
                    .unwrap_or(0)
            })
            .max()
            .unwrap_or(0);
    }

    pub fn recalculate_max_rows(&mut self) {
        // Find last row with any non-empty cells
        self.max_rows = self
            .data
            .iter()
            .enumerate()
            .rev()
            .find(|(_, row)| row.iter().any(|cell| !cell.is_empty()))
            .map(|(idx, _)| idx)
            .unwrap_or(0);
    }
}

fn trim_trailing_empty(values: &mut Vec<String>) {
    while values.last().is_some_and(String::is_empty) {
        values.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Sheet {
        let mut sheet = Sheet::new("Data", 10, 5);
        sheet.set_cell(1, 1, Cell::text("name")).unwrap();
        sheet.set_cell(1, 2, Cell::text("age")).unwrap();
        sheet.set_cell(2, 1, Cell::text("ada")).unwrap();
        sheet.set_cell(3, 1, Cell::text("grace")).unwrap();
        sheet.set_cell(3, 2, Cell::text("85")).unwrap();
        sheet
    }

    #[test]
    fn tracks_used_area() {
        let sheet = sample();
        assert_eq!((sheet.max_rows, sheet.max_cols), (3, 2));
        assert!(sheet.is_modified());
        assert_eq!(sheet.row_values(2), vec!["ada"]);
        assert_eq!(sheet.col_values(2), vec!["age", "", "85"]);
        assert_eq!(
            sheet.all_values(),
            vec![vec!["name", "age"], vec!["ada", ""], vec!["grace", "85"]]
        );
    }

    #[test]
    fn writes_outside_grid_fail() {
        let mut sheet = Sheet::new("Small", 2, 2);
        assert!(sheet.set_cell(3, 1, Cell::text("x")).is_err());
        assert!(sheet.set_cell(1, 3, Cell::text("x")).is_err());
        assert!(sheet.set_cell(0, 1, Cell::text("x")).is_err());
        assert!(sheet.set_cell(2, 2, Cell::text("x")).is_ok());
    }

    #[test]
    fn clearing_shrinks_used_area() {
        let mut sheet = sample();
        sheet.set_cell(3, 2, Cell::empty()).unwrap();
        sheet.set_cell(1, 2, Cell::empty()).unwrap();
        assert_eq!((sheet.max_rows, sheet.max_cols), (3, 1));
    }

    #[test]
    fn delete_row_shifts_up() {
        let mut sheet = sample();
        sheet.delete_row(2).unwrap();
        assert_eq!(sheet.col_values(1), vec!["name", "grace"]);
        assert_eq!(sheet.max_rows, 2);

        // Out of range deletes are no-ops
        sheet.delete_row(9).unwrap();
        sheet.delete_row(0).unwrap();
        assert_eq!(sheet.max_rows, 2);
    }
}
