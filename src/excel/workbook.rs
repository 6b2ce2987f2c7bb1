use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, open_workbook_auto};
use rust_xlsxwriter::{Format, Formula, Workbook as XlsxWorkbook, Worksheet as XlsxWorksheet};
use std::path::Path;

use crate::excel::cell::{bool_text, format_float};
use crate::excel::{Cell, CellType, DataTypeInfo, Sheet, excel_date_to_iso_string};

// Excel's own limit on worksheet names
const MAX_SHEET_NAME_LEN: usize = 31;

#[derive(Clone, Debug, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
    structure_modified: bool,
}

/// Reads every worksheet of `path`. Sheets get at least `default_grid`
/// (rows, columns) of room, more if the file already uses more.
pub fn open_workbook<P: AsRef<Path>>(path: P, default_grid: (usize, usize)) -> Result<Workbook> {
    let path_ref = path.as_ref();

    let mut workbook = open_workbook_auto(path_ref)
        .with_context(|| format!("Unable to parse Excel file: {}", path_ref.display()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for name in &sheet_names {
        let range = workbook
            .worksheet_range(name)
            .with_context(|| format!("Unable to read worksheet: {}", name))?;

        // Not every format exposes formulas; values alone are still usable
        let formulas = match workbook.worksheet_formula(name) {
            Ok(formulas) => Some(formulas),
            Err(e) => {
                log::debug!("No formulas read for worksheet '{}': {}", name, e);
                None
            }
        };

        sheets.push(create_sheet_from_range(name, &range, formulas.as_ref(), default_grid));
    }

    if sheets.is_empty() {
        anyhow::bail!("No worksheets found in file");
    }

    log::debug!(
        "Loaded {} worksheet(s) from {}",
        sheets.len(),
        path_ref.display()
    );

    Ok(Workbook {
        sheets,
        structure_modified: false,
    })
}

fn create_sheet_from_range(
    name: &str,
    range: &Range<Data>,
    formulas: Option<&Range<String>>,
    default_grid: (usize, usize),
) -> Sheet {
    let mut sheet = Sheet::new(name, default_grid.0, default_grid.1);

    // Positions from used_cells are relative to the range start
    let (row_offset, col_offset) = offset_of(range.start());

    for (row_idx, col_idx, cell) in range.used_cells() {
        let (value, cell_type, original_type) = match cell {
            Data::Empty => continue,

            Data::String(s) => (s.clone(), CellType::Text, Some(DataTypeInfo::String)),

            Data::Float(f) => (
                format_float(*f),
                CellType::Number,
                Some(DataTypeInfo::Float(*f)),
            ),

            Data::Int(i) => (i.to_string(), CellType::Number, Some(DataTypeInfo::Int(*i))),

            Data::Bool(b) => (
                bool_text(*b).to_string(),
                CellType::Boolean,
                Some(DataTypeInfo::Bool(*b)),
            ),

            Data::Error(e) => (
                format!("Error: {:?}", e),
                CellType::Text,
                Some(DataTypeInfo::Error),
            ),

            Data::DateTime(dt) => {
                let serial = dt.as_f64();
                (
                    excel_date_to_iso_string(serial).unwrap_or_else(|| format_float(serial)),
                    CellType::Date,
                    Some(DataTypeInfo::DateTime(serial)),
                )
            }

            Data::DateTimeIso(s) => (
                s.clone(),
                CellType::Date,
                Some(DataTypeInfo::DateTimeIso(s.clone())),
            ),

            Data::DurationIso(s) => (
                s.clone(),
                CellType::Text,
                Some(DataTypeInfo::DurationIso(s.clone())),
            ),
        };

        let row = row_offset + row_idx + 1;
        let col = col_offset + col_idx + 1;
        place(&mut sheet, row, col, Cell::new_with_type(value, false, cell_type, original_type));
    }

    if let Some(formulas) = formulas {
        let (row_offset, col_offset) = offset_of(formulas.start());

        for (row_idx, col_idx, formula) in formulas.cells() {
            if formula.is_empty() {
                continue;
            }

            let formula = if formula.starts_with('=') {
                formula.clone()
            } else {
                format!("={}", formula)
            };

            let row = row_offset + row_idx + 1;
            let col = col_offset + col_idx + 1;
            place(&mut sheet, row, col, Cell::text(formula));
        }
    }

    sheet.row_count = sheet.row_count.max(sheet.max_rows);
    sheet.col_count = sheet.col_count.max(sheet.max_cols);
    sheet
}

fn offset_of(start: Option<(u32, u32)>) -> (usize, usize) {
    start
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0))
}

// Loading bypasses grid limits; the grid is widened to fit afterwards
fn place(sheet: &mut Sheet, row: usize, col: usize, cell: Cell) {
    sheet.ensure_cell_exists(row, col);
    sheet.data[row][col] = cell;
    sheet.max_rows = sheet.max_rows.max(row);
    sheet.max_cols = sheet.max_cols.max(col);
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    pub fn add_worksheet(&mut self, name: &str, rows: usize, cols: usize) -> Result<&mut Sheet> {
        if name.trim().is_empty() {
            anyhow::bail!("Worksheet name cannot be empty");
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            anyhow::bail!(
                "Worksheet name '{}' is longer than {} characters",
                name,
                MAX_SHEET_NAME_LEN
            );
        }
        if name.contains(['[', ']', ':', '*', '?', '/', '\\']) {
            anyhow::bail!("Worksheet name '{}' contains invalid characters", name);
        }
        // Excel compares sheet names case-insensitively
        if self
            .sheets
            .iter()
            .any(|s| s.name.to_lowercase() == name.to_lowercase())
        {
            anyhow::bail!("A worksheet named '{}' already exists", name);
        }

        self.sheets.push(Sheet::new(name, rows, cols));
        self.structure_modified = true;

        let index = self.sheets.len() - 1;
        Ok(&mut self.sheets[index])
    }

    pub fn is_modified(&self) -> bool {
        self.structure_modified || self.sheets.iter().any(Sheet::is_modified)
    }

    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut workbook = XlsxWorkbook::new();

        let number_format = Format::new().set_num_format("General");
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet().set_name(&sheet.name)?;

            for col in 0..sheet.max_cols {
                worksheet.set_column_width(u16::try_from(col)?, 15)?;
            }

            for row in 1..=sheet.max_rows {
                for col in 1..=sheet.max_cols {
                    let Some(cell) = sheet.get(row, col) else {
                        continue;
                    };

                    // Skip empty cells
                    if cell.is_empty() {
                        continue;
                    }

                    let row_idx = u32::try_from(row - 1)?;
                    let col_idx = u16::try_from(col - 1)?;

                    match cell.cell_type {
                        _ if cell.is_formula => {
                            worksheet.write_formula(row_idx, col_idx, Formula::new(&cell.value))?;
                        }
                        CellType::Number => match number_of(cell) {
                            Some(num) => {
                                worksheet.write_number_with_format(
                                    row_idx,
                                    col_idx,
                                    num,
                                    &number_format,
                                )?;
                            }
                            None => {
                                worksheet.write_string(row_idx, col_idx, &cell.value)?;
                            }
                        },
                        CellType::Date => match cell.original_type {
                            Some(DataTypeInfo::DateTime(serial)) => {
                                let format = if serial.fract() == 0.0 {
                                    &date_format
                                } else {
                                    &datetime_format
                                };
                                worksheet.write_number_with_format(
                                    row_idx, col_idx, serial, format,
                                )?;
                            }
                            _ => {
                                worksheet.write_string_with_format(
                                    row_idx,
                                    col_idx,
                                    &cell.value,
                                    &date_format,
                                )?;
                            }
                        },
                        CellType::Boolean => write_boolean(worksheet, row_idx, col_idx, cell)?,
                        CellType::Text => {
                            worksheet.write_string(row_idx, col_idx, &cell.value)?;
                        }
                        CellType::Empty => {}
                    }
                }
            }
        }

        workbook
            .save(path)
            .with_context(|| format!("Unable to write workbook: {}", path.display()))?;

        self.structure_modified = false;
        for sheet in &mut self.sheets {
            sheet.is_modified = false;
        }

        log::debug!("Saved {} worksheet(s) to {}", self.sheets.len(), path.display());
        Ok(())
    }
}

fn number_of(cell: &Cell) -> Option<f64> {
    match cell.original_type {
        Some(DataTypeInfo::Int(i)) => Some(i as f64),
        Some(DataTypeInfo::Float(f)) if f.is_finite() => Some(f),
        _ => cell.value.parse::<f64>().ok().filter(|f| f.is_finite()),
    }
}

fn write_boolean(worksheet: &mut XlsxWorksheet, row: u32, col: u16, cell: &Cell) -> Result<()> {
    let parsed = match cell.original_type {
        Some(DataTypeInfo::Bool(b)) => Some(b),
        _ if cell.value.eq_ignore_ascii_case("true") => Some(true),
        _ if cell.value.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    };

    match parsed {
        Some(b) => worksheet.write_boolean(row, col, b)?,
        None => worksheet.write_string(row, col, &cell.value)?,
    };
    Ok(())
}
