mod cell;
mod sheet;
mod workbook;

pub use cell::{Cell, CellType, DataTypeInfo, excel_date_to_iso_string};
pub use sheet::Sheet;
pub use workbook::{Workbook, open_workbook};
