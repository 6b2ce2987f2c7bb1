//! Spreadsheet access in the shape of a hosted-sheets client: authorize once,
//! open spreadsheets by name, then read and fill worksheets through
//! [`Worksheet`] handles.
//!
//! Spreadsheets live as `.xlsx` files under [`ClientConfig::root`].

mod config;
mod spreadsheet;
mod worksheet;

pub use config::ClientConfig;
pub use spreadsheet::{Spreadsheet, SpreadsheetClient};
pub use worksheet::{PositionedCell, RowRef, Worksheet};
