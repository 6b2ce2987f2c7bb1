mod converters;
mod exporters;
mod types;

pub use converters::process_cell_value;
pub use exporters::{parse_row, read_records_file, serialize_to_json, write_json_to_file};
pub use types::{Record, RowInput};
