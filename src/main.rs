use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use sheetfill::client::{ClientConfig, Spreadsheet, SpreadsheetClient};
use sheetfill::json_export::{self, RowInput};
use sheetfill::range::{self, CellRange};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON client config (root, default_rows, default_cols, backup_on_save)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Directory holding the spreadsheets; overrides the config file
    #[arg(long, short = 'r', global = true)]
    root: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG also works)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the column label for a zero-based column index
    Label {
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    /// Print the zero-based column index for a column label
    Index { label: String },
    /// Build a cell range for a number of values
    Range {
        #[command(subcommand)]
        kind: RangeKind,
    },
    /// Create an empty spreadsheet
    Create { spreadsheet: String },
    /// Add worksheets to a spreadsheet
    CreateSheets {
        spreadsheet: String,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Print the cells of a range as JSON
    Read {
        spreadsheet: String,
        worksheet: String,
        range: String,
    },
    /// Print all values as a JSON array of rows
    Values {
        spreadsheet: String,
        worksheet: String,
        /// Write to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Print all rows as JSON records keyed by the row 1 headers
    Records {
        spreadsheet: String,
        worksheet: String,
        /// Read empty cells as 0 instead of ""
        #[arg(long)]
        empty2zero: bool,
        /// Write to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Write headers across row 1
    Headers {
        spreadsheet: String,
        worksheet: String,
        #[arg(required = true)]
        headers: Vec<String>,
    },
    /// Append a row: a JSON array fills in order, a JSON object fills its values
    Append {
        spreadsheet: String,
        worksheet: String,
        json: String,
        /// Write into this range instead of appending (arrays only)
        #[arg(long)]
        range: Option<String>,
    },
    /// Fill rows from a JSON file of records, matched to headers
    Fill {
        spreadsheet: String,
        worksheet: String,
        file: PathBuf,
        #[arg(long, default_value = "2")]
        start_row: usize,
        /// Write these headers to row 1 first
        #[arg(long, num_args = 1..)]
        headers: Vec<String>,
        /// Only fill the columns with these headers
        #[arg(long, num_args = 1..)]
        keys: Vec<String>,
    },
    /// Delete data rows by row number
    DeleteRows {
        spreadsheet: String,
        worksheet: String,
        #[arg(required = true)]
        rows: Vec<usize>,
    },
}

#[derive(Subcommand)]
enum RangeKind {
    /// Row 1 across COUNT columns
    Header { count: usize },
    /// ROW across COUNT columns
    Row { count: usize, row: usize },
    /// Rows 2..COUNT+1 of one column
    Column { count: usize, label: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match &cli.command {
        Command::Label { index } => println!("{}", range::column_label(*index)?),
        Command::Index { label } => println!("{}", range::column_index(label)?),
        Command::Range { kind } => {
            let cell_range = match kind {
                RangeKind::Header { count } => range::header_range(*count)?,
                RangeKind::Row { count, row } => range::row_range(*count, *row)?,
                RangeKind::Column { count, label } => range::column_range(*count, label)?,
            };
            println!("{}", cell_range);
        }
        _ => run_client_command(&cli)?,
    }

    Ok(())
}

fn run_client_command(cli: &Cli) -> Result<()> {
    let client = SpreadsheetClient::authorize(load_config(cli)?)?;

    match &cli.command {
        Command::Create { spreadsheet } => {
            let spreadsheet = client.create(spreadsheet)?;
            println!("{}", spreadsheet.path().display());
        }
        Command::CreateSheets { spreadsheet, names } => {
            let mut spreadsheet = client.open(spreadsheet)?;
            spreadsheet.create_sheets(names.as_slice())?;
            spreadsheet.save()?;
        }
        Command::Read {
            spreadsheet,
            worksheet,
            range,
        } => {
            let mut spreadsheet = client.open(spreadsheet)?;
            let range = CellRange::parse(range)?;
            let cells = spreadsheet.worksheet(worksheet)?.read_range(&range)?;
            println!("{}", json_export::serialize_to_json(&cells)?);
        }
        Command::Values {
            spreadsheet,
            worksheet,
            output,
        } => {
            let mut spreadsheet = client.open(spreadsheet)?;
            let values = spreadsheet.worksheet(worksheet)?.get_all_values();
            emit_json(&values, output.as_deref())?;
        }
        Command::Records {
            spreadsheet,
            worksheet,
            empty2zero,
            output,
        } => {
            let mut spreadsheet = client.open(spreadsheet)?;
            let records = spreadsheet.worksheet(worksheet)?.get_all_records(*empty2zero);
            emit_json(&records, output.as_deref())?;
        }
        Command::Headers {
            spreadsheet,
            worksheet,
            headers,
        } => {
            let mut spreadsheet = client.open(spreadsheet)?;
            spreadsheet.worksheet(worksheet)?.fill_headers(headers.as_slice())?;
            spreadsheet.save()?;
        }
        Command::Append {
            spreadsheet,
            worksheet,
            json,
            range,
        } => {
            let row = json_export::parse_row(json).context("Invalid JSON row")?;
            let mut spreadsheet = client.open(spreadsheet)?;
            let filled = append(&mut spreadsheet, worksheet, row, range.as_deref())?;
            spreadsheet.save()?;
            println!("{}", filled);
        }
        Command::Fill {
            spreadsheet,
            worksheet,
            file,
            start_row,
            headers,
            keys,
        } => {
            let records = json_export::read_records_file(file)?;
            let mut spreadsheet = client.open(spreadsheet)?;
            spreadsheet.worksheet(worksheet)?.build_sheet_by_keys(
                &records,
                *start_row,
                (!keys.is_empty()).then_some(keys.as_slice()),
                (!headers.is_empty()).then_some(headers.as_slice()),
            )?;
            spreadsheet.save()?;
        }
        Command::DeleteRows {
            spreadsheet,
            worksheet,
            rows,
        } => {
            let mut spreadsheet = client.open(spreadsheet)?;
            let mut sheet = spreadsheet.worksheet(worksheet)?;

            let listed = sheet.list_all_rows();
            let mut doomed = Vec::with_capacity(rows.len());
            for row in rows {
                match listed.iter().find(|r| r.row() == *row) {
                    Some(row_ref) => doomed.push(*row_ref),
                    None => anyhow::bail!("Row {} is not a populated data row", row),
                }
            }

            sheet.delete_many_rows(&doomed)?;
            spreadsheet.save()?;
        }
        Command::Label { .. } | Command::Index { .. } | Command::Range { .. } => {}
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };

    if let Some(root) = &cli.root {
        config.root = root.clone();
    }

    Ok(config)
}

fn append(
    spreadsheet: &mut Spreadsheet,
    worksheet: &str,
    row: RowInput,
    range: Option<&str>,
) -> Result<CellRange> {
    let mut sheet = spreadsheet.worksheet(worksheet)?;

    match row {
        RowInput::Values(values) => {
            let range = range.map(CellRange::parse).transpose()?;
            sheet.list_fill(&values, range.as_ref())
        }
        RowInput::Record(record) => {
            if range.is_some() {
                anyhow::bail!("--range only applies to JSON arrays");
            }
            sheet.dict_fill(&record)
        }
    }
}

fn emit_json<T: serde::Serialize>(data: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => json_export::write_json_to_file(data, path),
        None => {
            println!("{}", json_export::serialize_to_json(data)?);
            Ok(())
        }
    }
}
