use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

use sheetfill::client::{ClientConfig, SpreadsheetClient};
use sheetfill::json_export::Record;
use sheetfill::range::{CellRange, column_range, header_range};

fn client(dir: &TempDir) -> SpreadsheetClient {
    SpreadsheetClient::authorize(ClientConfig::new(dir.path())).unwrap()
}

fn xlsx_files(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".xlsx"))
        .collect();
    names.sort();
    names
}

#[test]
fn filled_rows_survive_save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let client = client(&dir);

    let mut book = client.create("team").unwrap();
    {
        let mut sheet = book.worksheet("Sheet1").unwrap();
        sheet.fill_headers(&["name", "age", "active"]).unwrap();
        sheet
            .list_fill(&[json!("ada"), json!(36), json!(true)], None)
            .unwrap();

        let mut row = Record::new();
        row.insert("name".into(), json!("grace"));
        row.insert("age".into(), json!(85.5));
        row.insert("active".into(), json!(false));
        sheet.dict_fill(&row).unwrap();
    }
    assert!(book.is_modified());
    book.save().unwrap();
    assert!(!book.is_modified());

    let mut book = client.open("team").unwrap();
    let sheet = book.worksheet("Sheet1").unwrap();

    assert_eq!(
        sheet.get_all_values(),
        vec![
            vec!["name", "age", "active"],
            vec!["ada", "36", "TRUE"],
            vec!["grace", "85.5", "FALSE"],
        ]
    );

    let records = sheet.get_all_records(false);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["age"], json!(36));
    assert_eq!(records[0]["active"], json!(true));
    assert_eq!(records[1]["age"], json!(85.5));
}

#[test]
fn column_ranges_address_data_rows() {
    let dir = tempfile::tempdir().unwrap();
    let client = client(&dir);
    let mut book = client.create("scores").unwrap();
    let mut sheet = book.worksheet("Sheet1").unwrap();

    sheet.fill_headers(&["player", "score"]).unwrap();
    let scores = [json!(10), json!(20), json!(30)];
    let range = CellRange::parse(&column_range(scores.len(), "b").unwrap()).unwrap();
    sheet.list_fill(&scores, Some(&range)).unwrap();

    assert_eq!(sheet.col_values(2), vec!["score", "10", "20", "30"]);
    assert_eq!(sheet.find_last_row(2), 4);
    assert_eq!(sheet.find_last_row(1), 1);

    let header = CellRange::parse(&header_range(2).unwrap()).unwrap();
    let cells = sheet.read_range(&header).unwrap();
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[1].value, "score");
}

#[test]
fn create_sheets_uses_default_grid() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig {
        default_rows: 5,
        default_cols: 3,
        ..ClientConfig::new(dir.path())
    };
    let client = SpreadsheetClient::authorize(config).unwrap();

    let mut book = client.create("regions").unwrap();
    book.create_sheets(&["north", "south"]).unwrap();
    assert_eq!(book.sheet_names(), vec!["Sheet1", "north", "south"]);

    // Names are unique regardless of case
    assert!(book.create_sheets(&["NORTH"]).is_err());

    let mut sheet = book.worksheet("north").unwrap();
    assert!(sheet.fill_headers(&["a", "b", "c"]).is_ok());
    assert!(sheet.fill_headers(&["a", "b", "c", "d"]).is_err());

    book.save().unwrap();
    let book = client.open("regions").unwrap();
    assert_eq!(book.sheet_names(), vec!["Sheet1", "north", "south"]);
}

#[test]
fn missing_spreadsheets_and_worksheets_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    let client = client(&dir);

    assert!(client.open("nothing").is_err());

    let mut book = client.create("present").unwrap();
    assert!(book.worksheet("Nope").is_err());
    assert!(client.create("present").is_err());
}

#[test]
fn formulas_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let client = client(&dir);

    let mut book = client.create("sums").unwrap();
    {
        let mut sheet = book.worksheet("Sheet1").unwrap();
        sheet.fill_headers(&["n"]).unwrap();
        sheet.list_fill(&[json!(1)], None).unwrap();
        sheet.list_fill(&[json!(2)], None).unwrap();
        sheet.list_fill(&[json!("=SUM(A2:A3)")], None).unwrap();
    }
    book.save().unwrap();

    let mut book = client.open("sums").unwrap();
    let sheet = book.worksheet("Sheet1").unwrap();
    assert_eq!(sheet.col_values(1), vec!["n", "1", "2", "=SUM(A2:A3)"]);
}

#[test]
fn deleted_rows_stay_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let client = client(&dir);

    let mut book = client.create("queue").unwrap();
    {
        let mut sheet = book.worksheet("Sheet1").unwrap();
        sheet.fill_headers(&["job"]).unwrap();
        for job in ["a", "b", "c", "d"] {
            sheet.list_fill(&[json!(job)], None).unwrap();
        }

        let rows = sheet.list_all_rows();
        sheet.delete_many_rows(&rows[..2]).unwrap();
    }
    book.save().unwrap();

    let mut book = client.open("queue").unwrap();
    let sheet = book.worksheet("Sheet1").unwrap();
    assert_eq!(sheet.col_values(1), vec!["job", "c", "d"]);
    assert_eq!(sheet.list_all_rows().len(), 2);
}

#[test]
fn backup_is_written_before_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig {
        backup_on_save: true,
        ..ClientConfig::new(dir.path())
    };
    let client = SpreadsheetClient::authorize(config).unwrap();

    let mut book = client.create("ledger").unwrap();
    book.save().unwrap();
    // Nothing changed, nothing written
    assert_eq!(xlsx_files(&dir), vec!["ledger.xlsx"]);

    book.worksheet("Sheet1")
        .unwrap()
        .fill_headers(&["amount"])
        .unwrap();
    book.save().unwrap();

    let files = xlsx_files(&dir);
    assert_eq!(files.len(), 2);
    assert!(files.iter().any(|f| f.starts_with("ledger_")));
}

#[test]
fn reads_files_whose_data_does_not_start_at_a1() {
    let dir = tempfile::tempdir().unwrap();

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet().set_name("Offset").unwrap();
    worksheet.write_string(2, 2, "x").unwrap();
    worksheet.write_number(3, 3, 5.0).unwrap();
    workbook.save(dir.path().join("offset.xlsx")).unwrap();

    let client = client(&dir);
    let mut book = client.open("offset").unwrap();
    let sheet = book.worksheet("Offset").unwrap();

    assert_eq!(sheet.row_values(3), vec!["", "", "x"]);
    assert_eq!(sheet.row_values(4), vec!["", "", "", "5"]);
    let cells = sheet.read_range(&CellRange::parse("C3:D4").unwrap()).unwrap();
    let values: Vec<_> = cells.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(values, vec!["x", "", "", "5"]);
}
