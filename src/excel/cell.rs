use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub value: String,
    pub is_formula: bool,
    pub cell_type: CellType,
    pub original_type: Option<DataTypeInfo>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellType {
    Text,
    Number,
    Date,
    Boolean,
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DataTypeInfo {
    Empty,
    String,
    Float(f64),
    Int(i64),
    Bool(bool),
    DateTime(f64),
    DateTimeIso(String),
    DurationIso(String),
    Error,
}

impl Cell {
    pub fn new_with_type(
        value: String,
        is_formula: bool,
        cell_type: CellType,
        original_type: Option<DataTypeInfo>,
    ) -> Self {
        Self {
            value,
            is_formula,
            cell_type,
            original_type,
        }
    }

    pub fn empty() -> Self {
        Self {
            value: String::new(),
            is_formula: false,
            cell_type: CellType::Empty,
            original_type: Some(DataTypeInfo::Empty),
        }
    }

    /// A text cell; values starting with `=` are stored as formulas.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            return Self::empty();
        }

        let is_formula = value.starts_with('=');
        Self::new_with_type(value, is_formula, CellType::Text, Some(DataTypeInfo::String))
    }

    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::empty(),
            Value::Bool(b) => Self::new_with_type(
                bool_text(*b).to_string(),
                false,
                CellType::Boolean,
                Some(DataTypeInfo::Bool(*b)),
            ),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::new_with_type(
                        i.to_string(),
                        false,
                        CellType::Number,
                        Some(DataTypeInfo::Int(i)),
                    )
                } else {
                    let f = n.as_f64().unwrap_or(f64::NAN);
                    Self::new_with_type(
                        format_float(f),
                        false,
                        CellType::Number,
                        Some(DataTypeInfo::Float(f)),
                    )
                }
            }
            Value::String(s) => Self::text(s.clone()),
            // Not a scalar; keep the JSON text so nothing is silently dropped
            other => Self::text(other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

pub(crate) fn bool_text(b: bool) -> &'static str {
    if b { "TRUE" } else { "FALSE" }
}

pub(crate) fn format_float(f: f64) -> String {
    if f == (f as i64) as f64 && f.abs() < 1e10 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

// Last serial Excel can represent (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_466.0;

/// Converts an Excel serial date to an ISO 8601 string.
///
/// Serial 1 is 1900-01-01. Excel also counts a 1900-02-29 that never existed,
/// so serials after 59 are shifted back a day. Returns `None` for serials
/// outside what Excel can display.
pub fn excel_date_to_iso_string(serial: f64) -> Option<String> {
    if !serial.is_finite() || !(0.0..MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }

    let days = if serial > 59.0 { serial - 1.0 } else { serial };
    let mut whole_days = days.trunc() as i64;
    let mut seconds = (days.fract() * 86_400.0).round() as u32;
    if seconds >= 86_400 {
        whole_days += 1;
        seconds = 0;
    }

    let base_date = NaiveDate::from_ymd_opt(1899, 12, 31)?;
    let date = base_date.checked_add_signed(Duration::days(whole_days))?;

    if seconds == 0 {
        return Some(date.format("%Y-%m-%d").to_string());
    }

    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)?;
    Some(
        NaiveDateTime::new(date, time)
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_scalars_become_typed_cells() {
        let cell = Cell::from_json(&json!(42));
        assert_eq!(cell.value, "42");
        assert_eq!(cell.cell_type, CellType::Number);
        assert_eq!(cell.original_type, Some(DataTypeInfo::Int(42)));

        let cell = Cell::from_json(&json!(2.5));
        assert_eq!(cell.value, "2.5");
        assert_eq!(cell.original_type, Some(DataTypeInfo::Float(2.5)));

        let cell = Cell::from_json(&json!(true));
        assert_eq!(cell.value, "TRUE");
        assert_eq!(cell.cell_type, CellType::Boolean);

        assert!(Cell::from_json(&Value::Null).is_empty());
    }

    #[test]
    fn formulas_are_flagged() {
        let cell = Cell::from_json(&json!("=SUM(A1:A3)"));
        assert!(cell.is_formula);
        assert_eq!(cell.cell_type, CellType::Text);
        assert!(!Cell::text("plain").is_formula);
    }

    #[test]
    fn serial_dates() {
        assert_eq!(excel_date_to_iso_string(1.0).as_deref(), Some("1900-01-01"));
        assert_eq!(excel_date_to_iso_string(59.0).as_deref(), Some("1900-02-28"));
        assert_eq!(excel_date_to_iso_string(61.0).as_deref(), Some("1900-03-01"));
        assert_eq!(excel_date_to_iso_string(45292.0).as_deref(), Some("2024-01-01"));
        assert_eq!(
            excel_date_to_iso_string(45292.5).as_deref(),
            Some("2024-01-01T12:00:00")
        );
        assert_eq!(excel_date_to_iso_string(-1.0), None);
        assert_eq!(excel_date_to_iso_string(f64::NAN), None);
    }
}
