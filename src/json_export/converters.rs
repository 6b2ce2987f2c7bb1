use serde_json::{Value, json};

use crate::excel::{Cell, CellType, DataTypeInfo, excel_date_to_iso_string};

// Process cell value based on its type
pub fn process_cell_value(cell: &Cell) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }

    if cell.is_formula {
        return json!(cell.value);
    }

    if let Some(original_type) = &cell.original_type {
        match original_type {
            DataTypeInfo::Float(f) => {
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    json!(f.trunc() as i64)
                } else {
                    json!(f)
                }
            }
            DataTypeInfo::Int(i) => json!(i),
            DataTypeInfo::DateTime(dt) => match excel_date_to_iso_string(*dt) {
                Some(iso) => json!(iso),
                None => json!(cell.value),
            },
            DataTypeInfo::DateTimeIso(s) => json!(s),
            DataTypeInfo::Bool(b) => json!(b),
            DataTypeInfo::Empty => Value::Null,
            _ => json!(cell.value),
        }
    } else {
        match cell.cell_type {
            CellType::Number => match cell.value.parse::<f64>() {
                Ok(num) if num.fract() == 0.0 && num.abs() < 1e15 => json!(num.trunc() as i64),
                Ok(num) => json!(num),
                Err(_) => json!(cell.value),
            },
            CellType::Boolean => {
                if cell.value.eq_ignore_ascii_case("true") {
                    json!(true)
                } else if cell.value.eq_ignore_ascii_case("false") {
                    json!(false)
                } else {
                    json!(cell.value)
                }
            }
            CellType::Empty => Value::Null,
            _ => json!(cell.value), // Text, Date, etc.
        }
    }
}
