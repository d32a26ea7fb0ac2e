use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use sqlx::mysql::types::MySqlTime;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

/// One result row: column name to value, in select-list order.
pub type Row = serde_json::Map<String, Value>;

pub(crate) fn decode(row: &MySqlRow) -> Result<Row, sqlx::Error> {
    let mut out = Row::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.type_info().name())?;
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

fn decode_column(row: &MySqlRow, idx: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match type_name {
        "BOOLEAN" => Value::Bool(row.try_get::<bool, _>(idx)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            Value::from(row.try_get_unchecked::<i64, _>(idx)?)
        }
        name if name.ends_with("UNSIGNED") || name == "YEAR" => {
            Value::from(row.try_get_unchecked::<u64, _>(idx)?)
        }
        "FLOAT" => float(f64::from(row.try_get::<f32, _>(idx)?)),
        "DOUBLE" => float(row.try_get::<f64, _>(idx)?),
        // Exact numerics stay strings so no precision is lost.
        "DECIMAL" => Value::String(row.try_get_unchecked::<String, _>(idx)?),
        "DATE" => temporal(row, idx, ZERO_DATE, |row| {
            row.try_get::<NaiveDate, _>(idx).map(|d| d.to_string())
        })?,
        "DATETIME" => temporal(row, idx, ZERO_DATETIME, |row| {
            row.try_get::<NaiveDateTime, _>(idx).map(|d| d.to_string())
        })?,
        "TIMESTAMP" => temporal(row, idx, ZERO_DATETIME, |row| {
            row.try_get::<DateTime<Utc>, _>(idx).map(|d| d.to_rfc3339())
        })?,
        // TIME spans -838:59:59..=838:59:59, wider than a time of day.
        "TIME" => Value::String(row.try_get::<MySqlTime, _>(idx)?.to_string()),
        "JSON" => row.try_get::<Value, _>(idx)?,
        "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" => {
            Value::String(row.try_get::<String, _>(idx)?)
        }
        _ => Value::String(hex::encode(row.try_get_unchecked::<Vec<u8>, _>(idx)?)),
    };

    Ok(value)
}

const ZERO_DATE: &str = "0000-00-00";
const ZERO_DATETIME: &str = "0000-00-00 00:00:00";

/// Legacy zero dates have no chrono value; the server sends them as empty or all-zero bytes.
fn temporal<F>(row: &MySqlRow, idx: usize, zero: &str, decode: F) -> Result<Value, sqlx::Error>
where
    F: FnOnce(&MySqlRow) -> Result<String, sqlx::Error>,
{
    match decode(row) {
        Ok(text) => Ok(Value::String(text)),
        Err(e) => {
            let raw = row.try_get_unchecked::<Vec<u8>, _>(idx)?;
            if raw.iter().all(|b| *b == 0) {
                Ok(Value::String(zero.to_string()))
            } else {
                Err(e)
            }
        }
    }
}

fn float(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
