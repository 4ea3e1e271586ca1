//! Binding values to queries and decoding rows to JSON.

use base64::prelude::*;
use indexmap::IndexMap;
use keyset_core::FieldValue;
use serde_json::Value as JsonValue;
use sqlx::sqlite::{SqliteArguments, SqliteRow, SqliteValue, SqliteValueRef};
use sqlx::{Column, Decode, Row, Sqlite, Type, TypeInfo, Value, ValueRef};

use crate::Error;

/// A decoded row: column name → JSON value, in column order.
pub type SqliteDocument = IndexMap<String, JsonValue>;

pub(crate) type SqliteQuery<'a> = sqlx::query::Query<'a, Sqlite, SqliteArguments<'a>>;

/// Bind a JSON value from the caller's filter.
pub(crate) fn bind_json(query: SqliteQuery<'_>, value: JsonValue) -> SqliteQuery<'_> {
   match value {
      JsonValue::Null => query.bind(None::<String>),
      JsonValue::Bool(b) => query.bind(b),
      JsonValue::String(s) => query.bind(s),
      JsonValue::Number(number) => {
         // Preserve integer precision by binding as i64 when possible
         if let Some(int_val) = number.as_i64() {
            query.bind(int_val)
         } else {
            query.bind(number.as_f64().unwrap_or_default())
         }
      }
      other => query.bind(other),
   }
}

/// Bind a seek value taken from a cursor position.
pub(crate) fn bind_field(query: SqliteQuery<'_>, value: FieldValue) -> SqliteQuery<'_> {
   match value {
      FieldValue::Null => query.bind(None::<String>),
      FieldValue::Bool(b) => query.bind(b),
      FieldValue::Int(i) => query.bind(i),
      FieldValue::Float(f) => query.bind(f),
      FieldValue::Text(s) => query.bind(s),
      FieldValue::Timestamp(at) => query.bind(at),
      FieldValue::Uuid(id) => query.bind(id.hyphenated().to_string()),
   }
}

fn decode<'r, T>(value: &'r SqliteValue) -> Result<T, Error>
where
   T: Decode<'r, Sqlite> + Type<Sqlite>,
{
   Ok(value.try_decode::<T>()?)
}

/// Convert a single SQLite value to JSON.
///
/// BLOBs are encoded as standard base64 strings.
pub(crate) fn to_json(value: SqliteValueRef<'_>) -> Result<JsonValue, Error> {
   if value.is_null() {
      return Ok(JsonValue::Null);
   }

   let type_name = value.type_info().name().to_string();
   let owned = ValueRef::to_owned(&value);

   let json = match type_name.as_str() {
      "TEXT" | "DATE" | "TIME" | "DATETIME" => JsonValue::String(decode::<String>(&owned)?),
      "INTEGER" | "NUMERIC" | "BOOLEAN" => JsonValue::from(decode::<i64>(&owned)?),
      "REAL" => serde_json::Number::from_f64(decode::<f64>(&owned)?)
         .map(JsonValue::Number)
         .unwrap_or(JsonValue::Null),
      "BLOB" => JsonValue::String(BASE64_STANDARD.encode(decode::<Vec<u8>>(&owned)?)),
      other => return Err(Error::UnsupportedDatatype(other.to_string())),
   };

   Ok(json)
}

/// Decode SQLite rows to JSON documents.
pub(crate) fn decode_rows(rows: Vec<SqliteRow>) -> Result<Vec<SqliteDocument>, Error> {
   let mut documents = Vec::with_capacity(rows.len());
   for row in rows {
      let mut document = IndexMap::with_capacity(row.columns().len());
      for (i, column) in row.columns().iter().enumerate() {
         let value = to_json(row.try_get_raw(i)?)?;
         document.insert(column.name().to_string(), value);
      }
      documents.push(document);
   }

   Ok(documents)
}
