//! Sortable field values and the document abstraction.
//!
//! Cursor positions, range predicates, and in-memory comparisons all work in
//! terms of [`FieldValue`], a tagged scalar that survives a JSON round trip
//! without losing its type (a timestamp stays a timestamp, a UUID stays a
//! UUID).

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use time::OffsetDateTime;
use uuid::Uuid;

/// A scalar value a document can be sorted and sought by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldValue {
   Null,
   Bool(bool),
   Int(i64),
   #[serde(with = "float_repr")]
   Float(f64),
   Text(String),
   #[serde(with = "time::serde::rfc3339")]
   Timestamp(OffsetDateTime),
   Uuid(Uuid),
}

/// JSON has no infinities or NaN, so those travel as strings.
mod float_repr {
   use serde::{Deserialize, Deserializer, Serializer, de};

   pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
      if value.is_finite() {
         serializer.serialize_f64(*value)
      } else if value.is_nan() {
         serializer.serialize_str("nan")
      } else if value.is_sign_positive() {
         serializer.serialize_str("inf")
      } else {
         serializer.serialize_str("-inf")
      }
   }

   #[derive(Deserialize)]
   #[serde(untagged)]
   enum Repr {
      Number(f64),
      Name(String),
   }

   pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
      match Repr::deserialize(deserializer)? {
         Repr::Number(value) => Ok(value),
         Repr::Name(name) => match name.as_str() {
            "nan" => Ok(f64::NAN),
            "inf" => Ok(f64::INFINITY),
            "-inf" => Ok(f64::NEG_INFINITY),
            other => Err(de::Error::custom(format!("invalid float '{other}'"))),
         },
      }
   }
}

impl FieldValue {
   /// Cross-type precedence: null < bool < number < text < timestamp < uuid.
   fn rank(&self) -> u8 {
      match self {
         FieldValue::Null => 0,
         FieldValue::Bool(_) => 1,
         FieldValue::Int(_) | FieldValue::Float(_) => 2,
         FieldValue::Text(_) => 3,
         FieldValue::Timestamp(_) => 4,
         FieldValue::Uuid(_) => 5,
      }
   }

   /// Total order over all values. Integers and floats compare numerically.
   pub fn compare(&self, other: &FieldValue) -> Ordering {
      use FieldValue::*;

      match (self, other) {
         (Null, Null) => Ordering::Equal,
         (Bool(a), Bool(b)) => a.cmp(b),
         (Int(a), Int(b)) => a.cmp(b),
         (Int(a), Float(b)) => (*a as f64).total_cmp(b),
         (Float(a), Int(b)) => a.total_cmp(&(*b as f64)),
         (Float(a), Float(b)) => a.total_cmp(b),
         (Text(a), Text(b)) => a.cmp(b),
         (Timestamp(a), Timestamp(b)) => a.cmp(b),
         (Uuid(a), Uuid(b)) => a.cmp(b),
         _ => self.rank().cmp(&other.rank()),
      }
   }

   /// Convert a JSON scalar. Arrays and objects are not sortable.
   pub fn from_json(value: &JsonValue) -> Option<Self> {
      match value {
         JsonValue::Null => Some(FieldValue::Null),
         JsonValue::Bool(b) => Some(FieldValue::Bool(*b)),
         JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Some(FieldValue::Int(i)),
            None => n.as_f64().map(FieldValue::Float),
         },
         JsonValue::String(s) => Some(FieldValue::Text(s.clone())),
         JsonValue::Array(_) | JsonValue::Object(_) => None,
      }
   }
}

impl From<bool> for FieldValue {
   fn from(value: bool) -> Self {
      FieldValue::Bool(value)
   }
}

impl From<i64> for FieldValue {
   fn from(value: i64) -> Self {
      FieldValue::Int(value)
   }
}

impl From<i32> for FieldValue {
   fn from(value: i32) -> Self {
      FieldValue::Int(value.into())
   }
}

impl From<f64> for FieldValue {
   fn from(value: f64) -> Self {
      FieldValue::Float(value)
   }
}

impl From<&str> for FieldValue {
   fn from(value: &str) -> Self {
      FieldValue::Text(value.to_string())
   }
}

impl From<String> for FieldValue {
   fn from(value: String) -> Self {
      FieldValue::Text(value)
   }
}

impl From<OffsetDateTime> for FieldValue {
   fn from(value: OffsetDateTime) -> Self {
      FieldValue::Timestamp(value)
   }
}

impl From<Uuid> for FieldValue {
   fn from(value: Uuid) -> Self {
      FieldValue::Uuid(value)
   }
}

/// Anything the paginator can read sort fields from.
pub trait Document {
   /// Value of `name`, or `None` when the document lacks a sortable value.
   fn field(&self, name: &str) -> Option<FieldValue>;
}

impl Document for IndexMap<String, JsonValue> {
   fn field(&self, name: &str) -> Option<FieldValue> {
      self.get(name).and_then(FieldValue::from_json)
   }
}

impl Document for serde_json::Map<String, JsonValue> {
   fn field(&self, name: &str) -> Option<FieldValue> {
      self.get(name).and_then(FieldValue::from_json)
   }
}

impl Document for JsonValue {
   fn field(&self, name: &str) -> Option<FieldValue> {
      self.get(name).and_then(FieldValue::from_json)
   }
}

impl Document for IndexMap<String, FieldValue> {
   fn field(&self, name: &str) -> Option<FieldValue> {
      self.get(name).cloned()
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;
   use time::macros::datetime;

   #[test]
   fn numbers_compare_across_int_and_float() {
      assert_eq!(
         FieldValue::Int(2).compare(&FieldValue::Float(2.5)),
         Ordering::Less
      );
      assert_eq!(
         FieldValue::Float(3.0).compare(&FieldValue::Int(3)),
         Ordering::Equal
      );
   }

   #[test]
   fn cross_type_precedence() {
      let ordered = [
         FieldValue::Null,
         FieldValue::Bool(true),
         FieldValue::Int(-5),
         FieldValue::Text("a".into()),
         FieldValue::Timestamp(datetime!(2024-01-01 0:00 UTC)),
         FieldValue::Uuid(Uuid::nil()),
      ];

      for pair in ordered.windows(2) {
         assert_eq!(pair[0].compare(&pair[1]), Ordering::Less);
         assert_eq!(pair[1].compare(&pair[0]), Ordering::Greater);
      }
   }

   #[test]
   fn from_json_scalars() {
      assert_eq!(FieldValue::from_json(&json!(null)), Some(FieldValue::Null));
      assert_eq!(FieldValue::from_json(&json!(7)), Some(FieldValue::Int(7)));
      assert_eq!(
         FieldValue::from_json(&json!(1.5)),
         Some(FieldValue::Float(1.5))
      );
      assert_eq!(
         FieldValue::from_json(&json!("x")),
         Some(FieldValue::Text("x".into()))
      );
      assert_eq!(FieldValue::from_json(&json!([1, 2])), None);
      assert_eq!(FieldValue::from_json(&json!({"a": 1})), None);
   }

   #[test]
   fn json_document_field_lookup() {
      let doc = json!({"id": 3, "title": "Post 3"});
      assert_eq!(doc.field("id"), Some(FieldValue::Int(3)));
      assert_eq!(doc.field("missing"), None);
   }

   #[test]
   fn serializes_tagged_camel_case() {
      assert_eq!(
         serde_json::to_value(FieldValue::Int(4)).unwrap(),
         json!({"int": 4})
      );
      assert_eq!(serde_json::to_value(FieldValue::Null).unwrap(), json!("null"));
      assert_eq!(
         serde_json::to_value(FieldValue::Timestamp(datetime!(2024-03-05 10:30 UTC))).unwrap(),
         json!({"timestamp": "2024-03-05T10:30:00Z"})
      );
   }

   #[test]
   fn non_finite_floats_serialize_as_names() {
      assert_eq!(
         serde_json::to_value(FieldValue::Float(f64::INFINITY)).unwrap(),
         json!({"float": "inf"})
      );
      assert_eq!(
         serde_json::to_value(FieldValue::Float(f64::NEG_INFINITY)).unwrap(),
         json!({"float": "-inf"})
      );
      assert_eq!(
         serde_json::from_value::<FieldValue>(json!({"float": -2.5})).unwrap(),
         FieldValue::Float(-2.5)
      );
      assert!(serde_json::from_value::<FieldValue>(json!({"float": "lots"})).is_err());
   }
}
