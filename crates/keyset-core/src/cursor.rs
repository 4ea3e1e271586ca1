//! Opaque cursor encoding.
//!
//! A cursor captures a document's [`Position`]: the value of every field in
//! the active sort spec, in sort order. The position is serialised as JSON
//! (an object whose key order is the sort order, each value type-tagged) and
//! encoded as URL-safe base64 without padding, so cursors can be embedded in
//! query strings and GraphQL arguments untouched.

use std::fmt;
use std::str::FromStr;

use base64::prelude::*;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sort::SortSpec;
use crate::value::{Document, FieldValue};

/// Sort-field values of a reference document, in sort order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(IndexMap<String, FieldValue>);

impl Position {
   pub fn new() -> Self {
      Self::default()
   }

   /// Add a field value, returning `self` for chaining.
   pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
      self.0.insert(name.into(), value.into());
      self
   }

   pub fn get(&self, name: &str) -> Option<&FieldValue> {
      self.0.get(name)
   }

   pub fn len(&self) -> usize {
      self.0.len()
   }

   pub fn is_empty(&self) -> bool {
      self.0.is_empty()
   }

   pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
      self.0.iter()
   }

   /// Capture the position of `doc` under `sort`.
   pub fn from_document<D: Document + ?Sized>(sort: &SortSpec, doc: &D) -> Result<Self> {
      let mut values = IndexMap::with_capacity(sort.len());
      for field in sort.fields() {
         let value = doc.field(&field.name).ok_or_else(|| Error::MissingSortField {
            field: field.name.clone(),
         })?;
         values.insert(field.name.clone(), value);
      }

      Ok(Self(values))
   }

   /// Check that the position carries a value for every field of `sort`.
   pub fn validate_against(&self, sort: &SortSpec) -> Result<()> {
      match sort.fields().iter().find(|f| !self.0.contains_key(&f.name)) {
         Some(missing) => Err(Error::malformed(format!(
            "cursor has no value for sort field '{}'",
            missing.name
         ))),
         None => Ok(()),
      }
   }
}

/// An opaque, URL-safe pagination token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
   /// Encode a position into a cursor.
   ///
   /// Fails with `MalformedCursor` when a value has no JSON form, such as a
   /// timestamp outside the RFC 3339 year range.
   pub fn encode(position: &Position) -> Result<Self> {
      let json = serde_json::to_vec(position)
         .map_err(|e| Error::malformed(format!("unencodable position: {e}")))?;
      Ok(Self(BASE64_URL_SAFE_NO_PAD.encode(json)))
   }

   /// Decode the position this cursor was built from.
   pub fn decode(&self) -> Result<Position> {
      let bytes = BASE64_URL_SAFE_NO_PAD
         .decode(self.0.as_bytes())
         .map_err(|e| Error::malformed(format!("invalid base64: {e}")))?;

      let position: Position = serde_json::from_slice(&bytes)
         .map_err(|e| Error::malformed(format!("invalid position: {e}")))?;

      if position.is_empty() {
         return Err(Error::malformed("position has no fields"));
      }

      Ok(position)
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }

   pub fn into_string(self) -> String {
      self.0
   }
}

impl fmt::Display for Cursor {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(&self.0)
   }
}

impl From<String> for Cursor {
   fn from(value: String) -> Self {
      Self(value)
   }
}

impl From<&str> for Cursor {
   fn from(value: &str) -> Self {
      Self(value.to_string())
   }
}

impl FromStr for Cursor {
   type Err = Error;

   /// Parse and validate a cursor string.
   fn from_str(s: &str) -> Result<Self> {
      let cursor = Cursor::from(s);
      cursor.decode()?;
      Ok(cursor)
   }
}
