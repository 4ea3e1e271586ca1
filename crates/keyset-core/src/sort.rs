//! Sort specifications.
//!
//! A [`SortSpec`] is an ordered list of fields; earlier fields take precedence
//! and later ones only break ties. Keyset pagination needs a total order, so
//! the normalizer appends a unique tie-breaker field to any spec that lacks
//! one (see [`crate::request`]).
//!
//! # Example
//!
//! ```
//! use keyset_core::{SortField, SortSpec};
//!
//! let sort = SortSpec::new(vec![
//!    SortField::asc("category"),
//!    SortField::desc("score"),
//!    SortField::asc("id"),
//! ]);
//! assert_eq!(sort.len(), 3);
//! ```

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::{Document, FieldValue};

/// Sort direction for a field.
///
/// Serialises as `"asc"` / `"desc"`; also deserialises from the numeric
/// convention `1` / `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "DirectionRepr")]
pub enum SortDirection {
   /// Ascending order (smallest first)
   Asc,
   /// Descending order (largest first)
   Desc,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DirectionRepr {
   Sign(i64),
   Name(String),
}

impl TryFrom<DirectionRepr> for SortDirection {
   type Error = String;

   fn try_from(repr: DirectionRepr) -> Result<Self, Self::Error> {
      match repr {
         DirectionRepr::Sign(1) => Ok(SortDirection::Asc),
         DirectionRepr::Sign(-1) => Ok(SortDirection::Desc),
         DirectionRepr::Sign(other) => Err(format!("invalid sort direction {other}")),
         DirectionRepr::Name(name) => match name.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("invalid sort direction '{name}'")),
         },
      }
   }
}

impl SortDirection {
   /// Return the opposite sort direction.
   pub fn reversed(self) -> Self {
      match self {
         SortDirection::Asc => SortDirection::Desc,
         SortDirection::Desc => SortDirection::Asc,
      }
   }

   /// Apply this direction to an ascending comparison result.
   pub fn apply(self, ordering: Ordering) -> Ordering {
      match self {
         SortDirection::Asc => ordering,
         SortDirection::Desc => ordering.reverse(),
      }
   }
}

/// A field in a sort spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
   /// Field name as it appears in the documents
   pub name: String,
   /// Sort direction for this field
   pub direction: SortDirection,
}

impl SortField {
   /// Create a sort field with ascending direction.
   pub fn asc(name: impl Into<String>) -> Self {
      Self {
         name: name.into(),
         direction: SortDirection::Asc,
      }
   }

   /// Create a sort field with descending direction.
   pub fn desc(name: impl Into<String>) -> Self {
      Self {
         name: name.into(),
         direction: SortDirection::Desc,
      }
   }
}

/// Ordered field → direction mapping.
///
/// Serialises as a JSON object whose key order is the sort precedence,
/// e.g. `{"score": "desc", "id": "asc"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
   from = "IndexMap<String, SortDirection>",
   into = "IndexMap<String, SortDirection>"
)]
pub struct SortSpec(Vec<SortField>);

impl SortSpec {
   pub fn new(fields: Vec<SortField>) -> Self {
      Self(fields)
   }

   pub fn fields(&self) -> &[SortField] {
      &self.0
   }

   pub fn len(&self) -> usize {
      self.0.len()
   }

   pub fn is_empty(&self) -> bool {
      self.0.is_empty()
   }

   pub fn contains(&self, name: &str) -> bool {
      self.0.iter().any(|f| f.name == name)
   }

   /// Append `field` unless a field of the same name is already present.
   pub fn push(&mut self, field: SortField) {
      if !self.contains(&field.name) {
         self.0.push(field);
      }
   }

   /// Create a spec with every direction reversed.
   ///
   /// Scanning the reversed spec "after" a position yields the rows that sit
   /// immediately "before" it under the unreversed spec, nearest first.
   pub fn reversed(&self) -> Self {
      Self(
         self
            .0
            .iter()
            .map(|f| SortField {
               name: f.name.clone(),
               direction: f.direction.reversed(),
            })
            .collect(),
      )
   }

   /// Compare two documents under this spec. Absent fields sort as null.
   pub fn compare<D: Document + ?Sized>(&self, a: &D, b: &D) -> Ordering {
      for f in &self.0 {
         let left = a.field(&f.name).unwrap_or(FieldValue::Null);
         let right = b.field(&f.name).unwrap_or(FieldValue::Null);
         let ordering = f.direction.apply(left.compare(&right));
         if ordering != Ordering::Equal {
            return ordering;
         }
      }

      Ordering::Equal
   }
}

impl From<IndexMap<String, SortDirection>> for SortSpec {
   fn from(map: IndexMap<String, SortDirection>) -> Self {
      Self(
         map.into_iter()
            .map(|(name, direction)| SortField { name, direction })
            .collect(),
      )
   }
}

impl From<SortSpec> for IndexMap<String, SortDirection> {
   fn from(spec: SortSpec) -> Self {
      spec.0.into_iter().map(|f| (f.name, f.direction)).collect()
   }
}

impl From<Vec<SortField>> for SortSpec {
   fn from(fields: Vec<SortField>) -> Self {
      Self(fields)
   }
}
