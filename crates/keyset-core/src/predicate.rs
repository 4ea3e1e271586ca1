//! Filter predicates and the keyset seek condition.
//!
//! [`seek_predicate`] turns a sort spec and a cursor position into the
//! standard "lexicographically after" condition:
//!
//! ```text
//! (a > va)
//! OR (a = va AND b < vb)
//! OR (a = va AND b = vb AND c > vc)
//! ```
//!
//! Each level compares with `>` for an ascending field and `<` for a
//! descending one. Data sources render the resulting [`Predicate`] in their
//! own query language; the in-memory source evaluates it directly.

use serde::{Deserialize, Serialize};

use crate::cursor::Position;
use crate::error::{Error, Result};
use crate::sort::{SortDirection, SortSpec};
use crate::value::{Document, FieldValue};

/// Comparison operator for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Comparison {
   Eq,
   Ne,
   Gt,
   Gte,
   Lt,
   Lte,
}

impl Comparison {
   /// Operator selecting values strictly past the cursor in `direction`.
   pub fn strictly_after(direction: SortDirection) -> Self {
      match direction {
         SortDirection::Asc => Comparison::Gt,
         SortDirection::Desc => Comparison::Lt,
      }
   }

   /// SQL spelling of the operator.
   pub fn as_sql(self) -> &'static str {
      match self {
         Comparison::Eq => "=",
         Comparison::Ne => "<>",
         Comparison::Gt => ">",
         Comparison::Gte => ">=",
         Comparison::Lt => "<",
         Comparison::Lte => "<=",
      }
   }
}

/// A boolean condition over document fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
   /// Matches every document.
   Always,
   Compare {
      field: String,
      op: Comparison,
      value: FieldValue,
   },
   And(Vec<Predicate>),
   Or(Vec<Predicate>),
}

impl Predicate {
   pub fn compare(field: impl Into<String>, op: Comparison, value: impl Into<FieldValue>) -> Self {
      Predicate::Compare {
         field: field.into(),
         op,
         value: value.into(),
      }
   }

   pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
      Self::compare(field, Comparison::Eq, value)
   }

   pub fn gt(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
      Self::compare(field, Comparison::Gt, value)
   }

   pub fn lt(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
      Self::compare(field, Comparison::Lt, value)
   }

   pub fn is_always(&self) -> bool {
      matches!(self, Predicate::Always)
   }

   /// Evaluate against a document. Absent fields compare as null.
   pub fn matches<D: Document + ?Sized>(&self, doc: &D) -> bool {
      match self {
         Predicate::Always => true,
         Predicate::Compare { field, op, value } => {
            let actual = doc.field(field).unwrap_or(FieldValue::Null);
            let ordering = actual.compare(value);
            match op {
               Comparison::Eq => ordering.is_eq(),
               Comparison::Ne => ordering.is_ne(),
               Comparison::Gt => ordering.is_gt(),
               Comparison::Gte => ordering.is_ge(),
               Comparison::Lt => ordering.is_lt(),
               Comparison::Lte => ordering.is_le(),
            }
         }
         Predicate::And(parts) => parts.iter().all(|p| p.matches(doc)),
         Predicate::Or(parts) => parts.iter().any(|p| p.matches(doc)),
      }
   }
}

/// Build the condition selecting documents strictly after `position` under `sort`.
///
/// With no cursor the result is [`Predicate::Always`]. A position that lacks
/// any sort field is reported as a malformed cursor.
pub fn seek_predicate(sort: &SortSpec, position: Option<&Position>) -> Result<Predicate> {
   if sort.is_empty() {
      return Err(Error::EmptySortSpec);
   }

   let Some(position) = position else {
      return Ok(Predicate::Always);
   };
   position.validate_against(sort)?;

   let fields = sort.fields();
   let value_of = |name: &str| position.get(name).cloned().unwrap_or(FieldValue::Null);

   let mut levels = Vec::with_capacity(fields.len());
   for (level, field) in fields.iter().enumerate() {
      let mut parts: Vec<Predicate> = fields[..level]
         .iter()
         .map(|prior| Predicate::eq(prior.name.clone(), value_of(&prior.name)))
         .collect();

      parts.push(Predicate::compare(
         field.name.clone(),
         Comparison::strictly_after(field.direction),
         value_of(&field.name),
      ));

      levels.push(if parts.len() == 1 {
         parts.remove(0)
      } else {
         Predicate::And(parts)
      });
   }

   Ok(if levels.len() == 1 {
      levels.remove(0)
   } else {
      Predicate::Or(levels)
   })
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::sort::SortField;
   use serde_json::json;

   #[test]
   fn no_cursor_is_always() {
      let sort = SortSpec::new(vec![SortField::asc("id")]);
      assert_eq!(seek_predicate(&sort, None).unwrap(), Predicate::Always);
   }

   #[test]
   fn empty_sort_is_rejected() {
      let err = seek_predicate(&SortSpec::default(), None).unwrap_err();
      assert!(matches!(err, Error::EmptySortSpec));
   }

   #[test]
   fn single_field_asc() {
      let sort = SortSpec::new(vec![SortField::asc("id")]);
      let position = Position::new().with("id", 42);

      assert_eq!(
         seek_predicate(&sort, Some(&position)).unwrap(),
         Predicate::gt("id", 42)
      );
   }

   #[test]
   fn single_field_desc() {
      let sort = SortSpec::new(vec![SortField::desc("id")]);
      let position = Position::new().with("id", 42);

      assert_eq!(
         seek_predicate(&sort, Some(&position)).unwrap(),
         Predicate::lt("id", 42)
      );
   }

   #[test]
   fn mixed_directions_expand_to_levels() {
      let sort = SortSpec::new(vec![
         SortField::asc("a"),
         SortField::desc("b"),
         SortField::asc("c"),
      ]);
      let position = Position::new().with("a", "va").with("b", "vb").with("c", "vc");

      assert_eq!(
         seek_predicate(&sort, Some(&position)).unwrap(),
         Predicate::Or(vec![
            Predicate::gt("a", "va"),
            Predicate::And(vec![Predicate::eq("a", "va"), Predicate::lt("b", "vb")]),
            Predicate::And(vec![
               Predicate::eq("a", "va"),
               Predicate::eq("b", "vb"),
               Predicate::gt("c", "vc"),
            ]),
         ])
      );
   }

   #[test]
   fn reversed_sort_seeks_backward() {
      let sort = SortSpec::new(vec![SortField::asc("a"), SortField::desc("b")]).reversed();
      let position = Position::new().with("a", 1).with("b", 2);

      assert_eq!(
         seek_predicate(&sort, Some(&position)).unwrap(),
         Predicate::Or(vec![
            Predicate::lt("a", 1),
            Predicate::And(vec![Predicate::eq("a", 1), Predicate::gt("b", 2)]),
         ])
      );
   }

   #[test]
   fn position_missing_field_is_malformed() {
      let sort = SortSpec::new(vec![SortField::asc("a"), SortField::asc("id")]);
      let position = Position::new().with("id", 1);

      let err = seek_predicate(&sort, Some(&position)).unwrap_err();
      assert!(matches!(err, Error::MalformedCursor { .. }));
   }

   #[test]
   fn seek_selects_rows_strictly_after_with_ties() {
      let sort = SortSpec::new(vec![SortField::asc("category"), SortField::asc("id")]);
      let position = Position::new().with("category", "tech").with("id", 4);
      let predicate = seek_predicate(&sort, Some(&position)).unwrap();

      assert!(!predicate.matches(&json!({"category": "tech", "id": 4})));
      assert!(!predicate.matches(&json!({"category": "tech", "id": 3})));
      assert!(predicate.matches(&json!({"category": "tech", "id": 5})));
      assert!(predicate.matches(&json!({"category": "zoo", "id": 1})));
      assert!(!predicate.matches(&json!({"category": "art", "id": 9})));
   }

   #[test]
   fn matches_treats_absent_fields_as_null() {
      let doc = json!({"id": 1});

      assert!(Predicate::eq("deleted_at", FieldValue::Null).matches(&doc));
      assert!(!Predicate::gt("deleted_at", 0).matches(&doc));
      assert!(Predicate::And(vec![]).matches(&doc));
      assert!(!Predicate::Or(vec![]).matches(&doc));
   }
}
