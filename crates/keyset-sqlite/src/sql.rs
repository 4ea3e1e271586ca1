//! SQL generation for the SQLite data source.
//!
//! The caller's [`SqlFilter`] is wrapped as a subquery and the pagination
//! clauses are appended outside it:
//!
//! ```text
//! SELECT * FROM (<caller query>)
//!    WHERE <seek predicate>
//!    ORDER BY <sort>
//!    LIMIT <limit + 1> OFFSET <skip>
//! ```
//!
//! Seek placeholders are numbered after the caller's own (`$k+1`, `$k+2`, …)
//! so they never collide with the caller's `$1`, `$2`, … parameters.

use keyset_core::{Comparison, FieldValue, Predicate, SortDirection, SortSpec};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::Error;

/// The caller's filter stage: a SELECT plus its bind values.
///
/// The query must not carry a top-level ORDER BY, LIMIT or OFFSET; ordering
/// and windowing are appended by the paginator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SqlFilter {
   pub query: String,
   #[serde(default)]
   pub values: Vec<JsonValue>,
}

impl SqlFilter {
   pub fn new(query: impl Into<String>) -> Self {
      Self {
         query: query.into(),
         values: Vec::new(),
      }
   }

   /// Append a bind value for the next `$N` placeholder.
   pub fn bind(mut self, value: impl Into<JsonValue>) -> Self {
      self.values.push(value.into());
      self
   }
}

/// Validate that a column name is safe for SQL interpolation.
///
/// Accepts names matching `[a-zA-Z_][a-zA-Z0-9_]*`. Qualified names are not
/// needed: pagination runs against the columns of the wrapped subquery.
pub(crate) fn validate_column_name(name: &str) -> Result<(), Error> {
   let mut chars = name.chars();
   let valid = match chars.next() {
      Some(first) => {
         (first.is_ascii_alphabetic() || first == '_')
            && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
      }
      None => false,
   };

   if !valid {
      return Err(Error::InvalidColumnName {
         name: name.to_string(),
      });
   }

   Ok(())
}

/// Quote a column name with double-quote identifiers.
///
/// Any embedded double quotes are doubled per SQL standard (`"` → `""`).
pub(crate) fn quote_identifier(name: &str) -> String {
   format!("\"{}\"", name.replace('"', "\"\""))
}

fn is_word_byte(b: u8) -> bool {
   b.is_ascii_alphanumeric() || b == b'_'
}

/// Index of the closing `quote`, honouring doubled-quote escapes.
fn skip_quoted(bytes: &[u8], start: usize, quote: u8) -> usize {
   let mut j = start + 1;
   while j < bytes.len() {
      if bytes[j] == quote {
         if bytes.get(j + 1) == Some(&quote) {
            j += 2;
            continue;
         }
         return j;
      }
      j += 1;
   }
   bytes.len()
}

/// Find the first of `keywords` used as a word at paren depth 0, ignoring
/// string literals, quoted identifiers and comments.
fn find_top_level_keyword(query: &str, keywords: &[&'static str]) -> Option<&'static str> {
   let upper = query.to_ascii_uppercase();
   let bytes = upper.as_bytes();
   let len = bytes.len();
   let mut depth: i32 = 0;
   let mut i = 0;

   while i < len {
      match bytes[i] {
         b'(' => depth += 1,
         b')' => depth -= 1,
         quote @ (b'\'' | b'"' | b'`') => i = skip_quoted(bytes, i, quote),
         b'[' => {
            i = bytes[i..]
               .iter()
               .position(|&b| b == b']')
               .map_or(len, |p| i + p);
         }
         b'-' if bytes.get(i + 1) == Some(&b'-') => {
            i = bytes[i..]
               .iter()
               .position(|&b| b == b'\n')
               .map_or(len, |p| i + p);
         }
         b'/' if bytes.get(i + 1) == Some(&b'*') => {
            i = upper[i + 2..].find("*/").map_or(len, |p| i + 2 + p + 1);
         }
         b if is_word_byte(b) => {
            let end = bytes[i..]
               .iter()
               .position(|&b| !is_word_byte(b))
               .map_or(len, |p| i + p);
            if depth == 0
               && let Some(keyword) = keywords.iter().copied().find(|k| *k == &upper[i..end])
            {
               return Some(keyword);
            }
            i = end;
            continue;
         }
         _ => {}
      }
      i += 1;
   }

   None
}

/// Validate that a base query does not contain top-level ORDER BY, LIMIT or OFFSET.
///
/// These clauses conflict with the pagination logic, which appends its own.
/// Clauses inside parenthesised subexpressions, comments, and string
/// literals are allowed.
pub(crate) fn validate_base_query(query: &str) -> Result<(), Error> {
   match find_top_level_keyword(query, &["ORDER", "LIMIT", "OFFSET"]) {
      Some(_) => Err(Error::InvalidPaginationQuery),
      None => Ok(()),
   }
}

/// Strip trailing whitespace and semicolons so the query can be wrapped.
fn trimmed(query: &str) -> &str {
   query.trim_end().trim_end_matches(';').trim_end()
}

/// Render one comparison, keeping NULL ordered below every other value.
///
/// SQLite sorts NULL first ascending; a plain `col < $n` would drop NULL rows
/// that the ordering places before the cursor, so the comparison is widened
/// to match.
fn render_compare(
   column: &str,
   op: Comparison,
   value: &FieldValue,
   binds: &mut Vec<FieldValue>,
   param_offset: usize,
) -> String {
   if matches!(value, FieldValue::Null) {
      return match op {
         Comparison::Eq | Comparison::Lte => format!("{column} IS NULL"),
         Comparison::Ne | Comparison::Gt => format!("{column} IS NOT NULL"),
         Comparison::Gte => "1 = 1".to_string(),
         Comparison::Lt => "1 = 0".to_string(),
      };
   }

   binds.push(value.clone());
   let placeholder = format!("${}", param_offset + binds.len());
   let comparison = format!("{column} {} {placeholder}", op.as_sql());

   match op {
      Comparison::Lt | Comparison::Lte | Comparison::Ne => {
         format!("({comparison} OR {column} IS NULL)")
      }
      Comparison::Eq | Comparison::Gt | Comparison::Gte => comparison,
   }
}

fn render_into(
   predicate: &Predicate,
   binds: &mut Vec<FieldValue>,
   param_offset: usize,
) -> Result<String, Error> {
   let (parts, separator, empty) = match predicate {
      Predicate::Always => return Ok("1 = 1".to_string()),
      Predicate::Compare { field, op, value } => {
         validate_column_name(field)?;
         return Ok(render_compare(
            &quote_identifier(field),
            *op,
            value,
            binds,
            param_offset,
         ));
      }
      Predicate::And(parts) => (parts, " AND ", "1 = 1"),
      Predicate::Or(parts) => (parts, " OR ", "1 = 0"),
   };

   if parts.is_empty() {
      return Ok(empty.to_string());
   }

   let rendered = parts
      .iter()
      .map(|p| render_into(p, binds, param_offset).map(|sql| format!("({sql})")))
      .collect::<Result<Vec<_>, _>>()?;

   Ok(rendered.join(separator))
}

/// Render a predicate as a SQL condition plus the values for its placeholders.
///
/// `param_offset` is the number of caller bind values preceding them.
pub(crate) fn render_predicate(
   predicate: &Predicate,
   param_offset: usize,
) -> Result<(String, Vec<FieldValue>), Error> {
   let mut binds = Vec::new();
   let sql = render_into(predicate, &mut binds, param_offset)?;
   Ok((sql, binds))
}

/// Build the ORDER BY clause from the sort spec.
pub(crate) fn build_order_by(sort: &SortSpec) -> Result<String, Error> {
   let mut parts = Vec::with_capacity(sort.len());
   for field in sort.fields() {
      validate_column_name(&field.name)?;
      let dir = match field.direction {
         SortDirection::Asc => "ASC",
         SortDirection::Desc => "DESC",
      };
      parts.push(format!("{} {}", quote_identifier(&field.name), dir));
   }

   Ok(format!("ORDER BY {}", parts.join(", ")))
}

/// Build the total-count query for a filter.
pub(crate) fn build_count_query(filter: &SqlFilter) -> Result<String, Error> {
   validate_base_query(&filter.query)?;
   Ok(format!(
      "SELECT COUNT(*) FROM ({})",
      trimmed(&filter.query)
   ))
}

/// Build the paginated data query.
///
/// Returns the SQL and the seek bind values, which follow the filter's own.
pub(crate) fn build_page_query(
   filter: &SqlFilter,
   range: &Predicate,
   sort: &SortSpec,
   skip: u64,
   limit: usize,
) -> Result<(String, Vec<FieldValue>), Error> {
   validate_base_query(&filter.query)?;
   if sort.is_empty() {
      return Err(keyset_core::Error::EmptySortSpec.into());
   }

   let mut sql = format!("SELECT * FROM ({})", trimmed(&filter.query));
   let mut binds = Vec::new();

   if !range.is_always() {
      let (condition, values) = render_predicate(range, filter.values.len())?;
      sql = format!("{sql} WHERE {condition}");
      binds = values;
   }

   // SQLite takes LIMIT and OFFSET as signed 64-bit integers
   let limit = u64::try_from(limit).unwrap_or(u64::MAX).min(i64::MAX as u64);
   let offset = skip.min(i64::MAX as u64);
   sql = format!("{sql} {} LIMIT {limit} OFFSET {offset}", build_order_by(sort)?);

   Ok((sql, binds))
}
