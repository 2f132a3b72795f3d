//! SQL for [`ContactStore::search`](roster_core::store::ContactStore::search).
//!
//! Filters become `LIKE` clauses with bound parameters; the sort is mapped
//! from a closed set of fields to fixed `ORDER BY` text, so no user input is
//! ever spliced into SQL.

use roster_core::query::{SearchCriteria, SortDirection, SortField, SortInfo};

/// The `FROM` clause shared by the count and the page query.
pub const FROM: &str = "FROM contacts c LEFT JOIN addresses a ON a.contact_id = c.id";

/// A `WHERE` clause (empty when there are no filters) and its parameters,
/// numbered from `?1`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Filter {
  pub clause: String,
  pub params: Vec<String>,
}

impl Filter {
  pub fn from_criteria(criteria: &SearchCriteria) -> Self {
    let mut conds: Vec<String> = Vec::new();
    let mut params: Vec<String> = Vec::new();

    let mut like = |columns: &[&str], value: &Option<String>| {
      let Some(value) = SearchCriteria::filter(value) else {
        return;
      };
      params.push(contains_pattern(value));
      let n = params.len();
      let alts: Vec<String> =
        columns.iter().map(|col| format!("{col} LIKE ?{n} ESCAPE '\\'")).collect();
      conds.push(if alts.len() == 1 {
        alts.concat()
      } else {
        format!("({})", alts.join(" OR "))
      });
    };

    like(&["c.email"], &criteria.email);
    like(&["c.first_name", "c.last_name"], &criteria.name);
    like(&["a.city"], &criteria.city);
    like(&["a.state"], &criteria.state);
    like(&["a.country"], &criteria.country);
    like(&["c.company_name"], &criteria.company);
    like(&["c.job_title"], &criteria.job_title);

    let clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };
    Self { clause, params }
  }
}

/// `%value%`, with the `LIKE` metacharacters in `value` escaped.
pub fn contains_pattern(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('%');
  for ch in value.chars() {
    if matches!(ch, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(ch);
  }
  out.push('%');
  out
}

/// `ORDER BY` body for a resolved sort. `c.id` always breaks ties.
pub fn order_by(sort: SortInfo) -> String {
  let dir = match sort.sort_direction {
    SortDirection::Ascending => "ASC",
    SortDirection::Descending => "DESC",
  };
  let keys: &[&str] = match sort.sort_by {
    SortField::Name => &["c.first_name", "c.last_name"],
    SortField::Email => &["c.email"],
    SortField::CompanyName => &["c.company_name"],
    SortField::JobTitle => &["c.job_title"],
    SortField::CreatedOn => &["c.created_on"],
    SortField::DateOfBirth => &["c.date_of_birth"],
  };
  let mut parts: Vec<String> = keys.iter().map(|k| format!("{k} {dir}")).collect();
  parts.push("c.id ASC".to_owned());
  parts.join(", ")
}
