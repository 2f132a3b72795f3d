//! Search criteria, pagination and sorting types.
//!
//! A criteria body may omit any part; the accessors here resolve missing or
//! out-of-range parts to their defaults (page 1 of 10, Name ascending) so the
//! store only ever sees effective values.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::contact::ContactSummary;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

// ─── Sorting ─────────────────────────────────────────────────────────────────

/// The fields a search may be sorted by. Anything else falls back to
/// [`SortField::Name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum SortField {
  /// The composed display name: first name, then last name.
  #[default]
  Name,
  Email,
  CompanyName,
  JobTitle,
  CreatedOn,
  DateOfBirth,
}

impl SortField {
  pub const ALL: [SortField; 6] = [
    Self::Name,
    Self::Email,
    Self::CompanyName,
    Self::JobTitle,
    Self::CreatedOn,
    Self::DateOfBirth,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Name => "Name",
      Self::Email => "Email",
      Self::CompanyName => "CompanyName",
      Self::JobTitle => "JobTitle",
      Self::CreatedOn => "CreatedOn",
      Self::DateOfBirth => "DateOfBirth",
    }
  }

  /// Resolve a requested field name against the allow-list.
  pub fn parse(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|f| f.as_str() == s)
  }
}

impl Serialize for SortField {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for SortField {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Self::parse).unwrap_or_default())
  }
}

/// Encoded on the wire as `0` (ascending) or `1` (descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum SortDirection {
  #[default]
  Ascending,
  Descending,
}

impl Serialize for SortDirection {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(match self {
      Self::Ascending => 0,
      Self::Descending => 1,
    })
  }
}

impl<'de> Deserialize<'de> for SortDirection {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    match Option::<u8>::deserialize(deserializer)? {
      None | Some(0) => Ok(Self::Ascending),
      Some(1) => Ok(Self::Descending),
      Some(other) => Err(serde::de::Error::custom(format!(
        "sort direction must be 0 or 1, got {other}"
      ))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortInfo {
  #[serde(default)]
  pub sort_by:        SortField,
  /// `sortOrder` is what some clients send; it means the same thing.
  #[serde(default, alias = "sortOrder")]
  pub sort_direction: SortDirection,
}

// ─── Pagination ──────────────────────────────────────────────────────────────

/// The requested page. Values below 1 are clamped by [`Pagination::skip`]
/// and friends, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  #[serde(default = "default_page")]
  pub current_page: i64,
  #[serde(default = "default_page_size")]
  pub page_size:    i64,
}

fn default_page() -> i64 { DEFAULT_PAGE }

fn default_page_size() -> i64 { DEFAULT_PAGE_SIZE }

impl Default for Pagination {
  fn default() -> Self {
    Self { current_page: DEFAULT_PAGE, page_size: DEFAULT_PAGE_SIZE }
  }
}

impl Pagination {
  /// The same page with both values clamped to at least 1.
  pub fn normalized(self) -> Self {
    Self {
      current_page: self.current_page.max(1),
      page_size:    self.page_size.max(1),
    }
  }

  /// Number of rows to skip: `(currentPage - 1) * pageSize`.
  pub fn skip(self) -> i64 {
    let p = self.normalized();
    (p.current_page - 1).saturating_mul(p.page_size)
  }

  /// Number of rows to take.
  pub fn take(self) -> i64 { self.normalized().page_size }
}

/// The pagination block echoed back with a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
  pub current_page:  i64,
  pub page_size:     i64,
  pub total_records: u64,
  /// `ceil(totalRecords / pageSize)`.
  pub total_pages:   u64,
}

impl PageInfo {
  pub fn new(pagination: Pagination, total_records: u64) -> Self {
    let p = pagination.normalized();
    let size = p.page_size as u64;
    Self {
      current_page: p.current_page,
      page_size: p.page_size,
      total_records,
      total_pages: total_records.div_ceil(size),
    }
  }
}

// ─── Criteria ────────────────────────────────────────────────────────────────

/// Parameters for [`ContactStore::search`](crate::store::ContactStore::search).
///
/// Text filters are substring matches combined with AND; blank filters are
/// ignored. `name` matches either the first or the last name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
  pub email:           Option<String>,
  pub name:            Option<String>,
  pub city:            Option<String>,
  pub state:           Option<String>,
  pub country:         Option<String>,
  pub company:         Option<String>,
  pub job_title:       Option<String>,
  pub pagination_info: Option<Pagination>,
  pub sort_info:       Option<SortInfo>,
}

impl SearchCriteria {
  /// Effective pagination: the request's, clamped, or page 1 of 10.
  pub fn pagination(&self) -> Pagination {
    self.pagination_info.unwrap_or_default().normalized()
  }

  /// Effective sort: the request's (already resolved against the
  /// allow-list) or Name ascending.
  pub fn sort(&self) -> SortInfo { self.sort_info.unwrap_or_default() }

  /// The text filter, if it is worth applying.
  pub fn filter(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
  }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// What a store returns for one search: the requested window of rows and the
/// size of the whole filtered set.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
  pub items:         Vec<ContactSummary>,
  pub total_records: u64,
}

/// A page of results together with the effective pagination and sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
  pub items:           Vec<T>,
  pub pagination_info: PageInfo,
  pub sort_info:       SortInfo,
}

impl Page<ContactSummary> {
  pub fn from_search(criteria: &SearchCriteria, page: SearchPage) -> Self {
    Self {
      items:           page.items,
      pagination_info: PageInfo::new(criteria.pagination(), page.total_records),
      sort_info:       criteria.sort(),
    }
  }
}
