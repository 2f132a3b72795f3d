//! The `ContactStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  contact::Contact,
  query::{SearchCriteria, SearchPage},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Roster contact store backend.
///
/// A contact and its owned rows (address, emergency contacts) are always read
/// and written together. Every multi-row write is atomic.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Filter, sort and paginate contacts.
  ///
  /// `total_records` counts every contact matching the filters, regardless of
  /// the requested page.
  fn search<'a>(
    &'a self,
    criteria: &'a SearchCriteria,
  ) -> impl Future<Output = Result<SearchPage, Self::Error>> + Send + 'a;

  /// Retrieve a contact with its owned rows. Returns `None` if not found.
  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  fn exists(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Number of stored contacts.
  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a new contact and its owned rows, returning it with the
  /// store-assigned ids filled in.
  ///
  /// A non-zero `contact.id` is kept as the primary key; `created_on` is
  /// stored as given.
  fn insert(
    &self,
    contact: Contact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Overwrite a contact's editable fields and replace its owned rows.
  ///
  /// The stored `email` and `created_on` are kept whatever the input says.
  /// Returns `None` if the contact does not exist.
  fn update(
    &self,
    contact: Contact,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Delete a contact and everything it owns. Returns `false` if it did not
  /// exist.
  fn remove(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
