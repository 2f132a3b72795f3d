//! [`ContactService`]: the contact operations, each answering with an
//! [`Envelope`].
//!
//! Every operation converts its own failures into an envelope. Store errors
//! are logged with their cause and reported to the caller with a generic
//! message only.

use std::sync::Arc;

use chrono::Utc;
use roster_core::{
  contact::{Contact, ContactSummary},
  query::{Page, SearchCriteria},
  store::ContactStore,
};

use crate::{
  envelope::Envelope,
  messages::{self, FIELD_CONTACT, FIELD_CONTACT_ID},
};

/// Request-scoped access to a [`ContactStore`].
pub struct ContactService<S> {
  store: Arc<S>,
}

impl<S> ContactService<S>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  // ─── Reads ─────────────────────────────────────────────────────────────────

  /// Filter, sort and paginate. `None` means no filters, page 1 of 10,
  /// Name ascending.
  pub async fn search(
    &self,
    criteria: Option<SearchCriteria>,
  ) -> Envelope<Page<ContactSummary>> {
    let criteria = criteria.unwrap_or_default();
    match self.store.search(&criteria).await {
      Ok(page) => Envelope::ok(Page::from_search(&criteria, page)),
      Err(e) => {
        tracing::error!(error = %e, "search failed");
        Envelope::internal(messages::SEARCH_FAILED)
      }
    }
  }

  pub async fn get(&self, id: i64) -> Envelope<Contact> {
    if id <= 0 {
      return Envelope::bad_request(FIELD_CONTACT_ID, messages::ID_NOT_POSITIVE);
    }
    match self.store.get(id).await {
      Ok(Some(contact)) => Envelope::ok(contact),
      Ok(None) => {
        tracing::warn!(contact_id = id, "contact not found");
        Envelope::not_found(messages::not_found(id))
      }
      Err(e) => {
        tracing::error!(contact_id = id, error = %e, "get failed");
        Envelope::internal(messages::get_failed(id))
      }
    }
  }

  // ─── Writes ────────────────────────────────────────────────────────────────

  pub async fn create(&self, contact: Option<Contact>) -> Envelope<Contact> {
    let Some(mut contact) = contact else {
      return Envelope::bad_request(FIELD_CONTACT, messages::CONTACT_NULL);
    };
    if let Err(errors) = contact.validate() {
      return Envelope::invalid(errors);
    }

    contact.id = 0;
    contact.created_on = Utc::now();
    contact.updated_on = None;

    match self.store.insert(contact).await {
      Ok(stored) => {
        tracing::info!(contact_id = stored.id, "contact created");
        Envelope::ok(stored)
      }
      Err(e) => {
        tracing::error!(error = %e, "create failed");
        Envelope::internal(messages::CREATE_FAILED)
      }
    }
  }

  /// Full replace of the contact at `id`. The stored `email` and `createdOn`
  /// survive whatever the body says.
  pub async fn update(&self, id: i64, contact: Option<Contact>) -> Envelope<Contact> {
    let Some(mut contact) = contact else {
      return Envelope::bad_request(FIELD_CONTACT, messages::CONTACT_NULL);
    };
    if id <= 0 {
      return Envelope::bad_request(FIELD_CONTACT_ID, messages::ID_NOT_POSITIVE);
    }
    if contact.id != id {
      return Envelope::bad_request(FIELD_CONTACT_ID, messages::ID_MISMATCH);
    }
    if let Err(errors) = contact.validate() {
      return Envelope::invalid(errors);
    }

    match self.exists(id).await {
      Ok(true) => {}
      Ok(false) => {
        tracing::warn!(contact_id = id, "update of missing contact");
        return Envelope::not_found(messages::not_found(id));
      }
      Err(_) => return Envelope::internal(messages::update_failed(id)),
    }

    contact.updated_on = Some(Utc::now());

    match self.store.update(contact).await {
      Ok(Some(updated)) => {
        tracing::info!(contact_id = id, "contact updated");
        Envelope::ok(updated)
      }
      // Deleted between the existence check and the write.
      Ok(None) => Envelope::not_found(messages::not_found(id)),
      Err(e) => {
        tracing::error!(contact_id = id, error = %e, "update failed");
        Envelope::internal(messages::update_failed(id))
      }
    }
  }

  pub async fn delete(&self, id: i64) -> Envelope<bool> {
    if id <= 0 {
      return Envelope::bad_request(FIELD_CONTACT_ID, messages::ID_NOT_POSITIVE);
    }

    match self.exists(id).await {
      Ok(true) => {}
      Ok(false) => {
        tracing::warn!(contact_id = id, "delete of missing contact");
        return Envelope::not_found(messages::not_found(id));
      }
      Err(_) => return Envelope::internal(messages::delete_failed(id)),
    }

    match self.store.remove(id).await {
      Ok(true) => {
        tracing::info!(contact_id = id, "contact deleted");
        Envelope::ok(true)
      }
      Ok(false) => Envelope::not_found(messages::not_found(id)),
      Err(e) => {
        tracing::error!(contact_id = id, error = %e, "delete failed");
        Envelope::internal(messages::delete_failed(id))
      }
    }
  }

  /// Logs a store failure and hands it back to the calling operation.
  async fn exists(&self, id: i64) -> Result<bool, S::Error> {
    self.store.exists(id).await.inspect_err(|e| {
      tracing::error!(contact_id = id, error = %e, "existence check failed");
    })
  }
}
