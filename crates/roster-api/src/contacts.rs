//! Handlers for `/contact` endpoints.
//!
//! | Method   | Path              | Notes |
//! |----------|-------------------|-------|
//! | `POST`   | `/contact/search` | Body optional: search criteria |
//! | `POST`   | `/contact`        | Body: contact |
//! | `GET`    | `/contact/{id}`   | 404 if not found |
//! | `PUT`    | `/contact/{id}`   | Body: contact with matching `id` |
//! | `PATCH`  | `/contact/{id}`   | Body: `[{"op":"replace","path":"/jobTitle","value":"CTO"}]` |
//! | `DELETE` | `/contact/{id}`   | 404 if not found |
//!
//! Bodies are read as raw bytes so that malformed JSON is answered with an
//! envelope rather than axum's plain-text rejection.

use std::sync::Arc;

use axum::{
  body::Bytes,
  extract::{Path, State},
};
use roster_core::{
  contact::{Contact, ContactSummary},
  patch::PatchDocument,
  query::{Page, SearchCriteria},
  store::ContactStore,
};
use serde::de::DeserializeOwned;

use crate::{
  envelope::Envelope,
  messages::{self, FIELD_CONTACT, FIELD_CONTACT_ID, FIELD_PATCH},
  service::ContactService,
};

/// An empty body or a bare `null` reads as `None`.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<Option<T>, serde_json::Error> {
  if body.iter().all(u8::is_ascii_whitespace) {
    return Ok(None);
  }
  serde_json::from_slice::<Option<T>>(body)
}

fn parse_id(raw: &str) -> Result<i64, String> {
  raw.trim().parse().map_err(|_| messages::invalid_id(raw))
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// `POST /contact/search`
pub async fn search<S>(
  State(store): State<Arc<S>>,
  body: Bytes,
) -> Envelope<Page<ContactSummary>>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let criteria = match parse_body::<SearchCriteria>(&body) {
    Ok(c) => c,
    Err(e) => return Envelope::bad_request("SearchCriteria", e.to_string()),
  };
  ContactService::new(store).search(criteria).await
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /contact/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
) -> Envelope<Contact>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  match parse_id(&raw_id) {
    Ok(id) => ContactService::new(store).get(id).await,
    Err(m) => Envelope::bad_request(FIELD_CONTACT_ID, m),
  }
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /contact`
pub async fn create<S>(State(store): State<Arc<S>>, body: Bytes) -> Envelope<Contact>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  match parse_body::<Contact>(&body) {
    Ok(contact) => ContactService::new(store).create(contact).await,
    Err(e) => Envelope::bad_request(FIELD_CONTACT, e.to_string()),
  }
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /contact/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
  body: Bytes,
) -> Envelope<Contact>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = match parse_id(&raw_id) {
    Ok(id) => id,
    Err(m) => return Envelope::bad_request(FIELD_CONTACT_ID, m),
  };
  match parse_body::<Contact>(&body) {
    Ok(contact) => ContactService::new(store).update(id, contact).await,
    Err(e) => Envelope::bad_request(FIELD_CONTACT, e.to_string()),
  }
}

// ─── Patch ───────────────────────────────────────────────────────────────────

/// `PATCH /contact/{id}`
pub async fn patch<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
  body: Bytes,
) -> Envelope<Contact>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = match parse_id(&raw_id) {
    Ok(id) => id,
    Err(m) => return Envelope::bad_request(FIELD_CONTACT_ID, m),
  };
  match parse_body::<PatchDocument>(&body) {
    Ok(document) => ContactService::new(store).patch(id, document).await,
    Err(e) => Envelope::bad_request(FIELD_PATCH, e.to_string()),
  }
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /contact/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
) -> Envelope<bool>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  match parse_id(&raw_id) {
    Ok(id) => ContactService::new(store).delete(id).await,
    Err(m) => Envelope::bad_request(FIELD_CONTACT_ID, m),
  }
}
