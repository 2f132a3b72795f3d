//! JSON REST API for Roster.
//!
//! Exposes an axum [`Router`] backed by any
//! [`roster_core::store::ContactStore`]. Auth, TLS, and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roster_api::api_router(store.clone()))
//! ```

pub mod contacts;
pub mod envelope;
pub mod messages;
pub mod patch;
pub mod service;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use roster_core::store::ContactStore;

pub use envelope::{Envelope, ErrorDetail};
pub use service::ContactService;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ContactStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/contact", post(contacts::create::<S>))
    .route("/contact/search", post(contacts::search::<S>))
    .route(
      "/contact/{id}",
      get(contacts::get_one::<S>)
        .put(contacts::update::<S>)
        .patch(contacts::patch::<S>)
        .delete(contacts::delete::<S>),
    )
    .with_state(store)
}

#[cfg(test)]
mod tests;
