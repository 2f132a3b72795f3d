//! The patch operation on [`ContactService`].

use roster_core::{Error as CoreError, contact::Contact, patch::PatchDocument, store::ContactStore};

use crate::{
  envelope::Envelope,
  messages::{self, FIELD_PATCH},
  service::ContactService,
};

impl<S> ContactService<S>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  /// Apply `document` to the contact at `id` and store the result through
  /// [`update`](Self::update).
  ///
  /// Operations on `/id`, `/email`, `/createdOn` and `/updatedOn` are dropped
  /// first. A failure anywhere leaves the stored contact untouched.
  pub async fn patch(&self, id: i64, document: Option<PatchDocument>) -> Envelope<Contact> {
    let Some(mut document) = document else {
      return Envelope::bad_request(FIELD_PATCH, messages::PATCH_NULL);
    };
    document.strip_protected();

    let contact = match self.get(id).await {
      Envelope { data: Some(contact), .. } => contact,
      failure => return failure,
    };

    let patched = match document.apply_to(&contact) {
      Ok(patched) => patched,
      Err(e) => {
        tracing::debug!(contact_id = id, error = %e, "patch rejected");
        return Envelope::bad_request(FIELD_PATCH, patch_message(&e));
      }
    };
    if let Err(errors) = patched.validate() {
      return Envelope::invalid(errors);
    }

    self.update(id, Some(patched)).await
  }
}

fn patch_message(e: &CoreError) -> String {
  match e {
    CoreError::Serialization(inner) => format!("Invalid patch: {inner}"),
    other => other.to_string(),
  }
}
