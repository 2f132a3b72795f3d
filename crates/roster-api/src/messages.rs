//! Caller-facing messages and the field tags they are reported under.

pub const FIELD_CONTACT: &str = "Contact";
pub const FIELD_CONTACT_ID: &str = "ContactId";
pub const FIELD_PATCH: &str = "Patch";

pub const CONTACT_NULL: &str = "Contact cannot be null";
pub const PATCH_NULL: &str = "Patch document cannot be null";
pub const ID_NOT_POSITIVE: &str = "Id should be greater than zero";
pub const ID_MISMATCH: &str = "Contact Id in path must match Id in the body";
pub const SEARCH_FAILED: &str = "An error occurred while retrieving contacts";
pub const CREATE_FAILED: &str = "An error occurred while creating contact.";

pub fn not_found(id: i64) -> String { format!("Contact with Id {id} not found") }

pub fn get_failed(id: i64) -> String {
  format!("An error occurred while retrieving contact with Id: {id}")
}

pub fn update_failed(id: i64) -> String {
  format!("An unexpected error occurred while updating the contact with ID: {id}")
}

pub fn delete_failed(id: i64) -> String {
  format!("An unexpected error occurred while deleting the contact with ID: {id}")
}

pub fn invalid_id(raw: &str) -> String { format!("Invalid contact Id: {raw}") }
