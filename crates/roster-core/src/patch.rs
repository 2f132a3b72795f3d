//! Patch documents: an ordered list of add / remove / replace operations
//! addressed by JSON Pointer into a contact's camelCase JSON image.
//!
//! Applying a document is all-or-nothing. The heavy lifting (pointer
//! resolution, array indices, `-` for append) is done by `json-patch`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  contact::Contact,
  error::{Error, Result},
};

/// Paths that are silently dropped from every patch document. Matched
/// exactly, so `/homeAddress/id` is not affected.
pub const PROTECTED_PATHS: [&str; 4] = ["/id", "/email", "/createdOn", "/updatedOn"];

/// Top-level contact fields a patch may touch.
pub const PATCHABLE_FIELDS: [&str; 11] = [
  "prefix",
  "firstName",
  "lastName",
  "contactNumber",
  "alternativeContactNumber",
  "homeAddress",
  "companyName",
  "jobTitle",
  "notes",
  "dateOfBirth",
  "emergencyContacts",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
  Add { path: String, value: Value },
  Remove { path: String },
  Replace { path: String, value: Value },
}

impl PatchOperation {
  pub fn path(&self) -> &str {
    match self {
      Self::Add { path, .. } | Self::Remove { path } | Self::Replace { path, .. } => path,
    }
  }

  /// The top-level field this operation addresses: `homeAddress` for
  /// `/homeAddress/city`, `""` for the document root.
  pub fn field(&self) -> &str {
    self.path().trim_start_matches('/').split('/').next().unwrap_or_default()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchDocument(pub Vec<PatchOperation>);

impl PatchDocument {
  /// Drop every operation on a [`PROTECTED_PATHS`] entry.
  pub fn strip_protected(&mut self) {
    self.0.retain(|op| !PROTECTED_PATHS.contains(&op.path()));
  }

  /// Fail on the first operation that addresses something outside
  /// [`PATCHABLE_FIELDS`].
  pub fn check_paths(&self) -> Result<()> {
    match self.0.iter().find(|op| !PATCHABLE_FIELDS.contains(&op.field())) {
      Some(op) => Err(Error::ForbiddenPatchPath(op.path().to_owned())),
      None => Ok(()),
    }
  }

  /// Apply every operation, in order, to a copy of `contact`.
  ///
  /// The patched image must still read back as a [`Contact`]; a type
  /// mismatch or a stray key fails the whole document.
  pub fn apply_to(&self, contact: &Contact) -> Result<Contact> {
    self.check_paths()?;

    let mut image = serde_json::to_value(contact)?;
    let patch: json_patch::Patch = serde_json::from_value(serde_json::to_value(&self.0)?)
      .map_err(|e| Error::Patch(e.to_string()))?;
    json_patch::patch(&mut image, &patch).map_err(|e| Error::Patch(e.to_string()))?;

    serde_json::from_value(image).map_err(|e| Error::Patch(e.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use serde_json::json;

  use super::*;
  use crate::contact::{Address, EmergencyContact};

  fn doc(v: Value) -> PatchDocument { serde_json::from_value(v).unwrap() }

  fn sample() -> Contact {
    let mut c = Contact::new("Ann", "ann@x.com");
    c.id = 7;
    c.last_name = Some("Lee".into());
    c
  }

  #[test]
  fn parses_wire_format() {
    let d = doc(json!([
      { "op": "replace", "path": "/firstName", "value": "Bo" },
      { "op": "remove", "path": "/notes" },
      { "op": "add", "path": "/emergencyContacts/-", "value": {} }
    ]));
    assert_eq!(d.0.len(), 3);
    assert_eq!(d.0[1], PatchOperation::Remove { path: "/notes".into() });
  }

  #[test]
  fn unsupported_verbs_do_not_parse() {
    let r = serde_json::from_value::<PatchDocument>(json!([
      { "op": "move", "from": "/a", "path": "/b" }
    ]));
    assert!(r.is_err());
  }

  #[test]
  fn strip_protected_drops_exact_paths_only() {
    let mut d = doc(json!([
      { "op": "replace", "path": "/id", "value": 99 },
      { "op": "replace", "path": "/email", "value": "x@y.z" },
      { "op": "remove", "path": "/createdOn" },
      { "op": "replace", "path": "/updatedOn", "value": null },
      { "op": "replace", "path": "/homeAddress/id", "value": 3 },
      { "op": "replace", "path": "/jobTitle", "value": "CTO" }
    ]));
    d.strip_protected();
    let paths: Vec<_> = d.0.iter().map(|op| op.path()).collect();
    assert_eq!(paths, ["/homeAddress/id", "/jobTitle"]);
  }

  #[test]
  fn replace_first_name() {
    let d = doc(json!([{ "op": "replace", "path": "/firstName", "value": "Bo" }]));
    let patched = d.apply_to(&sample()).unwrap();
    assert_eq!(patched.first_name, "Bo");
    assert_eq!(patched.last_name.as_deref(), Some("Lee"));
    assert_eq!(patched.id, 7);
  }

  #[test]
  fn add_address_and_emergency_contact() {
    let d = doc(json!([
      { "op": "add", "path": "/homeAddress", "value": { "city": "Pune" } },
      { "op": "add", "path": "/emergencyContacts/-", "value": {
        "name": "Kim", "relationship": "Sister", "phoneNumber": "5551234567"
      } },
      { "op": "replace", "path": "/dateOfBirth", "value": "1990-04-02" }
    ]));
    let patched = d.apply_to(&sample()).unwrap();
    assert_eq!(
      patched.home_address,
      Some(Address { city: Some("Pune".into()), ..Default::default() })
    );
    assert_eq!(patched.emergency_contacts, vec![EmergencyContact {
      name: "Kim".into(),
      relationship: "Sister".into(),
      phone_number: "5551234567".into(),
      ..Default::default()
    }]);
    assert_eq!(patched.date_of_birth, NaiveDate::from_ymd_opt(1990, 4, 2));
  }

  #[test]
  fn unknown_top_level_field_is_rejected() {
    let d = doc(json!([{ "op": "add", "path": "/nickname", "value": "A" }]));
    assert!(matches!(
      d.apply_to(&sample()),
      Err(Error::ForbiddenPatchPath(p)) if p == "/nickname"
    ));
  }

  #[test]
  fn root_path_is_rejected() {
    let d = doc(json!([{ "op": "replace", "path": "", "value": {} }]));
    assert!(matches!(d.check_paths(), Err(Error::ForbiddenPatchPath(_))));
  }

  #[test]
  fn failing_operation_fails_the_document() {
    let d = doc(json!([
      { "op": "replace", "path": "/firstName", "value": "Bo" },
      { "op": "remove", "path": "/emergencyContacts/4" }
    ]));
    assert!(matches!(d.apply_to(&sample()), Err(Error::Patch(_))));
  }

  #[test]
  fn wrong_type_is_rejected() {
    let d = doc(json!([{ "op": "replace", "path": "/emergencyContacts", "value": "none" }]));
    assert!(matches!(d.apply_to(&sample()), Err(Error::Patch(_))));
  }

  #[test]
  fn unknown_nested_key_is_rejected() {
    let d = doc(json!([
      { "op": "add", "path": "/homeAddress", "value": { "planet": "Mars" } }
    ]));
    assert!(matches!(d.apply_to(&sample()), Err(Error::Patch(_))));
  }
}
