//! Field validation for [`Contact`] and the rows it owns.
//!
//! Every failing field contributes exactly one message (the first rule it
//! breaks), tagged with its camelCase wire path, e.g. `homeAddress.city` or
//! `emergencyContacts[1].phoneNumber`. Fields are checked in declaration
//! order so the error list is stable.

use std::{fmt, sync::LazyLock};

use chrono::{NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::contact::{Address, Contact, EmergencyContact};

/// Upper bound on [`Contact::emergency_contacts`].
pub const MAX_EMERGENCY_CONTACTS: usize = 3;

/// Optional `+`, then 10–15 digits, spaces, parentheses or dashes.
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\+?[0-9\s()\-]{10,15}$").expect("phone pattern compiles")
});

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A single field-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
  pub field:   String,
  pub message: String,
}

/// An ordered list of [`FieldError`]s, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
  /// Record `message` for `field` unless that field already failed.
  pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
    let field = field.into();
    if self.0.iter().any(|e| e.field == field) {
      return;
    }
    self.0.push(FieldError { field, message: message.into() });
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn iter(&self) -> impl Iterator<Item = &FieldError> { self.0.iter() }

  /// The message recorded for `field`, if any.
  pub fn get(&self, field: &str) -> Option<&str> {
    self
      .0
      .iter()
      .find(|e| e.field == field)
      .map(|e| e.message.as_str())
  }

  pub fn into_vec(self) -> Vec<FieldError> { self.0 }

  fn into_result(self) -> Result<(), Self> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let parts: Vec<String> =
      self.0.iter().map(|e| format!("{}: {}", e.field, e.message)).collect();
    f.write_str(&parts.join("; "))
  }
}

impl std::error::Error for ValidationErrors {}

// ─── Primitive checks ────────────────────────────────────────────────────────

/// A pragmatic address check: one `@`, a non-empty local part, and a dotted
/// domain with no empty labels. No whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
  if email.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.contains('@')
    && domain.contains('.')
    && domain.split('.').all(|label| !label.is_empty())
}

pub fn is_valid_phone(phone: &str) -> bool {
  PHONE_PATTERN.is_match(phone.trim())
}

fn is_blank(value: Option<&str>) -> bool {
  value.is_none_or(|v| v.trim().is_empty())
}

// ─── Rule runner ─────────────────────────────────────────────────────────────

struct Rules<'a> {
  errors: &'a mut ValidationErrors,
  prefix: String,
}

impl<'a> Rules<'a> {
  fn new(errors: &'a mut ValidationErrors, prefix: impl Into<String>) -> Self {
    Self { errors, prefix: prefix.into() }
  }

  fn path(&self, field: &str) -> String {
    if self.prefix.is_empty() {
      field.to_owned()
    } else {
      format!("{}.{field}", self.prefix)
    }
  }

  fn required(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
    if value.trim().is_empty() {
      let path = self.path(field);
      self.errors.add(path, message);
    }
    self
  }

  fn max_len(
    &mut self,
    field: &str,
    value: Option<&str>,
    max: usize,
    message: &str,
  ) -> &mut Self {
    if value.is_some_and(|v| v.chars().count() > max) {
      let path = self.path(field);
      self.errors.add(path, message);
    }
    self
  }

  fn email(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
    if !value.trim().is_empty() && !is_valid_email(value) {
      let path = self.path(field);
      self.errors.add(path, message);
    }
    self
  }

  fn phone(&mut self, field: &str, value: Option<&str>, message: &str) -> &mut Self {
    if let Some(v) = value
      && !is_blank(Some(v))
      && !is_valid_phone(v)
    {
      let path = self.path(field);
      self.errors.add(path, message);
    }
    self
  }
}

// ─── Entity rules ────────────────────────────────────────────────────────────

impl Contact {
  /// Validate against today's date (UTC).
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    self.validate_as_of(Utc::now().date_naive())
  }

  /// Validate, treating `today` as the latest acceptable birth date.
  pub fn validate_as_of(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    Rules::new(&mut errors, "")
      .max_len("prefix", self.prefix.as_deref(), 5, "Prefix cannot be longer than 5 characters")
      .required("firstName", &self.first_name, "First name is required")
      .max_len(
        "firstName",
        Some(&self.first_name),
        50,
        "First name cannot be longer than 50 characters",
      )
      .max_len(
        "lastName",
        self.last_name.as_deref(),
        50,
        "Last name cannot be longer than 50 characters",
      )
      .required("email", &self.email, "Email is required")
      .email("email", &self.email, "Invalid email address format")
      .phone("contactNumber", self.contact_number.as_deref(), "Invalid phone number format")
      .phone(
        "alternativeContactNumber",
        self.alternative_contact_number.as_deref(),
        "Invalid phone number format",
      );

    if let Some(address) = &self.home_address {
      address.check(&mut errors, "homeAddress");
    }

    Rules::new(&mut errors, "")
      .max_len(
        "companyName",
        self.company_name.as_deref(),
        50,
        "Company name cannot be longer than 50 characters",
      )
      .max_len(
        "jobTitle",
        self.job_title.as_deref(),
        50,
        "Job title cannot be longer than 50 characters",
      )
      .max_len("notes", self.notes.as_deref(), 500, "Notes cannot be longer than 500 characters");

    if self.date_of_birth.is_some_and(|dob| dob > today) {
      errors.add("dateOfBirth", "Date of birth cannot be in the future");
    }

    if self.emergency_contacts.len() > MAX_EMERGENCY_CONTACTS {
      errors.add("emergencyContacts", "Maximum 3 Emergency Contacts allowed");
    }
    for (i, ec) in self.emergency_contacts.iter().enumerate() {
      ec.check(&mut errors, &format!("emergencyContacts[{i}]"));
    }

    errors.into_result()
  }
}

impl Address {
  fn check(&self, errors: &mut ValidationErrors, prefix: &str) {
    Rules::new(errors, prefix)
      .max_len(
        "address1",
        self.address1.as_deref(),
        100,
        "Address line 1 cannot be longer than 100 characters",
      )
      .max_len(
        "address2",
        self.address2.as_deref(),
        100,
        "Address line 2 cannot be longer than 100 characters",
      )
      .max_len("city", self.city.as_deref(), 30, "City cannot be longer than 30 characters")
      .max_len("state", self.state.as_deref(), 30, "State cannot be longer than 30 characters")
      .max_len("zipCode", self.zip_code.as_deref(), 10, "Zip code cannot be longer than 10 characters")
      .max_len("country", self.country.as_deref(), 30, "Country cannot be longer than 30 characters");
  }
}

impl EmergencyContact {
  fn check(&self, errors: &mut ValidationErrors, prefix: &str) {
    Rules::new(errors, prefix)
      .required("name", &self.name, "Emergency Contact Name is required")
      .max_len("name", Some(&self.name), 100, "Name cannot be longer than 100 characters")
      .required("relationship", &self.relationship, "Emergency Contact Relationship is required")
      .max_len(
        "relationship",
        Some(&self.relationship),
        50,
        "Relationship cannot be longer than 50 characters",
      )
      .required("phoneNumber", &self.phone_number, "Emergency Contact Phone Number is required")
      .phone("phoneNumber", Some(&self.phone_number), "Invalid phone number format")
      .required("email", &self.email, "Emergency Contact Email is required")
      .email("email", &self.email, "Invalid email address format");
  }
}
