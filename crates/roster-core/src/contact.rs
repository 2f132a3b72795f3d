//! Contact types: the root entity of the Roster store and the rows it owns.
//!
//! A contact owns at most one [`Address`] and up to
//! [`MAX_EMERGENCY_CONTACTS`](crate::validate::MAX_EMERGENCY_CONTACTS)
//! [`EmergencyContact`]s. Owned rows live and die with their contact.
//!
//! The wire format is camelCase JSON. Unknown keys are rejected so that a
//! patch cannot smuggle fields in that the store would silently drop.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ─── Contact ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Contact {
  /// Store-assigned; `0` until the contact has been inserted.
  #[serde(default)]
  pub id:                         i64,
  #[serde(default)]
  pub prefix:                     Option<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub first_name:                 String,
  #[serde(default)]
  pub last_name:                  Option<String>,
  /// Fixed at creation; neither the update nor the patch path changes it.
  #[serde(default, deserialize_with = "null_as_default")]
  pub email:                      String,
  #[serde(default)]
  pub contact_number:             Option<String>,
  #[serde(default)]
  pub alternative_contact_number: Option<String>,
  #[serde(default)]
  pub home_address:               Option<Address>,
  #[serde(default)]
  pub company_name:               Option<String>,
  #[serde(default)]
  pub job_title:                  Option<String>,
  #[serde(default)]
  pub notes:                      Option<String>,
  #[serde(default, deserialize_with = "lenient_date")]
  pub date_of_birth:              Option<NaiveDate>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub emergency_contacts:         Vec<EmergencyContact>,
  /// Server clock at insert time.
  #[serde(default)]
  pub created_on:                 DateTime<Utc>,
  /// `None` until the first successful update.
  #[serde(default)]
  pub updated_on:                 Option<DateTime<Utc>>,
}

impl Contact {
  /// A contact with only the required fields set.
  pub fn new(first_name: impl Into<String>, email: impl Into<String>) -> Self {
    Self {
      id: 0,
      prefix: None,
      first_name: first_name.into(),
      last_name: None,
      email: email.into(),
      contact_number: None,
      alternative_contact_number: None,
      home_address: None,
      company_name: None,
      job_title: None,
      notes: None,
      date_of_birth: None,
      emergency_contacts: Vec::new(),
      created_on: DateTime::<Utc>::default(),
      updated_on: None,
    }
  }

  /// `firstName`, followed by a space and `lastName` when the latter is not
  /// blank.
  pub fn display_name(&self) -> String {
    display_name(&self.first_name, self.last_name.as_deref())
  }
}

/// Compose the display name shown in list views.
pub fn display_name(first_name: &str, last_name: Option<&str>) -> String {
  match last_name {
    Some(last) if !last.trim().is_empty() => format!("{first_name} {last}"),
    _ => first_name.to_owned(),
  }
}

// ─── Owned rows ──────────────────────────────────────────────────────────────

/// A contact's home address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Address {
  #[serde(default)]
  pub id:         i64,
  /// Owning contact; assigned by the store.
  #[serde(default)]
  pub contact_id: i64,
  #[serde(default)]
  pub address1:   Option<String>,
  #[serde(default)]
  pub address2:   Option<String>,
  #[serde(default)]
  pub city:       Option<String>,
  #[serde(default)]
  pub state:      Option<String>,
  #[serde(default)]
  pub zip_code:   Option<String>,
  #[serde(default)]
  pub country:    Option<String>,
}

/// Someone to call on the contact's behalf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmergencyContact {
  #[serde(default)]
  pub id:           i64,
  #[serde(default)]
  pub contact_id:   i64,
  #[serde(default, deserialize_with = "null_as_default")]
  pub name:         String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub relationship: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub phone_number: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub email:        String,
}

// ─── Summary ─────────────────────────────────────────────────────────────────

/// The row shape returned by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummary {
  pub id:             i64,
  /// See [`display_name`].
  pub name:           String,
  pub email:          String,
  pub contact_number: Option<String>,
  pub date_of_birth:  Option<NaiveDate>,
  pub created_on:     DateTime<Utc>,
  pub company_name:   Option<String>,
  pub job_title:      Option<String>,
  pub address:        Option<Address>,
}

impl From<&Contact> for ContactSummary {
  fn from(c: &Contact) -> Self {
    Self {
      id:             c.id,
      name:           c.display_name(),
      email:          c.email.clone(),
      contact_number: c.contact_number.clone(),
      date_of_birth:  c.date_of_birth,
      created_on:     c.created_on,
      company_name:   c.company_name.clone(),
      job_title:      c.job_title.clone(),
      address:        c.home_address.clone(),
    }
  }
}

// ─── Serde helpers ───────────────────────────────────────────────────────────

/// Treat an explicit JSON `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de> + Default,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept `YYYY-MM-DD`, a full timestamp whose date part is that, or a blank
/// string (read as "no date").
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw: Option<String> = Option::deserialize(deserializer)?;
  let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
    return Ok(None);
  };
  let date_part = raw.trim().split('T').next().unwrap_or_default();
  NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
    .map(Some)
    .map_err(serde::de::Error::custom)
}
