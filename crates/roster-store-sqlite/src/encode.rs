//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with microsecond precision and a
//! `Z` suffix, so they sort lexically. Dates are stored as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use roster_core::contact::{Address, Contact, ContactSummary, EmergencyContact, display_name};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `contacts` row plus its owned rows.
pub struct RawContact {
  pub id:                         i64,
  pub prefix:                     Option<String>,
  pub first_name:                 String,
  pub last_name:                  Option<String>,
  pub email:                      String,
  pub contact_number:             Option<String>,
  pub alternative_contact_number: Option<String>,
  pub company_name:               Option<String>,
  pub job_title:                  Option<String>,
  pub notes:                      Option<String>,
  pub date_of_birth:              Option<String>,
  pub created_on:                 String,
  pub updated_on:                 Option<String>,
  pub home_address:               Option<Address>,
  pub emergency_contacts:         Vec<EmergencyContact>,
}

impl RawContact {
  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      id:                         self.id,
      prefix:                     self.prefix,
      first_name:                 self.first_name,
      last_name:                  self.last_name,
      email:                      self.email,
      contact_number:             self.contact_number,
      alternative_contact_number: self.alternative_contact_number,
      home_address:               self.home_address,
      company_name:               self.company_name,
      job_title:                  self.job_title,
      notes:                      self.notes,
      date_of_birth:              self.date_of_birth.as_deref().map(decode_date).transpose()?,
      emergency_contacts:         self.emergency_contacts,
      created_on:                 decode_dt(&self.created_on)?,
      updated_on:                 self.updated_on.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw values for one search result row (contact joined with its address).
pub struct RawSummary {
  pub id:             i64,
  pub first_name:     String,
  pub last_name:      Option<String>,
  pub email:          String,
  pub contact_number: Option<String>,
  pub date_of_birth:  Option<String>,
  pub created_on:     String,
  pub company_name:   Option<String>,
  pub job_title:      Option<String>,
  pub address:        Option<Address>,
}

impl RawSummary {
  pub fn into_summary(self) -> Result<ContactSummary> {
    Ok(ContactSummary {
      id:             self.id,
      name:           display_name(&self.first_name, self.last_name.as_deref()),
      email:          self.email,
      contact_number: self.contact_number,
      date_of_birth:  self.date_of_birth.as_deref().map(decode_date).transpose()?,
      created_on:     decode_dt(&self.created_on)?,
      company_name:   self.company_name,
      job_title:      self.job_title,
      address:        self.address,
    })
  }
}
