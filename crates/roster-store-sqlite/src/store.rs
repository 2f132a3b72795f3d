//! [`SqliteStore`], the SQLite implementation of [`ContactStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;

use roster_core::{
  contact::{Address, Contact, EmergencyContact},
  query::{SearchCriteria, SearchPage},
  store::ContactStore,
};

use crate::{
  encode::{RawContact, RawSummary, encode_date, encode_dt},
  schema::SCHEMA,
  search::{FROM, Filter, order_by},
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster contact store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Import a JSON array of contacts if the store is empty.
  ///
  /// Each contact keeps its `id` (when non-zero) and `createdOn` (now when
  /// absent). Returns the number of contacts imported; `0` if the store
  /// already held data.
  pub async fn seed_from_json(&self, path: impl AsRef<Path>) -> Result<usize> {
    if self.count().await? > 0 {
      tracing::info!("store is not empty; skipping seed");
      return Ok(0);
    }

    let text = tokio::fs::read_to_string(path.as_ref()).await?;
    let contacts: Vec<Contact> = serde_json::from_str(&text)?;
    let now = Utc::now();
    let total = contacts.len();

    for mut contact in contacts {
      if contact.created_on == DateTime::<Utc>::default() {
        contact.created_on = now;
      }
      self.insert(contact).await?;
    }

    tracing::info!(count = total, path = %path.as_ref().display(), "seeded contacts");
    Ok(total)
  }
}

// ─── Row access ──────────────────────────────────────────────────────────────
//
// Synchronous helpers run on the connection thread, inside `call`.

const CONTACT_COLUMNS: &str = "id, prefix, first_name, last_name, email, contact_number,
  alternative_contact_number, company_name, job_title, notes, date_of_birth,
  created_on, updated_on";

const ADDRESS_COLUMNS: &str = "id, contact_id, address1, address2, city, state, zip_code, country";

fn address_from_row(row: &rusqlite::Row<'_>, at: usize) -> rusqlite::Result<Address> {
  Ok(Address {
    id:         row.get(at)?,
    contact_id: row.get(at + 1)?,
    address1:   row.get(at + 2)?,
    address2:   row.get(at + 3)?,
    city:       row.get(at + 4)?,
    state:      row.get(at + 5)?,
    zip_code:   row.get(at + 6)?,
    country:    row.get(at + 7)?,
  })
}

fn read_contact(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawContact>> {
  let raw = conn
    .query_row(
      &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"),
      rusqlite::params![id],
      |row| {
        Ok(RawContact {
          id:                         row.get(0)?,
          prefix:                     row.get(1)?,
          first_name:                 row.get(2)?,
          last_name:                  row.get(3)?,
          email:                      row.get(4)?,
          contact_number:             row.get(5)?,
          alternative_contact_number: row.get(6)?,
          company_name:               row.get(7)?,
          job_title:                  row.get(8)?,
          notes:                      row.get(9)?,
          date_of_birth:              row.get(10)?,
          created_on:                 row.get(11)?,
          updated_on:                 row.get(12)?,
          home_address:               None,
          emergency_contacts:         Vec::new(),
        })
      },
    )
    .optional()?;

  let Some(mut raw) = raw else {
    return Ok(None);
  };

  raw.home_address = conn
    .query_row(
      &format!("SELECT {ADDRESS_COLUMNS} FROM addresses WHERE contact_id = ?1"),
      rusqlite::params![id],
      |row| address_from_row(row, 0),
    )
    .optional()?;

  let mut stmt = conn.prepare(
    "SELECT id, contact_id, name, relationship, phone_number, email
     FROM emergency_contacts WHERE contact_id = ?1 ORDER BY id",
  )?;
  raw.emergency_contacts = stmt
    .query_map(rusqlite::params![id], |row| {
      Ok(EmergencyContact {
        id:           row.get(0)?,
        contact_id:   row.get(1)?,
        name:         row.get(2)?,
        relationship: row.get(3)?,
        phone_number: row.get(4)?,
        email:        row.get(5)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(Some(raw))
}

/// Insert the address and emergency contacts of `contact` under `contact_id`.
/// Incoming nested ids are ignored.
fn insert_owned_rows(
  conn: &rusqlite::Connection,
  contact_id: i64,
  contact: &Contact,
) -> rusqlite::Result<()> {
  if let Some(a) = &contact.home_address {
    conn.execute(
      "INSERT INTO addresses (contact_id, address1, address2, city, state, zip_code, country)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
      rusqlite::params![contact_id, a.address1, a.address2, a.city, a.state, a.zip_code, a.country],
    )?;
  }

  for ec in &contact.emergency_contacts {
    conn.execute(
      "INSERT INTO emergency_contacts (contact_id, name, relationship, phone_number, email)
       VALUES (?1, ?2, ?3, ?4, ?5)",
      rusqlite::params![contact_id, ec.name, ec.relationship, ec.phone_number, ec.email],
    )?;
  }
  Ok(())
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = crate::Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn search(&self, criteria: &SearchCriteria) -> Result<SearchPage> {
    let filter = Filter::from_criteria(criteria);
    let order = order_by(criteria.sort());
    let pagination = criteria.pagination();
    let (take, skip) = (pagination.take(), pagination.skip());

    tracing::debug!(?criteria, "searching contacts");

    let (total, raws): (i64, Vec<RawSummary>) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let where_clause = &filter.clause;

        let total: i64 = tx.query_row(
          &format!("SELECT COUNT(*) {FROM} {where_clause}"),
          rusqlite::params_from_iter(filter.params.iter()),
          |r| r.get(0),
        )?;

        let sql = format!(
          "SELECT c.id, c.first_name, c.last_name, c.email, c.contact_number,
                  c.date_of_birth, c.created_on, c.company_name, c.job_title,
                  a.id, a.contact_id, a.address1, a.address2, a.city, a.state,
                  a.zip_code, a.country
           {FROM}
           {where_clause}
           ORDER BY {order}
           LIMIT {take} OFFSET {skip}"
        );

        let rows = {
          let mut stmt = tx.prepare(&sql)?;
          stmt
            .query_map(rusqlite::params_from_iter(filter.params.iter()), |row| {
              let address_id: Option<i64> = row.get(9)?;
              Ok(RawSummary {
                id:             row.get(0)?,
                first_name:     row.get(1)?,
                last_name:      row.get(2)?,
                email:          row.get(3)?,
                contact_number: row.get(4)?,
                date_of_birth:  row.get(5)?,
                created_on:     row.get(6)?,
                company_name:   row.get(7)?,
                job_title:      row.get(8)?,
                address:        match address_id {
                  Some(_) => Some(address_from_row(row, 9)?),
                  None => None,
                },
              })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        tx.commit()?;
        Ok((total, rows))
      })
      .await?;

    let items = raws.into_iter().map(RawSummary::into_summary).collect::<Result<_>>()?;
    Ok(SearchPage { items, total_records: total.max(0) as u64 })
  }

  async fn get(&self, id: i64) -> Result<Option<Contact>> {
    let raw = self.conn.call(move |conn| Ok(read_contact(conn, id)?)).await?;
    raw.map(RawContact::into_contact).transpose()
  }

  async fn exists(&self, id: i64) -> Result<bool> {
    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row("SELECT 1 FROM contacts WHERE id = ?1", rusqlite::params![id], |_| {
              Ok(true)
            })
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(found)
  }

  async fn count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM contacts", [], |r| r.get(0))?))
      .await?;
    Ok(n.max(0) as u64)
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn insert(&self, contact: Contact) -> Result<Contact> {
    let id = (contact.id > 0).then_some(contact.id);
    let dob = contact.date_of_birth.map(encode_date);
    let created_on = encode_dt(contact.created_on);
    let updated_on = contact.updated_on.map(encode_dt);

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO contacts (
             id, prefix, first_name, last_name, email, contact_number,
             alternative_contact_number, company_name, job_title, notes,
             date_of_birth, created_on, updated_on
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          rusqlite::params![
            id,
            contact.prefix,
            contact.first_name,
            contact.last_name,
            contact.email,
            contact.contact_number,
            contact.alternative_contact_number,
            contact.company_name,
            contact.job_title,
            contact.notes,
            dob,
            created_on,
            updated_on,
          ],
        )?;
        let contact_id = tx.last_insert_rowid();
        insert_owned_rows(&tx, contact_id, &contact)?;

        let raw =
          read_contact(&tx, contact_id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_contact()
  }

  async fn update(&self, contact: Contact) -> Result<Option<Contact>> {
    let id = contact.id;
    let dob = contact.date_of_birth.map(encode_date);
    let updated_on = contact.updated_on.map(encode_dt);

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE contacts SET
             prefix = ?2, first_name = ?3, last_name = ?4, contact_number = ?5,
             alternative_contact_number = ?6, company_name = ?7, job_title = ?8,
             notes = ?9, date_of_birth = ?10, updated_on = ?11
           WHERE id = ?1",
          rusqlite::params![
            id,
            contact.prefix,
            contact.first_name,
            contact.last_name,
            contact.contact_number,
            contact.alternative_contact_number,
            contact.company_name,
            contact.job_title,
            contact.notes,
            dob,
            updated_on,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }

        tx.execute("DELETE FROM addresses WHERE contact_id = ?1", rusqlite::params![id])?;
        tx.execute(
          "DELETE FROM emergency_contacts WHERE contact_id = ?1",
          rusqlite::params![id],
        )?;
        insert_owned_rows(&tx, id, &contact)?;

        let raw = read_contact(&tx, id)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn remove(&self, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM contacts WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(deleted > 0)
  }
}
