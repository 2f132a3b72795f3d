//! Service and router tests against an in-memory SQLite store, plus a store
//! that always fails.

use std::sync::Arc;

use axum::{
  body::{Body, to_bytes},
  http::{Request, StatusCode},
};
use chrono::{Duration, NaiveDate, Utc};
use roster_core::{
  contact::{Contact, EmergencyContact},
  patch::PatchDocument,
  query::{Pagination, SearchCriteria, SearchPage},
  store::ContactStore,
};
use roster_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{ContactService, Envelope, api_router, messages};

async fn service() -> ContactService<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  ContactService::new(Arc::new(store))
}

fn ann() -> Contact {
  let mut c = Contact::new("Ann", "ann@x.com");
  c.last_name = Some("Lee".into());
  c
}

fn first_error<T>(env: &Envelope<T>) -> (Option<&str>, &str) {
  let e = &env.errors.as_ref().expect("errors present")[0];
  (e.field.as_deref(), e.message.as_str())
}

fn patch_doc(v: Value) -> Option<PatchDocument> { Some(serde_json::from_value(v).unwrap()) }

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_id_and_created_on() {
  let svc = service().await;
  let mut input = ann();
  input.id = 99;
  input.updated_on = Some(Utc::now());

  let env = svc.create(Some(input)).await;
  assert!(env.success);
  assert_eq!(env.status_code, 200);
  let created = env.data.unwrap();
  assert!(created.id > 0);
  assert!(Utc::now() - created.created_on < Duration::seconds(5));
  assert!(created.updated_on.is_none());
}

#[tokio::test]
async fn create_without_body_is_rejected() {
  let env = service().await.create(None).await;
  assert_eq!(env.status_code, 400);
  assert_eq!(first_error(&env), (Some("Contact"), "Contact cannot be null"));
}

#[tokio::test]
async fn create_reports_each_invalid_field_once() {
  let mut c = Contact::new("", "not-an-email");
  c.contact_number = Some("12".into());
  c.emergency_contacts = vec![EmergencyContact::default(); 4];

  let env = service().await.create(Some(c)).await;
  assert_eq!(env.status_code, 400);
  let errors = env.errors.unwrap();
  let fields: Vec<_> = errors.iter().filter_map(|e| e.field.as_deref()).collect();
  assert!(fields.contains(&"firstName"));
  assert!(fields.contains(&"email"));
  assert!(fields.contains(&"contactNumber"));
  assert!(fields.contains(&"emergencyContacts"));
  assert_eq!(fields.iter().filter(|f| **f == "firstName").count(), 1);
}

// ─── Get ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_checks_id_then_existence() {
  let svc = service().await;
  let env = svc.get(0).await;
  assert_eq!(env.status_code, 400);
  assert_eq!(first_error(&env), (Some("ContactId"), "Id should be greater than zero"));

  let env = svc.get(12).await;
  assert_eq!(env.status_code, 404);
  assert_eq!(first_error(&env), (None, "Contact with Id 12 not found"));
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_rejects_id_mismatch() {
  let svc = service().await;
  let created = svc.create(Some(ann())).await.data.unwrap();

  let env = svc.update(created.id + 1, Some(created)).await;
  assert_eq!(env.status_code, 400);
  assert_eq!(
    first_error(&env),
    (Some("ContactId"), "Contact Id in path must match Id in the body")
  );
}

#[tokio::test]
async fn update_order_of_checks() {
  let svc = service().await;
  assert_eq!(first_error(&svc.update(1, None).await).0, Some("Contact"));

  let mut c = ann();
  c.id = -3;
  let env = svc.update(-3, Some(c)).await;
  assert_eq!(first_error(&env).1, "Id should be greater than zero");

  let mut c = ann();
  c.id = 50;
  let env = svc.update(50, Some(c)).await;
  assert_eq!(env.status_code, 404);
  assert_eq!(first_error(&env), (None, "Contact with Id 50 not found"));
}

#[tokio::test]
async fn update_stamps_updated_on_and_keeps_email() {
  let svc = service().await;
  let created = svc.create(Some(ann())).await.data.unwrap();

  let mut body = created.clone();
  body.job_title = Some("CTO".into());
  body.email = "changed@x.com".into();
  let env = svc.update(created.id, Some(body)).await;
  assert!(env.success);
  let updated = env.data.unwrap();
  assert_eq!(updated.job_title.as_deref(), Some("CTO"));
  assert_eq!(updated.email, "ann@x.com");
  assert_eq!(updated.created_on, created.created_on);
  assert!(updated.updated_on.is_some());
}

// ─── Patch ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn patch_ignores_protected_paths() {
  let svc = service().await;
  let created = svc.create(Some(ann())).await.data.unwrap();

  let env = svc
    .patch(
      created.id,
      patch_doc(json!([
        { "op": "replace", "path": "/email", "value": "evil@x.com" },
        { "op": "replace", "path": "/id", "value": 1234 },
        { "op": "replace", "path": "/createdOn", "value": "2000-01-01T00:00:00Z" },
        { "op": "replace", "path": "/updatedOn", "value": "2000-01-01T00:00:00Z" },
        { "op": "replace", "path": "/notes", "value": "hi" }
      ])),
    )
    .await;
  assert!(env.success, "{env:?}");
  let patched = env.data.unwrap();
  assert_eq!(patched.id, created.id);
  assert_eq!(patched.email, created.email);
  assert_eq!(patched.created_on, created.created_on);
  assert!(patched.updated_on.unwrap() > created.created_on);
  assert_eq!(patched.notes.as_deref(), Some("hi"));
}

#[tokio::test]
async fn patch_null_document_is_rejected() {
  let env = service().await.patch(1, None).await;
  assert_eq!(first_error(&env), (Some("Patch"), "Patch document cannot be null"));
}

#[tokio::test]
async fn patch_on_missing_contact_returns_get_envelope() {
  let svc = service().await;
  let env = svc
    .patch(77, patch_doc(json!([{ "op": "replace", "path": "/notes", "value": "x" }])))
    .await;
  assert_eq!(env.status_code, 404);
  assert_eq!(first_error(&env).1, "Contact with Id 77 not found");
}

#[tokio::test]
async fn patch_unknown_path_is_rejected_and_nothing_changes() {
  let svc = service().await;
  let created = svc.create(Some(ann())).await.data.unwrap();

  let env = svc
    .patch(
      created.id,
      patch_doc(json!([
        { "op": "replace", "path": "/jobTitle", "value": "CTO" },
        { "op": "add", "path": "/nickname", "value": "A" }
      ])),
    )
    .await;
  assert_eq!(env.status_code, 400);
  assert_eq!(first_error(&env).0, Some("Patch"));

  let stored = svc.get(created.id).await.data.unwrap();
  assert!(stored.job_title.is_none());
  assert!(stored.updated_on.is_none());
}

#[tokio::test]
async fn patch_result_is_validated() {
  let svc = service().await;
  let created = svc.create(Some(ann())).await.data.unwrap();
  let tomorrow = Utc::now().date_naive() + Duration::days(2);

  let env = svc
    .patch(
      created.id,
      patch_doc(json!([
        { "op": "replace", "path": "/dateOfBirth", "value": tomorrow.to_string() }
      ])),
    )
    .await;
  assert_eq!(env.status_code, 400);
  assert_eq!(
    first_error(&env),
    (Some("dateOfBirth"), "Date of birth cannot be in the future")
  );
}

#[tokio::test]
async fn patch_sets_date_of_birth() {
  let svc = service().await;
  let created = svc.create(Some(ann())).await.data.unwrap();
  let env = svc
    .patch(
      created.id,
      patch_doc(json!([{ "op": "add", "path": "/dateOfBirth", "value": "1990-04-02" }])),
    )
    .await;
  assert_eq!(env.data.unwrap().date_of_birth, NaiveDate::from_ymd_opt(1990, 4, 2));
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_missing_is_404_every_time() {
  let svc = service().await;
  for _ in 0..2 {
    let env = svc.delete(404).await;
    assert_eq!(env.status_code, 404);
    assert_eq!(first_error(&env), (None, "Contact with Id 404 not found"));
  }
}

#[tokio::test]
async fn delete_then_get_is_404() {
  let svc = service().await;
  let created = svc.create(Some(ann())).await.data.unwrap();
  let env = svc.delete(created.id).await;
  assert_eq!(env.data, Some(true));
  assert_eq!(svc.get(created.id).await.status_code, 404);
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_without_criteria_uses_defaults() {
  let svc = service().await;
  for i in 0..12 {
    svc.create(Some(Contact::new(format!("P{i:02}"), format!("p{i}@x.com")))).await;
  }
  let page = svc.search(None).await.data.unwrap();
  assert_eq!(page.items.len(), 10);
  assert_eq!(page.pagination_info.total_records, 12);
  assert_eq!(page.pagination_info.total_pages, 2);
  assert_eq!(page.pagination_info.current_page, 1);
}

#[tokio::test]
async fn search_ann_and_anna() {
  let svc = service().await;
  svc.create(Some(Contact::new("Anna", "anna@x.com"))).await;
  svc.create(Some(Contact::new("Ann", "ann@x.com"))).await;

  let criteria = SearchCriteria {
    name: Some("an".into()),
    pagination_info: Some(Pagination { current_page: 1, page_size: 1 }),
    ..Default::default()
  };
  let page = svc.search(Some(criteria)).await.data.unwrap();
  assert_eq!(page.items.len(), 1);
  assert_eq!(page.items[0].name, "Ann");
  assert_eq!(page.pagination_info.total_records, 2);
  assert_eq!(page.pagination_info.total_pages, 2);
}

// ─── Store failures ──────────────────────────────────────────────────────────

/// Every call fails as if the database had gone away.
struct BrokenStore;

fn gone() -> std::io::Error { std::io::Error::other("database is gone") }

impl ContactStore for BrokenStore {
  type Error = std::io::Error;

  async fn search(&self, _criteria: &SearchCriteria) -> Result<SearchPage, Self::Error> {
    Err(gone())
  }

  async fn get(&self, _id: i64) -> Result<Option<Contact>, Self::Error> { Err(gone()) }

  async fn exists(&self, _id: i64) -> Result<bool, Self::Error> { Err(gone()) }

  async fn count(&self) -> Result<u64, Self::Error> { Err(gone()) }

  async fn insert(&self, _contact: Contact) -> Result<Contact, Self::Error> { Err(gone()) }

  async fn update(&self, _contact: Contact) -> Result<Option<Contact>, Self::Error> {
    Err(gone())
  }

  async fn remove(&self, _id: i64) -> Result<bool, Self::Error> { Err(gone()) }
}

#[tokio::test]
async fn store_failures_become_generic_500s() {
  let svc = ContactService::new(Arc::new(BrokenStore));

  let env = svc.search(None).await;
  assert_eq!(env.status_code, 500);
  assert_eq!(first_error(&env), (None, messages::SEARCH_FAILED));

  let env = svc.get(3).await;
  assert_eq!(first_error(&env).1, "An error occurred while retrieving contact with Id: 3");

  let env = svc.create(Some(ann())).await;
  assert_eq!(first_error(&env).1, "An error occurred while creating contact.");

  let mut c = ann();
  c.id = 3;
  let env = svc.update(3, Some(c)).await;
  assert_eq!(env.status_code, 500);
  assert_eq!(
    first_error(&env).1,
    "An unexpected error occurred while updating the contact with ID: 3"
  );

  let env = svc.delete(3).await;
  assert_eq!(
    first_error(&env).1,
    "An unexpected error occurred while deleting the contact with ID: 3"
  );
}

// ─── Router ──────────────────────────────────────────────────────────────────

async fn call(
  app: axum::Router,
  method: &str,
  uri: &str,
  body: Option<&str>,
) -> (StatusCode, Value) {
  let request = Request::builder()
    .method(method)
    .uri(uri)
    .header("content-type", "application/json")
    .body(body.map(|b| Body::from(b.to_owned())).unwrap_or_else(Body::empty))
    .unwrap();
  let response = app.oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
  let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
  (status, json)
}

async fn router() -> axum::Router {
  api_router(Arc::new(SqliteStore::open_in_memory().await.unwrap()))
}

#[tokio::test]
async fn http_status_matches_envelope() {
  let app = router().await;
  let (status, body) = call(app, "GET", "/contact/5", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["statusCode"], 404);
  assert_eq!(body["success"], false);
  assert!(body.get("data").is_none());
  assert_eq!(body["errors"][0]["message"], "Contact with Id 5 not found");
  assert!(body["errors"][0].get("field").is_none());
}

#[tokio::test]
async fn http_omits_absent_optionals() {
  let app = router().await;
  let payload = serde_json::to_string(&ann()).unwrap();
  let (status, body) = call(app.clone(), "POST", "/contact", Some(&payload)).await;
  assert_eq!(status, StatusCode::OK);
  let created = &body["data"];
  assert!(created.get("updatedOn").is_none());
  assert!(created.get("homeAddress").is_none());
  assert!(body.get("errors").is_none());

  let id = created["id"].as_i64().unwrap();
  let (_, body) = call(app, "GET", &format!("/contact/{id}"), None).await;
  assert!(body["data"].get("updatedOn").is_none());
  assert_eq!(body["data"]["firstName"], created["firstName"]);
}

#[tokio::test]
async fn http_malformed_body_gets_envelope() {
  let app = router().await;
  let (status, body) = call(app.clone(), "POST", "/contact", Some("{ firstName")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["errors"][0]["field"], "Contact");

  let (status, body) = call(app.clone(), "POST", "/contact", Some("null")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["errors"][0]["message"], "Contact cannot be null");

  let (status, body) =
    call(app, "PATCH", "/contact/1", Some(r#"[{"op":"teleport","path":"/notes"}]"#)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["errors"][0]["field"], "Patch");
}

#[tokio::test]
async fn http_non_numeric_id() {
  let (status, body) = call(router().await, "DELETE", "/contact/abc", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["errors"][0]["field"], "ContactId");
}

#[tokio::test]
async fn http_search_without_body() {
  let (status, body) = call(router().await, "POST", "/contact/search", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["items"], json!([]));
  assert_eq!(body["data"]["paginationInfo"]["pageSize"], 10);
  assert_eq!(body["data"]["sortInfo"], json!({ "sortBy": "Name", "sortDirection": 0 }));
}

#[tokio::test]
async fn no_content_has_empty_body() {
  use axum::response::IntoResponse as _;
  let env: Envelope<bool> = Envelope::success_with(StatusCode::NO_CONTENT, true);
  let response = env.into_response();
  assert_eq!(response.status(), StatusCode::NO_CONTENT);
  let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
  assert!(bytes.is_empty());
}
