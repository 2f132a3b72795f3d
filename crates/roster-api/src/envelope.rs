//! The uniform response wrapper returned by every contact operation.
//!
//! ```json
//! { "success": false, "errors": [{ "field": "ContactId", "message": "..." }], "statusCode": 400 }
//! ```
//!
//! The HTTP status of the response is the envelope's `statusCode`. Members
//! whose value is `null` are left out of the body.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use roster_core::validate::{FieldError, ValidationErrors};
use serde::{Deserialize, Serialize};

/// One entry of [`Envelope::errors`]. Internal failures carry no field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub field:   Option<String>,
  pub message: String,
}

impl From<FieldError> for ErrorDetail {
  fn from(e: FieldError) -> Self {
    Self { field: Some(e.field), message: e.message }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
  pub success:     bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data:        Option<T>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub errors:      Option<Vec<ErrorDetail>>,
  pub status_code: u16,
}

impl<T> Envelope<T> {
  /// `200` with `data`.
  pub fn ok(data: T) -> Self { Self::success_with(StatusCode::OK, data) }

  pub fn success_with(status: StatusCode, data: T) -> Self {
    Self {
      success:     true,
      data:        Some(data),
      errors:      None,
      status_code: status.as_u16(),
    }
  }

  pub fn failure(status: StatusCode, errors: Vec<ErrorDetail>) -> Self {
    Self {
      success: false,
      data: None,
      errors: Some(errors),
      status_code: status.as_u16(),
    }
  }

  fn single(status: StatusCode, field: Option<&str>, message: impl Into<String>) -> Self {
    Self::failure(status, vec![ErrorDetail {
      field:   field.map(str::to_owned),
      message: message.into(),
    }])
  }

  pub fn bad_request(field: &str, message: impl Into<String>) -> Self {
    Self::single(StatusCode::BAD_REQUEST, Some(field), message)
  }

  /// `404`. Not-found errors are not tied to a field.
  pub fn not_found(message: impl Into<String>) -> Self {
    Self::single(StatusCode::NOT_FOUND, None, message)
  }

  /// `500` with a message that is safe to show a caller.
  pub fn internal(message: impl Into<String>) -> Self {
    Self::single(StatusCode::INTERNAL_SERVER_ERROR, None, message)
  }

  /// `400` with one entry per failing field.
  pub fn invalid(errors: ValidationErrors) -> Self {
    Self::failure(
      StatusCode::BAD_REQUEST,
      errors.into_vec().into_iter().map(ErrorDetail::from).collect(),
    )
  }

  pub fn status(&self) -> StatusCode {
    StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
  }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
  fn into_response(self) -> Response {
    let status = self.status();
    if status == StatusCode::NO_CONTENT {
      return status.into_response();
    }
    match serde_json::to_value(&self) {
      Ok(mut body) => {
        strip_nulls(&mut body);
        (status, Json(body)).into_response()
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to serialize response envelope");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
      }
    }
  }
}

/// Drop `null` members from every object in `value`. Absent optionals are
/// omitted from responses rather than sent as `null`.
fn strip_nulls(value: &mut serde_json::Value) {
  match value {
    serde_json::Value::Object(map) => {
      map.retain(|_, v| !v.is_null());
      map.values_mut().for_each(strip_nulls);
    }
    serde_json::Value::Array(items) => items.iter_mut().for_each(strip_nulls),
    _ => {}
  }
}
