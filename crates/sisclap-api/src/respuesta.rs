//! The `{ success, data, error, message }` envelope every endpoint returns.
//!
//! Clients branch on `success` and read `data` or `error`; `message` carries
//! an optional human-readable confirmation. Absent fields are omitted, not
//! null.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Respuesta<T> {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

impl<T> Respuesta<T> {
  pub fn ok(data: T) -> Self {
    Self { success: true, data: Some(data), error: None, message: None }
  }

  pub fn ok_con_mensaje(data: T, message: impl Into<String>) -> Self {
    Self {
      success: true,
      data:    Some(data),
      error:   None,
      message: Some(message.into()),
    }
  }

  /// A successful operation with nothing to return (e.g. a delete).
  pub fn mensaje(message: impl Into<String>) -> Self {
    Self { success: true, data: None, error: None, message: Some(message.into()) }
  }

  pub fn fallo(error: impl Into<String>) -> Self {
    Self { success: false, data: None, error: Some(error.into()), message: None }
  }

  /// A failure that still carries a payload — the field-keyed validation
  /// map, so clients can render errors inline.
  pub fn fallo_con_datos(data: T, error: impl Into<String>) -> Self {
    Self {
      success: false,
      data:    Some(data),
      error:   Some(error.into()),
      message: None,
    }
  }
}
