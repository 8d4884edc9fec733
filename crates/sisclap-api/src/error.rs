//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

use sisclap_core::validacion::ErroresValidacion;

use crate::respuesta::Respuesta;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("no encontrado: {0}")]
  NoEncontrado(String),

  #[error("conflicto: {0}")]
  Conflicto(String),

  #[error("solicitud inválida: {0}")]
  SolicitudInvalida(String),

  /// All-or-nothing rejection of a form payload; carries the complete
  /// field-keyed map.
  #[error("datos inválidos")]
  Validacion(ErroresValidacion),

  #[error("error del registro: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NoEncontrado(m) => {
        (StatusCode::NOT_FOUND, Json(Respuesta::<()>::fallo(m))).into_response()
      }
      ApiError::Conflicto(m) => {
        (StatusCode::CONFLICT, Json(Respuesta::<()>::fallo(m))).into_response()
      }
      ApiError::SolicitudInvalida(m) => {
        (StatusCode::BAD_REQUEST, Json(Respuesta::<()>::fallo(m))).into_response()
      }
      ApiError::Validacion(errores) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(Respuesta::fallo_con_datos(errores, "Datos inválidos")),
      )
        .into_response(),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "fallo del registro");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(Respuesta::<()>::fallo("Error de conexión con el registro")),
        )
          .into_response()
      }
    }
  }
}
