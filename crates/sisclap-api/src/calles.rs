//! Handlers for `/calles` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;

use sisclap_core::{calle::Calle, store::PadronStore};

use crate::{error::ApiError, respuesta::Respuesta};

/// `GET /calles`
pub async fn listar<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Respuesta<Vec<Calle>>>, ApiError>
where
  S: PadronStore,
{
  let calles = store.listar_calles().await.map_err(ApiError::store)?;
  Ok(Json(Respuesta::ok(calles)))
}

#[derive(Debug, Deserialize)]
pub struct CrearBody {
  pub nom_calle: String,
}

/// `POST /calles` — body: `{"nom_calle":"Calle Bolívar"}`
pub async fn crear<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CrearBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PadronStore,
{
  let nombre = body.nom_calle.trim();
  if nombre.is_empty() {
    return Err(ApiError::SolicitudInvalida(
      "El nombre de la calle es obligatorio".to_owned(),
    ));
  }

  let calle = store
    .agregar_calle(nombre.to_owned())
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(Respuesta::ok_con_mensaje(calle, "Calle registrada"))))
}
