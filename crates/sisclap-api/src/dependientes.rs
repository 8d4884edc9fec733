//! Handlers for `/dependientes` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/dependientes` | Optional `?cedula_beneficiario=` |
//! | `POST`   | `/dependientes` | Body: [`NuevoDependiente`]; owner must exist |
//! | `GET`    | `/dependientes/:cedula` | Ficha with the owner's derived address |
//! | `PUT`    | `/dependientes/:cedula` | Partial update |
//! | `DELETE` | `/dependientes/:cedula` | Physical delete |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;

use sisclap_core::{
  dependiente::{
    ActualizacionDependiente, Dependiente, FichaDependiente, NuevoDependiente,
  },
  store::PadronStore,
  validacion::{validar_cambios_dependiente, validar_dependiente},
};

use crate::{error::ApiError, respuesta::Respuesta};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListarParams {
  pub cedula_beneficiario: Option<String>,
}

/// `GET /dependientes[?cedula_beneficiario=<cedula>]`
pub async fn listar<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListarParams>,
) -> Result<Json<Respuesta<Vec<Dependiente>>>, ApiError>
where
  S: PadronStore,
{
  let dependientes = store
    .listar_dependientes(params.cedula_beneficiario.as_deref())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Respuesta::ok(dependientes)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /dependientes`
pub async fn crear<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NuevoDependiente>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PadronStore,
{
  let alta = validar_dependiente(&body).map_err(ApiError::Validacion)?;

  if store
    .buscar_dependiente(&alta.cedula)
    .await
    .map_err(ApiError::store)?
    .is_some()
  {
    return Err(ApiError::Conflicto(format!(
      "Ya existe un dependiente con la cédula {}",
      alta.cedula
    )));
  }
  if store
    .buscar_beneficiario(&alta.cedula_beneficiario)
    .await
    .map_err(ApiError::store)?
    .is_none()
  {
    return Err(ApiError::NoEncontrado(format!(
      "Beneficiario {} no encontrado",
      alta.cedula_beneficiario
    )));
  }

  let dependiente = store.crear_dependiente(alta).await.map_err(ApiError::store)?;
  Ok((
    StatusCode::CREATED,
    Json(Respuesta::ok_con_mensaje(dependiente, "Dependiente registrado")),
  ))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /dependientes/:cedula` — the detail view shape: the dependent plus
/// the address and contact derived from its owner.
pub async fn obtener<S>(
  State(store): State<Arc<S>>,
  Path(cedula): Path<String>,
) -> Result<Json<Respuesta<FichaDependiente>>, ApiError>
where
  S: PadronStore,
{
  let ficha = store
    .ficha_dependiente(&cedula)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| no_encontrado(&cedula))?;
  Ok(Json(Respuesta::ok(ficha)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /dependientes/:cedula`
pub async fn actualizar<S>(
  State(store): State<Arc<S>>,
  Path(cedula): Path<String>,
  Json(body): Json<ActualizacionDependiente>,
) -> Result<Json<Respuesta<Dependiente>>, ApiError>
where
  S: PadronStore,
{
  let cambios = validar_cambios_dependiente(&body).map_err(ApiError::Validacion)?;

  store
    .buscar_dependiente(&cedula)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| no_encontrado(&cedula))?;

  let actualizado = store
    .actualizar_dependiente(&cedula, cambios)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Respuesta::ok_con_mensaje(actualizado, "Dependiente actualizado")))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /dependientes/:cedula` — dependents really are removed.
pub async fn eliminar<S>(
  State(store): State<Arc<S>>,
  Path(cedula): Path<String>,
) -> Result<Json<Respuesta<()>>, ApiError>
where
  S: PadronStore,
{
  store
    .buscar_dependiente(&cedula)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| no_encontrado(&cedula))?;

  store
    .eliminar_dependiente(&cedula)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Respuesta::mensaje("Dependiente eliminado")))
}

fn no_encontrado(cedula: &str) -> ApiError {
  ApiError::NoEncontrado(format!("Dependiente {cedula} no encontrado"))
}
