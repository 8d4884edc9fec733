//! Handlers for `/beneficiarios` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/beneficiarios` | Optional `?estatus=&q=&id_calle=&limit=&offset=` |
//! | `POST`   | `/beneficiarios` | Body: [`NuevoBeneficiario`]; 422 + field map on invalid |
//! | `GET`    | `/beneficiarios/:cedula` | 404 if not found |
//! | `PUT`    | `/beneficiarios/:cedula` | Partial update; 409 when INACTIVO |
//! | `DELETE` | `/beneficiarios/:cedula` | Status transition to INACTIVO |
//! | `POST`   | `/beneficiarios/:cedula/estatus` | Body: `{"estatus":"ACTIVO"}` |
//! | `GET`    | `/beneficiarios/:cedula/beneficios` | Benefit history |
//! | `POST`   | `/beneficiarios/:cedula/beneficios` | Append a benefit record |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;

use sisclap_core::{
  beneficiario::{ActualizacionBeneficiario, Beneficiario, Estatus, NuevoBeneficiario},
  beneficio::{BeneficioRecibido, NuevoBeneficio},
  store::{ConsultaPadron, PadronStore},
  validacion::{validar_beneficiario, validar_cambios_beneficiario},
};

use crate::{error::ApiError, respuesta::Respuesta};

// ─── List / search ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListarParams {
  pub estatus:  Option<Estatus>,
  /// Free text: cédula prefix or name fragment.
  pub q:        Option<String>,
  pub id_calle: Option<i64>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

/// `GET /beneficiarios[?estatus=&q=&id_calle=&limit=&offset=]`
pub async fn listar<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListarParams>,
) -> Result<Json<Respuesta<Vec<Beneficiario>>>, ApiError>
where
  S: PadronStore,
{
  let filtrando = params.q.is_some()
    || params.id_calle.is_some()
    || params.limit.is_some()
    || params.offset.is_some();

  let beneficiarios = if filtrando {
    let consulta = ConsultaPadron {
      texto:    params.q,
      estatus:  params.estatus,
      id_calle: params.id_calle,
      limit:    params.limit,
      offset:   params.offset,
    };
    store.buscar(&consulta).await.map_err(ApiError::store)?
  } else {
    store
      .listar_beneficiarios(params.estatus)
      .await
      .map_err(ApiError::store)?
  };

  Ok(Json(Respuesta::ok(beneficiarios)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /beneficiarios`
pub async fn crear<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NuevoBeneficiario>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PadronStore,
{
  let alta = validar_beneficiario(&body).map_err(ApiError::Validacion)?;

  if store
    .buscar_beneficiario(&alta.cedula)
    .await
    .map_err(ApiError::store)?
    .is_some()
  {
    return Err(ApiError::Conflicto(format!(
      "Ya existe un beneficiario con la cédula {}",
      alta.cedula
    )));
  }

  chequear_calle(store.as_ref(), alta.id_calle).await?;

  let beneficiario = store
    .crear_beneficiario(alta)
    .await
    .map_err(ApiError::store)?;
  Ok((
    StatusCode::CREATED,
    Json(Respuesta::ok_con_mensaje(beneficiario, "Beneficiario registrado")),
  ))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /beneficiarios/:cedula`
pub async fn obtener<S>(
  State(store): State<Arc<S>>,
  Path(cedula): Path<String>,
) -> Result<Json<Respuesta<Beneficiario>>, ApiError>
where
  S: PadronStore,
{
  let beneficiario = store
    .buscar_beneficiario(&cedula)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| no_encontrado(&cedula))?;
  Ok(Json(Respuesta::ok(beneficiario)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /beneficiarios/:cedula`
pub async fn actualizar<S>(
  State(store): State<Arc<S>>,
  Path(cedula): Path<String>,
  Json(body): Json<ActualizacionBeneficiario>,
) -> Result<Json<Respuesta<Beneficiario>>, ApiError>
where
  S: PadronStore,
{
  let cambios = validar_cambios_beneficiario(&body).map_err(ApiError::Validacion)?;

  let existente = store
    .buscar_beneficiario(&cedula)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| no_encontrado(&cedula))?;
  if !existente.editable() {
    return Err(ApiError::Conflicto(format!(
      "El beneficiario {cedula} está INACTIVO; reactívelo antes de editar"
    )));
  }
  if let Some(id_calle) = cambios.id_calle {
    chequear_calle(store.as_ref(), id_calle).await?;
  }

  let actualizado = store
    .actualizar_beneficiario(&cedula, cambios)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Respuesta::ok_con_mensaje(actualizado, "Beneficiario actualizado")))
}

// ─── Status transitions ───────────────────────────────────────────────────────

/// `DELETE /beneficiarios/:cedula` — deactivation, not removal.
pub async fn desactivar<S>(
  State(store): State<Arc<S>>,
  Path(cedula): Path<String>,
) -> Result<Json<Respuesta<Beneficiario>>, ApiError>
where
  S: PadronStore,
{
  store
    .buscar_beneficiario(&cedula)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| no_encontrado(&cedula))?;

  let beneficiario = store
    .cambiar_estatus(&cedula, Estatus::Inactivo)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Respuesta::ok_con_mensaje(beneficiario, "Beneficiario desactivado")))
}

#[derive(Debug, Deserialize)]
pub struct EstatusBody {
  pub estatus: Estatus,
}

/// `POST /beneficiarios/:cedula/estatus` — body: `{"estatus":"ACTIVO"}`
pub async fn cambiar_estatus<S>(
  State(store): State<Arc<S>>,
  Path(cedula): Path<String>,
  Json(body): Json<EstatusBody>,
) -> Result<Json<Respuesta<Beneficiario>>, ApiError>
where
  S: PadronStore,
{
  store
    .buscar_beneficiario(&cedula)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| no_encontrado(&cedula))?;

  let beneficiario = store
    .cambiar_estatus(&cedula, body.estatus)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Respuesta::ok_con_mensaje(beneficiario, "Estatus actualizado")))
}

// ─── Benefits ─────────────────────────────────────────────────────────────────

/// `GET /beneficiarios/:cedula/beneficios`
pub async fn listar_beneficios<S>(
  State(store): State<Arc<S>>,
  Path(cedula): Path<String>,
) -> Result<Json<Respuesta<Vec<BeneficioRecibido>>>, ApiError>
where
  S: PadronStore,
{
  store
    .buscar_beneficiario(&cedula)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| no_encontrado(&cedula))?;

  let beneficios = store
    .listar_beneficios(Some(&cedula))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Respuesta::ok(beneficios)))
}

/// JSON body accepted by `POST /beneficiarios/:cedula/beneficios`. The owner
/// comes from the path.
#[derive(Debug, Deserialize)]
pub struct BeneficioBody {
  pub tipo:        String,
  pub descripcion: String,
  pub fecha:       NaiveDate,
  pub cantidad:    Option<u32>,
}

/// `POST /beneficiarios/:cedula/beneficios`
pub async fn registrar_beneficio<S>(
  State(store): State<Arc<S>>,
  Path(cedula): Path<String>,
  Json(body): Json<BeneficioBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PadronStore,
{
  if body.tipo.trim().is_empty() {
    return Err(ApiError::SolicitudInvalida(
      "El tipo de beneficio es obligatorio".to_owned(),
    ));
  }

  store
    .buscar_beneficiario(&cedula)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| no_encontrado(&cedula))?;

  let beneficio = store
    .registrar_beneficio(NuevoBeneficio {
      cedula_beneficiario: cedula,
      tipo:                body.tipo,
      descripcion:         body.descripcion,
      fecha:               body.fecha,
      cantidad:            body.cantidad,
    })
    .await
    .map_err(ApiError::store)?;
  Ok((
    StatusCode::CREATED,
    Json(Respuesta::ok_con_mensaje(beneficio, "Beneficio registrado")),
  ))
}

fn no_encontrado(cedula: &str) -> ApiError {
  ApiError::NoEncontrado(format!("Beneficiario {cedula} no encontrado"))
}

/// A street reference must point at a registered street; anything else is a
/// 404, never an opaque store failure.
async fn chequear_calle<S>(store: &S, id_calle: i64) -> Result<(), ApiError>
where
  S: PadronStore,
{
  let registrada = store
    .listar_calles()
    .await
    .map_err(ApiError::store)?
    .iter()
    .any(|c| c.id_calle == id_calle);
  if registrada {
    Ok(())
  } else {
    Err(ApiError::NoEncontrado(format!("La calle {id_calle} no está registrada")))
  }
}
