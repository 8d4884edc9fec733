//! Handler for `GET /reportes/:tipo`.
//!
//! The path segment is the report discriminator; `rango-edad` additionally
//! takes `?min=&max=`. Unknown discriminators are a 404, an incomplete or
//! out-of-order range a 4xx — before any aggregation runs.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::Utc;
use serde::Deserialize;

use sisclap_core::{
  reporte::{self, SalidaReporte, SolicitudReporte},
  store::PadronStore,
  validacion::validar_rango,
};

use crate::{error::ApiError, respuesta::Respuesta};

#[derive(Debug, Deserialize)]
pub struct RangoParams {
  pub min: Option<i64>,
  pub max: Option<i64>,
}

/// `GET /reportes/:tipo[?min=<edad>&max=<edad>]`
pub async fn generar<S>(
  State(store): State<Arc<S>>,
  Path(tipo): Path<String>,
  Query(params): Query<RangoParams>,
) -> Result<Json<Respuesta<SalidaReporte>>, ApiError>
where
  S: PadronStore,
{
  let solicitud = match tipo.as_str() {
    "carga-familiar" => SolicitudReporte::CargaFamiliar,
    "habitantes-calle" => SolicitudReporte::HabitantesCalle,
    "distribucion-edades" => SolicitudReporte::DistribucionEdades,
    "rango-edad" => {
      let (Some(min), Some(max)) = (params.min, params.max) else {
        return Err(ApiError::SolicitudInvalida(
          "El reporte rango-edad requiere los parámetros min y max".to_owned(),
        ));
      };
      let rango = validar_rango(min, max).map_err(ApiError::Validacion)?;
      SolicitudReporte::RangoEdad(rango)
    }
    "ventas" => SolicitudReporte::Ventas,
    "beneficiarios-con-dependientes" => {
      SolicitudReporte::BeneficiariosConDependientes
    }
    _ => {
      return Err(ApiError::NoEncontrado(format!("El reporte {tipo:?} no existe")));
    }
  };

  // Reports aggregate over the full registry, INACTIVO history included.
  let hogares = store.hogares(None).await.map_err(ApiError::store)?;
  let salida = reporte::generar(&hogares, &solicitud, Utc::now().date_naive());
  Ok(Json(Respuesta::ok(salida)))
}
