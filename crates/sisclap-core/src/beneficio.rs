//! BeneficioRecibido — an append-only log entry of a delivered benefit.
//!
//! No update or delete operation exists for these records; they feed the
//! benefit/sales aggregation and nothing else mutates them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customary benefit type labels. The field itself is free text; these are
/// the values the forms offer.
pub mod tipos {
  pub const ALIMENTARIO: &str = "Alimentario";
  pub const MEDICINAS:   &str = "Medicinas";
  pub const EDUCATIVO:   &str = "Educativo";
  pub const OTROS:       &str = "Otros";
}

/// A persisted benefit record. The `id` is assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeneficioRecibido {
  pub id:                  Uuid,
  pub cedula_beneficiario: String,
  pub tipo:                String,
  pub descripcion:         String,
  pub fecha:               NaiveDate,
  /// Units delivered; a record without one counts as a single unit.
  pub cantidad:            Option<u32>,
}

impl BeneficioRecibido {
  pub fn unidades(&self) -> u64 { u64::from(self.cantidad.unwrap_or(1)) }
}

/// Input to [`crate::store::PadronStore::registrar_beneficio`].
#[derive(Debug, Clone, Deserialize)]
pub struct NuevoBeneficio {
  pub cedula_beneficiario: String,
  pub tipo:                String,
  pub descripcion:         String,
  pub fecha:               NaiveDate,
  pub cantidad:            Option<u32>,
}
