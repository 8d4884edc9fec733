//! Dependiente — a person registered under a beneficiary's household.
//!
//! Dependents share the beneficiary's address and are displayed with it, but
//! carry their own personal attributes. They are deleted independently; a
//! deactivated beneficiary keeps its dependents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
  beneficiario::{EstadoCivil, Genero, NivelEducativo},
  calle::Direccion,
};

/// Relationship of a dependent to the head of household.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
pub enum Parentesco {
  Hijo,
  Hija,
  Esposo,
  Esposa,
  Padre,
  Madre,
  Hermano,
  Hermana,
  Otro,
}

// ─── Dependiente ─────────────────────────────────────────────────────────────

/// A persisted dependent. `cedula_beneficiario` is fixed at creation; the
/// update path never moves a dependent between households.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependiente {
  pub cedula:              String,
  pub cedula_beneficiario: String,
  pub parentesco:          Parentesco,
  pub nombre_completo:     String,
  pub fecha_nacimiento:    NaiveDate,
  pub genero:              Genero,
  pub estado_civil:        EstadoCivil,
  pub nivel_educativo:     NivelEducativo,
  pub profesion:           String,
  pub enfermedad_cronica:  String,
  pub discapacidad:        String,
  /// Normalised `04XXXXXXXXX` form.
  pub telefono:            String,
  pub registrado_en:       DateTime<Utc>,
}

/// A dependent joined with the address it inherits from its owning
/// beneficiary — the shape every detail view displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FichaDependiente {
  pub dependiente: Dependiente,
  pub direccion:   Direccion,
  /// The owner's contact number, shown alongside the dependent's own.
  pub telefono_beneficiario: String,
}

// ─── Input types ─────────────────────────────────────────────────────────────

/// Raw form payload for a new dependent.
#[derive(Debug, Clone, Deserialize)]
pub struct NuevoDependiente {
  pub cedula:              String,
  pub cedula_beneficiario: String,
  pub parentesco:          Parentesco,
  pub nombre_completo:     String,
  pub fecha_nacimiento:    String,
  pub genero:              Genero,
  pub estado_civil:        EstadoCivil,
  pub nivel_educativo:     NivelEducativo,
  pub profesion:           String,
  #[serde(default)]
  pub enfermedad_cronica:  String,
  #[serde(default)]
  pub discapacidad:        String,
  pub telefono:            String,
}

/// A validated insert payload. Input to
/// [`crate::store::PadronStore::crear_dependiente`].
#[derive(Debug, Clone)]
pub struct AltaDependiente {
  pub cedula:              String,
  pub cedula_beneficiario: String,
  pub parentesco:          Parentesco,
  pub nombre_completo:     String,
  pub fecha_nacimiento:    NaiveDate,
  pub genero:              Genero,
  pub estado_civil:        EstadoCivil,
  pub nivel_educativo:     NivelEducativo,
  pub profesion:           String,
  pub enfermedad_cronica:  String,
  pub discapacidad:        String,
  pub telefono:            String,
}

// ─── Partial update ──────────────────────────────────────────────────────────

/// Raw partial-update payload; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizacionDependiente {
  pub parentesco:         Option<Parentesco>,
  pub nombre_completo:    Option<String>,
  pub fecha_nacimiento:   Option<String>,
  pub genero:             Option<Genero>,
  pub estado_civil:       Option<EstadoCivil>,
  pub nivel_educativo:    Option<NivelEducativo>,
  pub profesion:          Option<String>,
  pub enfermedad_cronica: Option<String>,
  pub discapacidad:       Option<String>,
  pub telefono:           Option<String>,
}

/// A validated partial update for a dependent.
#[derive(Debug, Clone, Default)]
pub struct CambiosDependiente {
  pub parentesco:         Option<Parentesco>,
  pub nombre_completo:    Option<String>,
  pub fecha_nacimiento:   Option<NaiveDate>,
  pub genero:             Option<Genero>,
  pub estado_civil:       Option<EstadoCivil>,
  pub nivel_educativo:    Option<NivelEducativo>,
  pub profesion:          Option<String>,
  pub enfermedad_cronica: Option<String>,
  pub discapacidad:       Option<String>,
  pub telefono:           Option<String>,
}

impl CambiosDependiente {
  /// Overlay the present fields onto an existing record.
  pub fn aplicar(self, d: &mut Dependiente) {
    if let Some(v) = self.parentesco { d.parentesco = v; }
    if let Some(v) = self.nombre_completo { d.nombre_completo = v; }
    if let Some(v) = self.fecha_nacimiento { d.fecha_nacimiento = v; }
    if let Some(v) = self.genero { d.genero = v; }
    if let Some(v) = self.estado_civil { d.estado_civil = v; }
    if let Some(v) = self.nivel_educativo { d.nivel_educativo = v; }
    if let Some(v) = self.profesion { d.profesion = v; }
    if let Some(v) = self.enfermedad_cronica { d.enfermedad_cronica = v; }
    if let Some(v) = self.discapacidad { d.discapacidad = v; }
    if let Some(v) = self.telefono { d.telefono = v; }
  }
}
