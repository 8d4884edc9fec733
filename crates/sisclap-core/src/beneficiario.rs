//! Beneficiario — the head-of-household record.
//!
//! The `cedula` is the natural key. Deactivation is a status transition,
//! never a row delete; dependents and benefit history outlive it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ─── Closed attribute sets ───────────────────────────────────────────────────

/// Lifecycle flag. The canonical wire and storage form is uppercase.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Estatus {
  Activo,
  Inactivo,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
pub enum Genero {
  Masculino,
  Femenino,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
pub enum EstadoCivil {
  Soltero,
  Casado,
  Divorciado,
  Viudo,
  UnionLibre,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
pub enum NivelEducativo {
  Ninguno,
  Primaria,
  Secundaria,
  Tecnico,
  Universitario,
  Postgrado,
}

// ─── Beneficiario ────────────────────────────────────────────────────────────

/// A persisted head-of-household record. `estatus` and `registrado_en` are
/// assigned by the store, never accepted from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beneficiario {
  pub cedula:            String,
  pub nombre_completo:   String,
  pub fecha_nacimiento:  NaiveDate,
  pub genero:            Genero,
  pub estado_civil:      EstadoCivil,
  pub nivel_educativo:   NivelEducativo,
  pub profesion:         String,
  pub enfermedad_cronica: String,
  pub discapacidad:      String,
  /// Normalised `04XXXXXXXXX` form.
  pub telefono:          String,
  pub id_calle:          i64,
  pub numero_casa:       String,
  pub estatus:           Estatus,
  pub registrado_en:     DateTime<Utc>,
}

impl Beneficiario {
  /// INACTIVO records are frozen for the standard edit flow; a status
  /// change back to ACTIVO is the only way to unfreeze them.
  pub fn editable(&self) -> bool { self.estatus == Estatus::Activo }
}

// ─── Input types ─────────────────────────────────────────────────────────────

/// Raw form payload, exactly as submitted. String fields carry whatever the
/// form had in them; [`crate::validacion::validar_beneficiario`] turns this
/// into an [`AltaBeneficiario`] or a field-keyed error map.
#[derive(Debug, Clone, Deserialize)]
pub struct NuevoBeneficiario {
  pub cedula:            String,
  pub nombre_completo:   String,
  pub fecha_nacimiento:  String,
  pub genero:            Genero,
  pub estado_civil:      EstadoCivil,
  pub nivel_educativo:   NivelEducativo,
  pub profesion:         String,
  #[serde(default)]
  pub enfermedad_cronica: String,
  #[serde(default)]
  pub discapacidad:      String,
  pub telefono:          String,
  pub id_calle:          i64,
  pub numero_casa:       String,
}

/// A validated insert payload. Input to
/// [`crate::store::PadronStore::crear_beneficiario`].
#[derive(Debug, Clone)]
pub struct AltaBeneficiario {
  pub cedula:            String,
  pub nombre_completo:   String,
  pub fecha_nacimiento:  NaiveDate,
  pub genero:            Genero,
  pub estado_civil:      EstadoCivil,
  pub nivel_educativo:   NivelEducativo,
  pub profesion:         String,
  pub enfermedad_cronica: String,
  pub discapacidad:      String,
  pub telefono:          String,
  pub id_calle:          i64,
  pub numero_casa:       String,
}

// ─── Partial update ──────────────────────────────────────────────────────────

/// Raw partial-update payload; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizacionBeneficiario {
  pub nombre_completo:   Option<String>,
  pub fecha_nacimiento:  Option<String>,
  pub genero:            Option<Genero>,
  pub estado_civil:      Option<EstadoCivil>,
  pub nivel_educativo:   Option<NivelEducativo>,
  pub profesion:         Option<String>,
  pub enfermedad_cronica: Option<String>,
  pub discapacidad:      Option<String>,
  pub telefono:          Option<String>,
  pub id_calle:          Option<i64>,
  pub numero_casa:       Option<String>,
}

/// A validated partial update. The cédula and the estatus are never changed
/// through this path.
#[derive(Debug, Clone, Default)]
pub struct CambiosBeneficiario {
  pub nombre_completo:   Option<String>,
  pub fecha_nacimiento:  Option<NaiveDate>,
  pub genero:            Option<Genero>,
  pub estado_civil:      Option<EstadoCivil>,
  pub nivel_educativo:   Option<NivelEducativo>,
  pub profesion:         Option<String>,
  pub enfermedad_cronica: Option<String>,
  pub discapacidad:      Option<String>,
  pub telefono:          Option<String>,
  pub id_calle:          Option<i64>,
  pub numero_casa:       Option<String>,
}

impl CambiosBeneficiario {
  /// Overlay the present fields onto an existing record. Shared by every
  /// store backend so update semantics cannot drift between them.
  pub fn aplicar(self, b: &mut Beneficiario) {
    if let Some(v) = self.nombre_completo { b.nombre_completo = v; }
    if let Some(v) = self.fecha_nacimiento { b.fecha_nacimiento = v; }
    if let Some(v) = self.genero { b.genero = v; }
    if let Some(v) = self.estado_civil { b.estado_civil = v; }
    if let Some(v) = self.nivel_educativo { b.nivel_educativo = v; }
    if let Some(v) = self.profesion { b.profesion = v; }
    if let Some(v) = self.enfermedad_cronica { b.enfermedad_cronica = v; }
    if let Some(v) = self.discapacidad { b.discapacidad = v; }
    if let Some(v) = self.telefono { b.telefono = v; }
    if let Some(v) = self.id_calle { b.id_calle = v; }
    if let Some(v) = self.numero_casa { b.numero_casa = v; }
  }
}
