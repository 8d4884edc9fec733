//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar dates ISO `YYYY-MM-DD`, enums
//! their canonical strum strings, UUIDs hyphenated lowercase.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use sisclap_core::{
  beneficiario::Beneficiario,
  beneficio::BeneficioRecibido,
  dependiente::Dependiente,
};

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("fecha-hora {s:?}: {e}")))
}

pub fn encode_fecha(f: NaiveDate) -> String { f.format("%Y-%m-%d").to_string() }

pub fn decode_fecha(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("fecha {s:?}: {e}")))
}

/// Decode a canonical strum string back into its enum, naming the column on
/// failure.
pub fn decode_enum<T: FromStr>(columna: &str, s: &str) -> Result<T> {
  s.parse()
    .map_err(|_| Error::Decode(format!("{columna} desconocido: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `beneficiarios` row.
pub struct RawBeneficiario {
  pub cedula:             String,
  pub nombre_completo:    String,
  pub fecha_nacimiento:   String,
  pub genero:             String,
  pub estado_civil:       String,
  pub nivel_educativo:    String,
  pub profesion:          String,
  pub enfermedad_cronica: String,
  pub discapacidad:       String,
  pub telefono:           String,
  pub id_calle:           i64,
  pub numero_casa:        String,
  pub estatus:            String,
  pub registrado_en:      String,
}

impl RawBeneficiario {
  /// The column list every `beneficiarios` SELECT uses, in field order.
  pub const COLUMNAS: &'static str = "cedula, nombre_completo, fecha_nacimiento, \
    genero, estado_civil, nivel_educativo, profesion, enfermedad_cronica, \
    discapacidad, telefono, id_calle, numero_casa, estatus, registrado_en";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      cedula:             row.get(0)?,
      nombre_completo:    row.get(1)?,
      fecha_nacimiento:   row.get(2)?,
      genero:             row.get(3)?,
      estado_civil:       row.get(4)?,
      nivel_educativo:    row.get(5)?,
      profesion:          row.get(6)?,
      enfermedad_cronica: row.get(7)?,
      discapacidad:       row.get(8)?,
      telefono:           row.get(9)?,
      id_calle:           row.get(10)?,
      numero_casa:        row.get(11)?,
      estatus:            row.get(12)?,
      registrado_en:      row.get(13)?,
    })
  }

  pub fn into_beneficiario(self) -> Result<Beneficiario> {
    Ok(Beneficiario {
      cedula:             self.cedula,
      nombre_completo:    self.nombre_completo,
      fecha_nacimiento:   decode_fecha(&self.fecha_nacimiento)?,
      genero:             decode_enum("genero", &self.genero)?,
      estado_civil:       decode_enum("estado_civil", &self.estado_civil)?,
      nivel_educativo:    decode_enum("nivel_educativo", &self.nivel_educativo)?,
      profesion:          self.profesion,
      enfermedad_cronica: self.enfermedad_cronica,
      discapacidad:       self.discapacidad,
      telefono:           self.telefono,
      id_calle:           self.id_calle,
      numero_casa:        self.numero_casa,
      estatus:            decode_enum("estatus", &self.estatus)?,
      registrado_en:      decode_dt(&self.registrado_en)?,
    })
  }
}

/// Raw strings read directly from a `dependientes` row.
pub struct RawDependiente {
  pub cedula:              String,
  pub cedula_beneficiario: String,
  pub parentesco:          String,
  pub nombre_completo:     String,
  pub fecha_nacimiento:    String,
  pub genero:              String,
  pub estado_civil:        String,
  pub nivel_educativo:     String,
  pub profesion:           String,
  pub enfermedad_cronica:  String,
  pub discapacidad:        String,
  pub telefono:            String,
  pub registrado_en:       String,
}

impl RawDependiente {
  pub const COLUMNAS: &'static str = "cedula, cedula_beneficiario, parentesco, \
    nombre_completo, fecha_nacimiento, genero, estado_civil, nivel_educativo, \
    profesion, enfermedad_cronica, discapacidad, telefono, registrado_en";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      cedula:              row.get(0)?,
      cedula_beneficiario: row.get(1)?,
      parentesco:          row.get(2)?,
      nombre_completo:     row.get(3)?,
      fecha_nacimiento:    row.get(4)?,
      genero:              row.get(5)?,
      estado_civil:        row.get(6)?,
      nivel_educativo:     row.get(7)?,
      profesion:           row.get(8)?,
      enfermedad_cronica:  row.get(9)?,
      discapacidad:        row.get(10)?,
      telefono:            row.get(11)?,
      registrado_en:       row.get(12)?,
    })
  }

  pub fn into_dependiente(self) -> Result<Dependiente> {
    Ok(Dependiente {
      cedula:              self.cedula,
      cedula_beneficiario: self.cedula_beneficiario,
      parentesco:          decode_enum("parentesco", &self.parentesco)?,
      nombre_completo:     self.nombre_completo,
      fecha_nacimiento:    decode_fecha(&self.fecha_nacimiento)?,
      genero:              decode_enum("genero", &self.genero)?,
      estado_civil:        decode_enum("estado_civil", &self.estado_civil)?,
      nivel_educativo:     decode_enum("nivel_educativo", &self.nivel_educativo)?,
      profesion:           self.profesion,
      enfermedad_cronica:  self.enfermedad_cronica,
      discapacidad:        self.discapacidad,
      telefono:            self.telefono,
      registrado_en:       decode_dt(&self.registrado_en)?,
    })
  }
}

/// Raw strings read directly from a `beneficios` row.
pub struct RawBeneficio {
  pub id:                  String,
  pub cedula_beneficiario: String,
  pub tipo:                String,
  pub descripcion:         String,
  pub fecha:               String,
  pub cantidad:            Option<u32>,
}

impl RawBeneficio {
  pub const COLUMNAS: &'static str =
    "id, cedula_beneficiario, tipo, descripcion, fecha, cantidad";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                  row.get(0)?,
      cedula_beneficiario: row.get(1)?,
      tipo:                row.get(2)?,
      descripcion:         row.get(3)?,
      fecha:               row.get(4)?,
      cantidad:            row.get(5)?,
    })
  }

  pub fn into_beneficio(self) -> Result<BeneficioRecibido> {
    Ok(BeneficioRecibido {
      id:                  decode_uuid(&self.id)?,
      cedula_beneficiario: self.cedula_beneficiario,
      tipo:                self.tipo,
      descripcion:         self.descripcion,
      fecha:               decode_fecha(&self.fecha)?,
      cantidad:            self.cantidad,
    })
  }
}
