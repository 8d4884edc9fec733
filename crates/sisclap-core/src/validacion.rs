//! Field-level validation for create and update payloads.
//!
//! Validation is all-or-nothing: a payload is checked in full and either a
//! typed value comes back, or the complete field-keyed error map does. The
//! format checks run independently of the required-field checks, so a blank
//! cédula collects both messages under the same key.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
  beneficiario::{
    ActualizacionBeneficiario, AltaBeneficiario, CambiosBeneficiario,
    NuevoBeneficiario,
  },
  dependiente::{
    ActualizacionDependiente, AltaDependiente, CambiosDependiente,
    NuevoDependiente,
  },
  reporte::RangoConsulta,
};

/// Recorded for the free-text health fields when the form leaves them blank.
pub const NINGUNA: &str = "Ninguna";

// ─── Error map ───────────────────────────────────────────────────────────────

/// User-facing validation messages keyed by form field. Serialises as a
/// plain `{"campo": ["mensaje", ...]}` object for inline display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErroresValidacion(BTreeMap<String, Vec<String>>);

impl ErroresValidacion {
  pub fn agregar(&mut self, campo: &str, mensaje: impl Into<String>) {
    self.0.entry(campo.to_owned()).or_default().push(mensaje.into());
  }

  pub fn es_valido(&self) -> bool { self.0.is_empty() }

  pub fn campos(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  /// Messages for one field; empty when the field validated cleanly.
  pub fn mensajes(&self, campo: &str) -> &[String] {
    self.0.get(campo).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn into_mapa(self) -> BTreeMap<String, Vec<String>> { self.0 }
}

// ─── Field checks ────────────────────────────────────────────────────────────

fn requerido(errores: &mut ErroresValidacion, campo: &str, valor: &str, mensaje: &str) {
  if valor.is_empty() {
    errores.agregar(campo, mensaje);
  }
}

fn cedula_bien_formada(valor: &str) -> bool {
  matches!(valor.len(), 7 | 8) && valor.chars().all(|c| c.is_ascii_digit())
}

fn chequear_cedula(errores: &mut ErroresValidacion, campo: &str, valor: &str) {
  if !cedula_bien_formada(valor) {
    errores.agregar(campo, "La cédula debe tener 7 u 8 dígitos");
  }
}

/// Strip hyphens and spaces; accept exactly 11 digits starting `04`. The
/// normalised form is what gets stored.
fn telefono_normalizado(valor: &str) -> Option<String> {
  let limpio: String = valor.chars().filter(|c| !matches!(c, '-' | ' ')).collect();
  let valido = limpio.len() == 11
    && limpio.starts_with("04")
    && limpio.chars().all(|c| c.is_ascii_digit());
  valido.then_some(limpio)
}

fn chequear_telefono(errores: &mut ErroresValidacion, valor: &str) -> Option<String> {
  match telefono_normalizado(valor) {
    Some(t) => Some(t),
    None => {
      errores.agregar("telefono", "El teléfono debe tener el formato 04XXXXXXXXX");
      None
    }
  }
}

/// Literal `YYYY-MM-DD` shape, and a real calendar date on top of it.
fn fecha_iso(valor: &str) -> Option<NaiveDate> {
  let b = valor.as_bytes();
  if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
    return None;
  }
  let digitos = b
    .iter()
    .enumerate()
    .all(|(i, c)| matches!(i, 4 | 7) || c.is_ascii_digit());
  if !digitos {
    return None;
  }
  NaiveDate::parse_from_str(valor, "%Y-%m-%d").ok()
}

fn chequear_fecha(errores: &mut ErroresValidacion, campo: &str, valor: &str) -> Option<NaiveDate> {
  match fecha_iso(valor) {
    Some(f) => Some(f),
    None => {
      errores.agregar(campo, "La fecha debe tener el formato AAAA-MM-DD");
      None
    }
  }
}

fn o_ninguna(valor: &str) -> String {
  let v = valor.trim();
  if v.is_empty() { NINGUNA.to_owned() } else { v.to_owned() }
}

// ─── Create payloads ─────────────────────────────────────────────────────────

pub fn validar_beneficiario(
  nuevo: &NuevoBeneficiario,
) -> Result<AltaBeneficiario, ErroresValidacion> {
  let mut errores = ErroresValidacion::default();

  let cedula = nuevo.cedula.trim();
  requerido(&mut errores, "cedula", cedula, "La cédula es obligatoria");
  chequear_cedula(&mut errores, "cedula", cedula);

  let nombre = nuevo.nombre_completo.trim();
  requerido(&mut errores, "nombre_completo", nombre, "El nombre completo es obligatorio");

  let profesion = nuevo.profesion.trim();
  requerido(&mut errores, "profesion", profesion, "La profesión es obligatoria");

  let fecha_txt = nuevo.fecha_nacimiento.trim();
  requerido(&mut errores, "fecha_nacimiento", fecha_txt, "La fecha de nacimiento es obligatoria");
  let fecha = chequear_fecha(&mut errores, "fecha_nacimiento", fecha_txt);

  let telefono_txt = nuevo.telefono.trim();
  requerido(&mut errores, "telefono", telefono_txt, "El teléfono es obligatorio");
  let telefono = chequear_telefono(&mut errores, telefono_txt);

  let numero_casa = nuevo.numero_casa.trim();
  requerido(&mut errores, "numero_casa", numero_casa, "El número de casa es obligatorio");

  if let (true, Some(fecha_nacimiento), Some(telefono)) =
    (errores.es_valido(), fecha, telefono)
  {
    Ok(AltaBeneficiario {
      cedula:             cedula.to_owned(),
      nombre_completo:    nombre.to_owned(),
      fecha_nacimiento,
      genero:             nuevo.genero,
      estado_civil:       nuevo.estado_civil,
      nivel_educativo:    nuevo.nivel_educativo,
      profesion:          profesion.to_owned(),
      enfermedad_cronica: o_ninguna(&nuevo.enfermedad_cronica),
      discapacidad:       o_ninguna(&nuevo.discapacidad),
      telefono,
      id_calle:           nuevo.id_calle,
      numero_casa:        numero_casa.to_owned(),
    })
  } else {
    Err(errores)
  }
}

pub fn validar_dependiente(
  nuevo: &NuevoDependiente,
) -> Result<AltaDependiente, ErroresValidacion> {
  let mut errores = ErroresValidacion::default();

  let cedula = nuevo.cedula.trim();
  requerido(&mut errores, "cedula", cedula, "La cédula es obligatoria");
  chequear_cedula(&mut errores, "cedula", cedula);

  let cedula_beneficiario = nuevo.cedula_beneficiario.trim();
  requerido(
    &mut errores,
    "cedula_beneficiario",
    cedula_beneficiario,
    "La cédula del beneficiario es obligatoria",
  );
  chequear_cedula(&mut errores, "cedula_beneficiario", cedula_beneficiario);

  let nombre = nuevo.nombre_completo.trim();
  requerido(&mut errores, "nombre_completo", nombre, "El nombre completo es obligatorio");

  let profesion = nuevo.profesion.trim();
  requerido(&mut errores, "profesion", profesion, "La profesión es obligatoria");

  let fecha_txt = nuevo.fecha_nacimiento.trim();
  requerido(&mut errores, "fecha_nacimiento", fecha_txt, "La fecha de nacimiento es obligatoria");
  let fecha = chequear_fecha(&mut errores, "fecha_nacimiento", fecha_txt);

  let telefono_txt = nuevo.telefono.trim();
  requerido(&mut errores, "telefono", telefono_txt, "El teléfono es obligatorio");
  let telefono = chequear_telefono(&mut errores, telefono_txt);

  if let (true, Some(fecha_nacimiento), Some(telefono)) =
    (errores.es_valido(), fecha, telefono)
  {
    Ok(AltaDependiente {
      cedula:              cedula.to_owned(),
      cedula_beneficiario: cedula_beneficiario.to_owned(),
      parentesco:          nuevo.parentesco,
      nombre_completo:     nombre.to_owned(),
      fecha_nacimiento,
      genero:              nuevo.genero,
      estado_civil:        nuevo.estado_civil,
      nivel_educativo:     nuevo.nivel_educativo,
      profesion:           profesion.to_owned(),
      enfermedad_cronica:  o_ninguna(&nuevo.enfermedad_cronica),
      discapacidad:        o_ninguna(&nuevo.discapacidad),
      telefono,
    })
  } else {
    Err(errores)
  }
}

// ─── Update payloads ─────────────────────────────────────────────────────────

/// Validate a present-but-blank or malformed value on a partial update.
/// Fields that stay `None` are untouched and collect no errors.
fn texto_presente(
  errores: &mut ErroresValidacion,
  campo: &str,
  valor: Option<&String>,
  mensaje_vacio: &str,
) -> Option<String> {
  let v = valor?.trim();
  if v.is_empty() {
    errores.agregar(campo, mensaje_vacio);
    return None;
  }
  Some(v.to_owned())
}

pub fn validar_cambios_beneficiario(
  cambios: &ActualizacionBeneficiario,
) -> Result<CambiosBeneficiario, ErroresValidacion> {
  let mut errores = ErroresValidacion::default();

  let nombre_completo = texto_presente(
    &mut errores,
    "nombre_completo",
    cambios.nombre_completo.as_ref(),
    "El nombre completo no puede quedar vacío",
  );
  let profesion = texto_presente(
    &mut errores,
    "profesion",
    cambios.profesion.as_ref(),
    "La profesión no puede quedar vacía",
  );
  let numero_casa = texto_presente(
    &mut errores,
    "numero_casa",
    cambios.numero_casa.as_ref(),
    "El número de casa no puede quedar vacío",
  );

  let fecha_nacimiento = cambios
    .fecha_nacimiento
    .as_deref()
    .and_then(|v| chequear_fecha(&mut errores, "fecha_nacimiento", v.trim()));
  let telefono = cambios
    .telefono
    .as_deref()
    .and_then(|v| chequear_telefono(&mut errores, v.trim()));

  if !errores.es_valido() {
    return Err(errores);
  }

  Ok(CambiosBeneficiario {
    nombre_completo,
    fecha_nacimiento,
    genero:             cambios.genero,
    estado_civil:       cambios.estado_civil,
    nivel_educativo:    cambios.nivel_educativo,
    profesion,
    enfermedad_cronica: cambios.enfermedad_cronica.as_deref().map(o_ninguna),
    discapacidad:       cambios.discapacidad.as_deref().map(o_ninguna),
    telefono,
    id_calle:           cambios.id_calle,
    numero_casa,
  })
}

pub fn validar_cambios_dependiente(
  cambios: &ActualizacionDependiente,
) -> Result<CambiosDependiente, ErroresValidacion> {
  let mut errores = ErroresValidacion::default();

  let nombre_completo = texto_presente(
    &mut errores,
    "nombre_completo",
    cambios.nombre_completo.as_ref(),
    "El nombre completo no puede quedar vacío",
  );
  let profesion = texto_presente(
    &mut errores,
    "profesion",
    cambios.profesion.as_ref(),
    "La profesión no puede quedar vacía",
  );

  let fecha_nacimiento = cambios
    .fecha_nacimiento
    .as_deref()
    .and_then(|v| chequear_fecha(&mut errores, "fecha_nacimiento", v.trim()));
  let telefono = cambios
    .telefono
    .as_deref()
    .and_then(|v| chequear_telefono(&mut errores, v.trim()));

  if !errores.es_valido() {
    return Err(errores);
  }

  Ok(CambiosDependiente {
    parentesco:         cambios.parentesco,
    nombre_completo,
    fecha_nacimiento,
    genero:             cambios.genero,
    estado_civil:       cambios.estado_civil,
    nivel_educativo:    cambios.nivel_educativo,
    profesion,
    enfermedad_cronica: cambios.enfermedad_cronica.as_deref().map(o_ninguna),
    discapacidad:       cambios.discapacidad.as_deref().map(o_ninguna),
    telefono,
  })
}

// ─── Report range inputs ─────────────────────────────────────────────────────

/// Age-range inputs from the report screen: both integers ≥ 0, minimum not
/// above maximum. Rejected before any report runs.
pub fn validar_rango(min: i64, max: i64) -> Result<RangoConsulta, ErroresValidacion> {
  let mut errores = ErroresValidacion::default();

  if min < 0 {
    errores.agregar("min", "La edad mínima debe ser un entero mayor o igual a 0");
  }
  if max < 0 {
    errores.agregar("max", "La edad máxima debe ser un entero mayor o igual a 0");
  }
  if errores.es_valido() && min > max {
    errores.agregar("rango", "La edad mínima no puede ser mayor que la máxima");
  }

  if !errores.es_valido() {
    return Err(errores);
  }

  Ok(RangoConsulta {
    min: u32::try_from(min).unwrap_or(u32::MAX),
    max: u32::try_from(max).unwrap_or(u32::MAX),
  })
}
