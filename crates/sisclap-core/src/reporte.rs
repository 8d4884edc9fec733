//! Report aggregation engine.
//!
//! Pure, synchronous transformations over a snapshot of households. The
//! output structs are the renderer's input contract: their serialised field
//! names (`calle`, `habitantes`, `rango`, `cantidad`, `tipo`, and the
//! camelCase aggregate names) are matched on downstream and must not drift.
//!
//! Every operation is defined over a possibly-empty snapshot; empty input
//! yields zero-valued aggregates, never an error.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{dependiente::Parentesco, edad::edad, hogar::Hogar};

// ─── Requests ────────────────────────────────────────────────────────────────

/// A validated, inclusive age range; built through
/// [`crate::validacion::validar_rango`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangoConsulta {
  pub min: u32,
  pub max: u32,
}

impl RangoConsulta {
  pub fn contiene(&self, edad: u32) -> bool {
    self.min <= edad && edad <= self.max
  }

  pub fn etiqueta(&self) -> String { format!("{}-{}", self.min, self.max) }
}

/// The report kinds the engine can run. Dispatch is an explicit match in
/// [`generar`]; each kind carries its own typed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolicitudReporte {
  CargaFamiliar,
  HabitantesCalle,
  DistribucionEdades,
  RangoEdad(RangoConsulta),
  Ventas,
  BeneficiariosConDependientes,
}

// ─── Outputs ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumenCargaFamiliar {
  pub total_beneficiarios:       u64,
  pub total_dependientes:        u64,
  /// 0.0 when the registry is empty; never NaN.
  pub promedio_hijos_por_familia: f64,
  pub familias_sin_hijos:        u64,
  pub familias_con_hijos:        u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitantesCalle {
  pub calle:      String,
  /// Beneficiaries on the street plus all of their dependents.
  pub habitantes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConteoRango {
  pub rango:    String,
  pub cantidad: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramaEdades {
  pub total_personas: u64,
  pub rangos:         Vec<ConteoRango>,
}

/// One matching person in an age-range detail report. `parentesco` is
/// `None` for heads of household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaEdad {
  pub cedula:          String,
  pub nombre_completo: String,
  pub edad:            u32,
  pub parentesco:      Option<Parentesco>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetalleRangoEdad {
  pub rango:    String,
  pub cantidad: u64,
  pub personas: Vec<PersonaEdad>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConteoTipo {
  pub tipo:     String,
  pub cantidad: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumenBeneficios {
  pub total:      u64,
  pub por_tipo:   Vec<ConteoTipo>,
  /// Records dated within the trailing 30-day window ending today.
  pub ultimo_mes: u64,
}

/// Tagged report output, one strongly typed payload per kind. The `tipo`
/// tag values are the discriminators of the report endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "tipo", content = "datos", rename_all = "kebab-case")]
pub enum SalidaReporte {
  CargaFamiliar(ResumenCargaFamiliar),
  HabitantesCalle(Vec<HabitantesCalle>),
  DistribucionEdades(HistogramaEdades),
  RangoEdad(DetalleRangoEdad),
  Ventas(ResumenBeneficios),
  BeneficiariosConDependientes(Vec<Hogar>),
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

/// Run one report over a household snapshot. `hoy` anchors every age and
/// date-window computation so results are reproducible for a given day.
pub fn generar(
  hogares: &[Hogar],
  solicitud: &SolicitudReporte,
  hoy: NaiveDate,
) -> SalidaReporte {
  match solicitud {
    SolicitudReporte::CargaFamiliar => {
      SalidaReporte::CargaFamiliar(carga_familiar(hogares))
    }
    SolicitudReporte::HabitantesCalle => {
      SalidaReporte::HabitantesCalle(habitantes_por_calle(hogares))
    }
    SolicitudReporte::DistribucionEdades => {
      SalidaReporte::DistribucionEdades(distribucion_edades(hogares, hoy))
    }
    SolicitudReporte::RangoEdad(rango) => {
      SalidaReporte::RangoEdad(personas_en_rango(hogares, *rango, hoy))
    }
    SolicitudReporte::Ventas => SalidaReporte::Ventas(ventas(hogares, hoy)),
    SolicitudReporte::BeneficiariosConDependientes => {
      SalidaReporte::BeneficiariosConDependientes(
        beneficiarios_con_dependientes(hogares),
      )
    }
  }
}

// ─── Operations ──────────────────────────────────────────────────────────────

pub fn carga_familiar(hogares: &[Hogar]) -> ResumenCargaFamiliar {
  let total_beneficiarios = hogares.len() as u64;
  let total_dependientes: u64 =
    hogares.iter().map(|h| h.dependientes.len() as u64).sum();
  let familias_sin_hijos =
    hogares.iter().filter(|h| h.dependientes.is_empty()).count() as u64;
  let familias_con_hijos = total_beneficiarios - familias_sin_hijos;

  let promedio_hijos_por_familia = if total_beneficiarios == 0 {
    0.0
  } else {
    total_dependientes as f64 / total_beneficiarios as f64
  };

  ResumenCargaFamiliar {
    total_beneficiarios,
    total_dependientes,
    promedio_hijos_por_familia,
    familias_sin_hijos,
    familias_con_hijos,
  }
}

pub fn habitantes_por_calle(hogares: &[Hogar]) -> Vec<HabitantesCalle> {
  // Grouped by street id; the display name rides along.
  let mut por_calle: BTreeMap<i64, (&str, u64)> = BTreeMap::new();
  for h in hogares {
    let entrada = por_calle
      .entry(h.calle.id_calle)
      .or_insert((h.calle.nom_calle.as_str(), 0));
    entrada.1 += 1 + h.dependientes.len() as u64;
  }
  por_calle
    .into_values()
    .map(|(calle, habitantes)| HabitantesCalle {
      calle: calle.to_owned(),
      habitantes,
    })
    .collect()
}

/// Fixed buckets of the age-distribution report. 65 belongs to the fourth
/// bucket; "65+" holds everything strictly older, so the buckets partition
/// all ages with no gap or overlap.
const RANGOS_FIJOS: [(&str, u32, u32); 5] = [
  ("0-17", 0, 17),
  ("18-35", 18, 35),
  ("36-50", 36, 50),
  ("51-65", 51, 65),
  ("65+", 66, u32::MAX),
];

pub fn distribucion_edades(hogares: &[Hogar], hoy: NaiveDate) -> HistogramaEdades {
  let mut conteos = [0u64; RANGOS_FIJOS.len()];
  let mut total_personas = 0u64;

  for persona in hogares.iter().flat_map(Hogar::personas) {
    let e = edad(persona.fecha_nacimiento, hoy);
    total_personas += 1;
    if let Some(i) = RANGOS_FIJOS.iter().position(|(_, min, max)| *min <= e && e <= *max) {
      conteos[i] += 1;
    }
  }

  HistogramaEdades {
    total_personas,
    rangos: RANGOS_FIJOS
      .iter()
      .zip(conteos)
      .map(|((rango, _, _), cantidad)| ConteoRango {
        rango: (*rango).to_owned(),
        cantidad,
      })
      .collect(),
  }
}

/// Arbitrary-range variant: returns the matching persons themselves, not
/// just a count, so callers can render a detail table.
pub fn personas_en_rango(
  hogares: &[Hogar],
  rango: RangoConsulta,
  hoy: NaiveDate,
) -> DetalleRangoEdad {
  let mut personas = Vec::new();
  for persona in hogares.iter().flat_map(Hogar::personas) {
    let e = edad(persona.fecha_nacimiento, hoy);
    if rango.contiene(e) {
      personas.push(PersonaEdad {
        cedula:          persona.cedula.to_owned(),
        nombre_completo: persona.nombre_completo.to_owned(),
        edad:            e,
        parentesco:      persona.parentesco,
      });
    }
  }

  DetalleRangoEdad {
    rango:    rango.etiqueta(),
    cantidad: personas.len() as u64,
    personas,
  }
}

pub fn ventas(hogares: &[Hogar], hoy: NaiveDate) -> ResumenBeneficios {
  let desde = hoy.checked_sub_days(Days::new(30)).unwrap_or(NaiveDate::MIN);

  let mut total = 0u64;
  let mut ultimo_mes = 0u64;
  let mut por_tipo: BTreeMap<&str, u64> = BTreeMap::new();

  for beneficio in hogares.iter().flat_map(|h| h.beneficios.iter()) {
    total += 1;
    *por_tipo.entry(beneficio.tipo.as_str()).or_default() += beneficio.unidades();
    if beneficio.fecha > desde && beneficio.fecha <= hoy {
      ultimo_mes += 1;
    }
  }

  ResumenBeneficios {
    total,
    por_tipo: por_tipo
      .into_iter()
      .map(|(tipo, cantidad)| ConteoTipo { tipo: tipo.to_owned(), cantidad })
      .collect(),
    ultimo_mes,
  }
}

/// Pass-through listing pairing each beneficiary with its dependents; the
/// grouping already exists in the snapshot.
pub fn beneficiarios_con_dependientes(hogares: &[Hogar]) -> Vec<Hogar> {
  hogares.to_vec()
}
