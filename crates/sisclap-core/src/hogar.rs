//! Hogar — the household read model.
//!
//! Never stored, always derived: a beneficiary joined with its resolved
//! street, its dependents, and its benefit history. A snapshot of these is
//! the raw material for every report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  beneficiario::Beneficiario,
  beneficio::BeneficioRecibido,
  calle::Calle,
  dependiente::{Dependiente, Parentesco},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hogar {
  pub beneficiario: Beneficiario,
  pub calle:        Calle,
  pub dependientes: Vec<Dependiente>,
  pub beneficios:   Vec<BeneficioRecibido>,
}

impl Hogar {
  /// Every person in the household, the head first, then each dependent.
  /// Each person appears exactly once.
  pub fn personas(&self) -> impl Iterator<Item = Persona<'_>> {
    let titular = Persona {
      cedula:           &self.beneficiario.cedula,
      nombre_completo:  &self.beneficiario.nombre_completo,
      fecha_nacimiento: self.beneficiario.fecha_nacimiento,
      parentesco:       None,
    };
    std::iter::once(titular).chain(self.dependientes.iter().map(|d| Persona {
      cedula:           &d.cedula,
      nombre_completo:  &d.nombre_completo,
      fecha_nacimiento: d.fecha_nacimiento,
      parentesco:       Some(d.parentesco),
    }))
  }
}

/// Borrowed view of one person, uniform across heads of household and
/// dependents. `parentesco` is `None` for the head.
#[derive(Debug, Clone, Copy)]
pub struct Persona<'a> {
  pub cedula:           &'a str,
  pub nombre_completo:  &'a str,
  pub fecha_nacimiento: NaiveDate,
  pub parentesco:       Option<Parentesco>,
}
