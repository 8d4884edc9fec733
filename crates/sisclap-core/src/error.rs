//! Error types for `sisclap-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("beneficiario no encontrado: {0}")]
  BeneficiarioNoEncontrado(String),

  #[error("dependiente no encontrado: {0}")]
  DependienteNoEncontrado(String),

  #[error("calle no encontrada: {0}")]
  CalleNoEncontrada(i64),

  #[error("ya existe un registro con la cédula {0}")]
  CedulaDuplicada(String),

  #[error("el beneficiario {0} está INACTIVO; solo puede reactivarse")]
  BeneficiarioInactivo(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
