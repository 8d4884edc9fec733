//! Error type for `sisclap-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored value could not be decoded back into its domain type.
  #[error("valor almacenado ilegible: {0}")]
  Decode(String),

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
