//! Calle — reference entity used as an address and reporting dimension.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calle {
  /// Store-assigned key.
  pub id_calle:  i64,
  pub nom_calle: String,
}

/// A resolved address: the street plus the house number on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Direccion {
  pub calle:       Calle,
  pub numero_casa: String,
}
