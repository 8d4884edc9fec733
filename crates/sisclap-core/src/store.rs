//! The `PadronStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (`sisclap-store-mem`,
//! `sisclap-store-sqlite`). The API layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  beneficiario::{AltaBeneficiario, Beneficiario, CambiosBeneficiario, Estatus},
  beneficio::{BeneficioRecibido, NuevoBeneficio},
  calle::Calle,
  dependiente::{AltaDependiente, CambiosDependiente, Dependiente, FichaDependiente},
  hogar::Hogar,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`PadronStore::buscar`].
#[derive(Debug, Clone, Default)]
pub struct ConsultaPadron {
  /// Free-text filter: cédula prefix or case-insensitive name fragment.
  pub texto:    Option<String>,
  pub estatus:  Option<Estatus>,
  pub id_calle: Option<i64>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a SISCLAP registry backend.
///
/// Semantics every implementation must uphold:
///
/// - `cedula` uniquely identifies a person across its own collection;
///   creating a duplicate fails.
/// - A dependent cannot be created without an existing owning beneficiary.
/// - Updating an INACTIVO beneficiary fails; `cambiar_estatus` is the only
///   permitted transition back to ACTIVO. Deactivation never deletes rows.
/// - Benefit records are append-only.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PadronStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Beneficiarios ─────────────────────────────────────────────────────

  /// Persist a validated record with `estatus = ACTIVO` and a
  /// store-assigned registration timestamp.
  fn crear_beneficiario(
    &self,
    alta: AltaBeneficiario,
  ) -> impl Future<Output = Result<Beneficiario, Self::Error>> + Send + '_;

  /// Retrieve by cédula. Returns `None` if not found.
  fn buscar_beneficiario<'a>(
    &'a self,
    cedula: &'a str,
  ) -> impl Future<Output = Result<Option<Beneficiario>, Self::Error>> + Send + 'a;

  /// List all beneficiaries, optionally filtered by estatus.
  fn listar_beneficiarios(
    &self,
    estatus: Option<Estatus>,
  ) -> impl Future<Output = Result<Vec<Beneficiario>, Self::Error>> + Send + '_;

  /// Search for beneficiaries matching `consulta`.
  fn buscar<'a>(
    &'a self,
    consulta: &'a ConsultaPadron,
  ) -> impl Future<Output = Result<Vec<Beneficiario>, Self::Error>> + Send + 'a;

  /// Partial update. Fails on an INACTIVO record.
  fn actualizar_beneficiario<'a>(
    &'a self,
    cedula: &'a str,
    cambios: CambiosBeneficiario,
  ) -> impl Future<Output = Result<Beneficiario, Self::Error>> + Send + 'a;

  /// Lifecycle transition: deactivation stands in for deletion, and
  /// reactivation is only possible through here.
  fn cambiar_estatus<'a>(
    &'a self,
    cedula: &'a str,
    estatus: Estatus,
  ) -> impl Future<Output = Result<Beneficiario, Self::Error>> + Send + 'a;

  // ── Dependientes ──────────────────────────────────────────────────────

  /// Persist a validated dependent. The owning beneficiary must exist.
  fn crear_dependiente(
    &self,
    alta: AltaDependiente,
  ) -> impl Future<Output = Result<Dependiente, Self::Error>> + Send + '_;

  fn buscar_dependiente<'a>(
    &'a self,
    cedula: &'a str,
  ) -> impl Future<Output = Result<Option<Dependiente>, Self::Error>> + Send + 'a;

  /// The dependent joined with the owner's address and contact.
  fn ficha_dependiente<'a>(
    &'a self,
    cedula: &'a str,
  ) -> impl Future<Output = Result<Option<FichaDependiente>, Self::Error>> + Send + 'a;

  /// List dependents, optionally restricted to one household.
  fn listar_dependientes<'a>(
    &'a self,
    cedula_beneficiario: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<Dependiente>, Self::Error>> + Send + 'a;

  fn actualizar_dependiente<'a>(
    &'a self,
    cedula: &'a str,
    cambios: CambiosDependiente,
  ) -> impl Future<Output = Result<Dependiente, Self::Error>> + Send + 'a;

  /// Physical delete; dependents are removed independently of their
  /// beneficiary.
  fn eliminar_dependiente<'a>(
    &'a self,
    cedula: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Calles ────────────────────────────────────────────────────────────

  fn listar_calles(
    &self,
  ) -> impl Future<Output = Result<Vec<Calle>, Self::Error>> + Send + '_;

  /// Register a street; the key is store-assigned.
  fn agregar_calle(
    &self,
    nom_calle: String,
  ) -> impl Future<Output = Result<Calle, Self::Error>> + Send + '_;

  // ── Beneficios — append-only writes ───────────────────────────────────

  /// Record a delivered benefit. The `id` is assigned by the store.
  fn registrar_beneficio(
    &self,
    nuevo: NuevoBeneficio,
  ) -> impl Future<Output = Result<BeneficioRecibido, Self::Error>> + Send + '_;

  /// List benefit records, optionally restricted to one beneficiary.
  fn listar_beneficios<'a>(
    &'a self,
    cedula_beneficiario: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<BeneficioRecibido>, Self::Error>> + Send + 'a;

  // ── Read model ────────────────────────────────────────────────────────

  /// Materialise the household snapshot the report engine consumes,
  /// optionally filtered by beneficiary estatus.
  fn hogares(
    &self,
    estatus: Option<Estatus>,
  ) -> impl Future<Output = Result<Vec<Hogar>, Self::Error>> + Send + '_;
}
