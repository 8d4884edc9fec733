//! In-memory backend for the SISCLAP registry.
//!
//! A single-writer store behind an async `RwLock`: mutations take the write
//! lock, readers work over a snapshot and re-fetch after a mutation. There
//! is no optimistic concurrency and no transaction isolation — the model the
//! API layer is written against.
//!
//! Used as the deterministic fixture backend in tests and, pre-seeded, as
//! the simulated registry behind `server --en-memoria`.

use std::{collections::BTreeMap, sync::Arc};

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use sisclap_core::{
  Error, Result,
  beneficiario::{AltaBeneficiario, Beneficiario, CambiosBeneficiario, Estatus},
  beneficio::{BeneficioRecibido, NuevoBeneficio},
  calle::{Calle, Direccion},
  dependiente::{AltaDependiente, CambiosDependiente, Dependiente, FichaDependiente},
  hogar::Hogar,
  store::{ConsultaPadron, PadronStore},
};

mod semilla;


// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Registro {
  beneficiarios: BTreeMap<String, Beneficiario>,
  dependientes:  BTreeMap<String, Dependiente>,
  calles:        BTreeMap<i64, Calle>,
  beneficios:    Vec<BeneficioRecibido>,
  proximo_id_calle: i64,
}

/// An in-memory SISCLAP registry.
///
/// Cloning is cheap — the inner state is reference-counted and shared.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
  registro: Arc<RwLock<Registro>>,
}

impl MemStore {
  /// An empty registry.
  pub fn new() -> Self { Self::default() }

  /// A registry pre-seeded with a small community: three streets, four
  /// households, dependents, and benefit history.
  pub fn precargado() -> Self {
    Self { registro: Arc::new(RwLock::new(semilla::registro())) }
  }
}

fn coincide_texto(b: &Beneficiario, texto: &str) -> bool {
  let aguja = texto.to_lowercase();
  b.cedula.starts_with(texto) || b.nombre_completo.to_lowercase().contains(&aguja)
}

// ─── PadronStore impl ────────────────────────────────────────────────────────

impl PadronStore for MemStore {
  type Error = Error;

  // ── Beneficiarios ─────────────────────────────────────────────────────

  async fn crear_beneficiario(&self, alta: AltaBeneficiario) -> Result<Beneficiario> {
    let mut registro = self.registro.write().await;

    if registro.beneficiarios.contains_key(&alta.cedula) {
      return Err(Error::CedulaDuplicada(alta.cedula));
    }
    if !registro.calles.contains_key(&alta.id_calle) {
      return Err(Error::CalleNoEncontrada(alta.id_calle));
    }

    let beneficiario = Beneficiario {
      cedula:             alta.cedula,
      nombre_completo:    alta.nombre_completo,
      fecha_nacimiento:   alta.fecha_nacimiento,
      genero:             alta.genero,
      estado_civil:       alta.estado_civil,
      nivel_educativo:    alta.nivel_educativo,
      profesion:          alta.profesion,
      enfermedad_cronica: alta.enfermedad_cronica,
      discapacidad:       alta.discapacidad,
      telefono:           alta.telefono,
      id_calle:           alta.id_calle,
      numero_casa:        alta.numero_casa,
      estatus:            Estatus::Activo,
      registrado_en:      Utc::now(),
    };
    registro
      .beneficiarios
      .insert(beneficiario.cedula.clone(), beneficiario.clone());
    Ok(beneficiario)
  }

  async fn buscar_beneficiario(&self, cedula: &str) -> Result<Option<Beneficiario>> {
    let registro = self.registro.read().await;
    Ok(registro.beneficiarios.get(cedula).cloned())
  }

  async fn listar_beneficiarios(
    &self,
    estatus: Option<Estatus>,
  ) -> Result<Vec<Beneficiario>> {
    let registro = self.registro.read().await;
    Ok(
      registro
        .beneficiarios
        .values()
        .filter(|b| estatus.is_none_or(|e| b.estatus == e))
        .cloned()
        .collect(),
    )
  }

  async fn buscar(&self, consulta: &ConsultaPadron) -> Result<Vec<Beneficiario>> {
    let registro = self.registro.read().await;
    let filtrados = registro
      .beneficiarios
      .values()
      .filter(|b| consulta.texto.as_deref().is_none_or(|t| coincide_texto(b, t)))
      .filter(|b| consulta.estatus.is_none_or(|e| b.estatus == e))
      .filter(|b| consulta.id_calle.is_none_or(|c| b.id_calle == c))
      .skip(consulta.offset.unwrap_or(0))
      .take(consulta.limit.unwrap_or(usize::MAX))
      .cloned()
      .collect();
    Ok(filtrados)
  }

  async fn actualizar_beneficiario(
    &self,
    cedula: &str,
    cambios: CambiosBeneficiario,
  ) -> Result<Beneficiario> {
    let mut registro = self.registro.write().await;

    if let Some(id_calle) = cambios.id_calle
      && !registro.calles.contains_key(&id_calle)
    {
      return Err(Error::CalleNoEncontrada(id_calle));
    }

    let Some(beneficiario) = registro.beneficiarios.get_mut(cedula) else {
      return Err(Error::BeneficiarioNoEncontrado(cedula.to_owned()));
    };
    if !beneficiario.editable() {
      return Err(Error::BeneficiarioInactivo(cedula.to_owned()));
    }

    cambios.aplicar(beneficiario);
    Ok(beneficiario.clone())
  }

  async fn cambiar_estatus(
    &self,
    cedula: &str,
    estatus: Estatus,
  ) -> Result<Beneficiario> {
    let mut registro = self.registro.write().await;
    let Some(beneficiario) = registro.beneficiarios.get_mut(cedula) else {
      return Err(Error::BeneficiarioNoEncontrado(cedula.to_owned()));
    };
    beneficiario.estatus = estatus;
    Ok(beneficiario.clone())
  }

  // ── Dependientes ──────────────────────────────────────────────────────

  async fn crear_dependiente(&self, alta: AltaDependiente) -> Result<Dependiente> {
    let mut registro = self.registro.write().await;

    if registro.dependientes.contains_key(&alta.cedula) {
      return Err(Error::CedulaDuplicada(alta.cedula));
    }
    if !registro.beneficiarios.contains_key(&alta.cedula_beneficiario) {
      return Err(Error::BeneficiarioNoEncontrado(alta.cedula_beneficiario));
    }

    let dependiente = Dependiente {
      cedula:              alta.cedula,
      cedula_beneficiario: alta.cedula_beneficiario,
      parentesco:          alta.parentesco,
      nombre_completo:     alta.nombre_completo,
      fecha_nacimiento:    alta.fecha_nacimiento,
      genero:              alta.genero,
      estado_civil:        alta.estado_civil,
      nivel_educativo:     alta.nivel_educativo,
      profesion:           alta.profesion,
      enfermedad_cronica:  alta.enfermedad_cronica,
      discapacidad:        alta.discapacidad,
      telefono:            alta.telefono,
      registrado_en:       Utc::now(),
    };
    registro
      .dependientes
      .insert(dependiente.cedula.clone(), dependiente.clone());
    Ok(dependiente)
  }

  async fn buscar_dependiente(&self, cedula: &str) -> Result<Option<Dependiente>> {
    let registro = self.registro.read().await;
    Ok(registro.dependientes.get(cedula).cloned())
  }

  async fn ficha_dependiente(&self, cedula: &str) -> Result<Option<FichaDependiente>> {
    let registro = self.registro.read().await;

    let Some(dependiente) = registro.dependientes.get(cedula) else {
      return Ok(None);
    };
    let Some(titular) = registro.beneficiarios.get(&dependiente.cedula_beneficiario)
    else {
      return Err(Error::BeneficiarioNoEncontrado(
        dependiente.cedula_beneficiario.clone(),
      ));
    };
    let Some(calle) = registro.calles.get(&titular.id_calle) else {
      return Err(Error::CalleNoEncontrada(titular.id_calle));
    };

    Ok(Some(FichaDependiente {
      dependiente: dependiente.clone(),
      direccion: Direccion {
        calle:       calle.clone(),
        numero_casa: titular.numero_casa.clone(),
      },
      telefono_beneficiario: titular.telefono.clone(),
    }))
  }

  async fn listar_dependientes(
    &self,
    cedula_beneficiario: Option<&str>,
  ) -> Result<Vec<Dependiente>> {
    let registro = self.registro.read().await;
    Ok(
      registro
        .dependientes
        .values()
        .filter(|d| {
          cedula_beneficiario.is_none_or(|c| d.cedula_beneficiario == c)
        })
        .cloned()
        .collect(),
    )
  }

  async fn actualizar_dependiente(
    &self,
    cedula: &str,
    cambios: CambiosDependiente,
  ) -> Result<Dependiente> {
    let mut registro = self.registro.write().await;
    let Some(dependiente) = registro.dependientes.get_mut(cedula) else {
      return Err(Error::DependienteNoEncontrado(cedula.to_owned()));
    };
    cambios.aplicar(dependiente);
    Ok(dependiente.clone())
  }

  async fn eliminar_dependiente(&self, cedula: &str) -> Result<()> {
    let mut registro = self.registro.write().await;
    match registro.dependientes.remove(cedula) {
      Some(_) => Ok(()),
      None => Err(Error::DependienteNoEncontrado(cedula.to_owned())),
    }
  }

  // ── Calles ────────────────────────────────────────────────────────────

  async fn listar_calles(&self) -> Result<Vec<Calle>> {
    let registro = self.registro.read().await;
    Ok(registro.calles.values().cloned().collect())
  }

  async fn agregar_calle(&self, nom_calle: String) -> Result<Calle> {
    let mut registro = self.registro.write().await;
    registro.proximo_id_calle += 1;
    let calle = Calle { id_calle: registro.proximo_id_calle, nom_calle };
    registro.calles.insert(calle.id_calle, calle.clone());
    Ok(calle)
  }

  // ── Beneficios — append-only writes ───────────────────────────────────

  async fn registrar_beneficio(
    &self,
    nuevo: NuevoBeneficio,
  ) -> Result<BeneficioRecibido> {
    let mut registro = self.registro.write().await;

    if !registro.beneficiarios.contains_key(&nuevo.cedula_beneficiario) {
      return Err(Error::BeneficiarioNoEncontrado(nuevo.cedula_beneficiario));
    }

    let beneficio = BeneficioRecibido {
      id:                  Uuid::new_v4(),
      cedula_beneficiario: nuevo.cedula_beneficiario,
      tipo:                nuevo.tipo,
      descripcion:         nuevo.descripcion,
      fecha:               nuevo.fecha,
      cantidad:            nuevo.cantidad,
    };
    registro.beneficios.push(beneficio.clone());
    Ok(beneficio)
  }

  async fn listar_beneficios(
    &self,
    cedula_beneficiario: Option<&str>,
  ) -> Result<Vec<BeneficioRecibido>> {
    let registro = self.registro.read().await;
    Ok(
      registro
        .beneficios
        .iter()
        .filter(|b| {
          cedula_beneficiario.is_none_or(|c| b.cedula_beneficiario == c)
        })
        .cloned()
        .collect(),
    )
  }

  // ── Read model ────────────────────────────────────────────────────────

  async fn hogares(&self, estatus: Option<Estatus>) -> Result<Vec<Hogar>> {
    let registro = self.registro.read().await;

    registro
      .beneficiarios
      .values()
      .filter(|b| estatus.is_none_or(|e| b.estatus == e))
      .map(|b| {
        let Some(calle) = registro.calles.get(&b.id_calle) else {
          return Err(Error::CalleNoEncontrada(b.id_calle));
        };
        let dependientes = registro
          .dependientes
          .values()
          .filter(|d| d.cedula_beneficiario == b.cedula)
          .cloned()
          .collect();
        let beneficios = registro
          .beneficios
          .iter()
          .filter(|x| x.cedula_beneficiario == b.cedula)
          .cloned()
          .collect();
        Ok(Hogar {
          beneficiario: b.clone(),
          calle: calle.clone(),
          dependientes,
          beneficios,
        })
      })
      .collect()
  }
}
