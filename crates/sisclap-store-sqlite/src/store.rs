//! [`SqliteStore`] — the SQLite implementation of [`PadronStore`].

use std::{collections::HashMap, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use sisclap_core::{
  beneficiario::{AltaBeneficiario, Beneficiario, CambiosBeneficiario, Estatus},
  beneficio::{BeneficioRecibido, NuevoBeneficio},
  calle::{Calle, Direccion},
  dependiente::{AltaDependiente, CambiosDependiente, Dependiente, FichaDependiente},
  hogar::Hogar,
  store::{ConsultaPadron, PadronStore},
};

use crate::{
  Error, Result,
  encode::{
    RawBeneficiario, RawBeneficio, RawDependiente, encode_dt, encode_fecha,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A SISCLAP registry backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Existence checks ──────────────────────────────────────────────────────

  async fn existe_beneficiario(&self, cedula: String) -> Result<bool> {
    let existe = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM beneficiarios WHERE cedula = ?1",
              rusqlite::params![cedula],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(existe)
  }

  async fn existe_dependiente(&self, cedula: String) -> Result<bool> {
    let existe = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM dependientes WHERE cedula = ?1",
              rusqlite::params![cedula],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(existe)
  }

  async fn existe_calle(&self, id_calle: i64) -> Result<bool> {
    let existe = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM calles WHERE id_calle = ?1",
              rusqlite::params![id_calle],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(existe)
  }

  // ── Row readers and writers ───────────────────────────────────────────────

  async fn leer_beneficiario(&self, cedula: String) -> Result<Option<Beneficiario>> {
    let raw: Option<RawBeneficiario> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM beneficiarios WHERE cedula = ?1",
          RawBeneficiario::COLUMNAS
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![cedula], RawBeneficiario::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawBeneficiario::into_beneficiario).transpose()
  }

  async fn leer_calle(&self, id_calle: i64) -> Result<Option<Calle>> {
    let calle = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id_calle, nom_calle FROM calles WHERE id_calle = ?1",
              rusqlite::params![id_calle],
              |row| {
                Ok(Calle { id_calle: row.get(0)?, nom_calle: row.get(1)? })
              },
            )
            .optional()?,
        )
      })
      .await?;
    Ok(calle)
  }

  /// Insert a fully-built [`Beneficiario`] row.
  async fn insertar_beneficiario(&self, b: Beneficiario) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO beneficiarios (
             cedula, nombre_completo, fecha_nacimiento, genero, estado_civil,
             nivel_educativo, profesion, enfermedad_cronica, discapacidad,
             telefono, id_calle, numero_casa, estatus, registrado_en
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
          rusqlite::params![
            b.cedula,
            b.nombre_completo,
            encode_fecha(b.fecha_nacimiento),
            b.genero.to_string(),
            b.estado_civil.to_string(),
            b.nivel_educativo.to_string(),
            b.profesion,
            b.enfermedad_cronica,
            b.discapacidad,
            b.telefono,
            b.id_calle,
            b.numero_casa,
            b.estatus.to_string(),
            encode_dt(b.registrado_en),
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Overwrite every mutable column of an existing beneficiary row.
  async fn escribir_beneficiario(&self, b: Beneficiario) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE beneficiarios SET
             nombre_completo = ?2, fecha_nacimiento = ?3, genero = ?4,
             estado_civil = ?5, nivel_educativo = ?6, profesion = ?7,
             enfermedad_cronica = ?8, discapacidad = ?9, telefono = ?10,
             id_calle = ?11, numero_casa = ?12
           WHERE cedula = ?1",
          rusqlite::params![
            b.cedula,
            b.nombre_completo,
            encode_fecha(b.fecha_nacimiento),
            b.genero.to_string(),
            b.estado_civil.to_string(),
            b.nivel_educativo.to_string(),
            b.profesion,
            b.enfermedad_cronica,
            b.discapacidad,
            b.telefono,
            b.id_calle,
            b.numero_casa,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn leer_dependiente(&self, cedula: String) -> Result<Option<Dependiente>> {
    let raw: Option<RawDependiente> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM dependientes WHERE cedula = ?1",
          RawDependiente::COLUMNAS
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![cedula], RawDependiente::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDependiente::into_dependiente).transpose()
  }

  /// Overwrite every mutable column of an existing dependent row.
  async fn escribir_dependiente(&self, d: Dependiente) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE dependientes SET
             parentesco = ?2, nombre_completo = ?3, fecha_nacimiento = ?4,
             genero = ?5, estado_civil = ?6, nivel_educativo = ?7,
             profesion = ?8, enfermedad_cronica = ?9, discapacidad = ?10,
             telefono = ?11
           WHERE cedula = ?1",
          rusqlite::params![
            d.cedula,
            d.parentesco.to_string(),
            d.nombre_completo,
            encode_fecha(d.fecha_nacimiento),
            d.genero.to_string(),
            d.estado_civil.to_string(),
            d.nivel_educativo.to_string(),
            d.profesion,
            d.enfermedad_cronica,
            d.discapacidad,
            d.telefono,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PadronStore impl ────────────────────────────────────────────────────────

impl PadronStore for SqliteStore {
  type Error = Error;

  // ── Beneficiarios ─────────────────────────────────────────────────────────

  async fn crear_beneficiario(&self, alta: AltaBeneficiario) -> Result<Beneficiario> {
    if self.existe_beneficiario(alta.cedula.clone()).await? {
      return Err(Error::CedulaDuplicada(alta.cedula));
    }
    if !self.existe_calle(alta.id_calle).await? {
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

    self.insertar_beneficiario(beneficiario.clone()).await?;
    Ok(beneficiario)
  }

  async fn buscar_beneficiario(&self, cedula: &str) -> Result<Option<Beneficiario>> {
    self.leer_beneficiario(cedula.to_owned()).await
  }

  async fn listar_beneficiarios(
    &self,
    estatus: Option<Estatus>,
  ) -> Result<Vec<Beneficiario>> {
    let estatus_str = estatus.map(|e| e.to_string());

    let raws: Vec<RawBeneficiario> = self
      .conn
      .call(move |conn| {
        let sql = match &estatus_str {
          Some(_) => format!(
            "SELECT {} FROM beneficiarios WHERE estatus = ?1 ORDER BY cedula",
            RawBeneficiario::COLUMNAS
          ),
          None => format!(
            "SELECT {} FROM beneficiarios ORDER BY cedula",
            RawBeneficiario::COLUMNAS
          ),
        };
        let mut stmt = conn.prepare(&sql)?;
        let rows = match estatus_str {
          Some(e) => stmt
            .query_map(rusqlite::params![e], RawBeneficiario::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawBeneficiario::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBeneficiario::into_beneficiario).collect()
  }

  async fn buscar(&self, consulta: &ConsultaPadron) -> Result<Vec<Beneficiario>> {
    // Free text matches a cédula prefix or a name fragment.
    let nombre_patron = consulta
      .texto
      .as_deref()
      .map(|t| format!("%{}%", t.to_lowercase()));
    let cedula_prefijo = consulta.texto.as_deref().map(|t| format!("{t}%"));
    let estatus_str = consulta.estatus.map(|e| e.to_string());
    let id_calle = consulta.id_calle;
    let limit_val = consulta.limit.unwrap_or(100) as i64;
    let offset_val = consulta.offset.unwrap_or(0) as i64;

    let raws: Vec<RawBeneficiario> = self
      .conn
      .call(move |conn| {
        let mut conds: Vec<&'static str> = vec![];
        if nombre_patron.is_some() {
          conds.push("(LOWER(nombre_completo) LIKE ?1 OR cedula LIKE ?2)");
        }
        if estatus_str.is_some() {
          conds.push("estatus = ?3");
        }
        if id_calle.is_some() {
          conds.push("id_calle = ?4");
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT {} FROM beneficiarios {where_clause} \
           ORDER BY cedula LIMIT ?5 OFFSET ?6",
          RawBeneficiario::COLUMNAS
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              nombre_patron.as_deref(),
              cedula_prefijo.as_deref(),
              estatus_str.as_deref(),
              id_calle,
              limit_val,
              offset_val,
            ],
            RawBeneficiario::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBeneficiario::into_beneficiario).collect()
  }

  async fn actualizar_beneficiario(
    &self,
    cedula: &str,
    cambios: CambiosBeneficiario,
  ) -> Result<Beneficiario> {
    if let Some(id_calle) = cambios.id_calle
      && !self.existe_calle(id_calle).await?
    {
      return Err(Error::CalleNoEncontrada(id_calle));
    }

    let Some(mut beneficiario) = self.leer_beneficiario(cedula.to_owned()).await?
    else {
      return Err(Error::BeneficiarioNoEncontrado(cedula.to_owned()));
    };
    if !beneficiario.editable() {
      return Err(Error::BeneficiarioInactivo(cedula.to_owned()));
    }

    cambios.aplicar(&mut beneficiario);
    self.escribir_beneficiario(beneficiario.clone()).await?;
    Ok(beneficiario)
  }

  async fn cambiar_estatus(
    &self,
    cedula: &str,
    estatus: Estatus,
  ) -> Result<Beneficiario> {
    let Some(mut beneficiario) = self.leer_beneficiario(cedula.to_owned()).await?
    else {
      return Err(Error::BeneficiarioNoEncontrado(cedula.to_owned()));
    };

    beneficiario.estatus = estatus;
    let cedula_owned = beneficiario.cedula.clone();
    let estatus_str = estatus.to_string();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE beneficiarios SET estatus = ?2 WHERE cedula = ?1",
          rusqlite::params![cedula_owned, estatus_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(beneficiario)
  }

  // ── Dependientes ──────────────────────────────────────────────────────────

  async fn crear_dependiente(&self, alta: AltaDependiente) -> Result<Dependiente> {
    if self.existe_dependiente(alta.cedula.clone()).await? {
      return Err(Error::CedulaDuplicada(alta.cedula));
    }
    if !self.existe_beneficiario(alta.cedula_beneficiario.clone()).await? {
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

    let d = dependiente.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO dependientes (
             cedula, cedula_beneficiario, parentesco, nombre_completo,
             fecha_nacimiento, genero, estado_civil, nivel_educativo,
             profesion, enfermedad_cronica, discapacidad, telefono,
             registrado_en
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          rusqlite::params![
            d.cedula,
            d.cedula_beneficiario,
            d.parentesco.to_string(),
            d.nombre_completo,
            encode_fecha(d.fecha_nacimiento),
            d.genero.to_string(),
            d.estado_civil.to_string(),
            d.nivel_educativo.to_string(),
            d.profesion,
            d.enfermedad_cronica,
            d.discapacidad,
            d.telefono,
            encode_dt(d.registrado_en),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(dependiente)
  }

  async fn buscar_dependiente(&self, cedula: &str) -> Result<Option<Dependiente>> {
    self.leer_dependiente(cedula.to_owned()).await
  }

  async fn ficha_dependiente(&self, cedula: &str) -> Result<Option<FichaDependiente>> {
    let Some(dependiente) = self.leer_dependiente(cedula.to_owned()).await? else {
      return Ok(None);
    };

    let Some(titular) = self
      .leer_beneficiario(dependiente.cedula_beneficiario.clone())
      .await?
    else {
      return Err(Error::BeneficiarioNoEncontrado(
        dependiente.cedula_beneficiario,
      ));
    };
    let Some(calle) = self.leer_calle(titular.id_calle).await? else {
      return Err(Error::CalleNoEncontrada(titular.id_calle));
    };

    Ok(Some(FichaDependiente {
      dependiente,
      direccion: Direccion { calle, numero_casa: titular.numero_casa.clone() },
      telefono_beneficiario: titular.telefono,
    }))
  }

  async fn listar_dependientes(
    &self,
    cedula_beneficiario: Option<&str>,
  ) -> Result<Vec<Dependiente>> {
    let titular = cedula_beneficiario.map(str::to_owned);

    let raws: Vec<RawDependiente> = self
      .conn
      .call(move |conn| {
        let sql = match &titular {
          Some(_) => format!(
            "SELECT {} FROM dependientes WHERE cedula_beneficiario = ?1 \
             ORDER BY cedula",
            RawDependiente::COLUMNAS
          ),
          None => format!(
            "SELECT {} FROM dependientes ORDER BY cedula",
            RawDependiente::COLUMNAS
          ),
        };
        let mut stmt = conn.prepare(&sql)?;
        let rows = match titular {
          Some(c) => stmt
            .query_map(rusqlite::params![c], RawDependiente::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawDependiente::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDependiente::into_dependiente).collect()
  }

  async fn actualizar_dependiente(
    &self,
    cedula: &str,
    cambios: CambiosDependiente,
  ) -> Result<Dependiente> {
    let Some(mut dependiente) = self.leer_dependiente(cedula.to_owned()).await?
    else {
      return Err(Error::DependienteNoEncontrado(cedula.to_owned()));
    };

    cambios.aplicar(&mut dependiente);
    self.escribir_dependiente(dependiente.clone()).await?;
    Ok(dependiente)
  }

  async fn eliminar_dependiente(&self, cedula: &str) -> Result<()> {
    let cedula_owned = cedula.to_owned();
    let borrados = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM dependientes WHERE cedula = ?1",
          rusqlite::params![cedula_owned],
        )?)
      })
      .await?;

    if borrados == 0 {
      return Err(Error::DependienteNoEncontrado(cedula.to_owned()));
    }
    Ok(())
  }

  // ── Calles ────────────────────────────────────────────────────────────────

  async fn listar_calles(&self) -> Result<Vec<Calle>> {
    let calles = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT id_calle, nom_calle FROM calles ORDER BY id_calle")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Calle { id_calle: row.get(0)?, nom_calle: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(calles)
  }

  async fn agregar_calle(&self, nom_calle: String) -> Result<Calle> {
    let calle = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO calles (nom_calle) VALUES (?1)",
          rusqlite::params![nom_calle],
        )?;
        Ok(Calle { id_calle: conn.last_insert_rowid(), nom_calle })
      })
      .await?;
    Ok(calle)
  }

  // ── Beneficios — append-only writes ───────────────────────────────────────

  async fn registrar_beneficio(
    &self,
    nuevo: NuevoBeneficio,
  ) -> Result<BeneficioRecibido> {
    if !self.existe_beneficiario(nuevo.cedula_beneficiario.clone()).await? {
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

    let b = beneficio.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO beneficios (
             id, cedula_beneficiario, tipo, descripcion, fecha, cantidad
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            encode_uuid(b.id),
            b.cedula_beneficiario,
            b.tipo,
            b.descripcion,
            encode_fecha(b.fecha),
            b.cantidad,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(beneficio)
  }

  async fn listar_beneficios(
    &self,
    cedula_beneficiario: Option<&str>,
  ) -> Result<Vec<BeneficioRecibido>> {
    let titular = cedula_beneficiario.map(str::to_owned);

    let raws: Vec<RawBeneficio> = self
      .conn
      .call(move |conn| {
        let sql = match &titular {
          Some(_) => format!(
            "SELECT {} FROM beneficios WHERE cedula_beneficiario = ?1 \
             ORDER BY fecha",
            RawBeneficio::COLUMNAS
          ),
          None => {
            format!("SELECT {} FROM beneficios ORDER BY fecha", RawBeneficio::COLUMNAS)
          }
        };
        let mut stmt = conn.prepare(&sql)?;
        let rows = match titular {
          Some(c) => stmt
            .query_map(rusqlite::params![c], RawBeneficio::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawBeneficio::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBeneficio::into_beneficio).collect()
  }

  // ── Read model ────────────────────────────────────────────────────────────

  async fn hogares(&self, estatus: Option<Estatus>) -> Result<Vec<Hogar>> {
    let beneficiarios = self.listar_beneficiarios(estatus).await?;
    let calles: HashMap<i64, Calle> = self
      .listar_calles()
      .await?
      .into_iter()
      .map(|c| (c.id_calle, c))
      .collect();

    let mut dependientes: HashMap<String, Vec<Dependiente>> = HashMap::new();
    for d in self.listar_dependientes(None).await? {
      dependientes
        .entry(d.cedula_beneficiario.clone())
        .or_default()
        .push(d);
    }

    let mut beneficios: HashMap<String, Vec<BeneficioRecibido>> = HashMap::new();
    for b in self.listar_beneficios(None).await? {
      beneficios
        .entry(b.cedula_beneficiario.clone())
        .or_default()
        .push(b);
    }

    beneficiarios
      .into_iter()
      .map(|b| {
        let Some(calle) = calles.get(&b.id_calle) else {
          return Err(Error::CalleNoEncontrada(b.id_calle));
        };
        Ok(Hogar {
          calle:        calle.clone(),
          dependientes: dependientes.remove(&b.cedula).unwrap_or_default(),
          beneficios:   beneficios.remove(&b.cedula).unwrap_or_default(),
          beneficiario: b,
        })
      })
      .collect()
  }
}
