//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;

use sisclap_core::{
  beneficiario::{
    AltaBeneficiario, CambiosBeneficiario, EstadoCivil, Estatus, Genero,
    NivelEducativo,
  },
  beneficio::{NuevoBeneficio, tipos},
  dependiente::{AltaDependiente, CambiosDependiente, Parentesco},
  store::{ConsultaPadron, PadronStore},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn dia(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).expect("fecha de prueba")
}

fn alta(cedula: &str, nombre: &str, id_calle: i64) -> AltaBeneficiario {
  AltaBeneficiario {
    cedula:             cedula.to_owned(),
    nombre_completo:    nombre.to_owned(),
    fecha_nacimiento:   dia(1982, 6, 30),
    genero:             Genero::Masculino,
    estado_civil:       EstadoCivil::Casado,
    nivel_educativo:    NivelEducativo::Tecnico,
    profesion:          "Electricista".to_owned(),
    enfermedad_cronica: "Hipertensión".to_owned(),
    discapacidad:       "Ninguna".to_owned(),
    telefono:           "04143217654".to_owned(),
    id_calle,
    numero_casa:        "7".to_owned(),
  }
}

fn alta_dependiente(cedula: &str, titular: &str) -> AltaDependiente {
  AltaDependiente {
    cedula:              cedula.to_owned(),
    cedula_beneficiario: titular.to_owned(),
    parentesco:          Parentesco::Hijo,
    nombre_completo:     "Carlos Prueba".to_owned(),
    fecha_nacimiento:    dia(2010, 3, 15),
    genero:              Genero::Masculino,
    estado_civil:        EstadoCivil::Soltero,
    nivel_educativo:     NivelEducativo::Primaria,
    profesion:           "Estudiante".to_owned(),
    enfermedad_cronica:  "Asma".to_owned(),
    discapacidad:        "Ninguna".to_owned(),
    telefono:            "04261112233".to_owned(),
  }
}

async fn store_con_calle() -> (SqliteStore, i64) {
  let s = store().await;
  let calle = s.agregar_calle("Calle Principal".to_owned()).await.unwrap();
  (s, calle.id_calle)
}

// ─── Beneficiarios ───────────────────────────────────────────────────────────

#[tokio::test]
async fn crear_y_leer_beneficiario_conserva_cada_campo() {
  let (s, id_calle) = store_con_calle().await;

  let creado = s.crear_beneficiario(alta("12345678", "Juan Prueba", id_calle)).await.unwrap();
  assert_eq!(creado.estatus, Estatus::Activo);

  let leido = s.buscar_beneficiario("12345678").await.unwrap().unwrap();
  assert_eq!(leido.cedula, "12345678");
  assert_eq!(leido.nombre_completo, "Juan Prueba");
  assert_eq!(leido.fecha_nacimiento, dia(1982, 6, 30));
  assert_eq!(leido.genero, Genero::Masculino);
  assert_eq!(leido.estado_civil, EstadoCivil::Casado);
  assert_eq!(leido.nivel_educativo, NivelEducativo::Tecnico);
  assert_eq!(leido.enfermedad_cronica, "Hipertensión");
  assert_eq!(leido.telefono, "04143217654");
  assert_eq!(leido.id_calle, id_calle);
  assert_eq!(leido.estatus, Estatus::Activo);
  assert_eq!(leido.registrado_en, creado.registrado_en);
}

#[tokio::test]
async fn buscar_inexistente_devuelve_none() {
  let s = store().await;
  assert!(s.buscar_beneficiario("99999999").await.unwrap().is_none());
}

#[tokio::test]
async fn cedula_duplicada_falla() {
  let (s, id_calle) = store_con_calle().await;
  s.crear_beneficiario(alta("12345678", "Juan", id_calle)).await.unwrap();

  let err = s
    .crear_beneficiario(alta("12345678", "Otro", id_calle))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::CedulaDuplicada(_)));
}

#[tokio::test]
async fn crear_con_calle_desconocida_falla() {
  let s = store().await;
  let err = s.crear_beneficiario(alta("12345678", "Juan", 9)).await.unwrap_err();
  assert!(matches!(err, crate::Error::CalleNoEncontrada(9)));
}

#[tokio::test]
async fn listar_filtra_por_estatus() {
  let (s, id_calle) = store_con_calle().await;
  s.crear_beneficiario(alta("11111111", "Activo", id_calle)).await.unwrap();
  s.crear_beneficiario(alta("22222222", "Baja", id_calle)).await.unwrap();
  s.cambiar_estatus("22222222", Estatus::Inactivo).await.unwrap();

  let todos = s.listar_beneficiarios(None).await.unwrap();
  assert_eq!(todos.len(), 2);

  let inactivos = s.listar_beneficiarios(Some(Estatus::Inactivo)).await.unwrap();
  assert_eq!(inactivos.len(), 1);
  assert_eq!(inactivos[0].cedula, "22222222");
}

#[tokio::test]
async fn actualizar_persiste_y_respeta_inactivos() {
  let (s, id_calle) = store_con_calle().await;
  s.crear_beneficiario(alta("12345678", "Juan", id_calle)).await.unwrap();

  let cambios = CambiosBeneficiario {
    profesion:   Some("Plomero".to_owned()),
    numero_casa: Some("7-B".to_owned()),
    ..Default::default()
  };
  s.actualizar_beneficiario("12345678", cambios).await.unwrap();

  let leido = s.buscar_beneficiario("12345678").await.unwrap().unwrap();
  assert_eq!(leido.profesion, "Plomero");
  assert_eq!(leido.numero_casa, "7-B");
  assert_eq!(leido.nombre_completo, "Juan");

  s.cambiar_estatus("12345678", Estatus::Inactivo).await.unwrap();
  let err = s
    .actualizar_beneficiario(
      "12345678",
      CambiosBeneficiario { profesion: Some("X".to_owned()), ..Default::default() },
    )
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::BeneficiarioInactivo(_)));
}

#[tokio::test]
async fn actualizar_con_calle_desconocida_falla() {
  let (s, id_calle) = store_con_calle().await;
  s.crear_beneficiario(alta("12345678", "Juan", id_calle)).await.unwrap();

  let err = s
    .actualizar_beneficiario(
      "12345678",
      CambiosBeneficiario { id_calle: Some(404), ..Default::default() },
    )
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::CalleNoEncontrada(404)));
}

#[tokio::test]
async fn cambiar_estatus_persiste_en_ambas_direcciones() {
  let (s, id_calle) = store_con_calle().await;
  s.crear_beneficiario(alta("12345678", "Juan", id_calle)).await.unwrap();

  s.cambiar_estatus("12345678", Estatus::Inactivo).await.unwrap();
  let leido = s.buscar_beneficiario("12345678").await.unwrap().unwrap();
  assert_eq!(leido.estatus, Estatus::Inactivo);

  s.cambiar_estatus("12345678", Estatus::Activo).await.unwrap();
  let leido = s.buscar_beneficiario("12345678").await.unwrap().unwrap();
  assert_eq!(leido.estatus, Estatus::Activo);
}

#[tokio::test]
async fn cambiar_estatus_de_inexistente_falla() {
  let s = store().await;
  let err = s.cambiar_estatus("99999999", Estatus::Inactivo).await.unwrap_err();
  assert!(matches!(err, crate::Error::BeneficiarioNoEncontrado(_)));
}

// ─── Búsqueda ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn busqueda_por_texto_estatus_y_calle() {
  let (s, calle_1) = store_con_calle().await;
  let calle_2 = s.agregar_calle("Calle Dos".to_owned()).await.unwrap().id_calle;

  s.crear_beneficiario(alta("11111111", "María Pérez", calle_1)).await.unwrap();
  s.crear_beneficiario(alta("22222222", "José Blanco", calle_2)).await.unwrap();
  s.crear_beneficiario(alta("11122233", "Pedro Marín", calle_1)).await.unwrap();

  // Name fragment, case-insensitive.
  let consulta = ConsultaPadron { texto: Some("pérez".to_owned()), ..Default::default() };
  let resultado = s.buscar(&consulta).await.unwrap();
  assert_eq!(resultado.len(), 1);
  assert_eq!(resultado[0].cedula, "11111111");

  // Cédula prefix.
  let consulta = ConsultaPadron { texto: Some("111".to_owned()), ..Default::default() };
  assert_eq!(s.buscar(&consulta).await.unwrap().len(), 2);

  // Street filter.
  let consulta = ConsultaPadron { id_calle: Some(calle_2), ..Default::default() };
  let resultado = s.buscar(&consulta).await.unwrap();
  assert_eq!(resultado.len(), 1);
  assert_eq!(resultado[0].cedula, "22222222");

  // Estatus filter composes with text.
  s.cambiar_estatus("11111111", Estatus::Inactivo).await.unwrap();
  let consulta = ConsultaPadron {
    texto:   Some("111".to_owned()),
    estatus: Some(Estatus::Activo),
    ..Default::default()
  };
  let resultado = s.buscar(&consulta).await.unwrap();
  assert_eq!(resultado.len(), 1);
  assert_eq!(resultado[0].cedula, "11122233");
}

#[tokio::test]
async fn busqueda_pagina_con_limit_y_offset() {
  let (s, id_calle) = store_con_calle().await;
  for i in 0..5 {
    s.crear_beneficiario(alta(&format!("1000000{i}"), "Vecino", id_calle))
      .await
      .unwrap();
  }

  let consulta = ConsultaPadron { limit: Some(2), offset: Some(2), ..Default::default() };
  let pagina = s.buscar(&consulta).await.unwrap();
  assert_eq!(pagina.len(), 2);
  assert_eq!(pagina[0].cedula, "10000002");
  assert_eq!(pagina[1].cedula, "10000003");
}

// ─── Dependientes ────────────────────────────────────────────────────────────

#[tokio::test]
async fn dependiente_requiere_titular_y_roundtrip() {
  let (s, id_calle) = store_con_calle().await;

  let err = s
    .crear_dependiente(alta_dependiente("87654321", "12345678"))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::BeneficiarioNoEncontrado(_)));

  s.crear_beneficiario(alta("12345678", "Juan", id_calle)).await.unwrap();
  s.crear_dependiente(alta_dependiente("87654321", "12345678")).await.unwrap();

  let leido = s.buscar_dependiente("87654321").await.unwrap().unwrap();
  assert_eq!(leido.parentesco, Parentesco::Hijo);
  assert_eq!(leido.enfermedad_cronica, "Asma");
  assert_eq!(leido.fecha_nacimiento, dia(2010, 3, 15));
}

#[tokio::test]
async fn ficha_dependiente_deriva_direccion_del_titular() {
  let (s, id_calle) = store_con_calle().await;
  s.crear_beneficiario(alta("12345678", "Juan", id_calle)).await.unwrap();
  s.crear_dependiente(alta_dependiente("87654321", "12345678")).await.unwrap();

  let ficha = s.ficha_dependiente("87654321").await.unwrap().unwrap();
  assert_eq!(ficha.direccion.calle.nom_calle, "Calle Principal");
  assert_eq!(ficha.direccion.numero_casa, "7");
  assert_eq!(ficha.telefono_beneficiario, "04143217654");

  assert!(s.ficha_dependiente("00000000").await.unwrap().is_none());
}

#[tokio::test]
async fn actualizar_y_eliminar_dependiente() {
  let (s, id_calle) = store_con_calle().await;
  s.crear_beneficiario(alta("12345678", "Juan", id_calle)).await.unwrap();
  s.crear_dependiente(alta_dependiente("87654321", "12345678")).await.unwrap();

  let cambios = CambiosDependiente {
    nombre_completo: Some("Carlos Actualizado".to_owned()),
    parentesco:      Some(Parentesco::Otro),
    ..Default::default()
  };
  s.actualizar_dependiente("87654321", cambios).await.unwrap();

  let leido = s.buscar_dependiente("87654321").await.unwrap().unwrap();
  assert_eq!(leido.nombre_completo, "Carlos Actualizado");
  assert_eq!(leido.parentesco, Parentesco::Otro);

  s.eliminar_dependiente("87654321").await.unwrap();
  assert!(s.buscar_dependiente("87654321").await.unwrap().is_none());

  let err = s.eliminar_dependiente("87654321").await.unwrap_err();
  assert!(matches!(err, crate::Error::DependienteNoEncontrado(_)));
}

// ─── Calles ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn calles_se_numeran_y_listan_en_orden() {
  let s = store().await;
  let a = s.agregar_calle("Calle A".to_owned()).await.unwrap();
  let b = s.agregar_calle("Calle B".to_owned()).await.unwrap();
  assert!(b.id_calle > a.id_calle);

  let calles = s.listar_calles().await.unwrap();
  assert_eq!(calles.len(), 2);
  assert_eq!(calles[0].nom_calle, "Calle A");
}

// ─── Beneficios ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn beneficio_roundtrip_incluye_cantidad_nula() {
  let (s, id_calle) = store_con_calle().await;
  s.crear_beneficiario(alta("12345678", "Juan", id_calle)).await.unwrap();

  s.registrar_beneficio(NuevoBeneficio {
    cedula_beneficiario: "12345678".to_owned(),
    tipo:                tipos::MEDICINAS.to_owned(),
    descripcion:         "Jarabe".to_owned(),
    fecha:               dia(2024, 5, 20),
    cantidad:            None,
  })
  .await
  .unwrap();
  s.registrar_beneficio(NuevoBeneficio {
    cedula_beneficiario: "12345678".to_owned(),
    tipo:                tipos::ALIMENTARIO.to_owned(),
    descripcion:         "Bolsa CLAP".to_owned(),
    fecha:               dia(2024, 6, 1),
    cantidad:            Some(2),
  })
  .await
  .unwrap();

  let beneficios = s.listar_beneficios(Some("12345678")).await.unwrap();
  assert_eq!(beneficios.len(), 2);
  // Ordered by fecha.
  assert_eq!(beneficios[0].cantidad, None);
  assert_eq!(beneficios[0].unidades(), 1);
  assert_eq!(beneficios[1].cantidad, Some(2));
  assert_eq!(beneficios[1].fecha, dia(2024, 6, 1));
}

#[tokio::test]
async fn beneficio_sin_titular_falla() {
  let s = store().await;
  let err = s
    .registrar_beneficio(NuevoBeneficio {
      cedula_beneficiario: "12345678".to_owned(),
      tipo:                tipos::OTROS.to_owned(),
      descripcion:         "x".to_owned(),
      fecha:               dia(2024, 1, 1),
      cantidad:            None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::BeneficiarioNoEncontrado(_)));
}

// ─── Read model ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn hogares_agrupa_todo_por_titular() {
  let (s, id_calle) = store_con_calle().await;
  s.crear_beneficiario(alta("12345678", "Juan", id_calle)).await.unwrap();
  s.crear_beneficiario(alta("23456789", "Ana", id_calle)).await.unwrap();
  s.crear_dependiente(alta_dependiente("87654321", "12345678")).await.unwrap();
  s.registrar_beneficio(NuevoBeneficio {
    cedula_beneficiario: "23456789".to_owned(),
    tipo:                tipos::EDUCATIVO.to_owned(),
    descripcion:         "Útiles".to_owned(),
    fecha:               dia(2024, 2, 1),
    cantidad:            Some(1),
  })
  .await
  .unwrap();

  let hogares = s.hogares(None).await.unwrap();
  assert_eq!(hogares.len(), 2);

  let de_juan = hogares
    .iter()
    .find(|h| h.beneficiario.cedula == "12345678")
    .unwrap();
  assert_eq!(de_juan.dependientes.len(), 1);
  assert!(de_juan.beneficios.is_empty());
  assert_eq!(de_juan.calle.nom_calle, "Calle Principal");

  let de_ana = hogares
    .iter()
    .find(|h| h.beneficiario.cedula == "23456789")
    .unwrap();
  assert!(de_ana.dependientes.is_empty());
  assert_eq!(de_ana.beneficios.len(), 1);
}

#[tokio::test]
async fn hogares_filtra_por_estatus() {
  let (s, id_calle) = store_con_calle().await;
  s.crear_beneficiario(alta("12345678", "Juan", id_calle)).await.unwrap();
  s.crear_beneficiario(alta("23456789", "Ana", id_calle)).await.unwrap();
  s.cambiar_estatus("12345678", Estatus::Inactivo).await.unwrap();

  let activos = s.hogares(Some(Estatus::Activo)).await.unwrap();
  assert_eq!(activos.len(), 1);
  assert_eq!(activos[0].beneficiario.cedula, "23456789");
}
