//! JSON REST API for the SISCLAP registry.
//!
//! Exposes an axum [`Router`] backed by any
//! [`sisclap_core::store::PadronStore`]. Every endpoint answers with the
//! `{ success, data, error, message }` envelope. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", sisclap_api::api_router(store.clone()))
//! ```

pub mod beneficiarios;
pub mod calles;
pub mod dependientes;
pub mod error;
pub mod reportes;
pub mod respuesta;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use sisclap_core::store::PadronStore;

pub use error::ApiError;
pub use respuesta::Respuesta;

// ─── Configuration ────────────────────────────────────────────────────────────

fn host_por_defecto() -> String { "127.0.0.1".to_owned() }
fn puerto_por_defecto() -> u16 { 3000 }
fn ruta_por_defecto() -> PathBuf { PathBuf::from("sisclap.db") }

/// Runtime server configuration, deserialised from `config.toml` with
/// `SISCLAP_`-prefixed environment overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "host_por_defecto")]
  pub host:       String,
  #[serde(default = "puerto_por_defecto")]
  pub port:       u16,
  /// SQLite file; ignored when serving the in-memory registry.
  #[serde(default = "ruta_por_defecto")]
  pub store_path: PathBuf,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PadronStore + 'static,
{
  Router::new()
    // Beneficiarios
    .route(
      "/beneficiarios",
      get(beneficiarios::listar::<S>).post(beneficiarios::crear::<S>),
    )
    .route(
      "/beneficiarios/{cedula}",
      get(beneficiarios::obtener::<S>)
        .put(beneficiarios::actualizar::<S>)
        .delete(beneficiarios::desactivar::<S>),
    )
    .route(
      "/beneficiarios/{cedula}/estatus",
      post(beneficiarios::cambiar_estatus::<S>),
    )
    .route(
      "/beneficiarios/{cedula}/beneficios",
      get(beneficiarios::listar_beneficios::<S>)
        .post(beneficiarios::registrar_beneficio::<S>),
    )
    // Dependientes
    .route(
      "/dependientes",
      get(dependientes::listar::<S>).post(dependientes::crear::<S>),
    )
    .route(
      "/dependientes/{cedula}",
      get(dependientes::obtener::<S>)
        .put(dependientes::actualizar::<S>)
        .delete(dependientes::eliminar::<S>),
    )
    // Calles
    .route("/calles", get(calles::listar::<S>).post(calles::crear::<S>))
    // Reportes
    .route("/reportes/{tipo}", get(reportes::generar::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use sisclap_store_mem::MemStore;

  /// A router over an empty in-memory registry with one street, returning
  /// the street id alongside.
  async fn app_con_calle() -> (Router, i64) {
    use sisclap_core::store::PadronStore as _;
    let store = MemStore::new();
    let calle = store.agregar_calle("Calle Uno".to_owned()).await.unwrap();
    (api_router(Arc::new(store)), calle.id_calle)
  }

  async fn pedir(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
  }

  fn cuerpo_beneficiario(cedula: &str, id_calle: i64) -> Value {
    json!({
      "cedula": cedula,
      "nombre_completo": "María Pérez",
      "fecha_nacimiento": "1985-04-12",
      "genero": "Femenino",
      "estado_civil": "Casado",
      "nivel_educativo": "Universitario",
      "profesion": "Docente",
      "telefono": "0414-123-4567",
      "id_calle": id_calle,
      "numero_casa": "45-B"
    })
  }

  fn cuerpo_dependiente(cedula: &str, titular: &str) -> Value {
    json!({
      "cedula": cedula,
      "cedula_beneficiario": titular,
      "parentesco": "Hija",
      "nombre_completo": "Ana Pérez",
      "fecha_nacimiento": "2012-09-01",
      "genero": "Femenino",
      "estado_civil": "Soltero",
      "nivel_educativo": "Primaria",
      "profesion": "Estudiante",
      "telefono": "04241234567"
    })
  }

  // ── Beneficiarios ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn crear_beneficiario_devuelve_201_con_envoltura() {
    let (app, id_calle) = app_con_calle().await;

    let (status, json) = pedir(
      app,
      "POST",
      "/beneficiarios",
      Some(cuerpo_beneficiario("12345678", id_calle)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["cedula"], "12345678");
    assert_eq!(json["data"]["estatus"], "ACTIVO");
    // The phone is stored normalised.
    assert_eq!(json["data"]["telefono"], "04141234567");
    assert_eq!(json["message"], "Beneficiario registrado");
  }

  #[tokio::test]
  async fn crear_invalido_devuelve_422_con_mapa_de_campos() {
    let (app, id_calle) = app_con_calle().await;

    let mut cuerpo = cuerpo_beneficiario("12345678", id_calle);
    cuerpo["cedula"] = json!("12AB");
    cuerpo["telefono"] = json!("555");

    let (status, json) = pedir(app, "POST", "/beneficiarios", Some(cuerpo)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["success"], false);
    assert!(json["data"]["cedula"].is_array());
    assert!(json["data"]["telefono"].is_array());
    assert!(json["data"].get("nombre_completo").is_none());
  }

  #[tokio::test]
  async fn crear_duplicado_devuelve_409() {
    let (app, id_calle) = app_con_calle().await;

    let (status, _) = pedir(
      app.clone(),
      "POST",
      "/beneficiarios",
      Some(cuerpo_beneficiario("12345678", id_calle)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = pedir(
      app,
      "POST",
      "/beneficiarios",
      Some(cuerpo_beneficiario("12345678", id_calle)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["success"], false);
  }

  #[tokio::test]
  async fn obtener_inexistente_devuelve_404_con_envoltura() {
    let (app, _) = app_con_calle().await;

    let (status, json) = pedir(app, "GET", "/beneficiarios/99999999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("99999999"));
  }

  #[tokio::test]
  async fn listar_filtra_por_estatus_y_busca_por_texto() {
    let (app, id_calle) = app_con_calle().await;

    pedir(app.clone(), "POST", "/beneficiarios", Some(cuerpo_beneficiario("11111111", id_calle))).await;
    pedir(app.clone(), "POST", "/beneficiarios", Some(cuerpo_beneficiario("22222222", id_calle))).await;
    pedir(app.clone(), "DELETE", "/beneficiarios/22222222", None).await;

    let (status, json) = pedir(app.clone(), "GET", "/beneficiarios", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let (_, json) = pedir(app.clone(), "GET", "/beneficiarios?estatus=ACTIVO", None).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["cedula"], "11111111");

    let (_, json) = pedir(app, "GET", "/beneficiarios?q=222", None).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["cedula"], "22222222");
  }

  #[tokio::test]
  async fn actualizar_aplica_cambios_parciales() {
    let (app, id_calle) = app_con_calle().await;
    pedir(app.clone(), "POST", "/beneficiarios", Some(cuerpo_beneficiario("12345678", id_calle))).await;

    let (status, json) = pedir(
      app,
      "PUT",
      "/beneficiarios/12345678",
      Some(json!({ "profesion": "Bibliotecaria" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["profesion"], "Bibliotecaria");
    assert_eq!(json["data"]["nombre_completo"], "María Pérez");
  }

  #[tokio::test]
  async fn actualizar_con_calle_desconocida_devuelve_404() {
    let (app, id_calle) = app_con_calle().await;
    pedir(app.clone(), "POST", "/beneficiarios", Some(cuerpo_beneficiario("12345678", id_calle))).await;

    let (status, json) = pedir(
      app,
      "PUT",
      "/beneficiarios/12345678",
      Some(json!({ "id_calle": 404 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("404"));
  }

  #[tokio::test]
  async fn eliminar_desactiva_y_bloquea_la_edicion() {
    let (app, id_calle) = app_con_calle().await;
    pedir(app.clone(), "POST", "/beneficiarios", Some(cuerpo_beneficiario("12345678", id_calle))).await;

    let (status, json) = pedir(app.clone(), "DELETE", "/beneficiarios/12345678", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["estatus"], "INACTIVO");

    // The record survives deactivation.
    let (status, json) = pedir(app.clone(), "GET", "/beneficiarios/12345678", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["estatus"], "INACTIVO");

    // Standard edits are frozen.
    let (status, _) = pedir(
      app.clone(),
      "PUT",
      "/beneficiarios/12345678",
      Some(json!({ "profesion": "Otra" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Reactivation reopens them.
    let (status, json) = pedir(
      app.clone(),
      "POST",
      "/beneficiarios/12345678/estatus",
      Some(json!({ "estatus": "ACTIVO" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["estatus"], "ACTIVO");

    let (status, _) = pedir(
      app,
      "PUT",
      "/beneficiarios/12345678",
      Some(json!({ "profesion": "Otra" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
  }

  // ── Dependientes ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn dependiente_requiere_titular_existente() {
    let (app, _) = app_con_calle().await;

    let (status, json) = pedir(
      app,
      "POST",
      "/dependientes",
      Some(cuerpo_dependiente("87654321", "12345678")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
  }

  #[tokio::test]
  async fn ficha_del_dependiente_trae_la_direccion_del_titular() {
    let (app, id_calle) = app_con_calle().await;
    pedir(app.clone(), "POST", "/beneficiarios", Some(cuerpo_beneficiario("12345678", id_calle))).await;

    let (status, _) = pedir(
      app.clone(),
      "POST",
      "/dependientes",
      Some(cuerpo_dependiente("87654321", "12345678")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = pedir(app.clone(), "GET", "/dependientes/87654321", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["dependiente"]["cedula"], "87654321");
    assert_eq!(json["data"]["direccion"]["calle"]["nom_calle"], "Calle Uno");
    assert_eq!(json["data"]["direccion"]["numero_casa"], "45-B");
    assert_eq!(json["data"]["telefono_beneficiario"], "04141234567");

    // Listing by household finds it too.
    let (_, json) = pedir(
      app,
      "GET",
      "/dependientes?cedula_beneficiario=12345678",
      None,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn eliminar_dependiente_es_fisico() {
    let (app, id_calle) = app_con_calle().await;
    pedir(app.clone(), "POST", "/beneficiarios", Some(cuerpo_beneficiario("12345678", id_calle))).await;
    pedir(app.clone(), "POST", "/dependientes", Some(cuerpo_dependiente("87654321", "12345678"))).await;

    let (status, json) = pedir(app.clone(), "DELETE", "/dependientes/87654321", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Dependiente eliminado");

    let (status, _) = pedir(app, "GET", "/dependientes/87654321", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Beneficios ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn registrar_y_listar_beneficios() {
    let (app, id_calle) = app_con_calle().await;
    pedir(app.clone(), "POST", "/beneficiarios", Some(cuerpo_beneficiario("12345678", id_calle))).await;

    let (status, json) = pedir(
      app.clone(),
      "POST",
      "/beneficiarios/12345678/beneficios",
      Some(json!({
        "tipo": "Alimentario",
        "descripcion": "Bolsa CLAP",
        "fecha": "2024-06-01",
        "cantidad": 2
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["tipo"], "Alimentario");

    let (status, json) = pedir(app, "GET", "/beneficiarios/12345678/beneficios", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["cantidad"], 2);
  }

  // ── Reportes ────────────────────────────────────────────────────────────────

  /// A populated registry: two households, three dependents between them.
  async fn app_poblada() -> Router {
    let (app, id_calle) = app_con_calle().await;

    pedir(app.clone(), "POST", "/beneficiarios", Some(cuerpo_beneficiario("11111111", id_calle))).await;
    pedir(app.clone(), "POST", "/beneficiarios", Some(cuerpo_beneficiario("22222222", id_calle))).await;
    for (cedula, titular) in [
      ("30000001", "11111111"),
      ("30000002", "11111111"),
      ("30000003", "22222222"),
    ] {
      pedir(app.clone(), "POST", "/dependientes", Some(cuerpo_dependiente(cedula, titular))).await;
    }
    app
  }

  #[tokio::test]
  async fn reporte_carga_familiar_sobre_el_padron() {
    let app = app_poblada().await;

    let (status, json) = pedir(app, "GET", "/reportes/carga-familiar", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["tipo"], "carga-familiar");
    assert_eq!(json["data"]["datos"]["totalBeneficiarios"], 2);
    assert_eq!(json["data"]["datos"]["totalDependientes"], 3);
    assert_eq!(json["data"]["datos"]["promedioHijosPorFamilia"], 1.5);
  }

  #[tokio::test]
  async fn reporte_habitantes_calle_usa_los_nombres_del_contrato() {
    let app = app_poblada().await;

    let (_, json) = pedir(app, "GET", "/reportes/habitantes-calle", None).await;
    assert_eq!(json["data"]["tipo"], "habitantes-calle");
    assert_eq!(json["data"]["datos"][0]["calle"], "Calle Uno");
    assert_eq!(json["data"]["datos"][0]["habitantes"], 5);
  }

  #[tokio::test]
  async fn reporte_rango_edad_valida_sus_parametros() {
    let app = app_poblada().await;

    let (status, _) = pedir(app.clone(), "GET", "/reportes/rango-edad", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = pedir(
      app.clone(),
      "GET",
      "/reportes/rango-edad?min=40&max=18",
      None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["data"]["rango"].is_array());

    let (status, json) = pedir(app, "GET", "/reportes/rango-edad?min=0&max=120", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["tipo"], "rango-edad");
    assert_eq!(json["data"]["datos"]["rango"], "0-120");
    // Both heads of household and all three dependents match.
    assert_eq!(json["data"]["datos"]["cantidad"], 5);
  }

  #[tokio::test]
  async fn reporte_desconocido_devuelve_404() {
    let app = app_poblada().await;
    let (status, _) = pedir(app, "GET", "/reportes/no-existe", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn reporte_ventas_sobre_padron_vacio_devuelve_ceros() {
    let (app, _) = app_con_calle().await;

    let (status, json) = pedir(app, "GET", "/reportes/ventas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["tipo"], "ventas");
    assert_eq!(json["data"]["datos"]["total"], 0);
    assert_eq!(json["data"]["datos"]["ultimoMes"], 0);
  }
}
