//! Seed data for the pre-loaded registry: the simulated community served by
//! `server --en-memoria` and reused as a fixture where convenient.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, Utc};
use uuid::Uuid;

use sisclap_core::{
  beneficiario::{Beneficiario, EstadoCivil, Estatus, Genero, NivelEducativo},
  beneficio::{BeneficioRecibido, tipos},
  calle::Calle,
  dependiente::{Dependiente, Parentesco},
};

use crate::Registro;

fn dia(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

#[allow(clippy::too_many_arguments)]
fn titular(
  cedula: &str,
  nombre: &str,
  nacimiento: NaiveDate,
  genero: Genero,
  estado_civil: EstadoCivil,
  profesion: &str,
  telefono: &str,
  id_calle: i64,
  numero_casa: &str,
  estatus: Estatus,
) -> Beneficiario {
  Beneficiario {
    cedula:             cedula.to_owned(),
    nombre_completo:    nombre.to_owned(),
    fecha_nacimiento:   nacimiento,
    genero,
    estado_civil,
    nivel_educativo:    NivelEducativo::Secundaria,
    profesion:          profesion.to_owned(),
    enfermedad_cronica: "Ninguna".to_owned(),
    discapacidad:       "Ninguna".to_owned(),
    telefono:           telefono.to_owned(),
    id_calle,
    numero_casa:        numero_casa.to_owned(),
    estatus,
    registrado_en:      Utc::now(),
  }
}

fn carga(
  cedula: &str,
  titular: &str,
  nombre: &str,
  nacimiento: NaiveDate,
  parentesco: Parentesco,
  genero: Genero,
) -> Dependiente {
  Dependiente {
    cedula:              cedula.to_owned(),
    cedula_beneficiario: titular.to_owned(),
    parentesco,
    nombre_completo:     nombre.to_owned(),
    fecha_nacimiento:    nacimiento,
    genero,
    estado_civil:        EstadoCivil::Soltero,
    nivel_educativo:     NivelEducativo::Primaria,
    profesion:           "Estudiante".to_owned(),
    enfermedad_cronica:  "Ninguna".to_owned(),
    discapacidad:        "Ninguna".to_owned(),
    telefono:            "04120000000".to_owned(),
    registrado_en:       Utc::now(),
  }
}

fn entrega(titular: &str, tipo: &str, dias_atras: u64, cantidad: Option<u32>) -> BeneficioRecibido {
  let hoy = Utc::now().date_naive();
  BeneficioRecibido {
    id:                  Uuid::new_v4(),
    cedula_beneficiario: titular.to_owned(),
    tipo:                tipo.to_owned(),
    descripcion:         format!("Entrega {tipo}"),
    fecha:               hoy.checked_sub_days(Days::new(dias_atras)).unwrap_or(NaiveDate::MIN),
    cantidad,
  }
}

pub(crate) fn registro() -> Registro {
  let calles = [
    Calle { id_calle: 1, nom_calle: "Calle Bolívar".to_owned() },
    Calle { id_calle: 2, nom_calle: "Calle Sucre".to_owned() },
    Calle { id_calle: 3, nom_calle: "Calle Miranda".to_owned() },
  ];

  let beneficiarios = [
    titular(
      "10234567", "Carmen Rodríguez", dia(1968, 5, 3), Genero::Femenino,
      EstadoCivil::Viudo, "Costurera", "04141112233", 1, "4", Estatus::Activo,
    ),
    titular(
      "14567890", "José Martínez", dia(1979, 11, 21), Genero::Masculino,
      EstadoCivil::Casado, "Albañil", "04162223344", 1, "8-A", Estatus::Activo,
    ),
    titular(
      "17890123", "Luisa Fernández", dia(1990, 2, 14), Genero::Femenino,
      EstadoCivil::UnionLibre, "Enfermera", "04243334455", 2, "15", Estatus::Activo,
    ),
    titular(
      "9876543", "Pedro Gómez", dia(1955, 9, 30), Genero::Masculino,
      EstadoCivil::Divorciado, "Jubilado", "04125556677", 3, "2", Estatus::Inactivo,
    ),
  ];

  let dependientes = [
    carga("28901234", "14567890", "Ana Martínez", dia(2008, 7, 12), Parentesco::Hija, Genero::Femenino),
    carga("29012345", "14567890", "Luis Martínez", dia(2011, 1, 25), Parentesco::Hijo, Genero::Masculino),
    carga("15678901", "14567890", "Rosa de Martínez", dia(1982, 4, 2), Parentesco::Esposa, Genero::Femenino),
    carga("30123456", "17890123", "Diego Fernández", dia(2015, 10, 8), Parentesco::Hijo, Genero::Masculino),
  ];

  let beneficios = vec![
    entrega("10234567", tipos::ALIMENTARIO, 7, Some(2)),
    entrega("14567890", tipos::ALIMENTARIO, 12, Some(3)),
    entrega("14567890", tipos::MEDICINAS, 40, None),
    entrega("17890123", tipos::EDUCATIVO, 3, Some(1)),
    entrega("9876543", tipos::OTROS, 90, None),
  ];

  Registro {
    beneficiarios: beneficiarios
      .into_iter()
      .map(|b| (b.cedula.clone(), b))
      .collect::<BTreeMap<_, _>>(),
    dependientes: dependientes
      .into_iter()
      .map(|d| (d.cedula.clone(), d))
      .collect::<BTreeMap<_, _>>(),
    calles: calles
      .into_iter()
      .map(|c| (c.id_calle, c))
      .collect::<BTreeMap<_, _>>(),
    beneficios,
    proximo_id_calle: 3,
  }
}
