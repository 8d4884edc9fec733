//! SQL schema for the SISCLAP SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS calles (
    id_calle   INTEGER PRIMARY KEY AUTOINCREMENT,
    nom_calle  TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS beneficiarios (
    cedula             TEXT PRIMARY KEY,    -- 7 or 8 digits, validated upstream
    nombre_completo    TEXT NOT NULL,
    fecha_nacimiento   TEXT NOT NULL,       -- ISO YYYY-MM-DD
    genero             TEXT NOT NULL,
    estado_civil       TEXT NOT NULL,
    nivel_educativo    TEXT NOT NULL,
    profesion          TEXT NOT NULL,
    enfermedad_cronica TEXT NOT NULL DEFAULT 'Ninguna',
    discapacidad       TEXT NOT NULL DEFAULT 'Ninguna',
    telefono           TEXT NOT NULL,       -- normalised 04XXXXXXXXX
    id_calle           INTEGER NOT NULL REFERENCES calles(id_calle),
    numero_casa        TEXT NOT NULL,
    estatus            TEXT NOT NULL DEFAULT 'ACTIVO',  -- 'ACTIVO' | 'INACTIVO'
    registrado_en      TEXT NOT NULL        -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS dependientes (
    cedula              TEXT PRIMARY KEY,
    cedula_beneficiario TEXT NOT NULL REFERENCES beneficiarios(cedula),
    parentesco          TEXT NOT NULL,
    nombre_completo     TEXT NOT NULL,
    fecha_nacimiento    TEXT NOT NULL,
    genero              TEXT NOT NULL,
    estado_civil        TEXT NOT NULL,
    nivel_educativo     TEXT NOT NULL,
    profesion           TEXT NOT NULL,
    enfermedad_cronica  TEXT NOT NULL DEFAULT 'Ninguna',
    discapacidad        TEXT NOT NULL DEFAULT 'Ninguna',
    telefono            TEXT NOT NULL,
    registrado_en       TEXT NOT NULL
);

-- Benefit deliveries are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS beneficios (
    id                  TEXT PRIMARY KEY,
    cedula_beneficiario TEXT NOT NULL REFERENCES beneficiarios(cedula),
    tipo                TEXT NOT NULL,
    descripcion         TEXT NOT NULL,
    fecha               TEXT NOT NULL,      -- ISO YYYY-MM-DD
    cantidad            INTEGER             -- NULL counts as one unit
);

CREATE INDEX IF NOT EXISTS beneficiarios_calle_idx    ON beneficiarios(id_calle);
CREATE INDEX IF NOT EXISTS beneficiarios_estatus_idx  ON beneficiarios(estatus);
CREATE INDEX IF NOT EXISTS dependientes_titular_idx   ON dependientes(cedula_beneficiario);
CREATE INDEX IF NOT EXISTS beneficios_titular_idx     ON beneficios(cedula_beneficiario);
CREATE INDEX IF NOT EXISTS beneficios_fecha_idx       ON beneficios(fecha);

PRAGMA user_version = 1;
";
