//! Migraciones de esquema
//!
//! Conversión de formas antiguas de registro al esquema canónico.

pub mod legacy_records;

pub use legacy_records::{import_legacy_file, MigrationReport};
