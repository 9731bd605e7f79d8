//! Repositorios
//!
//! Puerto `RecordStore` y sus adaptadores (PostgreSQL y memoria).

pub mod memory_record_store;
pub mod postgres_record_store;
pub mod record_store;

pub use memory_record_store::MemoryRecordStore;
pub use postgres_record_store::PostgresRecordStore;
pub use record_store::{RecordStore, StoreSnapshot};
