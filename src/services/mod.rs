//! Services module
//!
//! Este módulo contiene la lógica de negocio: el motor de eficiencia
//! (intervalos, agregación, validación y proyección) y la plomería que lo
//! alimenta (cola de escritura y feed de registros).

pub mod aggregator;
pub mod efficiency_engine;
pub mod interval_calculator;
pub mod log_projector;
pub mod record_feed;
pub mod record_validator;
pub mod write_queue;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregator::{summarize, summarize_records};
pub use efficiency_engine::{compute_view, EfficiencyEngine};
pub use interval_calculator::compute_intervals;
pub use log_projector::project_log;
pub use record_feed::RecordFeed;
pub use record_validator::{validate, NumericInput, RecordCandidate};
pub use write_queue::{WriteQueue, WriteQueueHandle};
