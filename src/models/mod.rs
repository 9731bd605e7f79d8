//! Modelos del sistema
//!
//! Este módulo contiene las entidades persistidas (vehículos y repostajes),
//! los modelos derivados de eficiencia y los motivos de validación.

pub mod efficiency;
pub mod fuel_record;
pub mod validation_reason;
pub mod vehicle;

pub use efficiency::*;
pub use fuel_record::*;
pub use validation_reason::*;
pub use vehicle::*;
