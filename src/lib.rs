pub mod constants;
pub mod records;
pub mod rigid_transform;
pub mod star_table;
pub mod startomo_errors;

pub use records::{ColumnMap, ParticleRecord, RecordCollection, StarConverter};
pub use star_table::StarTable;
pub use startomo_errors::StartomoError;
