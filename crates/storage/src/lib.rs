//! Environment-aware persistence layer.
//! - One save/load surface over a flat data directory or a process-local map.
//! - The backend is chosen per call from a deployment signal (see [`mode`]).
//! - Load is best-effort: a caller only ever observes a value or absence.

pub mod errors;
pub mod mode;
pub mod value;
pub mod backend;
pub mod gateway;
#[cfg(test)]
pub mod test_support;

pub use backend::{file::FileStore, memory::MemoryStore, KvBackend};
pub use errors::StorageError;
pub use gateway::PersistenceGateway;
pub use mode::{Mode, ModeSource};
pub use value::{LoadOutcome, StoredValue};
