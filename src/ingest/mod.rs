//! Ingestion side of the pipeline: persisting enumerated batches and the
//! incremental per-creator sync.

mod sync;
mod writer;

pub use sync::{sync_all, SyncReport};
pub use writer::{write_batch, WriteReport};
