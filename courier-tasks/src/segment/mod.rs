//! Segment Reverse ETL tasks
//!
//! - [`SyncTask`]: trigger a sync and optionally wait for it to finish
//! - [`StatusTask`]: read the current status of a sync

mod status;
mod sync;

pub use status::{StatusOutput, StatusTask};
pub use sync::{SyncOutput, SyncParams, SyncTask};
