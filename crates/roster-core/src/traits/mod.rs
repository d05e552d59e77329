//! Store traits consumed by the history engine.

mod record_store;
mod version_store;

pub use record_store::RecordStore;
pub use version_store::VersionStore;
