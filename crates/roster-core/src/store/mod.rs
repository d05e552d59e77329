//! SQLite store implementations.
//!
//! Both stores keep a blocking `rusqlite` connection behind a mutex; calls
//! run to completion on the caller's task. Conflicting writes serialize on
//! the connection lock, which is the mutual-exclusion guarantee the history
//! engine delegates to this layer.

mod record;
mod version;

pub use record::SqliteRecordStore;
pub use version::SqliteVersionStore;
