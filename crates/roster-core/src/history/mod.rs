//! Change-history engine: the version recorder and the history reader.
//!
//! Every create/update/delete of an employee record passes through the
//! recorder, which appends one immutable version entry per mutation. The
//! reader serves those entries back, paginated and newest first,
//! independently of the mutation path.

mod reader;
mod recorder;

pub use reader::{HistoryPage, HistoryReader, Pagination, VersionComparison};
pub use recorder::VersionRecorder;
