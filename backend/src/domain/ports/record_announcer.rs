//! Port notifying staff devices about new records.

use crate::domain::RecordId;

/// Fire-and-forget: implementations return at once and deal with delivery
/// failures themselves.
#[cfg_attr(test, mockall::automock)]
pub trait RecordAnnouncer: Send + Sync {
    fn announce_new_record(&self, record: RecordId);
}
