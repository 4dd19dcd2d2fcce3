use chrono::Utc;

/// Hands out record IDs for transactions and categories.
///
/// IDs are millisecond timestamps so they stay compatible with, and sort after, the IDs in
/// existing data files. When two IDs are requested within the same millisecond, or the clock
/// reads earlier than the last ID issued, the previous ID plus one is used instead, so IDs are
/// strictly increasing.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Creates a generator that will only issue IDs greater than every ID in `existing`.
    pub fn after(existing: impl IntoIterator<Item = u64>) -> Self {
        Self {
            last: existing.into_iter().max().unwrap_or(0),
        }
    }

    pub fn next_id(&mut self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let id = now.max(self.last.saturating_add(1));
        self.last = id;
        id
    }

    /// Makes sure IDs issued from now on are greater than `id`.
    pub fn observe(&mut self, id: u64) {
        self.last = self.last.max(id);
    }
}
