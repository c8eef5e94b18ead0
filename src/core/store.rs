// LogSieve - core/store.rs
//
// The canonical, timestamp-ordered record set. Owned by the caller;
// replaced wholesale on each load.

use crate::core::model::{LevelCounts, LogRecord, RecordId};
use crate::util::error::StoreError;
use std::collections::HashMap;

/// Holds every loaded record in ascending timestamp order.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<LogRecord>,
    /// RecordId -> position in `records`. Rebuilt on every load.
    index: HashMap<RecordId, usize>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire contents with `records`, stable-sorted by
    /// timestamp. The new vector is fully prepared before it is swapped in.
    pub fn load(&mut self, mut records: Vec<LogRecord>) {
        // sort_by_key is stable: equal timestamps keep load order.
        records.sort_by_key(|r| r.timestamp);
        let index = records
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.id, pos))
            .collect();

        self.records = records;
        self.index = index;

        tracing::debug!(records = self.records.len(), "Record store replaced");
    }

    /// All records in canonical order.
    pub fn all(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&LogRecord> {
        self.index.get(&id).map(|&pos| &self.records[pos])
    }

    /// Flip the pin flag on the record with this identity.
    /// Returns the new pin state.
    pub fn toggle_pin(&mut self, id: RecordId) -> Result<bool, StoreError> {
        let pos = *self
            .index
            .get(&id)
            .ok_or(StoreError::UnknownRecord { id })?;
        let record = &mut self.records[pos];
        record.pinned = !record.pinned;
        tracing::debug!(id = %id, pinned = record.pinned, "Pin toggled");
        Ok(record.pinned)
    }

    /// Level counts over the whole store.
    pub fn counts(&self) -> LevelCounts {
        self.records
            .iter()
            .fold(LevelCounts::default(), |mut counts, r| {
                counts.record(r.level);
                counts
            })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
