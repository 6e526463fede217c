use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::models::{UploadRecord, UploadStage};

/// Ordered collection of upload records; insertion order is display order.
///
/// The single source of truth for what the dashboard renders. All pipeline
/// mutation funnels through here, and lookups by id tolerate absent records:
/// stage-advancement ticks may race with user removal, and a tick that lost
/// that race must become a silent no-op.
#[derive(Default)]
pub struct IngestRegistry {
    records: RwLock<Vec<UploadRecord>>,
}

impl IngestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<UploadRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<UploadRecord>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a record; new uploads land at the end of the display order.
    pub fn insert(&self, record: UploadRecord) {
        self.write().push(record);
    }

    /// Applies `patch` to the record and returns the patched copy.
    /// A missing id is a no-op, not an error.
    pub fn update<F>(&self, id: &Uuid, patch: F) -> Option<UploadRecord>
    where
        F: FnOnce(&mut UploadRecord),
    {
        let mut records = self.write();
        let record = records.iter_mut().find(|r| r.id == *id)?;
        patch(record);
        Some(record.clone())
    }

    /// Applies `patch` only while the record is still in `expected` stage.
    /// The stage check and the mutation happen under one lock acquisition,
    /// which is what makes outcome resolution idempotent under concurrent
    /// delivery.
    pub fn update_in_stage<F>(
        &self,
        id: &Uuid,
        expected: UploadStage,
        patch: F,
    ) -> Option<UploadRecord>
    where
        F: FnOnce(&mut UploadRecord),
    {
        let mut records = self.write();
        let record = records
            .iter_mut()
            .find(|r| r.id == *id && r.stage == expected)?;
        patch(record);
        Some(record.clone())
    }

    pub fn get(&self, id: &Uuid) -> Option<UploadRecord> {
        self.read().iter().find(|r| r.id == *id).cloned()
    }

    /// Removes the record. Returns false when the id is unknown.
    /// In-flight ticks for a removed id discover the absence on their next
    /// fire and discard themselves.
    pub fn remove(&self, id: &Uuid) -> bool {
        let mut records = self.write();
        let before = records.len();
        records.retain(|r| r.id != *id);
        records.len() < before
    }

    /// Snapshot of all records in display order.
    pub fn list(&self) -> Vec<UploadRecord> {
        self.read().clone()
    }

    /// Number of records not yet in a terminal stage.
    pub fn in_flight(&self) -> usize {
        self.read().iter().filter(|r| !r.stage.is_terminal()).count()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> UploadRecord {
        UploadRecord::new(name.to_string(), 1000, "text/csv".to_string())
    }

    #[test]
    fn test_insert_preserves_order() {
        let registry = IngestRegistry::new();
        registry.insert(record("a.csv"));
        registry.insert(record("b.csv"));
        registry.insert(record("c.csv"));

        let names: Vec<String> = registry.list().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["a.csv", "b.csv", "c.csv"]);
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let registry = IngestRegistry::new();
        let result = registry.update(&Uuid::new_v4(), |r| r.progress = 50);
        assert!(result.is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_update_in_stage_requires_expected_stage() {
        let registry = IngestRegistry::new();
        let rec = record("a.csv");
        let id = rec.id;
        registry.insert(rec);

        // Wrong expected stage: no-op
        let result = registry.update_in_stage(&id, UploadStage::Validating, |r| r.progress = 50);
        assert!(result.is_none());
        assert_eq!(registry.get(&id).unwrap().progress, 0);

        // Matching stage: applied
        let result = registry.update_in_stage(&id, UploadStage::Uploading, |r| r.progress = 50);
        assert_eq!(result.unwrap().progress, 50);
    }

    #[test]
    fn test_remove() {
        let registry = IngestRegistry::new();
        let rec = record("a.csv");
        let id = rec.id;
        registry.insert(rec);

        assert!(registry.remove(&id));
        assert!(!registry.remove(&id));
        assert!(registry.get(&id).is_none());
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_in_flight_counts_non_terminal() {
        let registry = IngestRegistry::new();
        let rec = record("a.csv");
        let id = rec.id;
        registry.insert(rec);
        registry.insert(record("b.csv"));
        assert_eq!(registry.in_flight(), 2);

        registry.update(&id, |r| r.stage = UploadStage::Completed);
        assert_eq!(registry.in_flight(), 1);
    }
}
