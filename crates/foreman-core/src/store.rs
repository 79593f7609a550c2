//! In-memory record stores.
//!
//! A store owns an ordered list of records behind an `Arc`. Every mutation
//! installs a freshly allocated list, so observers holding the previous
//! snapshot can detect change with [`Arc::ptr_eq`]. This holds even when the
//! mutation turned out to be a no-op (unknown id).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::clock::{Clock, IdSequence};
use crate::model::{Client, ClientFields, Project, ProjectFields};

/// A record kind a [`RecordStore`] can hold.
pub trait Record: Clone {
    /// Form payload that creates or fully replaces a record.
    type Fields;

    /// Prefix of generated identifiers.
    const ID_PREFIX: &'static str;

    fn id(&self) -> &str;
    fn build(id: String, fields: Self::Fields, now: DateTime<Utc>) -> Self;
    fn replace(&mut self, fields: Self::Fields);
    fn created_at(&self) -> DateTime<Utc>;
    fn touch(&mut self, at: DateTime<Utc>);
}

impl Record for Client {
    type Fields = ClientFields;
    const ID_PREFIX: &'static str = "client";

    fn id(&self) -> &str {
        &self.id
    }

    fn build(id: String, fields: ClientFields, now: DateTime<Utc>) -> Self {
        Self::new(id, fields, now)
    }

    fn replace(&mut self, fields: ClientFields) {
        self.replace_fields(fields);
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

impl Record for Project {
    type Fields = ProjectFields;
    const ID_PREFIX: &'static str = "project";

    fn id(&self) -> &str {
        &self.id
    }

    fn build(id: String, fields: ProjectFields, now: DateTime<Utc>) -> Self {
        Self::new(id, fields, now)
    }

    fn replace(&mut self, fields: ProjectFields) {
        self.replace_fields(fields);
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// Ordered, single-writer store for one record kind.
pub struct RecordStore<R: Record> {
    records: Arc<Vec<R>>,
    ids: IdSequence,
    clock: Arc<dyn Clock>,
}

impl<R: Record> RecordStore<R> {
    /// Build a store holding `seed` in the given order.
    pub fn new(seed: Vec<R>, clock: Arc<dyn Clock>) -> Self {
        let mut ids = IdSequence::new(R::ID_PREFIX);
        for record in &seed {
            ids.observe(record.id());
        }
        Self {
            records: Arc::new(seed),
            ids,
            clock,
        }
    }

    /// Current snapshot, in insertion order.
    #[must_use]
    pub fn list(&self) -> Arc<Vec<R>> {
        Arc::clone(&self.records)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a new record with a fresh id and default lifecycle fields.
    pub fn create(&mut self, fields: R::Fields) -> R {
        let now = self.clock.now();
        let id = self.ids.next_id(now);
        let record = R::build(id, fields, now);

        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.extend(self.records.iter().cloned());
        next.push(record.clone());
        self.records = Arc::new(next);

        debug!(id = record.id(), total = self.records.len(), "record created");
        record
    }

    /// Replace the editable fields of the first record with `id`.
    ///
    /// Returns `None` when the id is unknown; the list is still swapped for a
    /// content-identical copy.
    pub fn update(&mut self, id: &str, fields: R::Fields) -> Option<R> {
        let now = self.clock.now();
        let mut next: Vec<R> = self.records.as_ref().clone();
        let updated = next.iter_mut().find(|r| r.id() == id).map(|record| {
            record.replace(fields);
            let stamp = std::cmp::max(now, record.created_at());
            record.touch(stamp);
            record.clone()
        });
        self.records = Arc::new(next);

        if updated.is_some() {
            debug!(id, "record updated");
        } else {
            debug!(id, "update ignored: unknown id");
        }
        updated
    }

    /// Apply an in-place change to one record, outside the form path.
    ///
    /// Used for actions like advancing a status. Same identity semantics as
    /// [`Self::update`].
    pub fn modify<F>(&mut self, id: &str, change: F) -> Option<R>
    where
        F: FnOnce(&mut R),
    {
        let now = self.clock.now();
        let mut next: Vec<R> = self.records.as_ref().clone();
        let modified = next.iter_mut().find(|r| r.id() == id).map(|record| {
            change(record);
            let stamp = std::cmp::max(now, record.created_at());
            record.touch(stamp);
            record.clone()
        });
        self.records = Arc::new(next);
        modified
    }

    /// Remove the first record with `id`. Returns the removed record.
    pub fn delete(&mut self, id: &str) -> Option<R> {
        let mut next: Vec<R> = self.records.as_ref().clone();
        let removed = next
            .iter()
            .position(|r| r.id() == id)
            .map(|index| next.remove(index));
        self.records = Arc::new(next);

        if removed.is_some() {
            debug!(id, total = self.records.len(), "record deleted");
        } else {
            debug!(id, "delete ignored: unknown id");
        }
        removed
    }
}

impl<R: Record + std::fmt::Debug> std::fmt::Debug for RecordStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("prefix", &self.ids.prefix())
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::model::ClientKind;
    use chrono::TimeZone;

    fn clock() -> ManualClock {
        ManualClock::at(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().unwrap())
    }

    fn fields(name: &str) -> ClientFields {
        ClientFields {
            name: name.into(),
            kind: ClientKind::Company,
            email: "a@acme.com".into(),
            phone: "+1-000".into(),
            address: "1 Main St".into(),
            ..ClientFields::default()
        }
    }

    #[test]
    fn create_appends_in_order() {
        let mut store: RecordStore<Client> = RecordStore::new(Vec::new(), Arc::new(clock()));
        let a = store.create(fields("A"));
        let b = store.create(fields("B"));
        let names: Vec<_> = store.list().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("client_"));
    }

    #[test]
    fn update_refreshes_timestamp_and_changes_only_target() {
        let clock = clock();
        let mut store: RecordStore<Client> = RecordStore::new(Vec::new(), Arc::new(clock.clone()));
        let a = store.create(fields("A"));
        let b = store.create(fields("B"));

        clock.advance_millis(60_000);
        let updated = store.update(&a.id, fields("A2")).unwrap();

        assert_eq!(updated.name, "A2");
        assert!(updated.updated_at > updated.created_at);
        assert_eq!(store.get(&b.id), Some(&b));
    }

    #[test]
    fn update_never_precedes_creation() {
        let clock = clock();
        let mut store: RecordStore<Client> = RecordStore::new(Vec::new(), Arc::new(clock.clone()));
        let a = store.create(fields("A"));
        clock.advance_millis(-3_600_000);
        let updated = store.update(&a.id, fields("A")).unwrap();
        assert_eq!(updated.updated_at, updated.created_at);
    }

    #[test]
    fn unknown_id_is_a_visible_noop() {
        let mut store: RecordStore<Client> = RecordStore::new(Vec::new(), Arc::new(clock()));
        store.create(fields("A"));
        let before = store.list();

        assert!(store.update("missing", fields("X")).is_none());
        let after = store.list();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before, after);

        assert!(store.delete("missing").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let mut store: RecordStore<Client> = RecordStore::new(Vec::new(), Arc::new(clock()));
        let a = store.create(fields("A"));
        store.create(fields("B"));
        let removed = store.delete(&a.id).unwrap();
        assert_eq!(removed.id, a.id);
        assert_eq!(store.len(), 1);
        assert!(store.get(&a.id).is_none());
    }

    #[test]
    fn modify_applies_closure() {
        let mut store: RecordStore<Client> = RecordStore::new(Vec::new(), Arc::new(clock()));
        let a = store.create(fields("A"));
        let changed = store.modify(&a.id, |c| c.is_active = false).unwrap();
        assert!(!changed.is_active);
        assert!(!store.get(&a.id).unwrap().is_active);
    }
}
