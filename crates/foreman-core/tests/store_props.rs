use std::collections::HashSet;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use foreman_core::clock::ManualClock;
use foreman_core::model::{Client, Project, ProjectStatus};
use foreman_core::store::RecordStore;
use foreman_core::view::ProjectFilter;
use proptest::prelude::*;

#[path = "generators.rs"]
mod generators;
use generators::*;

fn frozen_clock() -> ManualClock {
    ManualClock::at(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).single().unwrap())
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn created_ids_are_unique(batch in prop::collection::vec(arb_client_fields(), 1..40)) {
        let mut store: RecordStore<Client> = RecordStore::new(Vec::new(), Arc::new(frozen_clock()));
        let mut seen = HashSet::new();
        for fields in batch {
            let record = store.create(fields);
            prop_assert!(seen.insert(record.id.clone()), "duplicate id {}", record.id);
        }
    }

    #[test]
    fn mutations_keep_invariants(ops in prop::collection::vec(arb_op(), 1..60)) {
        let clock = frozen_clock();
        let mut store: RecordStore<Client> = RecordStore::new(Vec::new(), Arc::new(clock.clone()));

        for op in ops {
            clock.advance_millis(7);
            let before = store.list();
            match op {
                Op::Create(fields) => {
                    let created = store.create(fields);
                    prop_assert_eq!(store.len(), before.len() + 1);
                    prop_assert!(created.is_active);
                    prop_assert!(created.projects.is_empty());
                }
                Op::Update(pick, fields) => {
                    if before.is_empty() {
                        continue;
                    }
                    let target = before[pick % before.len()].id.clone();
                    let updated = store.update(&target, fields);
                    prop_assert!(updated.is_some());
                    let after = store.list();
                    prop_assert_eq!(after.len(), before.len());
                    for (old, new) in before.iter().zip(after.iter()) {
                        prop_assert_eq!(&old.id, &new.id);
                        if old.id != target {
                            prop_assert_eq!(old, new);
                        } else {
                            prop_assert!(new.updated_at >= new.created_at);
                            prop_assert_eq!(new.created_at, old.created_at);
                        }
                    }
                }
                Op::UpdateMissing(fields) => {
                    prop_assert!(store.update("client_missing", fields).is_none());
                    let after = store.list();
                    prop_assert!(!Arc::ptr_eq(&before, &after));
                    prop_assert_eq!(&before, &after);
                }
                Op::Delete(pick) => {
                    if before.is_empty() {
                        continue;
                    }
                    let target = before[pick % before.len()].id.clone();
                    prop_assert!(store.delete(&target).is_some());
                    prop_assert_eq!(store.len(), before.len() - 1);
                    prop_assert!(store.get(&target).is_none());
                }
                Op::DeleteMissing => {
                    prop_assert!(store.delete("client_missing").is_none());
                    prop_assert_eq!(store.len(), before.len());
                }
            }
        }
    }

    #[test]
    fn status_filter_is_exact_and_ordered(
        batch in prop::collection::vec(arb_project_fields(), 0..30),
        status in arb_status(),
    ) {
        let mut store: RecordStore<Project> = RecordStore::new(Vec::new(), Arc::new(frozen_clock()));
        for fields in batch {
            store.create(fields);
        }
        let all = store.list();

        let filter = ProjectFilter { status: Some(status), ..ProjectFilter::default() };
        let hits = filter.apply(&all);
        prop_assert!(hits.iter().all(|p| p.status == status));
        prop_assert_eq!(hits.len(), all.iter().filter(|p| p.status == status).count());

        let positions: Vec<usize> = hits
            .iter()
            .map(|hit| all.iter().position(|p| p.id == hit.id).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let unfiltered = ProjectFilter::default().apply(&all);
        prop_assert_eq!(unfiltered.len(), all.len());
    }

    #[test]
    fn lifecycle_never_leaves_terminal_states(from in arb_status(), to in arb_status()) {
        if from.is_terminal() {
            prop_assert!(from.can_transition_to(to).is_err());
        }
        if from == to {
            prop_assert!(from.can_transition_to(to).is_err());
        }
        if !from.is_terminal() && from != to && to == ProjectStatus::Cancelled {
            prop_assert!(from.can_transition_to(to).is_ok());
        }
    }
}
