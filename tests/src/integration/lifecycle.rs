//! End-to-end lifecycles over the persistent engines: the service layer
//! drives a durable backend, the backend is reopened, and the outcome is
//! read back cold.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use imperium_diplomacy::{DiplomacyRules, Evaluator, ProposalOutcome, TreatyService};
    use imperium_gameplay::GameplayService;
    use imperium_store::{DiploStore, FileEngine, SqliteEngine, WorldStore};
    use imperium_types::{Building, Stance, TreatyKind, TreatyStatus};
    use tempfile::TempDir;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 22, 12, 0, 0).unwrap()
    }

    #[test]
    fn construction_outcome_survives_a_file_engine_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("world.json");

        {
            let store: Arc<dyn WorldStore> = Arc::new(FileEngine::open(&path).unwrap());
            // Pin the production clock so the accrual window is exact.
            store.set_last_tick(1, t0()).unwrap();

            let mut game = GameplayService::new(store.clone());
            assert!(game.queue_build(1, Building::LumberMill, t0()).unwrap());
            // The level-2 upgrade costs 76 wood, debited up front.
            assert_eq!(store.village(1).unwrap().unwrap().resources.wood, 724);
            assert!(game.pending_build(1).is_some());

            let delta = game.tick(t0() + Duration::hours(1)).unwrap();
            // One hour at level-1 rates, accrued before the upgrade lands.
            let change = &delta.resources_changed[&1];
            assert_eq!(change.wood, 60);
            assert_eq!(change.crop, 30);
            assert_eq!(delta.builds_completed, vec![(1, Building::LumberMill)]);
            assert!(game.pending_build(1).is_none());
        }

        let store = FileEngine::open(&path).unwrap();
        let levels = store.building_levels(1).unwrap();
        assert_eq!(levels.get(&Building::LumberMill), Some(&2));
        let village = store.village(1).unwrap().unwrap();
        assert_eq!(village.resources.wood, 784);
        assert_eq!(village.resources.crop, 830);
        assert_eq!(store.last_tick(1).unwrap(), Some(t0() + Duration::hours(1)));
    }

    #[test]
    fn treaty_lifecycle_survives_a_sqlite_engine_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("world.db");

        let treaty_id = {
            let store: Arc<dyn DiploStore> = Arc::new(SqliteEngine::open(&path).unwrap());
            // Pin the relation clock so decay windows are exact.
            store
                .upsert_relation(1, 2, Stance::Neutral, 0.0, t0())
                .unwrap();

            let treaties = TreatyService::new(store.clone(), DiplomacyRules::default());
            let outcome = treaties
                .propose(2, 1, TreatyKind::Ceasefire, t0(), Some(6))
                .unwrap();
            let ProposalOutcome::Accepted {
                treaty_id,
                expires_at,
                ..
            } = outcome
            else {
                panic!("ceasefire between neutral factions should be accepted");
            };
            assert_eq!(expires_at, t0() + Duration::hours(6));

            // Tick past the expiry: the treaty lapses and is audited.
            let evaluator = Evaluator::new(store.clone(), DiplomacyRules::default());
            let report = evaluator.tick_update(t0() + Duration::hours(7)).unwrap();
            assert_eq!(report.expired_treaties, vec![treaty_id]);

            treaty_id
        };

        let store = SqliteEngine::open(&path).unwrap();
        let treaty = store.treaty(treaty_id).unwrap().unwrap();
        assert_eq!(treaty.status, TreatyStatus::Expired);
        assert_eq!(treaty.kind, TreatyKind::Ceasefire);

        let kinds: Vec<String> = store
            .events_since(None, None)
            .unwrap()
            .iter()
            .map(|e| e.kind.to_string())
            .collect();
        assert!(kinds.contains(&"treaty_open".to_string()));
        assert!(kinds.contains(&"treaty_expire".to_string()));
    }
}
