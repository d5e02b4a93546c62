//! Storage engine contract tests.
//!
//! Every backend has to expose the same seeded world and honor the same
//! port semantics, so the assertions here run once per engine instead of
//! being duplicated per adapter.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use imperium_store::{DiploStore, FileEngine, MemoryEngine, SqliteEngine, WorldStore};
    use imperium_types::{
        BuildCmd, Building, EventKind, ResourceDelta, Stance, TreatyKind, TreatyStatus,
    };
    use serde_json::json;
    use tempfile::TempDir;

    fn t0() -> chrono::DateTime<chrono::Utc> {
        Utc.with_ymd_and_hms(2025, 10, 22, 12, 0, 0).unwrap()
    }

    /// All three engines over the same seeded world, each with its backing
    /// storage rooted in the temp dir so nothing leaks between tests.
    fn engines(dir: &TempDir) -> Vec<(&'static str, Arc<dyn WorldStore>, Arc<dyn DiploStore>)> {
        let memory = Arc::new(MemoryEngine::seeded_at(t0()));
        let file = Arc::new(FileEngine::open(dir.path().join("world.json")).unwrap());
        let sqlite = Arc::new(SqliteEngine::open(dir.path().join("world.db")).unwrap());
        vec![
            ("memory", memory.clone(), memory),
            ("file", file.clone(), file),
            ("sqlite", sqlite.clone(), sqlite),
        ]
    }

    #[test]
    fn every_engine_starts_with_the_seeded_world() {
        let dir = TempDir::new().unwrap();
        for (name, world, diplo) in engines(&dir) {
            let villages = world.snapshot().unwrap();
            assert_eq!(villages.len(), 1, "{name}: seeded village count");
            assert_eq!(villages[0].name, "Capitale", "{name}");
            assert_eq!(villages[0].resources.wood, 800, "{name}");

            let levels = world.building_levels(1).unwrap();
            for building in Building::ALL {
                assert_eq!(levels.get(&building), Some(&1), "{name}: {building:?}");
            }
            assert!(world.last_tick(1).unwrap().is_some(), "{name}");

            assert_eq!(diplo.list_factions().unwrap().len(), 3, "{name}");
            let rel = diplo.relation(2, 1).unwrap().unwrap();
            assert_eq!((rel.a, rel.b), (1, 2), "{name}: normalized pair");
            assert_eq!(rel.stance, Stance::Neutral, "{name}");
            assert_eq!(rel.opinion, 0.0, "{name}");
        }
    }

    #[test]
    fn queue_build_accepts_and_refuses_uniformly() {
        let dir = TempDir::new().unwrap();
        for (name, world, _) in engines(&dir) {
            let accepted = world
                .queue_build(&BuildCmd {
                    village_id: 1,
                    building: "farm".to_string(),
                    level_target: 2,
                })
                .unwrap();
            assert!(accepted, "{name}");
            let village = world.village(1).unwrap().unwrap();
            assert_eq!(village.queue, vec!["farm -> L2".to_string()], "{name}");

            for cmd in [
                BuildCmd {
                    village_id: 9999,
                    building: "farm".to_string(),
                    level_target: 1,
                },
                BuildCmd {
                    village_id: 1,
                    building: String::new(),
                    level_target: 1,
                },
                BuildCmd {
                    village_id: 1,
                    building: "farm".to_string(),
                    level_target: 0,
                },
            ] {
                assert!(!world.queue_build(&cmd).unwrap(), "{name}: {cmd:?}");
            }
        }
    }

    #[test]
    fn stockpile_deltas_and_guarded_wood_debits() {
        let dir = TempDir::new().unwrap();
        for (name, world, _) in engines(&dir) {
            world
                .apply_resource_delta(
                    1,
                    &ResourceDelta {
                        wood: 50,
                        clay: -100,
                        iron: 0,
                        crop: 7,
                    },
                )
                .unwrap();
            let village = world.village(1).unwrap().unwrap();
            assert_eq!(village.resources.wood, 850, "{name}");
            assert_eq!(village.resources.clay, 700, "{name}");
            assert_eq!(village.resources.crop, 807, "{name}");

            assert!(world.debit_wood(1, 850).unwrap(), "{name}: exact debit");
            assert!(!world.debit_wood(1, 1).unwrap(), "{name}: empty stock");
            assert_eq!(world.village(1).unwrap().unwrap().resources.wood, 0, "{name}");
        }
    }

    #[test]
    fn building_levels_and_tick_clock_round_trip() {
        let dir = TempDir::new().unwrap();
        for (name, world, _) in engines(&dir) {
            world.set_building_level(1, Building::IronMine, 7).unwrap();
            let levels = world.building_levels(1).unwrap();
            assert_eq!(levels.get(&Building::IronMine), Some(&7), "{name}");

            let later = t0() + Duration::hours(3);
            world.set_last_tick(1, later).unwrap();
            assert_eq!(world.last_tick(1).unwrap(), Some(later), "{name}");

            // Unknown villages read as absent, never as errors.
            assert!(world.building_levels(9999).unwrap().is_empty(), "{name}");
            assert!(world.last_tick(9999).unwrap().is_none(), "{name}");
        }
    }

    #[test]
    fn treaty_lifecycle_is_uniform() {
        let dir = TempDir::new().unwrap();
        for (name, _, diplo) in engines(&dir) {
            let id = diplo
                .open_treaty(2, 1, TreatyKind::Ceasefire, t0(), Some(t0() + Duration::hours(6)))
                .unwrap();
            let treaty = diplo.treaty(id).unwrap().unwrap();
            assert_eq!((treaty.a, treaty.b), (1, 2), "{name}: normalized pair");
            assert_eq!(treaty.kind, TreatyKind::Ceasefire, "{name}");
            assert_eq!(treaty.status, TreatyStatus::Active, "{name}");

            diplo.set_treaty_status(id, TreatyStatus::Expired).unwrap();
            let treaty = diplo.treaty(id).unwrap().unwrap();
            assert_eq!(treaty.status, TreatyStatus::Expired, "{name}");
            assert_eq!(diplo.list_treaties().unwrap().len(), 1, "{name}");
        }
    }

    #[test]
    fn event_log_honors_since_and_limit() {
        let dir = TempDir::new().unwrap();
        for (name, _, diplo) in engines(&dir) {
            for h in 0..4 {
                diplo
                    .log_event(
                        EventKind::Attack,
                        json!({"a": 1, "b": 2, "h": h}),
                        t0() + Duration::hours(h),
                    )
                    .unwrap();
            }

            let all = diplo.events_since(None, None).unwrap();
            assert_eq!(all.len(), 4, "{name}");
            // Ids are assigned at log time and stay stable.
            let ids: Vec<u64> = all.iter().map(|e| e.id).collect();
            assert!(ids.windows(2).all(|w| w[0] < w[1]), "{name}: {ids:?}");

            let recent = diplo
                .events_since(Some(t0() + Duration::hours(2)), None)
                .unwrap();
            assert_eq!(recent.len(), 2, "{name}");

            let capped = diplo.events_since(None, Some(3)).unwrap();
            assert_eq!(capped.len(), 3, "{name}");
            assert_eq!(capped[0].payload["h"], 1, "{name}: keeps most recent");
        }
    }

    #[test]
    fn file_engine_state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("world.json");
        {
            let engine = FileEngine::open(&path).unwrap();
            engine.set_building_level(1, Building::Farm, 4).unwrap();
            engine
                .upsert_relation(1, 3, Stance::Hostile, -55.0, t0())
                .unwrap();
        }
        let engine = FileEngine::open(&path).unwrap();
        let levels = engine.building_levels(1).unwrap();
        assert_eq!(levels.get(&Building::Farm), Some(&4));
        let rel = engine.relation(3, 1).unwrap().unwrap();
        assert_eq!(rel.stance, Stance::Hostile);
        assert_eq!(rel.opinion, -55.0);
    }

    #[test]
    fn sqlite_engine_state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("world.db");
        let id = {
            let engine = SqliteEngine::open(&path).unwrap();
            engine
                .apply_resource_delta(
                    1,
                    &ResourceDelta {
                        wood: 123,
                        clay: 0,
                        iron: 0,
                        crop: 0,
                    },
                )
                .unwrap();
            engine
                .open_treaty(1, 2, TreatyKind::Trade, t0(), Some(t0() + Duration::hours(24)))
                .unwrap()
        };
        let engine = SqliteEngine::open(&path).unwrap();
        assert_eq!(engine.village(1).unwrap().unwrap().resources.wood, 923);
        let treaty = engine.treaty(id).unwrap().unwrap();
        assert_eq!(treaty.kind, TreatyKind::Trade);
        assert_eq!(treaty.expires_at, Some(t0() + Duration::hours(24)));
    }
}
