//! SQLite engine.
//!
//! Durable backend via rusqlite (bundled). The schema is managed by the
//! embedded migrations below; `open` applies pending migrations, then makes
//! sure every village has a production clock.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use imperium_types::{
    normalize_pair, BuildCmd, Building, DiplomacyEvent, EventKind, Faction, FactionId, Relation,
    ResourceDelta, Resources, Stance, Treaty, TreatyId, TreatyKind, TreatyStatus, Village,
    VillageId,
};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::domain::errors::StoreError;
use crate::ports::{DiploStore, WorldStore};

/// Ordered, embedded schema migrations. New scripts go at the end; versions
/// already recorded in `schema_migrations` are skipped.
const MIGRATIONS: &[(&str, &str)] = &[
    ("0001_world", include_str!("../../migrations/0001_world.sql")),
    ("0002_gameplay", include_str!("../../migrations/0002_gameplay.sql")),
    ("0003_diplomacy", include_str!("../../migrations/0003_diplomacy.sql")),
];

/// Durable engine backed by a SQLite database.
pub struct SqliteEngine {
    path: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteEngine {
    /// Open (creating if needed) the database and bring the schema up to
    /// date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut conn = Connection::open(&path)?;
        apply_migrations(&mut conn, MIGRATIONS)?;

        // Villages created before the gameplay tables existed (or seeded by
        // migration) still need a clock; start them now.
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO engine_state (village_id, last_tick)
             SELECT id, ?1 FROM village
             WHERE id NOT IN (SELECT village_id FROM engine_state)",
            params![now],
        )?;

        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    fn parse_ts(&self, raw: &str) -> Result<DateTime<Utc>, StoreError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StoreError::Corrupt {
                path: self.path.clone(),
                reason: format!("bad timestamp {raw:?}: {e}"),
            })
    }

    fn queue_of(&self, conn: &Connection, vid: VillageId) -> Result<Vec<String>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT building, level FROM build_queue
             WHERE village_id = ?1 ORDER BY queued_at, id",
        )?;
        let rows = stmt.query_map(params![vid], |row| {
            let building: String = row.get(0)?;
            let level: u32 = row.get(1)?;
            Ok(format!("{building} -> L{level}"))
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn village_row(
        &self,
        conn: &Connection,
        vid: VillageId,
        name: String,
    ) -> Result<Village, StoreError> {
        let resources = conn
            .query_row(
                "SELECT wood, clay, iron, crop FROM resources WHERE village_id = ?1",
                params![vid],
                |row| {
                    Ok(Resources::new(
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                    ))
                },
            )
            .optional()?
            .unwrap_or_default();
        Ok(Village {
            id: vid,
            name,
            resources,
            queue: self.queue_of(conn, vid)?,
        })
    }
}

/// Apply pending migrations in version order, each inside a transaction
/// that also records the version. Re-running is a no-op.
pub fn apply_migrations(
    conn: &mut Connection,
    migrations: &[(&str, &str)],
) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (version TEXT PRIMARY KEY)",
        [],
    )?;

    let applied: Vec<String> = {
        let mut stmt = conn.prepare("SELECT version FROM schema_migrations")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<Result<_, _>>()?
    };

    let mut pending: Vec<&(&str, &str)> = migrations
        .iter()
        .filter(|(version, _)| !applied.iter().any(|v| v == version))
        .collect();
    pending.sort_by_key(|(version, _)| *version);

    for (version, sql) in pending {
        let tx = conn.transaction()?;
        tx.execute_batch(sql)
            .and_then(|()| {
                tx.execute(
                    "INSERT INTO schema_migrations (version) VALUES (?1)",
                    params![version],
                )
                .map(|_| ())
            })
            .map_err(|source| StoreError::Migration {
                version: version.to_string(),
                source,
            })?;
        tx.commit()?;
        debug!(version, "applied schema migration");
    }
    Ok(())
}

impl WorldStore for SqliteEngine {
    fn snapshot(&self) -> Result<Vec<Village>, StoreError> {
        let conn = self.conn.lock();
        let names: Vec<(VillageId, String)> = {
            let mut stmt = conn.prepare("SELECT id, name FROM village ORDER BY id")?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            rows.collect::<Result<_, _>>()?
        };
        names
            .into_iter()
            .map(|(vid, name)| self.village_row(&conn, vid, name))
            .collect()
    }

    fn village(&self, id: VillageId) -> Result<Option<Village>, StoreError> {
        let conn = self.conn.lock();
        let name = conn
            .query_row(
                "SELECT name FROM village WHERE id = ?1",
                params![id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        match name {
            Some(name) => Ok(Some(self.village_row(&conn, id, name)?)),
            None => Ok(None),
        }
    }

    fn queue_build(&self, cmd: &BuildCmd) -> Result<bool, StoreError> {
        if cmd.building.is_empty() || cmd.level_target == 0 {
            return Ok(false);
        }
        let conn = self.conn.lock();
        let exists = conn
            .query_row(
                "SELECT 1 FROM village WHERE id = ?1",
                params![cmd.village_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !exists {
            return Ok(false);
        }
        conn.execute(
            "INSERT INTO build_queue (village_id, building, level, queued_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                cmd.village_id,
                cmd.building,
                cmd.level_target,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(true)
    }

    fn building_levels(&self, vid: VillageId) -> Result<HashMap<Building, u32>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare("SELECT building, level FROM building_level WHERE village_id = ?1")?;
        let rows = stmt.query_map(params![vid], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
        })?;
        let mut levels = HashMap::new();
        for row in rows {
            let (name, level) = row?;
            if let Ok(building) = name.parse::<Building>() {
                levels.insert(building, level);
            }
        }
        Ok(levels)
    }

    fn set_building_level(
        &self,
        vid: VillageId,
        building: Building,
        level: u32,
    ) -> Result<(), StoreError> {
        self.conn.lock().execute(
            "INSERT INTO building_level (village_id, building, level) VALUES (?1, ?2, ?3)
             ON CONFLICT(village_id, building) DO UPDATE SET level = excluded.level",
            params![vid, building.as_str(), level],
        )?;
        Ok(())
    }

    fn last_tick(&self, vid: VillageId) -> Result<Option<DateTime<Utc>>, StoreError> {
        let raw = self
            .conn
            .lock()
            .query_row(
                "SELECT last_tick FROM engine_state WHERE village_id = ?1",
                params![vid],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        raw.map(|s| self.parse_ts(&s)).transpose()
    }

    fn set_last_tick(&self, vid: VillageId, ts: DateTime<Utc>) -> Result<(), StoreError> {
        self.conn.lock().execute(
            "INSERT INTO engine_state (village_id, last_tick) VALUES (?1, ?2)
             ON CONFLICT(village_id) DO UPDATE SET last_tick = excluded.last_tick",
            params![vid, ts.to_rfc3339()],
        )?;
        Ok(())
    }

    fn apply_resource_delta(
        &self,
        vid: VillageId,
        delta: &ResourceDelta,
    ) -> Result<(), StoreError> {
        self.conn.lock().execute(
            "UPDATE resources
             SET wood = wood + ?2, clay = clay + ?3, iron = iron + ?4, crop = crop + ?5
             WHERE village_id = ?1",
            params![vid, delta.wood, delta.clay, delta.iron, delta.crop],
        )?;
        Ok(())
    }

    fn debit_wood(&self, vid: VillageId, amount: i64) -> Result<bool, StoreError> {
        let changed = self.conn.lock().execute(
            "UPDATE resources SET wood = wood - ?2
             WHERE village_id = ?1 AND wood >= ?2",
            params![vid, amount],
        )?;
        Ok(changed > 0)
    }
}

impl DiploStore for SqliteEngine {
    fn list_factions(&self) -> Result<Vec<Faction>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id, name, is_player FROM faction ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Faction {
                id: row.get(0)?,
                name: row.get(1)?,
                is_player: row.get::<_, i64>(2)? != 0,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn faction(&self, id: FactionId) -> Result<Option<Faction>, StoreError> {
        Ok(self
            .conn
            .lock()
            .query_row(
                "SELECT id, name, is_player FROM faction WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Faction {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        is_player: row.get::<_, i64>(2)? != 0,
                    })
                },
            )
            .optional()?)
    }

    fn relation(&self, a: FactionId, b: FactionId) -> Result<Option<Relation>, StoreError> {
        let (a, b) = normalize_pair(a, b);
        let row = self
            .conn
            .lock()
            .query_row(
                "SELECT stance, opinion, last_updated FROM relation WHERE a = ?1 AND b = ?2",
                params![a, b],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;
        row.map(|(stance, opinion, last_updated)| {
            Ok(Relation {
                a,
                b,
                stance: stance.parse().map_err(|reason| StoreError::Corrupt {
                    path: self.path.clone(),
                    reason,
                })?,
                opinion,
                last_updated: self.parse_ts(&last_updated)?,
            })
        })
        .transpose()
    }

    fn upsert_relation(
        &self,
        a: FactionId,
        b: FactionId,
        stance: Stance,
        opinion: f64,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let (a, b) = normalize_pair(a, b);
        self.conn.lock().execute(
            "INSERT INTO relation (a, b, stance, opinion, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(a, b) DO UPDATE
             SET stance = excluded.stance,
                 opinion = excluded.opinion,
                 last_updated = excluded.last_updated",
            params![a, b, stance.to_string(), opinion, now.to_rfc3339()],
        )?;
        Ok(())
    }

    fn list_relations(&self) -> Result<Vec<Relation>, StoreError> {
        let rows: Vec<(FactionId, FactionId, String, f64, String)> = {
            let conn = self.conn.lock();
            let mut stmt = conn
                .prepare("SELECT a, b, stance, opinion, last_updated FROM relation ORDER BY a, b")?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            })?;
            rows.collect::<Result<_, _>>()?
        };
        rows.into_iter()
            .map(|(a, b, stance, opinion, last_updated)| {
                Ok(Relation {
                    a,
                    b,
                    stance: stance.parse().map_err(|reason| StoreError::Corrupt {
                        path: self.path.clone(),
                        reason,
                    })?,
                    opinion,
                    last_updated: self.parse_ts(&last_updated)?,
                })
            })
            .collect()
    }

    fn list_treaties(&self) -> Result<Vec<Treaty>, StoreError> {
        let rows: Vec<TreatyRow> = {
            let conn = self.conn.lock();
            let mut stmt = conn.prepare(
                "SELECT id, a, b, kind, status, started_at, expires_at FROM treaty ORDER BY id",
            )?;
            let rows = stmt.query_map([], TreatyRow::from_row)?;
            rows.collect::<Result<_, _>>()?
        };
        rows.into_iter().map(|row| self.decode_treaty(row)).collect()
    }

    fn treaty(&self, id: TreatyId) -> Result<Option<Treaty>, StoreError> {
        let row = self
            .conn
            .lock()
            .query_row(
                "SELECT id, a, b, kind, status, started_at, expires_at
                 FROM treaty WHERE id = ?1",
                params![id],
                TreatyRow::from_row,
            )
            .optional()?;
        row.map(|row| self.decode_treaty(row)).transpose()
    }

    fn open_treaty(
        &self,
        a: FactionId,
        b: FactionId,
        kind: TreatyKind,
        started_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<TreatyId, StoreError> {
        let (a, b) = normalize_pair(a, b);
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO treaty (a, b, kind, status, started_at, expires_at)
             VALUES (?1, ?2, ?3, 'ACTIVE', ?4, ?5)",
            params![
                a,
                b,
                kind.as_str(),
                started_at.to_rfc3339(),
                expires_at.map(|t| t.to_rfc3339())
            ],
        )?;
        Ok(conn.last_insert_rowid() as TreatyId)
    }

    fn set_treaty_status(&self, id: TreatyId, status: TreatyStatus) -> Result<(), StoreError> {
        self.conn.lock().execute(
            "UPDATE treaty SET status = ?2 WHERE id = ?1",
            params![id, status.to_string()],
        )?;
        Ok(())
    }

    fn log_event(
        &self,
        kind: EventKind,
        payload: serde_json::Value,
        ts: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.conn.lock().execute(
            "INSERT INTO diplomacy_event (kind, payload, ts) VALUES (?1, ?2, ?3)",
            params![kind.to_string(), payload.to_string(), ts.to_rfc3339()],
        )?;
        Ok(())
    }

    fn events_since(
        &self,
        since: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<DiplomacyEvent>, StoreError> {
        let rows: Vec<(u64, String, String, String)> = {
            let conn = self.conn.lock();
            let since_str = since.map(|t| t.to_rfc3339());
            let mut stmt = conn.prepare(
                "SELECT id, kind, payload, ts FROM diplomacy_event
                 WHERE (?1 IS NULL OR ts >= ?1) ORDER BY id",
            )?;
            let rows = stmt.query_map(params![since_str], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?;
            rows.collect::<Result<_, _>>()?
        };
        let skip = limit.map_or(0, |n| rows.len().saturating_sub(n));
        rows.into_iter()
            .skip(skip)
            .map(|(id, kind, payload, ts)| {
                Ok(DiplomacyEvent {
                    id,
                    kind: kind.parse().map_err(|reason| StoreError::Corrupt {
                        path: self.path.clone(),
                        reason,
                    })?,
                    payload: serde_json::from_str(&payload).unwrap_or(serde_json::Value::Null),
                    ts: self.parse_ts(&ts)?,
                })
            })
            .collect()
    }
}

struct TreatyRow {
    id: TreatyId,
    a: FactionId,
    b: FactionId,
    kind: String,
    status: String,
    started_at: String,
    expires_at: Option<String>,
}

impl TreatyRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            a: row.get(1)?,
            b: row.get(2)?,
            kind: row.get(3)?,
            status: row.get(4)?,
            started_at: row.get(5)?,
            expires_at: row.get(6)?,
        })
    }
}

impl SqliteEngine {
    fn decode_treaty(&self, row: TreatyRow) -> Result<Treaty, StoreError> {
        let corrupt = |reason: String| StoreError::Corrupt {
            path: self.path.clone(),
            reason,
        };
        Ok(Treaty {
            id: row.id,
            a: row.a,
            b: row.b,
            kind: row
                .kind
                .parse()
                .map_err(|e: imperium_types::UnknownTreatyKind| corrupt(e.to_string()))?,
            status: row.status.parse().map_err(corrupt)?,
            started_at: self.parse_ts(&row.started_at)?,
            expires_at: row.expires_at.map(|s| self.parse_ts(&s)).transpose()?,
        })
    }
}
