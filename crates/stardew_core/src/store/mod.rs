//! SQLite-backed snapshot history.
//!
//! Every analysis run appends one row to `saves` plus a status row for every
//! catalog fish (`fish_snapshots`) and recipe (`recipe_snapshots`). Rows are
//! never updated or deleted, so any two snapshots can be compared directly.

pub mod schema;

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use tracing::{debug, info};

use crate::core_api::{
    Catalog, CoreError, CoreErrorCode, FishRecord, ProgressDiff, ProgressReport, ProgressSnapshot,
    RecipeRecord, SnapshotSummary, diff_snapshots,
};

pub struct SnapshotStore {
    conn: Mutex<Connection>,
}

impl SnapshotStore {
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        info!("opening snapshot database at {}", path.display());
        let conn = Connection::open(path).map_err(|e| {
            CoreError::persistence(&format!("failed to open {}", path.display()), e)
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| CoreError::persistence("failed to set PRAGMA", e))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, CoreError> {
        debug!("opening in-memory snapshot database");
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::persistence("failed to open in-memory database", e))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, CoreError> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| CoreError::persistence("failed to enable foreign keys", e))?;
        schema::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CoreError> {
        self.conn.lock().map_err(|e| {
            CoreError::new(
                CoreErrorCode::Persistence,
                format!("snapshot database lock poisoned: {e}"),
            )
        })
    }

    /// Persists a full-width snapshot of `report` stamped with the current time.
    pub fn record(
        &self,
        catalog: &Catalog,
        report: &ProgressReport,
    ) -> Result<ProgressSnapshot, CoreError> {
        self.record_at(catalog, report, Utc::now())
    }

    pub fn record_at(
        &self,
        catalog: &Catalog,
        report: &ProgressReport,
        uploaded_at: DateTime<Utc>,
    ) -> Result<ProgressSnapshot, CoreError> {
        let (fish, recipes) = snapshot_records(catalog, report);
        let mut conn = self.lock()?;
        let id = insert_snapshot(&mut conn, uploaded_at, &fish, &recipes)?;
        info!(
            snapshot_id = id,
            fish = fish.len(),
            recipes = recipes.len(),
            "recorded progress snapshot"
        );
        Ok(ProgressSnapshot {
            id,
            uploaded_at,
            fish,
            recipes,
        })
    }

    pub fn snapshot(&self, id: i64) -> Result<Option<ProgressSnapshot>, CoreError> {
        let conn = self.lock()?;
        load_snapshot(&conn, id)
    }

    /// The snapshot with the largest id strictly below `id`.
    pub fn previous_snapshot(&self, id: i64) -> Result<Option<ProgressSnapshot>, CoreError> {
        let conn = self.lock()?;
        let previous_id: Option<i64> = conn
            .query_row(
                "SELECT id FROM saves WHERE id < ?1 ORDER BY id DESC LIMIT 1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| CoreError::persistence("failed to find previous snapshot", e))?;

        match previous_id {
            Some(previous_id) => load_snapshot(&conn, previous_id),
            None => Ok(None),
        }
    }

    /// Newly caught fish and newly cooked recipes since the snapshot before
    /// `current`; `None` when `current` is the first one.
    pub fn progress_since(
        &self,
        current: &ProgressSnapshot,
    ) -> Result<Option<ProgressDiff>, CoreError> {
        let Some(previous) = self.previous_snapshot(current.id)? else {
            debug!(snapshot_id = current.id, "no prior snapshot to diff against");
            return Ok(None);
        };
        let diff = diff_snapshots(&previous, current);
        debug!(
            snapshot_id = current.id,
            previous_id = previous.id,
            newly_caught = diff.newly_caught_fish.len(),
            newly_cooked = diff.newly_cooked_recipes.len(),
            "computed progress diff"
        );
        Ok(Some(diff))
    }

    pub fn list_snapshots(&self) -> Result<Vec<SnapshotSummary>, CoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                r#"
                SELECT s.id, s.uploaded_at,
                    (SELECT COUNT(*) FROM fish_snapshots f WHERE f.save_id = s.id AND f.caught = 1),
                    (SELECT COUNT(*) FROM recipe_snapshots r WHERE r.save_id = s.id AND r.learned = 1),
                    (SELECT COUNT(*) FROM recipe_snapshots r WHERE r.save_id = s.id AND r.cooked = 1)
                FROM saves s
                ORDER BY s.id
                "#,
            )
            .map_err(|e| CoreError::persistence("failed to prepare history query", e))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(SnapshotSummary {
                    id: row.get(0)?,
                    uploaded_at: row.get(1)?,
                    fish_caught: row.get::<_, i64>(2)? as usize,
                    recipes_learned: row.get::<_, i64>(3)? as usize,
                    recipes_cooked: row.get::<_, i64>(4)? as usize,
                })
            })
            .map_err(|e| CoreError::persistence("failed to query history", e))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| CoreError::persistence("failed to read history row", e))
    }

    pub fn snapshot_count(&self) -> Result<usize, CoreError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM saves", [], |row| row.get(0))
            .map_err(|e| CoreError::persistence("failed to count snapshots", e))?;
        Ok(count as usize)
    }
}

/// Expands a report into one record per catalog fish and recipe.
pub fn snapshot_records(
    catalog: &Catalog,
    report: &ProgressReport,
) -> (Vec<FishRecord>, Vec<RecipeRecord>) {
    let caught: BTreeSet<&str> = report
        .fish
        .caught_list
        .iter()
        .map(|fish| fish.id.as_str())
        .collect();
    let fish = catalog
        .fish()
        .iter()
        .map(|entry| FishRecord {
            fish_id: entry.id.clone(),
            fish_name: entry.name.clone(),
            caught: caught.contains(entry.id.as_str()),
        })
        .collect();

    let missing_to_learn: BTreeSet<&str> = report
        .recipes
        .missing_to_learn_list
        .iter()
        .map(String::as_str)
        .collect();
    let missing_to_cook: BTreeSet<&str> = report
        .recipes
        .missing_list
        .iter()
        .map(|recipe| recipe.name.as_str())
        .collect();
    let recipes = catalog
        .recipes()
        .names()
        .map(|name| RecipeRecord {
            recipe_name: name.to_string(),
            learned: !missing_to_learn.contains(name),
            cooked: !missing_to_cook.contains(name),
        })
        .collect();

    (fish, recipes)
}

fn insert_snapshot(
    conn: &mut Connection,
    uploaded_at: DateTime<Utc>,
    fish: &[FishRecord],
    recipes: &[RecipeRecord],
) -> Result<i64, CoreError> {
    // IMMEDIATE takes the write lock up front so concurrent writers serialise
    // on the whole snapshot rather than interleaving.
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| CoreError::persistence("failed to begin transaction", e))?;

    tx.execute(
        "INSERT INTO saves (uploaded_at) VALUES (?1)",
        params![uploaded_at],
    )
    .map_err(|e| CoreError::persistence("failed to insert snapshot", e))?;
    let save_id = tx.last_insert_rowid();

    {
        let mut insert_fish = tx
            .prepare(
                "INSERT INTO fish_snapshots (save_id, fish_id, fish_name, caught) VALUES (?1, ?2, ?3, ?4)",
            )
            .map_err(|e| CoreError::persistence("failed to prepare fish insert", e))?;
        for record in fish {
            insert_fish
                .execute(params![
                    save_id,
                    record.fish_id,
                    record.fish_name,
                    record.caught
                ])
                .map_err(|e| CoreError::persistence("failed to insert fish record", e))?;
        }

        let mut insert_recipe = tx
            .prepare(
                "INSERT INTO recipe_snapshots (save_id, recipe_name, learned, cooked) VALUES (?1, ?2, ?3, ?4)",
            )
            .map_err(|e| CoreError::persistence("failed to prepare recipe insert", e))?;
        for record in recipes {
            insert_recipe
                .execute(params![
                    save_id,
                    record.recipe_name,
                    record.learned,
                    record.cooked
                ])
                .map_err(|e| CoreError::persistence("failed to insert recipe record", e))?;
        }
    }

    tx.commit()
        .map_err(|e| CoreError::persistence("failed to commit snapshot", e))?;
    Ok(save_id)
}

fn load_snapshot(conn: &Connection, id: i64) -> Result<Option<ProgressSnapshot>, CoreError> {
    let uploaded_at: Option<DateTime<Utc>> = conn
        .query_row(
            "SELECT uploaded_at FROM saves WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| CoreError::persistence("failed to load snapshot", e))?;
    let Some(uploaded_at) = uploaded_at else {
        return Ok(None);
    };

    let mut fish_stmt = conn
        .prepare(
            "SELECT fish_id, fish_name, caught FROM fish_snapshots WHERE save_id = ?1 ORDER BY fish_id",
        )
        .map_err(|e| CoreError::persistence("failed to prepare fish query", e))?;
    let fish = fish_stmt
        .query_map(params![id], |row| {
            Ok(FishRecord {
                fish_id: row.get(0)?,
                fish_name: row.get(1)?,
                caught: row.get(2)?,
            })
        })
        .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
        .map_err(|e| CoreError::persistence("failed to load fish records", e))?;

    let mut recipe_stmt = conn
        .prepare(
            "SELECT recipe_name, learned, cooked FROM recipe_snapshots WHERE save_id = ?1 ORDER BY recipe_name",
        )
        .map_err(|e| CoreError::persistence("failed to prepare recipe query", e))?;
    let recipes = recipe_stmt
        .query_map(params![id], |row| {
            Ok(RecipeRecord {
                recipe_name: row.get(0)?,
                learned: row.get(1)?,
                cooked: row.get(2)?,
            })
        })
        .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
        .map_err(|e| CoreError::persistence("failed to load recipe records", e))?;

    Ok(Some(ProgressSnapshot {
        id,
        uploaded_at,
        fish,
        recipes,
    }))
}
