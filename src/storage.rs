use crate::card::{Card, CardId};
use crate::clock::{format_timestamp, parse_timestamp};
use crate::error::{Result, StoreError};
use crate::scheduler::{ScheduledState, Stage};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Type, ValueRef};
use rusqlite::{Connection, Row, ToSql, params};
use std::path::{Path, PathBuf};

const CARD_COLUMNS: &str =
    "id, question, answer, created_at, next_review, stage, correct_count";

impl ToSql for Stage {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(i64::from(self.value())))
    }
}

impl FromSql for Stage {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_i64()?;
        u8::try_from(raw)
            .ok()
            .and_then(Stage::new)
            .ok_or(FromSqlError::OutOfRange(raw))
    }
}

fn timestamp_column(row: &Row, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let text: String = row.get(idx)?;
    parse_timestamp(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn card_from_row(row: &Row) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        question: row.get(1)?,
        answer: row.get(2)?,
        created_at: timestamp_column(row, 3)?,
        next_review: timestamp_column(row, 4)?,
        stage: row.get(5)?,
        correct_count: row.get(6)?,
    })
}

/// SQLite-backed card store
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the database
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        log::debug!("Opened card database at {}", path.display());
        Self::with_connection(conn)
    }

    /// Open a throwaway database that lives only as long as the handle
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        let storage = Storage { conn };
        storage.init_schema()?;

        Ok(storage)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS cards (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                created_at TEXT NOT NULL,
                next_review TEXT NOT NULL,
                stage INTEGER NOT NULL DEFAULT 0,
                correct_count INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_cards_next_review ON cards(next_review);
            ",
        )?;

        Ok(())
    }

    /// Insert a new card that is due immediately.
    ///
    /// Empty question or answer text is accepted as-is.
    pub fn create_card(&self, question: &str, answer: &str, now: NaiveDateTime) -> Result<CardId> {
        let now = format_timestamp(now);

        self.conn.execute(
            "INSERT INTO cards (question, answer, created_at, next_review, stage, correct_count)
             VALUES (?1, ?2, ?3, ?3, ?4, 0)",
            params![question, answer, now, Stage::INITIAL],
        )?;

        let id = self.conn.last_insert_rowid();
        log::debug!("Created card {}", id);

        Ok(id)
    }

    /// Get a card by ID
    pub fn get_card(&self, id: CardId) -> Result<Option<Card>> {
        let card = self.conn.query_row(
            &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
            params![id],
            card_from_row,
        );

        match card {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Cards with `next_review <= now`, most overdue first
    pub fn due_cards(&self, now: NaiveDateTime) -> Result<Vec<Card>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CARD_COLUMNS}
             FROM cards
             WHERE next_review <= ?1
             ORDER BY next_review ASC, id ASC"
        ))?;

        let cards = stmt
            .query_map(params![format_timestamp(now)], card_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(cards)
    }

    /// Overwrite the scheduling fields of one card
    pub fn apply_update(&self, id: CardId, state: ScheduledState) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE cards SET
                stage = ?1,
                correct_count = ?2,
                next_review = ?3
             WHERE id = ?4",
            params![
                state.stage,
                state.correct_count,
                format_timestamp(state.next_review),
                id
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        log::debug!(
            "Card {} now at stage {} ({} correct), next review {}",
            id,
            state.stage,
            state.correct_count,
            format_timestamp(state.next_review)
        );

        Ok(())
    }

    /// Total number of cards
    pub fn count_cards(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Copy the database file to `backups/` once per day and prune old copies.
    ///
    /// Returns the path of the backup written today, or `None` when there was
    /// nothing to do.
    pub fn create_daily_backup(
        db_path: &Path,
        today: NaiveDate,
        keep: usize,
    ) -> Result<Option<PathBuf>> {
        if keep == 0 || !db_path.exists() {
            return Ok(None);
        }

        let dir = db_path
            .parent()
            .map(|p| p.join("backups"))
            .unwrap_or_else(|| PathBuf::from("backups"));
        let stem = db_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("cards");
        let prefix = format!("{stem}-");

        std::fs::create_dir_all(&dir)?;

        let target = dir.join(format!("{prefix}{}.db", today.format("%Y-%m-%d")));
        let written = if target.exists() {
            None
        } else {
            std::fs::copy(db_path, &target)?;
            log::info!("Backed up card database to {}", target.display());
            Some(target)
        };

        // Date-stamped names sort chronologically
        let mut backups = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            let is_ours = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_prefix(&prefix))
                .and_then(|n| n.strip_suffix(".db"))
                .is_some_and(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok());
            if is_ours {
                backups.push(path);
            }
        }
        backups.sort();

        let excess = backups.len().saturating_sub(keep);
        for old in &backups[..excess] {
            std::fs::remove_file(old)?;
            log::info!("Removed old backup {}", old.display());
        }

        Ok(written)
    }
}
