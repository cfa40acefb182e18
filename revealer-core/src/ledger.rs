use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RevealError, Result};

/// One performed rename. Written once, never updated.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RenameRecord {
    pub id: i64,
    pub original_name: String,
    pub renamed_name: String,
}

/// Append-only store of renames, laid out like the original `log.db`.
pub struct RenameLedger {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl RenameLedger {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        let conn = Connection::open(&db_path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;

        let ledger = Self {
            conn,
            db_path: Some(db_path),
        };
        ledger.ensure_schema()?;
        Ok(ledger)
    }

    pub fn in_memory() -> Result<Self> {
        let ledger = Self {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        ledger.ensure_schema()?;
        Ok(ledger)
    }

    /// Create the table and index when absent. Safe to call repeatedly.
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS file_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                original_name TEXT,
                renamed_name TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_file_log_renamed_name ON file_log (renamed_name, id);
        "#,
        )?;
        Ok(())
    }

    /// Append one record. Call only after the physical rename succeeded.
    pub fn record(&mut self, original_name: &str, renamed_name: &str) -> Result<RenameRecord> {
        Ok(self.append(original_name, renamed_name)?)
    }

    pub(crate) fn append(
        &mut self,
        original_name: &str,
        renamed_name: &str,
    ) -> rusqlite::Result<RenameRecord> {
        let id: i64 = self.conn.query_row(
            "INSERT INTO file_log (original_name, renamed_name) VALUES (?1, ?2) RETURNING id",
            params![original_name, renamed_name],
            |row| row.get(0),
        )?;
        debug!("Logged rename #{id}: {original_name} -> {renamed_name}");

        Ok(RenameRecord {
            id,
            original_name: original_name.to_string(),
            renamed_name: renamed_name.to_string(),
        })
    }

    /// Most recent record (highest id) that produced `current_base_name`.
    pub fn find_latest(&self, current_base_name: &str) -> Result<Option<RenameRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, original_name, renamed_name FROM file_log
                 WHERE renamed_name = ?1
                 ORDER BY id DESC
                 LIMIT 1",
                params![current_base_name],
                row_to_record,
            )
            .optional()?;
        debug!(
            "Latest record for {current_base_name}: {:?}",
            record.as_ref().map(|r| r.id)
        );
        Ok(record)
    }

    pub fn find_latest_original(&self, current_base_name: &str) -> Result<Option<String>> {
        Ok(self
            .find_latest(current_base_name)?
            .map(|record| record.original_name))
    }

    /// Every record in insertion order.
    pub fn list_all(&self) -> Result<Vec<RenameRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, original_name, renamed_name FROM file_log ORDER BY id ASC")?;

        let records = stmt
            .query_map([], row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    pub fn count(&self) -> Result<u64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM file_log", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    pub fn export_json(&self, output_path: impl AsRef<Path>) -> Result<()> {
        let output_path = output_path.as_ref();
        let records = self.list_all()?;
        let json = serde_json::to_string_pretty(&records)?;
        fs::write(output_path, json).map_err(|source| RevealError::Io {
            path: output_path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    /// Backing file, `None` for an in-memory ledger.
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

// Columns are nullable in the original schema; treat NULL as an empty name.
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<RenameRecord> {
    Ok(RenameRecord {
        id: row.get(0)?,
        original_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        renamed_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_ensure_schema_is_idempotent() -> Result<()> {
        let db_file = tempfile::NamedTempFile::new()?;
        let ledger = RenameLedger::open(db_file.path())?;
        for _ in 0..5 {
            ledger.ensure_schema()?;
        }
        assert_eq!(ledger.count()?, 0);
        assert!(ledger.list_all()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_record_assigns_increasing_ids() -> Result<()> {
        let mut ledger = RenameLedger::in_memory()?;
        let first = ledger.record("a.txt", "b.txt")?;
        let second = ledger.record("c.txt", "d.txt")?;
        assert!(second.id > first.id);
        assert_eq!(first.original_name, "a.txt");
        assert_eq!(first.renamed_name, "b.txt");
        Ok(())
    }

    #[test]
    fn test_latest_match_wins() -> Result<()> {
        let mut ledger = RenameLedger::in_memory()?;
        ledger.record("x.txt", "y.txt")?;
        ledger.record("other.txt", "unrelated.txt")?;
        let newest = ledger.record("z.txt", "y.txt")?;

        let found = ledger.find_latest("y.txt")?.expect("record for y.txt");
        assert_eq!(found, newest);
        assert_eq!(ledger.find_latest_original("y.txt")?, Some("z.txt".to_string()));
        Ok(())
    }

    #[test]
    fn test_no_match_is_none() -> Result<()> {
        let mut ledger = RenameLedger::in_memory()?;
        ledger.record("x.txt", "y.txt")?;
        assert_eq!(ledger.find_latest_original("x.txt")?, None);
        assert_eq!(ledger.find_latest_original("never.txt")?, None);
        Ok(())
    }

    #[test]
    fn test_list_all_in_insertion_order() -> Result<()> {
        let mut ledger = RenameLedger::in_memory()?;
        let names = [("1.txt", "2.txt"), ("2.txt", "3.txt"), ("3.txt", "1.txt")];
        for (from, to) in names {
            ledger.record(from, to)?;
        }

        let all = ledger.list_all()?;
        let pairs: Vec<_> = all
            .iter()
            .map(|r| (r.original_name.as_str(), r.renamed_name.as_str()))
            .collect();
        assert_eq!(pairs, names);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));
        Ok(())
    }

    #[test]
    fn test_records_survive_reopen() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let db_path = dir.path().join("log.db");
        {
            let mut ledger = RenameLedger::open(&db_path)?;
            ledger.record("report.pdf", "final.pdf")?;
        }

        let ledger = RenameLedger::open(&db_path)?;
        assert_eq!(ledger.db_path(), Some(db_path.as_path()));
        assert_eq!(ledger.find_latest_original("final.pdf")?, Some("report.pdf".to_string()));
        Ok(())
    }

    #[test]
    fn test_reads_legacy_table_with_nulls() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let db_path = dir.path().join("log.db");
        {
            let conn = Connection::open(&db_path)?;
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS file_log
                    (id INTEGER PRIMARY KEY AUTOINCREMENT, original_name TEXT, renamed_name TEXT);
                 INSERT INTO file_log (original_name, renamed_name) VALUES ('old.txt', 'new.txt');
                 INSERT INTO file_log (original_name, renamed_name) VALUES (NULL, 'orphan.txt');",
            )?;
        }

        let ledger = RenameLedger::open(&db_path)?;
        let all = ledger.list_all()?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].original_name, "old.txt");
        assert_eq!(all[1].original_name, "");
        Ok(())
    }

    #[test]
    fn test_export_json() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let mut ledger = RenameLedger::in_memory()?;
        ledger.record("a.txt", "b.txt")?;

        let out = dir.path().join("log.json");
        ledger.export_json(&out)?;

        let parsed: Vec<RenameRecord> = serde_json::from_str(&fs::read_to_string(&out)?)?;
        assert_eq!(parsed, ledger.list_all()?);
        Ok(())
    }
}
