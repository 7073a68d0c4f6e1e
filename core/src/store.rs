//! Durable tabular record store
//!
//! This module provides the flat-file table store behind the record
//! services. A table is one file under the data directory: the first line
//! is the JSON-encoded schema (ordered column names) and every following
//! line is one JSON-encoded row. Rows are appended in insertion order and
//! never mutated in place.
//!
//! Every operation is a full load-mutate-save cycle guarded by a single
//! writer lock, so two concurrent writes cannot lose each other's rows.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Outcome of a uniqueness-checked append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// A new row was appended
    Appended,

    /// An equivalent row already existed; nothing was written
    AlreadyPresent,
}

/// A loaded table: ordered schema plus ordered rows
struct Table {
    schema: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a column-name to value map for one row
    fn row_map(&self, row: &[Value]) -> Map<String, Value> {
        self.schema
            .iter()
            .cloned()
            .zip(row.iter().cloned())
            .collect()
    }
}

/// File-backed table store
///
/// One physical file per table, all writes serialized through a single
/// writer lock. Reads of a table that was never created return empty
/// results rather than errors.
pub struct TableStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl TableStore {
    /// Create a store rooted at the given data directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        TableStore {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file for a table
    pub fn table_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.tbl", name))
    }

    /// Create the backing file with a header row if it does not exist
    ///
    /// Idempotent: an existing file is left untouched and its header is
    /// trusted as-is.
    pub fn ensure_table(&self, name: &str, schema: &[&str]) -> Result<()> {
        let _guard = self.lock()?;
        let path = self.table_path(name);
        if path.exists() {
            return Ok(());
        }

        fs::create_dir_all(&self.dir)?;
        let table = Table {
            schema: schema.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        };
        save_table(&path, &table)?;
        tracing::info!(table = name, path = %path.display(), "created table file");
        Ok(())
    }

    /// Append one row after the current last row
    ///
    /// The row must have exactly as many values as the table has columns.
    pub fn append_row(&self, name: &str, row: Vec<Value>) -> Result<()> {
        let _guard = self.lock()?;
        let path = self.table_path(name);
        let mut table = load_table(&path)?
            .ok_or_else(|| CoreError::Store(format!("table '{}' has not been created", name)))?;

        if row.len() != table.schema.len() {
            return Err(CoreError::Store(format!(
                "row has {} values but table '{}' has {} columns",
                row.len(),
                name,
                table.schema.len()
            )));
        }

        table.rows.push(row);
        save_table(&path, &table)?;
        tracing::debug!(table = name, rows = table.rows.len(), "appended row");
        Ok(())
    }

    /// Append a row unless an existing row already satisfies the predicate
    ///
    /// The check, the row construction and the append all run under the
    /// writer lock, so `make_row` can safely derive values (such as a
    /// positional id) from the row count it receives.
    pub fn append_row_unique<P, F>(&self, name: &str, predicate: P, make_row: F) -> Result<AppendOutcome>
    where
        P: Fn(&Map<String, Value>) -> bool,
        F: FnOnce(usize) -> Vec<Value>,
    {
        let _guard = self.lock()?;
        let path = self.table_path(name);
        let mut table = load_table(&path)?
            .ok_or_else(|| CoreError::Store(format!("table '{}' has not been created", name)))?;

        for row in &table.rows {
            if predicate(&table.row_map(row)) {
                return Ok(AppendOutcome::AlreadyPresent);
            }
        }

        let row = make_row(table.rows.len());
        if row.len() != table.schema.len() {
            return Err(CoreError::Store(format!(
                "row has {} values but table '{}' has {} columns",
                row.len(),
                name,
                table.schema.len()
            )));
        }

        table.rows.push(row);
        save_table(&path, &table)?;
        tracing::debug!(table = name, rows = table.rows.len(), "appended unique row");
        Ok(AppendOutcome::Appended)
    }

    /// Return every row as a column-name to value map
    ///
    /// A table that was never created yields an empty vector, not an error.
    pub fn scan(&self, name: &str) -> Result<Vec<Map<String, Value>>> {
        let _guard = self.lock()?;
        let path = self.table_path(name);
        let table = match load_table(&path)? {
            Some(table) => table,
            None => return Ok(Vec::new()),
        };

        Ok(table.rows.iter().map(|row| table.row_map(row)).collect())
    }

    /// Scan, keeping only rows where the predicate holds
    pub fn filter<P>(&self, name: &str, predicate: P) -> Result<Vec<Map<String, Value>>>
    where
        P: Fn(&Map<String, Value>) -> bool,
    {
        let mut rows = self.scan(name)?;
        rows.retain(|row| predicate(row));
        Ok(rows)
    }

    /// Delete the first row satisfying the predicate
    ///
    /// Returns whether a deletion occurred; an absent table file is
    /// reported as `false`, not as an error.
    pub fn delete_first_match<P>(&self, name: &str, predicate: P) -> Result<bool>
    where
        P: Fn(&Map<String, Value>) -> bool,
    {
        let _guard = self.lock()?;
        let path = self.table_path(name);
        let mut table = match load_table(&path)? {
            Some(table) => table,
            None => return Ok(false),
        };

        let position = table
            .rows
            .iter()
            .position(|row| predicate(&table.row_map(row)));

        match position {
            Some(index) => {
                table.rows.remove(index);
                save_table(&path, &table)?;
                tracing::debug!(table = name, rows = table.rows.len(), "deleted row");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| CoreError::Store("table store lock poisoned".to_string()))
    }
}

/// Load a table file, or `None` if it does not exist
fn load_table(path: &Path) -> Result<Option<Table>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut lines = contents.lines();
    let header = lines.next().ok_or_else(|| {
        CoreError::Store(format!("table file '{}' is missing its header row", path.display()))
    })?;
    let schema: Vec<String> = serde_json::from_str(header).map_err(|e| {
        CoreError::Store(format!("corrupt header in '{}': {}", path.display(), e))
    })?;

    let mut rows = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let row: Vec<Value> = serde_json::from_str(line).map_err(|e| {
            CoreError::Store(format!("corrupt row in '{}': {}", path.display(), e))
        })?;
        if row.len() != schema.len() {
            return Err(CoreError::Store(format!(
                "row in '{}' has {} values but the table has {} columns",
                path.display(),
                row.len(),
                schema.len()
            )));
        }
        rows.push(row);
    }

    Ok(Some(Table { schema, rows }))
}

/// Persist the whole table, header first
fn save_table(path: &Path, table: &Table) -> Result<()> {
    let mut contents = serde_json::to_string(&table.schema)?;
    contents.push('\n');
    for row in &table.rows {
        contents.push_str(&serde_json::to_string(row)?);
        contents.push('\n');
    }
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const SCHEMA: &[&str] = &["Hotel Code", "Name", "Rating"];

    fn test_store() -> (TempDir, TableStore) {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_ensure_table_is_idempotent() {
        let (_dir, store) = test_store();

        store.ensure_table("Hotels", SCHEMA).unwrap();
        store
            .append_row("Hotels", vec![json!("H1"), json!("Grand"), json!(5)])
            .unwrap();

        // A second ensure must not touch the existing file.
        store.ensure_table("Hotels", SCHEMA).unwrap();
        assert_eq!(store.scan("Hotels").unwrap().len(), 1);
    }

    #[test]
    fn test_append_and_scan_round_trip() {
        let (_dir, store) = test_store();
        store.ensure_table("Hotels", SCHEMA).unwrap();

        store
            .append_row("Hotels", vec![json!("H1"), json!("Grand"), json!(5)])
            .unwrap();

        let rows = store.scan("Hotels").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Hotel Code"], json!("H1"));
        assert_eq!(rows[0]["Name"], json!("Grand"));
        assert_eq!(rows[0]["Rating"], json!(5));
    }

    #[test]
    fn test_no_uniqueness_on_plain_append() {
        let (_dir, store) = test_store();
        store.ensure_table("Hotels", SCHEMA).unwrap();

        store
            .append_row("Hotels", vec![json!("H1"), json!("Grand"), json!(5)])
            .unwrap();
        store
            .append_row("Hotels", vec![json!("H1"), json!("Grand Annex"), json!(4)])
            .unwrap();

        // Same hotel code twice yields two distinct rows.
        let rows = store.scan("Hotels").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_scan_missing_table_is_empty() {
        let (_dir, store) = test_store();
        let rows = store.scan("NeverCreated").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_append_to_missing_table_fails() {
        let (_dir, store) = test_store();
        let result = store.append_row("NeverCreated", vec![json!("x")]);
        assert!(matches!(result, Err(CoreError::Store(_))));
    }

    #[test]
    fn test_append_rejects_wrong_arity() {
        let (_dir, store) = test_store();
        store.ensure_table("Hotels", SCHEMA).unwrap();

        let result = store.append_row("Hotels", vec![json!("H1")]);
        assert!(matches!(result, Err(CoreError::Store(_))));
        assert!(store.scan("Hotels").unwrap().is_empty());
    }

    #[test]
    fn test_filter_is_stringwise_friendly() {
        let (_dir, store) = test_store();
        store.ensure_table("Wishlist", &["Customer ID", "Hotel Code"]).unwrap();

        // Customer ids may be stored as numbers or strings.
        store
            .append_row("Wishlist", vec![json!(42), json!("H1")])
            .unwrap();
        store
            .append_row("Wishlist", vec![json!("42"), json!("H2")])
            .unwrap();
        store
            .append_row("Wishlist", vec![json!(7), json!("H3")])
            .unwrap();

        let rows = store
            .filter("Wishlist", |row| {
                crate::records::value_as_string(&row["Customer ID"]) == "42"
            })
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_delete_first_match_removes_exactly_one() {
        let (_dir, store) = test_store();
        store.ensure_table("Wishlist", &["Customer ID", "Hotel Code"]).unwrap();
        store
            .append_row("Wishlist", vec![json!("c1"), json!("H1")])
            .unwrap();
        store
            .append_row("Wishlist", vec![json!("c1"), json!("H2")])
            .unwrap();
        store
            .append_row("Wishlist", vec![json!("c2"), json!("H1")])
            .unwrap();

        let deleted = store
            .delete_first_match("Wishlist", |row| row["Customer ID"] == json!("c1"))
            .unwrap();
        assert!(deleted);

        // Remaining rows keep their original order.
        let rows = store.scan("Wishlist").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Hotel Code"], json!("H2"));
        assert_eq!(rows[1]["Customer ID"], json!("c2"));
    }

    #[test]
    fn test_delete_on_missing_table_is_false() {
        let (_dir, store) = test_store();
        let deleted = store.delete_first_match("NeverCreated", |_| true).unwrap();
        assert!(!deleted);
    }

    #[test]
    fn test_delete_without_match_is_false() {
        let (_dir, store) = test_store();
        store.ensure_table("Wishlist", &["Customer ID", "Hotel Code"]).unwrap();
        store
            .append_row("Wishlist", vec![json!("c1"), json!("H1")])
            .unwrap();

        let deleted = store
            .delete_first_match("Wishlist", |row| row["Hotel Code"] == json!("H9"))
            .unwrap();
        assert!(!deleted);
        assert_eq!(store.scan("Wishlist").unwrap().len(), 1);
    }

    #[test]
    fn test_append_row_unique_dedups() {
        let (_dir, store) = test_store();
        store.ensure_table("Wishlist", &["Customer ID", "Hotel Code"]).unwrap();

        let outcome = store
            .append_row_unique(
                "Wishlist",
                |row| row["Customer ID"] == json!("c1") && row["Hotel Code"] == json!("H1"),
                |_count| vec![json!("c1"), json!("H1")],
            )
            .unwrap();
        assert_eq!(outcome, AppendOutcome::Appended);

        let outcome = store
            .append_row_unique(
                "Wishlist",
                |row| row["Customer ID"] == json!("c1") && row["Hotel Code"] == json!("H1"),
                |_count| vec![json!("c1"), json!("H1")],
            )
            .unwrap();
        assert_eq!(outcome, AppendOutcome::AlreadyPresent);

        assert_eq!(store.scan("Wishlist").unwrap().len(), 1);
    }

    #[test]
    fn test_append_row_unique_sees_current_row_count() {
        let (_dir, store) = test_store();
        store.ensure_table("Wishlist", &["ID", "Hotel Code"]).unwrap();

        for (i, code) in ["H1", "H2", "H3"].iter().enumerate() {
            let outcome = store
                .append_row_unique(
                    "Wishlist",
                    |row| row["Hotel Code"] == json!(code),
                    |count| {
                        assert_eq!(count, i);
                        vec![json!(count + 1), json!(code)]
                    },
                )
                .unwrap();
            assert_eq!(outcome, AppendOutcome::Appended);
        }
    }

    #[test]
    fn test_tables_survive_reopening_the_store() {
        let dir = TempDir::new().unwrap();
        {
            let store = TableStore::new(dir.path());
            store.ensure_table("Hotels", SCHEMA).unwrap();
            store
                .append_row("Hotels", vec![json!("H1"), json!("Grand"), json!(5)])
                .unwrap();
        }

        let reopened = TableStore::new(dir.path());
        let rows = reopened.scan("Hotels").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Hotel Code"], json!("H1"));
    }
}
