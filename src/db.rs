use std::path::Path;

use anyhow::Result;
use rusqlite::Connection;

use crate::dataset::Dataset;

pub const DEFAULT_DB_PATH: &str = "data/governance.sqlite";
pub const DATASET_TABLE: &str = "governance";

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS export_runs (
            id           INTEGER PRIMARY KEY,
            report_date  TEXT NOT NULL,
            documents    INTEGER NOT NULL,
            skipped      INTEGER NOT NULL,
            matched      INTEGER NOT NULL,
            synthesized  INTEGER NOT NULL,
            row_count    INTEGER NOT NULL,
            created_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Replace the dataset table with the current snapshot, one TEXT column per
/// dataset column.
pub fn save_dataset(conn: &Connection, dataset: &Dataset) -> Result<usize> {
    let table = quote_ident(DATASET_TABLE);
    let cols: Vec<String> = dataset.columns.iter().map(|c| quote_ident(c)).collect();

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} ({});",
        cols.iter()
            .map(|c| format!("{} TEXT", c))
            .collect::<Vec<_>>()
            .join(", ")
    ))?;

    let mut count = 0;
    {
        let placeholders = (1..=cols.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {table} ({}) VALUES ({})",
            cols.join(", "),
            placeholders
        ))?;
        for row in &dataset.rows {
            count += stmt.execute(rusqlite::params_from_iter(row.iter()))?;
        }
    }
    tx.commit()?;
    Ok(count)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRow {
    pub id: i64,
    pub report_date: String,
    pub documents: i64,
    pub skipped: i64,
    pub matched: i64,
    pub synthesized: i64,
    pub rows: i64,
    pub created_at: String,
}

pub fn insert_run(conn: &Connection, run: &RunRow) -> Result<i64> {
    conn.execute(
        "INSERT INTO export_runs (report_date, documents, skipped, matched, synthesized, row_count)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            run.report_date,
            run.documents,
            run.skipped,
            run.matched,
            run.synthesized,
            run.rows
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn fetch_runs(conn: &Connection, limit: usize) -> Result<Vec<RunRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, report_date, documents, skipped, matched, synthesized, row_count, created_at
         FROM export_runs ORDER BY id DESC LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([limit as i64], |row| {
            Ok(RunRow {
                id: row.get(0)?,
                report_date: row.get(1)?,
                documents: row.get(2)?,
                skipped: row.get(3)?,
                matched: row.get(4)?,
                synthesized: row.get(5)?,
                rows: row.get(6)?,
                created_at: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset {
            columns: vec!["SL No.".into(), "Service Name".into(), "DC-\"Odd\" Label".into()],
            rows: vec![
                vec!["1".into(), "Payments".into(), "High".into()],
                vec!["2".into(), "Ledger".into(), "Low".into()],
            ],
        }
    }

    #[test]
    fn dataset_roundtrips_through_sqlite() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(save_dataset(&conn, &dataset()).unwrap(), 2);

        let names: Vec<String> = conn
            .prepare("SELECT \"Service Name\" FROM governance ORDER BY \"SL No.\"")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(names, vec!["Payments", "Ledger"]);
    }

    #[test]
    fn snapshot_replaces_previous() {
        let conn = Connection::open_in_memory().unwrap();
        save_dataset(&conn, &dataset()).unwrap();
        let mut smaller = dataset();
        smaller.rows.truncate(1);
        save_dataset(&conn, &smaller).unwrap();
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM governance", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn runs_newest_first() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        for docs in [3, 5] {
            insert_run(
                &conn,
                &RunRow {
                    id: 0,
                    report_date: "2023-01-01".into(),
                    documents: docs,
                    skipped: 0,
                    matched: 1,
                    synthesized: 1,
                    rows: docs + 1,
                    created_at: String::new(),
                },
            )
            .unwrap();
        }
        let runs = fetch_runs(&conn, 10).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].documents, 5);
    }

    #[test]
    fn connect_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("gov.sqlite");
        let conn = connect(&path).unwrap();
        init_schema(&conn).unwrap();
        assert!(path.exists());
    }
}
