use std::path::Path;

use rusqlite::{Connection, Row};

use super::{Backend, SelectQuery};
use crate::error::{FuelError, Result};
use crate::models::{NewRecord, Record, RecordId, RecordPatch};

pub const DEFAULT_TABLE: &str = "cargas";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

fn schema(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id INTEGER PRIMARY KEY,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
            task_date TEXT,
            task_name INTEGER,
            litros REAL,
            precio REAL
        );"
    )
}

fn check_table_name(table: &str) -> Result<()> {
    let valid = !table.is_empty()
        && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !table.starts_with(|c: char| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(FuelError::Settings(format!("Invalid table name: {table}")))
    }
}

pub fn init_db(conn: &Connection, table: &str) -> Result<()> {
    check_table_name(table)?;
    conn.execute_batch(&schema(table))?;
    Ok(())
}

/// Local single-file backend.
pub struct SqliteBackend {
    conn: Connection,
    table: String,
}

impl SqliteBackend {
    pub fn open(db_path: &Path, table: &str) -> Result<Self> {
        Self::from_connection(get_connection(db_path)?, table)
    }

    pub fn from_connection(conn: Connection, table: &str) -> Result<Self> {
        init_db(&conn, table)?;
        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    #[cfg(test)]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn parse_id(id: &RecordId) -> Result<i64> {
        id.as_str()
            .parse()
            .map_err(|_| FuelError::Backend(format!("Invalid record id: {id}")))
    }
}

fn read_record(row: &Row, columns: &[&str]) -> rusqlite::Result<Record> {
    let has = |c: &str| columns.contains(&c);
    let id: i64 = row.get("id")?;
    Ok(Record {
        id: RecordId::from(id),
        created_at: if has("created_at") { row.get("created_at")? } else { None },
        task_date: if has("task_date") { row.get("task_date")? } else { None },
        task_name: if has("task_name") { row.get("task_name")? } else { None },
        litros: if has("litros") { row.get("litros")? } else { None },
        precio: if has("precio") { row.get("precio")? } else { None },
    })
}

impl Backend for SqliteBackend {
    fn select(&self, query: &SelectQuery) -> Result<Vec<Record>> {
        query.check_columns()?;
        let dir = if query.descending { "DESC" } else { "ASC" };
        // id breaks ties between rows inserted within the same millisecond
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {} {dir}, id {dir} LIMIT ?1",
            query.columns.join(", "),
            self.table,
            query.order_by,
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([query.limit as i64], |row| read_record(row, query.columns))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn insert(&self, record: &NewRecord) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO {} (task_date, task_name, litros, precio) VALUES (?1, ?2, ?3, ?4)",
                self.table
            ),
            rusqlite::params![record.task_date, record.task_name, record.litros, record.precio],
        )?;
        Ok(())
    }

    fn update(&self, id: &RecordId, patch: &RecordPatch) -> Result<()> {
        let rowid = Self::parse_id(id)?;
        if patch.is_empty() {
            return Ok(());
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(ref d) = patch.task_date {
            sets.push("task_date");
            params.push(Box::new(d.clone()));
        }
        if let Some(km) = patch.task_name {
            sets.push("task_name");
            params.push(Box::new(km));
        }
        if let Some(l) = patch.litros {
            sets.push("litros");
            params.push(Box::new(l));
        }
        if let Some(p) = patch.precio {
            sets.push("precio");
            params.push(Box::new(p));
        }
        params.push(Box::new(rowid));

        let assignments: Vec<String> = sets
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{col} = ?{}", i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            self.table,
            assignments.join(", "),
            sets.len() + 1
        );
        let changed = self
            .conn
            .execute(&sql, rusqlite::params_from_iter(params.iter()))?;
        if changed == 0 {
            return Err(FuelError::Backend(format!("Record {id} not found")));
        }
        Ok(())
    }

    fn delete(&self, id: &RecordId) -> Result<()> {
        let rowid = Self::parse_id(id)?;
        let changed = self
            .conn
            .execute(&format!("DELETE FROM {} WHERE id = ?1", self.table), [rowid])?;
        if changed == 0 {
            return Err(FuelError::Backend(format!("Record {id} not found")));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        let path = self.conn.path().unwrap_or(":memory:");
        format!("sqlite {path} (table {})", self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_backend() -> (tempfile::TempDir, SqliteBackend) {
        let dir = tempfile::tempdir().unwrap();
        let backend = SqliteBackend::open(&dir.path().join("test.db"), DEFAULT_TABLE).unwrap();
        (dir, backend)
    }

    fn entry(km: i64) -> NewRecord {
        NewRecord {
            task_date: "2024-01-01".to_string(),
            task_name: km,
            litros: 40.123,
            precio: 1.556,
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, backend) = test_backend();
        init_db(backend.connection(), DEFAULT_TABLE).unwrap();
    }

    #[test]
    fn test_rejects_bad_table_name() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(SqliteBackend::from_connection(conn, "cargas; DROP").is_err());
    }

    #[test]
    fn test_insert_and_select_newest_first() {
        let (_dir, backend) = test_backend();
        for km in [100, 200, 300] {
            backend.insert(&entry(km)).unwrap();
        }
        let rows = backend.select(&SelectQuery::latest(50)).unwrap();
        let kms: Vec<i64> = rows.iter().map(|r| r.task_name.unwrap()).collect();
        assert_eq!(kms, vec![300, 200, 100]);
        assert!(rows[0].created_at.is_some());
        assert_eq!(rows[0].litros, Some(40.123));
        assert_eq!(rows[0].precio, Some(1.556));
    }

    #[test]
    fn test_select_respects_limit() {
        let (_dir, backend) = test_backend();
        for km in 0..60 {
            backend.insert(&entry(km)).unwrap();
        }
        let rows = backend.select(&SelectQuery::latest(50)).unwrap();
        assert_eq!(rows.len(), 50);
        assert_eq!(rows[0].task_name, Some(59));
    }

    #[test]
    fn test_update_patch_only_touches_given_fields() {
        let (_dir, backend) = test_backend();
        backend.insert(&entry(100)).unwrap();
        let id = backend.select(&SelectQuery::latest(1)).unwrap()[0].id.clone();

        let patch = RecordPatch {
            litros: Some(12.5),
            ..Default::default()
        };
        backend.update(&id, &patch).unwrap();

        let rec = &backend.select(&SelectQuery::latest(1)).unwrap()[0];
        assert_eq!(rec.litros, Some(12.5));
        assert_eq!(rec.precio, Some(1.556));
        assert_eq!(rec.task_name, Some(100));
    }

    #[test]
    fn test_update_and_delete_missing_record() {
        let (_dir, backend) = test_backend();
        let patch = RecordPatch {
            litros: Some(1.0),
            ..Default::default()
        };
        assert!(matches!(
            backend.update(&RecordId::from(42), &patch),
            Err(FuelError::Backend(_))
        ));
        assert!(matches!(backend.delete(&RecordId::from(42)), Err(FuelError::Backend(_))));
        assert!(matches!(backend.delete(&RecordId::from("abc")), Err(FuelError::Backend(_))));
    }

    #[test]
    fn test_delete() {
        let (_dir, backend) = test_backend();
        backend.insert(&entry(1)).unwrap();
        backend.insert(&entry(2)).unwrap();
        let rows = backend.select(&SelectQuery::latest(50)).unwrap();
        backend.delete(&rows[0].id).unwrap();
        let rows = backend.select(&SelectQuery::latest(50)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].task_name, Some(1));
    }
}
