//! `DataAccess` contract and SQLite implementation.
//!
//! # Invariants
//! - `get` returns rows in insertion order.
//! - `add` refuses a duplicate `KEY` and a dangling `REFERENCES` column with
//!   `StoreError::Constraint`; key-less records are never deduplicated.
//! - `add_if_absent` relies on the table's primary key, so the existence
//!   check and the insert happen in one statement.
//! - `add_with_parent` commits both rows or neither.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{open_db, open_db_in_memory, DbError};
use log::debug;
use rusqlite::{params_from_iter, Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by `DataAccess` implementations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Persisted row cannot be mapped back to its record type.
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    /// Insert refused by a key or reference constraint; nothing was stored.
    Constraint {
        table: &'static str,
        message: String,
    },
    LockPoisoned,
    /// Store was switched off (in-memory store only).
    Unavailable,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::Constraint { table, message } => {
                write!(f, "insert into `{table}` refused: {message}")
            }
            Self::LockPoisoned => write!(f, "store lock poisoned by a panicked writer"),
            Self::Unavailable => write!(f, "store is unavailable"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// A domain type that can be stored in a `DataAccess` partition.
///
/// Rows are flat lists of text columns in `COLUMNS` order.
pub trait Record: Sized + Send + Sync + 'static {
    /// Partition (table) name.
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    /// Column carrying the record identity, if the record has one.
    const KEY: Option<&'static str>;
    /// `(column, table)`: the column must hold the `KEY` of a stored record
    /// of `table`.
    const REFERENCES: Option<(&'static str, &'static str)> = None;

    fn to_columns(&self) -> Vec<String>;

    /// # Errors
    /// Returns `InvalidData` when the column count does not match `COLUMNS`.
    fn from_columns(columns: Vec<String>) -> StoreResult<Self>;
}

/// Type-partitioned record store consumed by the admin service.
pub trait DataAccess {
    /// Returns every stored record of type `T`.
    fn get<T: Record>(&self) -> StoreResult<Vec<T>>;

    /// Stores `record`.
    ///
    /// # Errors
    /// `Constraint` when the record's key is already stored or its reference
    /// points at no stored record.
    fn add<T: Record>(&self, record: &T) -> StoreResult<()>;

    /// Stores `record` unless a record with the same key exists.
    ///
    /// Returns `true` when a row was inserted. Records without a `KEY` are
    /// always inserted, subject to their reference.
    fn add_if_absent<T: Record>(&self, record: &T) -> StoreResult<bool>;

    /// Stores `parent` unless its key exists, then `child`, as one unit.
    ///
    /// Returns whether `parent` was inserted. On error neither row is
    /// stored.
    fn add_with_parent<P: Record, C: Record>(&self, parent: &P, child: &C) -> StoreResult<bool>;
}

/// SQLite-backed store. One connection, serialized by a mutex.
#[derive(Debug)]
pub struct SqliteDataAccess {
    conn: Mutex<Connection>,
}

impl SqliteDataAccess {
    /// Wraps a connection that already has all migrations applied.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not the latest.
    /// - `MissingRequiredTable` when a record table is absent.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(&conn)?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        for table in REQUIRED_TABLES {
            if !table_exists(&conn, table)? {
                return Err(StoreError::MissingRequiredTable(table));
            }
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens (or creates) a database file and wraps it.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a private in-memory database and wraps it.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

const REQUIRED_TABLES: [&str; 2] = ["levels", "level_spaces"];

impl DataAccess for SqliteDataAccess {
    fn get<T: Record>(&self) -> StoreResult<Vec<T>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} ORDER BY rowid ASC;",
            T::COLUMNS.join(", "),
            T::TABLE
        ))?;

        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let columns = (0..T::COLUMNS.len())
                .map(|index| row.get::<_, String>(index))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            records.push(T::from_columns(columns)?);
        }

        Ok(records)
    }

    fn add<T: Record>(&self, record: &T) -> StoreResult<()> {
        let conn = self.lock()?;
        insert_row(&conn, "INSERT", record)?;
        debug!("event=store_add module=repo status=ok table={}", T::TABLE);
        Ok(())
    }

    fn add_if_absent<T: Record>(&self, record: &T) -> StoreResult<bool> {
        let conn = self.lock()?;
        let inserted = insert_row(&conn, if_absent_verb::<T>(), record)?;
        debug!(
            "event=store_add_if_absent module=repo status=ok table={} inserted={inserted}",
            T::TABLE
        );
        Ok(inserted)
    }

    fn add_with_parent<P: Record, C: Record>(&self, parent: &P, child: &C) -> StoreResult<bool> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let inserted = insert_row(&tx, if_absent_verb::<P>(), parent)?;
        insert_row(&tx, "INSERT", child)?;
        tx.commit()?;

        debug!(
            "event=store_add_with_parent module=repo status=ok parent_table={} child_table={} parent_inserted={inserted}",
            P::TABLE,
            C::TABLE
        );
        Ok(inserted)
    }
}

fn if_absent_verb<T: Record>() -> &'static str {
    if T::KEY.is_some() {
        "INSERT OR IGNORE"
    } else {
        "INSERT"
    }
}

/// Returns whether a row was written. Constraint failures become
/// `StoreError::Constraint`.
fn insert_row<T: Record>(conn: &Connection, verb: &str, record: &T) -> StoreResult<bool> {
    match conn.execute(&insert_sql::<T>(verb), params_from_iter(record.to_columns())) {
        Ok(changed) => Ok(changed > 0),
        Err(rusqlite::Error::SqliteFailure(failure, message))
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            Err(StoreError::Constraint {
                table: T::TABLE,
                message: message.unwrap_or_else(|| failure.to_string()),
            })
        }
        Err(err) => Err(err.into()),
    }
}

fn insert_sql<T: Record>(verb: &str) -> String {
    let placeholders = (1..=T::COLUMNS.len())
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{verb} INTO {} ({}) VALUES ({placeholders});",
        T::TABLE,
        T::COLUMNS.join(", ")
    )
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
