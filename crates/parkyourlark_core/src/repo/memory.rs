//! In-memory `DataAccess` implementation.
//!
//! Used as the test double for service and HTTP tests, and by the server's
//! `--mock` mode. It enforces the same `KEY` and `REFERENCES` constraints as
//! the SQLite schema. Every call takes the same lock, so `add_if_absent` and
//! `add_with_parent` are atomic.

use super::data_access::{DataAccess, Record, StoreError, StoreResult};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

type Row = Vec<String>;
type Tables = HashMap<&'static str, Partition>;

#[derive(Debug, Default)]
struct Partition {
    rows: Vec<Row>,
    keys: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct InMemoryDataAccess {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl InMemoryDataAccess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with `StoreError::Unavailable`
    /// (or succeed again when `false`).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        self.tables.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl DataAccess for InMemoryDataAccess {
    fn get<T: Record>(&self) -> StoreResult<Vec<T>> {
        let tables = self.lock()?;
        tables
            .get(T::TABLE)
            .map_or(&[][..], |partition| partition.rows.as_slice())
            .iter()
            .cloned()
            .map(T::from_columns)
            .collect()
    }

    fn add<T: Record>(&self, record: &T) -> StoreResult<()> {
        let mut tables = self.lock()?;
        insert::<T>(&mut tables, record.to_columns(), false)?;
        Ok(())
    }

    fn add_if_absent<T: Record>(&self, record: &T) -> StoreResult<bool> {
        let mut tables = self.lock()?;
        insert::<T>(&mut tables, record.to_columns(), true)
    }

    fn add_with_parent<P: Record, C: Record>(&self, parent: &P, child: &C) -> StoreResult<bool> {
        let mut tables = self.lock()?;
        let inserted = insert::<P>(&mut tables, parent.to_columns(), true)?;
        if let Err(err) = insert::<C>(&mut tables, child.to_columns(), false) {
            if inserted {
                remove_last::<P>(&mut tables);
            }
            return Err(err);
        }
        Ok(inserted)
    }
}

/// Appends `row` to the partition of `T`.
///
/// An existing key is skipped (`Ok(false)`) when `skip_existing` is set and
/// refused otherwise.
fn insert<T: Record>(tables: &mut Tables, row: Row, skip_existing: bool) -> StoreResult<bool> {
    if let Some((column, table)) = T::REFERENCES {
        let value = column_value::<T>(&row, column).unwrap_or_default();
        let found = tables
            .get(table)
            .is_some_and(|partition| partition.keys.contains(value));
        if !found {
            return Err(StoreError::Constraint {
                table: T::TABLE,
                message: format!("{column} `{value}` has no row in `{table}`"),
            });
        }
    }

    let key = T::KEY
        .and_then(|column| column_value::<T>(&row, column))
        .map(str::to_owned);
    let partition = tables.entry(T::TABLE).or_default();
    if let Some(key) = key {
        if partition.keys.contains(&key) {
            if skip_existing {
                return Ok(false);
            }
            return Err(StoreError::Constraint {
                table: T::TABLE,
                message: format!("key `{key}` is already stored"),
            });
        }
        partition.keys.insert(key);
    }

    partition.rows.push(row);
    Ok(true)
}

fn remove_last<T: Record>(tables: &mut Tables) {
    let Some(partition) = tables.get_mut(T::TABLE) else {
        return;
    };
    if let Some(row) = partition.rows.pop() {
        if let Some(key) = T::KEY.and_then(|column| column_value::<T>(&row, column)) {
            partition.keys.remove(key);
        }
    }
}

fn column_value<'a, T: Record>(row: &'a [String], column: &str) -> Option<&'a str> {
    T::COLUMNS
        .iter()
        .position(|name| *name == column)
        .and_then(|index| row.get(index))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::InMemoryDataAccess;
    use crate::model::level::{Level, LevelSpace};
    use crate::repo::data_access::{DataAccess, StoreError};

    #[test]
    fn partitions_records_by_type() {
        let store = InMemoryDataAccess::new();
        store.add(&Level::new("L1")).unwrap();
        store
            .add(&LevelSpace::new(Level::new("L1"), "S1"))
            .unwrap();

        assert_eq!(store.get::<Level>().unwrap(), vec![Level::new("L1")]);
        assert_eq!(store.get::<LevelSpace>().unwrap().len(), 1);
    }

    #[test]
    fn add_refuses_duplicate_keys_but_add_if_absent_skips_them() {
        let store = InMemoryDataAccess::new();
        store.add(&Level::new("L1")).unwrap();
        let err = store.add(&Level::new("L1")).unwrap_err();
        assert!(matches!(err, StoreError::Constraint { table: "levels", .. }));

        assert!(!store.add_if_absent(&Level::new("L1")).unwrap());
        assert!(store.add_if_absent(&Level::new("L2")).unwrap());
        assert_eq!(
            store.get::<Level>().unwrap(),
            vec![Level::new("L1"), Level::new("L2")]
        );
    }

    #[test]
    fn failed_child_insert_rolls_back_the_new_parent() {
        let store = InMemoryDataAccess::new();
        let orphan = LevelSpace::new(Level::new("L2"), "S1");

        let err = store.add_with_parent(&Level::new("L1"), &orphan).unwrap_err();
        assert!(matches!(err, StoreError::Constraint { table: "level_spaces", .. }));
        assert!(store.get::<Level>().unwrap().is_empty());

        // The rolled-back key must be insertable again.
        assert!(store.add_if_absent(&Level::new("L1")).unwrap());
    }

    #[test]
    fn keyless_records_are_always_inserted() {
        let store = InMemoryDataAccess::new();
        let pair = LevelSpace::new(Level::new("L1"), "S1");
        store.add(&Level::new("L1")).unwrap();
        assert!(store.add_if_absent(&pair).unwrap());
        assert!(store.add_if_absent(&pair).unwrap());
        assert_eq!(store.get::<LevelSpace>().unwrap().len(), 2);
    }

    #[test]
    fn unavailable_store_rejects_every_call() {
        let store = InMemoryDataAccess::new();
        store.set_unavailable(true);
        assert!(matches!(store.get::<Level>(), Err(StoreError::Unavailable)));
        assert!(matches!(
            store.add(&Level::new("L1")),
            Err(StoreError::Unavailable)
        ));

        store.set_unavailable(false);
        assert!(store.get::<Level>().unwrap().is_empty());
    }
}
