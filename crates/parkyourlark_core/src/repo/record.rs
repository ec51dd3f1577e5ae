//! Row mapping for parking records.

use super::data_access::{Record, StoreError, StoreResult};
use crate::model::level::{Level, LevelSpace};

impl Record for Level {
    const TABLE: &'static str = "levels";
    const COLUMNS: &'static [&'static str] = &["id"];
    const KEY: Option<&'static str> = Some("id");

    fn to_columns(&self) -> Vec<String> {
        vec![self.id.clone()]
    }

    fn from_columns(columns: Vec<String>) -> StoreResult<Self> {
        let [id] = take_columns::<1>(Self::TABLE, columns)?;
        Ok(Level::new(id))
    }
}

impl Record for LevelSpace {
    const TABLE: &'static str = "level_spaces";
    const COLUMNS: &'static [&'static str] = &["level_id", "space"];
    const KEY: Option<&'static str> = None;
    const REFERENCES: Option<(&'static str, &'static str)> = Some(("level_id", Level::TABLE));

    fn to_columns(&self) -> Vec<String> {
        vec![self.level.id.clone(), self.space.clone()]
    }

    fn from_columns(columns: Vec<String>) -> StoreResult<Self> {
        let [level_id, space] = take_columns::<2>(Self::TABLE, columns)?;
        Ok(LevelSpace::new(Level::new(level_id), space))
    }
}

fn take_columns<const N: usize>(table: &str, columns: Vec<String>) -> StoreResult<[String; N]> {
    let count = columns.len();
    <[String; N]>::try_from(columns).map_err(|_| {
        StoreError::InvalidData(format!("{table} row has {count} columns, expected {N}"))
    })
}
