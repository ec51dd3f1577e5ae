//! Parking domain model.
//!
//! # Responsibility
//! - Define the records produced by space registration.
//! - Keep the model storage-agnostic; table mapping lives in `repo`.
//!
//! # Invariants
//! - A `Level` is identified by its `id` alone.
//! - A `LevelSpace` has no identity beyond its `(level, space)` pair.

pub mod level;
