//! Data access contracts and store implementations.
//!
//! # Responsibility
//! - Define the type-partitioned `DataAccess` contract consumed by services.
//! - Map domain records onto storage rows.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Stores never update or delete rows.
//! - `add_if_absent` and `add_with_parent` are atomic with respect to other
//!   calls on the same store.
//! - Both stores refuse the same duplicate keys and dangling references.

pub mod data_access;
pub mod memory;
mod record;
