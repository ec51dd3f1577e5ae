//! Core domain logic for ParkYourLark.
//! This crate owns the registration use case and its storage contracts;
//! transport concerns live in `parkyourlark_api`.

pub mod db;
pub mod logging;
pub mod model;
pub mod parser;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::level::{Level, LevelSpace};
pub use parser::request_parser::{JsonRequestParser, ParseError, RequestParser};
pub use repo::data_access::{DataAccess, Record, SqliteDataAccess, StoreError, StoreResult};
pub use repo::memory::InMemoryDataAccess;
pub use service::admin_service::{AdminService, AdminServiceError, Registration};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
