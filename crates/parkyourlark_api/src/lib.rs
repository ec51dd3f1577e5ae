//! HTTP surface for ParkYourLark.
//!
//! # Responsibility
//! - Route admin requests to `AdminService`.
//! - Map core errors onto HTTP status codes.
//! - Load layered server configuration.
//!
//! # Invariants
//! - Store calls run on the blocking pool, never on async workers.
//! - Store failure details are logged, not returned to clients.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use config::{AppConfig, CliOverrides, ConfigError, StoreBackend};
pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use server::{serve, shutdown_signal};
