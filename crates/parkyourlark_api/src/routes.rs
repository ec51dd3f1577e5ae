//! Route table.

use std::sync::Arc;

use axum::extract::Extension;
use axum::routing::{get, post};
use axum::Router;
use parkyourlark_core::{AdminService, DataAccess};

use crate::handlers;

pub const ADD_SPACE_PATH: &str = "/api/admin/space";
pub const LEVELS_PATH: &str = "/api/admin/levels";
pub const SPACES_PATH: &str = "/api/admin/spaces";
pub const HEALTH_PATH: &str = "/health";

/// Builds the application router around an injected admin service.
pub fn router<D>(service: Arc<AdminService<D>>) -> Router
where
    D: DataAccess + Send + Sync + 'static,
{
    Router::new()
        .route(ADD_SPACE_PATH, post(handlers::add_space::<D>))
        .route(LEVELS_PATH, get(handlers::list_levels::<D>))
        .route(SPACES_PATH, get(handlers::list_spaces::<D>))
        .route(HEALTH_PATH, get(handlers::health))
        .layer(Extension(service))
}
