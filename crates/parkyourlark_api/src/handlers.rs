//! Admin and health endpoint handlers.
//!
//! Store calls are synchronous, so each handler runs its service call on
//! the blocking pool.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::Json;
use log::info;
use parkyourlark_core::{
    core_version, AdminService, AdminServiceError, DataAccess, Level, LevelSpace,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiResult;

/// Query string of `GET /api/admin/spaces`.
#[derive(Debug, Default, Deserialize)]
pub struct SpacesQuery {
    pub level: Option<String>,
}

/// `POST /api/admin/space`: registers a space, creating its level on first use.
pub async fn add_space<D>(
    Extension(svc): Extension<Arc<AdminService<D>>>,
    body: Bytes,
) -> ApiResult<StatusCode>
where
    D: DataAccess + Send + Sync + 'static,
{
    let started_at = Instant::now();
    let registration = run_blocking(svc, move |svc| svc.register_space(&body)).await?;

    info!(
        "event=http_request module=api status=ok route=add_space level_created={} duration_ms={}",
        registration.level_created,
        started_at.elapsed().as_millis()
    );
    Ok(StatusCode::OK)
}

/// `GET /api/admin/levels`
pub async fn list_levels<D>(
    Extension(svc): Extension<Arc<AdminService<D>>>,
) -> ApiResult<Json<Vec<Level>>>
where
    D: DataAccess + Send + Sync + 'static,
{
    let levels = run_blocking(svc, |svc| svc.levels()).await?;
    Ok(Json(levels))
}

/// `GET /api/admin/spaces[?level=<id>]`
pub async fn list_spaces<D>(
    Extension(svc): Extension<Arc<AdminService<D>>>,
    Query(query): Query<SpacesQuery>,
) -> ApiResult<Json<Vec<LevelSpace>>>
where
    D: DataAccess + Send + Sync + 'static,
{
    let spaces = run_blocking(svc, move |svc| match query.level.as_deref() {
        Some(level_id) => svc.spaces_on_level(level_id),
        None => svc.level_spaces(),
    })
    .await?;
    Ok(Json(spaces))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": core_version() }))
}

async fn run_blocking<D, T, F>(svc: Arc<AdminService<D>>, call: F) -> ApiResult<T>
where
    D: DataAccess + Send + Sync + 'static,
    T: Send + 'static,
    F: FnOnce(&AdminService<D>) -> Result<T, AdminServiceError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || call(&svc)).await?;
    Ok(result?)
}
