//! Business unit surfaces: one per catalogue component.
//!
//! Opening a unit requires `can_access`; creating or editing records
//! requires `can_edit`, deleting requires `can_delete`.

use crate::error::AppError;
use crate::handlers::app::NOT_AUTHORIZED_NOTICE;
use crate::models::Viewer;
use crate::services::metrics::record_decision;
use crate::AppState;
use access_core::{Component, Permissions};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct UnitResponse {
    pub component: Component,
    pub slug: &'static str,
    pub permissions: Permissions,
    pub records: Value,
}

fn component_for(slug: &str) -> Result<Component, AppError> {
    Component::from_slug(slug)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Unknown unit: {}", slug)))
}

fn permissions_for(state: &AppState, viewer: &Viewer, component: Component) -> Permissions {
    let permissions = state
        .resolver
        .permissions_for(&viewer.role, Some(component));
    record_decision(component.slug(), &permissions);
    permissions
}

/// Unit page. Viewers without access are sent back to the index with a
/// not-authorized notice.
pub async fn unit_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    viewer: Viewer,
) -> Result<Response, AppError> {
    let component = component_for(&slug)?;
    let permissions = permissions_for(&state, &viewer, component);

    if !permissions.can_access {
        tracing::warn!(
            role = %viewer.role,
            unit = component.slug(),
            "Access to unit denied"
        );
        return Ok(Redirect::to(&format!("/?notice={}", NOT_AUTHORIZED_NOTICE)).into_response());
    }

    let records = state
        .accounts_client
        .list(component, viewer.access_token.as_deref())
        .await?;

    Ok(Json(UnitResponse {
        component,
        slug: component.slug(),
        permissions,
        records,
    })
    .into_response())
}

pub async fn create_record(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    viewer: Viewer,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let component = component_for(&slug)?;
    require(permissions_for(&state, &viewer, component).can_edit, &viewer, component, "create")?;

    let created = state
        .accounts_client
        .create(component, &body, viewer.access_token.as_deref())
        .await?;

    tracing::info!(role = %viewer.role, unit = component.slug(), "Record created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_record(
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
    viewer: Viewer,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let component = component_for(&slug)?;
    require(permissions_for(&state, &viewer, component).can_edit, &viewer, component, "edit")?;

    let updated = state
        .accounts_client
        .update(component, &id, &body, viewer.access_token.as_deref())
        .await?;

    tracing::info!(role = %viewer.role, unit = component.slug(), record = %id, "Record updated");
    Ok(Json(updated))
}

pub async fn delete_record(
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
    viewer: Viewer,
) -> Result<impl IntoResponse, AppError> {
    let component = component_for(&slug)?;
    require(permissions_for(&state, &viewer, component).can_delete, &viewer, component, "delete")?;

    state
        .accounts_client
        .delete(component, &id, viewer.access_token.as_deref())
        .await?;

    tracing::info!(role = %viewer.role, unit = component.slug(), record = %id, "Record deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn require(
    allowed: bool,
    viewer: &Viewer,
    component: Component,
    action: &str,
) -> Result<(), AppError> {
    if allowed {
        return Ok(());
    }
    tracing::warn!(
        role = %viewer.role,
        unit = component.slug(),
        action,
        "Mutation denied"
    );
    Err(AppError::Forbidden(anyhow::anyhow!(
        "Not allowed to {} records in {}",
        action,
        component.label()
    )))
}
