use crate::models::Viewer;
use crate::services::metrics::record_decision;
use crate::AppState;
use access_core::{Component, Permissions, Visibility};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct PermissionParams {
    /// Component label, matched exactly.
    pub component: Option<String>,
}

pub async fn permissions(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<PermissionParams>,
) -> Json<Permissions> {
    let label = params.component.as_deref();
    let permissions = state.resolver.resolve_permissions(&jar, label);

    let metric_label = label
        .and_then(Component::from_label)
        .map(|component| component.slug())
        .unwrap_or("unknown");
    record_decision(metric_label, &permissions);

    Json(permissions)
}

#[derive(Serialize)]
pub struct NavigationEntry {
    pub label: &'static str,
    pub slug: &'static str,
    pub state: Visibility,
}

/// Navigation entries for the viewer; hidden components are left out.
pub async fn navigation(State(state): State<AppState>, viewer: Viewer) -> impl IntoResponse {
    let entries: Vec<NavigationEntry> = state
        .resolver
        .navigation(&viewer.role)
        .into_iter()
        .map(|(component, visibility)| NavigationEntry {
            label: component.label(),
            slug: component.slug(),
            state: visibility,
        })
        .collect();

    tracing::debug!(role = %viewer.role, entries = entries.len(), "Built navigation");
    Json(entries)
}
