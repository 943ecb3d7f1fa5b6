use crate::models::Viewer;
use access_core::Role;
use axum::{response::IntoResponse, Json};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub role: Role,
    pub is_admin: bool,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub expires_at: Option<i64>,
}

/// Who the dashboard thinks the viewer is. Informational only.
pub async fn current_session(viewer: Viewer) -> impl IntoResponse {
    let claims = viewer.claims.unwrap_or_default();
    Json(SessionResponse {
        is_admin: viewer.role.is_admin(),
        role: viewer.role,
        user_id: claims.user_id,
        user_name: claims.user_name,
        expires_at: claims.expires_at,
    })
}
