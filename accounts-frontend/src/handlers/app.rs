use axum::{extract::Query, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

/// Query value set by redirects away from a unit the viewer may not open.
pub const NOT_AUTHORIZED_NOTICE: &str = "not_authorized";

#[derive(Deserialize)]
pub struct IndexParams {
    pub notice: Option<String>,
}

#[derive(Serialize)]
pub struct IndexResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

pub async fn index(Query(params): Query<IndexParams>) -> impl IntoResponse {
    let notice = match params.notice.as_deref() {
        Some(NOT_AUTHORIZED_NOTICE) => Some("ليس لديك صلاحية للوصول إلى هذه الصفحة"),
        _ => None,
    };
    Json(IndexResponse { notice })
}

pub async fn health_check() -> &'static str {
    "OK"
}
