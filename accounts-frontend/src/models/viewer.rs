use crate::AppState;
use access_core::{Claims, Role, TokenSource};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use std::convert::Infallible;

/// Whoever the request's cookies say is looking at the dashboard.
///
/// Never rejects: a missing or unreadable token yields an unidentified role,
/// which every access check denies.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub role: Role,
    pub claims: Option<Claims>,
    /// Raw token, forwarded to the accounts API as a bearer token.
    pub access_token: Option<String>,
}

#[async_trait]
impl FromRequestParts<AppState> for Viewer {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let resolver = &state.resolver;

        let claims = resolver.claims(&jar);
        let role = resolver.role_for(claims.as_ref(), &jar);
        let access_token = TokenSource::get(&jar, &resolver.settings().token_key);

        Ok(Viewer {
            role,
            claims,
            access_token,
        })
    }
}
