use thiserror::Error;

use crate::component::Component;
use crate::role::Factory;

/// Stage at which a token failed to decode.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token format: expected 3 segments, got {0}")]
    Shape(usize),

    #[error("Failed to decode token payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Token payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Failed to parse token claims: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("{component:?} is both allowed and hidden for {role}")]
    AllowedAndHidden { role: Factory, component: Component },

    #[error("Duplicate policy entry for {0}")]
    DuplicateRole(Factory),
}
