//! access-core: role-based access decisions for the accounts dashboard.
//!
//! Decisions are derived from a token that is decoded but never verified.
//! They gate what the dashboard shows; the remote API must still enforce
//! authorization on every mutating request.
pub mod component;
pub mod error;
pub mod policy;
pub mod resolver;
pub mod role;
pub mod source;
pub mod token;

pub use component::Component;
pub use error::{PolicyError, TokenError};
pub use policy::{PolicyTable, RolePolicy};
pub use resolver::{AccessResolver, Permissions, ResolverSettings, Visibility};
pub use role::{Factory, Role};
pub use source::{TokenSource, ACCESS_TOKEN_KEY, LEGACY_ROLE_KEY};
pub use token::{decode, try_decode, Claims};
