use std::fmt;

use serde::{Serialize, Serializer};

/// The non-admin roles, one per business unit account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Factory {
    Factory1,
    Factory2,
    Factory3,
    Factory4,
    Factory5,
}

impl Factory {
    pub const ALL: [Factory; 5] = [
        Factory::Factory1,
        Factory::Factory2,
        Factory::Factory3,
        Factory::Factory4,
        Factory::Factory5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Factory::Factory1 => "factory1",
            Factory::Factory2 => "factory2",
            Factory::Factory3 => "factory3",
            Factory::Factory4 => "factory4",
            Factory::Factory5 => "factory5",
        }
    }
}

impl fmt::Display for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role selected by the `userName` claim.
///
/// Admin is a variant of its own rather than a policy table row: its
/// decisions are unconditional, every other role's are set membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Factory(Factory),
    /// Anything else, including the empty string for "no role".
    Unknown(String),
}

impl Role {
    /// Exact, case-sensitive match on the role identifier.
    pub fn parse(identifier: &str) -> Self {
        if identifier == "admin" {
            return Role::Admin;
        }
        Factory::ALL
            .into_iter()
            .find(|factory| factory.as_str() == identifier)
            .map(Role::Factory)
            .unwrap_or_else(|| Role::Unknown(identifier.to_string()))
    }

    pub fn none() -> Self {
        Role::Unknown(String::new())
    }

    /// The identifier verbatim, as it was read from the token.
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Factory(factory) => factory.as_str(),
            Role::Unknown(identifier) => identifier,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_identified(&self) -> bool {
        !self.as_str().is_empty()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
