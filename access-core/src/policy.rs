//! The per-role policy table.
//!
//! Each non-admin role has a single row carrying both the components it may
//! open and the components hidden from its navigation, so the two lists are
//! maintained side by side. Construction rejects rows where a component is
//! both allowed and hidden.

use std::collections::{BTreeMap, BTreeSet};

use crate::component::Component;
use crate::error::PolicyError;
use crate::role::Factory;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolePolicy {
    pub allowed: BTreeSet<Component>,
    pub hidden: BTreeSet<Component>,
}

impl RolePolicy {
    pub fn new(allowed: &[Component], hidden: &[Component]) -> Self {
        Self {
            allowed: allowed.iter().copied().collect(),
            hidden: hidden.iter().copied().collect(),
        }
    }

    pub fn allows(&self, component: Component) -> bool {
        self.allowed.contains(&component)
    }

    pub fn hides(&self, component: Component) -> bool {
        self.hidden.contains(&component)
    }
}

/// Immutable after construction; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    roles: BTreeMap<Factory, RolePolicy>,
}

impl PolicyTable {
    pub fn from_rows(
        rows: impl IntoIterator<Item = (Factory, RolePolicy)>,
    ) -> Result<Self, PolicyError> {
        let mut roles = BTreeMap::new();

        for (role, policy) in rows {
            if let Some(component) = policy.allowed.intersection(&policy.hidden).next() {
                return Err(PolicyError::AllowedAndHidden {
                    role,
                    component: *component,
                });
            }
            if roles.insert(role, policy).is_some() {
                return Err(PolicyError::DuplicateRole(role));
            }
        }

        Ok(Self { roles })
    }

    /// The dashboard's fixed permission table.
    pub fn builtin() -> Result<Self, PolicyError> {
        use Component::*;

        Self::from_rows([
            (
                Factory::Factory1,
                RolePolicy::new(&[MinyaTraders], &[MainFactory, Treasury]),
            ),
            (
                Factory::Factory2,
                RolePolicy::new(
                    &[SohagTraders],
                    &[GergaArabMallShowroom, GergaTraders, MainFactory, Treasury],
                ),
            ),
            (
                Factory::Factory3,
                RolePolicy::new(&[DalaAlHawanemTraders], &[Treasury]),
            ),
            (
                Factory::Factory4,
                RolePolicy::new(&[GergaArabMallShowroom, GergaTraders], &[Treasury]),
            ),
            (
                Factory::Factory5,
                RolePolicy::new(&[GazaTraders], &[MainFactory, Treasury]),
            ),
        ])
    }

    /// `None` means the role has no row: nothing allowed, nothing hidden.
    pub fn policy_for(&self, role: Factory) -> Option<&RolePolicy> {
        self.roles.get(&role)
    }

    pub fn roles(&self) -> impl Iterator<Item = (&Factory, &RolePolicy)> {
        self.roles.iter()
    }
}
