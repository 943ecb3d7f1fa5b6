use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::policy::{PolicyTable, RolePolicy};
use crate::role::Role;
use crate::source::{TokenSource, ACCESS_TOKEN_KEY, LEGACY_ROLE_KEY};
use crate::token::{self, Claims};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub can_access: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl Permissions {
    pub const FULL: Permissions = Permissions {
        can_access: true,
        can_edit: true,
        can_delete: true,
    };

    pub const NONE: Permissions = Permissions {
        can_access: false,
        can_edit: false,
        can_delete: false,
    };
}

/// Whether a navigation entry renders, and whether opening it will work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Hidden,
    VisibleLocked,
    VisibleUnlocked,
}

impl Visibility {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Visibility::Hidden)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolverSettings {
    /// Key of the encoded access token in the token source.
    #[serde(default = "default_token_key")]
    pub token_key: String,
    /// Key of the bare role identifier consulted when the token yields none.
    #[serde(default = "default_legacy_role_key")]
    pub legacy_role_key: String,
    /// Treat tokens past their `exp` as undecodable.
    #[serde(default)]
    pub enforce_expiry: bool,
    /// Hide every component from roles without a policy row instead of
    /// showing them locked.
    #[serde(default)]
    pub hide_for_unknown_roles: bool,
}

fn default_token_key() -> String {
    ACCESS_TOKEN_KEY.to_string()
}

fn default_legacy_role_key() -> String {
    LEGACY_ROLE_KEY.to_string()
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            token_key: default_token_key(),
            legacy_role_key: default_legacy_role_key(),
            enforce_expiry: false,
            hide_for_unknown_roles: false,
        }
    }
}

/// Answers access and visibility questions for the current token.
///
/// Every query re-reads the token source; nothing is cached, so a replaced
/// cookie takes effect on the next call.
#[derive(Debug, Clone)]
pub struct AccessResolver {
    policy: Arc<PolicyTable>,
    settings: ResolverSettings,
}

impl AccessResolver {
    pub fn new(policy: Arc<PolicyTable>, settings: ResolverSettings) -> Self {
        Self { policy, settings }
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Claims from the stored token, if present, decodable and (when
    /// enforced) unexpired.
    pub fn claims<S: TokenSource>(&self, source: &S) -> Option<Claims> {
        let raw = source.get(&self.settings.token_key)?;
        let claims = token::decode(&raw)?;

        if self.settings.enforce_expiry && claims.is_expired_at(Utc::now()) {
            tracing::info!(
                user_id = claims.user_id.as_deref().unwrap_or_default(),
                "Ignoring expired access token"
            );
            return None;
        }

        Some(claims)
    }

    /// Token `userName` first, then the legacy role value, then no role.
    pub fn current_role<S: TokenSource>(&self, source: &S) -> Role {
        self.role_for(self.claims(source).as_ref(), source)
    }

    /// Role for claims already read from `source`; only the legacy role
    /// value is read again.
    pub fn role_for<S: TokenSource>(&self, claims: Option<&Claims>, source: &S) -> Role {
        if let Some(key) = claims.and_then(Claims::role_key) {
            return Role::parse(key);
        }

        match source.get(&self.settings.legacy_role_key) {
            Some(legacy) if !legacy.is_empty() => {
                tracing::debug!(role = %legacy, "Using legacy role value");
                Role::parse(&legacy)
            }
            _ => Role::none(),
        }
    }

    /// Decision for a component named by its label.
    ///
    /// Admin gets everything, with or without a component. For anyone else a
    /// missing or unrecognized label is never accessible.
    pub fn resolve_permissions<S: TokenSource>(
        &self,
        source: &S,
        component_label: Option<&str>,
    ) -> Permissions {
        let role = self.current_role(source);
        let component = component_label.and_then(|label| {
            let component = Component::from_label(label);
            if component.is_none() {
                tracing::warn!(label, role = %role, "Permission check for unknown component");
            }
            component
        });

        let permissions = self.permissions_for(&role, component);
        tracing::debug!(
            role = %role,
            component = component_label.unwrap_or_default(),
            can_access = permissions.can_access,
            "Resolved permissions"
        );
        permissions
    }

    pub fn permissions_for(&self, role: &Role, component: Option<Component>) -> Permissions {
        if role.is_admin() {
            return Permissions::FULL;
        }

        let can_access = match (self.row_for(role), component) {
            (Some(policy), Some(component)) => policy.allows(component),
            _ => false,
        };

        // Edit and delete are admin-only; no row can grant them.
        Permissions {
            can_access,
            ..Permissions::NONE
        }
    }

    /// Whether a navigation entry should render at all.
    ///
    /// Unlike access this defaults to shown: only components hidden for the
    /// role are suppressed.
    pub fn is_component_visible<S: TokenSource>(&self, source: &S, component_label: &str) -> bool {
        let role = self.current_role(source);
        self.visibility_of(&role, Component::from_label(component_label))
            .is_visible()
    }

    pub fn visibility(&self, role: &Role, component: Component) -> Visibility {
        self.visibility_of(role, Some(component))
    }

    /// Catalogue entries the role can see, in navigation order.
    pub fn navigation(&self, role: &Role) -> Vec<(Component, Visibility)> {
        Component::ALL
            .into_iter()
            .map(|component| (component, self.visibility(role, component)))
            .filter(|(_, visibility)| visibility.is_visible())
            .collect()
    }

    fn visibility_of(&self, role: &Role, component: Option<Component>) -> Visibility {
        if role.is_admin() {
            return Visibility::VisibleUnlocked;
        }

        match (self.row_for(role), component) {
            (None, _) if self.settings.hide_for_unknown_roles => Visibility::Hidden,
            (Some(policy), Some(component)) if policy.hides(component) => Visibility::Hidden,
            (Some(policy), Some(component)) if policy.allows(component) => {
                Visibility::VisibleUnlocked
            }
            _ => Visibility::VisibleLocked,
        }
    }

    fn row_for(&self, role: &Role) -> Option<&RolePolicy> {
        match role {
            Role::Factory(factory) => self.policy.policy_for(*factory),
            Role::Admin | Role::Unknown(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Factory;
    use crate::token::tests::token_for;
    use std::collections::HashMap;

    fn resolver() -> AccessResolver {
        AccessResolver::new(
            Arc::new(PolicyTable::builtin().unwrap()),
            ResolverSettings::default(),
        )
    }

    fn cookies(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn signed_in_as(user_name: &str) -> HashMap<String, String> {
        let token = token_for(&serde_json::json!({
            "userId": "u-1",
            "role": "factory",
            "userName": user_name,
            "iat": 1736500000,
            "exp": 9999999999i64,
        }));
        cookies(&[(ACCESS_TOKEN_KEY, &token)])
    }

    #[test]
    fn test_admin_gets_everything() {
        let resolver = resolver();
        let source = signed_in_as("admin");

        assert_eq!(resolver.resolve_permissions(&source, None), Permissions::FULL);
        assert_eq!(
            resolver.resolve_permissions(&source, Some("سنتر غزة")),
            Permissions::FULL
        );
        assert_eq!(
            resolver.resolve_permissions(&source, Some("no such component")),
            Permissions::FULL
        );
        for component in Component::ALL {
            assert!(resolver.is_component_visible(&source, component.label()));
        }
    }

    #[test]
    fn test_factory3_traders_but_not_center() {
        let resolver = resolver();
        let source = signed_in_as("factory3");

        let traders = resolver.resolve_permissions(&source, Some("حسابات تجار سنتر دلع الهوانم"));
        assert!(traders.can_access);

        let center = resolver.resolve_permissions(&source, Some("سنتر دلع الهوانم"));
        assert!(!center.can_access);
    }

    #[test]
    fn test_factory5_can_view_but_not_mutate() {
        let resolver = resolver();
        let source = signed_in_as("factory5");

        assert_eq!(
            resolver.resolve_permissions(&source, Some("حساب تجار سنتر غزة")),
            Permissions {
                can_access: true,
                can_edit: false,
                can_delete: false,
            }
        );
    }

    #[test]
    fn test_non_admin_never_edits_or_deletes() {
        let resolver = resolver();
        for factory in Factory::ALL {
            let role = Role::Factory(factory);
            for component in Component::ALL {
                let permissions = resolver.permissions_for(&role, Some(component));
                assert!(!permissions.can_edit);
                assert!(!permissions.can_delete);
            }
        }
    }

    #[test]
    fn test_unknown_roles_are_denied() {
        let resolver = resolver();
        for user_name in ["accountant", "Admin", "factory6", "مدير"] {
            let source = signed_in_as(user_name);
            for component in Component::ALL {
                assert_eq!(
                    resolver.resolve_permissions(&source, Some(component.label())),
                    Permissions::NONE
                );
            }
            assert_eq!(resolver.resolve_permissions(&source, None), Permissions::NONE);
        }
    }

    #[test]
    fn test_missing_component_is_denied() {
        let resolver = resolver();
        let source = signed_in_as("factory4");
        assert_eq!(resolver.resolve_permissions(&source, None), Permissions::NONE);
        assert_eq!(
            resolver.resolve_permissions(&source, Some("جرجا معرض مول العرب ")),
            Permissions::NONE
        );
    }

    #[test]
    fn test_role_without_table_row_is_denied() {
        let resolver = AccessResolver::new(
            Arc::new(PolicyTable::from_rows(std::iter::empty()).unwrap()),
            ResolverSettings::default(),
        );
        let role = Role::Factory(Factory::Factory5);
        assert_eq!(
            resolver.permissions_for(&role, Some(Component::GazaTraders)),
            Permissions::NONE
        );
        assert_eq!(
            resolver.visibility(&role, Component::GazaTraders),
            Visibility::VisibleLocked
        );
    }

    #[test]
    fn test_factory2_visibility() {
        let resolver = resolver();
        let source = signed_in_as("factory2");

        assert!(!resolver.is_component_visible(&source, "جرجا معرض مول العرب"));
        assert!(resolver.is_component_visible(&source, "سنتر المنيا"));
        assert!(resolver.is_component_visible(&source, "تقرير لا علاقة له"));
    }

    #[test]
    fn test_visibility_states() {
        let resolver = resolver();
        let role = Role::Factory(Factory::Factory2);

        assert_eq!(
            resolver.visibility(&role, Component::GergaArabMallShowroom),
            Visibility::Hidden
        );
        assert_eq!(
            resolver.visibility(&role, Component::SohagTraders),
            Visibility::VisibleUnlocked
        );
        assert_eq!(
            resolver.visibility(&role, Component::SohagCenter),
            Visibility::VisibleLocked
        );
        assert_eq!(
            resolver.visibility(&Role::Admin, Component::Treasury),
            Visibility::VisibleUnlocked
        );
    }

    #[test]
    fn test_unknown_role_sees_everything_locked_by_default() {
        let resolver = resolver();
        let source = cookies(&[]);
        assert!(resolver.is_component_visible(&source, "الخزينة العامة"));
        assert_eq!(resolver.navigation(&Role::none()).len(), Component::ALL.len());
    }

    #[test]
    fn test_hide_for_unknown_roles() {
        let resolver = AccessResolver::new(
            Arc::new(PolicyTable::builtin().unwrap()),
            ResolverSettings {
                hide_for_unknown_roles: true,
                ..Default::default()
            },
        );
        assert!(!resolver.is_component_visible(&cookies(&[]), "الخزينة العامة"));
        assert!(resolver.navigation(&Role::parse("accountant")).is_empty());
        assert!(resolver.is_component_visible(&signed_in_as("factory1"), "سنتر غزة"));
    }

    #[test]
    fn test_navigation_for_factory1() {
        let resolver = resolver();
        let entries = resolver.navigation(&Role::Factory(Factory::Factory1));

        assert!(entries
            .iter()
            .all(|(c, _)| *c != Component::MainFactory && *c != Component::Treasury));
        assert_eq!(entries.len(), Component::ALL.len() - 2);
        assert!(entries.contains(&(Component::MinyaTraders, Visibility::VisibleUnlocked)));
        assert!(entries.contains(&(Component::MinyaCenter, Visibility::VisibleLocked)));
    }

    #[test]
    fn test_legacy_role_fallback() {
        let resolver = resolver();

        let legacy_only = cookies(&[(LEGACY_ROLE_KEY, "factory5")]);
        assert_eq!(
            resolver.current_role(&legacy_only),
            Role::Factory(Factory::Factory5)
        );

        let broken_token = cookies(&[(ACCESS_TOKEN_KEY, "garbage"), (LEGACY_ROLE_KEY, "admin")]);
        assert_eq!(resolver.current_role(&broken_token), Role::Admin);

        let token_without_user_name = token_for(&serde_json::json!({ "userId": "u-2" }));
        let source = cookies(&[
            (ACCESS_TOKEN_KEY, &token_without_user_name),
            (LEGACY_ROLE_KEY, "factory1"),
        ]);
        assert_eq!(resolver.current_role(&source), Role::Factory(Factory::Factory1));
    }

    #[test]
    fn test_token_wins_over_legacy_role() {
        let resolver = resolver();
        let mut source = signed_in_as("factory3");
        source.insert(LEGACY_ROLE_KEY.to_string(), "admin".to_string());
        assert_eq!(resolver.current_role(&source), Role::Factory(Factory::Factory3));
    }

    #[test]
    fn test_no_signal_means_no_role() {
        let resolver = resolver();
        assert_eq!(resolver.current_role(&cookies(&[])), Role::none());
        assert_eq!(
            resolver.current_role(&cookies(&[(LEGACY_ROLE_KEY, "")])),
            Role::none()
        );
        assert_eq!(
            resolver.current_role(&cookies(&[(ACCESS_TOKEN_KEY, "a.b")])),
            Role::none()
        );
    }

    #[test]
    fn test_expiry_is_informational_by_default() {
        let token = token_for(&serde_json::json!({ "userName": "factory5", "exp": 1 }));
        let source = cookies(&[(ACCESS_TOKEN_KEY, &token)]);

        assert_eq!(
            resolver().current_role(&source),
            Role::Factory(Factory::Factory5)
        );

        let enforcing = AccessResolver::new(
            Arc::new(PolicyTable::builtin().unwrap()),
            ResolverSettings {
                enforce_expiry: true,
                ..Default::default()
            },
        );
        assert_eq!(enforcing.current_role(&source), Role::none());
    }

    #[test]
    fn test_role_survives_unexpected_claim_types() {
        let payloads = [
            serde_json::json!({ "userId": 17, "userName": "factory5" }),
            serde_json::json!({ "userName": "factory5", "exp": 1736500000.5 }),
            serde_json::json!({ "userName": "factory5", "iat": 1, "issuedAt": 1 }),
            serde_json::json!({ "userName": "factory5", "role": { "k": "factory" } }),
        ];

        for payload in payloads {
            let source = cookies(&[(ACCESS_TOKEN_KEY, &token_for(&payload))]);
            assert_eq!(
                resolver().current_role(&source),
                Role::Factory(Factory::Factory5),
                "payload: {}",
                payload
            );
        }
    }

    #[test]
    fn test_role_for_uses_given_claims() {
        let resolver = resolver();
        let source = cookies(&[(LEGACY_ROLE_KEY, "factory1")]);
        let claims = Claims {
            user_name: Some("factory4".to_string()),
            ..Default::default()
        };

        assert_eq!(
            resolver.role_for(Some(&claims), &source),
            Role::Factory(Factory::Factory4)
        );
        assert_eq!(
            resolver.role_for(None, &source),
            Role::Factory(Factory::Factory1)
        );
        assert_eq!(
            resolver.role_for(Some(&Claims::default()), &source),
            Role::Factory(Factory::Factory1)
        );
    }

    #[test]
    fn test_custom_keys() {
        let resolver = AccessResolver::new(
            Arc::new(PolicyTable::builtin().unwrap()),
            ResolverSettings {
                token_key: "jwt".to_string(),
                legacy_role_key: "role".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(
            resolver.current_role(&cookies(&[(LEGACY_ROLE_KEY, "admin")])),
            Role::none()
        );
        assert_eq!(resolver.current_role(&cookies(&[("role", "admin")])), Role::Admin);
    }

    #[test]
    fn test_resolution_is_idempotent_and_uncached() {
        let resolver = resolver();
        let mut source = signed_in_as("factory5");

        let first = resolver.resolve_permissions(&source, Some("حساب تجار سنتر غزة"));
        let second = resolver.resolve_permissions(&source, Some("حساب تجار سنتر غزة"));
        assert_eq!(first, second);

        source = signed_in_as("factory1");
        let after_swap = resolver.resolve_permissions(&source, Some("حساب تجار سنتر غزة"));
        assert!(!after_swap.can_access);
    }

    #[test]
    fn test_permissions_serialize_camel_case() {
        let json = serde_json::to_value(Permissions::FULL).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "canAccess": true, "canEdit": true, "canDelete": true })
        );
        let json = serde_json::to_value(Visibility::VisibleLocked).unwrap();
        assert_eq!(json, serde_json::json!("visible_locked"));
    }
}
