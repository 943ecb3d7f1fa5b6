use std::collections::{BTreeMap, HashMap};

/// Cookie holding the encoded access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Cookie holding a bare role identifier, set by older logins.
pub const LEGACY_ROLE_KEY: &str = "userRole";

/// Read-only view of wherever the client persists its token.
///
/// Access decisions only ever read; nothing here can write back.
pub trait TokenSource {
    fn get(&self, key: &str) -> Option<String>;
}

impl<T: TokenSource + ?Sized> TokenSource for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

impl TokenSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl TokenSource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

#[cfg(feature = "cookies")]
impl TokenSource for axum_extra::extract::CookieJar {
    fn get(&self, key: &str) -> Option<String> {
        axum_extra::extract::CookieJar::get(self, key).map(|cookie| cookie.value().to_string())
    }
}
