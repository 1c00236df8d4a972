use std::collections::BTreeMap;

use url::Url;

use crate::RenderMode;

/// Request option key carrying the render mode.
pub const RENDER_MODE_KEY: &str = "renderMode";

/// Reserved session-identifier key. The session token is server-issued and
/// must never be client-supplied, so this key is stripped before every send.
pub const SESSION_KEY: &str = "::session";

/// Flat parameter-name to value mapping sent with one fetch.
///
/// Assembled per fetch from the report URL's query parameters, the panel's
/// currently collected values, and the computed render mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestOptions {
    values: BTreeMap<String, String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds options from the query string of the report URL.
    pub fn from_url(url: &Url) -> Self {
        let mut options = Self::new();
        for (name, value) in url.query_pairs() {
            options.set(name, value);
        }
        options
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Overlays `other` on top of these options, last writer wins.
    pub fn merge(&mut self, other: impl IntoIterator<Item = (String, String)>) {
        for (name, value) in other {
            self.values.insert(name, value);
        }
    }

    pub fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.set(RENDER_MODE_KEY, render_mode.as_str());
    }

    /// Removes the reserved session key. Always called before sending.
    pub fn strip_session(&mut self) {
        self.values.remove(SESSION_KEY);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Ordered name/value pairs for form encoding.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl FromIterator<(String, String)> for RequestOptions {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut options = Self::new();
        options.merge(iter);
        options
    }
}
