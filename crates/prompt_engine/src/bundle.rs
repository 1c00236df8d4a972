use std::collections::HashMap;

use crate::transport::{Transport, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("bundle endpoint answered {0}")]
    Status(u16),
    #[error("malformed bundle payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Internationalized strings, loaded once at startup.
///
/// Lookup falls back to the key itself so a missing bundle degrades to
/// readable English-ish labels instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBundle {
    entries: HashMap<String, String>,
}

impl MessageBundle {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Fetches the bundle keyed by plugin and name: a flat JSON object of
    /// key to localized string.
    pub async fn load(
        transport: &dyn Transport,
        plugin: &str,
        name: &str,
    ) -> Result<Self, BundleError> {
        let endpoint = format!("i18n?plugin={plugin}&name={name}");
        let payload = transport.get_text(&endpoint).await?;
        if !(200..300).contains(&payload.status) {
            return Err(BundleError::Status(payload.status));
        }
        let document: HashMap<String, String> = serde_json::from_str(&payload.body)?;
        Ok(Self { entries: document })
    }

    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
