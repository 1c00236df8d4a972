/// Marker substring identifying the login page in a response body.
pub const DEFAULT_LOGIN_MARKER: &str = "j_spring_security_check";

/// Detects session expiry by inspecting a response payload.
///
/// The server answers an expired session either with a 401 status or by
/// serving the login page itself, so both are treated as expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProbe {
    marker: String,
}

impl Default for SessionProbe {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_MARKER)
    }
}

impl SessionProbe {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// True if the body looks like the login page.
    pub fn is_login_page(&self, body: &str) -> bool {
        body.contains(&self.marker)
    }

    pub fn is_expired(&self, status: Option<u16>, body: &str) -> bool {
        status == Some(401) || self.is_login_page(body)
    }
}
