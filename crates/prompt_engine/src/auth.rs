#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("re-authentication failed: {0}")]
pub struct ReauthError(pub String);

/// Host-provided re-authentication capability.
///
/// Injected at construction by hosts running in a trusted same-origin
/// embedding; absent otherwise, since a cross-origin host cannot re-login
/// programmatically and the controller falls back to the expiry dialog.
#[async_trait::async_trait]
pub trait Reauthenticate: Send + Sync {
    /// Runs the host login flow; `Ok` means the session is valid again.
    async fn reauthenticate(&self) -> Result<(), ReauthError>;
}
