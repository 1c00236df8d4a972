/// Modal message box request.
///
/// Either one or two labeled buttons whose choice is reported back, or the
/// blocking variant with no buttons at all, used when there is nothing
/// sensible the user could do besides acknowledging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBox {
    pub title: String,
    pub message: String,
    pub buttons: Vec<String>,
    pub blocking: bool,
}

impl MessageBox {
    pub fn with_buttons(
        title: impl Into<String>,
        message: impl Into<String>,
        buttons: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            buttons,
            blocking: false,
        }
    }

    pub fn blocking(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            buttons: Vec::new(),
            blocking: true,
        }
    }
}

/// Delegated UI surface implemented by the embedding host.
pub trait PromptUi: Send + Sync {
    /// Blocks the whole panel behind an overlay.
    fn show_glass_pane(&self);
    fn hide_glass_pane(&self);
    fn show_progress_indicator(&self);
    fn hide_progress_indicator(&self);
    /// Shows a modal box; returns the chosen button index, or `None` for the
    /// blocking variant.
    fn show_message_box(&self, request: &MessageBox) -> Option<usize>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parameter value collection failed: {0}")]
pub struct ValueCollectionError(pub String);

/// Bridge to the prompting panel widget owned by the host.
pub trait PanelBridge: Send + Sync {
    /// One-time panel construction after the first accepted response.
    fn initialize(&self);

    /// The panel's currently collected parameter values. Best effort: the
    /// controller swallows failures and sends what it has.
    fn current_values(&self) -> Result<Vec<(String, String)>, ValueCollectionError>;
}
