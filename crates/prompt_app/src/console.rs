//! Terminal implementations of the delegated UI surfaces.

use prompt_engine::{MessageBox, PanelBridge, PromptUi, ValueCollectionError};

/// Renders the glass pane, progress indicator, and message boxes as console
/// output. Message boxes auto-acknowledge their first button, since there is
/// no interactive widget to wait on.
pub struct ConsoleUi;

impl PromptUi for ConsoleUi {
    fn show_glass_pane(&self) {
        log::debug!("[ui] glass pane shown");
    }

    fn hide_glass_pane(&self) {
        log::debug!("[ui] glass pane hidden");
    }

    fn show_progress_indicator(&self) {
        log::debug!("[ui] progress indicator shown");
    }

    fn hide_progress_indicator(&self) {
        log::debug!("[ui] progress indicator hidden");
    }

    fn show_message_box(&self, request: &MessageBox) -> Option<usize> {
        println!("=== {} ===", request.title);
        println!("{}", request.message);
        if request.blocking {
            return None;
        }
        for (index, label) in request.buttons.iter().enumerate() {
            println!("  [{index}] {label}");
        }
        // First button is the default action.
        Some(0)
    }
}

/// Stand-in prompt panel fed from `name=value` command line arguments.
pub struct ConsolePanel {
    values: Vec<(String, String)>,
}

impl ConsolePanel {
    pub fn new(values: Vec<(String, String)>) -> Self {
        Self { values }
    }
}

impl PanelBridge for ConsolePanel {
    fn initialize(&self) {
        println!("prompt panel ready ({} preset values)", self.values.len());
    }

    fn current_values(&self) -> Result<Vec<(String, String)>, ValueCollectionError> {
        Ok(self.values.clone())
    }
}
