use crate::PromptMode;

/// Read-only snapshot of the controller for hosts and status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptViewModel {
    pub mode: PromptMode,
    pub auto_submit: bool,
    pub initialized: bool,
    pub awaiting: bool,
    pub fetches_issued: u64,
}
