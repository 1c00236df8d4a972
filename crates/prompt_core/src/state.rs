use crate::view_model::PromptViewModel;
use crate::{FetchSeq, PromptMode, SessionProbe};

/// Host-supplied capabilities and environment facts, fixed at construction.
///
/// The embedding host knows whether it is a restricted context (e.g. a
/// scheduling dialog that only needs the parameter schema) and which marker
/// identifies its login page; neither is probed at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PromptConfig {
    /// Restricted embedding: never issue the heavier auto-submit follow-up
    /// fetch for full content.
    pub restricted_embedding: bool,
    pub session_probe: SessionProbe,
}

/// Controller state. Mutated only inside `update` turns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PromptState {
    config: PromptConfig,
    mode: PromptMode,
    auto_submit: bool,
    initialized: bool,
    current_seq: FetchSeq,
    awaiting: bool,
}

impl PromptState {
    pub fn new(config: PromptConfig) -> Self {
        Self {
            config,
            // The panel's auto-submit preference until the host says otherwise.
            auto_submit: true,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> PromptMode {
        self.mode
    }

    pub fn auto_submit(&self) -> bool {
        self.auto_submit
    }

    /// False until the first accepted response has been fully processed,
    /// then permanently true.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Sequence number of the most recently issued fetch.
    pub fn current_seq(&self) -> FetchSeq {
        self.current_seq
    }

    /// True while the most recent fetch (or its recovery) is unresolved.
    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    pub fn view(&self) -> PromptViewModel {
        PromptViewModel {
            mode: self.mode,
            auto_submit: self.auto_submit,
            initialized: self.initialized,
            awaiting: self.awaiting,
            fetches_issued: self.current_seq.value(),
        }
    }

    pub(crate) fn config(&self) -> &PromptConfig {
        &self.config
    }

    pub(crate) fn set_mode(&mut self, mode: PromptMode) {
        self.mode = mode;
    }

    pub(crate) fn set_auto_submit(&mut self, enabled: bool) {
        self.auto_submit = enabled;
    }

    pub(crate) fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    /// Starts a new fetch: bumps the live counter, voiding every response
    /// still in flight, and returns the new sequence number.
    pub(crate) fn begin_fetch(&mut self) -> FetchSeq {
        self.current_seq = self.current_seq.next();
        self.awaiting = true;
        self.current_seq
    }

    pub(crate) fn settle(&mut self) {
        self.awaiting = false;
    }

    /// True if `seq` is no longer the live counter value.
    pub(crate) fn is_stale(&self, seq: FetchSeq) -> bool {
        seq != self.current_seq
    }
}
