use crate::FetchSeq;

/// Transport result fed back into the state machine for one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The request completed; any HTTP status lands here, including the
    /// login page served for an expired session.
    Success { status: u16, body: String },
    /// The request never produced a payload (network failure, timeout).
    Failure { status: Option<u16>, message: String },
}

/// Facts the state machine needs from a parsed parameter definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinitionSummary {
    /// Whether the definition allows skipping straight to full content.
    pub allow_auto_submit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptMsg {
    /// Host asked for the prompt panel; begins a creation cycle.
    PanelRequested,
    /// User edited a parameter value.
    ParameterChanged,
    /// User pressed the submit button.
    SubmitPressed,
    /// Host toggled the panel's auto-submit preference.
    AutoSubmitChanged(bool),
    /// Transport finished for the fetch identified by `seq`.
    FetchCompleted { seq: FetchSeq, outcome: FetchOutcome },
    /// An accepted payload parsed into a parameter definition.
    DefinitionReady {
        seq: FetchSeq,
        definition: DefinitionSummary,
    },
    /// An accepted payload failed to parse.
    DefinitionRejected { seq: FetchSeq, message: String },
    /// Re-authentication succeeded; the interrupted fetch is replayed.
    ReauthSucceeded,
    /// No re-authentication path is available; the cycle ends here.
    RecoveryAbandoned,
}
