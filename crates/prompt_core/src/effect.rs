use crate::{FetchSeq, RenderMode};

/// Side effects requested by `update`, executed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEffect {
    /// Block the panel behind the glass pane while a fetch is in flight.
    ShowGlassPane,
    /// Unblock the panel so the user can keep editing values.
    HideGlassPane,
    /// Issue a parameter-definition fetch.
    IssueFetch {
        seq: FetchSeq,
        render_mode: RenderMode,
    },
    /// Parse the accepted payload; answered with `DefinitionReady` or
    /// `DefinitionRejected`.
    ProcessDefinition { seq: FetchSeq, body: String },
    /// The session expired; re-authenticate and replay, or surface the
    /// expiry dialog when no re-authentication path exists.
    RecoverSession,
    /// One-time panel initialization, first accepted response only.
    InitializePanel,
    /// Post-initialization update notification to the host.
    NotifyUpdate,
    /// Hide the host's loading/progress indicator.
    HideProgressIndicator,
    /// Terminal failure path: log and show a modal dialog. No retry.
    ReportFatal { message: String },
}
