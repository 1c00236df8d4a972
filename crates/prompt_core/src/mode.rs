use std::fmt;

/// The controller's current prompt mode.
///
/// `Initial` is the first contact with the server, `Manual` covers explicit
/// submits (and the auto-submit follow-up fetch), `UserInput` covers fetches
/// triggered by the user editing a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptMode {
    #[default]
    Initial,
    Manual,
    UserInput,
}

impl fmt::Display for PromptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptMode::Initial => write!(f, "INITIAL"),
            PromptMode::Manual => write!(f, "MANUAL"),
            PromptMode::UserInput => write!(f, "USERINPUT"),
        }
    }
}

/// Render mode requested from the server for one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Parameter schema only, no content generation.
    Parameter,
    /// Full rendered content.
    Xml,
}

impl RenderMode {
    /// Wire value sent in the `renderMode` request option.
    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Parameter => "PARAMETER",
            RenderMode::Xml => "XML",
        }
    }
}

/// Maps the prompt mode to the render mode to request.
///
/// `UserInput` only asks for full content when auto-submit is enabled;
/// otherwise the user must explicitly submit before content is generated.
pub fn render_mode_for(mode: PromptMode, auto_submit: bool) -> RenderMode {
    match mode {
        PromptMode::Initial => RenderMode::Parameter,
        PromptMode::UserInput if !auto_submit => RenderMode::Parameter,
        _ => RenderMode::Xml,
    }
}
