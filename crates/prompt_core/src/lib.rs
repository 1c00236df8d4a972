//! Prompt core: pure mode state machine and fetch-sequencing rules.
mod effect;
mod mode;
mod msg;
mod options;
mod seq;
mod session;
mod state;
mod update;
mod view_model;

pub use effect::PromptEffect;
pub use mode::{render_mode_for, PromptMode, RenderMode};
pub use msg::{DefinitionSummary, FetchOutcome, PromptMsg};
pub use options::{RequestOptions, RENDER_MODE_KEY, SESSION_KEY};
pub use seq::FetchSeq;
pub use session::{SessionProbe, DEFAULT_LOGIN_MARKER};
pub use state::{PromptConfig, PromptState};
pub use update::update;
pub use view_model::PromptViewModel;
