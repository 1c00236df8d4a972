//! Prompt engine: transport, definition parsing, and the controller loop.
mod auth;
mod bundle;
mod controller;
mod definition;
mod transport;
mod ui;

pub use auth::{Reauthenticate, ReauthError};
pub use bundle::{BundleError, MessageBundle};
pub use controller::{ControllerConfig, PromptController};
pub use definition::{
    parse_parameter_definition, scrub_control_entities, DefinitionError, DefinitionFault,
    ParameterDefinition, ParameterInfo, ParameterValue,
};
pub use transport::{
    ReqwestTransport, Transport, TransportError, TransportPayload, TransportSettings,
};
pub use ui::{MessageBox, PanelBridge, PromptUi, ValueCollectionError};
