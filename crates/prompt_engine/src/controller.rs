use std::sync::Arc;

use prompt_core::{
    update, DefinitionSummary, FetchOutcome, FetchSeq, PromptConfig, PromptEffect, PromptMsg,
    PromptState, PromptViewModel, RenderMode, RequestOptions,
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use url::Url;

use crate::auth::Reauthenticate;
use crate::bundle::MessageBundle;
use crate::definition::{parse_parameter_definition, ParameterDefinition};
use crate::transport::Transport;
use crate::ui::{MessageBox, PanelBridge, PromptUi};

/// Static wiring for one controller instance.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub prompt: PromptConfig,
    /// Report URL whose query parameters seed every request.
    pub report_url: Url,
    /// Endpoint name, relative to the server base, serving definitions.
    pub parameter_endpoint: String,
}

impl ControllerConfig {
    pub fn new(report_url: Url) -> Self {
        Self {
            prompt: PromptConfig::default(),
            report_url,
            parameter_endpoint: "parameter".to_string(),
        }
    }
}

/// Orchestrates definition fetches, panel initialization, and recovery.
///
/// All state mutation happens in single-threaded `apply` turns; transport
/// completions from spawned tasks are funneled back through one channel, so
/// no synchronization beyond the sequence-number guard is needed.
pub struct PromptController {
    state: PromptState,
    endpoint: String,
    base_options: RequestOptions,
    transport: Arc<dyn Transport>,
    ui: Arc<dyn PromptUi>,
    panel: Arc<dyn PanelBridge>,
    bundle: Arc<MessageBundle>,
    reauth: Option<Arc<dyn Reauthenticate>>,
    events_tx: UnboundedSender<PromptMsg>,
    events_rx: UnboundedReceiver<PromptMsg>,
    update_callback: Option<Box<dyn FnMut() + Send>>,
    last_definition: Option<ParameterDefinition>,
}

impl PromptController {
    pub fn new(
        config: ControllerConfig,
        transport: Arc<dyn Transport>,
        ui: Arc<dyn PromptUi>,
        panel: Arc<dyn PanelBridge>,
        bundle: Arc<MessageBundle>,
        reauth: Option<Arc<dyn Reauthenticate>>,
    ) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        Self {
            state: PromptState::new(config.prompt),
            endpoint: config.parameter_endpoint,
            base_options: RequestOptions::from_url(&config.report_url),
            transport,
            ui,
            panel,
            bundle,
            reauth,
            events_tx,
            events_rx,
            update_callback: None,
            last_definition: None,
        }
    }

    pub fn view(&self) -> PromptViewModel {
        self.state.view()
    }

    /// Definition from the most recent accepted response, if any.
    pub fn last_definition(&self) -> Option<&ParameterDefinition> {
        self.last_definition.as_ref()
    }

    /// Begins the creation/render cycle and drives it to completion.
    ///
    /// `on_update` fires for every accepted response after the one-time
    /// panel initialization.
    pub async fn create_prompt_panel<F>(&mut self, on_update: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.update_callback = Some(Box::new(on_update));
        self.apply(PromptMsg::PanelRequested);
        self.run_until_settled().await;
    }

    /// User edited a parameter value; refetch with user-input semantics.
    pub async fn parameter_changed(&mut self) {
        self.notify_parameter_changed();
        self.run_until_settled().await;
    }

    /// User pressed the submit button; refetch full content.
    pub async fn submit(&mut self) {
        self.apply(PromptMsg::SubmitPressed);
        self.run_until_settled().await;
    }

    /// Dispatch-only variant for hosts that drive their own event loop.
    pub fn notify_parameter_changed(&mut self) {
        self.apply(PromptMsg::ParameterChanged);
    }

    /// Records the panel's auto-submit preference.
    pub fn set_auto_submit(&mut self, enabled: bool) {
        self.apply(PromptMsg::AutoSubmitChanged(enabled));
    }

    /// Processes queued events until the current fetch cycle is resolved.
    ///
    /// Stale completions drained along the way are dropped by the sequence
    /// guard in the core; they never reach the host.
    pub async fn run_until_settled(&mut self) {
        while self.state.is_awaiting() {
            let Some(msg) = self.events_rx.recv().await else {
                break;
            };
            self.apply(msg);
        }
    }

    fn apply(&mut self, msg: PromptMsg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.execute(effect);
        }
    }

    fn execute(&mut self, effect: PromptEffect) {
        match effect {
            PromptEffect::ShowGlassPane => self.ui.show_glass_pane(),
            PromptEffect::HideGlassPane => self.ui.hide_glass_pane(),
            PromptEffect::HideProgressIndicator => self.ui.hide_progress_indicator(),
            PromptEffect::IssueFetch { seq, render_mode } => self.spawn_fetch(seq, render_mode),
            PromptEffect::ProcessDefinition { seq, body } => self.process_definition(seq, &body),
            PromptEffect::RecoverSession => self.recover_session(),
            PromptEffect::InitializePanel => {
                prompt_logging::prompt_info!("prompt panel initialized");
                self.panel.initialize();
            }
            PromptEffect::NotifyUpdate => {
                if let Some(callback) = self.update_callback.as_mut() {
                    callback();
                }
            }
            PromptEffect::ReportFatal { message } => self.report_fatal(&message),
        }
    }

    fn spawn_fetch(&self, seq: FetchSeq, render_mode: RenderMode) {
        let options = self.assemble_options(render_mode);
        let transport = Arc::clone(&self.transport);
        let endpoint = self.endpoint.clone();
        let events_tx = self.events_tx.clone();
        prompt_logging::prompt_debug!(
            "fetching parameter definition {seq} renderMode={}",
            render_mode.as_str()
        );
        tokio::spawn(async move {
            let outcome = match transport.post_form(&endpoint, &options).await {
                Ok(payload) => FetchOutcome::Success {
                    status: payload.status,
                    body: payload.body,
                },
                Err(err) => FetchOutcome::Failure {
                    status: None,
                    message: err.to_string(),
                },
            };
            let _ = events_tx.send(PromptMsg::FetchCompleted { seq, outcome });
        });
    }

    /// Per-fetch options: report URL query parameters, then the panel's
    /// current values (best effort), then the render mode. The reserved
    /// session key is stripped last; the token is server-issued.
    fn assemble_options(&self, render_mode: RenderMode) -> RequestOptions {
        let mut options = self.base_options.clone();
        match self.panel.current_values() {
            Ok(values) => options.merge(values),
            Err(err) => prompt_logging::prompt_debug!("{err}; sending without panel values"),
        }
        options.set_render_mode(render_mode);
        options.strip_session();
        options
    }

    fn process_definition(&mut self, seq: FetchSeq, body: &str) {
        match parse_parameter_definition(body) {
            Ok(definition) => {
                let summary = DefinitionSummary {
                    allow_auto_submit: definition.allow_auto_submit(),
                };
                self.last_definition = Some(definition);
                let _ = self
                    .events_tx
                    .send(PromptMsg::DefinitionReady { seq, definition: summary });
            }
            Err(err) => {
                let _ = self.events_tx.send(PromptMsg::DefinitionRejected {
                    seq,
                    message: err.to_string(),
                });
            }
        }
    }

    fn recover_session(&self) {
        match self.reauth.as_ref() {
            Some(reauth) => {
                prompt_logging::prompt_info!("session expired; re-authenticating");
                let reauth = Arc::clone(reauth);
                let ui = Arc::clone(&self.ui);
                let events_tx = self.events_tx.clone();
                let expired_box = self.session_expired_box();
                tokio::spawn(async move {
                    match reauth.reauthenticate().await {
                        Ok(()) => {
                            let _ = events_tx.send(PromptMsg::ReauthSucceeded);
                        }
                        Err(err) => {
                            prompt_logging::prompt_warn!("{err}");
                            ui.show_progress_indicator();
                            ui.show_message_box(&expired_box);
                            let _ = events_tx.send(PromptMsg::RecoveryAbandoned);
                        }
                    }
                });
            }
            None => {
                // No programmatic re-login path in this embedding.
                self.show_message_box(self.session_expired_box());
                let _ = self.events_tx.send(PromptMsg::RecoveryAbandoned);
            }
        }
    }

    fn session_expired_box(&self) -> MessageBox {
        MessageBox::blocking(
            self.bundle.get("SessionExpired"),
            self.bundle.get("SessionExpiredComment"),
        )
    }

    fn report_fatal(&self, detail: &str) {
        let message = self.bundle.get("ErrorParsingParamXmlMessage");
        prompt_logging::prompt_error!("{message}: {detail}");
        self.show_message_box(MessageBox::with_buttons(
            self.bundle.get("FatalErrorTitle"),
            message,
            vec![self.bundle.get("OK").to_string()],
        ));
    }

    fn show_message_box(&self, request: MessageBox) {
        self.ui.show_progress_indicator();
        let choice = self.ui.show_message_box(&request);
        if !request.blocking && choice.is_some() {
            self.ui.hide_progress_indicator();
        }
    }
}
