use crate::{
    render_mode_for, FetchOutcome, PromptEffect, PromptMode, PromptMsg, PromptState,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PromptState, msg: PromptMsg) -> (PromptState, Vec<PromptEffect>) {
    let effects = match msg {
        PromptMsg::PanelRequested => {
            state.set_mode(PromptMode::Initial);
            issue_fetch(&mut state)
        }
        PromptMsg::ParameterChanged => {
            state.set_mode(PromptMode::UserInput);
            issue_fetch(&mut state)
        }
        PromptMsg::SubmitPressed => {
            state.set_mode(PromptMode::Manual);
            issue_fetch(&mut state)
        }
        PromptMsg::AutoSubmitChanged(enabled) => {
            state.set_auto_submit(enabled);
            Vec::new()
        }
        PromptMsg::FetchCompleted { seq, outcome } => {
            // Another fetch was started after this one, so this one is void.
            if state.is_stale(seq) {
                return (state, Vec::new());
            }
            match outcome {
                FetchOutcome::Success { status, body } => {
                    if state.config().session_probe.is_expired(Some(status), &body) {
                        vec![PromptEffect::RecoverSession]
                    } else {
                        vec![PromptEffect::ProcessDefinition { seq, body }]
                    }
                }
                FetchOutcome::Failure { status, message } => {
                    if state.config().session_probe.is_expired(status, &message) {
                        vec![PromptEffect::RecoverSession]
                    } else {
                        state.settle();
                        vec![PromptEffect::ReportFatal { message }]
                    }
                }
            }
        }
        PromptMsg::DefinitionReady { seq, definition } => {
            if state.is_stale(seq) {
                return (state, Vec::new());
            }
            let follow_up = !state.config().restricted_embedding
                && state.mode() == PromptMode::Initial
                && definition.allow_auto_submit;
            if follow_up {
                // The first response only carried the parameter schema; go
                // straight for full content. That second response is what
                // completes panel creation.
                state.set_mode(PromptMode::Manual);
                issue_fetch(&mut state)
            } else {
                state.settle();
                let mut effects = vec![PromptEffect::HideProgressIndicator];
                if state.is_initialized() {
                    effects.push(PromptEffect::NotifyUpdate);
                } else {
                    state.mark_initialized();
                    effects.push(PromptEffect::InitializePanel);
                }
                effects.push(PromptEffect::HideGlassPane);
                effects
            }
        }
        PromptMsg::DefinitionRejected { seq, message } => {
            if state.is_stale(seq) {
                return (state, Vec::new());
            }
            state.settle();
            vec![PromptEffect::ReportFatal { message }]
        }
        PromptMsg::ReauthSucceeded => issue_fetch(&mut state),
        PromptMsg::RecoveryAbandoned => {
            state.settle();
            Vec::new()
        }
    };

    (state, effects)
}

/// Bumps the sequence counter and emits the fetch effect pair.
///
/// The glass pane normally blocks the panel for the duration of the fetch,
/// except during user input, where blocking would interrupt editing.
fn issue_fetch(state: &mut PromptState) -> Vec<PromptEffect> {
    let seq = state.begin_fetch();
    let overlay = if state.mode() == PromptMode::UserInput {
        PromptEffect::HideGlassPane
    } else {
        PromptEffect::ShowGlassPane
    };
    vec![
        overlay,
        PromptEffect::IssueFetch {
            seq,
            render_mode: render_mode_for(state.mode(), state.auto_submit()),
        },
    ]
}
