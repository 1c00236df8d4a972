use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use prompt_core::{PromptMode, RequestOptions};
use prompt_engine::{
    ControllerConfig, MessageBox, MessageBundle, PanelBridge, PromptController, PromptUi,
    Reauthenticate, ReauthError, ReqwestTransport, Transport, TransportError, TransportPayload,
    TransportSettings, ValueCollectionError,
};
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(prompt_logging::initialize_for_tests);
}

const SCHEMA_AUTO: &str = "<parameters autoSubmit=\"true\"><parameter name=\"REGION\"/></parameters>";
const SCHEMA_PLAIN: &str = "<parameters><parameter name=\"REGION\"/></parameters>";
const FULL_XML: &str =
    "<parameters autoSubmit=\"true\" page-count=\"3\"><parameter name=\"REGION\"/></parameters>";
const LOGIN_PAGE: &str = "<html>j_spring_security_check</html>";

#[derive(Default)]
struct RecordingUi {
    boxes: Mutex<Vec<MessageBox>>,
    glass_pane_shown: AtomicUsize,
    glass_pane_hidden: AtomicUsize,
}

impl PromptUi for RecordingUi {
    fn show_glass_pane(&self) {
        self.glass_pane_shown.fetch_add(1, Ordering::SeqCst);
    }

    fn hide_glass_pane(&self) {
        self.glass_pane_hidden.fetch_add(1, Ordering::SeqCst);
    }

    fn show_progress_indicator(&self) {}

    fn hide_progress_indicator(&self) {}

    fn show_message_box(&self, request: &MessageBox) -> Option<usize> {
        self.boxes.lock().unwrap().push(request.clone());
        if request.blocking {
            None
        } else {
            Some(0)
        }
    }
}

#[derive(Default)]
struct RecordingPanel {
    init_count: AtomicUsize,
    values: Vec<(String, String)>,
    fail_collection: bool,
}

impl PanelBridge for RecordingPanel {
    fn initialize(&self) {
        self.init_count.fetch_add(1, Ordering::SeqCst);
    }

    fn current_values(&self) -> Result<Vec<(String, String)>, ValueCollectionError> {
        if self.fail_collection {
            Err(ValueCollectionError("widgets not ready".to_string()))
        } else {
            Ok(self.values.clone())
        }
    }
}

/// Serves canned payloads in call order, each after its scripted delay.
struct ScriptedTransport {
    script: Vec<(Duration, Result<TransportPayload, TransportError>)>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    fn new(script: Vec<(Duration, Result<TransportPayload, TransportError>)>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    fn ok(status: u16, body: &str) -> Result<TransportPayload, TransportError> {
        Ok(TransportPayload {
            status,
            body: body.to_string(),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn post_form(
        &self,
        _endpoint: &str,
        _options: &RequestOptions,
    ) -> Result<TransportPayload, TransportError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let (delay, result) = self
            .script
            .get(index)
            .cloned()
            .unwrap_or((Duration::ZERO, Err(TransportError::Network("script exhausted".into()))));
        tokio::time::sleep(delay).await;
        result
    }

    async fn get_text(&self, _endpoint: &str) -> Result<TransportPayload, TransportError> {
        Err(TransportError::Network("not scripted".to_string()))
    }
}

#[derive(Default)]
struct RecordingReauth {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait::async_trait]
impl Reauthenticate for RecordingReauth {
    async fn reauthenticate(&self) -> Result<(), ReauthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(ReauthError("login window dismissed".to_string()))
        } else {
            Ok(())
        }
    }
}

struct Harness {
    ui: Arc<RecordingUi>,
    panel: Arc<RecordingPanel>,
    updates: Arc<AtomicUsize>,
}

fn controller_with(
    transport: Arc<dyn Transport>,
    config: ControllerConfig,
    panel: RecordingPanel,
    reauth: Option<Arc<dyn Reauthenticate>>,
) -> (PromptController, Harness) {
    let ui = Arc::new(RecordingUi::default());
    let panel = Arc::new(panel);
    let controller = PromptController::new(
        config,
        transport,
        Arc::clone(&ui) as Arc<dyn PromptUi>,
        Arc::clone(&panel) as Arc<dyn PanelBridge>,
        Arc::new(MessageBundle::empty()),
        reauth,
    );
    let harness = Harness {
        ui,
        panel,
        updates: Arc::new(AtomicUsize::new(0)),
    };
    (controller, harness)
}

fn report_url() -> Url {
    Url::parse("https://reports.example.com/viewer?solution=ops").unwrap()
}

async fn create_panel(controller: &mut PromptController, harness: &Harness) {
    let updates = Arc::clone(&harness.updates);
    controller
        .create_prompt_panel(move || {
            updates.fetch_add(1, Ordering::SeqCst);
        })
        .await;
}

#[tokio::test]
async fn creation_with_auto_submit_issues_second_fetch() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/parameter"))
        .and(body_string_contains("renderMode=PARAMETER"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SCHEMA_AUTO, "text/xml"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/parameter"))
        .and(body_string_contains("renderMode=XML"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FULL_XML, "text/xml"))
        .mount(&server)
        .await;

    let base = Url::parse(&format!("{}/viewer?solution=ops", server.uri())).unwrap();
    let transport = Arc::new(
        ReqwestTransport::new(base.clone(), TransportSettings::default()).expect("client"),
    );
    let (mut controller, harness) = controller_with(
        transport,
        ControllerConfig::new(base),
        RecordingPanel::default(),
        None,
    );

    create_panel(&mut controller, &harness).await;

    let view = controller.view();
    assert_eq!(view.mode, PromptMode::Manual);
    assert!(view.initialized);
    assert_eq!(view.fetches_issued, 2);
    assert_eq!(harness.panel.init_count.load(Ordering::SeqCst), 1);
    assert_eq!(harness.updates.load(Ordering::SeqCst), 0);
    assert!(harness.ui.boxes.lock().unwrap().is_empty());
    // One overlay per fetch, plus the final unblock after acceptance.
    assert_eq!(harness.ui.glass_pane_shown.load(Ordering::SeqCst), 2);
    assert_eq!(harness.ui.glass_pane_hidden.load(Ordering::SeqCst), 1);
    // The second response carried the page count of the rendered report.
    assert_eq!(
        controller.last_definition().and_then(|d| d.page_count),
        Some(3)
    );
}

#[tokio::test]
async fn restricted_embedding_stops_after_the_schema() {
    init_logging();
    let transport = Arc::new(ScriptedTransport::new(vec![(
        Duration::ZERO,
        ScriptedTransport::ok(200, SCHEMA_AUTO),
    )]));
    let mut config = ControllerConfig::new(report_url());
    config.prompt.restricted_embedding = true;
    let (mut controller, harness) = controller_with(
        Arc::clone(&transport) as Arc<dyn Transport>,
        config,
        RecordingPanel::default(),
        None,
    );

    create_panel(&mut controller, &harness).await;

    let view = controller.view();
    assert_eq!(view.mode, PromptMode::Initial);
    assert!(view.initialized);
    assert_eq!(view.fetches_issued, 1);
    assert_eq!(transport.call_count(), 1);
    assert_eq!(harness.panel.init_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn expired_session_reauthenticates_and_replays() {
    init_logging();
    let transport = Arc::new(ScriptedTransport::new(vec![
        (Duration::ZERO, ScriptedTransport::ok(200, LOGIN_PAGE)),
        (Duration::ZERO, ScriptedTransport::ok(200, SCHEMA_PLAIN)),
    ]));
    let reauth = Arc::new(RecordingReauth::default());
    let (mut controller, harness) = controller_with(
        Arc::clone(&transport) as Arc<dyn Transport>,
        ControllerConfig::new(report_url()),
        RecordingPanel::default(),
        Some(Arc::clone(&reauth) as Arc<dyn Reauthenticate>),
    );

    create_panel(&mut controller, &harness).await;

    assert_eq!(reauth.calls.load(Ordering::SeqCst), 1);
    assert_eq!(transport.call_count(), 2);
    assert!(controller.view().initialized);
    assert_eq!(harness.panel.init_count.load(Ordering::SeqCst), 1);
    // The fatal sink stays quiet on the recovery path.
    assert!(harness.ui.boxes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn expiry_without_capability_shows_blocking_dialog() {
    init_logging();
    let transport = Arc::new(ScriptedTransport::new(vec![(
        Duration::ZERO,
        ScriptedTransport::ok(401, LOGIN_PAGE),
    )]));
    let (mut controller, harness) = controller_with(
        Arc::clone(&transport) as Arc<dyn Transport>,
        ControllerConfig::new(report_url()),
        RecordingPanel::default(),
        None,
    );

    create_panel(&mut controller, &harness).await;

    let boxes = harness.ui.boxes.lock().unwrap();
    assert_eq!(boxes.len(), 1);
    assert!(boxes[0].blocking);
    // Bundle is empty, so keys come back verbatim.
    assert_eq!(boxes[0].title, "SessionExpired");
    assert!(!controller.view().initialized);
    assert!(!controller.view().awaiting);
}

#[tokio::test]
async fn failed_reauthentication_falls_back_to_the_dialog() {
    init_logging();
    let transport = Arc::new(ScriptedTransport::new(vec![(
        Duration::ZERO,
        ScriptedTransport::ok(200, LOGIN_PAGE),
    )]));
    let reauth = Arc::new(RecordingReauth {
        fail: true,
        ..RecordingReauth::default()
    });
    let (mut controller, harness) = controller_with(
        Arc::clone(&transport) as Arc<dyn Transport>,
        ControllerConfig::new(report_url()),
        RecordingPanel::default(),
        Some(Arc::clone(&reauth) as Arc<dyn Reauthenticate>),
    );

    create_panel(&mut controller, &harness).await;

    assert_eq!(reauth.calls.load(Ordering::SeqCst), 1);
    let boxes = harness.ui.boxes.lock().unwrap();
    assert_eq!(boxes.len(), 1);
    assert!(boxes[0].blocking);
    assert!(!controller.view().initialized);
}

#[tokio::test]
async fn overlapping_user_edits_only_report_the_last_result() {
    init_logging();
    let transport = Arc::new(ScriptedTransport::new(vec![
        (Duration::ZERO, ScriptedTransport::ok(200, SCHEMA_PLAIN)),
        (Duration::from_millis(150), ScriptedTransport::ok(200, FULL_XML)),
        (Duration::from_millis(80), ScriptedTransport::ok(200, FULL_XML)),
        (Duration::from_millis(10), ScriptedTransport::ok(200, FULL_XML)),
        (Duration::ZERO, ScriptedTransport::ok(200, FULL_XML)),
    ]));
    let (mut controller, harness) = controller_with(
        Arc::clone(&transport) as Arc<dyn Transport>,
        ControllerConfig::new(report_url()),
        RecordingPanel::default(),
        None,
    );
    create_panel(&mut controller, &harness).await;
    assert_eq!(harness.updates.load(Ordering::SeqCst), 0);

    // Three rapid edits without awaiting the results in between.
    controller.notify_parameter_changed();
    controller.notify_parameter_changed();
    controller.notify_parameter_changed();
    controller.run_until_settled().await;

    assert_eq!(harness.updates.load(Ordering::SeqCst), 1);
    assert_eq!(controller.view().fetches_issued, 4);

    // Let every stale response land, then run one more cycle; the stale
    // ones must still never reach the host.
    tokio::time::sleep(Duration::from_millis(200)).await;
    controller.parameter_changed().await;
    assert_eq!(harness.updates.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn malformed_definition_reaches_the_fatal_sink() {
    init_logging();
    let transport = Arc::new(ScriptedTransport::new(vec![(
        Duration::ZERO,
        ScriptedTransport::ok(200, "<html>surprise maintenance page</html>"),
    )]));
    let (mut controller, harness) = controller_with(
        Arc::clone(&transport) as Arc<dyn Transport>,
        ControllerConfig::new(report_url()),
        RecordingPanel::default(),
        None,
    );

    create_panel(&mut controller, &harness).await;

    let boxes = harness.ui.boxes.lock().unwrap();
    assert_eq!(boxes.len(), 1);
    assert!(!boxes[0].blocking);
    assert_eq!(boxes[0].title, "FatalErrorTitle");
    assert!(!controller.view().initialized);
    assert_eq!(harness.panel.init_count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn transport_failure_reaches_the_fatal_sink() {
    init_logging();
    let transport = Arc::new(ScriptedTransport::new(vec![(
        Duration::ZERO,
        Err(TransportError::Network("connection refused".to_string())),
    )]));
    let (mut controller, harness) = controller_with(
        Arc::clone(&transport) as Arc<dyn Transport>,
        ControllerConfig::new(report_url()),
        RecordingPanel::default(),
        None,
    );

    create_panel(&mut controller, &harness).await;

    let boxes = harness.ui.boxes.lock().unwrap();
    assert_eq!(boxes.len(), 1);
    assert_eq!(boxes[0].title, "FatalErrorTitle");
    assert!(!controller.view().awaiting);
}

#[tokio::test]
async fn panel_value_collection_failure_is_swallowed() {
    init_logging();
    let transport = Arc::new(ScriptedTransport::new(vec![(
        Duration::ZERO,
        ScriptedTransport::ok(200, SCHEMA_PLAIN),
    )]));
    let panel = RecordingPanel {
        fail_collection: true,
        ..RecordingPanel::default()
    };
    let (mut controller, harness) = controller_with(
        Arc::clone(&transport) as Arc<dyn Transport>,
        ControllerConfig::new(report_url()),
        panel,
        None,
    );

    create_panel(&mut controller, &harness).await;

    // The fetch still went out and initialization completed.
    assert!(controller.view().initialized);
    assert_eq!(transport.call_count(), 1);
    assert!(harness.ui.boxes.lock().unwrap().is_empty());
}
