use std::time::Duration;

use prompt_core::{RenderMode, RequestOptions};
use prompt_engine::{ReqwestTransport, Transport, TransportError, TransportSettings};
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport_for(server: &MockServer) -> ReqwestTransport {
    let base = Url::parse(&format!("{}/", server.uri())).unwrap();
    ReqwestTransport::new(base, TransportSettings::default()).expect("client")
}

#[tokio::test]
async fn post_form_sends_options_and_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/parameter"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("renderMode=PARAMETER"))
        .and(body_string_contains("REGION=EU"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<parameters autoSubmit=\"true\"/>", "text/xml"),
        )
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let mut options = RequestOptions::new();
    options.set("REGION", "EU");
    options.set_render_mode(RenderMode::Parameter);

    let payload = transport.post_form("parameter", &options).await.expect("post ok");
    assert_eq!(payload.status, 200);
    assert_eq!(payload.body, "<parameters autoSubmit=\"true\"/>");
}

#[tokio::test]
async fn login_page_status_passes_through_as_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/parameter"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string("<html>j_spring_security_check</html>"),
        )
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let payload = transport
        .post_form("parameter", &RequestOptions::new())
        .await
        .expect("status passes through");

    assert_eq!(payload.status, 401);
    assert!(payload.body.contains("j_spring_security_check"));
}

#[tokio::test]
async fn slow_response_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/parameter"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let base = Url::parse(&format!("{}/", server.uri())).unwrap();
    let settings = TransportSettings {
        request_timeout: Duration::from_millis(50),
        ..TransportSettings::default()
    };
    let transport = ReqwestTransport::new(base, settings).expect("client");

    let err = transport
        .post_form("parameter", &RequestOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Timeout(_)));
}

#[tokio::test]
async fn get_text_resolves_against_the_base_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/i18n"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"OK\":\"OK\"}"))
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let payload = transport
        .get_text("i18n?plugin=reporting&name=messages")
        .await
        .expect("get ok");

    assert_eq!(payload.status, 200);
    assert_eq!(payload.body, "{\"OK\":\"OK\"}");
}
