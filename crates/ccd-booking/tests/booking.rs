//! Integration tests for the collaborators of an authenticated session.

mod common;

use ccd_booking::prelude::*;
use ccd_protocol::endpoints;
use ccd_transport::Method;
use common::{ScriptedTransport, api, restored_store};

const MENU: &str = r#"[
    {"key": "home", "title": "Home", "uri": "internal:/", "weight": "0", "enabled": true},
    {"key": "dances", "title": "Dances", "weight": "1", "enabled": true, "expanded": true,
     "below": [{"key": "friday", "title": "Friday", "weight": "0", "enabled": true}]}
]"#;

const FORM_DATA: &str = r#"{
    "bandOptions": {"1": {"nid": 1, "name": "Contraforce"}},
    "callerOptions": {"12": {"nid": "12", "name": "Pat Caller"}},
    "soundTechOptions": {},
    "hostOptions": {}
}"#;

async fn authenticated(
    transport: &ScriptedTransport,
) -> Bootstrapper<ScriptedTransport, MemoryCookieStore> {
    transport.respond(200, "1");
    let mut boot = Bootstrapper::new(api(transport), restored_store());
    assert_eq!(boot.mount().await, BootstrapState::Authenticated);
    boot
}

#[tokio::test]
async fn test_main_menu_is_fetched_without_token() {
    let transport = ScriptedTransport::new();
    let boot = authenticated(&transport).await;
    transport.respond(200, MENU);

    let outcome = boot.booking().unwrap().main_menu().await;

    let menu = outcome.data.unwrap();
    assert_eq!(menu.len(), 2);
    assert_eq!(menu[1].children()[0].title, "Friday");
    let request = &transport.requests()[1];
    assert!(request.url.ends_with(endpoints::MAIN_MENU));
    assert_eq!(request.header_value("X-CSRF-Token"), None);
}

#[tokio::test]
async fn test_menu_failure_reports_code() {
    let transport = ScriptedTransport::new();
    let boot = authenticated(&transport).await;
    transport.respond(404, "");

    let outcome = boot.booking().unwrap().main_menu().await;

    assert!(outcome.error_status);
    assert_eq!(outcome.response_code, 404);
    assert!(outcome.data.is_none());
}

#[tokio::test]
async fn test_form_data_sends_session_token() {
    let transport = ScriptedTransport::new();
    let boot = authenticated(&transport).await;
    transport.respond(200, FORM_DATA);

    let outcome = boot.booking().unwrap().form_data().await;

    let data = outcome.data.unwrap();
    assert_eq!(
        data.find_by_name(TalentKind::Caller, "Pat Caller").map(|o| o.name.as_str()),
        Some("Pat Caller")
    );
    assert!(data.options(TalentKind::SoundTech).is_empty());
    assert_eq!(
        transport.requests()[1].header_value("X-CSRF-Token"),
        Some("csrf-7")
    );
}

#[tokio::test]
async fn test_form_data_no_content() {
    let transport = ScriptedTransport::new();
    let boot = authenticated(&transport).await;
    transport.respond(204, "");

    let outcome = boot.booking().unwrap().form_data().await;

    assert!(outcome.no_content);
    assert!(!outcome.error_status);
}

#[tokio::test]
async fn test_create_event_success() {
    let transport = ScriptedTransport::new();
    let boot = authenticated(&transport).await;
    transport.respond(200, "");

    let mut event = EventSubmission::new("Friday Dance");
    event.caller = Talent::Named("Pat Caller".into());
    let outcome = boot.booking().unwrap().create_event(&event).await;

    assert_eq!(outcome.message(), "Friday Dance created!");
    let request = &transport.requests()[1];
    assert_eq!(request.method, Method::Post);
    assert!(request.url.ends_with(endpoints::CREATE_EVENT));
    assert_eq!(request.header_value("X-CSRF-Token"), Some("csrf-7"));
    let body: serde_json::Value =
        serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["eventTitle"], "Friday Dance");
    assert_eq!(body["caller"], "Pat Caller");
    assert_eq!(body["eventLocationURL"], "https://www.contradance.org/locations");
}

#[tokio::test]
async fn test_create_event_rejected() {
    let transport = ScriptedTransport::new();
    let boot = authenticated(&transport).await;
    transport.respond(403, "");

    let outcome = boot
        .booking()
        .unwrap()
        .create_event(&EventSubmission::new("Friday Dance"))
        .await;

    assert_eq!(outcome, SubmissionOutcome::Rejected { status: 403 });
    assert_eq!(
        outcome.message(),
        "There was an error communicating with the server: Error code: 403"
    );
}

#[tokio::test(start_paused = true)]
async fn test_create_event_timeout() {
    let transport = ScriptedTransport::new();
    let boot = authenticated(&transport).await;
    transport.hang();

    let outcome = boot
        .booking()
        .unwrap()
        .create_event(&EventSubmission::new("Friday Dance"))
        .await;

    assert!(matches!(outcome, SubmissionOutcome::Failed { .. }));
    assert!(outcome.message().contains("Error message: request timed out"));
}

#[tokio::test]
async fn test_session_token_is_trimmed_text() {
    let transport = ScriptedTransport::new();
    let boot = authenticated(&transport).await;
    transport.respond(200, "fresh-token\n");

    let token = boot.booking().unwrap().session_token().await.unwrap();

    assert_eq!(token, "fresh-token");
    assert_eq!(boot.reader().csrf_token().as_deref(), Some("csrf-7"));
}

#[tokio::test]
async fn test_session_token_error_status() {
    let transport = ScriptedTransport::new();
    let boot = authenticated(&transport).await;
    transport.respond(403, "");

    let err = boot.booking().unwrap().session_token().await.unwrap_err();
    assert!(matches!(err, BookingError::Status(403)));
}
