use super::*;
use crate::transliterate::{HttpNameTransliterator, PassthroughTransliterator};
use anyhow::Result;
use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use shared::domain::{CeremonyKey, GuestKind};
use tokio::net::TcpListener;

const TEST_API_KEY: &str = "test-key";

async fn handle_guest(Path(id): Path<String>, headers: HeaderMap) -> impl IntoResponse {
    if headers.get("api_key").and_then(|v| v.to_str().ok()) != Some(TEST_API_KEY) {
        return (StatusCode::UNAUTHORIZED, String::new());
    }
    match id.as_str() {
        "g-family" => (
            StatusCode::OK,
            serde_json::json!({
                "id": "g-family",
                "name": "Arun",
                "type": "family",
                "events": ["shadi", "haldi", "sangeet"],
                "address": "Mau",
                "notes": "",
                "include_address": true
            })
            .to_string(),
        ),
        "g-nameless" => (
            StatusCode::OK,
            serde_json::json!({ "id": "g-nameless", "events": [] }).to_string(),
        ),
        "g-garbled" => (StatusCode::OK, "<html>oops</html>".to_string()),
        "g-broken" => (StatusCode::INTERNAL_SERVER_ERROR, String::new()),
        _ => (StatusCode::NOT_FOUND, String::new()),
    }
}

async fn handle_translate(
    Json(request): Json<shared::protocol::TransliterateRequest>,
) -> impl IntoResponse {
    match request.name.as_str() {
        "Arun" => (
            StatusCode::OK,
            Json(serde_json::json!({ "hindiName": " अरुण " })),
        ),
        _ => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({ "error": "Rate limit exceeded", "hindiName": request.name })),
        ),
    }
}

async fn spawn_records_server() -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/entities/Guest/:id", get(handle_guest))
        .route("/translate-name", post(handle_translate));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn directory(server_url: &str, api_key: &str) -> HttpGuestDirectory {
    HttpGuestDirectory::new(
        &format!("{server_url}/entities/Guest"),
        api_key,
        Duration::from_secs(5),
    )
    .expect("directory")
}

#[tokio::test]
async fn fetches_and_validates_guest_record() {
    let server_url = spawn_records_server().await.expect("spawn server");
    let record = directory(&server_url, TEST_API_KEY)
        .fetch(&GuestId("g-family".into()))
        .await
        .expect("record");

    assert_eq!(record.name, "Arun");
    assert_eq!(record.kind, GuestKind::Family);
    assert_eq!(record.events, vec![CeremonyKey::Shadi, CeremonyKey::Haldi]);
    assert_eq!(record.notes, None);
    assert!(record.include_address);
}

#[tokio::test]
async fn trailing_slash_endpoint_is_accepted() {
    let server_url = spawn_records_server().await.expect("spawn server");
    let directory = HttpGuestDirectory::new(
        &format!("{server_url}/entities/Guest/"),
        TEST_API_KEY,
        Duration::from_secs(5),
    )
    .expect("directory");
    assert!(directory.fetch(&GuestId("g-family".into())).await.is_ok());
}

#[tokio::test]
async fn lookup_failures_are_classified() {
    let server_url = spawn_records_server().await.expect("spawn server");
    let dir = directory(&server_url, TEST_API_KEY);

    let missing = dir.fetch(&GuestId("nobody".into())).await.expect_err("missing");
    assert!(matches!(missing, GuestLookupError::NotFound(_)));
    assert_eq!(missing.code(), FailureCode::NotFound);

    let broken = dir.fetch(&GuestId("g-broken".into())).await.expect_err("broken");
    assert!(matches!(broken, GuestLookupError::Status { status: 500 }));
    assert_eq!(broken.code(), FailureCode::Network);

    let garbled = dir.fetch(&GuestId("g-garbled".into())).await.expect_err("garbled");
    assert!(matches!(garbled, GuestLookupError::Decode(_)));

    let nameless = dir.fetch(&GuestId("g-nameless".into())).await.expect_err("nameless");
    assert!(matches!(nameless, GuestLookupError::Malformed(_)));
    assert_eq!(nameless.code(), FailureCode::Malformed);

    let unauthorized = directory(&server_url, "wrong")
        .fetch(&GuestId("g-family".into()))
        .await
        .expect_err("unauthorized");
    assert_eq!(unauthorized.code(), FailureCode::Unauthorized);
}

#[tokio::test]
async fn unreachable_service_is_a_network_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = directory(&format!("http://{addr}"), TEST_API_KEY)
        .fetch(&GuestId("g-family".into()))
        .await
        .expect_err("unreachable");
    assert!(matches!(err, GuestLookupError::Network(_)));
    assert_eq!(err.failure().code, FailureCode::Network);
}

#[test]
fn rejects_endpoints_that_cannot_carry_a_path() {
    for endpoint in ["not a url", "mailto:guests@example.com"] {
        assert!(matches!(
            HttpGuestDirectory::new(endpoint, TEST_API_KEY, Duration::from_secs(1)),
            Err(GuestLookupError::InvalidEndpoint(_))
        ));
    }
}

#[tokio::test]
async fn resolve_guest_localizes_name() {
    let server_url = spawn_records_server().await.expect("spawn server");
    let outcome = resolve_guest(
        Arc::new(directory(&server_url, TEST_API_KEY)),
        Arc::new(
            HttpNameTransliterator::new(
                format!("{server_url}/translate-name"),
                Duration::from_secs(5),
            )
            .expect("transliterator"),
        ),
        &GuestId("g-family".into()),
    )
    .await;

    match outcome {
        GuestOutcome::Loaded {
            record,
            localized_name,
        } => {
            assert_eq!(record.id, GuestId("g-family".into()));
            assert_eq!(localized_name.as_deref(), Some("अरुण"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn resolve_guest_turns_not_found_into_notice() {
    let server_url = spawn_records_server().await.expect("spawn server");
    let outcome = resolve_guest(
        Arc::new(directory(&server_url, TEST_API_KEY)),
        Arc::new(PassthroughTransliterator),
        &GuestId("nobody".into()),
    )
    .await;

    match outcome {
        GuestOutcome::Failed(failure) => {
            assert_eq!(failure.code, FailureCode::NotFound);
            assert_eq!(failure.notice(), NOT_FOUND_NOTICE);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn transliteration_failure_keeps_original_name() {
    let server_url = spawn_records_server().await.expect("spawn server");
    let transliterator = HttpNameTransliterator::new(
        format!("{server_url}/translate-name"),
        Duration::from_secs(5),
    )
    .expect("transliterator");

    let err = transliterator
        .transliterate("Priya")
        .await
        .expect_err("rate limited");
    assert!(matches!(
        err,
        crate::transliterate::TransliterationError::Rejected { status: 429, .. }
    ));
    assert_eq!(
        crate::transliterate::localized_name(&transliterator, "Priya").await,
        None
    );
    assert_eq!(
        crate::transliterate::localized_name(&PassthroughTransliterator, "Priya").await,
        None
    );
}

#[test]
fn guest_id_comes_from_query_string() {
    assert_eq!(
        guest_id_from_url("https://invite.example/?guest=g-42&lang=hi").expect("url"),
        Some(GuestId("g-42".into()))
    );
    assert_eq!(
        guest_id_from_url("https://invite.example/?id=g-7").expect("url"),
        Some(GuestId("g-7".into()))
    );
    assert_eq!(
        guest_id_from_url("https://invite.example/?guest=&id=g-8").expect("url"),
        Some(GuestId("g-8".into()))
    );
    assert_eq!(guest_id_from_url("https://invite.example/").expect("url"), None);
    assert!(guest_id_from_url("not a url").is_err());
}

#[test]
fn guest_context_tracks_request() {
    assert_eq!(GuestContext::for_request(None), GuestContext::Absent);
    assert_eq!(
        GuestContext::for_request(Some(&GuestId("g".into()))),
        GuestContext::Pending
    );
}
