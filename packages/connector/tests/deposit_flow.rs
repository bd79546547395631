//! Deposit sequences against an in-process mock Fedora repository.

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tokio::net::TcpListener;

use fedora_deposit::types::FileEnvelope;
use fedora_deposit::Plan;
use fedora_deposit_api::PlanDepositModel;
use fedora_deposit_connector::{
    CredentialCache, Credentials, DepositError, FedoraConnector, FedoraSettings, MemoryFileStorage,
};

// ---------------------------------------------------------------------------
// Mock repository
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    content_type: Option<String>,
    authorization: Option<String>,
    body: Vec<u8>,
}

#[derive(Clone, Default)]
struct MockRepository {
    requests: Arc<Mutex<Vec<Recorded>>>,
    reject_create: bool,
    location_header_only: bool,
    /// Body served for GET instead of [`CHILDREN`].
    listing: Option<&'static str>,
}

impl MockRepository {
    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn calls(&self) -> Vec<(Method, String)> {
        self.requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect()
    }
}

const CHILDREN: &str = r#"
@prefix ldp: <http://www.w3.org/ns/ldp#> .
<> ldp:contains <prev-42/old_V1.pdf>, <prev-42/locked> .
"#;

async fn handle(
    State(repo): State<MockRepository>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let path = uri.path().to_string();
    repo.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        content_type: header_str(header::CONTENT_TYPE),
        authorization: header_str(header::AUTHORIZATION),
        body: body.to_vec(),
    });

    match method {
        Method::POST if path == "/rest/plans" => {
            if repo.reject_create {
                return (
                    StatusCode::CONFLICT,
                    r#"{"message":"Resource already exists","status":409}"#,
                )
                    .into_response();
            }
            let location = "http://fedora.example.org/rest/plans/new-id-123";
            if repo.location_header_only {
                (StatusCode::CREATED, [(header::LOCATION, location)], "").into_response()
            } else {
                (StatusCode::CREATED, location).into_response()
            }
        }
        Method::POST => StatusCode::CREATED.into_response(),
        Method::PUT => StatusCode::NO_CONTENT.into_response(),
        Method::GET => (
            [(header::CONTENT_TYPE, "text/turtle")],
            repo.listing.unwrap_or(CHILDREN),
        )
            .into_response(),
        Method::DELETE if path.ends_with("/locked") => {
            (StatusCode::CONFLICT, r#"{"message":"locked"}"#).into_response()
        }
        Method::DELETE => StatusCode::NO_CONTENT.into_response(),
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

/// Spawn the mock on a loopback port and return the repository REST URL.
async fn spawn_mock(repo: MockRepository) -> String {
    let app = Router::new().fallback(handle).with_state(repo);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/rest")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn settings(repository_url: &str) -> FedoraSettings {
    let mut settings = FedoraSettings::new(repository_url);
    if let Some(cfg) = settings.deposit_configuration.as_mut() {
        cfg.collection = Some("plans".into());
    }
    settings.default_credentials = Credentials::new("fedoraAdmin", "secret");
    settings
}

fn connector(settings: FedoraSettings, storage: MemoryFileStorage) -> FedoraConnector {
    FedoraConnector::new(settings, Arc::new(storage)).unwrap()
}

fn inline(name: &str, bytes: &[u8]) -> Option<FileEnvelope> {
    Some(FileEnvelope {
        filename: Some(name.into()),
        file: Some(bytes.to_vec()),
        file_ref: None,
    })
}

fn plan_with_pdf() -> Plan {
    Plan {
        label: "Soil survey".into(),
        version: 3,
        pdf_file: inline("My, File #1.pdf", b"%PDF-1.7"),
        ..Default::default()
    }
}

fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

// ---------------------------------------------------------------------------
// New deposit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_deposit_posts_metadata_then_uploads_pdf() {
    let repo = MockRepository::default();
    let url = spawn_mock(repo.clone()).await;
    let c = connector(settings(&url), MemoryFileStorage::new());

    let id = c.deposit(&PlanDepositModel::new(plan_with_pdf())).await.unwrap();
    assert_eq!(id.as_deref(), Some("new-id-123"));

    let requests = repo.requests();
    assert_eq!(
        repo.calls(),
        vec![
            (Method::POST, "/rest/plans".to_string()),
            (Method::PUT, "/rest/plans/new-id-123/My_File_1_V3.pdf".to_string()),
        ]
    );

    let metadata = String::from_utf8(requests[0].body.clone()).unwrap();
    assert_eq!(requests[0].content_type.as_deref(), Some("text/turtle"));
    assert!(metadata.contains("Soil survey"));

    assert_eq!(requests[1].content_type.as_deref(), Some("application/pdf"));
    assert_eq!(requests[1].body, b"%PDF-1.7");
}

#[tokio::test]
async fn new_deposit_reads_identifier_from_location_header() {
    let repo = MockRepository {
        location_header_only: true,
        ..Default::default()
    };
    let url = spawn_mock(repo.clone()).await;
    let c = connector(settings(&url), MemoryFileStorage::new());

    let id = c.deposit(&PlanDepositModel::new(plan_with_pdf())).await.unwrap();
    assert_eq!(id.as_deref(), Some("new-id-123"));
}

#[tokio::test]
async fn artifacts_upload_in_fixed_order() {
    let repo = MockRepository::default();
    let url = spawn_mock(repo.clone()).await;
    let c = connector(settings(&url), MemoryFileStorage::new());

    let plan = Plan {
        version: 1,
        supporting_files_zip: inline("files.zip", b"PK"),
        rda_json_file: inline("export.json", b"{}"),
        pdf_file: inline("plan.pdf", b"%PDF"),
        ..Default::default()
    };
    c.deposit(&PlanDepositModel::new(plan)).await.unwrap();

    let uploads: Vec<(String, Option<String>)> = repo
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::PUT)
        .map(|r| (r.path, r.content_type))
        .collect();
    let expected: Vec<(String, Option<String>)> = vec![
        ("/rest/plans/new-id-123/plan_V1.pdf".into(), Some("application/pdf".into())),
        ("/rest/plans/new-id-123/export_V1.json".into(), Some("application/json".into())),
        ("/rest/plans/new-id-123/files_V1.zip".into(), Some("application/zip".into())),
    ];
    assert_eq!(uploads, expected);
}

#[tokio::test]
async fn artifacts_without_name_or_content_are_skipped() {
    let repo = MockRepository::default();
    let url = spawn_mock(repo.clone()).await;
    let c = connector(settings(&url), MemoryFileStorage::new());

    let plan = Plan {
        pdf_file: Some(FileEnvelope {
            filename: None,
            file: Some(b"%PDF".to_vec()),
            file_ref: None,
        }),
        rda_json_file: inline("export.json", b""),
        ..Default::default()
    };
    c.deposit(&PlanDepositModel::new(plan)).await.unwrap();

    assert_eq!(repo.calls(), vec![(Method::POST, "/rest/plans".to_string())]);
}

// ---------------------------------------------------------------------------
// New version
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_version_snapshots_replaces_cleans_and_reuploads() {
    let repo = MockRepository::default();
    let url = spawn_mock(repo.clone()).await;
    let c = connector(settings(&url), MemoryFileStorage::new());

    let plan = Plan {
        previous_doi: Some("prev-42".into()),
        ..plan_with_pdf()
    };
    let id = c.deposit(&PlanDepositModel::new(plan)).await.unwrap();
    assert_eq!(id.as_deref(), Some("prev-42"));

    assert_eq!(
        repo.calls(),
        vec![
            (Method::POST, "/rest/plans/prev-42/fcr:versions".to_string()),
            (Method::PUT, "/rest/plans/prev-42".to_string()),
            (Method::GET, "/rest/plans/prev-42".to_string()),
            (Method::DELETE, "/rest/plans/prev-42/old_V1.pdf".to_string()),
            (Method::DELETE, "/rest/plans/prev-42/locked".to_string()),
            (Method::PUT, "/rest/plans/prev-42/My_File_1_V3.pdf".to_string()),
        ]
    );

    let requests = repo.requests();
    assert_eq!(requests[0].content_type.as_deref(), Some("text/turtle"));
    assert_eq!(requests[1].content_type.as_deref(), Some("text/turtle"));
    assert!(String::from_utf8_lossy(&requests[1].body).contains("Soil survey"));
}

async fn version_with_listing(listing: &'static str) -> (Option<String>, Vec<(Method, String)>) {
    let repo = MockRepository {
        listing: Some(listing),
        ..Default::default()
    };
    let url = spawn_mock(repo.clone()).await;
    let c = connector(settings(&url), MemoryFileStorage::new());

    let plan = Plan {
        previous_doi: Some("prev-42".into()),
        version: 1,
        pdf_file: inline("a.pdf", b"%PDF"),
        ..Default::default()
    };
    let id = c.deposit(&PlanDepositModel::new(plan)).await.unwrap();
    (id, repo.calls())
}

fn version_without_deletes() -> Vec<(Method, String)> {
    vec![
        (Method::POST, "/rest/plans/prev-42/fcr:versions".to_string()),
        (Method::PUT, "/rest/plans/prev-42".to_string()),
        (Method::GET, "/rest/plans/prev-42".to_string()),
        (Method::PUT, "/rest/plans/prev-42/a_V1.pdf".to_string()),
    ]
}

#[tokio::test]
async fn unreadable_listing_skips_cleanup_and_still_uploads() {
    let (id, calls) = version_with_listing("not turtle at all <<<").await;
    assert_eq!(id.as_deref(), Some("prev-42"));
    assert_eq!(calls, version_without_deletes());
}

#[tokio::test]
async fn blank_listing_skips_cleanup_and_still_uploads() {
    let (id, calls) = version_with_listing("  \n").await;
    assert_eq!(id.as_deref(), Some("prev-42"));
    assert_eq!(calls, version_without_deletes());
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rejected_create_surfaces_repository_message() {
    let repo = MockRepository {
        reject_create: true,
        ..Default::default()
    };
    let url = spawn_mock(repo.clone()).await;
    let c = connector(settings(&url), MemoryFileStorage::new());

    let err = c
        .deposit(&PlanDepositModel::new(plan_with_pdf()))
        .await
        .unwrap_err();
    match err {
        DepositError::Io(message) => assert_eq!(message, "Resource already exists"),
        other => panic!("expected Io, got {other:?}"),
    }
    assert_eq!(repo.calls().len(), 1, "no uploads after a rejected create");
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let repo = MockRepository::default();
    let url = spawn_mock(repo.clone()).await;
    let mut s = settings(&url);
    s.max_in_memory_bytes = 8;
    let c = connector(s, MemoryFileStorage::new());

    let err = c
        .deposit(&PlanDepositModel::new(plan_with_pdf()))
        .await
        .unwrap_err();
    assert!(matches!(err, DepositError::ResponseTooLarge { limit: 8 }));
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

#[tokio::test]
async fn every_request_uses_resolved_basic_auth() {
    let repo = MockRepository::default();
    let url = spawn_mock(repo.clone()).await;
    let c = connector(settings(&url), MemoryFileStorage::new());

    c.deposit(&PlanDepositModel::new(plan_with_pdf()))
        .await
        .unwrap();
    c.deposit(&PlanDepositModel::new(plan_with_pdf()).with_credentials("alice", "pw"))
        .await
        .unwrap();

    let auth: Vec<Option<String>> = repo.requests().into_iter().map(|r| r.authorization).collect();
    let default_auth = Some(basic("fedoraAdmin", "secret"));
    let alice_auth = Some(basic("alice", "pw"));
    assert_eq!(auth, vec![default_auth.clone(), default_auth, alice_auth.clone(), alice_auth]);
}

#[tokio::test]
async fn session_cache_carries_explicit_credentials_forward() {
    let repo = MockRepository::default();
    let url = spawn_mock(repo.clone()).await;
    let c = connector(settings(&url), MemoryFileStorage::new());
    let mut session = CredentialCache::new();

    c.deposit_in_session(
        &PlanDepositModel::new(Plan::default()).with_credentials("alice", "pw"),
        &mut session,
    )
    .await
    .unwrap();
    c.deposit_in_session(&PlanDepositModel::new(Plan::default()), &mut session)
        .await
        .unwrap();
    // Without the session the defaults apply again.
    c.deposit(&PlanDepositModel::new(Plan::default())).await.unwrap();

    let auth: Vec<Option<String>> = repo.requests().into_iter().map(|r| r.authorization).collect();
    assert_eq!(
        auth,
        vec![
            Some(basic("alice", "pw")),
            Some(basic("alice", "pw")),
            Some(basic("fedoraAdmin", "secret")),
        ]
    );
}

// ---------------------------------------------------------------------------
// Shared storage
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shared_storage_takes_precedence_over_inline_bytes() {
    let repo = MockRepository::default();
    let url = spawn_mock(repo.clone()).await;
    let mut s = settings(&url);
    if let Some(cfg) = s.deposit_configuration.as_mut() {
        cfg.use_shared_storage = true;
    }
    let storage = MemoryFileStorage::new();
    storage.insert("exports/plan.pdf", b"from storage".to_vec());
    let c = connector(s, storage);

    let plan = Plan {
        version: 2,
        pdf_file: Some(FileEnvelope {
            filename: Some("plan.pdf".into()),
            file: Some(b"inline".to_vec()),
            file_ref: Some("exports/plan.pdf".into()),
        }),
        rda_json_file: Some(FileEnvelope {
            filename: Some("plan.json".into()),
            file: Some(b"{\"inline\":true}".to_vec()),
            file_ref: Some("exports/missing.json".into()),
        }),
        ..Default::default()
    };
    c.deposit(&PlanDepositModel::new(plan)).await.unwrap();

    let uploads: Vec<Vec<u8>> = repo
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::PUT)
        .map(|r| r.body)
        .collect();
    assert_eq!(uploads, vec![b"from storage".to_vec(), b"{\"inline\":true}".to_vec()]);
}

#[tokio::test]
async fn storage_is_ignored_when_not_configured() {
    let repo = MockRepository::default();
    let url = spawn_mock(repo.clone()).await;
    let storage = MemoryFileStorage::new();
    storage.insert("exports/plan.pdf", b"from storage".to_vec());
    let c = connector(settings(&url), storage);

    let plan = Plan {
        pdf_file: Some(FileEnvelope {
            filename: Some("plan.pdf".into()),
            file: Some(b"inline".to_vec()),
            file_ref: Some("exports/plan.pdf".into()),
        }),
        ..Default::default()
    };
    c.deposit(&PlanDepositModel::new(plan)).await.unwrap();

    let last = repo.requests().pop().unwrap();
    assert_eq!(last.body, b"inline");
}
