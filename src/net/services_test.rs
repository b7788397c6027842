use super::*;
use crate::net::error::ApiErrorKind;
use crate::net::transport::RawResponse;
use crate::net::types::Role;
use crate::state::session::SessionState;
use crate::test_support::{FAR_FUTURE, gateway, respond, token, user_json};
use crate::util::token_store::{MemoryStore, TokenStore};
use futures::executor::block_on;
use std::sync::{Arc, Mutex};

const NOW: u64 = 1_700_000_000;

fn auth_session(store: &Arc<MemoryStore>) -> AuthSession {
    let tokens: Arc<dyn TokenStore> = store.clone();
    AuthSession::new(tokens, Arc::new(Mutex::new(SessionState::default())))
}

fn credentials() -> LoginRequest {
    LoginRequest { username: "anna".to_owned(), password: "hunter2".to_owned() }
}

// =============================================================
// AuthService
// =============================================================

#[test]
fn login_stores_token_and_confirms_identity() {
    let store = Arc::new(MemoryStore::default());
    let session = auth_session(&store);
    let tok = token("editor", FAR_FUTURE);
    let body = serde_json::json!({ "token": tok, "token_type": "Bearer" }).to_string();
    let (api, transport) = gateway(&store, vec![respond(200, &body), respond(200, &user_json("editor"))]);

    let user = block_on(AuthService::new(&api).login(&session, &credentials(), NOW)).unwrap();
    assert_eq!(user.role, Role::Editor);
    assert_eq!(store.get().as_deref(), Some(tok.as_str()));
    assert!(session.snapshot().is_authenticated());

    let sent = transport.requests();
    assert_eq!(sent[0].url, "http://api.test/login");
    assert_eq!(sent[0].body, RequestBody::Json(r#"{"username":"anna","password":"hunter2"}"#.to_owned()));
    assert_eq!(sent[1].url, "http://api.test/me");
}

#[test]
fn login_with_wrong_credentials_passes_error_through() {
    let store = Arc::new(MemoryStore::default());
    let session = auth_session(&store);
    let (api, _) = gateway(&store, vec![respond(401, "")]);

    let err = block_on(AuthService::new(&api).login(&session, &credentials(), NOW)).unwrap_err();
    assert!(err.is_auth_required());
    assert!(store.get().is_none());
}

#[test]
fn login_with_failed_identity_check_reports_user_data_error() {
    let store = Arc::new(MemoryStore::default());
    let session = auth_session(&store);
    let body = serde_json::json!({ "token": token("admin", FAR_FUTURE), "token_type": "Bearer" }).to_string();
    let (api, _) = gateway(&store, vec![respond(200, &body), respond(500, "")]);

    let err = block_on(AuthService::new(&api).login(&session, &credentials(), NOW)).unwrap_err();
    assert_eq!(err.message, "Error loading logged user data");
    assert_eq!(err.kind, ApiErrorKind::ServerFault);
    assert!(store.get().is_none());
}

#[test]
fn login_with_malformed_token_is_decode_error() {
    let store = Arc::new(MemoryStore::default());
    let session = auth_session(&store);
    let (api, _) = gateway(&store, vec![respond(200, r#"{"token":"nope"}"#)]);

    let err = block_on(AuthService::new(&api).login(&session, &credentials(), NOW)).unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Decode);
    assert!(store.get().is_none());
}

#[test]
fn signature_endpoints_use_expected_methods() {
    let store = Arc::new(MemoryStore::with_token(&token("admin", FAR_FUTURE)));
    let (api, transport) = gateway(&store, vec![respond(200, "\"PRIVATE-KEY\""), respond(204, "")]);
    let auth = AuthService::new(&api);

    assert_eq!(block_on(auth.signature_keygen()).unwrap(), "PRIVATE-KEY");
    block_on(auth.signature_reset()).unwrap();

    let sent = transport.requests();
    assert_eq!((sent[0].method, sent[0].url.as_str()), (Method::Post, "http://api.test/signature-keygen"));
    assert_eq!((sent[1].method, sent[1].url.as_str()), (Method::Delete, "http://api.test/signature-reset"));
}

// =============================================================
// Record services
// =============================================================

#[test]
fn person_service_routes() {
    let store = Arc::new(MemoryStore::default());
    let person = serde_json::json!({
        "id": "p1", "name": "Ivan", "surname": "Petrov", "patronymic": "", "birthday": "1990-01-01",
        "city": "Omsk", "intented_address": "", "summary": "", "past": "", "traits_good": "", "traits_bad": ""
    })
    .to_string();
    let list = format!("[{person}]");
    let (api, transport) = gateway(
        &store,
        vec![respond(200, &list), respond(200, &person), respond(200, &person), respond(200, &person), respond(200, &person)],
    );
    let persons = PersonService::new(&api);
    let draft = CreatePersonRecord::default();

    assert_eq!(block_on(persons.list()).unwrap().len(), 1);
    assert_eq!(block_on(persons.get("p1")).unwrap().name, "Ivan");
    block_on(persons.create(&draft)).unwrap();
    block_on(persons.update("p1", &draft)).unwrap();
    block_on(persons.delete("p1")).unwrap();

    let routes: Vec<_> = transport.requests().into_iter().map(|r| (r.method, r.url)).collect();
    assert_eq!(
        routes,
        vec![
            (Method::Get, "http://api.test/persons".to_owned()),
            (Method::Get, "http://api.test/persons/p1".to_owned()),
            (Method::Post, "http://api.test/persons/create".to_owned()),
            (Method::Patch, "http://api.test/persons/p1".to_owned()),
            (Method::Delete, "http://api.test/persons/p1".to_owned()),
        ]
    );
}

#[test]
fn user_service_routes() {
    let store = Arc::new(MemoryStore::default());
    let (api, transport) = gateway(
        &store,
        vec![respond(200, &format!("[{}]", user_json("admin"))), respond(200, &user_json("watcher")), respond(200, &user_json("watcher"))],
    );
    let users = UserService::new(&api);
    let new_user = CreateUser { username: "bob".to_owned(), password: "pw".to_owned(), role: Role::Watcher };

    assert_eq!(block_on(users.list()).unwrap()[0].role, Role::Admin);
    assert_eq!(block_on(users.create(&new_user)).unwrap().role, Role::Watcher);
    block_on(users.delete("bob")).unwrap();

    let sent = transport.requests();
    assert_eq!(sent[1].url, "http://api.test/users/create");
    assert_eq!((sent[2].method, sent[2].url.as_str()), (Method::Delete, "http://api.test/users/bob"));
}

// =============================================================
// MediaService
// =============================================================

#[test]
fn media_upload_prefixes_trimmed_hash() {
    let store = Arc::new(MemoryStore::default());
    let (api, _) = gateway(&store, vec![respond(200, "\" abc123\\n\"")]);

    let reference = block_on(MediaService::new(&api).upload("a.jpg", Some("image/jpeg"), vec![0xff])).unwrap();
    assert_eq!(reference, "@/abc123");
}

#[test]
fn media_upload_empty_hash_is_error() {
    let store = Arc::new(MemoryStore::default());
    let (api, _) = gateway(&store, vec![respond(200, "\"\"")]);

    let err = block_on(MediaService::new(&api).upload("a.jpg", None, vec![])).unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Decode);
}

#[test]
fn media_upload_refuses_unsupported_type_without_request() {
    let store = Arc::new(MemoryStore::default());
    let (api, transport) = gateway(&store, vec![]);

    let err = block_on(MediaService::new(&api).upload("notes.pdf", Some("application/pdf"), vec![1])).unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Rejected);
    assert!(transport.requests().is_empty());
}

#[test]
fn media_get_fetches_server_reference_with_bearer() {
    let tok = token("watcher", FAR_FUTURE);
    let store = Arc::new(MemoryStore::with_token(&tok));
    let (api, transport) = gateway(&store, vec![Ok(RawResponse { status: 200, body: vec![1, 2, 3] })]);

    let url = block_on(MediaService::new(&api).get("@/abc123")).unwrap();
    assert_eq!(url, "data:application/octet-stream;base64,AQID");
    let sent = &transport.requests()[0];
    assert_eq!(sent.method, Method::Get);
    assert_eq!(sent.url, "http://api.test/media/abc123");
    assert_eq!(sent.header("Authorization"), Some(format!("Bearer {tok}").as_str()));
}

#[test]
fn media_get_passes_foreign_references_through() {
    let store = Arc::new(MemoryStore::with_token(&token("watcher", FAR_FUTURE)));
    let (api, transport) = gateway(&store, vec![]);

    let url = block_on(MediaService::new(&api).get("https://cdn.example/x.png")).unwrap();
    assert_eq!(url, "https://cdn.example/x.png");
    assert!(transport.requests().is_empty());
}

#[test]
fn media_get_missing_file_is_not_found() {
    let store = Arc::new(MemoryStore::with_token(&token("watcher", FAR_FUTURE)));
    let (api, _) = gateway(&store, vec![respond(404, "")]);

    let err = block_on(MediaService::new(&api).get("@/gone")).unwrap_err();
    assert_eq!(err.status, Some(404));
}
