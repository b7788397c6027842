use super::*;
use crate::net::error::ApiError;
use crate::net::transport::RawResponse;
use crate::test_support::{FAR_FUTURE, MockTransport, gateway, respond, token, user_json};
use crate::util::token_store::{MemoryStore, TokenStore};
use futures::executor::block_on;
use futures::future::join;

fn guard(store: &Arc<MemoryStore>, responses: Vec<Result<RawResponse, ApiError>>) -> AccessGuard {
    let (api, _) = gateway(store, responses);
    AccessGuard::new(api, "/login")
}

// =============================================================
// Decisions
// =============================================================

#[test]
fn login_page_is_always_allowed() {
    let store = Arc::new(MemoryStore::default());
    assert_eq!(block_on(guard(&store, vec![]).check("/login")), AccessDecision::Allow);
}

#[test]
fn missing_token_denies_without_request() {
    let store = Arc::new(MemoryStore::default());
    let (api, transport) = gateway(&store, vec![]);
    let guard = AccessGuard::new(api, "/login");

    assert_eq!(block_on(guard.check("/")), AccessDecision::Deny);
    assert!(transport.requests().is_empty());
}

#[test]
fn confirmed_identity_allows() {
    let store = Arc::new(MemoryStore::with_token(&token("watcher", FAR_FUTURE)));
    let guard = guard(&store, vec![respond(200, &user_json("watcher"))]);
    assert_eq!(block_on(guard.check("/persons")), AccessDecision::Allow);
}

#[test]
fn rejected_identity_denies() {
    let store = Arc::new(MemoryStore::with_token(&token("watcher", FAR_FUTURE)));
    let guard = guard(&store, vec![respond(401, "")]);
    assert_eq!(block_on(guard.check("/persons")), AccessDecision::Deny);
}

#[test]
fn network_failure_denies_and_redirects_to_login() {
    let store = Arc::new(MemoryStore::with_token(&token("admin", FAR_FUTURE)));
    let guard = guard(&store, vec![Err(ApiError::network("offline"))]);

    let decision = block_on(guard.check("/"));
    assert_eq!(decision, AccessDecision::Deny);
    assert_eq!(decision.to_route(guard.login_path()), RouteDecision::Redirect("/login".to_owned()));
    // Only a 401 clears the token.
    assert!(store.get().is_some());
}

// =============================================================
// Staleness
// =============================================================

#[test]
fn older_check_is_superseded_by_newer_navigation() {
    let store = Arc::new(MemoryStore::with_token(&token("admin", FAR_FUTURE)));
    let tokens: Arc<dyn TokenStore> = store.clone();
    let transport = MockTransport::yielding(vec![respond(200, &user_json("admin")), respond(200, &user_json("admin"))]);
    let guard = AccessGuard::new(ApiGateway::new("http://api.test", transport, tokens), "/login");

    let (first, second) = block_on(join(guard.check("/persons"), guard.check("/users")));
    assert_eq!(first, AccessDecision::Superseded);
    assert_eq!(second, AccessDecision::Allow);
}

#[test]
fn superseded_never_navigates() {
    assert_eq!(AccessDecision::Superseded.to_route("/login"), RouteDecision::Allow);
    assert_eq!(AccessDecision::Allow.to_route("/login"), RouteDecision::Allow);
}

#[test]
fn stale_401_after_relogin_keeps_fresh_token() {
    let store = Arc::new(MemoryStore::with_token(&token("watcher", FAR_FUTURE)));
    let tokens: Arc<dyn TokenStore> = store.clone();
    let cleared = store.clone();
    let api = ApiGateway::new("http://api.test", MockTransport::yielding(vec![respond(401, "")]), tokens)
        .with_auth_required_hook(move || cleared.clear());
    let guard = AccessGuard::new(api, "/login");
    let fresh = token("admin", FAR_FUTURE);

    let (first, ()) = block_on(join(guard.check("/persons"), async {
        assert_eq!(guard.check("/login").await, AccessDecision::Allow);
        store.set(&fresh, FAR_FUTURE);
    }));
    assert_eq!(first, AccessDecision::Superseded);
    assert_eq!(store.get().as_deref(), Some(fresh.as_str()));
}
