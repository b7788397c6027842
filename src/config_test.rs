use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_defaults() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.api_endpoint, "/api");
    assert_eq!(cfg.storage, StorageBackend::Cookie);
    assert_eq!(cfg.routes.login, "/login");
    assert_eq!(cfg.routes.home, "/");
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("FOLKERS_API_ENDPOINT", "http://localhost:3000/"),
        ("FOLKERS_TOKEN_STORAGE", "local_storage"),
        ("FOLKERS_LOGIN_PATH", "/auth/login/"),
        ("FOLKERS_HOME_PATH", "/records"),
    ]))
    .unwrap();
    assert_eq!(cfg.api_endpoint, "http://localhost:3000");
    assert_eq!(cfg.storage, StorageBackend::LocalStorage);
    assert_eq!(cfg.routes.login, "/auth/login");
    assert_eq!(cfg.routes.home, "/records");
}

#[test]
fn from_lookup_rejects_unknown_storage() {
    let err = ClientConfig::from_lookup(lookup_from(&[("FOLKERS_TOKEN_STORAGE", "session")])).unwrap_err();
    assert_eq!(err, ConfigError::UnknownStorage("session".to_owned()));
}

#[test]
fn from_lookup_rejects_relative_paths() {
    let err = ClientConfig::from_lookup(lookup_from(&[("FOLKERS_LOGIN_PATH", "login")])).unwrap_err();
    assert!(matches!(err, ConfigError::RelativePath { var: "FOLKERS_LOGIN_PATH", .. }));
}

#[test]
fn root_home_path_is_kept() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("FOLKERS_HOME_PATH", "/")])).unwrap();
    assert_eq!(cfg.routes.home, "/");
}
