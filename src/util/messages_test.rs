use super::*;

#[test]
fn known_statuses_have_fixed_text() {
    assert_eq!(describe(Some(401)), "Authorization error");
    assert!(describe(Some(403)).starts_with("Access denied."));
    assert_eq!(describe(Some(404)), "Nothing found");
    assert!(describe(Some(409)).contains("conflict"));
    assert_eq!(describe(Some(500)), "Unknown server-side error");
}

#[test]
fn other_statuses_fall_back_to_code() {
    assert_eq!(describe(Some(418)), "Unknown error with code 418");
    assert_eq!(describe(Some(502)), "Unknown error with code 502");
}

#[test]
fn missing_status_reports_minus_one() {
    assert_eq!(describe(None), "Unknown error with code -1");
}

#[test]
fn network_errors_describe_without_status() {
    assert_eq!(describe_error(&ApiError::network("offline")), "Unknown error with code -1");
    assert_eq!(describe_error(&ApiError::auth_required()), "Authorization error");
}
