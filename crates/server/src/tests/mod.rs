// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode as HttpStatusCode},
};
use legaltrack_api::{MemoryNotifier, Notification};
use legaltrack_domain::Role;
use legaltrack_persistence::{NewStaff, format_timestamp};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Test app state with in-memory persistence and a recording notifier.
fn create_test_app_state() -> (AppState, Arc<MemoryNotifier>) {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    let notifier: Arc<MemoryNotifier> = Arc::new(MemoryNotifier::new());
    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        config: WorkflowConfig::default(),
        notifier: notifier.clone(),
        identity_token: Some(Arc::from(TEST_IDENTITY_TOKEN)),
    };
    (app_state, notifier)
}

const TEST_IDENTITY_TOKEN: &str = "collaborator-secret";

fn login_event(token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/auth/events")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header(actor::IDENTITY_TOKEN_HEADER, token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Inserts an active staff account directly and returns its key.
async fn seed_staff(app_state: &AppState, staff_id: &str, role: Role) -> i64 {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let mut persistence = app_state.persistence.lock().await;
    let staff_pk: i64 = persistence
        .insert_staff(
            staff_id,
            &NewStaff {
                email: format!("{}@example.gov.ph", staff_id.to_lowercase()),
                full_name: format!("Staff {staff_id}"),
                role,
                lgu_municipality: (role == Role::LguAdmin).then(|| String::from("Tagum City")),
                password_hash: String::from("$2b$04$not-a-real-hash"),
                activation_nonce: format!("nonce-{staff_id}"),
                created_at: now,
            },
        )
        .unwrap();
    persistence
        .activate_staff(
            staff_pk,
            "$2b$04$not-a-real-hash",
            &format_timestamp(now).unwrap(),
        )
        .unwrap();
    staff_pk
}

fn request(method: &str, uri: &str, actor: Option<i64>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(staff_pk) = actor {
        builder = builder.header(actor::ACTOR_HEADER, staff_pk.to_string());
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (HttpStatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status: HttpStatusCode = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };
    (status, body)
}

fn parse<T: DeserializeOwned>(body: Value) -> T {
    serde_json::from_value(body).unwrap()
}

fn draft_body() -> Value {
    json!({
        "client": {
            "first_name": "Maria",
            "last_name": "Santos",
            "number": "09171234567"
        },
        "case_type": "land_first_time"
    })
}

/// Creates and finalizes a draft over HTTP, returning the tracking ID.
async fn submit_case(app: &Router, lgu: i64) -> String {
    let (status, body) = send(app, request("POST", "/cases", Some(lgu), Some(&draft_body()))).await;
    assert_eq!(status, HttpStatusCode::OK);
    let draft: TransitionResponse = parse(body);
    let draft_id: String = draft.case.unwrap().draft_id;

    let (status, body) = send(
        app,
        request("POST", &format!("/drafts/{draft_id}/finalize"), Some(lgu), None),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    let finalized: TransitionResponse = parse(body);
    finalized.case.unwrap().tracking_id.unwrap()
}

#[tokio::test]
async fn test_missing_actor_header_is_rejected() {
    let (app_state, _) = create_test_app_state();
    let app: Router = build_router(app_state);

    let (status, body) = send(&app, request("GET", "/cases", None, None)).await;
    let (bad_status, _) = send(
        &app,
        Request::builder()
            .uri("/cases")
            .header(actor::ACTOR_HEADER, "not-a-number")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let (unknown_status, _) = send(&app, request("GET", "/cases", Some(999), None)).await;

    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!(true));
    assert_eq!(bad_status, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, HttpStatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_draft_to_receipt_over_http() {
    let (app_state, notifier) = create_test_app_state();
    let lgu: i64 = seed_staff(&app_state, "LGU-0001", Role::LguAdmin).await;
    let receiving: i64 = seed_staff(&app_state, "REC-0001", Role::CapitolReceiving).await;
    let app: Router = build_router(app_state);

    let tracking_id: String = submit_case(&app, lgu).await;
    assert_eq!(tracking_id.len(), "PAS25010001".len());
    assert!(tracking_id.starts_with("PAS"));

    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/cases/{tracking_id}/actions"),
            Some(receiving),
            Some(&json!({ "action": "receive" })),
        ),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    let received: TransitionResponse = parse(body);
    assert_eq!(received.code, "OK");
    assert_eq!(received.action, "receive");

    let (status, body) = send(&app, request("GET", &format!("/track/{tracking_id}"), None, None))
        .await;
    assert_eq!(status, HttpStatusCode::OK);
    let tracked: TrackingResponse = parse(body);
    assert_eq!(tracked.status_label, "Received");

    let (status, body) = send(
        &app,
        request(
            "GET",
            &format!("/cases/{tracking_id}/history"),
            Some(lgu),
            None,
        ),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    let history: TimelineResponse = parse(body);
    let actions: Vec<&str> = history.entries.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["case_create", "case_update", "case_receipt"]);

    assert!(matches!(
        notifier.delivered().last(),
        Some(Notification::CaseTransitioned { .. })
    ));
}

#[tokio::test]
async fn test_rejected_transitions_map_to_http_status() {
    let (app_state, _) = create_test_app_state();
    let lgu: i64 = seed_staff(&app_state, "LGU-0001", Role::LguAdmin).await;
    let receiving: i64 = seed_staff(&app_state, "REC-0001", Role::CapitolReceiving).await;
    let releaser: i64 = seed_staff(&app_state, "REL-0001", Role::CapitolReleaser).await;
    let app: Router = build_router(app_state);
    let tracking_id: String = submit_case(&app, lgu).await;
    let actions_uri: String = format!("/cases/{tracking_id}/actions");

    let (forbidden, body) = send(
        &app,
        request(
            "POST",
            &actions_uri,
            Some(releaser),
            Some(&json!({ "action": "receive" })),
        ),
    )
    .await;
    let (conflict, _) = send(
        &app,
        request(
            "POST",
            &actions_uri,
            Some(releaser),
            Some(&json!({ "action": "release" })),
        ),
    )
    .await;
    let (unprocessable, precondition) = send(
        &app,
        request(
            "POST",
            &actions_uri,
            Some(receiving),
            Some(&json!({ "action": "return_to_lgu", "reason": "   " })),
        ),
    )
    .await;

    assert_eq!(forbidden, HttpStatusCode::FORBIDDEN);
    let error: ErrorResponse = parse(body);
    assert_eq!(error.code, "UNAUTHORIZED_ROLE");
    assert_eq!(conflict, HttpStatusCode::CONFLICT);
    assert_eq!(unprocessable, HttpStatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(precondition["code"], json!("PRECONDITION_FAILED"));
}

#[tokio::test]
async fn test_other_lgu_cannot_see_case() {
    let (app_state, _) = create_test_app_state();
    let lgu: i64 = seed_staff(&app_state, "LGU-0001", Role::LguAdmin).await;
    let other: i64 = seed_staff(&app_state, "LGU-0002", Role::LguAdmin).await;
    let app: Router = build_router(app_state);
    let tracking_id: String = submit_case(&app, lgu).await;

    let (own, _) = send(
        &app,
        request("GET", &format!("/cases/{tracking_id}"), Some(lgu), None),
    )
    .await;
    let (hidden, body) = send(
        &app,
        request("GET", &format!("/cases/{tracking_id}"), Some(other), None),
    )
    .await;
    let (listed, list_body) = send(&app, request("GET", "/cases", Some(other), None)).await;

    assert_eq!(own, HttpStatusCode::OK);
    assert_eq!(hidden, HttpStatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("NOT_FOUND"));
    assert_eq!(listed, HttpStatusCode::OK);
    let list: ListCasesResponse = parse(list_body);
    assert!(list.cases.is_empty());
}

#[tokio::test]
async fn test_draft_routes_reject_bad_ids_and_unknown_tabs() {
    let (app_state, _) = create_test_app_state();
    let lgu: i64 = seed_staff(&app_state, "LGU-0001", Role::LguAdmin).await;
    let app: Router = build_router(app_state);

    let (bad_draft, _) = send(&app, request("GET", "/drafts/not-a-uuid", Some(lgu), None)).await;
    let (unknown_draft, _) = send(
        &app,
        request(
            "DELETE",
            "/drafts/6f1f3a52-2d5b-4c3e-9d8e-0a1b2c3d4e5f",
            Some(lgu),
            None,
        ),
    )
    .await;
    let (bad_tab, _) = send(&app, request("GET", "/cases?tab=archive", Some(lgu), None)).await;

    assert_eq!(bad_draft, HttpStatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(unknown_draft, HttpStatusCode::NOT_FOUND);
    assert_eq!(bad_tab, HttpStatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_audit_log_is_admin_only() {
    let (app_state, _) = create_test_app_state();
    let admin: i64 = seed_staff(&app_state, "ADM-0001", Role::SuperAdmin).await;
    let lgu: i64 = seed_staff(&app_state, "LGU-0001", Role::LguAdmin).await;
    let app: Router = build_router(app_state);
    submit_case(&app, lgu).await;

    let (denied, _) = send(&app, request("GET", "/audit", Some(lgu), None)).await;
    let (allowed, body) = send(
        &app,
        request("GET", "/audit?action=case_create&limit=5", Some(admin), None),
    )
    .await;

    assert_eq!(denied, HttpStatusCode::FORBIDDEN);
    assert_eq!(allowed, HttpStatusCode::OK);
    let log: AuditLogResponse = parse(body);
    assert_eq!(log.entries.len(), 1);
    assert_eq!(log.entries[0].action, "case_create");
}

#[tokio::test]
async fn test_anonymous_feedback_and_login_events() {
    let (app_state, _) = create_test_app_state();
    let admin: i64 = seed_staff(&app_state, "ADM-0001", Role::SuperAdmin).await;
    let app: Router = build_router(app_state);

    let (feedback, body) = send(
        &app,
        request(
            "POST",
            "/feedback",
            None,
            Some(&json!({ "message": "Tracking works well." })),
        ),
    )
    .await;
    let (login, _) = send(
        &app,
        login_event(
            Some(TEST_IDENTITY_TOKEN),
            &json!({ "email": "adm-0001@example.gov.ph", "outcome": "failure" }),
        ),
    )
    .await;
    let (blank, _) = send(
        &app,
        request("POST", "/feedback", Some(admin), Some(&json!({ "message": "" }))),
    )
    .await;

    assert_eq!(feedback, HttpStatusCode::OK);
    let stored: FeedbackResponse = parse(body);
    assert!(stored.feedback_id > 0);
    assert_eq!(login, HttpStatusCode::OK);
    assert_eq!(blank, HttpStatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&app, request("GET", "/audit", Some(admin), None)).await;
    let log: AuditLogResponse = parse(body);
    let actions: Vec<&str> = log.entries.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["login_failed", "support_feedback"]);
}

#[tokio::test]
async fn test_login_events_require_the_identity_token() {
    let (app_state, _) = create_test_app_state();
    let admin: i64 = seed_staff(&app_state, "ADM-0001", Role::SuperAdmin).await;
    let mut unconfigured: AppState = app_state.clone();
    unconfigured.identity_token = None;
    let app: Router = build_router(app_state);
    let event: Value = json!({ "email": "adm-0001@example.gov.ph", "outcome": "success" });

    let (missing, body) = send(&app, login_event(None, &event)).await;
    let (wrong, _) = send(&app, login_event(Some("guess"), &event)).await;
    let (as_staff, _) = send(
        &app,
        request("POST", "/auth/events", Some(admin), Some(&event)),
    )
    .await;
    let (disabled, _) = send(
        &build_router(unconfigured),
        login_event(Some(TEST_IDENTITY_TOKEN), &event),
    )
    .await;

    assert_eq!(missing, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!(true));
    assert_eq!(wrong, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(as_staff, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(disabled, HttpStatusCode::UNAUTHORIZED);

    let (_, body) = send(&app, request("GET", "/audit?action=login", Some(admin), None)).await;
    let log: AuditLogResponse = parse(body);
    assert!(log.entries.is_empty());
}

#[tokio::test]
async fn test_resend_activation_over_http() {
    let (app_state, notifier) = create_test_app_state();
    let admin: i64 = seed_staff(&app_state, "ADM-0001", Role::SuperAdmin).await;
    let examiner: i64 = seed_staff(&app_state, "EXM-0001", Role::CapitolExaminer).await;
    let app: Router = build_router(app_state);

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/staff",
            Some(admin),
            Some(&json!({
                "email": "ana.cruz@example.gov.ph",
                "full_name": "Ana Cruz",
                "role": "capitol_examiner"
            })),
        ),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    let created: CreateStaffResponse = parse(body);

    let uri: String = format!("/staff/{}/resend-activation", created.staff_pk);
    let (denied, _) = send(&app, request("POST", &uri, Some(examiner), None)).await;
    let (resent, body) = send(&app, request("POST", &uri, Some(admin), None)).await;
    let (active, _) = send(
        &app,
        request(
            "POST",
            &format!("/staff/{examiner}/resend-activation"),
            Some(admin),
            None,
        ),
    )
    .await;

    assert_eq!(denied, HttpStatusCode::FORBIDDEN);
    assert_eq!(resent, HttpStatusCode::OK);
    let response: StaffStatusResponse = parse(body);
    assert_eq!(response.staff.staff_id, created.staff_id);
    assert_eq!(active, HttpStatusCode::CONFLICT);

    let issued: usize = notifier
        .delivered()
        .iter()
        .filter(|n| matches!(n, Notification::ActivationIssued { .. }))
        .count();
    assert_eq!(issued, 2);
}

#[tokio::test]
async fn test_examiner_listing_route() {
    let (app_state, _) = create_test_app_state();
    let receiving: i64 = seed_staff(&app_state, "REC-0001", Role::CapitolReceiving).await;
    let lgu: i64 = seed_staff(&app_state, "LGU-0001", Role::LguAdmin).await;
    seed_staff(&app_state, "EXM-0001", Role::CapitolExaminer).await;
    let app: Router = build_router(app_state);

    let (status, body) = send(
        &app,
        request("GET", "/staff/examiners", Some(receiving), None),
    )
    .await;
    let (denied, _) = send(&app, request("GET", "/staff/examiners", Some(lgu), None)).await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["examiners"][0]["staff"]["staff_id"], json!("EXM-0001"));
    assert_eq!(body["examiners"][0]["in_review"], json!(0));
    assert_eq!(denied, HttpStatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_activation_nonce_is_not_found() {
    let (app_state, _) = create_test_app_state();
    let app: Router = build_router(app_state);

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/activate",
            None,
            Some(&json!({
                "nonce": "deadbeef",
                "new_password": "Harbor-Sunrise-42",
                "confirmation": "Harbor-Sunrise-42"
            })),
        ),
    )
    .await;

    assert_eq!(status, HttpStatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("NOT_FOUND"));
}

#[test]
fn test_error_codes_map_to_http_statuses() {
    let cases: Vec<(ApiError, HttpStatusCode)> = vec![
        (
            ApiError::AuthenticationFailed {
                reason: String::from("unknown"),
            },
            HttpStatusCode::UNAUTHORIZED,
        ),
        (
            ApiError::AllocationExhausted {
                message: String::from("full"),
            },
            HttpStatusCode::SERVICE_UNAVAILABLE,
        ),
        (
            ApiError::Internal {
                message: String::from("disk"),
            },
            HttpStatusCode::INTERNAL_SERVER_ERROR,
        ),
        (
            ApiError::PasswordPolicyViolation {
                message: String::from("short"),
            },
            HttpStatusCode::UNPROCESSABLE_ENTITY,
        ),
    ];

    for (err, expected) in cases {
        assert_eq!(HttpError::from(err).status, expected);
    }
}
