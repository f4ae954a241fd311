//! Integration tests for the bulk-action flow: open a dialog over the
//! selection, confirm, and observe exactly one mutation request.

use chrono::NaiveDate;
use crate::common::{
    FakeRosterApi, fake_ctx, http_ctx, init_logging, load_rows, select_all, selected, student,
};
use roster_business::bulk::{BatchRegistration, DialogStatus};
use roster_business::{
    ApiError, BulkActionKind, BulkActionRequest, BulkDialogRouter, MutationPayload, StudentTable,
    ValidationError, confirm_bulk_action,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn open_bulk(ctx: &mut roster_states::StateCtx, kind: BulkActionKind) {
    let rows = selected(ctx);
    ctx.update::<BulkDialogRouter, _>(|router| router.open(BulkActionRequest::bulk(kind, rows)));
}

// ===========================================
// Against a mock HTTP server
// ===========================================

#[tokio::test]
async fn test_bulk_terminate_sends_one_request_with_three_students() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/learners/terminate"))
        .and(body_json(json!({
            "students": [
                { "userId": "u1", "currentPackageSessionId": "ps1" },
                { "userId": "u2", "currentPackageSessionId": "ps1" },
                { "userId": "u3", "currentPackageSessionId": "ps2" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut ctx = http_ctx(server.uri());
    load_rows(
        &mut ctx,
        vec![student("u1", "ps1"), student("u2", "ps1"), student("u3", "ps2")],
    );
    select_all(&mut ctx);
    open_bulk(&mut ctx, BulkActionKind::Terminate);

    confirm_bulk_action(&mut ctx).unwrap();
    ctx.settle().await;

    assert_eq!(ctx.state::<BulkDialogRouter>().open_kind(), None);
    assert!(ctx.state::<StudentTable>().table.selection.is_empty());
}

#[tokio::test]
async fn test_server_error_keeps_dialog_open_with_message() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/learners/delete"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut ctx = http_ctx(server.uri());
    load_rows(&mut ctx, vec![student("u1", "ps1"), student("u2", "ps1")]);
    select_all(&mut ctx);
    open_bulk(&mut ctx, BulkActionKind::Delete);

    confirm_bulk_action(&mut ctx).unwrap();
    ctx.settle().await;

    let router = ctx.state::<BulkDialogRouter>();
    assert!(router.is_open(BulkActionKind::Delete));
    assert_eq!(
        router.status(),
        Some(&DialogStatus::Failed("API returned status: 500".to_string()))
    );
    assert_eq!(ctx.state::<StudentTable>().table.selection.count(), 2);
}

#[tokio::test]
async fn test_extend_session_posts_formatted_date() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/learners/extend-session"))
        .and(body_json(json!({
            "students": [{ "userId": "u1", "currentPackageSessionId": "ps1" }],
            "newExpiryDate": "31-12-2026"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut ctx = http_ctx(server.uri());
    let rows = load_rows(&mut ctx, vec![student("u1", "ps1")]);
    ctx.update::<BulkDialogRouter, _>(|router| {
        router.open(BulkActionRequest::single(
            BulkActionKind::ExtendSession,
            rows[0].clone(),
        ));
        router.inputs_mut().unwrap().expiry_date = NaiveDate::from_ymd_opt(2026, 12, 31);
    });

    confirm_bulk_action(&mut ctx).unwrap();
    ctx.settle().await;
    assert_eq!(ctx.state::<BulkDialogRouter>().open_kind(), None);
}

#[tokio::test]
async fn test_no_eligible_students_makes_no_request() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut ctx = http_ctx(server.uri());
    load_rows(&mut ctx, vec![student("", "ps1"), student("u2", "")]);
    select_all(&mut ctx);
    open_bulk(&mut ctx, BulkActionKind::Terminate);

    assert_eq!(
        confirm_bulk_action(&mut ctx),
        Err(ValidationError::NoEligibleStudents)
    );
    ctx.settle().await;
    assert!(ctx.state::<BulkDialogRouter>().is_open(BulkActionKind::Terminate));
}

// ===========================================
// Against the in-memory fake
// ===========================================

#[tokio::test]
async fn test_rows_missing_ids_are_excluded_from_the_call() {
    init_logging();
    let fake = FakeRosterApi::new();
    let mut ctx = fake_ctx(&fake);
    load_rows(
        &mut ctx,
        vec![student("u1", "ps1"), student("", "ps1"), student("u3", "ps1")],
    );
    select_all(&mut ctx);
    open_bulk(&mut ctx, BulkActionKind::ChangeBatch);
    ctx.update::<BulkDialogRouter, _>(|router| {
        router.inputs_mut().unwrap().target_batch = Some("ps9".to_string());
    });

    confirm_bulk_action(&mut ctx).unwrap();
    ctx.settle().await;

    let calls = fake.calls();
    assert_eq!(calls.len(), 1);
    let MutationPayload::ChangeBatch(body) = &calls[0] else {
        panic!("expected a change batch call, got {:?}", calls[0]);
    };
    let ids: Vec<&str> = body.students.iter().map(|s| s.user_id.as_str()).collect();
    assert_eq!(ids, vec!["u1", "u3"]);
    assert_eq!(body.new_package_session_id, "ps9");
}

#[tokio::test]
async fn test_re_register_uses_configured_institute() {
    init_logging();
    let fake = FakeRosterApi::new();
    let mut ctx = fake_ctx(&fake);
    load_rows(&mut ctx, vec![student("u1", "ps1"), student("u2", "ps1")]);
    select_all(&mut ctx);
    open_bulk(&mut ctx, BulkActionKind::ReRegister);
    ctx.update::<BulkDialogRouter, _>(|router| {
        router.inputs_mut().unwrap().registrations = vec![BatchRegistration {
            package_session_id: "ps2".to_string(),
            access_days: 365,
        }];
    });

    confirm_bulk_action(&mut ctx).unwrap();
    ctx.settle().await;

    let calls = fake.calls();
    let [MutationPayload::ReRegister(body)] = calls.as_slice() else {
        panic!("expected exactly one re-register call, got {calls:?}");
    };
    assert_eq!(body.institute_id, "inst-1");
    assert_eq!(body.user_ids, vec!["u1".to_string(), "u2".to_string()]);
    assert_eq!(body.access_days, 365);
}

#[tokio::test]
async fn test_failure_is_not_retried() {
    init_logging();
    let fake = FakeRosterApi::new();
    fake.fail_with(ApiError::Status(503));
    let mut ctx = fake_ctx(&fake);
    load_rows(&mut ctx, vec![student("u1", "ps1")]);
    select_all(&mut ctx);
    open_bulk(&mut ctx, BulkActionKind::Terminate);

    confirm_bulk_action(&mut ctx).unwrap();
    ctx.settle().await;

    assert_eq!(fake.calls().len(), 1);
    let router = ctx.state::<BulkDialogRouter>();
    let dialog = router.current().unwrap();
    assert_eq!(dialog.error(), Some("API returned status: 503"));
    assert!(!dialog.is_submitting());
}

#[tokio::test]
async fn test_opening_change_batch_closes_extend_session() {
    let fake = FakeRosterApi::new();
    let mut ctx = fake_ctx(&fake);
    load_rows(&mut ctx, vec![student("u1", "ps1")]);
    select_all(&mut ctx);

    open_bulk(&mut ctx, BulkActionKind::ExtendSession);
    open_bulk(&mut ctx, BulkActionKind::ChangeBatch);

    let router = ctx.state::<BulkDialogRouter>();
    let open: Vec<BulkActionKind> = BulkActionKind::ALL
        .into_iter()
        .filter(|kind| router.is_open(*kind))
        .collect();
    assert_eq!(open, vec![BulkActionKind::ChangeBatch]);
}

#[tokio::test]
async fn test_double_confirm_sends_once() {
    let fake = FakeRosterApi::new();
    let mut ctx = fake_ctx(&fake);
    load_rows(&mut ctx, vec![student("u1", "ps1")]);
    select_all(&mut ctx);
    open_bulk(&mut ctx, BulkActionKind::Delete);

    confirm_bulk_action(&mut ctx).unwrap();
    assert_eq!(
        confirm_bulk_action(&mut ctx),
        Err(ValidationError::AlreadySubmitting)
    );
    ctx.settle().await;
    assert_eq!(fake.calls().len(), 1);
}
