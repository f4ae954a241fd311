//! Integration tests for fetching roster and activity pages.

use crate::common::{FakeRosterApi, fake_ctx, http_ctx, init_logging, student};
use roster_business::{
    ActivityPage, PageEnvelope, Pagination, StudentsPage, StudentsQuery, go_to_page, open_activity,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_students_page() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/institutes/inst-1/learners"))
        .and(query_param("page_no", "1"))
        .and(query_param("page_size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                {
                    "user_id": "u11",
                    "full_name": "Grace Hopper",
                    "package_session_id": "ps1",
                    "status": "ACTIVE"
                }
            ],
            "total_pages": 2,
            "page_no": 1,
            "page_size": 10,
            "total_elements": 11,
            "last": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut ctx = http_ctx(server.uri());
    go_to_page(&mut ctx, 1);
    ctx.settle().await;

    let page = ctx.state::<StudentsPage>();
    let envelope = page.envelope().unwrap();
    assert!(envelope.is_consistent());
    assert_eq!(envelope.content[0].full_name, "Grace Hopper");
    assert_eq!(page.pagination(), Pagination::new(1, 2));
    assert!(!page.pagination().can_next());
}

#[tokio::test]
async fn test_fetch_error_is_stored() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/institutes/inst-1/learners"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let mut ctx = http_ctx(server.uri());
    go_to_page(&mut ctx, 0);
    ctx.settle().await;

    assert_eq!(
        ctx.state::<StudentsPage>().error(),
        Some("API returned status: 502")
    );
}

/// Responses are applied in arrival order: a slow reply for an older page
/// replaces the newer one.
#[tokio::test]
async fn test_stale_response_overwrites_newer_page() {
    init_logging();
    let fake = FakeRosterApi::new();
    let first = fake.gate_page(0);
    let second = fake.gate_page(1);
    let mut ctx = fake_ctx(&fake);

    go_to_page(&mut ctx, 0);
    go_to_page(&mut ctx, 1);
    assert_eq!(ctx.in_flight(), 2);

    second
        .send(PageEnvelope::paginate(vec![student("page-1", "ps")], 1, 1))
        .unwrap();
    assert!(ctx.join_next().await);
    assert_eq!(ctx.state::<StudentsPage>().rows()[0].user_id, "page-1");

    first
        .send(PageEnvelope::paginate(vec![student("page-0", "ps")], 0, 1))
        .unwrap();
    ctx.settle().await;

    assert_eq!(ctx.state::<StudentsQuery>().page_no, 1);
    assert_eq!(ctx.state::<StudentsPage>().rows()[0].user_id, "page-0");
}

#[tokio::test]
async fn test_activity_logs_are_decoded_on_arrival() {
    init_logging();
    let server = MockServer::start().await;

    let details = json!({ "pages": [{ "page_number": 2 }, { "page_number": 1 }] }).to_string();
    Mock::given(method("GET"))
        .and(path("/api/learners/u1/activity-logs"))
        .and(query_param("slide_id", "slide-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{
                "id": "a1",
                "source_type": "DOCUMENT",
                "user_id": "u1",
                "slide_id": "slide-7",
                "start_time_in_millis": 1_704_164_645_000_i64,
                "end_time_in_millis": 1_704_164_705_000_i64,
                "details": details
            }],
            "total_pages": 1,
            "page_no": 0,
            "page_size": 10,
            "total_elements": 1,
            "last": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut ctx = http_ctx(server.uri());
    open_activity(&mut ctx, "u1", "slide-7");
    ctx.settle().await;

    let page = ctx.state::<ActivityPage>();
    let row = &page.envelope().unwrap().content[0];
    assert_eq!(row.date, "02-01-2024");
    assert_eq!(row.duration, "1m 00s");
    assert_eq!(row.summary.to_string(), "Pages 1, 2");
}

#[tokio::test]
async fn test_malformed_activity_details_surface_as_page_error() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/learners/u1/activity-logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{
                "id": "a1",
                "source_type": "VIDEO",
                "user_id": "u1",
                "slide_id": "s",
                "start_time_in_millis": 0,
                "end_time_in_millis": 1000,
                "details": "{broken"
            }],
            "total_pages": 1,
            "page_no": 0,
            "page_size": 10,
            "total_elements": 1,
            "last": true
        })))
        .mount(&server)
        .await;

    let mut ctx = http_ctx(server.uri());
    open_activity(&mut ctx, "u1", "s");
    ctx.settle().await;

    let error = ctx.state::<ActivityPage>().error().unwrap();
    assert!(error.contains("activity a1"), "unexpected error: {error}");
}
