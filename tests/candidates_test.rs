mod common;

use common::{candidate, envelope, signed_in};
use recruitment_client::dto::candidate_dto::UploadCandidatePayload;
use recruitment_client::error::Error;
use recruitment_client::models::candidate::{CandidateFilters, FilterUpdate};
use recruitment_client::models::notification::Severity;
use reqwest::{Method, StatusCode};
use serde_json::json;
use std::time::Duration;

fn pool() -> serde_json::Value {
    envelope(json!([
        candidate(1, "Alice", "tech", "Backend Engineer"),
        candidate(2, "Bob", "sales", "Account Executive"),
        candidate(3, "Chen", "tech", "Flutter Developer"),
        candidate(4, "Dana", "sales", "Sales Engineer"),
        candidate(5, "Eli", "tech", "Data Engineer"),
    ]))
}

#[tokio::test]
async fn fetch_all_replaces_cache_wholesale() {
    let h = signed_in();
    h.transport
        .on(Method::GET, "/api/candidates", StatusCode::OK, pool())
        .on(
            Method::GET,
            "/api/candidates",
            StatusCode::OK,
            envelope(json!([candidate(9, "Zoe", "tech", "SRE")])),
        );

    h.state.candidates.fetch_all().await.unwrap();
    assert_eq!(h.state.candidates.list().len(), 5);

    h.state.candidates.fetch_all().await.unwrap();
    let ids: Vec<i64> = h.state.candidates.list().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![9]);

    let sent = h.transport.requests();
    assert!(sent.iter().all(|r| r.bearer.as_deref() == Some(common::TOKEN)));
}

#[tokio::test]
async fn tech_filter_keeps_three_of_five_in_order() {
    let h = signed_in();
    h.transport.on(Method::GET, "/api/candidates", StatusCode::OK, pool());
    h.state.candidates.fetch_all().await.unwrap();

    let view = h
        .state
        .candidates
        .filtered_view(&CandidateFilters::new("tech", ""));
    let ids: Vec<i64> = view.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 3, 5]);

    h.state.candidates.set_filters(FilterUpdate {
        search: Some("engineer".into()),
        ..Default::default()
    });
    h.state.candidates.set_filters(FilterUpdate {
        domain: Some("sales".into()),
        ..Default::default()
    });
    assert_eq!(h.state.candidates.filters(), CandidateFilters::new("sales", "engineer"));
    let ids: Vec<i64> = h.state.candidates.filtered().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![4]);
}

#[tokio::test]
async fn rejected_upload_leaves_cache_and_reports_once() {
    let h = signed_in();
    h.transport
        .on(Method::GET, "/api/candidates", StatusCode::OK, pool())
        .on(
            Method::POST,
            "/api/candidates/upload",
            StatusCode::BAD_REQUEST,
            json!({"success": false, "message": "Could not parse CV"}),
        );
    h.state.candidates.fetch_all().await.unwrap();
    let before = h.state.candidates.list();

    let result = h
        .state
        .candidates
        .upload(UploadCandidatePayload::pdf(
            "cv.pdf",
            &b"%PDF-1.7 broken"[..],
            "tech",
            "hr@acme.io",
        ))
        .await;

    assert!(result.is_err());
    assert_eq!(h.state.candidates.list(), before);
    let notifications = h.state.notifications.list();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].severity, Severity::Error);
    assert_eq!(notifications[0].message, "Could not parse CV");
    assert!(!h.state.candidates.is_busy());
    assert_eq!(h.state.candidates.error().as_deref(), Some("Could not parse CV"));
}

#[tokio::test]
async fn invalid_upload_sends_nothing() {
    let h = signed_in();
    let mut payload = UploadCandidatePayload::pdf("photo.png", &b"\x89PNG"[..], "", "hr@acme.io");
    payload.content_type = "image/png".into();

    let err = h.state.candidates.upload(payload).await.unwrap_err();
    let fields = err.field_errors().expect("validation error");
    assert_eq!(fields.get("domain"), Some("Please select a domain"));
    assert_eq!(fields.get("content_type"), Some("Only PDF files are accepted"));
    assert!(h.transport.requests().is_empty());
    assert!(h.state.notifications.is_empty());
}

#[tokio::test]
async fn second_remove_of_same_id_is_noop_but_surfaces_failure() {
    let h = signed_in();
    h.transport
        .on(Method::GET, "/api/candidates", StatusCode::OK, pool())
        .on(Method::DELETE, "/api/candidates/2", StatusCode::OK, envelope(json!(2)))
        .on(
            Method::DELETE,
            "/api/candidates/2",
            StatusCode::NOT_FOUND,
            json!({"message": "Candidate not found"}),
        );
    h.state.candidates.fetch_all().await.unwrap();

    h.state.candidates.remove(2).await.unwrap();
    assert!(h.state.candidates.get(2).is_none());
    assert_eq!(h.state.candidates.list().len(), 4);

    assert!(h.state.candidates.remove(2).await.is_err());
    assert_eq!(h.state.candidates.list().len(), 4);
    assert_eq!(h.transport.calls(Method::DELETE, "/api/candidates/2"), 2);

    let messages: Vec<String> = h
        .state
        .notifications
        .list()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(messages, vec!["Candidate removed", "Candidate not found"]);
}

#[tokio::test(start_paused = true)]
async fn superseded_fetch_cannot_resurrect_removed_candidate() {
    let h = signed_in();
    h.transport
        .on(Method::GET, "/api/candidates", StatusCode::OK, pool())
        .on_delayed(
            Method::GET,
            "/api/candidates",
            Duration::from_millis(500),
            StatusCode::OK,
            pool(),
        )
        .on(Method::DELETE, "/api/candidates/3", StatusCode::OK, envelope(json!(3)));
    h.state.candidates.fetch_all().await.unwrap();

    let candidates = &h.state.candidates;
    let (fetched, removed) = tokio::join!(candidates.fetch_all(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(candidates.is_busy());
        candidates.remove(3).await
    });
    fetched.unwrap();
    removed.unwrap();

    assert!(candidates.get(3).is_none());
    assert_eq!(candidates.list().len(), 4);
    assert!(!candidates.is_busy());
}

#[tokio::test(start_paused = true)]
async fn initial_fetch_survives_faster_detail_and_upload() {
    let h = signed_in();
    h.transport
        .on_delayed(
            Method::GET,
            "/api/candidates",
            Duration::from_millis(400),
            StatusCode::OK,
            envelope(json!([
                candidate(1, "Alice", "tech", "Backend Engineer"),
                candidate(2, "Bob", "sales", "Account Executive"),
            ])),
        )
        .on(
            Method::GET,
            "/api/candidates/9",
            StatusCode::OK,
            envelope(candidate(9, "Ivan", "tech", "SRE")),
        )
        .on(
            Method::POST,
            "/api/candidates/upload",
            StatusCode::CREATED,
            envelope(candidate(7, "Gul", "tech", "QA")),
        );

    let candidates = &h.state.candidates;
    let (fetched, detail, uploaded) = tokio::join!(
        candidates.fetch_all(),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            candidates.load_detail(9).await
        },
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            candidates
                .upload(UploadCandidatePayload::pdf("gul.pdf", &b"%PDF-1.4"[..], "tech", "hr@acme.io"))
                .await
        }
    );
    fetched.unwrap();
    assert_eq!(detail.unwrap().id, 9);
    assert_eq!(uploaded.unwrap().id, 7);

    let ids: Vec<i64> = candidates.list().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![7, 1, 2]);
    assert_eq!(candidates.selected().map(|c| c.id), Some(9));
}

#[tokio::test(start_paused = true)]
async fn hung_request_times_out_and_releases_busy() {
    let h = signed_in();
    h.transport.on_delayed(
        Method::GET,
        "/api/candidates",
        Duration::from_secs(60),
        StatusCode::OK,
        pool(),
    );

    let err = h.state.candidates.fetch_all().await.unwrap_err();
    assert!(matches!(err, Error::Timeout(_)));
    assert!(err.is_unavailable());
    assert!(!h.state.candidates.is_busy());
    assert_eq!(h.state.notifications.list()[0].message, "Failed to fetch candidates");
}

#[tokio::test(start_paused = true)]
async fn cancelled_fetch_is_silent() {
    let h = signed_in();
    h.transport.on_delayed(
        Method::GET,
        "/api/candidates",
        Duration::from_millis(800),
        StatusCode::OK,
        pool(),
    );

    let candidates = &h.state.candidates;
    let (result, ()) = tokio::join!(candidates.fetch_all(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        candidates.cancel_pending();
    });

    assert!(matches!(result, Err(Error::Cancelled)));
    assert!(candidates.list().is_empty());
    assert!(h.state.notifications.is_empty());
    assert!(candidates.error().is_none());
    assert!(!candidates.is_busy());
}

#[tokio::test]
async fn load_detail_selects_and_refreshes_entry() {
    let h = signed_in();
    let mut updated = candidate(1, "Alice", "tech", "Staff Engineer");
    updated["exp_years"] = json!(9);
    h.transport
        .on(Method::GET, "/api/candidates", StatusCode::OK, pool())
        .on(Method::GET, "/api/candidates/1", StatusCode::OK, envelope(updated));
    h.state.candidates.fetch_all().await.unwrap();

    let detail = h.state.candidates.load_detail(1).await.unwrap();
    assert_eq!(detail.position, "Staff Engineer");
    assert_eq!(h.state.candidates.selected().map(|c| c.id), Some(1));
    assert_eq!(h.state.candidates.list()[0].exp_years, 9);
    assert_eq!(
        h.state.candidates.preview_url(1).unwrap().as_str(),
        "http://api.test/api/candidates/1/preview"
    );
}
