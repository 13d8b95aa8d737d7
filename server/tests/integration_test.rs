//! Integration tests for the points server
//!
//! These tests verify end-to-end functionality including:
//! - Rule rewards and the purchase approval flow on a file database
//! - Reading a book and passing its first quiz tier
//! - Backup, staged restore and startup swap
//! - The HTTP router and caregiver PIN checks

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{FixedOffset, Utc};
use http_body_util::BodyExt;
use juwoo_points::app::{self, AppState};
use juwoo_points::catalog::books::book_quiz;
use juwoo_points::database::QuizTier;
use juwoo_points::routes::{create_router, CAREGIVER_PIN_HEADER};
use juwoo_points::services::quiz::TierAnswer;
use juwoo_points::services::ActivityEvent;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn kst() -> FixedOffset {
    app::utc_offset(9).unwrap()
}

async fn create_test_app() -> (Arc<AppState>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let state = app::setup(temp_dir.path(), kst()).await.unwrap();
    (state, temp_dir)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_rule_reward_and_purchase_flow() {
    let (state, _temp) = create_test_app().await;
    let mut events = state.hub.subscribe();

    let bedtime = state
        .rules
        .list(true)
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.name == "9시 30분 전에 취침")
        .unwrap();
    let earned = state.ledger.apply_rule(bedtime.id, "엄마").await.unwrap();
    assert_eq!(earned.balance_after, 1000);

    match events.recv().await.unwrap() {
        ActivityEvent::PointsChanged { balance, .. } => assert_eq!(balance, 1000),
        other => panic!("unexpected event: {:?}", other),
    }

    let snack = state
        .shop
        .list_items(true)
        .await
        .unwrap()
        .into_iter()
        .find(|i| i.name == "과자 1봉지")
        .unwrap();
    let purchase = state.shop.request_purchase(snack.id, None).await.unwrap();

    // Requesting never touches the balance
    assert_eq!(state.ledger.balance().await.unwrap(), 1000);

    let (approved, deduction) = state.shop.approve(purchase.id, "엄마").await.unwrap();
    assert_eq!(deduction.amount, -1000);
    assert_eq!(approved.transaction_id, Some(deduction.id));
    assert_eq!(state.ledger.balance().await.unwrap(), 0);

    // Cancelling the original reward may drive the balance negative
    let reversal = state.ledger.cancel(earned.id, "엄마").await.unwrap();
    assert_eq!(reversal.balance_after, -1000);
    assert!(state.ledger.cancel(earned.id, "엄마").await.is_err());

    let history = state.ledger.transactions(10).await.unwrap();
    assert_eq!(history.len(), 3);
    assert!(history.iter().any(|t| t.id == earned.id && t.is_cancelled));

    let dashboard = state.statistics.dashboard(Utc::now()).await.unwrap();
    assert_eq!(dashboard.balance, -1000);

    state.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_reading_unlocks_and_passes_first_tier() {
    let (state, _temp) = create_test_app().await;
    let now = Utc::now();

    let library = state.ebooks.library().await.unwrap();
    let guide = library
        .iter()
        .find(|b| b.book.id == "pokemon-go-guide")
        .unwrap();
    assert!(guide.has_quiz);

    let outcome = state
        .ebooks
        .save_progress("pokemon-go-guide", guide.total_pages - 1, now)
        .await
        .unwrap();
    assert!(outcome.quiz_unlocked);
    assert_eq!(state.ledger.balance().await.unwrap(), 500);

    let answers: Vec<TierAnswer> = book_quiz("pokemon-go-guide", QuizTier::Basic)
        .into_iter()
        .map(|q| TierAnswer {
            question_id: q.id.to_string(),
            answer: q.answer.to_string(),
            hints_used: 0,
        })
        .collect();

    let result = state
        .quiz
        .submit_tier("pokemon-go-guide", QuizTier::Basic, &answers, now)
        .await
        .unwrap();
    assert!(result.passed);
    assert_eq!(result.score_percent, 100);
    assert_eq!(result.next_unlocked, Some(QuizTier::Intermediate));
    assert_eq!(
        state.ledger.balance().await.unwrap(),
        500 + result.total_points
    );

    let badges = state.badges.list(now).await.unwrap();
    assert!(badges.iter().any(|b| b.badge.code == "first_book" && b.earned));

    state.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_backup_restore_across_restart() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().to_path_buf();

    let state = app::setup(&data_dir, kst()).await.unwrap();
    state.ledger.award(1200, "backup marker").await.unwrap();
    let backup = state.backup.create_backup().await.unwrap();

    state.ledger.award(300, "after backup").await.unwrap();
    assert_eq!(state.ledger.balance().await.unwrap(), 1500);

    let staged = state.backup.stage_restore_by_id(&backup.id).await.unwrap();
    assert!(staged.restart_required);

    state.shutdown().await.unwrap();

    let restarted = app::setup(&data_dir, kst()).await.unwrap();
    assert_eq!(restarted.ledger.balance().await.unwrap(), 1200);
    // The snapshot is taken before its own record is written
    assert!(restarted.backup.list_backups().await.unwrap().is_empty());

    restarted.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_router_health_and_balance() {
    let (state, _temp) = create_test_app().await;
    let router = create_router(state.clone());

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(Request::builder().uri("/api/balance").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["balance"], 0);

    state.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_router_requires_caregiver_pin() {
    let (state, _temp) = create_test_app().await;
    state.settings.set_caregiver_pin("2468").await.unwrap();
    let router = create_router(state.clone());

    let adjust = |pin: Option<&str>| {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/transactions/adjust")
            .header("content-type", "application/json");
        if let Some(pin) = pin {
            builder = builder.header(CAREGIVER_PIN_HEADER, pin);
        }
        builder
            .body(Body::from(r#"{"amount": 700, "note": "할머니 용돈"}"#))
            .unwrap()
    };

    let response = router.clone().oneshot(adjust(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router.clone().oneshot(adjust(Some("1111"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router.clone().oneshot(adjust(Some("2468"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["balance_after"], 700);
    assert_eq!(body["created_by"], "caregiver");

    // Child-facing reads stay open
    let response = router
        .oneshot(Request::builder().uri("/api/shop/items").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    state.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_router_error_bodies() {
    let (state, _temp) = create_test_app().await;
    let router = create_router(state.clone());

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/api/goals/999").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Goal not found: 999");

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/stats/points?range=decade")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    state.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_router_dragon_village_difficulty_and_full_sheets() {
    let (state, _temp) = create_test_app().await;
    let router = create_router(state.clone());

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/quizzes/dragon-village/start?difficulty=hard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let sheet = body_json(response).await;
    assert_eq!(sheet["difficulty"], "hard");
    assert_eq!(sheet["questions"].as_array().unwrap().len(), 10);
    assert!(sheet["questions"][0].get("answer").is_none());

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/quizzes/dragon-village/start?difficulty=legendary")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // One right answer is not a perfect score
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/quizzes/pokemon/submit")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"answers": [{"question_id": "p1", "answer": "전기"}]}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.ledger.balance().await.unwrap(), 0);

    state.shutdown().await.unwrap();
}
