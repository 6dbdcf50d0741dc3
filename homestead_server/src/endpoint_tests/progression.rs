use std::time::Duration;

use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use homestead_engine::{traits::ProgressionSettings, SqliteDatabase};
use serde_json::json;

use crate::{
    activity_log::ActivityLog,
    progression_worker::{start_progression_worker, ProgressionControl, ProgressionWorkerConfig},
    routes::{
        clear_progression_settings,
        progression_logs,
        progression_start,
        progression_status,
        progression_stop,
        progression_trigger,
        set_progression_settings,
    },
    worker_state::WorkerState,
};

struct Harness {
    control: ProgressionControl,
    state: WorkerState,
    activity: ActivityLog,
    worker: tokio::task::JoinHandle<()>,
}

async fn start_harness() -> Harness {
    let _ = env_logger::try_init();
    let db = SqliteDatabase::new_with_url("sqlite::memory:", 1).await.expect("Could not create in-memory database");
    let state = WorkerState::new();
    let activity = ActivityLog::new();
    let config = ProgressionWorkerConfig {
        interval: Duration::from_secs(3600),
        autostart: false,
        settings: ProgressionSettings::default(),
    };
    let (worker, control) = start_progression_worker(db, config, state.clone(), activity.clone());
    Harness { control, state, activity, worker }
}

impl Harness {
    async fn shutdown(self) {
        self.control.shutdown();
        self.worker.await.expect("worker did not exit cleanly");
    }
}

macro_rules! progression_app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($harness.control.clone()))
                .app_data(web::Data::new($harness.state.clone()))
                .app_data(web::Data::new($harness.activity.clone()))
                .service(progression_status)
                .service(progression_start)
                .service(progression_stop)
                .service(progression_trigger)
                .service(set_progression_settings)
                .service(clear_progression_settings)
                .service(progression_logs),
        )
        .await
    };
}

#[actix_web::test]
async fn start_and_stop_toggle_the_worker() {
    let harness = start_harness().await;
    let app = progression_app!(harness);

    let res = test::call_service(&app, TestRequest::post().uri("/api/progression/start").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(harness.state.is_enabled());

    let res = test::call_service(&app, TestRequest::post().uri("/api/progression/stop").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(!harness.state.is_enabled());

    harness.shutdown().await;
}

#[actix_web::test]
async fn trigger_queues_a_scan_even_when_disabled() {
    let harness = start_harness().await;
    let app = progression_app!(harness);

    let res = test::call_service(&app, TestRequest::post().uri("/api/progression/trigger").to_request()).await;
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    for _ in 0..100 {
        if harness.state.snapshot().run_count >= 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(harness.state.snapshot().run_count, 1, "manual trigger must run a scan");

    harness.shutdown().await;
}

#[actix_web::test]
async fn settings_override_can_be_set_and_cleared() {
    let harness = start_harness().await;
    let app = progression_app!(harness);

    let req = TestRequest::put()
        .uri("/api/progression/settings")
        .set_json(json!({ "pending_to_production_days": 1, "random_variation_days": 0 }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let current = harness.control.current_override().expect("override should be set");
    assert_eq!(current.pending_to_production_days, 1);
    assert_eq!(current.random_variation_days, 0);
    // Unspecified fields fall back to the defaults
    assert_eq!(current.production_to_shipped_days, ProgressionSettings::default().production_to_shipped_days);

    let res = test::call_service(&app, TestRequest::delete().uri("/api/progression/settings").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(harness.control.current_override().is_none());

    harness.shutdown().await;
}

#[actix_web::test]
async fn status_and_logs_report_worker_activity() {
    let harness = start_harness().await;
    harness.activity.record("scan", "0 orders scanned, 0 updated, 0 blocked by open tickets, 0 errors");
    let app = progression_app!(harness);

    let res = test::call_service(&app, TestRequest::get().uri("/api/progression/status").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let status: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(status["enabled"], false);
    assert_eq!(status["run_count"], 0);

    let res = test::call_service(&app, TestRequest::get().uri("/api/progression/logs?count=10").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let logs: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(logs.as_array().unwrap().len(), 1);
    assert_eq!(logs[0]["action"], "scan");

    harness.shutdown().await;
}
