use httpmock::prelude::*;
use target_planner::app::report::{CSV_REPORT, JSON_REPORT};
use target_planner::domain::model::{PlanDraft, Track};
use target_planner::{CliConfig, LocalStorage, PlanRunner, PlannerError, RunOptions, SaveRejection};
use tempfile::TempDir;

fn settings(api_base_url: String, output_path: &str) -> CliConfig {
    CliConfig {
        plan: "plan.json".to_string(),
        config: None,
        api_base_url,
        output_path: output_path.to_string(),
        request_timeout_secs: 5,
        fallback_on_error: false,
        centre_id: None,
        save: false,
        json_logs: false,
        verbose: false,
    }
}

fn centres_json() -> serde_json::Value {
    serde_json::json!([
        {"id": "C-10", "name": "Lohardaga", "capacity": 100, "jobRole": "Field Technician", "courseDuration": 2},
        {"id": "C-11", "name": "Simdega", "capacity": 40, "jobRole": "Data Entry Operator", "courseDuration": 1}
    ])
}

fn draft(enrolment_second_row: u32) -> PlanDraft {
    let json = serde_json::json!({
        "workOrder": {"id": "WO-42", "totalTarget": 500},
        "centreId": "C-10",
        "windowStart": "2025-01",
        "mobilisation": [
            {"target": 300, "month": "2025-01"},
            {"target": 200, "month": "2025-02"}
        ],
        "enrolment": [
            {"target": 60, "month": "2025-01"},
            {"target": enrolment_second_row, "month": "2025-02"},
            {"target": 0, "month": ""}
        ]
    });
    PlanDraft::from_json(&json.to_string()).unwrap()
}

#[tokio::test]
async fn test_plan_is_saved_and_exported() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let centres_mock = server.mock(|when, then| {
        when.method(GET).path("/work-orders/WO-42/centres");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(centres_json());
    });
    let save_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/work-orders/WO-42/targets")
            .body_contains("\"centreId\":\"C-10\"");
        then.status(200);
    });

    let runner = PlanRunner::new(
        LocalStorage::new(output_path.clone()),
        settings(server.base_url(), &output_path),
    );
    let options = RunOptions {
        centre_id: None,
        save: true,
    };
    let report = runner.run(&draft(440), &options).await.unwrap();

    centres_mock.assert();
    save_mock.assert();
    assert!(report.saved);
    assert!(report.ready_to_save);
    assert!(!report.centres_from_fixture);
    assert_eq!(report.track(Track::Enrolment).unwrap().total, 500);
    let frozen: Vec<String> = report.frozen_months.iter().map(|m| m.to_string()).collect();
    assert_eq!(frozen, vec!["2025-03", "2025-04"]);

    let csv = std::fs::read_to_string(temp_dir.path().join(CSV_REPORT)).unwrap();
    assert_eq!(csv.lines().count(), 1 + 2 + 3);
    assert!(csv.contains(",2025-02,440,false"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join(JSON_REPORT)).unwrap())
            .unwrap();
    assert_eq!(json["saved"], true);
}

#[tokio::test]
async fn test_mismatched_enrolment_blocks_save() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/work-orders/WO-42/centres");
        then.status(200).json_body(centres_json());
    });
    let save_mock = server.mock(|when, then| {
        when.method(POST).path("/work-orders/WO-42/targets");
        then.status(200);
    });

    let runner = PlanRunner::new(
        LocalStorage::new(output_path.clone()),
        settings(server.base_url(), &output_path),
    );
    let options = RunOptions {
        centre_id: None,
        save: true,
    };
    let err = runner.run(&draft(420), &options).await.unwrap_err();

    assert!(matches!(
        err,
        PlannerError::SaveRejected(SaveRejection::EnrolmentMismatch {
            expected: 500,
            actual: 480
        })
    ));
    save_mock.assert_hits(0);

    // The report is still written so the planner can see what is off.
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join(JSON_REPORT)).unwrap())
            .unwrap();
    assert_eq!(json["readyToSave"], false);
    assert_eq!(json["saved"], false);
}

#[tokio::test]
async fn test_backend_failure_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/work-orders/WO-42/centres");
        then.status(200).json_body(centres_json());
    });
    let save_mock = server.mock(|when, then| {
        when.method(POST).path("/work-orders/WO-42/targets");
        then.status(500).body("database unavailable");
    });

    let runner = PlanRunner::new(
        LocalStorage::new(output_path.clone()),
        settings(server.base_url(), &output_path),
    );
    let options = RunOptions {
        centre_id: None,
        save: true,
    };
    let err = runner.run(&draft(440), &options).await.unwrap_err();

    save_mock.assert();
    assert!(matches!(err, PlannerError::PersistenceError { status: 500, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_empty_centre_list_uses_fixture() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let centres_mock = server.mock(|when, then| {
        when.method(GET).path("/work-orders/WO-42/centres");
        then.status(200).json_body(serde_json::json!([]));
    });

    let runner = PlanRunner::new(
        LocalStorage::new(output_path.clone()),
        settings(server.base_url(), &output_path),
    );
    let options = RunOptions {
        centre_id: Some("CTR-002".to_string()),
        save: false,
    };
    let report = runner.run(&draft(440), &options).await.unwrap();

    centres_mock.assert();
    assert!(report.centres_from_fixture);
    assert_eq!(report.centre.as_ref().unwrap().id, "CTR-002");
    assert!(!report.saved);
}

#[tokio::test]
async fn test_unknown_centre_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/work-orders/WO-42/centres");
        then.status(200).json_body(centres_json());
    });

    let runner = PlanRunner::new(
        LocalStorage::new(output_path.clone()),
        settings(server.base_url(), &output_path),
    );
    let options = RunOptions {
        centre_id: Some("C-99".to_string()),
        save: false,
    };
    let err = runner.run(&draft(440), &options).await.unwrap_err();
    assert!(matches!(err, PlannerError::UnknownCentre { .. }));
}

#[tokio::test]
async fn test_unreachable_api_falls_back_when_enabled() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let mut config = settings("http://127.0.0.1:1".to_string(), &output_path);
    let options = RunOptions {
        centre_id: Some("CTR-001".to_string()),
        save: false,
    };

    let runner = PlanRunner::new(LocalStorage::new(output_path.clone()), config.clone());
    assert!(matches!(
        runner.run(&draft(440), &options).await,
        Err(PlannerError::ApiError(_))
    ));

    config.fallback_on_error = true;
    let runner = PlanRunner::new(LocalStorage::new(output_path.clone()), config);
    let report = runner.run(&draft(440), &options).await.unwrap();
    assert!(report.centres_from_fixture);
}

#[test]
fn test_demo_plan_parses() {
    let draft = PlanDraft::from_json(include_str!("../demos/plan.json")).unwrap();
    assert_eq!(draft.work_order.total_target, 300);
    assert_eq!(draft.rows(Track::Enrolment).len(), 3);
}
