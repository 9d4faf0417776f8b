mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::TestApp;

async fn act(app: &TestApp, route_id: i64, action: &str) -> (StatusCode, Value) {
    app.post(
        &format!("/api/admin/routes/{}/actions", route_id),
        &app.admin_token,
        json!({ "action": action }),
    )
    .await
}

async fn log_actions(app: &TestApp, route_id: i64) -> Vec<String> {
    let (_, body) = app
        .get(&format!("/api/routes/{}/logs", route_id), &app.admin_token)
        .await;
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|log| log["action"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_approving_twice_logs_twice_and_stays_active() {
    let app = TestApp::new().await;
    let route = app.create_route(&app.staff_token, "Market Loop", None).await;
    let id = route["id"].as_i64().unwrap();

    let (status, body) = act(&app, id, "approve").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Route approved successfully");
    assert_eq!(body["data"]["status"], "Active");
    assert_eq!(body["data"]["submission_status"], "Approved");
    assert_eq!(body["data"]["approved_by_name"], "Municipal Admin");

    let (status, body) = act(&app, id, "approve").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Active");

    let actions = log_actions(&app, id).await;
    assert_eq!(actions.iter().filter(|a| *a == "Approved").count(), 2);
    assert_eq!(actions.len(), 3);
}

#[tokio::test]
async fn test_suspend_and_reactivate() {
    let app = TestApp::new().await;
    let route = app.create_route(&app.staff_token, "Market Loop", None).await;
    let id = route["id"].as_i64().unwrap();

    let (status, body) = act(&app, id, "suspend").await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    act(&app, id, "approve").await;
    let (status, body) = act(&app, id, "suspend").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Suspended");
    assert_eq!(body["data"]["submission_status"], "Approved");

    let (status, body) = act(&app, id, "activate").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Active");

    let actions = log_actions(&app, id).await;
    assert_eq!(actions[0], "Reactivated");
    assert!(actions.contains(&"Suspended".to_string()));
}

#[tokio::test]
async fn test_rejected_route_cannot_be_activated() {
    let app = TestApp::new().await;
    let route = app.create_route(&app.staff_token, "Market Loop", None).await;
    let id = route["id"].as_i64().unwrap();

    let (status, body) = act(&app, id, "reject").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Inactive");
    assert_eq!(body["data"]["submission_status"], "Rejected");

    let (status, _) = act(&app, id, "activate").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_staff_cannot_edit_an_active_route() {
    let app = TestApp::new().await;
    let route = app.create_route(&app.staff_token, "Market Loop", None).await;
    let id = route["id"].as_i64().unwrap();
    let uri = format!("/api/routes/{}", id);

    let (status, body) = app
        .put(&uri, &app.staff_token, json!({ "regular_fare": 18.0 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["regular_fare"], 18.0);
    assert_eq!(body["data"]["route_name"], "Market Loop");

    act(&app, id, "approve").await;

    let (status, _) = app
        .put(&uri, &app.staff_token, json!({ "regular_fare": 20.0 }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .put(&uri, &app.admin_token, json!({ "regular_fare": 20.0 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Active");
}

#[tokio::test]
async fn test_submit_route_twice_conflicts() {
    let app = TestApp::new().await;
    let route = app.create_route(&app.staff_token, "Market Loop", None).await;
    let uri = format!("/api/routes/{}/submit", route["id"]);

    let (status, body) = app.post(&uri, &app.staff_token, json!({})).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["submission_status"], "Submitted");
    assert_eq!(body["data"]["status"], "Under Review");

    let (status, _) = app.post(&uri, &app.staff_token, json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reviewing_a_route_submission_moves_the_route() {
    let app = TestApp::new().await;
    let route = app.create_route(&app.staff_token, "Market Loop", None).await;
    let route_id = route["id"].as_i64().unwrap();

    let (status, body) = app
        .post(
            "/api/submissions",
            &app.staff_token,
            json!({
                "submission_type": "New Route",
                "route_id": route_id,
                "details": { "reason": "New school opened on the east side" }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "Pending");
    assert_eq!(body["data"]["barangay_id"], app.barangay_id);
    let code = body["data"]["submission_code"].as_str().unwrap().to_string();
    assert_eq!(
        body["message"],
        format!("Submission {} received and pending review", code)
    );
    let submission_id = body["data"]["id"].as_i64().unwrap();

    let (_, route) = app
        .get(&format!("/api/routes/{}", route_id), &app.staff_token)
        .await;
    assert_eq!(route["data"]["submission_status"], "Submitted");

    let review_uri = format!("/api/admin/submissions/{}/review", submission_id);
    let (status, body) = app
        .post(&review_uri, &app.admin_token, json!({ "decision": "return", "notes": "Add the stops" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "Returned for Revision");
    assert_eq!(body["data"]["review_notes"], "Add the stops");

    let (_, route) = app
        .get(&format!("/api/routes/{}", route_id), &app.staff_token)
        .await;
    assert_eq!(route["data"]["status"], "Under Review");
    assert_eq!(route["data"]["submission_status"], "Returned for Revision");

    let (status, body) = app
        .post(&review_uri, &app.admin_token, json!({ "decision": "approve" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        format!("Submission {} was already reviewed (Returned for Revision)", code)
    );
}

#[tokio::test]
async fn test_approving_a_submission_activates_the_route() {
    let app = TestApp::new().await;
    let route = app.create_route(&app.staff_token, "Market Loop", None).await;
    let route_id = route["id"].as_i64().unwrap();

    let (_, body) = app
        .post(
            "/api/submissions",
            &app.staff_token,
            json!({ "submission_type": "Route Update", "route_id": route_id, "details": "Fare change" }),
        )
        .await;
    let submission_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .post(
            &format!("/api/admin/submissions/{}/review", submission_id),
            &app.staff_token,
            json!({ "decision": "approve" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post(
            &format!("/api/admin/submissions/{}/review", submission_id),
            &app.admin_token,
            json!({ "decision": "approve" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Approved");

    let (_, route) = app
        .get(&format!("/api/routes/{}", route_id), &app.staff_token)
        .await;
    assert_eq!(route["data"]["status"], "Active");
    assert_eq!(route["data"]["submission_status"], "Approved");
}

#[tokio::test]
async fn test_submission_without_details_is_rejected() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/api/submissions",
            &app.staff_token,
            json!({ "submission_type": "Terminal Update", "details": "   " }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Submission details are required");
    assert_eq!(app.count("route_submissions").await, 0);
}

#[tokio::test]
async fn test_submission_with_details_omitted_is_rejected() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/api/submissions",
            &app.staff_token,
            json!({ "submission_type": "Terminal Update" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Submission details are required");
    assert_eq!(app.count("route_submissions").await, 0);
}
