mod common;

use axum::http::{Method, StatusCode};
use regex::Regex;
use serde_json::json;

use common::{TestApp, PASSWORD};

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_login_returns_bearer_token() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "staff", "password": PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["user"]["username"], "staff");

    let token = body["data"]["token"].as_str().unwrap().to_string();
    let (status, me) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["barangay_id"], app.barangay_id);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_rejected() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "staff", "password": "not-the-password" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password");
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/api/routes", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = app.get("/api/routes", "garbage.token.value").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_staff_cannot_reach_admin_routes() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/api/admin/users", &app.staff_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get("/api/admin/users", &app.admin_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_route_starts_under_review_with_one_log() {
    let app = TestApp::new().await;
    let route = app.create_route(&app.staff_token, "Market Loop", None).await;

    assert_eq!(route["status"], "Under Review");
    assert_eq!(route["submission_status"], "Draft");
    assert_eq!(route["barangay_id"], app.barangay_id);
    assert_eq!(app.count("tricycle_routes").await, 1);

    let id = route["id"].as_i64().unwrap();
    let (status, logs) = app.get(&format!("/api/routes/{}/logs", id), &app.staff_token).await;
    assert_eq!(status, StatusCode::OK);
    let logs = logs["data"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["action"], "Created");
}

#[tokio::test]
async fn test_route_code_is_generated_when_omitted() {
    let app = TestApp::new().await;
    let route = app.create_route(&app.staff_token, "School Run", None).await;

    let code = route["route_code"].as_str().unwrap();
    assert!(Regex::new(r"^RT-\d{8}-[0-9A-F]{4}$").unwrap().is_match(code), "{code}");
}

#[tokio::test]
async fn test_duplicate_route_code_conflicts() {
    let app = TestApp::new().await;
    let payload = json!({
        "route_code": "rt-main-01",
        "route_name": "Main Street",
        "start_point": "Plaza",
        "end_point": "Terminal",
        "distance_km": 2.0,
        "regular_fare": 12.0,
        "operating_start": "06:00:00",
        "operating_end": "20:00"
    });

    let (status, body) = app.post("/api/routes", &app.staff_token, payload.clone()).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["route_code"], "RT-MAIN-01");
    assert_eq!(body["data"]["operating_start"], "06:00");

    let (status, _) = app.post("/api/routes", &app.staff_token, payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_must_name_a_barangay() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/api/routes",
            &app.admin_token,
            json!({
                "route_name": "Orphan Route",
                "start_point": "A",
                "end_point": "B",
                "distance_km": 1.0,
                "regular_fare": 10.0,
                "operating_start": "06:00",
                "operating_end": "18:00"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Barangay is required");
}

#[tokio::test]
async fn test_missing_json_field_gets_error_envelope() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/api/routes",
            &app.staff_token,
            json!({
                "start_point": "Plaza",
                "end_point": "Terminal",
                "distance_km": 2.0,
                "regular_fare": 12.0,
                "operating_start": "06:00",
                "operating_end": "20:00"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("route_name"), "{body}");
    assert_eq!(app.count("tricycle_routes").await, 0);
}

#[tokio::test]
async fn test_malformed_path_and_query_get_error_envelope() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/routes/not-a-number", &app.staff_token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, body) = app.get("/api/routes?page=first", &app.staff_token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_search_without_matches_reports_no_records() {
    let app = TestApp::new().await;
    app.create_route(&app.staff_token, "Market Loop", None).await;

    let (status, body) = app
        .get("/api/routes?search=nonexistent-route", &app.staff_token)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["total"], 0);
    assert_eq!(body["data"]["message"], "No records found");
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let app = TestApp::new().await;
    app.create_route(&app.staff_token, "Market Loop", None).await;
    app.create_route(&app.staff_token, "River Road", None).await;

    let (status, body) = app
        .get("/api/routes?page=5&per_page=10", &app.staff_token)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["page"], 5);
}

#[tokio::test]
async fn test_search_matches_route_name() {
    let app = TestApp::new().await;
    app.create_route(&app.staff_token, "Market Loop", None).await;
    app.create_route(&app.staff_token, "River Road", None).await;

    let (status, body) = app.get("/api/routes?search=river", &app.staff_token).await;

    assert_eq!(status, StatusCode::OK);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["route_name"], "River Road");
}

#[tokio::test]
async fn test_staff_only_see_their_barangay() {
    let app = TestApp::new().await;
    let foreign = app
        .create_route(&app.admin_token, "Poblacion Loop", Some(app.other_barangay_id))
        .await;
    app.create_route(&app.staff_token, "Market Loop", None).await;

    let (_, body) = app.get("/api/routes", &app.staff_token).await;
    assert_eq!(body["data"]["total"], 1);

    let (_, body) = app.get("/api/routes", &app.admin_token).await;
    assert_eq!(body["data"]["total"], 2);

    let (status, _) = app
        .get(&format!("/api/routes/{}", foreign["id"]), &app.staff_token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_route_stops_keep_their_order() {
    let app = TestApp::new().await;
    let route = app.create_route(&app.staff_token, "Market Loop", None).await;
    let uri = format!("/api/routes/{}/stops", route["id"]);

    for (order, name) in [(2, "Chapel"), (1, "Market Gate")] {
        let (status, body) = app
            .post(&uri, &app.staff_token, json!({ "stop_name": name, "stop_order": order }))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let (status, _) = app
        .post(&uri, &app.staff_token, json!({ "stop_name": "Duplicate", "stop_order": 2 }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = app.get(&uri, &app.staff_token).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["stop_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Market Gate", "Chapel"]);
}

#[tokio::test]
async fn test_terminal_rejects_route_from_other_barangay() {
    let app = TestApp::new().await;
    let foreign = app
        .create_route(&app.admin_token, "Poblacion Loop", Some(app.other_barangay_id))
        .await;

    let (status, _) = app
        .post(
            "/api/terminals",
            &app.admin_token,
            json!({
                "terminal_name": "Plaza Terminal",
                "location": "Town Plaza",
                "barangay_id": app.barangay_id,
                "route_id": foreign["id"],
                "capacity": 12
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/terminals",
            &app.staff_token,
            json!({ "terminal_name": "Plaza Terminal", "location": "Town Plaza", "capacity": 12 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["barangay_id"], app.barangay_id);
    assert_eq!(body["data"]["status"], "Active");
}
