mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{Part, TestApp, PDF_BYTES};

const PNG_BYTES: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R',
];

#[tokio::test]
async fn test_pdf_upload_is_stored_and_logged() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post_multipart(
            "/api/documents",
            &app.staff_token,
            &[
                Part::Text("document_type", "Franchise Permit"),
                Part::Text("title", "Franchise permit 2024"),
                Part::Text("valid_from", "2024-01-01"),
                Part::Text("valid_until", "2024-12-31"),
                Part::File {
                    name: "file",
                    file_name: "permit.pdf",
                    content_type: "application/pdf",
                    bytes: PDF_BYTES,
                },
            ],
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Document uploaded successfully");
    let document = &body["data"];
    assert!(document["document_code"].as_str().unwrap().starts_with("DOC-"));
    assert_eq!(document["mime_type"], "application/pdf");
    assert_eq!(document["original_name"], "permit.pdf");
    assert_eq!(document["file_size"], PDF_BYTES.len());
    assert_eq!(document["barangay_id"], app.barangay_id);

    let file_path = document["file_path"].as_str().unwrap();
    assert!(file_path.starts_with("documents/"));
    assert!(file_path.ends_with(".pdf"));
    let on_disk = std::fs::read(app.uploads.path().join(file_path)).unwrap();
    assert_eq!(on_disk, PDF_BYTES);

    assert_eq!(app.count("route_documents").await, 1);
    assert_eq!(app.count("document_logs").await, 1);
}

#[tokio::test]
async fn test_disallowed_type_leaves_nothing_behind() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post_multipart(
            "/api/documents",
            &app.staff_token,
            &[
                Part::Text("document_type", "Notes"),
                Part::Text("title", "Meeting notes"),
                Part::File {
                    name: "file",
                    file_name: "notes.txt",
                    content_type: "text/plain",
                    bytes: b"plain text is not accepted",
                },
            ],
        )
        .await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(
        body["message"],
        "File type 'text/plain' is not allowed. Allowed types: PDF, JPEG, PNG, DOC, DOCX"
    );
    assert!(app.stored_files().is_empty());
    assert_eq!(app.count("route_documents").await, 0);
}

#[tokio::test]
async fn test_oversized_file_reports_the_limit() {
    let app = TestApp::new().await;
    let mut big = PDF_BYTES.to_vec();
    big.resize(10 * 1024 * 1024 + 1, b'0');

    let (status, body) = app
        .post_multipart(
            "/api/documents",
            &app.staff_token,
            &[
                Part::Text("document_type", "Map"),
                Part::Text("title", "Route map"),
                Part::File {
                    name: "file",
                    file_name: "big.pdf",
                    content_type: "application/pdf",
                    bytes: &big,
                },
            ],
        )
        .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["message"], "File 'big.pdf' exceeds the maximum size of 10 MB");
    assert!(app.stored_files().is_empty());
    assert_eq!(app.count("route_documents").await, 0);
}

#[tokio::test]
async fn test_content_must_match_declared_type() {
    let app = TestApp::new().await;
    let (status, _) = app
        .post_multipart(
            "/api/documents",
            &app.staff_token,
            &[
                Part::Text("document_type", "Permit"),
                Part::Text("title", "Disguised image"),
                Part::File {
                    name: "file",
                    file_name: "permit.pdf",
                    content_type: "application/pdf",
                    bytes: PNG_BYTES,
                },
            ],
        )
        .await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_missing_title_stores_nothing() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post_multipart(
            "/api/documents",
            &app.staff_token,
            &[
                Part::Text("document_type", "Permit"),
                Part::File {
                    name: "file",
                    file_name: "permit.pdf",
                    content_type: "application/pdf",
                    bytes: PDF_BYTES,
                },
            ],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Document title is required");
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_document_listing_filters_by_type() {
    let app = TestApp::new().await;
    for (kind, title) in [("Permit", "Permit A"), ("Map", "Route map")] {
        let (status, _) = app
            .post_multipart(
                "/api/documents",
                &app.staff_token,
                &[
                    Part::Text("document_type", kind),
                    Part::Text("title", title),
                    Part::File {
                        name: "file",
                        file_name: "doc.pdf",
                        content_type: "application/pdf",
                        bytes: PDF_BYTES,
                    },
                ],
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = app.get("/api/documents?type=Map", &app.staff_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["title"], "Route map");
}

async fn driver_with_association(app: &TestApp) -> (i64, i64) {
    let (status, association) = app
        .post(
            "/api/associations",
            &app.staff_token,
            json!({ "association_name": "San Isidro TODA", "president_name": "Ramon Cruz" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{association}");

    let (status, driver) = app
        .post(
            "/api/drivers",
            &app.staff_token,
            json!({ "full_name": "Jose Santos", "license_number": "N01-23-456789" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{driver}");

    (
        driver["data"]["id"].as_i64().unwrap(),
        association["data"]["id"].as_i64().unwrap(),
    )
}

#[tokio::test]
async fn test_association_record_saves_all_attachments() {
    let app = TestApp::new().await;
    let (driver_id, association_id) = driver_with_association(&app).await;
    let association_id = association_id.to_string();
    let uri = format!("/api/drivers/{}/association-records", driver_id);

    let (status, body) = app
        .post_multipart(
            &uri,
            &app.staff_token,
            &[
                Part::Text("association_id", &association_id),
                Part::Text("membership_date", "2024-02-01"),
                Part::Text("expiry_date", "2025-02-01"),
                Part::File {
                    name: "attachments[]",
                    file_name: "membership.pdf",
                    content_type: "application/pdf",
                    bytes: PDF_BYTES,
                },
                Part::File {
                    name: "attachments[]",
                    file_name: "id-photo.png",
                    content_type: "image/png",
                    bytes: PNG_BYTES,
                },
            ],
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Association record saved successfully");
    assert_eq!(body["data"]["association_name"], "San Isidro TODA");
    assert_eq!(body["data"]["attachments"].as_array().unwrap().len(), 2);
    assert_eq!(app.stored_files().len(), 2);

    let (status, body) = app.get(&uri, &app.staff_token).await;
    assert_eq!(status, StatusCode::OK);
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["attachments"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_one_bad_attachment_rejects_the_whole_record() {
    let app = TestApp::new().await;
    let (driver_id, association_id) = driver_with_association(&app).await;
    let association_id = association_id.to_string();

    let (status, _) = app
        .post_multipart(
            &format!("/api/drivers/{}/association-records", driver_id),
            &app.staff_token,
            &[
                Part::Text("association_id", &association_id),
                Part::Text("membership_date", "2024-02-01"),
                Part::File {
                    name: "attachments",
                    file_name: "membership.pdf",
                    content_type: "application/pdf",
                    bytes: PDF_BYTES,
                },
                Part::File {
                    name: "attachments",
                    file_name: "script.sh",
                    content_type: "application/x-sh",
                    bytes: b"#!/bin/sh\n",
                },
            ],
        )
        .await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(app.stored_files().is_empty());
    assert_eq!(app.count("driver_association_records").await, 0);
    assert_eq!(app.count("driver_attachments").await, 0);
}

#[tokio::test]
async fn test_expiry_before_membership_is_rejected() {
    let app = TestApp::new().await;
    let (driver_id, association_id) = driver_with_association(&app).await;
    let association_id = association_id.to_string();

    let (status, body) = app
        .post_multipart(
            &format!("/api/drivers/{}/association-records", driver_id),
            &app.staff_token,
            &[
                Part::Text("association_id", &association_id),
                Part::Text("membership_date", "2024-02-01"),
                Part::Text("expiry_date", "2023-02-01"),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Expiry date cannot be earlier than the membership date"
    );
    assert_eq!(app.count("driver_association_records").await, 0);
}

fn permit_parts(title: &str) -> Vec<Part<'_>> {
    vec![
        Part::Text("document_type", "Franchise Permit"),
        Part::Text("title", title),
        Part::File {
            name: "file",
            file_name: "permit.pdf",
            content_type: "application/pdf",
            bytes: PDF_BYTES,
        },
    ]
}

#[tokio::test]
async fn test_failed_insert_removes_the_stored_file() {
    let app = TestApp::new().await;
    sqlx::query("DROP TABLE document_logs")
        .execute(&app.pool)
        .await
        .unwrap();

    let (status, body) = app
        .post_multipart("/api/documents", &app.staff_token, &permit_parts("Permit"))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{body}");
    assert_eq!(body["success"], false);
    assert!(app.stored_files().is_empty());
    assert_eq!(app.count("route_documents").await, 0);
}

#[tokio::test]
async fn test_committed_upload_keeps_its_file() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post_multipart("/api/documents", &app.staff_token, &permit_parts("Permit"))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let stored = app.stored_files();
    assert_eq!(stored.len(), 1);
    let file_path = body["data"]["file_path"].as_str().unwrap();
    assert_eq!(stored[0], app.uploads.path().join(file_path));
}

#[tokio::test]
async fn test_staff_cannot_open_municipal_documents() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post_multipart("/api/documents", &app.admin_token, &permit_parts("Municipal ordinance"))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["data"]["barangay_id"].is_null());
    let uri = format!("/api/documents/{}", body["data"]["id"]);

    let (status, _) = app.get(&uri, &app.admin_token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&uri, &app.staff_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (_, listing) = app.get("/api/documents", &app.staff_token).await;
    assert_eq!(listing["data"]["total"], 0, "{listing}");
}
