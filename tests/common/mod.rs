#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use tricycle_portal::build_router;
use tricycle_portal::config::{DatabaseConfig, EnvironmentConfig};
use tricycle_portal::database::connection::initialize_schema;
use tricycle_portal::models::user::UserRole;
use tricycle_portal::repositories::barangay_repository::BarangayRepository;
use tricycle_portal::repositories::user_repository::{NewUser, UserRepository};
use tricycle_portal::state::AppState;
use tricycle_portal::utils::jwt::{generate_token, JwtConfig};

pub const PASSWORD: &str = "password123";
pub const BOUNDARY: &str = "portal-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub uploads: TempDir,
    pub admin_token: String,
    pub staff_token: String,
    pub barangay_id: i64,
    pub other_barangay_id: i64,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = DatabaseConfig::in_memory().create_pool().await.unwrap();
        initialize_schema(&pool).await.unwrap();

        let barangays = BarangayRepository::new(pool.clone());
        let home = barangays.create("San Isidro", Some("Tagum")).await.unwrap();
        let other = barangays.create("Poblacion", Some("Tagum")).await.unwrap();

        let users = UserRepository::new(pool.clone());
        let password_hash = bcrypt::hash(PASSWORD, 4).unwrap();
        let admin = users
            .create(&NewUser {
                username: "admin".to_string(),
                password_hash: password_hash.clone(),
                full_name: "Municipal Admin".to_string(),
                email: None,
                role: UserRole::Admin,
                barangay_id: None,
            })
            .await
            .unwrap();
        let staff = users
            .create(&NewUser {
                username: "staff".to_string(),
                password_hash,
                full_name: "Barangay Staff".to_string(),
                email: None,
                role: UserRole::Staff,
                barangay_id: Some(home.id),
            })
            .await
            .unwrap();

        let uploads = TempDir::new().unwrap();
        let config = EnvironmentConfig {
            upload_dir: uploads.path().to_path_buf(),
            bcrypt_cost: 4,
            ..EnvironmentConfig::default()
        };
        let jwt = JwtConfig::from(&config);
        let admin_token = generate_token(admin.id, UserRole::Admin, None, &jwt).unwrap();
        let staff_token = generate_token(staff.id, UserRole::Staff, Some(home.id), &jwt).unwrap();

        let router = build_router(AppState::new(pool.clone(), config));

        Self {
            router,
            pool,
            uploads,
            admin_token,
            staff_token,
            barangay_id: home.id,
            other_barangay_id: other.id,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn post_multipart(&self, uri: &str, token: &str, parts: &[Part<'_>]) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        };
        (status, json)
    }

    /// Create a route as `token` and return its JSON.
    pub async fn create_route(&self, token: &str, name: &str, barangay_id: Option<i64>) -> Value {
        let (status, body) = self
            .post(
                "/api/routes",
                token,
                serde_json::json!({
                    "route_name": name,
                    "start_point": "Public Market",
                    "end_point": "National High School",
                    "barangay_id": barangay_id,
                    "distance_km": 3.5,
                    "estimated_minutes": 15,
                    "regular_fare": 15.0,
                    "special_fare": 50.0,
                    "operating_start": "05:00",
                    "operating_end": "21:00"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"].clone()
    }

    /// Every file currently under the upload root.
    pub fn stored_files(&self) -> Vec<std::path::PathBuf> {
        let mut found = Vec::new();
        let mut pending = vec![self.uploads.path().to_path_buf()];
        while let Some(dir) = pending.pop() {
            for entry in std::fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    pending.push(path);
                } else {
                    found.push(path);
                }
            }
        }
        found
    }

    pub async fn count(&self, table: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap();
        count
    }
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF\n";
