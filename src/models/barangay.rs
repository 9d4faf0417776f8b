use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Barangay {
    pub id: i64,
    pub name: String,
    pub municipality: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBarangayRequest {
    #[validate(length(min = 1, max = 100, message = "Barangay name is required"))]
    pub name: String,

    #[validate(length(max = 100))]
    pub municipality: Option<String>,
}
