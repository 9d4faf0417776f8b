use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::RecordStatus;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Terminal {
    pub id: i64,
    pub terminal_name: String,
    pub location: String,
    pub barangay_id: i64,
    pub barangay_name: Option<String>,
    pub route_id: Option<i64>,
    pub route_name: Option<String>,
    pub capacity: i64,
    pub operating_hours: Option<String>,
    pub status: RecordStatus,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTerminalRequest {
    #[validate(length(min = 1, max = 150, message = "Terminal name is required"))]
    pub terminal_name: String,

    #[validate(length(min = 1, max = 255, message = "Location is required"))]
    pub location: String,

    pub barangay_id: Option<i64>,
    pub route_id: Option<i64>,

    #[validate(range(min = 0, message = "Capacity cannot be negative"))]
    pub capacity: Option<i64>,

    #[validate(length(max = 100))]
    pub operating_hours: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTerminalRequest {
    #[validate(length(min = 1, max = 150))]
    pub terminal_name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,

    pub route_id: Option<i64>,

    #[validate(range(min = 0, message = "Capacity cannot be negative"))]
    pub capacity: Option<i64>,

    #[validate(length(max = 100))]
    pub operating_hours: Option<String>,

    pub status: Option<RecordStatus>,
}
