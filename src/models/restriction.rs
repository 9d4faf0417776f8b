use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::RecordStatus;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Restriction {
    pub id: i64,
    pub route_id: i64,
    pub route_name: Option<String>,
    pub barangay_id: Option<i64>,
    pub restriction_type: String,
    pub description: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub effective_date: Option<NaiveDate>,
    pub status: RecordStatus,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRestrictionRequest {
    pub route_id: i64,

    #[validate(length(min = 1, max = 100, message = "Restriction type is required"))]
    pub restriction_type: String,

    #[validate(length(min = 1, max = 1000, message = "Description is required"))]
    pub description: String,

    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub effective_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRestrictionRequest {
    #[validate(length(min = 1, max = 100))]
    pub restriction_type: Option<String>,

    #[validate(length(min = 1, max = 1000))]
    pub description: Option<String>,

    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub effective_date: Option<NaiveDate>,
    pub status: Option<RecordStatus>,
}
