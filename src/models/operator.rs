use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::RecordStatus;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Operator {
    pub id: i64,
    pub operator_name: String,
    pub franchise_number: String,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub barangay_id: i64,
    pub barangay_name: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOperatorRequest {
    #[validate(length(min = 1, max = 150, message = "Operator name is required"))]
    pub operator_name: String,

    #[validate(length(min = 1, max = 50, message = "Franchise number is required"))]
    pub franchise_number: String,

    pub contact_number: Option<String>,

    #[validate(length(max = 255))]
    pub address: Option<String>,

    pub barangay_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateOperatorRequest {
    #[validate(length(min = 1, max = 150))]
    pub operator_name: Option<String>,

    pub contact_number: Option<String>,

    #[validate(length(max = 255))]
    pub address: Option<String>,

    pub status: Option<RecordStatus>,
}
