use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::RecordStatus;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Association {
    pub id: i64,
    pub association_name: String,
    pub president_name: Option<String>,
    pub contact_number: Option<String>,
    pub barangay_id: i64,
    pub barangay_name: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssociationRequest {
    #[validate(length(min = 1, max = 150, message = "Association name is required"))]
    pub association_name: String,

    #[validate(length(max = 150))]
    pub president_name: Option<String>,

    pub contact_number: Option<String>,

    pub barangay_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateAssociationRequest {
    #[validate(length(min = 1, max = 150))]
    pub association_name: Option<String>,

    #[validate(length(max = 150))]
    pub president_name: Option<String>,

    pub contact_number: Option<String>,

    pub status: Option<RecordStatus>,
}
