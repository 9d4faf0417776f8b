//! Driver model
//! 
//! Drivers, and their association membership records with attached files.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::RecordStatus;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Driver {
    pub id: i64,
    pub full_name: String,
    pub license_number: String,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub barangay_id: i64,
    pub barangay_name: Option<String>,
    pub operator_id: Option<i64>,
    pub operator_name: Option<String>,
    pub association_id: Option<i64>,
    pub association_name: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    #[validate(length(min = 1, max = 150, message = "Driver name is required"))]
    pub full_name: String,

    #[validate(length(min = 1, max = 50, message = "License number is required"))]
    pub license_number: String,

    pub contact_number: Option<String>,

    #[validate(length(max = 255))]
    pub address: Option<String>,

    pub barangay_id: Option<i64>,
    pub operator_id: Option<i64>,
    pub association_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    #[validate(length(min = 1, max = 150))]
    pub full_name: Option<String>,

    pub contact_number: Option<String>,

    #[validate(length(max = 255))]
    pub address: Option<String>,

    pub operator_id: Option<i64>,
    pub association_id: Option<i64>,
    pub status: Option<RecordStatus>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AssociationRecord {
    pub id: i64,
    pub driver_id: i64,
    pub association_id: i64,
    pub association_name: Option<String>,
    pub membership_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub recorded_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DriverAttachment {
    pub id: i64,
    pub record_id: i64,
    pub original_name: String,
    pub file_path: String,
    pub mime_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssociationRecordWithAttachments {
    #[serde(flatten)]
    pub record: AssociationRecord,
    pub attachments: Vec<DriverAttachment>,
}

#[derive(Debug, Clone)]
pub struct NewAssociationRecord {
    pub driver_id: i64,
    pub association_id: i64,
    pub membership_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub recorded_by: i64,
}

#[derive(Debug, Clone)]
pub struct NewDriverAttachment {
    pub original_name: String,
    pub file_path: String,
    pub mime_type: String,
    pub file_size: i64,
}
