//! Document model
//! 
//! Metadata of a file held by the document store. Rows are written once at
//! upload time and never changed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Document {
    pub id: i64,
    pub document_code: String,
    pub document_type: String,
    pub title: String,
    pub description: Option<String>,
    pub barangay_id: Option<i64>,
    pub route_id: Option<i64>,
    pub association_id: Option<i64>,
    pub driver_id: Option<i64>,
    pub operator_id: Option<i64>,
    pub original_name: String,
    pub file_path: String,
    pub mime_type: String,
    pub file_size: i64,
    pub uploaded_by: i64,
    pub uploaded_by_name: Option<String>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Validated upload metadata, ready to insert.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub document_code: String,
    pub document_type: String,
    pub title: String,
    pub description: Option<String>,
    pub barangay_id: Option<i64>,
    pub route_id: Option<i64>,
    pub association_id: Option<i64>,
    pub driver_id: Option<i64>,
    pub operator_id: Option<i64>,
    pub original_name: String,
    pub file_path: String,
    pub mime_type: String,
    pub file_size: i64,
    pub uploaded_by: i64,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}
