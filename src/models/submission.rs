//! Submission model
//! 
//! A staff-initiated request waiting for an administrator's review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum SubmissionType {
    #[serde(rename = "New Route")]
    #[sqlx(rename = "New Route")]
    NewRoute,
    #[serde(rename = "Route Update")]
    #[sqlx(rename = "Route Update")]
    RouteUpdate,
    #[serde(rename = "Terminal Update")]
    #[sqlx(rename = "Terminal Update")]
    TerminalUpdate,
    #[serde(rename = "Restriction Update")]
    #[sqlx(rename = "Restriction Update")]
    RestrictionUpdate,
    #[serde(rename = "Document Upload")]
    #[sqlx(rename = "Document Upload")]
    DocumentUpload,
}

impl SubmissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionType::NewRoute => "New Route",
            SubmissionType::RouteUpdate => "Route Update",
            SubmissionType::TerminalUpdate => "Terminal Update",
            SubmissionType::RestrictionUpdate => "Restriction Update",
            SubmissionType::DocumentUpload => "Document Upload",
        }
    }

    /// Whether reviewing this submission also moves the linked route.
    pub fn drives_route_status(&self) -> bool {
        matches!(self, SubmissionType::NewRoute | SubmissionType::RouteUpdate)
    }
}

impl fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "New Route" => Ok(SubmissionType::NewRoute),
            "Route Update" => Ok(SubmissionType::RouteUpdate),
            "Terminal Update" => Ok(SubmissionType::TerminalUpdate),
            "Restriction Update" => Ok(SubmissionType::RestrictionUpdate),
            "Document Upload" => Ok(SubmissionType::DocumentUpload),
            other => Err(format!("Unknown submission type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
    #[serde(rename = "Returned for Revision")]
    #[sqlx(rename = "Returned for Revision")]
    ReturnedForRevision,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "Pending",
            ReviewStatus::Approved => "Approved",
            ReviewStatus::Rejected => "Rejected",
            ReviewStatus::ReturnedForRevision => "Returned for Revision",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approve,
    Reject,
    Return,
}

impl ReviewDecision {
    pub fn review_status(&self) -> ReviewStatus {
        match self {
            ReviewDecision::Approve => ReviewStatus::Approved,
            ReviewDecision::Reject => ReviewStatus::Rejected,
            ReviewDecision::Return => ReviewStatus::ReturnedForRevision,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Submission {
    pub id: i64,
    pub submission_code: String,
    pub route_id: Option<i64>,
    pub route_name: Option<String>,
    pub submission_type: SubmissionType,
    pub submitted_by: i64,
    pub submitted_by_name: Option<String>,
    pub barangay_id: i64,
    pub barangay_name: Option<String>,
    pub details: String,
    pub document_id: Option<i64>,
    pub status: ReviewStatus,
    pub reviewed_by: Option<i64>,
    pub reviewed_by_name: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubmissionRequest {
    pub submission_type: SubmissionType,
    pub route_id: Option<i64>,
    /// Only read for administrators; staff always file for their barangay.
    pub barangay_id: Option<i64>,
    /// Free text, or a JSON object that is stored serialized.
    #[serde(default)]
    pub details: serde_json::Value,
    pub document_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewSubmissionRequest {
    pub decision: ReviewDecision,
    pub notes: Option<String>,
}

/// Normalize the `details` payload to the stored text form.
pub fn details_to_text(details: &serde_json::Value) -> Option<String> {
    let text = match details {
        serde_json::Value::Null => return None,
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Object(map) if map.is_empty() => return None,
        serde_json::Value::Array(items) if items.is_empty() => return None,
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_details_to_text() {
        assert_eq!(details_to_text(&json!("  new fare matrix ")).as_deref(), Some("new fare matrix"));
        assert_eq!(
            details_to_text(&json!({"regular_fare": 15})).as_deref(),
            Some(r#"{"regular_fare":15}"#)
        );
        assert_eq!(details_to_text(&json!("   ")), None);
        assert_eq!(details_to_text(&json!(null)), None);
        assert_eq!(details_to_text(&json!({})), None);
    }

    #[test]
    fn test_submission_type_round_trips_labels() {
        let parsed: SubmissionType = serde_json::from_str(r#""Terminal Update""#).unwrap();
        assert_eq!(parsed, SubmissionType::TerminalUpdate);
        assert_eq!("Document Upload".parse::<SubmissionType>().unwrap(), SubmissionType::DocumentUpload);
        assert!(SubmissionType::NewRoute.drives_route_status());
        assert!(!SubmissionType::DocumentUpload.drives_route_status());
    }
}
