//! Approval log model
//! 
//! Append-only audit trail of every status-changing action on a route.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::route::LogAction;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApprovalLog {
    pub id: i64,
    pub route_id: i64,
    pub action: LogAction,
    pub remarks: Option<String>,
    pub performed_by: i64,
    pub performed_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
