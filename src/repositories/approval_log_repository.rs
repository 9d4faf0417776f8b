use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::models::approval_log::ApprovalLog;
use crate::models::route::LogAction;
use crate::utils::errors::AppError;

/// Append one row to a route's approval log. Blank remarks fall back to the
/// action's default text.
pub async fn append(
    conn: &mut SqliteConnection,
    route_id: i64,
    action: LogAction,
    remarks: Option<&str>,
    performed_by: i64,
) -> Result<i64, sqlx::Error> {
    let remarks = remarks
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| action.default_remarks());

    let result = sqlx::query(
        r#"
        INSERT INTO route_approval_logs (route_id, action, remarks, performed_by, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(route_id)
    .bind(action)
    .bind(remarks)
    .bind(performed_by)
    .bind(Utc::now())
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

pub struct ApprovalLogRepository {
    pool: SqlitePool,
}

impl ApprovalLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Newest first.
    pub async fn list_for_route(&self, route_id: i64) -> Result<Vec<ApprovalLog>, AppError> {
        let logs = sqlx::query_as::<_, ApprovalLog>(
            r#"
            SELECT l.id, l.route_id, l.action, l.remarks, l.performed_by,
                   u.full_name AS performed_by_name, l.created_at
            FROM route_approval_logs l
            LEFT JOIN users u ON u.id = l.performed_by
            WHERE l.route_id = ?
            ORDER BY l.created_at DESC, l.id DESC
            "#,
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}
