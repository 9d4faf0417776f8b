//! Submission repository
//! 
//! Intake and review both touch the linked route; each runs as a single
//! transaction so a submission never exists without its route update.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::dto::pagination::{ListFilter, Page};
use crate::models::route::{RouteStatus, WorkflowEvent};
use crate::models::submission::{ReviewDecision, ReviewStatus, Submission, SubmissionType};
use crate::repositories::{begin_write, fetch_page};
use crate::repositories::route_repository::{apply_event, load_state};
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::query::FilterBuilder;

const SUBMISSION_SELECT: &str = r#"
SELECT s.id, s.submission_code, s.route_id, r.route_name, s.submission_type,
       s.submitted_by, u.full_name AS submitted_by_name, s.barangay_id,
       b.name AS barangay_name, s.details, s.document_id, s.status,
       s.reviewed_by, v.full_name AS reviewed_by_name, s.reviewed_at,
       s.review_notes, s.created_at
"#;

const SUBMISSION_FROM: &str = r#"
FROM route_submissions s
LEFT JOIN tricycle_routes r ON r.id = s.route_id
LEFT JOIN users u ON u.id = s.submitted_by
LEFT JOIN barangays b ON b.id = s.barangay_id
LEFT JOIN users v ON v.id = s.reviewed_by
"#;

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub submission_code: String,
    pub route_id: Option<i64>,
    pub submission_type: SubmissionType,
    pub submitted_by: i64,
    pub barangay_id: i64,
    pub details: String,
    pub document_id: Option<i64>,
}

pub struct SubmissionRepository {
    pool: SqlitePool,
}

impl SubmissionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a submission as `Pending`. A linked route that may be submitted
    /// moves to `Submitted` / `Under Review` in the same transaction; a route
    /// already waiting or approved keeps its state.
    pub async fn create(&self, submission: &NewSubmission) -> Result<Submission, AppError> {
        let mut tx = begin_write(&self.pool).await?;

        let id = sqlx::query(
            r#"
            INSERT INTO route_submissions (
                submission_code, route_id, submission_type, submitted_by, barangay_id,
                details, document_id, status, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&submission.submission_code)
        .bind(submission.route_id)
        .bind(submission.submission_type)
        .bind(submission.submitted_by)
        .bind(submission.barangay_id)
        .bind(&submission.details)
        .bind(submission.document_id)
        .bind(ReviewStatus::Pending)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        if let Some(route_id) = submission.route_id {
            let (status, submission_status) = load_state(&mut *tx, route_id)
                .await?
                .ok_or_else(|| not_found_error("Route", route_id))?;

            if WorkflowEvent::Submit.transition(status, submission_status).is_ok() {
                let remarks = format!("Submitted with {}", submission.submission_code);
                apply_event(
                    &mut *tx,
                    route_id,
                    WorkflowEvent::Submit,
                    submission.submitted_by,
                    Some(&remarks),
                )
                .await?;
            } else {
                debug!(
                    "Route {} left as {} / {} by submission {}",
                    route_id, status, submission_status, submission.submission_code
                );
            }
        }

        tx.commit().await?;
        self.get(id).await
    }

    /// Close a pending submission. For route-driving submission types whose
    /// route is still under review, the matching route transition and its
    /// approval log entry share the transaction.
    pub async fn review(
        &self,
        id: i64,
        decision: ReviewDecision,
        notes: Option<&str>,
        reviewed_by: i64,
    ) -> Result<Submission, AppError> {
        let mut tx = begin_write(&self.pool).await?;

        let current: Option<(ReviewStatus, SubmissionType, Option<i64>, String)> = sqlx::query_as(
            "SELECT status, submission_type, route_id, submission_code FROM route_submissions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let (status, submission_type, route_id, code) =
            current.ok_or_else(|| not_found_error("Submission", id))?;

        if status != ReviewStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Submission {} was already reviewed ({})",
                code, status
            )));
        }

        sqlx::query(
            r#"
            UPDATE route_submissions
            SET status = ?, reviewed_by = ?, reviewed_at = ?, review_notes = ?
            WHERE id = ?
            "#,
        )
        .bind(decision.review_status())
        .bind(reviewed_by)
        .bind(Utc::now())
        .bind(notes)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if let Some(route_id) = route_id.filter(|_| submission_type.drives_route_status()) {
            let state = load_state(&mut *tx, route_id).await?;
            if let Some((RouteStatus::UnderReview, _)) = state {
                let event = match decision {
                    ReviewDecision::Approve => WorkflowEvent::Approve,
                    ReviewDecision::Reject => WorkflowEvent::Reject,
                    ReviewDecision::Return => WorkflowEvent::ReturnForRevision,
                };
                apply_event(&mut *tx, route_id, event, reviewed_by, notes).await?;
            }
        }

        tx.commit().await?;
        self.get(id).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Submission>, AppError> {
        let sql = format!("{} {} WHERE s.id = ?", SUBMISSION_SELECT, SUBMISSION_FROM);
        let submission = sqlx::query_as::<_, Submission>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(submission)
    }

    pub async fn get(&self, id: i64) -> Result<Submission, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Submission", id))
    }

    pub async fn code_exists(&self, submission_code: &str) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM route_submissions WHERE submission_code = ?)",
        )
        .bind(submission_code)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn list(
        &self,
        filter: &ListFilter,
        barangay_id: Option<i64>,
    ) -> Result<Page<Submission>, AppError> {
        let filters = FilterBuilder::new()
            .eq_int("s.barangay_id", barangay_id)
            .eq_int("s.route_id", filter.route_id)
            .eq_text("s.status", filter.status.as_deref())
            .eq_text("s.submission_type", filter.kind.as_deref())
            .search(&["s.submission_code", "s.details", "r.route_name"], filter.search_term());

        let page = fetch_page(
            &self.pool,
            SUBMISSION_SELECT,
            SUBMISSION_FROM,
            &filters,
            "s.created_at DESC, s.id DESC",
            filter,
        )
        .await?;
        Ok(page)
    }
}
