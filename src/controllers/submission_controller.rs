use sqlx::SqlitePool;
use tracing::info;

use crate::controllers::{ensure_barangay_exists, referenced_route, unique_code};
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::submission::{
    details_to_text, CreateSubmissionRequest, ReviewSubmissionRequest, Submission,
};
use crate::repositories::document_repository::DocumentRepository;
use crate::repositories::submission_repository::{NewSubmission, SubmissionRepository};
use crate::utils::codes;
use crate::utils::errors::{validation_error, AppError};
use crate::utils::validation::non_blank;

pub struct SubmissionController {
    pool: SqlitePool,
    repository: SubmissionRepository,
}

impl SubmissionController {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: SubmissionRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: CreateSubmissionRequest,
    ) -> Result<ApiResponse<Submission>, AppError> {
        let details = details_to_text(&request.details)
            .ok_or_else(|| validation_error("details", "Submission details are required"))?;

        // A linked route decides the barangay.
        let barangay_id = match request.route_id {
            Some(route_id) => referenced_route(&self.pool, ctx, route_id).await?.barangay_id,
            None => {
                let id = ctx.require_barangay(request.barangay_id)?;
                ensure_barangay_exists(&self.pool, id).await?;
                id
            }
        };

        if let Some(document_id) = request.document_id {
            let document = DocumentRepository::new(self.pool.clone())
                .find_by_id(document_id)
                .await?
                .ok_or_else(|| validation_error("document_id", "Selected document does not exist"))?;
            ctx.ensure_barangay_access(document.barangay_id)?;
        }

        let repository = &self.repository;
        let submission_code = unique_code("submission", codes::submission_code, |code| async move {
            repository.code_exists(&code).await
        })
        .await?;

        let submission = self
            .repository
            .create(&NewSubmission {
                submission_code,
                route_id: request.route_id,
                submission_type: request.submission_type,
                submitted_by: ctx.user_id,
                barangay_id,
                details,
                document_id: request.document_id,
            })
            .await?;

        info!(
            "📥 Submission {} ({}) filed by user {}",
            submission.submission_code, submission.submission_type, ctx.user_id
        );
        let message = format!(
            "Submission {} received and pending review",
            submission.submission_code
        );
        Ok(ApiResponse::success_with_message(submission, message))
    }

    pub async fn review(
        &self,
        ctx: &RequestContext,
        id: i64,
        request: ReviewSubmissionRequest,
    ) -> Result<ApiResponse<Submission>, AppError> {
        let notes = non_blank(request.notes);
        let submission = self
            .repository
            .review(id, request.decision, notes.as_deref(), ctx.user_id)
            .await?;

        info!(
            "🗂️ Submission {} marked {} by admin {}",
            submission.submission_code, submission.status, ctx.user_id
        );
        let message = format!("Submission {} marked as {}", submission.submission_code, submission.status);
        Ok(ApiResponse::success_with_message(submission, message))
    }

    pub async fn get(&self, ctx: &RequestContext, id: i64) -> Result<Submission, AppError> {
        let submission = self.repository.get(id).await?;
        ctx.ensure_barangay_access(Some(submission.barangay_id))?;
        Ok(submission)
    }

    pub async fn list(&self, ctx: &RequestContext, filter: &ListFilter) -> Result<Page<Submission>, AppError> {
        let scope = ctx.list_scope(filter.barangay_id)?;
        self.repository.list(filter, scope).await
    }
}
