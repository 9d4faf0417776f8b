use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

use crate::controllers::{normalize_optional_time, referenced_route};
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::restriction::{CreateRestrictionRequest, Restriction, UpdateRestrictionRequest};
use crate::repositories::restriction_repository::RestrictionRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::non_blank;

pub struct RestrictionController {
    pool: SqlitePool,
    repository: RestrictionRepository,
}

impl RestrictionController {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: RestrictionRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        mut request: CreateRestrictionRequest,
    ) -> Result<ApiResponse<Restriction>, AppError> {
        request.validate()?;
        referenced_route(&self.pool, ctx, request.route_id).await?;

        request.start_time = normalize_optional_time("start_time", request.start_time.as_deref())?;
        request.end_time = normalize_optional_time("end_time", request.end_time.as_deref())?;

        let restriction = self.repository.create(&request, ctx.user_id).await?;
        info!(
            "⛔ Restriction '{}' added to route {}",
            restriction.restriction_type, restriction.route_id
        );
        Ok(ApiResponse::success_with_message(restriction, "Restriction created successfully"))
    }

    pub async fn get(&self, ctx: &RequestContext, id: i64) -> Result<Restriction, AppError> {
        let restriction = self.repository.get(id).await?;
        ctx.ensure_barangay_access(restriction.barangay_id)?;
        Ok(restriction)
    }

    pub async fn list(&self, ctx: &RequestContext, filter: &ListFilter) -> Result<Page<Restriction>, AppError> {
        let scope = ctx.list_scope(filter.barangay_id)?;
        self.repository.list(filter, scope).await
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        request: UpdateRestrictionRequest,
    ) -> Result<ApiResponse<Restriction>, AppError> {
        request.validate()?;

        let mut restriction = self.get(ctx, id).await?;
        if let Some(kind) = non_blank(request.restriction_type) {
            restriction.restriction_type = kind;
        }
        if let Some(description) = non_blank(request.description) {
            restriction.description = description;
        }
        if let Some(start) = request.start_time {
            restriction.start_time = normalize_optional_time("start_time", Some(&start))?;
        }
        if let Some(end) = request.end_time {
            restriction.end_time = normalize_optional_time("end_time", Some(&end))?;
        }
        if request.effective_date.is_some() {
            restriction.effective_date = request.effective_date;
        }
        if let Some(status) = request.status {
            restriction.status = status;
        }

        let restriction = self.repository.update(&restriction).await?;
        Ok(ApiResponse::success_with_message(restriction, "Restriction updated successfully"))
    }
}
