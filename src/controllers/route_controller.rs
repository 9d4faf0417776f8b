//! Route controller
//! 
//! Route registration, edits and every status change. Status changes go
//! through the workflow transition table; nothing here writes a status
//! directly.

use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

use crate::controllers::{ensure_barangay_exists, normalize_time, unique_code};
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::approval_log::ApprovalLog;
use crate::models::route::{
    CreateRouteRequest, Route, RouteActionRequest, SubmitRouteRequest, UpdateRouteRequest,
    WorkflowEvent,
};
use crate::repositories::approval_log_repository::ApprovalLogRepository;
use crate::repositories::route_repository::{NewRoute, RouteDetails, RouteRepository};
use crate::utils::codes;
use crate::utils::errors::{conflict_error, validation_error, AppError};
use crate::utils::validation::{non_blank, validate_route_code};

pub struct RouteController {
    pool: SqlitePool,
    repository: RouteRepository,
}

impl RouteController {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: RouteRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: CreateRouteRequest,
    ) -> Result<ApiResponse<Route>, AppError> {
        request.validate()?;

        let barangay_id = ctx.require_barangay(request.barangay_id)?;
        ensure_barangay_exists(&self.pool, barangay_id).await?;

        let operating_start = normalize_time("operating_start", &request.operating_start)?;
        let operating_end = normalize_time("operating_end", &request.operating_end)?;
        let route_code = self.resolve_code(request.route_code).await?;

        let route = self
            .repository
            .create(&NewRoute {
                route_code,
                route_name: request.route_name.trim().to_string(),
                description: non_blank(request.description),
                start_point: request.start_point.trim().to_string(),
                end_point: request.end_point.trim().to_string(),
                barangay_id,
                distance_km: request.distance_km,
                estimated_minutes: request.estimated_minutes,
                regular_fare: request.regular_fare,
                special_fare: request.special_fare,
                operating_start,
                operating_end,
                created_by: ctx.user_id,
            })
            .await?;

        info!("🛺 Route {} created by user {}", route.route_code, ctx.user_id);
        Ok(ApiResponse::success_with_message(
            route,
            "Route created successfully and is now under review",
        ))
    }

    /// Use the supplied code, or generate one that is not taken yet.
    async fn resolve_code(&self, requested: Option<String>) -> Result<String, AppError> {
        if let Some(code) = non_blank(requested).map(|c| c.to_uppercase()) {
            validate_route_code(&code).map_err(|_| {
                validation_error(
                    "route_code",
                    "Route code may only contain letters, digits and dashes (3 to 30 characters)",
                )
            })?;
            if self.repository.code_exists(&code).await? {
                return Err(conflict_error("Route", "code", &code));
            }
            return Ok(code);
        }

        let repository = &self.repository;
        unique_code("route", codes::route_code, |code| async move {
            repository.code_exists(&code).await
        })
        .await
    }

    pub async fn get(&self, ctx: &RequestContext, id: i64) -> Result<Route, AppError> {
        let route = self.repository.get(id).await?;
        ctx.ensure_barangay_access(Some(route.barangay_id))?;
        Ok(route)
    }

    pub async fn list(&self, ctx: &RequestContext, filter: &ListFilter) -> Result<Page<Route>, AppError> {
        let scope = ctx.list_scope(filter.barangay_id)?;
        self.repository.list(filter, scope).await
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        request: UpdateRouteRequest,
    ) -> Result<ApiResponse<Route>, AppError> {
        request.validate()?;

        let route = self.get(ctx, id).await?;
        if !ctx.is_admin() && route.status.is_locked_for_staff() {
            return Err(AppError::Forbidden(format!(
                "Route {} is {} and can only be changed by an administrator",
                route.route_code, route.status
            )));
        }

        let mut details = RouteDetails::from(&route);
        if let Some(name) = non_blank(request.route_name) {
            details.route_name = name;
        }
        if let Some(description) = request.description {
            details.description = non_blank(Some(description));
        }
        if let Some(start) = non_blank(request.start_point) {
            details.start_point = start;
        }
        if let Some(end) = non_blank(request.end_point) {
            details.end_point = end;
        }
        if let Some(distance) = request.distance_km {
            details.distance_km = distance;
        }
        if let Some(minutes) = request.estimated_minutes {
            details.estimated_minutes = Some(minutes);
        }
        if let Some(fare) = request.regular_fare {
            details.regular_fare = fare;
        }
        if let Some(fare) = request.special_fare {
            details.special_fare = Some(fare);
        }
        if let Some(start) = request.operating_start.as_deref() {
            details.operating_start = normalize_time("operating_start", start)?;
        }
        if let Some(end) = request.operating_end.as_deref() {
            details.operating_end = normalize_time("operating_end", end)?;
        }

        let route = self.repository.update_details(id, &details).await?;
        info!("✏️ Route {} updated by user {}", route.route_code, ctx.user_id);
        Ok(ApiResponse::success_with_message(route, "Route updated successfully"))
    }

    pub async fn logs(&self, ctx: &RequestContext, id: i64) -> Result<Vec<ApprovalLog>, AppError> {
        self.get(ctx, id).await?;
        ApprovalLogRepository::new(self.pool.clone())
            .list_for_route(id)
            .await
    }

    /// Staff hand a draft, returned or rejected route to the administrators.
    pub async fn submit(
        &self,
        ctx: &RequestContext,
        id: i64,
        request: SubmitRouteRequest,
    ) -> Result<ApiResponse<Route>, AppError> {
        self.get(ctx, id).await?;

        let remarks = non_blank(request.remarks);
        let route = self
            .repository
            .transition(id, WorkflowEvent::Submit, ctx.user_id, remarks.as_deref())
            .await?;

        info!("📨 Route {} submitted for approval", route.route_code);
        Ok(ApiResponse::success_with_message(route, "Route submitted for approval"))
    }

    /// Administrator approve / reject / suspend / activate.
    pub async fn act(
        &self,
        ctx: &RequestContext,
        id: i64,
        request: RouteActionRequest,
    ) -> Result<ApiResponse<Route>, AppError> {
        let remarks = non_blank(request.remarks);
        let route = self
            .repository
            .transition(id, request.action.into(), ctx.user_id, remarks.as_deref())
            .await?;

        info!(
            "✅ Route {} -> {} / {} by admin {}",
            route.route_code, route.status, route.submission_status, ctx.user_id
        );
        Ok(ApiResponse::success_with_message(route, request.action.success_message()))
    }
}
