use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

use crate::controllers::{ensure_barangay_exists, referenced_route};
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::loading_zone::{CreateLoadingZoneRequest, LoadingZone, UpdateLoadingZoneRequest};
use crate::repositories::loading_zone_repository::LoadingZoneRepository;
use crate::utils::errors::{validation_error, AppError};
use crate::utils::validation::non_blank;

pub struct LoadingZoneController {
    pool: SqlitePool,
    repository: LoadingZoneRepository,
}

impl LoadingZoneController {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: LoadingZoneRepository::new(pool.clone()),
            pool,
        }
    }

    async fn check_route(&self, ctx: &RequestContext, route_id: Option<i64>, barangay_id: i64) -> Result<(), AppError> {
        if let Some(route_id) = route_id {
            let route = referenced_route(&self.pool, ctx, route_id).await?;
            if route.barangay_id != barangay_id {
                return Err(validation_error("route_id", "Route belongs to a different barangay"));
            }
        }
        Ok(())
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        mut request: CreateLoadingZoneRequest,
    ) -> Result<ApiResponse<LoadingZone>, AppError> {
        request.validate()?;

        let barangay_id = ctx.require_barangay(request.barangay_id)?;
        ensure_barangay_exists(&self.pool, barangay_id).await?;
        self.check_route(ctx, request.route_id, barangay_id).await?;
        request.time_restriction = non_blank(request.time_restriction);

        let zone = self.repository.create(&request, barangay_id, ctx.user_id).await?;
        info!("🅿️ Loading zone '{}' created", zone.zone_name);
        Ok(ApiResponse::success_with_message(zone, "Loading zone created successfully"))
    }

    pub async fn get(&self, ctx: &RequestContext, id: i64) -> Result<LoadingZone, AppError> {
        let zone = self.repository.get(id).await?;
        ctx.ensure_barangay_access(Some(zone.barangay_id))?;
        Ok(zone)
    }

    pub async fn list(&self, ctx: &RequestContext, filter: &ListFilter) -> Result<Page<LoadingZone>, AppError> {
        let scope = ctx.list_scope(filter.barangay_id)?;
        self.repository.list(filter, scope).await
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        request: UpdateLoadingZoneRequest,
    ) -> Result<ApiResponse<LoadingZone>, AppError> {
        request.validate()?;

        let mut zone = self.get(ctx, id).await?;
        if request.route_id.is_some() {
            self.check_route(ctx, request.route_id, zone.barangay_id).await?;
            zone.route_id = request.route_id;
        }
        if let Some(name) = non_blank(request.zone_name) {
            zone.zone_name = name;
        }
        if let Some(location) = non_blank(request.location) {
            zone.location = location;
        }
        if let Some(capacity) = request.capacity {
            zone.capacity = capacity;
        }
        if let Some(restriction) = request.time_restriction {
            zone.time_restriction = non_blank(Some(restriction));
        }
        if let Some(status) = request.status {
            zone.status = status;
        }

        let zone = self.repository.update(&zone).await?;
        Ok(ApiResponse::success_with_message(zone, "Loading zone updated successfully"))
    }
}
