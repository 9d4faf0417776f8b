use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::route::Route;
use crate::models::route_stop::{CreateRouteStopRequest, RouteStop, UpdateRouteStopRequest};
use crate::repositories::route_repository::RouteRepository;
use crate::repositories::route_stop_repository::RouteStopRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::non_blank;

pub struct RouteStopController {
    routes: RouteRepository,
    repository: RouteStopRepository,
}

impl RouteStopController {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            routes: RouteRepository::new(pool.clone()),
            repository: RouteStopRepository::new(pool),
        }
    }

    async fn visible_route(&self, ctx: &RequestContext, route_id: i64) -> Result<Route, AppError> {
        let route = self.routes.get(route_id).await?;
        ctx.ensure_barangay_access(Some(route.barangay_id))?;
        Ok(route)
    }

    /// Stops follow the same edit lock as the route itself.
    async fn editable_route(&self, ctx: &RequestContext, route_id: i64) -> Result<Route, AppError> {
        let route = self.visible_route(ctx, route_id).await?;
        if !ctx.is_admin() && route.status.is_locked_for_staff() {
            return Err(AppError::Forbidden(format!(
                "Stops of route {} can only be changed by an administrator while it is {}",
                route.route_code, route.status
            )));
        }
        Ok(route)
    }

    pub async fn list(&self, ctx: &RequestContext, route_id: i64) -> Result<Vec<RouteStop>, AppError> {
        self.visible_route(ctx, route_id).await?;
        self.repository.list_for_route(route_id).await
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        route_id: i64,
        request: CreateRouteStopRequest,
    ) -> Result<ApiResponse<RouteStop>, AppError> {
        request.validate()?;
        self.editable_route(ctx, route_id).await?;

        let landmark = non_blank(request.landmark);
        let stop = self
            .repository
            .create(route_id, request.stop_name.trim(), request.stop_order, landmark.as_deref())
            .await?;

        info!("📍 Stop {} added to route {}", stop.stop_order, route_id);
        Ok(ApiResponse::success_with_message(stop, "Route stop added successfully"))
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        request: UpdateRouteStopRequest,
    ) -> Result<ApiResponse<RouteStop>, AppError> {
        request.validate()?;

        let mut stop = self.repository.get(id).await?;
        self.editable_route(ctx, stop.route_id).await?;

        if let Some(name) = non_blank(request.stop_name) {
            stop.stop_name = name;
        }
        if let Some(order) = request.stop_order {
            stop.stop_order = order;
        }
        if let Some(landmark) = request.landmark {
            stop.landmark = non_blank(Some(landmark));
        }

        let stop = self.repository.update(&stop).await?;
        Ok(ApiResponse::success_with_message(stop, "Route stop updated successfully"))
    }

    pub async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<ApiResponse<()>, AppError> {
        let stop = self.repository.get(id).await?;
        self.editable_route(ctx, stop.route_id).await?;

        self.repository.delete(id).await?;
        info!("🗑️ Stop {} removed from route {}", stop.stop_order, stop.route_id);
        Ok(ApiResponse::message("Route stop deleted successfully"))
    }
}
