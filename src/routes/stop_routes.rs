use axum::{
    extract::State,
    routing::put,
    Extension, Json, Router,
};

use crate::controllers::route_stop_controller::RouteStopController;
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::route_stop::{RouteStop, UpdateRouteStopRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppPath};

pub fn create_stop_router() -> Router<AppState> {
    Router::new().route("/:id", put(update_stop).delete(delete_stop))
}

async fn update_stop(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<UpdateRouteStopRequest>,
) -> Result<Json<ApiResponse<RouteStop>>, AppError> {
    let controller = RouteStopController::new(state.pool.clone());
    Ok(Json(controller.update(&ctx, id, request).await?))
}

async fn delete_stop(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = RouteStopController::new(state.pool.clone());
    Ok(Json(controller.delete(&ctx, id).await?))
}
