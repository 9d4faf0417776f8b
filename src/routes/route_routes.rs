use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::route_controller::RouteController;
use crate::controllers::route_stop_controller::RouteStopController;
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::approval_log::ApprovalLog;
use crate::models::route::{CreateRouteRequest, Route, SubmitRouteRequest, UpdateRouteRequest};
use crate::models::route_stop::{CreateRouteStopRequest, RouteStop};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppPath, AppQuery};

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_routes).post(create_route))
        .route("/:id", get(get_route).put(update_route))
        .route("/:id/logs", get(route_logs))
        .route("/:id/submit", post(submit_route))
        .route("/:id/stops", get(list_stops).post(create_stop))
}

async fn list_routes(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppQuery(filter): AppQuery<ListFilter>,
) -> Result<Json<ApiResponse<Page<Route>>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let page = controller.list(&ctx, &filter).await?;
    Ok(Json(ApiResponse::success(page)))
}

async fn create_route(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppJson(request): AppJson<CreateRouteRequest>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    Ok(Json(controller.create(&ctx, request).await?))
}

async fn get_route(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let route = controller.get(&ctx, id).await?;
    Ok(Json(ApiResponse::success(route)))
}

async fn update_route(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<UpdateRouteRequest>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    Ok(Json(controller.update(&ctx, id, request).await?))
}

async fn route_logs(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<Vec<ApprovalLog>>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let logs = controller.logs(&ctx, id).await?;
    Ok(Json(ApiResponse::success(logs)))
}

async fn submit_route(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
    request: Option<AppJson<SubmitRouteRequest>>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let request = request.map(|AppJson(r)| r).unwrap_or_default();
    let controller = RouteController::new(state.pool.clone());
    Ok(Json(controller.submit(&ctx, id, request).await?))
}

async fn list_stops(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<Vec<RouteStop>>>, AppError> {
    let controller = RouteStopController::new(state.pool.clone());
    let stops = controller.list(&ctx, id).await?;
    Ok(Json(ApiResponse::success(stops)))
}

async fn create_stop(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<CreateRouteStopRequest>,
) -> Result<Json<ApiResponse<RouteStop>>, AppError> {
    let controller = RouteStopController::new(state.pool.clone());
    Ok(Json(controller.create(&ctx, id, request).await?))
}
