use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::loading_zone_controller::LoadingZoneController;
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::loading_zone::{CreateLoadingZoneRequest, LoadingZone, UpdateLoadingZoneRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppPath, AppQuery};

pub fn create_loading_zone_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_zones).post(create_zone))
        .route("/:id", get(get_zone).put(update_zone))
}

async fn list_zones(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppQuery(filter): AppQuery<ListFilter>,
) -> Result<Json<ApiResponse<Page<LoadingZone>>>, AppError> {
    let controller = LoadingZoneController::new(state.pool.clone());
    let page = controller.list(&ctx, &filter).await?;
    Ok(Json(ApiResponse::success(page)))
}

async fn create_zone(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppJson(request): AppJson<CreateLoadingZoneRequest>,
) -> Result<Json<ApiResponse<LoadingZone>>, AppError> {
    let controller = LoadingZoneController::new(state.pool.clone());
    Ok(Json(controller.create(&ctx, request).await?))
}

async fn get_zone(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<LoadingZone>>, AppError> {
    let controller = LoadingZoneController::new(state.pool.clone());
    let zone = controller.get(&ctx, id).await?;
    Ok(Json(ApiResponse::success(zone)))
}

async fn update_zone(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<UpdateLoadingZoneRequest>,
) -> Result<Json<ApiResponse<LoadingZone>>, AppError> {
    let controller = LoadingZoneController::new(state.pool.clone());
    Ok(Json(controller.update(&ctx, id, request).await?))
}
