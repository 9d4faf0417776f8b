use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::restriction_controller::RestrictionController;
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::restriction::{CreateRestrictionRequest, Restriction, UpdateRestrictionRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppPath, AppQuery};

pub fn create_restriction_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_restrictions).post(create_restriction))
        .route("/:id", get(get_restriction).put(update_restriction))
}

async fn list_restrictions(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppQuery(filter): AppQuery<ListFilter>,
) -> Result<Json<ApiResponse<Page<Restriction>>>, AppError> {
    let controller = RestrictionController::new(state.pool.clone());
    let page = controller.list(&ctx, &filter).await?;
    Ok(Json(ApiResponse::success(page)))
}

async fn create_restriction(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppJson(request): AppJson<CreateRestrictionRequest>,
) -> Result<Json<ApiResponse<Restriction>>, AppError> {
    let controller = RestrictionController::new(state.pool.clone());
    Ok(Json(controller.create(&ctx, request).await?))
}

async fn get_restriction(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<Restriction>>, AppError> {
    let controller = RestrictionController::new(state.pool.clone());
    let restriction = controller.get(&ctx, id).await?;
    Ok(Json(ApiResponse::success(restriction)))
}

async fn update_restriction(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<UpdateRestrictionRequest>,
) -> Result<Json<ApiResponse<Restriction>>, AppError> {
    let controller = RestrictionController::new(state.pool.clone());
    Ok(Json(controller.update(&ctx, id, request).await?))
}
