use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::operator_controller::OperatorController;
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::operator::{CreateOperatorRequest, Operator, UpdateOperatorRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppPath, AppQuery};

pub fn create_operator_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_operators).post(create_operator))
        .route("/:id", get(get_operator).put(update_operator))
}

async fn list_operators(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppQuery(filter): AppQuery<ListFilter>,
) -> Result<Json<ApiResponse<Page<Operator>>>, AppError> {
    let controller = OperatorController::new(state.pool.clone());
    let page = controller.list(&ctx, &filter).await?;
    Ok(Json(ApiResponse::success(page)))
}

async fn create_operator(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppJson(request): AppJson<CreateOperatorRequest>,
) -> Result<Json<ApiResponse<Operator>>, AppError> {
    let controller = OperatorController::new(state.pool.clone());
    Ok(Json(controller.create(&ctx, request).await?))
}

async fn get_operator(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<Operator>>, AppError> {
    let controller = OperatorController::new(state.pool.clone());
    let operator = controller.get(&ctx, id).await?;
    Ok(Json(ApiResponse::success(operator)))
}

async fn update_operator(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<UpdateOperatorRequest>,
) -> Result<Json<ApiResponse<Operator>>, AppError> {
    let controller = OperatorController::new(state.pool.clone());
    Ok(Json(controller.update(&ctx, id, request).await?))
}
