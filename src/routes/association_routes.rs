use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::association_controller::AssociationController;
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::association::{CreateAssociationRequest, Association, UpdateAssociationRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppPath, AppQuery};

pub fn create_association_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_associations).post(create_association))
        .route("/:id", get(get_association).put(update_association))
}

async fn list_associations(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppQuery(filter): AppQuery<ListFilter>,
) -> Result<Json<ApiResponse<Page<Association>>>, AppError> {
    let controller = AssociationController::new(state.pool.clone());
    let page = controller.list(&ctx, &filter).await?;
    Ok(Json(ApiResponse::success(page)))
}

async fn create_association(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppJson(request): AppJson<CreateAssociationRequest>,
) -> Result<Json<ApiResponse<Association>>, AppError> {
    let controller = AssociationController::new(state.pool.clone());
    Ok(Json(controller.create(&ctx, request).await?))
}

async fn get_association(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<Association>>, AppError> {
    let controller = AssociationController::new(state.pool.clone());
    let association = controller.get(&ctx, id).await?;
    Ok(Json(ApiResponse::success(association)))
}

async fn update_association(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<UpdateAssociationRequest>,
) -> Result<Json<ApiResponse<Association>>, AppError> {
    let controller = AssociationController::new(state.pool.clone());
    Ok(Json(controller.update(&ctx, id, request).await?))
}
