use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::submission_controller::SubmissionController;
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::submission::{CreateSubmissionRequest, Submission};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppPath, AppQuery};

pub fn create_submission_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_submissions).post(create_submission))
        .route("/:id", get(get_submission))
}

async fn list_submissions(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppQuery(filter): AppQuery<ListFilter>,
) -> Result<Json<ApiResponse<Page<Submission>>>, AppError> {
    let controller = SubmissionController::new(state.pool.clone());
    let page = controller.list(&ctx, &filter).await?;
    Ok(Json(ApiResponse::success(page)))
}

async fn create_submission(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppJson(request): AppJson<CreateSubmissionRequest>,
) -> Result<Json<ApiResponse<Submission>>, AppError> {
    let controller = SubmissionController::new(state.pool.clone());
    Ok(Json(controller.create(&ctx, request).await?))
}

async fn get_submission(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<Submission>>, AppError> {
    let controller = SubmissionController::new(state.pool.clone());
    let submission = controller.get(&ctx, id).await?;
    Ok(Json(ApiResponse::success(submission)))
}
