//! Administrator-only routes
//! 
//! Mounted behind `admin_only_middleware`: route workflow actions,
//! submission review and account management.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::barangay_controller::BarangayController;
use crate::controllers::route_controller::RouteController;
use crate::controllers::submission_controller::SubmissionController;
use crate::controllers::user_controller::UserController;
use crate::dto::auth_dto::CreateUserRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::barangay::{Barangay, CreateBarangayRequest};
use crate::models::route::{Route, RouteActionRequest};
use crate::models::submission::{ReviewSubmissionRequest, Submission};
use crate::models::user::UserResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppPath};

pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/routes/:id/actions", post(route_action))
        .route("/submissions/:id/review", post(review_submission))
        .route("/barangays", post(create_barangay))
        .route("/users", get(list_users).post(create_user))
}

async fn route_action(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<RouteActionRequest>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    Ok(Json(controller.act(&ctx, id, request).await?))
}

async fn review_submission(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<ReviewSubmissionRequest>,
) -> Result<Json<ApiResponse<Submission>>, AppError> {
    let controller = SubmissionController::new(state.pool.clone());
    Ok(Json(controller.review(&ctx, id, request).await?))
}

async fn create_barangay(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateBarangayRequest>,
) -> Result<Json<ApiResponse<Barangay>>, AppError> {
    let controller = BarangayController::new(state.pool.clone());
    Ok(Json(controller.create(request).await?))
}

async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let controller = UserController::new(state.pool.clone(), state.config.bcrypt_cost);
    let users = controller.list().await?;
    Ok(Json(ApiResponse::success(users)))
}

async fn create_user(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone(), state.config.bcrypt_cost);
    Ok(Json(controller.create(request).await?))
}
