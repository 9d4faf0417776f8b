use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::terminal_controller::TerminalController;
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::terminal::{CreateTerminalRequest, Terminal, UpdateTerminalRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppPath, AppQuery};

pub fn create_terminal_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_terminals).post(create_terminal))
        .route("/:id", get(get_terminal).put(update_terminal))
}

async fn list_terminals(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppQuery(filter): AppQuery<ListFilter>,
) -> Result<Json<ApiResponse<Page<Terminal>>>, AppError> {
    let controller = TerminalController::new(state.pool.clone());
    let page = controller.list(&ctx, &filter).await?;
    Ok(Json(ApiResponse::success(page)))
}

async fn create_terminal(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppJson(request): AppJson<CreateTerminalRequest>,
) -> Result<Json<ApiResponse<Terminal>>, AppError> {
    let controller = TerminalController::new(state.pool.clone());
    Ok(Json(controller.create(&ctx, request).await?))
}

async fn get_terminal(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<Terminal>>, AppError> {
    let controller = TerminalController::new(state.pool.clone());
    let terminal = controller.get(&ctx, id).await?;
    Ok(Json(ApiResponse::success(terminal)))
}

async fn update_terminal(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<UpdateTerminalRequest>,
) -> Result<Json<ApiResponse<Terminal>>, AppError> {
    let controller = TerminalController::new(state.pool.clone());
    Ok(Json(controller.update(&ctx, id, request).await?))
}
