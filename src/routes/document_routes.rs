use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::document_controller::DocumentController;
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::document::Document;
use crate::routes::UPLOAD_BODY_LIMIT;
use crate::services::multipart_form::MultipartForm;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppPath, AppQuery};

pub fn create_document_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_documents)
                .post(upload_document)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/:id", get(get_document))
}

async fn list_documents(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppQuery(filter): AppQuery<ListFilter>,
) -> Result<Json<ApiResponse<Page<Document>>>, AppError> {
    let controller = DocumentController::new(state.pool.clone());
    let page = controller.list(&ctx, &filter).await?;
    Ok(Json(ApiResponse::success(page)))
}

async fn upload_document(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<Document>>, AppError> {
    let form = MultipartForm::from_multipart(multipart).await?;
    let controller = DocumentController::new(state.pool.clone());
    Ok(Json(controller.upload(&ctx, &state.storage, form).await?))
}

async fn get_document(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<Document>>, AppError> {
    let controller = DocumentController::new(state.pool.clone());
    let document = controller.get(&ctx, id).await?;
    Ok(Json(ApiResponse::success(document)))
}
