use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::driver_controller::DriverController;
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::driver::{
    AssociationRecordWithAttachments, CreateDriverRequest, Driver, UpdateDriverRequest,
};
use crate::routes::UPLOAD_BODY_LIMIT;
use crate::services::multipart_form::MultipartForm;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppPath, AppQuery};

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers).post(create_driver))
        .route("/:id", get(get_driver).put(update_driver))
        .route(
            "/:id/association-records",
            get(list_association_records)
                .post(create_association_record)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}

async fn list_drivers(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppQuery(filter): AppQuery<ListFilter>,
) -> Result<Json<ApiResponse<Page<Driver>>>, AppError> {
    let controller = DriverController::new(state.pool.clone());
    let page = controller.list(&ctx, &filter).await?;
    Ok(Json(ApiResponse::success(page)))
}

async fn create_driver(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppJson(request): AppJson<CreateDriverRequest>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    let controller = DriverController::new(state.pool.clone());
    Ok(Json(controller.create(&ctx, request).await?))
}

async fn get_driver(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    let controller = DriverController::new(state.pool.clone());
    let driver = controller.get(&ctx, id).await?;
    Ok(Json(ApiResponse::success(driver)))
}

async fn update_driver(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<UpdateDriverRequest>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    let controller = DriverController::new(state.pool.clone());
    Ok(Json(controller.update(&ctx, id, request).await?))
}

async fn list_association_records(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<Vec<AssociationRecordWithAttachments>>>, AppError> {
    let controller = DriverController::new(state.pool.clone());
    let records = controller.association_records(&ctx, id).await?;
    Ok(Json(ApiResponse::success(records)))
}

/// Multipart: `association_id`, `membership_date`, optional `expiry_date`
/// and `remarks`, plus any number of `attachments` files.
async fn create_association_record(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    AppPath(id): AppPath<i64>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<AssociationRecordWithAttachments>>, AppError> {
    let form = MultipartForm::from_multipart(multipart).await?;
    let controller = DriverController::new(state.pool.clone());
    Ok(Json(
        controller
            .create_association_record(&ctx, &state.storage, id, form)
            .await?,
    ))
}
