use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::barangay_controller::BarangayController;
use crate::dto::ApiResponse;
use crate::models::barangay::Barangay;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_barangay_router() -> Router<AppState> {
    Router::new().route("/", get(list_barangays))
}

async fn list_barangays(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Barangay>>>, AppError> {
    let controller = BarangayController::new(state.pool.clone());
    let barangays = controller.list().await?;
    Ok(Json(ApiResponse::success(barangays)))
}
