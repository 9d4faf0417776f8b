use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

use crate::dto::ApiResponse;
use crate::models::barangay::{Barangay, CreateBarangayRequest};
use crate::repositories::barangay_repository::BarangayRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::non_blank;

pub struct BarangayController {
    repository: BarangayRepository,
}

impl BarangayController {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: BarangayRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateBarangayRequest) -> Result<ApiResponse<Barangay>, AppError> {
        request.validate()?;

        let municipality = non_blank(request.municipality);
        let barangay = self
            .repository
            .create(request.name.trim(), municipality.as_deref())
            .await?;

        info!("🏘️ Barangay '{}' created", barangay.name);
        Ok(ApiResponse::success_with_message(barangay, "Barangay created successfully"))
    }

    pub async fn list(&self) -> Result<Vec<Barangay>, AppError> {
        self.repository.list().await
    }
}
