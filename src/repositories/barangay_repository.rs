use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::barangay::Barangay;
use crate::utils::errors::{conflict_error, unique_violation, AppError};

pub struct BarangayRepository {
    pool: SqlitePool,
}

impl BarangayRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str, municipality: Option<&str>) -> Result<Barangay, AppError> {
        let barangay = sqlx::query_as::<_, Barangay>(
            r#"
            INSERT INTO barangays (name, municipality, created_at)
            VALUES (?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(municipality)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, || conflict_error("Barangay", "name", name)))?;

        Ok(barangay)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Barangay>, AppError> {
        let barangay = sqlx::query_as::<_, Barangay>("SELECT * FROM barangays WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(barangay)
    }

    pub async fn exists(&self, id: i64) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM barangays WHERE id = ?)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn list(&self) -> Result<Vec<Barangay>, AppError> {
        let barangays = sqlx::query_as::<_, Barangay>("SELECT * FROM barangays ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(barangays)
    }
}
