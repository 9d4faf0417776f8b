use chrono::Utc;
use sqlx::SqlitePool;

use crate::dto::pagination::{ListFilter, Page};
use crate::models::loading_zone::{CreateLoadingZoneRequest, LoadingZone};
use crate::models::status::RecordStatus;
use crate::repositories::fetch_page;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::query::FilterBuilder;

const ZONE_SELECT: &str = r#"
SELECT z.id, z.zone_name, z.location, z.barangay_id, b.name AS barangay_name,
       z.route_id, r.route_name, z.capacity, z.time_restriction, z.status,
       z.created_by, z.created_at, z.updated_at
"#;

const ZONE_FROM: &str = r#"
FROM loading_zones z
LEFT JOIN barangays b ON b.id = z.barangay_id
LEFT JOIN tricycle_routes r ON r.id = z.route_id
"#;

pub struct LoadingZoneRepository {
    pool: SqlitePool,
}

impl LoadingZoneRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        request: &CreateLoadingZoneRequest,
        barangay_id: i64,
        created_by: i64,
    ) -> Result<LoadingZone, AppError> {
        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO loading_zones (
                zone_name, location, barangay_id, route_id, capacity, time_restriction,
                status, created_by, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.zone_name.trim())
        .bind(request.location.trim())
        .bind(barangay_id)
        .bind(request.route_id)
        .bind(request.capacity.unwrap_or(0))
        .bind(&request.time_restriction)
        .bind(RecordStatus::Active)
        .bind(created_by)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get(id).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<LoadingZone>, AppError> {
        let sql = format!("{} {} WHERE z.id = ?", ZONE_SELECT, ZONE_FROM);
        let zone = sqlx::query_as::<_, LoadingZone>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(zone)
    }

    pub async fn get(&self, id: i64) -> Result<LoadingZone, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Loading zone", id))
    }

    pub async fn list(
        &self,
        filter: &ListFilter,
        barangay_id: Option<i64>,
    ) -> Result<Page<LoadingZone>, AppError> {
        let filters = FilterBuilder::new()
            .eq_int("z.barangay_id", barangay_id)
            .eq_int("z.route_id", filter.route_id)
            .eq_text("z.status", filter.status.as_deref())
            .search(&["z.zone_name", "z.location"], filter.search_term());

        let page = fetch_page(
            &self.pool,
            ZONE_SELECT,
            ZONE_FROM,
            &filters,
            "z.zone_name ASC, z.id ASC",
            filter,
        )
        .await?;
        Ok(page)
    }

    pub async fn update(&self, zone: &LoadingZone) -> Result<LoadingZone, AppError> {
        sqlx::query(
            r#"
            UPDATE loading_zones
            SET zone_name = ?, location = ?, route_id = ?, capacity = ?,
                time_restriction = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&zone.zone_name)
        .bind(&zone.location)
        .bind(zone.route_id)
        .bind(zone.capacity)
        .bind(&zone.time_restriction)
        .bind(zone.status)
        .bind(Utc::now())
        .bind(zone.id)
        .execute(&self.pool)
        .await?;

        self.get(zone.id).await
    }
}
