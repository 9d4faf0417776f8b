use chrono::Utc;
use sqlx::SqlitePool;

use crate::dto::pagination::{ListFilter, Page};
use crate::models::restriction::{CreateRestrictionRequest, Restriction};
use crate::models::status::RecordStatus;
use crate::repositories::fetch_page;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::query::FilterBuilder;

// Restrictions are scoped to a barangay through their route.
const RESTRICTION_SELECT: &str = r#"
SELECT x.id, x.route_id, r.route_name, r.barangay_id, x.restriction_type, x.description,
       x.start_time, x.end_time, x.effective_date, x.status, x.created_by,
       x.created_at, x.updated_at
"#;

const RESTRICTION_FROM: &str = r#"
FROM route_restrictions x
LEFT JOIN tricycle_routes r ON r.id = x.route_id
"#;

pub struct RestrictionRepository {
    pool: SqlitePool,
}

impl RestrictionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        request: &CreateRestrictionRequest,
        created_by: i64,
    ) -> Result<Restriction, AppError> {
        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO route_restrictions (
                route_id, restriction_type, description, start_time, end_time,
                effective_date, status, created_by, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.route_id)
        .bind(request.restriction_type.trim())
        .bind(request.description.trim())
        .bind(&request.start_time)
        .bind(&request.end_time)
        .bind(request.effective_date)
        .bind(RecordStatus::Active)
        .bind(created_by)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get(id).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Restriction>, AppError> {
        let sql = format!("{} {} WHERE x.id = ?", RESTRICTION_SELECT, RESTRICTION_FROM);
        let restriction = sqlx::query_as::<_, Restriction>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(restriction)
    }

    pub async fn get(&self, id: i64) -> Result<Restriction, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Restriction", id))
    }

    pub async fn list(
        &self,
        filter: &ListFilter,
        barangay_id: Option<i64>,
    ) -> Result<Page<Restriction>, AppError> {
        let filters = FilterBuilder::new()
            .eq_int("r.barangay_id", barangay_id)
            .eq_int("x.route_id", filter.route_id)
            .eq_text("x.status", filter.status.as_deref())
            .eq_text("x.restriction_type", filter.kind.as_deref())
            .search(
                &["x.restriction_type", "x.description", "r.route_name"],
                filter.search_term(),
            );

        let page = fetch_page(
            &self.pool,
            RESTRICTION_SELECT,
            RESTRICTION_FROM,
            &filters,
            "x.created_at DESC, x.id DESC",
            filter,
        )
        .await?;
        Ok(page)
    }

    pub async fn update(&self, restriction: &Restriction) -> Result<Restriction, AppError> {
        sqlx::query(
            r#"
            UPDATE route_restrictions
            SET restriction_type = ?, description = ?, start_time = ?, end_time = ?,
                effective_date = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&restriction.restriction_type)
        .bind(&restriction.description)
        .bind(&restriction.start_time)
        .bind(&restriction.end_time)
        .bind(restriction.effective_date)
        .bind(restriction.status)
        .bind(Utc::now())
        .bind(restriction.id)
        .execute(&self.pool)
        .await?;

        self.get(restriction.id).await
    }
}
