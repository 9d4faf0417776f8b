use chrono::Utc;
use sqlx::SqlitePool;

use crate::dto::pagination::{ListFilter, Page};
use crate::models::association::{Association, CreateAssociationRequest};
use crate::models::status::RecordStatus;
use crate::repositories::fetch_page;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::query::FilterBuilder;

const ASSOCIATION_SELECT: &str = r#"
SELECT a.id, a.association_name, a.president_name, a.contact_number, a.barangay_id,
       b.name AS barangay_name, a.status, a.created_at, a.updated_at
"#;

const ASSOCIATION_FROM: &str = r#"
FROM tricycle_associations a
LEFT JOIN barangays b ON b.id = a.barangay_id
"#;

pub struct AssociationRepository {
    pool: SqlitePool,
}

impl AssociationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        request: &CreateAssociationRequest,
        barangay_id: i64,
    ) -> Result<Association, AppError> {
        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO tricycle_associations (
                association_name, president_name, contact_number, barangay_id,
                status, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.association_name.trim())
        .bind(&request.president_name)
        .bind(&request.contact_number)
        .bind(barangay_id)
        .bind(RecordStatus::Active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get(id).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Association>, AppError> {
        let sql = format!("{} {} WHERE a.id = ?", ASSOCIATION_SELECT, ASSOCIATION_FROM);
        let association = sqlx::query_as::<_, Association>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(association)
    }

    pub async fn get(&self, id: i64) -> Result<Association, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Association", id))
    }

    pub async fn list(
        &self,
        filter: &ListFilter,
        barangay_id: Option<i64>,
    ) -> Result<Page<Association>, AppError> {
        let filters = FilterBuilder::new()
            .eq_int("a.barangay_id", barangay_id)
            .eq_text("a.status", filter.status.as_deref())
            .search(&["a.association_name", "a.president_name"], filter.search_term());

        let page = fetch_page(
            &self.pool,
            ASSOCIATION_SELECT,
            ASSOCIATION_FROM,
            &filters,
            "a.association_name ASC, a.id ASC",
            filter,
        )
        .await?;
        Ok(page)
    }

    pub async fn update(&self, association: &Association) -> Result<Association, AppError> {
        sqlx::query(
            r#"
            UPDATE tricycle_associations
            SET association_name = ?, president_name = ?, contact_number = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&association.association_name)
        .bind(&association.president_name)
        .bind(&association.contact_number)
        .bind(association.status)
        .bind(Utc::now())
        .bind(association.id)
        .execute(&self.pool)
        .await?;

        self.get(association.id).await
    }
}
