use chrono::Utc;
use sqlx::SqlitePool;

use crate::dto::pagination::{ListFilter, Page};
use crate::models::operator::{CreateOperatorRequest, Operator};
use crate::models::status::RecordStatus;
use crate::repositories::fetch_page;
use crate::utils::errors::{conflict_error, not_found_error, unique_violation, AppError};
use crate::utils::query::FilterBuilder;

const OPERATOR_SELECT: &str = r#"
SELECT o.id, o.operator_name, o.franchise_number, o.contact_number, o.address,
       o.barangay_id, b.name AS barangay_name, o.status, o.created_at, o.updated_at
"#;

const OPERATOR_FROM: &str = r#"
FROM tricycle_operators o
LEFT JOIN barangays b ON b.id = o.barangay_id
"#;

pub struct OperatorRepository {
    pool: SqlitePool,
}

impl OperatorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        request: &CreateOperatorRequest,
        barangay_id: i64,
    ) -> Result<Operator, AppError> {
        let now = Utc::now();
        let franchise_number = request.franchise_number.trim();
        let id = sqlx::query(
            r#"
            INSERT INTO tricycle_operators (
                operator_name, franchise_number, contact_number, address, barangay_id,
                status, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.operator_name.trim())
        .bind(franchise_number)
        .bind(&request.contact_number)
        .bind(&request.address)
        .bind(barangay_id)
        .bind(RecordStatus::Active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            unique_violation(e, || conflict_error("Operator", "franchise number", franchise_number))
        })?
        .last_insert_rowid();

        self.get(id).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Operator>, AppError> {
        let sql = format!("{} {} WHERE o.id = ?", OPERATOR_SELECT, OPERATOR_FROM);
        let operator = sqlx::query_as::<_, Operator>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(operator)
    }

    pub async fn get(&self, id: i64) -> Result<Operator, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Operator", id))
    }

    pub async fn list(
        &self,
        filter: &ListFilter,
        barangay_id: Option<i64>,
    ) -> Result<Page<Operator>, AppError> {
        let filters = FilterBuilder::new()
            .eq_int("o.barangay_id", barangay_id)
            .eq_text("o.status", filter.status.as_deref())
            .search(&["o.operator_name", "o.franchise_number"], filter.search_term());

        let page = fetch_page(
            &self.pool,
            OPERATOR_SELECT,
            OPERATOR_FROM,
            &filters,
            "o.operator_name ASC, o.id ASC",
            filter,
        )
        .await?;
        Ok(page)
    }

    pub async fn update(&self, operator: &Operator) -> Result<Operator, AppError> {
        sqlx::query(
            r#"
            UPDATE tricycle_operators
            SET operator_name = ?, contact_number = ?, address = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&operator.operator_name)
        .bind(&operator.contact_number)
        .bind(&operator.address)
        .bind(operator.status)
        .bind(Utc::now())
        .bind(operator.id)
        .execute(&self.pool)
        .await?;

        self.get(operator.id).await
    }
}
