use chrono::Utc;
use sqlx::SqlitePool;

use crate::dto::pagination::{ListFilter, Page};
use crate::models::status::RecordStatus;
use crate::models::terminal::{CreateTerminalRequest, Terminal};
use crate::repositories::fetch_page;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::query::FilterBuilder;

const TERMINAL_SELECT: &str = r#"
SELECT t.id, t.terminal_name, t.location, t.barangay_id, b.name AS barangay_name,
       t.route_id, r.route_name, t.capacity, t.operating_hours, t.status,
       t.created_by, t.created_at, t.updated_at
"#;

const TERMINAL_FROM: &str = r#"
FROM route_terminals t
LEFT JOIN barangays b ON b.id = t.barangay_id
LEFT JOIN tricycle_routes r ON r.id = t.route_id
"#;

pub struct TerminalRepository {
    pool: SqlitePool,
}

impl TerminalRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        request: &CreateTerminalRequest,
        barangay_id: i64,
        created_by: i64,
    ) -> Result<Terminal, AppError> {
        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO route_terminals (
                terminal_name, location, barangay_id, route_id, capacity, operating_hours,
                status, created_by, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.terminal_name.trim())
        .bind(request.location.trim())
        .bind(barangay_id)
        .bind(request.route_id)
        .bind(request.capacity.unwrap_or(0))
        .bind(&request.operating_hours)
        .bind(RecordStatus::Active)
        .bind(created_by)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get(id).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Terminal>, AppError> {
        let sql = format!("{} {} WHERE t.id = ?", TERMINAL_SELECT, TERMINAL_FROM);
        let terminal = sqlx::query_as::<_, Terminal>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(terminal)
    }

    pub async fn get(&self, id: i64) -> Result<Terminal, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Terminal", id))
    }

    pub async fn list(
        &self,
        filter: &ListFilter,
        barangay_id: Option<i64>,
    ) -> Result<Page<Terminal>, AppError> {
        let filters = FilterBuilder::new()
            .eq_int("t.barangay_id", barangay_id)
            .eq_int("t.route_id", filter.route_id)
            .eq_text("t.status", filter.status.as_deref())
            .search(&["t.terminal_name", "t.location"], filter.search_term());

        let page = fetch_page(
            &self.pool,
            TERMINAL_SELECT,
            TERMINAL_FROM,
            &filters,
            "t.terminal_name ASC, t.id ASC",
            filter,
        )
        .await?;
        Ok(page)
    }

    /// Persist the editable columns of an already merged row.
    pub async fn update(&self, terminal: &Terminal) -> Result<Terminal, AppError> {
        sqlx::query(
            r#"
            UPDATE route_terminals
            SET terminal_name = ?, location = ?, route_id = ?, capacity = ?,
                operating_hours = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&terminal.terminal_name)
        .bind(&terminal.location)
        .bind(terminal.route_id)
        .bind(terminal.capacity)
        .bind(&terminal.operating_hours)
        .bind(terminal.status)
        .bind(Utc::now())
        .bind(terminal.id)
        .execute(&self.pool)
        .await?;

        self.get(terminal.id).await
    }
}
