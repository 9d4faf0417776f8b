use chrono::Utc;
use sqlx::SqlitePool;

use crate::dto::pagination::{ListFilter, Page};
use crate::models::document::{Document, NewDocument};
use crate::repositories::{begin_write, fetch_page};
use crate::utils::errors::{conflict_error, not_found_error, unique_violation, AppError};
use crate::utils::query::FilterBuilder;

const DOCUMENT_SELECT: &str = r#"
SELECT d.id, d.document_code, d.document_type, d.title, d.description, d.barangay_id,
       d.route_id, d.association_id, d.driver_id, d.operator_id, d.original_name,
       d.file_path, d.mime_type, d.file_size, d.uploaded_by,
       u.full_name AS uploaded_by_name, d.valid_from, d.valid_until, d.status, d.created_at
"#;

const DOCUMENT_FROM: &str = r#"
FROM route_documents d
LEFT JOIN users u ON u.id = d.uploaded_by
"#;

pub const UPLOADED_ACTION: &str = "Uploaded";

pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the metadata row and its `Uploaded` log entry together and
    /// return the committed id.
    pub async fn create(&self, document: &NewDocument) -> Result<i64, AppError> {
        let now = Utc::now();
        let mut tx = begin_write(&self.pool).await?;

        let id = sqlx::query(
            r#"
            INSERT INTO route_documents (
                document_code, document_type, title, description, barangay_id, route_id,
                association_id, driver_id, operator_id, original_name, file_path,
                mime_type, file_size, uploaded_by, valid_from, valid_until, status, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'Active', ?)
            "#,
        )
        .bind(&document.document_code)
        .bind(&document.document_type)
        .bind(&document.title)
        .bind(&document.description)
        .bind(document.barangay_id)
        .bind(document.route_id)
        .bind(document.association_id)
        .bind(document.driver_id)
        .bind(document.operator_id)
        .bind(&document.original_name)
        .bind(&document.file_path)
        .bind(&document.mime_type)
        .bind(document.file_size)
        .bind(document.uploaded_by)
        .bind(document.valid_from)
        .bind(document.valid_until)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            unique_violation(e, || conflict_error("Document", "code", &document.document_code))
        })?
        .last_insert_rowid();

        sqlx::query(
            "INSERT INTO document_logs (document_id, action, performed_by, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(UPLOADED_ACTION)
        .bind(document.uploaded_by)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Document>, AppError> {
        let sql = format!("{} {} WHERE d.id = ?", DOCUMENT_SELECT, DOCUMENT_FROM);
        let document = sqlx::query_as::<_, Document>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(document)
    }

    pub async fn get(&self, id: i64) -> Result<Document, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Document", id))
    }

    pub async fn code_exists(&self, document_code: &str) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM route_documents WHERE document_code = ?)")
                .bind(document_code)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn list(
        &self,
        filter: &ListFilter,
        barangay_id: Option<i64>,
    ) -> Result<Page<Document>, AppError> {
        let filters = FilterBuilder::new()
            .eq_int("d.barangay_id", barangay_id)
            .eq_int("d.route_id", filter.route_id)
            .eq_text("d.status", filter.status.as_deref())
            .eq_text("d.document_type", filter.kind.as_deref())
            .search(
                &["d.document_code", "d.title", "d.original_name"],
                filter.search_term(),
            );

        let page = fetch_page(
            &self.pool,
            DOCUMENT_SELECT,
            DOCUMENT_FROM,
            &filters,
            "d.created_at DESC, d.id DESC",
            filter,
        )
        .await?;
        Ok(page)
    }
}
