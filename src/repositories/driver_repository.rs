//! Driver repository
//! 
//! Drivers plus their association membership records. A record and its
//! attachments are written in one transaction.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::dto::pagination::{ListFilter, Page};
use crate::models::driver::{
    AssociationRecord, AssociationRecordWithAttachments, CreateDriverRequest, Driver,
    DriverAttachment, NewAssociationRecord, NewDriverAttachment,
};
use crate::models::status::RecordStatus;
use crate::repositories::{begin_write, fetch_page};
use crate::utils::errors::{conflict_error, not_found_error, unique_violation, AppError};
use crate::utils::query::FilterBuilder;

const DRIVER_SELECT: &str = r#"
SELECT d.id, d.full_name, d.license_number, d.contact_number, d.address,
       d.barangay_id, b.name AS barangay_name, d.operator_id, o.operator_name,
       d.association_id, a.association_name, d.status, d.created_at, d.updated_at
"#;

const DRIVER_FROM: &str = r#"
FROM tricycle_drivers d
LEFT JOIN barangays b ON b.id = d.barangay_id
LEFT JOIN tricycle_operators o ON o.id = d.operator_id
LEFT JOIN tricycle_associations a ON a.id = d.association_id
"#;

const RECORD_SELECT: &str = r#"
SELECT r.id, r.driver_id, r.association_id, a.association_name, r.membership_date,
       r.expiry_date, r.remarks, r.recorded_by, r.created_at
FROM driver_association_records r
LEFT JOIN tricycle_associations a ON a.id = r.association_id
"#;

pub struct DriverRepository {
    pool: SqlitePool,
}

impl DriverRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        request: &CreateDriverRequest,
        barangay_id: i64,
    ) -> Result<Driver, AppError> {
        let now = Utc::now();
        let license_number = request.license_number.trim();
        let id = sqlx::query(
            r#"
            INSERT INTO tricycle_drivers (
                full_name, license_number, contact_number, address, barangay_id,
                operator_id, association_id, status, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.full_name.trim())
        .bind(license_number)
        .bind(&request.contact_number)
        .bind(&request.address)
        .bind(barangay_id)
        .bind(request.operator_id)
        .bind(request.association_id)
        .bind(RecordStatus::Active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            unique_violation(e, || conflict_error("Driver", "license number", license_number))
        })?
        .last_insert_rowid();

        self.get(id).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Driver>, AppError> {
        let sql = format!("{} {} WHERE d.id = ?", DRIVER_SELECT, DRIVER_FROM);
        let driver = sqlx::query_as::<_, Driver>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(driver)
    }

    pub async fn get(&self, id: i64) -> Result<Driver, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Driver", id))
    }

    pub async fn list(
        &self,
        filter: &ListFilter,
        barangay_id: Option<i64>,
    ) -> Result<Page<Driver>, AppError> {
        let filters = FilterBuilder::new()
            .eq_int("d.barangay_id", barangay_id)
            .eq_text("d.status", filter.status.as_deref())
            .search(&["d.full_name", "d.license_number"], filter.search_term());

        let page = fetch_page(
            &self.pool,
            DRIVER_SELECT,
            DRIVER_FROM,
            &filters,
            "d.full_name ASC, d.id ASC",
            filter,
        )
        .await?;
        Ok(page)
    }

    pub async fn update(&self, driver: &Driver) -> Result<Driver, AppError> {
        sqlx::query(
            r#"
            UPDATE tricycle_drivers
            SET full_name = ?, contact_number = ?, address = ?, operator_id = ?,
                association_id = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&driver.full_name)
        .bind(&driver.contact_number)
        .bind(&driver.address)
        .bind(driver.operator_id)
        .bind(driver.association_id)
        .bind(driver.status)
        .bind(Utc::now())
        .bind(driver.id)
        .execute(&self.pool)
        .await?;

        self.get(driver.id).await
    }

    /// Insert a membership record and all of its attachments atomically and
    /// return the committed record id.
    pub async fn create_association_record(
        &self,
        record: &NewAssociationRecord,
        attachments: &[NewDriverAttachment],
    ) -> Result<i64, AppError> {
        let now = Utc::now();
        let mut tx = begin_write(&self.pool).await?;

        let record_id = sqlx::query(
            r#"
            INSERT INTO driver_association_records (
                driver_id, association_id, membership_date, expiry_date, remarks,
                recorded_by, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.driver_id)
        .bind(record.association_id)
        .bind(record.membership_date)
        .bind(record.expiry_date)
        .bind(&record.remarks)
        .bind(record.recorded_by)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for attachment in attachments {
            sqlx::query(
                r#"
                INSERT INTO driver_attachments (
                    record_id, original_name, file_path, mime_type, file_size, created_at
                )
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(record_id)
            .bind(&attachment.original_name)
            .bind(&attachment.file_path)
            .bind(&attachment.mime_type)
            .bind(attachment.file_size)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(record_id)
    }

    pub async fn get_association_record(
        &self,
        record_id: i64,
    ) -> Result<AssociationRecordWithAttachments, AppError> {
        let sql = format!("{} WHERE r.id = ?", RECORD_SELECT);
        let record = sqlx::query_as::<_, AssociationRecord>(&sql)
            .bind(record_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found_error("Association record", record_id))?;
        let attachments = self.attachments_for(&[record_id]).await?;

        Ok(AssociationRecordWithAttachments { record, attachments })
    }

    /// Records of one driver, newest first, each with its attachments.
    pub async fn list_association_records(
        &self,
        driver_id: i64,
    ) -> Result<Vec<AssociationRecordWithAttachments>, AppError> {
        let sql = format!(
            "{} WHERE r.driver_id = ? ORDER BY r.membership_date DESC, r.id DESC",
            RECORD_SELECT
        );
        let records = sqlx::query_as::<_, AssociationRecord>(&sql)
            .bind(driver_id)
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        let mut attachments = self.attachments_for(&ids).await?;

        Ok(records
            .into_iter()
            .map(|record| {
                let (mine, rest): (Vec<_>, Vec<_>) =
                    attachments.drain(..).partition(|a| a.record_id == record.id);
                attachments = rest;
                AssociationRecordWithAttachments {
                    record,
                    attachments: mine,
                }
            })
            .collect())
    }

    async fn attachments_for(&self, record_ids: &[i64]) -> Result<Vec<DriverAttachment>, AppError> {
        if record_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = sqlx::QueryBuilder::<sqlx::Sqlite>::new(
            "SELECT * FROM driver_attachments WHERE record_id IN (",
        );
        let mut ids = query.separated(", ");
        for id in record_ids {
            ids.push_bind(*id);
        }
        query.push(") ORDER BY id ASC");

        let attachments = query
            .build_query_as::<DriverAttachment>()
            .fetch_all(&self.pool)
            .await?;
        Ok(attachments)
    }
}
