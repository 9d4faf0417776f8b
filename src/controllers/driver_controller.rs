//! Driver controller
//! 
//! Driver registry plus association membership records. A membership record
//! arrives as a multipart form with optional attachments; files are only
//! written once every field and file has passed validation, and removed
//! again when the database write fails.

use sqlx::SqlitePool;
use tracing::{error, info};
use validator::Validate;

use crate::controllers::{check_contact_number, ensure_barangay_exists, referenced_association, referenced_operator};
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::driver::{
    AssociationRecordWithAttachments, CreateDriverRequest, Driver, NewAssociationRecord,
    NewDriverAttachment, UpdateDriverRequest,
};
use crate::repositories::driver_repository::DriverRepository;
use crate::services::file_storage::{validate_upload, FileStorage, UploadPolicy};
use crate::services::multipart_form::MultipartForm;
use crate::utils::errors::{validation_error, AppError};
use crate::utils::validation::{non_blank, validate_date_window};

pub struct DriverController {
    pool: SqlitePool,
    repository: DriverRepository,
}

impl DriverController {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: DriverRepository::new(pool.clone()),
            pool,
        }
    }

    /// Operator and association must exist and share the driver's barangay.
    async fn check_links(
        &self,
        ctx: &RequestContext,
        barangay_id: i64,
        operator_id: Option<i64>,
        association_id: Option<i64>,
    ) -> Result<(), AppError> {
        if let Some(id) = operator_id {
            let operator = referenced_operator(&self.pool, ctx, id).await?;
            if operator.barangay_id != barangay_id {
                return Err(validation_error("operator_id", "Operator belongs to a different barangay"));
            }
        }
        if let Some(id) = association_id {
            let association = referenced_association(&self.pool, ctx, id).await?;
            if association.barangay_id != barangay_id {
                return Err(validation_error("association_id", "Association belongs to a different barangay"));
            }
        }
        Ok(())
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        mut request: CreateDriverRequest,
    ) -> Result<ApiResponse<Driver>, AppError> {
        request.validate()?;
        check_contact_number(request.contact_number.as_deref())?;

        let barangay_id = ctx.require_barangay(request.barangay_id)?;
        ensure_barangay_exists(&self.pool, barangay_id).await?;
        self.check_links(ctx, barangay_id, request.operator_id, request.association_id)
            .await?;
        request.contact_number = non_blank(request.contact_number);
        request.address = non_blank(request.address);

        let driver = self.repository.create(&request, barangay_id).await?;
        info!("🧑 Driver '{}' registered ({})", driver.full_name, driver.license_number);
        Ok(ApiResponse::success_with_message(driver, "Driver registered successfully"))
    }

    pub async fn get(&self, ctx: &RequestContext, id: i64) -> Result<Driver, AppError> {
        let driver = self.repository.get(id).await?;
        ctx.ensure_barangay_access(Some(driver.barangay_id))?;
        Ok(driver)
    }

    pub async fn list(&self, ctx: &RequestContext, filter: &ListFilter) -> Result<Page<Driver>, AppError> {
        let scope = ctx.list_scope(filter.barangay_id)?;
        self.repository.list(filter, scope).await
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        request: UpdateDriverRequest,
    ) -> Result<ApiResponse<Driver>, AppError> {
        request.validate()?;
        check_contact_number(request.contact_number.as_deref())?;

        let mut driver = self.get(ctx, id).await?;
        self.check_links(ctx, driver.barangay_id, request.operator_id, request.association_id)
            .await?;

        if let Some(name) = non_blank(request.full_name) {
            driver.full_name = name;
        }
        if let Some(contact) = request.contact_number {
            driver.contact_number = non_blank(Some(contact));
        }
        if let Some(address) = request.address {
            driver.address = non_blank(Some(address));
        }
        if request.operator_id.is_some() {
            driver.operator_id = request.operator_id;
        }
        if request.association_id.is_some() {
            driver.association_id = request.association_id;
        }
        if let Some(status) = request.status {
            driver.status = status;
        }

        let driver = self.repository.update(&driver).await?;
        Ok(ApiResponse::success_with_message(driver, "Driver updated successfully"))
    }

    pub async fn create_association_record(
        &self,
        ctx: &RequestContext,
        storage: &FileStorage,
        driver_id: i64,
        mut form: MultipartForm,
    ) -> Result<ApiResponse<AssociationRecordWithAttachments>, AppError> {
        let driver = self.get(ctx, driver_id).await?;

        let files = form.take_files("attachments");
        for file in &files {
            validate_upload(file, &UploadPolicy::DRIVER_ATTACHMENT)?;
        }

        let association_id = form
            .integer("association_id")?
            .ok_or_else(|| validation_error("association_id", "Association is required"))?;
        let association = referenced_association(&self.pool, ctx, association_id).await?;
        if association.barangay_id != driver.barangay_id {
            return Err(validation_error(
                "association_id",
                "Association belongs to a different barangay",
            ));
        }

        let membership_date = form
            .date("membership_date")?
            .ok_or_else(|| validation_error("membership_date", "Membership date is required"))?;
        let expiry_date = form.date("expiry_date")?;
        validate_date_window(Some(membership_date), expiry_date).map_err(|_| {
            validation_error("expiry_date", "Expiry date cannot be earlier than the membership date")
        })?;

        let record = NewAssociationRecord {
            driver_id,
            association_id,
            membership_date,
            expiry_date,
            remarks: form.text("remarks"),
            recorded_by: ctx.user_id,
        };

        let stored = storage
            .store_all(&files, &UploadPolicy::DRIVER_ATTACHMENT)
            .await?;
        let attachments: Vec<NewDriverAttachment> = stored
            .iter()
            .map(|s| NewDriverAttachment {
                original_name: s.original_name.clone(),
                file_path: s.file_path.clone(),
                mime_type: s.mime_type.clone(),
                file_size: s.size,
            })
            .collect();

        let record_id = match self
            .repository
            .create_association_record(&record, &attachments)
            .await
        {
            Ok(record_id) => record_id,
            Err(e) => {
                error!("❌ Association record for driver {} failed: {}", driver_id, e);
                storage.remove_all(&stored).await;
                return Err(e);
            }
        };
        let created = self.repository.get_association_record(record_id).await?;

        info!(
            "📎 Association record {} saved for driver {} with {} attachment(s)",
            created.record.id,
            driver_id,
            created.attachments.len()
        );
        Ok(ApiResponse::success_with_message(
            created,
            "Association record saved successfully",
        ))
    }

    pub async fn association_records(
        &self,
        ctx: &RequestContext,
        driver_id: i64,
    ) -> Result<Vec<AssociationRecordWithAttachments>, AppError> {
        self.get(ctx, driver_id).await?;
        self.repository.list_association_records(driver_id).await
    }
}
