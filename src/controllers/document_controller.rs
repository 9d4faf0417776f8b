//! Document controller
//! 
//! Upload intake for the document store. The file is validated and every
//! metadata field checked before anything is written; a failed insert
//! removes the stored file again.

use sqlx::SqlitePool;
use tracing::{error, info};

use crate::controllers::{
    ensure_barangay_exists, referenced_association, referenced_operator, referenced_route, unique_code,
};
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::document::{Document, NewDocument};
use crate::repositories::document_repository::DocumentRepository;
use crate::repositories::driver_repository::DriverRepository;
use crate::services::file_storage::{validate_upload, FileStorage, UploadPolicy};
use crate::services::multipart_form::MultipartForm;
use crate::utils::codes;
use crate::utils::errors::{validation_error, AppError};
use crate::utils::validation::validate_date_window;

pub struct DocumentController {
    pool: SqlitePool,
    repository: DocumentRepository,
}

impl DocumentController {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: DocumentRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn upload(
        &self,
        ctx: &RequestContext,
        storage: &FileStorage,
        mut form: MultipartForm,
    ) -> Result<ApiResponse<Document>, AppError> {
        let file = form
            .take_file("file")
            .ok_or_else(|| validation_error("file", "Please choose a file to upload"))?;
        validate_upload(&file, &UploadPolicy::DOCUMENT)?;

        let document_type = form.required("document_type", "Document type is required")?;
        let title = form.required("title", "Document title is required")?;

        let route_id = form.integer("route_id")?;
        let association_id = form.integer("association_id")?;
        let driver_id = form.integer("driver_id")?;
        let operator_id = form.integer("operator_id")?;

        let mut barangay_id = match ctx.barangay_scope()? {
            Some(own) => Some(own),
            None => form.integer("barangay_id")?,
        };
        if let Some(id) = barangay_id {
            ensure_barangay_exists(&self.pool, id).await?;
        }
        if let Some(id) = route_id {
            let route = referenced_route(&self.pool, ctx, id).await?;
            barangay_id = barangay_id.or(Some(route.barangay_id));
        }
        if let Some(id) = association_id {
            referenced_association(&self.pool, ctx, id).await?;
        }
        if let Some(id) = operator_id {
            referenced_operator(&self.pool, ctx, id).await?;
        }
        if let Some(id) = driver_id {
            let driver = DriverRepository::new(self.pool.clone())
                .find_by_id(id)
                .await?
                .ok_or_else(|| validation_error("driver_id", "Selected driver does not exist"))?;
            ctx.ensure_barangay_access(Some(driver.barangay_id))?;
        }

        let valid_from = form.date("valid_from")?;
        let valid_until = form.date("valid_until")?;
        validate_date_window(valid_from, valid_until).map_err(|_| {
            validation_error("valid_until", "Valid until cannot be earlier than valid from")
        })?;

        let repository = &self.repository;
        let document_code = unique_code("document", codes::document_code, |code| async move {
            repository.code_exists(&code).await
        })
        .await?;

        let stored = storage.store(&file, &UploadPolicy::DOCUMENT).await?;

        let document = NewDocument {
            document_code,
            document_type,
            title,
            description: form.text("description"),
            barangay_id,
            route_id,
            association_id,
            driver_id,
            operator_id,
            original_name: stored.original_name.clone(),
            file_path: stored.file_path.clone(),
            mime_type: stored.mime_type.clone(),
            file_size: stored.size,
            uploaded_by: ctx.user_id,
            valid_from,
            valid_until,
        };

        let id = match self.repository.create(&document).await {
            Ok(id) => id,
            Err(e) => {
                error!("❌ Saving document '{}' failed: {}", stored.original_name, e);
                storage.remove(&stored).await;
                return Err(e);
            }
        };
        // Committed: the file now belongs to the row, whatever happens below.
        let document = self.repository.get(id).await?;

        info!(
            "📄 Document {} uploaded by user {} ({} bytes)",
            document.document_code, ctx.user_id, document.file_size
        );
        Ok(ApiResponse::success_with_message(document, "Document uploaded successfully"))
    }

    pub async fn get(&self, ctx: &RequestContext, id: i64) -> Result<Document, AppError> {
        let document = self.repository.get(id).await?;
        ctx.ensure_barangay_access(document.barangay_id)?;
        Ok(document)
    }

    pub async fn list(&self, ctx: &RequestContext, filter: &ListFilter) -> Result<Page<Document>, AppError> {
        let scope = ctx.list_scope(filter.barangay_id)?;
        self.repository.list(filter, scope).await
    }
}
