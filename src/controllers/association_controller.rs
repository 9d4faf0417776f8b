use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

use crate::controllers::{check_contact_number, ensure_barangay_exists};
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::association::{Association, CreateAssociationRequest, UpdateAssociationRequest};
use crate::repositories::association_repository::AssociationRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::non_blank;

pub struct AssociationController {
    pool: SqlitePool,
    repository: AssociationRepository,
}

impl AssociationController {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: AssociationRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        mut request: CreateAssociationRequest,
    ) -> Result<ApiResponse<Association>, AppError> {
        request.validate()?;
        check_contact_number(request.contact_number.as_deref())?;

        let barangay_id = ctx.require_barangay(request.barangay_id)?;
        ensure_barangay_exists(&self.pool, barangay_id).await?;
        request.president_name = non_blank(request.president_name);
        request.contact_number = non_blank(request.contact_number);

        let association = self.repository.create(&request, barangay_id).await?;
        info!("🤝 Association '{}' registered", association.association_name);
        Ok(ApiResponse::success_with_message(association, "Association registered successfully"))
    }

    pub async fn get(&self, ctx: &RequestContext, id: i64) -> Result<Association, AppError> {
        let association = self.repository.get(id).await?;
        ctx.ensure_barangay_access(Some(association.barangay_id))?;
        Ok(association)
    }

    pub async fn list(&self, ctx: &RequestContext, filter: &ListFilter) -> Result<Page<Association>, AppError> {
        let scope = ctx.list_scope(filter.barangay_id)?;
        self.repository.list(filter, scope).await
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        request: UpdateAssociationRequest,
    ) -> Result<ApiResponse<Association>, AppError> {
        request.validate()?;
        check_contact_number(request.contact_number.as_deref())?;

        let mut association = self.get(ctx, id).await?;
        if let Some(name) = non_blank(request.association_name) {
            association.association_name = name;
        }
        if let Some(president) = request.president_name {
            association.president_name = non_blank(Some(president));
        }
        if let Some(contact) = request.contact_number {
            association.contact_number = non_blank(Some(contact));
        }
        if let Some(status) = request.status {
            association.status = status;
        }

        let association = self.repository.update(&association).await?;
        Ok(ApiResponse::success_with_message(association, "Association updated successfully"))
    }
}
