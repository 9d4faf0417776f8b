use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

use crate::controllers::{check_contact_number, ensure_barangay_exists};
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::operator::{CreateOperatorRequest, Operator, UpdateOperatorRequest};
use crate::repositories::operator_repository::OperatorRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::non_blank;

pub struct OperatorController {
    pool: SqlitePool,
    repository: OperatorRepository,
}

impl OperatorController {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: OperatorRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        mut request: CreateOperatorRequest,
    ) -> Result<ApiResponse<Operator>, AppError> {
        request.validate()?;
        check_contact_number(request.contact_number.as_deref())?;

        let barangay_id = ctx.require_barangay(request.barangay_id)?;
        ensure_barangay_exists(&self.pool, barangay_id).await?;
        request.contact_number = non_blank(request.contact_number);
        request.address = non_blank(request.address);

        let operator = self.repository.create(&request, barangay_id).await?;
        info!("🧾 Operator '{}' registered ({})", operator.operator_name, operator.franchise_number);
        Ok(ApiResponse::success_with_message(operator, "Operator registered successfully"))
    }

    pub async fn get(&self, ctx: &RequestContext, id: i64) -> Result<Operator, AppError> {
        let operator = self.repository.get(id).await?;
        ctx.ensure_barangay_access(Some(operator.barangay_id))?;
        Ok(operator)
    }

    pub async fn list(&self, ctx: &RequestContext, filter: &ListFilter) -> Result<Page<Operator>, AppError> {
        let scope = ctx.list_scope(filter.barangay_id)?;
        self.repository.list(filter, scope).await
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        request: UpdateOperatorRequest,
    ) -> Result<ApiResponse<Operator>, AppError> {
        request.validate()?;
        check_contact_number(request.contact_number.as_deref())?;

        let mut operator = self.get(ctx, id).await?;
        if let Some(name) = non_blank(request.operator_name) {
            operator.operator_name = name;
        }
        if let Some(contact) = request.contact_number {
            operator.contact_number = non_blank(Some(contact));
        }
        if let Some(address) = request.address {
            operator.address = non_blank(Some(address));
        }
        if let Some(status) = request.status {
            operator.status = status;
        }

        let operator = self.repository.update(&operator).await?;
        Ok(ApiResponse::success_with_message(operator, "Operator updated successfully"))
    }
}
