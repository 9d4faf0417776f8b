use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

use crate::controllers::{ensure_barangay_exists, referenced_route};
use crate::dto::pagination::{ListFilter, Page};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequestContext;
use crate::models::terminal::{CreateTerminalRequest, Terminal, UpdateTerminalRequest};
use crate::repositories::terminal_repository::TerminalRepository;
use crate::utils::errors::{validation_error, AppError};
use crate::utils::validation::non_blank;

pub struct TerminalController {
    pool: SqlitePool,
    repository: TerminalRepository,
}

impl TerminalController {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: TerminalRepository::new(pool.clone()),
            pool,
        }
    }

    /// A linked route must sit in the same barangay as the terminal.
    async fn check_route(&self, ctx: &RequestContext, route_id: Option<i64>, barangay_id: i64) -> Result<(), AppError> {
        if let Some(route_id) = route_id {
            let route = referenced_route(&self.pool, ctx, route_id).await?;
            if route.barangay_id != barangay_id {
                return Err(validation_error("route_id", "Route belongs to a different barangay"));
            }
        }
        Ok(())
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        mut request: CreateTerminalRequest,
    ) -> Result<ApiResponse<Terminal>, AppError> {
        request.validate()?;

        let barangay_id = ctx.require_barangay(request.barangay_id)?;
        ensure_barangay_exists(&self.pool, barangay_id).await?;
        self.check_route(ctx, request.route_id, barangay_id).await?;
        request.operating_hours = non_blank(request.operating_hours);

        let terminal = self.repository.create(&request, barangay_id, ctx.user_id).await?;
        info!("🏁 Terminal '{}' created", terminal.terminal_name);
        Ok(ApiResponse::success_with_message(terminal, "Terminal created successfully"))
    }

    pub async fn get(&self, ctx: &RequestContext, id: i64) -> Result<Terminal, AppError> {
        let terminal = self.repository.get(id).await?;
        ctx.ensure_barangay_access(Some(terminal.barangay_id))?;
        Ok(terminal)
    }

    pub async fn list(&self, ctx: &RequestContext, filter: &ListFilter) -> Result<Page<Terminal>, AppError> {
        let scope = ctx.list_scope(filter.barangay_id)?;
        self.repository.list(filter, scope).await
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        request: UpdateTerminalRequest,
    ) -> Result<ApiResponse<Terminal>, AppError> {
        request.validate()?;

        let mut terminal = self.get(ctx, id).await?;
        if request.route_id.is_some() {
            self.check_route(ctx, request.route_id, terminal.barangay_id).await?;
            terminal.route_id = request.route_id;
        }
        if let Some(name) = non_blank(request.terminal_name) {
            terminal.terminal_name = name;
        }
        if let Some(location) = non_blank(request.location) {
            terminal.location = location;
        }
        if let Some(capacity) = request.capacity {
            terminal.capacity = capacity;
        }
        if let Some(hours) = request.operating_hours {
            terminal.operating_hours = non_blank(Some(hours));
        }
        if let Some(status) = request.status {
            terminal.status = status;
        }

        let terminal = self.repository.update(&terminal).await?;
        Ok(ApiResponse::success_with_message(terminal, "Terminal updated successfully"))
    }
}
