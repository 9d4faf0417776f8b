//! Authentication middleware
//! 
//! Decodes the bearer token, re-reads the account and attaches a
//! [`RequestContext`] to the request. Handlers take it as an
//! `Extension<RequestContext>` instead of reading session state.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::models::status::RecordStatus;
use crate::models::user::UserRole;
use crate::repositories::user_repository::UserRepository;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{extract_token_from_header, verify_token, JwtConfig};

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user_id: i64,
    pub username: String,
    pub role: UserRole,
    pub barangay_id: Option<i64>,
}

impl RequestContext {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Barangay every query must be restricted to: `None` for administrators,
    /// the caller's own barangay for staff.
    pub fn barangay_scope(&self) -> AppResult<Option<i64>> {
        if self.is_admin() {
            return Ok(None);
        }
        self.barangay_id
            .map(Some)
            .ok_or_else(|| AppError::Forbidden("Your account is not assigned to a barangay".to_string()))
    }

    /// Scope for a listing: staff are pinned to their barangay, administrators
    /// may narrow to the requested one.
    pub fn list_scope(&self, requested: Option<i64>) -> AppResult<Option<i64>> {
        Ok(self.barangay_scope()?.or(requested))
    }

    /// Refuse access to a record that belongs to another barangay.
    pub fn ensure_barangay_access(&self, barangay_id: Option<i64>) -> AppResult<()> {
        match self.barangay_scope()? {
            Some(own) if barangay_id != Some(own) => Err(AppError::Forbidden(
                "You do not have access to records of another barangay".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Barangay a new record is filed under. Staff always file under their
    /// own; administrators must name one.
    pub fn require_barangay(&self, requested: Option<i64>) -> AppResult<i64> {
        match self.barangay_scope()? {
            Some(own) => {
                if requested.is_some_and(|r| r != own) {
                    return Err(AppError::Forbidden(
                        "You can only create records for your own barangay".to_string(),
                    ));
                }
                Ok(own)
            }
            None => requested.ok_or_else(|| {
                crate::utils::errors::validation_error("barangay_id", "Barangay is required")
            }),
        }
    }
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = extract_token_from_header(header)?;
    let claims = verify_token(token, &JwtConfig::from(&state.config))?;
    let user_id = claims.user_id()?;

    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .filter(|u| u.status == RecordStatus::Active)
        .ok_or_else(|| AppError::Unauthorized("Account not found or inactive".to_string()))?;

    debug!("🔐 Authenticated user {} ({})", user.username, user.role.as_str());

    request.extensions_mut().insert(RequestContext {
        user_id: user.id,
        username: user.username,
        role: user.role,
        barangay_id: user.barangay_id,
    });

    Ok(next.run(request).await)
}

/// Must run after [`auth_middleware`].
pub async fn admin_only_middleware(request: Request, next: Next) -> AppResult<Response> {
    let context = request
        .extensions()
        .get::<RequestContext>()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    if !context.is_admin() {
        return Err(AppError::Forbidden("Administrator access required".to_string()));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff(barangay_id: Option<i64>) -> RequestContext {
        RequestContext {
            user_id: 2,
            username: "staff".to_string(),
            role: UserRole::Staff,
            barangay_id,
        }
    }

    fn admin() -> RequestContext {
        RequestContext {
            user_id: 1,
            username: "admin".to_string(),
            role: UserRole::Admin,
            barangay_id: None,
        }
    }

    #[test]
    fn test_staff_are_pinned_to_their_barangay() {
        let ctx = staff(Some(4));
        assert_eq!(ctx.list_scope(Some(9)).unwrap(), Some(4));
        assert!(ctx.ensure_barangay_access(Some(4)).is_ok());
        assert!(matches!(ctx.ensure_barangay_access(Some(5)), Err(AppError::Forbidden(_))));
        assert_eq!(ctx.require_barangay(None).unwrap(), 4);
        assert!(ctx.require_barangay(Some(5)).is_err());
    }

    #[test]
    fn test_admin_sees_everything() {
        let ctx = admin();
        assert_eq!(ctx.list_scope(None).unwrap(), None);
        assert_eq!(ctx.list_scope(Some(3)).unwrap(), Some(3));
        assert!(ctx.ensure_barangay_access(Some(8)).is_ok());
        assert!(matches!(ctx.require_barangay(None), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_staff_without_barangay_is_refused() {
        let ctx = staff(None);
        assert!(matches!(ctx.barangay_scope(), Err(AppError::Forbidden(_))));
    }
}
