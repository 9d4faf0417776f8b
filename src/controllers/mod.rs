//! Controllers
//! 
//! Request validation, barangay scoping and orchestration on top of the
//! repositories. Handlers in `routes` stay thin.

pub mod association_controller;
pub mod auth_controller;
pub mod barangay_controller;
pub mod document_controller;
pub mod driver_controller;
pub mod loading_zone_controller;
pub mod operator_controller;
pub mod restriction_controller;
pub mod route_controller;
pub mod route_stop_controller;
pub mod submission_controller;
pub mod terminal_controller;
pub mod user_controller;

use std::future::Future;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::middleware::auth::RequestContext;
use crate::models::association::Association;
use crate::models::operator::Operator;
use crate::models::route::Route;
use crate::repositories::association_repository::AssociationRepository;
use crate::repositories::barangay_repository::BarangayRepository;
use crate::repositories::operator_repository::OperatorRepository;
use crate::repositories::route_repository::RouteRepository;
use crate::utils::errors::{validation_error, AppError};
use crate::utils::validation::{validate_contact_number, validate_time};

const CODE_ATTEMPTS: usize = 5;

/// Generate a reference code that `exists` does not report as taken.
///
/// Generated codes carry a short random suffix, so a collision inside the
/// same day is possible; a few fresh draws make it vanishingly unlikely.
pub(crate) async fn unique_code<G, E, F>(kind: &str, generate: G, exists: E) -> Result<String, AppError>
where
    G: Fn(DateTime<Utc>) -> String,
    E: Fn(String) -> F,
    F: Future<Output = Result<bool, AppError>>,
{
    for _ in 0..CODE_ATTEMPTS {
        let code = generate(Utc::now());
        if !exists(code.clone()).await? {
            return Ok(code);
        }
    }
    Err(AppError::Internal(format!("Could not generate a unique {} code", kind)))
}

/// Referenced ids that do not exist are a field error, not a 404.
pub(crate) async fn ensure_barangay_exists(pool: &SqlitePool, barangay_id: i64) -> Result<(), AppError> {
    if !BarangayRepository::new(pool.clone()).exists(barangay_id).await? {
        return Err(validation_error("barangay_id", "Selected barangay does not exist"));
    }
    Ok(())
}

/// Load a referenced route the caller may see.
pub(crate) async fn referenced_route(
    pool: &SqlitePool,
    ctx: &RequestContext,
    route_id: i64,
) -> Result<Route, AppError> {
    let route = RouteRepository::new(pool.clone())
        .find_by_id(route_id)
        .await?
        .ok_or_else(|| validation_error("route_id", "Selected route does not exist"))?;
    ctx.ensure_barangay_access(Some(route.barangay_id))?;
    Ok(route)
}

pub(crate) async fn referenced_association(
    pool: &SqlitePool,
    ctx: &RequestContext,
    association_id: i64,
) -> Result<Association, AppError> {
    let association = AssociationRepository::new(pool.clone())
        .find_by_id(association_id)
        .await?
        .ok_or_else(|| validation_error("association_id", "Selected association does not exist"))?;
    ctx.ensure_barangay_access(Some(association.barangay_id))?;
    Ok(association)
}

pub(crate) async fn referenced_operator(
    pool: &SqlitePool,
    ctx: &RequestContext,
    operator_id: i64,
) -> Result<Operator, AppError> {
    let operator = OperatorRepository::new(pool.clone())
        .find_by_id(operator_id)
        .await?
        .ok_or_else(|| validation_error("operator_id", "Selected operator does not exist"))?;
    ctx.ensure_barangay_access(Some(operator.barangay_id))?;
    Ok(operator)
}

/// Parse a clock time and store it as `HH:MM`.
pub(crate) fn normalize_time(field: &'static str, value: &str) -> Result<String, AppError> {
    validate_time(value)
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| validation_error(field, format!("{} must be a time in HH:MM format", field)))
}

pub(crate) fn normalize_optional_time(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<String>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => normalize_time(field, v).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn check_contact_number(value: Option<&str>) -> Result<(), AppError> {
    if let Some(number) = value.map(str::trim).filter(|v| !v.is_empty()) {
        validate_contact_number(number)
            .map_err(|_| validation_error("contact_number", "Invalid contact number"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_unique_code_draws_again_after_a_collision() {
        let drawn = AtomicUsize::new(0);
        let generate = |_: DateTime<Utc>| format!("SUB-{}", drawn.fetch_add(1, Ordering::SeqCst));

        let code = unique_code("submission", generate, |code| async move {
            Ok(code == "SUB-0" || code == "SUB-1")
        })
        .await
        .unwrap();

        assert_eq!(code, "SUB-2");
    }

    #[tokio::test]
    async fn test_unique_code_gives_up_when_every_draw_is_taken() {
        let result = unique_code("document", |_| "DOC-TAKEN".to_string(), |_| async { Ok(true) }).await;
        assert!(matches!(result, Err(AppError::Internal(msg)) if msg.contains("document")));
    }

    #[test]
    fn test_normalize_time() {
        assert_eq!(normalize_time("operating_start", "5:30").unwrap(), "05:30");
        assert_eq!(normalize_time("operating_end", "21:00:00").unwrap(), "21:00");
        assert!(normalize_time("operating_end", "9pm").is_err());
        assert_eq!(normalize_optional_time("start_time", Some("  ")).unwrap(), None);
    }

    #[test]
    fn test_check_contact_number() {
        assert!(check_contact_number(None).is_ok());
        assert!(check_contact_number(Some("0917 123 4567")).is_ok());
        assert!(check_contact_number(Some("call me")).is_err());
    }
}
