//! Route repository
//! 
//! Route rows and the workflow writes that move them. Every write that
//! changes a status appends to the approval log inside the same transaction.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::dto::pagination::{ListFilter, Page};
use crate::models::route::{LogAction, Route, RouteStatus, SubmissionStatus, Transition, WorkflowEvent};
use crate::repositories::{approval_log_repository, begin_write, fetch_page};
use crate::utils::errors::{conflict_error, not_found_error, unique_violation, AppError};
use crate::utils::query::FilterBuilder;

const ROUTE_SELECT: &str = r#"
SELECT r.id, r.route_code, r.route_name, r.description, r.start_point, r.end_point,
       r.barangay_id, b.name AS barangay_name, r.distance_km, r.estimated_minutes,
       r.regular_fare, r.special_fare, r.operating_start, r.operating_end,
       r.status, r.submission_status, r.created_by, c.full_name AS created_by_name,
       r.approved_by, a.full_name AS approved_by_name, r.approved_at,
       r.created_at, r.updated_at
"#;

const ROUTE_FROM: &str = r#"
FROM tricycle_routes r
LEFT JOIN barangays b ON b.id = r.barangay_id
LEFT JOIN users c ON c.id = r.created_by
LEFT JOIN users a ON a.id = r.approved_by
"#;

/// Validated values for a new route.
#[derive(Debug, Clone)]
pub struct NewRoute {
    pub route_code: String,
    pub route_name: String,
    pub description: Option<String>,
    pub start_point: String,
    pub end_point: String,
    pub barangay_id: i64,
    pub distance_km: f64,
    pub estimated_minutes: Option<i64>,
    pub regular_fare: f64,
    pub special_fare: Option<f64>,
    pub operating_start: String,
    pub operating_end: String,
    pub created_by: i64,
}

/// Descriptive fields after merging a partial update onto the stored row.
#[derive(Debug, Clone)]
pub struct RouteDetails {
    pub route_name: String,
    pub description: Option<String>,
    pub start_point: String,
    pub end_point: String,
    pub distance_km: f64,
    pub estimated_minutes: Option<i64>,
    pub regular_fare: f64,
    pub special_fare: Option<f64>,
    pub operating_start: String,
    pub operating_end: String,
}

impl From<&Route> for RouteDetails {
    fn from(route: &Route) -> Self {
        Self {
            route_name: route.route_name.clone(),
            description: route.description.clone(),
            start_point: route.start_point.clone(),
            end_point: route.end_point.clone(),
            distance_km: route.distance_km,
            estimated_minutes: route.estimated_minutes,
            regular_fare: route.regular_fare,
            special_fare: route.special_fare,
            operating_start: route.operating_start.clone(),
            operating_end: route.operating_end.clone(),
        }
    }
}

/// Read the two lifecycle fields of a route on the given connection.
pub async fn load_state(
    conn: &mut SqliteConnection,
    route_id: i64,
) -> Result<Option<(RouteStatus, SubmissionStatus)>, sqlx::Error> {
    sqlx::query_as("SELECT status, submission_status FROM tricycle_routes WHERE id = ?")
        .bind(route_id)
        .fetch_optional(conn)
        .await
}

/// Resolve `event` against the stored state, write the new state and log it.
///
/// Runs on the caller's connection so it can share a transaction with other
/// writes (submission intake and review).
pub async fn apply_event(
    conn: &mut SqliteConnection,
    route_id: i64,
    event: WorkflowEvent,
    performed_by: i64,
    remarks: Option<&str>,
) -> Result<Transition, AppError> {
    let (status, submission_status) = load_state(&mut *conn, route_id)
        .await?
        .ok_or_else(|| not_found_error("Route", route_id))?;

    let transition = event.transition(status, submission_status)?;
    write_transition(&mut *conn, route_id, &transition, performed_by, remarks).await?;
    Ok(transition)
}

async fn write_transition(
    conn: &mut SqliteConnection,
    route_id: i64,
    transition: &Transition,
    performed_by: i64,
    remarks: Option<&str>,
) -> Result<(), sqlx::Error> {
    let now = Utc::now();

    if transition.log_action == LogAction::Approved {
        sqlx::query(
            r#"
            UPDATE tricycle_routes
            SET status = ?, submission_status = ?, approved_by = ?, approved_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(transition.status)
        .bind(transition.submission_status)
        .bind(performed_by)
        .bind(now)
        .bind(now)
        .bind(route_id)
        .execute(&mut *conn)
        .await?;
    } else {
        sqlx::query(
            "UPDATE tricycle_routes SET status = ?, submission_status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(transition.status)
        .bind(transition.submission_status)
        .bind(now)
        .bind(route_id)
        .execute(&mut *conn)
        .await?;
    }

    approval_log_repository::append(conn, route_id, transition.log_action, remarks, performed_by)
        .await?;
    Ok(())
}

pub struct RouteRepository {
    pool: SqlitePool,
}

impl RouteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the route together with its `Created` log entry.
    pub async fn create(&self, route: &NewRoute) -> Result<Route, AppError> {
        let now = Utc::now();
        let mut tx = begin_write(&self.pool).await?;

        let id = sqlx::query(
            r#"
            INSERT INTO tricycle_routes (
                route_code, route_name, description, start_point, end_point, barangay_id,
                distance_km, estimated_minutes, regular_fare, special_fare,
                operating_start, operating_end, status, submission_status,
                created_by, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&route.route_code)
        .bind(&route.route_name)
        .bind(&route.description)
        .bind(&route.start_point)
        .bind(&route.end_point)
        .bind(route.barangay_id)
        .bind(route.distance_km)
        .bind(route.estimated_minutes)
        .bind(route.regular_fare)
        .bind(route.special_fare)
        .bind(&route.operating_start)
        .bind(&route.operating_end)
        .bind(RouteStatus::UnderReview)
        .bind(SubmissionStatus::Draft)
        .bind(route.created_by)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| unique_violation(e, || conflict_error("Route", "code", &route.route_code)))?
        .last_insert_rowid();

        approval_log_repository::append(&mut *tx, id, LogAction::Created, None, route.created_by)
            .await?;
        tx.commit().await?;

        self.get(id).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Route>, AppError> {
        let sql = format!("{} {} WHERE r.id = ?", ROUTE_SELECT, ROUTE_FROM);
        let route = sqlx::query_as::<_, Route>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(route)
    }

    pub async fn get(&self, id: i64) -> Result<Route, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Route", id))
    }

    pub async fn code_exists(&self, route_code: &str) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM tricycle_routes WHERE route_code = ?)")
                .bind(route_code)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn list(&self, filter: &ListFilter, barangay_id: Option<i64>) -> Result<Page<Route>, AppError> {
        let filters = FilterBuilder::new()
            .eq_int("r.barangay_id", barangay_id)
            .eq_text("r.status", filter.status.as_deref())
            .eq_text("r.submission_status", filter.submission_status.as_deref())
            .search(
                &["r.route_code", "r.route_name", "r.start_point", "r.end_point"],
                filter.search_term(),
            );

        let page = fetch_page(
            &self.pool,
            ROUTE_SELECT,
            ROUTE_FROM,
            &filters,
            "r.created_at DESC, r.id DESC",
            filter,
        )
        .await?;
        Ok(page)
    }

    pub async fn update_details(&self, id: i64, details: &RouteDetails) -> Result<Route, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE tricycle_routes
            SET route_name = ?, description = ?, start_point = ?, end_point = ?,
                distance_km = ?, estimated_minutes = ?, regular_fare = ?, special_fare = ?,
                operating_start = ?, operating_end = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&details.route_name)
        .bind(&details.description)
        .bind(&details.start_point)
        .bind(&details.end_point)
        .bind(details.distance_km)
        .bind(details.estimated_minutes)
        .bind(details.regular_fare)
        .bind(details.special_fare)
        .bind(&details.operating_start)
        .bind(&details.operating_end)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Route", id));
        }
        self.get(id).await
    }

    /// Apply one workflow event in its own transaction.
    pub async fn transition(
        &self,
        id: i64,
        event: WorkflowEvent,
        performed_by: i64,
        remarks: Option<&str>,
    ) -> Result<Route, AppError> {
        let mut tx = begin_write(&self.pool).await?;
        apply_event(&mut *tx, id, event, performed_by, remarks).await?;
        tx.commit().await?;
        self.get(id).await
    }
}
