use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::route_stop::RouteStop;
use crate::utils::errors::{not_found_error, unique_violation, AppError};

pub struct RouteStopRepository {
    pool: SqlitePool,
}

fn order_taken(route_id: i64, stop_order: i64) -> AppError {
    AppError::Conflict(format!(
        "Route {} already has a stop at position {}",
        route_id, stop_order
    ))
}

impl RouteStopRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        route_id: i64,
        stop_name: &str,
        stop_order: i64,
        landmark: Option<&str>,
    ) -> Result<RouteStop, AppError> {
        let stop = sqlx::query_as::<_, RouteStop>(
            r#"
            INSERT INTO route_stops (route_id, stop_name, stop_order, landmark, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(route_id)
        .bind(stop_name)
        .bind(stop_order)
        .bind(landmark)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, || order_taken(route_id, stop_order)))?;

        Ok(stop)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<RouteStop>, AppError> {
        let stop = sqlx::query_as::<_, RouteStop>("SELECT * FROM route_stops WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(stop)
    }

    pub async fn get(&self, id: i64) -> Result<RouteStop, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Route stop", id))
    }

    /// Stops of one route in travel order.
    pub async fn list_for_route(&self, route_id: i64) -> Result<Vec<RouteStop>, AppError> {
        let stops = sqlx::query_as::<_, RouteStop>(
            "SELECT * FROM route_stops WHERE route_id = ? ORDER BY stop_order ASC",
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(stops)
    }

    pub async fn update(&self, stop: &RouteStop) -> Result<RouteStop, AppError> {
        sqlx::query("UPDATE route_stops SET stop_name = ?, stop_order = ?, landmark = ? WHERE id = ?")
            .bind(&stop.stop_name)
            .bind(stop.stop_order)
            .bind(&stop.landmark)
            .bind(stop.id)
            .execute(&self.pool)
            .await
            .map_err(|e| unique_violation(e, || order_taken(stop.route_id, stop.stop_order)))?;

        self.get(stop.id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM route_stops WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Route stop", id));
        }
        Ok(())
    }
}
