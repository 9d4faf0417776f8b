use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RouteStop {
    pub id: i64,
    pub route_id: i64,
    pub stop_name: String,
    pub stop_order: i64,
    pub landmark: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRouteStopRequest {
    #[validate(length(min = 1, max = 150, message = "Stop name is required"))]
    pub stop_name: String,

    #[validate(range(min = 1, message = "Stop order starts at 1"))]
    pub stop_order: i64,

    #[validate(length(max = 255))]
    pub landmark: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRouteStopRequest {
    #[validate(length(min = 1, max = 150))]
    pub stop_name: Option<String>,

    #[validate(range(min = 1, message = "Stop order starts at 1"))]
    pub stop_order: Option<i64>,

    #[validate(length(max = 255))]
    pub landmark: Option<String>,
}
