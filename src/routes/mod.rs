//! HTTP routes
//! 
//! One router per resource. Handlers extract the state, the caller's
//! [`RequestContext`](crate::middleware::auth::RequestContext) and the
//! payload, then delegate to a controller.

pub mod admin_routes;
pub mod association_routes;
pub mod auth_routes;
pub mod barangay_routes;
pub mod document_routes;
pub mod driver_routes;
pub mod loading_zone_routes;
pub mod operator_routes;
pub mod restriction_routes;
pub mod route_routes;
pub mod stop_routes;
pub mod submission_routes;
pub mod terminal_routes;

/// Body limit for multipart uploads. Larger than any single file ceiling so
/// oversized files reach the size check and get its message.
pub const UPLOAD_BODY_LIMIT: usize = 25 * 1024 * 1024;
