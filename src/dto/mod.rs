pub mod api_response;
pub mod auth_dto;
pub mod pagination;

pub use api_response::ApiResponse;
pub use pagination::{ListFilter, Page};
