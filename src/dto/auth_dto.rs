use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::{UserResponse, UserRole};

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: UserResponse,
}

impl LoginResponse {
    pub fn new(token: String, expires_in: u64, user: UserResponse) -> Self {
        Self {
            token,
            token_type: "Bearer",
            expires_in,
            user,
        }
    }
}

// Account creation by an administrator
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3 to 50 characters"))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 150, message = "Full name is required"))]
    pub full_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    pub role: UserRole,

    /// Required for staff accounts.
    pub barangay_id: Option<i64>,
}
