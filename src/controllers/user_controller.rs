use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

use crate::controllers::ensure_barangay_exists;
use crate::dto::auth_dto::CreateUserRequest;
use crate::dto::ApiResponse;
use crate::models::user::{UserResponse, UserRole};
use crate::repositories::user_repository::{NewUser, UserRepository};
use crate::utils::errors::{validation_error, AppError};
use crate::utils::validation::non_blank;

pub struct UserController {
    pool: SqlitePool,
    repository: UserRepository,
    bcrypt_cost: u32,
}

impl UserController {
    pub fn new(pool: SqlitePool, bcrypt_cost: u32) -> Self {
        Self {
            repository: UserRepository::new(pool.clone()),
            pool,
            bcrypt_cost,
        }
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<ApiResponse<UserResponse>, AppError> {
        request.validate()?;

        let barangay_id = match (request.role, request.barangay_id) {
            (UserRole::Staff, None) => {
                return Err(validation_error("barangay_id", "Staff accounts need a barangay"))
            }
            (_, Some(id)) => {
                ensure_barangay_exists(&self.pool, id).await?;
                Some(id)
            }
            (UserRole::Admin, None) => None,
        };

        let password_hash = bcrypt::hash(&request.password, self.bcrypt_cost)?;
        let user = self
            .repository
            .create(&NewUser {
                username: request.username.trim().to_string(),
                password_hash,
                full_name: request.full_name.trim().to_string(),
                email: non_blank(request.email),
                role: request.role,
                barangay_id,
            })
            .await?;

        info!("👤 User '{}' created ({})", user.username, user.role.as_str());
        Ok(ApiResponse::success_with_message(
            UserResponse::from(user),
            "User created successfully",
        ))
    }

    pub async fn list(&self) -> Result<Vec<UserResponse>, AppError> {
        let users = self.repository.list().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }
}
