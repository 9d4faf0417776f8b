use sqlx::SqlitePool;
use tracing::{info, warn};
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::middleware::auth::RequestContext;
use crate::models::status::RecordStatus;
use crate::models::user::UserResponse;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthController {
    users: UserRepository,
    jwt: JwtConfig,
}

impl AuthController {
    pub fn new(pool: SqlitePool, config: &EnvironmentConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt: JwtConfig::from(config),
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        request.validate()?;

        let invalid = || AppError::Unauthorized("Invalid username or password".to_string());

        let Some(user) = self.users.find_by_username(&request.username).await? else {
            warn!("🔑 Login failed for unknown user '{}'", request.username);
            return Err(invalid());
        };

        if !bcrypt::verify(&request.password, &user.password_hash)? {
            warn!("🔑 Wrong password for '{}'", user.username);
            return Err(invalid());
        }

        if user.status != RecordStatus::Active {
            return Err(AppError::Forbidden(format!("Account is {}", user.status)));
        }

        let token = generate_token(user.id, user.role, user.barangay_id, &self.jwt)?;
        info!("🔓 User '{}' logged in as {}", user.username, user.role.as_str());

        Ok(LoginResponse::new(token, self.jwt.expiration, UserResponse::from(user)))
    }

    pub async fn me(&self, ctx: &RequestContext) -> Result<UserResponse, AppError> {
        self.users
            .find_by_id(ctx.user_id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))
    }
}
