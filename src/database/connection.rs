//! SQLite connection handling
//! 
//! Opens the pool, applies the schema and seeds the bootstrap administrator.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::config::{DatabaseConfig, EnvironmentConfig};
use crate::database::schema::SCHEMA;
use crate::models::user::UserRole;
use crate::repositories::user_repository::{NewUser, UserRepository};

pub struct DatabaseConnection {
    pool: SqlitePool,
}

impl DatabaseConnection {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let pool = config.create_pool().await?;
        info!("✅ Database connected: {}", config.url);
        Ok(Self { pool })
    }

    /// Open the database named by `DATABASE_URL` with the default pool sizing.
    pub async fn new_default(env: &EnvironmentConfig) -> Result<Self> {
        Self::new(&DatabaseConfig::new(env.database_url.clone())).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn initialize(&self) -> Result<()> {
        initialize_schema(&self.pool).await?;
        info!("✅ Schema applied");
        Ok(())
    }
}

pub async fn initialize_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

/// Create the first administrator when the users table is empty.
///
/// Returns `true` when an account was created.
pub async fn ensure_admin(pool: &SqlitePool, config: &EnvironmentConfig) -> Result<bool> {
    let users = UserRepository::new(pool.clone());
    if users.count().await? > 0 {
        return Ok(false);
    }

    let Some(password) = config.admin_password.as_deref() else {
        warn!("⚠️ No users exist and ADMIN_PASSWORD is not set; nobody can log in");
        return Ok(false);
    };

    let password_hash = bcrypt::hash(password, config.bcrypt_cost)?;
    users
        .create(&NewUser {
            username: config.admin_username.clone(),
            password_hash,
            full_name: "System Administrator".to_string(),
            email: None,
            role: UserRole::Admin,
            barangay_id: None,
        })
        .await?;

    info!("👤 Bootstrap administrator '{}' created", config.admin_username);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let pool = DatabaseConfig::in_memory().create_pool().await.unwrap();
        initialize_schema(&pool).await.unwrap();
        initialize_schema(&pool).await.unwrap();

        let (tables,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'tricycle_routes'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 1);
    }

    #[tokio::test]
    async fn test_ensure_admin_only_seeds_empty_table() {
        let pool = DatabaseConfig::in_memory().create_pool().await.unwrap();
        initialize_schema(&pool).await.unwrap();

        let config = EnvironmentConfig {
            admin_password: Some("secret-password".to_string()),
            bcrypt_cost: 4,
            ..EnvironmentConfig::default()
        };

        assert!(ensure_admin(&pool, &config).await.unwrap());
        assert!(!ensure_admin(&pool, &config).await.unwrap());
    }
}
