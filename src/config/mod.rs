//! Service configuration
//! 
//! Database settings and environment variables.

pub mod database;
pub mod environment;

pub use database::DatabaseConfig;
pub use environment::*;
