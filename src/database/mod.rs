//! Database module
//! 
//! Pool creation, schema bootstrap and the initial administrator account.

pub mod connection;
pub mod schema;

pub use connection::DatabaseConnection;
