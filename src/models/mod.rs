//! Data models
//! 
//! Row types that map the SQLite schema, plus the status enums and the
//! route workflow transition table.

pub mod approval_log;
pub mod association;
pub mod barangay;
pub mod document;
pub mod driver;
pub mod loading_zone;
pub mod operator;
pub mod restriction;
pub mod route;
pub mod route_stop;
pub mod status;
pub mod submission;
pub mod terminal;
pub mod user;
