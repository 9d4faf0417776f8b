//! Shared utilities
//! 
//! Error types, field validation, JWT handling, code generation and the
//! filter builder used by listing queries.

pub mod codes;
pub mod errors;
pub mod extract;
pub mod jwt;
pub mod query;
pub mod validation;
