//! Data-access layer: row mapping and transactional project persistence.
//!
//! # Responsibility
//! - Define the repository contract the service layer orchestrates.
//! - Keep SQL text, binding, and transaction control inside this boundary.
//!
//! # Invariants
//! - Every public operation owns exactly one connection and one
//!   transaction, committed on success and rolled back on any failure.
//! - "No row matched" is a typed outcome, never an error.

pub mod mapper;
pub mod project_repo;
