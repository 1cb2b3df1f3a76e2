//! Use-case services over the data-access layer.
//!
//! # Responsibility
//! - Orchestrate repository calls into domain-level APIs for the shell.
//! - Translate storage-level outcomes into domain success/error semantics.

pub mod project_service;
