//! Domain model for tracked projects and their child records.
//!
//! # Responsibility
//! - Define the canonical entity records mapped to relational rows.
//! - Own the fixed-point scale invariant for decimal attributes.
//!
//! # Invariants
//! - Every persisted entity is identified by a store-assigned integer id.
//! - Child records are read-only projections; only `project` rows are
//!   written by this core.

pub mod project;
