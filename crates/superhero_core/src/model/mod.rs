//! Domain model for superhero records.
//!
//! # Responsibility
//! - Define the canonical record shape used by core business logic.
//! - Define the input contract and its pure validation rules.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `SuperheroId`.
//! - Deletion is represented by a `deleted_at` tombstone, not hard delete.

pub mod superhero;
pub mod validation;
