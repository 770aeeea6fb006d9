//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define scope-explicit data access contracts for superhero rows.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Active and Deleted scopes are separate methods or explicit arguments,
//!   never an implicit global filter.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod superhero_repo;
