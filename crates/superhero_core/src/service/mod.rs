//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, asset storage and repository calls into
//!   use-case level APIs.
//! - Keep CLI/HTTP layers decoupled from storage details.

pub mod superhero_service;
