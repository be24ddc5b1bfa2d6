//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate the import pipeline and repository writes.
//! - Keep CLI callers decoupled from storage details.

pub mod import_service;
