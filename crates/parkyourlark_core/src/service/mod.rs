//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate parser and store calls into use-case level APIs.
//! - Keep HTTP and process wiring decoupled from storage details.

pub mod admin_service;
