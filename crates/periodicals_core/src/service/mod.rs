//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the CLI decoupled from SQL and connection details.

pub mod article_service;
pub mod author_service;
pub mod magazine_service;
pub mod report_service;
