//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate the task collection, persistence and observers.
//! - Keep renderers decoupled from storage details.

pub mod dispatch;
pub mod stats;
pub mod task_store;
