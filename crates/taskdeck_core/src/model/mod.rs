//! Domain model for the task list.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep wire naming aligned with the persisted slot layout.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard removal; no tombstones are kept.

pub mod task;
pub mod theme;
