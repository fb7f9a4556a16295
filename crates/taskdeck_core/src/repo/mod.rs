//! Repository layer: slot storage and persistence adapters.
//!
//! # Responsibility
//! - Define the durable key/value contract (`SlotStore`).
//! - Isolate JSON encoding of slot values from service orchestration.
//!
//! # Invariants
//! - Each slot has exactly one repository writing it.
//! - Read paths fail open; write paths report errors.

pub mod slot_store;
pub mod task_repo;
pub mod theme_repo;
