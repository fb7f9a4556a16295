//! Reorder resolver for drag-and-drop results.
//!
//! # Responsibility
//! - Recompute the canonical order from the id sequence a renderer displays
//!   after a drop.
//!
//! # Invariants
//! - The sort is stable over the whole canonical collection.
//! - Displayed tasks take the relative order of `displayed_ids`.
//! - Tasks missing from `displayed_ids` (filtered out) share one key that
//!   sorts ahead of every displayed position, so they move in front of the
//!   displayed tasks while keeping their mutual order.
//! - Unknown ids in `displayed_ids` are ignored; a repeated id counts at its
//!   first position.

use crate::model::task::Task;
use std::collections::HashMap;

/// Reorders `tasks` in place. Returns whether the canonical order changed.
pub fn resolve_order(tasks: &mut [Task], displayed_ids: &[String]) -> bool {
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(displayed_ids.len());
    for (index, id) in displayed_ids.iter().enumerate() {
        positions.entry(id.as_str()).or_insert(index);
    }
    // `None < Some(_)`: filtered-out tasks lead, as with an index of -1.
    let key = |task: &Task| positions.get(task.id.as_str()).copied();

    if tasks.windows(2).all(|pair| key(&pair[0]) <= key(&pair[1])) {
        return false;
    }
    tasks.sort_by_key(key);
    true
}
