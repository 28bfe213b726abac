//! Reconciliation of user checklists against the task list
//!
//! A checklist is regenerated from the current tasks. Prior completion is kept
//! for any task whose description still appears somewhere in the old
//! checklist, regardless of the slot it used to occupy. Matching is by
//! description: a reordered task keeps its state, a renamed one starts over,
//! and with duplicate descriptions the first old entry (lowest slot) wins.

use tracing::debug;

use crate::checklist::{Checklist, ChecklistCollection, ChecklistEntry};

/// Build the checklist for `tasks`, carrying over completion from `old`
pub fn reconcile_user(tasks: &[String], old: &Checklist) -> Checklist {
    tasks
        .iter()
        .enumerate()
        .map(|(slot, description)| {
            let completed = old
                .iter()
                .find(|(_, entry)| entry.description == *description)
                .map(|(_, entry)| entry.completed)
                .unwrap_or(false);
            (slot, ChecklistEntry::new(description.clone(), completed))
        })
        .collect()
}

/// Reconcile every user's checklist in place, returning how many users there were
pub fn reconcile_all(tasks: &[String], collection: &mut ChecklistCollection) -> usize {
    debug!(tasks = tasks.len(), users = collection.len(), "reconcile_all: called");
    for checklist in collection.values_mut() {
        *checklist = reconcile_user(tasks, checklist);
    }
    collection.len()
}
