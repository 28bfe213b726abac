//! Per-user checklist types and the daily reset transition

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use tracing::debug;

/// One task's completion state in a user's checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistEntry {
    /// Copy of the task description at sync time
    pub description: String,
    pub completed: bool,
}

impl ChecklistEntry {
    pub fn new(description: impl Into<String>, completed: bool) -> Self {
        Self {
            description: description.into(),
            completed,
        }
    }
}

/// A user's checklist, keyed by 0-based slot id
///
/// Serialized as a JSON object whose keys are the decimal slot ids. Iteration
/// is in ascending slot order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checklist(BTreeMap<usize, ChecklistEntry>);

impl Checklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&ChecklistEntry> {
        self.0.get(&slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut ChecklistEntry> {
        self.0.get_mut(&slot)
    }

    pub fn insert(&mut self, slot: usize, entry: ChecklistEntry) -> Option<ChecklistEntry> {
        self.0.insert(slot, entry)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, usize, ChecklistEntry> {
        self.0.iter()
    }

    pub fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.keys().copied()
    }

    /// Number of completed entries
    pub fn completed_count(&self) -> usize {
        self.0.values().filter(|e| e.completed).count()
    }

    /// Clear every completion flag, returning how many were set
    pub fn reset(&mut self) -> usize {
        let mut cleared = 0;
        for entry in self.0.values_mut() {
            if entry.completed {
                entry.completed = false;
                cleared += 1;
            }
        }
        cleared
    }
}

impl<'a> IntoIterator for &'a Checklist {
    type Item = (&'a usize, &'a ChecklistEntry);
    type IntoIter = btree_map::Iter<'a, usize, ChecklistEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(usize, ChecklistEntry)> for Checklist {
    fn from_iter<I: IntoIterator<Item = (usize, ChecklistEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Every user's checklist, keyed by user id
pub type ChecklistCollection = BTreeMap<String, Checklist>;

/// Daily reset: clear all completion flags for all users
///
/// Slots and descriptions are untouched. Returns the number of flags cleared,
/// so a second run in a row returns 0.
pub fn reset_all(collection: &mut ChecklistCollection) -> usize {
    debug!(users = collection.len(), "reset_all: called");
    collection.values_mut().map(Checklist::reset).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checklist(entries: &[(&str, bool)]) -> Checklist {
        entries
            .iter()
            .enumerate()
            .map(|(i, (d, c))| (i, ChecklistEntry::new(*d, *c)))
            .collect()
    }

    #[test]
    fn test_serializes_slot_ids_as_strings() {
        let list = checklist(&[("Dungeon", true), ("Gather", false)]);
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["0"]["description"], "Dungeon");
        assert_eq!(json["0"]["completed"], true);
        assert_eq!(json["1"]["completed"], false);
    }

    #[test]
    fn test_deserializes_existing_document() {
        let json = r#"{"1": {"description": "B", "completed": false}, "0": {"description": "A", "completed": true}}"#;
        let list: Checklist = serde_json::from_str(json).unwrap();
        assert_eq!(list.slots().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(list.get(0), Some(&ChecklistEntry::new("A", true)));
    }

    #[test]
    fn test_slot_order_is_numeric() {
        let list = checklist(&["t"; 12].map(|d| (d, false)));
        let slots: Vec<usize> = list.slots().collect();
        assert_eq!(slots, (0..12).collect::<Vec<_>>());

        let json = serde_json::to_string(&list).unwrap();
        let back: Checklist = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn test_completed_count() {
        let list = checklist(&[("A", true), ("B", false), ("C", true)]);
        assert_eq!(list.completed_count(), 2);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_reset_all_clears_flags_only() {
        let mut collection = ChecklistCollection::new();
        collection.insert("1".to_string(), checklist(&[("A", true), ("B", false)]));
        collection.insert("2".to_string(), checklist(&[("A", true), ("B", true)]));
        collection.insert("3".to_string(), Checklist::new());

        let cleared = reset_all(&mut collection);
        assert_eq!(cleared, 3);

        assert_eq!(collection["1"], checklist(&[("A", false), ("B", false)]));
        assert_eq!(collection["2"], checklist(&[("A", false), ("B", false)]));
        assert!(collection["3"].is_empty());
    }

    #[test]
    fn test_reset_all_is_idempotent() {
        let mut collection = ChecklistCollection::new();
        collection.insert("1".to_string(), checklist(&[("A", true), ("B", false)]));

        reset_all(&mut collection);
        let once = collection.clone();

        assert_eq!(reset_all(&mut collection), 0);
        assert_eq!(collection, once);
    }
}
