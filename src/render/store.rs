// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Keyed annotation store owned by one renderer.

use std::collections::{HashMap, HashSet};

use crate::models::annotation::Annotation;

#[derive(Debug, Clone)]
struct Entry {
    annotation: Annotation,
    seq: u64,
}

/// Annotations keyed by id.
///
/// Lookups ignore insertion order; snapshots come back in insertion order so
/// hosts get a stable list.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    entries: HashMap<String, Entry>,
    next_seq: u64,
}

/// Changes needed to turn the current store into a target list.
#[derive(Debug, PartialEq)]
pub struct Delta<'a> {
    pub to_add: Vec<&'a Annotation>,
    pub to_remove: Vec<String>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Annotation> {
        self.entries.get(id).map(|e| &e.annotation)
    }

    /// Insert or replace by id; a replaced annotation keeps its position.
    pub fn insert(&mut self, annotation: Annotation) -> Option<Annotation> {
        match self.entries.get_mut(&annotation.id) {
            Some(entry) => Some(std::mem::replace(&mut entry.annotation, annotation)),
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.entries.insert(annotation.id.clone(), Entry { annotation, seq });
                None
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Annotation> {
        self.entries.remove(id).map(|e| e.annotation)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Annotations in insertion order.
    pub fn ordered(&self) -> Vec<&Annotation> {
        let mut entries: Vec<&Entry> = self.entries.values().collect();
        entries.sort_by_key(|e| e.seq);
        entries.into_iter().map(|e| &e.annotation).collect()
    }

    /// Owned copy of the annotations in insertion order.
    pub fn snapshot(&self) -> Vec<Annotation> {
        self.ordered().into_iter().cloned().collect()
    }

    /// Id-set difference against `target`.
    ///
    /// Ids present on both sides are left out even when their contents differ.
    /// Duplicate ids in `target` count once, first occurrence wins.
    pub fn diff<'a>(&self, target: &'a [Annotation]) -> Delta<'a> {
        let mut target_ids: HashSet<&str> = HashSet::with_capacity(target.len());
        let mut to_add = Vec::new();
        for annotation in target {
            if target_ids.insert(annotation.id.as_str()) && !self.contains(&annotation.id) {
                to_add.push(annotation);
            }
        }

        let mut stale: Vec<&Entry> = self
            .entries
            .values()
            .filter(|e| !target_ids.contains(e.annotation.id.as_str()))
            .collect();
        stale.sort_by_key(|e| e.seq);

        Delta {
            to_add,
            to_remove: stale.into_iter().map(|e| e.annotation.id.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{AnnotationKind, Position};

    fn point(id: &str) -> Annotation {
        Annotation::new(id, "f1", AnnotationKind::Point, Position::point(1.0, 2.0))
    }

    fn ids(list: &[Annotation]) -> Vec<&str> {
        list.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_snapshot_keeps_insertion_order() {
        let mut store = AnnotationStore::new();
        for id in ["c", "a", "b"] {
            store.insert(point(id));
        }
        assert_eq!(ids(&store.snapshot()), vec!["c", "a", "b"]);

        store.insert(point("a"));
        assert_eq!(ids(&store.snapshot()), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut store = AnnotationStore::new();
        assert!(store.insert(point("a")).is_none());
        let replaced = store.insert(point("a").with_label("renamed"));
        assert_eq!(replaced.unwrap().label, "");
        assert_eq!(store.get("a").unwrap().label, "renamed");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_diff_is_id_set_difference() {
        let mut store = AnnotationStore::new();
        store.insert(point("a1"));
        store.insert(point("a2"));

        let target = vec![point("a2").with_label("edited"), point("a3"), point("a3")];
        let delta = store.diff(&target);

        assert_eq!(delta.to_add.len(), 1);
        assert_eq!(delta.to_add[0].id, "a3");
        assert_eq!(delta.to_remove, vec!["a1".to_string()]);
    }

    #[test]
    fn test_diff_against_empty_target_removes_all() {
        let mut store = AnnotationStore::new();
        store.insert(point("x"));
        store.insert(point("y"));

        let delta = store.diff(&[]);
        assert!(delta.to_add.is_empty());
        assert_eq!(delta.to_remove, vec!["x".to_string(), "y".to_string()]);
    }
}
