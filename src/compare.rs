//! Path-level comparison of two manifests.
//!
//! Files are matched by manifest key only. Sizes never decide which class a
//! path falls into; a path present on both sides stays "in both" with both
//! sizes retained, so callers can spot files whose size drifted.

use crate::manifest::Manifest;
use serde::Serialize;
use std::collections::BTreeMap;

/// Sizes of a path present in both manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SharedEntry {
    pub size_a: u64,
    pub size_b: u64,
}

impl SharedEntry {
    pub fn size_differs(&self) -> bool {
        self.size_a != self.size_b
    }
}

/// Partition of the union of two manifests' paths.
///
/// The three maps are disjoint and together cover every path of both inputs.
/// Being `BTreeMap`s, all of them iterate in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Paths only in A, with their size in A.
    pub only_in_a: BTreeMap<String, u64>,
    /// Paths only in B, with their size in B.
    pub only_in_b: BTreeMap<String, u64>,
    pub in_both: BTreeMap<String, SharedEntry>,
}

impl DiffResult {
    pub fn size_only_in_a(&self) -> u64 {
        saturating_sum(self.only_in_a.values().copied())
    }

    pub fn size_only_in_b(&self) -> u64 {
        saturating_sum(self.only_in_b.values().copied())
    }

    /// Total size of the shared paths as recorded in A.
    pub fn size_in_both_a(&self) -> u64 {
        saturating_sum(self.in_both.values().map(|e| e.size_a))
    }

    /// Total size of the shared paths as recorded in B.
    pub fn size_in_both_b(&self) -> u64 {
        saturating_sum(self.in_both.values().map(|e| e.size_b))
    }

    /// Shared paths whose size differs between A and B, in path order.
    pub fn size_drift(&self) -> impl Iterator<Item = (&String, &SharedEntry)> {
        self.in_both.iter().filter(|(_, e)| e.size_differs())
    }

    /// Paths present on exactly one side: those only in A, then those only in
    /// B, each in path order.
    pub fn differing_paths(&self) -> Vec<String> {
        self.only_in_a
            .keys()
            .chain(self.only_in_b.keys())
            .cloned()
            .collect()
    }

    pub fn has_differences(&self) -> bool {
        !self.only_in_a.is_empty() || !self.only_in_b.is_empty()
    }
}

fn saturating_sum(sizes: impl Iterator<Item = u64>) -> u64 {
    sizes.fold(0, u64::saturating_add)
}

/// Classify every path of `a` and `b` as only in A, only in B, or in both.
pub fn diff(a: &Manifest, b: &Manifest) -> DiffResult {
    let mut result = DiffResult::default();

    for (path, &size_a) in a {
        match b.get(path) {
            Some(size_b) => {
                result
                    .in_both
                    .insert(path.clone(), SharedEntry { size_a, size_b });
            }
            None => {
                result.only_in_a.insert(path.clone(), size_a);
            }
        }
    }

    for (path, &size_b) in b {
        if !a.contains(path) {
            result.only_in_b.insert(path.clone(), size_b);
        }
    }

    result
}
