use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Mapping from canonical relative path to file size in bytes.
///
/// Backed by a `BTreeMap` so iteration, serialization and anything derived
/// from it is ordered by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    files: BTreeMap<String, u64>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: String, size: u64) -> Option<u64> {
        self.files.insert(path, size)
    }

    pub fn get(&self, path: &str) -> Option<u64> {
        self.files.get(path).copied()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    #[cfg(test)]
    pub fn paths(&self) -> btree_map::Keys<'_, String, u64> {
        self.files.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Sum of all sizes, saturating at `u64::MAX`.
    pub fn total_size(&self) -> u64 {
        self.files
            .values()
            .fold(0u64, |total, &size| total.saturating_add(size))
    }

    /// Sum of all sizes, or `None` if it does not fit in a `u64`.
    pub fn checked_total_size(&self) -> Option<u64> {
        self.files
            .values()
            .try_fold(0u64, |total, &size| total.checked_add(size))
    }
}

impl FromIterator<(String, u64)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Manifest {
            files: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = (&'a String, &'a u64);
    type IntoIter = btree_map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// A manifest together with the directory it was scanned from.
///
/// File count and total size are always derived from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDocument {
    pub source_directory: String,
    pub manifest: Manifest,
}

impl ManifestDocument {
    pub fn new(source_directory: impl Into<String>, manifest: Manifest) -> Self {
        ManifestDocument {
            source_directory: source_directory.into(),
            manifest,
        }
    }

    pub fn total_files(&self) -> usize {
        self.manifest.file_count()
    }

    pub fn total_size(&self) -> u64 {
        self.manifest.total_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_are_derived_from_entries() {
        let manifest: Manifest = [("a".to_string(), 3), ("b/c".to_string(), 7)]
            .into_iter()
            .collect();
        let doc = ManifestDocument::new("/root", manifest);

        assert_eq!(doc.total_files(), 2);
        assert_eq!(doc.total_size(), 10);
    }

    #[test]
    fn empty_manifest_has_zero_totals() {
        let manifest = Manifest::new();

        assert!(manifest.is_empty());
        assert_eq!(manifest.file_count(), 0);
        assert_eq!(manifest.total_size(), 0);
    }

    #[test]
    fn total_size_saturates_on_overflow() {
        let manifest: Manifest = [("a".to_string(), u64::MAX), ("b".to_string(), 1)]
            .into_iter()
            .collect();

        assert_eq!(manifest.total_size(), u64::MAX);
        assert_eq!(manifest.checked_total_size(), None);
    }

    #[test]
    fn checked_total_size_fits() {
        let manifest: Manifest = [("a".to_string(), u64::MAX - 1), ("b".to_string(), 1)]
            .into_iter()
            .collect();

        assert_eq!(manifest.checked_total_size(), Some(u64::MAX));
    }

    #[test]
    fn iteration_is_ordered_by_path() {
        let mut manifest = Manifest::new();
        manifest.insert("zeta".to_string(), 1);
        manifest.insert("alpha/beta".to_string(), 2);
        manifest.insert("alpha".to_string(), 3);

        let paths: Vec<&str> = manifest.paths().map(String::as_str).collect();
        assert_eq!(paths, vec!["alpha", "alpha/beta", "zeta"]);
    }
}
