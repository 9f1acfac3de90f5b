//! The package table: an ordered map from package name to its entries.

use crate::index::Entry;
use crate::types::Role;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The whole index, as consumed by a documentation site's search and
/// navigation widget.
///
/// Package names are unique keys. Both package order and entry order within
/// a package are the generator's declaration order; the order carries no
/// meaning beyond display, but it survives parse/serialize round-trips.
///
/// The table is built once (by a generator, or by parsing a file) and read
/// afterwards. The only mutation surface is [`insert`](Self::insert).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageIndex {
    packages: IndexMap<String, Vec<Entry>>,
}

impl PackageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to a package, creating the package slot on first use.
    ///
    /// Slot creation order is the package display order.
    pub fn insert(&mut self, package: impl Into<String>, entry: Entry) {
        self.packages.entry(package.into()).or_default().push(entry);
    }

    /// Entries of one package, in declaration order.
    pub fn get(&self, package: &str) -> Option<&[Entry]> {
        self.packages.get(package).map(Vec::as_slice)
    }

    pub fn contains(&self, package: &str) -> bool {
        self.packages.contains_key(package)
    }

    /// Packages with their entries, in declaration order.
    pub fn packages(&self) -> impl Iterator<Item = (&str, &[Entry])> {
        self.packages
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    /// Package names in declaration order.
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Total entry count across all packages.
    pub fn entry_count(&self) -> usize {
        self.packages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Aggregate counts over the whole table.
    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            packages: self.package_count(),
            ..IndexStats::default()
        };
        for role in Role::ALL {
            stats.roles.insert(role.as_str().to_string(), 0);
        }
        for entries in self.packages.values() {
            stats.entries += entries.len();
            for entry in entries {
                for (role, _) in entry.roles() {
                    stats.pages += 1;
                    *stats.roles.entry(role.as_str().to_string()).or_insert(0) += 1;
                }
            }
        }
        stats
    }
}

/// Aggregate counts for an index, as reported by `docdex stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Number of packages.
    pub packages: usize,
    /// Number of entries across all packages.
    pub entries: usize,
    /// Number of role pages; at least `entries` when the index is valid.
    pub pages: usize,
    /// Page count per role, every role present even at zero.
    pub roles: IndexMap<String, usize>,
}
