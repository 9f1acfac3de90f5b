//! Lookups over a loaded index.
//!
//! Three shapes of question, matching what a navigation widget asks:
//! a package's entries, one symbol by reference, and free-text search.

use crate::index::{Entry, PackageIndex};
use serde::Serialize;

/// One matched entry together with the package that owns it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolHit<'a> {
    pub package: &'a str,
    pub entry: &'a Entry,
}

/// Result of resolving a symbol reference.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveResult<'a> {
    /// Exactly one entry matched.
    Found(SymbolHit<'a>),
    /// Nothing matched.
    NotFound,
    /// Several entries matched a bare identifier.
    Ambiguous(Vec<SymbolHit<'a>>),
}

/// Resolve a symbol reference.
///
/// A fully qualified match wins outright. Otherwise the query is treated as
/// a bare identifier and matched against the final segment of every entry
/// name, which may hit in several packages.
pub fn resolve_symbol<'a>(index: &'a PackageIndex, query: &str) -> ResolveResult<'a> {
    let mut exact = Vec::new();
    let mut by_base = Vec::new();

    for (package, entries) in index.packages() {
        for entry in entries {
            if entry.name() == query {
                exact.push(SymbolHit { package, entry });
            } else if entry.base_name() == query {
                by_base.push(SymbolHit { package, entry });
            }
        }
    }

    let mut hits = if exact.is_empty() { by_base } else { exact };
    match hits.len() {
        0 => ResolveResult::NotFound,
        1 => ResolveResult::Found(hits.remove(0)),
        _ => ResolveResult::Ambiguous(hits),
    }
}

/// Search hits in index order, with a truncation marker.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults<'a> {
    pub hits: Vec<SymbolHit<'a>>,
    /// True when more entries matched than `limit` allowed.
    pub truncated: bool,
}

/// Case-insensitive substring search over fully qualified names.
pub fn search<'a>(index: &'a PackageIndex, needle: &str, limit: usize) -> SearchResults<'a> {
    let needle = needle.to_lowercase();
    let mut hits = Vec::new();
    let mut truncated = false;

    'table: for (package, entries) in index.packages() {
        for entry in entries {
            if entry.name().to_lowercase().contains(&needle) {
                if hits.len() == limit {
                    truncated = true;
                    break 'table;
                }
                hits.push(SymbolHit { package, entry });
            }
        }
    }

    SearchResults { hits, truncated }
}
