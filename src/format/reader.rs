//! Parsing of package index files.

use crate::format::{FormatError, FormatResult};
use crate::index::PackageIndex;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Left-hand side of the assignment form.
const ASSIGNMENT_LHS: &str = "Index.PACKAGES";

/// Read and parse an index file in either supported form.
pub fn read_index(path: impl AsRef<Path>) -> FormatResult<PackageIndex> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|cause| FormatError::FileRead {
        path: path.to_path_buf(),
        cause,
    })?;
    let index = parse_index(&content)?;
    debug!(
        path = %path.display(),
        packages = index.package_count(),
        entries = index.entry_count(),
        "parsed index file"
    );
    Ok(index)
}

/// Parse an index from a string.
///
/// Accepts the JavaScript assignment form (`Index.PACKAGES = {...};`, with
/// arbitrary surrounding whitespace and an optional trailing semicolon) and
/// a bare JSON object. `\/` escapes decode per JSON rules.
pub fn parse_index(input: &str) -> FormatResult<PackageIndex> {
    let body = strip_assignment(input)?;
    Ok(serde_json::from_str(body)?)
}

/// Reduce the input to its JSON body.
fn strip_assignment(input: &str) -> FormatResult<&str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FormatError::Empty);
    }
    if trimmed.starts_with('{') {
        return Ok(trimmed);
    }

    let Some(rest) = trimmed.strip_prefix(ASSIGNMENT_LHS) else {
        let found: String = trimmed.chars().take(40).collect();
        return Err(FormatError::UnexpectedInput { found });
    };
    let rest = rest.trim_start();
    let Some(rest) = rest.strip_prefix('=') else {
        return Err(FormatError::MissingEquals);
    };
    Ok(rest.trim().trim_end_matches(';').trim_end())
}
