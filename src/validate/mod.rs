//! Shape validation for a package index.
//!
//! Validation never mutates or rejects an index; it walks the table and
//! reports everything a well-formed index must not contain. Structural
//! violations are errors, generator-convention violations are warnings.

use crate::index::{Entry, PackageIndex};
use crate::types::package_to_path;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// Machine-readable rule codes, one per check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rule {
    /// A package's entry list is empty.
    EmptyPackage,
    /// An entry has no role/path pair.
    NoRoles,
    /// An entry's name is the empty string.
    EmptyName,
    /// A role path does not end in `.html`.
    PathExtension,
    /// A role path is not under the slash form of its package.
    PathPrefix,
    /// An entry name is not under its package.
    NamePrefix,
    /// An `object` role path does not end in `$.html`.
    ObjectPageSuffix,
    /// The same name appears twice in one package.
    DuplicateName,
}

impl Rule {
    pub fn severity(&self) -> Severity {
        match self {
            Self::EmptyPackage
            | Self::NoRoles
            | Self::EmptyName
            | Self::PathExtension
            | Self::PathPrefix => Severity::Error,
            Self::NamePrefix | Self::ObjectPageSuffix | Self::DuplicateName => Severity::Warning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyPackage => "EMPTY_PACKAGE",
            Self::NoRoles => "NO_ROLES",
            Self::EmptyName => "EMPTY_NAME",
            Self::PathExtension => "PATH_EXTENSION",
            Self::PathPrefix => "PATH_PREFIX",
            Self::NamePrefix => "NAME_PREFIX",
            Self::ObjectPageSuffix => "OBJECT_PAGE_SUFFIX",
            Self::DuplicateName => "DUPLICATE_NAME",
        }
    }
}

/// One finding: which rule fired, where, and why.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub rule: Rule,
    /// Package the finding belongs to.
    pub package: String,
    /// Entry name, when the finding is about a specific entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &self.entry {
            Some(entry) => write!(
                f,
                "{severity}[{}] {} :: {entry}: {}",
                self.rule.as_str(),
                self.package,
                self.message
            ),
            None => write!(
                f,
                "{severity}[{}] {}: {}",
                self.rule.as_str(),
                self.package,
                self.message
            ),
        }
    }
}

/// All findings for one index, in table order.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Report {
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Whether the index passes: no errors, and in strict mode no
    /// diagnostics at all.
    pub fn passed(&self, strict: bool) -> bool {
        if strict {
            self.is_clean()
        } else {
            self.error_count() == 0
        }
    }

    fn push(&mut self, rule: Rule, package: &str, entry: Option<&str>, message: String) {
        self.diagnostics.push(Diagnostic {
            severity: rule.severity(),
            rule,
            package: package.to_string(),
            entry: entry.map(str::to_string),
            message,
        });
    }
}

/// Check every shape rule against the index.
pub fn validate(index: &PackageIndex) -> Report {
    let mut report = Report::default();

    for (package, entries) in index.packages() {
        if entries.is_empty() {
            report.push(
                Rule::EmptyPackage,
                package,
                None,
                "package has no entries".to_string(),
            );
            continue;
        }

        let prefix = format!("{}/", package_to_path(package));
        let mut seen: HashSet<&str> = HashSet::new();

        for entry in entries {
            if !seen.insert(entry.name()) {
                report.push(
                    Rule::DuplicateName,
                    package,
                    Some(entry.name()),
                    "name occurs more than once in this package".to_string(),
                );
            }
            check_entry(&mut report, package, &prefix, entry);
        }
    }

    debug!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        "validated index"
    );
    report
}

fn check_entry(report: &mut Report, package: &str, prefix: &str, entry: &Entry) {
    let name = entry.name();

    if name.is_empty() {
        report.push(
            Rule::EmptyName,
            package,
            None,
            "entry has an empty name".to_string(),
        );
    } else if !(name.starts_with(package) && name[package.len()..].starts_with('.')) {
        report.push(
            Rule::NamePrefix,
            package,
            Some(name),
            format!("name is not under package '{package}'"),
        );
    }

    if entry.role_count() == 0 {
        report.push(
            Rule::NoRoles,
            package,
            Some(name),
            "entry has no role/path pair".to_string(),
        );
        return;
    }

    for (role, path) in entry.roles() {
        if !path.ends_with(".html") {
            report.push(
                Rule::PathExtension,
                package,
                Some(name),
                format!("{role} path '{path}' does not end in .html"),
            );
        }
        if !path.starts_with(prefix) {
            report.push(
                Rule::PathPrefix,
                package,
                Some(name),
                format!("{role} path '{path}' is not under '{prefix}'"),
            );
        }
        if role.is_companion_page() && !path.ends_with("$.html") {
            report.push(
                Rule::ObjectPageSuffix,
                package,
                Some(name),
                format!("object path '{path}' does not end in $.html"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Entry;
    use crate::types::Role;

    fn rules(report: &Report) -> Vec<Rule> {
        report.diagnostics.iter().map(|d| d.rule).collect()
    }

    fn well_formed() -> PackageIndex {
        let mut index = PackageIndex::new();
        index.insert(
            "mbench.gnuplot",
            Entry::new("mbench.gnuplot.DatFile")
                .with_role(Role::Object, "mbench/gnuplot/DatFile$.html")
                .with_role(Role::CaseClass, "mbench/gnuplot/DatFile.html"),
        );
        index.insert(
            "mbench.gnuplot",
            Entry::new("mbench.gnuplot.Plot")
                .with_role(Role::Object, "mbench/gnuplot/Plot$.html")
                .with_role(Role::Class, "mbench/gnuplot/Plot.html"),
        );
        index
    }

    #[test]
    fn test_clean_index() {
        let report = validate(&well_formed());
        assert!(report.is_clean());
        assert!(report.passed(true));
    }

    #[test]
    fn test_no_roles() {
        let mut index = PackageIndex::new();
        index.insert("mbench", Entry::new("mbench.Host"));
        let report = validate(&index);
        assert_eq!(rules(&report), vec![Rule::NoRoles]);
        assert!(!report.passed(false));
    }

    #[test]
    fn test_empty_name() {
        let mut index = PackageIndex::new();
        index.insert("mbench", Entry::new("").with_role(Role::Object, "mbench/X$.html"));
        let report = validate(&index);
        assert!(rules(&report).contains(&Rule::EmptyName));
    }

    #[test]
    fn test_path_extension() {
        let mut index = PackageIndex::new();
        index.insert(
            "mbench",
            Entry::new("mbench.Host").with_role(Role::Object, "mbench/Host$.htm"),
        );
        let report = validate(&index);
        assert!(rules(&report).contains(&Rule::PathExtension));
    }

    #[test]
    fn test_path_prefix() {
        let mut index = PackageIndex::new();
        index.insert(
            "mbench.fs",
            Entry::new("mbench.fs.File").with_role(Role::CaseClass, "mbench/File.html"),
        );
        let report = validate(&index);
        assert_eq!(rules(&report), vec![Rule::PathPrefix]);
    }

    #[test]
    fn test_name_prefix_warning() {
        let mut index = PackageIndex::new();
        index.insert(
            "mbench.fs",
            Entry::new("other.File").with_role(Role::CaseClass, "mbench/fs/File.html"),
        );
        let report = validate(&index);
        assert_eq!(rules(&report), vec![Rule::NamePrefix]);
        // A warning alone still passes outside strict mode
        assert!(report.passed(false));
        assert!(!report.passed(true));
    }

    #[test]
    fn test_object_page_suffix_warning() {
        let mut index = PackageIndex::new();
        index.insert(
            "mbench",
            Entry::new("mbench.Host").with_role(Role::Object, "mbench/Host.html"),
        );
        let report = validate(&index);
        assert_eq!(rules(&report), vec![Rule::ObjectPageSuffix]);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.error_count(), 0);
    }

    #[test]
    fn test_duplicate_name_warning() {
        let mut index = PackageIndex::new();
        for _ in 0..2 {
            index.insert(
                "mbench",
                Entry::new("mbench.Host").with_role(Role::Object, "mbench/Host$.html"),
            );
        }
        let report = validate(&index);
        assert_eq!(rules(&report), vec![Rule::DuplicateName]);
    }

    #[test]
    fn test_nested_type_page_is_not_flagged() {
        // Class pages may contain `$` for nested types; only object pages
        // carry the `$.html` convention.
        let mut index = PackageIndex::new();
        index.insert(
            "mbench.benchmark",
            Entry::new("mbench.benchmark.package.EnrichedString")
                .with_role(Role::Class, "mbench/benchmark/package$$EnrichedString.html"),
        );
        let report = validate(&index);
        assert_eq!(rules(&report), vec![]);
    }

    #[test]
    fn test_diagnostic_display() {
        let mut index = PackageIndex::new();
        index.insert("mbench", Entry::new("mbench.Host"));
        let report = validate(&index);
        let line = report.diagnostics[0].to_string();
        assert!(line.starts_with("error[NO_ROLES] mbench :: mbench.Host"));
    }
}
