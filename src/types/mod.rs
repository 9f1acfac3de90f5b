//! Core vocabulary shared across the crate.
//!
//! A documentation index groups *entries* (documented symbols) under dotted
//! *package* names. Each entry is documented by one page per *role*, where a
//! role is the kind of construct the page describes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of documented construct a page describes.
///
/// The vocabulary is fixed: an index never carries any other role key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Singleton value, documented on a `<Symbol>$.html` page.
    #[serde(rename = "object")]
    Object,
    #[serde(rename = "class")]
    Class,
    #[serde(rename = "case class")]
    CaseClass,
    #[serde(rename = "trait")]
    Trait,
}

impl Role {
    /// All roles, in the order they are reported by `stats`.
    pub const ALL: [Role; 4] = [Role::Object, Role::Class, Role::CaseClass, Role::Trait];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Class => "class",
            Self::CaseClass => "case class",
            Self::Trait => "trait",
        }
    }

    /// Whether pages for this role conventionally end in `$.html`.
    ///
    /// The `$` suffix marks the page of a singleton/companion value.
    pub fn is_companion_page(&self) -> bool {
        matches!(self, Self::Object)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "object" => Ok(Self::Object),
            "class" => Ok(Self::Class),
            "case class" => Ok(Self::CaseClass),
            "trait" => Ok(Self::Trait),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// A role key outside the fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}', expected one of: object, class, case class, trait")]
pub struct UnknownRole(pub String);

/// Slash form of a dotted package name.
///
/// The slash form is the directory prefix of every page path belonging to
/// the package: `mbench.gnuplot` owns pages under `mbench/gnuplot/`.
pub fn package_to_path(package: &str) -> String {
    package.replace('.', "/")
}

/// Dotted package name for a slash-separated directory prefix.
pub fn path_to_package(path: &str) -> String {
    path.replace('/', ".")
}

/// Final segment of a dotted identifier.
pub fn base_name(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_rejects_unknown() {
        let err = "enum".parse::<Role>().unwrap_err();
        assert_eq!(err, UnknownRole("enum".to_string()));

        // The two-word role must match exactly, not per word
        assert!("case".parse::<Role>().is_err());
        assert!("caseclass".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::CaseClass.to_string(), "case class");
        assert_eq!(Role::Object.to_string(), "object");
    }

    #[test]
    fn test_companion_page_roles() {
        assert!(Role::Object.is_companion_page());
        assert!(!Role::Class.is_companion_page());
        assert!(!Role::CaseClass.is_companion_page());
        assert!(!Role::Trait.is_companion_page());
    }

    #[test]
    fn test_package_path_conversion() {
        assert_eq!(package_to_path("mbench.gnuplot"), "mbench/gnuplot");
        assert_eq!(package_to_path("mbench"), "mbench");
        assert_eq!(path_to_package("mbench/gnuplot"), "mbench.gnuplot");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("mbench.gnuplot.DatFile"), "DatFile");
        assert_eq!(base_name("Host"), "Host");
        assert_eq!(base_name("mbench.Host"), "Host");
    }
}
