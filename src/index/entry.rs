//! A single documented symbol and the pages that document it.

use crate::types::{self, Role};
use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One documented symbol: a fully qualified name plus one page per role.
///
/// A symbol usually has a single role. Two roles occur when a companion
/// value and a type share a name, in which case the entry carries both the
/// `<Symbol>$.html` and the `<Symbol>.html` page.
///
/// Role order is preserved: it is the order the generator emitted and the
/// order a navigation widget displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    roles: IndexMap<Role, String>,
}

impl Entry {
    /// Create an entry with no roles yet. An entry without at least one
    /// role is flagged by validation, not rejected here.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roles: IndexMap::new(),
        }
    }

    /// Attach a role page, replacing any previous path for the same role.
    pub fn with_role(mut self, role: Role, path: impl Into<String>) -> Self {
        self.roles.insert(role, path.into());
        self
    }

    /// Fully qualified dotted name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Final segment of the name, the identifier a reader searches for.
    pub fn base_name(&self) -> &str {
        types::base_name(&self.name)
    }

    /// Role pages in emission order.
    pub fn roles(&self) -> impl Iterator<Item = (Role, &str)> {
        self.roles.iter().map(|(role, path)| (*role, path.as_str()))
    }

    pub fn role_count(&self) -> usize {
        self.roles.len()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains_key(&role)
    }

    /// Page path for one role, if the entry carries it.
    pub fn path(&self, role: Role) -> Option<&str> {
        self.roles.get(&role).map(String::as_str)
    }
}

// An entry is a flat JSON object mixing role keys with the "name" key:
//
//   {"object" : "mbench/gnuplot/DatFile$.html",
//    "case class" : "mbench/gnuplot/DatFile.html",
//    "name" : "mbench.gnuplot.DatFile"}
//
// so serialization is hand-written: roles first, in order, "name" last,
// matching the generator. Deserialization accepts the keys in any order.

impl Serialize for Entry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.roles.len() + 1))?;
        for (role, path) in &self.roles {
            map.serialize_entry(role.as_str(), path)?;
        }
        map.serialize_entry("name", &self.name)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = Entry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an index entry object with role paths and a name")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Entry, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut name: Option<String> = None;
                let mut roles = IndexMap::new();

                while let Some(key) = access.next_key::<String>()? {
                    if key == "name" {
                        if name.is_some() {
                            return Err(de::Error::duplicate_field("name"));
                        }
                        name = Some(access.next_value()?);
                    } else {
                        let role: Role = key.parse().map_err(de::Error::custom)?;
                        let path: String = access.next_value()?;
                        if roles.insert(role, path).is_some() {
                            return Err(de::Error::custom(format!("duplicate role '{role}'")));
                        }
                    }
                }

                let name = name.ok_or_else(|| de::Error::missing_field("name"))?;
                Ok(Entry { name, roles })
            }
        }

        deserializer.deserialize_map(EntryVisitor)
    }
}
