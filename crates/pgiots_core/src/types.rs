//! Schema metadata consumed by the emitters.
//!
//! Tables and enum collections are insertion-ordered: output declaration and
//! column order follow the order the schema provider returned them in. JSON
//! objects deserialize in document order.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// One column as reported by a schema provider.
///
/// `type_tag` is optional only at this boundary: an absent tag is rejected by
/// the type mapper with [`crate::GenError::UnsupportedType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    #[serde(default, alias = "tsType", skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    #[serde(default)]
    pub nullable: bool,
}

impl ColumnDefinition {
    /// A non-nullable column with the given tag.
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: Some(type_tag.into()),
            nullable: false,
        }
    }

    /// A nullable column with the given tag.
    pub fn nullable(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: Some(type_tag.into()),
            nullable: true,
        }
    }

    /// A column whose tag is missing.
    pub fn untyped() -> Self {
        Self {
            type_tag: None,
            nullable: false,
        }
    }
}

/// Ordered mapping of raw column name to column definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDefinition {
    columns: Vec<(String, ColumnDefinition)>,
}

impl TableDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. A repeated name replaces the earlier definition in place.
    pub fn push(&mut self, name: impl Into<String>, column: ColumnDefinition) {
        let name = name.into();
        match self.columns.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = column,
            None => self.columns.push((name, column)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, column)| column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnDefinition)> {
        self.columns.iter().map(|(name, column)| (name.as_str(), column))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, ColumnDefinition)> for TableDefinition {
    fn from_iter<I: IntoIterator<Item = (N, ColumnDefinition)>>(iter: I) -> Self {
        let mut table = TableDefinition::new();
        for (name, column) in iter {
            table.push(name, column);
        }
        table
    }
}

/// Ordered mapping of raw enum name to its member labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumDefinitions {
    enums: Vec<(String, Vec<String>)>,
}

impl EnumDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an enum. A repeated name replaces the earlier member list in place.
    pub fn insert(&mut self, name: impl Into<String>, members: Vec<String>) {
        let name = name.into();
        match self.enums.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = members,
            None => self.enums.push((name, members)),
        }
    }

    /// Append one member to an enum, creating the enum on first use.
    pub fn push_member(&mut self, name: &str, member: impl Into<String>) {
        match self.enums.iter_mut().find(|(existing, _)| existing == name) {
            Some(slot) => slot.1.push(member.into()),
            None => self.enums.push((name.to_string(), vec![member.into()])),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.enums.iter().any(|(existing, _)| existing == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.enums.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.enums
            .iter()
            .map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.enums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enums.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, Vec<String>)> for EnumDefinitions {
    fn from_iter<I: IntoIterator<Item = (N, Vec<String>)>>(iter: I) -> Self {
        let mut enums = EnumDefinitions::new();
        for (name, members) in iter {
            enums.insert(name, members);
        }
        enums
    }
}

// ============================================================================
// Ordered serde support
// ============================================================================

struct OrderedMapVisitor<V> {
    expecting: &'static str,
    marker: PhantomData<V>,
}

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = Vec<(String, V)>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.expecting)
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            entries.push((key, value));
        }
        Ok(entries)
    }
}

fn serialize_ordered<S, V, I>(entries: I, len: usize, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
    I: Iterator<Item = (String, V)>,
{
    let mut map = serializer.serialize_map(Some(len))?;
    for (key, value) in entries {
        map.serialize_entry(&key, &value)?;
    }
    map.end()
}

impl Serialize for TableDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_ordered(
            self.columns.iter().map(|(k, v)| (k.clone(), v)),
            self.columns.len(),
            serializer,
        )
    }
}

impl<'de> Deserialize<'de> for TableDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = deserializer.deserialize_map(OrderedMapVisitor::<ColumnDefinition> {
            expecting: "a map of column name to column definition",
            marker: PhantomData,
        })?;
        Ok(entries.into_iter().collect())
    }
}

impl Serialize for EnumDefinitions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_ordered(
            self.enums.iter().map(|(k, v)| (k.clone(), v)),
            self.enums.len(),
            serializer,
        )
    }
}

impl<'de> Deserialize<'de> for EnumDefinitions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = deserializer.deserialize_map(OrderedMapVisitor::<Vec<String>> {
            expecting: "a map of enum name to member list",
            marker: PhantomData,
        })?;
        Ok(entries.into_iter().collect())
    }
}
