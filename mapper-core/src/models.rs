use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{MapperError, Result};

/// A single UUID to name mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Identifier, normally a v4 UUID string but any non-empty string is accepted
    pub uuid: String,
    /// Human-readable name; may be empty or shared by several entries
    pub name: String,
}

impl Entry {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.uuid, self.name)
    }
}

/// Insertion-ordered collection of mappings, keyed by UUID
///
/// Serialized as a flat JSON object `{ "<uuid>": "<name>", ... }`. Iteration
/// order is insertion order, which is also the order used to pick the first
/// match for every lookup by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UuidMappings {
    entries: Vec<Entry>,
}

impl UuidMappings {
    /// Creates an empty set of mappings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Gets the name mapped to a UUID
    pub fn get(&self, uuid: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.uuid == uuid)
            .map(|e| e.name.as_str())
    }

    pub fn contains_uuid(&self, uuid: &str) -> bool {
        self.position_by_uuid(uuid).is_some()
    }

    /// Gets the first entry with the given name
    pub fn find_by_name(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    fn position_by_uuid(&self, uuid: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.uuid == uuid)
    }

    fn position_by_name(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Inserts or overwrites a mapping
    ///
    /// An existing UUID keeps its position and gets the new name; the previous
    /// name is returned. New UUIDs are appended.
    pub fn insert(&mut self, uuid: String, name: String) -> Option<String> {
        match self.position_by_uuid(&uuid) {
            Some(pos) => Some(std::mem::replace(&mut self.entries[pos].name, name)),
            None => {
                self.entries.push(Entry { uuid, name });
                None
            }
        }
    }

    /// Renames the entry with the given UUID
    pub fn rename_by_uuid(&mut self, uuid: &str, new_name: String) -> Result<()> {
        let pos = self
            .position_by_uuid(uuid)
            .ok_or_else(|| MapperError::uuid_not_found(uuid))?;
        self.entries[pos].name = new_name;
        Ok(())
    }

    /// Renames the first entry named `old_name`, returning its UUID
    pub fn rename_by_name(&mut self, old_name: &str, new_name: String) -> Result<String> {
        let pos = self
            .position_by_name(old_name)
            .ok_or_else(|| MapperError::name_not_found(old_name))?;
        self.entries[pos].name = new_name;
        Ok(self.entries[pos].uuid.clone())
    }

    /// Removes the entry with the given UUID
    pub fn remove_by_uuid(&mut self, uuid: &str) -> Result<Entry> {
        let pos = self
            .position_by_uuid(uuid)
            .ok_or_else(|| MapperError::uuid_not_found(uuid))?;
        Ok(self.entries.remove(pos))
    }

    /// Removes the first entry named `name`
    pub fn remove_by_name(&mut self, name: &str) -> Result<Entry> {
        let pos = self
            .position_by_name(name)
            .ok_or_else(|| MapperError::name_not_found(name))?;
        Ok(self.entries.remove(pos))
    }

    /// Moves the first entry named `name` to a new UUID
    ///
    /// The old entry is removed and the new one appended at the end. Returns
    /// the removed entry.
    pub fn reassign_uuid(&mut self, name: &str, new_uuid: String) -> Result<Entry> {
        let old = self.remove_by_name(name)?;
        self.insert(new_uuid, old.name.clone());
        Ok(old)
    }
}

impl<'a> IntoIterator for &'a UuidMappings {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UuidMappings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mappings = UuidMappings::new();
        for (uuid, name) in iter {
            mappings.insert(uuid.into(), name.into());
        }
        mappings
    }
}

impl Serialize for UuidMappings {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.uuid, &entry.name)?;
        }
        map.end()
    }
}

struct UuidMappingsVisitor;

impl<'de> Visitor<'de> for UuidMappingsVisitor {
    type Value = UuidMappings;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an object mapping UUID strings to name strings")
    }

    fn visit_map<A: MapAccess<'de>>(
        self,
        mut access: A,
    ) -> std::result::Result<Self::Value, A::Error> {
        let mut mappings = UuidMappings::new();
        // A repeated key keeps its first position and its last value
        while let Some((uuid, name)) = access.next_entry::<String, String>()? {
            mappings.insert(uuid, name);
        }
        Ok(mappings)
    }
}

impl<'de> Deserialize<'de> for UuidMappings {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(UuidMappingsVisitor)
    }
}
