//! The mapping store
//!
//! [`UuidMapper`] owns the in-memory mappings together with the [`Storage`]
//! they are persisted to. Every mutation is applied to a working copy, saved,
//! and only then committed, so the in-memory state always matches the last
//! successful save.

use log::{debug, info, warn};
use std::path::Path;
use uuid::Uuid;

use crate::error::{MapperError, Result};
use crate::models::{Entry, UuidMappings};
use crate::storage::Storage;

/// Source of fresh identifiers
pub trait IdGenerator {
    fn generate(&self) -> String;
}

impl<F> IdGenerator for F
where
    F: Fn() -> String,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Generates random v4 UUIDs in canonical hyphenated form
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4Generator;

impl IdGenerator for UuidV4Generator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Persistent UUID to name store backed by a single JSON file
pub struct UuidMapper {
    storage: Storage,
    mappings: UuidMappings,
    generator: Box<dyn IdGenerator>,
}

impl UuidMapper {
    /// Opens the store at `path`, loading existing mappings if the file exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_generator(path, UuidV4Generator)
    }

    /// Opens the store with a custom identifier generator
    pub fn open_with_generator<P, G>(path: P, generator: G) -> Result<Self>
    where
        P: AsRef<Path>,
        G: IdGenerator + 'static,
    {
        let storage = Storage::new(path);
        let mappings = storage.load()?;
        Ok(Self {
            storage,
            mappings,
            generator: Box::new(generator),
        })
    }

    /// Returns the path to the backing file
    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    pub fn mappings(&self) -> &UuidMappings {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Discards in-memory state and reads the backing file again
    pub fn reload(&mut self) -> Result<()> {
        self.mappings = self.storage.load()?;
        Ok(())
    }

    /// Lists all mappings in insertion order
    pub fn list(&self) -> &[Entry] {
        self.mappings.entries()
    }

    /// Gets the name mapped to a UUID
    pub fn get(&self, uuid: &str) -> Result<&str> {
        self.mappings
            .get(uuid)
            .ok_or_else(|| MapperError::uuid_not_found(uuid))
    }

    /// Gets the first entry with the given name
    pub fn find_by_name(&self, name: &str) -> Result<&Entry> {
        self.mappings
            .find_by_name(name)
            .ok_or_else(|| MapperError::name_not_found(name))
    }

    /// Adds a mapping and returns its UUID
    ///
    /// A missing or empty `uuid` is generated. An existing UUID is overwritten
    /// with the new name.
    pub fn add(&mut self, name: &str, uuid: Option<&str>) -> Result<String> {
        let uuid = match uuid {
            Some(u) if !u.is_empty() => u.to_string(),
            _ => self.generator.generate(),
        };
        let name = name.to_string();

        let uuid = self.commit(|mappings| {
            if let Some(previous) = mappings.insert(uuid.clone(), name) {
                warn!("Overwrote existing mapping {} (was {:?})", uuid, previous);
            }
            Ok(uuid)
        })?;
        info!("Added mapping {}", uuid);
        Ok(uuid)
    }

    /// Renames the entry with the given UUID
    pub fn edit_by_uuid(&mut self, uuid: &str, new_name: &str) -> Result<()> {
        self.commit(|mappings| mappings.rename_by_uuid(uuid, new_name.to_string()))?;
        info!("Renamed mapping {}", uuid);
        Ok(())
    }

    /// Renames the first entry named `old_name` and returns its UUID
    pub fn edit_by_name(&mut self, old_name: &str, new_name: &str) -> Result<String> {
        let uuid =
            self.commit(|mappings| mappings.rename_by_name(old_name, new_name.to_string()))?;
        info!("Renamed mapping {}", uuid);
        Ok(uuid)
    }

    /// Deletes the entry with the given UUID and returns it
    pub fn delete_by_uuid(&mut self, uuid: &str) -> Result<Entry> {
        let removed = self.commit(|mappings| mappings.remove_by_uuid(uuid))?;
        info!("Deleted mapping {}", removed.uuid);
        Ok(removed)
    }

    /// Deletes the first entry named `name` and returns it
    pub fn delete_by_name(&mut self, name: &str) -> Result<Entry> {
        let removed = self.commit(|mappings| mappings.remove_by_name(name))?;
        info!("Deleted mapping {}", removed.uuid);
        Ok(removed)
    }

    /// Gives the first entry named `name` a freshly generated UUID
    ///
    /// Returns the new UUID; the old one is no longer mapped.
    pub fn reset_uuid(&mut self, name: &str) -> Result<String> {
        let new_uuid = self.generator.generate();
        let old = self.commit(|mappings| mappings.reassign_uuid(name, new_uuid.clone()))?;
        info!("Reset mapping {} to {}", old.uuid, new_uuid);
        Ok(new_uuid)
    }

    /// Applies `update_fn` to a copy of the mappings and commits it once saved
    fn commit<T, F>(&mut self, update_fn: F) -> Result<T>
    where
        F: FnOnce(&mut UuidMappings) -> Result<T>,
    {
        let mut working = self.mappings.clone();
        let value = update_fn(&mut working).map_err(|e| {
            debug!("Rejected update: {}", e);
            e
        })?;
        self.storage.save(&working)?;
        self.mappings = working;
        Ok(value)
    }
}

impl std::fmt::Debug for UuidMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UuidMapper")
            .field("storage", &self.storage)
            .field("mappings", &self.mappings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupKind;
    use std::cell::Cell;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::{NamedTempFile, TempDir};

    fn sequential_ids() -> impl Fn() -> String {
        let counter = Cell::new(0);
        move || {
            counter.set(counter.get() + 1);
            format!("id{}", counter.get())
        }
    }

    fn open_temp(temp_dir: &TempDir) -> UuidMapper {
        UuidMapper::open_with_generator(temp_dir.path().join("map.json"), sequential_ids()).unwrap()
    }

    #[test]
    fn test_add_to_empty_store_generates_uuid() {
        let temp_dir = TempDir::new().unwrap();
        let mut mapper = UuidMapper::open(temp_dir.path().join("map.json")).unwrap();
        assert!(mapper.is_empty());

        let uuid = mapper.add("deploy.sh", None).unwrap();

        let parsed = Uuid::parse_str(&uuid).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(uuid, parsed.hyphenated().to_string());
        assert_eq!(mapper.list(), &[Entry::new(uuid.clone(), "deploy.sh")]);
    }

    #[test]
    fn test_auto_generated_uuids_are_distinct() {
        let temp_dir = TempDir::new().unwrap();
        let mut mapper = UuidMapper::open(temp_dir.path().join("map.json")).unwrap();

        let uuids: HashSet<String> = (0..200)
            .map(|i| mapper.add(&format!("script-{}", i), None).unwrap())
            .collect();

        assert_eq!(uuids.len(), 200);
        assert_eq!(mapper.len(), 200);
    }

    #[test]
    fn test_empty_uuid_is_treated_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let mut mapper = open_temp(&temp_dir);

        let uuid = mapper.add("deploy.sh", Some("")).unwrap();

        assert_eq!(uuid, "id1");
    }

    #[test]
    fn test_add_with_existing_uuid_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let mut mapper = open_temp(&temp_dir);

        mapper.add("x", Some("fixed")).unwrap();
        mapper.add("y", Some("fixed")).unwrap();

        assert_eq!(mapper.list(), &[Entry::new("fixed", "y")]);
    }

    #[test]
    fn test_edit_by_name_changes_first_match_only() {
        let temp_dir = TempDir::new().unwrap();
        let mut mapper = open_temp(&temp_dir);
        mapper.add("a", Some("id1")).unwrap();
        mapper.add("a", Some("id2")).unwrap();

        let uuid = mapper.edit_by_name("a", "b").unwrap();

        assert_eq!(uuid, "id1");
        assert_eq!(mapper.get("id1").unwrap(), "b");
        assert_eq!(mapper.get("id2").unwrap(), "a");
    }

    #[test]
    fn test_edit_by_uuid() {
        let temp_dir = TempDir::new().unwrap();
        let mut mapper = open_temp(&temp_dir);
        let uuid = mapper.add("old", None).unwrap();

        mapper.edit_by_uuid(&uuid, "new").unwrap();
        assert_eq!(mapper.get(&uuid).unwrap(), "new");

        let err = mapper.edit_by_uuid("missing", "x").unwrap_err();
        assert_eq!(err.not_found_kind(), Some(LookupKind::Uuid));
    }

    #[test]
    fn test_delete_missing_uuid_leaves_store_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let mut mapper = open_temp(&temp_dir);
        mapper.add("a", None).unwrap();
        let before = mapper.mappings().clone();
        let file_before = fs::read_to_string(mapper.path()).unwrap();

        let err = mapper.delete_by_uuid("nonexistent").unwrap_err();

        assert!(matches!(
            err,
            MapperError::NotFound {
                kind: LookupKind::Uuid,
                ..
            }
        ));
        assert_eq!(mapper.mappings(), &before);
        assert_eq!(fs::read_to_string(mapper.path()).unwrap(), file_before);
    }

    #[test]
    fn test_delete_by_name_removes_first_match() {
        let temp_dir = TempDir::new().unwrap();
        let mut mapper = open_temp(&temp_dir);
        mapper.add("a", None).unwrap();
        mapper.add("a", None).unwrap();

        let removed = mapper.delete_by_name("a").unwrap();

        assert_eq!(removed, Entry::new("id1", "a"));
        assert_eq!(mapper.list(), &[Entry::new("id2", "a")]);

        mapper.delete_by_name("a").unwrap();
        let err = mapper.delete_by_name("a").unwrap_err();
        assert_eq!(err.not_found_kind(), Some(LookupKind::Name));
    }

    #[test]
    fn test_reset_uuid_changes_identity_and_keeps_name() {
        let temp_dir = TempDir::new().unwrap();
        let mut mapper = open_temp(&temp_dir);
        let id1 = mapper.add("a", None).unwrap();

        let id2 = mapper.reset_uuid("a").unwrap();

        assert_ne!(id1, id2);
        assert_eq!(mapper.list(), &[Entry::new(id2.clone(), "a")]);
        let err = mapper.get(&id1).unwrap_err();
        assert_eq!(err.not_found_kind(), Some(LookupKind::Uuid));
    }

    #[test]
    fn test_reset_uuid_with_duplicate_names_moves_first_match() {
        let temp_dir = TempDir::new().unwrap();
        let mut mapper = open_temp(&temp_dir);
        mapper.add("a", Some("first")).unwrap();
        mapper.add("a", Some("second")).unwrap();

        let new_uuid = mapper.reset_uuid("a").unwrap();

        assert_eq!(new_uuid, "id1");
        assert_eq!(
            mapper.list(),
            &[Entry::new("second", "a"), Entry::new("id1", "a")]
        );
        assert!(mapper.get("first").is_err());

        let reopened = UuidMapper::open(mapper.path()).unwrap();
        assert_eq!(reopened.list(), mapper.list());
    }

    #[test]
    fn test_reset_uuid_unknown_name() {
        let temp_dir = TempDir::new().unwrap();
        let mut mapper = open_temp(&temp_dir);

        let err = mapper.reset_uuid("ghost").unwrap_err();

        assert_eq!(err.not_found_kind(), Some(LookupKind::Name));
        assert!(!mapper.path().exists());
    }

    #[test]
    fn test_find_by_name_returns_first_match() {
        let temp_dir = TempDir::new().unwrap();
        let mut mapper = open_temp(&temp_dir);
        mapper.add("a", None).unwrap();
        mapper.add("a", None).unwrap();

        assert_eq!(mapper.find_by_name("a").unwrap().uuid, "id1");
        assert!(mapper.find_by_name("b").is_err());
    }

    #[test]
    fn test_mutations_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("map.json");
        {
            let mut mapper = UuidMapper::open_with_generator(&path, sequential_ids()).unwrap();
            mapper.add("deploy.sh", None).unwrap();
            mapper.add("backup.sh", None).unwrap();
            mapper.add("tmp.sh", None).unwrap();
            mapper.edit_by_name("backup.sh", "restore.sh").unwrap();
            mapper.delete_by_uuid("id3").unwrap();
        }

        let reopened = UuidMapper::open(&path).unwrap();

        assert_eq!(
            reopened.list(),
            &[Entry::new("id1", "deploy.sh"), Entry::new("id2", "restore.sh")]
        );
    }

    /// Replaces the backing file with a directory so the next save fails
    fn block_saves(path: &Path) {
        if path.exists() {
            fs::remove_file(path).unwrap();
        }
        fs::create_dir(path).unwrap();
    }

    #[test]
    fn test_failed_save_does_not_commit() {
        let temp_dir = TempDir::new().unwrap();
        let mut mapper = open_temp(&temp_dir);
        block_saves(mapper.path());

        let err = mapper.add("deploy.sh", None).unwrap_err();

        assert!(matches!(err, MapperError::Persistence { .. }));
        assert!(mapper.is_empty());
    }

    #[test]
    fn test_failed_save_keeps_entries_on_delete() {
        let temp_dir = TempDir::new().unwrap();
        let mut mapper = open_temp(&temp_dir);
        mapper.add("a", None).unwrap();
        mapper.add("b", None).unwrap();
        let before = mapper.mappings().clone();
        block_saves(mapper.path());

        let err = mapper.delete_by_name("a").unwrap_err();
        assert!(matches!(err, MapperError::Persistence { .. }));

        let err = mapper.reset_uuid("b").unwrap_err();
        assert!(matches!(err, MapperError::Persistence { .. }));

        assert_eq!(mapper.mappings(), &before);
        assert_eq!(mapper.find_by_name("a").unwrap().uuid, "id1");
    }

    #[test]
    fn test_open_corrupt_file_fails_without_overwriting() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "not json at all").unwrap();

        let err = UuidMapper::open(temp_file.path()).unwrap_err();

        assert!(matches!(err, MapperError::CorruptStore { .. }));
        assert_eq!(
            fs::read_to_string(temp_file.path()).unwrap(),
            "not json at all"
        );
    }

    #[test]
    fn test_reload_picks_up_external_changes() {
        let temp_dir = TempDir::new().unwrap();
        let mut mapper = open_temp(&temp_dir);
        mapper.add("a", None).unwrap();

        fs::write(mapper.path(), r#"{"ext": "external.sh"}"#).unwrap();
        mapper.reload().unwrap();

        assert_eq!(mapper.list(), &[Entry::new("ext", "external.sh")]);
    }
}
