//! Persistence boundary for the game engine.
//!
//! The whole game state is one JSON record ([`GameData`]) loaded once at
//! startup and rewritten in full after every mutating operation. The design
//! favors availability of in-memory state over per-write durability: a failed
//! save is logged and the in-memory mutation stands (documented risk, not
//! corrected silently). An unreadable or missing save file yields baseline
//! empty maps and is never fatal.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use log::{error, info, warn};

use crate::game::dice::Dice;
use crate::game::errors::GameError;
use crate::game::types::{
    CharacterRecord, GameData, Inventory, SkillRecord, UserRecord, WeaponRecord,
};

/// Where the full save record is loaded from and written to.
pub trait SaveBackend {
    /// Load the record, or `None` when no usable prior state exists.
    fn load(&self) -> Option<GameData>;

    /// Write the record in full.
    fn save(&self, data: &GameData) -> Result<(), GameError>;
}

/// Single-file JSON backend with atomic write+rename under an exclusive lock.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Save file lives at `<dir>/game.json`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        JsonFileBackend {
            path: dir.as_ref().join("game.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, content: &str) -> Result<(), GameError> {
        let dir = self.path.parent().unwrap_or(Path::new("."));
        std::fs::create_dir_all(dir)?;

        // Hold an exclusive lock on the target for the whole swap so two
        // processes cannot interleave their temp-file renames.
        let lock = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&self.path)?;
        lock.lock_exclusive()?;

        let tmp_path = dir.join(format!(".game.json.tmp-{}", std::process::id()));
        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(content.as_bytes())?;
        tmp.sync_all()?;
        std::fs::rename(&tmp_path, &self.path)?;
        if let Ok(dirf) = File::open(dir) {
            let _ = dirf.sync_all();
        }
        drop(lock);
        Ok(())
    }
}

impl SaveBackend for JsonFileBackend {
    fn load(&self) -> Option<GameData> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("save file unreadable, starting empty: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("save file corrupt, starting empty: {e}");
                None
            }
        }
    }

    fn save(&self, data: &GameData) -> Result<(), GameError> {
        let json = serde_json::to_string_pretty(data)?;
        self.write_atomic(&json)
    }
}

/// In-memory backend for tests: loads empty, discards saves.
#[derive(Default)]
pub struct MemoryBackend;

impl SaveBackend for MemoryBackend {
    fn load(&self) -> Option<GameData> {
        None
    }

    fn save(&self, _data: &GameData) -> Result<(), GameError> {
        Ok(())
    }
}

/// Canonical owner of all five entity maps.
///
/// Every other engine component operates through this store's get-or-create
/// accessors and calls [`GameStore::persist`] after mutating. No component
/// holds an independent copy of any record.
pub struct GameStore {
    data: GameData,
    backend: Box<dyn SaveBackend>,
}

impl GameStore {
    /// Load once from the backend, applying the schema migration sweep.
    pub fn open(backend: Box<dyn SaveBackend>) -> Self {
        let mut data = backend.load().unwrap_or_default();
        data.migrate();
        info!(
            "game state loaded: {} users, {} characters",
            data.users.len(),
            data.characters.len()
        );
        GameStore { data, backend }
    }

    /// Convenience constructor over the JSON file backend.
    pub fn open_dir(dir: impl AsRef<Path>) -> Self {
        Self::open(Box::new(JsonFileBackend::new(dir)))
    }

    /// Ephemeral store for tests.
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryBackend))
    }

    /// Write the full record. Failures are logged and swallowed: the
    /// in-memory mutation already succeeded from the caller's perspective.
    pub fn persist(&mut self) {
        if let Err(e) = self.backend.save(&self.data) {
            error!("persist failed (in-memory state kept): {e}");
        }
    }

    /// Get-or-create the user record for an identity.
    pub fn user_mut(&mut self, id: &str) -> &mut UserRecord {
        self.data.users.entry(id.to_string()).or_default()
    }

    pub fn user(&self, id: &str) -> Option<&UserRecord> {
        self.data.users.get(id)
    }

    /// Get-or-create the character record for an identity.
    pub fn character_mut(&mut self, id: &str) -> &mut CharacterRecord {
        self.data.characters.entry(id.to_string()).or_default()
    }

    pub fn character(&self, id: &str) -> Option<&CharacterRecord> {
        self.data.characters.get(id)
    }

    /// Equipped weapon, if the identity has ever equipped one.
    pub fn weapon(&self, id: &str) -> Option<&WeaponRecord> {
        self.data.weapons.get(id)
    }

    pub fn weapon_mut(&mut self, id: &str) -> Option<&mut WeaponRecord> {
        self.data.weapons.get_mut(id)
    }

    pub fn insert_weapon(&mut self, id: &str, weapon: WeaponRecord) {
        self.data.weapons.insert(id.to_string(), weapon);
    }

    /// Get-or-create the inventory for an identity.
    pub fn inventory_mut(&mut self, id: &str) -> &mut Inventory {
        self.data.inventories.entry(id.to_string()).or_default()
    }

    pub fn inventory(&self, id: &str) -> Option<&Inventory> {
        self.data.inventories.get(id)
    }

    /// Get-or-create the skill record for an identity.
    pub fn skill_mut(&mut self, id: &str) -> &mut SkillRecord {
        self.data.skills.entry(id.to_string()).or_default()
    }

    pub fn skill(&self, id: &str) -> Option<&SkillRecord> {
        self.data.skills.get(id)
    }

    /// Identity whose character carries the given display name, if any.
    pub fn find_by_character_name(&self, name: &str) -> Option<&str> {
        self.data
            .characters
            .iter()
            .find(|(_, c)| c.name == name)
            .map(|(id, _)| id.as_str())
    }

    /// A uniformly-drawn identity with an existing character, excluding
    /// `exclude`. Candidates are sorted first so the draw index is stable
    /// under scripted dice.
    pub fn random_opponent(&self, dice: &mut dyn Dice, exclude: &str) -> Option<String> {
        let mut ids: Vec<&String> = self
            .data
            .characters
            .keys()
            .filter(|id| id.as_str() != exclude)
            .collect();
        if ids.is_empty() {
            return None;
        }
        ids.sort();
        let idx = dice.below(ids.len() as u32) as usize;
        Some(ids[idx].clone())
    }

    pub fn user_count(&self) -> usize {
        self.data.users.len()
    }

    pub fn character_count(&self) -> usize {
        self.data.characters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::dice::SeqDice;
    use tempfile::TempDir;

    #[test]
    fn file_backend_round_trip() {
        let dir = TempDir::new().expect("tempdir");
        {
            let mut store = GameStore::open_dir(dir.path());
            store.user_mut("alice").dust = 321;
            store.character_mut("alice").name = "Mira".into();
            store.persist();
        }
        let store = GameStore::open_dir(dir.path());
        assert_eq!(store.user("alice").expect("user").dust, 321);
        assert_eq!(store.character("alice").expect("char").name, "Mira");
    }

    #[test]
    fn corrupt_save_starts_empty() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("game.json"), "{not json").expect("write");
        let store = GameStore::open_dir(dir.path());
        assert_eq!(store.user_count(), 0);
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut store = GameStore::in_memory();
        store.user_mut("bob").dust = 10;
        assert_eq!(store.user_mut("bob").dust, 10);
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn negative_dust_clamped_on_load() {
        let dir = TempDir::new().expect("tempdir");
        {
            let mut store = GameStore::open_dir(dir.path());
            store.user_mut("carol").dust = -77;
            store.persist();
        }
        let store = GameStore::open_dir(dir.path());
        assert_eq!(store.user("carol").expect("user").dust, 0);
    }

    #[test]
    fn random_opponent_excludes_self() {
        let mut store = GameStore::in_memory();
        store.character_mut("a");
        store.character_mut("b");
        let mut dice = SeqDice::new().with_rolls(&[0]);
        let pick = store.random_opponent(&mut dice, "a").expect("opponent");
        assert_eq!(pick, "b");

        let only = GameStore::in_memory();
        let mut dice = SeqDice::new();
        assert!(only.random_opponent(&mut dice, "a").is_none());
    }

    #[test]
    fn character_name_lookup() {
        let mut store = GameStore::in_memory();
        store.character_mut("alice").name = "Mira".into();
        assert_eq!(store.find_by_character_name("Mira"), Some("alice"));
        assert_eq!(store.find_by_character_name("Nobody"), None);
    }
}
