//! Save slot lookup.
//!
//! The menu only needs to know whether any save exists (to enable
//! "Load Game"). The save format itself lives elsewhere.

use std::path::{Path, PathBuf};

/// Number of save slots, numbered `1..=SAVE_SLOT_COUNT`.
pub const SAVE_SLOT_COUNT: u8 = 5;

/// Save slot capability.
pub trait SaveSlots {
    /// Does slot `slot` hold a save?
    fn slot_exists(&self, slot: u8) -> bool;

    /// Does any slot hold a save?
    fn has_any_save(&self) -> bool {
        (1..=SAVE_SLOT_COUNT).any(|slot| self.slot_exists(slot))
    }
}

/// No saves at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSaves;

impl SaveSlots for NoSaves {
    fn slot_exists(&self, _slot: u8) -> bool {
        false
    }
}

/// Saves stored as `slot_N.sav` files in a directory.
#[derive(Clone, Debug)]
pub struct SaveDirectory {
    root: PathBuf,
}

impl SaveDirectory {
    /// Use `root` as the save directory. It does not need to exist.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path for `slot`.
    pub fn slot_path(&self, slot: u8) -> PathBuf {
        self.root.join(format!("slot_{slot}.sav"))
    }
}

impl SaveSlots for SaveDirectory {
    fn slot_exists(&self, slot: u8) -> bool {
        (1..=SAVE_SLOT_COUNT).contains(&slot) && self.slot_path(slot).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_saves() {
        assert!(!NoSaves.has_any_save());
    }

    #[test]
    fn test_directory_slots() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveDirectory::new(dir.path());
        assert!(!saves.has_any_save());

        std::fs::write(saves.slot_path(3), b"save").unwrap();
        assert!(saves.slot_exists(3));
        assert!(!saves.slot_exists(1));
        assert!(saves.has_any_save());
    }

    #[test]
    fn test_out_of_range_slot_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveDirectory::new(dir.path());
        std::fs::write(saves.slot_path(9), b"save").unwrap();
        assert!(!saves.slot_exists(9));
        assert!(!saves.has_any_save());
    }

    #[test]
    fn test_missing_directory() {
        let saves = SaveDirectory::new("/definitely/not/here");
        assert!(!saves.has_any_save());
    }
}
