//! Sound pack manifest
//!
//! Describes a directory of rendered sounds for the player app: which file
//! belongs to which key, plus the animation and color shown when it plays.
//!
//! ```json
//! {
//!   "packId": "synth-basics-v1",
//!   "packName": "Synth Basics",
//!   "version": 1,
//!   "sounds": [
//!     { "id": "kick", "label": "Kick", "file": "kick.wav",
//!       "animationType": "ripple", "color": "#FF6B6B", "keyMapping": "Q" }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::pipeline::CatalogueEntry;

/// File name the app looks for inside a pack directory
pub const MANIFEST_FILE: &str = "soundpack.json";

/// Visual effect triggered alongside a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationType {
    Ripple,
    Burst,
    Spiral,
    Wave,
    Scatter,
    Pulse,
    Bloom,
    Shatter,
    Orbit,
    Flash,
    Mirror,
    Slice,
}

/// One sound entry in a pack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sound {
    pub id: String,
    pub label: String,
    pub file: String,
    pub animation_type: AnimationType,
    pub color: String,
    pub key_mapping: String,
}

/// A complete sound pack manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundPack {
    pub pack_id: String,
    pub pack_name: String,
    pub version: u32,
    pub sounds: Vec<Sound>,
}

impl SoundPack {
    /// Build a manifest listing `entries` as `<id>.wav` files
    pub fn from_catalogue(
        entries: &[CatalogueEntry],
        pack_id: impl Into<String>,
        pack_name: impl Into<String>,
        version: u32,
    ) -> Self {
        let sounds = entries
            .iter()
            .map(|entry| Sound {
                id: entry.id.to_string(),
                label: entry.label.to_string(),
                file: entry.file_name(),
                animation_type: entry.animation,
                color: entry.color.to_string(),
                key_mapping: entry.key.to_string(),
            })
            .collect();

        Self {
            pack_id: pack_id.into(),
            pack_name: pack_name.into(),
            version,
            sounds,
        }
    }

    /// Look up a sound by its key mapping (case-insensitive)
    pub fn sound_for_key(&self, key: &str) -> Option<&Sound> {
        self.sounds
            .iter()
            .find(|s| s.key_mapping.eq_ignore_ascii_case(key))
    }

    /// Write the manifest as pretty-printed JSON
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a manifest from disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue;

    #[test]
    fn test_from_catalogue() {
        let entries = catalogue();
        let pack = SoundPack::from_catalogue(&entries, "synth-basics-v1", "Synth Basics", 1);

        assert_eq!(pack.sounds.len(), entries.len());
        let kick = &pack.sounds[0];
        assert_eq!(kick.id, "kick");
        assert_eq!(kick.file, "kick.wav");
        assert_eq!(kick.animation_type, AnimationType::Ripple);
    }

    #[test]
    fn test_json_field_names() {
        let pack = SoundPack::from_catalogue(&catalogue()[..1], "p", "P", 2);
        let value = serde_json::to_value(&pack).unwrap();

        assert_eq!(value["packId"], "p");
        assert_eq!(value["packName"], "P");
        assert_eq!(value["version"], 2);
        assert_eq!(value["sounds"][0]["animationType"], "ripple");
        assert_eq!(value["sounds"][0]["keyMapping"], "Q");
    }

    #[test]
    fn test_parse_app_manifest() {
        let json = r##"{
            "packId": "synth-basics-v1",
            "packName": "Synth Basics",
            "version": 1,
            "sounds": [
                {"id":"s01","label":"Kick","file":"kick.wav","animationType":"ripple","color":"#FF6B6B","keyMapping":"Q"},
                {"id":"s02","label":"Snare","file":"snare.wav","animationType":"burst","color":"#4ECDC4","keyMapping":"W"}
            ]
        }"##;
        let pack: SoundPack = serde_json::from_str(json).unwrap();
        assert_eq!(pack.sounds.len(), 2);
        assert_eq!(pack.sound_for_key("w").unwrap().file, "snare.wav");
        assert!(pack.sound_for_key("X").is_none());
    }

    #[test]
    fn test_write_and_load() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join(MANIFEST_FILE);
        let pack = SoundPack::from_catalogue(&catalogue(), "id", "Name", 1);

        pack.write(&path).unwrap();
        assert_eq!(SoundPack::load(&path).unwrap(), pack);
    }
}
