// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Drum sound catalog.
//!
//! The catalog lists the sounds a composition can add tracks for. Tracks
//! refer to sounds by id only; the catalog is never embedded in a
//! composition file.
//!
//! Catalogs load from TOML:
//!
//! ```toml
//! [[sounds]]
//! id = "conga_low"
//! name = "Low Conga"
//! category = "congas"
//! source = { asset = 1 }
//!
//! [[sounds]]
//! id = "cowbell"
//! name = "Cowbell"
//! category = "bells"
//! source = { uri = "file:///sounds/cowbell.wav" }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sound categories for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCategory {
    Congas,
    Djembe,
    Bongos,
    Timbales,
    Shakers,
    Bells,
    Wood,
    Metallic,
    Other,
}

/// Where a sound's audio comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundSource {
    /// File path or URI resolved at load time
    #[serde(rename = "uri")]
    ExternalUri(String),
    /// Asset bundled with the application
    #[serde(rename = "asset")]
    BuiltInAsset(u32),
}

/// A drum sound definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrumSound {
    pub id: String,
    pub name: String,
    pub source: SoundSource,
    pub category: SoundCategory,
}

impl DrumSound {
    /// Create a sound
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        source: SoundSource,
        category: SoundCategory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source,
            category,
        }
    }
}

/// Errors from building a catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Duplicate sound id in catalog: {0}")]
    DuplicateId(String),
}

/// Ordered collection of drum sounds with unique ids.
///
/// Every deserializer goes through the duplicate id check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogFile")]
pub struct SoundCatalog {
    sounds: Vec<DrumSound>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    sounds: Vec<DrumSound>,
}

impl TryFrom<CatalogFile> for SoundCatalog {
    type Error = CatalogError;

    fn try_from(file: CatalogFile) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for sound in &file.sounds {
            if !seen.insert(sound.id.as_str()) {
                return Err(CatalogError::DuplicateId(sound.id.clone()));
            }
        }
        Ok(Self { sounds: file.sounds })
    }
}

impl SoundCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Sounds bundled with the application
    pub fn builtin() -> Self {
        use SoundCategory::*;

        let entries = [
            ("conga_high", "High Conga", Congas),
            ("conga_low", "Low Conga", Congas),
            ("conga_slap", "Conga Slap", Congas),
            ("djembe_bass", "Djembe Bass", Djembe),
            ("djembe_tone", "Djembe Tone", Djembe),
            ("bongo_high", "High Bongo", Bongos),
            ("bongo_low", "Low Bongo", Bongos),
            ("timbale_high", "High Timbale", Timbales),
            ("timbale_low", "Low Timbale", Timbales),
            ("shaker", "Shaker", Shakers),
            ("cabasa", "Cabasa", Shakers),
            ("cowbell", "Cowbell", Bells),
            ("agogo", "Agogo", Bells),
            ("claves", "Claves", Wood),
            ("woodblock", "Woodblock", Wood),
            ("triangle", "Triangle", Metallic),
            ("clap", "Clap", Other),
        ];

        let mut catalog = Self::new();
        for (asset, (id, name, category)) in entries.into_iter().enumerate() {
            catalog.add(DrumSound::new(
                id,
                name,
                SoundSource::BuiltInAsset(asset as u32),
                category,
            ));
        }
        catalog
    }

    /// Load a catalog from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read sound catalog: {:?}", path.as_ref()))?;
        Self::from_toml(&contents)
    }

    /// Parse a catalog from TOML, rejecting repeated ids
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse sound catalog TOML")
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize sound catalog to TOML")
    }

    /// Add a sound, replacing and returning any sound with the same id
    pub fn add(&mut self, sound: DrumSound) -> Option<DrumSound> {
        match self.sounds.iter_mut().find(|s| s.id == sound.id) {
            Some(existing) => Some(std::mem::replace(existing, sound)),
            None => {
                self.sounds.push(sound);
                None
            }
        }
    }

    /// Look up a sound by id
    pub fn get(&self, id: &str) -> Option<&DrumSound> {
        self.sounds.iter().find(|s| s.id == id)
    }

    /// Check if a sound id exists
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Sound ids in catalog order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sounds.iter().map(|s| s.id.as_str())
    }

    /// Sounds in a category
    pub fn by_category(&self, category: SoundCategory) -> impl Iterator<Item = &DrumSound> {
        self.sounds.iter().filter(move |s| s.category == category)
    }

    /// Iterate over sounds
    pub fn iter(&self) -> impl Iterator<Item = &DrumSound> {
        self.sounds.iter()
    }

    /// Number of sounds
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog() {
        let text = r#"
[[sounds]]
id = "conga_low"
name = "Low Conga"
category = "congas"
source = { asset = 1 }

[[sounds]]
id = "cowbell"
name = "Cowbell"
category = "bells"
source = { uri = "file:///sounds/cowbell.wav" }
"#;

        let catalog = SoundCatalog::from_toml(text).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["conga_low", "cowbell"]);

        let conga = catalog.get("conga_low").unwrap();
        assert_eq!(conga.source, SoundSource::BuiltInAsset(1));
        assert_eq!(conga.category, SoundCategory::Congas);

        let bell = catalog.get("cowbell").unwrap();
        assert_eq!(
            bell.source,
            SoundSource::ExternalUri("file:///sounds/cowbell.wav".to_string())
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let text = r#"
[[sounds]]
id = "clap"
name = "Clap"
category = "other"
source = { asset = 1 }

[[sounds]]
id = "clap"
name = "Clap 2"
category = "other"
source = { asset = 2 }
"#;
        let err = SoundCatalog::from_toml(text).unwrap_err();
        assert!(format!("{:#}", err).contains("Duplicate sound id in catalog: clap"));
    }

    #[test]
    fn test_duplicate_ids_rejected_by_any_format() {
        let yaml = r#"
sounds:
  - id: clap
    name: Clap
    category: other
    source: {asset: 1}
  - id: clap
    name: Clap 2
    category: other
    source: {asset: 2}
"#;
        assert!(serde_yaml::from_str::<SoundCatalog>(yaml).is_err());

        let empty: SoundCatalog = serde_yaml::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let text = r#"
[[sounds]]
id = "gong"
name = "Gong"
category = "gongs"
source = { asset = 1 }
"#;
        assert!(SoundCatalog::from_toml(text).is_err());
    }

    #[test]
    fn test_round_trip() {
        let original = SoundCatalog::builtin();
        let text = original.to_toml().unwrap();
        let parsed = SoundCatalog::from_toml(&text).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_add_replaces() {
        let mut catalog = SoundCatalog::new();
        assert!(catalog.is_empty());
        let first = DrumSound::new("clap", "Clap", SoundSource::BuiltInAsset(1), SoundCategory::Other);
        assert!(catalog.add(first.clone()).is_none());

        let second = DrumSound::new("clap", "Big Clap", SoundSource::BuiltInAsset(2), SoundCategory::Other);
        assert_eq!(catalog.add(second), Some(first));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("clap").unwrap().name, "Big Clap");
    }

    #[test]
    fn test_builtin_categories() {
        let catalog = SoundCatalog::builtin();
        assert_eq!(catalog.by_category(SoundCategory::Congas).count(), 3);
        assert!(catalog.contains("cowbell"));
        assert!(!catalog.contains("kick"));
    }
}
