// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Composition data model.
//!
//! This module provides:
//! - Beats: single on/off grid cells with an optional volume override
//! - Tracks: one sound's bar × step grid
//! - Sections: named, colored bar ranges
//! - Composition: the aggregate root owning tracks and sections
//! - Factory functions producing valid default instances
//!
//! A composition is built in two phases: `create_composition` gives a bare
//! document, then a sound catalog is attached and initial tracks are added.
//! [`Composition::from_settings`] runs both phases.

pub mod beat;
pub mod edit;
pub mod factory;
pub mod section;
pub mod track;

pub use beat::{Bar, Beat};
pub use edit::EditError;
pub use factory::{
    create_composition, create_empty_bars, create_empty_beat, create_section, create_track,
    generate_id,
};
pub use section::{Section, SectionColor};
pub use track::{Track, DEFAULT_TRACK_VOLUME};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sound::SoundCatalog;

/// Slowest accepted tempo in BPM
pub const MIN_TEMPO: u32 = 40;
/// Fastest accepted tempo in BPM
pub const MAX_TEMPO: u32 = 300;
/// Fewest beats per bar
pub const MIN_BEATS_PER_BAR: u32 = 1;
/// Most beats per bar
pub const MAX_BEATS_PER_BAR: u32 = 12;
/// Most steps per beat an editor will set
pub const MAX_SUBDIVISION: u32 = 8;
/// Most bars an editor will set
pub const MAX_NUMBER_OF_BARS: u32 = 999;

/// Settings for creating a new composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCompositionSettings {
    /// Title
    pub title: String,
    /// Tempo in BPM
    #[serde(default = "default_tempo")]
    pub tempo: u32,
    /// Beats per bar (4 for 4/4)
    #[serde(default = "default_beats_per_bar")]
    pub beats_per_bar: u32,
    /// Steps per beat (4 for sixteenths)
    #[serde(default = "default_subdivision")]
    pub subdivision: u32,
    /// Number of bars
    #[serde(default = "default_number_of_bars")]
    pub number_of_bars: u32,
    /// Sound ids to add as tracks
    #[serde(default)]
    pub initial_sounds: Vec<String>,
}

fn default_tempo() -> u32 {
    120
}
fn default_beats_per_bar() -> u32 {
    4
}
fn default_subdivision() -> u32 {
    4
}
fn default_number_of_bars() -> u32 {
    4
}

impl Default for NewCompositionSettings {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            tempo: default_tempo(),
            beats_per_bar: default_beats_per_bar(),
            subdivision: default_subdivision(),
            number_of_bars: default_number_of_bars(),
            initial_sounds: Vec::new(),
        }
    }
}

impl NewCompositionSettings {
    /// Create settings with a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Builder: set tempo
    pub fn with_tempo(mut self, tempo: u32) -> Self {
        self.tempo = tempo;
        self
    }

    /// Builder: set meter
    pub fn with_meter(mut self, beats_per_bar: u32, subdivision: u32) -> Self {
        self.beats_per_bar = beats_per_bar;
        self.subdivision = subdivision;
        self
    }

    /// Builder: set bar count
    pub fn with_bars(mut self, number_of_bars: u32) -> Self {
        self.number_of_bars = number_of_bars;
        self
    }

    /// Builder: add an initial sound
    pub fn with_sound(mut self, sound_id: impl Into<String>) -> Self {
        self.initial_sounds.push(sound_id.into());
        self
    }
}

/// A complete drum machine composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    /// Unique identifier
    pub id: String,
    /// User-facing title
    pub title: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time, refreshed on every edit
    pub modified_at: DateTime<Utc>,
    /// Tempo in BPM
    pub tempo: u32,
    /// Beats in each bar
    pub beats_per_bar: u32,
    /// Steps per beat
    pub subdivision: u32,
    /// Total bars
    pub number_of_bars: u32,
    /// Section markers
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Instrument tracks
    #[serde(default)]
    pub tracks: Vec<Track>,
    /// Sound ids available for new tracks
    #[serde(default)]
    pub available_sounds: Vec<String>,
}

impl Composition {
    /// Create a composition, attach the catalog and add the initial tracks.
    ///
    /// Fails without building anything if an initial sound is missing from
    /// the catalog.
    pub fn from_settings(
        settings: &NewCompositionSettings,
        catalog: &SoundCatalog,
    ) -> Result<Self, EditError> {
        let mut composition = create_composition(settings);
        composition.attach_catalog(catalog);
        composition.add_initial_tracks(&settings.initial_sounds, catalog)?;
        Ok(composition)
    }

    /// Steps in one bar
    pub fn steps_per_bar(&self) -> usize {
        self.beats_per_bar as usize * self.subdivision as usize
    }

    /// Number of bars as an index bound
    pub fn bar_count(&self) -> usize {
        self.number_of_bars as usize
    }

    /// Replace `available_sounds` with the catalog's ids
    pub fn attach_catalog(&mut self, catalog: &SoundCatalog) {
        self.available_sounds = catalog.ids().map(str::to_string).collect();
        self.touch();
        debug!(
            id = %self.id,
            sounds = self.available_sounds.len(),
            "attached sound catalog"
        );
    }

    /// Add one track per sound id, in order.
    ///
    /// Every id is looked up before any track is added, so an unknown id
    /// leaves the composition untouched. Returns the number of tracks added.
    pub fn add_initial_tracks(
        &mut self,
        sound_ids: &[String],
        catalog: &SoundCatalog,
    ) -> Result<usize, EditError> {
        let sounds = sound_ids
            .iter()
            .map(|id| {
                catalog
                    .get(id)
                    .ok_or_else(|| EditError::UnknownSound(id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for sound in &sounds {
            self.add_track(sound.id.clone(), sound.name.clone());
        }
        Ok(sounds.len())
    }

    /// Library summary for this composition stored under `file_path`
    pub fn metadata(&self, file_path: impl Into<String>) -> CompositionMetadata {
        CompositionMetadata::from_composition(self, file_path)
    }
}

/// Summary of a saved composition for library listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionMetadata {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub tempo: u32,
    pub number_of_bars: u32,
    pub track_count: usize,
    /// File path or storage key
    pub file_path: String,
}

impl CompositionMetadata {
    /// Summarize a composition
    pub fn from_composition(composition: &Composition, file_path: impl Into<String>) -> Self {
        Self {
            id: composition.id.clone(),
            title: composition.title.clone(),
            created_at: composition.created_at,
            modified_at: composition.modified_at,
            tempo: composition.tempo,
            number_of_bars: composition.number_of_bars,
            track_count: composition.tracks.len(),
            file_path: file_path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::{DrumSound, SoundCategory, SoundSource};

    fn catalog() -> SoundCatalog {
        let mut catalog = SoundCatalog::new();
        catalog.add(DrumSound::new(
            "conga_low",
            "Low Conga",
            SoundSource::BuiltInAsset(1),
            SoundCategory::Congas,
        ));
        catalog.add(DrumSound::new(
            "cowbell",
            "Cowbell",
            SoundSource::ExternalUri("file:///sounds/cowbell.wav".to_string()),
            SoundCategory::Bells,
        ));
        catalog
    }

    #[test]
    fn test_settings_defaults() {
        let settings = NewCompositionSettings::default();
        assert_eq!(settings.title, "Untitled");
        assert_eq!(settings.tempo, 120);
        assert_eq!(settings.beats_per_bar, 4);
        assert_eq!(settings.subdivision, 4);
        assert_eq!(settings.number_of_bars, 4);
        assert!(settings.initial_sounds.is_empty());
    }

    #[test]
    fn test_two_phase_construction() {
        let settings = NewCompositionSettings::new("Son")
            .with_meter(4, 2)
            .with_bars(2)
            .with_sound("cowbell")
            .with_sound("conga_low");

        let bare = create_composition(&settings);
        assert!(bare.available_sounds.is_empty());
        assert!(bare.tracks.is_empty());

        let comp = Composition::from_settings(&settings, &catalog()).unwrap();
        assert_eq!(comp.available_sounds, vec!["conga_low", "cowbell"]);
        assert_eq!(comp.tracks.len(), 2);
        assert_eq!(comp.tracks[0].sound_id, "cowbell");
        assert_eq!(comp.tracks[0].name, "Cowbell");
        assert_eq!(comp.tracks[1].bars.len(), 2);
        assert_eq!(comp.tracks[1].bars[0].len(), 8);
    }

    #[test]
    fn test_initial_tracks_unknown_sound() {
        let settings = NewCompositionSettings::new("Bad")
            .with_sound("conga_low")
            .with_sound("theremin");
        let result = Composition::from_settings(&settings, &catalog());
        assert_eq!(result.unwrap_err(), EditError::UnknownSound("theremin".to_string()));

        let mut comp = create_composition(&settings);
        assert!(comp
            .add_initial_tracks(&settings.initial_sounds, &catalog())
            .is_err());
        assert!(comp.tracks.is_empty());
    }

    #[test]
    fn test_attach_catalog_touches() {
        let mut comp = create_composition(&NewCompositionSettings::new("Swap"));
        comp.modified_at = comp.modified_at - chrono::Duration::hours(1);
        let before = comp.modified_at;

        comp.attach_catalog(&catalog());
        assert_eq!(comp.available_sounds, vec!["conga_low", "cowbell"]);
        assert!(comp.modified_at > before);
    }

    #[test]
    fn test_metadata() {
        let settings = NewCompositionSettings::new("Meta").with_sound("cowbell");
        let comp = Composition::from_settings(&settings, &catalog()).unwrap();
        let meta = comp.metadata("library/meta.yaml");
        assert_eq!(meta.id, comp.id);
        assert_eq!(meta.title, "Meta");
        assert_eq!(meta.tempo, 120);
        assert_eq!(meta.number_of_bars, 4);
        assert_eq!(meta.track_count, 1);
        assert_eq!(meta.file_path, "library/meta.yaml");
    }
}
