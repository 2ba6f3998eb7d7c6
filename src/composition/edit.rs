// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Editor operations on a composition.
//!
//! Every operation that changes the document refreshes `modified_at`.
//! Operations that change dimensions resize every track so the grid stays
//! consistent with `number_of_bars` and `steps_per_bar`.

use chrono::Utc;
use thiserror::Error;
use tracing::debug;

use super::factory::{create_section, create_track};
use super::section::{Section, SectionColor};
use super::track::Track;
use super::{
    Composition, MAX_BEATS_PER_BAR, MAX_NUMBER_OF_BARS, MAX_SUBDIVISION, MAX_TEMPO,
    MIN_BEATS_PER_BAR, MIN_TEMPO,
};
use crate::sound::SoundCatalog;

/// Errors from editor operations addressing something that does not exist
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no track at index {0}")]
    TrackOutOfRange(usize),
    #[error("no section at index {0}")]
    SectionOutOfRange(usize),
    #[error("track {track} has no bar {bar}")]
    BarOutOfRange { track: usize, bar: usize },
    #[error("track {track} has no step {step} in bar {bar}")]
    StepOutOfRange { track: usize, bar: usize, step: usize },
    #[error("sound '{0}' is not in the catalog")]
    UnknownSound(String),
}

fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

impl Composition {
    /// Refresh `modified_at`
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }

    /// Set title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    /// Set tempo, clamped to the accepted range
    pub fn set_tempo(&mut self, tempo: u32) {
        self.tempo = tempo.clamp(MIN_TEMPO, MAX_TEMPO);
        self.touch();
    }

    /// Get a track by index
    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Get a mutable track by index.
    ///
    /// Direct edits through this reference do not refresh `modified_at`;
    /// call [`Composition::touch`] afterwards.
    pub fn track_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    fn track_index_mut(&mut self, index: usize) -> Result<&mut Track, EditError> {
        self.tracks
            .get_mut(index)
            .ok_or(EditError::TrackOutOfRange(index))
    }

    /// Add a track sized to the current dimensions
    pub fn add_track(&mut self, sound_id: impl Into<String>, name: impl Into<String>) -> &Track {
        let track = create_track(sound_id, name, self.bar_count(), self.steps_per_bar());
        self.tracks.push(track);
        self.touch();
        &self.tracks[self.tracks.len() - 1]
    }

    /// Add a track for a catalog sound, named after it
    pub fn add_track_from_catalog(
        &mut self,
        sound_id: &str,
        catalog: &SoundCatalog,
    ) -> Result<&Track, EditError> {
        let sound = catalog
            .get(sound_id)
            .ok_or_else(|| EditError::UnknownSound(sound_id.to_string()))?;
        Ok(self.add_track(sound.id.clone(), sound.name.clone()))
    }

    /// Remove track at index
    pub fn remove_track(&mut self, index: usize) -> Option<Track> {
        if index < self.tracks.len() {
            let track = self.tracks.remove(index);
            self.touch();
            Some(track)
        } else {
            None
        }
    }

    /// Flip one step, returning its new active flag
    pub fn toggle_beat(&mut self, track: usize, bar: usize, step: usize) -> Result<bool, EditError> {
        let beat = self
            .track_index_mut(track)?
            .beat_mut(bar, step)
            .ok_or(EditError::StepOutOfRange { track, bar, step })?;
        let active = beat.toggle();
        self.touch();
        Ok(active)
    }

    /// Set or clear a step's volume override, clamped to 0.0 - 1.0 (NaN is silence)
    pub fn set_beat_volume(
        &mut self,
        track: usize,
        bar: usize,
        step: usize,
        volume: Option<f64>,
    ) -> Result<(), EditError> {
        let beat = self
            .track_index_mut(track)?
            .beat_mut(bar, step)
            .ok_or(EditError::StepOutOfRange { track, bar, step })?;
        beat.volume = volume.map(clamp_volume);
        self.touch();
        Ok(())
    }

    /// Set track volume, clamped to 0.0 - 1.0 (NaN is silence)
    pub fn set_track_volume(&mut self, track: usize, volume: f64) -> Result<(), EditError> {
        self.track_index_mut(track)?.volume = clamp_volume(volume);
        self.touch();
        Ok(())
    }

    /// Clear every step of a track
    pub fn clear_track(&mut self, track: usize) -> Result<(), EditError> {
        self.track_index_mut(track)?.clear();
        self.touch();
        Ok(())
    }

    /// Add a section; bounds are checked by the validator, not here
    pub fn add_section(
        &mut self,
        name: impl Into<String>,
        start_bar: u32,
        end_bar: u32,
        color: Option<SectionColor>,
    ) -> &Section {
        self.sections
            .push(create_section(name, start_bar, end_bar, color));
        self.touch();
        &self.sections[self.sections.len() - 1]
    }

    /// Remove section at index
    pub fn remove_section(&mut self, index: usize) -> Option<Section> {
        if index < self.sections.len() {
            let section = self.sections.remove(index);
            self.touch();
            Some(section)
        } else {
            None
        }
    }

    /// Get a mutable section by index
    pub fn section_mut(&mut self, index: usize) -> Result<&mut Section, EditError> {
        self.sections
            .get_mut(index)
            .ok_or(EditError::SectionOutOfRange(index))
    }

    /// First section containing a 1-indexed bar
    pub fn section_at_bar(&self, bar: u32) -> Option<&Section> {
        self.sections.iter().find(|s| s.contains_bar(bar))
    }

    /// Change the bar count, clamped to 1 - `MAX_NUMBER_OF_BARS`.
    ///
    /// Existing beats in kept bars are preserved and new bars are empty.
    /// Sections starting past the new end are removed; sections running past
    /// it are shortened.
    pub fn set_number_of_bars(&mut self, number_of_bars: u32) {
        let number_of_bars = number_of_bars.clamp(1, MAX_NUMBER_OF_BARS);
        self.number_of_bars = number_of_bars;

        let steps = self.steps_per_bar();
        for track in &mut self.tracks {
            track.resize(number_of_bars as usize, steps);
        }

        let before = self.sections.len();
        self.sections.retain(|s| s.start_bar <= number_of_bars);
        for section in &mut self.sections {
            section.end_bar = section.end_bar.min(number_of_bars);
        }
        debug!(
            bars = number_of_bars,
            removed_sections = before - self.sections.len(),
            "resized composition"
        );
        self.touch();
    }

    /// Change beats per bar and subdivision.
    ///
    /// Bars are resized to the new step count keeping their leading steps.
    pub fn set_meter(&mut self, beats_per_bar: u32, subdivision: u32) {
        self.beats_per_bar = beats_per_bar.clamp(MIN_BEATS_PER_BAR, MAX_BEATS_PER_BAR);
        self.subdivision = subdivision.clamp(1, MAX_SUBDIVISION);

        let bars = self.bar_count();
        let steps = self.steps_per_bar();
        for track in &mut self.tracks {
            track.resize(bars, steps);
        }
        debug!(
            beats_per_bar = self.beats_per_bar,
            subdivision = self.subdivision,
            "changed meter"
        );
        self.touch();
    }
}
