// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Constructors for structurally valid default instances.
//!
//! Factories never fail and never check bounds: out-of-range input gives a
//! degenerate but well-typed value, and `validate_composition` reports it
//! once it is part of a composition.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::beat::{Bar, Beat};
use super::section::{Section, SectionColor};
use super::track::{Track, DEFAULT_TRACK_VOLUME};
use super::{Composition, NewCompositionSettings};

/// Generate an opaque id such as `track_4f2c...`
pub fn generate_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

/// Create an inactive beat with no volume override
pub fn create_empty_beat() -> Beat {
    Beat {
        active: false,
        volume: None,
    }
}

/// Create a `number_of_bars` × `steps_per_bar` grid of empty beats
pub fn create_empty_bars(number_of_bars: usize, steps_per_bar: usize) -> Vec<Bar> {
    (0..number_of_bars)
        .map(|_| (0..steps_per_bar).map(|_| create_empty_beat()).collect())
        .collect()
}

/// Create a track with an empty grid and default volume
pub fn create_track(
    sound_id: impl Into<String>,
    sound_name: impl Into<String>,
    number_of_bars: usize,
    steps_per_bar: usize,
) -> Track {
    let track = Track {
        id: generate_id("track"),
        name: sound_name.into(),
        sound_id: sound_id.into(),
        volume: DEFAULT_TRACK_VOLUME,
        bars: create_empty_bars(number_of_bars, steps_per_bar),
    };
    debug!(
        id = %track.id,
        sound = %track.sound_id,
        bars = number_of_bars,
        steps = steps_per_bar,
        "created track"
    );
    track
}

/// Create a section; color defaults to blue
pub fn create_section(
    name: impl Into<String>,
    start_bar: u32,
    end_bar: u32,
    color: Option<SectionColor>,
) -> Section {
    let section = Section {
        id: generate_id("section"),
        name: name.into(),
        start_bar,
        end_bar,
        color: color.unwrap_or_default(),
    };
    debug!(id = %section.id, start_bar, end_bar, "created section");
    section
}

/// Create a bare composition from settings.
///
/// Tracks, sections and `available_sounds` start empty. Attaching a catalog
/// and adding `initial_sounds` tracks are separate steps, see
/// [`Composition::attach_catalog`] and [`Composition::add_initial_tracks`].
pub fn create_composition(settings: &NewCompositionSettings) -> Composition {
    let now = Utc::now();
    let composition = Composition {
        id: generate_id("comp"),
        title: settings.title.clone(),
        created_at: now,
        modified_at: now,
        tempo: settings.tempo,
        beats_per_bar: settings.beats_per_bar,
        subdivision: settings.subdivision,
        number_of_bars: settings.number_of_bars,
        sections: Vec::new(),
        tracks: Vec::new(),
        available_sounds: Vec::new(),
    };
    debug!(id = %composition.id, title = %composition.title, "created composition");
    composition
}
