// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Beatgrid - drum machine composition core.
//!
//! A composition is a grid of on/off beats organized into tracks, bars and
//! named sections. This crate provides the data model, the factories that
//! build valid default instances, a collect-all validator, and the pieces a
//! drum machine app builds on: a sound catalog, editor operations, pattern
//! fills, a transport state machine and an on-disk library.

pub mod composition;
pub mod library;
pub mod pattern;
pub mod playback;
pub mod sound;
pub mod validation;

pub use composition::{
    create_composition, create_empty_bars, create_empty_beat, create_section, create_track,
    Bar, Beat, Composition, CompositionMetadata, EditError, NewCompositionSettings, Section,
    SectionColor, Track,
};
pub use library::{Library, LibraryEvent, LibraryWatcher};
pub use playback::{PlaybackPosition, PlaybackState, Transport};
pub use sound::{CatalogError, DrumSound, SoundCatalog, SoundCategory, SoundSource};
pub use validation::{audit_composition, validate_composition, Violation, ViolationKind};
