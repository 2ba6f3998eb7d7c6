// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Composition validation.
//!
//! Validation never fails. It is a single pass that collects every
//! inconsistency between a composition's declared dimensions and ranges and
//! its actual data, so an editor can show all problems at once.
//!
//! [`validate_composition`] runs the structural checks. [`audit_composition`]
//! runs the stricter reference checks (unknown sounds, overlapping sections,
//! beat volumes, repeated ids), which the structural pass leaves alone.

pub mod audit;

pub use audit::audit_composition;

use serde::Serialize;
use thiserror::Error;

use crate::composition::{
    Composition, MAX_BEATS_PER_BAR, MAX_TEMPO, MIN_BEATS_PER_BAR, MIN_TEMPO,
};

/// A single reported inconsistency
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("Tempo must be between 40 and 300 BPM (got {tempo})")]
    TempoOutOfRange { tempo: u32 },

    #[error("Beats per bar must be between 1 and 12 (got {beats_per_bar})")]
    BeatsPerBarOutOfRange { beats_per_bar: u32 },

    #[error("Must have at least 1 bar")]
    NoBars,

    #[error("Track {track} has {actual} bars, expected {expected}")]
    TrackBarCount {
        track: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Track {track}, bar {bar} has {actual} steps, expected {expected}")]
    BarStepCount {
        track: usize,
        bar: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Track {track} volume must be between 0 and 1 (got {volume})")]
    TrackVolume { track: usize, volume: f64 },

    #[error("Section {section} start bar {start_bar} is out of range 1-{number_of_bars}")]
    SectionStartOutOfRange {
        section: usize,
        start_bar: u32,
        number_of_bars: u32,
    },

    #[error("Section {section} end bar {end_bar} is invalid (start {start_bar}, last bar {number_of_bars})")]
    SectionEndInvalid {
        section: usize,
        start_bar: u32,
        end_bar: u32,
        number_of_bars: u32,
    },

    #[error("Track {track} uses unknown sound '{sound_id}'")]
    UnknownSound { track: usize, sound_id: String },

    #[error("Track {track}, bar {bar}, step {step} volume must be between 0 and 1 (got {volume})")]
    BeatVolume {
        track: usize,
        bar: usize,
        step: usize,
        volume: f64,
    },

    #[error("Section {section} overlaps section {other}")]
    SectionOverlap { section: usize, other: usize },

    #[error("Id '{id}' is used more than once")]
    DuplicateId { id: String },
}

/// Violation category, for matching without destructuring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    TempoOutOfRange,
    BeatsPerBarOutOfRange,
    NoBars,
    TrackBarCount,
    BarStepCount,
    TrackVolume,
    SectionStartOutOfRange,
    SectionEndInvalid,
    UnknownSound,
    BeatVolume,
    SectionOverlap,
    DuplicateId,
}

impl Violation {
    /// Get the category
    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::TempoOutOfRange { .. } => ViolationKind::TempoOutOfRange,
            Violation::BeatsPerBarOutOfRange { .. } => ViolationKind::BeatsPerBarOutOfRange,
            Violation::NoBars => ViolationKind::NoBars,
            Violation::TrackBarCount { .. } => ViolationKind::TrackBarCount,
            Violation::BarStepCount { .. } => ViolationKind::BarStepCount,
            Violation::TrackVolume { .. } => ViolationKind::TrackVolume,
            Violation::SectionStartOutOfRange { .. } => ViolationKind::SectionStartOutOfRange,
            Violation::SectionEndInvalid { .. } => ViolationKind::SectionEndInvalid,
            Violation::UnknownSound { .. } => ViolationKind::UnknownSound,
            Violation::BeatVolume { .. } => ViolationKind::BeatVolume,
            Violation::SectionOverlap { .. } => ViolationKind::SectionOverlap,
            Violation::DuplicateId { .. } => ViolationKind::DuplicateId,
        }
    }

    /// Track index, for track-level violations
    pub fn track_index(&self) -> Option<usize> {
        match self {
            Violation::TrackBarCount { track, .. }
            | Violation::BarStepCount { track, .. }
            | Violation::TrackVolume { track, .. }
            | Violation::UnknownSound { track, .. }
            | Violation::BeatVolume { track, .. } => Some(*track),
            _ => None,
        }
    }

    /// Bar index (0-indexed), for bar-level violations
    pub fn bar_index(&self) -> Option<usize> {
        match self {
            Violation::BarStepCount { bar, .. } | Violation::BeatVolume { bar, .. } => Some(*bar),
            _ => None,
        }
    }

    /// Section index, for section-level violations
    pub fn section_index(&self) -> Option<usize> {
        match self {
            Violation::SectionStartOutOfRange { section, .. }
            | Violation::SectionEndInvalid { section, .. }
            | Violation::SectionOverlap { section, .. } => Some(*section),
            _ => None,
        }
    }

    /// Expected count, for dimension mismatches
    pub fn expected(&self) -> Option<usize> {
        match self {
            Violation::TrackBarCount { expected, .. } | Violation::BarStepCount { expected, .. } => {
                Some(*expected)
            }
            _ => None,
        }
    }

    /// Actual count, for dimension mismatches
    pub fn actual(&self) -> Option<usize> {
        match self {
            Violation::TrackBarCount { actual, .. } | Violation::BarStepCount { actual, .. } => {
                Some(*actual)
            }
            _ => None,
        }
    }
}

/// Check a composition against its own dimensions and ranges.
///
/// Returns every violation in check order: tempo, beats per bar, bar count,
/// then each track (bar count, each bar's step count, volume), then each
/// section (start, end). An empty list means the composition is valid.
pub fn validate_composition(composition: &Composition) -> Vec<Violation> {
    let mut violations = Vec::new();

    validate_timing(composition, &mut violations);
    validate_tracks(composition, &mut violations);
    validate_sections(composition, &mut violations);

    violations
}

/// Shorthand for an empty [`validate_composition`] result
pub fn is_valid(composition: &Composition) -> bool {
    validate_composition(composition).is_empty()
}

fn validate_timing(composition: &Composition, violations: &mut Vec<Violation>) {
    if !(MIN_TEMPO..=MAX_TEMPO).contains(&composition.tempo) {
        violations.push(Violation::TempoOutOfRange {
            tempo: composition.tempo,
        });
    }

    if !(MIN_BEATS_PER_BAR..=MAX_BEATS_PER_BAR).contains(&composition.beats_per_bar) {
        violations.push(Violation::BeatsPerBarOutOfRange {
            beats_per_bar: composition.beats_per_bar,
        });
    }

    if composition.number_of_bars < 1 {
        violations.push(Violation::NoBars);
    }
}

fn validate_tracks(composition: &Composition, violations: &mut Vec<Violation>) {
    let expected_bars = composition.bar_count();
    let steps_per_bar = composition.steps_per_bar();

    for (idx, track) in composition.tracks.iter().enumerate() {
        if track.bars.len() != expected_bars {
            violations.push(Violation::TrackBarCount {
                track: idx,
                expected: expected_bars,
                actual: track.bars.len(),
            });
        }

        for (bar_idx, bar) in track.bars.iter().enumerate() {
            if bar.len() != steps_per_bar {
                violations.push(Violation::BarStepCount {
                    track: idx,
                    bar: bar_idx,
                    expected: steps_per_bar,
                    actual: bar.len(),
                });
            }
        }

        // NaN fails the range check too
        if !(0.0..=1.0).contains(&track.volume) {
            violations.push(Violation::TrackVolume {
                track: idx,
                volume: track.volume,
            });
        }
    }
}

fn validate_sections(composition: &Composition, violations: &mut Vec<Violation>) {
    let number_of_bars = composition.number_of_bars;

    for (idx, section) in composition.sections.iter().enumerate() {
        if section.start_bar < 1 || section.start_bar > number_of_bars {
            violations.push(Violation::SectionStartOutOfRange {
                section: idx,
                start_bar: section.start_bar,
                number_of_bars,
            });
        }
        if section.end_bar < section.start_bar || section.end_bar > number_of_bars {
            violations.push(Violation::SectionEndInvalid {
                section: idx,
                start_bar: section.start_bar,
                end_bar: section.end_bar,
                number_of_bars,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::{
        create_composition, create_empty_bars, create_section, create_track,
        NewCompositionSettings,
    };

    fn composition(bars: u32) -> Composition {
        create_composition(&NewCompositionSettings::new("Validate").with_bars(bars))
    }

    fn with_track(mut comp: Composition) -> Composition {
        let track = create_track("conga", "Conga", comp.bar_count(), comp.steps_per_bar());
        comp.tracks.push(track);
        comp
    }

    #[test]
    fn test_fresh_composition_is_valid() {
        for (tempo, beats, bars) in [(40, 1, 1), (120, 4, 4), (300, 12, 64)] {
            let settings = NewCompositionSettings::new("Fresh")
                .with_tempo(tempo)
                .with_meter(beats, 4)
                .with_bars(bars);
            assert!(validate_composition(&create_composition(&settings)).is_empty());
        }
    }

    #[test]
    fn test_tempo_bounds() {
        let mut comp = composition(4);
        for tempo in [40, 300] {
            comp.tempo = tempo;
            assert!(is_valid(&comp));
        }
        for tempo in [39, 301] {
            comp.tempo = tempo;
            let violations = validate_composition(&comp);
            assert_eq!(violations, vec![Violation::TempoOutOfRange { tempo }]);
        }
    }

    #[test]
    fn test_beats_per_bar_bounds() {
        let mut comp = composition(4);
        comp.beats_per_bar = 0;
        assert_eq!(
            validate_composition(&comp),
            vec![Violation::BeatsPerBarOutOfRange { beats_per_bar: 0 }]
        );
        comp.beats_per_bar = 13;
        assert_eq!(validate_composition(&comp).len(), 1);
        comp.beats_per_bar = 12;
        assert!(is_valid(&comp));
    }

    #[test]
    fn test_no_bars() {
        let comp = composition(0);
        let violations = validate_composition(&comp);
        assert_eq!(violations, vec![Violation::NoBars]);
        assert_eq!(violations[0].to_string(), "Must have at least 1 bar");
    }

    #[test]
    fn test_track_bar_count_mismatch() {
        let mut comp = with_track(composition(4));
        comp.tracks[0].bars.pop();

        let violations = validate_composition(&comp);
        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!(v.kind(), ViolationKind::TrackBarCount);
        assert_eq!(v.track_index(), Some(0));
        assert_eq!(v.expected(), Some(4));
        assert_eq!(v.actual(), Some(3));
        let message = v.to_string();
        assert!(message.contains('0'));
        assert!(message.contains('3'));
        assert!(message.contains('4'));
    }

    #[test]
    fn test_bar_step_count_mismatch() {
        let mut comp = with_track(with_track(composition(4)));
        comp.tracks[1].bars[2].pop();

        let violations = validate_composition(&comp);
        assert_eq!(
            violations,
            vec![Violation::BarStepCount {
                track: 1,
                bar: 2,
                expected: 16,
                actual: 15
            }]
        );
        assert_eq!(violations[0].to_string(), "Track 1, bar 2 has 15 steps, expected 16");
        assert_eq!(violations[0].bar_index(), Some(2));
    }

    #[test]
    fn test_track_volume() {
        let mut comp = with_track(composition(4));
        comp.tracks[0].volume = 1.5;
        let violations = validate_composition(&comp);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind(), ViolationKind::TrackVolume);
        assert_eq!(violations[0].track_index(), Some(0));

        comp.tracks[0].volume = f64::NAN;
        assert_eq!(validate_composition(&comp).len(), 1);

        comp.tracks[0].volume = 0.0;
        assert!(is_valid(&comp));
    }

    #[test]
    fn test_section_bounds() {
        let mut comp = composition(4);
        comp.sections.push(create_section("Outro", 4, 4, None));
        assert!(is_valid(&comp));

        comp.sections[0].start_bar = 0;
        let violations = validate_composition(&comp);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind(), ViolationKind::SectionStartOutOfRange);
        assert_eq!(violations[0].section_index(), Some(0));

        comp.sections[0].start_bar = 4;
        comp.sections[0].end_bar = 5;
        let violations = validate_composition(&comp);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind(), ViolationKind::SectionEndInvalid);

        comp.sections[0].start_bar = 3;
        comp.sections[0].end_bar = 2;
        assert_eq!(validate_composition(&comp)[0].kind(), ViolationKind::SectionEndInvalid);
    }

    #[test]
    fn test_collects_all_in_order() {
        let mut comp = with_track(with_track(composition(2)));
        comp.tempo = 10;
        comp.beats_per_bar = 20;
        comp.tracks[0].bars = create_empty_bars(3, 80);
        comp.tracks[0].bars[1].push(Default::default());
        comp.tracks[1].volume = -0.1;
        comp.sections.push(create_section("Late", 3, 9, None));

        let kinds: Vec<ViolationKind> = validate_composition(&comp)
            .iter()
            .map(Violation::kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::TempoOutOfRange,
                ViolationKind::BeatsPerBarOutOfRange,
                ViolationKind::TrackBarCount,
                ViolationKind::BarStepCount,
                ViolationKind::BarStepCount,
                ViolationKind::BarStepCount,
                ViolationKind::TrackVolume,
                ViolationKind::SectionStartOutOfRange,
                ViolationKind::SectionEndInvalid,
            ]
        );
    }

    #[test]
    fn test_idempotent() {
        let mut comp = with_track(composition(4));
        comp.tempo = 500;
        comp.tracks[0].bars.truncate(1);
        assert_eq!(validate_composition(&comp), validate_composition(&comp));
    }

    #[test]
    fn test_violation_serializes_with_kind() {
        let v = Violation::TrackBarCount {
            track: 0,
            expected: 4,
            actual: 3,
        };
        let yaml = serde_yaml::to_string(&v).unwrap();
        assert!(yaml.contains("kind: track_bar_count"));
        assert!(yaml.contains("actual: 3"));
    }
}
