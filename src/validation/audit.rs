// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Reference integrity checks.
//!
//! These are stricter than the structural validator and opt-in: a composition
//! can pass `validate_composition` and still reference a sound nobody ships.

use std::collections::HashSet;

use super::Violation;
use crate::composition::Composition;
use crate::sound::SoundCatalog;

/// Audit sound references, beat volumes, section overlaps and id reuse.
///
/// A track's sound is known when it is listed in `available_sounds` or, if a
/// catalog is given, present in the catalog. Results never repeat the
/// structural checks; concatenate with `validate_composition` for both.
pub fn audit_composition(
    composition: &Composition,
    catalog: Option<&SoundCatalog>,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    audit_sounds(composition, catalog, &mut violations);
    audit_beat_volumes(composition, &mut violations);
    audit_section_overlaps(composition, &mut violations);
    audit_ids(composition, &mut violations);

    violations
}

fn audit_sounds(
    composition: &Composition,
    catalog: Option<&SoundCatalog>,
    violations: &mut Vec<Violation>,
) {
    for (idx, track) in composition.tracks.iter().enumerate() {
        let listed = composition
            .available_sounds
            .iter()
            .any(|id| id == &track.sound_id);
        let cataloged = catalog.map_or(false, |c| c.contains(&track.sound_id));

        if !listed && !cataloged {
            violations.push(Violation::UnknownSound {
                track: idx,
                sound_id: track.sound_id.clone(),
            });
        }
    }
}

fn audit_beat_volumes(composition: &Composition, violations: &mut Vec<Violation>) {
    for (idx, track) in composition.tracks.iter().enumerate() {
        for (bar_idx, bar) in track.bars.iter().enumerate() {
            for (step, beat) in bar.iter().enumerate() {
                if let Some(volume) = beat.volume {
                    if !(0.0..=1.0).contains(&volume) {
                        violations.push(Violation::BeatVolume {
                            track: idx,
                            bar: bar_idx,
                            step,
                            volume,
                        });
                    }
                }
            }
        }
    }
}

fn audit_section_overlaps(composition: &Composition, violations: &mut Vec<Violation>) {
    let sections = &composition.sections;
    for i in 0..sections.len() {
        for j in (i + 1)..sections.len() {
            if sections[i].overlaps(&sections[j]) {
                violations.push(Violation::SectionOverlap {
                    section: i,
                    other: j,
                });
            }
        }
    }
}

fn audit_ids(composition: &Composition, violations: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    let ids = composition
        .tracks
        .iter()
        .map(|t| &t.id)
        .chain(composition.sections.iter().map(|s| &s.id));

    for id in ids {
        if !seen.insert(id.as_str()) {
            violations.push(Violation::DuplicateId { id: id.clone() });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::{create_composition, NewCompositionSettings};
    use crate::sound::{DrumSound, SoundCategory, SoundSource};
    use crate::validation::{validate_composition, ViolationKind};

    fn composition() -> Composition {
        let mut comp = create_composition(&NewCompositionSettings::new("Audit").with_bars(8));
        comp.available_sounds = vec!["conga_low".to_string()];
        comp.add_track("conga_low", "Low Conga");
        comp
    }

    #[test]
    fn test_clean_composition() {
        let mut comp = composition();
        comp.add_section("A", 1, 4, None);
        comp.add_section("B", 5, 8, None);
        assert!(audit_composition(&comp, None).is_empty());
    }

    #[test]
    fn test_unknown_sound() {
        let mut comp = composition();
        comp.add_track("guiro", "Guiro");

        let violations = audit_composition(&comp, None);
        assert_eq!(
            violations,
            vec![Violation::UnknownSound {
                track: 1,
                sound_id: "guiro".to_string()
            }]
        );
        // Structural validation stays permissive
        assert!(validate_composition(&comp).is_empty());

        let mut catalog = SoundCatalog::new();
        catalog.add(DrumSound::new(
            "guiro",
            "Guiro",
            SoundSource::BuiltInAsset(9),
            SoundCategory::Other,
        ));
        assert!(audit_composition(&comp, Some(&catalog)).is_empty());
    }

    #[test]
    fn test_beat_volume() {
        let mut comp = composition();
        comp.tracks[0].bars[2][3].volume = Some(1.2);
        comp.tracks[0].bars[2][4].volume = Some(1.0);

        let violations = audit_composition(&comp, None);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind(), ViolationKind::BeatVolume);
        assert_eq!(violations[0].bar_index(), Some(2));
    }

    #[test]
    fn test_section_overlap() {
        let mut comp = composition();
        comp.add_section("A", 1, 4, None);
        comp.add_section("B", 4, 6, None);
        comp.add_section("C", 7, 8, None);
        comp.add_section("D", 2, 2, None);

        let violations = audit_composition(&comp, None);
        assert_eq!(
            violations,
            vec![
                Violation::SectionOverlap { section: 0, other: 1 },
                Violation::SectionOverlap { section: 0, other: 3 },
            ]
        );
    }

    #[test]
    fn test_duplicate_ids() {
        let mut comp = composition();
        let copy = comp.tracks[0].clone();
        comp.tracks.push(copy);

        let violations = audit_composition(&comp, None);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind(), ViolationKind::DuplicateId);
    }
}
