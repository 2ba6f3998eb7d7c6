// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pattern fills for a single bar of a track.
//!
//! Fills overwrite the active flags of one bar and leave volume overrides
//! alone. Random fills take a seed so the same request reproduces the same
//! bar.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::composition::{Bar, Composition, EditError};

/// Euclidean rhythm: `pulses` hits spread as evenly as possible over `steps`,
/// rotated right by `rotation` steps.
///
/// Step `i` is a hit when the running total `i * pulses` wraps past a
/// multiple of `steps`, the bucket form of Bjorklund's algorithm. The first
/// hit of the unrotated pattern is always step 0.
pub fn euclidean(pulses: usize, steps: usize, rotation: usize) -> Vec<bool> {
    if steps == 0 {
        return vec![];
    }
    let pulses = pulses.min(steps);
    let shift = rotation % steps;
    (0..steps)
        .map(|i| {
            let source = (i + steps - shift) % steps;
            source * pulses % steps < pulses
        })
        .collect()
}

/// Every `interval` steps starting at `offset`
pub fn every(interval: usize, offset: usize, steps: usize) -> Vec<bool> {
    let interval = interval.max(1);
    (0..steps)
        .map(|i| i >= offset && (i - offset) % interval == 0)
        .collect()
}

/// Seeded random hits with probability `density`
pub fn random(density: f64, steps: usize, seed: u64) -> Vec<bool> {
    let density = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
    let mut rng = StdRng::seed_from_u64(seed);
    (0..steps).map(|_| rng.gen_bool(density)).collect()
}

/// Copy a pattern's flags onto a bar; extra steps on either side are ignored
pub fn apply(bar: &mut Bar, pattern: &[bool]) {
    for (beat, &active) in bar.iter_mut().zip(pattern) {
        beat.active = active;
    }
}

impl Composition {
    fn fill_bar(&mut self, track: usize, bar: usize, pattern: &[bool]) -> Result<(), EditError> {
        let row = self
            .tracks
            .get_mut(track)
            .ok_or(EditError::TrackOutOfRange(track))?
            .bars
            .get_mut(bar)
            .ok_or(EditError::BarOutOfRange { track, bar })?;
        apply(row, pattern);
        self.touch();
        Ok(())
    }

    /// Fill a bar with a Euclidean rhythm rotated right by `rotation` steps
    pub fn fill_euclidean(
        &mut self,
        track: usize,
        bar: usize,
        pulses: usize,
        rotation: usize,
    ) -> Result<(), EditError> {
        let pattern = euclidean(pulses, self.steps_per_bar(), rotation);
        self.fill_bar(track, bar, &pattern)
    }

    /// Fill a bar with a hit every `interval` steps from `offset`
    pub fn fill_every(
        &mut self,
        track: usize,
        bar: usize,
        interval: usize,
        offset: usize,
    ) -> Result<(), EditError> {
        let pattern = every(interval, offset, self.steps_per_bar());
        self.fill_bar(track, bar, &pattern)
    }

    /// Fill a bar with seeded random hits
    pub fn fill_random(
        &mut self,
        track: usize,
        bar: usize,
        density: f64,
        seed: u64,
    ) -> Result<(), EditError> {
        let pattern = random(density, self.steps_per_bar(), seed);
        self.fill_bar(track, bar, &pattern)
    }
}
