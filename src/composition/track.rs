// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Drum track holding a bar × step grid.

use serde::{Deserialize, Serialize};

use super::beat::{Bar, Beat};

/// Track volume given to new tracks
pub const DEFAULT_TRACK_VOLUME: f64 = 0.8;

/// A drum track bound to one sound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Sound to play, an opaque catalog key
    pub sound_id: String,
    /// Track volume (0.0 - 1.0)
    pub volume: f64,
    /// Pattern data: `bars[bar][step]`
    pub bars: Vec<Bar>,
}

impl Track {
    /// Get a beat
    pub fn beat(&self, bar: usize, step: usize) -> Option<&Beat> {
        self.bars.get(bar).and_then(|b| b.get(step))
    }

    /// Get a mutable beat
    pub fn beat_mut(&mut self, bar: usize, step: usize) -> Option<&mut Beat> {
        self.bars.get_mut(bar).and_then(|b| b.get_mut(step))
    }

    /// Get number of bars
    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    /// Count active beats across all bars
    pub fn active_count(&self) -> usize {
        self.bars
            .iter()
            .flat_map(|bar| bar.iter())
            .filter(|beat| beat.active)
            .count()
    }

    /// Active step indices within a bar
    pub fn active_steps(&self, bar: usize) -> Vec<usize> {
        self.bars
            .get(bar)
            .map(|b| {
                b.iter()
                    .enumerate()
                    .filter(|(_, beat)| beat.active)
                    .map(|(i, _)| i)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Reset every beat to inactive with no override
    pub fn clear(&mut self) {
        for beat in self.bars.iter_mut().flat_map(|bar| bar.iter_mut()) {
            *beat = Beat::default();
        }
    }

    /// Resize the grid, keeping beats inside the overlapping region
    pub fn resize(&mut self, number_of_bars: usize, steps_per_bar: usize) {
        self.bars.truncate(number_of_bars);
        for bar in &mut self.bars {
            bar.resize(steps_per_bar, Beat::default());
        }
        while self.bars.len() < number_of_bars {
            self.bars.push(vec![Beat::default(); steps_per_bar]);
        }
    }
}
