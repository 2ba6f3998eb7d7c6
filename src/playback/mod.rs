// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback state and position.
//!
//! `PlaybackState` and `PlaybackPosition` are the values a playback engine
//! reads and publishes. `Transport` is a pure state machine over them: it
//! keeps the position in bounds as it steps and wraps, but schedules nothing.
//! The engine decides when to call [`Transport::advance`], typically every
//! [`step_duration`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::composition::Composition;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Playing,
    #[default]
    Stopped,
    Paused,
}

/// Position within the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackPosition {
    /// Bar (0-indexed)
    pub bar: usize,
    /// Step within bar (0-indexed)
    pub step: usize,
}

impl PlaybackPosition {
    /// Create a new position
    pub fn new(bar: usize, step: usize) -> Self {
        Self { bar, step }
    }

    /// Check the position fits a grid
    pub fn is_within(&self, number_of_bars: usize, steps_per_bar: usize) -> bool {
        self.bar < number_of_bars && self.step < steps_per_bar
    }

    /// Steps from the start of the composition
    pub fn to_step_index(&self, steps_per_bar: usize) -> usize {
        self.bar * steps_per_bar + self.step
    }

    /// Position of an absolute step index
    pub fn from_step_index(index: usize, steps_per_bar: usize) -> Self {
        if steps_per_bar == 0 {
            return Self::default();
        }
        Self {
            bar: index / steps_per_bar,
            step: index % steps_per_bar,
        }
    }

    /// Format position as string (1-indexed)
    pub fn format(&self) -> String {
        format!("{}.{:02}", self.bar + 1, self.step + 1)
    }
}

/// Time between two steps
pub fn step_duration(tempo: u32, subdivision: u32) -> Duration {
    if tempo == 0 || subdivision == 0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(60.0 / tempo as f64 / subdivision as f64)
}

/// Transport state machine for stepping through a grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transport {
    state: PlaybackState,
    position: PlaybackPosition,
    number_of_bars: usize,
    steps_per_bar: usize,
}

impl Transport {
    /// Create a stopped transport for a grid
    pub fn new(number_of_bars: usize, steps_per_bar: usize) -> Self {
        Self {
            state: PlaybackState::Stopped,
            position: PlaybackPosition::default(),
            number_of_bars,
            steps_per_bar,
        }
    }

    /// Create a stopped transport sized to a composition
    pub fn for_composition(composition: &Composition) -> Self {
        Self::new(composition.bar_count(), composition.steps_per_bar())
    }

    /// Get state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Get position
    pub fn position(&self) -> PlaybackPosition {
        self.position
    }

    /// Check if playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    fn is_empty(&self) -> bool {
        self.number_of_bars == 0 || self.steps_per_bar == 0
    }

    /// Start playback (stopped or paused to playing)
    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// Pause playback, keeping position
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Resume from pause
    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Playing;
        }
    }

    /// Stop playback and return to the start
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.position = PlaybackPosition::default();
    }

    /// Toggle between playing and paused (stopped starts playing)
    pub fn toggle(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused | PlaybackState::Stopped => self.play(),
        }
    }

    /// Move one step forward, wrapping at the last bar.
    ///
    /// Returns the new position, or `None` when not playing or the grid is
    /// empty.
    pub fn advance(&mut self) -> Option<PlaybackPosition> {
        if self.state != PlaybackState::Playing || self.is_empty() {
            return None;
        }

        self.position.step += 1;
        if self.position.step >= self.steps_per_bar {
            self.position.step = 0;
            self.position.bar += 1;
            if self.position.bar >= self.number_of_bars {
                self.position.bar = 0;
            }
        }
        Some(self.position)
    }

    /// Jump to a position; out-of-bounds positions are rejected
    pub fn seek(&mut self, position: PlaybackPosition) -> bool {
        if position.is_within(self.number_of_bars, self.steps_per_bar) {
            self.position = position;
            true
        } else {
            false
        }
    }

    /// Jump to the first step of a bar
    pub fn goto_bar(&mut self, bar: usize) -> bool {
        self.seek(PlaybackPosition::new(bar, 0))
    }

    /// Follow a grid size change, pulling the position back inside
    pub fn resize(&mut self, number_of_bars: usize, steps_per_bar: usize) {
        self.number_of_bars = number_of_bars;
        self.steps_per_bar = steps_per_bar;
        if self.is_empty() {
            self.position = PlaybackPosition::default();
            return;
        }
        self.position.bar = self.position.bar.min(number_of_bars - 1);
        self.position.step = self.position.step.min(steps_per_bar - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::{create_composition, NewCompositionSettings};

    #[test]
    fn test_position_format() {
        let pos = PlaybackPosition::new(2, 7);
        assert_eq!(pos.format(), "3.08");
        assert_eq!(pos.to_step_index(16), 39);
        assert_eq!(PlaybackPosition::from_step_index(39, 16), pos);
        assert_eq!(PlaybackPosition::from_step_index(5, 0), PlaybackPosition::default());
    }

    #[test]
    fn test_step_duration() {
        // 120 BPM sixteenths: 125ms
        let d = step_duration(120, 4);
        assert!((d.as_secs_f64() - 0.125).abs() < 1e-9);
        assert_eq!(step_duration(0, 4), Duration::ZERO);
    }

    #[test]
    fn test_state_transitions() {
        let mut transport = Transport::new(2, 4);
        assert_eq!(transport.state(), PlaybackState::Stopped);

        transport.pause();
        assert_eq!(transport.state(), PlaybackState::Stopped);
        transport.resume();
        assert_eq!(transport.state(), PlaybackState::Stopped);

        transport.play();
        assert!(transport.is_playing());
        transport.advance();

        transport.pause();
        assert_eq!(transport.state(), PlaybackState::Paused);
        assert_eq!(transport.advance(), None);
        assert_eq!(transport.position(), PlaybackPosition::new(0, 1));

        transport.resume();
        assert_eq!(transport.state(), PlaybackState::Playing);

        transport.stop();
        assert_eq!(transport.state(), PlaybackState::Stopped);
        assert_eq!(transport.position(), PlaybackPosition::default());

        transport.toggle();
        assert_eq!(transport.state(), PlaybackState::Playing);
        transport.toggle();
        assert_eq!(transport.state(), PlaybackState::Paused);
    }

    #[test]
    fn test_advance_wraps_and_stays_in_bounds() {
        let mut transport = Transport::new(2, 3);
        transport.play();

        let visited: Vec<PlaybackPosition> = (0..7).filter_map(|_| transport.advance()).collect();
        assert_eq!(visited.len(), 7);
        assert_eq!(visited[1], PlaybackPosition::new(0, 2));
        assert_eq!(visited[2], PlaybackPosition::new(1, 0));
        assert_eq!(visited[5], PlaybackPosition::new(0, 0));
        assert!(visited.iter().all(|p| p.is_within(2, 3)));
    }

    #[test]
    fn test_empty_grid() {
        let mut transport = Transport::new(0, 16);
        transport.play();
        assert_eq!(transport.advance(), None);
        assert!(!transport.goto_bar(0));
    }

    #[test]
    fn test_seek_and_resize() {
        let comp = create_composition(&NewCompositionSettings::new("T").with_bars(4));
        let mut transport = Transport::for_composition(&comp);

        assert!(transport.seek(PlaybackPosition::new(3, 15)));
        assert!(!transport.seek(PlaybackPosition::new(4, 0)));
        assert!(!transport.seek(PlaybackPosition::new(0, 16)));

        transport.resize(2, 8);
        assert_eq!(transport.position(), PlaybackPosition::new(1, 7));

        assert!(transport.goto_bar(0));
        assert_eq!(transport.position(), PlaybackPosition::new(0, 0));
    }
}
