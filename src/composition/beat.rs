// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Single grid cell.

use serde::{Deserialize, Serialize};

/// One step in a track's grid
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Beat {
    /// Whether this step plays
    pub active: bool,
    /// Per-step volume override (0.0 - 1.0), track volume when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Beat {
    /// Create an active beat
    pub fn on() -> Self {
        Self {
            active: true,
            volume: None,
        }
    }

    /// Builder: set volume override
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Flip the active flag, returning the new value
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }

    /// Volume this beat plays at given its track volume
    pub fn effective_volume(&self, track_volume: f64) -> f64 {
        self.volume.unwrap_or(track_volume)
    }
}

/// One bar of steps
pub type Bar = Vec<Beat>;
