// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Named, colored bar ranges.
//!
//! Sections are labels over bars (e.g. "Intro", "Verse 1") and own no beats.
//! Bars are 1-indexed and both ends are inclusive.

use serde::{Deserialize, Serialize};

/// Section colors (theme color keys)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionColor {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
    Pink,
    Yellow,
    Red,
    Cyan,
}

impl SectionColor {
    /// All colors in theme order
    pub const ALL: [SectionColor; 8] = [
        SectionColor::Blue,
        SectionColor::Green,
        SectionColor::Purple,
        SectionColor::Orange,
        SectionColor::Pink,
        SectionColor::Yellow,
        SectionColor::Red,
        SectionColor::Cyan,
    ];

    /// Theme key
    pub fn name(&self) -> &'static str {
        match self {
            SectionColor::Blue => "blue",
            SectionColor::Green => "green",
            SectionColor::Purple => "purple",
            SectionColor::Orange => "orange",
            SectionColor::Pink => "pink",
            SectionColor::Yellow => "yellow",
            SectionColor::Red => "red",
            SectionColor::Cyan => "cyan",
        }
    }

    /// Parse a theme key
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }

    /// Next color in theme order, wrapping
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&c| c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for SectionColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A labeled range of bars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// First bar (1-indexed)
    pub start_bar: u32,
    /// Last bar (1-indexed, inclusive)
    pub end_bar: u32,
    /// Color key
    pub color: SectionColor,
}

impl Section {
    /// Length in bars, zero when the range is inverted
    pub fn length_bars(&self) -> u32 {
        if self.end_bar < self.start_bar {
            0
        } else {
            self.end_bar - self.start_bar + 1
        }
    }

    /// Check if a 1-indexed bar falls inside this section
    pub fn contains_bar(&self, bar: u32) -> bool {
        bar >= self.start_bar && bar <= self.end_bar
    }

    /// Check if two sections share at least one bar
    pub fn overlaps(&self, other: &Section) -> bool {
        self.length_bars() > 0
            && other.length_bars() > 0
            && self.start_bar <= other.end_bar
            && other.start_bar <= self.end_bar
    }

    /// Format range as string
    pub fn format_range(&self) -> String {
        if self.start_bar == self.end_bar {
            format!("bar {}", self.start_bar)
        } else {
            format!("bars {}-{}", self.start_bar, self.end_bar)
        }
    }
}
