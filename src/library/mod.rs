// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Composition library on disk.
//!
//! Each composition is one YAML file named after its id. Every field
//! round-trips exactly: volumes keep full `f64` precision, timestamps are
//! RFC 3339 with sub-second digits, ids and bar numbers are stored verbatim.

pub mod watcher;

pub use watcher::{LibraryEvent, LibraryWatcher};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use crate::composition::{Composition, CompositionMetadata};
use crate::validation::validate_composition;

/// File extension for saved compositions
pub const EXTENSION: &str = "yaml";

/// Parse a composition from YAML
pub fn from_yaml(yaml: &str) -> Result<Composition> {
    serde_yaml::from_str(yaml).context("Failed to parse composition YAML")
}

/// Serialize a composition to YAML
pub fn to_yaml(composition: &Composition) -> Result<String> {
    serde_yaml::to_string(composition).context("Failed to serialize composition to YAML")
}

/// Load a composition from a YAML file
pub fn load_composition<P: AsRef<Path>>(path: P) -> Result<Composition> {
    let contents = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read composition file: {:?}", path.as_ref()))?;
    from_yaml(&contents).with_context(|| format!("Invalid composition file: {:?}", path.as_ref()))
}

/// Save a composition to a YAML file
pub fn save_composition<P: AsRef<Path>>(composition: &Composition, path: P) -> Result<()> {
    let yaml = to_yaml(composition)?;
    fs::write(path.as_ref(), yaml)
        .with_context(|| format!("Failed to write composition file: {:?}", path.as_ref()))
}

/// Check whether a path looks like a composition file
pub fn is_composition_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// A directory of saved compositions
#[derive(Debug, Clone)]
pub struct Library {
    root: PathBuf,
}

impl Library {
    /// Open a library, creating the directory if needed
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let root = dir.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create library directory: {:?}", root))?;
        Ok(Self { root })
    }

    /// Get the library directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path for a composition id
    pub fn path_for(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            bail!("Composition id cannot be used as a file name: {:?}", id);
        }
        Ok(self.root.join(format!("{}.{}", id, EXTENSION)))
    }

    /// Save a composition under its id, returning the file path.
    ///
    /// Invalid compositions are saved too; blocking a save is the caller's
    /// decision.
    pub fn save(&self, composition: &Composition) -> Result<PathBuf> {
        let path = self.path_for(&composition.id)?;

        let violations = validate_composition(composition);
        if !violations.is_empty() {
            warn!(
                id = %composition.id,
                violations = violations.len(),
                "saving composition with violations"
            );
        }

        save_composition(composition, &path)?;
        info!(id = %composition.id, path = ?path, "saved composition");
        Ok(path)
    }

    /// Load a composition by id
    pub fn load(&self, id: &str) -> Result<Composition> {
        let path = self.path_for(id)?;
        load_composition(path)
    }

    /// Delete a composition by id
    pub fn delete(&self, id: &str) -> Result<()> {
        let path = self.path_for(id)?;
        fs::remove_file(&path)
            .with_context(|| format!("Failed to delete composition file: {:?}", path))?;
        info!(id, "deleted composition");
        Ok(())
    }

    /// Check if a composition id is saved
    pub fn contains(&self, id: &str) -> bool {
        self.path_for(id).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Metadata for every readable composition, most recently modified first.
    ///
    /// Files that fail to parse are skipped with a warning.
    pub fn list(&self) -> Result<Vec<CompositionMetadata>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read library directory: {:?}", self.root))?;

        let mut listing = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() || !is_composition_file(&path) {
                continue;
            }
            match load_composition(&path) {
                Ok(composition) => {
                    listing.push(composition.metadata(path.to_string_lossy()));
                }
                Err(e) => {
                    warn!(path = ?path, error = %e, "skipping unreadable composition");
                }
            }
        }

        listing.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        debug!(count = listing.len(), "listed library");
        Ok(listing)
    }
}
