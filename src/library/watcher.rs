// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Library directory watcher.
//!
//! Reports compositions created, deleted or modified on disk so a library
//! view can refresh without rescanning. Modifications are debounced and
//! reparsed before they are reported.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::debug;

use super::{is_composition_file, load_composition};
use crate::composition::Composition;

/// Events emitted by the library watcher
#[derive(Debug, Clone)]
pub enum LibraryEvent {
    /// A composition file changed and parsed
    Reloaded(Box<Composition>),
    /// A composition file changed but failed to parse
    Error(String),
    /// A composition file appeared
    FileCreated(PathBuf),
    /// A composition file was removed
    FileDeleted(PathBuf),
}

/// Library watcher with debouncing
pub struct LibraryWatcher {
    _watcher: RecommendedWatcher,
    event_receiver: Receiver<LibraryEvent>,
    watched_path: PathBuf,
}

impl LibraryWatcher {
    /// Watch a library directory.
    ///
    /// # Arguments
    /// * `path` - Library directory
    /// * `debounce_ms` - Debounce duration in milliseconds (default: 500)
    pub fn new<P: AsRef<Path>>(path: P, debounce_ms: Option<u64>) -> Result<Self> {
        let watched_path = path.as_ref().to_path_buf();
        let debounce_duration = Duration::from_millis(debounce_ms.unwrap_or(500));

        let (event_tx, event_rx): (Sender<LibraryEvent>, Receiver<LibraryEvent>) = mpsc::channel();
        let (notify_tx, notify_rx): (Sender<Event>, Receiver<Event>) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            },
            Config::default(),
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {}", e))?;

        watcher
            .watch(&watched_path, RecursiveMode::NonRecursive)
            .map_err(|e| anyhow!("Failed to watch path {:?}: {}", watched_path, e))?;

        std::thread::spawn(move || debounce_loop(notify_rx, event_tx, debounce_duration));

        debug!(path = ?watched_path, "watching library");
        Ok(Self {
            _watcher: watcher,
            event_receiver: event_rx,
            watched_path,
        })
    }

    /// Try to receive the next event (non-blocking)
    pub fn try_recv(&self) -> Option<LibraryEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive all pending events
    pub fn recv_all(&self) -> Vec<LibraryEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Block until the next event
    pub fn recv(&self) -> Option<LibraryEvent> {
        self.event_receiver.recv().ok()
    }

    /// Get the path being watched
    pub fn watched_path(&self) -> &Path {
        &self.watched_path
    }
}

fn debounce_loop(
    notify_rx: Receiver<Event>,
    event_tx: Sender<LibraryEvent>,
    debounce_duration: Duration,
) {
    let mut last_event_time: Option<Instant> = None;
    let mut pending_paths: Vec<PathBuf> = Vec::new();

    loop {
        match notify_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                let paths = event.paths.into_iter().filter(|p| is_composition_file(p));
                match event.kind {
                    EventKind::Create(_) => {
                        for path in paths {
                            let _ = event_tx.send(LibraryEvent::FileCreated(path.clone()));
                            // Content usually lands after the create
                            if !pending_paths.contains(&path) {
                                pending_paths.push(path);
                            }
                            last_event_time = Some(Instant::now());
                        }
                    }
                    EventKind::Remove(_) => {
                        for path in paths {
                            pending_paths.retain(|p| p != &path);
                            let _ = event_tx.send(LibraryEvent::FileDeleted(path));
                        }
                    }
                    EventKind::Modify(_) => {
                        for path in paths {
                            if !pending_paths.contains(&path) {
                                pending_paths.push(path);
                            }
                            last_event_time = Some(Instant::now());
                        }
                    }
                    _ => {}
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let Some(last_time) = last_event_time else {
                    continue;
                };
                if last_time.elapsed() < debounce_duration {
                    continue;
                }
                for path in pending_paths.drain(..) {
                    // Renamed away or deleted before the debounce expired
                    if !path.is_file() {
                        continue;
                    }
                    let event = match load_composition(&path) {
                        Ok(composition) => LibraryEvent::Reloaded(Box::new(composition)),
                        Err(e) => LibraryEvent::Error(format!("Failed to load {:?}: {:#}", path, e)),
                    };
                    let _ = event_tx.send(event);
                }
                last_event_time = None;
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                // Watcher was dropped
                break;
            }
        }
    }
}
