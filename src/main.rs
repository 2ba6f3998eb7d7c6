// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use anyhow::Result;
use beatgrid::library::{self, Library, LibraryEvent, LibraryWatcher};
use beatgrid::{
    audit_composition, validate_composition, Composition, NewCompositionSettings, SoundCatalog,
};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

fn print_usage() {
    println!("BEATGRID - Drum Machine Compositions");
    println!();
    println!("Usage: beatgrid [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --new <DIR> <TITLE> [BPM] [BARS]  Create an empty composition in library DIR");
    println!("  --validate <FILE>                 Check a composition file for violations");
    println!("  --audit <FILE> [CATALOG]          Check sound references and section overlaps");
    println!("  --list <DIR>                      List compositions in library DIR");
    println!("  --watch <DIR>                     Print library changes for 30 seconds");
    println!("  --sounds [CATALOG]                List available sounds");
    println!("  --help                            Show this help message");
}

fn load_catalog(path: Option<&String>) -> Result<SoundCatalog> {
    match path {
        Some(path) => SoundCatalog::load(path),
        None => Ok(SoundCatalog::builtin()),
    }
}

fn create_new(dir: &str, title: &str, bpm: u32, bars: u32) -> Result<()> {
    let library = Library::open(dir)?;
    let catalog = SoundCatalog::builtin();
    let settings = NewCompositionSettings::new(title)
        .with_tempo(bpm)
        .with_bars(bars);

    let composition = Composition::from_settings(&settings, &catalog)?;
    let path = library.save(&composition)?;

    println!("Created '{}' ({} BPM, {} bars)", composition.title, bpm, bars);
    println!("Saved to {}", path.display());
    Ok(())
}

fn validate_file(path: &str) -> Result<bool> {
    let composition = library::load_composition(path)?;
    let violations = validate_composition(&composition);

    if violations.is_empty() {
        println!("'{}' is valid", composition.title);
        return Ok(true);
    }

    println!("'{}' has {} problem(s):", composition.title, violations.len());
    for violation in &violations {
        println!("  - {}", violation);
    }
    Ok(false)
}

fn audit_file(path: &str, catalog: Option<&String>) -> Result<bool> {
    let composition = library::load_composition(path)?;
    let catalog = load_catalog(catalog)?;
    let findings = audit_composition(&composition, Some(&catalog));

    if findings.is_empty() {
        println!("'{}' has no reference problems", composition.title);
        return Ok(true);
    }

    for finding in &findings {
        println!("  - {}", finding);
    }
    Ok(false)
}

fn list_library(dir: &str) -> Result<()> {
    let library = Library::open(dir)?;
    let listing = library.list()?;

    if listing.is_empty() {
        println!("No compositions in {}", library.root().display());
        return Ok(());
    }

    for meta in listing {
        println!(
            "{:<32} {:>3} BPM {:>3} bars {:>2} tracks  {}",
            meta.title,
            meta.tempo,
            meta.number_of_bars,
            meta.track_count,
            meta.modified_at.format("%Y-%m-%d %H:%M"),
        );
    }
    Ok(())
}

fn list_sounds(catalog: Option<&String>) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    for sound in catalog.iter() {
        println!("{:<16} {:<16} {:?}", sound.id, sound.name, sound.category);
    }
    Ok(())
}

fn watch_library(dir: &str) -> Result<()> {
    let watcher = LibraryWatcher::new(dir, None)?;
    println!("Watching {} (press Ctrl+C to stop)...", watcher.watched_path().display());

    let start_time = Instant::now();
    let run_duration = Duration::from_secs(30);

    while start_time.elapsed() < run_duration {
        for event in watcher.recv_all() {
            match event {
                LibraryEvent::Reloaded(composition) => {
                    let problems = validate_composition(&composition).len();
                    println!("Reloaded '{}' ({} problem(s))", composition.title, problems);
                }
                LibraryEvent::Error(message) => println!("Error: {}", message),
                LibraryEvent::FileCreated(path) => println!("Created {}", path.display()),
                LibraryEvent::FileDeleted(path) => println!("Deleted {}", path.display()),
            }
        }

        // Small sleep to prevent busy-waiting
        thread::sleep(Duration::from_millis(50));
    }

    println!("Watch complete!");
    Ok(())
}

fn parse_number(args: &[String], index: usize, default: u32) -> Result<u32> {
    match args.get(index) {
        Some(value) => value
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid number: {}", value)),
        None => Ok(default),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("BEATGRID - Drum Machine Compositions");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "--new" => {
            if args.len() < 4 {
                eprintln!("Error: --new requires a library directory and a title");
                std::process::exit(1);
            }
            let bpm = parse_number(&args, 4, 120)?;
            let bars = parse_number(&args, 5, 4)?;
            create_new(&args[2], &args[3], bpm, bars)?;
        }
        "--validate" => {
            if args.len() < 3 {
                eprintln!("Error: --validate requires a composition file");
                std::process::exit(1);
            }
            if !validate_file(&args[2])? {
                std::process::exit(1);
            }
        }
        "--audit" => {
            if args.len() < 3 {
                eprintln!("Error: --audit requires a composition file");
                std::process::exit(1);
            }
            if !audit_file(&args[2], args.get(3))? {
                std::process::exit(1);
            }
        }
        "--list" => {
            if args.len() < 3 {
                eprintln!("Error: --list requires a library directory");
                std::process::exit(1);
            }
            list_library(&args[2])?;
        }
        "--watch" => {
            if args.len() < 3 {
                eprintln!("Error: --watch requires a library directory");
                std::process::exit(1);
            }
            watch_library(&args[2])?;
        }
        "--sounds" => {
            list_sounds(args.get(2))?;
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
