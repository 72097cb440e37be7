//! nandtool - raw parallel NAND flash reader/writer
//!
//! Reads the ID of a NAND chip hanging off a bus adapter, looks up its
//! geometry and then dumps, programs or verifies the whole chip page by
//! page. The main area, the spare (OOB) area or both can be selected.
//!
//! # Architecture
//!
//! - **Transports** (FTDI FT2232H, in-memory dummy) latch command, address
//!   and data cycles onto the chip's bus.
//! - **nandtool-core** identifies the chip and picks the small-page or
//!   large-page access strategy for it.
//! - The commands here only loop over pages and move bytes to and from
//!   files.

mod cli;
mod commands;
mod programmers;

use clap::Parser;
use cli::{Cli, Commands};
use nandtool_core::chip::{ChipOptions, GeometryDatabase};
use nandtool_core::transport::ReadyWait;
use std::path::{Path, PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let db = match load_geometry_database(cli.chip_db.as_deref()) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to load geometry database: {}", e);
            std::process::exit(1);
        }
    };
    if !db.is_empty() {
        log::info!("Loaded {} geometry definitions", db.len());
    }

    let options = chip_options(cli.ready_timeout_ms);

    let result = match cli.command {
        Commands::Info { programmer } => programmers::with_programmer(&programmer, |t| {
            commands::run_info(t, &db, options)
        }),
        Commands::Read {
            programmer,
            output,
            region,
        } => programmers::with_programmer(&programmer, |t| {
            commands::run_read(t, &db, options, &output, region.into())
        }),
        Commands::Write {
            programmer,
            input,
            region,
        } => programmers::with_programmer(&programmer, |t| {
            commands::run_write(t, &db, options, &input, region.into())
        }),
        Commands::Verify {
            programmer,
            input,
            region,
        } => programmers::with_programmer(&programmer, |t| {
            commands::run_verify(t, &db, options, &input, region.into())
        }),
        Commands::ListProgrammers => {
            commands::list_programmers();
            Ok(())
        }
        Commands::ListChips { vendor } => {
            commands::list_chips(&db, vendor.as_deref());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Session options from the command line
fn chip_options(ready_timeout_ms: Option<u32>) -> ChipOptions {
    let ready = match ready_timeout_ms {
        Some(ms) => ReadyWait::with_timeout_us(ms.saturating_mul(1000)),
        None => ReadyWait::unbounded(),
    };
    ChipOptions {
        ready,
        ..ChipOptions::default()
    }
}

fn load_geometry_database(path: Option<&Path>) -> Result<GeometryDatabase, Box<dyn std::error::Error>> {
    let mut db = GeometryDatabase::new();

    if let Some(path) = path {
        // User specified a path
        if path.exists() {
            db.load_path(path)?;
        } else {
            return Err(format!("Geometry database path not found: {}", path.display()).into());
        }
    } else {
        // Try default locations; the built-in table covers the common parts
        let default_paths = [
            PathBuf::from("chips/nand"),
            PathBuf::from("/usr/share/nandtool/chips"),
            PathBuf::from("/usr/local/share/nandtool/chips"),
        ];

        for dir in &default_paths {
            if dir.is_dir() {
                match db.load_dir(dir) {
                    Ok(count) => log::debug!("Loaded {} geometries from {}", count, dir.display()),
                    Err(e) => log::warn!("Failed to load geometries from {}: {}", dir.display(), e),
                }
            }
        }
    }

    Ok(db)
}
