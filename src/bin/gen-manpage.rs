//! Man page generator for nandtool
//!
//! Writes nandtool.1 plus one nandtool-<command>.1 page per subcommand.
//!
//! Usage: cargo run --bin gen-manpage -- [output-dir]

use clap::CommandFactory;
use std::fs;
use std::path::PathBuf;

#[path = "../cli.rs"]
mod cli;

/// Render the top-level page and a page for every chip/listing command
fn render_pages(mut cmd: clap::Command) -> std::io::Result<Vec<(String, Vec<u8>)>> {
    // Propagates the global options into each subcommand
    cmd.build();

    let mut pages = Vec::new();
    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd.clone()).render(&mut buffer)?;
    pages.push(("nandtool.1".to_string(), buffer));

    for sub in cmd.get_subcommands().filter(|s| s.get_name() != "help") {
        let title = format!("nandtool-{}", sub.get_name());
        let mut buffer = Vec::new();
        clap_mangen::Man::new(sub.clone())
            .title(title.clone())
            .render(&mut buffer)?;
        pages.push((format!("{}.1", title), buffer));
    }
    Ok(pages)
}

fn main() -> std::io::Result<()> {
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));

    fs::create_dir_all(&output_dir)?;

    for (name, buffer) in render_pages(cli::Cli::command())? {
        let output_path = output_dir.join(&name);
        fs::write(&output_path, buffer)?;
        println!("Generated {}", output_path.display());
    }

    println!("\nTo view a page:");
    println!("  man -l {}", output_dir.join("nandtool-read.1").display());

    Ok(())
}
