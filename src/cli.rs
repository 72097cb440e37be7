//! CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use nandtool_core::flash::Region;
use std::path::PathBuf;

const PROGRAMMER_HELP: &str =
    "Programmer to use, optionally with options (e.g. ftdi:usb=0403:6010,slow=1 or dummy:id=ECF1)";

#[derive(Parser)]
#[command(name = "nandtool")]
#[command(author, version, about = "Raw parallel NAND flash reader/writer", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a geometry database file or directory (contains .ron files)
    /// Defaults to looking in ./chips/nand/ and /usr/share/nandtool/chips/
    #[arg(long, global = true)]
    pub chip_db: Option<PathBuf>,

    /// Give up waiting for the chip's ready line after this many milliseconds
    /// (default: wait forever)
    #[arg(long, global = true)]
    pub ready_timeout_ms: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Page area selection on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionArg {
    /// Main (user data) area only
    Main,
    /// Spare (OOB) area only
    Oob,
    /// Main area followed by spare area
    #[default]
    Both,
}

impl From<RegionArg> for Region {
    fn from(arg: RegionArg) -> Self {
        match arg {
            RegionArg::Main => Region::MAIN,
            RegionArg::Oob => Region::OOB,
            RegionArg::Both => Region::BOTH,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Identify the NAND chip and show its geometry
    #[command(alias = "identify")]
    Info {
        #[arg(short, long, default_value = "ftdi", help = PROGRAMMER_HELP)]
        programmer: String,
    },

    /// Dump the whole chip to a file
    Read {
        #[arg(short, long, default_value = "ftdi", help = PROGRAMMER_HELP)]
        programmer: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Page area to dump
        #[arg(short = 't', long, value_enum, default_value_t = RegionArg::Both)]
        region: RegionArg,
    },

    /// Program the chip from a file of main+spare pages
    Write {
        #[arg(short, long, default_value = "ftdi", help = PROGRAMMER_HELP)]
        programmer: String,

        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Page area contained in the file (only "both" can be programmed)
        #[arg(short = 't', long, value_enum, default_value_t = RegionArg::Both)]
        region: RegionArg,
    },

    /// Compare the chip against a file and report every differing byte
    Verify {
        #[arg(short, long, default_value = "ftdi", help = PROGRAMMER_HELP)]
        programmer: String,

        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Page area contained in the file
        #[arg(short = 't', long, value_enum, default_value_t = RegionArg::Both)]
        region: RegionArg,
    },

    /// List available programmers
    ListProgrammers,

    /// List known NAND geometries
    ListChips {
        /// Filter by manufacturer name
        #[arg(long)]
        vendor: Option<String>,
    },
}
