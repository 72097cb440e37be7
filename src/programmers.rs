//! Programmer registration and dispatch
//!
//! This module provides a centralized registry for all NAND transports, with
//! support for feature-gated inclusion and dynamic help text generation.

use nandtool_core::transport::{NandTransport, TransportInfo};

/// Get information about all available programmers (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_programmers() -> Vec<TransportInfo> {
    let mut programmers = Vec::new();

    #[cfg(feature = "ftdi")]
    programmers.push(nandtool_ftdi::TRANSPORT_INFO);

    #[cfg(feature = "dummy")]
    programmers.push(nandtool_dummy::TRANSPORT_INFO);

    programmers
}

/// Generate help text listing all available programmers
pub fn programmer_help() -> String {
    let programmers = available_programmers();

    if programmers.is_empty() {
        return "No programmers available (recompile with programmer features enabled)".to_string();
    }

    let mut help = String::from("Available programmers:\n");
    for p in &programmers {
        help.push_str(&format!("  {:8} - {}\n", p.name, p.description));
    }
    help
}

/// Resolve a name or alias to the canonical programmer name
pub fn find_programmer(name: &str) -> Option<&'static str> {
    available_programmers()
        .into_iter()
        .find(|p| p.name == name || p.aliases.iter().any(|a| *a == name))
        .map(|p| p.name)
}

/// Execute a function with the specified programmer
///
/// The programmer string can be just the name (e.g., "ftdi") or include
/// parameters (e.g., "ftdi:usb=0403:6010,slow=1").
#[allow(unused_variables)]
pub fn with_programmer<F>(programmer: &str, f: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&mut dyn NandTransport) -> Result<(), Box<dyn std::error::Error>>,
{
    let (name, options) = parse_programmer_string(programmer);

    let canonical_name = match find_programmer(name) {
        Some(n) => n,
        None => return Err(unknown_programmer_error(name)),
    };

    match canonical_name {
        #[cfg(feature = "dummy")]
        "dummy" => {
            use nandtool_dummy::{parse_options, DummyNand};

            let config =
                parse_options(&options).map_err(|e| format!("Invalid dummy parameters: {}", e))?;
            log::info!("Using in-memory NAND emulator");
            let mut transport = DummyNand::new(config);
            f(&mut transport)
        }

        #[cfg(feature = "ftdi")]
        "ftdi" => {
            use nandtool_ftdi::{parse_options, FtdiNand};

            let config =
                parse_options(&options).map_err(|e| format!("Invalid FTDI parameters: {}", e))?;

            let mut transport = FtdiNand::open(&config).map_err(|e| {
                format!(
                    "Failed to open FTDI device: {}\n\
                     Make sure the device is connected and you have permissions.\n\
                     You may need to unbind the kernel ftdi_sio driver:\n\
                     echo -n '<bus>-<port>' | sudo tee /sys/bus/usb/drivers/ftdi_sio/unbind",
                    e
                )
            })?;

            f(&mut transport)
        }

        _ => Err(unknown_programmer_error(name)),
    }
}

/// Parse a programmer string into name and options
///
/// Format: "name" or "name:option1=value1,option2=value2"
pub fn parse_programmer_string(s: &str) -> (&str, Vec<(&str, &str)>) {
    if let Some((name, opts)) = s.split_once(':') {
        let options: Vec<_> = opts
            .split(',')
            .filter_map(|opt| opt.split_once('='))
            .collect();
        (name, options)
    } else {
        (s, Vec::new())
    }
}

fn unknown_programmer_error(name: &str) -> Box<dyn std::error::Error> {
    let mut msg = format!("Unknown programmer: {}\n\n", name);
    msg.push_str(&programmer_help());
    msg.push_str("\nUse 'nandtool list-programmers' for more details");
    msg.into()
}
