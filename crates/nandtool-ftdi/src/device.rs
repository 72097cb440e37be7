//! FTDI host-bus device implementation
//!
//! This module provides the `FtdiNand` struct that drives a NAND chip
//! through the FT2232H MCU host-bus emulation mode and implements the
//! `NandTransport` trait.

use std::io::{Read, Write};
use std::time::Duration;

use ftdi::{find_by_vid_pid, BitMode, Device, Interface};
use nandtool_core::error::{Error as CoreError, Result as CoreResult};
use nandtool_core::transport::{NandTransport, TransportInfo};

use crate::error::{FtdiNandError, Result};
use crate::protocol::*;

/// Transport description for programmer listings
pub const TRANSPORT_INFO: TransportInfo = TransportInfo {
    name: "ftdi",
    aliases: &["ft2232h"],
    description: "FT2232H in MCU host-bus mode (vid=,pid=,usb=VID:PID,port=A|B,slow=1)",
};

/// Empty reads tolerated before a read is abandoned
const READ_RETRIES: u32 = 10_000;

/// Configuration for opening an FTDI device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtdiNandConfig {
    /// USB vendor ID
    pub vid: u16,
    /// USB product ID
    pub pid: u16,
    /// Interface/channel to use (A, B)
    pub interface: FtdiInterface,
    /// Run the bus from the 12 MHz clock instead of 60 MHz
    pub slow_clock: bool,
}

impl Default for FtdiNandConfig {
    fn default() -> Self {
        FtdiNandConfig {
            vid: FTDI_VID,
            pid: FTDI_FT2232H_PID,
            interface: FtdiInterface::default(),
            slow_clock: false,
        }
    }
}

impl FtdiNandConfig {
    /// Use a custom USB VID:PID
    pub fn usb_id(mut self, vid: u16, pid: u16) -> Self {
        self.vid = vid;
        self.pid = pid;
        self
    }

    /// Set the interface/channel
    pub fn interface(mut self, interface: FtdiInterface) -> Self {
        self.interface = interface;
        self
    }

    /// Select the slow (12 MHz) bus clock
    pub fn slow_clock(mut self, slow: bool) -> Self {
        self.slow_clock = slow;
        self
    }

    /// Master clock in MHz
    pub fn clock_mhz(&self) -> u32 {
        if self.slow_clock {
            12
        } else {
            60
        }
    }
}

/// FTDI NAND transport
pub struct FtdiNand {
    /// libftdi device handle
    device: Device,
    /// Command buffer reused across bus operations
    cmd: Vec<u8>,
}

impl FtdiNand {
    /// Open an FTDI device with the given configuration
    pub fn open(config: &FtdiNandConfig) -> Result<Self> {
        log::info!(
            "Opening FTDI {:04X}:{:04X} channel {}",
            config.vid,
            config.pid,
            config.interface.letter()
        );

        let interface = match config.interface {
            FtdiInterface::A => Interface::A,
            FtdiInterface::B => Interface::B,
        };

        let mut device = find_by_vid_pid(config.vid, config.pid)
            .interface(interface)
            .open()
            .map_err(|e| FtdiNandError::OpenFailed {
                vid: config.vid,
                pid: config.pid,
                reason: e.to_string(),
            })?;

        device
            .usb_reset()
            .map_err(|e| FtdiNandError::ConfigFailed(format!("USB reset failed: {}", e)))?;

        device
            .set_latency_timer(2)
            .map_err(|e| FtdiNandError::ConfigFailed(format!("Set latency timer failed: {}", e)))?;

        device
            .set_bitmode(0x00, BitMode::Mcu)
            .map_err(|e| FtdiNandError::ConfigFailed(format!("Set MCU mode failed: {}", e)))?;

        let mut ftdi = FtdiNand {
            device,
            cmd: Vec::with_capacity(FTDI_HW_BUFFER_SIZE),
        };

        log::debug!(
            "Setting {} MHz master clock",
            config.clock_mhz()
        );
        ftdi.send(&[clock_setup(config.slow_clock)])?;

        log::info!("FTDI host bus ready at {} MHz", config.clock_mhz());
        Ok(ftdi)
    }

    /// Open the default FT2232H on channel A
    pub fn open_first() -> Result<Self> {
        Self::open(&FtdiNandConfig::default())
    }

    /// Send raw bytes to the FTDI device
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.device
            .write_all(data)
            .map_err(|e| FtdiNandError::TransferFailed(format!("Write failed: {}", e)))?;
        log::trace!("Sent {} bytes", data.len());
        Ok(())
    }

    /// Fill `buf` from the FTDI device
    fn recv(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut total = 0;
        let mut idle = 0;

        while total < buf.len() {
            match self.device.read(&mut buf[total..]) {
                Ok(0) => {
                    idle += 1;
                    if idle > READ_RETRIES {
                        return Err(FtdiNandError::ReadTimeout {
                            expected: buf.len(),
                            received: total,
                        });
                    }
                    std::thread::sleep(Duration::from_micros(100));
                }
                Ok(n) => {
                    total += n;
                    idle = 0;
                }
                Err(e) => {
                    return Err(FtdiNandError::TransferFailed(format!("Read failed: {}", e)));
                }
            }
        }

        log::trace!("Received {} bytes", total);
        Ok(())
    }

    /// Issue write strobes of one cycle kind, chunked to the hardware buffer
    fn bus_write(&mut self, cycle: BusCycle, data: &[u8]) -> Result<()> {
        for chunk in data.chunks(MAX_CHUNK) {
            let mut cmd = std::mem::take(&mut self.cmd);
            cmd.clear();
            push_write_cycles(&mut cmd, cycle, chunk);
            let result = self.send(&cmd);
            self.cmd = cmd;
            result?;
        }
        Ok(())
    }

    /// Issue data read strobes, chunked to the hardware buffer
    fn bus_read(&mut self, buf: &mut [u8]) -> Result<()> {
        for chunk in buf.chunks_mut(MAX_CHUNK) {
            let mut cmd = std::mem::take(&mut self.cmd);
            cmd.clear();
            push_read_cycles(&mut cmd, chunk.len());
            let result = self.send(&cmd);
            self.cmd = cmd;
            result?;
            self.recv(chunk)?;
        }
        Ok(())
    }
}

/// Log a transport failure and hand the core its generic error
fn core_error(e: FtdiNandError) -> CoreError {
    log::error!("FTDI: {}", e);
    CoreError::TransportError
}

impl Drop for FtdiNand {
    fn drop(&mut self) {
        if let Err(e) = self.device.set_bitmode(0x00, BitMode::Reset) {
            log::warn!("Failed to reset bitmode on close: {}", e);
        }
    }
}

impl NandTransport for FtdiNand {
    fn send_command(&mut self, opcode: u8) -> CoreResult<()> {
        self.bus_write(BusCycle::Command, &[opcode])
            .map_err(core_error)
    }

    fn send_address(&mut self, cycles: &[u8]) -> CoreResult<()> {
        self.bus_write(BusCycle::Address, cycles)
            .map_err(core_error)
    }

    fn read_data(&mut self, buf: &mut [u8]) -> CoreResult<usize> {
        self.bus_read(buf).map_err(core_error)?;
        Ok(buf.len())
    }

    fn write_data(&mut self, data: &[u8]) -> CoreResult<usize> {
        self.bus_write(BusCycle::Data, data).map_err(core_error)?;
        Ok(data.len())
    }

    fn is_ready(&mut self) -> CoreResult<bool> {
        self.send(&ready_probe()).map_err(core_error)?;
        let mut response = [0u8; 1];
        self.recv(&mut response).map_err(core_error)?;
        Ok(is_ready(response[0]))
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(us as u64));
    }
}

impl std::fmt::Debug for FtdiNand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FtdiNand").finish_non_exhaustive()
    }
}

fn parse_hex_u16(name: &str, value: &str) -> Result<u16> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u16::from_str_radix(digits, 16)
        .map_err(|_| FtdiNandError::InvalidParameter(format!("Invalid {} '{}'", name, value)))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(FtdiNandError::InvalidParameter(format!(
            "Invalid {} '{}': expected 0 or 1",
            name, value
        ))),
    }
}

/// Parse programmer options
///
/// Format: "vid=<hex>,pid=<hex>,usb=<vid>:<pid>,port=<A|B>,slow=<0|1>"
pub fn parse_options(options: &[(&str, &str)]) -> Result<FtdiNandConfig> {
    let mut config = FtdiNandConfig::default();

    for (key, value) in options {
        match *key {
            "vid" => config.vid = parse_hex_u16("vid", value)?,
            "pid" => config.pid = parse_hex_u16("pid", value)?,
            "usb" => {
                let (vid, pid) = value.split_once(':').ok_or_else(|| {
                    FtdiNandError::InvalidParameter(format!(
                        "Invalid usb id '{}': expected VID:PID",
                        value
                    ))
                })?;
                config = config.usb_id(parse_hex_u16("vid", vid)?, parse_hex_u16("pid", pid)?);
            }
            "port" | "channel" => {
                let mut chars = value.chars();
                let interface = match (chars.next(), chars.next()) {
                    (Some(c), None) => FtdiInterface::from_char(c),
                    _ => None,
                }
                .ok_or_else(|| FtdiNandError::InvalidChannel(value.to_string()))?;
                config = config.interface(interface);
            }
            "slow" => config.slow_clock = parse_bool("slow", value)?,
            _ => {
                log::warn!("Unknown FTDI option: {}={}", key, value);
            }
        }
    }

    Ok(config)
}
