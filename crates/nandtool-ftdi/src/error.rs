//! Error types for the FTDI NAND transport

use thiserror::Error;

/// FTDI transport specific errors
#[derive(Debug, Error)]
pub enum FtdiNandError {
    /// Failed to open the USB device
    #[error("Failed to open FTDI device {vid:04X}:{pid:04X}: {reason}")]
    OpenFailed { vid: u16, pid: u16, reason: String },

    /// Failed to put the device into host-bus mode
    #[error("Failed to configure device: {0}")]
    ConfigFailed(String),

    /// USB transfer failed
    #[error("USB transfer failed: {0}")]
    TransferFailed(String),

    /// The device stopped answering a read
    #[error("Timed out waiting for {expected} bytes (got {received})")]
    ReadTimeout { expected: usize, received: usize },

    /// Invalid channel/port specification
    #[error("Invalid channel '{0}': must be A or B")]
    InvalidChannel(String),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for FTDI transport operations
pub type Result<T> = std::result::Result<T, FtdiNandError>;
