//! Parallel NAND command sequences
//!
//! These are the building blocks shared by identification and both page
//! access strategies. Each function issues a complete sequence and checks
//! the transfer lengths the transport reports.

use crate::error::{Error, Result};
use crate::nand::{opcodes, AddressCycles, Status};
use crate::transport::{NandTransport, ReadyWait};

/// Number of ID bytes fetched by [`read_id`]
pub const MAX_ID_LEN: usize = 8;

/// Reset the chip and wait for it to settle
pub fn reset<T: NandTransport + ?Sized>(transport: &mut T, settle_us: u32) -> Result<()> {
    transport.send_command(opcodes::RESET)?;
    transport.delay_us(settle_us);
    Ok(())
}

/// Read the ID bytes (READ ID with address 0x00)
pub fn read_id<T: NandTransport + ?Sized>(transport: &mut T) -> Result<[u8; MAX_ID_LEN]> {
    let mut id = [0u8; MAX_ID_LEN];
    transport.send_command(opcodes::READID)?;
    transport.send_address(AddressCycles::single(0).as_slice())?;
    read_exact(transport, &mut id)?;
    log::trace!("READ ID: {:02X?}", id);
    Ok(id)
}

/// Read the raw status byte
pub fn read_status<T: NandTransport + ?Sized>(transport: &mut T) -> Result<u8> {
    let mut status = [0u8; 1];
    transport.send_command(opcodes::STATUS)?;
    read_exact(transport, &mut status)?;
    Ok(status[0])
}

/// Read exactly `buf.len()` bytes
pub fn read_exact<T: NandTransport + ?Sized>(transport: &mut T, buf: &mut [u8]) -> Result<()> {
    let actual = transport.read_data(buf)?;
    if actual != buf.len() {
        log::debug!("short read: {} of {} bytes", actual, buf.len());
        return Err(Error::ShortTransfer {
            requested: buf.len(),
            actual,
        });
    }
    Ok(())
}

/// Write exactly `data.len()` bytes
pub fn write_exact<T: NandTransport + ?Sized>(transport: &mut T, data: &[u8]) -> Result<()> {
    let actual = transport.write_data(data)?;
    if actual != data.len() {
        log::debug!("short write: {} of {} bytes", actual, data.len());
        return Err(Error::ShortTransfer {
            requested: data.len(),
            actual,
        });
    }
    Ok(())
}

/// Program one page: SEQIN, address, payload, PAGEPROG, then check status
///
/// `page` is only used to report a failure.
pub fn program<T: NandTransport + ?Sized>(
    transport: &mut T,
    address: &AddressCycles,
    data: &[u8],
    page: u32,
    wait: &ReadyWait,
) -> Result<()> {
    transport.send_command(opcodes::SEQIN)?;
    transport.send_address(address.as_slice())?;
    write_exact(transport, data)?;
    transport.send_command(opcodes::PAGEPROG)?;
    transport.wait_ready(wait)?;

    let status = read_status(transport)?;
    if Status::from_raw(status).is_failed() {
        log::warn!("program of page {} failed, status 0x{:02X}", page, status);
        return Err(Error::ProgramFailed { page, status });
    }
    Ok(())
}
