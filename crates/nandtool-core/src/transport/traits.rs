//! Transport trait definitions

use crate::error::{Error, Result};

/// Ready/busy polling policy
///
/// The default waits without bound, polling every 10 µs. A chip that never
/// leaves the busy state will then block the caller forever; set
/// `timeout_us` to turn that into [`Error::Timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyWait {
    /// Delay between two samples of the ready/busy line
    pub poll_interval_us: u32,
    /// Give up after this many microseconds (`None` = wait forever)
    pub timeout_us: Option<u32>,
}

impl Default for ReadyWait {
    fn default() -> Self {
        Self {
            poll_interval_us: 10,
            timeout_us: None,
        }
    }
}

impl ReadyWait {
    /// Unbounded wait with the default poll interval
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Bounded wait
    pub fn with_timeout_us(timeout_us: u32) -> Self {
        Self {
            timeout_us: Some(timeout_us),
            ..Self::default()
        }
    }
}

/// NAND transport trait
///
/// This trait represents a physical link that can latch commands and
/// addresses into a NAND chip and move data bytes to and from it. All
/// operations are blocking. A transport is driven by exactly one
/// [`NandChip`](crate::flash::NandChip) at a time.
///
/// ## Example: a transport over some bus driver
///
/// ```ignore
/// impl NandTransport for MyLink {
///     fn send_command(&mut self, opcode: u8) -> Result<()> {
///         self.bus.write(CLE, &[opcode]).map_err(|_| Error::TransportError)
///     }
///
///     fn send_address(&mut self, cycles: &[u8]) -> Result<()> {
///         self.bus.write(ALE, cycles).map_err(|_| Error::TransportError)
///     }
///     // ...
/// }
/// ```
pub trait NandTransport {
    /// Latch a command byte (CLE high)
    fn send_command(&mut self, opcode: u8) -> Result<()>;

    /// Latch address cycles (ALE high), one byte per cycle, in order
    fn send_address(&mut self, cycles: &[u8]) -> Result<()>;

    /// Read data bytes into `buf`
    ///
    /// Returns the number of bytes actually read. A value smaller than
    /// `buf.len()` is reported by the callers as a short transfer.
    fn read_data(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write data bytes
    ///
    /// Returns the number of bytes actually written.
    fn write_data(&mut self, data: &[u8]) -> Result<usize>;

    /// Sample the ready/busy line
    fn is_ready(&mut self) -> Result<bool>;

    /// Delay for the specified number of microseconds
    fn delay_us(&mut self, us: u32);

    /// Wait until the ready/busy line signals ready
    ///
    /// The default implementation polls [`is_ready`](Self::is_ready)
    /// according to `wait`.
    fn wait_ready(&mut self, wait: &ReadyWait) -> Result<()> {
        let mut waited_us: u64 = 0;
        loop {
            if self.is_ready()? {
                return Ok(());
            }
            if let Some(timeout) = wait.timeout_us {
                if waited_us >= timeout as u64 {
                    return Err(Error::Timeout);
                }
            }
            if wait.poll_interval_us > 0 {
                self.delay_us(wait.poll_interval_us);
            }
            // A zero interval still has to make progress towards the timeout
            waited_us += wait.poll_interval_us.max(1) as u64;
        }
    }
}

impl<T: NandTransport + ?Sized> NandTransport for &mut T {
    fn send_command(&mut self, opcode: u8) -> Result<()> {
        (**self).send_command(opcode)
    }

    fn send_address(&mut self, cycles: &[u8]) -> Result<()> {
        (**self).send_address(cycles)
    }

    fn read_data(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read_data(buf)
    }

    fn write_data(&mut self, data: &[u8]) -> Result<usize> {
        (**self).write_data(data)
    }

    fn is_ready(&mut self) -> Result<bool> {
        (**self).is_ready()
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }

    fn wait_ready(&mut self, wait: &ReadyWait) -> Result<()> {
        (**self).wait_ready(wait)
    }
}

// Boxed transports are what the CLI hands around
impl NandTransport for alloc::boxed::Box<dyn NandTransport + Send> {
    fn send_command(&mut self, opcode: u8) -> Result<()> {
        (**self).send_command(opcode)
    }

    fn send_address(&mut self, cycles: &[u8]) -> Result<()> {
        (**self).send_address(cycles)
    }

    fn read_data(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read_data(buf)
    }

    fn write_data(&mut self, data: &[u8]) -> Result<usize> {
        (**self).write_data(data)
    }

    fn is_ready(&mut self) -> Result<bool> {
        (**self).is_ready()
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }

    fn wait_ready(&mut self, wait: &ReadyWait) -> Result<()> {
        (**self).wait_ready(wait)
    }
}

/// Information about a transport
#[derive(Debug, Clone)]
pub struct TransportInfo {
    /// Name of the transport
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Description
    pub description: &'static str,
}
