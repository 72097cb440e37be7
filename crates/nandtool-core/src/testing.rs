//! Scripted transport for unit tests
//!
//! Records every bus operation and serves read data from a queue, so tests
//! can assert on the exact command/address sequence a routine produced.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::transport::NandTransport;

/// One recorded bus operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Op {
    Command(u8),
    Address(Vec<u8>),
    Read(usize),
    Write(Vec<u8>),
    Poll,
    Delay(u32),
}

#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    pub ops: Vec<Op>,
    /// Bytes served to `read_data`; 0xFF once exhausted
    pub data: VecDeque<u8>,
    /// Cap on bytes returned by a single `read_data`
    pub read_limit: Option<usize>,
    /// Cap on bytes accepted by a single `write_data`
    pub write_limit: Option<usize>,
    /// Number of busy samples before the line reports ready
    pub busy_polls: u32,
    /// Line never reports ready
    pub stuck_busy: bool,
    /// Fail every operation with a transport error
    pub broken: bool,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: &[u8]) -> Self {
        let mut t = Self::new();
        t.push_data(data);
        t
    }

    pub fn push_data(&mut self, data: &[u8]) {
        self.data.extend(data.iter().copied());
    }

    pub fn commands(&self) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Command(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    pub fn addresses(&self) -> Vec<Vec<u8>> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Address(a) => Some(a.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn reads(&self) -> Vec<usize> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Read(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Write(d) => Some(d.clone()),
                _ => None,
            })
            .collect()
    }

    /// Operations with ready polls and delays left out
    pub fn bus_ops(&self) -> Vec<Op> {
        self.ops
            .iter()
            .filter(|op| !matches!(op, Op::Poll | Op::Delay(_)))
            .cloned()
            .collect()
    }

    fn check(&self) -> Result<()> {
        if self.broken {
            Err(Error::TransportError)
        } else {
            Ok(())
        }
    }
}

impl NandTransport for ScriptedTransport {
    fn send_command(&mut self, opcode: u8) -> Result<()> {
        self.check()?;
        self.ops.push(Op::Command(opcode));
        Ok(())
    }

    fn send_address(&mut self, cycles: &[u8]) -> Result<()> {
        self.check()?;
        self.ops.push(Op::Address(cycles.to_vec()));
        Ok(())
    }

    fn read_data(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.check()?;
        let n = self.read_limit.map_or(buf.len(), |l| l.min(buf.len()));
        for b in buf[..n].iter_mut() {
            *b = self.data.pop_front().unwrap_or(0xFF);
        }
        self.ops.push(Op::Read(n));
        Ok(n)
    }

    fn write_data(&mut self, data: &[u8]) -> Result<usize> {
        self.check()?;
        let n = self.write_limit.map_or(data.len(), |l| l.min(data.len()));
        self.ops.push(Op::Write(data[..n].to_vec()));
        Ok(n)
    }

    fn is_ready(&mut self) -> Result<bool> {
        self.check()?;
        self.ops.push(Op::Poll);
        if self.stuck_busy {
            return Ok(false);
        }
        if self.busy_polls > 0 {
            self.busy_polls -= 1;
            return Ok(false);
        }
        Ok(true)
    }

    fn delay_us(&mut self, us: u32) {
        self.ops.push(Op::Delay(us));
    }
}
