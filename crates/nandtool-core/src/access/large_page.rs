//! Large-page access
//!
//! A read loads the whole page (main followed by spare bytes) into the
//! chip's page register; the strategy always streams all of it and hands
//! out the part that was asked for.

use alloc::vec;
use alloc::vec::Vec;

use super::{program_payload, PageLayout};
use crate::error::{Error, Result};
use crate::nand::opcodes;
use crate::protocol;
use crate::transport::{NandTransport, ReadyWait};

/// Large-page access strategy
#[derive(Debug, Clone)]
pub struct LargePage {
    layout: PageLayout,
    wait: ReadyWait,
    scratch: Vec<u8>,
}

impl LargePage {
    /// Create a strategy for the given layout
    pub fn new(layout: PageLayout, wait: ReadyWait) -> Self {
        Self {
            layout,
            wait,
            scratch: vec![0u8; layout.full_page()],
        }
    }

    /// Layout of the chip
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// READ0, address, READSTART, wait, then stream the full page into `buf`
    fn load<T: NandTransport + ?Sized>(
        transport: &mut T,
        layout: &PageLayout,
        wait: &ReadyWait,
        page: u32,
        buf: &mut [u8],
    ) -> Result<()> {
        let address = layout.address(0, page, 2)?;

        log::trace!("large page read: page {} len {}", page, buf.len());

        transport.send_command(opcodes::READ0)?;
        transport.send_address(address.as_slice())?;
        transport.send_command(opcodes::READSTART)?;
        transport.wait_ready(wait)?;
        protocol::read_exact(transport, buf)
    }

    fn load_scratch<T: NandTransport + ?Sized>(&mut self, transport: &mut T, page: u32) -> Result<()> {
        Self::load(transport, &self.layout, &self.wait, page, &mut self.scratch)
    }

    /// Leading `page_size` bytes of the page, at most `buf.len()`
    pub fn read_main<T: NandTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        page: u32,
        buf: &mut [u8],
    ) -> Result<usize> {
        let len = buf.len().min(self.layout.page_size as usize);
        if len == 0 {
            return Err(Error::BufferTooSmall);
        }
        self.load_scratch(transport, page)?;
        buf[..len].copy_from_slice(&self.scratch[..len]);
        Ok(len)
    }

    /// Trailing `oob_size` bytes of the page, at most `buf.len()`
    pub fn read_oob<T: NandTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        page: u32,
        buf: &mut [u8],
    ) -> Result<usize> {
        let len = buf.len().min(self.layout.oob_size as usize);
        if len == 0 {
            return Err(Error::BufferTooSmall);
        }
        self.load_scratch(transport, page)?;
        let start = self.layout.page_size as usize;
        buf[..len].copy_from_slice(&self.scratch[start..start + len]);
        Ok(len)
    }

    /// Main and spare bytes from a single read
    pub fn read_both<T: NandTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        page: u32,
        buf: &mut [u8],
    ) -> Result<usize> {
        let full = self.layout.full_page();
        if buf.len() >= full {
            Self::load(transport, &self.layout, &self.wait, page, &mut buf[..full])?;
            return Ok(full);
        }
        if buf.len() <= self.layout.page_size as usize {
            return Err(Error::BufferTooSmall);
        }
        self.load_scratch(transport, page)?;
        let len = buf.len();
        buf.copy_from_slice(&self.scratch[..len]);
        Ok(len)
    }

    /// Program main and spare bytes of one page
    pub fn write_page<T: NandTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        page: u32,
        data: &[u8],
    ) -> Result<usize> {
        let payload = program_payload(&self.layout, data)?;
        let address = self.layout.address(0, page, 2)?;

        log::trace!("large page program: page {} len {}", page, payload.len());

        protocol::program(transport, &address, payload, page, &self.wait)?;
        Ok(payload.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Op, ScriptedTransport};

    fn layout() -> PageLayout {
        PageLayout {
            page_size: 2048,
            oob_size: 64,
            address_cycles: 5,
        }
    }

    fn page_pattern() -> Vec<u8> {
        (0..2112).map(|i| (i * 7 % 251) as u8).collect()
    }

    #[test]
    fn test_read_both_single_sequence() {
        let mut t = ScriptedTransport::with_data(&page_pattern());
        let mut s = LargePage::new(layout(), ReadyWait::default());
        let mut buf = vec![0u8; 2112];
        let n = s.read_both(&mut t, 0x01_0203, &mut buf).unwrap();

        assert_eq!(n, 2112);
        assert_eq!(buf, page_pattern());
        assert_eq!(
            t.bus_ops(),
            vec![
                Op::Command(0x00),
                Op::Address(vec![0x00, 0x00, 0x03, 0x02, 0x01]),
                Op::Command(0x30),
                Op::Read(2112),
            ]
        );
    }

    #[test]
    fn test_decomposition_law() {
        let mut s = LargePage::new(layout(), ReadyWait::default());

        let mut t = ScriptedTransport::with_data(&page_pattern());
        let mut main = vec![0u8; 2048];
        assert_eq!(s.read_main(&mut t, 3, &mut main).unwrap(), 2048);

        let mut t = ScriptedTransport::with_data(&page_pattern());
        let mut oob = vec![0u8; 64];
        assert_eq!(s.read_oob(&mut t, 3, &mut oob).unwrap(), 64);

        let mut t = ScriptedTransport::with_data(&page_pattern());
        let mut both = vec![0u8; 2112];
        assert_eq!(s.read_both(&mut t, 3, &mut both).unwrap(), 2112);

        main.extend_from_slice(&oob);
        assert_eq!(main, both);
    }

    #[test]
    fn test_oob_read_streams_full_page() {
        let mut t = ScriptedTransport::with_data(&page_pattern());
        let mut s = LargePage::new(layout(), ReadyWait::default());
        let mut oob = [0u8; 16];
        assert_eq!(s.read_oob(&mut t, 0, &mut oob).unwrap(), 16);
        assert_eq!(t.reads(), vec![2112]);
        assert_eq!(&oob[..], &page_pattern()[2048..2064]);
    }

    #[test]
    fn test_short_transfer() {
        let mut t = ScriptedTransport::new();
        t.read_limit = Some(1000);
        let mut s = LargePage::new(layout(), ReadyWait::default());
        let mut buf = vec![0u8; 2112];
        assert_eq!(
            s.read_both(&mut t, 0, &mut buf),
            Err(Error::ShortTransfer {
                requested: 2112,
                actual: 1000
            })
        );
    }

    #[test]
    fn test_write_page_sequence() {
        let mut t = ScriptedTransport::with_data(&[0xE0]);
        let mut s = LargePage::new(layout(), ReadyWait::default());
        let data = page_pattern();
        assert_eq!(s.write_page(&mut t, 64, &data).unwrap(), 2112);
        assert_eq!(
            t.bus_ops(),
            vec![
                Op::Command(0x80),
                Op::Address(vec![0x00, 0x00, 0x40, 0x00, 0x00]),
                Op::Write(data),
                Op::Command(0x10),
                Op::Command(0x70),
                Op::Read(1),
            ]
        );
    }

    #[test]
    fn test_write_page_failure() {
        let mut t = ScriptedTransport::with_data(&[0xC1]);
        let mut s = LargePage::new(layout(), ReadyWait::default());
        assert_eq!(
            s.write_page(&mut t, 12, &page_pattern()),
            Err(Error::ProgramFailed {
                page: 12,
                status: 0xC1
            })
        );
    }
}
