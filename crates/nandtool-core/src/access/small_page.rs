//! Small-page (512 + 16 byte) access
//!
//! The column address is a single byte, so the page is split into three
//! areas selected by a pointer command before the address: READ0 for main
//! bytes 0-255, READ1 for main bytes 256-511 and READOOB for the spare area.
//! Callers use logical columns (0 for main, `page_size` for spare) and the
//! pointer plus residual column byte is derived from that.

use super::{program_payload, PageLayout};
use crate::error::{Error, Result};
use crate::nand::opcodes;
use crate::protocol;
use crate::transport::{NandTransport, ReadyWait};

/// Area pointer command and residual column for a logical column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmallPagePointer {
    /// READ0, READ1 or READOOB
    pub opcode: u8,
    /// Column within the selected area
    pub column: u8,
}

impl SmallPagePointer {
    /// Map a logical column to the area pointer addressing it
    pub fn for_column(column: u32, page_size: u32) -> Result<Self> {
        let (opcode, residual) = if column >= page_size {
            (opcodes::READOOB, column - page_size)
        } else if column >= opcodes::SMALL_PAGE_HALF {
            (opcodes::READ1, column - opcodes::SMALL_PAGE_HALF)
        } else {
            (opcodes::READ0, column)
        };
        let column = u8::try_from(residual).map_err(|_| Error::AddressOutOfBounds)?;
        Ok(Self { opcode, column })
    }
}

/// Small-page access strategy
#[derive(Debug, Clone)]
pub struct SmallPage {
    layout: PageLayout,
    wait: ReadyWait,
}

impl SmallPage {
    /// Create a strategy for the given layout
    pub fn new(layout: PageLayout, wait: ReadyWait) -> Self {
        Self { layout, wait }
    }

    /// Layout of the chip
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Point at `column`, send the page address and stream `buf.len()` bytes
    fn read_at<T: NandTransport + ?Sized>(
        &self,
        transport: &mut T,
        page: u32,
        column: u32,
        buf: &mut [u8],
    ) -> Result<usize> {
        let pointer = SmallPagePointer::for_column(column, self.layout.page_size)?;
        let address = self.layout.address(pointer.column as u16, page, 1)?;

        log::trace!(
            "small page read: page {} pointer 0x{:02X} column {} len {}",
            page,
            pointer.opcode,
            pointer.column,
            buf.len()
        );

        transport.send_command(pointer.opcode)?;
        transport.send_address(address.as_slice())?;
        transport.wait_ready(&self.wait)?;
        protocol::read_exact(transport, buf)?;
        Ok(buf.len())
    }

    /// Read up to `page_size` main bytes from column 0
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
        self.read_at(transport, page, 0, &mut buf[..len])
    }

    /// Read up to `oob_size` spare bytes from logical column `page_size`
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
        self.read_at(transport, page, self.layout.page_size, &mut buf[..len])
    }

    /// Read main bytes, then spare bytes appended behind them
    pub fn read_both<T: NandTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        page: u32,
        buf: &mut [u8],
    ) -> Result<usize> {
        let main = self.read_main(transport, page, buf)?;
        let oob = self.read_oob(transport, page, &mut buf[main..])?;
        Ok(main + oob)
    }

    /// Program main and spare bytes of one page
    pub fn write_page<T: NandTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        page: u32,
        data: &[u8],
    ) -> Result<usize> {
        let payload = program_payload(&self.layout, data)?;
        let address = self.layout.address(0, page, 1)?;

        log::trace!("small page program: page {} len {}", page, payload.len());

        // The pointer decides where SEQIN data lands; start at area A
        transport.send_command(opcodes::READ0)?;
        protocol::program(transport, &address, payload, page, &self.wait)?;
        Ok(payload.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Op, ScriptedTransport};
    use alloc::vec;

    fn strategy() -> SmallPage {
        SmallPage::new(
            PageLayout {
                page_size: 512,
                oob_size: 16,
                address_cycles: 3,
            },
            ReadyWait::default(),
        )
    }

    #[test]
    fn test_pointer_mapping() {
        let p = SmallPagePointer::for_column(0, 512).unwrap();
        assert_eq!((p.opcode, p.column), (0x00, 0));
        let p = SmallPagePointer::for_column(255, 512).unwrap();
        assert_eq!((p.opcode, p.column), (0x00, 255));
        let p = SmallPagePointer::for_column(256, 512).unwrap();
        assert_eq!((p.opcode, p.column), (0x01, 0));
        let p = SmallPagePointer::for_column(300, 512).unwrap();
        assert_eq!((p.opcode, p.column), (0x01, 44));
        let p = SmallPagePointer::for_column(512, 512).unwrap();
        assert_eq!((p.opcode, p.column), (0x50, 0));
        let p = SmallPagePointer::for_column(520, 512).unwrap();
        assert_eq!((p.opcode, p.column), (0x50, 8));
    }

    #[test]
    fn test_read_main_requests_page_size_at_column_zero() {
        let mut t = ScriptedTransport::new();
        let mut buf = vec![0u8; 4096];
        let n = strategy().read_main(&mut t, 9, &mut buf).unwrap();

        assert_eq!(n, 512);
        assert_eq!(
            t.bus_ops(),
            vec![
                Op::Command(0x00),
                Op::Address(vec![0x00, 0x09, 0x00]),
                Op::Read(512),
            ]
        );
    }

    #[test]
    fn test_read_oob_uses_logical_column_page_size() {
        let mut t = ScriptedTransport::new();
        let mut buf = vec![0u8; 64];
        let n = strategy().read_oob(&mut t, 5, &mut buf).unwrap();

        assert_eq!(n, 16);
        assert_eq!(
            t.bus_ops(),
            vec![
                Op::Command(0x50),
                Op::Address(vec![0x00, 0x05, 0x00]),
                Op::Read(16),
            ]
        );
    }

    #[test]
    fn test_read_waits_for_ready_after_address() {
        let mut t = ScriptedTransport::new();
        let mut buf = [0u8; 16];
        strategy().read_oob(&mut t, 0, &mut buf).unwrap();
        assert_eq!(t.ops[2], Op::Poll);
        assert_eq!(t.ops[3], Op::Read(16));
    }

    #[test]
    fn test_read_both_appends_oob() {
        let mut t = ScriptedTransport::new();
        let mut data = vec![0x11u8; 512];
        data.extend_from_slice(&[0x22u8; 16]);
        t.push_data(&data);

        let mut buf = vec![0u8; 528];
        let n = strategy().read_both(&mut t, 1, &mut buf).unwrap();
        assert_eq!(n, 528);
        assert_eq!(buf, data);
        assert_eq!(t.commands(), vec![0x00, 0x50]);
        assert_eq!(t.reads(), vec![512, 16]);
    }

    #[test]
    fn test_read_honours_short_buffer() {
        let mut t = ScriptedTransport::new();
        let mut buf = [0u8; 100];
        assert_eq!(strategy().read_main(&mut t, 0, &mut buf).unwrap(), 100);
        assert_eq!(t.reads(), vec![100]);

        let mut empty = [0u8; 0];
        assert_eq!(
            strategy().read_oob(&mut t, 0, &mut empty),
            Err(Error::BufferTooSmall)
        );
    }

    #[test]
    fn test_short_transfer() {
        let mut t = ScriptedTransport::new();
        t.read_limit = Some(200);
        let mut buf = [0u8; 512];
        assert_eq!(
            strategy().read_main(&mut t, 0, &mut buf),
            Err(Error::ShortTransfer {
                requested: 512,
                actual: 200
            })
        );
    }

    #[test]
    fn test_page_out_of_range() {
        let mut t = ScriptedTransport::new();
        let mut buf = [0u8; 512];
        assert_eq!(
            strategy().read_main(&mut t, 0x1_0000, &mut buf),
            Err(Error::AddressOutOfBounds)
        );
        assert!(t.ops.is_empty());
    }

    #[test]
    fn test_write_page_sequence() {
        let mut t = ScriptedTransport::with_data(&[0xE0]);
        let data = vec![0x5Au8; 600];
        let n = strategy().write_page(&mut t, 0x0102, &data).unwrap();

        assert_eq!(n, 528);
        assert_eq!(
            t.bus_ops(),
            vec![
                Op::Command(0x00),
                Op::Command(0x80),
                Op::Address(vec![0x00, 0x02, 0x01]),
                Op::Write(vec![0x5A; 528]),
                Op::Command(0x10),
                Op::Command(0x70),
                Op::Read(1),
            ]
        );
    }

    #[test]
    fn test_write_page_needs_full_payload() {
        let mut t = ScriptedTransport::new();
        assert_eq!(
            strategy().write_page(&mut t, 0, &[0u8; 512]),
            Err(Error::BufferTooSmall)
        );
        assert!(t.ops.is_empty());
    }
}
