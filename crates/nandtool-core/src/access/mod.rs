//! Page access strategies
//!
//! Small-page (512 byte) and large-page dies address their main and spare
//! areas differently. [`PageAccess`] hides that difference behind one set of
//! operations; the variant is chosen once from the resolved identity.
//!
//! Strategies never hold on to the transport. It is lent to each call.

mod large_page;
mod small_page;

pub use large_page::LargePage;
pub use small_page::{SmallPage, SmallPagePointer};

use crate::chip::ResolvedIdentity;
use crate::error::{Error, Result};
use crate::nand::{AddressCycles, MAX_ADDRESS_CYCLES};
use crate::transport::{NandTransport, ReadyWait};

/// Geometry a strategy needs to build addresses and size transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    /// Main area bytes per page
    pub page_size: u32,
    /// Spare area bytes per page
    pub oob_size: u32,
    /// Total address cycles
    pub address_cycles: u8,
}

impl PageLayout {
    /// Take the layout from an identity
    pub fn from_identity(identity: &ResolvedIdentity) -> Result<Self> {
        if !identity.is_identified() {
            return Err(Error::DeviceNotIdentified);
        }
        let column_cycles = if identity.large_page { 2 } else { 1 };
        if identity.address_cycles as usize > MAX_ADDRESS_CYCLES
            || identity.address_cycles <= column_cycles
        {
            return Err(Error::InvalidGeometry);
        }
        Ok(Self {
            page_size: identity.page_size,
            oob_size: identity.oob_size,
            address_cycles: identity.address_cycles,
        })
    }

    /// Main plus spare bytes
    pub fn full_page(&self) -> usize {
        (self.page_size + self.oob_size) as usize
    }

    pub(crate) fn address(&self, column: u16, page: u32, column_cycles: u8) -> Result<AddressCycles> {
        AddressCycles::encode(column, page, column_cycles, self.address_cycles)
    }
}

/// Page access strategy for one addressing family
#[derive(Debug, Clone)]
pub enum PageAccess {
    /// 512-byte pages with READ0/READ1/READOOB area pointers
    SmallPage(SmallPage),
    /// Larger pages read as one main+spare stream (READ0 + READSTART)
    LargePage(LargePage),
}

impl PageAccess {
    /// Select the strategy for an identified chip
    pub fn for_identity(identity: &ResolvedIdentity, wait: ReadyWait) -> Result<Self> {
        let layout = PageLayout::from_identity(identity)?;
        Ok(if identity.large_page {
            log::debug!("Using large-page access ({} address cycles)", layout.address_cycles);
            PageAccess::LargePage(LargePage::new(layout, wait))
        } else {
            log::debug!("Using small-page access ({} address cycles)", layout.address_cycles);
            PageAccess::SmallPage(SmallPage::new(layout, wait))
        })
    }

    /// Layout this strategy was built for
    pub fn layout(&self) -> &PageLayout {
        match self {
            PageAccess::SmallPage(s) => s.layout(),
            PageAccess::LargePage(l) => l.layout(),
        }
    }

    /// Read the main area of `page`, at most `buf.len()` bytes
    pub fn read_main<T: NandTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        page: u32,
        buf: &mut [u8],
    ) -> Result<usize> {
        match self {
            PageAccess::SmallPage(s) => s.read_main(transport, page, buf),
            PageAccess::LargePage(l) => l.read_main(transport, page, buf),
        }
    }

    /// Read the spare area of `page`, at most `buf.len()` bytes
    pub fn read_oob<T: NandTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        page: u32,
        buf: &mut [u8],
    ) -> Result<usize> {
        match self {
            PageAccess::SmallPage(s) => s.read_oob(transport, page, buf),
            PageAccess::LargePage(l) => l.read_oob(transport, page, buf),
        }
    }

    /// Read main then spare bytes of `page` into `buf`
    pub fn read_both<T: NandTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        page: u32,
        buf: &mut [u8],
    ) -> Result<usize> {
        match self {
            PageAccess::SmallPage(s) => s.read_both(transport, page, buf),
            PageAccess::LargePage(l) => l.read_both(transport, page, buf),
        }
    }

    /// Program a full page (main followed by spare bytes)
    pub fn write_page<T: NandTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        page: u32,
        data: &[u8],
    ) -> Result<usize> {
        match self {
            PageAccess::SmallPage(s) => s.write_page(transport, page, data),
            PageAccess::LargePage(l) => l.write_page(transport, page, data),
        }
    }
}

/// Check the buffer of a full-page program and return the payload
pub(crate) fn program_payload<'d>(layout: &PageLayout, data: &'d [u8]) -> Result<&'d [u8]> {
    let full = layout.full_page();
    if data.len() < full {
        return Err(Error::BufferTooSmall);
    }
    Ok(&data[..full])
}
