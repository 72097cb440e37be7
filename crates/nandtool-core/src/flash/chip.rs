//! NAND chip controller

use crate::access::PageAccess;
use crate::chip::{self, ChipOptions, ResolvedIdentity};
use crate::error::{Error, Result};
use crate::transport::NandTransport;

use super::region::Region;

#[cfg(feature = "std")]
use crate::chip::GeometryDatabase;

/// A NAND chip behind a transport
///
/// The chip is identified when the controller is created. The transport
/// stays mutably borrowed for the controller's whole lifetime.
pub struct NandChip<'a, T: NandTransport + ?Sized> {
    transport: &'a mut T,
    identity: ResolvedIdentity,
    access: Option<PageAccess>,
    options: ChipOptions,
}

impl<'a, T: NandTransport + ?Sized> NandChip<'a, T> {
    /// Identify the chip with default options
    pub fn new(transport: &'a mut T) -> Result<Self> {
        Self::with_options(transport, ChipOptions::default())
    }

    /// Identify the chip with the given options
    pub fn with_options(transport: &'a mut T, options: ChipOptions) -> Result<Self> {
        let identity = chip::identify(transport, &options)?;
        Self::from_identity(transport, identity, options)
    }

    /// Identify the chip, preferring geometries from a runtime database
    #[cfg(feature = "std")]
    pub fn with_database(
        transport: &'a mut T,
        options: ChipOptions,
        database: &GeometryDatabase,
    ) -> Result<Self> {
        let identity = chip::identify_with(transport, &options, database)?;
        Self::from_identity(transport, identity, options)
    }

    fn from_identity(
        transport: &'a mut T,
        identity: ResolvedIdentity,
        options: ChipOptions,
    ) -> Result<Self> {
        let access = if identity.is_identified() {
            Some(PageAccess::for_identity(&identity, options.ready)?)
        } else {
            None
        };
        Ok(Self {
            transport,
            identity,
            access,
            options,
        })
    }

    /// Resolved identity of the chip
    pub fn identity(&self) -> &ResolvedIdentity {
        &self.identity
    }

    /// Options the session was opened with
    pub fn options(&self) -> &ChipOptions {
        &self.options
    }

    /// Page access strategy, `None` for an unknown chip
    pub fn access(&self) -> Option<&PageAccess> {
        self.access.as_ref()
    }

    /// Number of pages, `None` for an unknown chip
    pub fn page_count(&self) -> Option<u32> {
        self.identity.page_count()
    }

    /// Bytes one page produces for `region`
    pub fn region_size(&self, region: Region) -> usize {
        self.identity.region_size(region)
    }

    fn check_page(&self, page: u32) -> Result<()> {
        match self.page_count() {
            Some(count) if page < count => Ok(()),
            Some(_) => Err(Error::AddressOutOfBounds),
            None => Err(Error::DeviceNotIdentified),
        }
    }

    /// Read `region` of `page` into `buf`
    ///
    /// Reads at most `buf.len()` bytes and returns how many were produced.
    /// For [`Region::BOTH`] the spare bytes follow the main bytes.
    pub fn read_page(&mut self, page: u32, buf: &mut [u8], region: Region) -> Result<usize> {
        if region.is_empty() {
            return Err(Error::InvalidRegion);
        }
        self.check_page(page)?;
        let access = self.access.as_mut().ok_or(Error::DeviceNotIdentified)?;

        if region == Region::BOTH {
            access.read_both(&mut *self.transport, page, buf)
        } else if region == Region::MAIN {
            access.read_main(&mut *self.transport, page, buf)
        } else {
            access.read_oob(&mut *self.transport, page, buf)
        }
    }

    /// Program `page` with main plus spare bytes from `data`
    ///
    /// Only [`Region::BOTH`] is accepted; programming one area alone would
    /// need an erase-block read-modify-write.
    pub fn write_page(&mut self, page: u32, data: &[u8], region: Region) -> Result<usize> {
        if region.is_empty() {
            return Err(Error::InvalidRegion);
        }
        if region != Region::BOTH {
            log::debug!("refusing to program region '{}' alone", region);
            return Err(Error::PartialProgramUnsupported);
        }
        self.check_page(page)?;
        let access = self.access.as_mut().ok_or(Error::DeviceNotIdentified)?;
        access.write_page(&mut *self.transport, page, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flash::count_mismatches;
    use crate::testing::{Op, ScriptedTransport};
    use crate::transport::ReadyWait;
    use alloc::vec;
    use alloc::vec::Vec;

    const SAMSUNG_F1: [u8; 8] = [0xEC, 0xF1, 0x00, 0x95, 0x40, 0x00, 0x00, 0x00];
    const SAMSUNG_75: [u8; 8] = [0xEC, 0x75, 0xA5, 0xBD, 0x00, 0x00, 0x00, 0x00];

    fn identified(id: &[u8; 8]) -> ScriptedTransport {
        ScriptedTransport::with_data(id)
    }

    /// Ops issued after identification
    fn page_ops(t: &ScriptedTransport) -> Vec<Op> {
        t.bus_ops().into_iter().skip(4).collect()
    }

    #[test]
    fn test_large_page_scenario() {
        let mut t = identified(&SAMSUNG_F1);
        let mut chip = NandChip::new(&mut t).unwrap();
        assert_eq!(chip.identity().page_size, 2048);
        assert_eq!(chip.identity().oob_size, 64);
        assert_eq!(chip.identity().chip_size_mb, 128);
        assert_eq!(chip.identity().address_cycles, 5);
        assert!(chip.identity().large_page);
        assert_eq!(chip.page_count(), Some(65536));

        let mut buf = vec![0u8; chip.region_size(Region::BOTH)];
        assert_eq!(chip.read_page(10, &mut buf, Region::BOTH).unwrap(), 2112);
        drop(chip);

        let ops = page_ops(&t);
        let addresses: Vec<_> = ops
            .iter()
            .filter(|op| matches!(op, Op::Address(_)))
            .collect();
        assert_eq!(addresses, vec![&Op::Address(vec![0, 0, 10, 0, 0])]);
        assert_eq!(t.reads().last(), Some(&2112));
    }

    #[test]
    fn test_first_page_read_both_address() {
        let mut t = identified(&SAMSUNG_F1);
        let mut chip = NandChip::new(&mut t).unwrap();
        let mut buf = vec![0u8; 2112];
        assert_eq!(chip.read_page(0, &mut buf, Region::BOTH).unwrap(), 2112);
        drop(chip);

        // READ ID address, then the all-zero five-cycle page address
        assert_eq!(t.addresses(), vec![vec![0], vec![0, 0, 0, 0, 0]]);
        assert_eq!(page_ops(&t)[0], Op::Command(0x00));
        assert_eq!(page_ops(&t)[2], Op::Command(0x30));
    }

    #[test]
    fn test_write_page_sends_whole_payload() {
        let mut t = identified(&SAMSUNG_F1);
        // status after PAGEPROG: ready, not protected, passed
        t.push_data(&[0xC0]);
        let data: Vec<u8> = (0..2112).map(|i| (i % 251) as u8).collect();

        let mut chip = NandChip::new(&mut t).unwrap();
        assert_eq!(chip.write_page(3, &data, Region::BOTH).unwrap(), 2112);
        drop(chip);

        assert_eq!(t.writes(), vec![data]);
        assert_eq!(t.addresses().last(), Some(&vec![0, 0, 3, 0, 0]));
        assert_eq!(&t.commands()[2..], &[0x80, 0x10, 0x70]);
    }

    #[test]
    fn test_transport_error_propagates() {
        let mut t = identified(&SAMSUNG_F1);
        let mut chip = NandChip::new(&mut t).unwrap();
        chip.transport.broken = true;

        let mut buf = vec![0u8; 2112];
        assert_eq!(
            chip.read_page(0, &mut buf, Region::BOTH),
            Err(Error::TransportError)
        );
        assert_eq!(
            chip.write_page(0, &buf, Region::BOTH),
            Err(Error::TransportError)
        );
        drop(chip);
        assert!(page_ops(&t).is_empty());
    }

    #[test]
    fn test_small_page_scenario_oob_column() {
        let mut t = identified(&SAMSUNG_75);
        let mut chip = NandChip::new(&mut t).unwrap();
        assert!(!chip.identity().large_page);
        assert_eq!(chip.identity().address_cycles, 3);

        let mut buf = [0u8; 16];
        assert_eq!(chip.read_page(5, &mut buf, Region::OOB).unwrap(), 16);
        drop(chip);

        // logical column 512 is the spare area pointer with residual 0
        assert_eq!(
            page_ops(&t),
            vec![
                Op::Command(0x50),
                Op::Address(vec![0x00, 0x05, 0x00]),
                Op::Read(16),
            ]
        );
    }

    #[test]
    fn test_small_page_read_both() {
        let mut t = identified(&SAMSUNG_75);
        let mut chip = NandChip::new(&mut t).unwrap();
        let mut buf = vec![0u8; 528];
        assert_eq!(chip.read_page(0, &mut buf, Region::BOTH).unwrap(), 528);
        drop(chip);
        assert_eq!(t.reads(), vec![8, 512, 16]);
    }

    #[test]
    fn test_partial_write_issues_no_io() {
        for region in [Region::MAIN, Region::OOB] {
            let mut t = identified(&SAMSUNG_F1);
            let mut chip = NandChip::new(&mut t).unwrap();
            let data = vec![0u8; 2112];
            assert_eq!(
                chip.write_page(0, &data, region),
                Err(Error::PartialProgramUnsupported)
            );
            drop(chip);
            assert!(page_ops(&t).is_empty());
        }
    }

    #[test]
    fn test_empty_region() {
        let mut t = identified(&SAMSUNG_F1);
        let mut chip = NandChip::new(&mut t).unwrap();
        let mut buf = [0u8; 16];
        assert_eq!(
            chip.read_page(0, &mut buf, Region::empty()),
            Err(Error::InvalidRegion)
        );
        assert_eq!(
            chip.write_page(0, &buf, Region::empty()),
            Err(Error::InvalidRegion)
        );
    }

    #[test]
    fn test_unknown_chip() {
        let mut t = identified(&[0xEC, 0x00, 0, 0, 0, 0, 0, 0]);
        let mut chip = NandChip::new(&mut t).unwrap();
        assert!(!chip.identity().is_identified());
        assert!(chip.access().is_none());
        let mut buf = [0u8; 16];
        assert_eq!(
            chip.read_page(0, &mut buf, Region::MAIN),
            Err(Error::DeviceNotIdentified)
        );
        assert_eq!(
            chip.write_page(0, &[0u8; 16], Region::BOTH),
            Err(Error::DeviceNotIdentified)
        );
    }

    #[test]
    fn test_page_beyond_chip() {
        let mut t = identified(&SAMSUNG_75);
        let mut chip = NandChip::new(&mut t).unwrap();
        let mut buf = [0u8; 512];
        assert_eq!(
            chip.read_page(65536, &mut buf, Region::MAIN),
            Err(Error::AddressOutOfBounds)
        );
    }

    #[test]
    fn test_verify_counts_flipped_oob_byte() {
        let mut page = vec![0x3Cu8; 2048];
        page.extend_from_slice(&[0xFF; 64]);
        let mut reference = page.clone();

        let mut data = SAMSUNG_F1.to_vec();
        data.extend_from_slice(&page);
        data.extend_from_slice(&page);
        let mut t = ScriptedTransport::with_data(&data);
        let mut chip = NandChip::new(&mut t).unwrap();

        let mut main = vec![0u8; 2048];
        chip.read_page(0, &mut main, Region::MAIN).unwrap();
        let mut oob = vec![0u8; 64];
        chip.read_page(0, &mut oob, Region::OOB).unwrap();

        assert_eq!(count_mismatches(&reference[..2048], &main), 0);
        assert_eq!(count_mismatches(&reference[2048..], &oob), 0);

        reference[2048 + 17] ^= 0x01;
        assert_eq!(count_mismatches(&reference[..2048], &main), 0);
        assert_eq!(count_mismatches(&reference[2048..], &oob), 1);
    }

    #[test]
    fn test_bounded_wait_times_out() {
        let mut t = identified(&SAMSUNG_F1);
        let options = ChipOptions {
            ready: ReadyWait::with_timeout_us(50),
            ..ChipOptions::default()
        };
        let mut chip = NandChip::with_options(&mut t, options).unwrap();
        chip.transport.stuck_busy = true;
        let mut buf = vec![0u8; 2112];
        assert_eq!(
            chip.read_page(0, &mut buf, Region::BOTH),
            Err(Error::Timeout)
        );
    }
}
