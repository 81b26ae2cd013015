/// Address translation between bus addresses and offsets into the cartridge
/// stores. `None` means the access is not serviced by the cartridge.
pub trait Mapper {
    fn cpu_map_read(&self, addr: u16) -> Option<usize>;
    fn cpu_map_write(&mut self, addr: u16) -> Option<usize>;
    fn ppu_map_read(&self, addr: u16) -> Option<usize>;
    fn ppu_map_write(&mut self, addr: u16) -> Option<usize>;
    fn reset(&mut self);
}

#[derive(Debug, PartialEq, Eq)]
pub enum MapperError {
    UnsupportedMapper(u8),
}

pub fn create_mapper(
    mapper_id: u8,
    prg_banks: u8,
    chr_banks: u8,
) -> Result<Box<dyn Mapper>, MapperError> {
    match mapper_id {
        0 => Ok(Box::new(NromMapper::new(prg_banks, chr_banks))),
        id => Err(MapperError::UnsupportedMapper(id)),
    }
}

pub struct NromMapper {
    prg_banks: u8,
    chr_banks: u8,
}

impl NromMapper {
    pub fn new(prg_banks: u8, chr_banks: u8) -> Self {
        NromMapper {
            prg_banks,
            chr_banks,
        }
    }
}

impl Mapper for NromMapper {
    fn cpu_map_read(&self, addr: u16) -> Option<usize> {
        if addr < 0x8000 {
            return None;
        }

        // A single 16 KiB bank is mirrored across the 32 KiB window.
        let mask = if self.prg_banks > 1 { 0x7FFF } else { 0x3FFF };
        Some((addr & mask) as usize)
    }

    fn cpu_map_write(&mut self, _addr: u16) -> Option<usize> {
        // Mask ROM on the PRG side.
        None
    }

    fn ppu_map_read(&self, addr: u16) -> Option<usize> {
        if addr > 0x1FFF {
            return None;
        }
        Some(addr as usize)
    }

    fn ppu_map_write(&mut self, addr: u16) -> Option<usize> {
        if addr > 0x1FFF {
            return None;
        }

        if self.chr_banks == 0 {
            Some(addr as usize)
        } else {
            None
        }
    }

    fn reset(&mut self) {}
}
