use crate::mapper::{create_mapper, Mapper, MapperError};
use crate::rom::{Mirroring, Rom, RomError};

const CHR_RAM_SIZE: usize = 8 * 1024;

#[derive(Debug, PartialEq, Eq)]
pub enum CartridgeError {
    InvalidHeader,
    Truncated,
    UnsupportedMapper(u8),
}

/// Owns the PRG/CHR stores and the mapper that translates bus addresses into
/// offsets. Construction fails on a bad image, so a `Cartridge` value is
/// always serviceable.
pub struct Cartridge {
    prg: Vec<u8>,
    chr: Vec<u8>,
    mapper: Box<dyn Mapper>,
    mirroring: Mirroring,
}

impl Cartridge {
    pub fn from_bytes(raw: &[u8]) -> Result<Self, CartridgeError> {
        let rom = Rom::from_bytes(raw).map_err(|err| match err {
            RomError::InvalidHeader => CartridgeError::InvalidHeader,
            RomError::Truncated => CartridgeError::Truncated,
        })?;

        let mapper = create_mapper(rom.mapper, rom.prg_banks(), rom.chr_banks()).map_err(
            |err| match err {
                MapperError::UnsupportedMapper(id) => CartridgeError::UnsupportedMapper(id),
            },
        )?;

        let chr = if rom.has_chr_ram {
            vec![0; CHR_RAM_SIZE]
        } else {
            rom.chr_rom
        };

        Ok(Cartridge {
            prg: rom.prg_rom,
            chr,
            mapper,
            mirroring: rom.mirroring,
        })
    }

    pub fn cpu_read(&self, addr: u16) -> Option<u8> {
        self.mapper.cpu_map_read(addr).map(|offset| self.prg[offset])
    }

    pub fn cpu_write(&mut self, addr: u16, data: u8) -> bool {
        match self.mapper.cpu_map_write(addr) {
            Some(offset) => {
                self.prg[offset] = data;
                true
            }
            None => false,
        }
    }

    pub fn ppu_read(&self, addr: u16) -> Option<u8> {
        self.mapper.ppu_map_read(addr).map(|offset| self.chr[offset])
    }

    pub fn ppu_write(&mut self, addr: u16, data: u8) -> bool {
        match self.mapper.ppu_map_write(addr) {
            Some(offset) => {
                self.chr[offset] = data;
                true
            }
            None => false,
        }
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    pub fn reset(&mut self) {
        self.mapper.reset();
    }
}
