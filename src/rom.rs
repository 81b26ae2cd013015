const INES_HEADER_SIZE: usize = 16;
const INES_TRAINER_SIZE: usize = 512;
const PRG_ROM_PAGE_SIZE: usize = 16 * 1024;
const CHR_ROM_PAGE_SIZE: usize = 8 * 1024;
const INES_MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RomError {
    InvalidHeader,
    Truncated,
}

/// A parsed iNES image. Mapper support is decided later, at cartridge
/// construction; parsing accepts any mapper ID the header declares.
#[derive(Debug, PartialEq, Eq)]
pub struct Rom {
    pub prg_rom: Vec<u8>,
    pub chr_rom: Vec<u8>,
    pub mapper: u8,
    pub mirroring: Mirroring,
    pub has_chr_ram: bool,
}

impl Rom {
    pub fn from_bytes(raw: &[u8]) -> Result<Self, RomError> {
        if raw.len() < INES_HEADER_SIZE {
            return Err(RomError::Truncated);
        }

        if raw[0..4] != INES_MAGIC {
            return Err(RomError::InvalidHeader);
        }

        let prg_rom_banks = raw[4] as usize;
        let chr_rom_banks = raw[5] as usize;
        let flags6 = raw[6];
        let flags7 = raw[7];
        let mapper = (flags6 >> 4) | (flags7 & 0xF0);

        // A board with no PRG store has nothing to execute from; the header
        // is malformed.
        if prg_rom_banks == 0 {
            return Err(RomError::InvalidHeader);
        }

        let trainer_present = flags6 & 0b0000_0100 != 0;
        let mirroring = if flags6 & 0b0000_1000 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0b0000_0001 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        let mut cursor = INES_HEADER_SIZE;
        if trainer_present {
            cursor += INES_TRAINER_SIZE;
        }

        let prg_size = prg_rom_banks * PRG_ROM_PAGE_SIZE;
        let chr_size = chr_rom_banks * CHR_ROM_PAGE_SIZE;
        let required_size = cursor + prg_size + chr_size;
        if raw.len() < required_size {
            return Err(RomError::Truncated);
        }

        let prg_rom = raw[cursor..cursor + prg_size].to_vec();
        cursor += prg_size;
        let chr_rom = raw[cursor..cursor + chr_size].to_vec();

        Ok(Rom {
            prg_rom,
            chr_rom,
            mapper,
            mirroring,
            // Zero CHR banks means the board carries 8 KiB of CHR-RAM.
            has_chr_ram: chr_rom_banks == 0,
        })
    }

    pub fn prg_banks(&self) -> u8 {
        (self.prg_rom.len() / PRG_ROM_PAGE_SIZE) as u8
    }

    pub fn chr_banks(&self) -> u8 {
        (self.chr_rom.len() / CHR_ROM_PAGE_SIZE) as u8
    }
}
