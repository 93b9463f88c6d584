// Memory map:
//
// 0x000-0x1FF - reserved for the interpreter, fontset at 0x050-0x09F
// 0x200-0xFFF - program ROM and work RAM

use log::debug;

use crate::errors::LoadError;

pub const RAM_SIZE: usize = 0x1000;
pub const FONT_BASE_ADDR: usize = 0x050;
pub const ROM_BASE_ADDR: usize = 0x200;

pub const CHAR_SPRITES: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// A full 4K address space laid out the way an interpreter would load it.
#[derive(Clone)]
pub struct MemoryImage {
    ram: [u8; RAM_SIZE],
}

impl Default for MemoryImage {
    fn default() -> Self {
        let mut mem = Self { ram: [0; RAM_SIZE] };
        mem.ram[FONT_BASE_ADDR..FONT_BASE_ADDR + CHAR_SPRITES.len()]
            .copy_from_slice(&CHAR_SPRITES);
        mem
    }
}

impl MemoryImage {
    /// Takes a dump of an entire address space as-is.
    pub fn from_raw(bytes: &[u8]) -> Result<Self, LoadError> {
        let ram: [u8; RAM_SIZE] = bytes.try_into().map_err(|_| LoadError::ImageSize {
            len: bytes.len(),
            expected: RAM_SIZE,
        })?;
        Ok(Self { ram })
    }

    pub fn load_rom(&mut self, rom: &[u8], base: usize) -> Result<&mut Self, LoadError> {
        let end = base
            .checked_add(rom.len())
            .filter(|end| *end <= RAM_SIZE)
            .ok_or(LoadError::RomTooLarge {
                len: rom.len(),
                base,
                capacity: RAM_SIZE,
            })?;
        self.ram[base..end].copy_from_slice(rom);
        debug!("loaded {} byte ROM at {:#05x}", rom.len(), base);
        Ok(self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.ram
    }
}

#[test]
fn test_fontset() {
    let mem = MemoryImage::default();
    let bytes = mem.as_bytes();
    assert_eq!(bytes.len(), RAM_SIZE);
    assert_eq!(&bytes[FONT_BASE_ADDR..FONT_BASE_ADDR + 5], &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
    assert_eq!(bytes[FONT_BASE_ADDR - 1], 0);
    assert_eq!(bytes[FONT_BASE_ADDR + CHAR_SPRITES.len()], 0);
}

#[test]
fn test_load_rom() {
    let rom = [0x12, 0x04, 0x00, 0x00, 0x12, 0x00];
    let mut mem = MemoryImage::default();
    assert!(mem.load_rom(&rom, ROM_BASE_ADDR).is_ok());
    assert_eq!(&mem.as_bytes()[0x200..0x206], &rom);
    assert_eq!(mem.as_bytes()[0x206], 0);
}

#[test]
fn test_rom_too_large() {
    let mut mem = MemoryImage::default();
    let rom = vec![0xAA; RAM_SIZE - ROM_BASE_ADDR + 1];
    assert_eq!(
        mem.load_rom(&rom, ROM_BASE_ADDR).err(),
        Some(LoadError::RomTooLarge { len: rom.len(), base: ROM_BASE_ADDR, capacity: RAM_SIZE })
    );
    // a failed load leaves memory untouched
    assert_eq!(mem.as_bytes()[ROM_BASE_ADDR], 0);
    assert!(mem.load_rom(&rom[1..], ROM_BASE_ADDR).is_ok());
    assert_eq!(mem.as_bytes()[RAM_SIZE - 1], 0xAA);
}

#[test]
fn test_from_raw() {
    assert!(MemoryImage::from_raw(&[0; RAM_SIZE]).is_ok());
    assert_eq!(
        MemoryImage::from_raw(&[0; 10]).err().map(|e| e.to_string()),
        Some("memory image must be exactly 0x1000 bytes, got 0xa".to_owned())
    );
}
