use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("ROM of {len} bytes does not fit at {base:#05x} (memory is {capacity:#06x} bytes)")]
    RomTooLarge {
        len: usize,
        base: usize,
        capacity: usize,
    },
    #[error("memory image must be exactly {expected:#06x} bytes, got {len:#x}")]
    ImageSize { len: usize, expected: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("scan start {start:#05x} lies past the end of memory ({len:#x} bytes)")]
    StartOutOfRange { start: usize, len: usize },
    #[error("scan range {start:#05x}..{end:#05x} is empty")]
    EmptyRange { start: usize, end: usize },
}
