use std::fmt;

use log::{debug, trace, warn};

use crate::errors::ConfigError;
use crate::format::hexformat;
use crate::memory::ROM_BASE_ADDR;
use crate::Instruction;

pub(crate) const INSTRUCTION_SIZE: usize = 2;
/// Default distance of the first decoded byte from the load address.
pub const SCAN_OFFSET: usize = 1;

/// Where a linear scan begins and ends.
///
/// The default starts one byte past the ROM load address and runs to the
/// end of whatever buffer it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    pub start: usize,
    /// Exclusive; clamped to the buffer length
    pub end: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            start: ROM_BASE_ADDR + SCAN_OFFSET,
            end: None,
        }
    }
}

impl ScanConfig {
    /// A scan that starts `offset` bytes past `base`.
    pub fn from_base(base: usize, offset: usize) -> Self {
        Self {
            start: base.saturating_add(offset),
            end: None,
        }
    }

    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub fn end(mut self, end: usize) -> Self {
        self.end = Some(end);
        self
    }

    /// The half-open address range this config covers over `len` bytes.
    pub fn range(&self, len: usize) -> std::ops::Range<usize> {
        let end = self.end.map_or(len, |end| end.min(len));
        self.start..end.max(self.start)
    }

    pub fn validate(&self, len: usize) -> Result<(), ConfigError> {
        if self.start >= len {
            return Err(ConfigError::StartOutOfRange {
                start: self.start,
                len,
            });
        }
        if let Some(end) = self.end {
            if end <= self.start {
                return Err(ConfigError::EmptyRange {
                    start: self.start,
                    end,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLine {
    pub addr: usize,
    pub word: u16,
    pub text: String,
}

impl DecodedLine {
    pub fn instruction(&self) -> Instruction {
        self.word.into()
    }
}

impl fmt::Display for DecodedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", hexformat(self.addr, 4), self.text)
    }
}

/// Big-endian word at `addr`. A byte past the end of `memory` reads as zero.
pub fn read_word(memory: &[u8], addr: usize) -> u16 {
    let hi = memory.get(addr).copied().unwrap_or(0);
    let lo = memory.get(addr + 1).copied().unwrap_or(0);
    u16::from_be_bytes([hi, lo])
}

pub fn disassemble(memory: &[u8]) -> Vec<DecodedLine> {
    disassemble_with(memory, &ScanConfig::default())
}

/// Decodes every word in the configured range, one line per
/// `INSTRUCTION_SIZE` step. Code and data are not told apart.
pub fn disassemble_with(memory: &[u8], config: &ScanConfig) -> Vec<DecodedLine> {
    let range = config.range(memory.len());
    if range.is_empty() && config.start >= memory.len() {
        warn!(
            "scan start {} is past the end of a {} byte buffer",
            hexformat(config.start, 4),
            memory.len()
        );
    }

    let lines: Vec<DecodedLine> = range
        .clone()
        .step_by(INSTRUCTION_SIZE)
        .map(|addr| {
            let word = read_word(memory, addr);
            let instr: Instruction = word.into();
            if instr.is_unknown() {
                trace!("{}: unknown word {}", hexformat(addr, 4), hexformat(word, 4));
            }
            DecodedLine {
                addr,
                word,
                text: instr.to_string(),
            }
        })
        .collect();

    debug!(
        "disassembled {}..{} into {} lines",
        hexformat(range.start, 4),
        hexformat(range.end, 4),
        lines.len()
    );
    lines
}

#[cfg(test)]
fn one_word(opcode: u16) -> Vec<u8> {
    let mut memory = vec![0; 0x201];
    memory.extend_from_slice(&opcode.to_be_bytes());
    memory
}

#[test]
fn test_default_scan_range() {
    let memory = [0u8; 0x1000];
    let lines = disassemble(&memory);
    assert_eq!(lines.len(), (0x1000 - 0x201) / 2 + 1);
    assert_eq!(lines.first().map(|l| l.addr), Some(0x201));
    assert_eq!(lines.last().map(|l| l.addr), Some(0xfff));
    assert!(lines.windows(2).all(|w| w[1].addr == w[0].addr + 2));
}

#[test]
fn test_representative_words() {
    for (opcode, expected) in [
        (0x00E0, "CLS"),
        (0x1ABC, "JP 0x0abc"),
        (0x6A05, "LD Va, 0x05"),
        (0x8AB4, "ADD Va, Vb"),
        (0xFA33, "LD B, Va"),
        (0x0123, "-"),
        (0xE000, "-"),
        (0xF000, "-"),
    ] {
        let lines = disassemble(&one_word(opcode));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].addr, 0x201);
        assert_eq!(lines[0].word, opcode);
        assert_eq!(lines[0].text, expected);
    }
}

#[test]
fn test_every_word_yields_one_line() {
    for opcode in 0..=u16::MAX {
        let memory = opcode.to_be_bytes();
        let lines = disassemble_with(&memory, &ScanConfig::default().start(0));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].addr, 0);
        assert_eq!(lines[0].instruction(), Instruction::from(opcode));
    }
}

#[test]
fn test_missing_trailing_byte_reads_as_zero() {
    let mut memory = vec![0u8; 0x1000];
    memory[0xfff] = 0x12;
    let lines = disassemble(&memory);
    let last = lines.last().cloned();
    assert_eq!(last.as_ref().map(|l| l.addr), Some(0xfff));
    assert_eq!(last.as_ref().map(|l| l.word), Some(0x1200));
    assert_eq!(last.map(|l| l.text), Some("JP 0x0200".to_owned()));
}

#[test]
fn test_idempotent() {
    let memory: Vec<u8> = (0..0x1000).map(|i| (i * 7 + 3) as u8).collect();
    assert_eq!(disassemble(&memory), disassemble(&memory));
}

#[test]
fn test_start_past_end_is_empty() {
    assert!(disassemble(&[0x00, 0xe0]).is_empty());
    assert!(disassemble(&[]).is_empty());
}

#[test]
fn test_end_bound() {
    let memory = [0x00, 0xe0, 0x00, 0xee, 0x12, 0x00];
    let config = ScanConfig::default().start(0).end(4);
    let text: Vec<String> = disassemble_with(&memory, &config)
        .into_iter()
        .map(|l| l.to_string())
        .collect();
    assert_eq!(text, vec!["0x0000: CLS", "0x0002: RET"]);

    let past_end = ScanConfig::default().start(4).end(0x100);
    assert_eq!(disassemble_with(&memory, &past_end).len(), 1);
}

#[test]
fn test_validate() {
    assert_eq!(ScanConfig::default().validate(0x1000), Ok(()));
    assert_eq!(
        ScanConfig::default().validate(0x100),
        Err(ConfigError::StartOutOfRange { start: 0x201, len: 0x100 })
    );
    assert_eq!(
        ScanConfig::default().end(0x201).validate(0x1000),
        Err(ConfigError::EmptyRange { start: 0x201, end: 0x201 })
    );
    assert_eq!(ScanConfig::from_base(0x600, 0).start, 0x600);
    let saturated = ScanConfig::from_base(usize::MAX, 1);
    assert_eq!(saturated.start, usize::MAX);
    assert_eq!(
        saturated.validate(0x1000),
        Err(ConfigError::StartOutOfRange { start: usize::MAX, len: 0x1000 })
    );
}
