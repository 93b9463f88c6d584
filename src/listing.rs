use std::ops::Range;

use itertools::Itertools;

use crate::disassembler::{disassemble_with, DecodedLine, ScanConfig};

const ELLIPSIS: &str = "...";

/// A decoded program, ordered by address, with the lookups a debugger view
/// needs to follow the program counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    lines: Vec<DecodedLine>,
}

impl Listing {
    pub fn new(lines: Vec<DecodedLine>) -> Self {
        debug_assert!(lines.windows(2).all(|w| w[0].addr < w[1].addr));
        Self { lines }
    }

    pub fn from_memory(memory: &[u8], config: &ScanConfig) -> Self {
        Self::new(disassemble_with(memory, config))
    }

    pub fn lines(&self) -> &[DecodedLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the line decoded at exactly `addr`.
    pub fn position(&self, addr: usize) -> Option<usize> {
        self.lines.binary_search_by_key(&addr, |line| line.addr).ok()
    }

    /// Up to `len` lines, starting `before` lines ahead of the line at or
    /// after `pc`.
    pub fn window(&self, pc: usize, before: usize, len: usize) -> &[DecodedLine] {
        let focus = self.lines.partition_point(|line| line.addr < pc);
        let start = focus.saturating_sub(before).min(self.lines.len());
        let end = start.saturating_add(len).min(self.lines.len());
        &self.lines[start..end]
    }

    pub fn render(&self, pc: Option<usize>) -> String {
        self.lines.iter().map(|line| mark(line, pc)).join("\n")
    }

    /// Like `render`, but a run of more than `threshold` zero words keeps
    /// only its first and last line.
    pub fn render_squeezed(&self, pc: Option<usize>, threshold: usize) -> String {
        let mut dropped = self.zero_runs(pc, threshold).into_iter().peekable();
        let mut out = Vec::with_capacity(self.lines.len());
        let mut i = 0;
        while i < self.lines.len() {
            if let Some(run) = dropped.next_if(|run| run.start == i) {
                out.push(ELLIPSIS.to_owned());
                i = run.end;
                continue;
            }
            out.push(mark(&self.lines[i], pc));
            i += 1;
        }
        out.join("\n")
    }

    // Interior of each run of zero words longer than `threshold`. The
    // line at `pc` always splits a run.
    fn zero_runs(&self, pc: Option<usize>, threshold: usize) -> Vec<Range<usize>> {
        let mut runs = vec![];
        let mut run_start = None;
        for (i, line) in self.lines.iter().enumerate() {
            if line.word == 0 && Some(line.addr) != pc {
                run_start.get_or_insert(i);
            } else if let Some(start) = run_start.take() {
                runs.push(start..i);
            }
        }
        if let Some(start) = run_start {
            runs.push(start..self.lines.len());
        }
        runs.into_iter()
            .filter(|run| run.len() > threshold && run.len() > 2)
            .map(|run| run.start + 1..run.end - 1)
            .collect()
    }
}

fn mark(line: &DecodedLine, pc: Option<usize>) -> String {
    if Some(line.addr) == pc {
        format!(">> {line}")
    } else {
        format!("   {line}")
    }
}

#[cfg(test)]
fn program() -> Listing {
    // CLS; LD V0, 0x02; JP 0x0200; then zeroes
    let mut memory = vec![0x00, 0xe0, 0x60, 0x02, 0x12, 0x00];
    memory.extend_from_slice(&[0; 20]);
    Listing::from_memory(&memory, &ScanConfig::default().start(0))
}

#[test]
fn test_position() {
    let listing = program();
    assert_eq!(listing.len(), 13);
    assert_eq!(listing.position(0), Some(0));
    assert_eq!(listing.position(4), Some(2));
    assert_eq!(listing.position(5), None);
    assert_eq!(listing.position(0x1000), None);
}

#[test]
fn test_window() {
    let listing = program();
    let addrs = |lines: &[DecodedLine]| lines.iter().map(|l| l.addr).collect_vec();
    assert_eq!(addrs(listing.window(8, 2, 4)), vec![4, 6, 8, 10]);
    assert_eq!(addrs(listing.window(0, 3, 2)), vec![0, 2]);
    assert_eq!(addrs(listing.window(22, 1, 8)), vec![20, 22, 24]);
    // an odd pc focuses on the next decoded line
    assert_eq!(addrs(listing.window(3, 0, 1)), vec![4]);
    assert!(listing.window(0x1000, 0, 4).is_empty());
    // everything from one line ahead of pc to the end
    let rest = listing.window(4, 1, usize::MAX);
    assert_eq!(rest.len(), 12);
    assert_eq!(rest.first().map(|l| l.addr), Some(2));
}

#[test]
fn test_render_marks_pc() {
    let listing = program();
    let text = listing.render(Some(2));
    let lines = text.lines().collect_vec();
    assert_eq!(lines.len(), 13);
    assert_eq!(lines[0], "   0x0000: CLS");
    assert_eq!(lines[1], ">> 0x0002: LD V0, 0x02");
    assert_eq!(lines[2], "   0x0004: JP 0x0200");
    assert_eq!(lines[3], "   0x0006: -");
}

#[test]
fn test_render_squeezed() {
    let listing = program();
    let text = listing.render_squeezed(None, 4);
    assert_eq!(
        text.lines().collect_vec(),
        vec![
            "   0x0000: CLS",
            "   0x0002: LD V0, 0x02",
            "   0x0004: JP 0x0200",
            "   0x0006: -",
            "...",
            "   0x0018: -",
        ]
    );
    // short runs are left alone
    assert_eq!(listing.render_squeezed(None, 20), listing.render(None));
}

#[test]
fn test_render_squeezed_keeps_pc() {
    let listing = program();
    let text = listing.render_squeezed(Some(0x0e), 2);
    assert_eq!(
        text.lines().collect_vec(),
        vec![
            "   0x0000: CLS",
            "   0x0002: LD V0, 0x02",
            "   0x0004: JP 0x0200",
            "   0x0006: -",
            "...",
            "   0x000c: -",
            ">> 0x000e: -",
            "   0x0010: -",
            "...",
            "   0x0018: -",
        ]
    );
}
