use wasm_bindgen::prelude::*;

use crate::disassembler::ScanConfig;
use crate::listing::Listing;

/// Disassembly of a host-owned RAM view. The view is only read during
/// construction; nothing borrowed from it outlives the call.
#[wasm_bindgen]
pub struct JsDisassembly {
    listing: Listing,
}

#[wasm_bindgen]
impl JsDisassembly {
    #[wasm_bindgen(constructor)]
    pub fn new(ram: &[u8], start: Option<u32>) -> Self {
        let config = match start {
            Some(start) => ScanConfig::default().start(start as usize),
            None => ScanConfig::default(),
        };
        Self {
            listing: Listing::from_memory(ram, &config),
        }
    }

    pub fn len(&self) -> u32 {
        self.listing.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.listing.is_empty()
    }

    pub fn address(&self, index: u32) -> Option<u32> {
        self.listing
            .lines()
            .get(index as usize)
            .map(|line| line.addr as u32)
    }

    pub fn text(&self, index: u32) -> Option<String> {
        self.listing
            .lines()
            .get(index as usize)
            .map(|line| line.text.clone())
    }

    /// Row to highlight for the interpreter's current program counter.
    pub fn index_of(&self, pc: u32) -> Option<u32> {
        self.listing.position(pc as usize).map(|i| i as u32)
    }

    pub fn render(&self, pc: Option<u32>) -> String {
        self.listing.render(pc.map(|pc| pc as usize))
    }
}

#[test]
fn test_js_disassembly() {
    let mut ram = vec![0u8; 0x1000];
    ram[0x200..0x204].copy_from_slice(&[0x00, 0xe0, 0xa2, 0x2a]);

    let listing = JsDisassembly::new(&ram, Some(0x200));
    assert_eq!(listing.len(), 0xe00 / 2);
    assert_eq!(listing.address(1), Some(0x202));
    assert_eq!(listing.text(0).as_deref(), Some("CLS"));
    assert_eq!(listing.text(1).as_deref(), Some("LD I, 0x022a"));
    assert_eq!(listing.text(0x1000), None);
    assert_eq!(listing.index_of(0x202), Some(1));
    assert_eq!(listing.index_of(0x203), None);
    assert!(listing.render(Some(0x200)).starts_with(">> 0x0200: CLS\n   0x0202: LD I, 0x022a"));

    let default_start = JsDisassembly::new(&ram, None);
    assert_eq!(default_start.address(0), Some(0x201));
    assert!(!default_start.is_empty());
}
