pub mod disassembler;
pub mod errors;
pub mod format;
pub mod instructions;
pub mod listing;
pub mod memory;
pub mod wasm;

pub use disassembler::{disassemble, disassemble_with, read_word, DecodedLine, ScanConfig};
pub use format::hexformat;
pub use instructions::{Instruction, UNKNOWN_MARKER};
pub use listing::Listing;
pub use memory::MemoryImage;
