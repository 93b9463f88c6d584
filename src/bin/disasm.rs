use std::io::Read;
use std::num::ParseIntError;
use std::process::ExitCode;

use chip8_disasm::disassembler::SCAN_OFFSET;
use chip8_disasm::errors::{ConfigError, LoadError};
use chip8_disasm::{Listing, MemoryImage, ScanConfig};
use clap::Parser;
use clio::ClioPath;
use log::info;
use thiserror::Error;

/// CHIP-8 disassembler
#[derive(Parser)]
struct Args {
    /// ROM (or memory dump with --raw) to disassemble, `-` for stdin
    input: ClioPath,
    /// Input is a full 4K memory image rather than a ROM
    #[arg(long)]
    raw: bool,
    /// Address the ROM is loaded at
    #[arg(long, value_parser = parse_hex, default_value = "0x200")]
    base: usize,
    /// First address to decode, defaults to one byte past the load address
    #[arg(long, value_parser = parse_hex)]
    start: Option<usize>,
    /// Stop decoding before this address
    #[arg(long, value_parser = parse_hex)]
    end: Option<usize>,
    /// Mark the line at this address
    #[arg(long, value_parser = parse_hex)]
    pc: Option<usize>,
    /// Collapse runs of more than N zero words
    #[arg(long, value_name = "N")]
    squeeze: Option<usize>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("could not open {name}: {source}")]
    Open { name: String, source: clio::Error },
    #[error("could not read {name}: {source}")]
    Read {
        name: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn parse_hex(s: &str) -> Result<usize, ParseIntError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    usize::from_str_radix(digits, 16)
}

fn read_input(input: &ClioPath) -> Result<Vec<u8>, CliError> {
    let name = input.as_os_str().to_string_lossy().into_owned();
    let mut reader = input.clone().open().map_err(|source| CliError::Open {
        name: name.clone(),
        source,
    })?;
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| CliError::Read { name, source })?;
    Ok(bytes)
}

fn run(args: &Args) -> Result<String, CliError> {
    let bytes = read_input(&args.input)?;
    render(args, &bytes)
}

fn render(args: &Args, bytes: &[u8]) -> Result<String, CliError> {
    let image = if args.raw {
        MemoryImage::from_raw(bytes)?
    } else {
        let mut image = MemoryImage::default();
        image.load_rom(bytes, args.base)?;
        image
    };

    let mut config = match args.start {
        Some(start) => ScanConfig::default().start(start),
        None => ScanConfig::from_base(args.base, SCAN_OFFSET),
    };
    if let Some(end) = args.end {
        config = config.end(end);
    }
    config.validate(image.as_bytes().len())?;

    let listing = Listing::from_memory(image.as_bytes(), &config);
    info!("{} lines from {} input bytes", listing.len(), bytes.len());
    Ok(match args.squeeze {
        Some(threshold) => listing.render_squeezed(args.pc, threshold),
        None => listing.render(args.pc),
    })
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    match run(&args) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

#[test]
fn test_parse_hex() {
    assert_eq!(parse_hex("0x200"), Ok(0x200));
    assert_eq!(parse_hex("0X2aB"), Ok(0x2ab));
    assert_eq!(parse_hex("fff"), Ok(0xfff));
    assert!(parse_hex("0xzz").is_err());
    assert!(parse_hex("").is_err());
}

#[test]
fn test_args() {
    let args = Args::parse_from(["disasm", "-", "--start", "0x300", "--pc", "302"]);
    assert_eq!(args.base, 0x200);
    assert_eq!(args.start, Some(0x300));
    assert_eq!(args.pc, Some(0x302));
    assert!(!args.raw);
    assert_eq!(args.squeeze, None);
}

#[cfg(test)]
fn args(extra: &[&str]) -> Args {
    Args::parse_from(["disasm", "-"].iter().chain(extra))
}

#[test]
fn test_raw_image_size() {
    let error = render(&args(&["--raw"]), &[0x00, 0xe0]).err();
    assert!(matches!(
        error,
        Some(CliError::Load(LoadError::ImageSize { len: 2, expected: 0x1000 }))
    ));

    let mut image = vec![0u8; 0x1000];
    image[0x201..0x203].copy_from_slice(&[0x00, 0xe0]);
    let text = render(&args(&["--raw", "--end", "0x203"]), &image).ok();
    assert_eq!(text.as_deref(), Some("   0x0201: CLS"));
}

#[test]
fn test_base_sets_default_start() {
    let rom = [0xa2, 0x2a, 0x60, 0x0c];
    let text = render(&args(&["--base", "0x600", "--end", "0x604"]), &rom).ok();
    // one byte past the load address, as with the default base
    assert_eq!(text.as_deref(), Some("   0x0601: CALL 0x0a60\n   0x0603: -"));

    let text = render(&args(&["--base", "0x600", "--start", "0x600", "--end", "0x604"]), &rom).ok();
    assert_eq!(text.as_deref(), Some("   0x0600: LD I, 0x022a\n   0x0602: LD V0, 0x0c"));
}

#[test]
fn test_pc_and_squeeze() {
    let rom = [0x00, 0xe0, 0x12, 0x00];
    let text = render(&args(&["--start", "0x200", "--pc", "0x202", "--squeeze", "4"]), &rom)
        .unwrap_or_default();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "   0x0200: CLS",
            ">> 0x0202: JP 0x0200",
            "   0x0204: -",
            "...",
            "   0x0ffe: -",
        ]
    );
}

#[test]
fn test_config_errors() {
    let rom = [0x00, 0xe0];
    assert!(matches!(
        render(&args(&["--start", "0x1000"]), &rom),
        Err(CliError::Config(ConfigError::StartOutOfRange { start: 0x1000, len: 0x1000 }))
    ));
    assert!(matches!(
        render(&args(&["--start", "0x300", "--end", "0x300"]), &rom),
        Err(CliError::Config(ConfigError::EmptyRange { start: 0x300, end: 0x300 }))
    ));
}
