use crate::format::hexformat;

type Addr = u16;
type Reg = u8;

/// Rendered in place of a mnemonic when a word matches no opcode.
pub const UNKNOWN_MARKER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// CLS
    /// 0x00e0
    /// Clear screen
    ClearScreen,
    /// RET
    /// 0x00ee
    Ret,
    /// Any word that isn't a valid instruction, including 0nnn
    Unknown(u16),
    /// JP nnn
    /// 0x1NNN
    Jump(Addr),
    /// CALL nnn
    /// 0x2NNN
    Call(Addr),
    /// SE Vx, kk
    /// 0x3XNN
    /// Skip next instruction if *Vx == kk
    SkipEqImm(Reg, u8),
    /// SNE Vx, kk
    /// 0x4XNN
    SkipNeImm(Reg, u8),
    /// SE Vx, Vy
    /// 0x5XY_
    SkipEqReg(Reg, Reg),
    /// LD Vx, kk
    /// 0x6XNN
    SetImm(Reg, u8),
    /// ADD Vx, kk
    /// 0x7XNN
    AddImm(Reg, u8),
    /// LD Vx, Vy
    /// 0x8XY0
    SetReg(Reg, Reg),
    /// OR Vx, Vy
    /// 0x8XY1
    OrReg(Reg, Reg),
    /// AND Vx, Vy
    /// 0x8XY2
    AndReg(Reg, Reg),
    /// XOR Vx, Vy
    /// 0x8XY3
    XorReg(Reg, Reg),
    /// ADD Vx, Vy
    /// 0x8XY4
    AddReg(Reg, Reg),
    /// SUB Vx, Vy
    /// 0x8XY5
    SubReg(Reg, Reg),
    /// SHR Vx {, Vy}
    /// 0x8XY6
    /// Vy is only read by some interpreters, so it is shown as optional
    Rsh(Reg, Reg),
    /// SUBN Vx, Vy
    /// 0x8XY7
    SubFrom(Reg, Reg),
    /// SHL Vx {, Vy}
    /// 0x8XYE
    Lsh(Reg, Reg),
    /// SNE Vx, Vy
    /// 0x9XY_
    SkipNeReg(Reg, Reg),
    /// LD I, nnn
    /// 0xANNN
    SetMemPtr(Addr),
    /// JP V0, nnn
    /// 0xBNNN
    JumpOffset(Addr),
    /// RND Vx, kk
    /// 0xCXNN
    Rand(Reg, u8),
    /// DRW Vx, kk, n
    /// 0xDXYN
    /// The middle slot renders the whole low byte, not Vy
    Draw(Reg, Reg, u8),
    /// SKP Vx
    /// 0xEX9E
    SkipKeyPressed(Reg),
    /// SKNP Vx
    /// 0xEXA1
    SkipKeyNotPressed(Reg),
    /// LD Vx, DT
    /// 0xFX07
    GetDelay(Reg),
    /// LD Vx, K
    /// 0xFX0A
    WaitForKey(Reg),
    /// LD DT, Vx
    /// 0xFX15
    SetDelay(Reg),
    /// LD ST, Vx
    /// 0xFX18
    SetSound(Reg),
    /// ADD I, Vx
    /// 0xFX1E
    AddMemPtr(Reg),
    /// LD F, Vx
    /// 0xFX29
    SetChar(Reg),
    /// LD B, Vx
    /// 0xFX33
    BCD(Reg),
    /// LD [I], Vx
    /// 0xFX55
    RegDump(Reg),
    /// LD Vx, [I]
    /// 0xFX65
    RegLoad(Reg),
}

impl Instruction {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Instruction::Unknown(_))
    }
}

// First register argument
macro_rules! X {
    ($opcode: expr) => {
        (($opcode & 0x0F00) >> 8) as u8
    };
}

// Second register argument
macro_rules! Y {
    ($opcode: expr) => {
        (($opcode & 0x00F0) >> 4) as u8
    };
}

// 4-bit immediate
macro_rules! N {
    ($opcode: expr) => {
        ($opcode & 0x000F) as u8
    };
}

// 8-bit immediate
macro_rules! NN {
    ($opcode: expr) => {
        ($opcode & 0x00FF) as u8
    };
}

// 12-bit immediate
macro_rules! NNN {
    ($opcode: expr) => {
        $opcode & 0x0FFF
    };
}

macro_rules! XNN {
    ($reg: expr, $imm: expr) => {
        ($reg as u16) << 8 | $imm as u16
    };
}

macro_rules! XY {
    ($r1: expr, $r2: expr) => {
        ($r1 as u16) << 8 | (($r2 as u16) << 4)
    };
}

impl From<Instruction> for u16 {
    fn from(value: Instruction) -> Self {
        match value {
            Instruction::Unknown(word) => word,
            Instruction::ClearScreen => 0x00E0,
            Instruction::Ret => 0x00EE,
            Instruction::Jump(v) => 0x1000 | NNN!(v),
            Instruction::Call(v) => 0x2000 | NNN!(v),
            Instruction::SkipEqImm(reg, imm) => 0x3000 | XNN!(reg, imm),
            Instruction::SkipNeImm(reg, imm) => 0x4000 | XNN!(reg, imm),
            Instruction::SkipEqReg(r1, r2) => 0x5000 | XY!(r1, r2),
            Instruction::SetImm(reg, imm) => 0x6000 | XNN!(reg, imm),
            Instruction::AddImm(reg, imm) => 0x7000 | XNN!(reg, imm),
            Instruction::SetReg(r1, r2) => 0x8000 | XY!(r1, r2),
            Instruction::OrReg(r1, r2) => 0x8000 | XY!(r1, r2) | 1,
            Instruction::AndReg(r1, r2) => 0x8000 | XY!(r1, r2) | 2,
            Instruction::XorReg(r1, r2) => 0x8000 | XY!(r1, r2) | 3,
            Instruction::AddReg(r1, r2) => 0x8000 | XY!(r1, r2) | 4,
            Instruction::SubReg(r1, r2) => 0x8000 | XY!(r1, r2) | 5,
            Instruction::Rsh(r1, r2) => 0x8000 | XY!(r1, r2) | 6,
            Instruction::SubFrom(r1, r2) => 0x8000 | XY!(r1, r2) | 7,
            Instruction::Lsh(r1, r2) => 0x8000 | XY!(r1, r2) | 0xe,
            Instruction::SkipNeReg(r1, r2) => 0x9000 | XY!(r1, r2),
            Instruction::SetMemPtr(imm) => 0xA000 | NNN!(imm),
            Instruction::JumpOffset(imm) => 0xB000 | NNN!(imm),
            Instruction::Rand(reg, imm) => 0xC000 | XNN!(reg, imm),
            Instruction::Draw(x, y, n) => 0xD000 | XY!(x, y) | N!(n) as u16,
            Instruction::SkipKeyPressed(reg) => 0xE09E | XY!(reg, 0),
            Instruction::SkipKeyNotPressed(reg) => 0xE0A1 | XY!(reg, 0),
            Instruction::GetDelay(reg) => 0xF007 | XY!(reg, 0),
            Instruction::WaitForKey(reg) => 0xF00A | XY!(reg, 0),
            Instruction::SetDelay(reg) => 0xF015 | XY!(reg, 0),
            Instruction::SetSound(reg) => 0xF018 | XY!(reg, 0),
            Instruction::AddMemPtr(reg) => 0xF01E | XY!(reg, 0),
            Instruction::SetChar(reg) => 0xF029 | XY!(reg, 0),
            Instruction::BCD(reg) => 0xF033 | XY!(reg, 0),
            Instruction::RegDump(reg) => 0xF055 | XY!(reg, 0),
            Instruction::RegLoad(reg) => 0xF065 | XY!(reg, 0),
        }
    }
}

fn addr(v: Addr) -> String {
    hexformat(v, 4)
}

fn byte(v: u8) -> String {
    hexformat(v, 2)
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Instruction::Unknown(_) => f.write_str(UNKNOWN_MARKER),
            Instruction::ClearScreen => write!(f, "CLS"),
            Instruction::Ret => write!(f, "RET"),
            Instruction::Jump(v) => write!(f, "JP {}", addr(v)),
            Instruction::Call(v) => write!(f, "CALL {}", addr(v)),
            Instruction::SkipEqImm(reg, imm) => write!(f, "SE V{reg:x}, {}", byte(imm)),
            Instruction::SkipNeImm(reg, imm) => write!(f, "SNE V{reg:x}, {}", byte(imm)),
            Instruction::SkipEqReg(r1, r2) => write!(f, "SE V{r1:x}, V{r2:x}"),
            Instruction::SetImm(reg, imm) => write!(f, "LD V{reg:x}, {}", byte(imm)),
            Instruction::AddImm(reg, imm) => write!(f, "ADD V{reg:x}, {}", byte(imm)),
            Instruction::SetReg(r1, r2) => write!(f, "LD V{r1:x}, V{r2:x}"),
            Instruction::OrReg(r1, r2) => write!(f, "OR V{r1:x}, V{r2:x}"),
            Instruction::AndReg(r1, r2) => write!(f, "AND V{r1:x}, V{r2:x}"),
            Instruction::XorReg(r1, r2) => write!(f, "XOR V{r1:x}, V{r2:x}"),
            Instruction::AddReg(r1, r2) => write!(f, "ADD V{r1:x}, V{r2:x}"),
            Instruction::SubReg(r1, r2) => write!(f, "SUB V{r1:x}, V{r2:x}"),
            Instruction::Rsh(r1, r2) => write!(f, "SHR V{r1:x} {{, V{r2:x}}}"),
            Instruction::SubFrom(r1, r2) => write!(f, "SUBN V{r1:x}, V{r2:x}"),
            Instruction::Lsh(r1, r2) => write!(f, "SHL V{r1:x} {{, V{r2:x}}}"),
            Instruction::SkipNeReg(r1, r2) => write!(f, "SNE V{r1:x}, V{r2:x}"),
            Instruction::SetMemPtr(imm) => write!(f, "LD I, {}", addr(imm)),
            Instruction::JumpOffset(imm) => write!(f, "JP V0, {}", addr(imm)),
            Instruction::Rand(reg, imm) => write!(f, "RND V{reg:x}, {}", byte(imm)),
            Instruction::Draw(x, y, n) => write!(
                f,
                "DRW V{x:x}, {}, {}",
                byte((y << 4) | (n & 0xf)),
                hexformat(n, 1)
            ),
            Instruction::SkipKeyPressed(reg) => write!(f, "SKP V{reg:x}"),
            Instruction::SkipKeyNotPressed(reg) => write!(f, "SKNP V{reg:x}"),
            Instruction::GetDelay(reg) => write!(f, "LD V{reg:x}, DT"),
            Instruction::WaitForKey(reg) => write!(f, "LD V{reg:x}, K"),
            Instruction::SetDelay(reg) => write!(f, "LD DT, V{reg:x}"),
            Instruction::SetSound(reg) => write!(f, "LD ST, V{reg:x}"),
            Instruction::AddMemPtr(reg) => write!(f, "ADD I, V{reg:x}"),
            Instruction::SetChar(reg) => write!(f, "LD F, V{reg:x}"),
            Instruction::BCD(reg) => write!(f, "LD B, V{reg:x}"),
            Instruction::RegDump(reg) => write!(f, "LD [I], V{reg:x}"),
            Instruction::RegLoad(reg) => write!(f, "LD V{reg:x}, [I]"),
        }
    }
}

impl From<u16> for Instruction {
    fn from(opcode: u16) -> Self {
        match opcode {
            0x00E0 => Self::ClearScreen,
            0x00EE => Self::Ret,
            // 0nnn (SYS addr) is not decoded
            0x0000..=0x0fff => Self::Unknown(opcode),
            0x1000..=0x1fff => Self::Jump(NNN!(opcode)),
            0x2000..=0x2fff => Self::Call(NNN!(opcode)),
            0x3000..=0x3fff => Self::SkipEqImm(X!(opcode), NN!(opcode)),
            0x4000..=0x4fff => Self::SkipNeImm(X!(opcode), NN!(opcode)),
            0x5000..=0x5fff => Self::SkipEqReg(X!(opcode), Y!(opcode)),
            0x6000..=0x6fff => Self::SetImm(X!(opcode), NN!(opcode)),
            0x7000..=0x7fff => Self::AddImm(X!(opcode), NN!(opcode)),
            0x8000..=0x8fff => match opcode & 0x000f {
                0x0000 => Self::SetReg(X!(opcode), Y!(opcode)),
                0x0001 => Self::OrReg(X!(opcode), Y!(opcode)),
                0x0002 => Self::AndReg(X!(opcode), Y!(opcode)),
                0x0003 => Self::XorReg(X!(opcode), Y!(opcode)),
                0x0004 => Self::AddReg(X!(opcode), Y!(opcode)),
                0x0005 => Self::SubReg(X!(opcode), Y!(opcode)),
                0x0006 => Self::Rsh(X!(opcode), Y!(opcode)),
                0x0007 => Self::SubFrom(X!(opcode), Y!(opcode)),
                0x000E => Self::Lsh(X!(opcode), Y!(opcode)),
                _ => Self::Unknown(opcode),
            },
            0x9000..=0x9fff => Self::SkipNeReg(X!(opcode), Y!(opcode)),
            0xA000..=0xAfff => Self::SetMemPtr(NNN!(opcode)),
            0xB000..=0xBfff => Self::JumpOffset(NNN!(opcode)),
            0xC000..=0xCfff => Self::Rand(X!(opcode), NN!(opcode)),
            0xD000..=0xDfff => Self::Draw(X!(opcode), Y!(opcode), N!(opcode)),
            0xE000..=0xEfff => match NN!(opcode) {
                0x9E => Self::SkipKeyPressed(X!(opcode)),
                0xA1 => Self::SkipKeyNotPressed(X!(opcode)),
                _ => Self::Unknown(opcode),
            },
            0xF000..=0xFfff => match NN!(opcode) {
                0x07 => Self::GetDelay(X!(opcode)),
                0x0A => Self::WaitForKey(X!(opcode)),
                0x15 => Self::SetDelay(X!(opcode)),
                0x18 => Self::SetSound(X!(opcode)),
                0x1E => Self::AddMemPtr(X!(opcode)),
                0x29 => Self::SetChar(X!(opcode)),
                0x33 => Self::BCD(X!(opcode)),
                0x55 => Self::RegDump(X!(opcode)),
                0x65 => Self::RegLoad(X!(opcode)),
                _ => Self::Unknown(opcode),
            },
        }
    }
}

#[cfg(test)]
fn mnemonic(opcode: u16) -> String {
    <u16 as Into<Instruction>>::into(opcode).to_string()
}

#[test]
fn test_instructions() {
    assert_eq!(<u16 as Into<Instruction>>::into(0x00E0_u16), Instruction::ClearScreen);
    assert_eq!(<u16 as Into<Instruction>>::into(0x1e35_u16), Instruction::Jump(0xe35));
    assert_eq!(<u16 as Into<Instruction>>::into(0x5e30_u16), Instruction::SkipEqReg(0xe, 0x3));
    assert_eq!(<u16 as Into<Instruction>>::into(0x8126_u16), Instruction::Rsh(0x1, 0x2));
    assert_eq!(<u16 as Into<Instruction>>::into(0xD123_u16), Instruction::Draw(0x1, 0x2, 0x3));
}

#[test]
fn test_mnemonics() {
    assert_eq!(mnemonic(0x00E0), "CLS");
    assert_eq!(mnemonic(0x00EE), "RET");
    assert_eq!(mnemonic(0x1ABC), "JP 0x0abc");
    assert_eq!(mnemonic(0x2ABC), "CALL 0x0abc");
    assert_eq!(mnemonic(0x3A05), "SE Va, 0x05");
    assert_eq!(mnemonic(0x4A05), "SNE Va, 0x05");
    assert_eq!(mnemonic(0x5AB0), "SE Va, Vb");
    assert_eq!(mnemonic(0x6A05), "LD Va, 0x05");
    assert_eq!(mnemonic(0x7AFF), "ADD Va, 0xff");
    assert_eq!(mnemonic(0x8AB0), "LD Va, Vb");
    assert_eq!(mnemonic(0x8AB1), "OR Va, Vb");
    assert_eq!(mnemonic(0x8AB2), "AND Va, Vb");
    assert_eq!(mnemonic(0x8AB3), "XOR Va, Vb");
    assert_eq!(mnemonic(0x8AB4), "ADD Va, Vb");
    assert_eq!(mnemonic(0x8AB5), "SUB Va, Vb");
    assert_eq!(mnemonic(0x8AB6), "SHR Va {, Vb}");
    assert_eq!(mnemonic(0x8AB7), "SUBN Va, Vb");
    assert_eq!(mnemonic(0x8ABE), "SHL Va {, Vb}");
    assert_eq!(mnemonic(0x9AB0), "SNE Va, Vb");
    assert_eq!(mnemonic(0xA123), "LD I, 0x0123");
    assert_eq!(mnemonic(0xB123), "JP V0, 0x0123");
    assert_eq!(mnemonic(0xC30F), "RND V3, 0x0f");
    assert_eq!(mnemonic(0xD123), "DRW V1, 0x23, 0x3");
    assert_eq!(mnemonic(0xE59E), "SKP V5");
    assert_eq!(mnemonic(0xE5A1), "SKNP V5");
    assert_eq!(mnemonic(0xF007), "LD V0, DT");
    assert_eq!(mnemonic(0xF10A), "LD V1, K");
    assert_eq!(mnemonic(0xF215), "LD DT, V2");
    assert_eq!(mnemonic(0xF318), "LD ST, V3");
    assert_eq!(mnemonic(0xF41E), "ADD I, V4");
    assert_eq!(mnemonic(0xF529), "LD F, V5");
    assert_eq!(mnemonic(0xFA33), "LD B, Va");
    assert_eq!(mnemonic(0xFF55), "LD [I], Vf");
    assert_eq!(mnemonic(0xFF65), "LD Vf, [I]");
}

#[test]
fn test_unknown_words() {
    for opcode in [0x0000_u16, 0x0123, 0x0FFF, 0x8AB8, 0x8ABF, 0xE000, 0xE19F, 0xF000, 0xF166] {
        let instr: Instruction = opcode.into();
        assert!(instr.is_unknown(), "{opcode:#06x} decoded as {instr:?}");
        assert_eq!(instr.to_string(), UNKNOWN_MARKER);
    }
}

#[test]
fn test_low_nibble_ignored_for_register_compares() {
    assert_eq!(mnemonic(0x5AB7), "SE Va, Vb");
    assert_eq!(mnemonic(0x9ABF), "SNE Va, Vb");
}

#[test]
fn test_encode() {
    let program: Vec<u16> = [
        Instruction::SetMemPtr(0x050),
        Instruction::SetImm(0, 2),
        Instruction::Draw(0, 1, 5),
        Instruction::Lsh(3, 4),
        Instruction::RegLoad(0xf),
        Instruction::Unknown(0x0123),
    ]
    .into_iter()
    .map(u16::from)
    .collect();
    assert_eq!(program, vec![0xA050, 0x6002, 0xD015, 0x834E, 0xFF65, 0x0123]);
}

#[test]
fn test_decode_is_total() {
    for opcode in 0..=u16::MAX {
        let instr: Instruction = opcode.into();
        assert!(!instr.to_string().is_empty());
    }
}
