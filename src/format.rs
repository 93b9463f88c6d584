/// Lowercase hex with a `0x` prefix, zero-padded to `width` digits.
pub fn hexformat<T: std::fmt::LowerHex>(value: T, width: usize) -> String {
    format!("0x{:0width$x}", value, width = width)
}

#[test]
fn test_hexformat() {
    assert_eq!(hexformat(10, 2), "0x0a");
    assert_eq!(hexformat(0, 4), "0x0000");
    assert_eq!(hexformat(0xabc_u16, 4), "0x0abc");
    assert_eq!(hexformat(0x7_u8, 1), "0x7");
}

#[test]
fn test_hexformat_wider_than_width() {
    // width is a minimum, values are never truncated
    assert_eq!(hexformat(0x1234_usize, 2), "0x1234");
}
