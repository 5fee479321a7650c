//! Converting from and to hex strings.

use std::fmt;


/// Writes an octet sequence as upper case hex digits.
pub fn fmt(src: &[u8], f: &mut fmt::Formatter) -> fmt::Result {
    for &ch in src {
        let ch = encode_u8(ch);
        write!(f, "{}{}", char::from(ch[0]), char::from(ch[1]))?;
    }
    Ok(())
}

/// Encodes an octet sequence as a hex string.
pub fn encode(src: &[u8]) -> String {
    let mut res = String::with_capacity(src.len() * 2);
    for &ch in src {
        let ch = encode_u8(ch);
        res.push(char::from(ch[0]));
        res.push(char::from(ch[1]));
    }
    res
}

pub fn encode_u8(ch: u8) -> [u8; 2] {
    [DIGITS[usize::from(ch >> 4)], DIGITS[usize::from(ch & 0x0F)]]
}

/// Decodes a hex string into an octet sequence.
///
/// Both upper and lower case digits are accepted. Returns `None` if the
/// string has an odd length or contains anything but hex digits.
pub fn decode(src: &str) -> Option<Vec<u8>> {
    let src = src.as_bytes();
    if src.len() % 2 != 0 {
        return None
    }
    src.chunks(2).map(|pair| {
        Some(decode_digit(pair[0])? << 4 | decode_digit(pair[1])?)
    }).collect()
}

fn decode_digit(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        _ => None
    }
}

const DIGITS: &[u8] = b"0123456789ABCDEF";


//============ Tests =========================================================
