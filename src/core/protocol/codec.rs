//! Byte-level codec for the THZ wire format
//!
//! The bus uses a sum-mod-256 checksum and two escape pairs that keep the
//! DLE acknowledgement byte and the 0x2B service byte out of frame bodies.

/// Sum of all bytes modulo 256.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Apply escape stuffing: `0x10` becomes `0x10 0x10`, `0x2B` becomes
/// `0x2B 0x18`. Only the checksum and payload portion of a frame is
/// stuffed, never header or footer.
pub fn escape(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 2);
    for &byte in data {
        match byte {
            0x10 => out.extend_from_slice(&[0x10, 0x10]),
            0x2B => out.extend_from_slice(&[0x2B, 0x18]),
            _ => out.push(byte),
        }
    }
    out
}

/// Reverse escape stuffing. Scans left to right so an unescaped pair is
/// consumed exactly once and never re-examined.
pub fn unescape(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        if i + 1 < data.len() {
            match (data[i], data[i + 1]) {
                (0x10, 0x10) => {
                    out.push(0x10);
                    i += 2;
                    continue;
                }
                (0x2B, 0x18) => {
                    out.push(0x2B);
                    i += 2;
                    continue;
                }
                _ => {}
            }
        }
        out.push(data[i]);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_known_requests() {
        // header 01 00 + zeroed checksum slot + command
        assert_eq!(checksum(&[0x01, 0x00, 0x00, 0xFD]), 0xFE);
        assert_eq!(checksum(&[0x01, 0x00, 0x00, 0xFB]), 0xFC);
        assert_eq!(checksum(&[0x01, 0x00, 0x00, 0x09]), 0x0A);
        assert_eq!(checksum(&[0x01, 0x00, 0x00, 0xF3]), 0xF4);
        assert_eq!(checksum(&[0x01, 0x00, 0x00, 0xF4]), 0xF5);
        assert_eq!(checksum(&[0x01, 0x00, 0x00, 0xFC]), 0xFD);
        assert_eq!(checksum(&[0x01, 0x00, 0x00, 0xD1]), 0xD2);
        assert_eq!(checksum(&[0x01, 0x00, 0x00, 0x17]), 0x18);
        assert_eq!(checksum(&[0x01, 0x00, 0x00, 0x0A, 0x17]), 0x22);
    }

    #[test]
    fn test_checksum_wraps() {
        assert_eq!(checksum(&[0xFF, 0xFF, 0x02]), 0x00);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(&[0x10]), vec![0x10, 0x10]);
        assert_eq!(escape(&[0x2B]), vec![0x2B, 0x18]);
        assert_eq!(escape(&[0x10, 0xFF, 0x2B]), vec![0x10, 0x10, 0xFF, 0x2B, 0x18]);
        assert_eq!(escape(&[0x01, 0x02]), vec![0x01, 0x02]);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(&[0x10, 0x10]), vec![0x10]);
        assert_eq!(unescape(&[0x2B, 0x18]), vec![0x2B]);
        assert_eq!(unescape(&[0x10, 0x10, 0xFF, 0x2B, 0x18]), vec![0x10, 0xFF, 0x2B]);
    }

    #[test]
    fn test_roundtrip_adjacent_specials() {
        // two literal DLEs stuff to four bytes and come back as two
        let data = vec![0x10, 0x10, 0x2B, 0x00];
        assert_eq!(unescape(&escape(&data)), data);
    }
}
