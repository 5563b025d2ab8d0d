//! CRC used to protect the wire envelope.

use crc::Crc;

/// CRC-16/CCITT-FALSE (poly=0x1021, init=0xFFFF, no reflection, no final XOR),
/// computed over the header and payload of a frame.
pub const FRAME_CRC16: Crc<u16> = Crc::<u16>::new(&crc::CRC_16_IBM_3740);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_check_value() {
        // The check value for CCITT-FALSE over b"123456789" is 0x29B1.
        assert_eq!(FRAME_CRC16.checksum(b"123456789"), 0x29B1);
    }
}
