//! Typed payload codecs for each frame type. These sit one layer above
//! [`crate::frame`]: the frame codec only knows about raw bytes, these
//! modules know what the bytes mean.

pub mod ack;
pub mod command;
pub mod ftp;
pub mod swarm;
pub mod telemetry;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("payload too short: need at least {need} bytes, got {got}")]
    TooShort { need: usize, got: usize },
    #[error("unexpected payload length {actual}, expected one of {expected:?}")]
    UnexpectedLength {
        actual: usize,
        expected: &'static [usize],
    },
    #[error("invalid utf-8 in string field")]
    InvalidUtf8,
    #[error("unknown telemetry kind tag {0:#04x}")]
    UnknownTelemetryKind(u8),
    #[error("unknown ftp phase byte {0:#04x}")]
    UnknownFtpPhase(u8),
}

fn need(data: &[u8], n: usize) -> Result<(), PayloadError> {
    if data.len() < n {
        Err(PayloadError::TooShort {
            need: n,
            got: data.len(),
        })
    } else {
        Ok(())
    }
}

pub(crate) fn read_u8(data: &[u8], at: usize) -> Result<u8, PayloadError> {
    need(data, at + 1)?;
    Ok(data[at])
}

pub(crate) fn read_u24_be(data: &[u8], at: usize) -> Result<u32, PayloadError> {
    need(data, at + 3)?;
    Ok(u32::from_be_bytes([0, data[at], data[at + 1], data[at + 2]]))
}

pub(crate) fn read_u32_be(data: &[u8], at: usize) -> Result<u32, PayloadError> {
    need(data, at + 4)?;
    Ok(u32::from_be_bytes([
        data[at],
        data[at + 1],
        data[at + 2],
        data[at + 3],
    ]))
}

pub(crate) fn read_f32_be(data: &[u8], at: usize) -> Result<f32, PayloadError> {
    Ok(f32::from_bits(read_u32_be(data, at)?))
}

pub(crate) fn write_u24_be(out: &mut Vec<u8>, value: u32) {
    let bytes = value.to_be_bytes();
    out.extend_from_slice(&bytes[1..4]);
}

pub(crate) fn write_f32_be(out: &mut Vec<u8>, value: f32) {
    out.extend_from_slice(&value.to_bits().to_be_bytes());
}

/// Encodes `s` into a fixed `N`-byte, zero-padded field, truncating if it
/// doesn't fit.
pub(crate) fn encode_fixed_str<const N: usize>(s: &str) -> [u8; N] {
    let mut out = [0u8; N];
    let bytes = s.as_bytes();
    let len = bytes.len().min(N);
    out[..len].copy_from_slice(&bytes[..len]);
    out
}

/// Decodes a fixed-width zero-padded text field, trimming trailing NULs.
pub(crate) fn decode_fixed_str(bytes: &[u8]) -> Result<String, PayloadError> {
    let trimmed_len = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    std::str::from_utf8(&bytes[..trimmed_len])
        .map(str::to_owned)
        .map_err(|_| PayloadError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_str_round_trips_and_trims_padding() {
        let encoded = encode_fixed_str::<32>("GUIDED");
        assert_eq!(encoded.len(), 32);
        let decoded = decode_fixed_str(&encoded).unwrap();
        assert_eq!(decoded, "GUIDED");
    }

    #[test]
    fn fixed_str_truncates_overlong_input() {
        let encoded = encode_fixed_str::<4>("HELLO");
        assert_eq!(&encoded, b"HELL");
    }
}
