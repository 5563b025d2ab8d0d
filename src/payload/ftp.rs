//! FTP payload: `PHASE(1) | BODY`.

use super::{read_u24_be, read_u8, write_u24_be, PayloadError};

pub const PHASE_START: u8 = 0x00;
pub const PHASE_CHUNK: u8 = 0x01;
pub const PHASE_END: u8 = 0x02;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FtpPhase {
    Start { name: String },
    Chunk { seq: u32, data: Vec<u8> },
    End { total_chunks: u32 },
}

impl FtpPhase {
    pub fn phase_byte(&self) -> u8 {
        match self {
            Self::Start { .. } => PHASE_START,
            Self::Chunk { .. } => PHASE_CHUNK,
            Self::End { .. } => PHASE_END,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![self.phase_byte()];
        match self {
            Self::Start { name } => {
                let name_bytes = name.as_bytes();
                out.extend_from_slice(&(name_bytes.len() as u16).to_be_bytes());
                out.extend_from_slice(name_bytes);
            }
            Self::Chunk { seq, data } => {
                write_u24_be(&mut out, *seq);
                out.extend_from_slice(data);
            }
            Self::End { total_chunks } => write_u24_be(&mut out, *total_chunks),
        }
        out
    }

    pub fn decode(data: &[u8]) -> Result<Self, PayloadError> {
        let phase = read_u8(data, 0)?;
        let body = &data[1..];
        Ok(match phase {
            PHASE_START => {
                if body.len() < 2 {
                    return Err(PayloadError::TooShort {
                        need: 3,
                        got: data.len(),
                    });
                }
                let name_len = u16::from_be_bytes([body[0], body[1]]) as usize;
                if body.len() < 2 + name_len {
                    return Err(PayloadError::TooShort {
                        need: 3 + name_len,
                        got: data.len(),
                    });
                }
                let name = std::str::from_utf8(&body[2..2 + name_len])
                    .map_err(|_| PayloadError::InvalidUtf8)?
                    .to_owned();
                Self::Start { name }
            }
            PHASE_CHUNK => {
                let seq = read_u24_be(body, 0)?;
                Self::Chunk {
                    seq,
                    data: body[3..].to_vec(),
                }
            }
            PHASE_END => Self::End {
                total_chunks: read_u24_be(body, 0)?,
            },
            other => return Err(PayloadError::UnknownFtpPhase(other)),
        })
    }
}
