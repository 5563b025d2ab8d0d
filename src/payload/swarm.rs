//! Swarm task payload: `TASK_TYPE(1) | TASK_ID(1) | PARAM_FLAGS(1) |
//! START_TIME(4, big-endian u32, unix seconds) | P1(f32) | P2(f32) | P3(f32)`.
//!
//! The source only ever sets GOTO's three param-flag bits together and
//! never reads them individually; they're kept as a [`bitflags`] set rather
//! than dropped, since a future task type could set a subset.

use bitflags::bitflags;

use super::{read_f32_be, read_u32_be, read_u8, write_f32_be, PayloadError};

pub const TASK_GOTO: u8 = 1;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        const LAT = 0b001;
        const LON = 0b010;
        const ALT = 0b100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwarmTask {
    Goto {
        task_id: u8,
        start_time: u32,
        lat: f32,
        lon: f32,
        alt: f32,
    },
    Unknown {
        task_type: u8,
        task_id: u8,
    },
}

impl SwarmTask {
    pub fn task_id(&self) -> u8 {
        match self {
            Self::Goto { task_id, .. } => *task_id,
            Self::Unknown { task_id, .. } => *task_id,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(19);
        match self {
            Self::Goto {
                task_id,
                start_time,
                lat,
                lon,
                alt,
            } => {
                out.push(TASK_GOTO);
                out.push(*task_id);
                out.push(ParamFlags::all().bits());
                out.extend_from_slice(&start_time.to_be_bytes());
                write_f32_be(&mut out, *lat);
                write_f32_be(&mut out, *lon);
                write_f32_be(&mut out, *alt);
            }
            Self::Unknown { task_type, task_id } => {
                out.push(*task_type);
                out.push(*task_id);
                out.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
            }
        }
        out
    }

    pub fn decode(data: &[u8]) -> Result<Self, PayloadError> {
        if data.len() != 19 {
            return Err(PayloadError::UnexpectedLength {
                actual: data.len(),
                expected: &[19],
            });
        }
        let task_type = read_u8(data, 0)?;
        let task_id = read_u8(data, 1)?;
        Ok(match task_type {
            TASK_GOTO => Self::Goto {
                task_id,
                start_time: read_u32_be(data, 3)?,
                lat: read_f32_be(data, 7)?,
                lon: read_f32_be(data, 11)?,
                alt: read_f32_be(data, 15)?,
            },
            other => Self::Unknown {
                task_type: other,
                task_id,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goto_round_trips() {
        let task = SwarmTask::Goto {
            task_id: 42,
            start_time: 1_700_000_000,
            lat: 47.5,
            lon: -122.3,
            alt: 50.0,
        };
        let encoded = task.encode();
        assert_eq!(encoded.len(), 19);
        assert_eq!(SwarmTask::decode(&encoded).unwrap(), task);
    }

    #[test]
    fn unsupported_task_type_decodes_to_unknown() {
        let mut encoded = SwarmTask::Goto {
            task_id: 1,
            start_time: 0,
            lat: 0.0,
            lon: 0.0,
            alt: 0.0,
        }
        .encode();
        encoded[0] = 9;
        assert_eq!(
            SwarmTask::decode(&encoded).unwrap(),
            SwarmTask::Unknown {
                task_type: 9,
                task_id: 1
            }
        );
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert_eq!(
            SwarmTask::decode(&[0u8; 10]),
            Err(PayloadError::UnexpectedLength {
                actual: 10,
                expected: &[19]
            })
        );
    }
}
