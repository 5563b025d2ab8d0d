//! Command payload: `CMD_ID(1) | PARAMS(...)`.
//!
//! The source's dynamic `id -> callable` command table doesn't translate
//! directly; it becomes a finite tagged [`Command`] variant instead. Unknown
//! IDs decode successfully into [`Command::Unknown`] so the handler can reply
//! with `UNSUPPORTED` rather than the parser failing outright; a recognized
//! ID with the wrong parameter length is a genuine decode error.

use thiserror::Error;

use super::{read_f32_be, read_u32_be, read_u8, write_f32_be};

pub const CMD_REBOOT: u8 = 0x01;
pub const CMD_SET_MODE: u8 = 0x02;
pub const CMD_TAKEOFF: u8 = 0x03;
pub const CMD_LANDING: u8 = 0x04;
pub const CMD_GIMBAL: u8 = 0x05;
pub const CMD_GOTO: u8 = 0x06;
pub const CMD_FOLLOW_ME: u8 = 0x07;
pub const CMD_WAYPOINTS: u8 = 0x09;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("command {cmd_id:#04x} has invalid parameter length {actual}, expected one of {expected:?}")]
pub struct InvalidCommandParams {
    pub cmd_id: u8,
    pub actual: usize,
    pub expected: &'static [usize],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Takeoff {
    Simple {
        alt: f32,
    },
    Targeted {
        alt: f32,
        lat: f32,
        lon: f32,
        target_alt: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Landing {
    Immediate,
    At { lat: f32, lon: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub lat: f32,
    pub lon: f32,
    pub alt: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Reboot,
    SetMode { mode: u8 },
    Takeoff(Takeoff),
    Landing(Landing),
    Gimbal { yaw: f32, pitch: f32, roll: f32 },
    Goto { lat: f32, lon: f32, alt: f32 },
    FollowMe { target_id: u32, altitude: Option<f32> },
    Waypoints(Vec<Waypoint>),
    /// A `CMD_ID` this node doesn't recognize; triggers the `UNSUPPORTED` NACK path.
    Unknown(u8),
}

impl Command {
    /// Tracker-key / log name for this command. Matches the names the ACK
    /// tracker keys on (spec.md's `"<COMMAND_NAME>"` keys).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reboot => "REBOOT",
            Self::SetMode { .. } => "SET_MODE",
            Self::Takeoff(_) => "TAKEOFF",
            Self::Landing(_) => "LANDING",
            Self::Gimbal { .. } => "GIMBAL",
            Self::Goto { .. } => "GOTO",
            Self::FollowMe { .. } => "FOLLOW_ME",
            Self::Waypoints(_) => "WAYPOINTS",
            Self::Unknown(_) => "UNKNOWN",
        }
    }

    pub fn cmd_id(&self) -> u8 {
        match self {
            Self::Reboot => CMD_REBOOT,
            Self::SetMode { .. } => CMD_SET_MODE,
            Self::Takeoff(_) => CMD_TAKEOFF,
            Self::Landing(_) => CMD_LANDING,
            Self::Gimbal { .. } => CMD_GIMBAL,
            Self::Goto { .. } => CMD_GOTO,
            Self::FollowMe { .. } => CMD_FOLLOW_ME,
            Self::Waypoints(_) => CMD_WAYPOINTS,
            Self::Unknown(id) => *id,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![self.cmd_id()];
        match self {
            Self::Reboot => {}
            Self::SetMode { mode } => out.push(*mode),
            Self::Takeoff(Takeoff::Simple { alt }) => write_f32_be(&mut out, *alt),
            Self::Takeoff(Takeoff::Targeted {
                alt,
                lat,
                lon,
                target_alt,
            }) => {
                write_f32_be(&mut out, *alt);
                write_f32_be(&mut out, *lat);
                write_f32_be(&mut out, *lon);
                write_f32_be(&mut out, *target_alt);
            }
            Self::Landing(Landing::Immediate) => {}
            Self::Landing(Landing::At { lat, lon }) => {
                write_f32_be(&mut out, *lat);
                write_f32_be(&mut out, *lon);
            }
            Self::Gimbal { yaw, pitch, roll } => {
                write_f32_be(&mut out, *yaw);
                write_f32_be(&mut out, *pitch);
                write_f32_be(&mut out, *roll);
            }
            Self::Goto { lat, lon, alt } => {
                write_f32_be(&mut out, *lat);
                write_f32_be(&mut out, *lon);
                write_f32_be(&mut out, *alt);
            }
            Self::FollowMe {
                target_id,
                altitude,
            } => {
                out.extend_from_slice(&target_id.to_be_bytes());
                if let Some(alt) = altitude {
                    write_f32_be(&mut out, *alt);
                }
            }
            Self::Waypoints(points) => {
                for p in points {
                    write_f32_be(&mut out, p.lat);
                    write_f32_be(&mut out, p.lon);
                    write_f32_be(&mut out, p.alt);
                }
            }
            Self::Unknown(_) => {}
        }
        out
    }

    pub fn decode(cmd_id: u8, params: &[u8]) -> Result<Self, InvalidCommandParams> {
        let invalid = |expected: &'static [usize]| InvalidCommandParams {
            cmd_id,
            actual: params.len(),
            expected,
        };

        Ok(match cmd_id {
            CMD_REBOOT => {
                if !params.is_empty() {
                    return Err(invalid(&[0]));
                }
                Self::Reboot
            }
            CMD_SET_MODE => {
                if params.len() != 1 {
                    return Err(invalid(&[1]));
                }
                Self::SetMode { mode: params[0] }
            }
            CMD_TAKEOFF => match params.len() {
                4 => Self::Takeoff(Takeoff::Simple {
                    alt: read_f32_be(params, 0).unwrap(),
                }),
                16 => Self::Takeoff(Takeoff::Targeted {
                    alt: read_f32_be(params, 0).unwrap(),
                    lat: read_f32_be(params, 4).unwrap(),
                    lon: read_f32_be(params, 8).unwrap(),
                    target_alt: read_f32_be(params, 12).unwrap(),
                }),
                _ => return Err(invalid(&[4, 16])),
            },
            CMD_LANDING => match params.len() {
                0 => Self::Landing(Landing::Immediate),
                8 => Self::Landing(Landing::At {
                    lat: read_f32_be(params, 0).unwrap(),
                    lon: read_f32_be(params, 4).unwrap(),
                }),
                _ => return Err(invalid(&[0, 8])),
            },
            CMD_GIMBAL => {
                if params.len() != 12 {
                    return Err(invalid(&[12]));
                }
                Self::Gimbal {
                    yaw: read_f32_be(params, 0).unwrap(),
                    pitch: read_f32_be(params, 4).unwrap(),
                    roll: read_f32_be(params, 8).unwrap(),
                }
            }
            CMD_GOTO => {
                if params.len() != 12 {
                    return Err(invalid(&[12]));
                }
                Self::Goto {
                    lat: read_f32_be(params, 0).unwrap(),
                    lon: read_f32_be(params, 4).unwrap(),
                    alt: read_f32_be(params, 8).unwrap(),
                }
            }
            CMD_FOLLOW_ME => match params.len() {
                4 => Self::FollowMe {
                    target_id: read_u32_be(params, 0).unwrap(),
                    altitude: None,
                },
                8 => Self::FollowMe {
                    target_id: read_u32_be(params, 0).unwrap(),
                    altitude: Some(read_f32_be(params, 4).unwrap()),
                },
                _ => return Err(invalid(&[4, 8])),
            },
            CMD_WAYPOINTS => {
                if params.len() % 12 != 0 {
                    return Err(InvalidCommandParams {
                        cmd_id,
                        actual: params.len(),
                        expected: &[0],
                    });
                }
                let points = params
                    .chunks_exact(12)
                    .map(|c| Waypoint {
                        lat: read_f32_be(c, 0).unwrap(),
                        lon: read_f32_be(c, 4).unwrap(),
                        alt: read_f32_be(c, 8).unwrap(),
                    })
                    .collect();
                Self::Waypoints(points)
            }
            other => Self::Unknown(other),
        })
    }

    /// Tracker-key name for a raw `CMD_ID`, without needing the params to
    /// build a full [`Command`]. Used on the ACK receive path, where only
    /// the id (not the original command) is available.
    pub fn name_for_id(cmd_id: u8) -> &'static str {
        match cmd_id {
            CMD_REBOOT => "REBOOT",
            CMD_SET_MODE => "SET_MODE",
            CMD_TAKEOFF => "TAKEOFF",
            CMD_LANDING => "LANDING",
            CMD_GIMBAL => "GIMBAL",
            CMD_GOTO => "GOTO",
            CMD_FOLLOW_ME => "FOLLOW_ME",
            CMD_WAYPOINTS => "WAYPOINTS",
            _ => "UNKNOWN",
        }
    }

    /// Byte-count of the raw params, used by the command handler's length
    /// validator. `read_u8` is only to reuse the crate's bounds-checked
    /// accessor for the CMD_ID byte itself when slicing a raw `C`-frame.
    pub fn split_cmd_id(payload: &[u8]) -> Result<(u8, &[u8]), InvalidCommandParams> {
        if payload.is_empty() {
            return Err(InvalidCommandParams {
                cmd_id: 0,
                actual: 0,
                expected: &[1],
            });
        }
        let cmd_id = read_u8(payload, 0).expect("checked non-empty above");
        Ok((cmd_id, &payload[1..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takeoff_simple_round_trips() {
        let cmd = Command::Takeoff(Takeoff::Simple { alt: 30.0 });
        let encoded = cmd.encode();
        assert_eq!(encoded.len(), 5); // cmd_id + 4 bytes
        let (id, params) = Command::split_cmd_id(&encoded).unwrap();
        assert_eq!(Command::decode(id, params).unwrap(), cmd);
    }

    #[test]
    fn takeoff_bad_length_is_invalid_params() {
        let err = Command::decode(CMD_TAKEOFF, &[0u8; 7]).unwrap_err();
        assert_eq!(err.cmd_id, CMD_TAKEOFF);
        assert_eq!(err.expected, &[4, 16]);
    }

    #[test]
    fn unknown_cmd_id_decodes_to_unknown_variant() {
        assert_eq!(Command::decode(0x7F, &[]).unwrap(), Command::Unknown(0x7F));
    }

    #[test]
    fn waypoints_round_trip_multiple_points() {
        let cmd = Command::Waypoints(vec![
            Waypoint {
                lat: 1.0,
                lon: 2.0,
                alt: 3.0,
            },
            Waypoint {
                lat: 4.0,
                lon: 5.0,
                alt: 6.0,
            },
        ]);
        let encoded = cmd.encode();
        let (id, params) = Command::split_cmd_id(&encoded).unwrap();
        assert_eq!(Command::decode(id, params).unwrap(), cmd);
    }
}
