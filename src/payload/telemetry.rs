//! Telemetry payload: a leading kind tag followed by a kind-specific body.

use super::{decode_fixed_str, encode_fixed_str, read_f32_be, read_u8, write_f32_be, PayloadError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryKind {
    Gps,
    Imu,
    Battery,
    Heartbeat,
}

impl TelemetryKind {
    pub const fn tag(self) -> u8 {
        match self {
            Self::Gps => 0x01,
            Self::Imu => 0x02,
            Self::Battery => 0x03,
            Self::Heartbeat => 0x04,
        }
    }
}

impl TryFrom<u8> for TelemetryKind {
    type Error = PayloadError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0x01 => Ok(Self::Gps),
            0x02 => Ok(Self::Imu),
            0x03 => Ok(Self::Battery),
            0x04 => Ok(Self::Heartbeat),
            other => Err(PayloadError::UnknownTelemetryKind(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryPayload {
    Gps { lat: f32, lon: f32, alt: f32 },
    Imu { roll: f32, pitch: f32, yaw: f32 },
    Battery {
        voltage: f32,
        current: f32,
        percent: f32,
    },
    Heartbeat {
        mode: String,
        health: String,
        armed: bool,
        gps_fix: bool,
        sat_count: u8,
    },
}

impl TelemetryPayload {
    pub fn kind(&self) -> TelemetryKind {
        match self {
            Self::Gps { .. } => TelemetryKind::Gps,
            Self::Imu { .. } => TelemetryKind::Imu,
            Self::Battery { .. } => TelemetryKind::Battery,
            Self::Heartbeat { .. } => TelemetryKind::Heartbeat,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![self.kind().tag()];
        match self {
            Self::Gps { lat, lon, alt } => {
                write_f32_be(&mut out, *lat);
                write_f32_be(&mut out, *lon);
                write_f32_be(&mut out, *alt);
            }
            Self::Imu { roll, pitch, yaw } => {
                write_f32_be(&mut out, *roll);
                write_f32_be(&mut out, *pitch);
                write_f32_be(&mut out, *yaw);
            }
            Self::Battery {
                voltage,
                current,
                percent,
            } => {
                write_f32_be(&mut out, *voltage);
                write_f32_be(&mut out, *current);
                write_f32_be(&mut out, *percent);
            }
            Self::Heartbeat {
                mode,
                health,
                armed,
                gps_fix,
                sat_count,
            } => {
                out.extend_from_slice(&encode_fixed_str::<32>(mode));
                out.extend_from_slice(&encode_fixed_str::<32>(health));
                out.push(*armed as u8);
                out.push(*gps_fix as u8);
                out.push(*sat_count);
            }
        }
        out
    }

    pub fn decode(data: &[u8]) -> Result<Self, PayloadError> {
        let tag = read_u8(data, 0)?;
        let kind = TelemetryKind::try_from(tag)?;
        let body = &data[1..];
        Ok(match kind {
            TelemetryKind::Gps => TelemetryPayload::Gps {
                lat: read_f32_be(body, 0)?,
                lon: read_f32_be(body, 4)?,
                alt: read_f32_be(body, 8)?,
            },
            TelemetryKind::Imu => TelemetryPayload::Imu {
                roll: read_f32_be(body, 0)?,
                pitch: read_f32_be(body, 4)?,
                yaw: read_f32_be(body, 8)?,
            },
            TelemetryKind::Battery => TelemetryPayload::Battery {
                voltage: read_f32_be(body, 0)?,
                current: read_f32_be(body, 4)?,
                percent: read_f32_be(body, 8)?,
            },
            TelemetryKind::Heartbeat => {
                if body.len() < 67 {
                    return Err(PayloadError::TooShort {
                        need: 68,
                        got: data.len(),
                    });
                }
                TelemetryPayload::Heartbeat {
                    mode: decode_fixed_str(&body[0..32])?,
                    health: decode_fixed_str(&body[32..64])?,
                    armed: body[64] != 0,
                    gps_fix: body[65] != 0,
                    sat_count: body[66],
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gps_round_trips() {
        let gps = TelemetryPayload::Gps {
            lat: 47.123,
            lon: -122.5,
            alt: 91.0,
        };
        let encoded = gps.encode();
        assert_eq!(encoded.len(), 13);
        assert_eq!(TelemetryPayload::decode(&encoded).unwrap(), gps);
    }

    #[test]
    fn heartbeat_round_trips_with_padded_text() {
        let hb = TelemetryPayload::Heartbeat {
            mode: "GUIDED".into(),
            health: "OK".into(),
            armed: true,
            gps_fix: false,
            sat_count: 9,
        };
        let encoded = hb.encode();
        assert_eq!(encoded.len(), 1 + 32 + 32 + 1 + 1 + 1);
        assert_eq!(TelemetryPayload::decode(&encoded).unwrap(), hb);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(
            TelemetryPayload::decode(&[0x0F, 0, 0, 0]),
            Err(PayloadError::UnknownTelemetryKind(0x0F))
        );
    }
}
