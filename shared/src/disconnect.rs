use tandem_serde::{ByteReader, ByteWriter, CodecError, Serde, MAX_STRING_LEN};

/// Why a peer was dropped from the session.
///
/// Wire values are one byte and stable; new reasons may only be appended.
/// `GenericKeyed` carries a localization key plus its parameters and `Kick`
/// carries a short reason string; every other reason has no payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    GenericKeyed { key: String, params: Vec<String> },
    Protocol,
    Defs,
    UsernameLength,
    UsernameChars,
    UsernameAlreadyOnline,
    ServerClosed,
    ServerFull,
    Kick { reason: String },
    ClientLeft,
    Throttled,
    NetFailed,
    ServerPacketRead,
    Internal,
    Generic,
}

impl DisconnectReason {
    /// The stable one-byte wire value.
    pub fn wire_value(&self) -> u8 {
        match self {
            DisconnectReason::GenericKeyed { .. } => 0,
            DisconnectReason::Protocol => 1,
            DisconnectReason::Defs => 2,
            DisconnectReason::UsernameLength => 3,
            DisconnectReason::UsernameChars => 4,
            DisconnectReason::UsernameAlreadyOnline => 5,
            DisconnectReason::ServerClosed => 6,
            DisconnectReason::ServerFull => 7,
            DisconnectReason::Kick { .. } => 8,
            DisconnectReason::ClientLeft => 9,
            DisconnectReason::Throttled => 10,
            DisconnectReason::NetFailed => 11,
            DisconnectReason::ServerPacketRead => 12,
            DisconnectReason::Internal => 13,
            DisconnectReason::Generic => 14,
        }
    }
}

impl Serde for DisconnectReason {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.wire_value());
        match self {
            DisconnectReason::GenericKeyed { key, params } => {
                writer.write_string(key);
                writer.write_u32(params.len() as u32);
                for param in params {
                    writer.write_string(param);
                }
            }
            DisconnectReason::Kick { reason } => {
                writer.write_string(reason);
            }
            _ => {}
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, CodecError> {
        match reader.read_u8()? {
            0 => {
                let key = reader.read_string(MAX_STRING_LEN)?;
                let count = reader.read_u32()? as usize;
                let mut params = Vec::new();
                for _ in 0..count {
                    params.push(reader.read_string(MAX_STRING_LEN)?);
                }
                Ok(DisconnectReason::GenericKeyed { key, params })
            }
            1 => Ok(DisconnectReason::Protocol),
            2 => Ok(DisconnectReason::Defs),
            3 => Ok(DisconnectReason::UsernameLength),
            4 => Ok(DisconnectReason::UsernameChars),
            5 => Ok(DisconnectReason::UsernameAlreadyOnline),
            6 => Ok(DisconnectReason::ServerClosed),
            7 => Ok(DisconnectReason::ServerFull),
            8 => Ok(DisconnectReason::Kick {
                reason: reader.read_string(MAX_STRING_LEN)?,
            }),
            9 => Ok(DisconnectReason::ClientLeft),
            10 => Ok(DisconnectReason::Throttled),
            11 => Ok(DisconnectReason::NetFailed),
            12 => Ok(DisconnectReason::ServerPacketRead),
            13 => Ok(DisconnectReason::Internal),
            14 => Ok(DisconnectReason::Generic),
            _ => Err(CodecError::FormatError("invalid disconnect reason byte")),
        }
    }
}

// Tests
