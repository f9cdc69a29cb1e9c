//! Tagged message variants exchanged between the host and a bot module
//!
//! Every message travels as a one-byte type tag followed by its payload
//! fields in declared order. Tag 0 never names a variant; it terminates a
//! message sequence.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::enums::{Direction, MoveResult, TileType};
use crate::error::{Result, WireError};
use crate::point::Point;
use crate::wire::{WireReader, WireWriter};

/// Tag byte that ends a message sequence
pub const TERMINATOR_TAG: u8 = 0;

/// Type tags for every message variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageType {
    Error = 1,
    InitialParameters = 2,
    PresentCircumstances = 3,
    Wait = 4,
    Resign = 5,
    MoveTo = 6,
    Open = 7,
    Close = 8,
}

impl MessageType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Error),
            2 => Some(Self::InitialParameters),
            3 => Some(Self::PresentCircumstances),
            4 => Some(Self::Wait),
            5 => Some(Self::Resign),
            6 => Some(Self::MoveTo),
            7 => Some(Self::Open),
            8 => Some(Self::Close),
            _ => None,
        }
    }
}

/// Host-internal error carrier for host/module mishaps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub description: String,
}

impl ErrorMessage {
    pub fn payload_size(&self) -> usize {
        self.description.len() + 1
    }

    pub fn decode<R: Read>(reader: &mut WireReader<R>) -> Result<Self> {
        let description = reader.read_string("ErrorMessage.description")?;
        Ok(Self { description })
    }

    pub fn write<W: Write>(&self, writer: &mut WireWriter<W>, with_tag: bool) -> Result<()> {
        if with_tag {
            writer.write_u8(MessageType::Error as u8)?;
        }
        writer.write_string(&self.description)
    }
}

/// Handshake parameters the host offers before the first turn
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialParameters {
    /// Version of this message layout, so modules know whether they can parse the rest
    pub params_version: u16,
    pub engine_version_major: u16,
    pub engine_version_minor: u16,
    pub engine_version_patch: u16,
    /// When false, any attempted diagonal move is Invalid
    pub diagonal_movement: bool,
    /// How far a bot can move on a given turn
    pub player_stride: u8,
    /// Distance at which a bot can open or close things
    pub player_open_reach: u8,
}

impl InitialParameters {
    pub fn payload_size(&self) -> usize {
        11
    }

    pub fn decode<R: Read>(reader: &mut WireReader<R>) -> Result<Self> {
        Ok(Self {
            params_version: reader.read_u16("InitialParameters.params_version")?,
            engine_version_major: reader.read_u16("InitialParameters.engine_version_major")?,
            engine_version_minor: reader.read_u16("InitialParameters.engine_version_minor")?,
            engine_version_patch: reader.read_u16("InitialParameters.engine_version_patch")?,
            diagonal_movement: reader.read_bool("InitialParameters.diagonal_movement")?,
            player_stride: reader.read_u8("InitialParameters.player_stride")?,
            player_open_reach: reader.read_u8("InitialParameters.player_open_reach")?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut WireWriter<W>, with_tag: bool) -> Result<()> {
        if with_tag {
            writer.write_u8(MessageType::InitialParameters as u8)?;
        }
        writer.write_u16(self.params_version)?;
        writer.write_u16(self.engine_version_major)?;
        writer.write_u16(self.engine_version_minor)?;
        writer.write_u16(self.engine_version_patch)?;
        writer.write_bool(self.diagonal_movement)?;
        writer.write_u8(self.player_stride)?;
        writer.write_u8(self.player_open_reach)
    }
}

/// Per-turn situation report sent to the bot at the start of each tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentCircumstances {
    /// Milliseconds the bot spent on the previous tick; 0 on the first turn
    pub last_tick_duration: u32,
    /// Result of the previous turn's move; Succeeded on the first turn
    pub last_move_result: MoveResult,
    pub current_hit_points: u16,
    /// Visible tiles as a square with the bot in the middle
    pub surroundings: Vec<TileType>,
    /// Radius of the surroundings square, so its side is `radius * 2 + 1`
    pub surroundings_radius: u8,
}

impl PresentCircumstances {
    pub fn payload_size(&self) -> usize {
        self.surroundings.len() + 10
    }

    pub fn decode<R: Read>(reader: &mut WireReader<R>) -> Result<Self> {
        Ok(Self {
            last_tick_duration: reader.read_u32("PresentCircumstances.last_tick_duration")?,
            last_move_result: reader.read_enum("PresentCircumstances.last_move_result")?,
            current_hit_points: reader.read_u16("PresentCircumstances.current_hit_points")?,
            surroundings: reader.read_list("PresentCircumstances.surroundings", |r| {
                r.read_enum("PresentCircumstances.surroundings")
            })?,
            surroundings_radius: reader.read_u8("PresentCircumstances.surroundings_radius")?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut WireWriter<W>, with_tag: bool) -> Result<()> {
        if with_tag {
            writer.write_u8(MessageType::PresentCircumstances as u8)?;
        }
        writer.write_u32(self.last_tick_duration)?;
        writer.write_enum(self.last_move_result)?;
        writer.write_u16(self.current_hit_points)?;
        writer.write_list(&self.surroundings, |w, tile| w.write_enum(*tile))?;
        writer.write_u8(self.surroundings_radius)
    }
}

/// No-op move; do nothing until the next tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wait;

impl Wait {
    pub fn payload_size(&self) -> usize {
        0
    }

    pub fn decode<R: Read>(_reader: &mut WireReader<R>) -> Result<Self> {
        Ok(Self)
    }

    pub fn write<W: Write>(&self, writer: &mut WireWriter<W>, with_tag: bool) -> Result<()> {
        if with_tag {
            writer.write_u8(MessageType::Wait as u8)?;
        }
        Ok(())
    }
}

/// Give up the game; the bot receives no further ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resign;

impl Resign {
    pub fn payload_size(&self) -> usize {
        0
    }

    pub fn decode<R: Read>(_reader: &mut WireReader<R>) -> Result<Self> {
        Ok(Self)
    }

    pub fn write<W: Write>(&self, writer: &mut WireWriter<W>, with_tag: bool) -> Result<()> {
        if with_tag {
            writer.write_u8(MessageType::Resign as u8)?;
        }
        Ok(())
    }
}

/// Move some distance in a compass direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTo {
    pub direction: Direction,
    /// Steps to take; beyond the allowed stride the move comes back Invalid
    pub distance: u8,
}

impl MoveTo {
    pub fn payload_size(&self) -> usize {
        2
    }

    pub fn decode<R: Read>(reader: &mut WireReader<R>) -> Result<Self> {
        Ok(Self {
            direction: reader.read_enum("MoveTo.direction")?,
            distance: reader.read_u8("MoveTo.distance")?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut WireWriter<W>, with_tag: bool) -> Result<()> {
        if with_tag {
            writer.write_u8(MessageType::MoveTo as u8)?;
        }
        writer.write_enum(self.direction)?;
        writer.write_u8(self.distance)
    }
}

/// Open a door or chest at a tile relative to the bot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Open {
    pub target: Point,
}

impl Open {
    pub fn payload_size(&self) -> usize {
        Point::SIZE
    }

    pub fn decode<R: Read>(reader: &mut WireReader<R>) -> Result<Self> {
        Ok(Self {
            target: Point::decode(reader)?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut WireWriter<W>, with_tag: bool) -> Result<()> {
        if with_tag {
            writer.write_u8(MessageType::Open as u8)?;
        }
        self.target.write(writer)
    }
}

/// Close a door or chest at a tile relative to the bot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Close {
    pub target: Point,
}

impl Close {
    pub fn payload_size(&self) -> usize {
        Point::SIZE
    }

    pub fn decode<R: Read>(reader: &mut WireReader<R>) -> Result<Self> {
        Ok(Self {
            target: Point::decode(reader)?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut WireWriter<W>, with_tag: bool) -> Result<()> {
        if with_tag {
            writer.write_u8(MessageType::Close as u8)?;
        }
        self.target.write(writer)
    }
}

/// A decoded protocol message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    Error(ErrorMessage),
    InitialParameters(InitialParameters),
    PresentCircumstances(PresentCircumstances),
    Wait(Wait),
    Resign(Resign),
    MoveTo(MoveTo),
    Open(Open),
    Close(Close),
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::Error(_) => MessageType::Error,
            Message::InitialParameters(_) => MessageType::InitialParameters,
            Message::PresentCircumstances(_) => MessageType::PresentCircumstances,
            Message::Wait(_) => MessageType::Wait,
            Message::Resign(_) => MessageType::Resign,
            Message::MoveTo(_) => MessageType::MoveTo,
            Message::Open(_) => MessageType::Open,
            Message::Close(_) => MessageType::Close,
        }
    }

    /// Encoded payload size in bytes, excluding the tag byte
    pub fn payload_size(&self) -> usize {
        match self {
            Message::Error(msg) => msg.payload_size(),
            Message::InitialParameters(msg) => msg.payload_size(),
            Message::PresentCircumstances(msg) => msg.payload_size(),
            Message::Wait(msg) => msg.payload_size(),
            Message::Resign(msg) => msg.payload_size(),
            Message::MoveTo(msg) => msg.payload_size(),
            Message::Open(msg) => msg.payload_size(),
            Message::Close(msg) => msg.payload_size(),
        }
    }

    pub fn write<W: Write>(&self, writer: &mut WireWriter<W>, with_tag: bool) -> Result<()> {
        match self {
            Message::Error(msg) => msg.write(writer, with_tag),
            Message::InitialParameters(msg) => msg.write(writer, with_tag),
            Message::PresentCircumstances(msg) => msg.write(writer, with_tag),
            Message::Wait(msg) => msg.write(writer, with_tag),
            Message::Resign(msg) => msg.write(writer, with_tag),
            Message::MoveTo(msg) => msg.write(writer, with_tag),
            Message::Open(msg) => msg.write(writer, with_tag),
            Message::Close(msg) => msg.write(writer, with_tag),
        }
    }

    /// Reads one tagged message from the stream.
    ///
    /// Returns `Ok(None)` on the terminator tag or a clean end-of-stream;
    /// an unrecognized nonzero tag is an error.
    pub fn read_from<R: Read>(reader: &mut WireReader<R>) -> Result<Option<Self>> {
        let Some(tag) = reader.read_u8_or_eof()? else {
            return Ok(None);
        };
        if tag == TERMINATOR_TAG {
            return Ok(None);
        }
        let message = match MessageType::from_u8(tag) {
            Some(MessageType::Error) => Message::Error(ErrorMessage::decode(reader)?),
            Some(MessageType::InitialParameters) => {
                Message::InitialParameters(InitialParameters::decode(reader)?)
            }
            Some(MessageType::PresentCircumstances) => {
                Message::PresentCircumstances(PresentCircumstances::decode(reader)?)
            }
            Some(MessageType::Wait) => Message::Wait(Wait::decode(reader)?),
            Some(MessageType::Resign) => Message::Resign(Resign::decode(reader)?),
            Some(MessageType::MoveTo) => Message::MoveTo(MoveTo::decode(reader)?),
            Some(MessageType::Open) => Message::Open(Open::decode(reader)?),
            Some(MessageType::Close) => Message::Close(Close::decode(reader)?),
            None => return Err(WireError::UnknownMessageType(tag)),
        };
        Ok(Some(message))
    }
}

/// Decodes consecutive tagged messages until a terminator, a clean
/// end-of-stream, or `limit` messages have been read.
///
/// The host and module also exchange unframed tagged messages through
/// shared memory, so this is public alongside the batch framer.
pub fn read_messages<R: Read>(
    reader: &mut WireReader<R>,
    limit: Option<usize>,
) -> Result<Vec<Message>> {
    let mut messages = Vec::new();
    while limit.map_or(true, |max| messages.len() < max) {
        match Message::read_from(reader)? {
            Some(message) => messages.push(message),
            None => break,
        }
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::MAX_LIST_LEN;

    fn sample_messages() -> Vec<Message> {
        vec![
            Message::Error(ErrorMessage {
                description: "module crashed".into(),
            }),
            Message::InitialParameters(InitialParameters {
                params_version: 7,
                engine_version_major: 0,
                engine_version_minor: 3,
                engine_version_patch: 1,
                diagonal_movement: true,
                player_stride: 1,
                player_open_reach: 1,
            }),
            Message::PresentCircumstances(PresentCircumstances {
                last_tick_duration: 42,
                last_move_result: MoveResult::Failed,
                current_hit_points: 100,
                surroundings: vec![TileType::Floor, TileType::Wall, TileType::ClosedDoor],
                surroundings_radius: 1,
            }),
            Message::Wait(Wait),
            Message::Resign(Resign),
            Message::MoveTo(MoveTo {
                direction: Direction::Southwest,
                distance: 2,
            }),
            Message::Open(Open {
                target: Point::new(0, -1),
            }),
            Message::Close(Close {
                target: Point::new(i16::MIN, i16::MAX),
            }),
        ]
    }

    fn encode_tagged(message: &Message) -> Vec<u8> {
        let mut buf = Vec::new();
        message.write(&mut WireWriter::new(&mut buf), true).unwrap();
        buf
    }

    #[test]
    fn test_roundtrip_every_variant() {
        for message in sample_messages() {
            let buf = encode_tagged(&message);
            let mut reader = WireReader::new(buf.as_slice());
            let decoded = Message::read_from(&mut reader).unwrap().unwrap();
            assert_eq!(decoded, message);
            assert_eq!(reader.position(), buf.len() as u64);
        }
    }

    #[test]
    fn test_roundtrip_boundary_values() {
        let boundaries = vec![
            Message::Error(ErrorMessage {
                description: String::new(),
            }),
            Message::Error(ErrorMessage {
                description: "x".repeat(255),
            }),
            Message::PresentCircumstances(PresentCircumstances {
                surroundings: Vec::new(),
                ..Default::default()
            }),
            Message::PresentCircumstances(PresentCircumstances {
                surroundings: vec![TileType::Void; MAX_LIST_LEN],
                ..Default::default()
            }),
        ];
        for message in boundaries {
            let buf = encode_tagged(&message);
            let mut reader = WireReader::new(buf.as_slice());
            assert_eq!(Message::read_from(&mut reader).unwrap().unwrap(), message);
        }
    }

    #[test]
    fn test_payload_size_matches_encoding() {
        for message in sample_messages() {
            let mut buf = Vec::new();
            message
                .write(&mut WireWriter::new(&mut buf), false)
                .unwrap();
            assert_eq!(
                buf.len(),
                message.payload_size(),
                "size mismatch for {:?}",
                message.message_type()
            );
        }
    }

    #[test]
    fn test_tag_values_are_stable() {
        let expected = [
            (MessageType::Error, 1),
            (MessageType::InitialParameters, 2),
            (MessageType::PresentCircumstances, 3),
            (MessageType::Wait, 4),
            (MessageType::Resign, 5),
            (MessageType::MoveTo, 6),
            (MessageType::Open, 7),
            (MessageType::Close, 8),
        ];
        for (message_type, tag) in expected {
            assert_eq!(message_type as u8, tag);
            assert_eq!(MessageType::from_u8(tag), Some(message_type));
        }
        assert_eq!(MessageType::from_u8(TERMINATOR_TAG), None);
        assert_eq!(MessageType::from_u8(9), None);
    }

    #[test]
    fn test_terminator_and_eof_end_reading() {
        let mut reader = WireReader::new([TERMINATOR_TAG].as_slice());
        assert_eq!(Message::read_from(&mut reader).unwrap(), None);

        let mut reader = WireReader::new(&[] as &[u8]);
        assert_eq!(Message::read_from(&mut reader).unwrap(), None);
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let mut reader = WireReader::new([9u8].as_slice());
        match Message::read_from(&mut reader).unwrap_err() {
            WireError::UnknownMessageType(9) => {}
            other => panic!("Wrong error: {other:?}"),
        }
    }

    #[test]
    fn test_enum_validation_in_move_to() {
        // tag 6, direction 8 (out of range), distance 1
        let mut reader = WireReader::new([6u8, 8, 1].as_slice());
        match Message::read_from(&mut reader).unwrap_err() {
            WireError::EnumOutOfRange { name, value } => {
                assert_eq!(name, "Direction");
                assert_eq!(value, 8);
            }
            other => panic!("Wrong error: {other:?}"),
        }
    }

    #[test]
    fn test_enum_validation_in_circumstances() {
        // tag 3, last_tick_duration 0, then a move result outside {0,1,2,3}
        let mut reader = WireReader::new([3u8, 0, 0, 0, 0, 7].as_slice());
        match Message::read_from(&mut reader).unwrap_err() {
            WireError::EnumOutOfRange { name, value } => {
                assert_eq!(name, "MoveResult");
                assert_eq!(value, 7);
            }
            other => panic!("Wrong error: {other:?}"),
        }
    }

    #[test]
    fn test_enum_validation_in_surroundings_list() {
        // tag 3, fixed fields, then a 1-element list holding tile 5
        let bytes = [3u8, 0, 0, 0, 0, 0, 10, 0, 1, 0, 5];
        let mut reader = WireReader::new(bytes.as_slice());
        match Message::read_from(&mut reader).unwrap_err() {
            WireError::EnumOutOfRange { name, value } => {
                assert_eq!(name, "TileType");
                assert_eq!(value, 5);
            }
            other => panic!("Wrong error: {other:?}"),
        }
    }

    #[test]
    fn test_truncated_field_names_field() {
        // tag 2 but only one byte of params_version
        let mut reader = WireReader::new([2u8, 7].as_slice());
        match Message::read_from(&mut reader).unwrap_err() {
            WireError::Truncated { field, offset } => {
                assert_eq!(field, "InitialParameters.params_version");
                assert_eq!(offset, 1);
            }
            other => panic!("Wrong error: {other:?}"),
        }
    }

    #[test]
    fn test_read_messages_sequence() {
        let mut buf = Vec::new();
        let mut writer = WireWriter::new(&mut buf);
        for message in sample_messages() {
            message.write(&mut writer, true).unwrap();
        }

        let mut reader = WireReader::new(buf.as_slice());
        let decoded = read_messages(&mut reader, None).unwrap();
        assert_eq!(decoded, sample_messages());
    }

    #[test]
    fn test_read_messages_respects_limit() {
        let mut buf = Vec::new();
        let mut writer = WireWriter::new(&mut buf);
        for message in sample_messages() {
            message.write(&mut writer, true).unwrap();
        }

        let mut reader = WireReader::new(buf.as_slice());
        let decoded = read_messages(&mut reader, Some(2)).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded, &sample_messages()[..2]);
    }

    #[test]
    fn test_read_messages_stops_at_terminator() {
        let mut buf = Vec::new();
        let mut writer = WireWriter::new(&mut buf);
        Message::Wait(Wait).write(&mut writer, true).unwrap();
        writer.write_u8(TERMINATOR_TAG).unwrap();
        Message::Resign(Resign).write(&mut writer, true).unwrap();

        let mut reader = WireReader::new(buf.as_slice());
        let decoded = read_messages(&mut reader, None).unwrap();
        assert_eq!(decoded, vec![Message::Wait(Wait)]);
    }

    #[test]
    fn test_circumstances_default() {
        let circumstances = PresentCircumstances::default();
        assert_eq!(circumstances.last_move_result, MoveResult::Succeeded);
        assert_eq!(circumstances.last_tick_duration, 0);
        assert!(circumstances.surroundings.is_empty());
    }

    #[test]
    fn test_serde_visibility() {
        // Host-side tooling logs protocol values as JSON; the wire format
        // itself stays binary.
        for message in sample_messages() {
            let json = serde_json::to_string(&message).unwrap();
            let back: Message = serde_json::from_str(&json).unwrap();
            assert_eq!(back, message);
        }
    }
}
