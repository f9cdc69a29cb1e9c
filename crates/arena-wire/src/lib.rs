//! # arena-wire
//!
//! Binary message codec for the arena host/bot protocol.
//!
//! The host engine and each sandboxed bot module exchange a small, fixed
//! set of tagged messages over a little-endian byte stream. This crate is
//! the codec for that wire format:
//! - Stream primitives and validated wire enums
//! - The message variants with symmetric encode/decode and exact sizing
//! - Batch framing (magic header, count, terminator) with strict checks
//!
//! Game rules and transport are out of scope; the codec only turns values
//! into bytes and back, and every failure is a typed [`WireError`].

pub mod batch;
pub mod enums;
pub mod error;
pub mod message;
pub mod point;
pub mod wire;

pub use batch::{BATCH_MAGIC, pack, pack_into, packed_size, unpack, unpack_from};
pub use enums::{Direction, MoveResult, TileType};
pub use error::{Result, WireError};
pub use message::{
    Close, ErrorMessage, InitialParameters, Message, MessageType, MoveTo, Open,
    PresentCircumstances, Resign, TERMINATOR_TAG, Wait, read_messages,
};
pub use point::Point;
pub use wire::{MAX_LIST_LEN, MAX_STRING_LEN, WireEnum, WireReader, WireWriter};
