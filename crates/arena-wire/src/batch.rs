//! Batch framing
//!
//! A batch is one self-describing buffer: a 4-byte magic marker, a 4-byte
//! message count, each message with its tag, and a single zero terminator.
//! Unpacking validates the magic and the declared count strictly; any
//! failure discards the whole batch.

use std::io::{Read, Write};

use tracing::{debug, trace};

use crate::error::{Result, WireError};
use crate::message::{self, Message};
use crate::wire::{WireReader, WireWriter};

/// Marker bytes opening every packed batch
pub const BATCH_MAGIC: [u8; 4] = *b"BSCI";

/// Total encoded size of a batch: magic, count, tagged records, terminator.
///
/// Exposed so callers can pre-allocate transmission buffers.
pub fn packed_size(messages: &[Message]) -> usize {
    let payloads: usize = messages.iter().map(Message::payload_size).sum();
    BATCH_MAGIC.len() + 4 + messages.len() + payloads + 1
}

/// Packs messages into a fresh buffer sized by [`packed_size`]
pub fn pack(messages: &[Message]) -> Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(packed_size(messages));
    pack_into(&mut buffer, messages)?;
    Ok(buffer)
}

/// Packs messages into an arbitrary writer
pub fn pack_into<W: Write>(writer: W, messages: &[Message]) -> Result<()> {
    let mut writer = WireWriter::new(writer);
    writer.write_bytes(&BATCH_MAGIC)?;
    writer.write_u32(messages.len() as u32)?;
    for message in messages {
        message.write(&mut writer, true)?;
    }
    writer.write_u8(message::TERMINATOR_TAG)?;
    trace!("packed batch of {} messages", messages.len());
    Ok(())
}

/// Unpacks a batch buffer produced by [`pack`]
pub fn unpack(bytes: &[u8]) -> Result<Vec<Message>> {
    unpack_from(bytes)
}

/// Unpacks a batch from an arbitrary reader.
///
/// A declared count of zero yields an empty sequence without touching the
/// rest of the stream. Otherwise the body must hold exactly the declared
/// number of messages before the terminator or end-of-stream.
pub fn unpack_from<R: Read>(reader: R) -> Result<Vec<Message>> {
    let mut reader = WireReader::new(reader);

    let found = reader.read_array::<4>("batch magic")?;
    if found != BATCH_MAGIC {
        return Err(WireError::InvalidHeader { found });
    }

    let declared = reader.read_u32("message count")?;
    if declared == 0 {
        return Ok(Vec::new());
    }

    let messages = message::read_messages(&mut reader, Some(declared as usize))?;
    if messages.is_empty() {
        return Err(WireError::EmptyBatch { declared });
    }
    if messages.len() as u32 != declared {
        return Err(WireError::CountMismatch {
            declared,
            decoded: messages.len() as u32,
        });
    }

    debug!("unpacked batch of {} messages", messages.len());
    Ok(messages)
}
