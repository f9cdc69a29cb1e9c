//! Grid position struct

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::wire::{WireReader, WireWriter};

/// Signed 2D grid position.
///
/// Encoded as x then y, little-endian, with no tag or length prefix.
/// Targeted actions use it as an offset relative to the acting bot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    /// Encoded size in bytes
    pub const SIZE: usize = 4;

    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    pub fn decode<R: Read>(reader: &mut WireReader<R>) -> Result<Self> {
        let x = reader.read_i16("Point.x")?;
        let y = reader.read_i16("Point.y")?;
        Ok(Self { x, y })
    }

    pub fn write<W: Write>(&self, writer: &mut WireWriter<W>) -> Result<()> {
        writer.write_i16(self.x)?;
        writer.write_i16(self.y)?;
        Ok(())
    }
}
