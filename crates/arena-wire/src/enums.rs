//! Wire enumerations
//!
//! Each enumeration travels as its ordinal in a single byte. Ordinals are
//! part of the wire contract and never change between releases.

use serde::{Deserialize, Serialize};

use crate::wire::WireEnum;

/// Outcome of the move submitted on the previous turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum MoveResult {
    /// The move worked (attack hit, step taken)
    #[default]
    Succeeded = 0,
    /// The move did not work (attack missed, walked into a wall)
    Failed = 1,
    /// The move was not allowed by the engine (out of range, diagonal step while disabled)
    Invalid = 2,
    /// The move was not understood (malformed message, missing data)
    Error = 3,
}

impl WireEnum for MoveResult {
    const WIRE_NAME: &'static str = "MoveResult";

    fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Succeeded),
            1 => Some(Self::Failed),
            2 => Some(Self::Invalid),
            3 => Some(Self::Error),
            _ => None,
        }
    }

    fn to_u8(self) -> u8 {
        self as u8
    }
}

/// What occupies a tile, as far as the observing bot can tell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileType {
    /// Unknown contents; off the map edge or hidden behind a wall
    #[default]
    Void = 0,
    /// Open space a bot can move to
    Floor = 1,
    /// Door space that can be passed through or targeted with a close action
    OpenDoor = 2,
    /// Impassable door space that can be targeted with an open action
    ClosedDoor = 3,
    /// Impassable space
    Wall = 4,
}

impl WireEnum for TileType {
    const WIRE_NAME: &'static str = "TileType";

    fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Void),
            1 => Some(Self::Floor),
            2 => Some(Self::OpenDoor),
            3 => Some(Self::ClosedDoor),
            4 => Some(Self::Wall),
            _ => None,
        }
    }

    fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Compass direction for movement, clockwise from north
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    #[default]
    North = 0,
    Northeast = 1,
    East = 2,
    Southeast = 3,
    South = 4,
    Southwest = 5,
    West = 6,
    Northwest = 7,
}

impl WireEnum for Direction {
    const WIRE_NAME: &'static str = "Direction";

    fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::North),
            1 => Some(Self::Northeast),
            2 => Some(Self::East),
            3 => Some(Self::Southeast),
            4 => Some(Self::South),
            5 => Some(Self::Southwest),
            6 => Some(Self::West),
            7 => Some(Self::Northwest),
            _ => None,
        }
    }

    fn to_u8(self) -> u8 {
        self as u8
    }
}
