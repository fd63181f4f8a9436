//! Loader for Build engine map files.
//!
//! Two layouts are understood: the classic versioned layout (versions 7, 8
//! and 9) and the signed extended layout, which can encrypt its records with
//! a rolling XOR key and append extra-data trailers to them. Decoding fills a
//! caller owned [`World`] and returns a [`MapSummary`].

pub mod constants;
pub mod crypt;
pub mod cursor;
pub mod error;
pub mod format;
pub mod header;
pub mod map;

pub use crate::cursor::ByteCursor;
pub use crate::error::{DecodeError, EntityKind};
pub use crate::format::MapFormat;
pub use crate::header::{ExtraSizes, StartPosition};
pub use crate::map::{
    decode, decode_from, Capacity, ExtendedInfo, MapSummary, Sector, SectorStat, Sprite,
    SpriteStat, Wall, WallStat, World,
};
