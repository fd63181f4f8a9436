mod sectors;
mod sprites;
mod walls;

use serde::Serialize;
use std::fmt;
use tracing::{debug, trace, warn};

use crate::constants::{MAXSECTORS, MAXSPRITES, MAXWALLS};
use crate::crypt::{crypt, RecordKeys};
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, EntityKind};
use crate::format::MapFormat;
use crate::header::{read_sky_offsets, ClassicHeader, ExtendedHeader, ExtraSizes, StartPosition};

pub use crate::map::{
    sectors::{read_sector, Sector, SectorStat},
    sprites::{read_sprite, Sprite, SpriteStat},
    walls::{read_wall, Wall, WallStat},
};

// How many records of each kind a `World` can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub sectors: usize,
    pub walls: usize,
    pub sprites: usize,
}

impl Default for Capacity {
    fn default() -> Self {
        Capacity {
            sectors: MAXSECTORS,
            walls: MAXWALLS,
            sprites: MAXSPRITES,
        }
    }
}

// Caller owned, fixed capacity storage for the decoded geometry.
// Decoding overwrites a prefix of each array and reports its length in the
// returned `MapSummary`. Slots past that prefix are left as they were.
pub struct World {
    sectors: Box<[Sector]>,
    walls: Box<[Wall]>,
    sprites: Box<[Sprite]>,
}

impl World {
    // Storage sized to the engine limits
    pub fn new() -> World {
        World::with_capacity(Capacity::default())
    }

    pub fn with_capacity(capacity: Capacity) -> World {
        World {
            sectors: vec![Sector::default(); capacity.sectors].into_boxed_slice(),
            walls: vec![Wall::default(); capacity.walls].into_boxed_slice(),
            sprites: vec![Sprite::default(); capacity.sprites].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> Capacity {
        Capacity {
            sectors: self.sectors.len(),
            walls: self.walls.len(),
            sprites: self.sprites.len(),
        }
    }

    // Every slot, decoded or not
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    // The slots written by the decode that produced `summary`
    pub fn sectors_of(&self, summary: &MapSummary) -> &[Sector] {
        &self.sectors[..summary.numsectors.min(self.sectors.len())]
    }

    pub fn walls_of(&self, summary: &MapSummary) -> &[Wall] {
        &self.walls[..summary.numwalls.min(self.walls.len())]
    }

    pub fn sprites_of(&self, summary: &MapSummary) -> &[Sprite] {
        &self.sprites[..summary.numsprites.min(self.sprites.len())]
    }
}

impl Default for World {
    fn default() -> Self {
        World::new()
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "World: capacity {:?}", self.capacity())
    }
}

// Header values only present in the extended format
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtendedInfo {
    pub revision: u32,
    pub visibility: i32,
    pub sky_bits: i16,
    pub parallax_type: u8,
    pub song_id: u32,
    pub header_encrypted: bool,
    pub extra_sizes: ExtraSizes,
}

// What a successful decode returns besides the populated `World`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapSummary {
    pub format: MapFormat,
    pub start: StartPosition,
    pub numsectors: usize,
    pub numwalls: usize,
    pub numsprites: usize,
    pub extended: Option<ExtendedInfo>,
    pub pskyoff: Option<Vec<i16>>, // Sky offset table, extended format only
}

// Per record kind decode strategy: an optional decryption key and the size
// of the extra-data trailer skipped after records with a positive `extra`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordLayout {
    pub key: Option<u32>,
    pub trailer: u32,
}

impl RecordLayout {
    pub fn decrypt(&self, window: &mut [u8]) {
        if let Some(key) = self.key {
            crypt(window, key);
        }
    }

    pub fn skip_extra(&self, cursor: &mut ByteCursor, extra: i16) -> Result<(), DecodeError> {
        if self.trailer > 0 && extra > 0 {
            cursor.skip(self.trailer as usize)?;
        }

        Ok(())
    }
}

// The layouts of all three record kinds, fixed once the header is known
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordLayouts {
    pub sector: RecordLayout,
    pub wall: RecordLayout,
    pub sprite: RecordLayout,
}

impl RecordLayouts {
    pub fn new(format: MapFormat, revision: u32, extra_sizes: ExtraSizes) -> RecordLayouts {
        if !format.is_extended() {
            return RecordLayouts::default();
        }

        let keys = RecordKeys::from_revision(revision);
        debug!("Record keys for revision {}: {:x?}", revision, keys);

        let encrypted = format.is_encrypted();
        let layout = |key: u32, trailer: u32| RecordLayout {
            key: encrypted.then_some(key),
            trailer,
        };

        RecordLayouts {
            sector: layout(keys.sector, extra_sizes.sector),
            wall: layout(keys.wall, extra_sizes.wall),
            sprite: layout(keys.sprite, extra_sizes.sprite),
        }
    }
}

// Reject a declared count that doesn't fit the storage
pub fn check_count(kind: EntityKind, count: u16, capacity: usize) -> Result<usize, DecodeError> {
    let count = count as usize;
    if count > capacity {
        return Err(DecodeError::invalid_count(kind, count, capacity));
    }

    Ok(count)
}

// Decode `count` records into the front of `slots`. A slot is only written
// once its whole record, trailer included, has been read.
fn load_records<'a, T, F>(
    cursor: &mut ByteCursor<'a>,
    slots: &mut [T],
    count: usize,
    layout: &RecordLayout,
    read: F,
) -> Result<(), DecodeError>
where
    T: fmt::Debug,
    F: Fn(&mut ByteCursor<'a>, &RecordLayout) -> Result<T, DecodeError>,
{
    for (i, slot) in slots.iter_mut().take(count).enumerate() {
        let record = read(cursor, layout)?;
        trace!("Record {}: {:?}", i, record);
        *slot = record;
    }

    Ok(())
}

// Decode a map file held in memory into `world`.
pub fn decode(buffer: &[u8], world: &mut World) -> Result<MapSummary, DecodeError> {
    let mut cursor = ByteCursor::new(buffer);
    decode_from(&mut cursor, world)
}

// Same as decode, on a caller supplied cursor so its final position can be inspected.
// The format picked by the signature and version word drives the rest of the decode.
pub fn decode_from(cursor: &mut ByteCursor, world: &mut World) -> Result<MapSummary, DecodeError> {
    let format = MapFormat::detect(cursor)?;

    let summary = if format.is_extended() {
        let header = ExtendedHeader::read_fields(cursor, format)?;
        load_extended(cursor, world, header)?
    } else {
        let header = ClassicHeader::read_fields(cursor, format)?;
        load_classic(cursor, world, header)?
    };

    debug!(
        "Loaded {} sectors, {} walls, {} sprites",
        summary.numsectors, summary.numwalls, summary.numsprites
    );
    if cursor.remaining() > 0 {
        debug!("{} bytes left after the last sprite", cursor.remaining());
    }
    check_wall_ranges(world, &summary);

    Ok(summary)
}

// Decode a buffer that must be in the classic layout
pub fn decode_classic(
    cursor: &mut ByteCursor,
    world: &mut World,
) -> Result<MapSummary, DecodeError> {
    let header = ClassicHeader::read(cursor)?;
    load_classic(cursor, world, header)
}

// Decode a buffer that must be in the extended layout
pub fn decode_extended(
    cursor: &mut ByteCursor,
    world: &mut World,
) -> Result<MapSummary, DecodeError> {
    let header = ExtendedHeader::read(cursor)?;
    load_extended(cursor, world, header)
}

// Classic layout: each count directly precedes its own records
fn load_classic(
    cursor: &mut ByteCursor,
    world: &mut World,
    header: ClassicHeader,
) -> Result<MapSummary, DecodeError> {
    let layout = RecordLayout::default();
    let capacity = world.capacity();
    let World {
        sectors,
        walls,
        sprites,
    } = world;

    let numsectors = check_count(EntityKind::Sector, header.numsectors, capacity.sectors)?;
    load_records(cursor, sectors, numsectors, &layout, read_sector)?;

    let numwalls = check_count(EntityKind::Wall, cursor.read_u16()?, capacity.walls)?;
    load_records(cursor, walls, numwalls, &layout, read_wall)?;

    let numsprites = check_count(EntityKind::Sprite, cursor.read_u16()?, capacity.sprites)?;
    load_records(cursor, sprites, numsprites, &layout, read_sprite)?;

    Ok(MapSummary {
        format: header.format,
        start: header.start,
        numsectors,
        numwalls,
        numsprites,
        extended: None,
        pskyoff: None,
    })
}

// Extended layout: all counts live in the header and are checked before
// anything else is read
fn load_extended(
    cursor: &mut ByteCursor,
    world: &mut World,
    header: ExtendedHeader,
) -> Result<MapSummary, DecodeError> {
    let format = header.format;
    let capacity = world.capacity();

    let numsectors = check_count(EntityKind::Sector, header.numsectors, capacity.sectors)?;
    let numwalls = check_count(EntityKind::Wall, header.numwalls, capacity.walls)?;
    let numsprites = check_count(EntityKind::Sprite, header.numsprites, capacity.sprites)?;

    let extra_sizes = if format.is_encrypted() {
        ExtraSizes::read(cursor, header.numwalls)?
    } else {
        ExtraSizes::default()
    };

    let pskyoff = read_sky_offsets(cursor, header.sky_bits)?;
    let layouts = RecordLayouts::new(format, header.revision, extra_sizes);

    let World {
        sectors,
        walls,
        sprites,
    } = world;
    load_records(cursor, sectors, numsectors, &layouts.sector, read_sector)?;
    load_records(cursor, walls, numwalls, &layouts.wall, read_wall)?;
    load_records(cursor, sprites, numsprites, &layouts.sprite, read_sprite)?;

    Ok(MapSummary {
        format,
        start: header.start,
        numsectors,
        numwalls,
        numsprites,
        extended: Some(ExtendedInfo {
            revision: header.revision,
            visibility: header.visibility,
            sky_bits: header.sky_bits,
            parallax_type: header.parallax_type,
            song_id: header.song_id,
            header_encrypted: header.was_encrypted,
            extra_sizes,
        }),
        pskyoff,
    })
}

// Wall ranges aren't validated here, but a range running off the wall array is worth a warning
fn check_wall_ranges(world: &World, summary: &MapSummary) {
    for (i, sector) in world.sectors_of(summary).iter().enumerate() {
        let end = sector.wallptr as i64 + sector.wallnum as i64;
        if sector.wallptr < 0 || end > summary.numwalls as i64 {
            warn!(
                "Sector {} walls {}..{} are outside the {} decoded walls",
                i, sector.wallptr, end, summary.numwalls
            );
        }
    }
}
