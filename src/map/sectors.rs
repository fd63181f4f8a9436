use bitflags::bitflags;
use serde::Serialize;

use crate::constants::SECTOR_SIZE;
use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::map::RecordLayout;

bitflags! {
    // Ceiling and floor stat bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SectorStat: u16 {
        const PARALLAX = 1 << 0;
        const SLOPED = 1 << 1;
        const SWAP_XY = 1 << 2;
        const DOUBLE_SMOOSH = 1 << 3;
        const FLIP_X = 1 << 4;
        const FLIP_Y = 1 << 5;
        const ALIGN_FIRST_WALL = 1 << 6;
        const MASKED = 1 << 7;
        const TRANSLUCENT = 1 << 8;
    }
}

// A closed region bounded by walls[wallptr..wallptr + wallnum]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Sector {
    pub wallptr: i16,  // First wall in the global wall array
    pub wallnum: i16,  // Number of walls
    pub ceilingz: i32, // Heights in z units, z grows downwards
    pub floorz: i32,
    pub ceilingstat: u16,
    pub floorstat: u16,
    pub ceilingpicnum: i16,
    pub ceilingheinum: i16, // Slope
    pub ceilingshade: i8,
    pub ceilingpal: u8,
    pub ceilingxpanning: u8,
    pub ceilingypanning: u8,
    pub floorpicnum: i16,
    pub floorheinum: i16,
    pub floorshade: i8,
    pub floorpal: u8,
    pub floorxpanning: u8,
    pub floorypanning: u8,
    pub visibility: u8,
    pub fogpal: u8,
    pub lotag: i16,
    pub hitag: i16,
    pub extra: i16, // >0 links to an extra-data record
}

impl Sector {
    // Extract the fields of a decrypted 40 byte record
    pub fn parse(raw: &[u8; SECTOR_SIZE]) -> Result<Sector, DecodeError> {
        let mut f = ByteCursor::new(raw);

        Ok(Sector {
            wallptr: f.read_i16()?,
            wallnum: f.read_i16()?,
            ceilingz: f.read_i32()?,
            floorz: f.read_i32()?,
            ceilingstat: f.read_u16()?,
            floorstat: f.read_u16()?,
            ceilingpicnum: f.read_i16()?,
            ceilingheinum: f.read_i16()?,
            ceilingshade: f.read_i8()?,
            ceilingpal: f.read_u8()?,
            ceilingxpanning: f.read_u8()?,
            ceilingypanning: f.read_u8()?,
            floorpicnum: f.read_i16()?,
            floorheinum: f.read_i16()?,
            floorshade: f.read_i8()?,
            floorpal: f.read_u8()?,
            floorxpanning: f.read_u8()?,
            floorypanning: f.read_u8()?,
            visibility: f.read_u8()?,
            fogpal: f.read_u8()?,
            lotag: f.read_i16()?,
            hitag: f.read_i16()?,
            extra: f.read_i16()?,
        })
    }

    pub fn ceiling_stat(&self) -> SectorStat {
        SectorStat::from_bits_retain(self.ceilingstat)
    }

    pub fn floor_stat(&self) -> SectorStat {
        SectorStat::from_bits_retain(self.floorstat)
    }
}

pub fn read_sector(cursor: &mut ByteCursor, layout: &RecordLayout) -> Result<Sector, DecodeError> {
    let mut raw = cursor.read_array::<SECTOR_SIZE>()?;
    layout.decrypt(&mut raw);

    let sector = Sector::parse(&raw)?;
    layout.skip_extra(cursor, sector.extra)?;

    Ok(sector)
}
