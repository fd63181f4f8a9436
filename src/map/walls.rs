use bitflags::bitflags;
use serde::Serialize;

use crate::constants::WALL_SIZE;
use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::map::RecordLayout;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WallStat: u16 {
        const BLOCKING = 1 << 0;
        const SWAP_BOTTOMS = 1 << 1;
        const ALIGN_BOTTOM = 1 << 2;
        const FLIP_X = 1 << 3;
        const MASKED = 1 << 4;
        const ONE_WAY = 1 << 5;
        const HITSCAN = 1 << 6;
        const TRANSLUCENT = 1 << 7;
        const FLIP_Y = 1 << 8;
        const TRANSLUCENT_REVERSED = 1 << 9;
    }
}

// One directed edge of a sector; point2 is the wall holding the far endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Wall {
    pub x: i32,
    pub y: i32,
    pub point2: i16,
    pub nextwall: i16,   // Wall on the other side, -1 if none
    pub nextsector: i16, // Sector on the other side, -1 if none
    pub cstat: u16,
    pub picnum: i16,
    pub overpicnum: i16, // Masked or one-way texture
    pub shade: i8,
    pub pal: u8,
    pub xrepeat: u8,
    pub yrepeat: u8,
    pub xpanning: u8,
    pub ypanning: u8,
    pub lotag: i16,
    pub hitag: i16,
    pub extra: i16,
}

impl Wall {
    pub fn parse(raw: &[u8; WALL_SIZE]) -> Result<Wall, DecodeError> {
        let mut f = ByteCursor::new(raw);

        Ok(Wall {
            x: f.read_i32()?,
            y: f.read_i32()?,
            point2: f.read_i16()?,
            nextwall: f.read_i16()?,
            nextsector: f.read_i16()?,
            cstat: f.read_u16()?,
            picnum: f.read_i16()?,
            overpicnum: f.read_i16()?,
            shade: f.read_i8()?,
            pal: f.read_u8()?,
            xrepeat: f.read_u8()?,
            yrepeat: f.read_u8()?,
            xpanning: f.read_u8()?,
            ypanning: f.read_u8()?,
            lotag: f.read_i16()?,
            hitag: f.read_i16()?,
            extra: f.read_i16()?,
        })
    }

    pub fn stat(&self) -> WallStat {
        WallStat::from_bits_retain(self.cstat)
    }

    // A red wall, i.e. a portal into another sector
    pub fn is_two_sided(&self) -> bool {
        self.nextsector >= 0
    }
}

pub fn read_wall(cursor: &mut ByteCursor, layout: &RecordLayout) -> Result<Wall, DecodeError> {
    let mut raw = cursor.read_array::<WALL_SIZE>()?;
    layout.decrypt(&mut raw);

    let wall = Wall::parse(&raw)?;
    layout.skip_extra(cursor, wall.extra)?;

    Ok(wall)
}
