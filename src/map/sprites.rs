use bitflags::bitflags;
use serde::Serialize;

use crate::constants::SPRITE_SIZE;
use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::map::RecordLayout;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SpriteStat: u16 {
        const BLOCKING = 1 << 0;
        const TRANSLUCENT = 1 << 1;
        const FLIP_X = 1 << 2;
        const FLIP_Y = 1 << 3;
        const WALL_ALIGNED = 1 << 4;
        const FLOOR_ALIGNED = 1 << 5;
        const ONE_SIDED = 1 << 6;
        const CENTERED = 1 << 7;
        const HITSCAN = 1 << 8;
        const TRANSLUCENT_REVERSED = 1 << 9;
        const INVISIBLE = 1 << 15;
    }
}

// A placed object. z uses a finer scale than x and y.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Sprite {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub cstat: u16,
    pub picnum: i16,
    pub shade: i8,
    pub pal: u8,
    pub clipdist: u8,
    pub blend: u8,
    pub xrepeat: u8,
    pub yrepeat: u8,
    pub xoffset: i8,
    pub yoffset: i8,
    pub sectnum: i16, // Owning sector
    pub statnum: i16, // Status list
    pub ang: i16,     // 0..2047 is a full turn
    pub owner: i16,
    pub xvel: i16,
    pub yvel: i16,
    pub zvel: i16,
    pub lotag: i16,
    pub hitag: i16,
    pub extra: i16,
}

impl Sprite {
    pub fn parse(raw: &[u8; SPRITE_SIZE]) -> Result<Sprite, DecodeError> {
        let mut f = ByteCursor::new(raw);

        Ok(Sprite {
            x: f.read_i32()?,
            y: f.read_i32()?,
            z: f.read_i32()?,
            cstat: f.read_u16()?,
            picnum: f.read_i16()?,
            shade: f.read_i8()?,
            pal: f.read_u8()?,
            clipdist: f.read_u8()?,
            blend: f.read_u8()?,
            xrepeat: f.read_u8()?,
            yrepeat: f.read_u8()?,
            xoffset: f.read_i8()?,
            yoffset: f.read_i8()?,
            sectnum: f.read_i16()?,
            statnum: f.read_i16()?,
            ang: f.read_i16()?,
            owner: f.read_i16()?,
            xvel: f.read_i16()?,
            yvel: f.read_i16()?,
            zvel: f.read_i16()?,
            lotag: f.read_i16()?,
            hitag: f.read_i16()?,
            extra: f.read_i16()?,
        })
    }

    pub fn stat(&self) -> SpriteStat {
        SpriteStat::from_bits_retain(self.cstat)
    }
}

pub fn read_sprite(cursor: &mut ByteCursor, layout: &RecordLayout) -> Result<Sprite, DecodeError> {
    let mut raw = cursor.read_array::<SPRITE_SIZE>()?;
    layout.decrypt(&mut raw);

    let sprite = Sprite::parse(&raw)?;
    layout.skip_extra(cursor, sprite.extra)?;

    Ok(sprite)
}
