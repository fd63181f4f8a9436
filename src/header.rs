use serde::Serialize;
use tracing::debug;

use crate::constants::{
    CRYPT_MARKER, CRYPT_MARKER_SWAPPED, EXTENDED_HEADER_SIZE, EXTENDED_MAGIC,
    EXTENDED_PREAMBLE_SIZE, EXTRA_HEADER_SIZE, EXTRA_SECTOR_SIZE_OFFSET, EXTRA_SPRITE_SIZE_OFFSET,
    EXTRA_WALL_SIZE_OFFSET, HEADER_MARKER_OFFSET, MAX_SKY_BITS, SIGNATURE_SIZE,
};
use crate::crypt::crypt;
use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::format::MapFormat;

// Where the player starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StartPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub ang: i16,    // 0..2047 is a full turn
    pub sector: i16, // Sector the start position is in
}

impl StartPosition {
    fn read(cursor: &mut ByteCursor) -> Result<StartPosition, DecodeError> {
        Ok(StartPosition {
            x: cursor.read_i32()?,
            y: cursor.read_i32()?,
            z: cursor.read_i32()?,
            ang: cursor.read_i16()?,
            sector: cursor.read_i16()?,
        })
    }
}

// Classic map header. The wall and sprite counts aren't part of it, they
// precede their own record blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicHeader {
    pub format: MapFormat,
    pub start: StartPosition,
    pub numsectors: u16,
}

impl ClassicHeader {
    // Read the header from the start of the buffer
    pub fn read(cursor: &mut ByteCursor) -> Result<ClassicHeader, DecodeError> {
        cursor.seek(0)?;
        let format = MapFormat::from_classic_version(cursor.read_i32()?)?;
        ClassicHeader::read_fields(cursor, format)
    }

    // Read the rest of the header once the version word has been classified
    pub fn read_fields(
        cursor: &mut ByteCursor,
        format: MapFormat,
    ) -> Result<ClassicHeader, DecodeError> {
        cursor.seek(SIGNATURE_SIZE)?;

        let header = ClassicHeader {
            format,
            start: StartPosition::read(cursor)?,
            numsectors: cursor.read_u16()?,
        };

        debug!("Classic header: {:?}", header);
        Ok(header)
    }
}

// Primary header of the extended format: the 37 bytes after the
// signature and version, decrypted if the marker field says so.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedHeader {
    pub format: MapFormat,
    pub start: StartPosition,
    pub sky_bits: i16,     // log2 of the sky offset table length
    pub visibility: i32,   // Ambient visibility
    pub song_id: u32,      // Doubles as the encryption marker
    pub parallax_type: u8, // Sky rendering style
    pub revision: u32,     // Map revision, seeds the record keys
    pub numsectors: u16,
    pub numwalls: u16,
    pub numsprites: u16,
    pub was_encrypted: bool, // True if the header had to be decrypted
}

// The header is stored in the clear only if the marker field holds 0, the
// marker, or the byte swapped marker. Checked on the raw bytes, before any
// decryption.
pub fn is_header_encrypted(raw: &[u8; EXTENDED_HEADER_SIZE]) -> bool {
    let marker = u32::from_le_bytes([
        raw[HEADER_MARKER_OFFSET],
        raw[HEADER_MARKER_OFFSET + 1],
        raw[HEADER_MARKER_OFFSET + 2],
        raw[HEADER_MARKER_OFFSET + 3],
    ]);

    !matches!(marker, 0 | CRYPT_MARKER | CRYPT_MARKER_SWAPPED)
}

impl ExtendedHeader {
    // Read signature, version and the primary header from the start of the buffer
    pub fn read(cursor: &mut ByteCursor) -> Result<ExtendedHeader, DecodeError> {
        if cursor.len() < EXTENDED_PREAMBLE_SIZE {
            return Err(DecodeError::FileTooSmall {
                len: cursor.len(),
                need: EXTENDED_PREAMBLE_SIZE,
            });
        }

        cursor.seek(0)?;
        let signature = cursor.read_u32()?;
        if signature != EXTENDED_MAGIC {
            return Err(DecodeError::InvalidMapSignature { found: signature });
        }

        let format = MapFormat::from_extended_version(cursor.read_u16()?)?;
        ExtendedHeader::read_fields(cursor, format)
    }

    // Read the primary header once the signature and version word have been classified
    pub fn read_fields(
        cursor: &mut ByteCursor,
        format: MapFormat,
    ) -> Result<ExtendedHeader, DecodeError> {
        cursor.seek(EXTENDED_PREAMBLE_SIZE)?;
        let mut raw = cursor.read_array::<EXTENDED_HEADER_SIZE>()?;
        let was_encrypted = is_header_encrypted(&raw);
        if was_encrypted {
            crypt(&mut raw, CRYPT_MARKER);
        }

        let header = ExtendedHeader::parse(format, &raw, was_encrypted)?;
        debug!("Extended header: {:?}", header);
        Ok(header)
    }

    // Pull the fields out of a decrypted header
    pub fn parse(
        format: MapFormat,
        raw: &[u8; EXTENDED_HEADER_SIZE],
        was_encrypted: bool,
    ) -> Result<ExtendedHeader, DecodeError> {
        let mut fields = ByteCursor::new(raw);

        Ok(ExtendedHeader {
            format,
            start: StartPosition::read(&mut fields)?,
            sky_bits: fields.read_i16()?,
            visibility: fields.read_i32()?,
            song_id: fields.read_u32()?,
            parallax_type: fields.read_u8()?,
            revision: fields.read_u32()?,
            numsectors: fields.read_u16()?,
            numwalls: fields.read_u16()?,
            numsprites: fields.read_u16()?,
            was_encrypted,
        })
    }
}

// Sizes of the extra-data trailers following records whose `extra` link is
// positive. Zero when the file carries no secondary header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtraSizes {
    pub sprite: u32,
    pub wall: u32,
    pub sector: u32,
}

impl ExtraSizes {
    // Read the 128 byte secondary header, keyed on the wall count
    pub fn read(cursor: &mut ByteCursor, numwalls: u16) -> Result<ExtraSizes, DecodeError> {
        let mut raw = cursor.read_array::<EXTRA_HEADER_SIZE>()?;
        crypt(&mut raw, numwalls as u32);

        let mut fields = ByteCursor::new(&raw);
        fields.seek(EXTRA_SPRITE_SIZE_OFFSET)?;
        let sprite = fields.read_u32()?;
        fields.seek(EXTRA_WALL_SIZE_OFFSET)?;
        let wall = fields.read_u32()?;
        fields.seek(EXTRA_SECTOR_SIZE_OFFSET)?;
        let sector = fields.read_u32()?;

        let sizes = ExtraSizes {
            sprite,
            wall,
            sector,
        };
        debug!("Extra data sizes: {:?}", sizes);
        Ok(sizes)
    }
}

// The sky offset table has 2^sky_bits entries and only exists for 1..=8 bits
pub fn read_sky_offsets(
    cursor: &mut ByteCursor,
    sky_bits: i16,
) -> Result<Option<Vec<i16>>, DecodeError> {
    if !(1..=MAX_SKY_BITS).contains(&sky_bits) {
        return Ok(None);
    }

    let count = 1usize << sky_bits;
    let mut offsets = Vec::with_capacity(count);
    for _ in 0..count {
        offsets.push(cursor.read_i16()?);
    }

    debug!("Read {} sky offsets", count);
    Ok(Some(offsets))
}
