use thiserror::Error;

// The kind of entity a count refers to, used for error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Sector,
    Wall,
    Sprite,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            EntityKind::Sector => write!(f, "sector"),
            EntityKind::Wall => write!(f, "wall"),
            EntityKind::Sprite => write!(f, "sprite"),
        }
    }
}

// Everything that can abort a map decode. None of these are recovered from
// internally; the caller decides what to do with a rejected file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    // Not even a signature or version fits in the buffer.
    #[error("map file too small: {len} bytes, need at least {need}")]
    FileTooSmall { len: usize, need: usize },

    // Extended decoding was asked for but the magic doesn't match.
    #[error("invalid map signature: 0x{found:08x}")]
    InvalidMapSignature { found: u32 },

    #[error("unsupported map version: 0x{version:x}")]
    UnsupportedMapVersion { version: i32 },

    #[error("invalid sector count: {count} exceeds capacity {capacity}")]
    InvalidSectorCount { count: usize, capacity: usize },

    #[error("invalid wall count: {count} exceeds capacity {capacity}")]
    InvalidWallCount { count: usize, capacity: usize },

    #[error("invalid sprite count: {count} exceeds capacity {capacity}")]
    InvalidSpriteCount { count: usize, capacity: usize },

    // A seek landed past the end of the buffer.
    #[error("seek to {pos} is out of bounds (buffer is {len} bytes)")]
    OutOfBounds { pos: usize, len: usize },

    // A read or skip ran off the end of the buffer.
    #[error("unexpected end of map data: wanted {wanted} bytes at {pos}, buffer is {len} bytes")]
    UnexpectedEnd {
        pos: usize,
        wanted: usize,
        len: usize,
    },
}

impl DecodeError {
    // Build the count error matching an entity kind
    pub fn invalid_count(kind: EntityKind, count: usize, capacity: usize) -> DecodeError {
        match kind {
            EntityKind::Sector => DecodeError::InvalidSectorCount { count, capacity },
            EntityKind::Wall => DecodeError::InvalidWallCount { count, capacity },
            EntityKind::Sprite => DecodeError::InvalidSpriteCount { count, capacity },
        }
    }

    // True for failures raised by the byte cursor
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            DecodeError::OutOfBounds { .. } | DecodeError::UnexpectedEnd { .. }
        )
    }
}
