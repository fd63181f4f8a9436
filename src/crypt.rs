use crate::constants::{CRYPT_MARKER, SECTOR_SIZE, SPRITE_SIZE};

// XOR each byte with the low byte of the key, incrementing the key by one per byte.
// The transform is its own inverse.
pub fn crypt(window: &mut [u8], key: u32) {
    for (i, byte) in window.iter_mut().enumerate() {
        *byte ^= key.wrapping_add(i as u32) as u8;
    }
}

// Per-kind record keys for the extended format. Derived once from the map
// revision and shared by every record of that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordKeys {
    pub sector: u32,
    pub wall: u32,
    pub sprite: u32,
}

impl RecordKeys {
    pub fn from_revision(revision: u32) -> RecordKeys {
        let sector_key = revision.wrapping_mul(SECTOR_SIZE as u32);

        RecordKeys {
            sector: sector_key,
            wall: sector_key | CRYPT_MARKER,
            sprite: revision.wrapping_mul(SPRITE_SIZE as u32) | CRYPT_MARKER,
        }
    }
}
