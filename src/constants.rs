// Extended format signature, "BLM\x1a" read as a little-endian u32
pub const EXTENDED_MAGIC: u32 = 0x1a4d4c42;

// The extended format's version word: high byte is the family, low byte the sub-version
pub const EXTENDED_VERSION_FAMILY: u8 = 0x07;
pub const EXTENDED_ENCRYPTED_SUBVERSION: u8 = 0x00;

// Classic format versions, stored as the first i32 of the file
pub const CLASSIC_VERSIONS: [i32; 3] = [7, 8, 9];

// Header marker. Also the key used to decrypt the primary header.
pub const CRYPT_MARKER: u32 = 0x7474614d; // "Matt"
pub const CRYPT_MARKER_SWAPPED: u32 = 0x4d617474;

// Fixed sizes in bytes
pub const SIGNATURE_SIZE: usize = 4;
pub const EXTENDED_PREAMBLE_SIZE: usize = 6; // Signature + version
pub const CLASSIC_HEADER_SIZE: usize = 22; // Version up to and including numsectors
pub const EXTENDED_HEADER_SIZE: usize = 37;
pub const EXTRA_HEADER_SIZE: usize = 128;
pub const SECTOR_SIZE: usize = 40;
pub const WALL_SIZE: usize = 32;
pub const SPRITE_SIZE: usize = 44;

// Offsets inside the extended primary header
pub const HEADER_MARKER_OFFSET: usize = 22;

// Offsets inside the 128 byte secondary header
pub const EXTRA_SPRITE_SIZE_OFFSET: usize = 64;
pub const EXTRA_WALL_SIZE_OFFSET: usize = 68;
pub const EXTRA_SECTOR_SIZE_OFFSET: usize = 72;

// A sky offset table is only present for 1..=8 sky bits
pub const MAX_SKY_BITS: i16 = 8;

// Engine storage capacities
pub const MAXSECTORS: usize = 4096;
pub const MAXWALLS: usize = 16384;
pub const MAXSPRITES: usize = 16384;
