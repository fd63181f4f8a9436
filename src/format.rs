use serde::Serialize;
use tracing::debug;

use crate::constants::{
    CLASSIC_VERSIONS, EXTENDED_ENCRYPTED_SUBVERSION, EXTENDED_MAGIC, EXTENDED_PREAMBLE_SIZE,
    EXTENDED_VERSION_FAMILY, SIGNATURE_SIZE,
};
use crate::cursor::ByteCursor;
use crate::error::DecodeError;

// The map layouts the decoder understands. Selected once per file; each
// variant fixes how records are read for the rest of the decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapFormat {
    Classic { version: i32 },           // Plain layout, no signature
    ExtendedPlain { version: u16 },     // Signed layout with cleartext records
    ExtendedEncrypted { version: u16 }, // Signed layout with encrypted records and extra-data sizes
}

impl MapFormat {
    // Look at the start of the buffer and work out which decoder applies.
    // The cursor is left just after the signature/version words.
    pub fn detect(cursor: &mut ByteCursor) -> Result<MapFormat, DecodeError> {
        if cursor.len() < SIGNATURE_SIZE {
            return Err(DecodeError::FileTooSmall {
                len: cursor.len(),
                need: SIGNATURE_SIZE,
            });
        }

        cursor.seek(0)?;
        let signature = cursor.read_u32()?;

        let format = if signature == EXTENDED_MAGIC {
            if cursor.len() < EXTENDED_PREAMBLE_SIZE {
                return Err(DecodeError::FileTooSmall {
                    len: cursor.len(),
                    need: EXTENDED_PREAMBLE_SIZE,
                });
            }
            MapFormat::from_extended_version(cursor.read_u16()?)?
        } else {
            // No signature: the first four bytes are the classic version number
            MapFormat::from_classic_version(signature as i32)?
        };

        debug!("Detected map format {:?}", format);
        Ok(format)
    }

    pub fn from_classic_version(version: i32) -> Result<MapFormat, DecodeError> {
        if !CLASSIC_VERSIONS.contains(&version) {
            return Err(DecodeError::UnsupportedMapVersion { version });
        }

        Ok(MapFormat::Classic { version })
    }

    // Only the family byte is checked, the low byte picks the sub-version
    pub fn from_extended_version(version: u16) -> Result<MapFormat, DecodeError> {
        let [low, high] = version.to_le_bytes();

        if high != EXTENDED_VERSION_FAMILY {
            return Err(DecodeError::UnsupportedMapVersion {
                version: version as i32,
            });
        }

        if low == EXTENDED_ENCRYPTED_SUBVERSION {
            Ok(MapFormat::ExtendedEncrypted { version })
        } else {
            Ok(MapFormat::ExtendedPlain { version })
        }
    }

    pub fn version(&self) -> i32 {
        match self {
            MapFormat::Classic { version } => *version,
            MapFormat::ExtendedPlain { version } | MapFormat::ExtendedEncrypted { version } => {
                *version as i32
            }
        }
    }

    pub fn is_extended(&self) -> bool {
        !matches!(self, MapFormat::Classic { .. })
    }

    // Records are encrypted and followed by extra data only in this sub-version
    pub fn is_encrypted(&self) -> bool {
        matches!(self, MapFormat::ExtendedEncrypted { .. })
    }
}
