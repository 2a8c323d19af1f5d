//! Identity types for stockroom records
//!
//! Records are keyed by 12-byte identifiers rendered as 24 lowercase hex
//! characters, the same shape document stores hand out. Layout:
//! 4-byte big-endian Unix seconds, 5 process-random bytes, 3-byte counter.

use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::IdentifierError;

/// Length of the hex rendering of a [`RecordId`].
pub const RECORD_ID_HEX_LEN: usize = 24;

static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(|| rand::rng().random());

static COUNTER: Lazy<AtomicU32> = Lazy::new(|| AtomicU32::new(rand::rng().random()));

/// Store-native record identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId([u8; 12]);

impl RecordId {
    /// Generate a fresh identifier. Unique within the process.
    pub fn generate() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..12].copy_from_slice(&count.to_be_bytes()[1..4]);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Parse the 24-character hex form. Either case is accepted.
    pub fn parse(input: &str) -> Result<Self, IdentifierError> {
        if input.len() != RECORD_ID_HEX_LEN {
            return Err(IdentifierError::Length {
                value: input.to_string(),
                len: input.len(),
            });
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(input, &mut bytes).map_err(|_| IdentifierError::NotHex {
            value: input.to_string(),
        })?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.to_hex())
    }
}

impl FromStr for RecordId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// TYPED IDENTIFIERS
// ============================================================================

/// Identifier newtypes that know which record kind they address.
pub trait RecordIdType:
    Copy + Eq + std::hash::Hash + fmt::Display + fmt::Debug + Send + Sync + 'static
{
    /// Human name used in error messages ("component", "product", ...).
    const ENTITY_NAME: &'static str;

    fn new(id: RecordId) -> Self;

    fn record_id(&self) -> RecordId;

    fn generate() -> Self {
        Self::new(RecordId::generate())
    }

    fn parse(input: &str) -> Result<Self, IdentifierError> {
        RecordId::parse(input).map(Self::new)
    }
}

macro_rules! define_record_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(RecordId);

        impl RecordIdType for $name {
            const ENTITY_NAME: &'static str = $entity;

            fn new(id: RecordId) -> Self {
                Self(id)
            }

            fn record_id(&self) -> RecordId {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as RecordIdType>::parse(s)
            }
        }

        impl From<RecordId> for $name {
            fn from(id: RecordId) -> Self {
                Self(id)
            }
        }
    };
}

define_record_id!(
    /// Identifier of a standalone library component.
    ComponentId,
    "component"
);
define_record_id!(
    /// Identifier of a product.
    ProductId,
    "product"
);
define_record_id!(
    /// Identifier of a component entry embedded in a product.
    EntryId,
    "product component"
);
