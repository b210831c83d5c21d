//! Store-assigned document identifiers.
//!
//! Layout (12 bytes, rendered as 24 lowercase hex characters):
//!
//! ```text
//! | seconds since epoch (4, BE) | process random (5) | counter (3, BE) |
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const COUNTER_MASK: u32 = 0x00FF_FFFF;

/// Counter starts in the lower half so it cannot wrap within one second
/// before 2^23 identifiers have been issued.
const COUNTER_SEED_MASK: u32 = 0x007F_FFFF;

/// Rejected identifier text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not a valid ObjectId, it must be a 12-byte input or a 24-character hex string")]
pub struct InvalidObjectId {
    pub input: String,
}

/// 12-byte document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; 12]);

fn process_unique() -> &'static [u8; 5] {
    static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    PROCESS_UNIQUE.get_or_init(rand::random::<[u8; 5]>)
}

fn next_counter() -> u32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER
        .get_or_init(|| AtomicU32::new(counter_seed()))
        .fetch_add(1, Ordering::SeqCst)
        & COUNTER_MASK
}

fn counter_seed() -> u32 {
    rand::random::<u32>() & COUNTER_SEED_MASK
}

impl ObjectId {
    /// Generates a fresh identifier for the current time.
    pub fn new() -> Self {
        Self::with_timestamp(Utc::now().timestamp() as u32)
    }

    fn with_timestamp(seconds: u32) -> Self {
        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(process_unique());
        bytes[9..12].copy_from_slice(&next_counter().to_be_bytes()[1..4]);
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Parses a 24-character hex string (either case).
    pub fn parse_str(input: &str) -> Result<Self, InvalidObjectId> {
        let invalid = || InvalidObjectId {
            input: input.to_string(),
        };

        if input.len() != 24 || !input.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut bytes = [0u8; 12];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&input[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(bytes))
    }

    /// Creation time encoded in the identifier.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let seconds = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        Utc.timestamp_opt(i64::from(seconds), 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_str(&s).map_err(serde::de::Error::custom)
    }
}
