//! Identifier layout.
//!
//! A raw identifier is a 63-bit value packed as:
//!
//! ```text
//!  62                              22 21          12 11           0
//! ┌──────────────────────────────────┬──────────────┬──────────────┐
//! │ milliseconds since EPOCH (41)    │ machine (10) │ sequence (12)│
//! └──────────────────────────────────┴──────────────┴──────────────┘
//! ```
//!
//! The calendar form renders the same value as `YYYYMMDDHHMMSSmmmSSS`.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::IdError;

/// Custom epoch: 2024-01-01T00:00:00Z in Unix milliseconds.
pub const EPOCH: i64 = 1_704_067_200_000;

/// Width of the timestamp component.
pub const TIMESTAMP_BITS: u8 = 41;

/// Width of the machine identity component.
pub const MACHINE_ID_BITS: u8 = 10;

/// Width of the per-millisecond sequence component.
pub const SEQUENCE_BITS: u8 = 12;

/// Largest accepted machine identity (1023).
pub const MAX_MACHINE_ID: i64 = (1 << MACHINE_ID_BITS) - 1;

/// Mask for the sequence component (4095).
pub const SEQUENCE_MASK: u16 = (1 << SEQUENCE_BITS) - 1;

const MACHINE_ID_SHIFT: u8 = SEQUENCE_BITS;
const TIMESTAMP_SHIFT: u8 = SEQUENCE_BITS + MACHINE_ID_BITS;
const TIMESTAMP_MASK: i64 = (1 << TIMESTAMP_BITS) - 1;

/// Machine identity used when none is configured.
pub const DEFAULT_MACHINE_ID: MachineId = MachineId(1);

/// Validated machine identity in `0..=1023`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MachineId(u16);

impl MachineId {
    /// Get the identity as a `u16`.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<i64> for MachineId {
    type Error = IdError;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (0..=MAX_MACHINE_ID).contains(&value) {
            Ok(Self(value as u16))
        } else {
            Err(IdError::InvalidMachineId(value))
        }
    }
}

impl Default for MachineId {
    fn default() -> Self {
        DEFAULT_MACHINE_ID
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A raw 63-bit identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SnowflakeId(i64);

impl SnowflakeId {
    /// Pack a Unix millisecond timestamp, machine identity and sequence.
    ///
    /// `timestamp_millis` is expected to be at or after [`EPOCH`].
    #[must_use]
    pub const fn compose(timestamp_millis: i64, machine_id: MachineId, sequence: u16) -> Self {
        let elapsed = timestamp_millis - EPOCH;
        Self(
            (elapsed << TIMESTAMP_SHIFT)
                | ((machine_id.0 as i64) << MACHINE_ID_SHIFT)
                | ((sequence & SEQUENCE_MASK) as i64),
        )
    }

    /// Wrap an already-packed value.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Get the packed value.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Milliseconds since [`EPOCH`] stored in bits 22-62.
    #[must_use]
    pub const fn elapsed_millis(self) -> i64 {
        (self.0 >> TIMESTAMP_SHIFT) & TIMESTAMP_MASK
    }

    /// Allocation time in Unix milliseconds.
    #[must_use]
    pub const fn timestamp_millis(self) -> i64 {
        self.elapsed_millis() + EPOCH
    }

    /// Machine identity stored in bits 12-21.
    #[must_use]
    pub const fn machine_id(self) -> u16 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let machine = ((self.0 >> MACHINE_ID_SHIFT) & MAX_MACHINE_ID) as u16;
        machine
    }

    /// Sequence stored in bits 0-11.
    #[must_use]
    pub const fn sequence(self) -> u16 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let sequence = (self.0 & SEQUENCE_MASK as i64) as u16;
        sequence
    }

    /// Allocation time as a UTC datetime.
    #[must_use]
    pub fn created_at(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_millis())
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.0
    }
}

/// Calendar-string identifier, `YYYYMMDDHHMMSSmmmSSS`.
///
/// `SSS` is the sequence modulo 1000, so sequences from 1000 upward lose
/// their leading digit. Uniqueness is carried by the raw id, not this string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CalendarId(String);

impl CalendarId {
    /// Length of every calendar id.
    pub const LEN: usize = 20;

    /// Render `id` in the calendar of `tz`.
    ///
    /// Returns `None` if the timestamp cannot be represented as a datetime.
    pub fn from_snowflake<Tz: TimeZone>(id: SnowflakeId, tz: &Tz) -> Option<Self>
    where
        Tz::Offset: fmt::Display,
    {
        let local = id.created_at()?.with_timezone(tz);
        let suffix = id.sequence() % 1000;
        Some(Self(format!(
            "{}{suffix:03}",
            local.format("%Y%m%d%H%M%S%3f")
        )))
    }

    /// Borrow the string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CalendarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
