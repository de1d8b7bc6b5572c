//! Calendar-string ID service.
//!
//! Renders raw snowflake ids as `YYYYMMDDHHMMSSmmmSSS` strings for callers
//! that persist identifiers as opaque text.

use std::sync::Arc;

use crate::config::CalendarZone;
use crate::domain::{CalendarId, SnowflakeId};
use crate::error::{AppError, Result};
use crate::service::clock::{SystemClock, TimeSource};
use crate::service::snowflake::SnowflakeGenerator;

/// Service for calendar-string ID generation.
pub struct FormattedService<C = SystemClock> {
    /// Shared raw id generator.
    generator: Arc<SnowflakeGenerator<C>>,
    /// Calendar the strings are rendered in.
    zone: CalendarZone,
}

impl<C: TimeSource> FormattedService<C> {
    /// Create a new formatted service.
    pub fn new(generator: Arc<SnowflakeGenerator<C>>, zone: CalendarZone) -> Self {
        Self { generator, zone }
    }

    /// Render an already allocated id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id's timestamp has no calendar representation.
    pub fn format(&self, id: SnowflakeId) -> Result<CalendarId> {
        let calendar = match self.zone {
            CalendarZone::Local => CalendarId::from_snowflake(id, &chrono::Local),
            CalendarZone::Utc => CalendarId::from_snowflake(id, &chrono::Utc),
        };
        calendar.ok_or_else(|| AppError::Internal(format!("id {id} has no calendar time")))
    }

    /// Allocate one calendar-string id.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock moved backwards.
    pub fn next_id(&self) -> Result<CalendarId> {
        let id = self.generator.next_id()?;
        self.format(id)
    }

    /// Allocate `count` calendar-string ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock moved backwards.
    pub fn generate(&self, count: u32) -> Result<Vec<CalendarId>> {
        let ids = self.generator.next_ids(count as usize)?;
        ids.into_iter().map(|id| self.format(id)).collect()
    }
}
