//! Identifier generator configuration.

use serde::Deserialize;

/// Calendar used to render calendar-string ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarZone {
    /// The host's local time zone.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
}

/// Generator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Machine identity stamped into every id (0..=1023).
    #[serde(default = "default_machine_id")]
    pub machine_id: i64,

    /// Calendar for the string form.
    #[serde(default)]
    pub calendar_zone: CalendarZone,
}

const fn default_machine_id() -> i64 {
    1
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            machine_id: default_machine_id(),
            calendar_zone: CalendarZone::default(),
        }
    }
}
