//! Service layer module.
//!
//! Contains the identifier generator and its presentation forms.

pub mod clock;
pub mod formatted;
pub mod snowflake;

pub use clock::{SystemClock, TimeSource};
pub use formatted::FormattedService;
pub use snowflake::{SharedGenerator, SnowflakeGenerator};
