//! Time sources for the generator.

/// Source of the current time in Unix milliseconds.
///
/// The generator reads time only through this trait so tests can freeze,
/// step or rewind the clock.
pub trait TimeSource: Send + Sync {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> i64;
}

/// Wall clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn current_millis(&self) -> i64 {
        (**self).current_millis()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_tracks_wall_time() {
        let clock = SystemClock;
        let before = chrono::Utc::now().timestamp_millis();
        let now = clock.current_millis();
        let after = chrono::Utc::now().timestamp_millis();

        assert!(now >= before);
        assert!(now <= after);
    }
}
