//! Snowflake ID generator.
//!
//! Allocates raw 63-bit identifiers for one machine identity. Allocation is
//! serialized behind a single mutex; when 4096 identifiers have been handed
//! out within one millisecond the caller spins, still holding the lock,
//! until the clock reaches the next millisecond.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::domain::id::{MachineId, SEQUENCE_MASK, SnowflakeId};
use crate::error::{IdError, IdResult};
use crate::service::clock::{SystemClock, TimeSource};

/// Mutable allocation state.
#[derive(Debug)]
struct GeneratorState {
    /// Identity stamped into every id.
    machine_id: MachineId,
    /// Unix millisecond of the last allocation.
    last_timestamp: i64,
    /// Allocations so far within `last_timestamp`.
    sequence: u16,
}

impl GeneratorState {
    const fn new(machine_id: MachineId) -> Self {
        Self {
            machine_id,
            last_timestamp: 0,
            sequence: 0,
        }
    }
}

/// Process-wide identifier generator.
///
/// Construct one at startup and share it by `Arc`.
pub struct SnowflakeGenerator<C = SystemClock> {
    clock: C,
    state: Mutex<GeneratorState>,
}

impl SnowflakeGenerator<SystemClock> {
    /// Create a generator on the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidMachineId`] if `machine_id` is outside `0..=1023`.
    pub fn new(machine_id: i64) -> IdResult<Self> {
        Self::with_clock(machine_id, SystemClock)
    }
}

/// Generator over a type-erased clock, as held by the HTTP layer.
pub type SharedGenerator = SnowflakeGenerator<Arc<dyn TimeSource>>;

impl SharedGenerator {
    /// Create a shared generator on the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidMachineId`] if `machine_id` is outside `0..=1023`.
    pub fn system(machine_id: i64) -> IdResult<Self> {
        Self::with_clock(machine_id, Arc::new(SystemClock))
    }
}

impl Default for SnowflakeGenerator<SystemClock> {
    fn default() -> Self {
        Self::from_machine_id(MachineId::default(), SystemClock)
    }
}

impl<C: TimeSource> SnowflakeGenerator<C> {
    /// Create a generator reading time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidMachineId`] if `machine_id` is outside `0..=1023`.
    pub fn with_clock(machine_id: i64, clock: C) -> IdResult<Self> {
        let machine_id = MachineId::try_from(machine_id)?;
        Ok(Self::from_machine_id(machine_id, clock))
    }

    /// Create a generator from an already validated identity.
    pub fn from_machine_id(machine_id: MachineId, clock: C) -> Self {
        Self {
            clock,
            state: Mutex::new(GeneratorState::new(machine_id)),
        }
    }

    /// Replace the machine identity and reset all allocation state.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidMachineId`] if `machine_id` is outside
    /// `0..=1023`; the current state is left untouched in that case.
    pub fn configure(&self, machine_id: i64) -> IdResult<()> {
        let machine_id = MachineId::try_from(machine_id)?;
        *self.state.lock() = GeneratorState::new(machine_id);
        info!(%machine_id, "Snowflake generator configured");
        Ok(())
    }

    /// Currently configured machine identity.
    pub fn machine_id(&self) -> MachineId {
        self.state.lock().machine_id
    }

    /// Allocate the next identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::ClockRegression`] if the clock reads earlier than
    /// the previous allocation. No id is produced and state is unchanged.
    pub fn next_id(&self) -> IdResult<SnowflakeId> {
        let mut state = self.state.lock();

        let mut now = self.clock.current_millis();
        if now < state.last_timestamp {
            error!(
                last = state.last_timestamp,
                now, "Clock moved backwards, refusing to allocate"
            );
            metrics::counter!("timeline_clock_regressions_total").increment(1);
            return Err(IdError::ClockRegression {
                last: state.last_timestamp,
                now,
            });
        }

        if now == state.last_timestamp {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                debug!(
                    timestamp = state.last_timestamp,
                    "Sequence exhausted, waiting for next millisecond"
                );
                now = self.wait_next_millis(state.last_timestamp);
            }
        } else {
            state.sequence = 0;
        }

        state.last_timestamp = now;

        Ok(SnowflakeId::compose(now, state.machine_id, state.sequence))
    }

    /// Allocate `count` identifiers in order.
    ///
    /// # Errors
    ///
    /// Stops at the first [`IdError::ClockRegression`].
    pub fn next_ids(&self, count: usize) -> IdResult<Vec<SnowflakeId>> {
        (0..count).map(|_| self.next_id()).collect()
    }

    /// Whether the clock has not fallen behind the last allocation.
    pub fn is_clock_sane(&self) -> bool {
        let last = self.state.lock().last_timestamp;
        self.clock.current_millis() >= last
    }

    /// Poll the clock until it passes `last`.
    fn wait_next_millis(&self, last: i64) -> i64 {
        let mut now = self.clock.current_millis();
        while now <= last {
            std::hint::spin_loop();
            now = self.clock.current_millis();
        }
        now
    }
}
