//! Buffer pool configuration.

use warren_core::AllocatorKind;

use crate::buffer::CircularBuffer;
use crate::error::RingError;

/// Configuration for a [`RingPool`](crate::RingPool).
#[derive(Clone, Debug)]
pub struct RingPoolConfig {
    /// Capacity of buffers created when the pool is empty.
    pub initial_capacity: usize,
    /// Most idle buffers the pool keeps.
    pub max_pooled: usize,
    /// Buffers returned with a larger capacity are dropped instead of kept,
    /// so one huge path does not pin memory forever.
    pub max_retained_capacity: usize,
    /// Arena pooled buffers are accounted against.
    pub allocator: AllocatorKind,
}

impl RingPoolConfig {
    /// Default capacity of new buffers.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

    /// Default number of idle buffers kept.
    pub const DEFAULT_MAX_POOLED: usize = 32;

    /// Default largest capacity kept on return.
    pub const DEFAULT_MAX_RETAINED_CAPACITY: usize = 1 << 16;

    /// Check the config for internal consistency.
    pub fn validate(&self) -> Result<(), RingError> {
        if self.initial_capacity > CircularBuffer::<u8>::MAX_CAPACITY {
            return Err(RingError::InvalidConfig {
                reason: format!(
                    "initial_capacity {} exceeds the maximum capacity {}",
                    self.initial_capacity,
                    CircularBuffer::<u8>::MAX_CAPACITY
                ),
            });
        }
        if self.initial_capacity.next_power_of_two() > self.max_retained_capacity {
            return Err(RingError::InvalidConfig {
                reason: format!(
                    "initial_capacity {} would never be retained (max_retained_capacity {})",
                    self.initial_capacity, self.max_retained_capacity
                ),
            });
        }
        Ok(())
    }
}

impl Default for RingPoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            max_pooled: Self::DEFAULT_MAX_POOLED,
            max_retained_capacity: Self::DEFAULT_MAX_RETAINED_CAPACITY,
            allocator: AllocatorKind::Temp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RingPoolConfig::default().validate().is_ok());
    }

    #[test]
    fn unretainable_initial_capacity_rejected() {
        let config = RingPoolConfig {
            initial_capacity: 100,
            max_retained_capacity: 64,
            ..RingPoolConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RingError::InvalidConfig { .. })
        ));
    }
}
