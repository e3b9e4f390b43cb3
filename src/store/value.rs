use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Non-negative counter value shared by every replica.
///
/// Negative values cannot be represented; anything read back from storage
/// passes through [`CounterValue::from_stored`] first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CounterValue(u32);

impl CounterValue {
    pub const ZERO: CounterValue = CounterValue(0);
    pub const MAX: CounterValue = CounterValue(u32::MAX);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// One step up. Saturates at [`CounterValue::MAX`].
    pub fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// One step down. Floors at zero.
    pub fn decremented(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Signed distance from `self` to `target`.
    pub fn delta_to(self, target: CounterValue) -> i64 {
        i64::from(target.0) - i64::from(self.0)
    }

    /// Convert a raw persisted integer into a counter value.
    ///
    /// Out-of-range input is clamped and reported as a fault so the caller
    /// can log it; it is never a hard error.
    pub fn from_stored(raw: i64) -> (Self, Option<DataIntegrityFault>) {
        if raw < 0 {
            return (Self::ZERO, Some(DataIntegrityFault::Negative { raw }));
        }
        match u32::try_from(raw) {
            Ok(value) => (Self(value), None),
            Err(_) => (Self::MAX, Some(DataIntegrityFault::Overflow { raw })),
        }
    }

    /// Representation written to storage.
    pub fn to_stored(self) -> i64 {
        i64::from(self.0)
    }
}

impl From<u32> for CounterValue {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for CounterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted value that cannot be a counter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DataIntegrityFault {
    #[error("stored count {raw} is negative, clamped to 0")]
    Negative { raw: i64 },

    #[error("stored count {raw} exceeds the counter range, clamped to {}", u32::MAX)]
    Overflow { raw: i64 },
}
