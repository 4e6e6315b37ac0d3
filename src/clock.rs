//! Time sources for validity window checks

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current instant in Unix seconds
///
/// Validation reads it once per call, so every time comparison within one
/// call sees the same instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
            Err(before_epoch) => {
                i64::try_from(before_epoch.duration().as_secs()).map_or(i64::MIN, |secs| -secs)
            }
        }
    }
}

/// Clock stopped at a fixed instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrozenClock(i64);

impl FrozenClock {
    pub fn at(now: i64) -> Self {
        Self(now)
    }

    /// Freeze the wall clock at its current reading
    pub fn now_from_system() -> Self {
        Self(SystemClock.now())
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> i64 {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> i64 {
        (**self).now()
    }
}
