use time::OffsetDateTime;

/// Source of wall-clock time, used to compute table expiration timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A fixed point in time is a clock that never moves.
impl Clock for OffsetDateTime {
    #[inline]
    fn now(&self) -> OffsetDateTime {
        *self
    }
}

/// Milliseconds since the Unix epoch, `hours` from now.
pub(crate) fn expiration_ms<C: Clock + ?Sized>(clock: &C, hours: u32) -> i64 {
    let now_ms = (clock.now().unix_timestamp_nanos() / 1_000_000) as i64;
    now_ms.saturating_add(i64::from(hours) * 3_600_000)
}
