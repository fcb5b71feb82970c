use chrono::{DateTime, FixedOffset, Utc};
use std::time::SystemTime;

/// Source of timestamps for one run. Every timestamp produced during a run
/// uses the same civil offset.
pub trait Clock {
    fn offset(&self) -> FixedOffset;

    fn now(&self) -> DateTime<FixedOffset>;

    fn localize(&self, time: SystemTime) -> DateTime<FixedOffset> {
        DateTime::<Utc>::from(time).with_timezone(&self.offset())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn offset(&self) -> FixedOffset {
        self.offset
    }

    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn offset(&self) -> FixedOffset {
        *self.instant.offset()
    }

    fn now(&self) -> DateTime<FixedOffset> {
        self.instant
    }
}
