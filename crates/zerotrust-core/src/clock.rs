use time::{OffsetDateTime, UtcOffset};

use crate::error::ZeroTrustError;

/// Wall-clock source. Directories and the broker read time only through this.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;

    fn hour_of_day(&self) -> u8 {
        self.now().hour()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: UtcOffset,
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl SystemClock {
    pub fn utc() -> Self {
        Self {
            offset: UtcOffset::UTC,
        }
    }

    pub fn with_offset_hours(hours: i8) -> Result<Self, ZeroTrustError> {
        let offset = UtcOffset::from_hms(hours, 0, 0).map_err(|err| {
            ZeroTrustError::InvalidConfig(format!("utc offset {hours}h: {err}"))
        })?;
        Ok(Self { offset })
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}
