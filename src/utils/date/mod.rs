// Date utility functions
// Day boundaries in the display zone, expressed as UTC instants

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Zone in which the timeline lays out days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayZone {
    Local,
    Named(Tz),
}

impl DisplayZone {
    /// Resolve a configured IANA name; `None` means the system zone.
    pub fn from_setting(name: Option<&str>) -> Result<Self> {
        match name {
            None => Ok(Self::Local),
            Some(name) => name
                .trim()
                .parse::<Tz>()
                .map(Self::Named)
                .map_err(|e| anyhow!("Unknown time zone '{}': {}", name, e)),
        }
    }

    /// First instant of `date` in this zone.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        match self {
            Self::Local => resolve_midnight(&Local, date),
            Self::Named(tz) => resolve_midnight(tz, date),
        }
    }

    /// Wall-clock reading of `instant` in this zone.
    pub fn to_naive(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Local => instant.with_timezone(&Local).naive_local(),
            Self::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }

    /// Instant for a wall-clock reading; gaps resolve forward, overlaps to the earlier instant.
    pub fn from_naive(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        match self {
            Self::Local => resolve_local(&Local, naive),
            Self::Named(tz) => resolve_local(tz, naive),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.to_naive(Utc::now()).date()
    }
}

/// Half-open range `[start, end)` covering one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayRange {
    /// The day starting at `date` 00:00 and ending at the next calendar date's 00:00.
    ///
    /// The day is a calendar unit, so it spans 23 or 25 hours across DST changes.
    pub fn for_date(date: NaiveDate, zone: &DisplayZone) -> Self {
        let next = date.succ_opt().unwrap_or(date);
        Self {
            date,
            start: zone.start_of_day(date),
            end: zone.start_of_day(next),
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Whether `[start, end)` overlaps the day; zero-length intervals count when inside it.
    pub fn intersects(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        if start == end {
            return self.contains(start);
        }
        start < self.end && end > self.start
    }
}

fn resolve_midnight<Z: TimeZone>(zone: &Z, date: NaiveDate) -> DateTime<Utc> {
    resolve_local(zone, date.and_time(NaiveTime::MIN))
}

fn resolve_local<Z: TimeZone>(zone: &Z, naive: NaiveDateTime) -> DateTime<Utc> {
    let mut probe = naive;
    // Transition gaps are at most a few hours wide.
    for _ in 0..12 {
        if let Some(resolved) = zone.from_local_datetime(&probe).earliest() {
            return resolved.with_timezone(&Utc);
        }
        probe += Duration::minutes(30);
    }
    naive.and_utc()
}
