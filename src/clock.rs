//! The macro clock and the date arithmetic of `SetTime` / `SetResetTime`.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Datelike, Days, Local, NaiveDateTime, TimeZone, Timelike, Utc};
use lazy_static::lazy_static;
use tracing::debug;

use crate::provider::MacroClock;

lazy_static! {
    static ref GLOBAL_CLOCK: Arc<SystemMacroClock> = Arc::new(SystemMacroClock::new());
}

/// Macro clock following the local system time until a macro sets it.
#[derive(Debug, Default)]
pub struct SystemMacroClock {
    fixed: Mutex<Option<NaiveDateTime>>,
}

impl SystemMacroClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide clock shared by evaluators that are not given one.
    pub fn global() -> Arc<SystemMacroClock> {
        GLOBAL_CLOCK.clone()
    }

    /// Goes back to following the system time.
    pub fn reset(&self) {
        *self.fixed.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl MacroClock for SystemMacroClock {
    fn now(&self) -> NaiveDateTime {
        self.fixed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .unwrap_or_else(|| Local::now().naive_local())
    }

    fn set(&self, time: NaiveDateTime) {
        debug!("Macro clock set to {}", time);
        *self.fixed.lock().unwrap_or_else(|e| e.into_inner()) = Some(time);
    }

    fn millisecond(&self) -> u32 {
        Local::now().timestamp_subsec_millis()
    }
}

/// `hour:00` UTC today, or on the next day whose weekday (0 = Sunday) is
/// `weekday`, counting today. Returns `None` for an hour outside `0..24`.
pub fn reset_time(now: DateTime<Utc>, hour: i32, weekday: Option<i32>) -> Option<DateTime<Utc>> {
    let hour = u32::try_from(hour).ok().filter(|h| *h < 24)?;
    let mut day = now.date_naive();
    if let Some(weekday) = weekday {
        let today = now.weekday().num_days_from_sunday() as i32;
        let ahead = (weekday - today + 7).rem_euclid(7) as u64;
        day = day.checked_add_days(Days::new(ahead))?;
    }
    let time = day.and_hms_opt(hour, 0, 0)?;
    Some(Utc.from_utc_datetime(&time))
}

/// Local wall time of a unix timestamp.
pub fn unix_to_local(seconds: u32) -> Option<NaiveDateTime> {
    DateTime::<Utc>::from_timestamp(i64::from(seconds), 0)
        .map(|utc| utc.with_timezone(&Local).naive_local())
}

pub fn utc_to_local(time: DateTime<Utc>) -> NaiveDateTime {
    time.with_timezone(&Local).naive_local()
}

/// Value of a time placeholder: weekday is 1-based from Sunday, month is
/// 1-based and the year is the full year.
pub fn time_component(time: &NaiveDateTime, component: crate::text::PlaceholderKind) -> Option<u32> {
    use crate::text::PlaceholderKind;

    match component {
        PlaceholderKind::Second => Some(time.second()),
        PlaceholderKind::Minute => Some(time.minute()),
        PlaceholderKind::Hour => Some(time.hour()),
        PlaceholderKind::Day => Some(time.day()),
        PlaceholderKind::Weekday => Some(time.weekday().num_days_from_sunday() + 1),
        PlaceholderKind::Month => Some(time.month()),
        PlaceholderKind::Year => u32::try_from(time.year()).ok(),
        _ => None,
    }
}
