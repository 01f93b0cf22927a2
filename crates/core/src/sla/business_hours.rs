//! Business-hours time arithmetic
//!
//! Converts between calendar time and "business minutes": the minutes that
//! fall inside a tenant's daily window on configured business days, in the
//! tenant's timezone. Non-business days and time outside the window
//! contribute nothing in either direction.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use helmdesk_domain::{HelmdeskError, Result, SlaConfig};

/// Validated business-hours calendar for one SLA configuration.
///
/// Construction fails fast on degenerate configs (zero-length window, empty
/// day set, unknown timezone) so the day-by-day walks below can never spin
/// without making progress.
#[derive(Debug, Clone)]
pub struct BusinessCalendar {
    window_start: NaiveTime,
    window_end: NaiveTime,
    /// Indexed by `Weekday::num_days_from_sunday()`
    days: [bool; 7],
    tz: Tz,
}

impl BusinessCalendar {
    /// Build a calendar from an SLA config, validating the window.
    ///
    /// # Errors
    /// Returns `HelmdeskError::Configuration` if the business window is
    /// zero-length or inverted, the business-day set is empty, or the
    /// timezone is not a known IANA name.
    pub fn from_config(config: &SlaConfig) -> Result<Self> {
        let tz: Tz = config.timezone.parse().map_err(|_| {
            HelmdeskError::Configuration(format!("unknown timezone: {}", config.timezone))
        })?;

        if config.business_hours_start >= config.business_hours_end {
            return Err(HelmdeskError::Configuration(format!(
                "business window is empty: {} >= {}",
                config.business_hours_start.format("%H:%M"),
                config.business_hours_end.format("%H:%M"),
            )));
        }

        let mut days = [false; 7];
        for weekday in config.business_weekdays() {
            days[weekday.num_days_from_sunday() as usize] = true;
        }
        if !days.contains(&true) {
            return Err(HelmdeskError::Configuration("business-day set is empty".into()));
        }

        Ok(Self {
            window_start: config.business_hours_start,
            window_end: config.business_hours_end,
            days,
            tz,
        })
    }

    /// Walk forward from `start`, consuming `budget_minutes` of business
    /// time, and return the deadline instant.
    ///
    /// A start outside the window snaps forward to the next window open
    /// before any budget is consumed.
    pub fn add_business_minutes(
        &self,
        start: DateTime<Utc>,
        budget_minutes: i64,
    ) -> Result<DateTime<Utc>> {
        if budget_minutes < 0 {
            return Err(HelmdeskError::Validation(format!(
                "budget_minutes must be non-negative, got {budget_minutes}"
            )));
        }

        let mut remaining = budget_minutes;
        let mut cursor = start.with_timezone(&self.tz);

        loop {
            let date = cursor.date_naive();
            if self.days[date.weekday().num_days_from_sunday() as usize] {
                let open = self.resolve_local(date.and_time(self.window_start))?;
                let close = self.resolve_local(date.and_time(self.window_end))?;
                let segment_start = cursor.max(open);

                if segment_start < close {
                    let available = (close - segment_start).num_minutes();
                    if remaining <= available {
                        let deadline = segment_start + Duration::minutes(remaining);
                        return Ok(deadline.with_timezone(&Utc));
                    }
                    remaining -= available;
                }
            }

            // Jump to the next day's window open; validated day set and
            // window guarantee progress.
            let next_date = date.succ_opt().ok_or_else(|| {
                HelmdeskError::Internal("calendar date overflow while walking forward".into())
            })?;
            cursor = self.resolve_local(next_date.and_time(self.window_start))?;
        }
    }

    /// Business minutes elapsed inside the window between two instants.
    ///
    /// Returns 0 when `end <= start`.
    pub fn business_minutes_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64> {
        let end_local = end.with_timezone(&self.tz);
        let mut cursor = start.with_timezone(&self.tz);
        let mut total = 0;

        while cursor < end_local {
            let date = cursor.date_naive();
            if self.days[date.weekday().num_days_from_sunday() as usize] {
                let open = self.resolve_local(date.and_time(self.window_start))?;
                let close = self.resolve_local(date.and_time(self.window_end))?;
                let segment_start = cursor.max(open);
                let segment_end = end_local.min(close);

                if segment_start < segment_end {
                    total += (segment_end - segment_start).num_minutes();
                }
            }

            let next_date = date.succ_opt().ok_or_else(|| {
                HelmdeskError::Internal("calendar date overflow while walking forward".into())
            })?;
            cursor = self.resolve_local(next_date.and_time(self.window_start))?;
        }

        Ok(total)
    }

    /// Resolve a tenant-local wall-clock time to an instant.
    ///
    /// Ambiguous times (fall-back transition) take the earlier offset;
    /// times skipped by a spring-forward transition shift one hour later.
    fn resolve_local(&self, naive: NaiveDateTime) -> Result<DateTime<Tz>> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Ok(dt),
            LocalResult::Ambiguous(earliest, _) => Ok(earliest),
            LocalResult::None => self
                .tz
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
                .ok_or_else(|| {
                    HelmdeskError::Internal(format!(
                        "local time {naive} cannot be resolved in {}",
                        self.tz
                    ))
                }),
        }
    }
}
