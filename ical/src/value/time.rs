// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Calendar time points: DATE and DATE-TIME values with their zone.
//!
//! All day arithmetic uses the proleptic Gregorian calendar.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::timezone::Zone;
use crate::value::duration::Duration;

/// Weekday numbers used by [`Time::day_of_week`], Sunday first.
pub const SUNDAY: i32 = 1;
/// Monday
pub const MONDAY: i32 = 2;
/// Tuesday
pub const TUESDAY: i32 = 3;
/// Wednesday
pub const WEDNESDAY: i32 = 4;
/// Thursday
pub const THURSDAY: i32 = 5;
/// Friday
pub const FRIDAY: i32 = 6;
/// Saturday
pub const SATURDAY: i32 = 7;

const DAYS_IN_YEAR_PASSED_MONTH: [[i32; 13]; 2] = [
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365],
    [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335, 366],
];

const DAYS_IN_MONTH: [i32; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days since 1970-01-01 of a civil date.
pub(crate) const fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Civil date of a day count since 1970-01-01.
pub(crate) const fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400;
    (if month <= 2 { year + 1 } else { year }, month, day)
}

pub(crate) fn saturate(v: i64) -> i32 {
    i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
}

/// A calendar date or date-time, in a [`Zone`].
///
/// When the value is a DATE the time-of-day fields are zero and ignored by
/// comparisons. With auto-normalization on (the default), every field setter
/// carries overflow into the coarser fields.
#[derive(Debug, Clone)]
pub struct Time {
    pub(crate) year: i32,
    pub(crate) month: i32,
    pub(crate) day: i32,
    pub(crate) hour: i32,
    pub(crate) minute: i32,
    pub(crate) second: i32,
    pub(crate) is_date: bool,
    pub(crate) zone: Zone,
    auto_normalize: bool,
}

impl Default for Time {
    fn default() -> Self {
        Self {
            year: 0,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            is_date: false,
            zone: Zone::Floating,
            auto_normalize: true,
        }
    }
}

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        self.year == other.year
            && self.month == other.month
            && self.day == other.day
            && self.hour == other.hour
            && self.minute == other.minute
            && self.second == other.second
            && self.is_date == other.is_date
            && self.zone == other.zone
    }
}

impl Time {
    /// A floating DATE value.
    #[must_use]
    pub fn from_date(year: i32, month: i32, day: i32) -> Self {
        let mut time = Self {
            year,
            month,
            day,
            is_date: true,
            ..Self::default()
        };
        time.normalize();
        time
    }

    /// A floating DATE-TIME value.
    #[must_use]
    pub fn from_date_time(year: i32, month: i32, day: i32, hour: i32, minute: i32, second: i32) -> Self {
        let mut time = Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            ..Self::default()
        };
        time.normalize();
        time
    }

    /// The DATE-TIME `seconds` after 1970-01-01T00:00:00Z, in UTC.
    #[must_use]
    pub fn from_unix_time(seconds: i64) -> Self {
        let mut time = Self::epoch();
        time.adjust(0, 0, 0, seconds);
        time.zone = Zone::Utc;
        time
    }

    /// 1970-01-01T00:00:00Z
    #[must_use]
    pub fn epoch() -> Self {
        Self {
            year: 1970,
            zone: Zone::Utc,
            ..Self::default()
        }
    }

    /// The current instant, in UTC.
    #[must_use]
    pub fn now() -> Self {
        let seconds = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX));
        Self::from_unix_time(seconds)
    }

    /// The DATE that is day `day_of_year` of `year`.
    ///
    /// Day numbers outside the year roll into the adjacent years.
    #[must_use]
    pub fn from_day_of_year(day_of_year: i32, year: i32) -> Self {
        let serial = days_from_civil(i64::from(year), 1, 1) + i64::from(day_of_year) - 1;
        Self::from_serial_day(serial)
    }

    pub(crate) fn from_serial_day(serial: i64) -> Self {
        let (year, month, day) = civil_from_days(serial);
        Self {
            year: saturate(year),
            month: saturate(month),
            day: saturate(day),
            is_date: true,
            ..Self::default()
        }
    }

    /// Replace the zone, keeping the wall-clock fields.
    #[must_use]
    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    /// Year
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month, 1-12
    #[must_use]
    pub const fn month(&self) -> i32 {
        self.month
    }

    /// Day of the month, 1-31
    #[must_use]
    pub const fn day(&self) -> i32 {
        self.day
    }

    /// Hour, 0-23
    #[must_use]
    pub const fn hour(&self) -> i32 {
        self.hour
    }

    /// Minute, 0-59
    #[must_use]
    pub const fn minute(&self) -> i32 {
        self.minute
    }

    /// Second, 0-59
    #[must_use]
    pub const fn second(&self) -> i32 {
        self.second
    }

    /// Whether this is a DATE value.
    #[must_use]
    pub const fn is_date(&self) -> bool {
        self.is_date
    }

    /// Zone of the wall-clock fields.
    #[must_use]
    pub const fn zone(&self) -> &Zone {
        &self.zone
    }

    /// Whether field setters carry overflow.
    #[must_use]
    pub const fn auto_normalize(&self) -> bool {
        self.auto_normalize
    }

    /// Enable or disable carrying on every field write.
    pub fn set_auto_normalize(&mut self, enabled: bool) {
        self.auto_normalize = enabled;
    }

    fn touched(&mut self) {
        if self.auto_normalize {
            self.normalize();
        }
    }

    /// Set the year.
    pub fn set_year(&mut self, year: i32) {
        self.year = year;
        self.touched();
    }

    /// Set the month, carrying overflow into the year.
    pub fn set_month(&mut self, month: i32) {
        self.month = month;
        self.touched();
    }

    /// Set the day of the month, carrying overflow.
    pub fn set_day(&mut self, day: i32) {
        self.day = day;
        self.touched();
    }

    /// Set the hour, carrying overflow.
    pub fn set_hour(&mut self, hour: i32) {
        self.hour = hour;
        self.touched();
    }

    /// Set the minute, carrying overflow.
    pub fn set_minute(&mut self, minute: i32) {
        self.minute = minute;
        self.touched();
    }

    /// Set the second, carrying overflow.
    pub fn set_second(&mut self, second: i32) {
        self.second = second;
        self.touched();
    }

    /// Switch between DATE and DATE-TIME. Becoming a DATE clears the time.
    pub fn set_is_date(&mut self, is_date: bool) {
        self.is_date = is_date;
        if is_date {
            self.hour = 0;
            self.minute = 0;
            self.second = 0;
        }
        self.touched();
    }

    /// Move to another zone without converting the wall-clock fields.
    pub fn set_zone(&mut self, zone: Zone) {
        self.zone = zone;
    }

    /// Whether `year` is a leap year.
    #[must_use]
    pub const fn is_leap_year(year: i32) -> bool {
        (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
    }

    /// Number of days in `month` of `year`; 30 for an invalid month.
    #[must_use]
    pub const fn days_in_month(month: i32, year: i32) -> i32 {
        if month < 1 || month > 12 {
            return 30;
        }
        #[expect(clippy::cast_sign_loss, clippy::indexing_slicing)]
        let days = DAYS_IN_MONTH[month as usize];
        if month == 2 && Self::is_leap_year(year) {
            days + 1
        } else {
            days
        }
    }

    /// Number of days in `year`.
    #[must_use]
    pub const fn days_in_year(year: i32) -> i32 {
        if Self::is_leap_year(year) { 366 } else { 365 }
    }

    /// Days since 1970-01-01 of the date part.
    pub(crate) fn serial_day(&self) -> i64 {
        days_from_civil(
            i64::from(self.year),
            i64::from(self.month),
            i64::from(self.day),
        )
    }

    /// Day of the week, 1 is Sunday and 7 is Saturday.
    #[must_use]
    pub fn day_of_week(&self) -> i32 {
        saturate((self.serial_day() + 4).rem_euclid(7) + 1)
    }

    /// Day of the year, 1-366.
    #[must_use]
    pub fn day_of_year(&self) -> i32 {
        let leap = usize::from(Self::is_leap_year(self.year));
        let passed = usize::try_from(self.month - 1)
            .ok()
            .and_then(|m| DAYS_IN_YEAR_PASSED_MONTH.get(leap)?.get(m))
            .copied()
            .unwrap_or(0);
        passed + self.day
    }

    /// The Sunday starting this week, keeping the time of day.
    #[must_use]
    pub fn start_of_week(&self) -> Self {
        let mut result = self.clone();
        result.adjust(-i64::from(self.day_of_week() - 1), 0, 0, 0);
        result
    }

    /// The Saturday ending this week, keeping the time of day.
    #[must_use]
    pub fn end_of_week(&self) -> Self {
        let mut result = self.clone();
        result.adjust(i64::from(7 - self.day_of_week()), 0, 0, 0);
        result
    }

    fn as_date_on(&self, month: i32, day: i32) -> Self {
        Self {
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            is_date: true,
            ..self.clone()
        }
    }

    /// First day of this month, as a DATE.
    #[must_use]
    pub fn start_of_month(&self) -> Self {
        self.as_date_on(self.month, 1)
    }

    /// Last day of this month, as a DATE.
    #[must_use]
    pub fn end_of_month(&self) -> Self {
        self.as_date_on(self.month, Self::days_in_month(self.month, self.year))
    }

    /// January 1st of this year, as a DATE.
    #[must_use]
    pub fn start_of_year(&self) -> Self {
        self.as_date_on(1, 1)
    }

    /// December 31st of this year, as a DATE.
    #[must_use]
    pub fn end_of_year(&self) -> Self {
        self.as_date_on(12, 31)
    }

    /// Day of the year the current week starts on, for weeks starting on
    /// `week_start` (1 is Sunday). May be zero or negative in early January.
    #[must_use]
    pub fn start_doy_week(&self, week_start: i32) -> i32 {
        let delta = (self.day_of_week() - week_start).rem_euclid(7);
        self.day_of_year() - delta
    }

    /// Day of the month of the `pos`-th `day_of_week` in this month.
    ///
    /// A negative `pos` counts from the end of the month; `0` is treated as
    /// the first occurrence. The result may fall outside the month when the
    /// month has no such occurrence.
    #[must_use]
    pub fn nth_weekday(&self, day_of_week: i32, pos: i32) -> i32 {
        let days_in_month = Self::days_in_month(self.month, self.year);
        if pos >= 0 {
            let start_dow = self.as_date_on(self.month, 1).day_of_week();
            let weekday = (day_of_week - start_dow).rem_euclid(7) + 1;
            weekday + (pos - 1).max(0) * 7
        } else {
            let end_dow = self.as_date_on(self.month, days_in_month).day_of_week();
            let weekday = days_in_month - (end_dow - day_of_week).rem_euclid(7);
            weekday + (pos + 1) * 7
        }
    }

    /// The first day of week 1 of `year`: the `week_start` week holding
    /// January 4th.
    #[must_use]
    pub fn week_one_starts(year: i32, week_start: i32) -> Self {
        let fourth = Self::from_date(year, 1, 4);
        let delta = (fourth.day_of_week() - week_start).rem_euclid(7);
        Self::from_serial_day(fourth.serial_day() - i64::from(delta))
    }

    /// Week number of this date for weeks starting on `week_start`.
    #[must_use]
    pub fn week_number(&self, week_start: i32) -> i32 {
        let this = self.serial_day();
        let mut week1 = if self.month == 12 && self.day > 28 {
            let next = Self::week_one_starts(self.year + 1, week_start).serial_day();
            if this < next {
                Self::week_one_starts(self.year, week_start).serial_day()
            } else {
                next
            }
        } else {
            Self::week_one_starts(self.year, week_start).serial_day()
        };
        if this < week1 {
            week1 = Self::week_one_starts(self.year - 1, week_start).serial_day();
        }
        saturate((this - week1) / 7 + 1)
    }

    /// Number of ISO-style weeks in `year` for weeks starting on `week_start`.
    #[must_use]
    pub fn weeks_in_year(year: i32, week_start: i32) -> i32 {
        let start = Self::week_one_starts(year, week_start).serial_day();
        let next = Self::week_one_starts(year + 1, week_start).serial_day();
        saturate((next - start) / 7)
    }

    /// Shift by a duration, field by field, then normalize.
    pub fn add_duration(&mut self, duration: &Duration) {
        let mult = if duration.is_negative { -1 } else { 1 };
        self.adjust(
            mult * (i64::from(duration.days) + 7 * i64::from(duration.weeks)),
            mult * i64::from(duration.hours),
            mult * i64::from(duration.minutes),
            mult * i64::from(duration.seconds),
        );
    }

    /// Wall-clock difference `self - other`.
    #[must_use]
    pub fn subtract_date(&self, other: &Self) -> Duration {
        let days = self.serial_day() - other.serial_day();
        let seconds = days * 86_400
            + i64::from(self.hour - other.hour) * 3600
            + i64::from(self.minute - other.minute) * 60
            + i64::from(self.second - other.second);
        Duration::from_seconds(seconds)
    }

    /// Order two time points.
    ///
    /// When either side is a DATE only the dates are compared, in this
    /// value's zone. Otherwise both sides are brought to a common zone:
    /// floating when either is floating, UTC otherwise.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        if self.is_date || other.is_date {
            return self.compare_date_only_tz(other, &self.zone);
        }

        let target = if self.zone.is_floating() || other.zone.is_floating() {
            Zone::Floating
        } else {
            Zone::Utc
        };
        let a = self.convert_to_zone(&target);
        let b = other.convert_to_zone(&target);
        (a.year, a.month, a.day, a.hour, a.minute, a.second)
            .cmp(&(b.year, b.month, b.day, b.hour, b.minute, b.second))
    }

    /// Order by calendar date only, after converting both into `zone`.
    #[must_use]
    pub fn compare_date_only_tz(&self, other: &Self, zone: &Zone) -> Ordering {
        let a = self.convert_to_zone(zone);
        let b = other.convert_to_zone(zone);
        (a.year, a.month, a.day).cmp(&(b.year, b.month, b.day))
    }

    /// The same instant expressed in `zone`.
    ///
    /// DATE values and conversions from or to the floating zone only
    /// relabel the zone.
    #[must_use]
    pub fn convert_to_zone(&self, zone: &Zone) -> Self {
        let mut copy = self.clone();
        if !self.is_date && self.zone.tzid() != zone.tzid() {
            Zone::convert_time(&mut copy, &self.zone, zone);
        }
        copy.zone = zone.clone();
        copy
    }

    /// Offset of this wall-clock time from UTC, in seconds.
    #[must_use]
    pub fn utc_offset(&self) -> i32 {
        self.zone.utc_offset(self)
    }

    /// Seconds since 1970-01-01T00:00:00Z. Floating times count as UTC.
    #[must_use]
    pub fn to_unix_time(&self) -> i64 {
        self.serial_day() * 86_400
            + i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second)
            - i64::from(self.utc_offset())
    }

    /// Carry every out-of-range field into the next coarser one.
    pub fn normalize(&mut self) -> &mut Self {
        if self.is_date {
            self.hour = 0;
            self.minute = 0;
            self.second = 0;
        }
        self.adjust(0, 0, 0, 0);
        self
    }

    /// Add the given amounts and carry overflow, month and year first.
    pub fn adjust(&mut self, days: i64, hours: i64, minutes: i64, seconds: i64) {
        let mut days_overflow = 0;
        if !self.is_date {
            let second = i64::from(self.second) + seconds;
            self.second = saturate(second.rem_euclid(60));

            let minute = i64::from(self.minute) + minutes + second.div_euclid(60);
            self.minute = saturate(minute.rem_euclid(60));

            let hour = i64::from(self.hour) + hours + minute.div_euclid(60);
            self.hour = saturate(hour.rem_euclid(24));
            days_overflow = hour.div_euclid(24);
        }

        let month0 = i64::from(self.month) - 1;
        let year = i64::from(self.year) + month0.div_euclid(12);
        let month = month0.rem_euclid(12) + 1;

        let serial = days_from_civil(year, month, 1) + i64::from(self.day) - 1 + days + days_overflow;
        let (year, month, day) = civil_from_days(serial);
        self.year = saturate(year);
        self.month = saturate(month);
        self.day = saturate(day);
    }

    /// Parse a DATE or DATE-TIME literal.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem when `s` is neither.
    pub fn parse(s: &str) -> Result<Self, String> {
        s.parse()
    }
}

impl FromStr for Time {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use crate::value::datetime::{value_date, value_date_time};
        use crate::value::miscellaneous::parse_full;

        parse_full(value_date(), s).or_else(|_| parse_full(value_date_time(), s))
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)?;
        if !self.is_date {
            write!(f, "T{:02}{:02}{:02}", self.hour, self.minute, self.second)?;
            if self.zone.is_utc() {
                write!(f, "Z")?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "jiff")]
impl From<jiff::civil::Date> for Time {
    fn from(value: jiff::civil::Date) -> Self {
        Self::from_date(
            i32::from(value.year()),
            i32::from(value.month()),
            i32::from(value.day()),
        )
    }
}

#[cfg(feature = "jiff")]
impl From<jiff::civil::DateTime> for Time {
    fn from(value: jiff::civil::DateTime) -> Self {
        Self::from_date_time(
            i32::from(value.year()),
            i32::from(value.month()),
            i32::from(value.day()),
            i32::from(value.hour()),
            i32::from(value.minute()),
            i32::from(value.second()),
        )
    }
}

#[cfg(feature = "jiff")]
impl Time {
    /// Wall-clock fields as a `jiff::civil::DateTime`, if representable.
    #[must_use]
    pub fn civil_date_time(&self) -> Option<jiff::civil::DateTime> {
        jiff::civil::DateTime::new(
            i16::try_from(self.year).ok()?,
            i8::try_from(self.month).ok()?,
            i8::try_from(self.day).ok()?,
            i8::try_from(self.hour).ok()?,
            i8::try_from(self.minute).ok()?,
            i8::try_from(self.second.min(59)).ok()?,
            0,
        )
        .ok()
    }
}
