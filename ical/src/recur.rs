// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence expansion as defined in RFC 5545 Section 3.3.10.
//!
//! Occurrences are generated one period at a time. A period is one interval
//! step of the rule's frequency: a year, a month, a week, a day, or a single
//! hour, minute or second. Within a period the BY rules either expand the
//! candidate set or filter it, BYSETPOS then picks from the sorted set.

use crate::error::{Error, Result};
use crate::value::time::{civil_from_days, days_from_civil, saturate};
use crate::value::{ByRule, Frequency, Recur, Time, WeekDay, WeekDayNum};

/// Occurrences after this year are never produced.
pub const MAX_YEAR: i32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expansion {
    Contract,
    Expand,
}

/// Role of BYHOUR, BYMINUTE and BYSECOND for each frequency.
const fn time_expansion(freq: Frequency) -> [Expansion; 3] {
    use Expansion::{Contract as C, Expand as E};
    match freq {
        Frequency::Secondly => [C, C, C],
        Frequency::Minutely => [C, C, E],
        Frequency::Hourly => [C, E, E],
        Frequency::Daily | Frequency::Weekly | Frequency::Monthly | Frequency::Yearly => [E, E, E],
    }
}

/// Length in seconds of one sub-daily step.
const fn unit_seconds(freq: Frequency) -> i64 {
    match freq {
        Frequency::Secondly => 1,
        Frequency::Minutely => 60,
        _ => 3600,
    }
}

fn check_combination(rule: &Recur) -> Result<()> {
    let has = |part| rule.has_component(part);

    if has(ByRule::ByYearDay)
        && (has(ByRule::ByMonth)
            || has(ByRule::ByWeekNo)
            || has(ByRule::ByMonthDay)
            || has(ByRule::ByDay))
    {
        return Err(Error::recurrence("Invalid BYYEARDAY rule"));
    }
    if has(ByRule::ByWeekNo) && has(ByRule::ByMonthDay) {
        return Err(Error::recurrence("BYWEEKNO does not fit to BYMONTHDAY"));
    }
    if rule.freq == Frequency::Monthly && (has(ByRule::ByYearDay) || has(ByRule::ByWeekNo)) {
        return Err(Error::recurrence(
            "For MONTHLY recurrences neither BYYEARDAY nor BYWEEKNO may appear",
        ));
    }
    if rule.freq == Frequency::Weekly && (has(ByRule::ByYearDay) || has(ByRule::ByMonthDay)) {
        return Err(Error::recurrence(
            "For WEEKLY recurrences neither BYMONTHDAY nor BYYEARDAY may appear",
        ));
    }
    if rule.freq != Frequency::Yearly && has(ByRule::ByYearDay) {
        return Err(Error::recurrence("BYYEARDAY may only appear in YEARLY rules"));
    }

    let within_month = rule.freq == Frequency::Monthly
        || (rule.freq == Frequency::Yearly && has(ByRule::ByMonth));
    if within_month && rule.by_day.iter().any(|d| d.position.abs() > 5) {
        return Err(Error::recurrence("Malformed values in BYDAY part"));
    }
    Ok(())
}

/// Whether a sub-daily rule ever steps onto a time of day its contracting
/// BYHOUR, BYMINUTE and BYSECOND lists accept.
///
/// The times of day a rule visits repeat with a stride of
/// `gcd(step, 86400)` seconds from the start's.
fn reaches_time_of_day(rule: &Recur, dtstart: &Time) -> bool {
    let freq = rule.freq;
    if !matches!(freq, Frequency::Hourly | Frequency::Minutely | Frequency::Secondly) {
        return true;
    }
    let unit = unit_seconds(freq);
    let step = unit * i64::from(rule.interval());
    let stride = gcd(step, 86_400);
    let start = {
        let seconds = i64::from(dtstart.hour) * 3600
            + i64::from(dtstart.minute) * 60
            + i64::from(dtstart.second);
        seconds - seconds.rem_euclid(unit)
    };

    let [by_hour, by_minute, by_second] = time_expansion(freq);
    let accepts = |role: Expansion, list: &[i32], value: i64| {
        role == Expansion::Expand
            || list.is_empty()
            || list.iter().any(|&v| i64::from(v) == value)
    };
    (start.rem_euclid(stride)..86_400)
        .step_by(usize::try_from(stride).unwrap_or(1))
        .any(|t| {
            accepts(by_hour, &rule.by_hour, t / 3600)
                && accepts(by_minute, &rule.by_minute, t % 3600 / 60)
                && accepts(by_second, &rule.by_second, t % 60)
        })
}

const fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let rem = a % b;
        a = b;
        b = rem;
    }
    a
}

/// Fill the parts RFC 5545 derives from DTSTART when the rule omits them.
fn with_defaults(mut rule: Recur, dtstart: &Time) -> Recur {
    if rule.by_second.is_empty() && rule.freq > Frequency::Secondly {
        rule.by_second = vec![dtstart.second];
    }
    if rule.by_minute.is_empty() && rule.freq > Frequency::Minutely {
        rule.by_minute = vec![dtstart.minute];
    }
    if rule.by_hour.is_empty() && rule.freq > Frequency::Hourly {
        rule.by_hour = vec![dtstart.hour];
    }

    let no_day_parts = rule.by_day.is_empty()
        && rule.by_month_day.is_empty()
        && rule.by_year_day.is_empty()
        && rule.by_week_no.is_empty();
    match rule.freq {
        Frequency::Yearly if no_day_parts => {
            if rule.by_month.is_empty() {
                rule.by_month = vec![dtstart.month];
            }
            rule.by_month_day = vec![dtstart.day];
        }
        Frequency::Monthly if no_day_parts => rule.by_month_day = vec![dtstart.day],
        Frequency::Weekly if rule.by_day.is_empty() => {
            let day = WeekDay::from_number(dtstart.day_of_week());
            rule.by_day = vec![WeekDayNum::every(day)];
        }
        _ => {}
    }

    for list in [&mut rule.by_hour, &mut rule.by_minute, &mut rule.by_second] {
        list.sort_unstable();
        list.dedup();
    }
    rule
}

/// Lazy, ordered sequence of the occurrences of a [`Recur`] from a start.
///
/// The first occurrence may equal the start; every later one is strictly
/// greater than its predecessor.
#[derive(Debug, Clone)]
pub struct RecurIterator {
    rule: Recur,
    dtstart: Time,
    period: i64,
    pending: Vec<Time>,
    cursor: usize,
    last: Option<Time>,
    occurrence_number: u32,
    done: bool,
}

impl RecurIterator {
    /// Start iterating `rule` from `dtstart`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Recurrence`] for an illegal combination of BY rules.
    pub fn new(mut rule: Recur, dtstart: Time) -> Result<Self> {
        check_combination(&rule)?;

        // Times carry no leap seconds, so BYSECOND=60 never matches
        let only_leap_seconds =
            !rule.by_second.is_empty() && rule.by_second.iter().all(|&s| s >= 60);
        rule.by_second.retain(|&s| s < 60);

        let rule = with_defaults(rule, &dtstart);
        let done = only_leap_seconds || !reaches_time_of_day(&rule, &dtstart);
        if done {
            tracing::debug!(rule = %rule, %dtstart, "recurrence never matches");
        }
        Ok(Self {
            rule,
            dtstart,
            period: 0,
            pending: Vec::new(),
            cursor: 0,
            last: None,
            occurrence_number: 0,
            done,
        })
    }

    /// The rule, with the parts derived from the start filled in.
    #[must_use]
    pub const fn rule(&self) -> &Recur {
        &self.rule
    }

    /// Start of the recurrence
    #[must_use]
    pub const fn dtstart(&self) -> &Time {
        &self.dtstart
    }

    /// Last occurrence returned, if any.
    #[must_use]
    pub const fn last(&self) -> Option<&Time> {
        self.last.as_ref()
    }

    /// Number of occurrences returned so far.
    #[must_use]
    pub const fn occurrence_number(&self) -> u32 {
        self.occurrence_number
    }

    /// Advance to the next occurrence; `None` once the rule is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Recurrence`] when a candidate does not advance past
    /// the previous occurrence, which would otherwise loop forever.
    pub fn next_occurrence(&mut self) -> Result<Option<Time>> {
        if self.done {
            return Ok(None);
        }
        if self.rule.count.is_some_and(|count| self.occurrence_number >= count) {
            self.done = true;
            return Ok(None);
        }

        loop {
            let Some(candidate) = self.pending.get(self.cursor).cloned() else {
                match self.expand_period(self.period) {
                    Some((candidates, next)) => {
                        self.pending = candidates;
                        self.cursor = 0;
                        self.period = next;
                        continue;
                    }
                    None => {
                        self.done = true;
                        return Ok(None);
                    }
                }
            };
            self.cursor += 1;

            if candidate.compare(&self.dtstart).is_lt() {
                continue;
            }
            if let Some(until) = &self.rule.until
                && candidate.compare(until).is_gt()
            {
                self.done = true;
                return Ok(None);
            }
            if let Some(last) = &self.last
                && !candidate.compare(last).is_gt()
            {
                tracing::warn!(rule = %self.rule, %candidate, %last, "recurrence does not advance");
                self.done = true;
                return Err(Error::recurrence(format!(
                    "Recurrence candidate {candidate} does not advance past {last}"
                )));
            }

            self.occurrence_number += 1;
            self.last = Some(candidate.clone());
            return Ok(Some(candidate));
        }
    }

    /// Candidates of period `k` and the index of the next period to expand.
    fn expand_period(&self, k: i64) -> Option<(Vec<Time>, i64)> {
        let interval = i64::from(self.rule.interval());
        let dt = &self.dtstart;
        let days: Vec<i64> = match self.rule.freq {
            Frequency::Yearly => {
                let year = i64::from(dt.year) + k * interval;
                if year > i64::from(MAX_YEAR) {
                    return None;
                }
                self.matching_days(days_from_civil(year, 1, 1), days_from_civil(year + 1, 1, 1))
            }
            Frequency::Monthly => {
                let month0 = i64::from(dt.year) * 12 + i64::from(dt.month) - 1 + k * interval;
                let (year, month) = (month0.div_euclid(12), month0.rem_euclid(12) + 1);
                if year > i64::from(MAX_YEAR) {
                    return None;
                }
                let start = days_from_civil(year, month, 1);
                let len = Time::days_in_month(saturate(month), saturate(year));
                self.matching_days(start, start + i64::from(len))
            }
            Frequency::Weekly => {
                let week_start = self.rule.week_start().number();
                let offset = (dt.day_of_week() - week_start).rem_euclid(7);
                let start = dt.serial_day() - i64::from(offset) + 7 * k * interval;
                if year_of(start) > MAX_YEAR {
                    return None;
                }
                self.matching_days(start, start + 7)
            }
            Frequency::Daily => {
                let day = dt.serial_day() + k * interval;
                if year_of(day) > MAX_YEAR {
                    return None;
                }
                self.matching_days(day, day + 1)
            }
            Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => {
                return self.expand_sub_daily(k);
            }
        };

        let times = self.times_of_day(&self.rule.by_hour, &self.rule.by_minute, &self.rule.by_second);
        let mut candidates = Vec::with_capacity(days.len() * times.len());
        for &day in &days {
            for &(hour, minute, second) in &times {
                candidates.push(self.at(day, hour, minute, second));
            }
        }
        Some((self.select_positions(candidates), k + 1))
    }

    fn expand_sub_daily(&self, k: i64) -> Option<(Vec<Time>, i64)> {
        let freq = self.rule.freq;
        let dt = &self.dtstart;
        let unit = unit_seconds(freq);
        let step = unit * i64::from(self.rule.interval());
        let origin = {
            let seconds = dt.serial_day() * 86_400
                + i64::from(dt.hour) * 3600
                + i64::from(dt.minute) * 60
                + i64::from(dt.second);
            seconds - seconds.rem_euclid(unit)
        };

        let at = origin + k * step;
        let (day, since_midnight) = (at.div_euclid(86_400), at.rem_euclid(86_400));
        if year_of(day) > MAX_YEAR {
            return None;
        }
        // First period starting at or after `boundary`
        let skip_to = |boundary: i64| {
            let next = (boundary - origin + step - 1).div_euclid(step);
            (Vec::new(), next.max(k + 1))
        };

        if self.matching_days(day, day + 1).is_empty() {
            return Some(skip_to((day + 1) * 86_400));
        }

        let hour = saturate(since_midnight / 3600);
        let minute = saturate(since_midnight % 3600 / 60);
        let second = saturate(since_midnight % 60);
        let [by_hour, by_minute, by_second] = time_expansion(freq);
        let hour_start = day * 86_400 + i64::from(hour) * 3600;

        let fixed_or = |role: Expansion, value: i32, list: &[i32]| match role {
            Expansion::Contract => vec![value],
            Expansion::Expand => list.to_vec(),
        };
        let rejects = |list: &[i32], value| !list.is_empty() && !list.contains(&value);

        if by_hour == Expansion::Contract && rejects(&self.rule.by_hour, hour) {
            return Some(skip_to(hour_start + 3600));
        }
        if by_minute == Expansion::Contract && rejects(&self.rule.by_minute, minute) {
            return Some(skip_to(hour_start + i64::from(minute + 1) * 60));
        }
        if by_second == Expansion::Contract && rejects(&self.rule.by_second, second) {
            let minute_start = hour_start + i64::from(minute) * 60;
            let next_second = self
                .rule
                .by_second
                .iter()
                .find(|&&s| s > second)
                .map_or(60, |&s| i64::from(s));
            return Some(skip_to(minute_start + next_second));
        }

        let times = self.times_of_day(
            &fixed_or(by_hour, hour, &self.rule.by_hour),
            &fixed_or(by_minute, minute, &self.rule.by_minute),
            &fixed_or(by_second, second, &self.rule.by_second),
        );
        let candidates = times
            .into_iter()
            .map(|(h, m, s)| self.at(day, h, m, s))
            .collect();
        Some((self.select_positions(candidates), k + 1))
    }

    /// Sorted product of the time lists; a single midnight for DATE starts.
    fn times_of_day(&self, hours: &[i32], minutes: &[i32], seconds: &[i32]) -> Vec<(i32, i32, i32)> {
        if self.dtstart.is_date {
            return vec![(0, 0, 0)];
        }
        let mut times = Vec::with_capacity(hours.len() * minutes.len() * seconds.len());
        for &hour in hours {
            for &minute in minutes {
                for &second in seconds {
                    times.push((hour, minute, second));
                }
            }
        }
        times.sort_unstable();
        times.dedup();
        times
    }

    /// Days in `start..end` passing every day-level BY rule.
    fn matching_days(&self, start: i64, end: i64) -> Vec<i64> {
        (start..end)
            .filter(|&serial| self.day_matches(&Time::from_serial_day(serial)))
            .collect()
    }

    fn day_matches(&self, date: &Time) -> bool {
        let rule = &self.rule;
        let matches_signed = |list: &[i32], value: i32, len: i32| {
            list.is_empty() || list.iter().any(|&n| n == value || n == value - len - 1)
        };

        (rule.by_month.is_empty() || rule.by_month.contains(&date.month))
            && (rule.by_week_no.is_empty() || self.week_no_matches(date))
            && matches_signed(
                &rule.by_year_day,
                date.day_of_year(),
                Time::days_in_year(date.year),
            )
            && matches_signed(
                &rule.by_month_day,
                date.day,
                Time::days_in_month(date.month, date.year),
            )
            && (rule.by_day.is_empty() || rule.by_day.iter().any(|d| self.weekday_matches(date, d)))
    }

    fn week_no_matches(&self, date: &Time) -> bool {
        let week_start = self.rule.week_start().number();
        let week = date.week_number(week_start);
        let week_year = if date.month == 1 && week > 50 {
            date.year - 1
        } else if date.month == 12 && week == 1 {
            date.year + 1
        } else {
            date.year
        };
        let weeks = Time::weeks_in_year(week_year, week_start);
        self.rule
            .by_week_no
            .iter()
            .any(|&n| n == week || n == week - weeks - 1)
    }

    fn weekday_matches(&self, date: &Time, wanted: &WeekDayNum) -> bool {
        if date.day_of_week() != wanted.day.number() {
            return false;
        }
        if wanted.position == 0 {
            return true;
        }

        let (index, len) = match self.rule.freq {
            Frequency::Monthly => (date.day, Time::days_in_month(date.month, date.year)),
            Frequency::Yearly if !self.rule.by_week_no.is_empty() => return true,
            Frequency::Yearly if !self.rule.by_month.is_empty() => {
                (date.day, Time::days_in_month(date.month, date.year))
            }
            Frequency::Yearly => (date.day_of_year(), Time::days_in_year(date.year)),
            _ => return true,
        };
        let nth = (index - 1) / 7 + 1;
        let nth_from_end = -((len - index) / 7 + 1);
        wanted.position == nth || wanted.position == nth_from_end
    }

    /// Keep the 1-based BYSETPOS positions of the sorted candidate set.
    fn select_positions(&self, mut candidates: Vec<Time>) -> Vec<Time> {
        candidates.dedup();
        if self.rule.by_set_pos.is_empty() {
            return candidates;
        }

        let len = i64::try_from(candidates.len()).unwrap_or(i64::MAX);
        let mut indices: Vec<usize> = self
            .rule
            .by_set_pos
            .iter()
            .filter_map(|&pos| {
                let pos = i64::from(pos);
                let index = if pos > 0 { pos - 1 } else { len + pos };
                if (0..len).contains(&index) {
                    usize::try_from(index).ok()
                } else {
                    None
                }
            })
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
            .into_iter()
            .filter_map(|i| candidates.get(i).cloned())
            .collect()
    }

    fn at(&self, serial: i64, hour: i32, minute: i32, second: i32) -> Time {
        let (year, month, day) = civil_from_days(serial);
        let mut time = self.dtstart.clone();
        time.year = saturate(year);
        time.month = saturate(month);
        time.day = saturate(day);
        if !time.is_date {
            time.hour = hour;
            time.minute = minute;
            time.second = second;
        }
        time
    }
}

fn year_of(serial: i64) -> i32 {
    saturate(civil_from_days(serial).0)
}

impl Iterator for RecurIterator {
    type Item = Result<Time>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_occurrence() {
            Ok(occurrence) => occurrence.map(Ok),
            Err(err) => Some(Err(err)),
        }
    }
}
