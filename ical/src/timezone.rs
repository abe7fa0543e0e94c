// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Timezone offset resolution from VTIMEZONE observances.
//!
//! A [`Timezone`] expands its STANDARD and DAYLIGHT observances into a sorted
//! list of [`Change`]s on demand, year by year, and answers UTC offset queries
//! for wall-clock times against that list.

use std::fmt::{self, Display};
use std::sync::{Arc, PoisonError, RwLock};

use crate::component::Component;
use crate::error::{Error, Result};
use crate::keyword::{
    KW_DAYLIGHT, KW_DTSTART, KW_RDATE, KW_RRULE, KW_STANDARD, KW_TZID, KW_TZOFFSETFROM,
    KW_TZOFFSETTO, KW_X_LIC_LOCATION,
};
use crate::value::time::{civil_from_days, days_from_civil, saturate};
use crate::value::{Recur, Time, Value};

/// Last year observances are expanded to.
pub const MAX_YEAR: i32 = 2035;

/// Years expanded beyond the queried one.
pub const EXTRA_COVERAGE: i32 = 5;

/// The zone a [`Time`] is expressed in.
#[derive(Debug, Clone, Default)]
pub enum Zone {
    /// Local time without a zone; its offset is always zero.
    #[default]
    Floating,
    /// Coordinated Universal Time
    Utc,
    /// A zone defined by a VTIMEZONE
    Timezone(Arc<Timezone>),
}

impl Zone {
    /// Whether this is the floating pseudo-zone.
    #[must_use]
    pub const fn is_floating(&self) -> bool {
        matches!(self, Zone::Floating)
    }

    /// Whether this is UTC.
    #[must_use]
    pub const fn is_utc(&self) -> bool {
        matches!(self, Zone::Utc)
    }

    /// Zone identifier: `floating`, `UTC`, or the VTIMEZONE's TZID.
    #[must_use]
    pub fn tzid(&self) -> &str {
        match self {
            Zone::Floating => "floating",
            Zone::Utc => "UTC",
            Zone::Timezone(tz) => tz.tzid(),
        }
    }

    /// Offset from UTC in seconds of the wall-clock `time` in this zone.
    #[must_use]
    pub fn utc_offset(&self, time: &Time) -> i32 {
        match self {
            Zone::Floating | Zone::Utc => 0,
            Zone::Timezone(tz) => tz.utc_offset(time),
        }
    }

    /// Move the wall-clock fields of `time` from `from` into `to`.
    ///
    /// DATE values, identical zones and the floating zone only relabel.
    pub fn convert_time(time: &mut Time, from: &Zone, to: &Zone) {
        if time.is_date || from.tzid() == to.tzid() || from.is_floating() || to.is_floating() {
            time.zone = to.clone();
            return;
        }

        let offset = from.utc_offset(time);
        time.adjust(0, 0, 0, -i64::from(offset));
        let instant = seconds_of(
            time.year,
            time.month,
            time.day,
            time.hour,
            time.minute,
            time.second,
        );
        let offset = to.utc_offset_at_instant(instant);
        time.adjust(0, 0, 0, i64::from(offset));
        time.zone = to.clone();
    }

    /// Offset from UTC in seconds in effect at `instant`, seconds since the
    /// epoch.
    #[must_use]
    pub fn utc_offset_at_instant(&self, instant: i64) -> i32 {
        match self {
            Zone::Floating | Zone::Utc => 0,
            Zone::Timezone(tz) => tz.utc_offset_at_instant(instant),
        }
    }
}

impl PartialEq for Zone {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Zone::Floating, Zone::Floating) | (Zone::Utc, Zone::Utc) => true,
            (Zone::Timezone(a), Zone::Timezone(b)) => Arc::ptr_eq(a, b) || a.tzid == b.tzid,
            _ => false,
        }
    }
}

impl Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Timezone(tz) => write!(f, "{tz}"),
            zone => f.write_str(zone.tzid()),
        }
    }
}

/// An offset regime taking effect at a UTC instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Year of the transition, in UTC
    pub year: i32,
    /// Month of the transition, in UTC
    pub month: i32,
    /// Day of the transition, in UTC
    pub day: i32,
    /// Hour of the transition, in UTC
    pub hour: i32,
    /// Minute of the transition, in UTC
    pub minute: i32,
    /// Second of the transition, in UTC
    pub second: i32,
    /// Offset in effect from the transition on
    pub utc_offset: i32,
    /// Offset in effect before the transition
    pub prev_utc_offset: i32,
    /// Whether the new regime is a DAYLIGHT observance
    pub is_daylight: bool,
}

impl Change {
    fn at(observance: &Observance, local: &Time) -> Self {
        let mut utc = local.clone();
        utc.adjust(0, 0, 0, -i64::from(observance.offset_from));
        Self::at_utc(observance, &utc)
    }

    fn at_utc(observance: &Observance, utc: &Time) -> Self {
        Self {
            year: utc.year,
            month: utc.month,
            day: utc.day,
            hour: utc.hour,
            minute: utc.minute,
            second: utc.second,
            utc_offset: observance.offset_to,
            prev_utc_offset: observance.offset_from,
            is_daylight: observance.is_daylight,
        }
    }

    /// Seconds since the epoch of the transition.
    #[must_use]
    pub fn to_unix_time(&self) -> i64 {
        seconds_of(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        )
    }

    const fn key(&self) -> (i32, i32, i32, i32, i32, i32) {
        (
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        )
    }
}

fn seconds_of(year: i32, month: i32, day: i32, hour: i32, minute: i32, second: i32) -> i64 {
    days_from_civil(i64::from(year), i64::from(month), i64::from(day)) * 86_400
        + i64::from(hour) * 3600
        + i64::from(minute) * 60
        + i64::from(second)
}

#[derive(Debug, Clone)]
struct Observance {
    is_daylight: bool,
    dtstart: Time,
    offset_from: i32,
    offset_to: i32,
    rrules: Vec<Recur>,
    rdates: Vec<Time>,
}

impl Observance {
    fn from_component(tzid: &str, component: &Component) -> Result<Self> {
        let missing = |prop: &str| {
            Error::timezone(format!(
                "{} observance of {tzid} is missing {prop}",
                component.name()
            ))
        };

        let dtstart = component
            .first_property_value(KW_DTSTART)
            .and_then(Value::as_time)
            .ok_or_else(|| missing(KW_DTSTART))?
            .clone();
        let offset_from = component
            .first_property_value(KW_TZOFFSETFROM)
            .and_then(Value::as_utc_offset)
            .ok_or_else(|| missing(KW_TZOFFSETFROM))?
            .to_seconds();
        let offset_to = component
            .first_property_value(KW_TZOFFSETTO)
            .and_then(Value::as_utc_offset)
            .ok_or_else(|| missing(KW_TZOFFSETTO))?
            .to_seconds();

        let rrules = component
            .all_properties(Some(KW_RRULE))
            .into_iter()
            .filter_map(|p| p.first_value().and_then(Value::as_recur).cloned())
            .collect();
        let rdates = component
            .all_properties(Some(KW_RDATE))
            .into_iter()
            .flat_map(|p| p.values().iter())
            .filter_map(|value| match value {
                Value::Time(t) => Some(t.clone()),
                Value::Period(p) => Some(p.start.clone()),
                _ => None,
            })
            .collect();

        Ok(Self {
            is_daylight: component.name() == KW_DAYLIGHT,
            dtstart: dtstart.with_zone(Zone::Floating),
            offset_from,
            offset_to,
            rrules,
            rdates,
        })
    }

    /// Changes that do not depend on the expansion horizon.
    fn fixed_changes(&self) -> Vec<Change> {
        if self.rrules.is_empty() && self.rdates.is_empty() {
            return vec![Change::at(self, &self.dtstart)];
        }

        self.rdates
            .iter()
            .map(|rdate| {
                if rdate.is_date {
                    let mut local = self.dtstart.clone();
                    local.year = rdate.year;
                    local.month = rdate.month;
                    local.day = rdate.day;
                    Change::at(self, &local)
                } else if rdate.zone.is_utc() {
                    Change::at_utc(self, rdate)
                } else {
                    Change::at(self, rdate)
                }
            })
            .collect()
    }

    /// Recurring changes whose local year is in `from_year..=to_year`.
    fn recurring_changes(&self, tzid: &str, from_year: i32, to_year: i32) -> Vec<Change> {
        let mut changes = Vec::new();
        for rrule in &self.rrules {
            let mut rule = rrule.clone();
            if let Some(until) = rule.until.as_mut()
                && until.zone.is_utc()
            {
                until.adjust(0, 0, 0, i64::from(self.offset_from));
                until.zone = Zone::Floating;
            }

            let iter = match rule.iterator(&self.dtstart) {
                Ok(iter) => iter,
                Err(err) => {
                    tracing::warn!(tzid, %err, "skipping timezone observance with invalid RRULE");
                    continue;
                }
            };
            for occurrence in iter {
                match occurrence {
                    Ok(occ) if occ.year > to_year => break,
                    Ok(occ) if occ.year >= from_year => changes.push(Change::at(self, &occ)),
                    Ok(_) => {}
                    Err(err) => {
                        tracing::warn!(tzid, %err, "stopping timezone observance expansion");
                        break;
                    }
                }
            }
        }
        changes
    }
}

#[derive(Debug, Default)]
struct Coverage {
    changes: Vec<Change>,
    /// Last year expanded so far; `None` before the first expansion
    end_year: Option<i32>,
}

/// A timezone defined by a VTIMEZONE component.
#[derive(Debug)]
pub struct Timezone {
    tzid: String,
    location: Option<String>,
    observances: Vec<Observance>,
    coverage: RwLock<Coverage>,
}

impl Timezone {
    /// Build a timezone from a VTIMEZONE component.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timezone`] when TZID is missing or an observance
    /// lacks DTSTART, TZOFFSETFROM or TZOFFSETTO.
    pub fn from_component(component: &Component) -> Result<Self> {
        let tzid = component
            .first_property_value(KW_TZID)
            .and_then(Value::as_text)
            .ok_or_else(|| Error::timezone("VTIMEZONE is missing TZID"))?
            .to_owned();
        let location = component
            .first_property_value(KW_X_LIC_LOCATION)
            .and_then(Value::as_text)
            .map(str::to_owned);

        let observances = component
            .subcomponents()
            .iter()
            .filter(|c| c.name() == KW_STANDARD || c.name() == KW_DAYLIGHT)
            .map(|c| Observance::from_component(&tzid, c))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            tzid,
            location,
            observances,
            coverage: RwLock::new(Coverage::default()),
        })
    }

    /// The TZID
    #[must_use]
    pub fn tzid(&self) -> &str {
        &self.tzid
    }

    /// The `X-LIC-LOCATION` of the definition, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Snapshot of the changes expanded so far.
    #[must_use]
    pub fn changes(&self) -> Vec<Change> {
        self.coverage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .changes
            .clone()
    }

    /// Make sure changes are expanded at least through `year`.
    pub fn ensure_coverage(&self, year: i32) {
        let wanted = year.min(MAX_YEAR);
        {
            let coverage = self.coverage.read().unwrap_or_else(PoisonError::into_inner);
            if coverage.end_year.is_some_and(|end| end >= wanted) {
                return;
            }
        }

        let end_year = (year.max(Time::now().year) + EXTRA_COVERAGE).min(MAX_YEAR);
        let mut coverage = self.coverage.write().unwrap_or_else(PoisonError::into_inner);
        let start_year = match coverage.end_year {
            Some(end) if end >= wanted => return,
            Some(end) => end + 1,
            None => {
                for observance in &self.observances {
                    coverage.changes.extend(observance.fixed_changes());
                }
                i32::MIN
            }
        };

        tracing::debug!(tzid = self.tzid, start_year, end_year, "expanding timezone changes");
        for observance in &self.observances {
            let changes = observance.recurring_changes(&self.tzid, start_year, end_year);
            coverage.changes.extend(changes);
        }
        coverage.changes.sort_by_key(Change::key);
        coverage.end_year = Some(end_year);
    }

    /// Offset from UTC in seconds of the wall-clock `time` in this zone.
    ///
    /// Local times skipped by a forward jump and local times repeated by a
    /// backward jump both resolve to the offset before the transition.
    #[must_use]
    pub fn utc_offset(&self, time: &Time) -> i32 {
        self.utc_offset_with(time, None)
    }

    /// Offset from UTC in seconds in effect at `instant`, seconds since the
    /// epoch. Unlike wall-clock lookups this is never ambiguous.
    #[must_use]
    pub fn utc_offset_at_instant(&self, instant: i64) -> i32 {
        self.ensure_coverage(saturate(civil_from_days(instant.div_euclid(86_400)).0));
        let coverage = self.coverage.read().unwrap_or_else(PoisonError::into_inner);
        let changes = &coverage.changes;
        let index = changes.partition_point(|change| change.to_unix_time() <= instant);
        match index.checked_sub(1).and_then(|i| changes.get(i)) {
            Some(change) => change.utc_offset,
            None => changes.first().map_or(0, |first| first.prev_utc_offset),
        }
    }

    /// Like [`Timezone::utc_offset`], but a time repeated by a backward jump
    /// resolves to the observance whose daylight flag is `want_daylight`.
    #[must_use]
    pub fn utc_offset_with(&self, time: &Time, want_daylight: Option<bool>) -> i32 {
        self.ensure_coverage(time.year);
        let coverage = self.coverage.read().unwrap_or_else(PoisonError::into_inner);
        let changes = &coverage.changes;
        let Some(first) = changes.first() else {
            return 0;
        };

        let local = seconds_of(
            time.year,
            time.month,
            time.day,
            time.hour,
            time.minute,
            time.second,
        );

        // Local wall-clock time from which each change applies
        let starts_at = |change: &Change| {
            let jump = change.utc_offset - change.prev_utc_offset;
            let offset = if jump < 0 {
                change.utc_offset
            } else {
                change.prev_utc_offset
            };
            change.to_unix_time() + i64::from(offset)
        };

        let index = changes.partition_point(|change| starts_at(change) <= local);
        let Some(index) = index.checked_sub(1) else {
            return first.prev_utc_offset;
        };
        let Some(change) = changes.get(index) else {
            return first.prev_utc_offset;
        };

        let jump = change.utc_offset - change.prev_utc_offset;
        let start = starts_at(change);
        if jump > 0 && local < start + i64::from(jump) {
            return change.prev_utc_offset;
        }
        if jump < 0 && local < start - i64::from(jump) {
            let prev_daylight = index
                .checked_sub(1)
                .and_then(|i| changes.get(i))
                .map_or(!change.is_daylight, |prev| prev.is_daylight);
            let post = want_daylight == Some(change.is_daylight) && prev_daylight != change.is_daylight;
            tracing::debug!(
                tzid = self.tzid,
                %time,
                daylight = if post { change.is_daylight } else { prev_daylight },
                "resolved ambiguous local time"
            );
            return if post {
                change.utc_offset
            } else {
                change.prev_utc_offset
            };
        }
        change.utc_offset
    }
}

impl Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tzid)
    }
}
