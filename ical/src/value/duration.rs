// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Duration value type as defined in RFC 5545 Section 3.3.6.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::str::FromStr;

use chumsky::extra::ParserExtra;
use chumsky::input::Input;
use chumsky::label::LabelError;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

use crate::value::miscellaneous::{ValueExpected, parse_full, sign};

const SECONDS_PER_DAY: i64 = 86_400;

/// A signed span of weeks, days, hours, minutes and seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Duration {
    /// Weeks
    pub weeks: u32,
    /// Days
    pub days: u32,
    /// Hours
    pub hours: u32,
    /// Minutes
    pub minutes: u32,
    /// Seconds
    pub seconds: u32,
    /// Whether the whole duration points backwards in time
    pub is_negative: bool,
}

impl Duration {
    /// Build a duration from a signed number of seconds.
    ///
    /// Whole days are expressed as weeks when they divide evenly by seven.
    #[must_use]
    pub fn from_seconds(total: i64) -> Self {
        let mut secs = total.unsigned_abs();
        let mut days = secs / 86_400;
        let mut weeks = 0;
        if days % 7 == 0 {
            weeks = days / 7;
            days = 0;
        }
        secs -= (days + 7 * weeks) * 86_400;

        let hours = secs / 3600;
        secs -= hours * 3600;
        let minutes = secs / 60;
        secs -= minutes * 60;

        let clamp = |v: u64| u32::try_from(v).unwrap_or(u32::MAX);
        Self {
            weeks: clamp(weeks),
            days: clamp(days),
            hours: clamp(hours),
            minutes: clamp(minutes),
            seconds: clamp(secs),
            is_negative: total < 0,
        }
    }

    /// Total signed length in seconds.
    #[must_use]
    pub fn to_seconds(&self) -> i64 {
        let seconds = i64::from(self.seconds)
            + 60 * i64::from(self.minutes)
            + 3600 * i64::from(self.hours)
            + SECONDS_PER_DAY * i64::from(self.days)
            + 7 * SECONDS_PER_DAY * i64::from(self.weeks);
        if self.is_negative { -seconds } else { seconds }
    }

    /// Rewrite the fields into their canonical carried form.
    pub fn normalize(&mut self) -> &mut Self {
        *self = Self::from_seconds(self.to_seconds());
        self
    }

    /// Order two durations by their length in seconds.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.to_seconds().cmp(&other.to_seconds())
    }
}

impl Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.to_seconds() == 0 {
            return write!(f, "PT0S");
        }
        if self.is_negative {
            write!(f, "-")?;
        }
        write!(f, "P")?;

        let has_time = self.hours != 0 || self.minutes != 0 || self.seconds != 0;
        if self.weeks != 0 && self.days == 0 && !has_time {
            return write!(f, "{}W", self.weeks);
        }

        let days = u64::from(self.days) + 7 * u64::from(self.weeks);
        if days != 0 {
            write!(f, "{days}D")?;
        }
        if has_time {
            write!(f, "T")?;
            if self.hours != 0 {
                write!(f, "{}H", self.hours)?;
            }
            // dur-hour only reaches dur-second through dur-minute
            if self.minutes != 0 || (self.hours != 0 && self.seconds != 0) {
                write!(f, "{}M", self.minutes)?;
            }
            if self.seconds != 0 {
                write!(f, "{}S", self.seconds)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_full(value_duration(), s)
    }
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// dur-value  = (["+"] / "-") "P" (dur-date / dur-time / dur-week)
///
/// dur-date   = dur-day [dur-time]
/// dur-time   = "T" (dur-hour / dur-minute / dur-second)
/// dur-week   = 1*DIGIT "W"
/// dur-hour   = 1*DIGIT "H" [dur-minute]
/// dur-minute = 1*DIGIT "M" [dur-second]
/// dur-second = 1*DIGIT "S"
/// dur-day    = 1*DIGIT "D"
/// ```
pub(crate) fn value_duration<'src, I, E>() -> impl Parser<'src, I, Duration, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    // case-sensitive
    let int = select! { c @ '0'..='9' => c }
        .repeated()
        .at_least(1)
        .at_most(10) // u32 max is 10 digits: 4_294_967_295
        .collect::<String>()
        .try_map_with(|str, e| match lexical::parse_partial::<u32, _>(&str) {
            Ok((v, n)) if n == str.len() => Ok(v),
            Ok((_, n)) => Err(E::Error::expected_found(
                [ValueExpected::U32],
                str.chars().nth(n).map(Into::into),
                e.span(),
            )),
            Err(_) => Err(E::Error::expected_found(
                [ValueExpected::U32],
                str.chars().next().map(Into::into),
                e.span(),
            )),
        });

    let week = int.then_ignore(just('W'));

    let second_val = int.then_ignore(just('S'));
    let minute_val = int.then_ignore(just('M'));
    let hour_val = int.then_ignore(just('H'));

    // dur-second = 1*DIGIT "S"
    let second_only = second_val.map(|s| (0, 0, s));

    // dur-minute = 1*DIGIT "M" [dur-second]
    let minute_with_second = minute_val
        .then(second_val.or_not())
        .map(|(m, s)| (0, m, s.unwrap_or(0)));

    // dur-hour = 1*DIGIT "H" [dur-minute]
    let hour_with_minute = hour_val
        .then(minute_val.then(second_val.or_not()).or_not())
        .map(|(h, opt_ms)| match opt_ms {
            Some((m, opt_s)) => (h, m, opt_s.unwrap_or(0)),
            None => (h, 0, 0),
        });

    let time = just('T').ignore_then(choice((hour_with_minute, minute_with_second, second_only)));

    let day = int.then_ignore(just('D'));
    let date = day.then(time.or_not());

    let prefix = sign().then_ignore(just('P'));
    choice((
        prefix.then(date).map(|(positive, (days, time))| {
            let (hours, minutes, seconds) = time.unwrap_or((0, 0, 0));
            Duration {
                weeks: 0,
                days,
                hours,
                minutes,
                seconds,
                is_negative: !positive,
            }
        }),
        prefix
            .then(time)
            .map(|(positive, (hours, minutes, seconds))| Duration {
                hours,
                minutes,
                seconds,
                is_negative: !positive,
                ..Duration::default()
            }),
        prefix.then(week).map(|(positive, weeks)| Duration {
            weeks,
            is_negative: !positive,
            ..Duration::default()
        }),
    ))
}
