// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! UTC offset value type as defined in RFC 5545 Section 3.3.14.

use std::fmt::{self, Display};
use std::str::FromStr;

use chumsky::extra::ParserExtra;
use chumsky::input::Input;
use chumsky::label::LabelError;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

use crate::value::datetime::{time_hour, time_minute, time_second};
use crate::value::miscellaneous::{ValueExpected, parse_full};

/// Offset from UTC, `factor * (hours:minutes:seconds)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtcOffset {
    /// `1` or `-1`
    pub factor: i32,
    /// Hours, 0-23
    pub hours: i32,
    /// Minutes, 0-59
    pub minutes: i32,
    /// Seconds, 0-59
    pub seconds: i32,
}

impl Default for UtcOffset {
    fn default() -> Self {
        Self {
            factor: 1,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

impl UtcOffset {
    /// Offset in seconds east of UTC.
    #[must_use]
    pub const fn to_seconds(&self) -> i32 {
        self.factor * (self.hours * 3600 + self.minutes * 60 + self.seconds)
    }

    /// Build an offset from seconds east of UTC.
    #[must_use]
    pub const fn from_seconds(seconds: i32) -> Self {
        let factor = if seconds < 0 { -1 } else { 1 };
        let abs = seconds.abs();
        Self {
            factor,
            hours: abs / 3600,
            minutes: (abs % 3600) / 60,
            seconds: abs % 60,
        }
    }
}

impl Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.factor < 0 { '-' } else { '+' };
        write!(f, "{sign}{:02}{:02}", self.hours, self.minutes)?;
        if self.seconds != 0 {
            write!(f, "{:02}", self.seconds)?;
        }
        Ok(())
    }
}

impl FromStr for UtcOffset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_full(value_utc_offset(), s)
    }
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// utc-offset = time-numzone
///
/// time-numzone = ("+" / "-") time-hour time-minute [time-second]
/// ```
///
/// The value MUST NOT be "-0000" or "-000000".
pub(crate) fn value_utc_offset<'src, I, E>() -> impl Parser<'src, I, UtcOffset, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    select! { c @ ('+' | '-') => c }
        .then(time_hour())
        .then(time_minute())
        .then(time_second().or_not())
        .try_map(|(((sign, hour), minute), second), span| {
            let second = second.unwrap_or(0);
            if sign == '-' && hour == 0 && minute == 0 && second == 0 {
                return Err(E::Error::expected_found(
                    [ValueExpected::NegativeZeroOffset],
                    None,
                    span,
                ));
            }
            Ok(UtcOffset {
                factor: if sign == '-' { -1 } else { 1 },
                hours: i32::from(hour),
                minutes: i32::from(minute),
                seconds: i32::from(second),
            })
        })
}
