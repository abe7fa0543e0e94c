// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Period value type as defined in RFC 5545 Section 3.3.9.

use std::fmt::{self, Display};
use std::str::FromStr;

use chumsky::extra::ParserExtra;
use chumsky::input::Input;
use chumsky::label::LabelError;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

use crate::value::datetime::value_date_time;
use crate::value::duration::{Duration, value_duration};
use crate::value::miscellaneous::{ValueExpected, parse_full};
use crate::value::time::Time;

/// How a period is bounded.
#[derive(Debug, Clone, PartialEq)]
pub enum PeriodEnd {
    /// `date-time "/" date-time`
    End(Time),
    /// `date-time "/" dur-value`
    Duration(Duration),
}

/// Period of Time value.
#[derive(Debug, Clone, PartialEq)]
pub struct Period {
    /// Start date-time
    pub start: Time,
    /// Explicit end or duration
    pub end: PeriodEnd,
}

impl Period {
    /// Length of the period. Explicit periods compute `end - start`.
    #[must_use]
    pub fn duration(&self) -> Duration {
        match &self.end {
            PeriodEnd::End(end) => end.subtract_date(&self.start),
            PeriodEnd::Duration(duration) => *duration,
        }
    }

    /// End of the period. Duration periods add the duration to the start.
    #[must_use]
    pub fn end_time(&self) -> Time {
        match &self.end {
            PeriodEnd::End(end) => end.clone(),
            PeriodEnd::Duration(duration) => {
                let mut end = self.start.clone();
                end.add_duration(duration);
                end
            }
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.end {
            PeriodEnd::End(end) => write!(f, "{}/{end}", self.start),
            PeriodEnd::Duration(duration) => write!(f, "{}/{duration}", self.start),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_full(value_period(), s)
    }
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// period     = period-explicit / period-start
///
/// period-explicit = date-time "/" date-time
/// ; [ISO.8601.2004] complete representation basic format for a
/// ; period of time consisting of a start and end.  The start MUST
/// ; be before the end.
///
/// period-start = date-time "/" dur-value
/// ; [ISO.8601.2004] complete representation basic format for a
/// ; period of time consisting of a start and positive duration
/// ; of time.
/// ```
pub(crate) fn value_period<'src, I, E>() -> impl Parser<'src, I, Period, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    // Both date-times must agree on UTC (both UTC or both floating)
    let explicit = value_date_time()
        .then_ignore(just('/'))
        .then(value_date_time())
        .try_map(|(start, end), span| {
            if start.zone.is_utc() == end.zone.is_utc() {
                Ok(Period {
                    start,
                    end: PeriodEnd::End(end),
                })
            } else {
                Err(E::Error::expected_found(
                    [ValueExpected::MismatchedTimezone],
                    None,
                    span,
                ))
            }
        });

    let start = value_date_time()
        .then_ignore(just('/'))
        .then(value_duration())
        .map(|(start, duration)| Period {
            start,
            end: PeriodEnd::Duration(duration),
        });

    choice((explicit, start))
}

#[cfg(test)]
mod tests {
    use chumsky::extra;
    use chumsky::input::Stream;

    use super::*;

    fn parse(src: &str) -> Result<Period, Vec<Rich<'_, char>>> {
        let stream = Stream::from_iter(src.chars());
        value_period::<'_, _, extra::Err<_>>()
            .parse(stream)
            .into_result()
    }

    #[test]
    fn parses_explicit_period() {
        let period = parse("19970101T180000Z/19970102T070000Z").unwrap();
        assert_eq!(period.start.to_string(), "19970101T180000Z");
        let PeriodEnd::End(end) = &period.end else {
            panic!("Expected explicit period");
        };
        assert_eq!(end.to_string(), "19970102T070000Z");
        assert_eq!(period.duration().to_seconds(), 13 * 3600);
        assert_eq!(period.to_string(), "19970101T180000Z/19970102T070000Z");
    }

    #[test]
    fn parses_duration_period() {
        let period = parse("19970101T180000Z/PT5H30M").unwrap();
        assert_eq!(
            period.end,
            PeriodEnd::Duration(Duration {
                hours: 5,
                minutes: 30,
                ..Duration::default()
            })
        );
        assert_eq!(period.end_time().to_string(), "19970101T233000Z");
        assert_eq!(period.to_string(), "19970101T180000Z/PT5H30M");

        let weekly = parse("19970101T180000/P1W").unwrap();
        assert_eq!(weekly.end_time().to_string(), "19970108T180000");
    }

    #[test]
    fn rejects_malformed_periods() {
        let fail_cases = [
            "19970101T180000Z/19970102T070000", // mismatched timezone
            "19970101T180000/19970102T070000Z", // mismatched timezone
            "19970101T180000Z",                 // missing end
            "19970101T180000Z/",                // missing end
            "19970101/19970102",                // dates are not date-times
            "19970101T180000Z-PT1H",            // wrong separator
        ];
        for src in fail_cases {
            assert!(parse(src).is_err(), "Parse {src} should fail");
        }
    }
}
