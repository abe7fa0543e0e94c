// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence rule value type, RFC 5545 Section 3.3.10.

use std::fmt::{self, Display};
use std::str::FromStr;

use chumsky::extra::ParserExtra;
use chumsky::input::Input;
use chumsky::label::LabelError;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

use crate::error::{Error, Result};
use crate::keyword::{
    KW_DAY_FR, KW_DAY_MO, KW_DAY_SA, KW_DAY_SU, KW_DAY_TH, KW_DAY_TU, KW_DAY_WE, KW_RRULE_BYDAY,
    KW_RRULE_BYHOUR, KW_RRULE_BYMINUTE, KW_RRULE_BYMONTH, KW_RRULE_BYMONTHDAY, KW_RRULE_BYSECOND,
    KW_RRULE_BYSETPOS, KW_RRULE_BYWEEKNO, KW_RRULE_BYYEARDAY, KW_RRULE_COUNT, KW_RRULE_FREQ,
    KW_RRULE_FREQ_DAILY, KW_RRULE_FREQ_HOURLY, KW_RRULE_FREQ_MINUTELY, KW_RRULE_FREQ_MONTHLY,
    KW_RRULE_FREQ_SECONDLY, KW_RRULE_FREQ_WEEKLY, KW_RRULE_FREQ_YEARLY, KW_RRULE_INTERVAL,
    KW_RRULE_UNTIL, KW_RRULE_WKST,
};
use crate::recur::RecurIterator;
use crate::value::datetime::{value_date, value_date_time};
use crate::value::miscellaneous::{
    ValueExpected, i8_0_1, i8_0_3, i8_0_9, i8_1_2, i8_1_4, i8_1_9, i16_0_5, i16_0_6, i16_0_9,
    i16_1_2, i16_1_9, parse_full, sign, u8_0_1, u8_0_3, u8_0_5, u8_0_9, u8_1_9,
};
use crate::value::time::Time;

/// Recurrence rule
#[derive(Debug, Clone, PartialEq)]
pub struct Recur {
    /// Frequency of recurrence
    pub freq: Frequency,
    /// Last instance, inclusive
    pub until: Option<Time>,
    /// Number of occurrences
    pub count: Option<u32>,
    /// Interval between recurrences, 1 when absent
    pub interval: Option<u32>,
    /// Start day of the week, Monday when absent
    pub wkst: Option<WeekDay>,
    /// Seconds, 0-60
    pub by_second: Vec<i32>,
    /// Minutes, 0-59
    pub by_minute: Vec<i32>,
    /// Hours, 0-23
    pub by_hour: Vec<i32>,
    /// Weekdays with an optional position
    pub by_day: Vec<WeekDayNum>,
    /// Days of the month, ±1-31
    pub by_month_day: Vec<i32>,
    /// Days of the year, ±1-366
    pub by_year_day: Vec<i32>,
    /// Week numbers, ±1-53
    pub by_week_no: Vec<i32>,
    /// Months, 1-12
    pub by_month: Vec<i32>,
    /// Positions within the expanded set, ±1-366
    pub by_set_pos: Vec<i32>,
}

impl Recur {
    /// A rule with the given frequency and no other parts.
    #[must_use]
    pub const fn new(freq: Frequency) -> Self {
        Self {
            freq,
            until: None,
            count: None,
            interval: None,
            wkst: None,
            by_second: Vec::new(),
            by_minute: Vec::new(),
            by_hour: Vec::new(),
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            by_year_day: Vec::new(),
            by_week_no: Vec::new(),
            by_month: Vec::new(),
            by_set_pos: Vec::new(),
        }
    }

    /// Step between periods, at least 1.
    #[must_use]
    pub fn interval(&self) -> u32 {
        self.interval.unwrap_or(1).max(1)
    }

    /// Start day of the week.
    #[must_use]
    pub fn week_start(&self) -> WeekDay {
        self.wkst.unwrap_or(WeekDay::Monday)
    }

    /// Whether the rule ends, by COUNT or UNTIL.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.count.is_some() || self.until.is_some()
    }

    /// Whether the rule ends after a number of occurrences.
    #[must_use]
    pub const fn is_by_count(&self) -> bool {
        self.count.is_some()
    }

    /// Whether any value is set for `rule`.
    #[must_use]
    pub fn has_component(&self, rule: ByRule) -> bool {
        match rule {
            ByRule::ByDay => !self.by_day.is_empty(),
            numeric => self.numbers(numeric).is_some_and(|v| !v.is_empty()),
        }
    }

    /// Values of a BY rule part, in their text form.
    #[must_use]
    pub fn component(&self, rule: ByRule) -> Vec<String> {
        match rule {
            ByRule::ByDay => self.by_day.iter().map(ToString::to_string).collect(),
            numeric => self
                .numbers(numeric)
                .map(|v| v.iter().map(ToString::to_string).collect())
                .unwrap_or_default(),
        }
    }

    /// Replace a BY rule part with a comma-separated list of values.
    ///
    /// # Errors
    ///
    /// Returns a recurrence error when `values` is not a valid list for `rule`.
    pub fn set_component(&mut self, rule: ByRule, values: &str) -> Result<()> {
        match parse_part_values(rule, values) {
            Ok(PartValues::Days(days)) => self.by_day = days,
            Ok(PartValues::Numbers(numbers)) => {
                if let Some(slot) = self.numbers_mut(rule) {
                    *slot = numbers;
                }
            }
            Err(e) => return Err(Error::recurrence(format!("Invalid {rule} value '{values}': {e}"))),
        }
        Ok(())
    }

    /// Append one value to a BY rule part.
    ///
    /// # Errors
    ///
    /// Returns a recurrence error when `value` is not valid for `rule`.
    pub fn add_component(&mut self, rule: ByRule, value: &str) -> Result<()> {
        let mut values = self.component(rule);
        values.push(value.to_owned());
        self.set_component(rule, &values.join(","))
    }

    pub(crate) fn numbers(&self, rule: ByRule) -> Option<&Vec<i32>> {
        match rule {
            ByRule::BySecond => Some(&self.by_second),
            ByRule::ByMinute => Some(&self.by_minute),
            ByRule::ByHour => Some(&self.by_hour),
            ByRule::ByDay => None,
            ByRule::ByMonthDay => Some(&self.by_month_day),
            ByRule::ByYearDay => Some(&self.by_year_day),
            ByRule::ByWeekNo => Some(&self.by_week_no),
            ByRule::ByMonth => Some(&self.by_month),
            ByRule::BySetPos => Some(&self.by_set_pos),
        }
    }

    fn numbers_mut(&mut self, rule: ByRule) -> Option<&mut Vec<i32>> {
        match rule {
            ByRule::BySecond => Some(&mut self.by_second),
            ByRule::ByMinute => Some(&mut self.by_minute),
            ByRule::ByHour => Some(&mut self.by_hour),
            ByRule::ByDay => None,
            ByRule::ByMonthDay => Some(&mut self.by_month_day),
            ByRule::ByYearDay => Some(&mut self.by_year_day),
            ByRule::ByWeekNo => Some(&mut self.by_week_no),
            ByRule::ByMonth => Some(&mut self.by_month),
            ByRule::BySetPos => Some(&mut self.by_set_pos),
        }
    }

    /// Start iterating occurrences of this rule from `dtstart`.
    ///
    /// # Errors
    ///
    /// Returns a recurrence error for illegal BY rule combinations.
    pub fn iterator(&self, dtstart: &Time) -> Result<RecurIterator> {
        RecurIterator::new(self.clone(), dtstart.clone())
    }

    /// First occurrence strictly after `after`, expressed in `after`'s zone.
    ///
    /// # Errors
    ///
    /// Returns a recurrence error when the rule cannot be iterated.
    pub fn next_occurrence(&self, dtstart: &Time, after: &Time) -> Result<Option<Time>> {
        let mut iter = self.iterator(dtstart)?;
        while let Some(next) = iter.next_occurrence()? {
            let next = next.convert_to_zone(after.zone());
            if next.compare(after).is_gt() {
                return Ok(Some(next));
            }
        }
        Ok(None)
    }
}

impl Display for Recur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{KW_RRULE_FREQ}={}", self.freq)?;
        if let Some(count) = self.count {
            write!(f, ";{KW_RRULE_COUNT}={count}")?;
        }
        if let Some(until) = &self.until {
            write!(f, ";{KW_RRULE_UNTIL}={until}")?;
        }
        if let Some(interval) = self.interval {
            write!(f, ";{KW_RRULE_INTERVAL}={interval}")?;
        }
        for rule in ByRule::ALL {
            if self.has_component(rule) {
                write!(f, ";{rule}={}", self.component(rule).join(","))?;
            }
        }
        if let Some(wkst) = self.wkst {
            write!(f, ";{KW_RRULE_WKST}={wkst}")?;
        }
        Ok(())
    }
}

impl FromStr for Recur {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_full(value_recur(), s)
    }
}

/// Recurrence frequency, ordered from the finest to the coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[expect(missing_docs)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Secondly => write!(f, "{KW_RRULE_FREQ_SECONDLY}"),
            Frequency::Minutely => write!(f, "{KW_RRULE_FREQ_MINUTELY}"),
            Frequency::Hourly => write!(f, "{KW_RRULE_FREQ_HOURLY}"),
            Frequency::Daily => write!(f, "{KW_RRULE_FREQ_DAILY}"),
            Frequency::Weekly => write!(f, "{KW_RRULE_FREQ_WEEKLY}"),
            Frequency::Monthly => write!(f, "{KW_RRULE_FREQ_MONTHLY}"),
            Frequency::Yearly => write!(f, "{KW_RRULE_FREQ_YEARLY}"),
        }
    }
}

/// BY rule parts, in the order they are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(strum::EnumString, strum::Display)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[expect(missing_docs)]
pub enum ByRule {
    BySecond,
    ByMinute,
    ByHour,
    ByDay,
    ByMonthDay,
    ByYearDay,
    ByWeekNo,
    ByMonth,
    BySetPos,
}

impl ByRule {
    /// Every rule part, in serialization order.
    pub const ALL: [Self; 9] = [
        Self::BySecond,
        Self::ByMinute,
        Self::ByHour,
        Self::ByDay,
        Self::ByMonthDay,
        Self::ByYearDay,
        Self::ByWeekNo,
        Self::ByMonth,
        Self::BySetPos,
    ];
}

/// Day of week with optional position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekDayNum {
    /// Day of the week
    pub day: WeekDay,
    /// Position within the period, `0` for every such weekday
    pub position: i32,
}

impl WeekDayNum {
    /// Every `day` in the period.
    #[must_use]
    pub const fn every(day: WeekDay) -> Self {
        Self { day, position: 0 }
    }
}

impl Display for WeekDayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.position != 0 {
            write!(f, "{}", self.position)?;
        }
        write!(f, "{}", self.day)
    }
}

/// Day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(missing_docs)]
pub enum WeekDay {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl WeekDay {
    /// Day number as used by [`Time::day_of_week`], 1 is Sunday.
    #[must_use]
    pub const fn number(self) -> i32 {
        match self {
            WeekDay::Sunday => 1,
            WeekDay::Monday => 2,
            WeekDay::Tuesday => 3,
            WeekDay::Wednesday => 4,
            WeekDay::Thursday => 5,
            WeekDay::Friday => 6,
            WeekDay::Saturday => 7,
        }
    }

    /// Inverse of [`WeekDay::number`], wrapping modulo 7.
    #[must_use]
    pub const fn from_number(n: i32) -> Self {
        match (n - 1).rem_euclid(7) {
            0 => WeekDay::Sunday,
            1 => WeekDay::Monday,
            2 => WeekDay::Tuesday,
            3 => WeekDay::Wednesday,
            4 => WeekDay::Thursday,
            5 => WeekDay::Friday,
            _ => WeekDay::Saturday,
        }
    }
}

impl Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekDay::Sunday => write!(f, "{KW_DAY_SU}"),
            WeekDay::Monday => write!(f, "{KW_DAY_MO}"),
            WeekDay::Tuesday => write!(f, "{KW_DAY_TU}"),
            WeekDay::Wednesday => write!(f, "{KW_DAY_WE}"),
            WeekDay::Thursday => write!(f, "{KW_DAY_TH}"),
            WeekDay::Friday => write!(f, "{KW_DAY_FR}"),
            WeekDay::Saturday => write!(f, "{KW_DAY_SA}"),
        }
    }
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// recur           = recur-rule-part *( ";" recur-rule-part )
///                 ;
///                 ; The rule parts are not ordered in any
///                 ; particular sequence.
///                 ;
///                 ; The FREQ rule part is REQUIRED,
///                 ; but MUST NOT occur more than once.
///                 ;
///                 ; The UNTIL or COUNT rule parts are OPTIONAL,
///                 ; but they MUST NOT occur in the same 'recur'.
///                 ;
///                 ; The other rule parts are OPTIONAL,
///                 ; but MUST NOT occur more than once.
/// ```
pub(crate) fn value_recur<'src, I, E>() -> impl Parser<'src, I, Recur, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    recur_rule_part()
        .separated_by(just(';'))
        .at_least(1)
        .collect()
        .try_map(build_from_parts::<I, E::Error>)
}

fn build_from_parts<'src, I, Err>(parts: Vec<Part>, span: I::Span) -> Result<Recur, Err>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    Err: LabelError<'src, I, ValueExpected>,
{
    let duplicate = || Err::expected_found([ValueExpected::RRuleDuplicatePart], None, span);

    let mut freq = None;
    let mut recur = Recur::new(Frequency::Yearly);
    let mut seen = Vec::new();
    for part in parts {
        match part {
            Part::Freq(f) => {
                if freq.replace(f).is_some() {
                    return Err(duplicate());
                }
            }
            Part::Until(u) => {
                if recur.until.replace(u).is_some() {
                    return Err(duplicate());
                }
            }
            Part::Count(c) => {
                if recur.count.replace(c).is_some() {
                    return Err(duplicate());
                }
            }
            Part::Interval(i) => {
                if recur.interval.replace(i).is_some() {
                    return Err(duplicate());
                }
            }
            Part::Wkst(w) => {
                if recur.wkst.replace(w).is_some() {
                    return Err(duplicate());
                }
            }
            Part::By(rule, values) => {
                if seen.contains(&rule) {
                    return Err(duplicate());
                }
                seen.push(rule);
                match values {
                    PartValues::Days(days) => recur.by_day = days,
                    PartValues::Numbers(numbers) => {
                        if let Some(slot) = recur.numbers_mut(rule) {
                            *slot = numbers;
                        }
                    }
                }
            }
        }
    }

    recur.freq =
        freq.ok_or_else(|| Err::expected_found([ValueExpected::RRuleRequiredFreq], None, span))?;

    if recur.until.is_some() && recur.count.is_some() {
        return Err(Err::expected_found(
            [ValueExpected::RRuleCountUntilExclusion],
            None,
            span,
        ));
    }

    Ok(recur)
}

#[derive(Debug, Clone)]
enum Part {
    Freq(Frequency),
    Until(Time),
    Count(u32),
    Interval(u32),
    Wkst(WeekDay),
    By(ByRule, PartValues),
}

#[derive(Debug, Clone)]
enum PartValues {
    Numbers(Vec<i32>),
    Days(Vec<WeekDayNum>),
}

/// ```txt
/// recur-rule-part = ( "FREQ" "=" freq )
///                 / ( "UNTIL" "=" enddate )
///                 / ( "COUNT" "=" 1*DIGIT )
///                 / ( "INTERVAL" "=" 1*DIGIT )
///                 / ( "BYSECOND" "=" byseclist )
///                 / ( "BYMINUTE" "=" byminlist )
///                 / ( "BYHOUR" "=" byhrlist )
///                 / ( "BYDAY" "=" bywdaylist )
///                 / ( "BYMONTHDAY" "=" bymodaylist )
///                 / ( "BYYEARDAY" "=" byyrdaylist )
///                 / ( "BYWEEKNO" "=" bywknolist )
///                 / ( "BYMONTH" "=" bymolist )
///                 / ( "BYSETPOS" "=" bysplist )
///                 / ( "WKST" "=" weekday )
/// ```
fn recur_rule_part<'src, I, E>() -> impl Parser<'src, I, Part, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    let kw = |kw| just(kw).ignore_then(just('='));

    choice((
        kw(KW_RRULE_FREQ).ignore_then(freq()).map(Part::Freq),
        kw(KW_RRULE_UNTIL).ignore_then(enddate()).map(Part::Until),
        kw(KW_RRULE_COUNT)
            .ignore_then(u32_non_zero())
            .map(Part::Count),
        kw(KW_RRULE_INTERVAL)
            .ignore_then(u32_non_zero())
            .map(Part::Interval),
        by_part(KW_RRULE_BYSECOND, ByRule::BySecond, numbers(seconds())),
        by_part(KW_RRULE_BYMINUTE, ByRule::ByMinute, numbers(minutes())),
        by_part(KW_RRULE_BYHOUR, ByRule::ByHour, numbers(hour())),
        by_part(KW_RRULE_BYDAY, ByRule::ByDay, days()),
        by_part(KW_RRULE_BYMONTHDAY, ByRule::ByMonthDay, numbers(signed(ordmoday()))),
        by_part(KW_RRULE_BYYEARDAY, ByRule::ByYearDay, numbers(signed(ordyrday()))),
        by_part(KW_RRULE_BYWEEKNO, ByRule::ByWeekNo, numbers(signed(ordwk()))),
        by_part(KW_RRULE_BYMONTH, ByRule::ByMonth, numbers(monthnum())),
        by_part(KW_RRULE_BYSETPOS, ByRule::BySetPos, numbers(signed(ordyrday()))),
        kw(KW_RRULE_WKST).ignore_then(weekday()).map(Part::Wkst),
    ))
}

fn by_part<'src, I, E>(
    name: &'static str,
    rule: ByRule,
    values: impl Parser<'src, I, PartValues, E>,
) -> impl Parser<'src, I, Part, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    just(name)
        .ignore_then(just('='))
        .ignore_then(values)
        .map(move |values| Part::By(rule, values))
}

/// Parse the comma-separated value list of one BY rule part.
fn parse_part_values(rule: ByRule, values: &str) -> Result<PartValues, String> {
    match rule {
        ByRule::BySecond => parse_full(numbers(seconds()), values),
        ByRule::ByMinute => parse_full(numbers(minutes()), values),
        ByRule::ByHour => parse_full(numbers(hour()), values),
        ByRule::ByDay => parse_full(days(), values),
        ByRule::ByMonthDay => parse_full(numbers(signed(ordmoday())), values),
        ByRule::ByYearDay | ByRule::BySetPos => parse_full(numbers(signed(ordyrday())), values),
        ByRule::ByWeekNo => parse_full(numbers(signed(ordwk())), values),
        ByRule::ByMonth => parse_full(numbers(monthnum()), values),
    }
}

fn numbers<'src, I, E, T>(item: impl Parser<'src, I, T, E>) -> impl Parser<'src, I, PartValues, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    T: Into<i32>,
{
    item.map(|v: T| -> i32 { v.into() })
        .separated_by(just(','))
        .at_least(1)
        .collect::<Vec<i32>>()
        .map(PartValues::Numbers)
}

/// ```txt
/// bywdaylist  = ( weekdaynum *("," weekdaynum) )
/// ```
fn days<'src, I, E>() -> impl Parser<'src, I, PartValues, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    weekdaynum()
        .separated_by(just(','))
        .at_least(1)
        .collect()
        .map(PartValues::Days)
}

/// ```txt
/// freq        = "SECONDLY" / "MINUTELY" / "HOURLY" / "DAILY"
///             / "WEEKLY" / "MONTHLY" / "YEARLY"
/// ```
fn freq<'src, I, E>() -> impl Parser<'src, I, Frequency, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    choice((
        just(KW_RRULE_FREQ_SECONDLY).to(Frequency::Secondly),
        just(KW_RRULE_FREQ_MINUTELY).to(Frequency::Minutely),
        just(KW_RRULE_FREQ_HOURLY).to(Frequency::Hourly),
        just(KW_RRULE_FREQ_DAILY).to(Frequency::Daily),
        just(KW_RRULE_FREQ_WEEKLY).to(Frequency::Weekly),
        just(KW_RRULE_FREQ_MONTHLY).to(Frequency::Monthly),
        just(KW_RRULE_FREQ_YEARLY).to(Frequency::Yearly),
    ))
}

/// ```txt
/// enddate     = date / date-time
/// ```
fn enddate<'src, I, E>() -> impl Parser<'src, I, Time, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    choice((value_date_time(), value_date()))
}

/// ```txt
/// seconds     = 1*2DIGIT       ;0 to 60
/// ```
fn seconds<'src, I, E>() -> impl Parser<'src, I, u8, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    choice((
        u8_0_5().then(u8_0_9()).map(|(a, b)| a * 10 + b), // 00-59
        just("60").to(60),                                // 60
        u8_0_9(),                                         // 0-9
    ))
}

/// ```txt
/// minutes     = 1*2DIGIT       ;0 to 59
/// ```
fn minutes<'src, I, E>() -> impl Parser<'src, I, u8, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    choice((
        u8_0_5().then(u8_0_9()).map(|(a, b)| a * 10 + b), // 00-59
        u8_0_9(),                                         // 0-9
    ))
}

/// ```txt
/// hour        = 1*2DIGIT       ;0 to 23
/// ```
fn hour<'src, I, E>() -> impl Parser<'src, I, u8, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    choice((
        u8_0_1().then(u8_0_9()).map(|(a, b)| a * 10 + b), // 00-19
        just('2').ignore_then(u8_0_3()).map(|b| 20 + b),  // 20-23
        u8_0_9(),                                         // 0-9
    ))
}

/// ```txt
/// weekdaynum  = [[plus / minus] ordwk] weekday
/// plus        = "+"
/// minus       = "-"
/// ```
fn weekdaynum<'src, I, E>() -> impl Parser<'src, I, WeekDayNum, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    signed(ordwk())
        .or_not()
        .then(weekday())
        .map(|(position, day)| WeekDayNum {
            day,
            position: position.map_or(0, i32::from),
        })
}

/// ```txt
/// ordwk       = 1*2DIGIT       ;1 to 53
/// ```
fn ordwk<'src, I, E>() -> impl Parser<'src, I, i8, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    choice((
        i8_1_4().then(i8_0_9()).map(|(a, b)| a * 10 + b), // 10-49
        just('5').ignore_then(i8_0_3()).map(|a| 50 + a),  // 50-53
        just('0').ignore_then(i8_1_9()),                  // 01-09
        i8_1_9(),                                         // 1-9
    ))
}

/// ```txt
/// weekday     = "SU" / "MO" / "TU" / "WE" / "TH" / "FR" / "SA"
/// ```
fn weekday<'src, I, E>() -> impl Parser<'src, I, WeekDay, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    choice((
        just(KW_DAY_SU).to(WeekDay::Sunday),
        just(KW_DAY_MO).to(WeekDay::Monday),
        just(KW_DAY_TU).to(WeekDay::Tuesday),
        just(KW_DAY_WE).to(WeekDay::Wednesday),
        just(KW_DAY_TH).to(WeekDay::Thursday),
        just(KW_DAY_FR).to(WeekDay::Friday),
        just(KW_DAY_SA).to(WeekDay::Saturday),
    ))
}

/// ```txt
/// ordmoday    = 1*2DIGIT       ;1 to 31
/// ```
fn ordmoday<'src, I, E>() -> impl Parser<'src, I, i8, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    choice((
        i8_1_2().then(i8_0_9()).map(|(a, b)| a * 10 + b), // 10-29
        just('3').ignore_then(i8_0_1()).map(|a| 30 + a),  // 30-31
        just('0').or_not().ignore_then(i8_1_9()),         // 1-9 / 01-09
    ))
}

/// ```txt
/// ordyrday    = 1*3DIGIT      ;1 to 366
/// ```
fn ordyrday<'src, I, E>() -> impl Parser<'src, I, i16, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    let i16_1_99 = i16_1_9().then(i16_0_9().or_not()).map(|(a, b)| match b {
        Some(b) => a * 10 + b, // 10-99
        None => a,             // 1-9
    });

    choice((
        just('3').ignore_then(choice((
            just('6').ignore_then(i16_0_6()).map(|a| 360 + a), // 360-366
            i16_0_5().then(i16_0_9()).map(|(a, b)| 300 + a * 10 + b), // 300-359
        ))),
        i16_1_2()
            .then(i16_0_9())
            .then(i16_0_9())
            .map(|((a, b), c)| a * 100 + b * 10 + c), // 100-299
        just('0').or_not().ignore_then(choice((
            just('0').ignore_then(i16_1_9()), // 001-009
            i16_1_99,                         // 1-99 / 01-99 / 010-099
        ))),
    ))
}

/// ```txt
/// monthnum    = 1*2DIGIT       ;1 to 12
/// ```
fn monthnum<'src, I, E>() -> impl Parser<'src, I, u8, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    choice((
        just('0').ignore_then(u8_1_9()),                 // 01-09
        just('1').ignore_then(u8_0_2()).map(|a| 10 + a), // 10-12
        u8_1_9(),                                        // 1-9
    ))
}

fn u8_0_2<'src, I, E>() -> impl Parser<'src, I, u8, E> + Copy
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    u8_0_1().or(just('2').to(2))
}

/// `[plus / minus] n`
fn signed<'src, I, E, T>(n: impl Parser<'src, I, T, E>) -> impl Parser<'src, I, T, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    T: std::ops::Neg<Output = T>,
{
    sign()
        .then(n)
        .map(|(positive, n)| if positive { n } else { -n })
}

/// Parse u32 (1 or more digits)
fn u32_non_zero<'src, I, E>() -> impl Parser<'src, I, u32, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    select! { c @ '0'..='9' => c }
        .repeated()
        .at_least(1)
        .at_most(10) // u32 max is 10 digits
        .collect::<String>()
        .try_map_with(|str, e| {
            lexical::parse_partial::<u32, _>(&str)
                .map_err(|_| E::Error::expected_found([ValueExpected::U32], None, e.span()))
                .and_then(|(v, _)| match v {
                    0 => Err(E::Error::expected_found(
                        [ValueExpected::PositiveU32],
                        None,
                        e.span(),
                    )),
                    v => Ok(v),
                })
        })
}

#[cfg(test)]
mod tests {
    use chumsky::extra;
    use chumsky::input::Stream;

    use super::*;

    fn parse(src: &'_ str) -> Result<Recur, Vec<Rich<'_, char>>> {
        let stream = Stream::from_iter(src.chars());
        value_recur::<'_, _, extra::Err<_>>()
            .parse(stream)
            .into_result()
    }

    #[test]
    fn parses_freq_only() {
        let freqs = [
            ("FREQ=SECONDLY", Frequency::Secondly),
            ("FREQ=MINUTELY", Frequency::Minutely),
            ("FREQ=HOURLY", Frequency::Hourly),
            ("FREQ=DAILY", Frequency::Daily),
            ("FREQ=WEEKLY", Frequency::Weekly),
            ("FREQ=MONTHLY", Frequency::Monthly),
            ("FREQ=YEARLY", Frequency::Yearly),
        ];

        for (src, expected_freq) in freqs {
            let result = parse(src).unwrap();
            assert_eq!(result.freq, expected_freq, "Failed for {src}");
            assert!(result.until.is_none());
            assert!(result.count.is_none());
            assert_eq!(result.interval(), 1);
            assert_eq!(result.week_start(), WeekDay::Monday);
            assert!(!result.is_finite());
        }
    }

    #[test]
    fn parses_until_forms() {
        let result = parse("FREQ=DAILY;UNTIL=19971224T000000Z").unwrap();
        let until = result.until.as_ref().unwrap();
        assert!(!until.is_date());
        assert!(until.zone().is_utc());
        assert!(result.is_finite());
        assert!(!result.is_by_count());

        let result = parse("FREQ=DAILY;UNTIL=19971224").unwrap();
        let until = result.until.unwrap();
        assert!(until.is_date());
        assert_eq!((until.year(), until.month(), until.day()), (1997, 12, 24));
    }

    #[test]
    fn parses_count_and_interval() {
        let result = parse("FREQ=DAILY;COUNT=10;INTERVAL=2").unwrap();
        assert_eq!(result.count, Some(10));
        assert_eq!(result.interval(), 2);
        assert!(result.is_by_count());
    }

    #[test]
    fn parses_byday() {
        let result = parse("FREQ=WEEKLY;BYDAY=MO,WE,FR").unwrap();
        assert_eq!(
            result.by_day,
            [
                WeekDayNum::every(WeekDay::Monday),
                WeekDayNum::every(WeekDay::Wednesday),
                WeekDayNum::every(WeekDay::Friday),
            ]
        );

        let result = parse("FREQ=MONTHLY;BYDAY=1MO,-1MO,+2TU,20FR").unwrap();
        let positions: Vec<_> = result.by_day.iter().map(|d| d.position).collect();
        assert_eq!(positions, [1, -1, 2, 20]);
    }

    #[test]
    fn parses_numeric_parts() {
        #[rustfmt::skip]
        let cases = [
            ("FREQ=DAILY;BYHOUR=9,10,23", ByRule::ByHour, vec![9, 10, 23]),
            ("FREQ=DAILY;BYMINUTE=0,20,40", ByRule::ByMinute, vec![0, 20, 40]),
            ("FREQ=HOURLY;BYSECOND=0,15,60", ByRule::BySecond, vec![0, 15, 60]),
            ("FREQ=MONTHLY;BYMONTHDAY=1,15,-1", ByRule::ByMonthDay, vec![1, 15, -1]),
            ("FREQ=YEARLY;BYYEARDAY=1,100,366,-1", ByRule::ByYearDay, vec![1, 100, 366, -1]),
            ("FREQ=YEARLY;BYWEEKNO=20,53,-1", ByRule::ByWeekNo, vec![20, 53, -1]),
            ("FREQ=YEARLY;BYMONTH=1,2,12", ByRule::ByMonth, vec![1, 2, 12]),
            ("FREQ=MONTHLY;BYDAY=MO;BYSETPOS=-1,3", ByRule::BySetPos, vec![-1, 3]),
        ];
        for (src, rule, expected) in cases {
            let result = parse(src).unwrap();
            assert_eq!(result.numbers(rule).unwrap(), &expected, "Failed for {src}");
        }
    }

    #[test]
    fn rejects_invalid_rules() {
        let fail_cases = [
            "INTERVAL=2;COUNT=10",                         // missing FREQ
            "FREQ=DAILY;UNTIL=19971224T000000Z;COUNT=10",  // UNTIL and COUNT
            "FREQ=DAILY;FREQ=WEEKLY",                      // duplicate
            "FREQ=DAILY;COUNT=10;COUNT=20",                // duplicate
            "FREQ=WEEKLY;BYDAY=MO;BYDAY=FR",               // duplicate
            "FREQ=DAILY;COUNT=0",                          // positive only
            "FREQ=DAILY;BYHOUR=24",                        // out of range
            "FREQ=YEARLY;BYMONTH=13",                      // out of range
            "FREQ=MONTHLY;BYDAY=0MO",                      // position 0
            "FREQ=MONTHLY;BYDAY=1XX",                      // unknown weekday
            "FREQ=FORTNIGHTLY",                            // unknown frequency
            "FREQ=DAILY;",                                 // trailing separator
        ];
        for src in fail_cases {
            assert!(
                parse_full(value_recur(), src).is_err(),
                "Parse {src} should fail"
            );
        }
    }

    #[test]
    fn displays_in_canonical_order() {
        let recur: Recur = "BYMONTH=1;INTERVAL=2;WKST=SU;BYDAY=SU;FREQ=YEARLY;COUNT=3"
            .parse()
            .unwrap();
        assert_eq!(
            recur.to_string(),
            "FREQ=YEARLY;COUNT=3;INTERVAL=2;BYDAY=SU;BYMONTH=1;WKST=SU"
        );

        let recur: Recur = "FREQ=DAILY;UNTIL=19971224T000000Z".parse().unwrap();
        assert_eq!(recur.to_string(), "FREQ=DAILY;UNTIL=19971224T000000Z");
    }

    #[test]
    fn edits_components() {
        let mut recur = Recur::new(Frequency::Monthly);
        recur.set_component(ByRule::ByDay, "1MO,-1FR").unwrap();
        recur.add_component(ByRule::ByDay, "2TU").unwrap();
        assert_eq!(recur.component(ByRule::ByDay), ["1MO", "-1FR", "2TU"]);

        recur.set_component(ByRule::ByMonthDay, "1,-1").unwrap();
        recur.add_component(ByRule::ByMonthDay, "15").unwrap();
        assert_eq!(recur.by_month_day, [1, -1, 15]);

        let err = recur.add_component(ByRule::ByDay, "9ZZ").unwrap_err();
        assert!(matches!(err, Error::Recurrence(_)), "{err:?}");
        assert_eq!(recur.by_day.len(), 3);
        assert_eq!("bymonthday".parse::<ByRule>().unwrap(), ByRule::ByMonthDay);
    }

    #[test]
    fn weekday_numbers_wrap() {
        assert_eq!(WeekDay::Sunday.number(), 1);
        assert_eq!(WeekDay::Saturday.number(), 7);
        assert_eq!(WeekDay::from_number(8), WeekDay::Sunday);
        assert_eq!(WeekDay::from_number(0), WeekDay::Saturday);
        for n in 1..=7 {
            assert_eq!(WeekDay::from_number(n).number(), n);
        }
    }
}
