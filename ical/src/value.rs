// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Property value types as defined in RFC 5545 Section 3.3.

pub(crate) mod datetime;
mod duration;
pub(crate) mod miscellaneous;
pub(crate) mod numeric;
mod period;
pub(crate) mod recur;
pub mod text;
pub(crate) mod time;
mod utc_offset;

use std::fmt::{self, Display};

pub use datetime::TimeOfDay;
pub use duration::Duration;
pub use miscellaneous::Binary;
pub use period::{Period, PeriodEnd};
pub use recur::{ByRule, Frequency, Recur, WeekDay, WeekDayNum};
pub use time::{FRIDAY, MONDAY, SATURDAY, SUNDAY, THURSDAY, TUESDAY, Time, WEDNESDAY};
pub use utc_offset::UtcOffset;

use crate::design::ValueType;
use crate::value::datetime::{value_date, value_date_time, value_time};
use crate::value::miscellaneous::{parse_full, value_boolean};
use crate::value::numeric::{format_float, value_float, value_integer};

/// A decoded property value.
///
/// The properties in an iCalendar object are strongly typed.  The definition
/// of each property restricts the value to be one of the value data types, or
/// simply value types, defined in this section. The value type for a property
/// will either be specified implicitly as the default value type or will be
/// explicitly specified with the "VALUE" parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// TEXT, URI and CAL-ADDRESS. TEXT is held unescaped, the others
    /// verbatim.
    Text(String),

    /// INTEGER, see RFC 5545 Section 3.3.8.
    Integer(i32),

    /// FLOAT, see RFC 5545 Section 3.3.7.
    Float(f64),

    /// BOOLEAN, see RFC 5545 Section 3.3.2.
    Boolean(bool),

    /// BINARY, see RFC 5545 Section 3.3.1.
    Binary(Binary),

    /// UTC-OFFSET, see RFC 5545 Section 3.3.14.
    UtcOffset(UtcOffset),

    /// DURATION, see RFC 5545 Section 3.3.6.
    Duration(Duration),

    /// PERIOD, see RFC 5545 Section 3.3.9.
    Period(Period),

    /// DATE or DATE-TIME, see RFC 5545 Sections 3.3.4 and 3.3.5.
    Time(Time),

    /// TIME, see RFC 5545 Section 3.3.12.
    TimeOfDay(TimeOfDay),

    /// RECUR, see RFC 5545 Section 3.3.10.
    Recur(Recur),
}

impl Value {
    /// Decode one raw value of type `ty`. TEXT is unescaped.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem when `raw` is not a valid `ty`.
    pub fn parse(ty: &ValueType, raw: &str) -> Result<Self, String> {
        match ty {
            ValueType::Text => Ok(Value::Text(text::unescape(raw).into_owned())),
            ValueType::Uri | ValueType::CalAddress => Ok(Value::Text(raw.to_owned())),
            ValueType::Integer => parse_full(value_integer(), raw).map(Value::Integer),
            ValueType::Float => parse_full(value_float(), raw).map(Value::Float),
            ValueType::Boolean => parse_full(value_boolean(), raw).map(Value::Boolean),
            ValueType::Binary => Binary::from_base64(raw).map(Value::Binary),
            ValueType::UtcOffset => raw.parse().map(Value::UtcOffset),
            ValueType::Duration => raw.parse().map(Value::Duration),
            ValueType::Period => raw.parse().map(Value::Period),
            ValueType::Date => parse_full(value_date(), raw).map(Value::Time),
            ValueType::DateTime => parse_full(value_date_time(), raw).map(Value::Time),
            ValueType::Time => parse_full(value_time(), raw).map(Value::TimeOfDay),
            ValueType::Recur => raw.parse().map(Value::Recur),
        }
    }

    /// The string content of a textual value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The integer content.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// The float content.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The boolean content.
    #[must_use]
    pub const fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// The DATE or DATE-TIME content.
    #[must_use]
    pub const fn as_time(&self) -> Option<&Time> {
        match self {
            Value::Time(v) => Some(v),
            _ => None,
        }
    }

    /// Mutable DATE or DATE-TIME content.
    pub const fn as_time_mut(&mut self) -> Option<&mut Time> {
        match self {
            Value::Time(v) => Some(v),
            _ => None,
        }
    }

    /// The DURATION content.
    #[must_use]
    pub const fn as_duration(&self) -> Option<&Duration> {
        match self {
            Value::Duration(v) => Some(v),
            _ => None,
        }
    }

    /// The PERIOD content.
    #[must_use]
    pub const fn as_period(&self) -> Option<&Period> {
        match self {
            Value::Period(v) => Some(v),
            _ => None,
        }
    }

    /// The UTC-OFFSET content.
    #[must_use]
    pub const fn as_utc_offset(&self) -> Option<&UtcOffset> {
        match self {
            Value::UtcOffset(v) => Some(v),
            _ => None,
        }
    }

    /// The RECUR content.
    #[must_use]
    pub const fn as_recur(&self) -> Option<&Recur> {
        match self {
            Value::Recur(v) => Some(v),
            _ => None,
        }
    }

    /// The BINARY content.
    #[must_use]
    pub const fn as_binary(&self) -> Option<&Binary> {
        match self {
            Value::Binary(v) => Some(v),
            _ => None,
        }
    }
}

/// Canonical text form. TEXT is written unescaped; escaping is applied when
/// a property is serialized.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(v) => f.write_str(v),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => f.write_str(&format_float(*v)),
            Value::Boolean(true) => f.write_str("TRUE"),
            Value::Boolean(false) => f.write_str("FALSE"),
            Value::Binary(v) => write!(f, "{v}"),
            Value::UtcOffset(v) => write!(f, "{v}"),
            Value::Duration(v) => write!(f, "{v}"),
            Value::Period(v) => write!(f, "{v}"),
            Value::Time(v) => write!(f, "{v}"),
            Value::TimeOfDay(v) => write!(f, "{v}"),
            Value::Recur(v) => write!(f, "{v}"),
        }
    }
}

impl From<Time> for Value {
    fn from(value: Time) -> Self {
        Value::Time(value)
    }
}

impl From<Duration> for Value {
    fn from(value: Duration) -> Self {
        Value::Duration(value)
    }
}

impl From<Recur> for Value {
    fn from(value: Recur) -> Self {
        Value::Recur(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}
