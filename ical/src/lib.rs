// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! iCalendar (RFC 5545) document model.
//!
//! Parse a stream into a [`Component`] tree, query and mutate it, write it
//! back with [`format`] or `to_string`, resolve timezone offsets with
//! [`Timezone`] and expand recurrence rules with [`RecurIterator`].
//!
//! ```
//! use calkit_ical::{Value, parse};
//!
//! let calendar = parse("\
//! BEGIN:VCALENDAR\r
//! BEGIN:VEVENT\r
//! DTSTART:20130101T100000\r
//! RRULE:FREQ=DAILY;COUNT=3\r
//! END:VEVENT\r
//! END:VCALENDAR\r
//! ").unwrap();
//!
//! let event = calendar.first_subcomponent(Some("VEVENT")).unwrap();
//! let start = event.first_property_value("DTSTART").and_then(Value::as_time).unwrap();
//! let rule = event.first_property_value("RRULE").and_then(Value::as_recur).unwrap();
//!
//! let days: Vec<String> = rule
//!     .iterator(start)
//!     .unwrap()
//!     .map(|t| t.unwrap().to_string())
//!     .collect();
//! assert_eq!(days, ["20130101T100000", "20130102T100000", "20130103T100000"]);
//! ```

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::option_option,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::match_bool
)]

pub mod component;
pub mod design;
mod error;
pub mod formatter;
mod json;
pub mod keyword;
mod parser;
pub mod property;
pub mod recur;
pub mod syntax;
pub mod timezone;
pub mod value;

pub use crate::component::Component;
pub use crate::design::ValueType;
pub use crate::error::{Error, GrammarError, Result};
pub use crate::formatter::{FormatOptions, FoldingStyle, format};
pub use crate::parser::{parse, parse_all, parse_property};
pub use crate::property::Property;
pub use crate::recur::RecurIterator;
pub use crate::syntax::{ContentLine, ParamValue, Parameter};
pub use crate::timezone::{Change, Timezone, Zone};
pub use crate::value::{
    Binary, ByRule, Duration, Frequency, Period, PeriodEnd, Recur, Time, TimeOfDay, UtcOffset,
    Value, WeekDay, WeekDayNum,
};
