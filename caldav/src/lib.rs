// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `CalDAV` (RFC 4791) boundary of the calkit iCalendar core.
//!
//! The transport layer issues the PROPFIND requests and decodes their XML
//! into [`MultiStatusResponse`]. This crate then finds the principal and the
//! calendar home, and converts `calendar-data` bodies from and to
//! [`Component`] trees with [`parse`] and [`format`].
//!
//! ```
//! use calkit_caldav::{CalendarHome, MultiStatusResponse, Properties, ResponseItem};
//! use calkit_caldav::{find_calendar_home, Href};
//!
//! let props = Properties {
//!     calendar_home_set: Some(Href::from("/dav/calendars/alice/")),
//!     ..Properties::default()
//! };
//! let response = MultiStatusResponse::new(vec![
//!     ResponseItem::new("/dav/principals/alice/").with_prop_stat(props, "HTTP/1.1 200 OK"),
//! ]);
//!
//! let home = find_calendar_home(&response, "https://dav.example.com/").unwrap();
//! assert_eq!(home.as_str(), "https://dav.example.com/dav/calendars/alice/");
//! assert_eq!(home.as_str().parse::<CalendarHome>().unwrap(), home);
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

mod calendar_home;
mod config;
mod error;
mod response;
mod types;

pub use calkit_ical::{Component, format, parse};

pub use crate::calendar_home::{CalendarHome, find_calendar_home, find_principal};
pub use crate::config::CalDavConfig;
pub use crate::error::CalDavError;
pub use crate::response::{MultiStatusResponse, PrincipalRef, PropStat, Properties, ResponseItem};
pub use crate::types::{CalendarCollection, CalendarResource, ETag, Href};
