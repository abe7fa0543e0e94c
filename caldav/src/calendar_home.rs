// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Calendar home discovery (RFC 4791 §6.2.1, RFC 5397).
//!
//! Discovery takes two PROPFIND round trips which the transport layer
//! issues: one on the entry point for `current-user-principal` and
//! `principal-URL`, then one on the principal for `calendar-home-set`.
//! This module picks the answers out of the decoded responses and turns
//! them into a [`CalendarHome`] URL.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::CalDavError;
use crate::response::{MultiStatusResponse, PrincipalRef};
use crate::types::Href;

/// Pick the principal href from the entry point's PROPFIND response.
///
/// `current-user-principal` is preferred over `principal-URL`.
///
/// # Errors
///
/// Returns [`CalDavError::Unauthenticated`] if the server answered with
/// `<unauthenticated/>`, or [`CalDavError::MissingPrincipal`] if neither
/// property was reported with status 200.
pub fn find_principal(response: &MultiStatusResponse) -> Result<Href, CalDavError> {
    let current = response
        .ok_props()
        .find_map(|(_, props)| props.current_user_principal.as_ref());
    match current {
        Some(PrincipalRef::Href(href)) => return Ok(href.clone()),
        Some(PrincipalRef::Unauthenticated) => return Err(CalDavError::Unauthenticated),
        None => {}
    }

    response
        .ok_props()
        .find_map(|(_, props)| props.principal_url.clone())
        .ok_or(CalDavError::MissingPrincipal)
}

/// Pick the calendar home from the principal's PROPFIND response and
/// resolve it against `base_url`.
///
/// # Errors
///
/// Returns [`CalDavError::MissingCalendarHome`] if no `calendar-home-set`
/// was reported with status 200, or [`CalDavError::InvalidUrl`] if it does
/// not resolve to an HTTP(S) URL.
pub fn find_calendar_home(
    response: &MultiStatusResponse,
    base_url: &str,
) -> Result<CalendarHome, CalDavError> {
    let href = response
        .ok_props()
        .find_map(|(_, props)| props.calendar_home_set.as_ref())
        .ok_or(CalDavError::MissingCalendarHome)?;
    let home = CalendarHome::build(base_url, href)?;
    tracing::debug!(url = %home, "found calendar home");
    Ok(home)
}

/// Absolute URL of a calendar home collection.
///
/// The path always ends with a slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CalendarHome {
    url: Url,
}

impl CalendarHome {
    /// Resolve `href` against the server's `base_url`.
    ///
    /// `href` may be absolute (`https://host/dav/`), absolute-path
    /// (`/dav/calendars/alice/`) or relative to `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::InvalidUrl`] if `base_url` is not an HTTP(S)
    /// URL or `href` cannot be joined onto it.
    pub fn build(base_url: &str, href: &str) -> Result<Self, CalDavError> {
        let base = http_url(base_url)?;
        let url = base.join(href).map_err(|e| invalid(href, e))?;
        Self::from_url(url)
    }

    /// Parse an absolute calendar home URL.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::InvalidUrl`] if `url` is not an absolute
    /// HTTP(S) URL.
    pub fn parse(url: &str) -> Result<Self, CalDavError> {
        Self::from_url(http_url(url)?)
    }

    fn from_url(mut url: Url) -> Result<Self, CalDavError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(url.as_str(), "scheme must be http or https"));
        }
        url.set_query(None);
        url.set_fragment(None);
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self { url })
    }

    /// Scheme, host and port, e.g. `https://dav.example.com`.
    #[must_use]
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// Path of the home collection.
    #[must_use]
    pub fn href(&self) -> Href {
        Href::from(self.url.path())
    }

    /// URL of a child collection or resource.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::InvalidUrl`] if `child` cannot be joined.
    pub fn join(&self, child: &str) -> Result<String, CalDavError> {
        let child = child.trim_start_matches('/');
        self.url
            .join(child)
            .map(String::from)
            .map_err(|e| invalid(child, e))
    }

    /// The full URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for CalendarHome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl FromStr for CalendarHome {
    type Err = CalDavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn http_url(raw: &str) -> Result<Url, CalDavError> {
    let url = Url::parse(raw).map_err(|e| invalid(raw, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(raw, "scheme must be http or https"));
    }
    if !url.has_host() {
        return Err(invalid(raw, "missing host"));
    }
    Ok(url)
}

fn invalid(url: &str, reason: impl fmt::Display) -> CalDavError {
    CalDavError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}
