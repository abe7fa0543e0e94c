// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// `CalDAV` boundary errors.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum CalDavError {
    /// Neither `current-user-principal` nor `principal-URL` was found.
    #[error("both current-user-principal and principal-URL are missing")]
    MissingPrincipal,

    /// The server reported the request as unauthenticated (RFC 5397).
    #[error("caldav response is unauthenticated")]
    Unauthenticated,

    /// No `calendar-home-set` was found.
    #[error("calendar-home-set is missing")]
    MissingCalendarHome,

    /// A URL could not be parsed or joined.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL or href
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// iCalendar parsing error.
    #[error("iCalendar error: {0}")]
    Ical(#[from] calkit_ical::Error),
}
