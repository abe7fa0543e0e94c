// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::calendar_home::CalendarHome;
use crate::error::CalDavError;

/// `CalDAV` server configuration.
///
/// Requests are issued by the transport layer, which reads `timeout_secs`
/// and `user_agent` from here. This crate only resolves the URLs.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CalDavConfig {
    /// Base URL of the `CalDAV` server.
    pub base_url: String,
    /// Calendar home path (e.g., /dav/calendars/user/), when already known.
    #[serde(default)]
    pub calendar_home: Option<String>,
    /// Request timeout in seconds, for the transport layer.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// `User-Agent` header value, for the transport layer.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("calkit-caldav/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for CalDavConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            calendar_home: None,
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl CalDavConfig {
    /// The configured calendar home resolved against the base URL.
    ///
    /// Returns `Ok(None)` when no calendar home is configured, so the caller
    /// has to discover it.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::InvalidUrl`] if either URL is malformed.
    pub fn calendar_home(&self) -> Result<Option<CalendarHome>, CalDavError> {
        self.calendar_home
            .as_deref()
            .map(|home| CalendarHome::build(&self.base_url, home))
            .transpose()
    }
}
