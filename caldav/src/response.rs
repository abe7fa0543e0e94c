// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Already-decoded WebDAV/CalDAV multistatus responses.
//!
//! XML decoding happens in the transport layer, which fills these types.

use crate::error::CalDavError;
use crate::types::{CalendarCollection, CalendarResource, ETag, Href};

/// `WebDAV` multistatus response.
#[derive(Debug, Clone, Default)]
pub struct MultiStatusResponse {
    /// The response items.
    pub responses: Vec<ResponseItem>,
}

/// Individual response in multistatus.
#[derive(Debug, Clone)]
pub struct ResponseItem {
    /// Resource the response is about
    pub href: Href,
    /// Properties grouped by status
    pub prop_stats: Vec<PropStat>,
    /// Status of the whole response, if given
    pub status: Option<String>,
}

impl ResponseItem {
    /// Creates an item without property stats.
    #[must_use]
    pub fn new(href: impl Into<Href>) -> Self {
        Self {
            href: href.into(),
            prop_stats: Vec::new(),
            status: None,
        }
    }

    /// Adds a property group with its status line.
    #[must_use]
    pub fn with_prop_stat(mut self, props: Properties, status: impl Into<String>) -> Self {
        self.prop_stats.push(PropStat {
            props,
            status: status.into(),
        });
        self
    }

    /// Property groups whose status is 200 OK.
    pub fn ok_props(&self) -> impl Iterator<Item = &Properties> {
        self.prop_stats
            .iter()
            .filter(|stat| stat.is_ok())
            .map(|stat| &stat.props)
    }
}

/// Property stat with status and value.
#[derive(Debug, Clone)]
pub struct PropStat {
    /// Properties reported with this status
    pub props: Properties,
    /// Status line, e.g. `HTTP/1.1 200 OK`
    pub status: String,
}

impl PropStat {
    /// Whether the status code is 200.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status.split_whitespace().nth(1) == Some("200")
    }
}

/// Value of `current-user-principal` (RFC 5397).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalRef {
    /// `<href>` of the principal
    Href(Href),
    /// `<unauthenticated/>`
    Unauthenticated,
}

/// WebDAV/CalDAV properties.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    /// `displayname`
    pub display_name: Option<String>,
    /// `getetag`
    pub get_etag: Option<ETag>,
    /// `calendar-data`
    pub calendar_data: Option<String>,
    /// `current-user-principal`
    pub current_user_principal: Option<PrincipalRef>,
    /// `principal-URL`
    pub principal_url: Option<Href>,
    /// `calendar-home-set`
    pub calendar_home_set: Option<Href>,
    /// `supported-calendar-component-set`
    pub supported_calendar_components: Option<Vec<String>>,
    /// `calendar-description`
    pub calendar_description: Option<String>,
    /// `calendar-timezone`
    pub calendar_timezone: Option<String>,
    /// `resourcetype` contains `calendar`
    pub is_calendar: bool,
    /// `resourcetype` contains `collection`
    pub is_collection: bool,
}

impl MultiStatusResponse {
    /// Creates a response from its items.
    #[must_use]
    pub const fn new(responses: Vec<ResponseItem>) -> Self {
        Self { responses }
    }

    /// Every 200 OK property group across all items, in order.
    pub fn ok_props(&self) -> impl Iterator<Item = (&Href, &Properties)> {
        self.responses
            .iter()
            .flat_map(|item| item.ok_props().map(move |props| (&item.href, props)))
    }

    /// Converts multistatus response to calendar resources.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::Ical`] if any `calendar-data` fails to parse.
    pub fn into_resources(self) -> Result<Vec<CalendarResource>, CalDavError> {
        let mut resources = Vec::new();
        for (href, props) in self.ok_props() {
            let Some(data) = &props.calendar_data else {
                continue;
            };
            let etag = props.get_etag.clone().unwrap_or_else(|| ETag::new(String::new()));
            resources.push(CalendarResource::from_ical(href.clone(), etag, data)?);
        }
        tracing::debug!(count = resources.len(), "decoded calendar resources");
        Ok(resources)
    }

    /// Converts multistatus response to calendar collections.
    #[must_use]
    pub fn into_collections(self) -> Vec<CalendarCollection> {
        self.ok_props()
            .filter(|(_, props)| props.is_calendar && props.is_collection)
            .map(|(href, props)| {
                let mut collection = CalendarCollection::new(href.clone());
                collection.display_name.clone_from(&props.display_name);
                collection.description.clone_from(&props.calendar_description);
                collection.supported_components = props
                    .supported_calendar_components
                    .clone()
                    .unwrap_or_default();
                collection.ctag.clone_from(&props.get_etag);
                collection
            })
            .collect()
    }
}
