// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Principal and calendar home discovery tests.

use calkit_caldav::{
    CalDavError, CalendarHome, Href, MultiStatusResponse, PrincipalRef, Properties, ResponseItem,
    find_calendar_home, find_principal,
};

const OK: &str = "HTTP/1.1 200 OK";
const NOT_FOUND: &str = "HTTP/1.1 404 Not Found";

fn single(props: Properties, status: &str) -> MultiStatusResponse {
    MultiStatusResponse::new(vec![ResponseItem::new("/").with_prop_stat(props, status)])
}

#[test]
fn principal_prefers_current_user_principal() {
    let props = Properties {
        current_user_principal: Some(PrincipalRef::Href(Href::from("/principals/alice/"))),
        principal_url: Some(Href::from("/principals/other/")),
        ..Properties::default()
    };
    let principal = find_principal(&single(props, OK)).unwrap();
    assert_eq!(principal.as_str(), "/principals/alice/");
}

#[test]
fn principal_falls_back_to_principal_url() {
    let response = MultiStatusResponse::new(vec![
        ResponseItem::new("/")
            .with_prop_stat(
                Properties {
                    current_user_principal: Some(PrincipalRef::Href(Href::from("/ignored/"))),
                    ..Properties::default()
                },
                NOT_FOUND,
            )
            .with_prop_stat(
                Properties {
                    principal_url: Some(Href::from("/principals/bob/")),
                    ..Properties::default()
                },
                OK,
            ),
    ]);
    assert_eq!(find_principal(&response).unwrap().as_str(), "/principals/bob/");
}

#[test]
fn principal_errors() {
    let unauthenticated = Properties {
        current_user_principal: Some(PrincipalRef::Unauthenticated),
        principal_url: Some(Href::from("/principals/bob/")),
        ..Properties::default()
    };
    assert!(matches!(
        find_principal(&single(unauthenticated, OK)),
        Err(CalDavError::Unauthenticated)
    ));
    assert!(matches!(
        find_principal(&MultiStatusResponse::default()),
        Err(CalDavError::MissingPrincipal)
    ));
}

#[test]
fn calendar_home_is_resolved_against_base_url() {
    let props = Properties {
        calendar_home_set: Some(Href::from("/dav/calendars/alice")),
        ..Properties::default()
    };
    let home = find_calendar_home(&single(props, OK), "https://dav.example.com/.well-known/caldav").unwrap();
    assert_eq!(home.as_str(), "https://dav.example.com/dav/calendars/alice/");
    assert_eq!(home.href().as_str(), "/dav/calendars/alice/");
    assert_eq!(home.to_string().parse::<CalendarHome>().unwrap(), home);
}

#[test]
fn calendar_home_missing_or_unreachable() {
    let props = Properties {
        calendar_home_set: Some(Href::from("/dav/")),
        ..Properties::default()
    };
    assert!(matches!(
        find_calendar_home(&single(props.clone(), NOT_FOUND), "https://dav.example.com/"),
        Err(CalDavError::MissingCalendarHome)
    ));
    assert!(matches!(
        find_calendar_home(&single(props, OK), "not a url"),
        Err(CalDavError::InvalidUrl { .. })
    ));
}
