// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Round-trip tests for the iCalendar parser and formatter.
//!
//! These tests verify that parsing, formatting, and parsing again produces
//! an equivalent tree.

use calkit_ical::{Component, Duration, Time, Value, format, parse};

fn assert_round_trip(original: &str) {
    let calendar1 = parse(original).unwrap();
    let formatted = format(&calendar1).unwrap();
    let calendar2 = parse(&formatted).unwrap();
    assert_eq!(calendar1, calendar2, "round trip changed the tree:\n{formatted}");

    // A second pass is stable byte for byte
    assert_eq!(format(&calendar2).unwrap(), formatted);
}

#[test]
fn round_trip_calendar_with_todo_journal_and_alarm() {
    assert_round_trip(
        "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Example Corp.//Cal Client 1.0//EN\r\n\
BEGIN:VTODO\r\n\
UID:todo1@example.com\r\n\
DTSTAMP:20250110T120000Z\r\n\
DUE;VALUE=DATE:20250115\r\n\
PERCENT-COMPLETE:40\r\n\
STATUS:IN-PROCESS\r\n\
END:VTODO\r\n\
BEGIN:VJOURNAL\r\n\
UID:journal1@example.com\r\n\
DESCRIPTION:Notes\\nwith a second line\r\n\
END:VJOURNAL\r\n\
BEGIN:VEVENT\r\n\
UID:event1@example.com\r\n\
DTSTART:20250110T140000Z\r\n\
BEGIN:VALARM\r\n\
ACTION:DISPLAY\r\n\
TRIGGER;RELATED=END:-PT15M\r\n\
REPEAT:2\r\n\
END:VALARM\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n",
    );
}

#[test]
fn round_trip_calendar_with_timezone_and_recurrence() {
    assert_round_trip(
        "BEGIN:VCALENDAR\r\n\
BEGIN:VTIMEZONE\r\n\
TZID:Europe/Berlin\r\n\
BEGIN:STANDARD\r\n\
DTSTART:19701025T030000\r\n\
TZOFFSETFROM:+0200\r\n\
TZOFFSETTO:+0100\r\n\
RRULE:FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU\r\n\
END:STANDARD\r\n\
BEGIN:DAYLIGHT\r\n\
DTSTART:19700329T020000\r\n\
TZOFFSETFROM:+0100\r\n\
TZOFFSETTO:+0200\r\n\
RRULE:FREQ=YEARLY;BYMONTH=3;BYDAY=-1SU\r\n\
END:DAYLIGHT\r\n\
END:VTIMEZONE\r\n\
BEGIN:VEVENT\r\n\
DTSTART;TZID=Europe/Berlin:20250310T090000\r\n\
RRULE:FREQ=WEEKLY;UNTIL=20250630T070000Z;BYDAY=MO,TH\r\n\
EXDATE;TZID=Europe/Berlin:20250317T090000,20250320T090000\r\n\
RDATE;VALUE=PERIOD:20250401T090000Z/PT1H\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n",
    );
}

#[test]
fn round_trip_calendar_with_custom_properties_and_binary() {
    assert_round_trip(
        "BEGIN:VCALENDAR\r\n\
X-WR-CALNAME:Team\\; Ops\r\n\
BEGIN:VEVENT\r\n\
ATTACH;FMTTYPE=text/plain;ENCODING=BASE64;VALUE=BINARY:aGVsbG8gd29ybGQ=\r\n\
ATTACH:https://example.com/agenda.pdf\r\n\
CATEGORIES:WORK,MEETING\r\n\
REQUEST-STATUS:2.0;Success\r\n\
FREEBUSY:19970308T160000Z/PT3H,19970308T200000Z/19970308T210000Z\r\n\
X-ALT-DESC;FMTTYPE=text/html:<p>hi</p>\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n",
    );
}

#[test]
fn round_trip_built_tree() {
    let mut event = Component::new("VEVENT");
    event.add_property_with_value("UID", "built@example.com").unwrap();
    event
        .add_property_with_value("DTSTART", Time::from_date_time(2025, 1, 31, 23, 30, 0))
        .unwrap();
    event
        .add_property_with_value("DURATION", Duration::from_seconds(-90))
        .unwrap();
    event
        .add_property_with_value("DESCRIPTION", "Commas, semicolons; and\nnewlines")
        .unwrap();

    let mut calendar = Component::new("VCALENDAR");
    calendar.add_property_with_value("VERSION", "2.0").unwrap();
    calendar.add_subcomponent(event);

    let parsed = parse(&calendar.to_string()).unwrap();
    assert_eq!(parsed, calendar);

    let description = parsed
        .first_subcomponent(Some("VEVENT"))
        .and_then(|e| e.first_property_value("DESCRIPTION"))
        .and_then(Value::as_text);
    assert_eq!(description, Some("Commas, semicolons; and\nnewlines"));
}

#[test]
fn normalize_is_idempotent() {
    #[rustfmt::skip]
    let cases = [
        (2013, 13, 1, 0, 0, 0),
        (2012, 2, 30, 24, 60, 60),
        (2013, 1, 0, -1, 0, 0),
        (2013, -1, 400, 0, -61, 3_600),
    ];
    for (y, mo, d, h, mi, s) in cases {
        let mut once = Time::from_date_time(2000, 1, 1, 0, 0, 0);
        once.set_auto_normalize(false);
        once.set_year(y);
        once.set_month(mo);
        once.set_day(d);
        once.set_hour(h);
        once.set_minute(mi);
        once.set_second(s);
        once.normalize();
        let mut twice = once.clone();
        twice.normalize();
        assert_eq!(once, twice, "{y}-{mo}-{d} {h}:{mi}:{s}");
    }
}

#[test]
fn duration_seconds_round_trip() {
    for seconds in [0, 1, -1, 59, 3_600, 3_601, 86_399, 86_400, 604_800, -1_209_661] {
        let duration = Duration::from_seconds(seconds);
        assert_eq!(Duration::from_seconds(duration.to_seconds()).to_seconds(), seconds);
        let parsed: Duration = duration.to_string().parse().unwrap();
        assert_eq!(parsed.to_seconds(), seconds, "{duration}");
    }
}
