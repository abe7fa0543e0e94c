// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the component and property tree.

use calkit_ical::{Component, Duration, Error, Property, Time, Value, ValueType, parse};

const CALENDAR: &str = "\
BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//Example Corp.//Cal Client 1.0//EN\r
BEGIN:VEVENT\r
UID:event1@example.com\r
DTSTART:20250110T140000Z\r
SUMMARY:Event 1\r
BEGIN:VALARM\r
ACTION:DISPLAY\r
TRIGGER:-PT15M\r
END:VALARM\r
END:VEVENT\r
BEGIN:VEVENT\r
UID:event2@example.com\r
SUMMARY:Event 2\r
ATTENDEE;CN=Alice:mailto:alice@example.com\r
ATTENDEE;CN=Bob:mailto:bob@example.com\r
END:VEVENT\r
BEGIN:VTODO\r
UID:todo1@example.com\r
END:VTODO\r
END:VCALENDAR\r
";

#[test]
fn queries_subcomponents_by_name() {
    let calendar = parse(CALENDAR).unwrap();
    assert_eq!(calendar.all_subcomponents(None).len(), 3);
    assert_eq!(calendar.all_subcomponents(Some("vevent")).len(), 2);
    assert_eq!(calendar.first_subcomponent(Some("VTODO")).unwrap().name(), "VTODO");
    assert!(calendar.first_subcomponent(Some("VJOURNAL")).is_none());

    let alarm = calendar
        .first_subcomponent(Some("VEVENT"))
        .and_then(|event| event.first_subcomponent(Some("VALARM")))
        .unwrap();
    let trigger = alarm.first_property_value("TRIGGER").and_then(Value::as_duration).unwrap();
    assert_eq!(trigger.to_seconds(), -900);
}

#[test]
fn queries_properties_by_name() {
    let calendar = parse(CALENDAR).unwrap();
    let second = calendar.all_subcomponents(Some("VEVENT"))[1];

    let attendees = second.all_properties(Some("ATTENDEE"));
    let names: Vec<_> = attendees
        .iter()
        .filter_map(|p| p.parameter("CN").map(|v| v.first()))
        .collect();
    assert_eq!(names, ["Alice", "Bob"]);
    assert_eq!(attendees[0].value_type(), ValueType::CalAddress);
    assert_eq!(attendees[0].string_value(), "mailto:alice@example.com");

    assert!(second.has_property("summary"));
    assert!(!second.has_property("DTSTART"));
    assert_eq!(second.all_properties(None).len(), 4);
}

#[test]
fn mutates_tree() {
    let mut calendar = parse(CALENDAR).unwrap();
    assert_eq!(calendar.remove_subcomponent("VEVENT"), 2);
    assert_eq!(calendar.subcomponents().len(), 1);

    let todo = calendar.first_subcomponent_mut(Some("VTODO")).unwrap();
    todo.add_property_with_value("DUE", Time::from_date(2025, 2, 1)).unwrap();
    todo.add_property_with_value("PRIORITY", 1).unwrap();
    todo.add_property_with_value("DURATION", Duration::from_seconds(3600)).unwrap();
    assert_eq!(todo.remove_property("UID"), 1);

    let due = todo.first_property(Some("DUE")).unwrap();
    assert_eq!(due.value_type(), ValueType::Date);
    assert_eq!(due.to_string(), "DUE;VALUE=DATE:20250201");

    let text = calendar.to_string();
    assert!(text.contains("PRIORITY:1\r\n"), "{text}");
    assert!(text.contains("DURATION:PT1H\r\n"), "{text}");
    assert!(!text.contains("UID:todo1"));

    calendar.clear_all_properties();
    assert!(calendar.properties().is_empty());
}

#[test]
fn property_values_share_one_type() {
    let mut prop = Property::new("X-MIXED");
    let err = prop
        .set_values(vec![Value::from(1), Value::from("one")])
        .unwrap_err();
    assert_eq!(err, Error::Structure("All values must be of the same type!".to_string()));

    prop.set_values(vec![Value::from(1), Value::from(2)]).unwrap();
    assert_eq!(prop.value_type(), ValueType::Integer);
    assert_eq!(prop.to_string(), "X-MIXED;VALUE=INTEGER:1,2");
}

#[test]
fn value_parameter_retags_property() {
    let mut prop = Property::new("DTSTART");
    prop.set_value(Time::from_date_time(2025, 1, 10, 9, 0, 0)).unwrap();
    assert_eq!(prop.value_type(), ValueType::DateTime);
    assert_eq!(prop.count_parameters(), 0);

    prop.set_value(Time::from_date(2025, 1, 10)).unwrap();
    assert_eq!(prop.value_type(), ValueType::Date);
    assert_eq!(prop.parameter("VALUE").map(|v| v.first()), Some("DATE"));

    prop.set_value(Time::from_date_time(2025, 1, 10, 9, 0, 0)).unwrap();
    assert_eq!(prop.count_parameters(), 0);
}

#[test]
fn string_value_re_escapes_text() {
    let mut prop = Property::new("DESCRIPTION");
    prop.set_string_value(r"Line one\nLine two\; with\, punctuation").unwrap();
    assert_eq!(
        prop.first_value().and_then(Value::as_text),
        Some("Line one\nLine two; with, punctuation")
    );
    assert_eq!(prop.string_value(), r"Line one\nLine two\; with\, punctuation");
}

#[test]
fn json_view_is_serializable() {
    let calendar = parse(CALENDAR).unwrap();
    let json = calendar.to_json();
    assert_eq!(json[0], "vcalendar");
    assert_eq!(json[1][0], serde_json::json!(["version", {}, "text", "2.0"]));
    assert_eq!(json[2][0][2][0][1][1], serde_json::json!(["trigger", {}, "duration", "-PT15M"]));

    let text = serde_json::to_string(&json).unwrap();
    let back: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(back, json);
}

#[test]
fn component_from_str() {
    let event: Component = "BEGIN:VEVENT\r\nSUMMARY:x\r\nEND:VEVENT\r\n".parse().unwrap();
    assert_eq!(event.name(), "VEVENT");
}
