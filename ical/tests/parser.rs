// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for parsing, value typing and validation.

use calkit_ical::syntax::{fold, lex, unfold};
use calkit_ical::{Error, UtcOffset, Value, ValueType, Zone, parse, parse_property};

#[test]
fn parse_utc_date_time() {
    let prop = parse_property("DTSTART:20130101T100000Z\r\n").unwrap();
    assert_eq!(prop.value_type(), ValueType::DateTime);

    let time = prop.first_value().and_then(Value::as_time).unwrap();
    assert_eq!(
        (time.year(), time.month(), time.day(), time.hour(), time.minute(), time.second()),
        (2013, 1, 1, 10, 0, 0)
    );
    assert!(!time.is_date());
    assert_eq!(time.zone(), &Zone::Utc);
    assert_eq!(prop.to_string(), "DTSTART:20130101T100000Z");
}

#[test]
fn parse_utc_offsets() {
    let prop = parse_property("TZOFFSETTO:+0530").unwrap();
    let offset = prop.first_value().and_then(Value::as_utc_offset).unwrap();
    assert_eq!(
        *offset,
        UtcOffset {
            factor: 1,
            hours: 5,
            minutes: 30,
            seconds: 0
        }
    );
    assert_eq!(offset.to_seconds(), 19_800);

    for negative_zero in ["TZOFFSETTO:-0000", "TZOFFSETFROM:-000000"] {
        let err = parse_property(negative_zero).unwrap_err();
        assert!(matches!(err, Error::InvalidPropertyValue { .. }), "{negative_zero}: {err:?}");
    }
}

#[test]
fn parse_value_parameter_overrides_default_type() {
    let prop = parse_property("DTSTART;VALUE=DATE:20130101").unwrap();
    assert_eq!(prop.value_type(), ValueType::Date);
    assert!(prop.first_value().and_then(Value::as_time).unwrap().is_date());

    let err = parse_property("DTSTART;VALUE=NOPE:20130101").unwrap_err();
    assert!(err.to_string().contains("Invalid VALUE Type"), "{err}");
}

#[test]
fn parse_multi_and_structured_values() {
    let prop = parse_property(r"CATEGORIES:WORK,TRAVEL\,LEISURE").unwrap();
    let values: Vec<_> = prop.values().iter().filter_map(Value::as_text).collect();
    assert_eq!(values, ["WORK", "TRAVEL,LEISURE"]);

    let prop = parse_property("EXDATE:20130101T100000,20130102T100000").unwrap();
    assert_eq!(prop.values().len(), 2);

    let prop = parse_property("GEO:37.386013;-122.082932").unwrap();
    let values: Vec<_> = prop.values().iter().filter_map(Value::as_float).collect();
    assert_eq!(values, [37.386_013, -122.082_932]);
}

#[test]
fn parse_binary_requires_base64_encoding() {
    let prop = parse_property("ATTACH;VALUE=BINARY;ENCODING=BASE64:aGVsbG8=").unwrap();
    let binary = prop.first_value().and_then(Value::as_binary).unwrap();
    assert_eq!(binary.as_bytes(), b"hello");

    let err = parse_property("ATTACH;VALUE=BINARY:aGVsbG8=").unwrap_err();
    assert_eq!(err.to_string(), "Value requires ENCODING=BASE64");
}

#[test]
fn parse_rejects_bad_values() {
    #[rustfmt::skip]
    let cases = [
        "DTSTART:2013-01-01",
        "PRIORITY:high",
        "DURATION:P1X",
        "RRULE:FREQ=SOMETIMES",
        "TRIGGER;VALUE=DATE-TIME:-PT15M",
    ];
    for line in cases {
        let result = parse_property(line);
        assert!(matches!(result, Err(Error::InvalidPropertyValue { .. })), "{line}: {result:?}");
    }
}

#[test]
fn parse_rejects_bad_parameters() {
    let err = parse_property("ATTENDEE;PARTSTAT=MAYBE:mailto:a@example.com").unwrap_err();
    assert_eq!(err.to_string(), "Value for PARTSTAT is not a TEXT");

    let err = parse_property("ATTENDEE;RSVP=YES:mailto:a@example.com").unwrap_err();
    assert_eq!(err.to_string(), "Value for RSVP is not a BOOLEAN");

    let prop = parse_property("ATTENDEE;CUTYPE=X-ROBOT;RSVP=true:mailto:a@example.com").unwrap();
    assert_eq!(prop.parameter("cutype").map(|v| v.first()), Some("X-ROBOT"));
}

#[test]
fn grammar_errors_carry_position() {
    #[rustfmt::skip]
    let cases = [
        ("SUMMARY", 7),            // no ':'
        (";X=1:v", 0),             // no name
        ("X-A;P=\"open:v", 6),     // unterminated quote
    ];
    for (line, column) in cases {
        let Err(Error::Grammar(err)) = lex(line, 4) else {
            panic!("{line} should not lex");
        };
        assert_eq!(err.line_nr, 4, "{line}");
        assert_eq!(err.column, column, "{line}: {err}");
        assert_eq!(err.line, line);
    }
}

#[test]
fn fold_then_unfold_is_identity() {
    #[rustfmt::skip]
    let lines = [
        "SUMMARY:short",
        "DESCRIPTION:aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
        "X-NOTE;LANGUAGE=ja:日本語のテキスト日本語のテキスト日本語のテキスト日本語のテキスト日本語のテキスト",
        "ATTENDEE;CN=\"Doe, Jane\";ROLE=REQ-PARTICIPANT:mailto:jane.doe.with.a.very.long.address@example.com",
    ];
    for line in lines {
        let folded = fold(line);
        let unfolded = unfold(&folded);
        assert_eq!(unfolded.len(), 1);
        assert_eq!(unfolded[0].text, line);
        assert_eq!(lex(&unfolded[0].text, 1).unwrap(), lex(line, 1).unwrap());
    }
}

#[test]
fn parse_accepts_bare_newlines_and_folds() {
    let calendar = parse("BEGIN:VCALENDAR\nDESCRIPTION:one\n two\nEND:VCALENDAR\n").unwrap();
    let description = calendar.first_property(Some("DESCRIPTION")).unwrap();
    assert_eq!(description.string_value(), "onetwo");
}
