// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the iCalendar formatter.

use calkit_ical::{FoldingStyle, FormatOptions, format, parse};

#[test]
fn test_format_simple_event() {
    let input = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Example Corp.//Cal Client 1.0//EN\r\n\
BEGIN:VEVENT\r\n\
UID:12345@example.com\r\n\
DTSTAMP:20250110T120000Z\r\n\
DTSTART:20250110T140000Z\r\n\
DTEND:20250110T150000Z\r\n\
SUMMARY:Test Event\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    let calendar = parse(input).unwrap();
    assert_eq!(format(&calendar).unwrap(), input);
}

#[test]
fn test_format_with_parameters() {
    let input = "BEGIN:VEVENT\r\n\
SUMMARY;LANGUAGE=en:Test Event\r\n\
ATTENDEE;CN=\"Doe, Jane\";ROLE=REQ-PARTICIPANT:mailto:jane@example.com\r\n\
END:VEVENT\r\n";

    let formatted = format(&parse(input).unwrap()).unwrap();
    assert!(formatted.contains("SUMMARY;LANGUAGE=en:Test Event\r\n"));
    assert!(formatted.contains("ATTENDEE;CN=\"Doe, Jane\";ROLE=REQ-PARTICIPANT:mailto:jane@example.com\r\n"));
}

#[test]
fn test_format_text_with_special_characters() {
    let input = "BEGIN:VEVENT\r\n\
SUMMARY:Meeting\\, with \\; special \\\\ chars\r\n\
DESCRIPTION:Line 1\\nLine 2\r\n\
END:VEVENT\r\n";

    let event = parse(input).unwrap();
    let summary = event.first_property(Some("SUMMARY")).unwrap();
    assert_eq!(summary.values()[0].as_text(), Some("Meeting, with ; special \\ chars"));
    assert_eq!(format(&event).unwrap(), input);
}

#[test]
fn test_format_typed_values() {
    let input = "BEGIN:VEVENT\r\n\
DTSTART;VALUE=DATE:20250110\r\n\
DURATION:P1DT2H\r\n\
RRULE:FREQ=WEEKLY;COUNT=10;BYDAY=MO,WE,FR\r\n\
GEO:37.386013;-122.082932\r\n\
X-CUSTOM;X-PARAM=1:custom value\r\n\
END:VEVENT\r\n";

    assert_eq!(format(&parse(input).unwrap()).unwrap(), input);
}

#[test]
fn test_format_folds_long_lines() {
    let long = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(4);
    let input = format!("BEGIN:VEVENT\r\nDESCRIPTION:{}\r\nEND:VEVENT\r\n", long.trim_end());
    let event = parse(&input).unwrap();

    let folded = format(&event).unwrap();
    assert!(folded.lines().all(|line| line.len() <= 75));
    assert!(folded.contains("\r\n "));
    assert_eq!(parse(&folded).unwrap(), event);

    let tabbed = FormatOptions::default()
        .folding_style(FoldingStyle::Tab)
        .write_to_string(&event)
        .unwrap();
    assert!(tabbed.contains("\r\n\t"));
    assert_eq!(parse(&tabbed).unwrap(), event);

    let unfolded = FormatOptions::default().folding(None).write_to_string(&event).unwrap();
    assert_eq!(unfolded, input);
}
