// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for recurrence rule expansion.

use calkit_ical::{Error, Frequency, Recur, RecurIterator, Time, Value, WeekDay, parse};

fn expand(rule: &str, dtstart: &str, limit: usize) -> Vec<String> {
    let rule: Recur = rule.parse().unwrap();
    let dtstart: Time = dtstart.parse().unwrap();
    rule.iterator(&dtstart)
        .unwrap()
        .take(limit)
        .map(|t| t.unwrap().to_string())
        .collect()
}

#[test]
fn daily_count_three() {
    let rule: Recur = "FREQ=DAILY;COUNT=3".parse().unwrap();
    let dtstart: Time = "20130101T100000".parse().unwrap();
    let mut iter = RecurIterator::new(rule, dtstart).unwrap();

    let mut seen = Vec::new();
    while let Some(next) = iter.next_occurrence().unwrap() {
        seen.push(next.to_string());
    }
    assert_eq!(seen, ["20130101T100000", "20130102T100000", "20130103T100000"]);
    assert_eq!(iter.next_occurrence().unwrap(), None);
    assert_eq!(iter.occurrence_number(), 3);
}

#[test]
fn monthly_first_monday() {
    assert_eq!(
        expand("FREQ=MONTHLY;BYDAY=1MO", "20130107T090000", 3),
        ["20130107T090000", "20130204T090000", "20130304T090000"]
    );
}

#[test]
fn rfc_examples() {
    #[rustfmt::skip]
    let cases: &[(&str, &str, &[&str])] = &[
        // Every other week on Tuesday and Thursday, for 8 occurrences
        ("FREQ=WEEKLY;INTERVAL=2;COUNT=8;WKST=SU;BYDAY=TU,TH", "19970902T090000", &[
            "19970902T090000", "19970904T090000", "19970916T090000", "19970918T090000",
            "19970930T090000", "19971002T090000", "19971014T090000", "19971016T090000",
        ]),
        // Monthly on the second-to-last Monday of the month for 6 months
        ("FREQ=MONTHLY;COUNT=6;BYDAY=-2MO", "19970922T090000", &[
            "19970922T090000", "19971020T090000", "19971117T090000",
            "19971222T090000", "19980119T090000", "19980216T090000",
        ]),
        // Every Friday the 13th, first four after the start
        ("FREQ=MONTHLY;BYDAY=FR;BYMONTHDAY=13;COUNT=4", "19970902T090000", &[
            "19980213T090000", "19980313T090000", "19981113T090000", "19990813T090000",
        ]),
        // The last work day of the month
        ("FREQ=MONTHLY;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-1;COUNT=3", "19970929T090000", &[
            "19970930T090000", "19971031T090000", "19971128T090000",
        ]),
        // Every 20 minutes from 9:00 to 9:40, two days
        ("FREQ=MINUTELY;INTERVAL=20;BYHOUR=9;COUNT=6", "19970902T090000", &[
            "19970902T090000", "19970902T092000", "19970902T094000",
            "19970903T090000", "19970903T092000", "19970903T094000",
        ]),
        // US presidential election day
        ("FREQ=YEARLY;INTERVAL=4;BYMONTH=11;BYDAY=TU;BYMONTHDAY=2,3,4,5,6,7,8;COUNT=3", "19961105T090000", &[
            "19961105T090000", "20001107T090000", "20041102T090000",
        ]),
        // Monday of week number 20
        ("FREQ=YEARLY;BYWEEKNO=20;BYDAY=MO;COUNT=3", "19970512T090000", &[
            "19970512T090000", "19980511T090000", "19990517T090000",
        ]),
        // Every Thursday in March
        ("FREQ=YEARLY;BYMONTH=3;BYDAY=TH;COUNT=5", "19970313T090000", &[
            "19970313T090000", "19970320T090000", "19970327T090000",
            "19980305T090000", "19980312T090000",
        ]),
        // Every third year on the 1st, 100th and 200th day
        ("FREQ=YEARLY;INTERVAL=3;COUNT=10;BYYEARDAY=1,100,200", "19970101T090000", &[
            "19970101T090000", "19970410T090000", "19970719T090000",
            "20000101T090000", "20000409T090000", "20000718T090000",
            "20030101T090000", "20030410T090000", "20030719T090000",
            "20060101T090000",
        ]),
        // Last day of every year
        ("FREQ=YEARLY;BYYEARDAY=-1;COUNT=3", "20111231T090000", &[
            "20111231T090000", "20121231T090000", "20131231T090000",
        ]),
        // Second Sunday in March
        ("FREQ=YEARLY;BYMONTH=3;BYDAY=SU;BYSETPOS=2;COUNT=3", "20130101T020000", &[
            "20130310T020000", "20140309T020000", "20150308T020000",
        ]),
        // Daily, January only
        ("FREQ=DAILY;BYMONTH=1;UNTIL=19990102T000000Z", "19980130T090000", &[
            "19980130T090000", "19980131T090000", "19990101T090000",
        ]),
    ];
    for (rule, dtstart, expected) in cases {
        assert_eq!(&expand(rule, dtstart, 20), expected, "{rule}");
    }
}

#[test]
fn unreachable_time_of_day_exhausts_immediately() {
    #[rustfmt::skip]
    let cases = [
        ("FREQ=SECONDLY;BYSECOND=60", "20130101T000000"),
        ("FREQ=SECONDLY;INTERVAL=60;BYSECOND=30", "20130101T000000"),
        ("FREQ=SECONDLY;INTERVAL=2;BYSECOND=31", "20130101T000000"),
        ("FREQ=MINUTELY;INTERVAL=120;BYHOUR=1", "20130101T000000"),
        ("FREQ=HOURLY;INTERVAL=6;BYHOUR=1,2", "20130101T000000"),
        ("FREQ=DAILY;BYSECOND=60;COUNT=1", "20130101T090000"),
    ];
    for (rule, dtstart) in cases {
        assert!(expand(rule, dtstart, 1).is_empty(), "{rule}");
    }
}

#[test]
fn secondly_skips_to_matching_seconds() {
    assert_eq!(
        expand("FREQ=SECONDLY;BYSECOND=30;COUNT=3", "20130101T000010", 10),
        ["20130101T000030", "20130101T000130", "20130101T000230"]
    );
    assert_eq!(
        expand("FREQ=SECONDLY;INTERVAL=2;BYSECOND=15,40;COUNT=3", "20130101T000001", 10),
        ["20130101T000015", "20130101T000115", "20130101T000215"]
    );
}

#[test]
fn leap_seconds_are_ignored_next_to_other_seconds() {
    assert_eq!(
        expand("FREQ=DAILY;BYSECOND=0,60;COUNT=2", "20130101T090000", 5),
        ["20130101T090000", "20130102T090000"]
    );
}

#[test]
fn date_start_yields_dates() {
    assert_eq!(
        expand("FREQ=YEARLY;BYMONTH=2;BYMONTHDAY=-1;COUNT=3", "20120229", 5),
        ["20120229", "20130228", "20140228"]
    );
}

#[test]
fn illegal_rule_combinations_fail_at_init() {
    #[rustfmt::skip]
    let cases = [
        ("FREQ=YEARLY;BYYEARDAY=1;BYMONTH=1", "Invalid BYYEARDAY rule"),
        ("FREQ=YEARLY;BYWEEKNO=1;BYMONTHDAY=1", "BYWEEKNO does not fit to BYMONTHDAY"),
        ("FREQ=MONTHLY;BYWEEKNO=1", "For MONTHLY recurrences neither BYYEARDAY nor BYWEEKNO may appear"),
        ("FREQ=WEEKLY;BYMONTHDAY=1", "For WEEKLY recurrences neither BYMONTHDAY nor BYYEARDAY may appear"),
        ("FREQ=DAILY;BYYEARDAY=1", "BYYEARDAY may only appear in YEARLY rules"),
    ];
    let dtstart: Time = "20130101T100000".parse().unwrap();
    for (rule, message) in cases {
        let rule: Recur = rule.parse().unwrap();
        let err = rule.iterator(&dtstart).unwrap_err();
        assert_eq!(err, Error::Recurrence(message.to_string()));
    }
}

#[test]
fn next_occurrence_after_instant() {
    let rule: Recur = "FREQ=WEEKLY;BYDAY=MO,WE".parse().unwrap();
    let dtstart: Time = "20130107T090000".parse().unwrap();
    let after: Time = "20130110T000000".parse().unwrap();
    let next = rule.next_occurrence(&dtstart, &after).unwrap().unwrap();
    assert_eq!(next.to_string(), "20130114T090000");
}

#[test]
fn rule_accessors_and_display() {
    let mut rule: Recur = "FREQ=MONTHLY;BYDAY=-1FR;INTERVAL=2;COUNT=4".parse().unwrap();
    assert_eq!(rule.freq, Frequency::Monthly);
    assert!(rule.is_finite());
    assert!(rule.is_by_count());
    assert_eq!(rule.to_string(), "FREQ=MONTHLY;COUNT=4;INTERVAL=2;BYDAY=-1FR");

    rule.wkst = Some(WeekDay::Sunday);
    assert_eq!(rule.to_string(), "FREQ=MONTHLY;COUNT=4;INTERVAL=2;BYDAY=-1FR;WKST=SU");
}

#[test]
fn expands_rrule_from_parsed_event() {
    let calendar = parse(
        "BEGIN:VCALENDAR\r\n\
         BEGIN:VEVENT\r\n\
         DTSTART;VALUE=DATE:20130101\r\n\
         RRULE:FREQ=YEARLY;COUNT=2\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
    )
    .unwrap();
    let event = calendar.first_subcomponent(Some("VEVENT")).unwrap();
    let start = event.first_property_value("DTSTART").and_then(Value::as_time).unwrap();
    let rule = event.first_property_value("RRULE").and_then(Value::as_recur).unwrap();

    let dates: Vec<_> = rule.iterator(start).unwrap().map(|t| t.unwrap().to_string()).collect();
    assert_eq!(dates, ["20130101", "20140101"]);
}
