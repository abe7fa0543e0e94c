// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::sync::Arc;

use crate::component::Component;
use crate::error::{Error, Result};
use crate::keyword::{KW_TZID, KW_VTIMEZONE};
use crate::property::Property;
use crate::syntax::{ContentLine, build_tree, lex, unfold};
use crate::timezone::{Timezone, Zone};
use crate::value::{PeriodEnd, Time, Value};

/// Parse an iCalendar stream holding a single root component.
///
/// Floating DATE-TIME values carrying a `TZID` parameter are bound to the
/// matching `VTIMEZONE` of the same stream. Unknown TZIDs leave the value
/// floating.
///
/// # Errors
///
/// Returns the first grammar, value, structure or timezone error, or a
/// structure error when the stream holds no root or several. Use
/// [`parse_all`] for streams with several roots.
///
/// # Examples
///
/// Parsing valid iCalendar source will return the root component
///
/// ```
/// # use calkit_ical::parse;
/// let ical_src = "\
/// BEGIN:VCALENDAR\r\n\
/// BEGIN:VEVENT\r\n\
/// SUMMARY:Test Event\r\n\
/// END:VEVENT\r\n\
/// END:VCALENDAR\r\n\
/// ";
/// let calendar = parse(ical_src).unwrap();
/// assert_eq!(calendar.subcomponents()[0].name(), "VEVENT");
/// ```
///
/// Grammar errors carry enough context to render a report
///
/// ```
/// # use calkit_ical::{Error, parse};
/// use ariadne::{Color, Label, Report, ReportKind, Source};
/// let invalid_ical_src = "\
/// BEGIN:VCALENDAR\r\n\
/// SUMMARY;X-FOO:Test Event\r\n\
/// END:VCALENDAR\r\n\
/// ";
/// let Err(Error::Grammar(e)) = parse(invalid_ical_src) else {
///     panic!("expected a grammar error");
/// };
/// assert_eq!(e.line_nr, 2);
///
/// Report::build(ReportKind::Error, e.buffer_range())
///     .with_config(ariadne::Config::new().with_index_type(ariadne::IndexType::Byte))
///     .with_message(format!("line {}", e.line_nr))
///     .with_label(
///         Label::new(e.buffer_range())
///             .with_message(&e.message)
///             .with_color(Color::Red),
///     )
///     .finish()
///     .eprint(Source::from(e.line.as_str()))
///     .unwrap();
/// ```
pub fn parse(src: &str) -> Result<Component> {
    let mut roots = parse_all(src)?;
    let count = roots.len();
    match roots.pop() {
        Some(root) if count == 1 => Ok(root),
        Some(_) => Err(Error::structure(format!(
            "Expected a single root component, found {count}"
        ))),
        None => Err(Error::structure("No component found")),
    }
}

/// Parse an iCalendar stream into all of its root components.
///
/// # Errors
///
/// Returns the first grammar, value, structure or timezone error.
pub fn parse_all(src: &str) -> Result<Vec<Component>> {
    let logical = unfold(src);
    tracing::debug!(lines = logical.len(), "parsing iCalendar stream");

    let lines = logical
        .iter()
        .map(|line| lex(&line.text, line.line_nr))
        .collect::<Result<Vec<ContentLine>>>()?;

    let mut roots = build_tree(&lines)?;
    for root in &mut roots {
        resolve_timezones(root)?;
    }
    Ok(roots)
}

/// Parse a single, possibly folded, content line into a property.
///
/// # Errors
///
/// Returns a grammar error, a value error, or a structure error when the
/// input does not hold exactly one content line.
pub fn parse_property(src: &str) -> Result<Property> {
    let mut logical = unfold(src);
    let count = logical.len();
    match logical.pop() {
        Some(line) if count == 1 => Property::from_content_line(&lex(&line.text, line.line_nr)?),
        _ => Err(Error::structure(format!(
            "Expected a single content line, found {count}"
        ))),
    }
}

fn resolve_timezones(root: &mut Component) -> Result<()> {
    let mut zones = HashMap::new();
    collect_timezones(root, &mut zones)?;
    if !zones.is_empty() {
        bind_zones(root, &zones);
    }
    Ok(())
}

fn collect_timezones(component: &Component, zones: &mut HashMap<String, Arc<Timezone>>) -> Result<()> {
    for child in component.subcomponents() {
        if child.name() == KW_VTIMEZONE {
            let timezone = Timezone::from_component(child)?;
            zones.insert(timezone.tzid().to_string(), Arc::new(timezone));
        } else {
            collect_timezones(child, zones)?;
        }
    }
    Ok(())
}

fn bind_zones(component: &mut Component, zones: &HashMap<String, Arc<Timezone>>) {
    for property in component.properties_mut() {
        let Some(tzid) = property.parameter(KW_TZID).map(|v| v.first().to_string()) else {
            continue;
        };
        let Some(timezone) = zones.get(&tzid) else {
            tracing::debug!(tzid, property = property.name(), "no VTIMEZONE for TZID");
            continue;
        };
        let zone = Zone::Timezone(Arc::clone(timezone));
        for value in property.values_mut() {
            match value {
                Value::Time(time) => bind_zone(time, &zone),
                Value::Period(period) => {
                    bind_zone(&mut period.start, &zone);
                    if let PeriodEnd::End(end) = &mut period.end {
                        bind_zone(end, &zone);
                    }
                }
                _ => {}
            }
        }
    }
    for child in component.subcomponents_mut() {
        bind_zones(child, zones);
    }
}

fn bind_zone(time: &mut Time, zone: &Zone) {
    if time.zone().is_floating() && !time.is_date() {
        time.set_zone(zone.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONED: &str = "\
BEGIN:VCALENDAR\r
BEGIN:VTIMEZONE\r
TZID:America/New_York\r
BEGIN:STANDARD\r
DTSTART:20071104T020000\r
TZOFFSETFROM:-0400\r
TZOFFSETTO:-0500\r
RRULE:FREQ=YEARLY;BYMONTH=11;BYDAY=1SU\r
END:STANDARD\r
BEGIN:DAYLIGHT\r
DTSTART:20070311T020000\r
TZOFFSETFROM:-0500\r
TZOFFSETTO:-0400\r
RRULE:FREQ=YEARLY;BYMONTH=3;BYDAY=2SU\r
END:DAYLIGHT\r
END:VTIMEZONE\r
BEGIN:VEVENT\r
DTSTART;TZID=America/New_York:20130701T090000\r
DTEND;TZID=Europe/Nowhere:20130701T100000\r
END:VEVENT\r
END:VCALENDAR\r
";

    #[test]
    fn binds_tzid_to_vtimezone() {
        let calendar = parse(ZONED).unwrap();
        let event = calendar.first_subcomponent(Some("VEVENT")).unwrap();

        let start = event.first_property_value("DTSTART").and_then(Value::as_time).unwrap();
        assert_eq!(start.zone().tzid(), "America/New_York");
        assert_eq!(start.utc_offset(), -4 * 3600);

        let end = event.first_property_value("DTEND").and_then(Value::as_time).unwrap();
        assert!(end.zone().is_floating());
    }

    #[test]
    fn parse_requires_single_root() {
        let err = parse("BEGIN:A\r\nEND:A\r\nBEGIN:B\r\nEND:B\r\n").unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
        assert_eq!(parse_all("BEGIN:A\r\nEND:A\r\nBEGIN:B\r\nEND:B\r\n").unwrap().len(), 2);
        assert!(matches!(parse(""), Err(Error::Structure(_))));
    }

    #[test]
    fn reports_grammar_error_position() {
        let err = parse("BEGIN:VCALENDAR\r\n\r\nSUMMARY\r\nEND:VCALENDAR\r\n").unwrap_err();
        let Error::Grammar(err) = err else {
            panic!("expected a grammar error, got {err:?}");
        };
        assert_eq!(err.line_nr, 3);
        assert_eq!(err.line, "SUMMARY");
    }

    #[test]
    fn parses_folded_property() {
        let prop = parse_property("DESCRIPTION:Hello\r\n  world").unwrap();
        assert_eq!(prop.string_value(), "Hello world");
        assert!(matches!(parse_property("A:1\r\nB:2"), Err(Error::Structure(_))));
    }
}
