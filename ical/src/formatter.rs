// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! iCalendar (RFC 5545) formatter.
//!
//! Writes a [`Component`] tree as RFC 5545 text to any `std::io::Write`
//! implementer, folding long lines.
//!
//! # Example
//!
//! ```
//! use calkit_ical::formatter::FormatOptions;
//! use calkit_ical::parse;
//!
//! let calendar = parse("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n").unwrap();
//! let text = FormatOptions::default().folding(None).write_to_string(&calendar).unwrap();
//! assert_eq!(text, "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n");
//! ```

use std::io::{self, Write};

use crate::component::Component;
use crate::keyword::{KW_BEGIN, KW_END};
use crate::property::Property;
use crate::syntax::lexer::{FOLD_LENGTH, fold_with};

/// Format a component to a `String` with the default options.
///
/// # Errors
///
/// Returns an error if writing to the internal buffer fails.
pub fn format(component: &Component) -> io::Result<String> {
    FormatOptions::default().write_to_string(component)
}

/// Formatting options for the iCalendar formatter.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Maximum line length in octets before folding.
    /// - `None`: no line folding
    /// - `Some(n)`: fold lines longer than n octets
    ///
    /// Default: `Some(75)` for RFC 5545 compliance.
    pub folding: Option<usize>,

    /// Line folding style.
    ///
    /// Default: `FoldingStyle::Space` (CRLF + SPACE).
    pub folding_style: FoldingStyle,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            folding: Some(FOLD_LENGTH),
            folding_style: FoldingStyle::default(),
        }
    }
}

impl FormatOptions {
    /// Set the line folding option.
    #[must_use]
    pub fn folding(mut self, folding: Option<usize>) -> Self {
        self.folding = folding;
        self
    }

    /// Set the line folding style.
    #[must_use]
    pub const fn folding_style(mut self, style: FoldingStyle) -> Self {
        self.folding_style = style;
        self
    }

    /// Write a component to any `Write` implementer.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write(&self, component: &Component, w: &mut impl Write) -> io::Result<()> {
        let mut formatter = Formatter::new(w, *self);
        formatter.write(component)
    }

    /// Write a component to a `String`.
    ///
    /// # Errors
    /// Returns an error if writing fails or if the output contains invalid UTF-8 data.
    pub fn write_to_string(&self, component: &Component) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write(component, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Line folding style for RFC 5545 formatting.
///
/// Folded lines start with CRLF followed by a single whitespace character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FoldingStyle {
    /// CRLF + SPACE
    #[default]
    Space,
    /// CRLF + TAB
    Tab,
}

impl FoldingStyle {
    /// The whitespace written after the CRLF of a fold.
    #[must_use]
    pub const fn continuation(self) -> &'static str {
        match self {
            Self::Space => " ",
            Self::Tab => "\t",
        }
    }
}

/// iCalendar formatter that writes to any `Write` implementer.
///
/// # Example
///
/// ```
/// use calkit_ical::Component;
/// use calkit_ical::formatter::{FormatOptions, Formatter};
///
/// let mut event = Component::new("VEVENT");
/// event.add_property_with_value("SUMMARY", "Standup").unwrap();
///
/// let mut formatter = Formatter::new(Vec::new(), FormatOptions::default());
/// formatter.write(&event).unwrap();
/// let text = String::from_utf8(formatter.into_writer()).unwrap();
/// assert_eq!(text, "BEGIN:VEVENT\r\nSUMMARY:Standup\r\nEND:VEVENT\r\n");
/// ```
#[derive(Debug)]
pub struct Formatter<W: Write> {
    writer: W,
    options: FormatOptions,
}

impl<W: Write> Formatter<W> {
    /// Create a new formatter with options.
    #[must_use]
    pub fn new(writer: W, options: FormatOptions) -> Self {
        Self { writer, options }
    }

    /// Get a mutable reference to the underlying writer.
    #[must_use]
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Get a reference to the underlying writer.
    #[must_use]
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Consumes this formatter, returning the underlying writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Write a component and its subcomponents to the underlying writer.
    ///
    /// Properties come before subcomponents, each group in insertion order.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write(&mut self, component: &Component) -> io::Result<()> {
        self.write_line(&format!("{KW_BEGIN}:{}", component.name()))?;
        for property in component.properties() {
            self.write_property(property)?;
        }
        for child in component.subcomponents() {
            self.write(child)?;
        }
        self.write_line(&format!("{KW_END}:{}", component.name()))
    }

    /// Write one property as a folded content line.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_property(&mut self, property: &Property) -> io::Result<()> {
        self.write_line(&property.to_string())
    }

    /// Write a logical line, folded per the options, followed by CRLF.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self.options.folding {
            Some(width) => {
                let folded = fold_with(line, width, self.options.folding_style.continuation());
                self.writer.write_all(folded.as_bytes())?;
            }
            None => self.writer.write_all(line.as_bytes())?,
        }
        self.writer.write_all(b"\r\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_summary(summary: &str) -> Component {
        let mut event = Component::new("VEVENT");
        event.add_property_with_value("SUMMARY", summary).unwrap();
        event
    }

    #[test]
    fn folds_long_lines_at_75_octets() {
        let event = event_with_summary(&"x".repeat(200));
        let text = format(&event).unwrap();
        for line in text.split("\r\n") {
            assert!(line.len() <= 75, "{line:?}");
        }
        let unfolded = text.replace("\r\n ", "");
        assert!(unfolded.contains(&format!("SUMMARY:{}", "x".repeat(200))));
    }

    #[test]
    fn folds_with_tab_continuation() {
        let event = event_with_summary(&"y".repeat(100));
        let text = FormatOptions::default()
            .folding_style(FoldingStyle::Tab)
            .write_to_string(&event)
            .unwrap();
        assert!(text.contains("\r\n\t"));
        assert!(!text.contains("\r\n y"));
    }

    #[test]
    fn folding_can_be_disabled() {
        let event = event_with_summary(&"z".repeat(100));
        let text = FormatOptions::default()
            .folding(None)
            .write_to_string(&event)
            .unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn never_splits_multibyte_characters() {
        let event = event_with_summary(&"日本語".repeat(30));
        let text = format(&event).unwrap();
        for line in text.split("\r\n") {
            assert!(line.len() <= 75);
        }
        assert_eq!(text.replace("\r\n ", "").matches("日本語").count(), 30);
    }

    #[test]
    fn writes_nested_components_in_order() {
        let mut calendar = Component::new("VCALENDAR");
        calendar.add_property_with_value("VERSION", "2.0").unwrap();
        calendar.add_subcomponent(event_with_summary("A"));
        calendar.add_subcomponent(event_with_summary("B"));
        let text = FormatOptions::default().write_to_string(&calendar).unwrap();
        assert_eq!(
            text,
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\n\
             BEGIN:VEVENT\r\nSUMMARY:A\r\nEND:VEVENT\r\n\
             BEGIN:VEVENT\r\nSUMMARY:B\r\nEND:VEVENT\r\n\
             END:VCALENDAR\r\n"
        );
    }
}
