// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Scanner for iCalendar content lines.
//!
//! Per RFC 5545, a content line has the format:
//! ```text
//! contentline = name *(";" param) ":" value CRLF
//! ```
//!
//! The scanner walks one unfolded line with a [`Cursor`]. Every sub-scanner
//! takes the cursor by exclusive reference, and [`alternatives`] snapshots and
//! restores it between branches.

use std::fmt::{self, Display};

use crate::error::{Error, GrammarError, Result};

/// Position inside one logical line.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    line: &'a str,
    pos: usize,
    line_nr: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `line`.
    #[must_use]
    pub const fn new(line: &'a str, line_nr: usize) -> Self {
        Self {
            line,
            pos: 0,
            line_nr,
        }
    }

    /// Unconsumed rest of the line.
    #[must_use]
    pub fn buffer(&self) -> &'a str {
        self.line.get(self.pos..).unwrap_or_default()
    }

    /// Character offset of the cursor.
    #[must_use]
    pub fn column(&self) -> usize {
        self.line.get(..self.pos).map_or(0, |s| s.chars().count())
    }

    /// Save the current position.
    #[must_use]
    pub const fn snapshot(&self) -> usize {
        self.pos
    }

    /// Return to a position saved with [`Cursor::snapshot`].
    pub const fn restore(&mut self, snapshot: usize) {
        self.pos = snapshot;
    }

    /// Whether the whole line has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// Build a grammar error at the current position.
    #[must_use]
    pub fn error(&self, message: impl Into<String>) -> Error {
        Error::Grammar(GrammarError {
            line_nr: self.line_nr,
            column: self.column(),
            buffer: self.buffer().to_string(),
            line: self.line.to_string(),
            message: message.into(),
        })
    }

    fn peek(&self) -> Option<char> {
        self.buffer().chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, s: &str) -> bool {
        if self.buffer().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char, message: &str) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    /// Consume the longest prefix whose characters satisfy `pred`.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let buffer = self.buffer();
        let len = buffer
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map_or(buffer.len(), |(i, _)| i);
        self.pos += len;
        buffer.get(..len).unwrap_or_default()
    }

    fn take_while1(&mut self, pred: impl Fn(char) -> bool, message: &str) -> Result<&'a str> {
        let taken = self.take_while(pred);
        if taken.is_empty() {
            Err(self.error(message))
        } else {
            Ok(taken)
        }
    }

    fn expect_end(&self, message: &str) -> Result<()> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.error(message))
        }
    }
}

/// A branch tried by [`alternatives`].
pub type Branch<'f, 'a, T> = &'f dyn Fn(&mut Cursor<'a>) -> Result<T>;

/// Try each branch in order against the same starting position.
///
/// A branch failing with [`Error::Grammar`] is recorded and the cursor is
/// rolled back before the next branch runs. Any other error is returned
/// immediately. When every branch fails, the recorded messages are combined
/// into one grammar error.
///
/// # Errors
///
/// Returns the combined grammar error, or the first non-grammar error.
pub fn alternatives<'a, T>(cursor: &mut Cursor<'a>, branches: &[Branch<'_, 'a, T>]) -> Result<T> {
    let start = cursor.snapshot();
    let mut errors = Vec::new();
    for branch in branches {
        match branch(cursor) {
            Ok(value) => return Ok(value),
            Err(Error::Grammar(err)) => {
                errors.push(err.to_string());
                cursor.restore(start);
            }
            Err(err) => return Err(err),
        }
    }

    if errors.is_empty() {
        Err(cursor.error("No Tokens found"))
    } else {
        Err(cursor.error(errors.join("\nOR ")))
    }
}

/// Parse `element (separator element)*`.
fn list<'a, T>(
    cursor: &mut Cursor<'a>,
    separator: char,
    element: impl Fn(&mut Cursor<'a>) -> Result<T>,
) -> Result<Vec<T>> {
    let mut values = vec![element(cursor)?];
    while cursor.eat(separator) {
        values.push(element(cursor)?);
    }
    Ok(values)
}

/// Value of a property parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// `NAME=value`
    Single(String),
    /// `NAME=a,b,c`
    List(Vec<String>),
}

impl ParamValue {
    /// First (or only) value.
    #[must_use]
    pub fn first(&self) -> &str {
        match self {
            Self::Single(v) => v,
            Self::List(vs) => vs.first().map_or("", String::as_str),
        }
    }

    /// Iterate over all values.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice = match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::List(vs) => vs.as_slice(),
        };
        slice.iter().map(String::as_str)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(mut values: Vec<String>) -> Self {
        if values.len() == 1 {
            Self::Single(values.remove(0))
        } else {
            Self::List(values)
        }
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            if value.contains([';', ':', ',']) {
                write!(f, "\"{value}\"")?;
            } else {
                write!(f, "{value}")?;
            }
        }
        Ok(())
    }
}

/// A `NAME=value` pair attached to a content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name, uppercased
    pub name: String,
    /// Parameter value
    pub value: ParamValue,
}

/// One lexed content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Property name, uppercased
    pub name: String,
    /// Parameters in source order, a repeated name replaces the earlier one
    pub parameters: Vec<Parameter>,
    /// Raw, still escaped, value text
    pub value: String,
    /// Physical line the content line started on
    pub line_nr: usize,
}

impl ContentLine {
    /// Look up a parameter by name, case-insensitively.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParamValue> {
        self.parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| &p.value)
    }
}

/// Lex one unfolded content line.
///
/// # Errors
///
/// Returns [`Error::Grammar`] on an invalid name, a missing `:` or `=`, an
/// invalid parameter value, an invalid value character, or trailing junk.
pub fn lex(line: &str, line_nr: usize) -> Result<ContentLine> {
    let mut cursor = Cursor::new(line, line_nr);
    let name = lex_name(&mut cursor)?;

    let mut parameters: Vec<Parameter> = Vec::new();
    while cursor.eat(';') {
        let param = lex_param(&mut cursor)?;
        if let Some(existing) = parameters.iter_mut().find(|p| p.name == param.name) {
            existing.value = param.value;
        } else {
            parameters.push(param);
        }
    }

    cursor.expect(':', "Expected ':'")?;
    let value = lex_value(&mut cursor)?;
    cursor.expect_end("Junk at End of Line")?;

    Ok(ContentLine {
        name,
        parameters,
        value: value.to_string(),
        line_nr,
    })
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

fn lex_name(cursor: &mut Cursor<'_>) -> Result<String> {
    let x_name = |cursor: &mut Cursor<'_>| -> Result<String> {
        const ERROR: &str = "Expected XName";
        if !cursor.eat_str("X-") && !cursor.eat_str("x-") {
            return Err(cursor.error(ERROR));
        }

        let mut name = String::from("X-");
        let vendor_start = cursor.snapshot();
        let vendor = cursor.take_while(|c| c.is_ascii_alphanumeric());
        if !vendor.is_empty() && cursor.eat('-') {
            name.push_str(vendor);
            name.push('-');
        } else {
            cursor.restore(vendor_start);
        }

        name.push_str(cursor.take_while1(is_name_char, ERROR)?);
        Ok(name)
    };
    let iana_token = |cursor: &mut Cursor<'_>| -> Result<String> {
        cursor
            .take_while1(is_name_char, "Expected IANA Token")
            .map(str::to_string)
    };

    let name = alternatives(cursor, &[&x_name, &iana_token])?;
    Ok(name.to_ascii_uppercase())
}

fn lex_param(cursor: &mut Cursor<'_>) -> Result<Parameter> {
    let name = lex_name(cursor)?;
    cursor.expect('=', "Expected '='")?;
    let values = list(cursor, ',', lex_param_value)?;
    Ok(Parameter {
        name,
        value: ParamValue::from(values),
    })
}

/// CONTROL = %x00-08 / %x0A-1F / %x7F
fn is_control(c: char) -> bool {
    matches!(c, '\x00'..='\x08' | '\x0A'..='\x1F' | '\x7F')
}

fn lex_param_value(cursor: &mut Cursor<'_>) -> Result<String> {
    let quoted = |cursor: &mut Cursor<'_>| -> Result<String> {
        cursor.expect('"', "Expecting Quote Character")?;
        let text = cursor.take_while(|c| c != '"' && !is_control(c));
        cursor.expect('"', "Expecting Quote Character")?;
        Ok(text.to_string())
    };
    let param_text = |cursor: &mut Cursor<'_>| -> Result<String> {
        let text = cursor.take_while(|c| !matches!(c, '"' | ';' | ':' | ',') && !is_control(c));
        Ok(text.to_string())
    };

    alternatives(cursor, &[&quoted, &param_text])
}

/// VALUE-CHAR = WSP / %x21-7E / NON-US-ASCII
fn is_value_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x21'..='\x7E') || !c.is_ascii()
}

fn lex_value<'a>(cursor: &mut Cursor<'a>) -> Result<&'a str> {
    if cursor.is_at_end() {
        return Ok("");
    }
    cursor.take_while1(is_value_char, "Invalid Character in value")
}
