// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Shared grammar helpers plus the BINARY and BOOLEAN value types.

use std::borrow::Cow;
use std::fmt::{self, Display};

use chumsky::Parser;
use chumsky::error::RichPattern;
use chumsky::extra::ParserExtra;
use chumsky::input::Input;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

/// Failure reasons when a specific value type was expected but not found.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueExpected {
    /// A date value was expected
    Date,
    /// A 64-bit floating-point value was expected
    F64,
    /// A 32-bit signed integer value was expected
    I32,
    /// A 32-bit unsigned integer value was expected
    U32,
    /// A strictly positive integer was expected
    PositiveU32,
    /// "-0000" and "-000000" are not valid offsets
    NegativeZeroOffset,
    /// Period date-times must have consistent timezone (both UTC or both floating)
    MismatchedTimezone,
    /// The same rule part appeared twice
    RRuleDuplicatePart,
    /// FREQ is mandatory
    RRuleRequiredFreq,
    /// COUNT and UNTIL are mutually exclusive
    RRuleCountUntilExclusion,
}

impl From<ValueExpected> for RichPattern<'_, char> {
    fn from(expected: ValueExpected) -> Self {
        match expected {
            ValueExpected::Date => Self::Label(Cow::Borrowed("invalid date")),
            ValueExpected::F64 => Self::Label(Cow::Borrowed("f64 out of range")),
            ValueExpected::I32 => Self::Label(Cow::Borrowed("i32 out of range")),
            ValueExpected::U32 => Self::Label(Cow::Borrowed("u32 out of range")),
            ValueExpected::PositiveU32 => Self::Label(Cow::Borrowed("positive integer")),
            ValueExpected::NegativeZeroOffset => {
                Self::Label(Cow::Borrowed("non negative-zero utc offset"))
            }
            ValueExpected::MismatchedTimezone => Self::Label(Cow::Borrowed(
                "period date-times must have consistent timezone",
            )),
            ValueExpected::RRuleDuplicatePart => {
                Self::Label(Cow::Borrowed("each rule part at most once"))
            }
            ValueExpected::RRuleRequiredFreq => Self::Label(Cow::Borrowed("FREQ rule part")),
            ValueExpected::RRuleCountUntilExclusion => {
                Self::Label(Cow::Borrowed("either COUNT or UNTIL, not both"))
            }
        }
    }
}

/// Run a grammar over a whole string, rendering chumsky errors as text.
pub(crate) fn parse_full<'src, T>(
    parser: impl Parser<'src, &'src str, T, extra::Err<Rich<'src, char>>>,
    src: &'src str,
) -> Result<T, String> {
    parser.then_ignore(end()).parse(src).into_result().map_err(|errs| {
        errs.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    })
}

macro_rules! define_digit_select {
    ($fname:ident : $ty:ty => { $($ch:literal),+ $(,)? }) => {
        #[allow(
            trivial_numeric_casts,
            clippy::cast_lossless,
            clippy::char_lit_as_u8,
            clippy::cast_possible_wrap
        )]
        pub(crate) const fn $fname<'src, I, E>() -> impl Parser<'src, I, $ty, E> + Copy
        where
            I: Input<'src, Token = char, Span = SimpleSpan>,
            E: ParserExtra<'src, I>,
        {
            select! { $( $ch => (($ch as u8 - b'0') as $ty), )+ }
        }
    };
}

define_digit_select!(u8_0_1 : u8 => { '0', '1' });
define_digit_select!(u8_0_3 : u8 => { '0', '1', '2', '3' });
define_digit_select!(u8_0_5 : u8 => { '0', '1', '2', '3', '4', '5' });
define_digit_select!(u8_0_9 : u8 => { '0', '1', '2', '3', '4', '5', '6', '7', '8', '9' });
define_digit_select!(u8_1_9 : u8 => { '1', '2', '3', '4', '5', '6', '7', '8', '9' });
define_digit_select!(i8_0_1 : i8 => { '0', '1' });
define_digit_select!(i8_0_2 : i8 => { '0', '1', '2' });
define_digit_select!(i8_0_3 : i8 => { '0', '1', '2', '3' });
define_digit_select!(i8_0_9 : i8 => { '0', '1', '2', '3', '4', '5', '6', '7', '8', '9' });
define_digit_select!(i8_1_2 : i8 => { '1', '2' });
define_digit_select!(i8_1_4 : i8 => { '1', '2', '3', '4' });
define_digit_select!(i8_1_9 : i8 => { '1', '2', '3', '4', '5', '6', '7', '8', '9' });
define_digit_select!(i16_0_5 : i16 => { '0', '1', '2', '3', '4', '5' });
define_digit_select!(i16_0_6 : i16 => { '0', '1', '2', '3', '4', '5', '6' });
define_digit_select!(i16_0_9 : i16 => { '0', '1', '2', '3', '4', '5', '6', '7', '8', '9' });
define_digit_select!(i16_1_2 : i16 => { '1', '2' });
define_digit_select!(i16_1_9 : i16 => { '1', '2', '3', '4', '5', '6', '7', '8', '9' });

/// `(["+"] / "-")`, true when positive.
pub(crate) fn sign<'src, I, E>() -> impl Parser<'src, I, bool, E> + Copy
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    select! { c @ ('+' | '-') => c }
        .or_not()
        .map(|sign| !matches!(sign, Some('-')))
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// binary     = *(4b-char) [b-end]
/// ; A "BASE64" encoded character string, as defined by [RFC4648].
///
/// b-end      = (2b-char "==") / (3b-char "=")
///
/// b-char = ALPHA / DIGIT / "+" / "/"
/// ```
pub(crate) fn value_binary<'src, I, E>() -> impl Parser<'src, I, (), E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    let b_char = select! {
        'A'..='Z' => (),
        'a'..='z' => (),
        '0'..='9' => (),
        '+' => (),
        '/' => (),
    };

    let quartet = b_char.repeated().exactly(4).ignored();

    // b-end = (2b-char "==") / (3b-char "=")
    let b_end = choice((
        b_char.repeated().exactly(2).ignored().then_ignore(just("==")),
        b_char.repeated().exactly(3).ignored().then_ignore(just('=')),
    ));

    quartet.repeated().ignore_then(b_end.or_not()).ignored()
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// boolean    = "TRUE" / "FALSE"
/// ```
///
/// These values are case-insensitive text.
pub(crate) fn value_boolean<'src, I, E>() -> impl Parser<'src, I, bool, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    let t = choice((just('T'), just('t')))
        .ignore_then(choice((just('R'), just('r'))))
        .ignore_then(choice((just('U'), just('u'))))
        .ignore_then(choice((just('E'), just('e'))))
        .to(true);

    let f = choice((just('F'), just('f')))
        .ignore_then(choice((just('A'), just('a'))))
        .ignore_then(choice((just('L'), just('l'))))
        .ignore_then(choice((just('S'), just('s'))))
        .ignore_then(choice((just('E'), just('e'))))
        .to(false);

    choice((t, f))
}

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn base64_index(c: u8) -> Option<u32> {
    match c {
        b'A'..=b'Z' => Some(u32::from(c - b'A')),
        b'a'..=b'z' => Some(u32::from(c - b'a') + 26),
        b'0'..=b'9' => Some(u32::from(c - b'0') + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

/// Inline binary payload of a BINARY value, kept decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binary(Vec<u8>);

impl Binary {
    /// Wrap raw bytes.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the decoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Decode standard, padded base64.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem when the input is not valid
    /// base64.
    pub fn from_base64(src: &str) -> Result<Self, String> {
        parse_full(value_binary(), src)?;

        let mut bytes = Vec::with_capacity(src.len() / 4 * 3);
        for chunk in src.as_bytes().chunks(4) {
            let mut acc = 0u32;
            let mut digits = 0;
            for &c in chunk {
                if c == b'=' {
                    break;
                }
                let index = base64_index(c).ok_or_else(|| format!("invalid base64 character {c}"))?;
                acc = (acc << 6) | index;
                digits += 1;
            }
            acc <<= 6 * (4 - digits);
            let [_, b0, b1, b2] = acc.to_be_bytes();
            match digits {
                4 => bytes.extend_from_slice(&[b0, b1, b2]),
                3 => bytes.extend_from_slice(&[b0, b1]),
                2 => bytes.push(b0),
                _ => return Err("truncated base64 quartet".to_string()),
            }
        }
        Ok(Self(bytes))
    }

    /// Encode as standard, padded base64.
    #[must_use]
    pub fn to_base64(&self) -> String {
        let mut out = String::with_capacity(self.0.len().div_ceil(3) * 4);
        for chunk in self.0.chunks(3) {
            let b0 = chunk.first().copied().unwrap_or_default();
            let b1 = chunk.get(1).copied().unwrap_or_default();
            let b2 = chunk.get(2).copied().unwrap_or_default();
            let acc = u32::from_be_bytes([0, b0, b1, b2]);
            for i in 0..4 {
                if i <= chunk.len() {
                    let index = (acc >> (18 - 6 * i)) & 0x3F;
                    out.push(char::from(
                        BASE64_ALPHABET
                            .get(index as usize)
                            .copied()
                            .unwrap_or(b'A'),
                    ));
                } else {
                    out.push('=');
                }
            }
        }
        out
    }
}

impl Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}
