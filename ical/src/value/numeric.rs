// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! FLOAT and INTEGER grammars as defined in RFC 5545 Sections 3.3.7 and 3.3.8.

use chumsky::Parser;
use chumsky::extra::ParserExtra;
use chumsky::label::LabelError;
use chumsky::prelude::*;

use crate::value::miscellaneous::ValueExpected;

fn digits<'src, I, E>() -> impl Parser<'src, I, String, E> + Clone
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    select! { c @ '0'..='9' => c }
        .repeated()
        .at_least(1)
        .collect::<String>()
}

fn signed<'src, I, E>() -> impl Parser<'src, I, Option<char>, E> + Clone
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    select! { c @ ('+' | '-') => c }.or_not()
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// float      = (["+"] / "-") 1*DIGIT ["." 1*DIGIT]
/// ```
pub(crate) fn value_float<'src, I, E>() -> impl Parser<'src, I, f64, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    let fractional_part = just('.').ignore_then(digits());

    signed()
        .then(digits())
        .then(fractional_part.or_not())
        .try_map_with(|((sign, int_part), frac_part), e| {
            let mut s = String::with_capacity(
                1 + int_part.len() + frac_part.as_ref().map_or(0, |f| 1 + f.len()),
            );
            if let Some(sign) = sign {
                s.push(sign);
            }
            s.push_str(&int_part);
            if let Some(frac) = frac_part {
                s.push('.');
                s.push_str(&frac);
            }

            let n = match lexical::parse_partial::<f64, _>(&s) {
                Ok((f, n)) if n == s.len() && f.is_finite() => return Ok(f),
                Ok((_, n)) if n < s.len() => n,
                _ => 0,
            };
            Err(E::Error::expected_found(
                [ValueExpected::F64],
                s.chars().nth(n).map(Into::into),
                e.span(),
            ))
        })
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// integer    = (["+"] / "-") 1*DIGIT
/// ```
pub(crate) fn value_integer<'src, I, E>() -> impl Parser<'src, I, i32, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    signed()
        .then(digits())
        .try_map_with(|(sign, digits), e| {
            let mut int_str = String::with_capacity(1 + digits.len());
            if let Some(s) = sign {
                int_str.push(s);
            }
            int_str.push_str(&digits);

            match lexical::parse_partial::<i32, _>(&int_str) {
                Ok((v, n)) if n == int_str.len() => Ok(v),
                Ok((_, n)) => Err(E::Error::expected_found(
                    [ValueExpected::I32],
                    int_str.chars().nth(n).map(Into::into),
                    e.span(),
                )),
                Err(_) => Err(E::Error::expected_found(
                    [ValueExpected::I32],
                    int_str.chars().next().map(Into::into),
                    e.span(),
                )),
            }
        })
}

/// Canonical text of a FLOAT value, never in exponent notation.
pub(crate) fn format_float(f: f64) -> String {
    format!("{f}")
}
