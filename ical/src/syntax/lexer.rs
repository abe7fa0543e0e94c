// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Physical line segmentation and RFC 5545 §3.1 folding.

use std::fmt::{self, Display};

use logos::Logos;

/// Default fold width in octets.
pub const FOLD_LENGTH: usize = 75;

/// Token emitted when splitting source text into physical lines
#[derive(PartialEq, Eq, Clone, Copy, Logos)]
pub enum Token<'a> {
    /// Line break followed by linear whitespace, i.e. a folded continuation
    #[regex(r"\r?\n[ \t]")]
    Fold,

    /// Line break ending a logical line
    #[regex(r"\r?\n")]
    Newline,

    /// A bare carriage return that does not start a line break
    #[token("\r")]
    CarriageReturn,

    /// Any run of characters without line breaks
    #[regex(r"[^\r\n]+", allow_greedy = true)]
    Text(&'a str),
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fold => write!(f, "Fold"),
            Self::Newline => write!(f, "Newline"),
            Self::CarriageReturn => write!(f, "CarriageReturn"),
            Self::Text(s) => write!(f, "Text({s})"),
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// A logical, unfolded content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// Unfolded line text without the terminating line break
    pub text: String,
    /// Physical line number the logical line starts on (1-based)
    pub line_nr: usize,
}

/// Split source text into unfolded logical lines.
///
/// Blank lines are dropped.
#[must_use]
pub fn unfold(src: &str) -> Vec<LogicalLine> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut start_nr = 1;
    let mut physical_nr = 1;

    for token in Token::lexer(src) {
        match token {
            Ok(Token::Text(text)) => current.push_str(text),
            Ok(Token::CarriageReturn) | Err(()) => current.push('\r'),
            Ok(Token::Fold) => physical_nr += 1,
            Ok(Token::Newline) => {
                physical_nr += 1;
                if !current.is_empty() {
                    lines.push(LogicalLine {
                        text: std::mem::take(&mut current),
                        line_nr: start_nr,
                    });
                }
                start_nr = physical_nr;
            }
        }
    }

    if !current.is_empty() {
        lines.push(LogicalLine {
            text: current,
            line_nr: start_nr,
        });
    }
    lines
}

/// Fold a logical line at [`FOLD_LENGTH`] octets using CRLF + SPACE.
///
/// The result carries no trailing line break. Folds never split a UTF-8
/// sequence.
#[must_use]
pub fn fold(line: &str) -> String {
    fold_with(line, FOLD_LENGTH, " ")
}

pub(crate) fn fold_with(line: &str, width: usize, continuation: &str) -> String {
    let width = width.max(2);
    let mut out = String::with_capacity(line.len() + line.len() / width * 3);
    let mut line_len = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if line_len + len > width && line_len > continuation.len() {
            out.push_str("\r\n");
            out.push_str(continuation);
            line_len = continuation.len();
        }
        out.push(c);
        line_len += len;
    }
    out
}

#[cfg(test)]
mod tests {
    #![expect(clippy::indexing_slicing)]

    use super::Token::*;
    use super::*;

    fn tokenize(src: &str) -> Vec<Token<'_>> {
        Token::lexer(src).map(|t| t.unwrap()).collect()
    }

    #[test]
    fn tokenizes_line_breaks() {
        assert_eq!(
            tokenize("A:1\r\n B\nC\r\n\tD\rE"),
            [
                Text("A:1"),
                Fold,
                Text("B"),
                Newline,
                Text("C"),
                Fold,
                Text("D"),
                CarriageReturn,
                Text("E"),
            ]
        );
    }

    #[test]
    fn handles_line_folding() {
        let lines = unfold("WORD1\r\n WORD2\r\n\tWORD3\r\nWORD4\r\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "WORD1WORD2WORD3");
        assert_eq!(lines[0].line_nr, 1);
        assert_eq!(lines[1].text, "WORD4");
        assert_eq!(lines[1].line_nr, 4);
    }

    #[test]
    fn unfold_accepts_bare_lf_and_missing_final_break() {
        let lines = unfold("A:1\nB:2\n C\n\nD:4");
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["A:1", "B:2C", "D:4"]);
        assert_eq!(lines[2].line_nr, 5);
    }

    #[test]
    fn fold_limits_physical_lines_to_75_octets() {
        let line = format!("DESCRIPTION:{}", "x".repeat(200));
        let folded = fold(&line);
        for physical in folded.split("\r\n") {
            assert!(physical.len() <= FOLD_LENGTH, "{physical:?}");
        }
        assert!(folded.contains("\r\n "));
    }

    #[test]
    fn fold_keeps_utf8_sequences_whole() {
        let line = format!("SUMMARY:{}", "日本語".repeat(30));
        let folded = fold(&line);
        for physical in folded.split("\r\n") {
            assert!(physical.len() <= FOLD_LENGTH);
        }
    }

    #[test]
    fn fold_then_unfold_is_identity() {
        #[rustfmt::skip]
        let cases = [
            "SUMMARY:short".to_string(),
            format!("DESCRIPTION:{}", "abc ".repeat(60)),
            format!("X-UNICODE:{}", "ü€😀".repeat(40)),
            "A".repeat(75),
            "B".repeat(76),
        ];
        for line in cases {
            let folded = fold(&line);
            let unfolded = unfold(&folded);
            assert_eq!(unfolded.len(), 1);
            assert_eq!(unfolded[0].text, line);
        }
    }
}
