// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Error kinds raised while lexing, validating and evaluating calendar data.

use std::fmt::{self, Display};

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced by this crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Content line syntax violation.
    #[error("{0}")]
    Grammar(#[from] GrammarError),

    /// A value failed its type validator, allow-list or required parameter.
    #[error("{message}")]
    InvalidPropertyValue {
        /// Property the value belongs to, if known
        property: Option<String>,
        /// Human readable reason
        message: String,
    },

    /// Component nesting or property typing violation.
    #[error("{0}")]
    Structure(String),

    /// Illegal recurrence rule or a non-terminating iteration.
    #[error("{0}")]
    Recurrence(String),

    /// Malformed timezone definition.
    #[error("{0}")]
    Timezone(String),
}

impl Error {
    pub(crate) fn invalid_value(property: Option<&str>, message: impl Into<String>) -> Self {
        Self::InvalidPropertyValue {
            property: property.map(str::to_owned),
            message: message.into(),
        }
    }

    pub(crate) fn structure(message: impl Into<String>) -> Self {
        Self::Structure(message.into())
    }

    pub(crate) fn recurrence(message: impl Into<String>) -> Self {
        Self::Recurrence(message.into())
    }

    pub(crate) fn timezone(message: impl Into<String>) -> Self {
        Self::Timezone(message.into())
    }
}

/// Syntax error with the position it was raised at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarError {
    /// Number of the physical line the logical line started on (1-based)
    pub line_nr: usize,
    /// Character offset into the logical line
    pub column: usize,
    /// Unconsumed rest of the line
    pub buffer: String,
    /// The whole logical line
    pub line: String,
    /// What went wrong
    pub message: String,
}

impl GrammarError {
    /// Byte range of the unconsumed buffer within the logical line.
    #[must_use]
    pub fn buffer_range(&self) -> std::ops::Range<usize> {
        let start = self.line.len().saturating_sub(self.buffer.len());
        start..self.line.len()
    }
}

impl std::error::Error for GrammarError {}

impl Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.line_nr, self.column, self.message)?;
        if self.buffer.is_empty() {
            write!(f, " at end of line")?;
        } else {
            write!(f, " before '{}'", self.buffer)?;
        }
        write!(f, " in '{}'", self.line)
    }
}
