// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Tree builder for constructing the component hierarchy from content lines.
//!
//! The builder keeps a stack of open components:
//! 1. On `BEGIN:X`, push a new component onto the stack
//! 2. On a property, decode it and add it to the top of the stack
//! 3. On `END:X`, pop the stack and attach the component to its parent

use crate::component::Component;
use crate::error::{Error, Result};
use crate::keyword::{KW_BEGIN, KW_END};
use crate::property::Property;
use crate::syntax::scanner::ContentLine;

/// Build the component trees described by a sequence of content lines.
///
/// Returns the root components in source order.
///
/// # Errors
///
/// Fails on the first structural problem with a [`TreeBuildError`] wrapped
/// as [`Error::Structure`], or with the error of a property whose value does
/// not decode.
pub fn build_tree(lines: &[ContentLine]) -> Result<Vec<Component>> {
    let mut stack: Vec<Component> = Vec::new();
    let mut roots = Vec::new();

    for line in lines {
        if (line.name == KW_BEGIN || line.name == KW_END) && !line.parameters.is_empty() {
            return Err(TreeBuildError::BeginEndWithParameters {
                keyword: line.name.clone(),
                line_nr: line.line_nr,
            }
            .into());
        }

        if line.name == KW_BEGIN {
            tracing::trace!(component = %line.value, line_nr = line.line_nr, "BEGIN");
            stack.push(Component::new(&line.value));
        } else if line.name == KW_END {
            tracing::trace!(component = %line.value, line_nr = line.line_nr, "END");
            let Some(component) = stack.pop() else {
                return Err(TreeBuildError::UnmatchedEnd {
                    name: line.value.clone(),
                    line_nr: line.line_nr,
                }
                .into());
            };
            if !component.name().eq_ignore_ascii_case(&line.value) {
                return Err(TreeBuildError::MismatchedNesting {
                    expected: component.name().to_string(),
                    found: line.value.clone(),
                    line_nr: line.line_nr,
                }
                .into());
            }

            match stack.last_mut() {
                Some(parent) => {
                    parent.add_subcomponent(component);
                }
                None => roots.push(component),
            }
        } else if let Some(current) = stack.last_mut() {
            current.add_property(Property::from_content_line(line)?);
        } else {
            return Err(TreeBuildError::OrphanProperty {
                name: line.name.clone(),
                line_nr: line.line_nr,
            }
            .into());
        }
    }

    match stack.pop() {
        Some(component) => Err(TreeBuildError::UnmatchedBegin {
            name: component.name().to_string(),
        }
        .into()),
        None => Ok(roots),
    }
}

/// Structural errors found while building a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeBuildError {
    /// END without a corresponding BEGIN
    #[error("{line_nr}: Unexpected END:{name}, no component is open")]
    UnmatchedEnd {
        /// Name of the component being closed
        name: String,
        /// Line of the END
        line_nr: usize,
    },

    /// BEGIN that was never closed
    #[error("Missing END:{name}")]
    UnmatchedBegin {
        /// Name of the open component
        name: String,
    },

    /// END naming another component than the innermost open one
    #[error("{line_nr}: Unexpected END:{found}, expected END:{expected}")]
    MismatchedNesting {
        /// Innermost open component
        expected: String,
        /// Name found on the END line
        found: String,
        /// Line of the END
        line_nr: usize,
    },

    /// BEGIN or END carrying parameters
    #[error("{line_nr}: {keyword} must not have parameters")]
    BeginEndWithParameters {
        /// `BEGIN` or `END`
        keyword: String,
        /// Line of the offending BEGIN or END
        line_nr: usize,
    },

    /// Property found before any BEGIN
    #[error("{line_nr}: Property {name} is outside of any component")]
    OrphanProperty {
        /// Property name
        name: String,
        /// Line of the property
        line_nr: usize,
    },
}

impl From<TreeBuildError> for Error {
    fn from(err: TreeBuildError) -> Self {
        Self::Structure(err.to_string())
    }
}
