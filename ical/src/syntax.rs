// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Content line syntax as defined in RFC 5545 Section 3.1.
//!
//! ```text
//! Source → lexer (unfold) → scanner (lex) → tree_builder → Component
//! ```

pub mod lexer;
pub mod scanner;
pub mod tree_builder;

pub use lexer::{FOLD_LENGTH, LogicalLine, fold, unfold};
pub use scanner::{Branch, ContentLine, Cursor, ParamValue, Parameter, alternatives, lex};
pub use tree_builder::{TreeBuildError, build_tree};
